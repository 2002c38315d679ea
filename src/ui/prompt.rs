// Prompt - One request/response unit of user input
//
// A prompt owns the widgets and key bindings a setup function created for it, a typed
// response slot, and a one-shot "response ready" signal. Workers block in
// `wait_for_response()`; UI callbacks answer with `submit()`.
//
// Lifecycle:
//   Created --set_return_type--> Armed --submit--> Answered --reset--> Armed
//   any state --destroy--> Destroyed (terminal)
// Enabled/disabled is orthogonal and only gates `submit()`.
//
// Lock order is registry, then prompt state. Widget work always runs on the UI thread.

use crate::clock::SharedClock;
use crate::error::{GuiError, Result};
use crate::models::{PromptConfig, Response, Value, ValueKind};
use crate::ui::executor::UiThreadExecutor;
use crate::ui::registry::{Members, PromptRegistry};
use crate::ui::widget::{
    KeyBindingId, KeyCallback, KeyEvent, KeyTargetHandle, RegionHandle, WidgetHandle,
};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

static NEXT_PROMPT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PromptId(u64);

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How [`Prompt::wait_for_response_with`] behaves around the wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Give up after this long and return no response
    pub timeout: Option<Duration>,

    /// Enable the prompt's widgets before blocking
    pub enable_on_wait: bool,

    /// Disable the prompt's widgets once a response has been read
    pub disable_on_response: bool,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            enable_on_wait: true,
            disable_on_response: true,
        }
    }
}

impl WaitOptions {
    pub fn from_config(config: &PromptConfig) -> Self {
        Self {
            timeout: config.wait_timeout_ms.map(Duration::from_millis),
            enable_on_wait: config.enable_on_wait,
            disable_on_response: config.disable_on_response,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Leave the widgets' enabled state alone for the whole wait
    pub fn untoggled() -> Self {
        Self {
            enable_on_wait: false,
            disable_on_response: false,
            ..Self::default()
        }
    }

    pub fn with_enable_on_wait(mut self, enable: bool) -> Self {
        self.enable_on_wait = enable;
        self
    }
}

/// Everything a prompt borrows from the GUI that creates it
pub(crate) struct PromptContext {
    pub executor: UiThreadExecutor,
    pub registry: PromptRegistry,
    pub clock: SharedClock,
    pub parent: RegionHandle,
    pub key_target: KeyTargetHandle,
    pub wait_defaults: WaitOptions,
}

struct PromptState {
    return_kind: Option<ValueKind>,
    value: Option<Value>,
    response_timestamp: f64,
    presentation_timestamp: Option<f64>,
    widgets: Vec<WidgetHandle>,
    key_bindings: Vec<KeyBindingId>,
    ready: bool,
    alive: bool,
}

impl PromptState {
    fn rearm(&mut self) {
        self.value = self.return_kind.map(ValueKind::zero);
        self.response_timestamp = 0.0;
        self.ready = false;
    }
}

struct PromptInner {
    id: PromptId,
    executor: UiThreadExecutor,
    registry: Weak<Members>,
    clock: SharedClock,
    parent: RegionHandle,
    key_target: KeyTargetHandle,
    wait_defaults: WaitOptions,
    state: Mutex<PromptState>,
    response_ready: Condvar,
}

/// Handle to a prompt; clones refer to the same prompt
#[derive(Clone)]
pub struct Prompt {
    inner: Arc<PromptInner>,
}

/// Non-owning prompt handle for widget callbacks
#[derive(Clone)]
pub struct WeakPrompt {
    inner: Weak<PromptInner>,
}

impl WeakPrompt {
    pub fn upgrade(&self) -> Option<Prompt> {
        self.inner.upgrade().map(|inner| Prompt { inner })
    }
}

impl fmt::Debug for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prompt").field("id", &self.inner.id).finish()
    }
}

impl PromptInner {
    fn lock_state(&self) -> MutexGuard<'_, PromptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_alive(&self, state: &PromptState) -> Result<()> {
        if state.alive {
            Ok(())
        } else {
            Err(GuiError::PromptDestroyed(self.id))
        }
    }

    fn submit_now(&self, value: Value, timestamp: f64) -> Result<bool> {
        let mut state = self.lock_state();
        self.ensure_alive(&state)?;

        let expected = state.return_kind.ok_or(GuiError::MissingReturnType)?;
        if value.kind() != expected {
            return Err(GuiError::ValueTypeMismatch {
                expected,
                found: value.kind(),
            });
        }

        // All-or-nothing: one disabled widget refuses the whole submission
        if !state.widgets.iter().all(|w| w.is_enabled()) {
            drop(state);
            self.executor.metrics().record_submission(false);
            tracing::debug!("Prompt {} ignored submission while disabled", self.id);
            return Ok(false);
        }

        state.response_timestamp = timestamp;
        state.value = Some(value);
        state.ready = true;
        drop(state);

        self.response_ready.notify_all();
        self.executor.metrics().record_submission(true);
        tracing::debug!("Prompt {} answered at {:.6}", self.id, timestamp);
        Ok(true)
    }

    fn set_interaction_now(&self, enabled: bool) -> Result<()> {
        let widgets = {
            let state = self.lock_state();
            self.ensure_alive(&state)?;
            state.widgets.clone()
        };

        for widget in &widgets {
            if let Err(e) = widget.set_enabled(enabled) {
                tracing::warn!(
                    "Prompt {}: skipping {} {:?}: {}",
                    self.id,
                    widget.kind(),
                    widget.widget_id(),
                    e
                );
            }
        }
        Ok(())
    }

    fn reset_now(&self) -> Result<()> {
        let mut state = self.lock_state();
        self.ensure_alive(&state)?;
        state.rearm();
        Ok(())
    }

    fn destroy_now(&self) -> Result<()> {
        let registry = self.registry.upgrade();
        let mut members = registry
            .as_deref()
            .map(|m| m.lock().unwrap_or_else(PoisonError::into_inner));
        let mut state = self.lock_state();
        self.ensure_alive(&state)?;

        let removed = self.parent.clear_children();
        state.widgets.clear();
        for binding in state.key_bindings.drain(..) {
            if !self.key_target.unbind(binding) {
                tracing::debug!("Prompt {}: key binding {:?} already gone", self.id, binding);
            }
        }
        state.rearm();
        state.alive = false;

        if let Some(members) = members.as_mut() {
            members.shift_remove(&self.id);
        }
        drop(state);
        drop(members);

        // Wake waiters so they observe the destroyed prompt instead of hanging
        self.response_ready.notify_all();
        self.executor.metrics().record_prompt_destroyed();
        tracing::info!("Prompt {} destroyed ({} widgets removed)", self.id, removed);
        Ok(())
    }
}

impl Prompt {
    pub(crate) fn new(context: PromptContext) -> Self {
        let id = PromptId(NEXT_PROMPT_ID.fetch_add(1, Ordering::Relaxed));
        Self {
            inner: Arc::new(PromptInner {
                id,
                executor: context.executor,
                registry: context.registry.downgrade(),
                clock: context.clock,
                parent: context.parent,
                key_target: context.key_target,
                wait_defaults: context.wait_defaults,
                state: Mutex::new(PromptState {
                    return_kind: None,
                    value: None,
                    response_timestamp: 0.0,
                    presentation_timestamp: None,
                    widgets: Vec::new(),
                    key_bindings: Vec::new(),
                    ready: false,
                    alive: true,
                }),
                response_ready: Condvar::new(),
            }),
        }
    }

    pub fn id(&self) -> PromptId {
        self.inner.id
    }

    pub fn downgrade(&self) -> WeakPrompt {
        WeakPrompt {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Whether the prompt is still registered with its GUI
    pub fn exists(&self) -> bool {
        self.inner
            .registry
            .upgrade()
            .is_some_and(|m| m.lock().unwrap_or_else(PoisonError::into_inner).contains_key(&self.inner.id))
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.inner.lock_state().alive
    }

    fn ensure_exists(&self) -> Result<()> {
        let state = self.inner.lock_state();
        self.inner.ensure_alive(&state)
    }

    /// Run `f` against this prompt on the UI thread
    fn on_ui<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&PromptInner) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let inner = self.inner.clone();
        self.inner.executor.run(move || f(&inner))?
    }

    /// Fix the response type from a Rust type.
    ///
    /// # Errors
    /// - [`GuiError::UnsupportedValueType`] unless `T` is a bool, integer, float, or string
    /// - [`GuiError::ReturnTypeLocked`] if a type is already set or widgets are attached
    pub fn set_return_type<T: 'static + ?Sized>(&self) -> Result<()> {
        self.ensure_exists()?;
        self.set_return_kind(ValueKind::of::<T>()?)
    }

    pub fn set_return_kind(&self, kind: ValueKind) -> Result<()> {
        let mut state = self.inner.lock_state();
        self.inner.ensure_alive(&state)?;
        if state.return_kind.is_some() || !state.widgets.is_empty() {
            return Err(GuiError::ReturnTypeLocked);
        }
        state.return_kind = Some(kind);
        state.value = Some(kind.zero());
        Ok(())
    }

    pub fn return_kind(&self) -> Result<Option<ValueKind>> {
        let state = self.inner.lock_state();
        self.inner.ensure_alive(&state)?;
        Ok(state.return_kind)
    }

    /// Register a widget whose enabled state gates submissions
    pub fn track_interactive_widget(&self, widget: WidgetHandle) -> Result<()> {
        let mut state = self.inner.lock_state();
        self.inner.ensure_alive(&state)?;
        if state.return_kind.is_none() {
            return Err(GuiError::MissingReturnType);
        }
        state.widgets.push(widget);
        Ok(())
    }

    /// Register a window-level key binding to be removed on destroy
    pub fn track_root_keybinding(&self, binding: KeyBindingId) -> Result<()> {
        let mut state = self.inner.lock_state();
        self.inner.ensure_alive(&state)?;
        if state.return_kind.is_none() {
            return Err(GuiError::MissingReturnType);
        }
        state.key_bindings.push(binding);
        Ok(())
    }

    /// Bind `callback` on the window-level key target, on the UI thread, and track the
    /// binding so destroy removes it
    pub fn bind_root_key<F>(&self, callback: F) -> Result<KeyBindingId>
    where
        F: Fn(&KeyEvent) + Send + Sync + 'static,
    {
        let callback: KeyCallback = Arc::new(callback);
        self.on_ui(move |inner| {
            {
                let state = inner.lock_state();
                inner.ensure_alive(&state)?;
                if state.return_kind.is_none() {
                    return Err(GuiError::MissingReturnType);
                }
            }
            // Destroy also runs on the UI thread, so the prompt cannot die in between
            let binding = inner.key_target.bind(callback);
            inner.lock_state().key_bindings.push(binding);
            Ok(binding)
        })
    }

    pub fn parent_region(&self) -> Result<RegionHandle> {
        self.ensure_exists()?;
        Ok(self.inner.parent.clone())
    }

    pub fn interactive_widgets(&self) -> Result<Vec<WidgetHandle>> {
        let state = self.inner.lock_state();
        self.inner.ensure_alive(&state)?;
        Ok(state.widgets.clone())
    }

    pub fn key_bindings(&self) -> Result<Vec<KeyBindingId>> {
        let state = self.inner.lock_state();
        self.inner.ensure_alive(&state)?;
        Ok(state.key_bindings.clone())
    }

    /// Record when the prompt's widgets became visible. Only the first call has effect.
    pub(crate) fn mark_presented(&self) -> Result<f64> {
        let now = self.inner.clock.now();
        let mut state = self.inner.lock_state();
        self.inner.ensure_alive(&state)?;
        Ok(*state.presentation_timestamp.get_or_insert(now))
    }

    /// Zero point for reaction times; `None` until the prompt has been presented
    pub fn presentation_timestamp(&self) -> Result<Option<f64>> {
        let state = self.inner.lock_state();
        self.inner.ensure_alive(&state)?;
        Ok(state.presentation_timestamp)
    }

    /// The stored value and timestamp. The value is the type's zero until answered.
    pub fn current_response(&self) -> Result<Option<Response>> {
        let state = self.inner.lock_state();
        self.inner.ensure_alive(&state)?;
        Ok(state.value.clone().map(|value| Response {
            value,
            timestamp: state.response_timestamp,
        }))
    }

    pub fn is_response_ready(&self) -> Result<bool> {
        let state = self.inner.lock_state();
        self.inner.ensure_alive(&state)?;
        Ok(state.ready)
    }

    /// Whether every interactive widget currently accepts input
    pub fn is_enabled(&self) -> Result<bool> {
        self.on_ui(|inner| {
            let state = inner.lock_state();
            inner.ensure_alive(&state)?;
            Ok(state.widgets.iter().all(|w| w.is_enabled()))
        })
    }

    /// Answer the prompt.
    ///
    /// The timestamp is read from the clock on entry. The submission only lands if every
    /// interactive widget is enabled; a prompt with no widgets always accepts.
    ///
    /// # Returns
    /// `true` if the value was stored and the ready signal raised, `false` if gated
    pub fn submit(&self, value: impl Into<Value>) -> Result<bool> {
        let timestamp = self.inner.clock.now();
        let value = value.into();
        self.on_ui(move |inner| inner.submit_now(value, timestamp))
    }

    /// Block until answered, using the GUI's default wait options with `timeout`.
    ///
    /// With the default options the prompt is enabled before blocking and disabled once
    /// answered, so calling this in a loop collects one answer per call. If
    /// `enable_on_wait` is turned off, call [`enable`](Self::enable) before each wait or
    /// every wait after the first stays gated until it times out.
    pub fn wait_for_response(&self, timeout: Option<Duration>) -> Result<Option<Response>> {
        let defaults = self.inner.wait_defaults;
        self.wait_for_response_with(defaults.with_timeout(timeout.or(defaults.timeout)))
    }

    /// Block the calling worker until the prompt is answered.
    ///
    /// Consumes the ready signal; the stored value stays until overwritten or reset.
    ///
    /// # Returns
    /// - `Ok(Some(response))` once answered
    /// - `Ok(None)` if `options.timeout` elapsed first
    ///
    /// # Errors
    /// - [`GuiError::WaitOnUiThread`] when called from the UI thread
    /// - [`GuiError::PromptDestroyed`] if the prompt is destroyed before or during the wait
    pub fn wait_for_response_with(&self, options: WaitOptions) -> Result<Option<Response>> {
        if self.inner.executor.is_ui_thread() {
            return Err(GuiError::WaitOnUiThread);
        }
        self.ensure_exists()?;

        if options.enable_on_wait {
            self.enable()?;
        }

        let response = {
            let state = self.inner.lock_state();
            let pending = |s: &mut PromptState| s.alive && !s.ready;
            let mut state = match options.timeout {
                Some(limit) => {
                    self.inner
                        .response_ready
                        .wait_timeout_while(state, limit, pending)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
                None => self
                    .inner
                    .response_ready
                    .wait_while(state, pending)
                    .unwrap_or_else(PoisonError::into_inner),
            };

            self.inner.ensure_alive(&state)?;
            if state.ready {
                state.ready = false;
                state.value.clone().map(|value| Response {
                    value,
                    timestamp: state.response_timestamp,
                })
            } else {
                None
            }
        };

        match &response {
            Some(_) if options.disable_on_response => {
                if let Err(e) = self.disable() {
                    tracing::warn!("Prompt {}: could not disable after response: {}", self.id(), e);
                }
            }
            None => tracing::debug!("Prompt {}: wait ended without a response", self.id()),
            _ => {}
        }

        Ok(response)
    }

    /// Enable every interactive widget; widgets that refuse are skipped
    pub fn enable(&self) -> Result<()> {
        self.on_ui(|inner| inner.set_interaction_now(true))
    }

    /// Disable every interactive widget; widgets that refuse are skipped
    pub fn disable(&self) -> Result<()> {
        self.on_ui(|inner| inner.set_interaction_now(false))
    }

    /// Re-arm: zero the value and timestamp and clear the ready signal
    pub fn reset(&self) -> Result<()> {
        self.on_ui(|inner| inner.reset_now())
    }

    /// Tear down widgets and key bindings, leave the registry, and mark the prompt dead.
    ///
    /// # Errors
    /// [`GuiError::PromptDestroyed`] if it was already destroyed
    pub fn destroy(&self) -> Result<()> {
        self.on_ui(|inner| inner.destroy_now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::event_loop::EventLoop;
    use crate::ui::headless::{Button, Frame, RootWindow};
    use crate::ui::widget::{KeyTarget, Region, Widget, WidgetError, WidgetId};
    use mockall::mock;
    use std::sync::atomic::Ordering as AtomicOrdering;

    mock! {
        pub Gadget {}

        impl Widget for Gadget {
            fn widget_id(&self) -> WidgetId;
            fn kind(&self) -> &'static str;
            fn set_enabled(&self, enabled: bool) -> std::result::Result<(), WidgetError>;
            fn is_enabled(&self) -> bool;
            fn destroy(&self);
        }
    }

    struct Fixture {
        prompt: Prompt,
        registry: PromptRegistry,
        root: Arc<RootWindow>,
        region: Arc<Frame>,
        executor: UiThreadExecutor,
    }

    /// A prompt whose UI thread is the test thread, so every call runs inline
    fn fixture(clock: SharedClock) -> Fixture {
        let (_event_loop, dispatcher) = EventLoop::new();
        let executor = UiThreadExecutor::new(Arc::new(dispatcher));
        let registry = PromptRegistry::new();
        let root = RootWindow::new("test", (700, 400));
        let region = Frame::new("prompt");
        root.frame().add_child(region.clone());

        let prompt = Prompt::new(PromptContext {
            executor: executor.clone(),
            registry: registry.clone(),
            clock,
            parent: region.clone(),
            key_target: root.clone(),
            wait_defaults: WaitOptions::default(),
        });
        registry.add(&prompt);

        Fixture {
            prompt,
            registry,
            root,
            region,
            executor,
        }
    }

    fn fixed_clock(t: f64) -> SharedClock {
        Arc::new(move || t)
    }

    #[test]
    fn test_return_type_is_fixed_once() {
        let f = fixture(fixed_clock(1.0));

        f.prompt.set_return_type::<String>().unwrap();
        assert_eq!(f.prompt.return_kind().unwrap(), Some(ValueKind::Str));
        assert!(matches!(
            f.prompt.set_return_type::<bool>(),
            Err(GuiError::ReturnTypeLocked)
        ));
    }

    #[test]
    fn test_unsupported_return_type() {
        let f = fixture(fixed_clock(1.0));
        assert!(matches!(
            f.prompt.set_return_type::<Vec<String>>(),
            Err(GuiError::UnsupportedValueType(_))
        ));
        assert_eq!(f.prompt.return_kind().unwrap(), None);
    }

    #[test]
    fn test_widgets_require_return_type() {
        let f = fixture(fixed_clock(1.0));
        let button = Button::new("A", Value::from(1));
        assert!(matches!(
            f.prompt.track_interactive_widget(button),
            Err(GuiError::MissingReturnType)
        ));
    }

    #[test]
    fn test_submit_stores_value_and_clock_time() {
        let f = fixture(fixed_clock(42.5));
        f.prompt.set_return_type::<i64>().unwrap();
        f.prompt.track_interactive_widget(Button::new("A", Value::from(3))).unwrap();

        assert!(f.prompt.submit(3).unwrap());
        assert!(f.prompt.is_response_ready().unwrap());
        assert_eq!(
            f.prompt.current_response().unwrap(),
            Some(Response {
                value: Value::Int(3),
                timestamp: 42.5
            })
        );
        assert_eq!(
            f.executor
                .metrics()
                .submissions_accepted
                .load(AtomicOrdering::Relaxed),
            1
        );
    }

    #[test]
    fn test_submit_wrong_kind_is_rejected() {
        let f = fixture(fixed_clock(1.0));
        f.prompt.set_return_type::<bool>().unwrap();
        assert!(matches!(
            f.prompt.submit("yes"),
            Err(GuiError::ValueTypeMismatch {
                expected: ValueKind::Bool,
                found: ValueKind::Str
            })
        ));
    }

    #[test]
    fn test_single_disabled_widget_gates_submission() {
        let f = fixture(fixed_clock(1.0));
        f.prompt.set_return_type::<String>().unwrap();
        let a = Button::new("A", Value::from("A"));
        let b = Button::new("B", Value::from("B"));
        f.prompt.track_interactive_widget(a.clone()).unwrap();
        f.prompt.track_interactive_widget(b.clone()).unwrap();

        b.set_enabled(false).unwrap();

        assert!(!f.prompt.submit("A").unwrap());
        assert!(!f.prompt.is_response_ready().unwrap());
        assert!(!f.prompt.is_enabled().unwrap());
    }

    #[test]
    fn test_zero_widgets_accept_submissions() {
        let f = fixture(fixed_clock(1.0));
        f.prompt.set_return_type::<bool>().unwrap();

        f.prompt.disable().unwrap();

        assert!(f.prompt.is_enabled().unwrap());
        assert!(f.prompt.submit(true).unwrap());
        assert!(f.prompt.is_response_ready().unwrap());
    }

    #[test]
    fn test_disable_skips_failing_widgets() {
        let f = fixture(fixed_clock(1.0));
        f.prompt.set_return_type::<i64>().unwrap();

        let mut broken = MockGadget::new();
        broken
            .expect_set_enabled()
            .times(1)
            .returning(|_| Err(WidgetError::Unsupported { kind: "gadget" }));
        broken.expect_kind().return_const("gadget");
        broken.expect_widget_id().return_const(WidgetId::next());

        let mut working = MockGadget::new();
        working
            .expect_set_enabled()
            .withf(|enabled| !*enabled)
            .times(1)
            .returning(|_| Ok(()));

        f.prompt.track_interactive_widget(Arc::new(broken)).unwrap();
        f.prompt.track_interactive_widget(Arc::new(working)).unwrap();

        f.prompt.disable().unwrap();
    }

    #[test]
    fn test_reset_rearms_to_zero() {
        let f = fixture(fixed_clock(9.0));
        f.prompt.set_return_type::<f64>().unwrap();
        f.prompt.submit(0.75).unwrap();

        f.prompt.reset().unwrap();

        assert!(!f.prompt.is_response_ready().unwrap());
        assert_eq!(
            f.prompt.current_response().unwrap(),
            Some(Response {
                value: Value::Float(0.0),
                timestamp: 0.0
            })
        );
    }

    #[test]
    fn test_destroy_tears_down_and_fails_later_calls() {
        let f = fixture(fixed_clock(1.0));
        f.prompt.set_return_type::<String>().unwrap();
        let button = Button::new("B", Value::from("B"));
        f.region.add_child(button.clone());
        f.prompt.track_interactive_widget(button.clone()).unwrap();
        f.prompt.bind_root_key(|_event| {}).unwrap();
        assert_eq!(f.root.binding_count(), 1);

        f.prompt.destroy().unwrap();

        assert!(!f.prompt.exists());
        assert!(!f.registry.contains(&f.prompt));
        assert_eq!(f.region.child_count(), 0);
        assert_eq!(f.root.binding_count(), 0);
        assert!(button.is_destroyed());

        assert!(f.prompt.submit("B").unwrap_err().is_destroyed());
        assert!(f.prompt.enable().unwrap_err().is_destroyed());
        assert!(f.prompt.reset().unwrap_err().is_destroyed());
        assert!(f.prompt.return_kind().unwrap_err().is_destroyed());
        assert!(f.prompt.destroy().unwrap_err().is_destroyed());
    }

    #[test]
    fn test_wait_on_ui_thread_is_refused() {
        let f = fixture(fixed_clock(1.0));
        f.prompt.set_return_type::<bool>().unwrap();
        assert!(matches!(
            f.prompt.wait_for_response(Some(Duration::from_millis(1))),
            Err(GuiError::WaitOnUiThread)
        ));
    }

    #[test]
    fn test_presentation_timestamp_is_captured_once() {
        let f = fixture(fixed_clock(3.0));
        assert_eq!(f.prompt.presentation_timestamp().unwrap(), None);
        assert_eq!(f.prompt.mark_presented().unwrap(), 3.0);
        assert_eq!(f.prompt.mark_presented().unwrap(), 3.0);
        assert_eq!(f.prompt.presentation_timestamp().unwrap(), Some(3.0));
    }

    #[test]
    fn test_weak_prompt_does_not_keep_prompt_alive() {
        let f = fixture(fixed_clock(1.0));
        let weak = f.prompt.downgrade();
        assert!(weak.upgrade().is_some());

        f.prompt.destroy().unwrap();
        drop(f);

        assert!(weak.upgrade().is_none());
    }

    /// Key target that records which thread each bind ran on
    #[derive(Default)]
    struct RecordingKeys {
        bound_on: Mutex<Vec<std::thread::ThreadId>>,
    }

    impl KeyTarget for RecordingKeys {
        fn bind(&self, _callback: KeyCallback) -> KeyBindingId {
            let mut bound_on = self.bound_on.lock().unwrap();
            bound_on.push(std::thread::current().id());
            KeyBindingId(bound_on.len() as u64)
        }

        fn unbind(&self, _id: KeyBindingId) -> bool {
            true
        }
    }

    #[test]
    fn test_root_key_is_bound_on_ui_thread() {
        let (event_loop, dispatcher) = EventLoop::new();
        let ui = std::thread::spawn(move || event_loop.run_blocking());
        let ui_thread = ui.thread().id();
        let executor = UiThreadExecutor::for_thread(ui_thread, Arc::new(dispatcher));
        let keys = Arc::new(RecordingKeys::default());

        let prompt = Prompt::new(PromptContext {
            executor: executor.clone(),
            registry: PromptRegistry::new(),
            clock: fixed_clock(1.0),
            parent: Frame::new("prompt"),
            key_target: keys.clone(),
            wait_defaults: WaitOptions::default(),
        });

        assert!(matches!(
            prompt.bind_root_key(|_| {}),
            Err(GuiError::MissingReturnType)
        ));
        prompt.set_return_type::<bool>().unwrap();
        let binding = prompt.bind_root_key(|_| {}).unwrap();

        assert_eq!(prompt.key_bindings().unwrap(), vec![binding]);
        assert_eq!(*keys.bound_on.lock().unwrap(), vec![ui_thread]);

        executor.quit().unwrap();
        ui.join().unwrap();
    }
}
