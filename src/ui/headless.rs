// Headless widget set
//
// A minimal in-memory toolkit implementing the widget seams. It keeps real enable/disable
// and destroy semantics so prompts behave exactly as they would against a windowing
// toolkit, and offers `invoke()` / `key_press()` to drive input from the UI thread.

use crate::models::Value;
use crate::ui::widget::{
    KeyBindingId, KeyCallback, KeyEvent, KeyTarget, Region, RegionHandle, Widget, WidgetError,
    WidgetHandle, WidgetId,
};
use indexmap::IndexMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type ClickCallback = Arc<dyn Fn() + Send + Sync>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A push button carrying the value it answers with
pub struct Button {
    id: WidgetId,
    label: String,
    value: Value,
    enabled: AtomicBool,
    destroyed: AtomicBool,
    on_click: Mutex<Option<ClickCallback>>,
}

impl Button {
    pub fn new(label: impl Into<String>, value: Value) -> Arc<Self> {
        Arc::new(Self {
            id: WidgetId::next(),
            label: label.into(),
            value,
            enabled: AtomicBool::new(true),
            destroyed: AtomicBool::new(false),
            on_click: Mutex::new(None),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn set_on_click<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *lock(&self.on_click) = Some(Arc::new(callback));
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }

    /// Simulate a click. Disabled or destroyed buttons ignore it.
    pub fn click(&self) -> bool {
        if !self.is_enabled() || self.is_destroyed() {
            return false;
        }
        // Clone out of the lock so the callback may touch this button again
        let callback = lock(&self.on_click).clone();
        match callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }
}

impl Widget for Button {
    fn widget_id(&self) -> WidgetId {
        self.id
    }

    fn kind(&self) -> &'static str {
        "button"
    }

    fn set_enabled(&self, enabled: bool) -> Result<(), WidgetError> {
        if self.is_destroyed() {
            return Err(WidgetError::Destroyed(self.id));
        }
        self.enabled.store(enabled, Ordering::SeqCst);
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        !self.is_destroyed() && self.enabled.load(Ordering::SeqCst)
    }

    fn destroy(&self) {
        self.destroyed.store(true, Ordering::SeqCst);
        lock(&self.on_click).take();
    }

    fn invoke(&self) -> bool {
        self.click()
    }
}

/// Static text
pub struct Label {
    id: WidgetId,
    text: Mutex<String>,
    destroyed: AtomicBool,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            id: WidgetId::next(),
            text: Mutex::new(text.into()),
            destroyed: AtomicBool::new(false),
        })
    }

    pub fn text(&self) -> String {
        lock(&self.text).clone()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        *lock(&self.text) = text.into();
    }
}

impl Widget for Label {
    fn widget_id(&self) -> WidgetId {
        self.id
    }

    fn kind(&self) -> &'static str {
        "label"
    }

    fn set_enabled(&self, _enabled: bool) -> Result<(), WidgetError> {
        Err(WidgetError::Unsupported { kind: self.kind() })
    }

    fn is_enabled(&self) -> bool {
        !self.destroyed.load(Ordering::SeqCst)
    }

    fn destroy(&self) {
        self.destroyed.store(true, Ordering::SeqCst);
    }
}

/// A container of widgets
pub struct Frame {
    id: WidgetId,
    name: String,
    children: Mutex<Vec<WidgetHandle>>,
    destroyed: AtomicBool,
}

impl Frame {
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            id: WidgetId::next(),
            name: name.into(),
            children: Mutex::new(Vec::new()),
            destroyed: AtomicBool::new(false),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> Vec<WidgetHandle> {
        lock(&self.children).clone()
    }
}

impl Widget for Frame {
    fn widget_id(&self) -> WidgetId {
        self.id
    }

    fn kind(&self) -> &'static str {
        "frame"
    }

    fn set_enabled(&self, _enabled: bool) -> Result<(), WidgetError> {
        Err(WidgetError::Unsupported { kind: self.kind() })
    }

    fn is_enabled(&self) -> bool {
        !self.destroyed.load(Ordering::SeqCst)
    }

    fn destroy(&self) {
        self.destroyed.store(true, Ordering::SeqCst);
        self.clear_children();
    }
}

impl Region for Frame {
    fn add_child(&self, child: WidgetHandle) {
        lock(&self.children).push(child);
    }

    fn clear_children(&self) -> usize {
        let children = std::mem::take(&mut *lock(&self.children));
        for child in &children {
            child.destroy();
        }
        children.len()
    }

    fn child_count(&self) -> usize {
        lock(&self.children).len()
    }
}

/// The top-level window: a root frame plus the window-wide key handler
pub struct RootWindow {
    title: String,
    min_size: (u32, u32),
    frame: Arc<Frame>,
    bindings: Mutex<IndexMap<KeyBindingId, KeyCallback>>,
    next_binding: AtomicU64,
}

impl RootWindow {
    pub fn new(title: impl Into<String>, min_size: (u32, u32)) -> Arc<Self> {
        Arc::new(Self {
            title: title.into(),
            min_size,
            frame: Frame::new("root"),
            bindings: Mutex::new(IndexMap::new()),
            next_binding: AtomicU64::new(1),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn min_size(&self) -> (u32, u32) {
        self.min_size
    }

    pub fn frame(&self) -> &Arc<Frame> {
        &self.frame
    }

    pub fn root_region(&self) -> RegionHandle {
        self.frame.clone()
    }

    pub fn binding_count(&self) -> usize {
        lock(&self.bindings).len()
    }

    /// Deliver a keypress to every binding, in registration order.
    ///
    /// # Returns
    /// The number of callbacks invoked
    pub fn key_press(&self, ch: char) -> usize {
        let callbacks: Vec<KeyCallback> = lock(&self.bindings).values().cloned().collect();
        let event = KeyEvent { ch };
        for callback in &callbacks {
            callback(&event);
        }
        callbacks.len()
    }
}

impl KeyTarget for RootWindow {
    fn bind(&self, callback: KeyCallback) -> KeyBindingId {
        let id = KeyBindingId(self.next_binding.fetch_add(1, Ordering::Relaxed));
        lock(&self.bindings).insert(id, callback);
        id
    }

    fn unbind(&self, id: KeyBindingId) -> bool {
        lock(&self.bindings).shift_remove(&id).is_some()
    }
}
