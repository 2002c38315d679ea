// Gui - Owns the UI thread and hands workers a handle to it
//
// Threading model:
// - The thread that builds the `Gui` is the UI thread and runs the event loop in `run()`
// - `run()` starts the application's main function on a worker thread with a `GuiHandle`
// - The worker creates prompts, waits for responses, and marshals any other widget work
//   through the handle
// - `GuiHandle::close()` tears down every prompt and stops the loop

use crate::clock::{self, SharedClock};
use crate::error::{GuiError, Result};
use crate::metrics::Metrics;
use crate::models::GuiConfig;
use crate::ui::event_loop::{Dispatcher, EventLoop, LoopDriver};
use crate::ui::executor::{UiThreadExecutor, panic_message};
use crate::ui::headless::RootWindow;
use crate::ui::prompt::{Prompt, PromptContext, WaitOptions};
use crate::ui::registry::PromptRegistry;
use crate::ui::widget::{KeyTargetHandle, RegionHandle};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::thread;

const WORKER_THREAD_NAME: &str = "quickprompt-worker";

/// The toolkit pieces a GUI runs on
pub struct Backend {
    pub dispatcher: Arc<dyn Dispatcher>,
    pub driver: Box<dyn LoopDriver>,
    pub root_region: RegionHandle,
    pub key_target: KeyTargetHandle,
    pub root_window: Option<Arc<RootWindow>>,
}

impl Backend {
    /// The portable event loop driving a headless root window
    pub fn headless(config: &GuiConfig) -> Self {
        let window = RootWindow::new(
            config.window.title.clone(),
            (config.window.min_width, config.window.min_height),
        );
        let (event_loop, dispatcher) = EventLoop::new();
        Self {
            dispatcher: Arc::new(dispatcher),
            driver: Box::new(event_loop),
            root_region: window.root_region(),
            key_target: window.clone(),
            root_window: Some(window),
        }
    }
}

struct GuiShared {
    executor: UiThreadExecutor,
    registry: PromptRegistry,
    clock: SharedClock,
    root_region: RegionHandle,
    key_target: KeyTargetHandle,
    root_window: Option<Arc<RootWindow>>,
    wait_defaults: WaitOptions,
}

pub struct Gui {
    handle: GuiHandle,
    driver: Box<dyn LoopDriver>,
}

impl Gui {
    /// Build a headless GUI whose UI thread is the current thread
    pub fn new(config: &GuiConfig) -> Self {
        Self::with_backend(config, Backend::headless(config))
    }

    pub fn with_backend(config: &GuiConfig, backend: Backend) -> Self {
        let executor = UiThreadExecutor::new(backend.dispatcher)
            .with_default_timeout(config.executor.run_timeout())
            .with_metrics(Arc::new(Metrics::new()));

        tracing::info!(
            "GUI '{}' created ({}x{}, {:?} clock)",
            config.window.title,
            config.window.min_width,
            config.window.min_height,
            config.clock
        );

        Self {
            handle: GuiHandle {
                inner: Arc::new(GuiShared {
                    executor,
                    registry: PromptRegistry::new(),
                    clock: clock::from_kind(config.clock),
                    root_region: backend.root_region,
                    key_target: backend.key_target,
                    root_window: backend.root_window,
                    wait_defaults: WaitOptions::from_config(&config.prompts),
                }),
            },
            driver: backend.driver,
        }
    }

    pub fn handle(&self) -> GuiHandle {
        self.handle.clone()
    }

    pub fn root_window(&self) -> Option<Arc<RootWindow>> {
        self.handle.root_window()
    }

    /// Start `main` on a worker thread and run the event loop until the GUI is closed.
    ///
    /// A panic in `main` is logged and closes the GUI. A `main` that returns normally
    /// leaves the window open until something calls [`GuiHandle::close`].
    ///
    /// # Errors
    /// - [`GuiError::NotOnUiThread`] if called from a thread other than the one that built the GUI
    /// - [`GuiError::WorkerSpawn`] if the worker thread could not be started
    pub fn run<F>(self, main: F) -> Result<()>
    where
        F: FnOnce(GuiHandle) + Send + 'static,
    {
        if !self.handle.executor().is_ui_thread() {
            return Err(GuiError::NotOnUiThread);
        }

        let worker_handle = self.handle.clone();
        let worker = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || {
                let closer = worker_handle.clone();
                if catch_unwind(AssertUnwindSafe(|| main(worker_handle))).is_err() {
                    tracing::error!("Worker main panicked; closing GUI");
                    if let Err(e) = closer.close() {
                        tracing::error!("Failed to close GUI after worker panic: {}", e);
                    }
                }
            })
            .map_err(GuiError::WorkerSpawn)?;

        tracing::info!("Worker started, entering event loop");
        let outcome = self.driver.run();

        self.handle.metrics().log_summary();
        if worker.is_finished() {
            if worker.join().is_err() {
                tracing::warn!("Worker thread terminated abnormally");
            }
        } else {
            tracing::debug!("Worker still running after the event loop stopped; detaching");
        }

        outcome
    }
}

/// Cloneable access to the GUI for worker threads
#[derive(Clone)]
pub struct GuiHandle {
    inner: Arc<GuiShared>,
}

impl GuiHandle {
    pub fn executor(&self) -> &UiThreadExecutor {
        &self.inner.executor
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        self.inner.executor.metrics()
    }

    pub fn clock(&self) -> &SharedClock {
        &self.inner.clock
    }

    /// The top-level region prompts are usually laid out in
    pub fn root(&self) -> RegionHandle {
        self.inner.root_region.clone()
    }

    pub fn key_target(&self) -> KeyTargetHandle {
        self.inner.key_target.clone()
    }

    pub fn root_window(&self) -> Option<Arc<RootWindow>> {
        self.inner.root_window.clone()
    }

    pub fn prompts(&self) -> &PromptRegistry {
        &self.inner.registry
    }

    pub fn run_on_ui_thread<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        self.inner.executor.run(f)
    }

    pub fn run_on_ui_thread_with<A, F, R>(&self, f: F, args: &A) -> Result<R>
    where
        A: Clone + Send + 'static,
        F: FnOnce(A) -> R + Send + 'static,
        R: Send + 'static,
    {
        self.inner.executor.run_with(f, args)
    }

    pub fn try_run_on_ui_thread<F, T, E>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> std::result::Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        self.inner.executor.try_run(f)
    }

    pub fn post<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.inner.executor.post(f)
    }

    /// Create a prompt in `parent` and run `setup` on the UI thread to populate it.
    ///
    /// `setup` must fix the return type before it tracks widgets. The prompt is registered
    /// before `setup` runs, so a failing `setup` leaves nothing behind: the prompt is
    /// destroyed and the error returned.
    ///
    /// # Example
    /// ```ignore
    /// let prompt = gui.add_prompt(
    ///     |prompt, parent| {
    ///         prompt.set_return_type::<bool>()?;
    ///         let yes = Button::new("Yes", Value::from(true));
    ///         parent.add_child(yes.clone());
    ///         prompt.track_interactive_widget(yes)
    ///     },
    ///     gui.root(),
    /// )?;
    /// ```
    pub fn add_prompt<F>(&self, setup: F, parent: RegionHandle) -> Result<Prompt>
    where
        F: FnOnce(&Prompt, &RegionHandle) -> Result<()> + Send + 'static,
    {
        let shared = self.inner.clone();
        self.inner.executor.run(move || {
            let prompt = Prompt::new(PromptContext {
                executor: shared.executor.clone(),
                registry: shared.registry.clone(),
                clock: shared.clock.clone(),
                parent: parent.clone(),
                key_target: shared.key_target.clone(),
                wait_defaults: shared.wait_defaults,
            });
            shared.registry.add(&prompt);
            shared.executor.metrics().record_prompt_created();

            // A panicking setup is torn down like a failing one
            let outcome = catch_unwind(AssertUnwindSafe(|| setup(&prompt, &parent)))
                .unwrap_or_else(|payload| Err(GuiError::Panicked(panic_message(payload.as_ref()))))
                .and_then(|()| match prompt.return_kind()? {
                    Some(_) => prompt.mark_presented().map(|_| ()),
                    None => Err(GuiError::MissingReturnType),
                });

            match outcome {
                Ok(()) => {
                    tracing::debug!("Prompt {} presented", prompt.id());
                    Ok(prompt)
                }
                Err(e) => {
                    tracing::warn!("Prompt {} setup failed: {}", prompt.id(), e);
                    if let Err(teardown) = prompt.destroy() {
                        tracing::debug!("Prompt {} teardown: {}", prompt.id(), teardown);
                    }
                    Err(e)
                }
            }
        })?
    }

    /// [`add_prompt`](Self::add_prompt) in the root region
    pub fn add_root_prompt<F>(&self, setup: F) -> Result<Prompt>
    where
        F: FnOnce(&Prompt, &RegionHandle) -> Result<()> + Send + 'static,
    {
        self.add_prompt(setup, self.root())
    }

    /// # Returns
    /// `false` if the prompt was already destroyed
    pub fn remove_prompt(&self, prompt: &Prompt) -> Result<bool> {
        self.inner.registry.remove(prompt)
    }

    pub fn clear_prompts(&self) -> Result<usize> {
        self.inner.registry.clear_all()
    }

    /// Destroy every prompt, then stop the event loop
    pub fn close(&self) -> Result<()> {
        let cleared = self.clear_prompts();
        let quit = self.inner.executor.quit();
        match cleared {
            Ok(count) => {
                tracing::info!("GUI closing, {} prompts destroyed", count);
                quit
            }
            Err(e) => {
                tracing::error!("GUI closing with prompt teardown failure: {}", e);
                Err(e)
            }
        }
    }
}
