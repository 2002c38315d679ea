// Slint backend - Drive prompts from the Slint event loop
//
// Jobs are queued with `slint::invoke_from_event_loop`, so they run on the thread that
// calls `slint::run_event_loop_until_quit`. Widget state stays in the headless widget
// set; the Slint window is the visible surface the loop keeps open.

use crate::error::GuiError;
use crate::models::GuiConfig;
use crate::ui::event_loop::{Dispatcher, LoopDriver, UiJob};
use crate::ui::gui::Backend;
use crate::ui::headless::RootWindow;
use slint::ComponentHandle;
use std::sync::Arc;

slint::slint! {
    export component PromptWindow inherits Window {
        in property <string> heading;
        in property <length> floor-width;
        in property <length> floor-height;
        title: heading;
        min-width: floor-width;
        min-height: floor-height;
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SlintDispatcher;

impl Dispatcher for SlintDispatcher {
    fn dispatch(&self, job: UiJob) -> Result<(), GuiError> {
        slint::invoke_from_event_loop(job).map_err(|_| GuiError::EventLoopClosed)
    }

    fn quit(&self) -> Result<(), GuiError> {
        slint::invoke_from_event_loop(|| {
            if let Err(e) = slint::quit_event_loop() {
                tracing::warn!("Slint event loop did not accept quit: {}", e);
            }
        })
        .map_err(|_| GuiError::EventLoopClosed)
    }
}

/// Shows the prompt window and blocks in Slint's event loop until [`SlintDispatcher::quit`]
/// or until the window is closed
#[derive(Debug)]
pub struct SlintLoop {
    title: String,
    min_size: (u32, u32),
}

impl LoopDriver for SlintLoop {
    fn run(self: Box<Self>) -> Result<(), GuiError> {
        let window = PromptWindow::new().map_err(|e| GuiError::Backend(e.to_string()))?;
        window.set_heading(self.title.as_str().into());
        window.set_floor_width(self.min_size.0 as f32);
        window.set_floor_height(self.min_size.1 as f32);

        window.window().on_close_requested(|| {
            tracing::info!("Prompt window closed; stopping event loop");
            if let Err(e) = slint::quit_event_loop() {
                tracing::warn!("Slint event loop did not accept quit: {}", e);
            }
            slint::CloseRequestResponse::HideWindow
        });

        window.show().map_err(|e| GuiError::Backend(e.to_string()))?;
        let outcome =
            slint::run_event_loop_until_quit().map_err(|e| GuiError::Backend(e.to_string()));
        if let Err(e) = window.hide() {
            tracing::debug!("Prompt window hide failed: {}", e);
        }
        outcome
    }
}

/// Backend pairing the Slint event loop with a root window's widget tree.
///
/// Selects the Slint platform up front so jobs dispatched before [`Gui::run`] are queued
/// instead of failing for want of an event loop. Call from the thread that will run it.
///
/// # Errors
/// [`GuiError::Backend`] if no Slint platform can be initialised, e.g. without a display
///
/// [`Gui::run`]: crate::ui::Gui::run
pub fn backend(config: &GuiConfig) -> Result<Backend, GuiError> {
    slint::BackendSelector::new()
        .select()
        .map_err(|e| GuiError::Backend(e.to_string()))?;
    tracing::debug!("Slint platform initialised");

    let min_size = (config.window.min_width, config.window.min_height);
    let window = RootWindow::new(config.window.title.clone(), min_size);
    Ok(Backend {
        dispatcher: Arc::new(SlintDispatcher),
        driver: Box::new(SlintLoop {
            title: config.window.title.clone(),
            min_size,
        }),
        root_region: window.root_region(),
        key_target: window.clone(),
        root_window: Some(window),
    })
}
