//! Shared helpers for driving a headless GUI from integration tests

#![allow(dead_code)]

use quickprompt::models::{ClockKind, GuiConfig};
use quickprompt::ui::headless::Frame;
use quickprompt::ui::widget::{Region, RegionHandle};
use quickprompt::{Gui, GuiHandle};
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;

pub fn test_config() -> GuiConfig {
    let mut config = GuiConfig::default();
    config.clock = ClockKind::Monotonic;
    config.window.title = "test".to_string();
    config
}

/// Run `body` as the GUI's worker with the test thread as the UI thread.
///
/// The GUI is closed when `body` finishes; a panic in `body` fails the test.
pub fn run_gui<F, T>(config: GuiConfig, body: F) -> T
where
    F: FnOnce(GuiHandle) -> T + Send + 'static,
    T: Send + 'static,
{
    let gui = Gui::new(&config);
    let (tx, rx) = mpsc::channel();

    gui.run(move |handle| {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| body(handle.clone())));
        let _ = handle.close();
        let _ = tx.send(outcome);
    })
    .unwrap();

    match rx.recv().unwrap() {
        Ok(value) => value,
        Err(payload) => panic::resume_unwind(payload),
    }
}

/// A fresh frame under the root, so each prompt gets its own parent region
pub fn child_region(gui: &GuiHandle, name: &'static str) -> RegionHandle {
    let root = gui.root();
    gui.run_on_ui_thread(move || {
        let frame = Frame::new(name);
        root.add_child(frame.clone());
        let region: RegionHandle = frame;
        region
    })
    .unwrap()
}
