//! quickprompt - Reaction-time demo
//!
//! # Overview
//!
//! Lays out a three-button row, then asks for five answers from a worker thread and
//! reports each one with its reaction time. Input is scripted from a separate input
//! thread that presses keys on the headless root window, so the demo runs anywhere.
//! Built with the `slint-backend` feature, the same flow runs inside a Slint window.
//!
//! Threads:
//! - **Main thread**: builds the GUI and runs its event loop (the UI thread)
//! - **Worker**: the application logic; blocks on prompt responses
//! - **Input**: posts keypresses onto the UI thread at a fixed interval
//!
//! # Configuration
//!
//! Read from `quickprompt Data/quickprompt.yaml` when present, with environment
//! overrides such as `QUICKPROMPT__CLOCK=monotonic`.

use anyhow::Result;
use quickprompt::models::Response;
use quickprompt::ui::presets::{ButtonRow, n_button_row};
use quickprompt::{APP_NAME, ConfigManager, Gui, GuiHandle, VERSION};
use std::thread;
use std::time::Duration;

const CONFIG_DIR: &str = "quickprompt Data";
const TRIALS: usize = 5;
const SCRIPTED_KEYS: [char; TRIALS] = ['a', 'b', 'c', 'b', 'a'];
const KEY_INTERVAL: Duration = Duration::from_millis(300);

fn main() -> Result<()> {
    let config_manager = ConfigManager::new(CONFIG_DIR)?;
    let config = config_manager.load_layered()?;

    let _log_guard = quickprompt::logging::setup_logging(&config.logging)?;
    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    #[cfg(feature = "slint-backend")]
    let gui = Gui::with_backend(&config, quickprompt::ui::slint_backend::backend(&config)?);
    #[cfg(not(feature = "slint-backend"))]
    let gui = Gui::new(&config);
    gui.run(worker_main)?;

    tracing::info!("Application shutdown complete");
    Ok(())
}

fn worker_main(gui: GuiHandle) {
    if let Err(e) = run_trials(&gui) {
        tracing::error!("Demo failed: {}", e);
    }
    if let Err(e) = gui.close() {
        tracing::error!("Failed to close GUI: {}", e);
    }
}

fn run_trials(gui: &GuiHandle) -> quickprompt::Result<()> {
    let row = ButtonRow::new("Press a button:")
        .button("A", "A")
        .button("B", "B")
        .button("C", "C")
        .key('a', "A")
        .key('b', "B")
        .key('c', "C");
    let prompt = gui.add_root_prompt(n_button_row(row))?;

    spawn_input(gui.clone());

    let mut results: Vec<(Response, f64)> = Vec::with_capacity(TRIALS);
    for trial in 1..=TRIALS {
        prompt.reset()?;
        let shown = gui.clock().now();
        prompt.enable()?;

        match prompt.wait_for_response(Some(Duration::from_secs(5)))? {
            Some(response) => {
                let reaction = response.timestamp - shown;
                tracing::info!("Trial {}: {} after {:.3}s", trial, response.value, reaction);
                results.push((response, reaction));
            }
            None => tracing::warn!("Trial {}: no response", trial),
        }
    }

    // Reporting touches no widgets, but runs on the UI thread like any UI-side summary would
    gui.run_on_ui_thread_with(
        |results: Vec<(Response, f64)>| {
            for (i, (response, reaction)) in results.iter().enumerate() {
                println!("{}: {} ({:.3}s)", i + 1, response.value, reaction);
            }
        },
        &results,
    )?;

    Ok(())
}

fn spawn_input(gui: GuiHandle) {
    let Some(window) = gui.root_window() else {
        tracing::warn!("No headless root window; scripted input disabled");
        return;
    };

    let spawned = thread::Builder::new()
        .name("quickprompt-input".to_string())
        .spawn(move || {
            for key in SCRIPTED_KEYS {
                thread::sleep(KEY_INTERVAL);
                let window = window.clone();
                if gui.post(move || {
                    window.key_press(key);
                })
                .is_err()
                {
                    break;
                }
            }
        });

    if let Err(e) = spawned {
        tracing::error!("Failed to start input thread: {}", e);
    }
}
