//! Integration tests for prompts and the prompt registry
//!
//! These tests verify:
//! - Keypress and click submissions reaching a waiting worker
//! - Gating while disabled and enable-on-wait
//! - Timeouts and late answers
//! - Destroy while a worker is waiting
//! - Bulk teardown racing a concurrent destroy

mod common;

use quickprompt::models::{Value, ValueKind};
use quickprompt::ui::presets::{ButtonRow, n_button_row};
use quickprompt::ui::widget::Widget;
use quickprompt::ui::{Prompt, WaitOptions};
use quickprompt::{GuiError, GuiHandle};
use std::sync::atomic::Ordering;
use std::thread;
use std::time::{Duration, Instant};

const LONG_WAIT: Option<Duration> = Some(Duration::from_secs(5));
const SHORT_WAIT: Option<Duration> = Some(Duration::from_millis(50));

fn ab_prompt(gui: &GuiHandle) -> Prompt {
    let row = ButtonRow::new("Press a button:")
        .button("A", "A")
        .button("B", "B")
        .key('a', "A")
        .key('b', "B");
    gui.add_root_prompt(n_button_row(row)).unwrap()
}

fn press(gui: &GuiHandle, key: char) {
    let window = gui.root_window().unwrap();
    gui.post(move || {
        window.key_press(key);
    })
    .unwrap();
}

/// Wait until every job queued before this call has run
fn flush(gui: &GuiHandle) {
    gui.run_on_ui_thread(|| ()).unwrap();
}

#[test]
fn test_keypress_answers_waiting_worker() {
    let (response, presented) = common::run_gui(common::test_config(), |gui| {
        let prompt = ab_prompt(&gui);
        press(&gui, 'b');
        let response = prompt.wait_for_response(LONG_WAIT).unwrap();
        (response, prompt.presentation_timestamp().unwrap())
    });

    let response = response.expect("a response");
    assert_eq!(response.value, Value::from("B"));
    assert!(response.timestamp >= presented.unwrap());
}

#[test]
fn test_click_answers_waiting_worker() {
    let response = common::run_gui(common::test_config(), |gui| {
        let prompt = ab_prompt(&gui);
        let widgets = prompt.interactive_widgets().unwrap();
        assert_eq!(widgets.len(), 2);

        let first = widgets[0].clone();
        gui.post(move || {
            first.invoke();
        })
        .unwrap();
        prompt.wait_for_response(LONG_WAIT).unwrap()
    });

    assert_eq!(response.unwrap().value, Value::from("A"));
}

#[test]
fn test_response_disables_prompt_by_default() {
    let enabled = common::run_gui(common::test_config(), |gui| {
        let prompt = ab_prompt(&gui);
        press(&gui, 'a');
        prompt.wait_for_response(LONG_WAIT).unwrap().unwrap();
        prompt.is_enabled().unwrap()
    });

    assert!(!enabled);
}

#[test]
fn test_disabled_prompt_ignores_input() {
    let (response, gated) = common::run_gui(common::test_config(), |gui| {
        let prompt = ab_prompt(&gui);
        prompt.disable().unwrap();

        press(&gui, 'a');
        let response = prompt
            .wait_for_response_with(WaitOptions::untoggled().with_timeout(SHORT_WAIT))
            .unwrap();
        flush(&gui);

        (
            response,
            gui.metrics().submissions_gated.load(Ordering::Relaxed),
        )
    });

    assert!(response.is_none());
    assert_eq!(gated, 1);
}

/// Press `key` from another thread once the prompt reports enabled
fn press_when_enabled(gui: &GuiHandle, prompt: &Prompt, key: char) -> thread::JoinHandle<()> {
    let presser = gui.clone();
    let watched = prompt.clone();
    thread::spawn(move || {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !watched.is_enabled().unwrap() {
            assert!(Instant::now() < deadline, "prompt never enabled");
            thread::sleep(Duration::from_millis(2));
        }
        press(&presser, key);
    })
}

#[test]
fn test_enable_on_wait_accepts_input() {
    let response = common::run_gui(common::test_config(), |gui| {
        let prompt = ab_prompt(&gui);
        prompt.disable().unwrap();

        let input = press_when_enabled(&gui, &prompt, 'b');
        let response = prompt.wait_for_response(LONG_WAIT).unwrap();
        input.join().unwrap();
        response
    });

    assert_eq!(response.unwrap().value, Value::from("B"));
}

#[test]
fn test_repeated_default_waits_each_get_an_answer() {
    let values = common::run_gui(common::test_config(), |gui| {
        let prompt = ab_prompt(&gui);
        let mut values = Vec::new();
        for key in ['a', 'b', 'a'] {
            let input = press_when_enabled(&gui, &prompt, key);
            let response = prompt.wait_for_response(LONG_WAIT).unwrap();
            input.join().unwrap();
            values.push(response.map(|r| r.value));
            assert!(!prompt.is_enabled().unwrap());
        }
        values
    });

    assert_eq!(
        values,
        vec![
            Some(Value::from("A")),
            Some(Value::from("B")),
            Some(Value::from("A"))
        ]
    );
}

#[test]
fn test_wait_without_enable_stays_gated_after_first_answer() {
    let (first, second) = common::run_gui(common::test_config(), |gui| {
        let prompt = ab_prompt(&gui);
        let options = WaitOptions::default().with_enable_on_wait(false);

        press(&gui, 'a');
        let first = prompt
            .wait_for_response_with(options.with_timeout(LONG_WAIT))
            .unwrap();

        press(&gui, 'b');
        let second = prompt
            .wait_for_response_with(options.with_timeout(SHORT_WAIT))
            .unwrap();
        flush(&gui);
        (first, second)
    });

    assert_eq!(first.unwrap().value, Value::from("A"));
    assert!(second.is_none());
}

#[test]
fn test_late_answer_is_kept_for_next_wait() {
    let (first, second, third) = common::run_gui(common::test_config(), |gui| {
        let prompt = ab_prompt(&gui);

        let first = prompt.wait_for_response(SHORT_WAIT).unwrap();
        assert!(prompt.submit("A").unwrap());
        let second = prompt.wait_for_response(SHORT_WAIT).unwrap();
        // The ready signal was consumed by the second wait
        let third = prompt.wait_for_response(SHORT_WAIT).unwrap();
        (first, second, third)
    });

    assert!(first.is_none());
    assert_eq!(second.unwrap().value, Value::from("A"));
    assert!(third.is_none());
}

#[test]
fn test_reset_between_trials() {
    let values = common::run_gui(common::test_config(), |gui| {
        let prompt = ab_prompt(&gui);
        let mut values = Vec::new();
        for key in ['a', 'b'] {
            prompt.reset().unwrap();
            prompt.enable().unwrap();
            press(&gui, key);
            values.push(prompt.wait_for_response(LONG_WAIT).unwrap().unwrap().value);
        }
        prompt.reset().unwrap();
        values.push(prompt.current_response().unwrap().unwrap().value);
        values
    });

    assert_eq!(
        values,
        vec![Value::from("A"), Value::from("B"), ValueKind::Str.zero()]
    );
}

#[test]
fn test_wrong_type_submission_is_rejected() {
    let err = common::run_gui(common::test_config(), |gui| {
        let prompt = ab_prompt(&gui);
        prompt.submit(1).unwrap_err()
    });

    assert!(matches!(
        err,
        GuiError::ValueTypeMismatch {
            expected: ValueKind::Str,
            found: ValueKind::Int
        }
    ));
}

#[test]
fn test_destroy_releases_waiting_worker() {
    let (waited, removed, present) = common::run_gui(common::test_config(), |gui| {
        let prompt = ab_prompt(&gui);

        let waiting = prompt.clone();
        let waiter = thread::spawn(move || waiting.wait_for_response(None));
        thread::sleep(Duration::from_millis(50));

        let removed = gui.remove_prompt(&prompt).unwrap();
        let waited = waiter.join().unwrap();
        (waited, removed, gui.prompts().contains(&prompt))
    });

    assert!(removed);
    assert!(!present);
    assert!(matches!(waited, Err(GuiError::PromptDestroyed(_))));
}

#[test]
fn test_destroyed_prompt_rejects_everything() {
    let results = common::run_gui(common::test_config(), |gui| {
        let prompt = ab_prompt(&gui);
        prompt.destroy().unwrap();

        vec![
            prompt.submit("A").map(|_| ()),
            prompt.enable(),
            prompt.disable(),
            prompt.reset(),
            prompt.destroy(),
            prompt.wait_for_response(SHORT_WAIT).map(|_| ()),
            prompt.set_return_type::<bool>(),
        ]
        .into_iter()
        .map(|r| r.unwrap_err().is_destroyed())
        .collect::<Vec<_>>()
    });

    assert!(results.iter().all(|destroyed| *destroyed));
}

#[test]
fn test_destroy_unbinds_keys_and_clears_widgets() {
    let (bindings, children) = common::run_gui(common::test_config(), |gui| {
        let prompt = ab_prompt(&gui);
        let window = gui.root_window().unwrap();
        assert_eq!(window.binding_count(), 1);

        prompt.destroy().unwrap();
        (window.binding_count(), window.frame().children().len())
    });

    assert_eq!(bindings, 0);
    assert_eq!(children, 0);
}

#[test]
fn test_clear_prompts_survives_concurrent_destroy() {
    let (remaining, all_gone, live) = common::run_gui(common::test_config(), |gui| {
        let prompts: Vec<Prompt> = ["p1", "p2", "p3", "p4", "p5"]
            .into_iter()
            .map(|name| {
                let region = common::child_region(&gui, name);
                gui.add_prompt(
                    |prompt, _parent| prompt.set_return_type::<bool>(),
                    region,
                )
                .unwrap()
            })
            .collect();
        assert_eq!(gui.prompts().len(), 5);

        let racer = prompts[2].clone();
        let racing = thread::spawn(move || racer.destroy());

        gui.clear_prompts().unwrap();
        // Either side may win; the loser sees an already destroyed prompt
        let _ = racing.join().unwrap();

        (
            gui.prompts().len(),
            prompts.iter().all(|p| !p.exists()),
            gui.metrics().live_prompts(),
        )
    });

    assert_eq!(remaining, 0);
    assert!(all_gone);
    assert_eq!(live, 0);
}

#[test]
fn test_close_destroys_prompts() {
    let prompt = common::run_gui(common::test_config(), |gui| ab_prompt(&gui));

    // run_gui closed the GUI after the body returned
    assert!(!prompt.exists());
}
