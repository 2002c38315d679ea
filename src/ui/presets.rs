// Ready-made prompt layouts

use crate::error::{GuiError, Result};
use crate::models::{Value, ValueKind};
use crate::ui::headless::{Button, Frame, Label};
use crate::ui::prompt::{Prompt, WeakPrompt};
use crate::ui::widget::{KeyEvent, Region, RegionHandle};
use indexmap::IndexMap;

/// A labelled row of buttons, each answering with its own value
///
/// # Example
/// ```ignore
/// let row = ButtonRow::new("Press a button:")
///     .button("A", "A")
///     .button("B", "B")
///     .key('a', "A")
///     .key('b', "B");
/// let prompt = gui.add_root_prompt(presets::n_button_row(row))?;
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ButtonRow {
    pub prompt: String,
    pub buttons: IndexMap<String, Value>,
    pub keybindings: IndexMap<char, String>,
}

impl ButtonRow {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    /// Add a button; a repeated name replaces the earlier value in place
    pub fn button(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.buttons.insert(name.into(), value.into());
        self
    }

    /// Map a key to the button named `button`
    pub fn key(mut self, ch: char, button: impl Into<String>) -> Self {
        self.keybindings.insert(ch, button.into());
        self
    }

    /// Check the row and return the kind every button answers with.
    ///
    /// # Errors
    /// [`GuiError::InvalidLayout`] when the row has no buttons, a key names an undefined
    /// button, or the button values are of mixed kinds
    pub fn validate(&self) -> Result<ValueKind> {
        let missing: Vec<&str> = self
            .keybindings
            .values()
            .filter(|name| !self.buttons.contains_key(*name))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(GuiError::InvalidLayout(format!(
                "key bindings reference undefined buttons: {}",
                missing.join(", ")
            )));
        }

        let mut kinds = self.buttons.values().map(Value::kind);
        let kind = kinds
            .next()
            .ok_or_else(|| GuiError::InvalidLayout("a button row needs at least one button".to_string()))?;
        if let Some(other) = kinds.find(|k| *k != kind) {
            return Err(GuiError::InvalidLayout(format!(
                "button values must share one type, got {} and {}",
                kind, other
            )));
        }
        Ok(kind)
    }

    fn value_for_key(&self, ch: char) -> Option<Value> {
        self.keybindings
            .get(&ch)
            .and_then(|name| self.buttons.get(name))
            .cloned()
    }
}

fn submit_from_event(prompt: &WeakPrompt, value: Value, source: &str) {
    let Some(prompt) = prompt.upgrade() else {
        return;
    };
    match prompt.submit(value) {
        Ok(true) => tracing::debug!("Prompt {}: {} submitted", prompt.id(), source),
        Ok(false) => {}
        Err(e) => tracing::warn!("Prompt {}: {} submission failed: {}", prompt.id(), source, e),
    }
}

/// Setup function laying out `row` in the prompt's parent region.
///
/// Builds an outer frame holding an optional label and a frame of buttons. Clicking a
/// button submits its value; when the row has key bindings one window-level handler maps
/// each bound key to its button's value.
pub fn n_button_row(
    row: ButtonRow,
) -> impl FnOnce(&Prompt, &RegionHandle) -> Result<()> + Send + 'static {
    move |prompt: &Prompt, parent: &RegionHandle| {
        let kind = row.validate()?;
        prompt.set_return_kind(kind)?;

        let outer = Frame::new("outer");
        parent.add_child(outer.clone());

        if !row.prompt.is_empty() {
            outer.add_child(Label::new(row.prompt.clone()));
        }

        let button_frame = Frame::new("buttons");
        outer.add_child(button_frame.clone());

        for (name, value) in &row.buttons {
            let button = Button::new(name.clone(), value.clone());
            let weak = prompt.downgrade();
            let clicked = value.clone();
            button.set_on_click(move || submit_from_event(&weak, clicked.clone(), "click"));
            button_frame.add_child(button.clone());
            prompt.track_interactive_widget(button)?;
        }

        if !row.keybindings.is_empty() {
            let weak = prompt.downgrade();
            prompt.bind_root_key(move |event: &KeyEvent| {
                if let Some(value) = row.value_for_key(event.ch) {
                    submit_from_event(&weak, value, "key");
                }
            })?;
        }

        Ok(())
    }
}
