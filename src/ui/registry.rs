// PromptRegistry - The set of live prompts owned by one GUI
//
// Insertion-ordered so bulk teardown destroys prompts in creation order. A prompt holds a
// weak reference to the member table and removes itself when destroyed, so membership
// always means "alive".

use crate::error::{GuiError, Result};
use crate::ui::prompt::{Prompt, PromptId};
use indexmap::IndexMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

pub(crate) type Members = Mutex<IndexMap<PromptId, Prompt>>;

#[derive(Clone, Default)]
pub struct PromptRegistry {
    members: Arc<Members>,
}

impl PromptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn downgrade(&self) -> Weak<Members> {
        Arc::downgrade(&self.members)
    }

    fn lock(&self) -> MutexGuard<'_, IndexMap<PromptId, Prompt>> {
        self.members.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a prompt.
    ///
    /// # Returns
    /// `false` if the prompt is already registered or has been destroyed
    pub fn add(&self, prompt: &Prompt) -> bool {
        let mut members = self.lock();
        if members.contains_key(&prompt.id()) || !prompt.is_alive() {
            return false;
        }
        members.insert(prompt.id(), prompt.clone());
        true
    }

    pub fn contains(&self, prompt: &Prompt) -> bool {
        self.contains_id(prompt.id())
    }

    pub fn contains_id(&self, id: PromptId) -> bool {
        self.lock().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// The registered prompts in creation order
    pub fn snapshot(&self) -> Vec<Prompt> {
        self.lock().values().cloned().collect()
    }

    /// Destroy one prompt.
    ///
    /// # Returns
    /// `false` if it was already gone
    pub fn remove(&self, prompt: &Prompt) -> Result<bool> {
        match prompt.destroy() {
            Ok(()) => Ok(true),
            Err(GuiError::PromptDestroyed(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Destroy every registered prompt.
    ///
    /// Prompts destroyed concurrently are skipped. Any other failure is reported after the
    /// remaining prompts have still been torn down.
    ///
    /// # Returns
    /// The number of prompts this call destroyed
    pub fn clear_all(&self) -> Result<usize> {
        let prompts = self.snapshot();
        let mut destroyed = 0;
        let mut first_error = None;

        for prompt in &prompts {
            match self.remove(prompt) {
                Ok(true) => destroyed += 1,
                Ok(false) => {
                    tracing::debug!("Prompt {} was already destroyed", prompt.id());
                }
                Err(e) => {
                    tracing::error!("Failed to destroy prompt {}: {}", prompt.id(), e);
                    first_error.get_or_insert(e);
                }
            }
        }

        tracing::info!("Cleared {} of {} prompts", destroyed, prompts.len());
        match first_error {
            Some(e) => Err(e),
            None => Ok(destroyed),
        }
    }
}
