//! UI-side mirror of host state.
//!
//! The store is a cache: it only ever holds the last thing the host pushed and
//! is never authoritative. Each accepted envelope replaces whole fields, so a
//! reader never sees half of an update. Readers hold a [`StateHandle`]; the
//! only writer is the bus subscription installed by the session.

use std::collections::BTreeMap;

use tokio::sync::watch;
use tracing::debug;

use crate::protocol::{
    ApiConfiguration, AutoApprovalSettings, ExtensionMessage, ExtensionStatePush, SystemPrompt,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtensionState {
    pub system_prompts: Vec<SystemPrompt>,
    pub active_system_prompt: Option<SystemPrompt>,
    pub api_configuration: Option<ApiConfiguration>,
    pub auto_approval_settings: AutoApprovalSettings,
    pub custom_instructions: Option<String>,
    /// Local model lists keyed by source (`ollama`, `lmstudio`).
    pub local_models: BTreeMap<&'static str, Vec<String>>,
    pub last_error: Option<String>,
}

pub const OLLAMA_SOURCE: &str = "ollama";
pub const LM_STUDIO_SOURCE: &str = "lmstudio";

impl ExtensionState {
    pub fn local_models(&self, source: &str) -> &[String] {
        self.local_models
            .get(source)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn apply_push(&mut self, push: &ExtensionStatePush) -> bool {
        let mut changed = false;
        if let Some(prompts) = &push.system_prompts {
            changed |= replace(&mut self.system_prompts, prompts.clone());
        }
        if let Some(prompt) = &push.system_prompt {
            changed |= replace(&mut self.active_system_prompt, Some(prompt.clone()));
        }
        if let Some(config) = &push.api_configuration {
            changed |= replace(&mut self.api_configuration, Some(config.clone()));
        }
        if let Some(settings) = push.auto_approval_settings {
            changed |= replace(&mut self.auto_approval_settings, settings);
        }
        if let Some(text) = &push.custom_instructions {
            changed |= replace(&mut self.custom_instructions, Some(text.clone()));
        }
        changed
    }

    /// Apply one envelope. Returns whether anything changed.
    fn apply(&mut self, message: &ExtensionMessage) -> bool {
        match message {
            ExtensionMessage::State { state } => self.apply_push(state),
            ExtensionMessage::SystemPrompts { system_prompts } => {
                replace(&mut self.system_prompts, system_prompts.clone())
            }
            ExtensionMessage::SelectedSystemPrompt { system_prompt } => {
                replace(&mut self.active_system_prompt, Some(system_prompt.clone()))
            }
            ExtensionMessage::ApiConfiguration { api_configuration } => {
                replace(&mut self.api_configuration, Some(api_configuration.clone()))
            }
            ExtensionMessage::AutoApprovalSettings {
                auto_approval_settings,
            } => replace(&mut self.auto_approval_settings, *auto_approval_settings),
            ExtensionMessage::CustomInstructions { text } => {
                replace(&mut self.custom_instructions, text.clone())
            }
            ExtensionMessage::OllamaModels { ollama_models } => {
                self.replace_local_models(OLLAMA_SOURCE, ollama_models)
            }
            ExtensionMessage::LmStudioModels { lm_studio_models } => {
                self.replace_local_models(LM_STUDIO_SOURCE, lm_studio_models)
            }
            ExtensionMessage::Error { text } => replace(&mut self.last_error, Some(text.clone())),
            ExtensionMessage::Unknown => false,
        }
    }

    fn replace_local_models(&mut self, source: &'static str, models: &[String]) -> bool {
        if self.local_models.get(source).map(Vec::as_slice) == Some(models) {
            return false;
        }
        self.local_models.insert(source, models.to_vec());
        true
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

/// Owner of the state. Not cloneable: there is exactly one writer per session.
pub struct ExtensionStateStore {
    tx: watch::Sender<ExtensionState>,
}

impl ExtensionStateStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ExtensionState::default());
        Self { tx }
    }

    pub fn handle(&self) -> StateHandle {
        StateHandle {
            rx: self.tx.subscribe(),
        }
    }

    /// Apply an inbound envelope. Every recognized kind counts as an update
    /// and notifies readers, even when it repeats the current state. Returns
    /// whether the envelope was accepted.
    pub(crate) fn apply(&self, message: &ExtensionMessage) -> bool {
        let accepted = !message.is_unknown();
        self.tx.send_if_modified(|state| {
            let changed = state.apply(message);
            debug!(kind = message.kind(), changed, "Applied envelope to extension state");
            accepted
        });
        accepted
    }
}

impl Default for ExtensionStateStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view handed to widgets.
#[derive(Debug, Clone)]
pub struct StateHandle {
    rx: watch::Receiver<ExtensionState>,
}

impl StateHandle {
    pub fn snapshot(&self) -> ExtensionState {
        self.rx.borrow().clone()
    }

    /// Run `read` against a consistent view of the current state.
    pub fn with<R>(&self, read: impl FnOnce(&ExtensionState) -> R) -> R {
        read(&self.rx.borrow())
    }

    /// Whether an update landed since this handle last called [`mark_seen`].
    ///
    /// [`mark_seen`]: StateHandle::mark_seen
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    pub fn mark_seen(&mut self) {
        self.rx.borrow_and_update();
    }

    /// Wait for the next update. Returns `false` once the store is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(id: &str, name: &str) -> SystemPrompt {
        SystemPrompt::new(id, name, format!("{name} prompt"))
    }

    #[test]
    fn starts_empty() {
        let store = ExtensionStateStore::new();
        let state = store.handle().snapshot();
        assert!(state.system_prompts.is_empty());
        assert!(state.api_configuration.is_none());
        assert_eq!(state.auto_approval_settings, AutoApprovalSettings::default());
    }

    #[test]
    fn prompt_list_is_last_write_wins() {
        let store = ExtensionStateStore::new();
        let handle = store.handle();
        let a = prompt("a", "Default");
        let b = prompt("b", "Reviewer");

        store.apply(&ExtensionMessage::system_prompts(vec![a.clone(), b]));
        store.apply(&ExtensionMessage::system_prompts(vec![a.clone()]));

        assert_eq!(handle.snapshot().system_prompts, vec![a]);
    }

    #[test]
    fn unknown_kind_leaves_state_untouched_and_silent() {
        let store = ExtensionStateStore::new();
        let mut handle = store.handle();
        store.apply(&ExtensionMessage::system_prompts(vec![prompt("a", "Default")]));
        handle.mark_seen();
        let before = handle.snapshot();

        assert!(!store.apply(&ExtensionMessage::Unknown));
        assert!(!handle.has_changed());
        assert_eq!(handle.snapshot(), before);
    }

    #[test]
    fn identical_push_still_notifies() {
        let store = ExtensionStateStore::new();
        let mut handle = store.handle();
        let list = ExtensionMessage::system_prompts(vec![prompt("a", "Default")]);

        assert!(store.apply(&list));
        handle.mark_seen();
        let before = handle.snapshot();
        assert!(store.apply(&list));
        assert!(handle.has_changed());
        assert_eq!(handle.snapshot(), before);
    }

    #[test]
    fn state_push_replaces_only_present_fields() {
        let store = ExtensionStateStore::new();
        let handle = store.handle();
        store.apply(&ExtensionMessage::system_prompts(vec![prompt("a", "Default")]));

        let config = ApiConfiguration {
            api_provider: Some("anthropic".into()),
            ..Default::default()
        };
        store.apply(&ExtensionMessage::State {
            state: ExtensionStatePush {
                api_configuration: Some(config.clone()),
                custom_instructions: Some("be terse".into()),
                ..Default::default()
            },
        });

        let state = handle.snapshot();
        assert_eq!(state.system_prompts.len(), 1);
        assert_eq!(state.api_configuration, Some(config));
        assert_eq!(state.custom_instructions.as_deref(), Some("be terse"));
    }

    #[test]
    fn configuration_is_replaced_not_merged() {
        let store = ExtensionStateStore::new();
        let handle = store.handle();
        store.apply(&ExtensionMessage::ApiConfiguration {
            api_configuration: ApiConfiguration {
                api_provider: Some("openai".into()),
                api_key: Some("sk-1".into()),
                ..Default::default()
            },
        });
        store.apply(&ExtensionMessage::ApiConfiguration {
            api_configuration: ApiConfiguration {
                api_provider: Some("ollama".into()),
                ..Default::default()
            },
        });

        let config = handle.snapshot().api_configuration.unwrap();
        assert_eq!(config.api_provider.as_deref(), Some("ollama"));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn local_model_lists_and_errors() {
        let store = ExtensionStateStore::new();
        let handle = store.handle();
        store.apply(&ExtensionMessage::OllamaModels {
            ollama_models: vec!["llama3.1:70b".into()],
        });
        store.apply(&ExtensionMessage::Error {
            text: "LM Studio not running".into(),
        });

        handle.with(|state| {
            assert_eq!(state.local_models(OLLAMA_SOURCE), ["llama3.1:70b"]);
            assert!(state.local_models(LM_STUDIO_SOURCE).is_empty());
            assert_eq!(state.last_error.as_deref(), Some("LM Studio not running"));
        });
    }

    #[tokio::test]
    async fn changed_wakes_on_update() {
        let store = ExtensionStateStore::new();
        let mut handle = store.handle();
        store.apply(&ExtensionMessage::system_prompts(vec![prompt("a", "Default")]));
        assert!(handle.changed().await);
        drop(store);
        assert!(!handle.changed().await);
    }
}
