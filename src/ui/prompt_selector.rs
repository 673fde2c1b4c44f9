//! System-prompt selector: options mirror host state, selection is sent to
//! the host.
//!
//! The list is refreshed lazily: every open asks the host for the current
//! prompts, and whatever list arrives last is what the selector shows.

use super::pointer::PointerHub;
use super::selector::{OptionSource, SelectCallback, SelectionEffect, Selector, SelectorOption};
use crate::core::bus::HostSender;
use crate::core::state::StateHandle;
use crate::protocol::{SystemPrompt, WebviewMessage};

pub const PROMPT_SELECTOR_ID: &str = "prompt";
pub const EDIT_PROMPT_LABEL: &str = "Edit role";
/// Locator the host resolves to its editable prompt file.
pub const DEFAULT_PROMPT_RESOURCE: &str = "{SystemPromptFile}";

/// Options read from the last prompt list the host pushed.
#[derive(Debug, Clone)]
pub struct PromptList {
    state: StateHandle,
}

impl PromptList {
    pub fn new(state: StateHandle) -> Self {
        Self { state }
    }
}

impl OptionSource for PromptList {
    type Value = SystemPrompt;

    fn options(&self) -> Vec<SelectorOption<SystemPrompt>> {
        self.state.with(|state| {
            state
                .system_prompts
                .iter()
                .map(|prompt| SelectorOption {
                    id: prompt.id.clone(),
                    name: prompt.name.clone(),
                    status: None,
                    value: prompt.clone(),
                })
                .collect()
        })
    }
}

/// Keeps the host in step with the prompt selector.
#[derive(Debug, Clone)]
pub struct PromptSync {
    host: HostSender,
    resource: String,
}

impl PromptSync {
    pub fn new(host: HostSender, resource: impl Into<String>) -> Self {
        Self {
            host,
            resource: resource.into(),
        }
    }
}

impl SelectionEffect<SystemPrompt> for PromptSync {
    fn opened(&mut self) {
        self.host.send(WebviewMessage::load_system_prompts());
    }

    fn selected(&mut self, option: &SelectorOption<SystemPrompt>) {
        self.host
            .send(WebviewMessage::update_system_prompt(option.value.clone()));
    }

    fn affordance_activated(&mut self) -> bool {
        self.host.send(WebviewMessage::open_file(self.resource.clone()));
        true
    }
}

pub type PromptSelector = Selector<PromptList, PromptSync>;

pub fn prompt_selector(
    selected: impl Into<String>,
    state: StateHandle,
    host: HostSender,
    resource: impl Into<String>,
    hub: PointerHub,
    on_select: SelectCallback,
) -> PromptSelector {
    Selector::new(
        PROMPT_SELECTOR_ID,
        selected,
        PromptList::new(state),
        PromptSync::new(host, resource),
        EDIT_PROMPT_LABEL,
        hub,
        on_select,
    )
}
