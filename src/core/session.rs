//! One mounted UI panel.
//!
//! The session owns everything that lives for the lifetime of the panel: the
//! bus, the state store (reachable only through the bus subscription), the
//! pointer hub and both selectors. Nothing here is global, so two sessions
//! never share state.

use tracing::debug;

use super::bus::{HostEndpoint, Inbound, MessageBus};
use super::config::Config;
use super::state::{ExtensionStateStore, StateHandle};
use crate::protocol::WebviewMessage;
use crate::ui::model_selector::{model_selector, ModelSelector, MODEL_SELECTOR_ID};
use crate::ui::pointer::{PointerEvent, PointerHub, WidgetId, WidgetPart};
use crate::ui::prompt_selector::{prompt_selector, PromptSelector, PROMPT_SELECTOR_ID};
use crate::ui::selector::{SelectCallback, SelectorError, SelectorView};

/// Callbacks the embedding view passes to the selectors.
pub struct SessionHooks {
    pub on_model_select: SelectCallback,
    pub on_prompt_select: SelectCallback,
}

impl Default for SessionHooks {
    fn default() -> Self {
        Self {
            on_model_select: Box::new(|_| {}),
            on_prompt_select: Box::new(|_| {}),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub model: SelectorView,
    pub prompt: SelectorView,
}

pub struct UiSession {
    bus: MessageBus,
    state: StateHandle,
    hub: PointerHub,
    model: ModelSelector,
    prompt: PromptSelector,
}

impl UiSession {
    /// Mount a panel. The returned endpoint is the host side of its channel.
    pub fn mount(config: &Config, hooks: SessionHooks) -> (UiSession, HostEndpoint) {
        let (mut bus, host) = MessageBus::channel();
        let store = ExtensionStateStore::new();
        let state = store.handle();
        bus.subscribe(move |message| {
            store.apply(message);
        });

        let hub = PointerHub::new();
        let model = model_selector(
            config.initial_model_label(),
            hub.clone(),
            hooks.on_model_select,
        );
        let prompt = prompt_selector(
            config.initial_prompt_label(),
            state.clone(),
            bus.sender(),
            config.prompt_resource(),
            hub.clone(),
            hooks.on_prompt_select,
        );

        bus.send(WebviewMessage::WebviewDidLaunch);
        debug!("UI session mounted");

        let session = UiSession {
            bus,
            state,
            hub,
            model,
            prompt,
        };
        (session, host)
    }

    pub fn send(&self, message: WebviewMessage) {
        self.bus.send(message);
    }

    /// Apply every envelope the host has pushed so far.
    pub fn pump(&mut self) -> usize {
        self.bus.drain()
    }

    pub async fn recv(&mut self) -> Option<Inbound> {
        self.bus.recv().await
    }

    pub fn state(&self) -> &StateHandle {
        &self.state
    }

    pub fn pointer_hub(&self) -> &PointerHub {
        &self.hub
    }

    pub fn model(&self) -> &ModelSelector {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut ModelSelector {
        &mut self.model
    }

    pub fn prompt(&self) -> &PromptSelector {
        &self.prompt
    }

    pub fn prompt_mut(&mut self) -> &mut PromptSelector {
        &mut self.prompt
    }

    /// Route a pointer-down to every selector. Returns the ids of the
    /// selectors it closed.
    pub fn pointer_down(&mut self, event: PointerEvent) -> Vec<WidgetId> {
        let mut closed = Vec::new();
        if self.model.pointer_down(&event) {
            closed.push(self.model.id());
        }
        if self.prompt.pointer_down(&event) {
            closed.push(self.prompt.id());
        }
        closed
    }

    /// A full click on a trigger: the pointer-down reaches the other
    /// selectors first, then the trigger toggles its own list.
    pub fn click_trigger(&mut self, widget: WidgetId) -> Result<(), SelectorError> {
        self.pointer_down(PointerEvent::on(widget, WidgetPart::Trigger));
        match widget {
            MODEL_SELECTOR_ID => {
                self.model.toggle();
            }
            PROMPT_SELECTOR_ID => {
                self.prompt.toggle();
            }
            other => {
                return Err(SelectorError::UnknownWidget {
                    widget: other.to_string(),
                })
            }
        }
        Ok(())
    }

    /// Click on an option row of `widget`.
    pub fn click_option(&mut self, widget: WidgetId, option_id: &str) -> Result<(), SelectorError> {
        self.pointer_down(PointerEvent::on(widget, WidgetPart::List));
        match widget {
            MODEL_SELECTOR_ID => self.model.select(option_id),
            PROMPT_SELECTOR_ID => self.prompt.select(option_id),
            other => Err(SelectorError::UnknownWidget {
                widget: other.to_string(),
            }),
        }
    }

    /// Click on the trailing affordance row of `widget`.
    pub fn click_affordance(&mut self, widget: WidgetId) -> Result<(), SelectorError> {
        self.pointer_down(PointerEvent::on(widget, WidgetPart::List));
        match widget {
            MODEL_SELECTOR_ID => self.model.activate_affordance(),
            PROMPT_SELECTOR_ID => self.prompt.activate_affordance(),
            other => Err(SelectorError::UnknownWidget {
                widget: other.to_string(),
            }),
        }
    }

    /// Whether host state changed since the last [`render`](Self::render).
    pub fn needs_render(&self) -> bool {
        self.state.has_changed()
    }

    pub fn render(&mut self) -> SessionView {
        self.state.mark_seen();
        SessionView {
            model: self.model.render(),
            prompt: self.prompt.render(),
        }
    }

    /// Tear the panel down. Open selectors release their listeners and the
    /// host endpoint observes a closed channel.
    pub fn unmount(self) {
        debug!(
            listeners = self.hub.live_listeners(),
            "UI session unmounting"
        );
    }
}
