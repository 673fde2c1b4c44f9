//! Model selector: static options, selection stays local.

use super::pointer::PointerHub;
use super::selector::{NoEffect, OptionSource, SelectCallback, Selector, SelectorOption};
use crate::core::builtin_models::{load_builtin_models, BuiltinModel};

pub const MODEL_SELECTOR_ID: &str = "model";
pub const ADD_MODEL_LABEL: &str = "Add Chat model";

/// The built-in model list, fixed at construction.
#[derive(Debug, Clone)]
pub struct StaticModels {
    models: Vec<BuiltinModel>,
}

impl StaticModels {
    pub fn builtin() -> Self {
        Self {
            models: load_builtin_models(),
        }
    }
}

impl OptionSource for StaticModels {
    type Value = String;

    fn options(&self) -> Vec<SelectorOption<String>> {
        self.models
            .iter()
            .map(|model| SelectorOption {
                id: model.id.clone(),
                name: model.display_name.clone(),
                status: model.status.clone(),
                value: model.id.clone(),
            })
            .collect()
    }
}

pub type ModelSelector = Selector<StaticModels, NoEffect>;

pub fn model_selector(
    selected: impl Into<String>,
    hub: PointerHub,
    on_select: SelectCallback,
) -> ModelSelector {
    Selector::new(
        MODEL_SELECTOR_ID,
        selected,
        StaticModels::builtin(),
        NoEffect,
        ADD_MODEL_LABEL,
        hub,
        on_select,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::selector::SelectorRow;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn shows_five_options_with_status_text() {
        let hub = PointerHub::new();
        let mut selector = model_selector("Claude 3.5 Sonnet", hub, Box::new(|_| {}));
        selector.toggle();
        let view = selector.render();

        assert_eq!(view.option_rows().count(), 5);
        assert_eq!(
            view.rows.last(),
            Some(&SelectorRow::Affordance {
                label: ADD_MODEL_LABEL.into()
            })
        );
        let flagged = selector
            .options()
            .into_iter()
            .find(|option| option.needs_attention())
            .map(|option| option.status);
        assert_eq!(flagged, Some(Some("Missing API key".to_string())));
    }

    #[test]
    fn flagged_option_is_still_selectable() {
        let hub = PointerHub::new();
        let picked = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&picked);
        let mut selector = model_selector(
            "GPT-4o",
            hub,
            Box::new(move |name| sink.borrow_mut().push(name.to_string())),
        );
        selector.toggle();
        selector.select("claude-3-sonnet").unwrap();

        assert_eq!(*picked.borrow(), ["Claude 3.5 Sonnet"]);
        assert!(!selector.is_open());
    }

    #[test]
    fn add_chat_model_leaves_list_open() {
        let hub = PointerHub::new();
        let mut selector = model_selector("GPT-4o", hub.clone(), Box::new(|_| {}));
        selector.toggle();
        selector.activate_affordance().unwrap();

        assert!(selector.is_open());
        assert_eq!(selector.label(), "GPT-4o");
        assert!(hub.is_listening(MODEL_SELECTOR_ID));
    }
}
