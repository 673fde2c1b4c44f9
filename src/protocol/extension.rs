//! Envelopes the host pushes to the UI panel.

use serde::{Deserialize, Serialize};

use super::settings::{ApiConfiguration, AutoApprovalSettings};
use super::system_prompt::SystemPrompt;
use super::EnvelopeError;

/// Full state push. Every present field replaces its counterpart in the UI
/// store as a whole; absent fields are left as they were.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionStatePush {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompts: Option<Vec<SystemPrompt>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<SystemPrompt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_configuration: Option<ApiConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_approval_settings: Option<AutoApprovalSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_instructions: Option<String>,
}

/// A single host → UI message.
///
/// Kinds this build does not know decode to [`ExtensionMessage::Unknown`] so
/// a newer host never breaks an older panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ExtensionMessage {
    State {
        state: ExtensionStatePush,
    },
    #[serde(rename_all = "camelCase")]
    SystemPrompts {
        system_prompts: Vec<SystemPrompt>,
    },
    #[serde(rename_all = "camelCase")]
    SelectedSystemPrompt {
        system_prompt: SystemPrompt,
    },
    #[serde(rename_all = "camelCase")]
    ApiConfiguration {
        api_configuration: ApiConfiguration,
    },
    #[serde(rename_all = "camelCase")]
    AutoApprovalSettings {
        auto_approval_settings: AutoApprovalSettings,
    },
    CustomInstructions {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    OllamaModels {
        #[serde(default)]
        ollama_models: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    LmStudioModels {
        #[serde(default)]
        lm_studio_models: Vec<String>,
    },
    Error {
        text: String,
    },
    #[serde(other)]
    Unknown,
}

impl ExtensionMessage {
    pub fn system_prompts(prompts: Vec<SystemPrompt>) -> Self {
        Self::SystemPrompts {
            system_prompts: prompts,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::State { .. } => "state",
            Self::SystemPrompts { .. } => "systemPrompts",
            Self::SelectedSystemPrompt { .. } => "selectedSystemPrompt",
            Self::ApiConfiguration { .. } => "apiConfiguration",
            Self::AutoApprovalSettings { .. } => "autoApprovalSettings",
            Self::CustomInstructions { .. } => "customInstructions",
            Self::OllamaModels { .. } => "ollamaModels",
            Self::LmStudioModels { .. } => "lmStudioModels",
            Self::Error { .. } => "error",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    pub fn to_json(&self) -> Result<String, EnvelopeError> {
        serde_json::to_string(self).map_err(|source| EnvelopeError::Encode {
            kind: self.kind(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, EnvelopeError> {
        serde_json::from_str(text).map_err(|source| EnvelopeError::Decode { source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_kind_decodes_to_unknown() {
        let message =
            ExtensionMessage::from_json(r#"{"type":"partialMessage","partialMessage":{}}"#)
                .unwrap();
        assert!(message.is_unknown());
    }

    #[test]
    fn prompt_list_keeps_delivery_order() {
        let message = ExtensionMessage::from_json(
            r#"{"type":"systemPrompts","systemPrompts":[
                {"id":"b","name":"Reviewer","prompt":"review"},
                {"id":"a","name":"Default","prompt":"..."}
            ]}"#,
        )
        .unwrap();
        let ExtensionMessage::SystemPrompts { system_prompts } = message else {
            panic!("expected prompt list");
        };
        let ids: Vec<&str> = system_prompts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn missing_required_field_is_a_decode_error() {
        let err = ExtensionMessage::from_json(r#"{"type":"selectedSystemPrompt"}"#).unwrap_err();
        assert!(matches!(err, EnvelopeError::Decode { .. }));
        assert!(ExtensionMessage::from_json("not json").is_err());
    }

    #[test]
    fn state_push_with_only_configuration() {
        let message = ExtensionMessage::from_json(
            r#"{"type":"state","state":{"apiConfiguration":{"apiProvider":"anthropic"}}}"#,
        )
        .unwrap();
        let ExtensionMessage::State { state } = message else {
            panic!("expected state push");
        };
        assert!(state.system_prompts.is_none());
        assert_eq!(
            state
                .api_configuration
                .and_then(|config| config.api_provider)
                .as_deref(),
            Some("anthropic")
        );
    }
}
