//! Envelopes the UI panel sends to the host.

use serde::{Deserialize, Serialize};

use super::settings::{ApiConfiguration, AutoApprovalSettings};
use super::system_prompt::SystemPrompt;
use super::EnvelopeError;

/// Answer to a question the host asked the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AskResponse {
    YesButtonClicked,
    NoButtonClicked,
    MessageResponse,
}

/// A single UI → host message.
///
/// The `type` field selects the variant and each variant carries only the
/// fields defined for its kind. Example wire form:
///
/// ```json
/// {"type":"updateSystemPrompt","systemPrompt":{"id":"a","name":"Default","prompt":"..."}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WebviewMessage {
    #[serde(rename_all = "camelCase")]
    ApiConfiguration { api_configuration: ApiConfiguration },
    CustomInstructions {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    WebviewDidLaunch,
    NewTask {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        images: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    AskResponse {
        ask_response: AskResponse,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        images: Vec<String>,
    },
    ClearTask,
    DidShowAnnouncement,
    SelectImages,
    ExportCurrentTask,
    ShowTaskWithId { text: String },
    DeleteTaskWithId { text: String },
    ExportTaskWithId { text: String },
    ResetState,
    /// `text` is an optional base URL for the local server.
    RequestOllamaModels {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    RequestLmStudioModels {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    OpenImage { text: String },
    /// `text` is a resource locator the host resolves.
    OpenFile { text: String },
    OpenMention {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    CancelTask,
    RefreshOpenRouterModels,
    OpenMcpSettings,
    RestartMcpServer { text: String },
    #[serde(rename_all = "camelCase")]
    AutoApprovalSettings {
        auto_approval_settings: AutoApprovalSettings,
    },
    LoadSystemPrompts,
    #[serde(rename_all = "camelCase")]
    UpdateSystemPrompt { system_prompt: SystemPrompt },
}

impl WebviewMessage {
    pub fn load_system_prompts() -> Self {
        Self::LoadSystemPrompts
    }

    pub fn update_system_prompt(prompt: SystemPrompt) -> Self {
        Self::UpdateSystemPrompt {
            system_prompt: prompt,
        }
    }

    pub fn open_file(locator: impl Into<String>) -> Self {
        Self::OpenFile {
            text: locator.into(),
        }
    }

    pub fn new_task(text: impl Into<String>, images: Vec<String>) -> Self {
        Self::NewTask {
            text: Some(text.into()),
            images,
        }
    }

    pub fn ask_response(response: AskResponse, text: Option<String>, images: Vec<String>) -> Self {
        Self::AskResponse {
            ask_response: response,
            text,
            images,
        }
    }

    pub fn cancel_task() -> Self {
        Self::CancelTask
    }

    pub fn api_configuration(config: ApiConfiguration) -> Self {
        Self::ApiConfiguration {
            api_configuration: config,
        }
    }

    pub fn auto_approval_settings(settings: AutoApprovalSettings) -> Self {
        Self::AutoApprovalSettings {
            auto_approval_settings: settings,
        }
    }

    /// The wire tag of this envelope.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ApiConfiguration { .. } => "apiConfiguration",
            Self::CustomInstructions { .. } => "customInstructions",
            Self::WebviewDidLaunch => "webviewDidLaunch",
            Self::NewTask { .. } => "newTask",
            Self::AskResponse { .. } => "askResponse",
            Self::ClearTask => "clearTask",
            Self::DidShowAnnouncement => "didShowAnnouncement",
            Self::SelectImages => "selectImages",
            Self::ExportCurrentTask => "exportCurrentTask",
            Self::ShowTaskWithId { .. } => "showTaskWithId",
            Self::DeleteTaskWithId { .. } => "deleteTaskWithId",
            Self::ExportTaskWithId { .. } => "exportTaskWithId",
            Self::ResetState => "resetState",
            Self::RequestOllamaModels { .. } => "requestOllamaModels",
            Self::RequestLmStudioModels { .. } => "requestLmStudioModels",
            Self::OpenImage { .. } => "openImage",
            Self::OpenFile { .. } => "openFile",
            Self::OpenMention { .. } => "openMention",
            Self::CancelTask => "cancelTask",
            Self::RefreshOpenRouterModels => "refreshOpenRouterModels",
            Self::OpenMcpSettings => "openMcpSettings",
            Self::RestartMcpServer { .. } => "restartMcpServer",
            Self::AutoApprovalSettings { .. } => "autoApprovalSettings",
            Self::LoadSystemPrompts => "loadSystemPrompts",
            Self::UpdateSystemPrompt { .. } => "updateSystemPrompt",
        }
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
    use serde_json::{json, Value};

    fn wire(message: &WebviewMessage) -> Value {
        serde_json::from_str(&message.to_json().unwrap()).unwrap()
    }

    #[test]
    fn unit_kinds_carry_only_the_tag() {
        assert_eq!(
            wire(&WebviewMessage::load_system_prompts()),
            json!({"type": "loadSystemPrompts"})
        );
        assert_eq!(
            wire(&WebviewMessage::cancel_task()),
            json!({"type": "cancelTask"})
        );
    }

    #[test]
    fn update_system_prompt_carries_full_record() {
        let prompt = SystemPrompt::new("a", "Default", "...");
        assert_eq!(
            wire(&WebviewMessage::update_system_prompt(prompt)),
            json!({
                "type": "updateSystemPrompt",
                "systemPrompt": {"id": "a", "name": "Default", "prompt": "..."}
            })
        );
    }

    #[test]
    fn ask_response_uses_camel_case_discriminator() {
        let message = WebviewMessage::ask_response(
            AskResponse::MessageResponse,
            Some("looks good".into()),
            Vec::new(),
        );
        assert_eq!(
            wire(&message),
            json!({
                "type": "askResponse",
                "askResponse": "messageResponse",
                "text": "looks good"
            })
        );
    }

    #[test]
    fn kind_matches_serialized_tag() {
        let samples = [
            WebviewMessage::open_file("{SystemPromptFile}"),
            WebviewMessage::new_task("hello", vec!["data:image/png;base64,AA".into()]),
            WebviewMessage::RequestOllamaModels { text: None },
            WebviewMessage::auto_approval_settings(AutoApprovalSettings::default()),
            WebviewMessage::api_configuration(ApiConfiguration::default()),
            WebviewMessage::WebviewDidLaunch,
        ];
        for message in samples {
            assert_eq!(wire(&message)["type"], message.kind());
        }
    }

    #[test]
    fn decode_rejects_missing_required_field() {
        let err = WebviewMessage::from_json(r#"{"type":"openFile"}"#).unwrap_err();
        assert!(matches!(err, EnvelopeError::Decode { .. }));
    }

    #[test]
    fn decode_accepts_host_style_text() {
        let message = WebviewMessage::from_json(
            r#"{"type":"askResponse","askResponse":"yesButtonClicked"}"#,
        )
        .unwrap();
        assert_eq!(
            message,
            WebviewMessage::ask_response(AskResponse::YesButtonClicked, None, Vec::new())
        );
    }
}
