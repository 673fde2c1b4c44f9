use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Provider configuration as the host stores it.
///
/// Only the fields the UI reads are typed. Everything else the host sends is
/// kept in `extra` so a configuration pushed by the host can be sent back
/// without losing provider-specific keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_model_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ollama_model_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lm_studio_model_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoApprovalActions {
    pub read_files: bool,
    pub edit_files: bool,
    pub execute_commands: bool,
    pub use_browser: bool,
    pub use_mcp: bool,
}

/// Which tool actions the host may run without asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoApprovalSettings {
    pub enabled: bool,
    pub actions: AutoApprovalActions,
    pub max_requests: u32,
    pub enable_notifications: bool,
}

pub const DEFAULT_MAX_AUTO_REQUESTS: u32 = 20;

impl Default for AutoApprovalSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            actions: AutoApprovalActions::default(),
            max_requests: DEFAULT_MAX_AUTO_REQUESTS,
            enable_notifications: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_configuration_keys_survive_round_trip() {
        let raw = json!({
            "apiProvider": "openrouter",
            "apiModelId": "anthropic/claude-3.5-sonnet",
            "openRouterApiKey": "sk-or-1",
            "awsRegion": "us-east-1"
        });
        let config: ApiConfiguration = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(config.api_provider.as_deref(), Some("openrouter"));
        assert_eq!(config.extra.len(), 2);
        assert!(config.api_key.is_none());

        assert_eq!(serde_json::to_value(&config).unwrap(), raw);
    }

    #[test]
    fn auto_approval_defaults_fill_missing_fields() {
        let settings: AutoApprovalSettings =
            serde_json::from_value(json!({"enabled": true, "actions": {"readFiles": true}}))
                .unwrap();
        assert!(settings.enabled);
        assert!(settings.actions.read_files);
        assert!(!settings.actions.edit_files);
        assert_eq!(settings.max_requests, DEFAULT_MAX_AUTO_REQUESTS);
        assert!(!settings.enable_notifications);
    }
}
