use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::io::ConfigError;
use crate::core::builtin_models::{find_builtin_model, load_builtin_models};
use crate::protocol::system_prompt::BUILTIN_PROMPT_ID;
use crate::ui::prompt_selector::DEFAULT_PROMPT_RESOURCE;

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Built-in model id the model selector starts on (e.g., "gpt4o")
    pub default_model: Option<String>,
    /// Label the prompt selector shows before the user picks a prompt
    pub default_system_prompt: Option<String>,
    /// Locator sent with `openFile` when the user asks to edit the prompt
    pub prompt_resource: Option<String>,
    /// tracing filter directive used when no environment override is set
    pub log_filter: Option<String>,
}

/// Keys accepted by `set`/`unset`, in the order `config` prints them.
pub const CONFIG_KEYS: [&str; 4] = [
    "default-model",
    "default-system-prompt",
    "prompt-resource",
    "log-filter",
];

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

impl Config {
    pub fn prompt_resource(&self) -> &str {
        self.prompt_resource
            .as_deref()
            .unwrap_or(DEFAULT_PROMPT_RESOURCE)
    }

    /// Display name the model selector starts with.
    ///
    /// Falls back to the first built-in model when the configured id is
    /// unset or no longer built in.
    pub fn initial_model_label(&self) -> String {
        self.default_model
            .as_deref()
            .and_then(find_builtin_model)
            .or_else(|| load_builtin_models().into_iter().next())
            .map(|model| model.display_name)
            .unwrap_or_default()
    }

    pub fn initial_prompt_label(&self) -> &str {
        self.default_system_prompt
            .as_deref()
            .unwrap_or(BUILTIN_PROMPT_ID)
    }

    pub fn get(&self, key: &str) -> Result<Option<&str>, ConfigError> {
        let value = match key {
            "default-model" => &self.default_model,
            "default-system-prompt" => &self.default_system_prompt,
            "prompt-resource" => &self.prompt_resource,
            "log-filter" => &self.log_filter,
            _ => return Err(ConfigError::unknown_key(key)),
        };
        Ok(value.as_deref())
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                reason: "value must not be empty".to_string(),
            });
        }
        match key {
            "default-model" => {
                let Some(model) = find_builtin_model(value) else {
                    let available: Vec<String> =
                        load_builtin_models().into_iter().map(|m| m.id).collect();
                    return Err(ConfigError::InvalidValue {
                        key: key.to_string(),
                        reason: format!(
                            "unknown model '{value}'. Available models: {}",
                            available.join(", ")
                        ),
                    });
                };
                self.default_model = Some(model.id);
            }
            "default-system-prompt" => self.default_system_prompt = Some(value.to_string()),
            "prompt-resource" => self.prompt_resource = Some(value.to_string()),
            "log-filter" => self.log_filter = Some(value.to_string()),
            _ => return Err(ConfigError::unknown_key(key)),
        }
        Ok(())
    }

    pub fn unset(&mut self, key: &str) -> Result<(), ConfigError> {
        match key {
            "default-model" => self.default_model = None,
            "default-system-prompt" => self.default_system_prompt = None,
            "prompt-resource" => self.prompt_resource = None,
            "log-filter" => self.log_filter = None,
            _ => return Err(ConfigError::unknown_key(key)),
        }
        Ok(())
    }
}
