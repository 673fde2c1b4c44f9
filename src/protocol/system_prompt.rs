use serde::{Deserialize, Serialize};

/// A named system prompt the host can activate.
///
/// Identity is `id`; `name` is what the UI shows. The host is the source of
/// truth for uniqueness, the UI never deduplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemPrompt {
    pub id: String,
    pub name: String,
    pub prompt: String,
}

impl SystemPrompt {
    pub fn new(id: impl Into<String>, name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            prompt: prompt.into(),
        }
    }
}

/// Id of the prompt the host falls back to before any list has been pushed.
pub const BUILTIN_PROMPT_ID: &str = "cline";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_host_record() {
        let prompt: SystemPrompt = serde_json::from_value(
            serde_json::json!({"id": BUILTIN_PROMPT_ID, "name": "cline", "prompt": "default"}),
        )
        .unwrap();
        assert_eq!(prompt, SystemPrompt::new("cline", "cline", "default"));
    }

    #[test]
    fn wire_field_names_are_plain() {
        let json = serde_json::to_value(SystemPrompt::new("a", "Default", "be brief")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "a", "name": "Default", "prompt": "be brief"})
        );
    }
}
