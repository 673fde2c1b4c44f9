//! Wire types exchanged between the host and the UI panel.
//!
//! Every envelope is a JSON object with a `type` tag and kind-specific
//! fields. [`webview`] holds what the panel sends, [`extension`] what the host
//! pushes back. There is no request id: a response is matched by its kind and
//! by the state field it replaces.

pub mod extension;
pub mod settings;
pub mod system_prompt;
pub mod webview;

use std::error::Error as StdError;
use std::fmt;

pub use extension::{ExtensionMessage, ExtensionStatePush};
pub use settings::{ApiConfiguration, AutoApprovalActions, AutoApprovalSettings};
pub use system_prompt::SystemPrompt;
pub use webview::{AskResponse, WebviewMessage};

/// Failure to move an envelope to or from its text form.
#[derive(Debug)]
pub enum EnvelopeError {
    /// The text was not valid JSON or lacked a field its kind requires.
    Decode { source: serde_json::Error },
    /// Serialization failed for an outbound envelope.
    Encode {
        kind: &'static str,
        source: serde_json::Error,
    },
}

impl fmt::Display for EnvelopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvelopeError::Decode { source } => write!(f, "Malformed envelope: {source}"),
            EnvelopeError::Encode { kind, source } => {
                write!(f, "Failed to encode '{kind}' envelope: {source}")
            }
        }
    }
}

impl StdError for EnvelopeError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            EnvelopeError::Decode { source } => Some(source),
            EnvelopeError::Encode { source, .. } => Some(source),
        }
    }
}
