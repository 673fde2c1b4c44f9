//! Built-in model enumeration
//!
//! The model selector offers a fixed list compiled into the binary from
//! builtin_models.toml. Host-pushed state never changes it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltinModel {
    pub id: String,
    pub display_name: String,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct BuiltinModelsConfig {
    models: Vec<BuiltinModel>,
}

/// Load built-in models from the embedded table
pub fn load_builtin_models() -> Vec<BuiltinModel> {
    const CONFIG_CONTENT: &str = include_str!("../builtin_models.toml");

    let config: BuiltinModelsConfig =
        toml::from_str(CONFIG_CONTENT).expect("Failed to parse builtin_models.toml");

    config.models
}

/// Find a built-in model by ID (case-insensitive)
pub fn find_builtin_model(id: &str) -> Option<BuiltinModel> {
    load_builtin_models()
        .into_iter()
        .find(|m| m.id.eq_ignore_ascii_case(id))
}
