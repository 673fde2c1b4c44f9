use crate::core::builtin_models::{load_builtin_models, BuiltinModel};
use crate::core::config::Config;

fn model_line(model: &BuiltinModel, default_id: Option<&str>) -> String {
    let marker = if default_id.is_some_and(|id| model.id.eq_ignore_ascii_case(id)) {
        " (default)"
    } else {
        ""
    };
    match &model.status {
        Some(status) => format!("  • {}{marker}\n    Name: {}\n    Status: {status}", model.id, model.display_name),
        None => format!("  • {}{marker}\n    Name: {}", model.id, model.display_name),
    }
}

pub fn list_models(config: &Config) {
    println!("🤖 Available Models");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();

    for model in load_builtin_models() {
        println!("{}", model_line(&model, config.default_model.as_deref()));
        println!();
    }

    println!("💡 Use 'panelink set default-model <id>' to pick the initial selection");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_default_and_status() {
        let models = load_builtin_models();
        let first = model_line(&models[0], Some("CLAUDE-3.5-SONNET"));
        assert!(first.starts_with("  • claude-3.5-sonnet (default)"));

        let last = model_line(&models[4], None);
        assert!(last.ends_with("Status: Missing API key"));
        assert!(!last.contains("(default)"));
    }
}
