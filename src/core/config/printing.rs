use crate::core::config::data::{Config, CONFIG_KEYS};

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        for key in CONFIG_KEYS {
            match self.get(key) {
                Ok(Some(value)) => println!("  {key}: {value}"),
                _ => println!("  {key}: (unset)"),
            }
        }
    }
}
