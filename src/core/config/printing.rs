use crate::core::config::data::Config;
use crate::core::config::defaults::{ConfigKey, DEFAULT_BASE_URL, DEFAULT_MODEL};

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        for key in ConfigKey::ALL {
            match self.value(key) {
                Some(value) => println!("  {key}: {value}"),
                None => match key {
                    ConfigKey::Model => println!("  {key}: (unset, using {DEFAULT_MODEL})"),
                    ConfigKey::BaseUrl => println!("  {key}: (unset, using {DEFAULT_BASE_URL})"),
                    ConfigKey::Theme => println!("  {key}: (unset)"),
                },
            }
        }
        if self.system_instruction.is_some() {
            println!("  system_instruction: (custom)");
        }
        if self.greeting.is_some() {
            println!("  greeting: (custom)");
        }
    }
}
