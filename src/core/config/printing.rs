use crate::core::config::data::{Config, ConfigKey};

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        for key in ConfigKey::ALL {
            match self.get(key) {
                Some(value) => println!("  {key}: {value}"),
                None if key == ConfigKey::BaseUrl => {
                    println!("  {key}: (unset, using {})", self.base_url_or_default())
                }
                None => println!("  {key}: (unset)"),
            }
        }
    }
}
