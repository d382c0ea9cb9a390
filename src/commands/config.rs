use anyhow::Result;

use dep_license_gate::config::load_config;

pub fn handle_config(show: bool, validate: bool) -> Result<()> {
    if !show && !validate {
        eprintln!("Use --show or --validate");
        std::process::exit(1);
    }

    if show {
        match load_config() {
            Ok(config) => {
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
            Err(e) => {
                eprintln!("Error loading configuration: {}", e);
                std::process::exit(1);
            }
        }
    }

    if validate {
        match load_config() {
            Ok(config) => {
                if let Some(policy) = &config.policy {
                    if let Err(e) = policy.validate() {
                        eprintln!("Configuration validation failed: {}", e);
                        std::process::exit(1);
                    }
                }
                println!("Configuration is valid");
            }
            Err(e) => {
                eprintln!("Configuration validation failed: {}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
