use clap::Subcommand;
use serde_json::json;
use std::path::Path;

use crate::cli::client::ApiClient;
use crate::cli::config::CliConfig;
use crate::cli::utils::{output_success, output_value};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Point the CLI at an API server")]
    Use {
        #[arg(help = "Server URL, e.g. http://localhost:3000")]
        url: String,
    },

    #[command(about = "Show the configured server")]
    Current,

    #[command(about = "Check server health status from API /health endpoint")]
    Health,
}

pub async fn handle(cmd: ServerCommands, config_dir: &Path, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Use { url } => {
            // Reject anything that is not a URL before persisting it
            ApiClient::new(&url)?;
            let config = CliConfig { server_url: url };
            config.save(config_dir)?;
            output_success(
                &output_format,
                &format!("Switched to server {}", config.server_url),
                Some(json!({ "server_url": config.server_url })),
            )
        }
        ServerCommands::Current => {
            let config = CliConfig::load(config_dir)?;
            output_value(&output_format, &json!({ "server_url": config.server_url }), |_| {
                println!("Current server: {}", config.server_url);
            })
        }
        ServerCommands::Health => {
            let config = CliConfig::load(config_dir)?;
            let health = ApiClient::new(&config.server_url)?.get("/health", &[]).await?;
            output_value(&output_format, &health, |value| {
                println!(
                    "{}: {}",
                    config.server_url,
                    value.get("status").and_then(|s| s.as_str()).unwrap_or("unknown")
                );
            })
        }
    }
}
