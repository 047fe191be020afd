pub mod client;
pub mod commands;
pub mod config;
pub mod session;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use self::client::ApiClient;
use self::config::{CliConfig, SessionStore};
use self::session::SessionContext;

#[derive(Parser)]
#[command(name = "attendance")]
#[command(about = "Attendance CLI - Command-line client for the Attendance API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Which API server the CLI talks to")]
    Server {
        #[command(subcommand)]
        cmd: commands::server::ServerCommands,
    },

    #[command(about = "Login, logout and registration")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Division (class section) management")]
    Division {
        #[command(subcommand)]
        cmd: commands::division::DivisionCommands,
    },

    #[command(about = "Student enrollment and history")]
    Student {
        #[command(subcommand)]
        cmd: commands::student::StudentCommands,
    },

    #[command(about = "Mark attendance and view reports")]
    Attendance {
        #[command(subcommand)]
        cmd: commands::attendance::AttendanceCommands,
    },

    #[command(about = "Professor profiles and division assignments")]
    Professor {
        #[command(subcommand)]
        cmd: commands::professor::ProfessorCommands,
    },

    #[command(about = "Today's overview of your divisions")]
    Dashboard {
        #[arg(long, help = "Professor id (defaults to the signed-in professor)")]
        professor: Option<i32>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let config_dir = config::get_config_dir()?;

    // Server commands only touch cli.json
    let cmd = match cli.command {
        Commands::Server { cmd } => return commands::server::handle(cmd, &config_dir, output_format).await,
        other => other,
    };

    let cli_config = CliConfig::load(&config_dir)?;
    let client = ApiClient::new(&cli_config.server_url)?;
    let mut session = SessionContext::restore(SessionStore::new(&config_dir), client).await?;

    match cmd {
        Commands::Server { .. } => Ok(()),
        Commands::Auth { cmd } => commands::auth::handle(cmd, &mut session, &output_format).await,
        Commands::Division { cmd } => commands::division::handle(cmd, &session, &output_format).await,
        Commands::Student { cmd } => commands::student::handle(cmd, &session, &output_format).await,
        Commands::Attendance { cmd } => commands::attendance::handle(cmd, &session, &output_format).await,
        Commands::Professor { cmd } => commands::professor::handle(cmd, &session, &output_format).await,
        Commands::Dashboard { professor } => {
            commands::dashboard::handle(professor, &session, &output_format).await
        }
    }
}
