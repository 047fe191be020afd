use clap::Subcommand;
use serde_json::json;

use crate::cli::session::SessionContext;
use crate::cli::utils::{output_success, prompt_password};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login and persist the session")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Forget the persisted session")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,

    #[command(about = "Register a new professor account")]
    Register {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
        #[arg(long, default_value = "", help = "Full name")]
        name: String,
        #[arg(long, default_value = "", help = "Department")]
        department: String,
        #[arg(long, help = "Register as head of department")]
        hod: bool,
        #[arg(long = "division", help = "Division id to teach (repeatable)")]
        divisions: Vec<i32>,
    },
}

pub async fn handle(cmd: AuthCommands, session: &mut SessionContext, output_format: &OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { username, password } => {
            let password = prompt_password(password)?;
            let professor = session.login(&username, &password).await?;
            output_success(
                output_format,
                &format!("Logged in as {} (id {})", professor.username, professor.id),
                Some(json!({ "professor": professor })),
            )
        }
        AuthCommands::Logout => {
            session.logout()?;
            output_success(output_format, "Logged out", None)
        }
        AuthCommands::Status => match session.professor() {
            Some(professor) => output_success(
                output_format,
                &format!(
                    "Logged in as {} (id {}{})",
                    professor.username,
                    professor.id,
                    if professor.is_hod { ", HOD" } else { "" }
                ),
                Some(json!({ "professor": professor })),
            ),
            None => output_success(output_format, "Not logged in", Some(json!({ "professor": null }))),
        },
        AuthCommands::Register { username, password, name, department, hod, divisions } => {
            let password = prompt_password(password)?;
            let body = json!({
                "username": username,
                "password": password,
                "name": name,
                "department": department,
                "isHOD": hod,
                "divisionIds": divisions,
            });
            let response = session.client().post("/api/auth/register", &body).await?;
            output_success(
                output_format,
                &format!("Registered professor {}", username),
                response.get("professor").map(|p| json!({ "professor": p })),
            )
        }
    }
}
