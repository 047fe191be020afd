use clap::Subcommand;
use serde_json::json;

use crate::cli::session::SessionContext;
use crate::cli::utils::{cell, items, output_success, output_value};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ProfessorCommands {
    #[command(about = "Show a professor and their divisions")]
    Show {
        #[arg(help = "Professor id (defaults to the signed-in professor)")]
        id: Option<i32>,
    },

    #[command(about = "Assign divisions to a professor, keeping existing ones")]
    Assign {
        #[arg(long, value_delimiter = ',', required = true, help = "Division ids")]
        divisions: Vec<i32>,
        #[arg(long, help = "Professor id (defaults to the signed-in professor)")]
        professor: Option<i32>,
    },
}

pub async fn handle(cmd: ProfessorCommands, session: &SessionContext, output_format: &OutputFormat) -> anyhow::Result<()> {
    let me = session.require_professor()?;
    let client = session.client();

    match cmd {
        ProfessorCommands::Show { id } => {
            let id = id.unwrap_or(me.id);
            let response = client.get(&format!("/api/professors/{}", id), &[]).await?;
            output_value(output_format, &response, |value| {
                let professor = &value["professor"];
                println!("{} ({})", cell(professor, "name"), cell(professor, "username"));
                println!("Department: {}", cell(professor, "department"));
                println!("HOD: {}", cell(professor, "isHOD"));
                let divisions: Vec<String> =
                    items(professor, "divisions").iter().map(|d| cell(d, "name")).collect();
                println!("Divisions: {}", divisions.join(", "));
            })
        }
        ProfessorCommands::Assign { divisions, professor } => {
            let professor_id = professor.unwrap_or(me.id);
            let body = json!({ "professorId": professor_id, "divisionIds": divisions });
            client.post("/api/professors/updateDivisions", &body).await?;
            output_success(
                output_format,
                &format!("Assigned {} division(s) to professor {}", divisions.len(), professor_id),
                None,
            )
        }
    }
}
