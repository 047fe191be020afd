use clap::Subcommand;
use serde_json::json;

use crate::cli::session::SessionContext;
use crate::cli::utils::{cell, items, output_empty_collection, output_success, output_value};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum DivisionCommands {
    #[command(about = "List every division with its students")]
    List,

    #[command(about = "Create a division")]
    Create {
        #[arg(help = "Division name")]
        name: String,
    },

    #[command(about = "Show a division with its professors and today's average")]
    Show {
        #[arg(help = "Division id")]
        id: i32,
    },
}

pub async fn handle(cmd: DivisionCommands, session: &SessionContext, output_format: &OutputFormat) -> anyhow::Result<()> {
    session.require_professor()?;
    let client = session.client();

    match cmd {
        DivisionCommands::List => {
            let response = client.get("/api/divisions", &[]).await?;
            if items(&response, "divisions").is_empty() {
                return output_empty_collection(output_format, "divisions", "No divisions found");
            }
            output_value(output_format, &response, |value| {
                for division in items(value, "divisions") {
                    println!(
                        "{:>4}  {}  ({} students)",
                        cell(division, "id"),
                        cell(division, "name"),
                        items(division, "students").len()
                    );
                }
            })
        }
        DivisionCommands::Create { name } => {
            let response = client.post("/api/divisions", &json!({ "name": name })).await?;
            let division = response.get("division").cloned();
            output_success(
                output_format,
                &format!("Created division {}", name),
                division.map(|d| json!({ "division": d })),
            )
        }
        DivisionCommands::Show { id } => {
            let response = client.get(&format!("/api/divisions/{}", id), &[]).await?;
            output_value(output_format, &response, |value| {
                let division = &value["division"];
                println!("Division {}: {}", cell(division, "id"), cell(division, "name"));
                println!("Average attendance today: {}", cell(division, "avgAttendance"));
                let professors: Vec<String> =
                    items(division, "professors").iter().map(|p| cell(p, "name")).collect();
                println!("Professors: {}", professors.join(", "));
                for student in items(division, "students") {
                    println!(
                        "{:>4}  {:>6}  {}",
                        cell(student, "id"),
                        cell(student, "rollNumber"),
                        cell(student, "name")
                    );
                }
            })
        }
    }
}
