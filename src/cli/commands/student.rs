use clap::Subcommand;
use serde_json::json;

use crate::cli::session::SessionContext;
use crate::cli::utils::{cell, items, output_empty_collection, output_success, output_value};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum StudentCommands {
    #[command(about = "List the students of a division")]
    List {
        #[arg(long, help = "Division id")]
        division: i32,
    },

    #[command(about = "Enroll a student")]
    Add {
        #[arg(help = "Student name")]
        name: String,
        #[arg(long, help = "Division id")]
        division: i32,
        #[arg(long, help = "Roll number")]
        roll: Option<i32>,
    },

    #[command(about = "Show a student with their division")]
    Show {
        #[arg(help = "Student id")]
        id: i32,
    },

    #[command(about = "Replace a student's name, roll number and division")]
    Update {
        #[arg(help = "Student id")]
        id: i32,
        #[arg(long)]
        name: String,
        #[arg(long)]
        roll: i32,
        #[arg(long)]
        division: i32,
    },

    #[command(about = "Remove a student without attendance records")]
    Remove {
        #[arg(help = "Student id")]
        id: i32,
    },

    #[command(about = "Attendance history between two dates (inclusive)")]
    History {
        #[arg(help = "Student id")]
        id: i32,
        #[arg(long, help = "Start date (YYYY-MM-DD or RFC 3339)")]
        from: String,
        #[arg(long, help = "End date (YYYY-MM-DD or RFC 3339)")]
        to: String,
    },
}

pub async fn handle(cmd: StudentCommands, session: &SessionContext, output_format: &OutputFormat) -> anyhow::Result<()> {
    session.require_professor()?;
    let client = session.client();

    match cmd {
        StudentCommands::List { division } => {
            let response = client
                .get("/api/students", &[("divisionId", division.to_string())])
                .await?;
            if items(&response, "students").is_empty() {
                return output_empty_collection(output_format, "students", "No students in this division");
            }
            output_value(output_format, &response, |value| {
                for student in items(value, "students") {
                    println!(
                        "{:>4}  {:>6}  {}",
                        cell(student, "id"),
                        cell(student, "rollNumber"),
                        cell(student, "name")
                    );
                }
            })
        }
        StudentCommands::Add { name, division, roll } => {
            let body = json!({ "name": name, "divisionId": division, "rollNumber": roll });
            let response = client.post("/api/students", &body).await?;
            output_success(
                output_format,
                &format!("Added {} to division {}", name, division),
                response.get("student").map(|s| json!({ "student": s })),
            )
        }
        StudentCommands::Show { id } => {
            let response = client.get(&format!("/api/students/{}", id), &[]).await?;
            output_value(output_format, &response, |value| {
                let student = &value["student"];
                println!("{} (id {})", cell(student, "name"), cell(student, "id"));
                println!("Roll number: {}", cell(student, "rollNumber"));
                println!("Division: {}", cell(&student["division"], "name"));
            })
        }
        StudentCommands::Update { id, name, roll, division } => {
            let body = json!({ "name": name, "rollNumber": roll, "divisionId": division });
            let response = client.put(&format!("/api/students/{}", id), &body).await?;
            output_success(
                output_format,
                &format!("Updated student {}", id),
                response.get("student").map(|s| json!({ "student": s })),
            )
        }
        StudentCommands::Remove { id } => {
            client.delete(&format!("/api/students/{}", id)).await?;
            output_success(output_format, &format!("Removed student {}", id), None)
        }
        StudentCommands::History { id, from, to } => {
            let body = json!({ "startDate": from, "endDate": to });
            let response = client.post(&format!("/api/students/{}/attendance", id), &body).await?;
            if items(&response, "attendance").is_empty() {
                return output_empty_collection(output_format, "attendance", "No attendance in this range");
            }
            output_value(output_format, &response, |value| {
                for record in items(value, "attendance") {
                    println!("{}  {}", cell(record, "date"), cell(record, "status"));
                }
            })
        }
    }
}
