use crate::cli::session::SessionContext;
use crate::cli::utils::{cell, items, output_empty_collection, output_value};
use crate::cli::OutputFormat;

pub async fn handle(professor: Option<i32>, session: &SessionContext, output_format: &OutputFormat) -> anyhow::Result<()> {
    let me = session.require_professor()?;
    let professor_id = professor.unwrap_or(me.id);

    let response = session
        .client()
        .get("/api/dashboard", &[("professorId", professor_id.to_string())])
        .await?;

    if items(&response, "divisions").is_empty() {
        return output_empty_collection(output_format, "divisions", "No divisions assigned");
    }

    output_value(output_format, &response, |value| {
        println!("{:<20} {:>9}  Attendance today", "Division", "Students");
        for division in items(value, "divisions") {
            let taken = division.get("attendanceTaken").and_then(|t| t.as_bool()).unwrap_or(false);
            println!(
                "{:<20} {:>9}  {}",
                cell(division, "name"),
                cell(division, "studentCount"),
                if taken { "taken" } else { "pending" }
            );
        }
    })
}
