use clap::{Subcommand, ValueEnum};
use serde_json::{json, Value};

use crate::cli::session::SessionContext;
use crate::cli::utils::{cell, items, output_empty_collection, output_success, output_value};
use crate::cli::OutputFormat;
use crate::database::models::AttendanceStatus;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Present,
    Absent,
}

impl From<StatusArg> for AttendanceStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Present => AttendanceStatus::Present,
            StatusArg::Absent => AttendanceStatus::Absent,
        }
    }
}

#[derive(Subcommand)]
pub enum AttendanceCommands {
    #[command(about = "Mark today's attendance for a whole division")]
    Mark {
        #[arg(help = "Division id")]
        division: i32,
        #[arg(long, value_delimiter = ',', help = "Ids of students present; everyone else is absent")]
        present: Vec<i32>,
    },

    #[command(about = "Record a single attendance entry")]
    Record {
        #[arg(help = "Student id")]
        student: i32,
        #[arg(value_enum)]
        status: StatusArg,
        #[arg(long, help = "Date (YYYY-MM-DD or RFC 3339), defaults to now")]
        date: Option<String>,
    },

    #[command(about = "Present/absent tallies per student")]
    Report {
        #[arg(long, help = "Division id")]
        division: i32,
        #[arg(long, help = "Start date (YYYY-MM-DD or RFC 3339)")]
        from: String,
        #[arg(long, help = "End date, exclusive (defaults to the end of today)")]
        to: Option<String>,
    },
}

/// Every student of the division, Present if listed and Absent otherwise
pub fn mark_entries(students: &[Value], present: &[i32]) -> Vec<Value> {
    students
        .iter()
        .filter_map(|student| student.get("id").and_then(Value::as_i64))
        .map(|id| {
            let status = if present.iter().any(|&p| i64::from(p) == id) {
                AttendanceStatus::Present
            } else {
                AttendanceStatus::Absent
            };
            json!({ "studentId": id, "status": status })
        })
        .collect()
}

pub async fn handle(cmd: AttendanceCommands, session: &SessionContext, output_format: &OutputFormat) -> anyhow::Result<()> {
    session.require_professor()?;
    let client = session.client();

    match cmd {
        AttendanceCommands::Mark { division, present } => {
            let students = client
                .get("/api/students", &[("divisionId", division.to_string())])
                .await?;
            let entries = mark_entries(items(&students, "students"), &present);
            if entries.is_empty() {
                return output_empty_collection(output_format, "attendanceRecords", "No students in this division");
            }

            let present_count = entries.iter().filter(|e| e["status"] == "Present").count();
            let absent_count = entries.len() - present_count;
            let response = client
                .post("/api/attendance/mark", &json!({ "attendance": entries }))
                .await?;
            output_success(
                output_format,
                &format!("Marked {} present, {} absent", present_count, absent_count),
                response.get("attendanceRecords").map(|r| json!({ "attendanceRecords": r })),
            )
        }
        AttendanceCommands::Record { student, status, date } => {
            let date = date.unwrap_or_else(|| chrono::Utc::now().to_rfc3339());
            let body = json!({
                "studentId": student,
                "date": date,
                "status": AttendanceStatus::from(status),
            });
            let response = client.post("/api/attendance", &body).await?;
            output_success(
                output_format,
                &format!("Recorded attendance for student {}", student),
                response.get("attendance").map(|a| json!({ "attendance": a })),
            )
        }
        AttendanceCommands::Report { division, from, to } => {
            let mut query = vec![("divisionId", division.to_string()), ("startDate", from)];
            if let Some(to) = to {
                query.push(("endDate", to));
            }
            let response = client.get("/api/attendance/report", &query).await?;
            if items(&response, "report").is_empty() {
                return output_empty_collection(output_format, "report", "No attendance in this range");
            }
            output_value(output_format, &response, |value| {
                println!("{:<24} {:>8} {:>8}", "Student", "Present", "Absent");
                for row in items(value, "report") {
                    println!(
                        "{:<24} {:>8} {:>8}",
                        cell(row, "studentName"),
                        cell(row, "present"),
                        cell(row, "absent")
                    );
                }
            })
        }
    }
}
