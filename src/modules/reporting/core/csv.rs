// Minimal CSV rendering of the detail report.

use crate::modules::reporting::core::rows::TimeEntryDetail;

pub const CSV_HEADER: &str =
    "date,userId,userEmail,projectId,projectName,taskId,taskName,minutes,hoursDecimal,notes";

fn field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn hours_decimal(minutes: i32) -> String {
    format!("{:.2}", f64::from(minutes) / 60.0)
}

pub fn render(entries: &[TimeEntryDetail]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for entry in entries {
        let line = [
            field(&entry.work_date),
            entry.user_id.to_string(),
            field(entry.user_email.as_deref().unwrap_or_default()),
            entry.project_id.map(|id| id.to_string()).unwrap_or_default(),
            field(entry.project_name.as_deref().unwrap_or_default()),
            entry.task_id.to_string(),
            field(entry.task_name.as_deref().unwrap_or_default()),
            entry.minutes.to_string(),
            hours_decimal(entry.minutes),
            field(entry.notes.as_deref().unwrap_or_default()),
        ]
        .join(",");
        out.push_str(&line);
        out.push('\n');
    }
    out
}
