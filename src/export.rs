// Export artifacts: JSON documents, CSV views and Markdown minutes

use eyre::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::aggregate::AgendaSummary;
use crate::models::{AgendaItem, Meeting};
use crate::record::Record;

/// Pretty-printed JSON array; images are embedded as base64
pub fn to_json<R: Serialize>(records: &[R]) -> Result<String> {
    serde_json::to_string_pretty(records).context("Failed to serialize records")
}

/// CSV with a header of the record's export columns
///
/// Binary image payloads are never part of the columns.
pub fn to_csv<R: Record>(records: &[&R]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(R::columns().iter().map(|c| csv_escape(c)).collect::<Vec<_>>().join(","));

    for record in records {
        let row: Vec<String> = R::columns()
            .iter()
            .map(|column| {
                record
                    .field(column)
                    .map(|v| csv_escape(&v.to_string()))
                    .unwrap_or_default()
            })
            .collect();
        lines.push(row.join(","));
    }

    lines.join("\n")
}

/// Wrap in quotes if the value contains a comma, quote, or line break
fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Meeting minutes: header, agenda table and total duration
pub fn agenda_markdown(meeting: &Meeting, items: &[&AgendaItem]) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {}\n\n", meeting.title));
    out.push_str(&format!("- **Date:** {}\n", meeting.date.format("%Y-%m-%d")));
    out.push_str(&format!("- **Time zone:** {}\n", meeting.timezone));
    out.push_str(&format!("- **Location:** {}\n", meeting.location));
    if !meeting.host.is_empty() {
        out.push_str(&format!("- **Host:** {}\n", meeting.host));
    }
    if !meeting.link.is_empty() {
        out.push_str(&format!("- **Link:** {}\n", meeting.link));
    }

    out.push_str("\n## Agenda\n\n");
    if items.is_empty() {
        out.push_str("_No agenda items._\n");
        return out;
    }

    out.push_str("| # | Start | End | Min | Type | Topic | Owner | Objective |\n");
    out.push_str("|---|---|---|---|---|---|---|---|\n");
    for (n, item) in items.iter().enumerate() {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} | {} |\n",
            n + 1,
            item.start.format("%H:%M"),
            item.end.format("%H:%M"),
            item.minutes,
            item.kind,
            md_cell(&item.topic),
            md_cell(&item.owner),
            md_cell(&item.objective),
        ));
    }

    let summary = AgendaSummary::of(items.iter().copied());
    out.push_str(&format!("\n**Total:** {} min\n", summary.total_minutes));
    out
}

fn md_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

/// Write an export artifact to disk
pub fn write_artifact(path: &Path, contents: &str) -> Result<()> {
    let mut file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write {:?}", path))?;
    file.sync_all()?;

    info!(file = ?path, bytes = contents.len(), "Wrote export");
    Ok(())
}
