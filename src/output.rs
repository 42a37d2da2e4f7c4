// src/output.rs
// =============================================================================
// Text formatting for the listing and the repository detail.
//
// Each image becomes one line with three columns:
//
//   nginx:1.25-alpine                                  16.32Mib             2024-04-30 08:15:00
//   |<---------------- 50 ---------------->|           |<------ 20 ------>| |<------ 20 ------>|
//
// The same lines go either straight to stdout (batch mode) or into the pager.
// =============================================================================

use crate::hub::{Detail, Image};

const MIB: f64 = 1024.0 * 1024.0;
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// The column header, without a trailing newline
pub fn format_header() -> String {
    format!("{:<50} {:<20}{:<20}", "Name", "Size", "Created")
}

// One listing line, without a trailing newline
pub fn format_image(image: &Image) -> String {
    let name = format!("{}:{}", image.repository, image.tag);
    let size = format!("{:.2}Mib", image.size as f64 / MIB);
    let created = match image.created {
        Some(created) => created.format(TIME_FORMAT).to_string(),
        None => "-".to_string(),
    };

    format!("{:<50} {:<20} {:<20}", name, size, created)
}

// A few lines summarising the repository, printed above the description
pub fn format_detail_summary(detail: &Detail) -> String {
    let mut lines = vec![format!("{}/{}", detail.namespace, detail.name)];

    if let Some(description) = detail.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(description.to_string());
    }

    lines.push(format!("Stars: {}  Pulls: {}", detail.star_count, detail.pull_count));

    if let Some(updated) = detail.last_updated {
        lines.push(format!("Last updated: {}", updated.format(TIME_FORMAT)));
    }

    lines.join("\n")
}
