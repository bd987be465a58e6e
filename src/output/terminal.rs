//! Terminal run summary.

use colored::Colorize;

/// Format a value as a quoted, right-aligned field.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
///
/// # Returns
/// A quoted, right-aligned string
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    let quoted = format!("\"{value_str}\"");
    let quoted_len = quoted.len();

    if quoted_len >= width {
        quoted
    } else {
        format!("{quoted:>width$}")
    }
}

/// Outcome of one group, for the end-of-run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupStatus {
    Written,
    Empty,
    Unavailable(String),
    Failed(String),
}

/// One line of the end-of-run summary.
#[derive(Debug, Clone)]
pub struct SummaryRow {
    pub group: String,
    pub list_name: String,
    pub ipv4: usize,
    pub ipv6: usize,
    pub status: GroupStatus,
}

/// Render one summary row as a CSV line.
pub fn format_summary_row(row: &SummaryRow) -> String {
    let status = match &row.status {
        GroupStatus::Written => "written".to_string(),
        GroupStatus::Empty => "empty".to_string(),
        GroupStatus::Unavailable(e) => format!("unavailable: {e}"),
        GroupStatus::Failed(e) => format!("failed: {e}"),
    };
    format!(
        "{group},{list_name},{ipv4},{ipv6},{status}",
        group = format_field(&row.group, 16),
        list_name = format_field(&row.list_name, 16),
        ipv4 = format_field(row.ipv4, 7),
        ipv6 = format_field(row.ipv6, 7),
        status = format_field(status, 9),
    )
}

/// Print the summary of all groups to stdout.
pub fn print_summary(rows: &[SummaryRow]) {
    println!(
        r#"{},{},{},{},{}"#,
        format_field("group", 16),
        format_field("list_name", 16),
        format_field("ipv4", 7),
        format_field("ipv6", 7),
        format_field("status", 9),
    );
    for row in rows {
        let line = format_summary_row(row);
        match row.status {
            GroupStatus::Written => println!("{line}"),
            GroupStatus::Empty => println!("{}", line.yellow()),
            GroupStatus::Unavailable(_) | GroupStatus::Failed(_) => println!("{}", line.red()),
        }
    }
}
