//! Console rendering of analysis results

use std::fmt::Write as _;

use crate::analyser::Analysis;
use crate::models::{Entry, EntryId};

/// Spaces appended to every table cell
const PADDING: usize = 5;

const HEADERS: [&str; 5] = ["ID", "Requirement", "Test Case", "Duration (sec)", "Status"];

#[derive(Debug, Clone, Copy)]
pub struct Printer {
    /// Aligned table when `true`, one plain line per entry otherwise
    pub formatting: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self { formatting: true }
    }
}

impl Printer {
    pub fn new(formatting: bool) -> Self {
        Self { formatting }
    }

    pub fn display_results(&self, analysis: &Analysis<'_>) {
        print!("{}", self.render(analysis));
    }

    pub fn render(&self, analysis: &Analysis<'_>) -> String {
        let mut out = String::new();
        let counts = analysis.case_counts;

        let _ = writeln!(out, "\nTotal Duration: {:.3} Seconds.", analysis.total_duration);
        let _ = writeln!(
            out,
            "Total Amount of Cases: {} ({} Parsed, {} Skipped).",
            counts.total, counts.parsed, counts.skipped
        );

        out.push_str("Status Counts (Parsed Cases Only):\n");
        if analysis.status_counts.is_empty() {
            out.push_str("  No status data available.\n");
        }
        for (status, count) in &analysis.status_counts {
            let _ = writeln!(out, "  {}: {}", status, count);
        }

        if analysis.top_entries.is_empty() {
            return out;
        }
        let _ = writeln!(out, "Top {} (Longest Tests):\n", analysis.top_entries.len());

        if self.formatting {
            out.push_str(&render_table(&analysis.top_entries));
        } else {
            out.push_str(&render_plain(&analysis.top_entries));
        }
        out
    }
}

fn cells(rank: usize, entry: &Entry) -> [String; 5] {
    [
        format!("{}.", rank),
        entry.requirement.clone(),
        entry.test_case.clone(),
        format!("{:.3}", entry.duration),
        entry.status.clone(),
    ]
}

/// Width of each column: the widest of header and cells, plus padding
fn column_widths(rows: &[[String; 5]]) -> [usize; 5] {
    let mut widths = HEADERS.map(str::len);
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    widths.map(|w| w + PADDING)
}

/// Pads every cell, then right-aligns the ID column and left-aligns the rest
fn format_row(cells: &[&str; 5], widths: &[usize; 5]) -> String {
    let pad = " ".repeat(PADDING);
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths.iter()).enumerate() {
        let padded = format!("{}{}", cell, pad);
        if i == 0 {
            let _ = write!(line, "{:>width$}", padded, width = *width);
        } else {
            let _ = write!(line, "{:<width$}", padded, width = *width);
        }
    }
    line
}

fn render_table(top_entries: &[(EntryId, &Entry)]) -> String {
    let rows: Vec<[String; 5]> = top_entries
        .iter()
        .enumerate()
        .map(|(i, (_, entry))| cells(i + 1, entry))
        .collect();
    let widths = column_widths(&rows);
    let separator = "-".repeat(widths.iter().sum());

    let mut out = String::new();
    let _ = writeln!(out, "{}", format_row(&HEADERS, &widths));
    let _ = writeln!(out, "{}", separator);
    for row in &rows {
        let row_refs = [
            row[0].as_str(),
            row[1].as_str(),
            row[2].as_str(),
            row[3].as_str(),
            row[4].as_str(),
        ];
        let _ = writeln!(out, "{}", format_row(&row_refs, &widths));
    }
    let _ = writeln!(out, "{}\n", separator);
    out
}

fn render_plain(top_entries: &[(EntryId, &Entry)]) -> String {
    let mut out = String::new();
    for (i, (_, entry)) in top_entries.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. Requirement: {}, Test Case: {}, Duration: {:.3} sec, Status: {}",
            i + 1,
            entry.requirement,
            entry.test_case,
            entry.duration,
            entry.status
        );
    }
    out.push('\n');
    out
}
