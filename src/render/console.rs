// Plain text report for terminals

use super::ReportRenderer;
use crate::error::ReportError;
use crate::models::Report;

/// Label column width; values start after "label : ".
const LABEL_WIDTH: usize = 31;

pub struct ConsoleRenderer;

impl ReportRenderer for ConsoleRenderer {
    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }

    fn render_report(&self, report: &Report) -> String {
        let mut out = String::new();
        out.push_str(&report.note());
        out.push_str("\n\n");
        for section in &report.sections {
            out.push_str(&section.title);
            out.push('\n');
            for row in &section.rows {
                let mut lines = row.lines();
                let first = lines.next().unwrap_or_default();
                out.push_str(&format!("{:<width$}: {}\n", row.label, first, width = LABEL_WIDTH));
                for line in lines {
                    out.push_str(&format!("{:<width$}  {}\n", "", line, width = LABEL_WIDTH));
                }
            }
            out.push('\n');
        }
        out
    }

    fn render_failure(&self, _name: &str, error: &ReportError) -> String {
        format!("ERROR: {}\n", error)
    }
}
