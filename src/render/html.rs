// HTML report: one two-column table per section

use super::ReportRenderer;
use crate::error::ReportError;
use crate::models::Report;
use crate::report::TargetOutcome;

const STYLE: &str = r#"<style>
p {
    font-family: Verdana, Geneva, sans-serif;
    font-size: 14px;
    color: #084B8A;
    font-weight: bold
}
p.error {
    color: #B40404;
}
table {
    width: 70%;
    font-family: Verdana, Geneva, sans-serif;
    font-size: 12px
}
table,th,td {
    border: 1px solid white;
    border-collapse: collapse;
    padding: 5px;
}
th {
    background-color: #084B8A;
    color: white;
    text-align: left;
}
tr:nth-child(odd) {
    background-color: #EFF5FB;
}
</style>"#;

/// Row whose value is emphasized.
const VM_NAME_LABEL: &str = "Virtual Machine Name";

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Complete document around an already rendered body.
pub fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n{}\n</head>\n<body>\n{}</body>\n</html>\n",
        escape(title),
        STYLE,
        body
    )
}

pub struct HtmlRenderer;

impl ReportRenderer for HtmlRenderer {
    fn content_type(&self) -> &'static str {
        "text/html; charset=utf-8"
    }

    fn render_report(&self, report: &Report) -> String {
        let mut out = String::new();
        out.push_str(&format!("<p>{}</p>\n", escape(&report.note())));
        for section in &report.sections {
            out.push_str(&format!("<p>{}</p>\n<table>\n", escape(&section.title)));
            for row in &section.rows {
                let value = row.lines().map(escape).collect::<Vec<_>>().join("<br/>");
                let value = if row.label == VM_NAME_LABEL {
                    format!("<b>{}</b>", value)
                } else {
                    value
                };
                out.push_str(&format!(
                    "<tr>\n<td width=\"40%\"><b>{}</b></td>\n<td width=\"60%\">{}</td>\n</tr>\n",
                    escape(&row.label),
                    value
                ));
            }
            out.push_str("</table>\n");
        }
        out
    }

    fn render_failure(&self, _name: &str, error: &ReportError) -> String {
        format!(
            "<p class=\"error\">ERROR: {}</p>\n",
            escape(&error.to_string())
        )
    }

    fn render_batch(&self, outcomes: &[TargetOutcome]) -> String {
        let body: String = outcomes
            .iter()
            .map(|o| match &o.result {
                Ok(report) => self.render_report(report),
                Err(e) => self.render_failure(&o.name, e),
            })
            .collect();
        page("Virtual machine report", &body)
    }
}
