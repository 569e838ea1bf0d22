// JSON report output via serde_json

use serde::Serialize;

use super::ReportRenderer;
use crate::error::ReportError;
use crate::models::Report;
use crate::report::TargetOutcome;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutcome<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a Report>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> JsonOutcome<'a> {
    fn from_outcome(o: &'a TargetOutcome) -> Self {
        match &o.result {
            Ok(report) => Self {
                name: &o.name,
                report: Some(report),
                error: None,
            },
            Err(e) => Self {
                name: &o.name,
                report: None,
                error: Some(e.to_string()),
            },
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\":\"serializing report: {}\"}}", e))
}

pub struct JsonRenderer;

impl ReportRenderer for JsonRenderer {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn render_report(&self, report: &Report) -> String {
        to_json(report)
    }

    fn render_failure(&self, name: &str, error: &ReportError) -> String {
        to_json(&JsonOutcome {
            name,
            report: None,
            error: Some(error.to_string()),
        })
    }

    fn render_batch(&self, outcomes: &[TargetOutcome]) -> String {
        let items: Vec<JsonOutcome<'_>> = outcomes.iter().map(JsonOutcome::from_outcome).collect();
        to_json(&items)
    }
}
