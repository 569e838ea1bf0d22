// Output renderers: the same Report value as console text, HTML or JSON

mod console;
pub mod html;
mod json;

pub use console::ConsoleRenderer;
pub use html::HtmlRenderer;
pub use json::JsonRenderer;

use crate::error::ReportError;
use crate::models::Report;
use crate::report::TargetOutcome;

pub trait ReportRenderer: Send + Sync {
    fn content_type(&self) -> &'static str;

    fn render_report(&self, report: &Report) -> String;

    fn render_failure(&self, name: &str, error: &ReportError) -> String;

    /// Every outcome in request order.
    fn render_batch(&self, outcomes: &[TargetOutcome]) -> String {
        outcomes
            .iter()
            .map(|o| match &o.result {
                Ok(report) => self.render_report(report),
                Err(e) => self.render_failure(&o.name, e),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Console,
    Html,
    Json,
}

impl OutputFormat {
    pub fn renderer(&self) -> Box<dyn ReportRenderer> {
        match self {
            OutputFormat::Console => Box::new(ConsoleRenderer),
            OutputFormat::Html => Box::new(HtmlRenderer),
            OutputFormat::Json => Box::new(JsonRenderer),
        }
    }
}
