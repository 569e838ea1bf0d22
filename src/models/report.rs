// Presentational report: ordered sections of label/value rows

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub label: String,
    /// Formatted value; multi-line values (one device per line) use '\n'.
    pub value: String,
}

impl ReportRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.value.split('\n')
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSection {
    pub title: String,
    pub rows: Vec<ReportRow>,
}

impl ReportSection {
    pub fn new(title: impl Into<String>, rows: Vec<ReportRow>) -> Self {
        Self {
            title: title.into(),
            rows,
        }
    }

    pub fn row(&self, label: &str) -> Option<&ReportRow> {
        self.rows.iter().find(|r| r.label == label)
    }
}

/// Built fresh per target entity; discarded after rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub entity_name: String,
    pub lookback_minutes: u32,
    pub sections: Vec<ReportSection>,
}

impl Report {
    pub fn section(&self, title: &str) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.title == title)
    }

    /// First row with this label in any section.
    pub fn row(&self, label: &str) -> Option<&ReportRow> {
        self.sections.iter().find_map(|s| s.row(label))
    }

    pub fn note(&self) -> String {
        format!(
            "NOTE: Any VM statistics are averages of the last {} minutes",
            self.lookback_minutes
        )
    }
}
