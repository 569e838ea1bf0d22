// Performance counter catalog: "<group>.<metric>.<rollup>" -> endpoint counter id

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{ReportError, Result};

/// One counter as listed by the monitoring endpoint for the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub group: String,
    pub name: String,
    pub rollup: String,
    pub id: i32,
}

impl CatalogEntry {
    pub fn full_name(&self) -> String {
        format!("{}.{}.{}", self.group, self.name, self.rollup)
    }
}

/// Immutable name -> id mapping built once per session.
#[derive(Debug, Clone, Default)]
pub struct CounterCatalog {
    ids: HashMap<String, i32>,
}

impl CounterCatalog {
    /// Builds the catalog from the endpoint listing. Duplicate names: the later entry wins.
    pub fn resolve(entries: &[CatalogEntry]) -> Self {
        let mut ids = HashMap::with_capacity(entries.len());
        for entry in entries {
            ids.insert(entry.full_name(), entry.id);
        }
        Self { ids }
    }

    pub fn lookup(&self, name: &str) -> Result<i32> {
        self.ids
            .get(name)
            .copied()
            .ok_or_else(|| ReportError::UnknownCounter {
                name: name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
