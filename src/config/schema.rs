use crate::scoring::{Criterion, ScoringConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// JSON scores table to rank when `--data` is not given
    #[serde(default)]
    pub data: Option<PathBuf>,

    #[serde(default)]
    pub columns: ColumnMap,

    #[serde(default)]
    pub scoring: Option<ScoringConfig>,
}

/// Where each field lives in the scores table.
///
/// Unset criterion columns fall back to the warehouse names
/// (`immo_score`, `climate_score`, `tourism_score`, `dev_score`).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ColumnMap {
    #[serde(default = "default_key_column")]
    pub key: String,
    #[serde(default)]
    pub housing: Option<String>,
    #[serde(default)]
    pub climate: Option<String>,
    #[serde(default)]
    pub tourism: Option<String>,
    #[serde(default)]
    pub development: Option<String>,
}

fn default_key_column() -> String {
    "department_name".to_string()
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            key: default_key_column(),
            housing: None,
            climate: None,
            tourism: None,
            development: None,
        }
    }
}

impl ColumnMap {
    pub fn column_for(&self, criterion: Criterion) -> &str {
        let configured = match criterion {
            Criterion::Housing => &self.housing,
            Criterion::Climate => &self.climate,
            Criterion::Tourism => &self.tourism,
            Criterion::Development => &self.development,
        };
        configured
            .as_deref()
            .unwrap_or_else(|| criterion.default_column())
    }
}
