use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Main scoring configuration.
///
/// Preferences are keyed by criterion name and accept either a slider value
/// (0-5) or one of the four importance labels.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   preferences:
///     housing: 5
///     climate: "Très important"
///     tourism: 2
///     development: "Peu important"
///   top_n: 10
///   normalize: true
///   display_metrics: [climate, tourism]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Raw preference per criterion. Criteria left out count as 0.
    #[serde(default)]
    pub preferences: BTreeMap<String, PreferenceInput>,

    /// Number of regions to keep (default: 10)
    #[serde(default)]
    pub top_n: Option<usize>,

    /// Add a 0-1 rescaled score computed over every scored region
    #[serde(default)]
    pub normalize: Option<bool>,

    /// Criteria taking part in the composite (default: all four)
    #[serde(default)]
    pub criteria: Option<Vec<String>>,

    /// Criteria whose raw metrics are shown next to the score
    #[serde(default)]
    pub display_metrics: Option<Vec<String>>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let preferences = super::Criterion::ALL
            .iter()
            .map(|c| (c.name().to_string(), PreferenceInput::Number(5.0)))
            .collect();
        Self {
            preferences,
            top_n: Some(super::DEFAULT_TOP_N),
            normalize: Some(false),
            criteria: None,
            display_metrics: None,
        }
    }
}

/// Preference as written in the config file or on the command line.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum PreferenceInput {
    Number(f64),
    Text(String),
}

impl PreferenceInput {
    /// Numbers (with `.` or `,` as decimal separator) become `Number`,
    /// everything else is kept as text
    pub fn from_arg(s: &str) -> Self {
        match s.trim().replace(',', ".").parse::<f64>() {
            Ok(n) => PreferenceInput::Number(n),
            Err(_) => PreferenceInput::Text(s.to_string()),
        }
    }
}
