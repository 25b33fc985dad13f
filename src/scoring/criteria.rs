use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named scoring dimension.
///
/// The set is fixed; engines may be configured with a subset of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    Housing,
    Climate,
    Tourism,
    Development,
}

impl Criterion {
    /// All criteria in canonical order
    pub const ALL: [Criterion; 4] = [
        Criterion::Housing,
        Criterion::Climate,
        Criterion::Tourism,
        Criterion::Development,
    ];

    /// Stable lowercase name used in config files and CLI flags
    pub fn name(&self) -> &'static str {
        match self {
            Criterion::Housing => "housing",
            Criterion::Climate => "climate",
            Criterion::Tourism => "tourism",
            Criterion::Development => "development",
        }
    }

    /// Human-readable label for tables and breakdowns
    pub fn label(&self) -> &'static str {
        match self {
            Criterion::Housing => "Profitability",
            Criterion::Climate => "Climate",
            Criterion::Tourism => "Tourism",
            Criterion::Development => "Development",
        }
    }

    /// Column holding this criterion's sub-score in the scores table
    pub fn default_column(&self) -> &'static str {
        match self {
            Criterion::Housing => "immo_score",
            Criterion::Climate => "climate_score",
            Criterion::Tourism => "tourism_score",
            Criterion::Development => "dev_score",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Criterion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Criterion::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "unknown criterion '{}' (expected one of: housing, climate, tourism, development)",
                    s
                )
            })
    }
}

/// Drop repeated criteria, keeping first-seen order
pub(crate) fn distinct(criteria: &[Criterion]) -> Vec<Criterion> {
    let mut seen = Vec::with_capacity(criteria.len());
    for criterion in criteria {
        if !seen.contains(criterion) {
            seen.push(*criterion);
        }
    }
    seen
}
