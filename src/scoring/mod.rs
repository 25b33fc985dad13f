pub mod coerce;
pub mod config;
pub mod criteria;
pub mod engine;
pub mod error;
pub mod preference;
pub mod validation;
pub mod weights;

pub use coerce::{coerce_metric, MetricValue};
pub use config::{PreferenceInput, ScoringConfig};
pub use criteria::Criterion;
pub use engine::{
    round2, score_and_rank, CriterionContribution, Exclusion, ExclusionReport, RankedTable,
    RegionRecord, ScoreOptions, ScoredRegion, ScoringEngine, DEFAULT_TOP_N,
};
pub use error::{CoercionError, ExclusionReason, PreferenceError, ScoringError};
pub use preference::{resolve_weights, resolve_weights_for, ImportanceLabel, RawPreference};
pub use validation::{validate_scoring, ScoringSettings};
pub use weights::PreferenceVector;
