use super::criteria::Criterion;
use thiserror::Error;

/// Errors raised while turning raw preferences into weights.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreferenceError {
    #[error("unrecognized preference label '{0}'")]
    InvalidLabel(String),

    #[error("preference for {criterion} must be between 0 and 5, got {value}")]
    OutOfRange { criterion: Criterion, value: f64 },

    #[error("cannot resolve weights for an empty criterion set")]
    NoCriteria,
}

/// Why a single metric cell could not be turned into a number.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoercionError {
    #[error("value is missing")]
    Missing,

    #[error("'{0}' is not a number")]
    NotNumeric(String),

    #[error("value {0} is not finite")]
    NotFinite(f64),
}

/// Fatal scoring errors. These abort the pass; no partial table is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("no weight provided for criterion '{0}'")]
    MissingWeight(Criterion),

    #[error("weight for criterion '{criterion}' must be a non-negative number, got {weight}")]
    InvalidWeight { criterion: Criterion, weight: f64 },

    #[error("scoring engine needs at least one criterion")]
    NoCriteria,
}

/// Why a row was left out of a scoring pass. Not fatal; collected in the exclusion report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExclusionReason {
    #[error("{criterion}: {source}")]
    InvalidMetric {
        criterion: Criterion,
        source: CoercionError,
    },

    #[error("region name is blank")]
    BlankName,

    #[error("region name already scored earlier in the table")]
    DuplicateName,
}
