use super::criteria::{distinct, Criterion};
use serde::Serialize;
use std::collections::BTreeMap;

/// Mapping from criterion to weight.
///
/// Vectors produced by the resolver are non-negative and sum to 1. Vectors
/// built by hand with [`PreferenceVector::from_weights`] are not checked here;
/// the scoring engine validates them before use.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct PreferenceVector {
    weights: BTreeMap<Criterion, f64>,
}

impl PreferenceVector {
    /// Every criterion gets `1 / criteria.len()`
    pub fn uniform(criteria: &[Criterion]) -> Self {
        let criteria = distinct(criteria);
        if criteria.is_empty() {
            return Self::default();
        }
        let share = 1.0 / criteria.len() as f64;
        Self {
            weights: criteria.into_iter().map(|c| (c, share)).collect(),
        }
    }

    pub fn from_weights<I>(weights: I) -> Self
    where
        I: IntoIterator<Item = (Criterion, f64)>,
    {
        Self {
            weights: weights.into_iter().collect(),
        }
    }

    pub fn get(&self, criterion: Criterion) -> Option<f64> {
        self.weights.get(&criterion).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Criterion, f64)> + '_ {
        self.weights.iter().map(|(c, w)| (*c, *w))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.weights.values().sum()
    }

    /// True when all weights are non-negative and sum to 1 within `tolerance`
    pub fn is_normalized(&self, tolerance: f64) -> bool {
        self.weights.values().all(|w| *w >= 0.0) && (self.sum() - 1.0).abs() <= tolerance
    }
}
