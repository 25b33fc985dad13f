use super::coerce::{coerce_metric, MetricValue};
use super::criteria::{distinct, Criterion};
use super::error::{ExclusionReason, ScoringError};
use super::weights::PreferenceVector;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Number of regions shown when the caller does not ask for a specific count
pub const DEFAULT_TOP_N: usize = 10;

/// One row of the scores table: a region name and its raw sub-scores.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionRecord {
    pub name: String,
    pub metrics: BTreeMap<Criterion, MetricValue>,
}

impl RegionRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metrics: BTreeMap::new(),
        }
    }

    pub fn with_metric(mut self, criterion: Criterion, value: impl Into<MetricValue>) -> Self {
        self.metrics.insert(criterion, value.into());
        self
    }

    /// Build a record from values given in `Criterion::ALL` order
    pub fn from_values<V: Into<MetricValue>>(name: impl Into<String>, values: [V; 4]) -> Self {
        Criterion::ALL
            .into_iter()
            .zip(values)
            .fold(Self::new(name), |record, (c, v)| record.with_metric(c, v))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionContribution {
    pub criterion: Criterion,
    pub metric: f64,
    pub weight: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRegion {
    pub name: String,
    /// Position of the row in the input table
    pub input_index: usize,
    /// Weighted sum rounded to 2 decimals. Ranking key.
    pub composite: f64,
    /// Min-max rescaled composite in [0, 1], when requested
    pub rescaled: Option<f64>,
    pub breakdown: Vec<CriterionContribution>,
}

impl ScoredRegion {
    /// Score shown to the user: rescaled if available, composite otherwise
    pub fn display_score(&self) -> f64 {
        self.rescaled.unwrap_or(self.composite)
    }

    /// Coerced metric value for a criterion
    pub fn metric(&self, criterion: Criterion) -> Option<f64> {
        self.breakdown
            .iter()
            .find(|c| c.criterion == criterion)
            .map(|c| c.metric)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Exclusion {
    pub input_index: usize,
    pub name: String,
    pub reason: ExclusionReason,
}

/// Rows left out of a scoring pass, in input order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExclusionReport {
    excluded: Vec<Exclusion>,
}

impl ExclusionReport {
    fn push(&mut self, exclusion: Exclusion) {
        tracing::warn!(
            row = exclusion.input_index,
            region = %exclusion.name,
            reason = %exclusion.reason,
            "excluding row from scoring"
        );
        self.excluded.push(exclusion);
    }

    pub fn count(&self) -> usize {
        self.excluded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.excluded.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Exclusion> {
        self.excluded.iter()
    }

    /// Names of the excluded rows
    pub fn names(&self) -> Vec<&str> {
        self.excluded.iter().map(|e| e.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreOptions {
    /// Maximum number of regions to keep; 0 yields an empty table
    pub top_n: usize,
    /// Add a min-max rescaled score over the whole scored set
    pub normalize: bool,
    /// Criteria the caller wants charted; carried through untouched
    pub display_metrics: Vec<Criterion>,
}

impl Default for ScoreOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            normalize: false,
            display_metrics: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedTable {
    /// Top regions, best first
    pub regions: Vec<ScoredRegion>,
    /// Number of rows that were scored, before the top-N cut
    pub scored_count: usize,
    pub exclusions: ExclusionReport,
    pub normalized: bool,
    pub display_metrics: Vec<Criterion>,
}

impl RankedTable {
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.regions.iter().map(|r| r.name.as_str()).collect()
    }
}

/// Weighted scoring over a configurable set of criteria.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringEngine {
    criteria: Vec<Criterion>,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self {
            criteria: Criterion::ALL.to_vec(),
        }
    }
}

impl ScoringEngine {
    pub fn new(criteria: &[Criterion]) -> Result<Self, ScoringError> {
        let criteria = distinct(criteria);
        if criteria.is_empty() {
            return Err(ScoringError::NoCriteria);
        }
        Ok(Self { criteria })
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// Score every row, rank best first and keep the top `options.top_n`.
    ///
    /// Rows whose metrics cannot be coerced are excluded and reported. Equal
    /// composites keep their input order. Rescaling, when requested, uses the
    /// minimum and maximum of all scored rows and never changes the order.
    pub fn score_and_rank(
        &self,
        table: &[RegionRecord],
        weights: &PreferenceVector,
        options: &ScoreOptions,
    ) -> Result<RankedTable, ScoringError> {
        let weights = self.check_weights(weights)?;

        let mut exclusions = ExclusionReport::default();
        let mut scored = Vec::with_capacity(table.len());
        let mut seen_names: HashSet<&str> = HashSet::new();

        for (input_index, record) in table.iter().enumerate() {
            let result = if record.name.trim().is_empty() {
                Err(ExclusionReason::BlankName)
            } else if seen_names.contains(record.name.as_str()) {
                Err(ExclusionReason::DuplicateName)
            } else {
                self.score_region(record, &weights)
            };

            match result {
                Ok((composite, breakdown)) => {
                    seen_names.insert(record.name.as_str());
                    scored.push(ScoredRegion {
                        name: record.name.clone(),
                        input_index,
                        composite,
                        rescaled: None,
                        breakdown,
                    });
                }
                Err(reason) => exclusions.push(Exclusion {
                    input_index,
                    name: record.name.clone(),
                    reason,
                }),
            }
        }

        if options.normalize {
            rescale(&mut scored);
        }

        // Primary: composite descending. sort_by is stable, so ties keep input order.
        scored.sort_by(|a, b| b.composite.total_cmp(&a.composite));

        let scored_count = scored.len();
        scored.truncate(options.top_n);

        tracing::debug!(
            rows = table.len(),
            scored = scored_count,
            excluded = exclusions.count(),
            kept = scored.len(),
            "scoring pass complete"
        );

        Ok(RankedTable {
            regions: scored,
            scored_count,
            exclusions,
            normalized: options.normalize,
            display_metrics: options.display_metrics.clone(),
        })
    }

    /// Look up a usable weight for every configured criterion
    fn check_weights(&self, weights: &PreferenceVector) -> Result<Vec<(Criterion, f64)>, ScoringError> {
        let mut checked = Vec::with_capacity(self.criteria.len());
        for criterion in &self.criteria {
            let weight = weights
                .get(*criterion)
                .ok_or(ScoringError::MissingWeight(*criterion))?;
            if !weight.is_finite() || weight < 0.0 {
                return Err(ScoringError::InvalidWeight {
                    criterion: *criterion,
                    weight,
                });
            }
            checked.push((*criterion, weight));
        }

        let total: f64 = checked.iter().map(|(_, w)| w).sum();
        if (total - 1.0).abs() > 1e-9 {
            tracing::debug!(total, "weights do not sum to 1, scores are not on the metric scale");
        }
        Ok(checked)
    }

    fn score_region(
        &self,
        record: &RegionRecord,
        weights: &[(Criterion, f64)],
    ) -> Result<(f64, Vec<CriterionContribution>), ExclusionReason> {
        let mut breakdown = Vec::with_capacity(weights.len());
        let mut total = 0.0;

        for (criterion, weight) in weights {
            let raw = record.metrics.get(criterion).unwrap_or(&MetricValue::Missing);
            let metric = coerce_metric(raw).map_err(|source| ExclusionReason::InvalidMetric {
                criterion: *criterion,
                source,
            })?;
            let contribution = metric * weight;
            total += contribution;
            breakdown.push(CriterionContribution {
                criterion: *criterion,
                metric,
                weight: *weight,
                contribution,
            });
        }

        Ok((round2(total), breakdown))
    }
}

/// Score and rank with the default four-criterion engine.
pub fn score_and_rank(
    table: &[RegionRecord],
    weights: &PreferenceVector,
    top_n: usize,
    normalize: bool,
) -> Result<RankedTable, ScoringError> {
    ScoringEngine::default().score_and_rank(
        table,
        weights,
        &ScoreOptions {
            top_n,
            normalize,
            display_metrics: Vec::new(),
        },
    )
}

/// Round to 2 decimals, half away from zero.
///
/// Applied to the binary value, so 1.005 (stored as 1.00499...) rounds to 1.0.
/// Magnitudes of 1e15 and above have no hundredths to round and are returned
/// as is, which also keeps `value * 100.0` from overflowing.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= 1e15 {
        return value;
    }
    // Adding 0.0 turns -0.0 into 0.0
    (value * 100.0).round() / 100.0 + 0.0
}

/// Min-max rescale composites to [0, 1] in place. A constant set maps to 0.
fn rescale(scored: &mut [ScoredRegion]) {
    let Some(first) = scored.first() else {
        return;
    };
    let (min, max) = scored
        .iter()
        .fold((first.composite, first.composite), |(lo, hi), r| {
            (lo.min(r.composite), hi.max(r.composite))
        });
    tracing::debug!(min, max, "rescaling composite scores");

    // Halving is exact, and keeps the span finite for extreme composites
    let halved = !(max - min).is_finite();
    let scale = |v: f64| if halved { v / 2.0 } else { v };
    let (lo, span) = (scale(min), scale(max) - scale(min));

    for region in scored.iter_mut() {
        region.rescaled = Some(if max == min {
            0.0
        } else {
            ((scale(region.composite) - lo) / span).clamp(0.0, 1.0)
        });
    }
}
