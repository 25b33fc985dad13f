use super::criteria::{distinct, Criterion};
use super::error::PreferenceError;
use super::weights::PreferenceVector;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Highest value a numeric slider can take
pub const MAX_SLIDER: f64 = 5.0;

/// Qualitative importance, ordered least to most important.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ImportanceLabel {
    NotImportant,
    SlightlyImportant,
    Important,
    VeryImportant,
}

impl ImportanceLabel {
    pub const ALL: [ImportanceLabel; 4] = [
        ImportanceLabel::NotImportant,
        ImportanceLabel::SlightlyImportant,
        ImportanceLabel::Important,
        ImportanceLabel::VeryImportant,
    ];

    /// Integer importance, 1 through 4
    pub fn importance(&self) -> u8 {
        match self {
            ImportanceLabel::NotImportant => 1,
            ImportanceLabel::SlightlyImportant => 2,
            ImportanceLabel::Important => 3,
            ImportanceLabel::VeryImportant => 4,
        }
    }

    /// Label as shown in the dashboard
    pub fn french(&self) -> &'static str {
        match self {
            ImportanceLabel::NotImportant => "Pas important",
            ImportanceLabel::SlightlyImportant => "Peu important",
            ImportanceLabel::Important => "Important",
            ImportanceLabel::VeryImportant => "Très important",
        }
    }

    pub fn english(&self) -> &'static str {
        match self {
            ImportanceLabel::NotImportant => "not important",
            ImportanceLabel::SlightlyImportant => "slightly important",
            ImportanceLabel::Important => "important",
            ImportanceLabel::VeryImportant => "very important",
        }
    }
}

impl fmt::Display for ImportanceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.french())
    }
}

impl FromStr for ImportanceLabel {
    type Err = PreferenceError;

    /// Accepts the French or English label, ignoring surrounding whitespace and case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ImportanceLabel::ALL
            .into_iter()
            .find(|label| label.french().to_lowercase() == wanted || label.english() == wanted)
            .ok_or_else(|| PreferenceError::InvalidLabel(s.to_string()))
    }
}

/// One criterion's raw preference: a slider value or a qualitative label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawPreference {
    Numeric(f64),
    Label(ImportanceLabel),
}

impl RawPreference {
    /// Non-negative importance for this input.
    ///
    /// Numeric inputs must lie in [0, 5].
    pub fn importance(&self, criterion: Criterion) -> Result<f64, PreferenceError> {
        match self {
            RawPreference::Numeric(value) => {
                if value.is_finite() && (0.0..=MAX_SLIDER).contains(value) {
                    Ok(*value)
                } else {
                    Err(PreferenceError::OutOfRange {
                        criterion,
                        value: *value,
                    })
                }
            }
            RawPreference::Label(label) => Ok(label.importance() as f64),
        }
    }
}

impl fmt::Display for RawPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawPreference::Numeric(value) => write!(f, "{}", value),
            RawPreference::Label(label) => write!(f, "{}", label),
        }
    }
}

impl FromStr for RawPreference {
    type Err = PreferenceError;

    /// Numbers become sliders, anything else must be a known label.
    /// A comma decimal separator is accepted, so `3,5` is 3.5.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().replace(',', ".").parse::<f64>() {
            Ok(value) => Ok(RawPreference::Numeric(value)),
            Err(_) => s.parse().map(RawPreference::Label),
        }
    }
}

impl From<ImportanceLabel> for RawPreference {
    fn from(label: ImportanceLabel) -> Self {
        RawPreference::Label(label)
    }
}

impl From<f64> for RawPreference {
    fn from(value: f64) -> Self {
        RawPreference::Numeric(value)
    }
}

/// Resolve raw preferences over the four fixed criteria.
pub fn resolve_weights(
    inputs: &BTreeMap<Criterion, RawPreference>,
) -> Result<PreferenceVector, PreferenceError> {
    resolve_weights_for(&Criterion::ALL, inputs)
}

/// Resolve raw preferences into weights over `criteria`.
///
/// Each weight is the criterion's share of the total importance. A criterion
/// with no input contributes nothing. When the total is zero every criterion
/// gets the same weight. Inputs for criteria outside the set are ignored.
pub fn resolve_weights_for(
    criteria: &[Criterion],
    inputs: &BTreeMap<Criterion, RawPreference>,
) -> Result<PreferenceVector, PreferenceError> {
    let criteria = distinct(criteria);
    if criteria.is_empty() {
        return Err(PreferenceError::NoCriteria);
    }

    let mut importances = Vec::with_capacity(criteria.len());
    for criterion in &criteria {
        let importance = match inputs.get(criterion) {
            Some(raw) => raw.importance(*criterion)?,
            None => 0.0,
        };
        importances.push((*criterion, importance));
    }

    let total: f64 = importances.iter().map(|(_, i)| i).sum();
    if total == 0.0 {
        tracing::debug!("no preference expressed, using uniform weights");
        return Ok(PreferenceVector::uniform(&criteria));
    }

    let weights = PreferenceVector::from_weights(
        importances
            .into_iter()
            .map(|(criterion, importance)| (criterion, importance / total)),
    );
    tracing::debug!(?weights, "resolved preference weights");
    Ok(weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn numeric(values: [f64; 4]) -> BTreeMap<Criterion, RawPreference> {
        Criterion::ALL
            .into_iter()
            .zip(values)
            .map(|(c, v)| (c, RawPreference::Numeric(v)))
            .collect()
    }

    #[test]
    fn test_label_mapping_is_ordered() {
        let values: Vec<u8> = ImportanceLabel::ALL.iter().map(|l| l.importance()).collect();
        assert_eq!(values, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_parse_french_labels() {
        assert_eq!("Pas important".parse::<ImportanceLabel>(), Ok(ImportanceLabel::NotImportant));
        assert_eq!("Peu important".parse::<ImportanceLabel>(), Ok(ImportanceLabel::SlightlyImportant));
        assert_eq!("Important".parse::<ImportanceLabel>(), Ok(ImportanceLabel::Important));
        assert_eq!("Très important".parse::<ImportanceLabel>(), Ok(ImportanceLabel::VeryImportant));
        assert_eq!("  très IMPORTANT ".parse::<ImportanceLabel>(), Ok(ImportanceLabel::VeryImportant));
    }

    #[test]
    fn test_parse_english_labels() {
        assert_eq!("very important".parse::<ImportanceLabel>(), Ok(ImportanceLabel::VeryImportant));
        assert_eq!("Not Important".parse::<ImportanceLabel>(), Ok(ImportanceLabel::NotImportant));
    }

    #[test]
    fn test_parse_unknown_label_names_it() {
        let err = "Indispensable".parse::<ImportanceLabel>().unwrap_err();
        assert_eq!(err, PreferenceError::InvalidLabel("Indispensable".to_string()));
        assert!(err.to_string().contains("Indispensable"));
    }

    #[test]
    fn test_raw_preference_from_str() {
        assert_eq!("3".parse::<RawPreference>(), Ok(RawPreference::Numeric(3.0)));
        assert_eq!("2.5".parse::<RawPreference>(), Ok(RawPreference::Numeric(2.5)));
        assert_eq!(
            "Important".parse::<RawPreference>(),
            Ok(RawPreference::Label(ImportanceLabel::Important))
        );
        assert!("meh".parse::<RawPreference>().is_err());
    }

    #[test]
    fn test_raw_preference_comma_decimal() {
        assert_eq!("3,5".parse::<RawPreference>(), Ok(RawPreference::Numeric(3.5)));
        assert_eq!(" 0,25 ".parse::<RawPreference>(), Ok(RawPreference::Numeric(0.25)));
        assert_eq!(
            "3,5,1".parse::<RawPreference>(),
            Err(PreferenceError::InvalidLabel("3,5,1".to_string()))
        );
    }

    #[test]
    fn test_proportional_weights() {
        let weights = resolve_weights(&numeric([5.0, 3.0, 2.0, 0.0])).unwrap();
        assert!((weights.get(Criterion::Housing).unwrap() - 0.5).abs() < 1e-12);
        assert!((weights.get(Criterion::Climate).unwrap() - 0.3).abs() < 1e-12);
        assert!((weights.get(Criterion::Tourism).unwrap() - 0.2).abs() < 1e-12);
        assert_eq!(weights.get(Criterion::Development), Some(0.0));
    }

    #[test]
    fn test_all_zero_is_uniform() {
        let weights = resolve_weights(&numeric([0.0; 4])).unwrap();
        for c in Criterion::ALL {
            assert_eq!(weights.get(c), Some(0.25));
        }
    }

    #[test]
    fn test_absent_inputs_are_uniform() {
        let weights = resolve_weights(&BTreeMap::new()).unwrap();
        assert_eq!(weights, PreferenceVector::uniform(&Criterion::ALL));
    }

    #[test]
    fn test_absent_criterion_gets_zero_weight() {
        let mut inputs = BTreeMap::new();
        inputs.insert(Criterion::Climate, RawPreference::Numeric(4.0));
        let weights = resolve_weights(&inputs).unwrap();
        assert_eq!(weights.get(Criterion::Climate), Some(1.0));
        assert_eq!(weights.get(Criterion::Housing), Some(0.0));
    }

    #[test]
    fn test_all_max_labels_match_all_zero_numeric() {
        let labels: BTreeMap<_, _> = Criterion::ALL
            .into_iter()
            .map(|c| (c, RawPreference::Label(ImportanceLabel::VeryImportant)))
            .collect();
        let from_labels = resolve_weights(&labels).unwrap();
        let from_zero = resolve_weights(&numeric([0.0; 4])).unwrap();
        assert_eq!(from_labels, from_zero);
    }

    #[test]
    fn test_mixed_labels_and_numbers() {
        let mut inputs = numeric([2.0, 0.0, 0.0, 0.0]);
        inputs.insert(Criterion::Tourism, ImportanceLabel::SlightlyImportant.into());
        let weights = resolve_weights(&inputs).unwrap();
        assert_eq!(weights.get(Criterion::Housing), Some(0.5));
        assert_eq!(weights.get(Criterion::Tourism), Some(0.5));
    }

    #[test]
    fn test_out_of_range_numeric() {
        let err = resolve_weights(&numeric([6.0, 1.0, 1.0, 1.0])).unwrap_err();
        assert_eq!(
            err,
            PreferenceError::OutOfRange {
                criterion: Criterion::Housing,
                value: 6.0
            }
        );
        assert!(resolve_weights(&numeric([-1.0, 1.0, 1.0, 1.0])).is_err());
        assert!(resolve_weights(&numeric([f64::NAN, 1.0, 1.0, 1.0])).is_err());
    }

    #[test]
    fn test_subset_of_criteria() {
        let weights =
            resolve_weights_for(&[Criterion::Housing, Criterion::Climate, Criterion::Tourism], &numeric([0.0; 4]))
                .unwrap();
        assert_eq!(weights.len(), 3);
        assert!((weights.get(Criterion::Housing).unwrap() - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(weights.get(Criterion::Development), None);
    }

    #[test]
    fn test_empty_criteria_rejected() {
        assert_eq!(
            resolve_weights_for(&[], &BTreeMap::new()),
            Err(PreferenceError::NoCriteria)
        );
    }

    fn raw_preference() -> impl Strategy<Value = RawPreference> {
        prop_oneof![
            (0.0..=MAX_SLIDER).prop_map(RawPreference::Numeric),
            (0u8..=5).prop_map(|v| RawPreference::Numeric(v as f64)),
            prop::sample::select(ImportanceLabel::ALL.to_vec()).prop_map(RawPreference::Label),
        ]
    }

    proptest! {
        #[test]
        fn prop_weights_sum_to_one(prefs in prop::collection::vec(raw_preference(), 4)) {
            let inputs: BTreeMap<_, _> = Criterion::ALL.into_iter().zip(prefs).collect();
            let weights = resolve_weights(&inputs).unwrap();
            prop_assert_eq!(weights.len(), 4);
            prop_assert!((weights.sum() - 1.0).abs() < 1e-9);
            for (_, w) in weights.iter() {
                prop_assert!((0.0..=1.0).contains(&w));
            }
        }
    }
}
