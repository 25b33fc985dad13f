use super::config::{PreferenceInput, ScoringConfig};
use super::criteria::Criterion;
use super::engine::{ScoreOptions, DEFAULT_TOP_N};
use super::preference::{RawPreference, MAX_SLIDER};
use std::collections::BTreeMap;

/// Typed scoring settings, ready for the resolver and the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringSettings {
    pub criteria: Vec<Criterion>,
    pub preferences: BTreeMap<Criterion, RawPreference>,
    pub options: ScoreOptions,
}

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<ScoringSettings, Vec<String>> {
    let mut errors = Vec::new();

    let criteria = match config.criteria {
        Some(ref names) => {
            let parsed = parse_criteria("scoring.criteria", names, &mut errors);
            if names.is_empty() {
                errors.push("scoring.criteria: must name at least one criterion".to_string());
            }
            parsed
        }
        None => Criterion::ALL.to_vec(),
    };

    let mut preferences = BTreeMap::new();
    for (key, input) in &config.preferences {
        let criterion = match key.parse::<Criterion>() {
            Ok(c) => c,
            Err(e) => {
                errors.push(format!("scoring.preferences.{}: {}", key, e));
                continue;
            }
        };

        let raw = match input {
            PreferenceInput::Number(n) => RawPreference::Numeric(*n),
            PreferenceInput::Text(s) => match s.parse::<RawPreference>() {
                Ok(raw) => raw,
                Err(e) => {
                    errors.push(format!("scoring.preferences.{}: {}", key, e));
                    continue;
                }
            },
        };

        if let RawPreference::Numeric(n) = raw {
            if !(n.is_finite() && (0.0..=MAX_SLIDER).contains(&n)) {
                errors.push(format!(
                    "scoring.preferences.{}: must be between 0 and {}, got {}",
                    key, MAX_SLIDER, n
                ));
                continue;
            }
        }

        if preferences.insert(criterion, raw).is_some() {
            errors.push(format!(
                "scoring.preferences.{}: criterion '{}' is set more than once",
                key, criterion
            ));
        }
    }

    let display_metrics = match config.display_metrics {
        Some(ref names) => parse_criteria("scoring.display_metrics", names, &mut errors),
        None => Vec::new(),
    };
    for metric in &display_metrics {
        if !criteria.contains(metric) {
            errors.push(format!(
                "scoring.display_metrics: '{}' is not one of the scored criteria",
                metric
            ));
        }
    }

    if errors.is_empty() {
        Ok(ScoringSettings {
            criteria,
            preferences,
            options: ScoreOptions {
                top_n: config.top_n.unwrap_or(DEFAULT_TOP_N),
                normalize: config.normalize.unwrap_or(false),
                display_metrics,
            },
        })
    } else {
        Err(errors)
    }
}

fn parse_criteria(field: &str, names: &[String], errors: &mut Vec<String>) -> Vec<Criterion> {
    let mut parsed = Vec::with_capacity(names.len());
    for (i, name) in names.iter().enumerate() {
        match name.parse::<Criterion>() {
            Ok(c) if parsed.contains(&c) => {
                errors.push(format!("{}[{}]: '{}' listed twice", field, i, name));
            }
            Ok(c) => parsed.push(c),
            Err(e) => errors.push(format!("{}[{}]: {}", field, i, e)),
        }
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ImportanceLabel;

    fn config_with_preferences(prefs: &[(&str, PreferenceInput)]) -> ScoringConfig {
        ScoringConfig {
            preferences: prefs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            top_n: None,
            normalize: None,
            criteria: None,
            display_metrics: None,
        }
    }

    #[test]
    fn test_valid_default_config() {
        let settings = validate_scoring(&ScoringConfig::default()).unwrap();
        assert_eq!(settings.criteria, Criterion::ALL.to_vec());
        assert_eq!(settings.preferences.len(), 4);
        assert_eq!(settings.options.top_n, 10);
        assert!(!settings.options.normalize);
    }

    #[test]
    fn test_empty_config() {
        let settings = validate_scoring(&config_with_preferences(&[])).unwrap();
        assert!(settings.preferences.is_empty());
        assert_eq!(settings.options, ScoreOptions::default());
    }

    #[test]
    fn test_label_and_numeric_text() {
        let config = config_with_preferences(&[
            ("climate", PreferenceInput::Text("Peu important".to_string())),
            ("housing", PreferenceInput::Text("4".to_string())),
        ]);
        let settings = validate_scoring(&config).unwrap();
        assert_eq!(
            settings.preferences.get(&Criterion::Climate),
            Some(&RawPreference::Label(ImportanceLabel::SlightlyImportant))
        );
        assert_eq!(
            settings.preferences.get(&Criterion::Housing),
            Some(&RawPreference::Numeric(4.0))
        );
    }

    #[test]
    fn test_unknown_label() {
        let config = config_with_preferences(&[(
            "climate",
            PreferenceInput::Text("Crucial".to_string()),
        )]);
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("scoring.preferences.climate"));
        assert!(errors[0].contains("Crucial"));
    }

    #[test]
    fn test_unknown_criterion() {
        let config = config_with_preferences(&[("beaches", PreferenceInput::Number(3.0))]);
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.preferences.beaches"));
    }

    #[test]
    fn test_out_of_range_slider() {
        let config = config_with_preferences(&[("tourism", PreferenceInput::Number(7.0))]);
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("between 0 and 5"));
    }

    #[test]
    fn test_same_criterion_twice() {
        let config = config_with_preferences(&[
            ("housing", PreferenceInput::Number(1.0)),
            ("Housing", PreferenceInput::Number(2.0)),
        ]);
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("more than once"));
    }

    #[test]
    fn test_criteria_subset_and_display_metrics() {
        let config = ScoringConfig {
            criteria: Some(vec!["housing".to_string(), "climate".to_string()]),
            display_metrics: Some(vec!["climate".to_string()]),
            top_n: Some(3),
            normalize: Some(true),
            ..config_with_preferences(&[])
        };
        let settings = validate_scoring(&config).unwrap();
        assert_eq!(settings.criteria, vec![Criterion::Housing, Criterion::Climate]);
        assert_eq!(settings.options.display_metrics, vec![Criterion::Climate]);
        assert_eq!(settings.options.top_n, 3);
        assert!(settings.options.normalize);
    }

    #[test]
    fn test_display_metric_outside_criteria() {
        let config = ScoringConfig {
            criteria: Some(vec!["housing".to_string()]),
            display_metrics: Some(vec!["tourism".to_string()]),
            ..config_with_preferences(&[])
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.display_metrics"));
    }

    #[test]
    fn test_empty_criteria_list() {
        let config = ScoringConfig {
            criteria: Some(vec![]),
            ..config_with_preferences(&[])
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("at least one"));
    }

    #[test]
    fn test_collects_all_errors() {
        let config = ScoringConfig {
            criteria: Some(vec!["housing".to_string(), "housing".to_string()]),
            ..config_with_preferences(&[
                ("climate", PreferenceInput::Number(-1.0)), // Error 1
                ("climate_score", PreferenceInput::Number(1.0)), // Error 2
            ])
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 3); // plus the duplicated criterion
    }
}
