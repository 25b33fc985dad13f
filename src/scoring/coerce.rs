use super::error::CoercionError;

/// A raw metric cell as it arrives from the scores table.
///
/// Columns are sometimes already numeric and sometimes text with a French
/// decimal comma ("3,5").
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Number(f64),
    Text(String),
    Missing,
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Number(value)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::Text(value.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(value: String) -> Self {
        MetricValue::Text(value)
    }
}

impl<T: Into<MetricValue>> From<Option<T>> for MetricValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(MetricValue::Missing)
    }
}

/// Convert a raw metric to a finite number.
///
/// Text is trimmed and a comma decimal separator is replaced by a period
/// before parsing.
pub fn coerce_metric(value: &MetricValue) -> Result<f64, CoercionError> {
    let number = match value {
        MetricValue::Number(n) => *n,
        MetricValue::Missing => return Err(CoercionError::Missing),
        MetricValue::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(CoercionError::Missing);
            }
            trimmed
                .replace(',', ".")
                .parse::<f64>()
                .map_err(|_| CoercionError::NotNumeric(text.clone()))?
        }
    };

    if number.is_finite() {
        Ok(number)
    } else {
        Err(CoercionError::NotFinite(number))
    }
}
