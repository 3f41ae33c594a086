use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::condition::Condition;

/// A single timestamped 3-hour forecast point
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Sample {
    /// Unix timestamp (seconds)
    pub timestamp: i64,
    pub temperature: f64,
    /// OpenWeatherMap icon code, e.g. "10d"
    pub condition_code: String,
    pub description: String,
}

impl Sample {
    pub fn new(
        timestamp: i64,
        temperature: f64,
        condition_code: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            temperature,
            condition_code: condition_code.into(),
            description: description.into(),
        }
    }

    /// Build a sample from a decoded feed entry at position `index`.
    ///
    /// The first missing required field is reported; nothing is defaulted
    /// except the description.
    pub fn from_raw<R: RawSample + ?Sized>(index: usize, raw: &R) -> Result<Self, MalformedSampleError> {
        let missing = |field| MalformedSampleError { index, field };

        let timestamp = raw.timestamp().ok_or_else(|| missing(SampleField::Timestamp))?;
        let temperature = raw
            .temperature()
            .ok_or_else(|| missing(SampleField::Temperature))?;
        let condition_code = raw
            .condition_code()
            .filter(|code| !code.is_empty())
            .ok_or_else(|| missing(SampleField::ConditionCode))?;

        Ok(Self {
            timestamp,
            temperature,
            condition_code: condition_code.to_string(),
            description: raw.description().unwrap_or_default().to_string(),
        })
    }

    pub fn condition(&self) -> Condition {
        Condition::from_icon_code(&self.condition_code)
    }
}

/// Accessors over an undecoded-shape forecast entry whose fields may be absent
pub trait RawSample {
    fn timestamp(&self) -> Option<i64>;
    fn temperature(&self) -> Option<f64>;
    fn condition_code(&self) -> Option<&str>;
    fn description(&self) -> Option<&str>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleField {
    Timestamp,
    Temperature,
    ConditionCode,
}

impl std::fmt::Display for SampleField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Timestamp => "timestamp",
            Self::Temperature => "temperature",
            Self::ConditionCode => "condition code",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Forecast sample {index} is missing its {field}")]
pub struct MalformedSampleError {
    pub index: usize,
    pub field: SampleField,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Raw {
        dt: Option<i64>,
        temp: Option<f64>,
        icon: Option<&'static str>,
        description: Option<&'static str>,
    }

    impl RawSample for Raw {
        fn timestamp(&self) -> Option<i64> {
            self.dt
        }
        fn temperature(&self) -> Option<f64> {
            self.temp
        }
        fn condition_code(&self) -> Option<&str> {
            self.icon
        }
        fn description(&self) -> Option<&str> {
            self.description
        }
    }

    fn complete() -> Raw {
        Raw {
            dt: Some(1_700_000_000),
            temp: Some(21.5),
            icon: Some("02d"),
            description: Some("few clouds"),
        }
    }

    #[test]
    fn test_from_raw_complete() {
        let sample = Sample::from_raw(0, &complete()).unwrap();
        assert_eq!(sample, Sample::new(1_700_000_000, 21.5, "02d", "few clouds"));
    }

    #[test]
    fn test_from_raw_missing_temperature() {
        let raw = Raw {
            temp: None,
            ..complete()
        };
        let err = Sample::from_raw(3, &raw).unwrap_err();
        assert_eq!(err.index, 3);
        assert_eq!(err.field, SampleField::Temperature);
        assert_eq!(err.to_string(), "Forecast sample 3 is missing its temperature");
    }

    #[test]
    fn test_from_raw_reports_timestamp_first() {
        let raw = Raw {
            dt: None,
            temp: None,
            ..complete()
        };
        let err = Sample::from_raw(0, &raw).unwrap_err();
        assert_eq!(err.field, SampleField::Timestamp);
    }

    #[test]
    fn test_from_raw_empty_condition_code_is_missing() {
        let raw = Raw {
            icon: Some(""),
            ..complete()
        };
        let err = Sample::from_raw(1, &raw).unwrap_err();
        assert_eq!(err.field, SampleField::ConditionCode);
    }

    #[test]
    fn test_from_raw_missing_description_defaults_empty() {
        let raw = Raw {
            description: None,
            ..complete()
        };
        let sample = Sample::from_raw(0, &raw).unwrap();
        assert!(sample.description.is_empty());
    }
}
