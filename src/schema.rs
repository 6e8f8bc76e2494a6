//! Typed view over an extracted grading object.
//!
//! The extractor only guarantees well-formed JSON. Callers that need the
//! individual error counts or quality scores convert through [`Verdict`],
//! which tolerates the usual model sloppiness (quoted numbers, integral
//! floats) but insists every key is present.

use anyhow::{Result, anyhow, bail};
use serde::Serialize;
use serde_json::{Map, Value};

pub const SCORE_KEY: &str = "weighted_final_score";

/// Keys of the grading object, in the order the prompt lists them.
pub const VERDICT_KEYS: [&str; 23] = [
    "entity_name false_prediction",
    "entity_name false_prediction_explanation",
    "entity_name omission",
    "entity_name omission_explanation",
    "location false_prediction",
    "location false_prediction_explanation",
    "location omission",
    "location omission_explanation",
    "severity false_prediction",
    "severity false_prediction_explanation",
    "severity omission",
    "severity omission_explanation",
    "uncertainty false_prediction",
    "uncertainty false_prediction_explanation",
    "uncertainty omission",
    "uncertainty omission_explanation",
    "completeness_score",
    "completeness_reason",
    "readability_score",
    "readability_reason",
    "clinical_utility_score",
    "clinical_utility_reason",
    SCORE_KEY,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    EntityName,
    Location,
    Severity,
    Uncertainty,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::EntityName,
        Dimension::Location,
        Dimension::Severity,
        Dimension::Uncertainty,
    ];

    pub fn key_prefix(self) -> &'static str {
        match self {
            Dimension::EntityName => "entity_name",
            Dimension::Location => "location",
            Dimension::Severity => "severity",
            Dimension::Uncertainty => "uncertainty",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionErrors {
    pub false_prediction: i64,
    pub false_prediction_explanation: String,
    pub omission: i64,
    pub omission_explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityScore {
    pub score: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub entity_name: DimensionErrors,
    pub location: DimensionErrors,
    pub severity: DimensionErrors,
    pub uncertainty: DimensionErrors,
    pub completeness: QualityScore,
    pub readability: QualityScore,
    pub clinical_utility: QualityScore,
    pub weighted_final_score: f64,
}

impl Verdict {
    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        let missing: Vec<&str> = VERDICT_KEYS
            .iter()
            .copied()
            .filter(|key| !map.contains_key(*key))
            .collect();
        if !missing.is_empty() {
            bail!("Verdict is missing fields: {}", missing.join(", "));
        }

        Ok(Self {
            entity_name: dimension(map, Dimension::EntityName)?,
            location: dimension(map, Dimension::Location)?,
            severity: dimension(map, Dimension::Severity)?,
            uncertainty: dimension(map, Dimension::Uncertainty)?,
            completeness: quality(map, "completeness")?,
            readability: quality(map, "readability")?,
            clinical_utility: quality(map, "clinical_utility")?,
            weighted_final_score: float_field(map, SCORE_KEY)?,
        })
    }

    pub fn dimension(&self, dimension: Dimension) -> &DimensionErrors {
        match dimension {
            Dimension::EntityName => &self.entity_name,
            Dimension::Location => &self.location,
            Dimension::Severity => &self.severity,
            Dimension::Uncertainty => &self.uncertainty,
        }
    }

    /// Saturates instead of overflowing on absurd model-supplied counts.
    pub fn total_errors(&self) -> i64 {
        Dimension::ALL.iter().fold(0i64, |total, d| {
            let errors = self.dimension(*d);
            total
                .saturating_add(errors.false_prediction)
                .saturating_add(errors.omission)
        })
    }
}

/// Lenient score lookup: numbers and numeric strings, anything else is `None`.
pub fn weighted_final_score(map: &Map<String, Value>) -> Option<f64> {
    map.get(SCORE_KEY)
        .and_then(number_like)
        .filter(|score| score.is_finite())
}

fn dimension(map: &Map<String, Value>, dimension: Dimension) -> Result<DimensionErrors> {
    let prefix = dimension.key_prefix();
    Ok(DimensionErrors {
        false_prediction: int_field(map, &format!("{prefix} false_prediction"))?,
        false_prediction_explanation: string_field(
            map,
            &format!("{prefix} false_prediction_explanation"),
        )?,
        omission: int_field(map, &format!("{prefix} omission"))?,
        omission_explanation: string_field(map, &format!("{prefix} omission_explanation"))?,
    })
}

fn quality(map: &Map<String, Value>, name: &str) -> Result<QualityScore> {
    Ok(QualityScore {
        score: float_field(map, &format!("{name}_score"))?,
        reason: string_field(map, &format!("{name}_reason"))?,
    })
}

fn field<'a>(map: &'a Map<String, Value>, key: &str) -> Result<&'a Value> {
    map.get(key).ok_or_else(|| anyhow!("Missing field '{key}'"))
}

fn number_like(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn int_field(map: &Map<String, Value>, key: &str) -> Result<i64> {
    let value = field(map, key)?;
    if let Some(n) = value.as_i64() {
        return Ok(n);
    }
    match number_like(value) {
        Some(n) if n.fract() == 0.0 && n.is_finite() => Ok(n as i64),
        _ => bail!("Field '{key}' is not an integer: {value}"),
    }
}

fn float_field(map: &Map<String, Value>, key: &str) -> Result<f64> {
    let value = field(map, key)?;
    number_like(value)
        .filter(|n| n.is_finite())
        .ok_or_else(|| anyhow!("Field '{key}' is not a number: {value}"))
}

fn string_field(map: &Map<String, Value>, key: &str) -> Result<String> {
    Ok(match field(map, key)? {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    })
}
