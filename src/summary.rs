use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

use crate::config::DatasetSettings;
use crate::dataset::{Dataset, is_missing};
use crate::grader::is_error_record;
use crate::schema::{Dimension, Verdict};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreStats {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl ScoreStats {
    fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let sum: f64 = values.iter().sum();
        Some(Self {
            count: values.len(),
            mean: sum / values.len() as f64,
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DimensionTotals {
    pub dimension: &'static str,
    pub false_predictions: i64,
    pub omissions: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub pending: usize,
    pub error_records: usize,
    /// Rows whose result converted to a complete [`Verdict`].
    pub verdicts: usize,
    pub weighted_final_score: Option<ScoreStats>,
    pub completeness: Option<ScoreStats>,
    pub readability: Option<ScoreStats>,
    pub clinical_utility: Option<ScoreStats>,
    /// Sum of the eight error counts per complete verdict.
    pub errors_per_report: Option<ScoreStats>,
    pub dimensions: Vec<DimensionTotals>,
}

/// Aggregates the result and score columns written by an evaluation run.
pub fn summarize(dataset: &Dataset, settings: &DatasetSettings) -> Result<DatasetSummary> {
    let result_col = dataset.column_index(&settings.result_column)?;
    let score_col = dataset.column_index(&settings.score_column)?;

    let mut summary = DatasetSummary {
        rows: dataset.len(),
        dimensions: Dimension::ALL
            .iter()
            .map(|d| DimensionTotals {
                dimension: d.key_prefix(),
                ..DimensionTotals::default()
            })
            .collect(),
        ..DatasetSummary::default()
    };

    let mut scores = Vec::new();
    let mut completeness = Vec::new();
    let mut readability = Vec::new();
    let mut clinical_utility = Vec::new();
    let mut error_counts = Vec::new();

    for row in 0..dataset.len() {
        let score_cell = dataset.get(row, score_col);
        if is_missing(score_cell) {
            summary.pending += 1;
        } else if let Some(score) = score_cell
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|score| score.is_finite())
        {
            scores.push(score);
        }

        let result_cell = dataset.get(row, result_col);
        if is_missing(result_cell) {
            continue;
        }
        let Ok(value) = serde_json::from_str::<Value>(result_cell) else {
            continue;
        };
        if is_error_record(&value) {
            summary.error_records += 1;
            continue;
        }
        let Some(Ok(verdict)) = value.as_object().map(Verdict::from_map) else {
            continue;
        };

        summary.verdicts += 1;
        completeness.push(verdict.completeness.score);
        readability.push(verdict.readability.score);
        clinical_utility.push(verdict.clinical_utility.score);
        error_counts.push(verdict.total_errors() as f64);
        for (totals, dimension) in summary.dimensions.iter_mut().zip(Dimension::ALL) {
            let errors = verdict.dimension(dimension);
            totals.false_predictions = totals
                .false_predictions
                .saturating_add(errors.false_prediction);
            totals.omissions = totals.omissions.saturating_add(errors.omission);
        }
    }

    summary.weighted_final_score = ScoreStats::from_values(&scores);
    summary.completeness = ScoreStats::from_values(&completeness);
    summary.readability = ScoreStats::from_values(&readability);
    summary.clinical_utility = ScoreStats::from_values(&clinical_utility);
    summary.errors_per_report = ScoreStats::from_values(&error_counts);

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grader::GradeOutcome;
    use crate::testing::verdict_reply;
    use crate::extract::KeyBounds;
    use std::fs;
    use tempfile::TempDir;

    fn encoded_verdict(score: f64) -> String {
        let map = KeyBounds::default().extract(&verdict_reply(score)).unwrap();
        serde_json::to_string(&GradeOutcome::success(map).result).unwrap()
    }

    fn dataset_with(rows: &[(String, &str)]) -> Dataset {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graded.csv");
        let mut writer = csv::Writer::from_path(&path).unwrap();
        writer.write_record(["eval_result", "weighted_final_score"]).unwrap();
        for (result, score) in rows {
            writer.write_record([result.as_str(), *score]).unwrap();
        }
        writer.flush().unwrap();
        drop(writer);
        let dataset = Dataset::load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        dataset
    }

    #[test]
    fn aggregates_scores_errors_and_pending_rows() {
        let error = serde_json::to_string(
            &GradeOutcome::failure("End key not found", Some("garbage")).result,
        )
        .unwrap();
        let dataset = dataset_with(&[
            (encoded_verdict(0.5), "0.5"),
            (encoded_verdict(0.9), "0.9"),
            (error, ""),
            (String::new(), ""),
        ]);

        let summary = summarize(&dataset, &DatasetSettings::default()).unwrap();

        assert_eq!(summary.rows, 4);
        assert_eq!(summary.pending, 2);
        assert_eq!(summary.error_records, 1);
        assert_eq!(summary.verdicts, 2);

        let scores = summary.weighted_final_score.unwrap();
        assert_eq!(scores.count, 2);
        assert!((scores.mean - 0.7).abs() < 1e-9);
        assert!((scores.min - 0.5).abs() < 1e-9);
        assert!((scores.max - 0.9).abs() < 1e-9);

        let entity = &summary.dimensions[0];
        assert_eq!(entity.dimension, "entity_name");
        assert_eq!(entity.omissions, 2);
        assert_eq!(entity.false_predictions, 0);
        assert!((summary.errors_per_report.unwrap().mean - 1.0).abs() < 1e-9);
    }

    #[test]
    fn partial_objects_count_toward_scores_but_not_verdicts() {
        let dataset = dataset_with(&[(r#"{"weighted_final_score": 0.4}"#.to_string(), "0.4")]);

        let summary = summarize(&dataset, &DatasetSettings::default()).unwrap();

        assert_eq!(summary.verdicts, 0);
        assert_eq!(summary.weighted_final_score.unwrap().count, 1);
        assert!(summary.completeness.is_none());
    }

    #[test]
    fn huge_error_counts_saturate_instead_of_overflowing() {
        let mut map = KeyBounds::default().extract(&verdict_reply(0.5)).unwrap();
        map.insert("entity_name false_prediction".to_string(), serde_json::json!(i64::MAX));
        let encoded = serde_json::to_string(&GradeOutcome::success(map).result).unwrap();
        let dataset = dataset_with(&[(encoded.clone(), "0.5"), (encoded, "0.5")]);

        let summary = summarize(&dataset, &DatasetSettings::default()).unwrap();

        assert_eq!(summary.verdicts, 2);
        assert_eq!(summary.dimensions[0].false_predictions, i64::MAX);
        assert_eq!(summary.dimensions[0].omissions, 2);
        assert_eq!(summary.errors_per_report.unwrap().max, i64::MAX as f64);
    }

    #[test]
    fn non_finite_score_cells_are_ignored() {
        let verdict = encoded_verdict(0.6);
        let dataset = dataset_with(&[
            (verdict.clone(), "0.6"),
            (verdict.clone(), "inf"),
            (verdict, "-inf"),
        ]);

        let summary = summarize(&dataset, &DatasetSettings::default()).unwrap();

        let scores = summary.weighted_final_score.unwrap();
        assert_eq!(scores.count, 1);
        assert!((scores.max - 0.6).abs() < 1e-9);
        assert_eq!(summary.pending, 0);
    }

    #[test]
    fn requires_result_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("raw.csv");
        fs::write(&path, "gt\nreport\n").unwrap();
        let dataset = Dataset::load(&path).unwrap();

        assert!(summarize(&dataset, &DatasetSettings::default()).is_err());
    }
}
