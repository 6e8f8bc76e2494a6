/// Output schema the grader is asked to fill in, with the quotes escaped so
/// the model echoes a stringified JSON object.
pub const JSON_SCHEMA: &str = r#"{\"entity_name false_prediction\": <int>, \"entity_name false_prediction_explanation\": <string>, \"entity_name omission\": <int>, \"entity_name omission_explanation\": <string>, \"location false_prediction\": <int>, \"location false_prediction_explanation\": <string>, \"location omission\": <int>, \"location omission_explanation\": <string>, \"severity false_prediction\": <int>, \"severity false_prediction_explanation\": <string>, \"severity omission\": <int>, \"severity omission_explanation\": <string>, \"uncertainty false_prediction\": <int>, \"uncertainty false_prediction_explanation\": <string>, \"uncertainty omission\": <int>, \"uncertainty omission_explanation\": <string>, \"completeness_score\": <float>, \"completeness_reason\": <string>, \"readability_score\": <float>, \"readability_reason\": <string>, \"clinical_utility_score\": <float>, \"clinical_utility_reason\": <string>, \"weighted_final_score\": <float>}"#;

const INSTRUCTION: &str = "Evaluate the accuracy of a candidate radiology report in comparison to a reference radiology report composed by expert radiologists. You should determine the following aspects and return the result as a **stringified JSON object** in exactly this format (with escaped double quotes):";

const OUTPUT_CONSTRAINT: &str =
    "Only output the stringified JSON object. Do not add explanations, markdown, or formatting.";

/// Builds the user message asking the grader to compare `candidate`
/// against `reference`.
pub fn build_grading_prompt(candidate: &str, reference: &str) -> String {
    format!(
        "{INSTRUCTION}\n\n{JSON_SCHEMA}\n\n{OUTPUT_CONSTRAINT}\n\nCandidate radiology report:\n{}\n\nReference radiology report:\n{}\n",
        candidate.trim(),
        reference.trim()
    )
}
