use serde_json::{Value, json};

use super::{
    DEFAULT_END_KEY, DEFAULT_START_KEY, ExtractError, KeyBounds, Marker,
    extract_json_between_keys,
};

fn extract_value(text: &str, start: &str, end: &str) -> Value {
    Value::Object(extract_json_between_keys(text, start, end).unwrap())
}

#[test]
fn extracts_object_surrounded_by_noise() {
    let text = r#"noise {"x":{"y":1},"start":"s","end":"e"} trailing"#;

    let value = extract_value(text, "start", "end");

    assert_eq!(value, json!({"x": {"y": 1}, "start": "s", "end": "e"}));
}

#[test]
fn nested_object_before_start_key_returns_outer_object() {
    let text = r#"{"a": {"b": 1}, "start_key": 2, "end_key": 3}"#;

    let value = extract_value(text, "\"start_key\"", "\"end_key\"");

    assert_eq!(value, json!({"a": {"b": 1}, "start_key": 2, "end_key": 3}));
}

#[test]
fn nested_object_after_start_key_is_included() {
    let text = r#"Result: {"start": 1, "detail": {"inner": {"deep": true}}, "end": 2} done"#;

    let value = extract_value(text, "\"start\"", "\"end\"");

    assert_eq!(
        value,
        json!({"start": 1, "detail": {"inner": {"deep": true}}, "end": 2})
    );
}

#[test]
fn missing_end_key_is_key_not_found() {
    let err = extract_json_between_keys(r#"{"start":1}"#, "start", "end").unwrap_err();

    match err {
        ExtractError::KeyNotFound { marker, key } => {
            assert_eq!(marker, Marker::End);
            assert_eq!(key, "end");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn missing_start_key_is_key_not_found() {
    let err = extract_json_between_keys(r#"{"other": 1, "end": 2}"#, "\"start\"", "\"end\"")
        .unwrap_err();

    assert!(matches!(
        err,
        ExtractError::KeyNotFound {
            marker: Marker::Start,
            ..
        }
    ));
    assert_eq!(err.to_string(), "Start key '\"start\"' not found");
}

#[test]
fn end_key_only_before_start_key_is_key_not_found() {
    let text = r#"{"end": 0} {"start": 1}"#;

    let err = extract_json_between_keys(text, "\"start\"", "\"end\"").unwrap_err();

    assert!(matches!(
        err,
        ExtractError::KeyNotFound {
            marker: Marker::End,
            ..
        }
    ));
}

#[test]
fn start_key_without_preceding_brace_is_no_opening_brace() {
    let err =
        extract_json_between_keys(r#""start": 1, "end": 2}"#, "\"start\"", "\"end\"").unwrap_err();

    assert!(matches!(err, ExtractError::NoOpeningBrace));
    assert_eq!(err.to_string(), "No '{' found before start key");
}

#[test]
fn closed_unrelated_object_before_start_key_is_no_opening_brace() {
    let text = r#"{"noise": 1} "start": 1, {"end": 2}"#;

    let err = extract_json_between_keys(text, "\"start\"", "\"end\"").unwrap_err();

    assert!(matches!(err, ExtractError::NoOpeningBrace));
}

#[test]
fn unclosed_object_is_unterminated() {
    let text = r#"{"start": {"end": 1}"#;

    let err = extract_json_between_keys(text, "\"start\"", "\"end\"").unwrap_err();

    assert!(matches!(err, ExtractError::UnterminatedObject));
}

#[test]
fn balanced_but_invalid_json_is_malformed() {
    let text = r#"{"start": <int>, "end": <float>}"#;

    let err = extract_json_between_keys(text, "\"start\"", "\"end\"").unwrap_err();

    assert!(matches!(err, ExtractError::MalformedJson(_)));
    assert!(err.to_string().starts_with("Malformed JSON object"));
}

#[test]
fn balanced_braces_inside_strings_are_tolerated() {
    let text = r#"{"start": "{x}", "end": "ok"}"#;

    let value = extract_value(text, "\"start\"", "\"end\"");

    assert_eq!(value, json!({"start": "{x}", "end": "ok"}));
}

#[test]
fn unbalanced_closing_brace_inside_string_truncates_candidate() {
    let text = r#"{"start": "a } b", "end": 1}"#;

    let err = extract_json_between_keys(text, "\"start\"", "\"end\"").unwrap_err();

    assert!(matches!(err, ExtractError::MalformedJson(_)));
}

#[test]
fn unbalanced_opening_brace_inside_string_leaves_object_unterminated() {
    let text = r#"{"start": "a { b", "end": 1}"#;

    let err = extract_json_between_keys(text, "\"start\"", "\"end\"").unwrap_err();

    assert!(matches!(err, ExtractError::UnterminatedObject));
}

#[test]
fn extraction_is_idempotent() {
    let text = r#"prefix {"start": [1, 2, {"k": "v"}], "end": null} suffix {"start": 9}"#;

    let first = extract_json_between_keys(text, "\"start\"", "\"end\"").unwrap();
    let second = extract_json_between_keys(text, "\"start\"", "\"end\"").unwrap();

    assert_eq!(first, second);
}

#[test]
fn handles_multibyte_text_around_object() {
    let text = "판독 결과 → {\"start\": \"폐 결절\", \"end\": 1} ✓";

    let value = extract_value(text, "\"start\"", "\"end\"");

    assert_eq!(value, json!({"start": "폐 결절", "end": 1}));
}

#[test]
fn preserves_key_order_when_reencoded() {
    let text = r#"{"zeta": 1, "start": 2, "alpha": 3, "end": 4}"#;

    let map = extract_json_between_keys(text, "\"start\"", "\"end\"").unwrap();
    let encoded = serde_json::to_string(&map).unwrap();

    assert_eq!(encoded, r#"{"zeta":1,"start":2,"alpha":3,"end":4}"#);
}

#[test]
fn default_bounds_extract_verdict_from_fenced_model_output() {
    let text = r#"Here is the evaluation:
```json
{"entity_name false_prediction": 1, "entity_name false_prediction_explanation": "mentions {nodule}", "weighted_final_score": 0.72, "true_positive_matches": 3}
```
Let me know if you need anything else."#;

    let map = KeyBounds::default().extract(text).unwrap();

    assert_eq!(map.get("entity_name false_prediction"), Some(&json!(1)));
    assert_eq!(map.get("weighted_final_score"), Some(&json!(0.72)));
    assert_eq!(map.get("true_positive_matches"), Some(&json!(3)));
}

#[test]
fn default_bounds_match_verdict_keys() {
    let bounds = KeyBounds::default();

    assert_eq!(bounds.start_key, DEFAULT_START_KEY);
    assert_eq!(bounds.end_key, DEFAULT_END_KEY);
}
