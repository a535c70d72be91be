//! Model Output Parsing
//!
//! Interprets the raw text a model returned as an extraction payload:
//! strips an optional markdown code fence, parses the remainder as JSON,
//! and applies the relevance rule (null / empty string / empty object /
//! empty array count as "no data for this document").

use serde_json::Value;

/// Interpretation of one model response
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedPayload {
    /// A non-empty JSON payload to persist
    Data(Value),

    /// The model confirmed there is nothing to extract
    Empty,

    /// The text was not valid JSON; the detail is the decode error
    Unparseable(String),
}

/// Parse a raw model response into a payload
pub fn parse_extraction(raw: &str) -> ParsedPayload {
    let body = strip_code_fences(raw);

    if body.is_empty() || body.eq_ignore_ascii_case("null") {
        return ParsedPayload::Empty;
    }

    match serde_json::from_str::<Value>(body) {
        Ok(value) if is_empty_payload(&value) => ParsedPayload::Empty,
        Ok(value) => ParsedPayload::Data(value),
        Err(err) => ParsedPayload::Unparseable(err.to_string()),
    }
}

/// Strip a wrapping markdown code fence by structure, not fixed offsets.
///
/// Handles an optional language tag on the opening fence, a missing
/// closing fence, and surrounding whitespace. Text that does not start
/// with a fence is returned trimmed and otherwise untouched.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the language tag, if any: everything up to the end of the
    // opening fence line belongs to the fence, not the payload.
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest.strip_prefix("json").unwrap_or(rest),
    };

    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_json_passes_through() {
        let payload = parse_extraction(r#"{"name": "milk", "qty": 2}"#);
        assert_eq!(payload, ParsedPayload::Data(json!({"name": "milk", "qty": 2})));
    }

    #[test]
    fn json_fence_with_language_tag_is_stripped() {
        let raw = "```json\n{\"items\": [1, 2]}\n```";
        assert_eq!(
            parse_extraction(raw),
            ParsedPayload::Data(json!({"items": [1, 2]}))
        );
    }

    #[test]
    fn fence_without_language_tag_is_stripped() {
        let raw = "```\n{\"a\": 1}\n```";
        assert_eq!(parse_extraction(raw), ParsedPayload::Data(json!({"a": 1})));
    }

    #[test]
    fn trailing_whitespace_after_the_closing_fence_is_tolerated() {
        let raw = "```json\n{\"a\": 1}\n```   \n\n";
        assert_eq!(parse_extraction(raw), ParsedPayload::Data(json!({"a": 1})));
    }

    #[test]
    fn missing_closing_fence_still_yields_the_payload() {
        let raw = "```json\n{\"a\": 1}";
        assert_eq!(parse_extraction(raw), ParsedPayload::Data(json!({"a": 1})));
    }

    #[test]
    fn null_and_blank_responses_are_empty() {
        assert_eq!(parse_extraction("null"), ParsedPayload::Empty);
        assert_eq!(parse_extraction("NULL"), ParsedPayload::Empty);
        assert_eq!(parse_extraction("   "), ParsedPayload::Empty);
        assert_eq!(parse_extraction("```json\nnull\n```"), ParsedPayload::Empty);
    }

    #[test]
    fn empty_containers_and_strings_are_empty() {
        assert_eq!(parse_extraction("{}"), ParsedPayload::Empty);
        assert_eq!(parse_extraction("[]"), ParsedPayload::Empty);
        assert_eq!(parse_extraction("\"\""), ParsedPayload::Empty);
    }

    #[test]
    fn zero_and_false_are_data_not_absence() {
        assert_eq!(parse_extraction("0"), ParsedPayload::Data(json!(0)));
        assert_eq!(parse_extraction("false"), ParsedPayload::Data(json!(false)));
    }

    #[test]
    fn prose_is_unparseable() {
        match parse_extraction("Sure! Here is the data you asked for.") {
            ParsedPayload::Unparseable(_) => {}
            other => panic!("expected unparseable, got {:?}", other),
        }
    }
}
