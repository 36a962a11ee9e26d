use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

const RAW_PREFIX_CHARS: usize = 200;

static OPENING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^```(?:json)?\s*\n?").expect("OPENING_FENCE is a valid regex"));

static CLOSING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n?```\s*$").expect("CLOSING_FENCE is a valid regex"));

#[derive(Debug, Clone, Error)]
#[error("Invalid JSON from model: {reason}. Raw: {raw_prefix}")]
pub struct ExtractError {
    pub reason: String,
    pub raw_prefix: String,
}

/// Coerces a model reply into a JSON value.
///
/// Tries, in order: the whole text, the text with a markdown code fence
/// stripped, and the span from the first `{` to the last `}`. Whether the
/// value has the expected shape is left to the caller.
pub fn extract_json(raw: &str) -> Result<Value, ExtractError> {
    if let Ok(value) = serde_json::from_str::<Value>(raw) {
        return Ok(value);
    }

    let unfenced = strip_code_fence(raw);
    let mut last_err = match serde_json::from_str::<Value>(unfenced) {
        Ok(value) => return Ok(value),
        Err(err) => err,
    };

    if let (Some(start), Some(end)) = (unfenced.find('{'), unfenced.rfind('}')) {
        if start < end {
            match serde_json::from_str::<Value>(&unfenced[start..=end]) {
                Ok(value) => return Ok(value),
                Err(err) => last_err = err,
            }
        }
    }

    Err(ExtractError {
        reason: last_err.to_string(),
        raw_prefix: raw.trim().chars().take(RAW_PREFIX_CHARS).collect(),
    })
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let start = OPENING_FENCE
        .find(trimmed)
        .map(|m| m.end())
        .unwrap_or(0);
    let rest = &trimmed[start..];
    let end = CLOSING_FENCE
        .find(rest)
        .map(|m| m.start())
        .unwrap_or(rest.len());
    rest[..end].trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_plain_json() {
        assert_eq!(extract_json(r#"{"a":1}"#).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn parses_json_inside_tagged_fence() {
        let raw = "```json\n{\"a\":1}\n```";
        assert_eq!(extract_json(raw).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn parses_json_inside_untagged_uppercase_fence() {
        let raw = "```JSON\n{\"items\":[]}\n```\n";
        assert_eq!(extract_json(raw).unwrap(), json!({"items": []}));

        let raw = "```\n{\"b\":true}```";
        assert_eq!(extract_json(raw).unwrap(), json!({"b": true}));
    }

    #[test]
    fn salvages_object_wrapped_in_prose() {
        let raw = "noise {\"a\":1} trailing";
        assert_eq!(extract_json(raw).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn salvages_object_after_fence_and_prose() {
        let raw = "```json\nHere is your quiz:\n{\"quizTitle\":\"Vectors\",\"items\":[]}\nEnjoy!\n```";
        assert_eq!(
            extract_json(raw).unwrap(),
            json!({"quizTitle": "Vectors", "items": []})
        );
    }

    #[test]
    fn rejects_text_without_json() {
        let err = extract_json("not json at all").unwrap_err();
        assert!(err.to_string().starts_with("Invalid JSON from model"));
        assert_eq!(err.raw_prefix, "not json at all");
    }

    #[test]
    fn rejects_unbalanced_object_and_truncates_prefix() {
        let raw = format!("{{\"a\": \"{}", "x".repeat(500));
        let err = extract_json(&raw).unwrap_err();
        assert_eq!(err.raw_prefix.chars().count(), RAW_PREFIX_CHARS);
    }

    #[test]
    fn reason_comes_from_the_last_attempt() {
        let err = extract_json(r#"Result: {"a": }"#).unwrap_err();
        // Column 7 of the brace span, not column 1 of the whole reply.
        assert!(err.reason.ends_with("line 1 column 7"), "{}", err.reason);
    }

    #[test]
    fn top_level_array_is_accepted_as_json() {
        assert_eq!(extract_json("[1,2]").unwrap(), json!([1, 2]));
    }
}
