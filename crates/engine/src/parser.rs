//! Two-stage parsing of generative-service responses: fence-stripping
//! normalization, then strict schema validation.

use serde::de::DeserializeOwned;
use workmatch_common::{EngineError, Result};

/// Remove leading/trailing markdown code-fence markers. Models frequently
/// wrap their JSON in ```json blocks even when told not to.
pub fn strip_code_fences(text: &str) -> &str {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    }
    if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Parse a fenced-or-bare JSON response into `T` and run `validate` over it.
///
/// Any failure, in either stage, is a non-retryable [`EngineError::Parse`]
/// carrying a bounded excerpt of the original response text.
pub fn parse_structured<T, F>(raw: &str, validate: F) -> Result<T>
where
    T: DeserializeOwned,
    F: FnOnce(&T) -> Result<()>,
{
    let stripped = strip_code_fences(raw);
    let parsed: T = serde_json::from_str(stripped)
        .map_err(|e| EngineError::parse(format!("response is not valid JSON: {}", e), raw))?;
    validate(&parsed).map_err(|e| match e {
        EngineError::Validation(message) => {
            EngineError::parse(format!("response violates schema: {}", message), raw)
        }
        other => other,
    })?;
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn strips_bare_fence() {
        assert_eq!(strip_code_fences("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn passes_through_unfenced_text() {
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
    }
}
