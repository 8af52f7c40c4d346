//! Parsing of model replies into candidates and responses
//!
//! Models are asked for JSON but often wrap it in prose or code fences, so
//! the outermost JSON array/object is located before deserializing.

use serde::Deserialize;
use thinktank_application::AiServiceError;
use thinktank_domain::util::truncate_str;
use thinktank_domain::{AgentResponse, ThoughtCandidate};

/// Confidence assumed when a reply carries none
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

#[derive(Debug, Deserialize)]
struct RawCandidate {
    content: String,
    #[serde(default)]
    confidence: Option<f64>,
}

fn enclosed(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// Parse a JSON array of `{content, confidence}` objects.
///
/// Entries with empty content are dropped; confidences are clamped.
pub fn parse_candidates(text: &str) -> Result<Vec<ThoughtCandidate>, AiServiceError> {
    let json = enclosed(text, '[', ']').ok_or_else(|| {
        AiServiceError::MalformedOutput(format!("no JSON array in reply: {}", truncate_str(text, 120)))
    })?;
    let raw: Vec<RawCandidate> = serde_json::from_str(json)
        .map_err(|e| AiServiceError::MalformedOutput(format!("invalid candidate list: {}", e)))?;

    Ok(raw
        .into_iter()
        .filter(|c| !c.content.trim().is_empty())
        .map(|c| ThoughtCandidate::new(c.content.trim(), c.confidence.unwrap_or(DEFAULT_CONFIDENCE)))
        .collect())
}

/// Parse a `{content, confidence}` object, falling back to the raw text.
pub fn parse_response(text: &str) -> Result<AgentResponse, AiServiceError> {
    if let Some(json) = enclosed(text, '{', '}')
        && let Ok(raw) = serde_json::from_str::<RawCandidate>(json)
        && !raw.content.trim().is_empty()
    {
        return Ok(AgentResponse::new(
            raw.content.trim(),
            raw.confidence.unwrap_or(DEFAULT_CONFIDENCE),
        ));
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AiServiceError::MalformedOutput("empty reply".to_string()));
    }
    Ok(AgentResponse::new(trimmed, DEFAULT_CONFIDENCE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_candidates_inside_code_fence() {
        let reply = r#"Here you go:
```json
[{"content": "use REST", "confidence": 0.8}, {"content": "use gRPC"}, {"content": "  "}]
```"#;
        let candidates = parse_candidates(reply).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].content, "use REST");
        assert_eq!(candidates[0].confidence, 0.8);
        assert_eq!(candidates[1].confidence, DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_parse_candidates_clamps_confidence() {
        let candidates = parse_candidates(r#"[{"content": "x", "confidence": 7}]"#).unwrap();
        assert_eq!(candidates[0].confidence, 1.0);
    }

    #[test]
    fn test_parse_candidates_rejects_prose() {
        let err = parse_candidates("I think REST is best").unwrap_err();
        assert!(matches!(err, AiServiceError::MalformedOutput(_)));

        let err = parse_candidates("[not json]").unwrap_err();
        assert!(matches!(err, AiServiceError::MalformedOutput(_)));
    }

    #[test]
    fn test_parse_response_json_and_plain() {
        let response = parse_response(r#"{"content": "Paginate with cursors", "confidence": 0.85}"#).unwrap();
        assert_eq!(response.content, "Paginate with cursors");
        assert_eq!(response.confidence, 0.85);

        let plain = parse_response("  Just use cursors.  ").unwrap();
        assert_eq!(plain.content, "Just use cursors.");
        assert_eq!(plain.confidence, DEFAULT_CONFIDENCE);

        assert!(parse_response("   ").is_err());
    }
}
