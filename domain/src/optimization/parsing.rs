//! Quality score parsing.
//!
//! Extracts a normalised quality score in [0, 1] from a free-form rating
//! reply. Pure text handling, no I/O.
//!
//! # Supported Formats
//!
//! 1. **JSON** (preferred): `{"score": 0.8}` or `{"quality": 8}`
//! 2. **Fraction**: `8/10`
//! 3. **Percentage**: `85%`
//! 4. **Standalone number**: `0.7` (unit scale) or `7` (1-10 scale)

fn normalise(value: f64) -> Option<f64> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    if value <= 1.0 {
        Some(value)
    } else if value <= 10.0 {
        Some(value / 10.0)
    } else if value <= 100.0 {
        Some(value / 100.0)
    } else {
        Some(1.0)
    }
}

/// Parse a quality score, returning `None` when no score can be found.
///
/// # Examples
///
/// ```
/// use thinktank_domain::optimization::parsing::parse_quality_score;
///
/// assert_eq!(parse_quality_score(r#"{"score": 0.8}"#), Some(0.8));
/// assert_eq!(parse_quality_score("I rate this 7/10"), Some(0.7));
/// assert_eq!(parse_quality_score("Quality: 85%"), Some(0.85));
/// assert_eq!(parse_quality_score("No numbers here"), None);
/// ```
pub fn parse_quality_score(response: &str) -> Option<f64> {
    if let Some(start) = response.find('{')
        && let Some(end) = response[start..].rfind('}')
    {
        let json_str = &response[start..start + end + 1];
        if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(json_str) {
            let score = ["score", "quality", "confidence"]
                .iter()
                .find_map(|key| parsed.get(*key).and_then(|v| v.as_f64()));
            if let Some(score) = score {
                return normalise(score);
            }
        }
    }

    for word in response.split_whitespace() {
        let word = word.trim_matches(|c: char| matches!(c, ',' | ';' | ')' | '(' | '"'));

        if let Some((num, den)) = word.split_once('/')
            && let (Ok(num), Ok(den)) = (
                num.trim_start_matches(|c: char| !c.is_ascii_digit())
                    .parse::<f64>(),
                den.trim_end_matches('.').parse::<f64>(),
            )
            && den > 0.0
        {
            return Some((num / den).clamp(0.0, 1.0));
        }

        if let Some(pct) = word.strip_suffix('%')
            && let Ok(value) = pct.parse::<f64>()
        {
            return Some((value / 100.0).clamp(0.0, 1.0));
        }

        let bare = word.trim_matches(|c: char| !c.is_ascii_digit() && c != '.');
        let bare = bare.trim_end_matches('.');
        if !bare.is_empty()
            && let Ok(value) = bare.parse::<f64>()
            && value <= 10.0
        {
            return normalise(value);
        }
    }

    None
}
