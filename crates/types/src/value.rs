//! Parameter value-kind classification.
//!
//! The console renders parameter values differently depending on their
//! shape: inline scalars, multi-line text blocks, structured JSON trees,
//! and lists of resource references (URLs). The kind is computed once when
//! an execution is loaded and carried on the parameter, so the presentation
//! layer never has to re-inspect raw values.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Matches http/https/ftp/file references embedded in string values.
static REFERENCE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:https?|ftp|file)://[-a-z0-9+&@#/%?=~_|!:,.;]*[-a-z0-9+&@#/%=~_|]").expect("valid reference regex"));

/// Presentation-oriented classification of a parameter value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Single inline value: number, boolean, null, or a short plain string.
    Scalar,
    /// Multi-line plain text.
    Text,
    /// Object, non-reference array, or a string containing serialized JSON.
    StructuredJson,
    /// One or more resource references (URLs), bare or in an array.
    ReferenceList,
}

impl ValueKind {
    /// Classifies a raw parameter value.
    pub fn classify(value: &Value) -> Self {
        match value {
            Value::Object(_) => ValueKind::StructuredJson,
            Value::Array(items) => {
                let all_references = !items.is_empty()
                    && items
                        .iter()
                        .all(|item| matches!(item, Value::String(text) if REFERENCE_URL.is_match(text)));
                if all_references {
                    ValueKind::ReferenceList
                } else {
                    ValueKind::StructuredJson
                }
            }
            Value::String(text) => classify_string(text),
            _ => ValueKind::Scalar,
        }
    }
}

fn classify_string(text: &str) -> ValueKind {
    let trimmed = text.trim_start();
    // Strings carrying serialized JSON documents are edited as JSON.
    if (trimmed.starts_with('{') || trimmed.starts_with('[')) && serde_json::from_str::<Value>(trimmed).is_ok() {
        return ValueKind::StructuredJson;
    }
    if REFERENCE_URL.is_match(text) {
        return ValueKind::ReferenceList;
    }
    if text.contains('\n') {
        return ValueKind::Text;
    }
    ValueKind::Scalar
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_classify_as_scalar() {
        assert_eq!(ValueKind::classify(&json!(42)), ValueKind::Scalar);
        assert_eq!(ValueKind::classify(&json!(true)), ValueKind::Scalar);
        assert_eq!(ValueKind::classify(&json!(null)), ValueKind::Scalar);
        assert_eq!(ValueKind::classify(&json!("dma-code-501")), ValueKind::Scalar);
    }

    #[test]
    fn multiline_strings_are_text() {
        assert_eq!(ValueKind::classify(&json!("line one\nline two")), ValueKind::Text);
    }

    #[test]
    fn objects_and_embedded_json_are_structured() {
        assert_eq!(ValueKind::classify(&json!({"budget": 1200})), ValueKind::StructuredJson);
        assert_eq!(ValueKind::classify(&json!("{\"budget\": 1200}")), ValueKind::StructuredJson);
        assert_eq!(ValueKind::classify(&json!([1, 2, 3])), ValueKind::StructuredJson);
    }

    #[test]
    fn invalid_json_lookalike_falls_back() {
        assert_eq!(ValueKind::classify(&json!("{not json")), ValueKind::Scalar);
    }

    #[test]
    fn url_values_are_references() {
        assert_eq!(
            ValueKind::classify(&json!("https://assets.example.com/creative/banner.jpg")),
            ValueKind::ReferenceList
        );
        assert_eq!(
            ValueKind::classify(&json!(["https://a.example.com/1.png", "ftp://b.example.com/2.png"])),
            ValueKind::ReferenceList
        );
        // A mixed array is structured, not a reference list.
        assert_eq!(
            ValueKind::classify(&json!(["https://a.example.com/1.png", 7])),
            ValueKind::StructuredJson
        );
    }
}
