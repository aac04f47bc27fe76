//! Checks model output before it reaches the page. Anything that is not the
//! expected JSON shape, or that gives the answer away, is rejected.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const HINT_LABELS: [&str; 9] = [
    "indicator", "fodder", "definition", "device", "structure", "surface", "grammar", "link", "position",
];

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("output is not a JSON {0}")]
    NotJson(&'static str),

    #[error("expected exactly 3 hints, got {0}")]
    HintCount(usize),

    #[error("{0} must be a string")]
    NotString(&'static str),

    #[error("hint does not start with a known label: {0}")]
    BadLabel(String),

    #[error("steps must contain 1-10 items, got {0}")]
    StepCount(usize),

    #[error("invalid highlight role `{0}`")]
    BadRole(String),

    #[error("{0} leaks the answer")]
    Leak(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Indicator,
    Fodder,
    Definition,
}

impl Role {
    /// Case-insensitive; models write `Definition` as often as `definition`.
    pub fn parse(name: &str) -> Option<Role> {
        match name.trim().to_lowercase().as_str() {
            "indicator"  => Some(Role::Indicator),
            "fodder"     => Some(Role::Fodder),
            "definition" => Some(Role::Definition),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Role::parse(&name).ok_or_else(|| serde::de::Error::custom(format!("invalid highlight role `{name}`")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub role: Role,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Explanation {
    pub device:     String,
    pub steps:      Vec<String>,
    pub highlights: Vec<Highlight>,
}

impl Explanation {
    /// Older cache files may hold `{}` where no explanation was produced.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Parses `raw` as JSON, or failing that the slice between the first `open`
/// and the last `close`. Models like to wrap answers in prose or fences.
fn parse_lenient<T: DeserializeOwned>(raw: &str, open: char, close: char) -> Option<T> {
    if let Ok(parsed) = serde_json::from_str(raw) {
        return Some(parsed);
    }
    let start = raw.find(open)?;
    let end = raw.rfind(close)?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&raw[start..=end]).ok()
}

fn leaks(text: &str, answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    !answer.is_empty() && text.to_lowercase().contains(&answer)
}

pub fn validate_hints(raw: &str, answer: &str) -> Result<Vec<String>, ValidationError> {
    let items: Vec<Value> = parse_lenient(raw, '[', ']').ok_or(ValidationError::NotJson("array"))?;
    if items.len() != 3 {
        return Err(ValidationError::HintCount(items.len()));
    }

    items
        .iter()
        .map(|item| {
            let hint = item.as_str().ok_or(ValidationError::NotString("hint"))?.trim();
            if leaks(hint, answer) {
                return Err(ValidationError::Leak("hint"));
            }
            let label = hint
                .split_once(':')
                .map(|(label, _)| label.trim().to_lowercase())
                .ok_or_else(|| ValidationError::BadLabel(hint.to_string()))?;
            if !HINT_LABELS.contains(&label.as_str()) {
                return Err(ValidationError::BadLabel(hint.to_string()));
            }
            Ok(hint.to_string())
        })
        .collect()
}

pub fn validate_explanation(raw: &str, answer: &str) -> Result<Explanation, ValidationError> {
    let object: serde_json::Map<String, Value> =
        parse_lenient(raw, '{', '}').ok_or(ValidationError::NotJson("object"))?;

    let device = match object.get("device") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s))   => s.trim().to_string(),
        Some(_) => return Err(ValidationError::NotString("device")),
    };

    let steps = match object.get("steps") {
        None => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|s| s.as_str().map(str::to_string).ok_or(ValidationError::NotString("step")))
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(ValidationError::NotJson("array of steps")),
    };
    if !(1..=10).contains(&steps.len()) {
        return Err(ValidationError::StepCount(steps.len()));
    }

    let highlights = match object.get("highlights") {
        None => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(parse_highlight)
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(ValidationError::NotJson("array of highlights")),
    };

    if highlights.iter().any(|h| leaks(&h.text, answer)) {
        return Err(ValidationError::Leak("highlight"));
    }
    if steps.iter().any(|s| leaks(s, answer)) {
        return Err(ValidationError::Leak("step"));
    }

    Ok(Explanation { device, steps, highlights })
}

fn parse_highlight(item: &Value) -> Result<Highlight, ValidationError> {
    let object = item.as_object().ok_or(ValidationError::NotJson("highlight object"))?;
    let text_of = |key: &str| match object.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    let role_name = text_of("role").to_lowercase();
    let role = Role::parse(&role_name).ok_or(ValidationError::BadRole(role_name))?;

    Ok(Highlight { role, text: text_of("text") })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_hints_are_trimmed() {
        let raw = r#"[" Indicator: 'broken' ", "Fodder: 'tea'", "Definition: 'drink'"]"#;
        let hints = validate_hints(raw, "ATE").unwrap();
        assert_eq!(hints, vec!["Indicator: 'broken'", "Fodder: 'tea'", "Definition: 'drink'"]);
    }

    #[test]
    fn test_hints_wrapped_in_fences() {
        let raw = "Sure!\n```json\n[\"Device: anagram\", \"Link: 'for'\", \"Surface: a tea break\"]\n```";
        assert_eq!(validate_hints(raw, "ATE").unwrap().len(), 3);
    }

    #[test]
    fn test_hint_count_must_be_three() {
        let raw = r#"["Device: anagram", "Link: 'for'"]"#;
        assert_eq!(validate_hints(raw, "ATE"), Err(ValidationError::HintCount(2)));
    }

    #[test]
    fn test_hint_leak_is_case_insensitive() {
        let raw = r#"["Device: anagram of ate", "Link: 'for'", "Surface: tea"]"#;
        assert_eq!(validate_hints(raw, "ATE"), Err(ValidationError::Leak("hint")));
    }

    #[test]
    fn test_hint_needs_known_label() {
        let raw = r#"["Clue type: anagram", "Link: 'for'", "Surface: tea"]"#;
        assert!(matches!(validate_hints(raw, "ATE"), Err(ValidationError::BadLabel(_))));

        let raw = r#"["no label here", "Link: 'for'", "Surface: tea"]"#;
        assert!(matches!(validate_hints(raw, "ATE"), Err(ValidationError::BadLabel(_))));
    }

    #[test]
    fn test_hints_reject_non_json() {
        assert_eq!(validate_hints("no idea", "ATE"), Err(ValidationError::NotJson("array")));
        assert_eq!(validate_hints("[1, 2, 3]", "ATE"), Err(ValidationError::NotString("hint")));
    }

    #[test]
    fn test_valid_explanation() {
        let raw = r#"Here you go: {
            "device": " anagram ",
            "steps": ["1. Indicator: 'broken'", "2. Fodder: 'tea'", "3. Definition: 'drink'"],
            "highlights": [
                { "role": "Indicator", "text": "Broken" },
                { "role": "fodder", "text": "tea" }
            ]
        }"#;

        let explanation = validate_explanation(raw, "ATE").unwrap();
        assert_eq!(explanation.device, "anagram");
        assert_eq!(explanation.steps.len(), 3);
        assert_eq!(
            explanation.highlights[0],
            Highlight { role: Role::Indicator, text: "Broken".into() }
        );
    }

    #[test]
    fn test_explanation_step_bounds() {
        let raw = r#"{ "device": "hidden", "steps": [], "highlights": [] }"#;
        assert_eq!(validate_explanation(raw, "ATE"), Err(ValidationError::StepCount(0)));

        let steps: Vec<String> = (1..=11).map(|i| format!("{i}. step")).collect();
        let raw = serde_json::json!({ "device": "hidden", "steps": steps }).to_string();
        assert_eq!(validate_explanation(&raw, "ATE"), Err(ValidationError::StepCount(11)));
    }

    #[test]
    fn test_explanation_rejects_bad_role_and_leaks() {
        let raw = r#"{ "steps": ["1. ok"], "highlights": [{ "role": "answer", "text": "x" }] }"#;
        assert_eq!(
            validate_explanation(raw, "ATE"),
            Err(ValidationError::BadRole("answer".into()))
        );

        let raw = r#"{ "steps": ["1. gives ATE"], "highlights": [] }"#;
        assert_eq!(validate_explanation(raw, "ate"), Err(ValidationError::Leak("step")));

        let raw = r#"{ "steps": ["1. ok"], "highlights": [{ "role": "fodder", "text": "eat, ate" }] }"#;
        assert_eq!(validate_explanation(raw, "ATE"), Err(ValidationError::Leak("highlight")));
    }

    #[test]
    fn test_empty_answer_never_leaks() {
        let raw = r#"{ "device": "charade", "steps": ["1. anything"] }"#;
        let explanation = validate_explanation(raw, "  ").unwrap();
        assert!(explanation.highlights.is_empty());
    }
}
