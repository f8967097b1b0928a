use serde::{Deserialize, Serialize};
use std::fmt;

/// A typed cell read from a task log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Semicolon separated numbers such as `(308; 379)`.
    Coords(Vec<f64>),
    Text(String),
}

impl Value {
    /// Normalize a raw log token. Never fails; anything unrecognized comes
    /// back as lowercased text.
    ///
    /// Percentages keep their scale: `"50%"` is `50.0`, not `0.5`.
    pub fn normalize(token: &str) -> Value {
        let text = token.trim().to_lowercase();
        if text.is_empty() || text == "." {
            return Value::Null;
        }
        match text.as_str() {
            "false" => return Value::Bool(false),
            "true" => return Value::Bool(true),
            _ => {}
        }
        if text.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = text.parse::<i64>() {
                return Value::Int(n);
            }
        }
        // "Block 4 Calculations" heads a task-4 block summary row.
        if text.contains("block") && text.contains("calculations") {
            if let Some(n) = text
                .split_whitespace()
                .nth(1)
                .and_then(|word| word.parse::<i64>().ok())
            {
                return Value::Int(n);
            }
        }
        if let Some(n) = parse_percent(&text) {
            return Value::Float(n);
        }
        if text.contains(';') {
            let parts: Option<Vec<f64>> = text
                .split(';')
                .map(|part| {
                    part.trim()
                        .trim_matches(|c| c == '(' || c == ')')
                        .trim()
                        .parse::<f64>()
                        .ok()
                })
                .collect();
            if let Some(coords) = parts {
                return Value::Coords(coords);
            }
        }
        Value::Text(text)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view used by the summary means. Booleans count as 0/1 so a
    /// `Correct` column averages to an accuracy.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Int(n) => Some(*n as f64),
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Null, zero, false, empty text and empty coordinate lists are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(x) => *x != 0.0,
            Value::Coords(c) => !c.is_empty(),
            Value::Text(s) => !s.is_empty(),
        }
    }
}

/// Digits with at most dots inside and an optional trailing `%`.
fn parse_percent(text: &str) -> Option<f64> {
    let stripped = text.trim_end_matches('%');
    let digits_only = stripped.bytes().all(|b| b.is_ascii_digit() || b == b'.');
    if !digits_only || !stripped.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    stripped.parse::<f64>().ok()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Coords(coords) => {
                let joined: Vec<String> = coords.iter().map(|c| c.to_string()).collect();
                write!(f, "({})", joined.join(";"))
            }
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_booleans_and_missing() {
        assert_eq!(Value::normalize("TRUE"), Value::Bool(true));
        assert_eq!(Value::normalize(" False"), Value::Bool(false));
        assert_eq!(Value::normalize("."), Value::Null);
        assert_eq!(Value::normalize(""), Value::Null);
        assert_eq!(Value::normalize("   "), Value::Null);
    }

    #[test]
    fn normalizes_numbers() {
        assert_eq!(Value::normalize("45"), Value::Int(45));
        assert_eq!(Value::normalize("33.5%"), Value::Float(33.5));
        assert_eq!(Value::normalize("100%"), Value::Float(100.0));
        assert_eq!(Value::normalize("0.6529274"), Value::Float(0.6529274));
    }

    #[test]
    fn block_calculation_label_yields_block_number() {
        assert_eq!(Value::normalize("Block 4 Calculations"), Value::Int(4));
        assert_eq!(
            Value::normalize("Block x Calculations"),
            Value::Text("block x calculations".into())
        );
    }

    #[test]
    fn normalizes_coordinates() {
        assert_eq!(
            Value::normalize("308;379"),
            Value::Coords(vec![308.0, 379.0])
        );
        assert_eq!(
            Value::normalize(" (960; 530)"),
            Value::Coords(vec![960.0, 530.0])
        );
        assert_eq!(
            Value::normalize("(5;3;6;3)"),
            Value::Coords(vec![5.0, 3.0, 6.0, 3.0])
        );
    }

    #[test]
    fn falls_back_to_lowercase_text() {
        assert_eq!(Value::normalize(" Left "), Value::Text("left".into()));
        assert_eq!(Value::normalize("-3.5"), Value::Text("-3.5".into()));
        assert_eq!(Value::normalize("1.2.3"), Value::Text("1.2.3".into()));
        assert_eq!(Value::normalize("%"), Value::Text("%".into()));
    }

    #[test]
    fn numeric_view_and_truthiness() {
        assert_eq!(Value::Bool(true).as_f64(), Some(1.0));
        assert_eq!(Value::Text("same".into()).as_f64(), None);
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(Value::Float(2.5).is_truthy());
    }

    #[test]
    fn displays_like_the_log_files() {
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Coords(vec![308.0, 379.5]).to_string(), "(308;379.5)");
    }

    #[test]
    fn untagged_json_shape() {
        let values = vec![
            Value::Null,
            Value::Bool(false),
            Value::Int(3),
            Value::Float(0.5),
            Value::Coords(vec![1.0, 2.0]),
            Value::Text("same".into()),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[null,false,3,0.5,[1.0,2.0],"same"]"#);
        let back: Vec<Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }
}
