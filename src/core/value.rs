use serde::{Deserialize, Serialize};
use std::fmt;

/// Externally visible value of a widget: a nullable scalar.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BasicValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl BasicValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Empty text reads as null; everything else passes through.
    pub fn normalized(self) -> Self {
        match self {
            Self::Text(text) if text.is_empty() => Self::Null,
            other => other,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn to_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            Self::Number(n) => Some(*n != 0.0),
            Self::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Some(true),
                "0" | "false" | "no" | "off" => Some(false),
                _ => None,
            },
            Self::Null => None,
        }
    }

    /// Scalar rendered as element text. Null becomes the empty string.
    pub fn to_text_scalar(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(flag) => flag.to_string(),
            Self::Number(n) => format_number(*n),
            Self::Text(text) => text.clone(),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl fmt::Display for BasicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            other => f.write_str(&other.to_text_scalar()),
        }
    }
}

impl From<&str> for BasicValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for BasicValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for BasicValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for BasicValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for BasicValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl<T: Into<BasicValue>> From<Option<T>> for BasicValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::BasicValue;

    #[test]
    fn empty_text_normalizes_to_null() {
        assert_eq!(BasicValue::from("").normalized(), BasicValue::Null);
        assert_eq!(BasicValue::from("x").normalized(), BasicValue::from("x"));
        assert_eq!(BasicValue::Number(0.0).normalized(), BasicValue::Number(0.0));
    }

    #[test]
    fn integral_numbers_render_without_fraction() {
        assert_eq!(BasicValue::from(5_i64).to_text_scalar(), "5");
        assert_eq!(BasicValue::Number(12.5).to_text_scalar(), "12.5");
        assert_eq!(BasicValue::Null.to_text_scalar(), "");
    }

    #[test]
    fn deserializes_untagged_scalars() {
        let values: Vec<BasicValue> =
            serde_json::from_str(r#"[null, true, 3, "abc"]"#).expect("parse");
        assert_eq!(
            values,
            vec![
                BasicValue::Null,
                BasicValue::Bool(true),
                BasicValue::Number(3.0),
                BasicValue::from("abc"),
            ]
        );
    }
}
