//! Typed argument values.
//!
//! Tool arguments arrive as raw text fragments inside a `TOOL_CALL:` line.
//! [`ArgValue::parse`] applies a fixed typing priority to each fragment:
//! double-quoted string, single-quoted string, `[...]` list, boolean,
//! integer, `digits.digits` float, and finally a verbatim bare string.

use serde::{Deserialize, Serialize};

/// A typed tool argument value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArgValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// List items keep their textual form; one layer of surrounding quotes
    /// is stripped per item. Quote-aware splitting inside lists is not
    /// supported: items containing commas will be split apart.
    List(Vec<String>),
}

/// Strip one layer of matching surrounding quotes, if present.
pub fn strip_quotes(s: &str) -> &str {
    if s.len() >= 2 {
        let bytes = s.as_bytes();
        if (bytes[0] == b'"' && bytes[s.len() - 1] == b'"')
            || (bytes[0] == b'\'' && bytes[s.len() - 1] == b'\'')
        {
            return &s[1..s.len() - 1];
        }
    }
    s
}

impl ArgValue {
    /// Parse a raw value fragment into a typed value.
    pub fn parse(raw: &str) -> Self {
        let v = raw.trim();

        if v.len() >= 2 && v.starts_with('"') && v.ends_with('"') {
            return ArgValue::Str(v[1..v.len() - 1].to_string());
        }
        if v.len() >= 2 && v.starts_with('\'') && v.ends_with('\'') {
            return ArgValue::Str(v[1..v.len() - 1].to_string());
        }
        if v.len() >= 2 && v.starts_with('[') && v.ends_with(']') {
            let interior = &v[1..v.len() - 1];
            let items = if interior.trim().is_empty() {
                Vec::new()
            } else {
                interior
                    .split(',')
                    .map(|item| strip_quotes(item.trim()).to_string())
                    .collect()
            };
            return ArgValue::List(items);
        }
        if v.eq_ignore_ascii_case("true") {
            return ArgValue::Bool(true);
        }
        if v.eq_ignore_ascii_case("false") {
            return ArgValue::Bool(false);
        }
        if !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = v.parse::<i64>() {
                return ArgValue::Int(n);
            }
        }
        if let Some((whole, frac)) = v.split_once('.')
            && !whole.is_empty()
            && !frac.is_empty()
            && whole.bytes().all(|b| b.is_ascii_digit())
            && frac.bytes().all(|b| b.is_ascii_digit())
            && let Ok(f) = v.parse::<f64>()
        {
            return ArgValue::Float(f);
        }

        ArgValue::Str(v.to_string())
    }

    /// Convert into a JSON value for handing to tool handlers.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ArgValue::Str(s) => serde_json::Value::String(s.clone()),
            ArgValue::Int(n) => serde_json::Value::from(*n),
            ArgValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            ArgValue::Bool(b) => serde_json::Value::Bool(*b),
            ArgValue::List(items) => {
                serde_json::Value::Array(items.iter().cloned().map(serde_json::Value::String).collect())
            }
        }
    }
}

impl std::fmt::Display for ArgValue {
    /// Render the value the way it would be written in a tool call,
    /// for echoing the invoked command back to the user.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArgValue::Str(s) => write!(f, "\"{}\"", s),
            ArgValue::Int(n) => write!(f, "{}", n),
            ArgValue::Float(x) => write!(f, "{}", x),
            ArgValue::Bool(b) => write!(f, "{}", b),
            ArgValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "\"{}\"", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_double_quoted() {
        assert_eq!(ArgValue::parse("\"hello world\""), ArgValue::Str("hello world".to_string()));
    }

    #[test]
    fn parse_single_quoted() {
        assert_eq!(ArgValue::parse("'service:web'"), ArgValue::Str("service:web".to_string()));
    }

    #[test]
    fn parse_list() {
        assert_eq!(
            ArgValue::parse("[\"alert\", 'warn', ok]"),
            ArgValue::List(vec!["alert".to_string(), "warn".to_string(), "ok".to_string()])
        );
    }

    #[test]
    fn parse_empty_list() {
        assert_eq!(ArgValue::parse("[]"), ArgValue::List(Vec::new()));
        assert_eq!(ArgValue::parse("[  ]"), ArgValue::List(Vec::new()));
    }

    #[test]
    fn parse_bool_case_insensitive() {
        assert_eq!(ArgValue::parse("true"), ArgValue::Bool(true));
        assert_eq!(ArgValue::parse("True"), ArgValue::Bool(true));
        assert_eq!(ArgValue::parse("FALSE"), ArgValue::Bool(false));
    }

    #[test]
    fn parse_int() {
        assert_eq!(ArgValue::parse("42"), ArgValue::Int(42));
    }

    #[test]
    fn parse_float() {
        assert_eq!(ArgValue::parse("3.14"), ArgValue::Float(3.14));
    }

    #[test]
    fn negative_numbers_stay_strings() {
        // Only all-digit fragments are numeric; signs fall through
        assert_eq!(ArgValue::parse("-5"), ArgValue::Str("-5".to_string()));
    }

    #[test]
    fn bare_string_verbatim() {
        assert_eq!(
            ArgValue::parse("system.cpu.user"),
            ArgValue::Str("system.cpu.user".to_string())
        );
    }

    #[test]
    fn quoted_digits_stay_strings() {
        assert_eq!(ArgValue::parse("\"42\""), ArgValue::Str("42".to_string()));
    }

    #[test]
    fn display_echoes_call_syntax() {
        assert_eq!(ArgValue::Str("web".to_string()).to_string(), "\"web\"");
        assert_eq!(ArgValue::Int(10).to_string(), "10");
        assert_eq!(ArgValue::Bool(true).to_string(), "true");
        assert_eq!(
            ArgValue::List(vec!["a".to_string(), "b".to_string()]).to_string(),
            "[\"a\", \"b\"]"
        );
    }

    #[test]
    fn to_json_conversions() {
        assert_eq!(ArgValue::Int(5).to_json(), serde_json::json!(5));
        assert_eq!(ArgValue::Bool(false).to_json(), serde_json::json!(false));
        assert_eq!(
            ArgValue::List(vec!["x".to_string()]).to_json(),
            serde_json::json!(["x"])
        );
    }
}
