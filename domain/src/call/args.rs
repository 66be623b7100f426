//! Argument parsing for extracted tool calls.
//!
//! Splits `key=value, key2=value2` argument text into typed values. The
//! splitter is a character scan that tracks quote state (single or double),
//! parenthesis depth, and bracket depth, so commas inside quoted strings and
//! lists do not split parameters. A backslash before a quote keeps the quote
//! from toggling state.

use crate::core::value::{ArgValue, strip_quotes};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors from argument parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgParseError {
    #[error("unterminated {0} quote in argument text")]
    UnterminatedQuote(char),
}

/// Parse raw argument text into a typed key/value mapping.
///
/// Fragments without an `=` are skipped. Keys are trimmed and lose one layer
/// of surrounding quotes. Empty input produces an empty mapping.
pub fn parse_arguments(raw: &str) -> Result<BTreeMap<String, ArgValue>, ArgParseError> {
    let mut args = BTreeMap::new();

    for fragment in split_parameters(raw)? {
        let Some((key, value)) = fragment.split_once('=') else {
            continue;
        };
        let key = strip_quotes(key.trim()).to_string();
        if key.is_empty() {
            continue;
        }
        args.insert(key, ArgValue::parse(value));
    }

    Ok(args)
}

/// Split argument text on commas that sit outside quotes at depth zero.
fn split_parameters(raw: &str) -> Result<Vec<String>, ArgParseError> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quote_char = '\0';
    let mut paren_depth = 0i32;
    let mut bracket_depth = 0i32;
    let mut prev = '\0';

    for ch in raw.chars() {
        let escaped = prev == '\\';
        if in_quotes {
            if ch == quote_char && !escaped {
                in_quotes = false;
            }
            current.push(ch);
        } else {
            match ch {
                '"' | '\'' if !escaped => {
                    in_quotes = true;
                    quote_char = ch;
                    current.push(ch);
                }
                '(' => {
                    paren_depth += 1;
                    current.push(ch);
                }
                ')' => {
                    paren_depth -= 1;
                    current.push(ch);
                }
                '[' => {
                    bracket_depth += 1;
                    current.push(ch);
                }
                ']' => {
                    bracket_depth -= 1;
                    current.push(ch);
                }
                ',' if paren_depth == 0 && bracket_depth == 0 => {
                    parts.push(std::mem::take(&mut current));
                }
                _ => current.push(ch),
            }
        }
        prev = ch;
    }

    if in_quotes {
        return Err(ArgParseError::UnterminatedQuote(quote_char));
    }
    if !current.trim().is_empty() {
        parts.push(current);
    }

    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_pairs() {
        let args = parse_arguments("query=\"service:web\", limit=10").unwrap();
        assert_eq!(args.get("query"), Some(&ArgValue::Str("service:web".to_string())));
        assert_eq!(args.get("limit"), Some(&ArgValue::Int(10)));
    }

    #[test]
    fn empty_input_is_empty_map() {
        assert!(parse_arguments("").unwrap().is_empty());
        assert!(parse_arguments("   ").unwrap().is_empty());
    }

    #[test]
    fn comma_inside_quotes_does_not_split() {
        let args = parse_arguments("query=\"status:error, status:warn\", limit=5").unwrap();
        assert_eq!(
            args.get("query"),
            Some(&ArgValue::Str("status:error, status:warn".to_string()))
        );
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn comma_inside_brackets_does_not_split() {
        let args = parse_arguments("group_states=[\"alert\", \"warn\"], limit=3").unwrap();
        assert_eq!(
            args.get("group_states"),
            Some(&ArgValue::List(vec!["alert".to_string(), "warn".to_string()]))
        );
        assert_eq!(args.get("limit"), Some(&ArgValue::Int(3)));
    }

    #[test]
    fn escaped_quote_does_not_toggle_state() {
        let args = parse_arguments(r#"query="say \"hi\", ok", limit=1"#).unwrap();
        assert_eq!(
            args.get("query"),
            Some(&ArgValue::Str(r#"say \"hi\", ok"#.to_string()))
        );
        assert_eq!(args.get("limit"), Some(&ArgValue::Int(1)));
    }

    #[test]
    fn fragment_without_equals_is_skipped() {
        let args = parse_arguments("limit=2, stray, query=\"x\"").unwrap();
        assert_eq!(args.len(), 2);
        assert!(args.contains_key("limit"));
        assert!(args.contains_key("query"));
    }

    #[test]
    fn quoted_key_is_unwrapped() {
        let args = parse_arguments("\"limit\"=4").unwrap();
        assert_eq!(args.get("limit"), Some(&ArgValue::Int(4)));
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        let err = parse_arguments("query=\"oops, limit=5").unwrap_err();
        assert_eq!(err, ArgParseError::UnterminatedQuote('"'));
    }

    #[test]
    fn single_quotes_work_too() {
        let args = parse_arguments("tags='env:prod, team:sre'").unwrap();
        assert_eq!(
            args.get("tags"),
            Some(&ArgValue::Str("env:prod, team:sre".to_string()))
        );
    }

    #[test]
    fn nested_parens_in_value() {
        let args = parse_arguments("query=avg(last_5m), limit=1").unwrap();
        assert_eq!(args.get("query"), Some(&ArgValue::Str("avg(last_5m)".to_string())));
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn duplicate_key_last_wins() {
        let args = parse_arguments("limit=1, limit=2").unwrap();
        assert_eq!(args.get("limit"), Some(&ArgValue::Int(2)));
    }
}
