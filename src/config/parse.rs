//! Parser for the `{config:...}` payload.
//!
//! ```text
//! payload := clause ("," clause)*
//! clause  := path op value?
//! path    := segment ("." segment)*
//! op      := "=" | "+=" | "-=" | "!="
//! value   := "true" | "false" | "null" | number | "\"" string "\"" | "[" k=v, ... "]" | bare
//! ```

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use thiserror::Error;

use super::split::{find_top_level_eq, split_top_level};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConfigOp {
    /// `=` overwrite
    Set,
    /// `+=` append to a list
    Append,
    /// `-=` remove equal list elements
    Remove,
    /// `!=` reset
    Reset,
}

impl ConfigOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigOp::Set => "=",
            ConfigOp::Append => "+=",
            ConfigOp::Remove => "-=",
            ConfigOp::Reset => "!=",
        }
    }
}

impl fmt::Display for ConfigOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `path op value` clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigAssignment {
    pub path: Vec<String>,
    pub op: ConfigOp,
    /// `None` only for a bare reset (`key!=`).
    pub value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing operator in config clause `{clause}`")]
    MissingOperator { clause: String },

    #[error("empty key path in config clause `{clause}`")]
    EmptyPath { clause: String },
}

/// Parse every clause of `payload`, keeping good and bad clauses in order.
pub fn parse_config(payload: &str) -> Vec<Result<ConfigAssignment, ConfigError>> {
    split_top_level(payload.trim())
        .into_iter()
        .map(parse_clause)
        .collect()
}

pub fn parse_clause(clause: &str) -> Result<ConfigAssignment, ConfigError> {
    let eq = find_top_level_eq(clause).ok_or_else(|| ConfigError::MissingOperator {
        clause: clause.to_string(),
    })?;

    let (op, path_end) = match clause[..eq].chars().next_back() {
        Some('+') => (ConfigOp::Append, eq - 1),
        Some('-') => (ConfigOp::Remove, eq - 1),
        Some('!') => (ConfigOp::Reset, eq - 1),
        _ => (ConfigOp::Set, eq),
    };

    let path = parse_path(&clause[..path_end]);
    if path.is_empty() {
        return Err(ConfigError::EmptyPath {
            clause: clause.to_string(),
        });
    }

    let right = clause[eq + 1..].trim();
    let value = if op == ConfigOp::Reset && right.is_empty() {
        None
    } else {
        Some(parse_value(right))
    };

    Ok(ConfigAssignment { path, op, value })
}

fn parse_path(raw: &str) -> Vec<String> {
    raw.split('.')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn parse_value(raw: &str) -> Value {
    let raw = raw.trim();
    if raw.len() >= 2 && raw.starts_with('[') && raw.ends_with(']') {
        return parse_object(&raw[1..raw.len() - 1]);
    }
    parse_scalar(raw)
}

/// `k=v, k2=v2`; a key without `=` is a `true` flag.
fn parse_object(inner: &str) -> Value {
    let mut object = Map::new();
    for part in split_top_level(inner) {
        match find_top_level_eq(part) {
            Some(eq) => {
                let key = part[..eq].trim();
                if !key.is_empty() {
                    object.insert(key.to_string(), parse_value(&part[eq + 1..]));
                }
            }
            None => {
                object.insert(part.to_string(), Value::Bool(true));
            }
        }
    }
    Value::Object(object)
}

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("valid number pattern"));

fn parse_scalar(raw: &str) -> Value {
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" => return Value::Null,
        _ => {}
    }

    if NUMBER.is_match(raw) {
        if let Ok(int) = raw.parse::<i64>() {
            return Value::Number(int.into());
        }
        if let Some(number) = raw.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(number);
        }
    }

    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return Value::String(raw[1..raw.len() - 1].replace("\\\"", "\""));
    }

    Value::String(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("title = Report", &["title"], ConfigOp::Set, Some(json!("Report")))]
    #[case("plugins+=docgen", &["plugins"], ConfigOp::Append, Some(json!("docgen")))]
    #[case("plugins -= docgen", &["plugins"], ConfigOp::Remove, Some(json!("docgen")))]
    #[case("plugins!=", &["plugins"], ConfigOp::Reset, None)]
    #[case("a.b.c=1", &["a", "b", "c"], ConfigOp::Set, Some(json!(1)))]
    #[case("ratio=-0.5", &["ratio"], ConfigOp::Set, Some(json!(-0.5)))]
    #[case("flag=true", &["flag"], ConfigOp::Set, Some(json!(true)))]
    #[case("empty=", &["empty"], ConfigOp::Set, Some(json!("")))]
    #[case(r#"quote="say \"hi\"""#, &["quote"], ConfigOp::Set, Some(json!("say \"hi\"")))]
    #[case(r#"label="a!=b""#, &["label"], ConfigOp::Set, Some(json!("a!=b")))]
    fn test_parse_clause(
        #[case] clause: &str,
        #[case] path: &[&str],
        #[case] op: ConfigOp,
        #[case] value: Option<Value>,
    ) {
        let parsed = parse_clause(clause).unwrap();
        assert_eq!(parsed.path, path);
        assert_eq!(parsed.op, op);
        assert_eq!(parsed.value, value);
    }

    #[test]
    fn test_parse_object_literal() {
        let parsed = parse_clause("outputs+=[type=json, path=\"out/doc.json\", draft]").unwrap();
        assert_eq!(
            parsed.value,
            Some(json!({"type": "json", "path": "out/doc.json", "draft": true}))
        );
    }

    #[test]
    fn test_bad_clauses_do_not_hide_good_ones() {
        let results = parse_config("a=1, nonsense, =2, b+=x");
        assert_eq!(results.len(), 4);
        assert!(results[0].is_ok());
        assert_eq!(
            results[1],
            Err(ConfigError::MissingOperator {
                clause: "nonsense".to_string()
            })
        );
        assert!(matches!(results[2], Err(ConfigError::EmptyPath { .. })));
        assert_eq!(results[3].as_ref().unwrap().op, ConfigOp::Append);
    }
}
