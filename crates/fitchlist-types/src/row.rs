use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::{Error, Result};

/// Identifier of a row in a list (platform ids are either numeric or textual)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowKey {
    Number(i64),
    Text(String),
}

impl RowKey {
    /// Parse a key typed by a user: integers become `Number`, anything else `Text`.
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<i64>() {
            Ok(n) => RowKey::Number(n),
            Err(_) => RowKey::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Number(n) => write!(f, "{}", n),
            RowKey::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RowKey {
    fn from(value: i64) -> Self {
        RowKey::Number(value)
    }
}

impl From<&str> for RowKey {
    fn from(value: &str) -> Self {
        RowKey::Text(value.to_string())
    }
}

impl From<String> for RowKey {
    fn from(value: String) -> Self {
        RowKey::Text(value)
    }
}

/// Entities that can be rendered and selected in a list
pub trait Keyed {
    fn row_key(&self) -> RowKey;
}

/// Generic entity decoded from an API payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub key: RowKey,
    pub fields: Map<String, Value>,
}

impl Record {
    /// Build a record from a JSON object, taking its key from `key_field`.
    pub fn from_json(value: Value, key_field: &str) -> Result<Self> {
        let Value::Object(fields) = value else {
            return Err(Error::NotAnObject);
        };

        let key = match fields.get(key_field) {
            None | Some(Value::Null) => return Err(Error::MissingKey(key_field.to_string())),
            Some(Value::String(s)) => RowKey::Text(s.clone()),
            Some(Value::Number(n)) => match n.as_i64() {
                Some(n) => RowKey::Number(n),
                None => return Err(Error::InvalidKey(key_field.to_string())),
            },
            Some(_) => return Err(Error::InvalidKey(key_field.to_string())),
        };

        Ok(Self { key, fields })
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        lookup(&self.fields, field)
    }

    /// Display text for a cell. Dotted paths reach into nested objects
    /// (`user.username`); missing values render as an empty string.
    pub fn text(&self, field: &str) -> String {
        match self.get(field) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Bool(true)) => "yes".to_string(),
            Some(Value::Bool(false)) => "no".to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", "),
            Some(other) => other.to_string(),
        }
    }
}

impl Keyed for Record {
    fn row_key(&self) -> RowKey {
        self.key.clone()
    }
}

fn lookup<'a>(fields: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    if let Some(value) = fields.get(path) {
        return Some(value);
    }
    let (head, rest) = path.split_once('.')?;
    match fields.get(head)? {
        Value::Object(inner) => lookup(inner, rest),
        _ => None,
    }
}
