//! Raw field values as the record store returns them.
//!
//! Source columns are loosely typed: the same column may hold integers,
//! floats, booleans, free text or nothing at all. Values are kept as-is
//! and coerced per metric, so a value that is useless for one metric can
//! still count for another.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single named-field record: column name to raw value.
pub type Record = BTreeMap<String, Field>;

/// A raw, possibly dirty, column value.
///
/// Arrays and objects have no scalar reading and load as `Null`, so a
/// nested value in one column never drops the rest of the record.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum Field {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Field {
    /// Look up a column in a record; absent columns read as `Null`.
    pub fn get(record: &Record, column: &str) -> Field {
        record.get(column).cloned().unwrap_or_default()
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Field::Null)
    }

    /// Safe cast to an integer.
    ///
    /// Floats and numeric text are accepted only when they hold a whole,
    /// finite number (`"4"`, `"4.0"`, `4.0`). Everything else is `None`.
    pub fn to_int(&self) -> Option<i64> {
        match self {
            Field::Int(v) => Some(*v),
            Field::Float(v) => whole_number(*v),
            Field::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(whole_number))
            }
            Field::Null | Field::Bool(_) => None,
        }
    }

    /// Safe cast to a finite float.
    pub fn to_float(&self) -> Option<f64> {
        let value = match self {
            Field::Int(v) => *v as f64,
            Field::Float(v) => *v,
            Field::Text(s) => s.trim().parse::<f64>().ok()?,
            Field::Null | Field::Bool(_) => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Interpret a flag column (`1`/`0`, `true`/`false`, `yes`/`no`).
    pub fn to_flag(&self) -> Option<bool> {
        match self {
            Field::Bool(b) => Some(*b),
            Field::Int(0) => Some(false),
            Field::Int(1) => Some(true),
            Field::Float(v) if *v == 0.0 => Some(false),
            Field::Float(v) if *v == 1.0 => Some(true),
            Field::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "1.0" | "true" | "t" | "yes" | "y" => Some(true),
                "0" | "0.0" | "false" | "f" | "no" | "n" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Grouping key form of the value. Blank text counts as missing.
    pub fn to_key(&self) -> Option<String> {
        match self {
            Field::Null => None,
            Field::Text(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
            other => Some(other.to_string()),
        }
    }
}

impl From<Value> for Field {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(b) => Field::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(v) => Field::Int(v),
                None => n.as_f64().map(Field::Float).unwrap_or_default(),
            },
            Value::String(s) => Field::Text(s),
            Value::Null | Value::Array(_) | Value::Object(_) => Field::Null,
        }
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Field::from)
    }
}

fn whole_number(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Null => Ok(()),
            Field::Bool(b) => write!(f, "{}", b),
            Field::Int(v) => write!(f, "{}", v),
            Field::Float(v) => write!(f, "{}", v),
            Field::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for Field {
    fn from(v: bool) -> Self {
        Field::Bool(v)
    }
}

impl From<i64> for Field {
    fn from(v: i64) -> Self {
        Field::Int(v)
    }
}

impl From<i32> for Field {
    fn from(v: i32) -> Self {
        Field::Int(v as i64)
    }
}

impl From<f64> for Field {
    fn from(v: f64) -> Self {
        Field::Float(v)
    }
}

impl From<&str> for Field {
    fn from(s: &str) -> Self {
        Field::Text(s.to_string())
    }
}

impl From<String> for Field {
    fn from(s: String) -> Self {
        Field::Text(s)
    }
}

impl<T: Into<Field>> From<Option<T>> for Field {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or_default()
    }
}
