use serde::{Deserialize, Serialize};
use serde_json::Value;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    Boolean,
    Number,
    Text,
    Json,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown setting type '{0}'")]
pub struct UnknownSettingType(pub String);

impl SettingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingType::Boolean => "boolean",
            SettingType::Number => "number",
            SettingType::Text => "text",
            SettingType::Json => "json",
        }
    }
}

impl SettingType {
    /// Type tag implied by a bare JSON value when the caller does not name one.
    pub fn infer(value: &Value) -> Self {
        match value {
            Value::Bool(_) => SettingType::Boolean,
            Value::Number(_) => SettingType::Number,
            Value::String(_) => SettingType::Text,
            _ => SettingType::Json,
        }
    }
}

impl fmt::Display for SettingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingType {
    type Err = UnknownSettingType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "boolean" => Ok(SettingType::Boolean),
            "number" => Ok(SettingType::Number),
            "text" => Ok(SettingType::Text),
            "json" => Ok(SettingType::Json),
            _ => Err(UnknownSettingType(s.to_string())),
        }
    }
}

impl TryFrom<String> for SettingType {
    type Error = UnknownSettingType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A decoded setting value. Serializes to the bare JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Boolean(bool),
    Number(f64),
    Text(String),
    Json(Value),
}

impl SettingValue {
    pub fn setting_type(&self) -> SettingType {
        match self {
            SettingValue::Boolean(_) => SettingType::Boolean,
            SettingValue::Number(_) => SettingType::Number,
            SettingValue::Text(_) => SettingType::Text,
            SettingValue::Json(_) => SettingType::Json,
        }
    }

    /// Decodes a stored string according to its type tag.
    pub fn decode(raw: &str, value_type: SettingType) -> Self {
        match value_type {
            SettingType::Boolean => SettingValue::Boolean(raw == "true"),
            SettingType::Number => match raw.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => SettingValue::Number(n),
                _ => {
                    warn!("Setting value '{}' is tagged as number but does not parse, keeping text", raw);
                    SettingValue::Text(raw.to_string())
                }
            },
            SettingType::Text => SettingValue::Text(raw.to_string()),
            SettingType::Json => SettingValue::Json(
                serde_json::from_str(raw).unwrap_or_else(|_| Value::Object(Default::default())),
            ),
        }
    }

    /// Encodes to the stored string form and its type tag.
    pub fn encode(&self) -> (String, SettingType) {
        let raw = match self {
            SettingValue::Boolean(b) => b.to_string(),
            SettingValue::Number(n) => n.to_string(),
            SettingValue::Text(s) => s.clone(),
            SettingValue::Json(v) => v.to_string(),
        };
        (raw, self.setting_type())
    }

    /// Coerces an incoming JSON value to the requested type.
    pub fn from_json(value_type: SettingType, value: Value) -> Result<Self, String> {
        match (value_type, value) {
            (SettingType::Boolean, Value::Bool(b)) => Ok(SettingValue::Boolean(b)),
            (SettingType::Boolean, Value::String(s)) if s == "true" || s == "false" => {
                Ok(SettingValue::Boolean(s == "true"))
            }
            (SettingType::Number, Value::Number(n)) => n
                .as_f64()
                .map(SettingValue::Number)
                .ok_or_else(|| "number out of range".to_string()),
            (SettingType::Number, Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(SettingValue::Number)
                .ok_or_else(|| format!("'{}' is not a number", s)),
            (SettingType::Text, Value::String(s)) => Ok(SettingValue::Text(s)),
            (SettingType::Text, other) => Ok(SettingValue::Text(other.to_string())),
            (SettingType::Json, other) => Ok(SettingValue::Json(other)),
            (t, other) => Err(format!("value {} does not match type {}", other, t)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Setting {
    pub key: String,
    pub value: String,
    #[sqlx(try_from = "String")]
    pub value_type: SettingType,
    pub is_public: bool,
    pub updated_at: DateTime<Utc>,
}

impl Setting {
    pub fn new(key: String, value: &SettingValue, is_public: bool, now: DateTime<Utc>) -> Self {
        let (raw, value_type) = value.encode();
        Self {
            key,
            value: raw,
            value_type,
            is_public,
            updated_at: now,
        }
    }

    pub fn decoded(&self) -> SettingValue {
        SettingValue::decode(&self.value, self.value_type)
    }
}
