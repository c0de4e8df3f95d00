use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingValueType {
    String,
    Number,
    Boolean,
    Json,
}

impl SettingValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingValueType::String => "string",
            SettingValueType::Number => "number",
            SettingValueType::Boolean => "boolean",
            SettingValueType::Json => "json",
        }
    }

    /// Whether `raw` is a well-formed value of this type.
    pub fn accepts(&self, raw: &str) -> bool {
        match self {
            SettingValueType::String => true,
            SettingValueType::Number => raw.trim().parse::<f64>().is_ok_and(f64::is_finite),
            SettingValueType::Boolean => matches!(raw.trim(), "true" | "false"),
            SettingValueType::Json => serde_json::from_str::<Value>(raw).is_ok(),
        }
    }

    /// Typed JSON rendering of a stored value; falls back to the raw string.
    pub fn decode(&self, raw: &str) -> Value {
        match self {
            SettingValueType::String => Value::String(raw.to_string()),
            SettingValueType::Number => raw
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(raw.to_string())),
            SettingValueType::Boolean => match raw.trim() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => Value::String(raw.to_string()),
            },
            SettingValueType::Json => {
                serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
            }
        }
    }
}

impl FromStr for SettingValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(SettingValueType::String),
            "number" => Ok(SettingValueType::Number),
            "boolean" => Ok(SettingValueType::Boolean),
            "json" => Ok(SettingValueType::Json),
            _ => Err(format!("Invalid setting type: {}", s)),
        }
    }
}

/// Admin-editable key/value, e.g. `whatsapp_number`.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SiteSetting {
    #[serde(rename = "key")]
    pub setting_key: String,
    #[serde(rename = "value")]
    pub setting_value: String,
    #[serde(rename = "type")]
    pub value_type: String,
    pub description: Option<String>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

impl SiteSetting {
    pub fn value_type(&self) -> SettingValueType {
        self.value_type.parse().unwrap_or(SettingValueType::String)
    }

    pub fn typed_value(&self) -> Value {
        self.value_type().decode(&self.setting_value)
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    #[serde(rename = "slug")]
    pub page_slug: String,
    pub title: String,
    pub content: Value,
    pub translations: Value,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn values_are_checked_against_their_type() {
        assert!(SettingValueType::Number.accepts("9876543210"));
        assert!(SettingValueType::Number.accepts(" 12.5 "));
        assert!(!SettingValueType::Number.accepts("twelve"));
        assert!(SettingValueType::Boolean.accepts("true"));
        assert!(!SettingValueType::Boolean.accepts("yes"));
        assert!(SettingValueType::Json.accepts(r#"{"a":1}"#));
        assert!(!SettingValueType::Json.accepts("{a:1}"));
        assert!(SettingValueType::String.accepts("anything"));
    }

    #[test]
    fn decode_renders_typed_json() {
        assert_eq!(SettingValueType::Boolean.decode("false"), json!(false));
        assert_eq!(SettingValueType::Number.decode("42"), json!(42.0));
        assert_eq!(SettingValueType::Json.decode("[1,2]"), json!([1, 2]));
        assert_eq!(
            SettingValueType::String.decode("+91 98765"),
            json!("+91 98765")
        );
    }
}
