use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::models::{SettingValueType, SiteSetting};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingRequest {
    /// Scalars are stored as their string form; objects and arrays as JSON.
    pub value: Value,

    #[serde(rename = "type")]
    pub value_type: Option<SettingValueType>,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
}

impl UpdateSettingRequest {
    /// Storage form of `value`.
    pub fn raw_value(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingResponse {
    pub key: String,
    pub value: Value,
    #[serde(rename = "type")]
    pub value_type: SettingValueType,
    pub description: Option<String>,
}

impl From<&SiteSetting> for SettingResponse {
    fn from(setting: &SiteSetting) -> Self {
        Self {
            key: setting.setting_key.clone(),
            value: setting.typed_value(),
            value_type: setting.value_type(),
            description: setting.description.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePageRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    pub content: Value,

    #[serde(default = "empty_object")]
    pub translations: Value,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_values_are_stored_as_strings() {
        let req: UpdateSettingRequest =
            serde_json::from_value(json!({ "value": 9876543210u64, "type": "number" })).unwrap();
        assert_eq!(req.raw_value(), "9876543210");
        assert_eq!(req.value_type, Some(SettingValueType::Number));

        let req: UpdateSettingRequest =
            serde_json::from_value(json!({ "value": "+919876543210" })).unwrap();
        assert_eq!(req.raw_value(), "+919876543210");

        let req: UpdateSettingRequest =
            serde_json::from_value(json!({ "value": { "a": 1 } })).unwrap();
        assert_eq!(req.raw_value(), r#"{"a":1}"#);
    }
}
