//! Serde model of a single element descriptor in a layout description.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::{FormError, Result};
use crate::expression::Meta;
use crate::widget::ElementState;

/// Distinguish an explicit `null` from an absent field: absent stays `None`,
/// `null` becomes `Some(Value::Null)`.
pub(crate) fn deserialize_some<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// One element of a layout: a field, a container, or a layout wrapper.
///
/// Common entries are typed. Widget-specific entries (`entries`, `html`,
/// `min`, `placeholder`, ...) stay in `extra` for the widget factory to read.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDescriptor {
    #[serde(rename = "type")]
    pub element_type: Option<String>,
    pub key: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub value: Option<Value>,
    pub state: Option<ElementState>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub exclude_value: Option<Value>,
    pub meta: Option<Meta>,
    /// Kept raw: a malformed selector is reported on the element, not here.
    pub selector: Option<Value>,
    /// Child descriptors of a panel or layout wrapper. Kept raw so each child
    /// fails on its own.
    pub form_data: Option<Vec<Value>>,
    pub entry_type: Option<ListEntryType>,
    pub entry_types: Option<Vec<ListEntryType>>,
    pub label: Option<String>,
    pub hint: Option<String>,
    pub help: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ElementDescriptor {
    /// Parse a descriptor from a raw layout entry.
    pub fn from_value(value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(FormError::InvalidLayout(format!(
                "element descriptor must be an object, got {value}"
            )));
        }
        Ok(Self::deserialize(value)?)
    }

    /// The `type` entry, or [`FormError::MissingType`].
    pub fn require_type(&self) -> Result<&str> {
        self.element_type.as_deref().ok_or(FormError::MissingType)
    }

    /// The key, or an empty string for display purposes.
    pub fn key_or_empty(&self) -> &str {
        self.key.as_deref().unwrap_or("")
    }

    /// A widget-specific string entry.
    pub fn str_extra(&self, name: &str) -> Option<&str> {
        self.extra.get(name).and_then(Value::as_str)
    }

    /// A widget-specific number entry.
    pub fn f64_extra(&self, name: &str) -> Option<f64> {
        self.extra.get(name).and_then(Value::as_f64)
    }

    /// A widget-specific boolean entry.
    pub fn bool_extra(&self, name: &str) -> Option<bool> {
        self.extra.get(name).and_then(Value::as_bool)
    }
}

/// A list entry template: an optional add-button label and the layout of a
/// single entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ListEntryType {
    pub label: Option<String>,
    pub layout: Option<Value>,
}

impl ListEntryType {
    /// The key of the entry layout, used to tag multitype list values.
    pub fn layout_key(&self) -> Option<&str> {
        self.layout.as_ref()?.get("key")?.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parses_common_entries() {
        let desc = ElementDescriptor::from_value(&json!({
            "type": "textField",
            "key": "name",
            "label": "Name: ",
            "value": "Ada",
            "state": "disabled",
            "placeholder": "your name"
        }))
        .unwrap();
        assert_eq!(desc.require_type().unwrap(), "textField");
        assert_eq!(desc.key.as_deref(), Some("name"));
        assert_eq!(desc.value, Some(json!("Ada")));
        assert_eq!(desc.state, Some(ElementState::Disabled));
        assert_eq!(desc.str_extra("placeholder"), Some("your name"));
    }

    #[test]
    fn explicit_null_is_kept() {
        let desc = ElementDescriptor::from_value(&json!({"type": "textField", "excludeValue": null})).unwrap();
        assert_eq!(desc.exclude_value, Some(Value::Null));
        assert_eq!(desc.value, None);
    }

    #[test]
    fn missing_type() {
        let desc = ElementDescriptor::from_value(&json!({"key": "x"})).unwrap();
        assert!(matches!(desc.require_type(), Err(FormError::MissingType)));
    }

    #[test]
    fn non_object_rejected() {
        let err = ElementDescriptor::from_value(&json!("textField")).unwrap_err();
        assert!(matches!(err, FormError::InvalidLayout(_)));
    }

    #[test]
    fn bad_state_is_an_error() {
        let err = ElementDescriptor::from_value(&json!({"type": "textField", "state": "sleepy"})).unwrap_err();
        assert!(matches!(err, FormError::Json(_)));
    }

    #[test]
    fn list_entry_types() {
        let desc = ElementDescriptor::from_value(&json!({
            "type": "list",
            "key": "items",
            "entryTypes": [
                {"label": "Text", "layout": {"type": "textField", "key": "text"}},
                {"label": "Flag", "layout": {"type": "checkbox", "key": "flag"}}
            ]
        }))
        .unwrap();
        let keys: Vec<_> = desc
            .entry_types
            .unwrap()
            .iter()
            .map(|t| t.layout_key().map(str::to_string))
            .collect();
        assert_eq!(keys, vec![Some("text".to_string()), Some("flag".to_string())]);
    }
}
