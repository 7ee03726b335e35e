//! Meta: the shadow descriptor carried next to a field's value.
//!
//! Meta only matters for result code generation. A plain value round trip
//! through a form never looks at it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Per-key meta for the entries of an object value (a panel's meta).
pub type MetaMap = BTreeMap<String, Meta>;

/// Shape of a value that contains nested, possibly expression-bearing, fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParentType {
    Object,
    Array,
}

/// Shadow descriptor for one field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    /// Expression kind name: `value`, `stringified`, `simple`, `code`,
    /// `reference`, `function` or `choice`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,

    /// For `choice`: the sibling key whose value selects the kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression_choice_key: Option<String>,

    /// For `choice`: remaps the sibling value (as text) to a kind name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression_choice_map: Option<Map<String, Value>>,

    /// For `function`: a fixed argument list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg_list: Option<String>,

    /// For `function`: sibling key holding the argument list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg_list_key: Option<String>,

    /// Set when the value is itself an object or array.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_type: Option<ParentType>,

    /// Object entries' meta, by key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_meta: Option<MetaMap>,

    /// Meta shared by every array element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_meta: Option<Box<Meta>>,

    /// Meta paired positionally with array elements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_meta_array: Option<Vec<Meta>>,

    /// Legacy location of an element's exclude value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_value: Option<Value>,
}

impl Meta {
    /// Meta with just an expression kind.
    pub fn expression(kind: impl Into<String>) -> Self {
        Self {
            expression: Some(kind.into()),
            ..Self::default()
        }
    }

    /// `choice` meta keyed on a sibling field.
    pub fn choice(choice_key: impl Into<String>) -> Self {
        Self {
            expression: Some("choice".to_owned()),
            expression_choice_key: Some(choice_key.into()),
            ..Self::default()
        }
    }

    /// Object meta wrapping per-key child meta.
    pub fn object(child_meta: MetaMap) -> Self {
        Self {
            parent_type: Some(ParentType::Object),
            child_meta: Some(child_meta),
            ..Self::default()
        }
    }

    /// Homogeneous array meta.
    pub fn array_of(entry_meta: Meta) -> Self {
        Self {
            parent_type: Some(ParentType::Array),
            entry_meta: Some(Box::new(entry_meta)),
            ..Self::default()
        }
    }

    /// Heterogeneous array meta.
    pub fn array_of_each(entry_meta_array: Vec<Meta>) -> Self {
        Self {
            parent_type: Some(ParentType::Array),
            entry_meta_array: Some(entry_meta_array),
            ..Self::default()
        }
    }

    /// Add a choice remapping entry (builder).
    pub fn with_choice_entry(mut self, input: impl Into<String>, kind: impl Into<String>) -> Self {
        self.expression_choice_map
            .get_or_insert_with(Map::new)
            .insert(input.into(), Value::String(kind.into()));
        self
    }

    /// Set a fixed function argument list (builder).
    pub fn with_arg_list(mut self, args: impl Into<String>) -> Self {
        self.arg_list = Some(args.into());
        self
    }

    /// Set the sibling key holding the function argument list (builder).
    pub fn with_arg_list_key(mut self, key: impl Into<String>) -> Self {
        self.arg_list_key = Some(key.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn deserializes_camel_case() {
        let meta: Meta = serde_json::from_value(json!({
            "expression": "choice",
            "expressionChoiceKey": "useExpr",
            "expressionChoiceMap": {"true": "simple", "false": "value"},
        }))
        .unwrap();
        assert_eq!(meta.expression.as_deref(), Some("choice"));
        assert_eq!(meta.expression_choice_key.as_deref(), Some("useExpr"));
        assert_eq!(
            meta.expression_choice_map.unwrap().get("true"),
            Some(&json!("simple"))
        );
    }

    #[test]
    fn nested_shadow_tree() {
        let meta: Meta = serde_json::from_value(json!({
            "parentType": "array",
            "entryMetaArray": [
                {"parentType": "object", "childMeta": {"value": {"expression": "simple"}}}
            ]
        }))
        .unwrap();
        let entries = meta.entry_meta_array.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].parent_type, Some(ParentType::Object));
        let child = &entries[0].child_meta.as_ref().unwrap()["value"];
        assert_eq!(child.expression.as_deref(), Some("simple"));
    }

    #[test]
    fn serializes_only_present_fields() {
        let meta = Meta::expression("reference");
        assert_eq!(serde_json::to_value(&meta).unwrap(), json!({"expression": "reference"}));
    }

    #[test]
    fn builders() {
        let meta = Meta::choice("mode")
            .with_choice_entry("expr", "simple")
            .with_arg_list("a,b");
        assert_eq!(meta.expression.as_deref(), Some("choice"));
        assert_eq!(meta.arg_list.as_deref(), Some("a,b"));
        assert_eq!(
            meta.expression_choice_map.unwrap().get("expr"),
            Some(&json!("simple"))
        );

        let array = Meta::array_of(Meta::expression("code"));
        assert_eq!(array.parent_type, Some(ParentType::Array));
        assert!(array.entry_meta.is_some());
    }
}
