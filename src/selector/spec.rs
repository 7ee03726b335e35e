//! Selector declarations as they appear in a layout.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;
use crate::layout::descriptor::deserialize_some;
use crate::widget::ElementState;

/// Where a selector parent lives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ParentRef {
    /// A key in the dependent element's own panel.
    Local(String),
    /// Keys from the root form down.
    Path(Vec<String>),
}

impl ParentRef {
    pub fn local(key: impl Into<String>) -> Self {
        Self::Local(key.into())
    }

    pub fn path<S: Into<String>>(keys: impl IntoIterator<Item = S>) -> Self {
        Self::Path(keys.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for ParentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(key) => f.write_str(key),
            Self::Path(keys) => write!(f, "/{}", keys.join("/")),
        }
    }
}

/// What a predefined selector does with its match result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorAction {
    /// Set the dependent's value to the boolean match result.
    Value,
    /// Normal on match, inactive otherwise.
    #[default]
    Inactive,
    /// Normal on match, hidden otherwise.
    Hidden,
    /// Normal on match, disabled otherwise.
    Disabled,
}

impl SelectorAction {
    /// State applied when the predicate is false. `None` for [`Self::Value`].
    pub fn false_state(self) -> Option<ElementState> {
        match self {
            Self::Value => None,
            Self::Inactive => Some(ElementState::Inactive),
            Self::Hidden => Some(ElementState::Hidden),
            Self::Disabled => Some(ElementState::Disabled),
        }
    }
}

/// The value(s) a selector compares its parent against.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    One(Value),
    AnyOf(Vec<Value>),
}

/// A selector declaration.
///
/// ```json
/// {"parentKey": "mode", "parentValues": ["a", "b"], "action": "hidden"}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorSpec {
    pub parent_key: Option<ParentRef>,
    pub parent_keys: Option<Vec<ParentRef>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub parent_value: Option<Value>,
    pub parent_values: Option<Vec<Value>>,
    pub action: Option<SelectorAction>,
    /// Name of a custom action in the element registry.
    pub action_function: Option<String>,
}

impl SelectorSpec {
    /// Parse a raw selector object.
    pub fn from_value(value: &Value) -> Result<Self> {
        Ok(Self::deserialize(value)?)
    }

    /// A single-parent selector (builder entry point).
    pub fn watching(parent: ParentRef) -> Self {
        Self {
            parent_key: Some(parent),
            ..Self::default()
        }
    }

    /// Compare against one value (builder).
    pub fn when(mut self, value: Value) -> Self {
        self.parent_value = Some(value);
        self
    }

    /// Compare against any of several values (builder).
    pub fn when_any(mut self, values: Vec<Value>) -> Self {
        self.parent_values = Some(values);
        self
    }

    /// Set the action (builder).
    pub fn with_action(mut self, action: SelectorAction) -> Self {
        self.action = Some(action);
        self
    }

    /// The declared parents: `parentKey` if given, else `parentKeys`.
    pub fn parent_refs(&self) -> Option<Vec<ParentRef>> {
        match (&self.parent_key, &self.parent_keys) {
            (Some(key), _) => Some(vec![key.clone()]),
            (None, Some(keys)) => Some(keys.clone()),
            (None, None) => None,
        }
    }

    /// The comparison target: `parentValue` if given, else `parentValues`.
    pub fn target(&self) -> Option<Target> {
        match (&self.parent_value, &self.parent_values) {
            (Some(value), _) => Some(Target::One(value.clone())),
            (None, Some(values)) => Some(Target::AnyOf(values.clone())),
            (None, None) => None,
        }
    }

    /// The action, defaulting to [`SelectorAction::Inactive`].
    pub fn action_or_default(&self) -> SelectorAction {
        self.action.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parse_local_key() {
        let spec = SelectorSpec::from_value(&json!({"parentKey": "mode", "parentValue": "a"})).unwrap();
        assert_eq!(spec.parent_refs(), Some(vec![ParentRef::local("mode")]));
        assert_eq!(spec.target(), Some(Target::One(json!("a"))));
        assert_eq!(spec.action_or_default(), SelectorAction::Inactive);
    }

    #[test]
    fn parse_mixed_parent_keys() {
        let spec = SelectorSpec::from_value(&json!({
            "parentKeys": ["a", ["panelA", "fieldX"]],
            "actionFunction": "sync"
        }))
        .unwrap();
        assert_eq!(
            spec.parent_refs(),
            Some(vec![ParentRef::local("a"), ParentRef::path(["panelA", "fieldX"])])
        );
        assert_eq!(spec.target(), None);
        assert_eq!(spec.action_function.as_deref(), Some("sync"));
    }

    #[test]
    fn null_parent_value_is_a_target() {
        let spec = SelectorSpec::from_value(&json!({"parentKey": "a", "parentValue": null})).unwrap();
        assert_eq!(spec.target(), Some(Target::One(Value::Null)));
    }

    #[test]
    fn parent_value_wins_over_values() {
        let spec = SelectorSpec::watching(ParentRef::local("a"))
            .when_any(vec![json!(1), json!(2)])
            .when(json!(3));
        assert_eq!(spec.target(), Some(Target::One(json!(3))));
    }

    #[test]
    fn actions_parse_and_map_to_states() {
        let spec = SelectorSpec::from_value(&json!({"parentKey": "a", "parentValue": 1, "action": "disabled"})).unwrap();
        assert_eq!(spec.action, Some(SelectorAction::Disabled));
        assert_eq!(SelectorAction::Value.false_state(), None);
        assert_eq!(SelectorAction::Hidden.false_state(), Some(ElementState::Hidden));
        assert!(SelectorSpec::from_value(&json!({"parentKey": "a", "action": "explode"})).is_err());
    }

    #[test]
    fn display_refs() {
        assert_eq!(ParentRef::local("x").to_string(), "x");
        assert_eq!(ParentRef::path(["a", "b"]).to_string(), "/a/b");
    }
}
