//! Top-level layout description and the error layout.

use serde_json::{json, Value};

/// Message shown when a layout description is not usable at all.
pub const INVALID_LAYOUT_MESSAGE: &str = "Invalid form layout!";

/// A whole-form layout: the ordered element descriptors plus form-level flags.
#[derive(Debug, Clone, PartialEq)]
pub struct FormLayout {
    /// Element descriptors, in layout order.
    pub layout: Vec<Value>,
    /// Set on layouts produced by [`FormLayout::error`]. A failure while
    /// building one of these is not retried.
    pub is_error_layout: bool,
    /// Disable every element once built.
    pub disabled: bool,
}

impl FormLayout {
    /// Interpret a layout description.
    ///
    /// Accepts `{"layout": [...], "disabled"?: bool, "isErrorLayout"?: bool}`
    /// and the older bare array form. Anything else becomes the
    /// "Invalid form layout!" error layout.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Array(entries) => Self::new(entries.clone()),
            Value::Object(map) => match map.get("layout") {
                Some(Value::Array(entries)) => Self {
                    layout: entries.clone(),
                    is_error_layout: flag(map.get("isErrorLayout")),
                    disabled: flag(map.get("disabled")),
                },
                _ => Self::error(INVALID_LAYOUT_MESSAGE),
            },
            _ => Self::error(INVALID_LAYOUT_MESSAGE),
        }
    }

    /// A plain layout from element descriptors.
    pub fn new(layout: Vec<Value>) -> Self {
        Self {
            layout,
            is_error_layout: false,
            disabled: false,
        }
    }

    /// A layout holding a single red error message.
    pub fn error(message: &str) -> Self {
        Self {
            layout: vec![json!({
                "type": "htmlDisplay",
                "html": format!("<em style='color:red'>{message}</em>"),
            })],
            is_error_layout: true,
            disabled: false,
        }
    }
}

fn flag(value: Option<&Value>) -> bool {
    value.and_then(Value::as_bool).unwrap_or(false)
}
