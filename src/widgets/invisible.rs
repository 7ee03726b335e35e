//! Invisible widget: carries a value without showing anything.

use std::any::Any;

use serde_json::Value;

use crate::error::Result;
use crate::layout::ElementDescriptor;
use crate::widget::traits::Widget;

/// Holds an arbitrary JSON value. Undefined until a value is set.
#[derive(Debug, Clone, Default)]
pub struct Invisible {
    value: Option<Value>,
}

impl Invisible {
    pub const TYPE_NAME: &'static str = "invisible";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_descriptor(_desc: &ElementDescriptor) -> Result<Self> {
        Ok(Self::new())
    }
}

impl Widget for Invisible {
    fn widget_type(&self) -> &str {
        Self::TYPE_NAME
    }

    fn value(&self) -> Option<Value> {
        self.value.clone()
    }

    fn set_value_impl(&mut self, value: &Value) {
        self.value = Some(value.clone());
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn undefined_until_set() {
        let mut invisible = Invisible::new();
        assert_eq!(invisible.value(), None);
        invisible.set_value_impl(&json!({"nested": [1, 2]}));
        assert_eq!(invisible.value(), Some(json!({"nested": [1, 2]})));
        assert!(!invisible.can_focus());
    }
}
