//! Widget trait: the value/state capability every leaf element exposes.
//!
//! The form core never renders anything. It only needs to read and write a
//! widget's value and push visibility and editability into it. Everything else
//! (labels, hints, DOM or terminal output) belongs to the concrete widget.

use std::any::Any;

use serde_json::Value;

// ---------------------------------------------------------------------------
// Widget trait
// ---------------------------------------------------------------------------

/// Core trait implemented by all leaf widgets.
///
/// Widget is object-safe: the form stores widgets as `Box<dyn Widget>` inside
/// its node arena.
pub trait Widget {
    /// The layout type name for this widget (e.g. "textField", "checkbox").
    fn widget_type(&self) -> &str;

    /// Current value. `None` means the widget has no value (undefined), and
    /// such widgets never appear in a panel value.
    fn value(&self) -> Option<Value> {
        None
    }

    /// Store a new value. The form fires the change event afterwards, so
    /// implementations must not notify anyone themselves.
    fn set_value_impl(&mut self, _value: &Value) {}

    /// Enable or disable editing.
    fn set_disabled(&mut self, _disabled: bool) {}

    /// Show or hide the widget.
    fn set_visible(&mut self, _visible: bool) {}

    /// Whether the value is a list of selected entries (checkbox group).
    ///
    /// Selectors watching a multiselect parent test membership instead of
    /// equality.
    fn is_multiselect(&self) -> bool {
        false
    }

    /// Whether this widget can receive focus.
    fn can_focus(&self) -> bool {
        false
    }

    /// Downcast to `&dyn Any` for runtime type inspection.
    fn as_any(&self) -> &dyn Any;

    /// Downcast to `&mut dyn Any` for mutable runtime type inspection.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl std::fmt::Debug for dyn Widget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Widget")
            .field("type", &self.widget_type())
            .field("value", &self.value())
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
