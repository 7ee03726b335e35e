//! Checkbox widgets: a single boolean checkbox and a multiselect group.

use std::any::Any;

use serde_json::Value;

use super::choice::{parse_entries, ChoiceEntry};
use crate::error::Result;
use crate::layout::ElementDescriptor;
use crate::widget::traits::Widget;

// ---------------------------------------------------------------------------
// Checkbox
// ---------------------------------------------------------------------------

/// A single checkbox. Its value is `true` or `false`.
#[derive(Debug, Clone, Default)]
pub struct Checkbox {
    checked: bool,
    disabled: bool,
    hidden: bool,
}

impl Checkbox {
    pub const TYPE_NAME: &'static str = "checkbox";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_descriptor(_desc: &ElementDescriptor) -> Result<Self> {
        Ok(Self::new())
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Flip the checked state.
    pub fn toggle(&mut self) {
        self.checked = !self.checked;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

impl Widget for Checkbox {
    fn widget_type(&self) -> &str {
        Self::TYPE_NAME
    }

    fn value(&self) -> Option<Value> {
        Some(Value::Bool(self.checked))
    }

    /// Only a literal `true` checks the box.
    fn set_value_impl(&mut self, value: &Value) {
        self.checked = *value == Value::Bool(true);
    }

    fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    fn set_visible(&mut self, visible: bool) {
        self.hidden = !visible;
    }

    fn can_focus(&self) -> bool {
        !self.disabled && !self.hidden
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// CheckboxGroup
// ---------------------------------------------------------------------------

/// A group of checkboxes. Its value is the array of checked entry values, in
/// entry order.
#[derive(Debug, Clone, Default)]
pub struct CheckboxGroup {
    entries: Vec<ChoiceEntry>,
    checked: Vec<bool>,
    disabled: bool,
    hidden: bool,
}

impl CheckboxGroup {
    pub const TYPE_NAME: &'static str = "checkboxGroup";

    pub fn new(entries: Vec<ChoiceEntry>) -> Self {
        let checked = vec![false; entries.len()];
        Self {
            entries,
            checked,
            ..Self::default()
        }
    }

    /// Build from a layout descriptor (`entries`).
    pub fn from_descriptor(desc: &ElementDescriptor) -> Result<Self> {
        Ok(Self::new(parse_entries(desc)?))
    }

    pub fn entries(&self) -> &[ChoiceEntry] {
        &self.entries
    }

    /// Flip the entry at `index`. Out of range indices are ignored.
    pub fn toggle(&mut self, index: usize) {
        if let Some(flag) = self.checked.get_mut(index) {
            *flag = !*flag;
        }
    }

    /// Flip the entry holding `value`.
    pub fn toggle_value(&mut self, value: &Value) {
        if let Some(index) = self.entries.iter().position(|e| &e.value == value) {
            self.toggle(index);
        }
    }
}

impl Widget for CheckboxGroup {
    fn widget_type(&self) -> &str {
        Self::TYPE_NAME
    }

    fn value(&self) -> Option<Value> {
        let selected = self
            .entries
            .iter()
            .zip(&self.checked)
            .filter(|(_, on)| **on)
            .map(|(e, _)| e.value.clone())
            .collect();
        Some(Value::Array(selected))
    }

    /// Check exactly the entries whose values appear in the given array.
    fn set_value_impl(&mut self, value: &Value) {
        let wanted: &[Value] = value.as_array().map(Vec::as_slice).unwrap_or(&[]);
        for (entry, flag) in self.entries.iter().zip(self.checked.iter_mut()) {
            *flag = wanted.contains(&entry.value);
        }
    }

    fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    fn set_visible(&mut self, visible: bool) {
        self.hidden = !visible;
    }

    fn is_multiselect(&self) -> bool {
        true
    }

    fn can_focus(&self) -> bool {
        !self.disabled && !self.hidden
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
