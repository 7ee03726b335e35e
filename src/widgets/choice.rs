//! Single-choice widgets: dropdown and radio button group.
//!
//! Both pick one value out of a fixed list of entries. A dropdown always has
//! a selection (the first entry until told otherwise); a radio group starts
//! with nothing selected and then has no value.

use std::any::Any;

use serde_json::Value;

use crate::error::{FormError, Result};
use crate::layout::ElementDescriptor;
use crate::widget::traits::Widget;

/// One selectable entry: what is shown and what the value becomes.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceEntry {
    pub label: String,
    pub value: Value,
}

/// Read the `entries` list of a descriptor.
///
/// Each entry is either a plain string (label and value alike) or a
/// `[label, value]` pair.
pub fn parse_entries(desc: &ElementDescriptor) -> Result<Vec<ChoiceEntry>> {
    let Some(raw) = desc.extra.get("entries") else {
        return Ok(Vec::new());
    };
    let Value::Array(items) = raw else {
        return Err(FormError::InvalidLayout(format!(
            "entries for {} must be an array",
            desc.key_or_empty()
        )));
    };
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(ChoiceEntry {
                label: s.clone(),
                value: item.clone(),
            }),
            Value::Array(pair) if pair.len() == 2 => Ok(ChoiceEntry {
                label: super::text_field::value_as_text(&pair[0]),
                value: pair[1].clone(),
            }),
            other => Err(FormError::InvalidLayout(format!("invalid entry {other}"))),
        })
        .collect()
}

/// Shared state of the single-choice widgets.
#[derive(Debug, Clone, Default)]
struct Selection {
    entries: Vec<ChoiceEntry>,
    selected: Option<usize>,
    disabled: bool,
    hidden: bool,
}

impl Selection {
    fn value(&self) -> Option<Value> {
        self.selected
            .and_then(|i| self.entries.get(i))
            .map(|e| e.value.clone())
    }

    /// Select the entry holding `value`. Unknown values leave the selection
    /// unchanged.
    fn select_value(&mut self, value: &Value) {
        if let Some(index) = self.entries.iter().position(|e| &e.value == value) {
            self.selected = Some(index);
        } else {
            tracing::debug!(%value, "value not among choice entries");
        }
    }
}

macro_rules! choice_widget {
    ($(#[$doc:meta])* $name:ident, $type_name:literal, $preselect:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name {
            inner: Selection,
        }

        impl $name {
            pub const TYPE_NAME: &'static str = $type_name;

            /// Create from entries.
            pub fn new(entries: Vec<ChoiceEntry>) -> Self {
                let selected = if $preselect && !entries.is_empty() { Some(0) } else { None };
                Self {
                    inner: Selection {
                        entries,
                        selected,
                        ..Selection::default()
                    },
                }
            }

            /// Build from a layout descriptor (`entries`).
            pub fn from_descriptor(desc: &ElementDescriptor) -> Result<Self> {
                Ok(Self::new(parse_entries(desc)?))
            }

            pub fn entries(&self) -> &[ChoiceEntry] {
                &self.inner.entries
            }

            /// Index of the selected entry.
            pub fn selected_index(&self) -> Option<usize> {
                self.inner.selected
            }

            /// Select by index. Out of range indices are ignored.
            pub fn select(&mut self, index: usize) {
                if index < self.inner.entries.len() {
                    self.inner.selected = Some(index);
                }
            }

            pub fn is_disabled(&self) -> bool {
                self.inner.disabled
            }
        }

        impl Widget for $name {
            fn widget_type(&self) -> &str {
                Self::TYPE_NAME
            }

            fn value(&self) -> Option<Value> {
                self.inner.value()
            }

            fn set_value_impl(&mut self, value: &Value) {
                self.inner.select_value(value);
            }

            fn set_disabled(&mut self, disabled: bool) {
                self.inner.disabled = disabled;
            }

            fn set_visible(&mut self, visible: bool) {
                self.inner.hidden = !visible;
            }

            fn can_focus(&self) -> bool {
                !self.inner.disabled && !self.inner.hidden
            }

            fn as_any(&self) -> &dyn Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn Any {
                self
            }
        }
    };
}

choice_widget!(
    /// A dropdown list. The first entry is selected initially.
    Dropdown,
    "dropdown",
    true
);

choice_widget!(
    /// A group of radio buttons. Nothing is selected initially.
    RadioGroup,
    "radioButtonGroup",
    false
);
