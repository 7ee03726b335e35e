//! Single and multi-line text entry.
//!
//! Keystrokes edit the buffer in place and count as input; the form commits
//! the value as a change separately.

use std::any::Any;

use serde_json::Value;

use crate::error::Result;
use crate::layout::ElementDescriptor;
use crate::widget::traits::Widget;

/// `textField`: a one-line entry with an optional hint and masking.
///
/// `caret` is a byte offset into `buffer` and always sits on a char boundary.
#[derive(Debug, Clone)]
pub struct TextField {
    buffer: String,
    hint: String,
    caret: usize,
    masked: bool,
    disabled: bool,
    visible: bool,
}

impl TextField {
    pub const TYPE_NAME: &'static str = "textField";

    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            hint: String::new(),
            caret: 0,
            masked: false,
            disabled: false,
            visible: true,
        }
    }

    /// Reads `placeholder` and `password` from the descriptor.
    pub fn from_descriptor(desc: &ElementDescriptor) -> Result<Self> {
        Ok(Self {
            hint: desc.str_extra("placeholder").unwrap_or_default().to_owned(),
            masked: desc.bool_extra("password").unwrap_or(false),
            ..Self::new()
        })
    }

    pub fn with_placeholder(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    pub fn with_value(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    pub fn password(mut self, masked: bool) -> Self {
        self.masked = masked;
        self
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Replace the buffer; the caret lands after the last character.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.caret = self.buffer.len();
    }

    pub fn type_char(&mut self, ch: char) {
        self.buffer.insert(self.caret, ch);
        self.caret += ch.len_utf8();
    }

    /// Remove the character left of the caret. No-op at the start.
    pub fn backspace(&mut self) {
        if let Some(start) = self.char_before_caret() {
            self.buffer.replace_range(start..self.caret, "");
            self.caret = start;
        }
    }

    pub fn caret_left(&mut self) {
        if let Some(start) = self.char_before_caret() {
            self.caret = start;
        }
    }

    pub fn caret_to_end(&mut self) {
        self.caret = self.buffer.len();
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// What a renderer would show: the hint when empty, bullets when masked.
    pub fn display_text(&self) -> String {
        match (self.buffer.is_empty(), self.masked) {
            (true, _) => self.hint.clone(),
            (false, true) => "\u{2022}".repeat(self.buffer.chars().count()),
            (false, false) => self.buffer.clone(),
        }
    }

    fn char_before_caret(&self) -> Option<usize> {
        self.buffer[..self.caret].char_indices().next_back().map(|(i, _)| i)
    }
}

impl Default for TextField {
    fn default() -> Self {
        Self::new()
    }
}

/// Text form of a value written into a text widget. Strings are taken as is,
/// `null` clears, anything else is written in its JSON form.
pub(crate) fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl Widget for TextField {
    fn widget_type(&self) -> &str {
        Self::TYPE_NAME
    }

    fn value(&self) -> Option<Value> {
        Some(Value::String(self.buffer.clone()))
    }

    fn set_value_impl(&mut self, value: &Value) {
        self.set_text(value_as_text(value));
    }

    fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn can_focus(&self) -> bool {
        !self.disabled && self.visible
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A multi-line text input. Its value is the trimmed text.
#[derive(Debug, Clone)]
pub struct Textarea {
    inner: TextField,
    rows: Option<u32>,
}

impl Textarea {
    pub const TYPE_NAME: &'static str = "textarea";

    pub fn new() -> Self {
        Self {
            inner: TextField::new(),
            rows: None,
        }
    }

    /// Build from a layout descriptor (`rows`).
    pub fn from_descriptor(desc: &ElementDescriptor) -> Result<Self> {
        let mut area = Self::new();
        area.rows = desc.f64_extra("rows").map(|r| r as u32);
        Ok(area)
    }

    pub fn rows(&self) -> Option<u32> {
        self.rows
    }

    /// The editable text underneath.
    pub fn editor(&mut self) -> &mut TextField {
        &mut self.inner
    }
}

impl Default for Textarea {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for Textarea {
    fn widget_type(&self) -> &str {
        Self::TYPE_NAME
    }

    fn value(&self) -> Option<Value> {
        Some(Value::String(self.inner.text().trim().to_string()))
    }

    fn set_value_impl(&mut self, value: &Value) {
        self.inner.set_value_impl(value);
    }

    fn set_disabled(&mut self, disabled: bool) {
        self.inner.set_disabled(disabled);
    }

    fn set_visible(&mut self, visible: bool) {
        self.inner.set_visible(visible);
    }

    fn can_focus(&self) -> bool {
        self.inner.can_focus()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
