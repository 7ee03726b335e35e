//! Submit widget: a submit and/or cancel button pair.
//!
//! The buttons carry no value. Pressing them is routed through
//! [`Form::press_submit`](crate::form::Form::press_submit) and
//! [`Form::press_cancel`](crate::form::Form::press_cancel), which run the
//! handlers registered with the form.

use std::any::Any;

use crate::error::Result;
use crate::layout::ElementDescriptor;
use crate::widget::traits::Widget;

/// Label used when a submit button has none configured.
pub const DEFAULT_SUBMIT_LABEL: &str = "OK";
/// Label used when a cancel button has none configured.
pub const DEFAULT_CANCEL_LABEL: &str = "Cancel";

/// A submit/cancel button pair. Either button may be absent.
///
/// # Examples
///
/// ```ignore
/// let submit = Submit::new(Some("Save".into()), Some("Discard".into()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Submit {
    submit_label: Option<String>,
    cancel_label: Option<String>,
    submit_disabled: bool,
    cancel_disabled: bool,
    disabled: bool,
}

impl Submit {
    pub const TYPE_NAME: &'static str = "submit";

    /// Create with the given button labels. `None` omits that button.
    pub fn new(submit_label: Option<String>, cancel_label: Option<String>) -> Self {
        Self {
            submit_label,
            cancel_label,
            ..Self::default()
        }
    }

    /// Build from a layout descriptor (`submitLabel`, `cancelLabel`,
    /// `submitDisabled`, `cancelDisabled`). Both buttons are present.
    pub fn from_descriptor(desc: &ElementDescriptor) -> Result<Self> {
        let label = |name: &str, default: &str| {
            Some(desc.str_extra(name).unwrap_or(default).to_string())
        };
        let mut submit = Self::new(
            label("submitLabel", DEFAULT_SUBMIT_LABEL),
            label("cancelLabel", DEFAULT_CANCEL_LABEL),
        );
        submit.submit_disabled = desc.bool_extra("submitDisabled").unwrap_or(false);
        submit.cancel_disabled = desc.bool_extra("cancelDisabled").unwrap_or(false);
        Ok(submit)
    }

    pub fn submit_label(&self) -> Option<&str> {
        self.submit_label.as_deref()
    }

    pub fn cancel_label(&self) -> Option<&str> {
        self.cancel_label.as_deref()
    }

    /// Disable only the submit button.
    pub fn submit_disable(&mut self, disabled: bool) {
        self.submit_disabled = disabled;
    }

    /// Disable only the cancel button.
    pub fn cancel_disable(&mut self, disabled: bool) {
        self.cancel_disabled = disabled;
    }

    /// Whether the submit button exists and can be pressed.
    pub fn submit_enabled(&self) -> bool {
        self.submit_label.is_some() && !self.disabled && !self.submit_disabled
    }

    /// Whether the cancel button exists and can be pressed.
    pub fn cancel_enabled(&self) -> bool {
        self.cancel_label.is_some() && !self.disabled && !self.cancel_disabled
    }
}

impl Widget for Submit {
    fn widget_type(&self) -> &str {
        Self::TYPE_NAME
    }

    fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    fn can_focus(&self) -> bool {
        self.submit_enabled() || self.cancel_enabled()
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
    fn default_labels() {
        let desc = ElementDescriptor::from_value(&json!({"type": "submit"})).unwrap();
        let submit = Submit::from_descriptor(&desc).unwrap();
        assert_eq!(submit.submit_label(), Some("OK"));
        assert_eq!(submit.cancel_label(), Some("Cancel"));
        assert_eq!(submit.value(), None);
    }

    #[test]
    fn disabled_flags_combine() {
        let mut submit = Submit::new(Some("Save".into()), None);
        assert!(submit.submit_enabled());
        assert!(!submit.cancel_enabled());
        submit.submit_disable(true);
        assert!(!submit.submit_enabled());
        assert!(!submit.can_focus());
        submit.submit_disable(false);
        submit.set_disabled(true);
        assert!(!submit.submit_enabled());
    }
}
