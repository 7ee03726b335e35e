//! Slider widget: a bounded numeric value.

use std::any::Any;

use serde_json::{Number, Value};

use crate::error::{FormError, Result};
use crate::layout::ElementDescriptor;
use crate::widget::traits::Widget;

/// A numeric range input. Values are clamped to `[min, max]` and snapped to
/// `step` from `min`.
#[derive(Debug, Clone)]
pub struct Slider {
    min: f64,
    max: f64,
    step: f64,
    position: f64,
    disabled: bool,
    hidden: bool,
}

impl Slider {
    pub const TYPE_NAME: &'static str = "slider";

    /// Create a slider over `[min, max]`, starting at the midpoint.
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        let mut slider = Self {
            min,
            max,
            step,
            position: min,
            disabled: false,
            hidden: false,
        };
        slider.set_position(min + (max - min) / 2.0);
        slider
    }

    /// Build from a layout descriptor (`min`, `max`, `step`; 0, 100, 1 by default).
    pub fn from_descriptor(desc: &ElementDescriptor) -> Result<Self> {
        let min = desc.f64_extra("min").unwrap_or(0.0);
        let max = desc.f64_extra("max").unwrap_or(100.0);
        let step = desc.f64_extra("step").unwrap_or(1.0);
        if max < min || step <= 0.0 {
            return Err(FormError::InvalidLayout(format!(
                "slider {} has an empty range or non-positive step",
                desc.key_or_empty()
            )));
        }
        Ok(Self::new(min, max, step))
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    /// Move to `value`, clamped and snapped.
    pub fn set_position(&mut self, value: f64) {
        let clamped = value.clamp(self.min, self.max);
        let steps = ((clamped - self.min) / self.step).round();
        self.position = (self.min + steps * self.step).min(self.max);
    }

    /// Move by `n` steps (negative moves down).
    pub fn nudge(&mut self, n: i32) {
        self.set_position(self.position + f64::from(n) * self.step);
    }
}

impl Widget for Slider {
    fn widget_type(&self) -> &str {
        Self::TYPE_NAME
    }

    fn value(&self) -> Option<Value> {
        Number::from_f64(self.position).map(Value::Number)
    }

    fn set_value_impl(&mut self, value: &Value) {
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        match parsed {
            Some(v) => self.set_position(v),
            None => tracing::debug!(%value, "ignoring non-numeric slider value"),
        }
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
