//! Match predicates: does a parent value satisfy a selector target?

use serde_json::Value;

use super::spec::Target;

/// The four comparison shapes, by (parent is multiselect) x (target is a list).
#[derive(Debug, Clone, PartialEq)]
pub enum MatchPredicate {
    /// Scalar parent, single target. Compared with [`coercing_eq`], so a
    /// text field holding `"1"` matches a target of `1`.
    Equals(Value),
    /// Multiselect parent, single target: the target is among the selections.
    Contains(Value),
    /// Multiselect parent, target list: any target is among the selections.
    Intersects(Vec<Value>),
    /// Scalar parent, target list: the parent value is one of the targets.
    OneOf(Vec<Value>),
}

impl MatchPredicate {
    /// Pick the predicate shape for a target and parent.
    pub fn new(target: Target, parent_is_multiselect: bool) -> Self {
        match (parent_is_multiselect, target) {
            (false, Target::One(v)) => Self::Equals(v),
            (true, Target::One(v)) => Self::Contains(v),
            (true, Target::AnyOf(vs)) => Self::Intersects(vs),
            (false, Target::AnyOf(vs)) => Self::OneOf(vs),
        }
    }

    /// Evaluate against the parent's current value. An undefined parent
    /// value, or a non-array value for a multiselect parent, never matches.
    pub fn matches(&self, parent_value: Option<&Value>) -> bool {
        let Some(parent_value) = parent_value else {
            return false;
        };
        match self {
            Self::Equals(target) => coercing_eq(parent_value, target),
            Self::OneOf(targets) => targets.iter().any(|t| loose_eq(parent_value, t)),
            Self::Contains(target) => selections(parent_value).iter().any(|s| loose_eq(s, target)),
            Self::Intersects(targets) => {
                let selected = selections(parent_value);
                targets.iter().any(|t| selected.iter().any(|s| loose_eq(s, t)))
            }
        }
    }
}

fn selections(value: &Value) -> &[Value] {
    value.as_array().map(Vec::as_slice).unwrap_or(&[])
}

/// JSON equality, except that numbers compare by numeric value (`1 == 1.0`).
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Abstract equality between a widget value and a layout literal.
///
/// Strings and booleans are converted to numbers when compared against a
/// number or boolean; `null` equals only `null`. Arrays and objects never
/// equal each other, and compare against a scalar through their text form
/// (`["1"]` equals `"1"`).
pub fn coercing_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            n.as_f64() == Some(text_to_number(s))
        }
        (Value::Bool(flag), other) | (other, Value::Bool(flag)) => {
            coercing_eq(&Value::from(u8::from(*flag)), other)
        }
        (Value::Array(_) | Value::Object(_), Value::Array(_) | Value::Object(_)) => false,
        (compound @ (Value::Array(_) | Value::Object(_)), scalar)
        | (scalar, compound @ (Value::Array(_) | Value::Object(_))) => {
            coercing_eq(&Value::String(text_form(compound)), scalar)
        }
    }
}

/// Numeric reading of a string; `NAN` when it is not a number. Blank text
/// reads as zero.
fn text_to_number(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }
    let radix = match text.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u64::from_str_radix(&text[2..], radix).map_or(f64::NAN, |n| n as f64);
    }
    match text.trim_start_matches(['+', '-']) {
        "Infinity" if text.starts_with('-') => f64::NEG_INFINITY,
        "Infinity" => f64::INFINITY,
        _ if text.chars().all(|c| c.is_ascii_digit() || "+-.eE".contains(c)) => {
            text.parse().unwrap_or(f64::NAN)
        }
        _ => f64::NAN,
    }
}

fn text_form(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(text_form).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_owned(),
        other => other.to_string(),
    }
}
