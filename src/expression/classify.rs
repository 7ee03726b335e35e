//! Expression classification and per-kind value encoding.
//!
//! Classification has to see the enclosing container's value: a `choice`
//! field reads its kind from a sibling, and a `function` field may read its
//! argument list from one.

use serde_json::Value;

use super::kind::ExpressionKind;
use super::meta::Meta;
use super::reference::is_valid_qualified_name;
use crate::error::{FormError, Result};

/// Name of the pseudo-kind that defers to a sibling field.
pub const CHOICE: &str = "choice";

/// Decide how a field's value is treated.
///
/// `assignee` is only used in error messages.
pub fn classify(meta: Option<&Meta>, container: Option<&Value>, assignee: &str) -> Result<ExpressionKind> {
    let Some((meta, name)) = meta.and_then(|m| Some((m, m.expression.as_deref()?))) else {
        return Ok(ExpressionKind::Value);
    };
    if name == CHOICE {
        return resolve_choice(meta, container, assignee);
    }
    ExpressionKind::parse(name).ok_or_else(|| FormError::UnsupportedExpressionKind {
        assignee: assignee.to_owned(),
        kind: name.to_owned(),
    })
}

fn resolve_choice(meta: &Meta, container: Option<&Value>, assignee: &str) -> Result<ExpressionKind> {
    let Some(container) = container.filter(|c| c.is_object()) else {
        return Err(choice_error(assignee, "not in a valid parent object"));
    };
    let Some(choice_key) = meta.expression_choice_key.as_deref() else {
        return Err(choice_error(assignee, "meta expressionChoiceKey entry missing"));
    };

    let input = container.get(choice_key);
    let resolved = match (&meta.expression_choice_map, input) {
        (Some(map), Some(input)) => map.get(&lookup_key(input)),
        (Some(_), None) => None,
        (None, input) => input,
    };

    match resolved {
        Some(Value::String(name)) if !name.is_empty() => {
            ExpressionKind::parse(name).ok_or_else(|| FormError::UnsupportedExpressionKind {
                assignee: assignee.to_owned(),
                kind: name.clone(),
            })
        }
        Some(other) if is_truthy(other) => Err(FormError::UnsupportedExpressionKind {
            assignee: assignee.to_owned(),
            kind: other.to_string(),
        }),
        _ => Err(choice_error(
            assignee,
            &format!("expression choice not found for key: {choice_key}"),
        )),
    }
}

fn choice_error(assignee: &str, message: &str) -> FormError {
    FormError::ChoiceResolution {
        assignee: assignee.to_owned(),
        message: message.to_owned(),
    }
}

/// Text form of a value when it is used as an object key.
pub(crate) fn lookup_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => js_literal(other),
    }
}

/// Truthiness of a value, the way a script would test it.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Compact literal text for a value.
///
/// Same as compact JSON, except that integral floats print without a
/// fractional part (`1` rather than `1.0`).
pub fn js_literal(value: &Value) -> String {
    match value {
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(js_literal).collect();
            format!("[{}]", parts.join(","))
        }
        Value::Object(map) => {
            let parts: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}:{}", Value::String(k.clone()), js_literal(v)))
                .collect();
            format!("{{{}}}", parts.join(","))
        }
        other => other.to_string(),
    }
}

/// Source text of a value that is meant to already be source.
fn source_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => js_literal(other),
    }
}

/// Encode a value for the given kind.
///
/// `Ok(None)` means the field is omitted (an empty expression).
pub fn encode(
    kind: ExpressionKind,
    value: &Value,
    meta: Option<&Meta>,
    container: Option<&Value>,
) -> Result<Option<String>> {
    match kind {
        ExpressionKind::Value => Ok(Some(js_literal(value))),
        ExpressionKind::Stringified => Ok(Some(source_text(value))),
        ExpressionKind::Simple | ExpressionKind::Code => Ok(simple_expression(value)),
        ExpressionKind::Reference => reference_expression(value),
        ExpressionKind::Function => Ok(Some(function_expression(value, meta, container))),
    }
}

fn simple_expression(value: &Value) -> Option<String> {
    if value.is_null() {
        return None;
    }
    let text = source_text(value);
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn reference_expression(value: &Value) -> Result<Option<String>> {
    let Some(trimmed) = simple_expression(value) else {
        return Ok(None);
    };
    if !is_valid_qualified_name(&trimmed) {
        return Err(FormError::InvalidReference(trimmed));
    }
    Ok(Some(trimmed))
}

fn function_expression(value: &Value, meta: Option<&Meta>, container: Option<&Value>) -> String {
    let body = if is_truthy(value) {
        source_text(value)
    } else {
        String::new()
    };
    let args = meta
        .and_then(|m| {
            m.arg_list.clone().or_else(|| {
                let key = m.arg_list_key.as_deref()?;
                container?.get(key).filter(|v| is_truthy(v)).map(source_text)
            })
        })
        .unwrap_or_default();
    format!("function({args}){{\n{body}\n}}")
}

/// Encoded text for a single field plus whether it is an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueCodeText {
    /// `None` when the field would be omitted.
    pub code: Option<String>,
    pub has_expression: bool,
}

/// Classify and encode one field in isolation.
///
/// An undefined value encodes as the text `undefined`.
pub fn value_code_text(
    value: Option<&Value>,
    meta: Option<&Meta>,
    container: Option<&Value>,
) -> Result<ValueCodeText> {
    let Some(value) = value else {
        return Ok(ValueCodeText {
            code: Some("undefined".to_owned()),
            has_expression: false,
        });
    };
    let kind = classify(meta, container, "value")?;
    Ok(ValueCodeText {
        code: encode(kind, value, meta, container)?,
        has_expression: kind.is_expression(),
    })
}
