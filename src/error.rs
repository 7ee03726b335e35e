//! Error taxonomy for form construction, selector wiring, and code generation.
//!
//! None of these escape `Form::configure` or `Form::value`: they are caught at
//! the nearest element or selector boundary and turned into an inline message
//! on the affected node. [`FunctionBodyGenerator`](crate::expression::FunctionBodyGenerator)
//! hands them back to the caller as a `Result`.

/// Errors raised while building, wiring, or serializing a form.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// A selector parent could not be located.
    #[error("parent element not found for selectable child element {child}: {reference}")]
    Resolution { child: String, reference: String },

    /// A selector declaration is structurally invalid.
    #[error("invalid selector for {child}: {message}")]
    InvalidSelector { child: String, message: String },

    /// A `choice` expression could not be resolved from the container value.
    #[error("expression choice not resolved for {assignee}: {message}")]
    ChoiceResolution { assignee: String, message: String },

    /// A `reference` value is not a qualified identifier.
    #[error(
        "the following is not a valid reference: {0} (required: a valid variable name, dots allowed)"
    )]
    InvalidReference(String),

    /// The meta declared an expression kind the generator does not know.
    #[error("expression type not supported for {assignee}: {kind}")]
    UnsupportedExpressionKind { assignee: String, kind: String },

    /// A descriptor has no `type` entry.
    #[error("type not found for configurable form entry")]
    MissingType,

    /// A descriptor names a type the registry does not know.
    #[error("type not found for configurable element: {0}")]
    UnknownElementType(String),

    /// A descriptor is present but malformed.
    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    /// A value does not fit the element it is applied to.
    #[error("invalid value for {element}: {message}")]
    InvalidValue { element: String, message: String },

    /// A node id no longer refers to a live node.
    #[error("node not found")]
    NodeNotFound,

    /// A custom action failed.
    #[error("{0}")]
    Action(String),

    /// JSON (de)serialization failure.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, FormError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_message_names_child_and_reference() {
        let err = FormError::Resolution {
            child: "detail".into(),
            reference: "[\"panelA\",\"fieldX\"]".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("detail"));
        assert!(msg.contains("panelA"));
    }

    #[test]
    fn invalid_reference_message() {
        let err = FormError::InvalidReference("a.1b".into());
        assert!(err.to_string().starts_with("the following is not a valid reference: a.1b"));
    }

    #[test]
    fn json_error_converts() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: FormError = parse.unwrap_err().into();
        assert!(matches!(err, FormError::Json(_)));
    }
}
