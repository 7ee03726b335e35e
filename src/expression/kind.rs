//! Expression kinds and how each one is spliced into generated source.

use std::fmt;

/// How a field's value is written into the generated function body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionKind {
    /// JSON literal of the value.
    Value,
    /// The value is already source text; splice it as is.
    Stringified,
    /// Trimmed source expression; empty means "omit".
    Simple,
    /// Same as `Simple`.
    Code,
    /// A qualified identifier (`a.b.c`), validated before splicing.
    Reference,
    /// The value is a function body; wrapped as a function literal.
    Function,
}

impl ExpressionKind {
    /// Parse a kind name. `choice` is not a kind: it is resolved to one.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "value" => Some(Self::Value),
            "stringified" => Some(Self::Stringified),
            "simple" => Some(Self::Simple),
            "code" => Some(Self::Code),
            "reference" => Some(Self::Reference),
            "function" => Some(Self::Function),
            _ => None,
        }
    }

    /// Kind name as used in meta.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Stringified => "stringified",
            Self::Simple => "simple",
            Self::Code => "code",
            Self::Reference => "reference",
            Self::Function => "function",
        }
    }

    /// Whether output of this kind contains an expression rather than data.
    pub fn is_expression(self) -> bool {
        matches!(
            self,
            Self::Simple | Self::Code | Self::Reference | Self::Function
        )
    }
}

impl fmt::Display for ExpressionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
