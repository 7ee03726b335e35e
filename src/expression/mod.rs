//! Expression-aware result serialization.
//!
//! - [`Meta`] — shadow descriptor tree next to a form value.
//! - [`classify`] — decide a field's [`ExpressionKind`] against its container.
//! - [`FunctionBodyGenerator`] — emit the `output[...] = ...` function body.

pub mod classify;
pub mod generator;
pub mod kind;
pub mod meta;
pub mod reference;

pub use classify::{classify, encode, js_literal, value_code_text, ValueCodeText};
pub use generator::{form_result_function_body, FunctionBody, FunctionBodyGenerator};
pub use kind::ExpressionKind;
pub use meta::{Meta, MetaMap, ParentType};
pub use reference::is_valid_qualified_name;
