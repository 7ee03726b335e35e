//! Layout descriptions: the JSON model a form is configured from.

pub mod descriptor;
pub mod form_layout;

pub use descriptor::{ElementDescriptor, ListEntryType};
pub use form_layout::{FormLayout, INVALID_LAYOUT_MESSAGE};
