//! # formpanel
//!
//! Declarative, JSON-configured form panels.
//!
//! A [`Form`] is built from a layout description: a tree of element
//! descriptors (text fields, checkboxes, lists, nested panels, layout
//! wrappers). Elements may declare selectors that show, hide, enable,
//! disable or compute them from other elements' values. The current values
//! come back out as a plain JSON object, or as a generated function body in
//! which fields marked as expressions are spliced in as source text.
//!
//! ## Core Systems
//!
//! - **[`dom`]** — Slotmap-backed node arena with key and path lookup
//! - **[`form`]** — The form: configuration, value aggregation, change dispatch, lists
//! - **[`selector`]** — Selector declarations, match predicates and dependency bindings
//! - **[`expression`]** — Meta shadow tree, expression classification, function body generation
//! - **[`layout`]** — Serde model of layout descriptions
//! - **[`registry`]** — Element type and named action registry
//! - **[`widget`]** — Widget trait and element state
//! - **[`widgets`]** — Built-in widgets
//! - **[`event`]** — Change and input listeners
//! - **[`testing`]** — Headless pilot for driving forms in tests

// Foundation
pub mod config;
pub mod error;

// Core systems
pub mod dom;
pub mod expression;
pub mod layout;
pub mod registry;
pub mod selector;

// Widget system
pub mod widget;
pub mod widgets;

// Events
pub mod event;

// Form
pub mod form;

// Testing
pub mod testing;

pub use config::FormConfig;
pub use dom::NodeId;
pub use error::{FormError, Result};
pub use expression::{FunctionBody, FunctionBodyGenerator, Meta, MetaMap};
pub use form::{Form, SubmitHandlers};
pub use registry::ElementRegistry;
pub use selector::{ParentRef, SelectorSpec};
pub use widget::{ElementState, Widget};
