//! Selectors: declared dependencies of one element on other elements' values.

pub mod engine;
pub mod predicate;
pub mod spec;

pub use engine::{BindingAction, BindingId, SelectorBinding};
pub use predicate::{coercing_eq, loose_eq, MatchPredicate};
pub use spec::{ParentRef, SelectorAction, SelectorSpec, Target};
