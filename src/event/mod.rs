//! Event system: change/input listeners on form nodes.

pub mod listener;

pub use listener::{Callback, EventKind, Listener};
