//! Change and input listeners attached to form nodes.
//!
//! A node keeps two ordered listener lists: change listeners fire when a
//! value is committed, input listeners fire while a value is being edited.
//! Both receive the form, the node that fired and the node's current value
//! (`None` when the node has no value).

use serde_json::Value;

use crate::dom::NodeId;
use crate::form::Form;

/// Callback invoked with `(form, node, value)`.
pub type Callback = Box<dyn FnMut(&mut Form, NodeId, Option<&Value>)>;

/// Kind of event a listener subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A committed value change.
    Change,
    /// In-progress input (e.g. a keystroke).
    Input,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Change => "change",
            Self::Input => "input",
        }
    }
}

/// An entry in a node's listener list.
pub enum Listener {
    /// A user callback.
    Callback(Callback),
    /// Re-evaluate every selector binding that watches this node.
    ///
    /// Installed once, when the first binding starts watching the node, so
    /// selector evaluation keeps its place in registration order.
    Dependents,
}

impl Listener {
    /// Wrap a closure.
    pub fn callback(f: impl FnMut(&mut Form, NodeId, Option<&Value>) + 'static) -> Self {
        Self::Callback(Box::new(f))
    }
}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Callback(_) => write!(f, "Callback(<fn>)"),
            Self::Dependents => write!(f, "Dependents"),
        }
    }
}
