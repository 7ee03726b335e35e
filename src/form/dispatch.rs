//! Change and input dispatch.
//!
//! Listeners are taken out of their node while they run, so a callback can
//! freely mutate the form, including the node that fired. Listeners added
//! during the run are appended after the original list is put back. If the
//! node was removed meanwhile, the list is dropped.

use serde_json::Value;

use super::Form;
use crate::dom::NodeId;
use crate::event::{EventKind, Listener};

impl Form {
    /// Register a change listener on a node.
    pub fn add_on_change(&mut self, node: NodeId, f: impl FnMut(&mut Form, NodeId, Option<&Value>) + 'static) {
        if let Some(data) = self.dom.get_mut(node) {
            data.change_listeners.push(Listener::callback(f));
        }
    }

    /// Register an input listener on a node.
    pub fn add_on_input(&mut self, node: NodeId, f: impl FnMut(&mut Form, NodeId, Option<&Value>) + 'static) {
        if let Some(data) = self.dom.get_mut(node) {
            data.input_listeners.push(Listener::callback(f));
        }
    }

    /// Register a listener called with the whole form value whenever any
    /// element commits a change.
    pub fn add_panel_on_change(&mut self, f: impl FnMut(&mut Form, NodeId, Option<&Value>) + 'static) {
        let root = self.root();
        self.add_on_change(root, f);
    }

    /// Register a listener called with the whole form value on any input.
    pub fn add_panel_on_input(&mut self, f: impl FnMut(&mut Form, NodeId, Option<&Value>) + 'static) {
        let root = self.root();
        self.add_on_input(root, f);
    }

    /// Fire a committed change on `node`: its change listeners (selector
    /// re-evaluation included, in registration order), then the enclosing
    /// containers'.
    pub fn value_changed(&mut self, node: NodeId) {
        self.dispatch(node, EventKind::Change);
    }

    /// Fire an in-progress input event on `node` and its enclosing containers.
    pub fn input_done(&mut self, node: NodeId) {
        self.dispatch(node, EventKind::Input);
    }

    fn dispatch(&mut self, node: NodeId, kind: EventKind) {
        if self.is_destroyed() {
            return;
        }
        if self.dispatch_depth >= self.config.max_dispatch_depth {
            tracing::warn!(
                element = %self.key_label(node),
                event = kind.as_str(),
                depth = self.dispatch_depth,
                "dispatch depth exceeded; event dropped"
            );
            return;
        }
        self.dispatch_depth += 1;
        self.run_listeners(node, kind);
        self.dispatch_depth -= 1;

        let Some(container) = self.dom.enclosing_container(node) else {
            return;
        };
        if self.bulk_set.contains(&container) {
            return;
        }
        self.dispatch(container, kind);
    }

    fn run_listeners(&mut self, node: NodeId, kind: EventKind) {
        let Some(data) = self.dom.get_mut(node) else {
            return;
        };
        let mut listeners = std::mem::take(match kind {
            EventKind::Change => &mut data.change_listeners,
            EventKind::Input => &mut data.input_listeners,
        });
        if listeners.is_empty() {
            return;
        }
        tracing::trace!(element = %self.key_label(node), event = kind.as_str(), listeners = listeners.len(), "dispatch");

        let value = self.value(node);
        for listener in &mut listeners {
            match listener {
                Listener::Callback(f) => f(self, node, value.as_ref()),
                Listener::Dependents if kind == EventKind::Change => self.run_dependents(node),
                Listener::Dependents => {}
            }
        }

        let Some(data) = self.dom.get_mut(node) else {
            return;
        };
        let slot = match kind {
            EventKind::Change => &mut data.change_listeners,
            EventKind::Input => &mut data.input_listeners,
        };
        let added = std::mem::replace(slot, listeners);
        slot.extend(added);
    }
}
