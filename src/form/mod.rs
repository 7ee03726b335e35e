//! Form: the root container of a configured element tree.
//!
//! [`Form`] owns the node arena, the selector bindings, the element registry
//! and the configuration. Building, value aggregation, event dispatch and
//! list editing live in the submodules; each adds an `impl Form` block.

mod build;
mod dispatch;
mod list;
mod submit;
mod value;

use std::rc::Rc;

use slotmap::{SecondaryMap, SlotMap};

pub use submit::{CancelCallback, SubmitCallback, SubmitHandlers};

use crate::config::FormConfig;
use crate::dom::{Dom, NodeData, NodeId, NodeKind};
use crate::error::{FormError, Result};
use crate::registry::ElementRegistry;
use crate::selector::{BindingId, SelectorBinding};
use crate::widget::ElementState;

/// A configured form.
///
/// The root node is always a panel. Elements are created from a layout
/// description with [`Form::configure`] and addressed by [`NodeId`].
pub struct Form {
    pub(crate) dom: Dom,
    pub(crate) bindings: SlotMap<BindingId, SelectorBinding>,
    pub(crate) registry: Rc<ElementRegistry>,
    pub(crate) config: FormConfig,
    root: NodeId,
    /// Nesting of listener runs, checked against `max_dispatch_depth`.
    pub(crate) dispatch_depth: usize,
    /// Containers applying a bulk value; their children's changes do not
    /// bubble into them.
    pub(crate) bulk_set: Vec<NodeId>,
    pub(crate) submit_handlers: SecondaryMap<NodeId, SubmitHandlers>,
    /// Set while `configure` runs phase one.
    pub(crate) building: bool,
    destroyed: bool,
}

impl Form {
    /// Create an empty form with the built-in element types.
    pub fn new() -> Self {
        Self::with_registry(Rc::new(ElementRegistry::with_defaults()))
    }

    /// Create an empty form using `registry` for element types and named
    /// selector actions.
    pub fn with_registry(registry: Rc<ElementRegistry>) -> Self {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::new(crate::registry::PANEL, NodeKind::Panel));
        Self {
            dom,
            bindings: SlotMap::with_key(),
            registry,
            config: FormConfig::default(),
            root,
            dispatch_depth: 0,
            bulk_set: Vec::new(),
            submit_handlers: SecondaryMap::new(),
            building: false,
            destroyed: false,
        }
    }

    /// Replace the configuration (builder).
    pub fn with_config(mut self, config: FormConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    /// The root panel.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Read access to the node tree.
    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    /// Node data, if the node is live.
    pub fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.dom.get(id)
    }

    /// Mutable node data, if the node is live.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.dom.get_mut(id)
    }

    /// Whether [`Form::destroy`] has run.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    // -----------------------------------------------------------------------
    // Entry lookup
    // -----------------------------------------------------------------------

    /// Root-level element with the given key.
    pub fn entry(&self, key: &str) -> Option<NodeId> {
        self.dom.get_entry(self.root, key)
    }

    /// Element at a key path from the root.
    pub fn entry_from_path<S: AsRef<str>>(&self, path: &[S]) -> Option<NodeId> {
        self.dom.get_entry_from_path(self.root, path, 0)
    }

    /// Element of `container` with the given key.
    pub fn get_entry(&self, container: NodeId, key: &str) -> Option<NodeId> {
        self.dom.get_entry(container, key)
    }

    /// Element at `path[start..]` below `container`.
    pub fn get_entry_from_path<S: AsRef<str>>(&self, container: NodeId, path: &[S], start: usize) -> Option<NodeId> {
        self.dom.get_entry_from_path(container, path, start)
    }

    // -----------------------------------------------------------------------
    // State
    // -----------------------------------------------------------------------

    /// Current state of an element.
    pub fn state(&self, node: NodeId) -> Option<ElementState> {
        self.dom.get(node).map(NodeData::state)
    }

    /// Set an element's state. A no-op when unchanged.
    ///
    /// Visibility follows the state; editability is only touched for the
    /// visible states, so a hidden element keeps its last enabled flag.
    pub fn set_state(&mut self, node: NodeId, state: ElementState) -> Result<()> {
        let data = self.dom.get_mut(node).ok_or(FormError::NodeNotFound)?;
        if data.state == state {
            return Ok(());
        }
        data.state = state;
        if let Some(widget) = data.widget_mut() {
            widget.set_visible(state.is_visible());
            if state.is_visible() {
                widget.set_disabled(!state.is_editable());
            }
        }
        tracing::trace!(element = ?data.key, %state, "state changed");
        Ok(())
    }

    /// Enable or disable every field, without changing element states.
    ///
    /// Re-enabling leaves elements in the `Disabled` state disabled.
    pub fn set_disabled(&mut self, disabled: bool) {
        for id in self.dom.walk_depth_first(self.root) {
            if let Some(data) = self.dom.get_mut(id) {
                let keep_disabled = data.state == ElementState::Disabled;
                if let Some(widget) = data.widget_mut() {
                    widget.set_disabled(disabled || keep_disabled);
                }
            }
        }
    }

    /// The first element, in layout order, that can take focus: a focusable
    /// widget in the `Normal` state with every enclosing element `Normal` too.
    pub fn give_focus(&self) -> Option<NodeId> {
        self.dom.walk_depth_first(self.root).into_iter().find(|&id| {
            let Some(data) = self.dom.get(id) else {
                return false;
            };
            data.state == ElementState::Normal
                && data.widget().is_some_and(|w| w.can_focus())
                && self
                    .dom
                    .ancestors(id)
                    .iter()
                    .filter_map(|&a| self.dom.get(a))
                    .all(|a| a.state == ElementState::Normal)
        })
    }

    // -----------------------------------------------------------------------
    // Inline errors
    // -----------------------------------------------------------------------

    /// Show an inline error on an element.
    pub fn set_element_error(&mut self, node: NodeId, message: impl Into<String>) {
        if let Some(data) = self.dom.get_mut(node) {
            data.error_message = Some(message.into());
        }
    }

    /// The inline error shown on an element.
    pub fn element_error(&self, node: NodeId) -> Option<&str> {
        self.dom.get(node)?.error_message.as_deref()
    }

    /// Every element carrying an inline error, in layout order.
    pub fn element_errors(&self) -> Vec<(NodeId, String)> {
        self.dom
            .walk_depth_first(self.root)
            .into_iter()
            .filter_map(|id| Some((id, self.dom.get(id)?.error_message.clone()?)))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Teardown
    // -----------------------------------------------------------------------

    /// Release every element, depth first. Calling it again does nothing.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        let order = self.dom.walk_depth_first(self.root);
        for &id in order.iter().rev() {
            if let Some(data) = self.dom.get_mut(id) {
                data.change_listeners.clear();
                data.input_listeners.clear();
                data.dependents = None;
            }
        }
        self.dom.remove(self.root);
        self.bindings.clear();
        self.submit_handlers.clear();
        tracing::debug!(elements = order.len(), "form destroyed");
    }

    /// Key of a node for messages: its key, or its type name.
    pub(crate) fn key_label(&self, node: NodeId) -> String {
        match self.dom.get(node) {
            Some(data) => data.key.clone().unwrap_or_else(|| data.element_type.clone()),
            None => "<removed>".to_string(),
        }
    }

    /// Start over with an empty root panel.
    pub(crate) fn reset_tree(&mut self) {
        self.dom = Dom::new();
        self.root = self.dom.insert(NodeData::new(crate::registry::PANEL, NodeKind::Panel));
        self.bindings.clear();
        self.submit_handlers.clear();
        self.bulk_set.clear();
        self.destroyed = false;
    }
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Form")
            .field("nodes", &self.dom.len())
            .field("bindings", &self.bindings.len())
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}
