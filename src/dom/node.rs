//! Node types: NodeId, NodeData, NodeKind.

use serde_json::Value;
use slotmap::new_key_type;

use crate::event::Listener;
use crate::expression::Meta;
use crate::layout::ListEntryType;
use crate::selector::BindingId;
use crate::widget::{ElementState, Widget};

new_key_type! {
    /// Unique identifier for a form node. Copy, lightweight (u64).
    pub struct NodeId;
}

/// What a node is, structurally.
pub enum NodeKind {
    /// A leaf widget with a value (possibly none, e.g. a heading).
    Field(Box<dyn Widget>),
    /// A keyed container: its value is an object of its children's values.
    Panel,
    /// A positional container: its value is an array of its entries' values.
    List(ListModel),
    /// A layout wrapper. It has no value; its element children belong to the
    /// enclosing container.
    Layout(LayoutStyle),
}

impl std::fmt::Debug for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Field(widget) => f.debug_tuple("Field").field(widget).finish(),
            Self::Panel => write!(f, "Panel"),
            Self::List(list) => f.debug_tuple("List").field(list).finish(),
            Self::Layout(layout) => f.debug_tuple("Layout").field(layout).finish(),
        }
    }
}

/// Configuration of a list element.
#[derive(Debug, Clone, Default)]
pub struct ListModel {
    /// Entry templates. A single-type list has exactly one.
    pub entry_types: Vec<ListEntryType>,
    /// Whether entries carry their originating key (`{key, value}`).
    pub multitype: bool,
}

impl ListModel {
    /// Find the entry type whose layout key matches.
    pub fn entry_type_for_key(&self, key: &str) -> Option<&ListEntryType> {
        self.entry_types.iter().find(|t| t.layout_key() == Some(key))
    }
}

/// Layout wrapper flavour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutStyle {
    /// Children on one line.
    Horizontal,
    /// Collapsible section with an optional heading.
    ShowHide { heading: Option<String>, closed: bool },
}

/// Data associated with a single form node.
pub struct NodeData {
    /// Layout type name (e.g. "textField", "panel").
    pub element_type: String,
    /// Key within the enclosing container.
    pub key: Option<String>,
    pub kind: NodeKind,
    pub(crate) state: ElementState,
    /// If the value equals this, the node is left out of its container value.
    pub exclude_value: Option<Value>,
    pub meta: Option<Meta>,
    /// Raw selector declaration, wired after the whole tree is built.
    pub selector: Option<Value>,
    /// Inline error shown on the element.
    pub error_message: Option<String>,
    pub(crate) change_listeners: Vec<Listener>,
    pub(crate) input_listeners: Vec<Listener>,
    /// Selector bindings that watch this node.
    pub(crate) dependents: Option<Vec<BindingId>>,
}

impl NodeData {
    /// Create node data with the given element type and kind.
    pub fn new(element_type: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            element_type: element_type.into(),
            key: None,
            kind,
            state: ElementState::Normal,
            exclude_value: None,
            meta: None,
            selector: None,
            error_message: None,
            change_listeners: Vec::new(),
            input_listeners: Vec::new(),
            dependents: None,
        }
    }

    /// Set the key (builder).
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set the meta (builder). A legacy `meta.excludeValue` becomes the
    /// exclude value unless one is already set.
    pub fn with_meta(mut self, meta: Meta) -> Self {
        if self.exclude_value.is_none() {
            self.exclude_value = meta.exclude_value.clone();
        }
        self.meta = Some(meta);
        self
    }

    /// Set the exclude value (builder).
    pub fn with_exclude_value(mut self, value: Value) -> Self {
        self.exclude_value = Some(value);
        self
    }

    /// Current state.
    pub fn state(&self) -> ElementState {
        self.state
    }

    /// Whether this node is a value element (not a layout wrapper).
    pub fn is_element(&self) -> bool {
        !matches!(self.kind, NodeKind::Layout(_))
    }

    /// Whether child entries can be looked up by key under this node.
    pub fn is_container(&self) -> bool {
        matches!(self.kind, NodeKind::Panel)
    }

    /// The leaf widget, if this is a field.
    pub fn widget(&self) -> Option<&dyn Widget> {
        match &self.kind {
            NodeKind::Field(widget) => Some(widget.as_ref()),
            _ => None,
        }
    }

    /// The leaf widget, mutably.
    pub fn widget_mut(&mut self) -> Option<&mut (dyn Widget + 'static)> {
        match &mut self.kind {
            NodeKind::Field(widget) => Some(widget.as_mut()),
            _ => None,
        }
    }

    /// Whether this node holds multiple selected values.
    pub fn is_multiselect(&self) -> bool {
        self.widget().is_some_and(|w| w.is_multiselect())
    }

    /// Downcast the widget to a concrete type.
    pub fn widget_as<W: Widget + 'static>(&self) -> Option<&W> {
        self.widget()?.as_any().downcast_ref::<W>()
    }
}

impl std::fmt::Debug for NodeData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeData")
            .field("element_type", &self.element_type)
            .field("key", &self.key)
            .field("kind", &self.kind)
            .field("state", &self.state)
            .field("error_message", &self.error_message)
            .finish_non_exhaustive()
    }
}
