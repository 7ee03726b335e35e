//! Element registry: type name to factory, plus named selector actions.
//!
//! [`ElementRegistry`] is owned by the form (shared through an `Rc`) and is
//! read-only while a form is being built. `with_defaults()` installs every
//! built-in element type.

use std::collections::HashMap;
use std::rc::Rc;

use crate::dom::{LayoutStyle, ListModel, NodeId, NodeKind};
use crate::error::{FormError, Result};
use crate::form::Form;
use crate::layout::ElementDescriptor;
use crate::widget::Widget;
use crate::widgets::{
    Checkbox, CheckboxGroup, Dropdown, Heading, HtmlDisplay, Invisible, RadioGroup, Slider, Spacer,
    Submit, TextField, Textarea,
};

/// Builds the node kind for a descriptor.
pub type ElementFactory = Rc<dyn Fn(&ElementDescriptor) -> Result<NodeKind>>;

/// A custom selector action: receives the form, the dependent element and
/// the watched parent elements, in declaration order.
pub type ActionFn = Rc<dyn Fn(&mut Form, NodeId, &[NodeId]) -> Result<()>>;

/// Type name of a nested panel.
pub const PANEL: &str = "panel";
/// Type name of a list.
pub const LIST: &str = "list";
/// Type name of a horizontal layout wrapper.
pub const HORIZONTAL_LAYOUT: &str = "horizontalLayout";
/// Type name of a show/hide layout wrapper.
pub const SHOW_HIDE_LAYOUT: &str = "showHideLayout";

/// Registry of element factories and custom selector actions.
pub struct ElementRegistry {
    factories: HashMap<String, ElementFactory>,
    actions: HashMap<String, ActionFn>,
}

impl ElementRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
            actions: HashMap::new(),
        }
    }

    /// Create a registry with every built-in element type.
    ///
    /// Fields: `textField`, `textarea`, `checkbox`, `checkboxGroup`,
    /// `dropdown`, `radioButtonGroup`, `slider`, `invisible`, `htmlDisplay`,
    /// `heading`, `spacer`, `submit`. Containers: `panel`, `list`.
    /// Layout wrappers: `horizontalLayout`, `showHideLayout`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_field(TextField::TYPE_NAME, TextField::from_descriptor);
        registry.register_field(Textarea::TYPE_NAME, Textarea::from_descriptor);
        registry.register_field(Checkbox::TYPE_NAME, Checkbox::from_descriptor);
        registry.register_field(CheckboxGroup::TYPE_NAME, CheckboxGroup::from_descriptor);
        registry.register_field(Dropdown::TYPE_NAME, Dropdown::from_descriptor);
        registry.register_field(RadioGroup::TYPE_NAME, RadioGroup::from_descriptor);
        registry.register_field(Slider::TYPE_NAME, Slider::from_descriptor);
        registry.register_field(Invisible::TYPE_NAME, Invisible::from_descriptor);
        registry.register_field(HtmlDisplay::TYPE_NAME, HtmlDisplay::from_descriptor);
        registry.register_field(Heading::TYPE_NAME, Heading::from_descriptor);
        registry.register_field(Spacer::TYPE_NAME, Spacer::from_descriptor);
        registry.register_field(Submit::TYPE_NAME, Submit::from_descriptor);

        registry.register(PANEL, |_| Ok(NodeKind::Panel));
        registry.register(LIST, list_kind);
        registry.register(HORIZONTAL_LAYOUT, |desc| {
            require_form_data(desc)?;
            Ok(NodeKind::Layout(LayoutStyle::Horizontal))
        });
        registry.register(SHOW_HIDE_LAYOUT, |desc| {
            require_form_data(desc)?;
            Ok(NodeKind::Layout(LayoutStyle::ShowHide {
                heading: desc.str_extra("heading").map(str::to_string),
                closed: desc.bool_extra("closed").unwrap_or(false),
            }))
        });
        registry
    }

    /// Register a factory for `type_name`, replacing any existing one.
    pub fn register(
        &mut self,
        type_name: impl Into<String>,
        factory: impl Fn(&ElementDescriptor) -> Result<NodeKind> + 'static,
    ) {
        self.factories.insert(type_name.into(), Rc::new(factory));
    }

    /// Register a leaf widget constructor for `type_name`.
    pub fn register_field<W, F>(&mut self, type_name: impl Into<String>, constructor: F)
    where
        W: Widget + 'static,
        F: Fn(&ElementDescriptor) -> Result<W> + 'static,
    {
        self.register(type_name, move |desc| {
            constructor(desc).map(|w| NodeKind::Field(Box::new(w)))
        });
    }

    /// Remove the factory for `type_name`.
    pub fn unregister(&mut self, type_name: &str) -> Option<ElementFactory> {
        self.factories.remove(type_name)
    }

    /// Register a named selector action, referenced from layouts through
    /// `selector.actionFunction`.
    pub fn register_action(
        &mut self,
        name: impl Into<String>,
        action: impl Fn(&mut Form, NodeId, &[NodeId]) -> Result<()> + 'static,
    ) {
        self.actions.insert(name.into(), Rc::new(action));
    }

    /// Look up a named selector action.
    pub fn action(&self, name: &str) -> Option<ActionFn> {
        self.actions.get(name).cloned()
    }

    /// Whether a factory exists for `type_name`.
    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    /// Build the node kind for a descriptor.
    pub fn instantiate(&self, desc: &ElementDescriptor) -> Result<NodeKind> {
        let type_name = desc.require_type()?;
        let factory = self
            .factories
            .get(type_name)
            .ok_or_else(|| FormError::UnknownElementType(type_name.to_string()))?;
        factory(desc)
    }

    /// Number of registered element types.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether no element types are registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl Default for ElementRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ElementRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<_> = self.factories.keys().collect();
        types.sort();
        let mut actions: Vec<_> = self.actions.keys().collect();
        actions.sort();
        f.debug_struct("ElementRegistry")
            .field("types", &types)
            .field("actions", &actions)
            .finish()
    }
}

fn require_form_data(desc: &ElementDescriptor) -> Result<()> {
    if desc.form_data.is_none() {
        return Err(FormError::InvalidLayout(format!(
            "{} config needs an array named 'formData'",
            desc.element_type.as_deref().unwrap_or("layout")
        )));
    }
    Ok(())
}

/// `entryType` makes a single-type list, `entryTypes` a multitype list.
fn list_kind(desc: &ElementDescriptor) -> Result<NodeKind> {
    let model = if let Some(entry_type) = &desc.entry_type {
        ListModel {
            entry_types: vec![entry_type.clone()],
            multitype: false,
        }
    } else if let Some(entry_types) = &desc.entry_types {
        ListModel {
            entry_types: entry_types.clone(),
            multitype: true,
        }
    } else {
        return Err(FormError::InvalidLayout(format!(
            "list {} needs entryType or entryTypes",
            desc.key_or_empty()
        )));
    };
    Ok(NodeKind::List(model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn desc(v: serde_json::Value) -> ElementDescriptor {
        ElementDescriptor::from_value(&v).unwrap()
    }

    #[test]
    fn new_registry_is_empty() {
        let registry = ElementRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn defaults_cover_builtins() {
        let registry = ElementRegistry::with_defaults();
        for name in [
            "textField", "textarea", "checkbox", "checkboxGroup", "dropdown",
            "radioButtonGroup", "slider", "invisible", "htmlDisplay", "heading",
            "spacer", "submit", "panel", "list", "horizontalLayout", "showHideLayout",
        ] {
            assert!(registry.contains(name), "{name}");
        }
        assert_eq!(registry.len(), 16);
    }

    #[test]
    fn instantiate_field() {
        let registry = ElementRegistry::with_defaults();
        let kind = registry.instantiate(&desc(json!({"type": "checkbox", "key": "c"}))).unwrap();
        let NodeKind::Field(widget) = kind else {
            panic!("expected a field");
        };
        assert_eq!(widget.widget_type(), "checkbox");
    }

    #[test]
    fn instantiate_errors() {
        let registry = ElementRegistry::with_defaults();
        assert!(matches!(
            registry.instantiate(&desc(json!({"key": "x"}))),
            Err(FormError::MissingType)
        ));
        assert!(matches!(
            registry.instantiate(&desc(json!({"type": "colorWheel"}))),
            Err(FormError::UnknownElementType(t)) if t == "colorWheel"
        ));
        assert!(matches!(
            registry.instantiate(&desc(json!({"type": "horizontalLayout"}))),
            Err(FormError::InvalidLayout(_))
        ));
        assert!(matches!(
            registry.instantiate(&desc(json!({"type": "list", "key": "l"}))),
            Err(FormError::InvalidLayout(_))
        ));
    }

    #[test]
    fn list_flavours() {
        let registry = ElementRegistry::with_defaults();
        let single = registry
            .instantiate(&desc(json!({"type": "list", "entryType": {"layout": {"type": "textField"}}})))
            .unwrap();
        assert!(matches!(single, NodeKind::List(ListModel { multitype: false, .. })));
        let multi = registry
            .instantiate(&desc(json!({"type": "list", "entryTypes": []})))
            .unwrap();
        assert!(matches!(multi, NodeKind::List(ListModel { multitype: true, .. })));
    }

    #[test]
    fn show_hide_reads_heading() {
        let registry = ElementRegistry::with_defaults();
        let kind = registry
            .instantiate(&desc(json!({"type": "showHideLayout", "heading": "More", "closed": true, "formData": []})))
            .unwrap();
        let NodeKind::Layout(style) = kind else {
            panic!("expected a layout");
        };
        assert_eq!(style, LayoutStyle::ShowHide { heading: Some("More".into()), closed: true });
    }

    #[test]
    fn custom_types_and_actions() {
        let mut registry = ElementRegistry::new();
        registry.register_field("shout", TextField::from_descriptor);
        registry.register_action("noop", |_, _, _| Ok(()));
        assert!(registry.contains("shout"));
        assert!(registry.action("noop").is_some());
        assert!(registry.action("missing").is_none());
        assert!(registry.unregister("shout").is_some());
        assert!(!registry.contains("shout"));
    }
}
