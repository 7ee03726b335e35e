//! Building the node tree from a layout description.
//!
//! Configuration runs in two phases. Phase one instantiates every element
//! through the registry and applies declared values and states; a
//! descriptor that cannot be built, or whose declared value does not fit,
//! becomes an error element in its place.
//! Phase two wires every declared selector, so a selector may name an
//! element declared after it.

use serde_json::{json, Value};

use super::Form;
use crate::dom::{NodeData, NodeId, NodeKind};
use crate::error::{FormError, Result};
use crate::layout::{ElementDescriptor, FormLayout};
use crate::widgets::ErrorElement;

impl Form {
    /// Build the form from a layout description.
    ///
    /// Never fails: an unusable description is replaced by the
    /// "Invalid form layout!" error layout, and a failure while building
    /// replaces the whole form with a single error message.
    pub fn configure(&mut self, layout: &Value) {
        self.configure_layout(FormLayout::from_value(layout));
    }

    /// Build the form from an already interpreted layout.
    pub fn configure_layout(&mut self, layout: FormLayout) {
        self.reset_tree();
        let root = self.root();
        self.building = true;
        let built = self.build_children(root, &layout.layout);
        self.building = false;
        if let Err(err) = built {
            tracing::error!(error = %err, "form configuration failed");
            if layout.is_error_layout {
                return;
            }
            let message = format!("{}{}", self.config.panel_error_prefix, err);
            self.configure_layout(FormLayout::error(&message));
            return;
        }
        self.populate_selectors(root);
        if layout.disabled {
            self.set_disabled(true);
        }
        tracing::debug!(
            elements = self.dom.len(),
            bindings = self.bindings.len(),
            "form configured"
        );
    }

    /// Build `descriptors` as children of `parent`, in order.
    ///
    /// Per-element failures, including a declared value or state that cannot
    /// be applied, are contained in an error element.
    pub(crate) fn build_children(&mut self, parent: NodeId, descriptors: &[Value]) -> Result<()> {
        for raw in descriptors {
            self.build_element(parent, raw)?;
        }
        Ok(())
    }

    /// Build one element and its subtree under `parent`.
    pub(crate) fn build_element(&mut self, parent: NodeId, raw: &Value) -> Result<NodeId> {
        let (desc, kind) = match self.instantiate(parent, raw) {
            Ok(built) => built,
            Err(err) => return Ok(self.insert_error_element(parent, raw, &err)),
        };

        let mut data = NodeData::new(desc.element_type.clone().unwrap_or_default(), kind);
        data.key = desc.key.clone();
        data.exclude_value = desc.exclude_value.clone();
        if let Some(meta) = desc.meta.clone() {
            data = data.with_meta(meta);
        }
        data.selector = desc.selector.clone();
        let has_children = matches!(data.kind, NodeKind::Panel | NodeKind::Layout(_));
        let is_panel = matches!(data.kind, NodeKind::Panel);
        let id = self.dom.insert_child(parent, data);

        if has_children {
            match &desc.form_data {
                Some(children) => self.build_children(id, children)?,
                None if is_panel => {
                    let message = format!(
                        "{}panel {} config needs an array named 'formData'",
                        self.config.panel_error_prefix,
                        desc.key_or_empty()
                    );
                    self.build_children(id, &FormLayout::error(&message).layout)?;
                }
                None => {}
            }
        }

        if let Err(err) = self.apply_declared(id, &desc) {
            // the half-built subtree is the last child of `parent`, so the
            // error element lands in its place
            self.dom.remove(id);
            self.prune_bindings();
            return Ok(self.insert_error_element(parent, raw, &err));
        }
        Ok(id)
    }

    fn apply_declared(&mut self, id: NodeId, desc: &ElementDescriptor) -> Result<()> {
        if let Some(value) = &desc.value {
            self.set_value(id, value)?;
        }
        if let Some(state) = desc.state {
            self.set_state(id, state)?;
        }
        Ok(())
    }

    fn instantiate(&self, parent: NodeId, raw: &Value) -> Result<(ElementDescriptor, NodeKind)> {
        let desc = ElementDescriptor::from_value(raw)?;
        if let Some(key) = &desc.key {
            // list entries may share a key; panel children may not
            let panel = match self.dom.get(parent).map(|d| &d.kind) {
                Some(NodeKind::Panel) => Some(parent),
                Some(NodeKind::Layout(_)) => self
                    .dom
                    .enclosing_container(parent)
                    .filter(|&c| self.dom.get(c).is_some_and(|d| matches!(d.kind, NodeKind::Panel))),
                _ => None,
            };
            if panel.is_some_and(|p| self.dom.get_entry(p, key).is_some()) {
                return Err(FormError::InvalidLayout(format!("duplicate key: {key}")));
            }
        }
        let kind = self.registry.instantiate(&desc)?;
        Ok((desc, kind))
    }

    /// Put an error element where a descriptor failed to build. It keeps the
    /// descriptor's key when one can be read, and carries no value.
    fn insert_error_element(&mut self, parent: NodeId, raw: &Value, err: &FormError) -> NodeId {
        let key = raw.get("key").and_then(Value::as_str).map(str::to_string);
        tracing::error!(key = ?key, error = %err, "element construction failed");
        let message = err.to_string();
        let mut data = NodeData::new(
            ErrorElement::TYPE_NAME,
            NodeKind::Field(Box::new(ErrorElement::new(message.clone()))),
        );
        data.key = key;
        data.error_message = Some(message);
        self.dom.insert_child(parent, data)
    }

    /// Layout of a list entry built from the entry type at `index`, with its
    /// value applied. Returns the new entry.
    pub(crate) fn build_list_entry(&mut self, list: NodeId, index: usize, value: Option<&Value>) -> Result<NodeId> {
        let (layout, multitype) = match self.dom.get(list).map(|d| &d.kind) {
            Some(NodeKind::List(model)) => {
                let entry_type = model.entry_types.get(index).ok_or_else(|| FormError::InvalidValue {
                    element: self.key_label(list),
                    message: format!("no entry type at index {index}"),
                })?;
                (entry_type.layout.clone(), model.multitype)
            }
            Some(_) => {
                return Err(FormError::InvalidValue {
                    element: self.key_label(list),
                    message: "not a list".into(),
                })
            }
            None => return Err(FormError::NodeNotFound),
        };
        let layout = layout.unwrap_or_else(|| json!({"type": "textField"}));
        let mut raw = layout.clone();
        if let (Some(value), Value::Object(map)) = (value, &mut raw) {
            map.insert("value".into(), value.clone());
        }
        if !multitype {
            // entries of a single-type list are positional
            if let Value::Object(map) = &mut raw {
                map.remove("key");
            }
        }
        self.build_element(list, &raw)
    }
}
