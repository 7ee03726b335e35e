//! Value aggregation, bulk value application and meta extraction.

use serde_json::{json, Map, Value};

use super::Form;
use crate::dom::{NodeId, NodeKind};
use crate::error::{FormError, Result};
use crate::expression::{
    classify, value_code_text, ExpressionKind, FunctionBody, FunctionBodyGenerator, Meta, MetaMap, ParentType,
    ValueCodeText,
};
use crate::selector::loose_eq;

/// Structural shape of a node, copied out so the node can be mutated.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Shape {
    Field,
    Panel,
    List { multitype: bool },
    Layout,
}

impl Form {
    fn shape(&self, node: NodeId) -> Option<Shape> {
        Some(match &self.dom.get(node)?.kind {
            NodeKind::Field(_) => Shape::Field,
            NodeKind::Panel => Shape::Panel,
            NodeKind::List(model) => Shape::List {
                multitype: model.multitype,
            },
            NodeKind::Layout(_) => Shape::Layout,
        })
    }

    // -----------------------------------------------------------------------
    // Reading
    // -----------------------------------------------------------------------

    /// Current value of an element.
    ///
    /// Fields report their widget value; panels an object of their
    /// contributing children; lists an array of their contributing entries.
    /// Layout wrappers, removed nodes and value-less widgets give `None`.
    pub fn value(&self, node: NodeId) -> Option<Value> {
        match self.shape(node)? {
            Shape::Field => self.dom.get(node)?.widget()?.value(),
            Shape::Panel => {
                let mut map = Map::new();
                for child in self.dom.element_children(node) {
                    let Some(key) = self.dom.get(child).and_then(|d| d.key.clone()) else {
                        continue;
                    };
                    if let Some(value) = self.contributed_value(child) {
                        map.insert(key, value);
                    }
                }
                Some(Value::Object(map))
            }
            Shape::List { multitype } => {
                let mut items = Vec::new();
                for entry in self.dom.element_children(node) {
                    let Some(value) = self.contributed_value(entry) else {
                        continue;
                    };
                    if multitype {
                        let key = self.dom.get(entry).and_then(|d| d.key.clone());
                        items.push(json!({"key": key, "value": value}));
                    } else {
                        items.push(value);
                    }
                }
                Some(Value::Array(items))
            }
            Shape::Layout => None,
        }
    }

    /// Value of the whole form. An empty object once destroyed.
    pub fn root_value(&self) -> Value {
        self.value(self.root()).unwrap_or_else(|| json!({}))
    }

    /// The value a child adds to its container, if any.
    fn contributed_value(&self, child: NodeId) -> Option<Value> {
        let data = self.dom.get(child)?;
        if !data.state().contributes_value() {
            return None;
        }
        let value = self.value(child)?;
        if data.exclude_value.as_ref().is_some_and(|x| loose_eq(x, &value)) {
            return None;
        }
        Some(value)
    }

    // -----------------------------------------------------------------------
    // Writing
    // -----------------------------------------------------------------------

    /// Set an element's value and fire its change event.
    ///
    /// A panel takes an object and sets each child named by a key; keys
    /// without a child are ignored. A list takes an array and rebuilds its
    /// entries when the array differs from the current value. Either fires a
    /// single change on the container.
    pub fn set_value(&mut self, node: NodeId, value: &Value) -> Result<()> {
        match self.shape(node).ok_or(FormError::NodeNotFound)? {
            Shape::Field => {
                if let Some(widget) = self.dom.get_mut(node).and_then(|d| d.widget_mut()) {
                    widget.set_value_impl(value);
                }
            }
            Shape::Panel => {
                let Value::Object(map) = value else {
                    return Err(self.invalid_value(node, "a panel value must be an object"));
                };
                self.bulk_set.push(node);
                let applied = self.apply_panel_value(node, map);
                self.bulk_set.pop();
                applied?;
            }
            Shape::List { multitype } => {
                let Value::Array(items) = value else {
                    return Err(self.invalid_value(node, "a list value must be an array"));
                };
                if self.value(node).as_ref() == Some(value) {
                    return Ok(());
                }
                self.bulk_set.push(node);
                let applied = self.apply_list_value(node, items, multitype);
                self.bulk_set.pop();
                applied?;
            }
            Shape::Layout => {
                return Err(self.invalid_value(node, "layout wrappers have no value"));
            }
        }
        self.value_changed(node);
        Ok(())
    }

    fn apply_panel_value(&mut self, panel: NodeId, map: &Map<String, Value>) -> Result<()> {
        for (key, value) in map {
            match self.dom.get_entry(panel, key) {
                Some(child) => self.set_value(child, value)?,
                None => tracing::debug!(panel = %self.key_label(panel), key, "no element for key; ignored"),
            }
        }
        Ok(())
    }

    fn apply_list_value(&mut self, list: NodeId, items: &[Value], multitype: bool) -> Result<()> {
        for entry in self.dom.children(list).to_vec() {
            self.dom.remove(entry);
        }
        self.prune_bindings();
        for item in items {
            if !multitype {
                let entry = self.build_list_entry(list, 0, Some(item))?;
                self.wire_entry(entry);
                continue;
            }
            let key = item.get("key").and_then(Value::as_str);
            let index = match (key, self.dom.get(list).map(|d| &d.kind)) {
                (Some(key), Some(NodeKind::List(model))) => {
                    model.entry_types.iter().position(|t| t.layout_key() == Some(key))
                }
                _ => None,
            };
            match index {
                Some(index) => {
                    let entry = self.build_list_entry(list, index, item.get("value"))?;
                    self.wire_entry(entry);
                }
                None => tracing::warn!(list = %self.key_label(list), item = %item, "no entry type for list value; ignored"),
            }
        }
        Ok(())
    }

    /// Wire a new list entry's selectors, unless the whole form is still
    /// being built and will wire everything at once.
    pub(crate) fn wire_entry(&mut self, entry: NodeId) {
        if !self.building {
            self.populate_selectors(entry);
        }
    }

    fn invalid_value(&self, node: NodeId, message: &str) -> FormError {
        FormError::InvalidValue {
            element: self.key_label(node),
            message: message.to_string(),
        }
    }

    // -----------------------------------------------------------------------
    // Meta
    // -----------------------------------------------------------------------

    /// Meta of an element, for result code generation.
    ///
    /// A field reports its configured meta. A nested panel reports an object
    /// meta over its children. A list reports array meta computed from its
    /// current entries, or `None` while empty.
    pub fn meta(&self, node: NodeId) -> Option<Meta> {
        let data = self.dom.get(node)?;
        match self.shape(node)? {
            Shape::Field => data.meta.clone(),
            Shape::Panel => Some(Meta::object(self.panel_meta(node))),
            Shape::List { multitype } => {
                let entries = self.dom.element_children(node);
                let first = *entries.first()?;
                let mut meta = data.meta.clone().unwrap_or_default();
                meta.parent_type = Some(ParentType::Array);
                if multitype {
                    let wrapped = entries
                        .iter()
                        .map(|&e| {
                            let mut child = MetaMap::new();
                            child.insert("value".into(), self.meta(e).unwrap_or_default());
                            Meta::object(child)
                        })
                        .collect();
                    meta.entry_meta_array = Some(wrapped);
                } else {
                    // without entry meta the whole list encodes as a literal
                    let entry_meta = self.meta(first)?;
                    meta.entry_meta = Some(Box::new(entry_meta));
                }
                Some(meta)
            }
            Shape::Layout => None,
        }
    }

    /// Meta map of the root panel.
    pub fn root_meta(&self) -> MetaMap {
        self.panel_meta(self.root())
    }

    fn panel_meta(&self, panel: NodeId) -> MetaMap {
        let mut map = MetaMap::new();
        for child in self.dom.element_children(panel) {
            let Some(key) = self.dom.get(child).and_then(|d| d.key.clone()) else {
                continue;
            };
            if let Some(meta) = self.meta(child) {
                map.insert(key, meta);
            }
        }
        map
    }

    /// Expression kind of an element, classified against the current value
    /// of its container.
    pub fn expression_kind(&self, node: NodeId) -> Result<ExpressionKind> {
        let container = self.container_value(node)?;
        classify(self.meta(node).as_ref(), container.as_ref(), &self.key_label(node))
    }

    /// Encoded result text of a single element.
    pub fn code_text(&self, node: NodeId) -> Result<ValueCodeText> {
        let container = self.container_value(node)?;
        value_code_text(self.value(node).as_ref(), self.meta(node).as_ref(), container.as_ref())
    }

    fn container_value(&self, node: NodeId) -> Result<Option<Value>> {
        if !self.dom.contains(node) {
            return Err(FormError::NodeNotFound);
        }
        Ok(self.dom.enclosing_container(node).and_then(|c| self.value(c)))
    }

    /// Generate the result function body for the form's current value.
    pub fn result_function_body(&self) -> Result<FunctionBody> {
        FunctionBodyGenerator::generate(&self.root_value(), &self.root_meta())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::ElementState;
    use pretty_assertions::assert_eq;

    fn configured(layout: Value) -> Form {
        let mut form = Form::new();
        form.configure(&layout);
        form
    }

    #[test]
    fn aggregation_skips_inactive_and_undefined() {
        let mut form = configured(json!([
            {"type": "textField", "key": "a", "value": "1"},
            {"type": "textField", "key": "b", "value": "2"},
            {"type": "heading", "key": "h", "text": "Title"},
            {"type": "invisible", "key": "i"}
        ]));
        assert_eq!(form.root_value(), json!({"a": "1", "b": "2"}));
        let b = form.entry("b").unwrap();
        form.set_state(b, ElementState::Hidden).unwrap();
        assert_eq!(form.root_value(), json!({"a": "1", "b": "2"}));
        form.set_state(b, ElementState::Inactive).unwrap();
        assert_eq!(form.root_value(), json!({"a": "1"}));
    }

    #[test]
    fn exclude_value_omits_key() {
        let mut form = configured(json!([
            {"type": "textField", "key": "opt", "excludeValue": ""},
            {"type": "slider", "key": "n", "meta": {"excludeValue": 3}, "min": 0, "max": 10}
        ]));
        let n = form.entry("n").unwrap();
        assert_eq!(form.root_value(), json!({"n": 5.0}));
        form.set_value(n, &json!(3)).unwrap();
        assert_eq!(form.root_value(), json!({}));
        let opt = form.entry("opt").unwrap();
        form.set_value(opt, &json!("x")).unwrap();
        assert_eq!(form.root_value(), json!({"opt": "x"}));
    }

    #[test]
    fn panel_set_value_ignores_unknown_keys() {
        let mut form = configured(json!([
            {"type": "panel", "key": "p", "formData": [
                {"type": "textField", "key": "a"},
                {"type": "checkbox", "key": "c"}
            ]}
        ]));
        let p = form.entry("p").unwrap();
        form.set_value(p, &json!({"a": "x", "c": true, "zzz": 1})).unwrap();
        assert_eq!(form.value(p), Some(json!({"a": "x", "c": true})));
        let err = form.set_value(p, &json!(3)).unwrap_err();
        assert!(matches!(err, FormError::InvalidValue { .. }));
    }

    #[test]
    fn single_type_list() {
        let mut form = configured(json!([
            {"type": "list", "key": "l", "entryType": {"layout": {"type": "textField", "key": "e"}}, "value": ["a", "b"]}
        ]));
        let l = form.entry("l").unwrap();
        assert_eq!(form.value(l), Some(json!(["a", "b"])));
        form.set_value(l, &json!(["c"])).unwrap();
        assert_eq!(form.root_value(), json!({"l": ["c"]}));
        assert_eq!(form.dom().children(l).len(), 1);
    }

    #[test]
    fn multitype_list_value_and_meta() {
        let form = configured(json!([
            {"type": "list", "key": "l", "entryTypes": [
                {"label": "Text", "layout": {"type": "textField", "key": "k1", "meta": {"expression": "simple"}}},
                {"label": "Flag", "layout": {"type": "checkbox", "key": "k2"}}
            ], "value": [{"key": "k1", "value": "x + 1"}, {"key": "k2", "value": true}, {"key": "k9", "value": 0}]}
        ]));
        let l = form.entry("l").unwrap();
        assert_eq!(
            form.value(l),
            Some(json!([{"key": "k1", "value": "x + 1"}, {"key": "k2", "value": true}]))
        );
        let meta = serde_json::to_value(form.meta(l).unwrap()).unwrap();
        assert_eq!(
            meta,
            json!({"parentType": "array", "entryMetaArray": [
                {"parentType": "object", "childMeta": {"value": {"expression": "simple"}}},
                {"parentType": "object", "childMeta": {"value": {}}}
            ]})
        );
    }

    #[test]
    fn empty_list_has_no_meta() {
        let form = configured(json!([
            {"type": "list", "key": "l", "entryType": {"layout": {"type": "textField", "meta": {"expression": "code"}}}}
        ]));
        assert_eq!(form.meta(form.entry("l").unwrap()), None);
        assert!(form.root_meta().is_empty());
    }

    #[test]
    fn nested_panel_meta_and_body() {
        let form = configured(json!([
            {"type": "panel", "key": "a", "formData": [
                {"type": "slider", "key": "b", "min": 0, "max": 2, "meta": {"expression": "value"}}
            ]}
        ]));
        let body = form.result_function_body().unwrap();
        assert_eq!(
            body.body,
            "let output = {};\noutput[\"a\"] = {}\noutput[\"a\"][\"b\"] = 1\nreturn output;"
        );
        assert!(!body.has_expression);
    }

    #[test]
    fn per_field_code_text() {
        let mut form = configured(json!([
            {"type": "checkbox", "key": "useExpr"},
            {"type": "textField", "key": "v", "value": "a.b", "meta": {
                "expression": "choice", "expressionChoiceKey": "useExpr",
                "expressionChoiceMap": {"true": "reference", "false": "value"}
            }}
        ]));
        let v = form.entry("v").unwrap();
        assert_eq!(form.expression_kind(v).unwrap(), ExpressionKind::Value);
        assert_eq!(form.code_text(v).unwrap().code.as_deref(), Some("\"a.b\""));
        let flag = form.entry("useExpr").unwrap();
        form.set_value(flag, &json!(true)).unwrap();
        let text = form.code_text(v).unwrap();
        assert_eq!(text.code.as_deref(), Some("a.b"));
        assert!(text.has_expression);
    }

    #[test]
    fn layout_has_no_value() {
        let mut form = configured(json!([
            {"type": "horizontalLayout", "formData": []}
        ]));
        let row = form.dom().children(form.root())[0];
        assert_eq!(form.value(row), None);
        assert!(form.set_value(row, &json!(1)).is_err());
    }
}
