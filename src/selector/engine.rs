//! Selector wiring and evaluation.
//!
//! A binding links one dependent element to the parent elements it watches.
//! It is evaluated once when attached and again on every committed change of
//! any of its parents. Each evaluation recomputes the full predicate and
//! applies the action; the last binding to run wins when several target the
//! same element.

use serde_json::Value;
use slotmap::new_key_type;

use super::predicate::MatchPredicate;
use super::spec::{ParentRef, SelectorSpec};
use crate::dom::NodeId;
use crate::error::{FormError, Result};
use crate::event::Listener;
use crate::form::Form;
use crate::registry::ActionFn;
use crate::widget::ElementState;

new_key_type! {
    /// Identifies a selector binding within a form.
    pub struct BindingId;
}

/// What a binding does when evaluated.
#[derive(Clone)]
pub enum BindingAction {
    /// Set the dependent's value to the match result.
    Value(MatchPredicate),
    /// Normal on match, `false_state` otherwise.
    State {
        predicate: MatchPredicate,
        false_state: ElementState,
    },
    /// Arbitrary action over the dependent and all parents.
    Custom(ActionFn),
}

impl std::fmt::Debug for BindingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(p) => f.debug_tuple("Value").field(p).finish(),
            Self::State { predicate, false_state } => f
                .debug_struct("State")
                .field("predicate", predicate)
                .field("false_state", false_state)
                .finish(),
            Self::Custom(_) => write!(f, "Custom(<fn>)"),
        }
    }
}

/// A live dependency edge.
#[derive(Debug, Clone)]
pub struct SelectorBinding {
    pub child: NodeId,
    pub parents: Vec<NodeId>,
    pub action: BindingAction,
}

impl Form {
    /// Wire a selector declaration on `child`.
    ///
    /// Parents named by a local key resolve in the child's own panel; paths
    /// resolve from the root form. The binding is evaluated immediately.
    /// Any failure, at resolution or during that first evaluation, is written
    /// as an inline error on `child`; resolution failures are also returned.
    pub fn attach_selector(&mut self, child: NodeId, spec: &SelectorSpec) -> Result<BindingId> {
        let wired = self.resolve_binding(child, spec);
        match wired {
            Ok(binding) => Ok(self.install_binding(binding)),
            Err(err) => {
                self.report_selector_error(child, &err);
                Err(err)
            }
        }
    }

    /// Wire a custom action watching `parents`.
    pub fn attach_custom_selector(
        &mut self,
        child: NodeId,
        parents: &[ParentRef],
        action: impl Fn(&mut Form, NodeId, &[NodeId]) -> Result<()> + 'static,
    ) -> Result<BindingId> {
        let resolved = self.resolve_parents(child, parents);
        match resolved {
            Ok(parents) => Ok(self.install_binding(SelectorBinding {
                child,
                parents,
                action: BindingAction::Custom(std::rc::Rc::new(action)),
            })),
            Err(err) => {
                self.report_selector_error(child, &err);
                Err(err)
            }
        }
    }

    /// Wire every not yet wired selector declaration under `scope`, in tree
    /// order. Failures stay on their element.
    pub fn populate_selectors(&mut self, scope: NodeId) {
        for id in self.dom.walk_depth_first(scope) {
            let Some(raw) = self.dom.get_mut(id).and_then(|d| d.selector.take()) else {
                continue;
            };
            let spec = match SelectorSpec::from_value(&raw) {
                Ok(spec) => spec,
                Err(err) => {
                    let err = FormError::InvalidSelector {
                        child: self.key_label(id),
                        message: err.to_string(),
                    };
                    self.report_selector_error(id, &err);
                    continue;
                }
            };
            // failures are already reported inline
            let _ = self.attach_selector(id, &spec);
        }
    }

    /// Number of live bindings.
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Bindings in which `node` is the dependent.
    pub fn bindings_for(&self, node: NodeId) -> Vec<BindingId> {
        self.bindings
            .iter()
            .filter(|(_, b)| b.child == node)
            .map(|(id, _)| id)
            .collect()
    }

    /// Re-evaluate every binding watching `node`, in registration order.
    pub(crate) fn run_dependents(&mut self, node: NodeId) {
        let Some(dependents) = self.dom.get(node).and_then(|d| d.dependents.clone()) else {
            return;
        };
        for id in dependents {
            let Some(child) = self.bindings.get(id).map(|b| b.child) else {
                continue;
            };
            if !self.dom.contains(child) {
                continue;
            }
            if let Err(err) = self.evaluate_binding(id) {
                self.report_selector_error(child, &err);
            }
        }
    }

    /// Drop bindings whose dependent or any parent no longer exists.
    pub(crate) fn prune_bindings(&mut self) {
        let dom = &self.dom;
        self.bindings
            .retain(|_, b| dom.contains(b.child) && b.parents.iter().all(|&p| dom.contains(p)));
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn resolve_binding(&self, child: NodeId, spec: &SelectorSpec) -> Result<SelectorBinding> {
        let refs = spec.parent_refs().ok_or_else(|| FormError::InvalidSelector {
            child: self.key_label(child),
            message: "parent key(s) not found".into(),
        })?;
        let parents = self.resolve_parents(child, &refs)?;

        let action = if let Some(name) = &spec.action_function {
            let action = self.registry.action(name).ok_or_else(|| FormError::InvalidSelector {
                child: self.key_label(child),
                message: format!("action function not found: {name}"),
            })?;
            BindingAction::Custom(action)
        } else {
            let target = spec.target().ok_or_else(|| FormError::InvalidSelector {
                child: self.key_label(child),
                message: "a selector must contain a parent value or list of values".into(),
            })?;
            // predefined actions only look at the first parent
            let multiselect = self.dom.get(parents[0]).is_some_and(|d| d.is_multiselect());
            let predicate = MatchPredicate::new(target, multiselect);
            match spec.action_or_default().false_state() {
                None => BindingAction::Value(predicate),
                Some(false_state) => BindingAction::State { predicate, false_state },
            }
        };

        Ok(SelectorBinding { child, parents, action })
    }

    fn resolve_parents(&self, child: NodeId, refs: &[ParentRef]) -> Result<Vec<NodeId>> {
        if refs.is_empty() {
            return Err(FormError::InvalidSelector {
                child: self.key_label(child),
                message: "parent key(s) not found".into(),
            });
        }
        refs.iter()
            .map(|r| {
                let found = match r {
                    ParentRef::Local(key) => self
                        .dom
                        .enclosing_panel(child)
                        .and_then(|panel| self.dom.get_entry(panel, key)),
                    ParentRef::Path(keys) => self.dom.get_entry_from_path(self.root(), keys, 0),
                };
                found.ok_or_else(|| FormError::Resolution {
                    child: self.key_label(child),
                    reference: r.to_string(),
                })
            })
            .collect()
    }

    fn install_binding(&mut self, binding: SelectorBinding) -> BindingId {
        let child = binding.child;
        let parents = binding.parents.clone();
        let id = self.bindings.insert(binding);
        tracing::trace!(child = %self.key_label(child), parents = parents.len(), "selector attached");

        for parent in parents {
            let Some(data) = self.dom.get_mut(parent) else {
                continue;
            };
            match &mut data.dependents {
                Some(list) => {
                    if !list.contains(&id) {
                        list.push(id);
                    }
                }
                None => {
                    data.dependents = Some(vec![id]);
                    data.change_listeners.push(Listener::Dependents);
                }
            }
        }

        if let Err(err) = self.evaluate_binding(id) {
            self.report_selector_error(child, &err);
        }
        id
    }

    fn evaluate_binding(&mut self, id: BindingId) -> Result<()> {
        let Some(binding) = self.bindings.get(id).cloned() else {
            return Ok(());
        };
        let SelectorBinding { child, parents, action } = binding;
        match action {
            BindingAction::Value(predicate) => {
                let matched = predicate.matches(self.value(parents[0]).as_ref());
                let target = Value::Bool(matched);
                if self.value(child).as_ref() != Some(&target) {
                    self.set_value(child, &target)?;
                }
            }
            BindingAction::State { predicate, false_state } => {
                let matched = predicate.matches(self.value(parents[0]).as_ref());
                let state = if matched { ElementState::Normal } else { false_state };
                self.set_state(child, state)?;
            }
            BindingAction::Custom(action) => action(self, child, &parents)?,
        }
        Ok(())
    }

    fn report_selector_error(&mut self, child: NodeId, err: &FormError) {
        let message = format!("{}{}", self.config.selector_error_prefix, err);
        tracing::error!(element = %self.key_label(child), error = %err, "selector failed");
        self.set_element_error(child, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ElementRegistry;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn form(layout: Value) -> Form {
        let mut form = Form::new();
        form.configure(&layout);
        form
    }

    fn entry(form: &Form, key: &str) -> NodeId {
        form.entry(key).unwrap()
    }

    #[test]
    fn initial_evaluation_applies_state() {
        let form = form(json!([
            {"type": "checkbox", "key": "show"},
            {"type": "textField", "key": "detail", "selector": {"parentKey": "show", "parentValue": true}}
        ]));
        assert_eq!(form.state(entry(&form, "detail")), Some(ElementState::Inactive));
        assert_eq!(form.binding_count(), 1);
    }

    #[test]
    fn declaration_order_does_not_matter() {
        let form = form(json!([
            {"type": "textField", "key": "detail", "selector": {"parentKey": "show", "parentValue": false, "action": "hidden"}},
            {"type": "checkbox", "key": "show"}
        ]));
        assert_eq!(form.state(entry(&form, "detail")), Some(ElementState::Normal));
    }

    #[test]
    fn value_action_sets_boolean() {
        let mut form = form(json!([
            {"type": "dropdown", "key": "mode", "entries": ["a", "b"]},
            {"type": "checkbox", "key": "isB", "selector": {"parentKey": "mode", "parentValue": "b", "action": "value"}}
        ]));
        let is_b = entry(&form, "isB");
        assert_eq!(form.value(is_b), Some(json!(false)));
        let mode = entry(&form, "mode");
        form.set_value(mode, &json!("b")).unwrap();
        assert_eq!(form.value(is_b), Some(json!(true)));
    }

    #[test]
    fn missing_parent_is_inline_error() {
        let form = form(json!([
            {"type": "textField", "key": "a"},
            {"type": "textField", "key": "b", "selector": {"parentKey": "nope", "parentValue": 1}}
        ]));
        let b = entry(&form, "b");
        let message = form.element_error(b).unwrap();
        assert!(message.starts_with("Error calling selector: "), "{message}");
        assert!(message.contains("nope"));
        assert_eq!(form.binding_count(), 0);
        assert_eq!(form.root_value(), json!({"a": "", "b": ""}));
    }

    #[test]
    fn missing_target_is_invalid_selector() {
        let mut form = form(json!([
            {"type": "textField", "key": "a"},
            {"type": "textField", "key": "b"}
        ]));
        let b = entry(&form, "b");
        let err = form
            .attach_selector(b, &SelectorSpec::watching(ParentRef::local("a")))
            .unwrap_err();
        assert!(matches!(err, FormError::InvalidSelector { .. }));
        assert!(form.element_error(b).is_some());
    }

    #[test]
    fn malformed_selector_object() {
        let form = form(json!([
            {"type": "textField", "key": "a"},
            {"type": "textField", "key": "b", "selector": {"parentKey": 7}}
        ]));
        assert!(form.element_error(entry(&form, "b")).is_some());
    }

    #[test]
    fn named_custom_action() {
        let mut registry = ElementRegistry::with_defaults();
        registry.register_action("copy", |form: &mut Form, child, parents: &[NodeId]| {
            let v = form.value(parents[0]).unwrap_or(Value::Null);
            if form.value(child).as_ref() != Some(&v) {
                form.set_value(child, &v)?;
            }
            Ok(())
        });
        let mut form = Form::with_registry(Rc::new(registry));
        form.configure(&json!([
            {"type": "textField", "key": "src", "value": "x"},
            {"type": "textField", "key": "dst", "selector": {"parentKey": "src", "actionFunction": "copy"}}
        ]));
        assert_eq!(form.root_value(), json!({"src": "x", "dst": "x"}));
        let src = entry(&form, "src");
        form.set_value(src, &json!("y")).unwrap();
        assert_eq!(form.value(entry(&form, "dst")), Some(json!("y")));
    }

    #[test]
    fn unknown_action_function() {
        let form = form(json!([
            {"type": "textField", "key": "a"},
            {"type": "textField", "key": "b", "selector": {"parentKey": "a", "actionFunction": "ghost"}}
        ]));
        let message = form.element_error(entry(&form, "b")).unwrap();
        assert!(message.contains("ghost"));
    }

    #[test]
    fn failing_binding_does_not_stop_siblings() {
        let mut form = form(json!([
            {"type": "checkbox", "key": "p"},
            {"type": "textField", "key": "x"},
            {"type": "textField", "key": "z"}
        ]));
        let (p, x, z) = (entry(&form, "p"), entry(&form, "x"), entry(&form, "z"));
        let calls = Rc::new(RefCell::new(0));
        let seen = calls.clone();
        form.attach_custom_selector(x, &[ParentRef::local("p")], move |_, _, _| {
            *seen.borrow_mut() += 1;
            Err(FormError::Action("boom".into()))
        })
        .unwrap();
        form.attach_selector(z, &SelectorSpec::watching(ParentRef::local("p")).when(json!(true)))
            .unwrap();
        assert_eq!(*calls.borrow(), 1);
        assert!(form.element_error(x).unwrap().contains("boom"));
        assert_eq!(form.state(z), Some(ElementState::Inactive));

        form.set_value(p, &json!(true)).unwrap();
        assert_eq!(*calls.borrow(), 2);
        assert_eq!(form.state(z), Some(ElementState::Normal));
    }

    #[test]
    fn multiple_parents_custom() {
        let mut form = form(json!([
            {"type": "checkbox", "key": "a"},
            {"type": "checkbox", "key": "b"},
            {"type": "textField", "key": "both"}
        ]));
        let both = entry(&form, "both");
        form.attach_custom_selector(
            both,
            &[ParentRef::local("a"), ParentRef::local("b")],
            |form, child, parents| {
                let all = parents.iter().all(|&p| form.value(p) == Some(json!(true)));
                let state = if all { ElementState::Normal } else { ElementState::Disabled };
                form.set_state(child, state)
            },
        )
        .unwrap();
        assert_eq!(form.state(both), Some(ElementState::Disabled));
        let (a, b) = (entry(&form, "a"), entry(&form, "b"));
        form.set_value(a, &json!(true)).unwrap();
        assert_eq!(form.state(both), Some(ElementState::Disabled));
        form.set_value(b, &json!(true)).unwrap();
        assert_eq!(form.state(both), Some(ElementState::Normal));
    }
}
