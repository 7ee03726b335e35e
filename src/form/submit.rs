//! Submit and cancel handling.

use serde_json::Value;

use super::Form;
use crate::dom::{NodeData, NodeId, NodeKind};
use crate::error::{FormError, Result};
use crate::widgets::submit::{DEFAULT_CANCEL_LABEL, DEFAULT_SUBMIT_LABEL};
use crate::widgets::Submit;

/// Called with the form value when submit is pressed.
pub type SubmitCallback = Box<dyn FnMut(&mut Form, &Value)>;
/// Called when cancel is pressed.
pub type CancelCallback = Box<dyn FnMut(&mut Form)>;

/// Handlers behind a submit element. A button exists only for a handler
/// that is set.
#[derive(Default)]
pub struct SubmitHandlers {
    on_submit: Option<SubmitCallback>,
    on_cancel: Option<CancelCallback>,
    submit_label: Option<String>,
    cancel_label: Option<String>,
}

impl SubmitHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_submit(mut self, f: impl FnMut(&mut Form, &Value) + 'static) -> Self {
        self.on_submit = Some(Box::new(f));
        self
    }

    pub fn on_cancel(mut self, f: impl FnMut(&mut Form) + 'static) -> Self {
        self.on_cancel = Some(Box::new(f));
        self
    }

    pub fn with_submit_label(mut self, label: impl Into<String>) -> Self {
        self.submit_label = Some(label.into());
        self
    }

    pub fn with_cancel_label(mut self, label: impl Into<String>) -> Self {
        self.cancel_label = Some(label.into());
        self
    }

    fn widget(&self) -> Submit {
        let button = |present: bool, label: &Option<String>, default: &str| {
            present.then(|| label.clone().unwrap_or_else(|| default.to_string()))
        };
        Submit::new(
            button(self.on_submit.is_some(), &self.submit_label, DEFAULT_SUBMIT_LABEL),
            button(self.on_cancel.is_some(), &self.cancel_label, DEFAULT_CANCEL_LABEL),
        )
    }
}

impl std::fmt::Debug for SubmitHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmitHandlers")
            .field("on_submit", &self.on_submit.is_some())
            .field("on_cancel", &self.on_cancel.is_some())
            .field("submit_label", &self.submit_label)
            .field("cancel_label", &self.cancel_label)
            .finish()
    }
}

impl Form {
    /// Append a submit element to the root panel, driven by `handlers`.
    pub fn add_submit(&mut self, handlers: SubmitHandlers) -> NodeId {
        let widget = handlers.widget();
        let root = self.root();
        let id = self
            .dom
            .insert_child(root, NodeData::new(Submit::TYPE_NAME, NodeKind::Field(Box::new(widget))));
        self.submit_handlers.insert(id, handlers);
        id
    }

    /// Attach handlers to a submit element declared in the layout.
    pub fn set_submit_handlers(&mut self, node: NodeId, handlers: SubmitHandlers) -> Result<()> {
        self.submit_widget(node)?;
        self.submit_handlers.insert(node, handlers);
        Ok(())
    }

    /// Press the submit button. Returns whether a handler ran.
    pub fn press_submit(&mut self, node: NodeId) -> Result<bool> {
        if !self.submit_widget(node)?.submit_enabled() {
            return Ok(false);
        }
        let Some(mut handler) = self.submit_handlers.get_mut(node).and_then(|h| h.on_submit.take()) else {
            return Ok(false);
        };
        let value = self.root_value();
        tracing::debug!("submit pressed");
        handler(self, &value);
        if let Some(handlers) = self.submit_handlers.get_mut(node) {
            handlers.on_submit.get_or_insert(handler);
        }
        Ok(true)
    }

    /// Press the cancel button. Returns whether a handler ran.
    pub fn press_cancel(&mut self, node: NodeId) -> Result<bool> {
        if !self.submit_widget(node)?.cancel_enabled() {
            return Ok(false);
        }
        let Some(mut handler) = self.submit_handlers.get_mut(node).and_then(|h| h.on_cancel.take()) else {
            return Ok(false);
        };
        tracing::debug!("cancel pressed");
        handler(self);
        if let Some(handlers) = self.submit_handlers.get_mut(node) {
            handlers.on_cancel.get_or_insert(handler);
        }
        Ok(true)
    }

    fn submit_widget(&self, node: NodeId) -> Result<&Submit> {
        let data = self.dom.get(node).ok_or(FormError::NodeNotFound)?;
        data.widget_as::<Submit>().ok_or_else(|| FormError::InvalidValue {
            element: self.key_label(node),
            message: "not a submit element".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn add_submit_runs_handler_with_value() {
        let mut form = Form::new();
        form.configure(&json!([{"type": "textField", "key": "name", "value": "ann"}]));
        let got = Rc::new(RefCell::new(None));
        let sink = got.clone();
        let submit = form.add_submit(SubmitHandlers::new().on_submit(move |_, v| *sink.borrow_mut() = Some(v.clone())));
        assert!(form.press_submit(submit).unwrap());
        assert_eq!(*got.borrow(), Some(json!({"name": "ann"})));
        assert!(!form.press_cancel(submit).unwrap());

        let widget = form.node(submit).unwrap().widget_as::<Submit>().unwrap();
        assert_eq!(widget.submit_label(), Some(DEFAULT_SUBMIT_LABEL));
        assert_eq!(widget.cancel_label(), None);
    }

    #[test]
    fn handler_survives_repeated_presses() {
        let mut form = Form::new();
        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        let submit = form.add_submit(
            SubmitHandlers::new()
                .on_cancel(move |_| *c.borrow_mut() += 1)
                .with_cancel_label("Close"),
        );
        form.press_cancel(submit).unwrap();
        form.press_cancel(submit).unwrap();
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn disabled_form_blocks_submit() {
        let mut form = Form::new();
        let submit = form.add_submit(SubmitHandlers::new().on_submit(|_, _| {}));
        form.set_disabled(true);
        assert!(!form.press_submit(submit).unwrap());
        form.set_disabled(false);
        assert!(form.press_submit(submit).unwrap());
    }

    #[test]
    fn layout_declared_submit() {
        let mut form = Form::new();
        form.configure(&json!([{"type": "submit", "key": "go", "submitLabel": "Save"}]));
        let go = form.entry("go").unwrap();
        assert!(!form.press_submit(go).unwrap());
        form.set_submit_handlers(go, SubmitHandlers::new().on_submit(|_, _| {})).unwrap();
        assert!(form.press_submit(go).unwrap());
        let root = form.root();
        assert!(form.set_submit_handlers(root, SubmitHandlers::new()).is_err());
    }
}
