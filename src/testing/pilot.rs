//! Pilot: programmatic interaction with a headless form.
//!
//! The `Pilot` wraps a [`Form`] and simulates what a user does with it:
//! typing into text fields (input events per keystroke), committing a value
//! (a change event), toggling checkboxes, picking choices, editing lists and
//! pressing submit. Elements are addressed by key path from the root.

use serde_json::Value;

use crate::dom::NodeId;
use crate::error::{FormError, Result};
use crate::expression::FunctionBody;
use crate::form::Form;
use crate::widget::{ElementState, Widget};
use crate::widgets::{Checkbox, CheckboxGroup, Dropdown, RadioGroup, Slider, TextField, Textarea};

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless form driver for testing.
///
/// Every interaction is refused (returns `Ok(false)`) when the element or an
/// enclosing element is not in the `Normal` state, or its widget cannot take
/// focus, the way a disabled or hidden widget ignores the user.
///
/// # Examples
///
/// ```ignore
/// use formpanel::testing::Pilot;
/// use serde_json::json;
///
/// let mut pilot = Pilot::from_layout(&json!([{"type": "textField", "key": "name"}]));
/// pilot.type_text(&["name"], "ann")?;
/// pilot.commit(&["name"])?;
/// assert_eq!(pilot.value(), json!({"name": "ann"}));
/// ```
pub struct Pilot {
    form: Form,
}

impl Pilot {
    /// Drive an existing form.
    pub fn new(form: Form) -> Self {
        Self { form }
    }

    /// Configure a fresh form from a layout description.
    pub fn from_layout(layout: &Value) -> Self {
        let mut form = Form::new();
        form.configure(layout);
        Self { form }
    }

    // ── Lookup ───────────────────────────────────────────────────────

    /// Resolve a key path from the root.
    pub fn node(&self, path: &[&str]) -> Result<NodeId> {
        self.form.entry_from_path(path).ok_or(FormError::NodeNotFound)
    }

    fn interactive(&self, path: &[&str]) -> Result<Option<NodeId>> {
        let node = self.node(path)?;
        let dom = self.form.dom();
        let ready = std::iter::once(node)
            .chain(dom.ancestors(node))
            .all(|n| self.form.state(n) == Some(ElementState::Normal))
            && self.form.node(node).and_then(|d| d.widget()).is_some_and(|w| w.can_focus());
        Ok(ready.then_some(node))
    }

    fn widget_mut<W: Widget + 'static>(&mut self, node: NodeId) -> Result<&mut W> {
        self.form
            .node_mut(node)
            .and_then(|d| d.widget_mut())
            .and_then(|w| w.as_any_mut().downcast_mut::<W>())
            .ok_or(FormError::NodeNotFound)
    }

    fn editor(&mut self, node: NodeId) -> Result<&mut TextField> {
        let is_area = self
            .form
            .node(node)
            .is_some_and(|d| d.widget_as::<Textarea>().is_some());
        if is_area {
            Ok(self.widget_mut::<Textarea>(node)?.editor())
        } else {
            self.widget_mut::<TextField>(node)
        }
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Type `text` at the end of a text field, one input event per
    /// character. No change event fires until [`commit`](Self::commit).
    pub fn type_text(&mut self, path: &[&str], text: &str) -> Result<bool> {
        let Some(node) = self.interactive(path)? else {
            return Ok(false);
        };
        self.editor(node)?.caret_to_end();
        for ch in text.chars() {
            self.editor(node)?.type_char(ch);
            self.form.input_done(node);
        }
        Ok(true)
    }

    /// Delete `count` characters before the cursor, one input event each.
    pub fn backspace(&mut self, path: &[&str], count: usize) -> Result<bool> {
        let Some(node) = self.interactive(path)? else {
            return Ok(false);
        };
        for _ in 0..count {
            self.editor(node)?.backspace();
            self.form.input_done(node);
        }
        Ok(true)
    }

    /// Commit the element's current value (focus leaves the field).
    pub fn commit(&mut self, path: &[&str]) -> Result<()> {
        let node = self.node(path)?;
        self.form.value_changed(node);
        Ok(())
    }

    /// Set a value programmatically, as a configurator would.
    pub fn set(&mut self, path: &[&str], value: &Value) -> Result<()> {
        let node = self.node(path)?;
        self.form.set_value(node, value)
    }

    /// Click a checkbox.
    pub fn toggle(&mut self, path: &[&str]) -> Result<bool> {
        let Some(node) = self.interactive(path)? else {
            return Ok(false);
        };
        self.widget_mut::<Checkbox>(node)?.toggle();
        self.form.value_changed(node);
        Ok(true)
    }

    /// Click one box of a checkbox group.
    pub fn toggle_entry(&mut self, path: &[&str], index: usize) -> Result<bool> {
        let Some(node) = self.interactive(path)? else {
            return Ok(false);
        };
        self.widget_mut::<CheckboxGroup>(node)?.toggle(index);
        self.form.value_changed(node);
        Ok(true)
    }

    /// Pick an entry of a dropdown or radio group.
    pub fn select(&mut self, path: &[&str], index: usize) -> Result<bool> {
        let Some(node) = self.interactive(path)? else {
            return Ok(false);
        };
        let is_radio = self
            .form
            .node(node)
            .is_some_and(|d| d.widget_as::<RadioGroup>().is_some());
        if is_radio {
            self.widget_mut::<RadioGroup>(node)?.select(index);
        } else {
            self.widget_mut::<Dropdown>(node)?.select(index);
        }
        self.form.value_changed(node);
        Ok(true)
    }

    /// Move a slider by `steps`, then commit.
    pub fn slide(&mut self, path: &[&str], steps: i32) -> Result<bool> {
        let Some(node) = self.interactive(path)? else {
            return Ok(false);
        };
        self.widget_mut::<Slider>(node)?.nudge(steps);
        self.form.value_changed(node);
        Ok(true)
    }

    // ── Lists ────────────────────────────────────────────────────────

    /// Press a list's add button for the entry type at `entry_type`.
    pub fn add_list_entry(&mut self, path: &[&str], entry_type: usize) -> Result<NodeId> {
        let list = self.node(path)?;
        self.form.list_insert_entry(list, entry_type, None)
    }

    /// Entry `index` of a list.
    pub fn list_entry(&self, path: &[&str], index: usize) -> Result<NodeId> {
        let list = self.node(path)?;
        self.form
            .list_entries(list)
            .get(index)
            .copied()
            .ok_or(FormError::NodeNotFound)
    }

    pub fn move_list_entry_up(&mut self, path: &[&str], index: usize) -> Result<bool> {
        let entry = self.list_entry(path, index)?;
        self.form.list_move_up(entry)
    }

    pub fn move_list_entry_down(&mut self, path: &[&str], index: usize) -> Result<bool> {
        let entry = self.list_entry(path, index)?;
        self.form.list_move_down(entry)
    }

    pub fn remove_list_entry(&mut self, path: &[&str], index: usize) -> Result<()> {
        let entry = self.list_entry(path, index)?;
        self.form.list_remove_entry(entry)
    }

    // ── Submit ───────────────────────────────────────────────────────

    pub fn press_submit(&mut self, node: NodeId) -> Result<bool> {
        self.form.press_submit(node)
    }

    pub fn press_cancel(&mut self, node: NodeId) -> Result<bool> {
        self.form.press_cancel(node)
    }

    // ── Query ────────────────────────────────────────────────────────

    /// The form's current value.
    pub fn value(&self) -> Value {
        self.form.root_value()
    }

    /// The result function body for the current value.
    pub fn function_body(&self) -> Result<FunctionBody> {
        self.form.result_function_body()
    }

    /// State of the element at `path`.
    pub fn state(&self, path: &[&str]) -> Result<ElementState> {
        let node = self.node(path)?;
        self.form.state(node).ok_or(FormError::NodeNotFound)
    }

    /// Inline error of the element at `path`.
    pub fn error(&self, path: &[&str]) -> Result<Option<&str>> {
        let node = self.node(path)?;
        Ok(self.form.element_error(node))
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    pub fn into_form(self) -> Form {
        self.form
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn pilot() -> Pilot {
        Pilot::from_layout(&json!([
            {"type": "textField", "key": "name"},
            {"type": "textarea", "key": "notes"},
            {"type": "checkbox", "key": "more"},
            {"type": "panel", "key": "extra", "selector": {"parentKey": "more", "parentValue": true}, "formData": [
                {"type": "dropdown", "key": "size", "entries": ["s", "m", "l"]},
                {"type": "radioButtonGroup", "key": "color", "entries": [["Red", "r"], ["Blue", "b"]]},
                {"type": "checkboxGroup", "key": "tags", "entries": ["x", "y"]}
            ]},
            {"type": "slider", "key": "n", "min": 0, "max": 10, "step": 1},
            {"type": "list", "key": "l", "entryType": {"layout": {"type": "textField"}}}
        ]))
    }

    // ── Typing ───────────────────────────────────────────────────────

    #[test]
    fn typing_fires_input_not_change() {
        let mut pilot = pilot();
        let name = pilot.node(&["name"]).unwrap();
        let events = Rc::new(RefCell::new(Vec::new()));
        let (i, c) = (events.clone(), events.clone());
        pilot.form_mut().add_on_input(name, move |_, _, v| i.borrow_mut().push(format!("input {}", v.unwrap())));
        pilot.form_mut().add_on_change(name, move |_, _, v| c.borrow_mut().push(format!("change {}", v.unwrap())));

        assert!(pilot.type_text(&["name"], "ab").unwrap());
        assert_eq!(*events.borrow(), vec!["input \"a\"", "input \"ab\""]);
        pilot.commit(&["name"]).unwrap();
        assert_eq!(events.borrow().last().unwrap(), "change \"ab\"");
    }

    #[test]
    fn backspace_edits_text() {
        let mut pilot = pilot();
        pilot.type_text(&["notes"], "hello").unwrap();
        pilot.backspace(&["notes"], 2).unwrap();
        assert_eq!(pilot.value()["notes"], json!("hel"));
    }

    #[test]
    fn inactive_element_ignores_input() {
        let mut pilot = pilot();
        assert_eq!(pilot.state(&["extra"]).unwrap(), ElementState::Inactive);
        assert!(!pilot.select(&["extra", "size"], 1).unwrap());
        pilot.form_mut().set_disabled(true);
        assert!(!pilot.type_text(&["name"], "x").unwrap());
        assert_eq!(pilot.value()["name"], json!(""));
    }

    // ── Choices ──────────────────────────────────────────────────────

    #[test]
    fn toggle_reveals_panel() {
        let mut pilot = pilot();
        assert!(pilot.value().get("extra").is_none());
        pilot.toggle(&["more"]).unwrap();
        assert_eq!(pilot.state(&["extra"]).unwrap(), ElementState::Normal);
        pilot.select(&["extra", "color"], 1).unwrap();
        pilot.toggle_entry(&["extra", "tags"], 1).unwrap();
        assert_eq!(pilot.value()["extra"], json!({"size": "s", "color": "b", "tags": ["y"]}));
    }

    #[test]
    fn slide_commits() {
        let mut pilot = pilot();
        pilot.slide(&["n"], -2).unwrap();
        assert_eq!(pilot.value()["n"], json!(3.0));
    }

    // ── Lists ────────────────────────────────────────────────────────

    #[test]
    fn list_editing() {
        let mut pilot = pilot();
        pilot.add_list_entry(&["l"], 0).unwrap();
        pilot.add_list_entry(&["l"], 0).unwrap();
        let second = pilot.list_entry(&["l"], 1).unwrap();
        pilot.form_mut().set_value(second, &json!("two")).unwrap();
        assert!(pilot.move_list_entry_up(&["l"], 1).unwrap());
        assert_eq!(pilot.value()["l"], json!(["two", ""]));
        assert!(!pilot.move_list_entry_down(&["l"], 1).unwrap());
        pilot.remove_list_entry(&["l"], 0).unwrap();
        assert_eq!(pilot.value()["l"], json!([""]));
        assert!(pilot.list_entry(&["l"], 1).is_err());
    }

    // ── Query ────────────────────────────────────────────────────────

    #[test]
    fn unknown_path() {
        let mut pilot = pilot();
        assert!(matches!(pilot.node(&["nope"]), Err(FormError::NodeNotFound)));
        assert!(pilot.set(&["name", "deeper"], &json!(1)).is_err());
    }

    #[test]
    fn function_body_of_plain_form() {
        let pilot = Pilot::from_layout(&json!([{"type": "checkbox", "key": "c"}]));
        let body = pilot.function_body().unwrap();
        assert_eq!(body.body, "let output = {};\noutput[\"c\"] = false\nreturn output;");
        assert!(!body.has_expression);
    }

    #[test]
    fn into_form_hands_back() {
        let pilot = pilot();
        let form = pilot.into_form();
        assert!(form.entry("name").is_some());
    }
}
