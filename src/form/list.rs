//! List editing: insert, move and remove entries.
//!
//! Every edit fires a single change on the list, so the list's own listeners
//! and any selector watching it see the new array.

use serde_json::Value;

use super::Form;
use crate::dom::{NodeId, NodeKind};
use crate::error::{FormError, Result};

impl Form {
    /// Entries of a list, in order.
    pub fn list_entries(&self, list: NodeId) -> Vec<NodeId> {
        match self.dom.get(list).map(|d| &d.kind) {
            Some(NodeKind::List(_)) => self.dom.children(list).to_vec(),
            _ => Vec::new(),
        }
    }

    /// Append an entry built from the entry type at `entry_type`, optionally
    /// with an initial value. Its selectors are wired right away.
    pub fn list_insert_entry(&mut self, list: NodeId, entry_type: usize, value: Option<&Value>) -> Result<NodeId> {
        let entry = self.build_list_entry(list, entry_type, value)?;
        self.wire_entry(entry);
        tracing::debug!(list = %self.key_label(list), entry_type, "list entry added");
        self.value_changed(list);
        Ok(entry)
    }

    /// Move an entry one place towards the start. `false` if already first.
    pub fn list_move_up(&mut self, entry: NodeId) -> Result<bool> {
        let (list, index) = self.list_position(entry)?;
        if index == 0 {
            return Ok(false);
        }
        self.dom.swap_children(list, index - 1, index);
        self.value_changed(list);
        Ok(true)
    }

    /// Move an entry one place towards the end. `false` if already last.
    pub fn list_move_down(&mut self, entry: NodeId) -> Result<bool> {
        let (list, index) = self.list_position(entry)?;
        if !self.dom.swap_children(list, index, index + 1) {
            return Ok(false);
        }
        self.value_changed(list);
        Ok(true)
    }

    /// Remove an entry and every binding that involved it.
    pub fn list_remove_entry(&mut self, entry: NodeId) -> Result<()> {
        let (list, _) = self.list_position(entry)?;
        self.dom.remove(entry);
        self.prune_bindings();
        self.value_changed(list);
        Ok(())
    }

    fn list_position(&self, entry: NodeId) -> Result<(NodeId, usize)> {
        let list = self.dom.parent(entry).ok_or(FormError::NodeNotFound)?;
        if !matches!(self.dom.get(list).map(|d| &d.kind), Some(NodeKind::List(_))) {
            return Err(FormError::InvalidValue {
                element: self.key_label(entry),
                message: "not a list entry".into(),
            });
        }
        let index = self.dom.child_index(entry).ok_or(FormError::NodeNotFound)?;
        Ok((list, index))
    }
}
