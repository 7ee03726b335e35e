//! Entry lookup: by key within a container, by key path through nested panels.

use super::node::NodeId;
use super::tree::Dom;

impl Dom {
    /// Find the element child of `container` with the given key.
    ///
    /// Layout wrappers are transparent, so elements inside a horizontal or
    /// show/hide layout are found directly.
    pub fn get_entry(&self, container: NodeId, key: &str) -> Option<NodeId> {
        self.element_children(container)
            .into_iter()
            .find(|&id| self.get(id).and_then(|d| d.key.as_deref()) == Some(key))
    }

    /// Follow `path[start..]` from `container` through nested panels.
    ///
    /// Returns `None` for an empty remainder, a missing key, or an
    /// intermediate segment that is not itself a panel.
    pub fn get_entry_from_path<S: AsRef<str>>(
        &self,
        container: NodeId,
        path: &[S],
        start: usize,
    ) -> Option<NodeId> {
        let key = path.get(start)?;
        let child = self.get_entry(container, key.as_ref())?;
        if start + 1 == path.len() {
            return Some(child);
        }
        if self.get(child)?.is_container() {
            self.get_entry_from_path(child, path, start + 1)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::node::{LayoutStyle, NodeData, NodeId, NodeKind};
    use crate::dom::tree::Dom;
    use crate::widgets::TextField;

    fn field(key: &str) -> NodeData {
        NodeData::new("textField", NodeKind::Field(Box::new(TextField::new()))).with_key(key)
    }

    /// ```text
    /// root
    /// ├── name (field)
    /// ├── section (showHideLayout)
    /// │   └── address (panel)
    /// │       └── street (field)
    /// └── notes (field)
    /// ```
    fn build() -> (Dom, NodeId, NodeId, NodeId, NodeId) {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::new("panel", NodeKind::Panel));
        let name = dom.insert_child(root, field("name"));
        let section = dom.insert_child(
            root,
            NodeData::new(
                "showHideLayout",
                NodeKind::Layout(LayoutStyle::ShowHide { heading: None, closed: false }),
            ),
        );
        let address = dom.insert_child(section, NodeData::new("panel", NodeKind::Panel).with_key("address"));
        let street = dom.insert_child(address, field("street"));
        dom.insert_child(root, field("notes"));
        (dom, root, name, address, street)
    }

    #[test]
    fn get_entry_direct() {
        let (dom, root, name, ..) = build();
        assert_eq!(dom.get_entry(root, "name"), Some(name));
        assert_eq!(dom.get_entry(root, "missing"), None);
    }

    #[test]
    fn get_entry_through_layout() {
        let (dom, root, _name, address, _street) = build();
        assert_eq!(dom.get_entry(root, "address"), Some(address));
    }

    #[test]
    fn get_entry_does_not_descend_into_panels() {
        let (dom, root, ..) = build();
        assert_eq!(dom.get_entry(root, "street"), None);
    }

    #[test]
    fn path_lookup() {
        let (dom, root, _name, address, street) = build();
        assert_eq!(dom.get_entry_from_path(root, &["address", "street"], 0), Some(street));
        assert_eq!(dom.get_entry_from_path(root, &["address"], 0), Some(address));
        assert_eq!(dom.get_entry_from_path(address, &["address", "street"], 1), Some(street));
    }

    #[test]
    fn path_lookup_failures() {
        let (dom, root, ..) = build();
        let empty: [&str; 0] = [];
        assert_eq!(dom.get_entry_from_path(root, &empty, 0), None);
        assert_eq!(dom.get_entry_from_path(root, &["address", "zip"], 0), None);
        assert_eq!(dom.get_entry_from_path(root, &["nope", "street"], 0), None);
        // "name" is a field, not a container
        assert_eq!(dom.get_entry_from_path(root, &["name", "street"], 0), None);
    }
}
