//! The element arena: panels, lists, layout wrappers and fields.

use std::iter;

use slotmap::{SecondaryMap, SlotMap};

use super::node::{NodeData, NodeId, NodeKind};

/// Every node of one form, held in a slotmap arena.
///
/// Child order is layout order and therefore value order for lists. Layout
/// wrappers (`horizontalLayout`, `showHideLayout`) are stored as ordinary
/// nodes; value aggregation looks through them via [`Dom::element_children`].
pub struct Dom {
    arena: SlotMap<NodeId, NodeData>,
    kids: SecondaryMap<NodeId, Vec<NodeId>>,
    owner: SecondaryMap<NodeId, NodeId>,
    root: Option<NodeId>,
}

impl Dom {
    pub fn new() -> Self {
        Self {
            arena: SlotMap::with_key(),
            kids: SecondaryMap::new(),
            owner: SecondaryMap::new(),
            root: None,
        }
    }

    /// Add a detached node. The first detached node is the form root.
    pub fn insert(&mut self, data: NodeData) -> NodeId {
        let id = self.alloc(data);
        self.root.get_or_insert(id);
        id
    }

    /// Append `data` after the existing children of `parent`.
    ///
    /// A dead `parent` leaves the new node detached.
    pub fn insert_child(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        debug_assert!(self.arena.contains_key(parent), "insert under a dead node");
        let id = self.alloc(data);
        if let Some(list) = self.kids.get_mut(parent) {
            list.push(id);
            self.owner.insert(id, parent);
        }
        id
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = self.arena.insert(data);
        self.kids.insert(id, Vec::new());
        id
    }

    /// Drop `id` together with everything built beneath it, returning its
    /// data.
    pub fn remove(&mut self, id: NodeId) -> Option<NodeData> {
        let doomed = self.walk_depth_first(id);
        if doomed.is_empty() {
            return None;
        }
        if let Some(parent) = self.owner.get(id).copied() {
            if let Some(list) = self.kids.get_mut(parent) {
                list.retain(|&k| k != id);
            }
        }
        if self.root == Some(id) {
            self.root = None;
        }
        // Children first so the subtree root is the last one out.
        let mut data = None;
        for node in doomed.into_iter().rev() {
            self.kids.remove(node);
            self.owner.remove(node);
            data = self.arena.remove(node);
        }
        data
    }

    /// Exchange two entries of `parent`; used for list reordering.
    pub fn swap_children(&mut self, parent: NodeId, a: usize, b: usize) -> bool {
        let Some(list) = self.kids.get_mut(parent) else {
            return false;
        };
        if a.max(b) >= list.len() {
            return false;
        }
        list.swap(a, b);
        true
    }

    /// Position of `child` under its parent.
    pub fn child_index(&self, child: NodeId) -> Option<usize> {
        let parent = self.parent(child)?;
        self.children(parent).iter().position(|&k| k == child)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.owner.get(id).copied()
    }

    /// Raw children, layout wrappers included.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.kids.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// The value-bearing children of a container, in layout order.
    ///
    /// Layout wrappers are looked through: their elements are returned in
    /// place of the wrapper itself.
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        let mut found = Vec::new();
        self.collect_elements(id, &mut found);
        found
    }

    fn collect_elements(&self, id: NodeId, found: &mut Vec<NodeId>) {
        for &child in self.children(id) {
            match self.arena.get(child) {
                Some(data) if data.is_element() => found.push(child),
                Some(_) => self.collect_elements(child, found),
                None => {}
            }
        }
    }

    /// The container that aggregates `id`'s value: the nearest ancestor that
    /// is not a layout wrapper.
    pub fn enclosing_container(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id)
            .into_iter()
            .find(|&a| self.arena.get(a).is_some_and(NodeData::is_element))
    }

    /// The nearest ancestor panel: the scope used to resolve local keys.
    pub fn enclosing_panel(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id)
            .into_iter()
            .find(|&a| self.arena.get(a).is_some_and(|d| matches!(d.kind, NodeKind::Panel)))
    }

    /// Parent first, root last.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        iter::successors(self.parent(id), |&p| self.parent(p)).collect()
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.arena.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.arena.get_mut(id)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains_key(id)
    }

    /// `start` and its descendants in layout order (pre-order). Empty when
    /// `start` is dead.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        if self.contains(start) {
            self.visit(start, &mut order);
        }
        order
    }

    fn visit(&self, id: NodeId, order: &mut Vec<NodeId>) {
        order.push(id);
        for &child in self.children(id) {
            self.visit(child, order);
        }
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::node::LayoutStyle;

    fn panel(key: &str) -> NodeData {
        NodeData::new("panel", NodeKind::Panel).with_key(key)
    }

    fn row() -> NodeData {
        NodeData::new("horizontalLayout", NodeKind::Layout(LayoutStyle::Horizontal))
    }

    /// ```text
    ///        form
    ///      /   |   \
    ///  billing row  shipping
    ///    / \    |
    ///  iban bic  notes
    /// ```
    struct Fixture {
        dom: Dom,
        form: NodeId,
        billing: NodeId,
        row: NodeId,
        shipping: NodeId,
        iban: NodeId,
        bic: NodeId,
        notes: NodeId,
    }

    fn fixture() -> Fixture {
        let mut dom = Dom::new();
        let form = dom.insert(NodeData::new("panel", NodeKind::Panel));
        let billing = dom.insert_child(form, panel("billing"));
        let row = dom.insert_child(form, row());
        let shipping = dom.insert_child(form, panel("shipping"));
        let iban = dom.insert_child(billing, panel("iban"));
        let bic = dom.insert_child(billing, panel("bic"));
        let notes = dom.insert_child(row, panel("notes"));
        Fixture { dom, form, billing, row, shipping, iban, bic, notes }
    }

    #[test]
    fn only_the_first_detached_node_is_root() {
        let mut dom = Dom::new();
        let first = dom.insert(panel("x"));
        dom.insert(panel("y"));
        assert_eq!(dom.root(), Some(first));
    }

    #[test]
    fn children_keep_layout_order() {
        let f = fixture();
        assert_eq!(f.dom.parent(f.billing), Some(f.form));
        assert_eq!(f.dom.parent(f.form), None);
        assert_eq!(f.dom.children(f.form), &[f.billing, f.row, f.shipping]);
        assert_eq!(f.dom.children(f.billing), &[f.iban, f.bic]);
        assert!(f.dom.children(f.iban).is_empty());
    }

    #[test]
    fn layout_rows_are_transparent_to_aggregation() {
        let f = fixture();
        assert_eq!(f.dom.element_children(f.form), vec![f.billing, f.notes, f.shipping]);
        assert_eq!(f.dom.enclosing_container(f.notes), Some(f.form));
        assert_eq!(f.dom.enclosing_container(f.iban), Some(f.billing));
        assert_eq!(f.dom.enclosing_container(f.form), None);
        assert_eq!(f.dom.enclosing_panel(f.bic), Some(f.billing));
    }

    #[test]
    fn ancestors_run_up_to_the_form() {
        let f = fixture();
        assert_eq!(f.dom.ancestors(f.notes), vec![f.row, f.form]);
        assert!(f.dom.ancestors(f.form).is_empty());
    }

    #[test]
    fn removing_a_panel_drops_its_fields() {
        let mut f = fixture();
        let removed = f.dom.remove(f.billing).expect("billing exists");
        assert_eq!(removed.key.as_deref(), Some("billing"));
        assert!(!f.dom.contains(f.iban));
        assert!(!f.dom.contains(f.bic));
        assert_eq!(f.dom.children(f.form), &[f.row, f.shipping]);
        assert_eq!(f.dom.len(), 4);
    }

    #[test]
    fn removing_the_form_clears_everything() {
        let mut f = fixture();
        f.dom.remove(f.form);
        assert!(f.dom.is_empty());
        assert_eq!(f.dom.root(), None);
        assert!(f.dom.remove(f.form).is_none());
        assert!(f.dom.walk_depth_first(f.form).is_empty());
    }

    #[test]
    fn swapping_entries_reorders_siblings() {
        let mut f = fixture();
        assert!(f.dom.swap_children(f.form, 0, 2));
        assert_eq!(f.dom.children(f.form), &[f.shipping, f.row, f.billing]);
        assert_eq!(f.dom.child_index(f.billing), Some(2));
        assert!(!f.dom.swap_children(f.form, 0, 3));
        assert_eq!(f.dom.child_index(f.form), None);
    }

    #[test]
    fn walk_is_pre_order() {
        let f = fixture();
        assert_eq!(
            f.dom.walk_depth_first(f.form),
            vec![f.form, f.billing, f.iban, f.bic, f.row, f.notes, f.shipping]
        );
        assert_eq!(f.dom.walk_depth_first(f.billing), vec![f.billing, f.iban, f.bic]);
    }
}
