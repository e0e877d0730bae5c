//! Generational node arena shared by every handle of one builder tree.
//!
//! Children are owned through the id lists and slots stored in their parent
//! node. The parent index kept next to each node is a plain back-link used for
//! root climbing; it never keeps a node alive.

use std::{fmt, rc::Rc};

use log::trace;

use mapstyle_core::factory::StyleFactory;

use crate::node::{Node, NodeData, NodeKind, State, Status};

/// Index of a node in an [`Arena`], tagged with the slot generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// An id that no arena ever hands out.
    pub(crate) fn detached() -> Self {
        Self {
            index: u32::MAX,
            generation: 0,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Accessor for a single-child slot of a parent node.
pub(crate) type SlotFn<P> = fn(&mut P) -> &mut Option<NodeId>;

/// Accessor for an ordered child list of a parent node.
pub(crate) type ListFn<P> = fn(&mut P) -> &mut Vec<NodeId>;

struct Entry {
    parent: Option<NodeId>,
    node: Node,
}

struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

pub(crate) struct Arena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    factory: Rc<dyn StyleFactory>,
}

impl Arena {
    pub(crate) fn new(factory: Rc<dyn StyleFactory>) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            factory,
        }
    }

    pub(crate) fn factory(&self) -> Rc<dyn StyleFactory> {
        Rc::clone(&self.factory)
    }

    pub(crate) fn insert(&mut self, parent: Option<NodeId>, node: Node) -> NodeId {
        let entry = Entry { parent, node };
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.entry = Some(entry);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            entry: Some(entry),
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    fn entry(&self, id: NodeId) -> Option<&Entry> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_ref())
    }

    fn entry_mut(&mut self, id: NodeId) -> Option<&mut Entry> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_mut())
    }

    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.entry(id).is_some()
    }

    /// Number of live nodes.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entry(id).and_then(|entry| entry.parent)
    }

    pub(crate) fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.entry(id).map(|entry| entry.node.kind())
    }

    pub(crate) fn status(&self, id: NodeId) -> Option<Status> {
        self.entry(id).map(|entry| entry.node.status())
    }

    /// Climbs parent links from `id` to the node that has no parent.
    pub(crate) fn root(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        self.entry(current)?;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        Some(current)
    }

    pub(crate) fn node<N: NodeData>(&self, id: NodeId) -> Option<&N> {
        self.entry(id).and_then(|entry| N::from_node(&entry.node))
    }

    pub(crate) fn node_mut<N: NodeData>(&mut self, id: NodeId) -> Option<&mut N> {
        self.entry_mut(id)
            .and_then(|entry| N::from_node_mut(&mut entry.node))
    }

    /// Removes a node and everything it owns.
    pub(crate) fn release(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            let Some(slot) = self.slots.get_mut(id.index as usize) else {
                continue;
            };
            if slot.generation != id.generation {
                continue;
            }
            let Some(entry) = slot.entry.take() else {
                continue;
            };
            trace!(kind = entry.node.kind().name(), index = id.index; "Released builder node");
            pending.extend(entry.node.children());
            self.free.push(id.index);
        }
    }

    /// Replaces the node's fields.
    pub(crate) fn set_fields<N: NodeData>(&mut self, id: NodeId, status: Status, fields: N::Fields) {
        if let Some(node) = self.node_mut::<N>(id) {
            *node.state_mut() = State::new(status, fields);
        }
    }

    pub(crate) fn unset(&mut self, id: NodeId) {
        if let Some(entry) = self.entry_mut(id) {
            entry.node.unset();
        }
    }

    /// Populates the node with factory defaults.
    pub(crate) fn reset<N: NodeData>(&mut self, id: NodeId) {
        let factory = self.factory();
        let value = N::default_value(factory.as_ref());
        N::restore(self, id, &value, Status::Default);
    }

    /// Populates the node from the factory defaults when it is unset.
    pub(crate) fn populate<N: NodeData>(&mut self, id: NodeId) {
        if self.status(id) == Some(Status::Unset) {
            self.reset::<N>(id);
        }
    }

    // ===== Building =====

    pub(crate) fn build<N: NodeData>(&self, id: NodeId) -> Option<N::Output> {
        let node = self.node::<N>(id)?;
        let fields = node.state().fields()?;
        Some(node.assemble(fields, self))
    }

    pub(crate) fn build_slot<N: NodeData>(&self, slot: Option<NodeId>) -> Option<N::Output> {
        slot.and_then(|id| self.build::<N>(id))
    }

    /// Builds every populated child of a list; unset children are skipped.
    pub(crate) fn build_list<N: NodeData>(&self, ids: &[NodeId]) -> Vec<N::Output> {
        ids.iter().filter_map(|&id| self.build::<N>(id)).collect()
    }

    // ===== Children =====

    pub(crate) fn slot_id<P: NodeData>(&mut self, parent: NodeId, slot: SlotFn<P>) -> Option<NodeId> {
        self.node_mut::<P>(parent).and_then(|node| *slot(node))
    }

    /// Returns the child of kind `C` in `slot`, creating it unset when the
    /// slot is empty or holds a node of another kind.
    pub(crate) fn ensure_slot<P: NodeData, C: NodeData>(
        &mut self,
        parent: NodeId,
        slot: SlotFn<P>,
    ) -> Option<NodeId> {
        let current = self.slot_id::<P>(parent, slot);
        if let Some(child) = current {
            if self.kind(child) == Some(C::KIND) {
                return Some(child);
            }
            self.release(child);
        }

        let child = self.insert(Some(parent), C::default().into_node());
        match self.node_mut::<P>(parent) {
            Some(node) => {
                *slot(node) = Some(child);
                Some(child)
            }
            None => {
                self.release(child);
                None
            }
        }
    }

    /// Releases whatever child the slot holds and empties it.
    pub(crate) fn clear_slot<P: NodeData>(&mut self, parent: NodeId, slot: SlotFn<P>) {
        let taken = self.node_mut::<P>(parent).and_then(|node| slot(node).take());
        if let Some(child) = taken {
            self.release(child);
        }
    }

    /// Restores a single-child slot: a present value is copied into the child
    /// (creating it on demand) and an absent value unsets an existing child.
    pub(crate) fn restore_slot<P: NodeData, C: NodeData>(
        &mut self,
        parent: NodeId,
        slot: SlotFn<P>,
        value: Option<&C::Output>,
        status: Status,
    ) {
        match value {
            Some(value) => {
                if let Some(child) = self.ensure_slot::<P, C>(parent, slot) {
                    C::restore(self, child, value, status);
                }
            }
            None => {
                if let Some(child) = self.slot_id::<P>(parent, slot) {
                    self.unset(child);
                }
            }
        }
    }

    /// Appends a new child populated from `value`.
    pub(crate) fn push_child<P: NodeData, C: NodeData>(
        &mut self,
        parent: NodeId,
        list: ListFn<P>,
        value: &C::Output,
        status: Status,
    ) -> Option<NodeId> {
        let child = self.insert(Some(parent), C::default().into_node());
        match self.node_mut::<P>(parent) {
            Some(node) => list(node).push(child),
            None => {
                self.release(child);
                return None;
            }
        }
        C::restore(self, child, value, status);
        Some(child)
    }

    /// Releases every child of a list.
    pub(crate) fn clear_list<P: NodeData>(&mut self, parent: NodeId, list: ListFn<P>) {
        let taken = self
            .node_mut::<P>(parent)
            .map(|node| std::mem::take(list(node)))
            .unwrap_or_default();
        for child in taken {
            self.release(child);
        }
    }

    /// Replaces a list's children with new ones populated from `values`.
    pub(crate) fn restore_list<P: NodeData, C: NodeData>(
        &mut self,
        parent: NodeId,
        list: ListFn<P>,
        values: &[C::Output],
        status: Status,
    ) {
        self.clear_list::<P>(parent, list);
        for value in values {
            self.push_child::<P, C>(parent, list, value, status);
        }
    }
}

#[cfg(test)]
mod tests {
    use mapstyle_core::factory::DefaultStyleFactory;

    use super::*;
    use crate::builder::{fill::FillNode, graphic::GraphicNode, stroke::StrokeNode};
    use crate::node::Variant;

    fn arena() -> Arena {
        Arena::new(Rc::new(DefaultStyleFactory::default()))
    }

    #[test]
    fn test_insert_and_release_recycles_slots() {
        let mut arena = arena();
        let first = arena.insert(None, FillNode::default().into_node());
        arena.release(first);
        assert!(!arena.contains(first));

        let second = arena.insert(None, FillNode::default().into_node());
        assert!(arena.contains(second));
        assert!(!arena.contains(first), "stale id must not see the new node");
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_release_removes_descendants() {
        let mut arena = arena();
        let stroke = arena.insert(None, StrokeNode::default().into_node());
        arena.reset::<StrokeNode>(stroke);
        let fill = arena.ensure_slot::<StrokeNode, GraphicNode>(stroke, |node| &mut node.graphic_fill);
        let fill = fill.expect("stroke is live");
        assert_eq!(arena.parent(fill), Some(stroke));
        assert_eq!(arena.root(fill), Some(stroke));

        arena.release(stroke);
        assert!(!arena.contains(fill));
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn test_detached_id_is_never_live() {
        let mut arena = arena();
        arena.insert(None, FillNode::default().into_node());
        assert!(!arena.contains(NodeId::detached()));
        assert_eq!(arena.root(NodeId::detached()), None);
    }

    #[test]
    fn test_populate_only_touches_unset_nodes() {
        let mut arena = arena();
        let fill = arena.insert(None, FillNode::default().into_node());
        assert_eq!(arena.status(fill), Some(Status::Unset));

        arena.populate::<FillNode>(fill);
        assert_eq!(arena.status(fill), Some(Status::Default));
        assert!(arena.build::<FillNode>(fill).is_some());
    }
}
