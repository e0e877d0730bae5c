//! Handle to one node of a shared builder arena.

use std::{cell::RefCell, rc::Rc};

use log::{debug, warn};

use mapstyle_core::factory::StyleFactory;

use crate::{
    arena::{Arena, ListFn, NodeId, SlotFn},
    node::{NodeData, NodeKind, Status},
};

/// A node id together with the arena it lives in.
///
/// Every public builder wraps one cursor. Cloning a cursor yields another
/// handle to the same node.
#[derive(Clone)]
pub(crate) struct Cursor {
    arena: Rc<RefCell<Arena>>,
    id: NodeId,
}

impl Cursor {
    /// Creates a fresh arena whose only node is a default-populated root.
    pub(crate) fn root<N: NodeData>(factory: Rc<dyn StyleFactory>) -> Self {
        let mut arena = Arena::new(factory);
        let id = arena.insert(None, N::default().into_node());
        arena.reset::<N>(id);
        Self {
            arena: Rc::new(RefCell::new(arena)),
            id,
        }
    }

    /// Returns a cursor to another node of the same arena.
    pub(crate) fn at(&self, id: NodeId) -> Self {
        Self {
            arena: Rc::clone(&self.arena),
            id,
        }
    }

    #[cfg(test)]
    pub(crate) fn arena(&self) -> std::cell::Ref<'_, Arena> {
        self.arena.borrow()
    }

    pub(crate) fn factory(&self) -> Rc<dyn StyleFactory> {
        self.arena.borrow().factory()
    }

    pub(crate) fn is_attached(&self) -> bool {
        self.arena.borrow().contains(self.id)
    }

    pub(crate) fn kind(&self) -> Option<NodeKind> {
        self.arena.borrow().kind(self.id)
    }

    /// Detached handles report [`Status::Unset`].
    pub(crate) fn status(&self) -> Status {
        self.arena.borrow().status(self.id).unwrap_or(Status::Unset)
    }

    pub(crate) fn is_root(&self) -> bool {
        let arena = self.arena.borrow();
        arena.contains(self.id) && arena.parent(self.id).is_none()
    }

    pub(crate) fn root_id(&self) -> Option<NodeId> {
        self.arena.borrow().root(self.id)
    }

    /// Builds the node; a root is reset to its defaults afterwards.
    pub(crate) fn build<N: NodeData>(&self) -> Option<N::Output> {
        let built = self.arena.borrow().build::<N>(self.id)?;
        if self.is_root() {
            debug!(kind = N::KIND.name(); "Recycling root builder");
            self.arena.borrow_mut().reset::<N>(self.id);
        }
        Some(built)
    }

    pub(crate) fn reset<N: NodeData>(&self) {
        if self.check_attached() {
            self.arena.borrow_mut().reset::<N>(self.id);
        }
    }

    pub(crate) fn reset_from<N: NodeData>(&self, value: Option<&N::Output>) {
        if !self.check_attached() {
            return;
        }
        let mut arena = self.arena.borrow_mut();
        match value {
            Some(value) => N::restore(&mut arena, self.id, value, Status::Explicit),
            None => arena.unset(self.id),
        }
    }

    pub(crate) fn unset(&self) {
        if self.check_attached() {
            self.arena.borrow_mut().unset(self.id);
        }
    }

    /// Applies a caller change to the node's fields.
    ///
    /// An unset node is populated from the factory defaults first; the node
    /// is [`Status::Explicit`] afterwards.
    pub(crate) fn update<N: NodeData>(&self, change: impl FnOnce(&mut N::Fields)) {
        if !self.check_attached() {
            return;
        }
        let mut arena = self.arena.borrow_mut();
        arena.populate::<N>(self.id);
        if let Some(fields) = arena
            .node_mut::<N>(self.id)
            .and_then(|node| node.state_mut().explicit_mut())
        {
            change(fields);
        }
    }

    /// Marks the node explicit without changing a field.
    pub(crate) fn touch<N: NodeData>(&self) {
        self.update::<N>(|_| {});
    }

    /// Touches the node and returns its child in `slot`, creating the child
    /// unset on first access.
    pub(crate) fn slot<P: NodeData, C: NodeData>(&self, slot: SlotFn<P>) -> Cursor {
        self.touch::<P>();
        let child = self
            .arena
            .borrow_mut()
            .ensure_slot::<P, C>(self.id, slot)
            .unwrap_or_else(NodeId::detached);
        self.at(child)
    }

    /// Touches the node and appends a new default-populated child to `list`.
    pub(crate) fn append<P: NodeData, C: NodeData>(&self, list: ListFn<P>) -> Cursor {
        self.touch::<P>();
        let mut arena = self.arena.borrow_mut();
        let factory = arena.factory();
        let value = C::default_value(factory.as_ref());
        let child = arena
            .push_child::<P, C>(self.id, list, &value, Status::Default)
            .unwrap_or_else(NodeId::detached);
        drop(arena);
        self.at(child)
    }

    /// Ids held in one of the node's child lists.
    pub(crate) fn list_ids<P: NodeData>(&self, list: ListFn<P>) -> Vec<NodeId> {
        self.arena
            .borrow_mut()
            .node_mut::<P>(self.id)
            .map(|node| list(node).clone())
            .unwrap_or_default()
    }

    fn check_attached(&self) -> bool {
        let attached = self.is_attached();
        if !attached {
            warn!(node = self.id.to_string(); "Ignoring change through a detached builder");
        }
        attached
    }
}

#[cfg(test)]
mod tests {
    use mapstyle_core::factory::DefaultStyleFactory;

    use super::*;
    use crate::builder::{fill::FillNode, graphic::GraphicNode};

    fn fill_root() -> Cursor {
        Cursor::root::<FillNode>(Rc::new(DefaultStyleFactory::default()))
    }

    #[test]
    fn test_root_starts_default() {
        let cursor = fill_root();
        assert!(cursor.is_root());
        assert_eq!(cursor.status(), Status::Default);
        assert_eq!(cursor.kind(), Some(NodeKind::Fill));
    }

    #[test]
    fn test_slot_returns_same_child_and_touches_parent() {
        let cursor = fill_root();
        let first = cursor.slot::<FillNode, GraphicNode>(|node| &mut node.graphic_fill);
        let second = cursor.slot::<FillNode, GraphicNode>(|node| &mut node.graphic_fill);

        assert_eq!(first.id, second.id);
        assert_eq!(first.status(), Status::Unset);
        assert!(!first.is_root());
        assert_eq!(cursor.status(), Status::Explicit);
    }

    #[test]
    fn test_detached_cursor_ignores_changes() {
        let cursor = fill_root();
        let detached = cursor.at(NodeId::detached());
        detached.touch::<FillNode>();
        assert_eq!(detached.status(), Status::Unset);
        assert!(detached.build::<FillNode>().is_none());
        assert_eq!(cursor.arena().len(), 1);
    }
}
