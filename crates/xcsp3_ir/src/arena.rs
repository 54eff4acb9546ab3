//! Flat, index-addressed storage for expression trees.
//!
//! Every node is pushed onto one `Vec<ExprKind>` and referenced by its
//! `u32` offset rather than through a `Box`/`Rc` pointer. This follows
//! the arena style the teacher workspace uses for its own AST
//! (`ori_ir::arena::ExprArena`): no node is ever freed individually, the
//! whole arena is dropped at once when the owning instance goes away,
//! and structurally identical subtrees can be shared by reusing an
//! existing index instead of allocating a duplicate.

use crate::expr::ExprKind;
use rustc_hash::FxHashMap;

/// Index of one node inside an [`ExprArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExprId(u32);

impl ExprId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a child-list slice inside an [`ExprArena`]'s shared
/// child-list storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExprListId(u32, u32);

fn to_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic_capacity_exceeded(len))
}

#[cold]
fn panic_capacity_exceeded(len: usize) -> ! {
    panic!("expression arena exceeded u32 capacity at {len} entries")
}

/// Owns every node and child-list of one parsed instance's expression
/// trees. Structurally identical nodes (same kind, same children) are
/// deduplicated on insertion so that canonically-equal subtrees are
/// physically shared, matching the structural-equality interning the
/// domain model also performs.
#[derive(Debug, Default)]
pub struct ExprArena {
    nodes: Vec<ExprKind>,
    lists: Vec<ExprId>,
    dedup: FxHashMap<ExprKind, ExprId>,
}

impl ExprArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node, reusing an existing identical one if present.
    pub fn insert(&mut self, kind: ExprKind) -> ExprId {
        if let Some(&id) = self.dedup.get(&kind) {
            return id;
        }
        let id = ExprId(to_u32(self.nodes.len()));
        self.nodes.push(kind);
        self.dedup.insert(kind, id);
        id
    }

    /// Stores a child list and returns a handle to it. Child lists are
    /// not deduplicated: two nodes with the same children list are
    /// still distinct `ExprKind` values (different operator) in every
    /// case this arena is used for, so dedup lives at the node level.
    pub fn push_list(&mut self, children: &[ExprId]) -> ExprListId {
        let start = to_u32(self.lists.len());
        self.lists.extend_from_slice(children);
        let end = to_u32(self.lists.len());
        ExprListId(start, end)
    }

    #[must_use]
    pub fn get(&self, id: ExprId) -> ExprKind {
        self.nodes[id.index()]
    }

    #[must_use]
    pub fn list(&self, id: ExprListId) -> &[ExprId] {
        &self.lists[id.0 as usize..id.1 as usize]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::NameInterner;

    #[test]
    fn structurally_identical_nodes_are_shared() {
        let mut arena = ExprArena::new();
        let a = arena.insert(ExprKind::Long(7));
        let b = arena.insert(ExprKind::Long(7));
        assert_eq!(a, b);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn child_lists_round_trip() {
        let mut arena = ExprArena::new();
        let mut interner = NameInterner::new();
        let x = arena.insert(ExprKind::Var(interner.intern("x")));
        let y = arena.insert(ExprKind::Var(interner.intern("y")));
        let list = arena.push_list(&[x, y]);
        assert_eq!(arena.list(list), &[x, y]);
    }
}
