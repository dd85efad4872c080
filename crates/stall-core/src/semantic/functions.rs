//! Function tree for locating the method enclosing a source position.
//!
//! An arena-backed tree of every function-like construct in one file
//! (declarations, expressions, arrows, class methods), ordered by nesting.

use id_arena::{Arena, Id};

use crate::engine::op::SourceRange;

pub type FunctionId = Id<FunctionScope>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Declaration,
    Expression,
    Arrow,
    Method,
}

#[derive(Debug)]
pub struct FunctionScope {
    pub id: FunctionId,
    pub kind: FunctionKind,
    /// Binding name. `None` for anonymous expressions and arrows.
    pub name: Option<String>,
    pub is_async: bool,
    pub parent: Option<FunctionId>,
    pub children: Vec<FunctionId>,
    /// Full extent of the function, parameters through body.
    pub range: SourceRange,
    /// The declaration identifier, when one exists.
    pub ident_range: Option<SourceRange>,
}

pub struct FunctionTree {
    arena: Arena<FunctionScope>,
    roots: Vec<FunctionId>,
}

impl Default for FunctionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            roots: Vec::new(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_function(
        &mut self,
        kind: FunctionKind,
        name: Option<String>,
        is_async: bool,
        parent: Option<FunctionId>,
        range: SourceRange,
        ident_range: Option<SourceRange>,
    ) -> FunctionId {
        let id = self.arena.alloc_with_id(|id| FunctionScope {
            id,
            kind,
            name,
            is_async,
            parent,
            children: Vec::new(),
            range,
            ident_range,
        });

        match parent {
            Some(parent_id) => self.arena[parent_id].children.push(id),
            None => self.roots.push(id),
        }

        id
    }

    pub fn get(&self, id: FunctionId) -> &FunctionScope {
        &self.arena[id]
    }

    pub fn iter(&self) -> impl Iterator<Item = &FunctionScope> {
        self.arena.iter().map(|(_, scope)| scope)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }

    pub fn ancestors(&self, id: FunctionId) -> AncestorIter<'_> {
        AncestorIter {
            tree: self,
            current: Some(id),
        }
    }

    /// The narrowest function whose extent contains `pos`.
    pub fn innermost_containing(&self, pos: u32) -> Option<&FunctionScope> {
        self.iter()
            .filter(|scope| scope.range.contains(pos))
            .min_by_key(|scope| scope.range.width())
    }

    /// The function whose declaration identifier covers `pos`, if any.
    /// Anonymous functions have no identifier and never match.
    pub fn declared_at(&self, pos: u32) -> Option<&FunctionScope> {
        self.iter()
            .find(|scope| scope.ident_range.is_some_and(|range| range.contains(pos)))
    }
}

pub struct AncestorIter<'a> {
    tree: &'a FunctionTree,
    current: Option<FunctionId>,
}

impl<'a> Iterator for AncestorIter<'a> {
    type Item = &'a FunctionScope;

    fn next(&mut self) -> Option<Self::Item> {
        let current_id = self.current?;
        let scope = &self.tree.arena[current_id];
        self.current = scope.parent;
        Some(scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(lo: u32, hi: u32) -> SourceRange {
        SourceRange::new(lo, hi)
    }

    #[test]
    fn creates_nested_functions() {
        let mut tree = FunctionTree::new();
        let outer = tree.create_function(
            FunctionKind::Declaration,
            Some("outer".to_string()),
            true,
            None,
            range(0, 100),
            Some(range(9, 14)),
        );
        let inner = tree.create_function(
            FunctionKind::Arrow,
            None,
            false,
            Some(outer),
            range(30, 60),
            None,
        );

        assert_eq!(tree.get(inner).parent, Some(outer));
        assert_eq!(tree.get(outer).children, vec![inner]);
        assert!(tree.get(outer).is_async);
        assert!(!tree.get(inner).is_async);
    }

    #[test]
    fn innermost_containing_picks_narrowest() {
        let mut tree = FunctionTree::new();
        let outer = tree.create_function(
            FunctionKind::Declaration,
            Some("outer".to_string()),
            false,
            None,
            range(0, 100),
            None,
        );
        let inner = tree.create_function(
            FunctionKind::Arrow,
            None,
            true,
            Some(outer),
            range(30, 60),
            None,
        );

        assert_eq!(tree.innermost_containing(40).map(|s| s.id), Some(inner));
        assert_eq!(tree.innermost_containing(10).map(|s| s.id), Some(outer));
        assert!(tree.innermost_containing(100).is_none());
    }

    #[test]
    fn declared_at_matches_identifier_range_only() {
        let mut tree = FunctionTree::new();
        tree.create_function(
            FunctionKind::Declaration,
            Some("doWork".to_string()),
            true,
            None,
            range(0, 50),
            Some(range(9, 15)),
        );
        tree.create_function(FunctionKind::Arrow, None, true, None, range(60, 90), None);

        assert_eq!(
            tree.declared_at(10).and_then(|s| s.name.as_deref()),
            Some("doWork")
        );
        assert!(tree.declared_at(70).is_none());
        assert!(tree.declared_at(20).is_none());
    }

    #[test]
    fn ancestors_walk_parent_chain() {
        let mut tree = FunctionTree::new();
        let a = tree.create_function(
            FunctionKind::Declaration,
            Some("a".to_string()),
            false,
            None,
            range(0, 100),
            None,
        );
        let b = tree.create_function(FunctionKind::Expression, None, false, Some(a), range(10, 90), None);
        let c = tree.create_function(FunctionKind::Arrow, None, true, Some(b), range(20, 80), None);

        let chain: Vec<FunctionKind> = tree.ancestors(c).map(|s| s.kind).collect();

        assert_eq!(
            chain,
            vec![
                FunctionKind::Arrow,
                FunctionKind::Expression,
                FunctionKind::Declaration
            ]
        );
    }
}
