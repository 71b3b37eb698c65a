//! Category hierarchy.
//!
//! Income and expense categories form separate trees. Nodes live in an arena
//! keyed by id and point at their parent by id, so the tree never owns its
//! nodes through references and re-parenting is a single map update.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use uuid::Uuid;

use super::error::CatalogError;

/// Arena of category nodes with parent pointers.
#[derive(Debug, Clone)]
pub struct CategoryTree<Id> {
    parents: HashMap<Id, Option<Id>>,
}

impl<Id> Default for CategoryTree<Id> {
    fn default() -> Self {
        Self {
            parents: HashMap::new(),
        }
    }
}

impl<Id> CategoryTree<Id>
where
    Id: Copy + Eq + Hash + Into<Uuid>,
{
    /// Builds a tree from `(id, parent_id)` pairs as loaded from the store.
    ///
    /// No validation is performed; use [`Self::validate_parent`] before
    /// changing a parent.
    pub fn from_nodes(nodes: impl IntoIterator<Item = (Id, Option<Id>)>) -> Self {
        Self {
            parents: nodes.into_iter().collect(),
        }
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// Returns true if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Returns true if `id` is a node of this tree.
    #[must_use]
    pub fn contains(&self, id: Id) -> bool {
        self.parents.contains_key(&id)
    }

    /// Returns the parent of `id`, if any.
    #[must_use]
    pub fn parent(&self, id: Id) -> Option<Id> {
        self.parents.get(&id).copied().flatten()
    }

    /// Returns the ancestors of `id`, nearest first.
    ///
    /// Stops early if the stored data already contains a loop.
    #[must_use]
    pub fn ancestors(&self, id: Id) -> Vec<Id> {
        let mut seen = HashSet::new();
        let mut chain = Vec::new();
        let mut current = self.parent(id);

        while let Some(node) = current {
            if node == id || !seen.insert(node) {
                break;
            }
            chain.push(node);
            current = self.parent(node);
        }
        chain
    }

    /// Returns the direct children of `id`.
    #[must_use]
    pub fn children(&self, id: Id) -> Vec<Id> {
        self.parents
            .iter()
            .filter(|(_, parent)| **parent == Some(id))
            .map(|(child, _)| *child)
            .collect()
    }

    /// Checks that `node` may hang under `parent`.
    ///
    /// `node` may be absent from the tree (a category being created).
    ///
    /// # Errors
    ///
    /// - `ParentNotFound` if `parent` is not in the tree
    /// - `CategoryCycle` if `parent` is `node` or one of its descendants
    pub fn validate_parent(&self, node: Id, parent: Option<Id>) -> Result<(), CatalogError> {
        let Some(parent) = parent else {
            return Ok(());
        };

        if !self.contains(parent) {
            return Err(CatalogError::ParentNotFound(parent.into()));
        }
        if parent == node || self.ancestors(parent).contains(&node) {
            return Err(CatalogError::CategoryCycle {
                category: node.into(),
                parent: parent.into(),
            });
        }
        Ok(())
    }

    /// Adds a node or moves an existing one under a new parent.
    ///
    /// # Errors
    ///
    /// Same as [`Self::validate_parent`].
    pub fn attach(&mut self, node: Id, parent: Option<Id>) -> Result<(), CatalogError> {
        self.validate_parent(node, parent)?;
        self.parents.insert(node, parent);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_shared::types::ExpenseCategoryId;

    fn chain() -> (CategoryTree<ExpenseCategoryId>, [ExpenseCategoryId; 3]) {
        let root = ExpenseCategoryId::new();
        let middle = ExpenseCategoryId::new();
        let leaf = ExpenseCategoryId::new();
        let tree =
            CategoryTree::from_nodes([(root, None), (middle, Some(root)), (leaf, Some(middle))]);
        (tree, [root, middle, leaf])
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let (tree, [root, middle, leaf]) = chain();
        assert_eq!(tree.ancestors(leaf), vec![middle, root]);
        assert!(tree.ancestors(root).is_empty());
        assert_eq!(tree.children(root), vec![middle]);
    }

    #[test]
    fn test_attach_new_node() {
        let (mut tree, [_, middle, _]) = chain();
        let fresh = ExpenseCategoryId::new();
        tree.attach(fresh, Some(middle)).unwrap();
        assert_eq!(tree.parent(fresh), Some(middle));
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let (tree, [root, _, _]) = chain();
        let missing = ExpenseCategoryId::new();
        assert!(matches!(
            tree.validate_parent(root, Some(missing)),
            Err(CatalogError::ParentNotFound(id)) if id == missing.into_inner()
        ));
    }

    #[test]
    fn test_self_parent_rejected() {
        let (tree, [_, middle, _]) = chain();
        assert!(matches!(
            tree.validate_parent(middle, Some(middle)),
            Err(CatalogError::CategoryCycle { .. })
        ));
    }

    #[test]
    fn test_reparent_under_descendant_rejected() {
        let (mut tree, [root, _, leaf]) = chain();
        assert!(matches!(
            tree.attach(root, Some(leaf)),
            Err(CatalogError::CategoryCycle { .. })
        ));
        // Tree unchanged after the rejected move.
        assert_eq!(tree.parent(root), None);
    }

    #[test]
    fn test_reparent_sideways_allowed() {
        let (mut tree, [root, middle, leaf]) = chain();
        tree.attach(leaf, Some(root)).unwrap();
        assert_eq!(tree.ancestors(leaf), vec![root]);
        tree.attach(middle, None).unwrap();
        assert!(tree.ancestors(middle).is_empty());
    }

    #[test]
    fn test_ancestors_terminate_on_corrupt_loop() {
        let a = ExpenseCategoryId::new();
        let b = ExpenseCategoryId::new();
        let tree = CategoryTree::from_nodes([(a, Some(b)), (b, Some(a))]);
        assert_eq!(tree.ancestors(a), vec![b]);
    }
}
