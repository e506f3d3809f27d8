//! Tree module for skill tree representation.
//!
//! This module provides [SkillTree], an m-ary tree of [SkillNode]s stored
//! using the arena pattern, together with the operations working on it:
//! - cascading relabeling ([SkillTree::set_skill_type]),
//! - bottom-up label propagation ([SkillTree::assign_labels]),
//! - lookup by [NodeId] ([SkillTree::find_by_id]),
//! - pre- and post-order traversal, and a text dump for debugging.

use crate::model::labeling_error::LabelingError;
use crate::model::node::SkillNode;
use crate::model::node_id::{NodeId, NodeIdAllocator};
use crate::model::skill_type::SkillType;
use std::fmt;
use std::fmt::Write;
use tracing::debug;

/// Index of a node in a tree (arena).
pub type NodeIndex = usize;

/// The root is always the first node in the arena.
pub const ROOT_INDEX: NodeIndex = 0;

// =#========================================================================#=
// SKILL TREE
// =#========================================================================#=
/// A skill tree represented using the arena pattern on [SkillNode].
///
/// Nodes are stored in a contiguous vector and referenced by [NodeIndex].
/// The tree owns all its nodes; parent links are plain indices and never
/// keep anything alive.
///
/// # Structure
/// - The root is created together with the tree and sits at [ROOT_INDEX]
/// - Nodes are only ever added (as children of an existing node), never removed
/// - Each node gets a [NodeId] from the tree's [NodeIdAllocator]
///
/// # Example
/// ```
/// use skilltree::model::{NodeIdAllocator, SkillTree, SkillType};
///
/// let mut tree = SkillTree::with_allocator("Assemble", NodeIdAllocator::new());
/// let root = tree.root_index();
/// let fetch = tree.add_child(root, "Fetch", SkillType::Robot);
/// let screw = tree.add_child(root, "Screw", SkillType::Human);
///
/// tree.assign_labels().unwrap();
/// assert_eq!(tree.root().skill_type(), SkillType::Mixed);
/// assert_eq!(tree.find_by_id(tree[screw].id()), Some(screw));
/// # let _ = fetch;
/// ```
#[derive(Debug, Clone)]
pub struct SkillTree {
    /// Nodes of this tree (arena pattern)
    nodes: Vec<SkillNode>,

    /// Source of ids for nodes added to this tree
    allocator: NodeIdAllocator,
}

// ============================================================================
// New, Construction (pub)
// ============================================================================
impl SkillTree {
    /// Creates a tree consisting of a single, unlabeled root.
    ///
    /// Ids are drawn from the process-wide [NodeIdAllocator::shared].
    pub fn new<S: Into<String>>(root_identifier: S) -> Self {
        Self::with_allocator(root_identifier, NodeIdAllocator::shared())
    }

    /// Creates a tree consisting of a single, unlabeled root, drawing ids
    /// from the given allocator.
    pub fn with_allocator<S: Into<String>>(root_identifier: S, allocator: NodeIdAllocator) -> Self {
        Self::with_capacity(root_identifier, allocator, 1)
    }

    /// Like [with_allocator](Self::with_allocator), reserving space for
    /// `capacity` nodes.
    pub fn with_capacity<S: Into<String>>(
        root_identifier: S,
        allocator: NodeIdAllocator,
        capacity: usize,
    ) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(SkillNode::new(
            allocator.allocate(),
            ROOT_INDEX,
            root_identifier.into(),
            SkillType::Unlabeled,
            None,
        ));
        SkillTree { nodes, allocator }
    }

    /// Adds a new child below `parent`, returning its index.
    ///
    /// The child is appended after any existing children of `parent`.
    ///
    /// # Panics
    /// Panics if `parent` is not a node of this tree.
    pub fn add_child<S: Into<String>>(
        &mut self,
        parent: NodeIndex,
        identifier: S,
        skill_type: SkillType,
    ) -> NodeIndex {
        assert!(
            parent < self.nodes.len(),
            "Parent index {parent} out of bounds for tree with {} nodes",
            self.nodes.len()
        );

        let index = self.nodes.len();
        self.nodes.push(SkillNode::new(
            self.allocator.allocate(),
            index,
            identifier.into(),
            skill_type,
            Some(parent),
        ));
        self.nodes[parent].push_child(index);

        index
    }

    /// Renames the node at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn set_identifier<S: Into<String>>(&mut self, index: NodeIndex, identifier: S) {
        self.nodes[index].set_identifier(identifier.into());
    }
}

// ============================================================================
// Getters / Accessors (pub)
// ============================================================================
impl SkillTree {
    /// Returns a reference to the root node.
    pub fn root(&self) -> &SkillNode {
        &self.nodes[ROOT_INDEX]
    }

    /// Returns the index of the root.
    pub fn root_index(&self) -> NodeIndex {
        ROOT_INDEX
    }

    /// Returns a reference to the node at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn node(&self, index: NodeIndex) -> &SkillNode {
        &self[index]
    }

    /// Returns a reference to the node at the given index, or `None` if out of bounds.
    pub fn get(&self, index: NodeIndex) -> Option<&SkillNode> {
        self.nodes.get(index)
    }

    /// Returns the index of the `i`-th child of the node at `index`, or
    /// `None` if it has fewer children.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn child(&self, index: NodeIndex, i: usize) -> Option<NodeIndex> {
        self[index].child(i)
    }

    /// Returns the parent of the node at `index`, or `None` for the root.
    pub fn parent_of(&self, index: NodeIndex) -> Option<&SkillNode> {
        self[index].parent_index().map(|p| &self[p])
    }

    /// Returns the allocator handing out ids for this tree.
    pub fn allocator(&self) -> &NodeIdAllocator {
        &self.allocator
    }

    /// Returns an iterator over all nodes in arena (creation) order.
    pub fn nodes(&self) -> impl Iterator<Item = &SkillNode> {
        self.nodes.iter()
    }

    /// Returns the number of nodes in this tree.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of leaves in this tree.
    pub fn num_leaves(&self) -> usize {
        self.nodes.iter().filter(|&n| n.is_leaf()).count()
    }

    /// Returns the number of internal nodes in this tree (root included,
    /// unless it is the only node).
    pub fn num_internal(&self) -> usize {
        self.nodes.iter().filter(|&n| n.is_internal()).count()
    }

    /// Returns the number of edges between the node at `index` and the root.
    pub fn depth_of(&self, index: NodeIndex) -> usize {
        let mut depth = 0;
        let mut current = index;
        while let Some(parent) = self[current].parent_index() {
            depth += 1;
            current = parent;
        }
        depth
    }

    /// Validates the tree structure and all index references.
    ///
    /// Checks:
    /// - The root sits at [ROOT_INDEX] and is the only node without parent
    /// - All node indices match their position in the arena
    /// - All child indices are in bounds and point back to the correct parent
    /// - All parents list the node among their children exactly once
    /// - All ids are distinct
    /// - Every node is reachable from the root
    pub fn is_valid(&self) -> bool {
        if self.nodes.is_empty() || !self.nodes[ROOT_INDEX].is_root() {
            return false;
        }

        let mut ids = std::collections::HashSet::with_capacity(self.nodes.len());
        for (index, node) in self.nodes.iter().enumerate() {
            if node.index() != index || !ids.insert(node.id()) {
                return false;
            }

            // Children point back
            for &child in node.children() {
                if child >= self.nodes.len() || self.nodes[child].parent_index() != Some(index) {
                    return false;
                }
            }

            // Parent lists us exactly once
            match node.parent_index() {
                None => {
                    if index != ROOT_INDEX {
                        return false;
                    }
                }
                Some(parent) => {
                    if parent >= self.nodes.len() {
                        return false;
                    }
                    let occurrences = self.nodes[parent]
                        .children()
                        .iter()
                        .filter(|&&c| c == index)
                        .count();
                    if occurrences != 1 {
                        return false;
                    }
                }
            }
        }

        self.pre_order_iter().count() == self.nodes.len()
    }
}

impl std::ops::Index<NodeIndex> for SkillTree {
    type Output = SkillNode;

    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index]
    }
}

// ============================================================================
// Labeling (pub)
// ============================================================================
impl SkillTree {
    /// Sets the type of the node at `index` and of every node in its subtree.
    ///
    /// This is a bulk reclassification: previous types in the subtree are
    /// overwritten, whether given explicitly or computed by propagation.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn set_skill_type(&mut self, index: NodeIndex, skill_type: SkillType) {
        let mut stack = vec![index];
        let mut count = 0;
        while let Some(current) = stack.pop() {
            let node = &mut self.nodes[current];
            node.set_skill_type_local(skill_type);
            stack.extend_from_slice(node.children());
            count += 1;
        }

        if count > 1 {
            debug!(index, %skill_type, count, "cascaded skill type over subtree");
        }
    }

    /// Looks up the node with the given id and cascades `skill_type` over
    /// its subtree (see [set_skill_type](Self::set_skill_type)).
    ///
    /// Returns `false`, changing nothing, if no node has that id.
    pub fn relabel_by_id(&mut self, id: NodeId, skill_type: SkillType) -> bool {
        match self.find_by_id(id) {
            Some(index) => {
                self.set_skill_type(index, skill_type);
                true
            }
            None => false,
        }
    }

    /// Computes the types of all internal nodes from the types of the leaves.
    ///
    /// See [assign_labels_from](Self::assign_labels_from) for the rules.
    pub fn assign_labels(&mut self) -> Result<(), LabelingError> {
        let root_type = self.assign_labels_from(ROOT_INDEX)?;
        debug!(nodes = self.nodes.len(), root = %root_type, "assigned labels");
        Ok(())
    }

    /// Computes the types of all internal nodes in the subtree at `start`
    /// bottom-up, returning the resulting type of `start`.
    ///
    /// Nodes are processed in post-order (children left to right):
    /// - A leaf keeps its type, but must not be [SkillType::Unlabeled].
    /// - An internal node becomes `Mixed` if its children involve both a human
    ///   and a robot (a `Mixed` child involves both), `Human` or `Robot` if only
    ///   one of them is involved.
    ///
    /// Internal types are recomputed unconditionally, whatever they held
    /// before. Running this twice without changing leaves gives the same result.
    ///
    /// # Errors
    /// - [LabelingError::UnlabeledLeaf] at the first unlabeled leaf
    /// - [LabelingError::LabelingInconsistency] if the children of an internal
    ///   node involve neither actor
    ///
    /// # Panics
    /// Panics if `start` is out of bounds.
    pub fn assign_labels_from(&mut self, start: NodeIndex) -> Result<SkillType, LabelingError> {
        let order: Vec<NodeIndex> = self.post_order_iter_from(start).map(SkillNode::index).collect();

        for index in order {
            let node = &self.nodes[index];

            if node.is_leaf() {
                if !node.skill_type().is_labeled() {
                    return Err(LabelingError::UnlabeledLeaf {
                        id: node.id(),
                        identifier: node.identifier().to_string(),
                    });
                }
                continue;
            }

            let (human_present, robot_present) = node
                .children()
                .iter()
                .map(|&child| self.nodes[child].skill_type())
                .fold((false, false), |(human, robot), t| {
                    (human || t.has_human(), robot || t.has_robot())
                });

            let skill_type = SkillType::combine(human_present, robot_present).ok_or_else(|| {
                LabelingError::LabelingInconsistency {
                    id: node.id(),
                    identifier: node.identifier().to_string(),
                }
            })?;
            self.nodes[index].set_skill_type_local(skill_type);
        }

        Ok(self.nodes[start].skill_type())
    }
}

// ============================================================================
// Lookup (pub)
// ============================================================================
impl SkillTree {
    /// Returns the index of the node with the given id, or `None` if there is
    /// no such node in this tree.
    ///
    /// Searches depth-first in pre-order from the root.
    pub fn find_by_id(&self, id: NodeId) -> Option<NodeIndex> {
        self.find_by_id_from(ROOT_INDEX, id)
    }

    /// Returns the index of the first node (depth-first, pre-order) in the
    /// subtree at `start` with the given id, or `None`.
    ///
    /// # Panics
    /// Panics if `start` is out of bounds.
    pub fn find_by_id_from(&self, start: NodeIndex, id: NodeId) -> Option<NodeIndex> {
        self.pre_order_iter_from(start)
            .find(|node| node.id() == id)
            .map(SkillNode::index)
    }

    /// Returns the node with the given id, or `None`.
    pub fn node_by_id(&self, id: NodeId) -> Option<&SkillNode> {
        self.find_by_id(id).map(|index| &self[index])
    }
}

// ============================================================================
// Printing (pub)
// ============================================================================
impl SkillTree {
    /// Renders the tree as indented text, one node per line.
    ///
    /// This is meant for inspection and logging; it is not the input format.
    ///
    /// # Example Output
    /// ```text
    /// ROOT [0] (mixed)
    /// ├─ N0 [1] (mixed)
    /// │  ├─ L0 [2] (human)
    /// │  └─ L1 [3] (mixed)
    /// └─ N1 [4] (robot)
    ///    └─ L2 [5] (robot)
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.nodes.len() * 24);
        // Writing to a String cannot fail
        let _ = self.write_tree(&mut out);
        out
    }

    /// Prints [render](Self::render) to stdout.
    pub fn print_tree(&self) {
        print!("{}", self.render());
    }

    /// Writes the text dump node by node in pre-order.
    ///
    /// Uses an explicit stack and a single prefix buffer, so depth is only
    /// bounded by memory. Each stack entry remembers how long the prefix was
    /// when the entry was pushed; the buffer is cut back to that length
    /// before the node is written.
    fn write_tree<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        let mut prefix = String::new();
        // (index, is_last, prefix_len); is_last is None for the root
        let mut stack: Vec<(NodeIndex, Option<bool>, usize)> = vec![(ROOT_INDEX, None, 0)];

        while let Some((index, is_last, prefix_len)) = stack.pop() {
            prefix.truncate(prefix_len);
            let node = &self.nodes[index];
            let connector = match is_last {
                None => "",
                Some(true) => "└─ ",
                Some(false) => "├─ ",
            };
            writeln!(
                out,
                "{prefix}{connector}{} [{}] ({})",
                node.identifier(),
                node.id(),
                node.skill_type()
            )?;

            match is_last {
                None => {}
                Some(true) => prefix.push_str("   "),
                Some(false) => prefix.push_str("│  "),
            }
            let child_prefix_len = prefix.len();
            let num_children = node.num_children();
            // Push in reverse, so first child is written first
            for (i, &child) in node.children().iter().enumerate().rev() {
                stack.push((child, Some(i + 1 == num_children), child_prefix_len));
            }
        }

        Ok(())
    }
}

impl fmt::Display for SkillTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f)
    }
}

// =#========================================================================#=
// ITERATORS
// =#========================================================================#=
impl SkillTree {
    /// Returns an iterator over the tree in post-order (children before parents).
    ///
    /// Children are visited left to right.
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self, ROOT_INDEX)
    }

    /// Post-order iterator over the subtree at `start`.
    pub fn post_order_iter_from(&self, start: NodeIndex) -> PostOrderIter<'_> {
        PostOrderIter::new(self, start)
    }

    /// Returns an iterator over the tree in pre-order (parents before children).
    ///
    /// Children are visited left to right.
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self, ROOT_INDEX)
    }

    /// Pre-order iterator over the subtree at `start`.
    pub fn pre_order_iter_from(&self, start: NodeIndex) -> PreOrderIter<'_> {
        PreOrderIter::new(self, start)
    }
}

/// Iterator for post-order traversal (children before parents).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each node is visited after all its descendants have been visited.
pub struct PostOrderIter<'a> {
    tree: &'a SkillTree,
    stack: Vec<(NodeIndex, bool)>, // (index, children_visited)
}

impl<'a> PostOrderIter<'a> {
    fn new(tree: &'a SkillTree, start: NodeIndex) -> Self {
        assert!(start < tree.nodes.len(), "Start index {start} out of bounds");
        PostOrderIter {
            tree,
            stack: vec![(start, false)],
        }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = &'a SkillNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            let node = &self.tree[index];

            if children_visited || node.is_leaf() {
                return Some(node);
            }

            self.stack.push((index, true));
            // Push in reverse, so first child is processed first
            for &child in node.children().iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each node is visited before any of its descendants.
pub struct PreOrderIter<'a> {
    tree: &'a SkillTree,
    stack: Vec<NodeIndex>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a SkillTree, start: NodeIndex) -> Self {
        assert!(start < tree.nodes.len(), "Start index {start} out of bounds");
        PreOrderIter {
            tree,
            stack: vec![start],
        }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a SkillNode;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let node = &self.tree[index];
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

// =#========================================================================#=
// TESTS
// =#========================================================================#=
#[cfg(test)]
mod tests {
    use super::*;

    /// ROOT { A { A1 human A2 robot } B human }
    fn small_tree() -> SkillTree {
        let mut tree = SkillTree::with_allocator("ROOT", NodeIdAllocator::new());
        let a = tree.add_child(ROOT_INDEX, "A", SkillType::Unlabeled);
        tree.add_child(a, "A1", SkillType::Human);
        tree.add_child(a, "A2", SkillType::Robot);
        tree.add_child(ROOT_INDEX, "B", SkillType::Human);
        tree
    }

    #[test]
    fn test_traversal_orders() {
        let tree = small_tree();
        let pre: Vec<_> = tree.pre_order_iter().map(|n| n.identifier()).collect();
        assert_eq!(pre, vec!["ROOT", "A", "A1", "A2", "B"]);

        let post: Vec<_> = tree.post_order_iter().map(|n| n.identifier()).collect();
        assert_eq!(post, vec!["A1", "A2", "A", "B", "ROOT"]);

        let sub: Vec<_> = tree.post_order_iter_from(1).map(|n| n.identifier()).collect();
        assert_eq!(sub, vec!["A1", "A2", "A"]);
    }

    #[test]
    fn test_cascade_only_touches_subtree() {
        let mut tree = small_tree();
        tree.set_skill_type(1, SkillType::Mixed);
        assert_eq!(tree[1].skill_type(), SkillType::Mixed);
        assert_eq!(tree[2].skill_type(), SkillType::Mixed);
        assert_eq!(tree[3].skill_type(), SkillType::Mixed);
        assert_eq!(tree[4].skill_type(), SkillType::Human);
        assert_eq!(tree.root().skill_type(), SkillType::Unlabeled);
    }

    #[test]
    fn test_depth_and_counts() {
        let tree = small_tree();
        assert_eq!(tree.depth_of(ROOT_INDEX), 0);
        assert_eq!(tree.depth_of(3), 2);
        assert_eq!(tree.num_nodes(), 5);
        assert_eq!(tree.num_leaves(), 3);
        assert_eq!(tree.num_internal(), 2);
        assert!(tree.is_valid());
    }

    #[test]
    fn test_render() {
        let mut tree = small_tree();
        tree.assign_labels().unwrap();
        let expected = "\
ROOT [0] (mixed)
├─ A [1] (mixed)
│  ├─ A1 [2] (human)
│  └─ A2 [3] (robot)
└─ B [4] (human)
";
        assert_eq!(tree.render(), expected);
        assert_eq!(tree.to_string(), expected);
    }

    #[test]
    fn test_assign_labels_from_subtree_leaves_rest_untouched() {
        let mut tree = small_tree();
        assert_eq!(tree.assign_labels_from(1), Ok(SkillType::Mixed));
        assert_eq!(tree.root().skill_type(), SkillType::Unlabeled);
    }

    #[test]
    fn test_single_node_tree() {
        let mut tree = SkillTree::with_allocator("Solo", NodeIdAllocator::new());
        assert!(tree.root().is_leaf());
        assert_eq!(
            tree.assign_labels(),
            Err(LabelingError::UnlabeledLeaf {
                id: NodeId::new(0),
                identifier: "Solo".to_string()
            })
        );
        tree.set_skill_type(ROOT_INDEX, SkillType::Robot);
        assert_eq!(tree.assign_labels(), Ok(()));
        assert_eq!(tree.root().skill_type(), SkillType::Robot);
    }
}
