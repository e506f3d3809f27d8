//! Node module for skill tree representation.

use crate::model::node_id::NodeId;
use crate::model::skill_type::SkillType;
use crate::model::tree::NodeIndex;

// =#========================================================================#=
// SKILL NODE
// =#========================================================================#=
/// A node (skill) in a [SkillTree](crate::model::SkillTree).
///
/// Nodes live in the arena of their tree and refer to each other only by
/// [NodeIndex]. A node has any number of children (m-ary tree).
///
/// # Invariants
/// - `index` is the position of this node in the arena of its tree
/// - `parent` is `None` exactly for the root
/// - `children` are in insertion order and each lists this node as parent
/// - `id` is never changed after construction
///
/// Structure (children and parent) can only be changed through the tree,
/// which keeps both directions consistent.
#[derive(PartialEq, Debug, Clone)]
pub struct SkillNode {
    /// Process-unique identity
    id: NodeId,
    /// Index of this node in the tree arena
    index: NodeIndex,
    /// Display string, need not be unique
    identifier: String,
    /// Who can perform this skill
    skill_type: SkillType,
    /// Indices of child nodes, in creation order
    children: Vec<NodeIndex>,
    /// Index of the parent node, `None` for the root
    parent: Option<NodeIndex>,
}

impl SkillNode {
    /// Creates a new node without children.
    pub(crate) fn new(
        id: NodeId,
        index: NodeIndex,
        identifier: String,
        skill_type: SkillType,
        parent: Option<NodeIndex>,
    ) -> Self {
        SkillNode {
            id,
            index,
            identifier,
            skill_type,
            children: Vec::new(),
            parent,
        }
    }

    /// Returns the unique id of this node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the index of this node in its tree.
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    /// Returns the display identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub(crate) fn set_identifier(&mut self, identifier: String) {
        self.identifier = identifier;
    }

    /// Returns the current skill type.
    pub fn skill_type(&self) -> SkillType {
        self.skill_type
    }

    /// Sets the type of only this node; cascading is done by the tree.
    pub(crate) fn set_skill_type_local(&mut self, skill_type: SkillType) {
        self.skill_type = skill_type;
    }

    /// Returns the indices of the children, in creation order.
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    /// Returns the index of the `i`-th child, or `None` if out of range.
    pub fn child(&self, i: usize) -> Option<NodeIndex> {
        self.children.get(i).copied()
    }

    pub(crate) fn push_child(&mut self, child: NodeIndex) {
        self.children.push(child);
    }

    /// Returns the number of children.
    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    /// Returns the index of the parent, or `None` for the root.
    pub fn parent_index(&self) -> Option<NodeIndex> {
        self.parent
    }

    /// Returns `true` if this node has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Returns `true` if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns `true` if this node has at least one child.
    pub fn is_internal(&self) -> bool {
        !self.children.is_empty()
    }
}
