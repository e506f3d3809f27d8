//! Data model for skill trees.
//!
//! # Tree representation
//! Trees are represented by [SkillTree], which uses the arena pattern to store
//! [SkillNode]s referenced by [NodeIndex]. Every node has any number of
//! children and carries a [SkillType] saying who can perform it.
//!
//! Besides its arena position, each node has a [NodeId] handed out by a
//! [NodeIdAllocator]. Indices are only meaningful within one tree, ids are
//! unique among all trees sharing an allocator (by default: the whole process).
//!
//! # Labels
//! Leaves carry authoritative types; the types of internal nodes are derived
//! with [SkillTree::assign_labels], which fails with a [LabelingError] if a
//! leaf is still [SkillType::Unlabeled]. A whole branch can be reclassified
//! with [SkillTree::set_skill_type].

pub mod labeling_error;
pub mod node;
pub mod node_id;
pub mod skill_type;
pub mod tree;

pub use labeling_error::LabelingError;
pub use node::SkillNode;
pub use node_id::{NodeId, NodeIdAllocator};
pub use skill_type::SkillType;
pub use tree::{NodeIndex, PostOrderIter, PreOrderIter, ROOT_INDEX, SkillTree};
