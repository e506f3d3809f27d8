//! Errors raised by label propagation.

use crate::model::node_id::NodeId;
use thiserror::Error;

/// Failure of [assign_labels](crate::model::SkillTree::assign_labels).
///
/// Propagation stops at the first offending node (in post-order); labels
/// computed up to that point are left in place but should not be relied on.
#[derive(PartialEq, Eq, Debug, Clone, Error)]
pub enum LabelingError {
    /// A leaf still had [SkillType::Unlabeled](crate::model::SkillType::Unlabeled).
    #[error("leaf '{identifier}' (id {id}) cannot be unlabeled")]
    UnlabeledLeaf {
        /// Id of the offending leaf
        id: NodeId,
        /// Identifier of the offending leaf
        identifier: String,
    },

    /// None of the children of an internal node involved a human or a robot.
    #[error("labeling error at '{identifier}' (id {id}): children involve neither human nor robot")]
    LabelingInconsistency {
        /// Id of the internal node that could not be classified
        id: NodeId,
        /// Identifier of the internal node
        identifier: String,
    },
}

impl LabelingError {
    /// Returns the id of the node at which propagation failed.
    pub fn node_id(&self) -> NodeId {
        match self {
            LabelingError::UnlabeledLeaf { id, .. } => *id,
            LabelingError::LabelingInconsistency { id, .. } => *id,
        }
    }
}
