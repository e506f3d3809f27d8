//! Skilltree is a library to parse and label skill trees.
//!
//! A skill tree breaks a task down hierarchically. Every node says who can
//! perform its part: a human, a robot, either of them (mixed), or it is not
//! labeled yet. Leaves are labeled in the input; labels of internal nodes
//! are derived from their subtrees.
//!
//! Core functionality provided:
//! - Parser: Reads the compact brace-delimited format
//!   (`ROOT { N0 { L0 human L1 mixed } N1 { L2 robot } }`) from strings,
//!   readers, or files. See [crate::parser].
//! - Tree model: [SkillTree] stores [SkillNode](model::SkillNode)s using the
//!   arena pattern; nodes refer to parent and children by index only.
//!   See [crate::model].
//! - Label propagation: [SkillTree::assign_labels] derives internal labels
//!   bottom-up from the leaves.
//! - Relabeling: [SkillTree::set_skill_type] reclassifies a whole branch.
//! - Lookup: [SkillTree::find_by_id] resolves a [NodeId](model::NodeId)
//!   (e.g. handed to a UI) back to its node.
//!
//! Limitations:
//! - Trees cannot be written back to the text format
//! - Only strict trees (no shared subtrees, no cycles)
//!
//! # Usage patterns
//! 1. The quick functions [parse_str], [parse_reader], and [parse_file] use
//!    default settings.
//! 2. Configure a [SkillTreeParser](parser::SkillTreeParser) for control over
//!    brace balance checking and id allocation.
//!
//! ## Example
//! ```
//! use skilltree::model::SkillType;
//!
//! let mut tree = skilltree::parse_str("ROOT { N0 { L0 human L1 mixed } N1 { L2 robot } }")?;
//! tree.assign_labels()?;
//! assert_eq!(tree.root().skill_type(), SkillType::Mixed);
//!
//! // Re-tag a branch, as a user would, and propagate again
//! let n1 = tree.child(tree.root_index(), 1).unwrap();
//! tree.relabel_by_id(tree[n1].id(), SkillType::Human);
//! tree.assign_labels()?;
//! assert_eq!(tree[n1].skill_type(), SkillType::Human);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod model;
pub mod parser;

pub use crate::model::SkillTree;
pub use crate::parser::parsing_error::ParsingError;

use crate::parser::SkillTreeParser;
use std::io::Read;
use std::path::Path;

// ============================================================================
// Quick API
// ============================================================================
/// Parses a skill tree from a string using default settings
/// (strict brace checking, process-wide unique node ids).
///
/// See [SkillTreeParser::parse_str].
pub fn parse_str<S: AsRef<str>>(input: S) -> Result<SkillTree, ParsingError> {
    SkillTreeParser::new().parse_str(input.as_ref())
}

/// Parses a skill tree from a reader using default settings.
///
/// See [SkillTreeParser::parse_reader].
pub fn parse_reader<R: Read>(reader: R) -> Result<SkillTree, ParsingError> {
    SkillTreeParser::new().parse_reader(reader)
}

/// Parses a skill tree file using default settings.
///
/// See [SkillTreeParser::parse_file].
///
/// # Example
/// ```no_run
/// let tree = skilltree::parse_file("assembly.tree")?;
/// tree.print_tree();
/// # Ok::<(), skilltree::ParsingError>(())
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<SkillTree, ParsingError> {
    SkillTreeParser::new().parse_file(path)
}

/// Initializes a `tracing` subscriber for binaries and examples, filtered by
/// `RUST_LOG` (default `skilltree=info`).
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("skilltree=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
