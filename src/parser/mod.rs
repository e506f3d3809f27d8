//! Parsing skill trees from text.
//!
//! Bytes flow from a [ByteSource] through the [Tokenizer] into the
//! [SkillTreeParser] state machine, which builds a
//! [SkillTree](crate::model::SkillTree).
pub mod byte_source;
pub mod parsing_error;
pub mod skill_tree_parser;
pub mod tokenizer;

pub use byte_source::{BufferedByteSource, ByteSource, InMemoryByteSource};
pub use parsing_error::{ParsingError, ParsingErrorType};
pub use skill_tree_parser::{Action, BracePolicy, ParserState, SkillTreeParser};
pub use tokenizer::{Token, TokenKind, Tokenizer};
