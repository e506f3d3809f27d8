//! Structs and logic to parse skill trees from the brace-delimited format.
//!
//! # Format
//! * `tree ::= IDENT '{' member* '}'`
//! * `member ::= IDENT ( '{' member* '}' | TYPE )`
//! * `TYPE ::= human | robot | mixed` (case-insensitive)
//!
//! For example:
//! ```text
//! ROOT {
//!   N0 { L0 human L1 mixed }
//!   N1 { L2 robot }
//! }
//! ```
//!
//! # State machine
//! The parser is a two-state machine ([ParserState]) driven by tokens. Each
//! step yields an [Action] for the tree under construction; the node currently
//! being populated (the cursor) is the top of a stack of node indices.
//! Leaving a node, after its type or after the `}` closing its child list,
//! pops the stack.

use crate::model::{NodeIdAllocator, NodeIndex, ROOT_INDEX, SkillTree, SkillType};
use crate::parser::byte_source::{BufferedByteSource, ByteSource};
use crate::parser::parsing_error::ParsingError;
use crate::parser::tokenizer::{Token, TokenKind, Tokenizer};
use std::io::Read;
use std::path::Path;
use tracing::{debug, trace, warn};

/// Default guess of number of nodes, used to pre-allocate the arena.
const DEFAULT_CAPACITY_HINT: usize = 64;

// =#========================================================================#=
// BRACE POLICY
// =#========================================================================#=
/// How the parser treats braces that do not balance.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default)]
pub enum BracePolicy {
    /// Reject input with unbalanced braces:
    /// - a `}` with nothing left to close (also as very first token),
    /// - child lists still open at end of input,
    /// - a node left without child list or type at end of input.
    #[default]
    Strict,
    /// Accept unclosed child lists and a node without child list or type at
    /// end of input, and ignore surplus `}` after the root was closed.
    /// A leading `}` becomes the root identifier. Each case is logged as warning.
    Permissive,
}

// =#========================================================================#=
// STATE MACHINE
// =#========================================================================#=
/// States of the parser.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum ParserState {
    /// Next token names a node (or `}` closes the current child list)
    ExpectIdentifier,
    /// Next token is either `{` opening a child list, or a type keyword
    ExpectChildrenOrType,
}

/// Effect of a single token on the tree under construction.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Action {
    /// Create the root, named by the token, and make it the cursor
    CreateRoot,
    /// Add a child named by the token below the cursor and make it the cursor
    AddChild,
    /// The cursor's child list begins; nothing to build
    OpenChildren,
    /// Cascade the type onto the cursor, then leave it
    AssignType(SkillType),
    /// The cursor's child list ends; leave it
    Ascend,
}

impl ParserState {
    /// Computes the action for `token` and the following state.
    ///
    /// `has_root` tells whether the root has been created already.
    ///
    /// # Errors
    /// - [MissingIdentifier](crate::parser::ParsingErrorType::MissingIdentifier)
    ///   if `{` comes where an identifier is expected
    /// - [IllegalType](crate::parser::ParsingErrorType::IllegalType) if a word
    ///   after an identifier is not a type keyword
    pub fn step(self, token: &Token, has_root: bool) -> Result<(Action, ParserState), ParsingError> {
        match self {
            ParserState::ExpectIdentifier => match token.kind() {
                TokenKind::OpenBrace => Err(ParsingError::missing_identifier(token)),
                _ if !has_root => Ok((Action::CreateRoot, ParserState::ExpectChildrenOrType)),
                TokenKind::CloseBrace => Ok((Action::Ascend, ParserState::ExpectIdentifier)),
                TokenKind::Word => Ok((Action::AddChild, ParserState::ExpectChildrenOrType)),
            },
            ParserState::ExpectChildrenOrType => match token.kind() {
                TokenKind::OpenBrace => Ok((Action::OpenChildren, ParserState::ExpectIdentifier)),
                _ => SkillType::from_keyword(token.text())
                    .map(|t| (Action::AssignType(t), ParserState::ExpectIdentifier))
                    .ok_or_else(|| ParsingError::illegal_type(token)),
            },
        }
    }
}

// =#========================================================================#=
// SKILL TREE PARSER
// =#========================================================================#=
/// Parser (configuration) for skill trees.
///
/// # Configuration
/// * [`with_brace_policy(policy)`](Self::with_brace_policy)
///     - [BracePolicy::Strict] (default) or [BracePolicy::Permissive]
/// * [`with_allocator(allocator)`](Self::with_allocator)
///     - Source of node ids, default is the process-wide [NodeIdAllocator::shared]
/// * [`with_capacity_hint(num_nodes)`](Self::with_capacity_hint)
///     - Expected number of nodes, to pre-allocate the tree
///
/// # Parsing
/// * [`parse_str`](Self::parse_str) - Parse a string
/// * [`parse_reader`](Self::parse_reader) - Parse from any reader
/// * [`parse_file`](Self::parse_file) - Parse a file (buffered)
/// * [`parse_source`](Self::parse_source), [`parse_tokens`](Self::parse_tokens)
///   - Parse from a byte source or token stream
///
/// Any error aborts parsing; no partial tree is returned.
///
/// # Example
/// ```
/// use skilltree::parser::{BracePolicy, SkillTreeParser};
/// use skilltree::model::NodeIdAllocator;
///
/// let parser = SkillTreeParser::new()
///     .with_brace_policy(BracePolicy::Strict)
///     .with_allocator(NodeIdAllocator::new());
///
/// let tree = parser.parse_str("ROOT { N0 { L0 human L1 mixed } N1 { L2 robot } }").unwrap();
/// assert_eq!(tree.num_nodes(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct SkillTreeParser {
    brace_policy: BracePolicy,
    allocator: NodeIdAllocator,
    capacity_hint: usize,
}

// ============================================================================
// Construction & Configuration (pub)
// ============================================================================
impl SkillTreeParser {
    /// Creates a parser with default settings:
    /// - strict brace policy
    /// - process-wide shared id allocator
    pub fn new() -> Self {
        Self {
            brace_policy: BracePolicy::default(),
            allocator: NodeIdAllocator::shared(),
            capacity_hint: DEFAULT_CAPACITY_HINT,
        }
    }

    /// Sets how unbalanced braces are treated.
    pub fn with_brace_policy(mut self, brace_policy: BracePolicy) -> Self {
        self.brace_policy = brace_policy;
        self
    }

    /// Sets the allocator the parsed trees draw node ids from.
    pub fn with_allocator(mut self, allocator: NodeIdAllocator) -> Self {
        self.allocator = allocator;
        self
    }

    /// Sets the expected number of nodes per tree.
    pub fn with_capacity_hint(mut self, num_nodes: usize) -> Self {
        self.capacity_hint = num_nodes;
        self
    }

    /// Returns the configured brace policy.
    pub fn brace_policy(&self) -> BracePolicy {
        self.brace_policy
    }

    /// Returns the allocator parsed trees draw node ids from.
    pub fn allocator(&self) -> &NodeIdAllocator {
        &self.allocator
    }
}

impl Default for SkillTreeParser {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Parsing (pub)
// ============================================================================
impl SkillTreeParser {
    /// Parses a tree from a string.
    pub fn parse_str(&self, input: &str) -> Result<SkillTree, ParsingError> {
        self.parse_tokens(Tokenizer::for_str(input))
    }

    /// Parses a tree from a reader, buffering its content.
    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<SkillTree, ParsingError> {
        self.parse_source(BufferedByteSource::new(reader))
    }

    /// Parses a tree from a file.
    ///
    /// # Errors
    /// Besides format errors, returns an IO error if the file cannot be read.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<SkillTree, ParsingError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "parsing skill tree file");
        self.parse_source(BufferedByteSource::from_file(path)?)
    }

    /// Parses a tree from a byte source.
    pub fn parse_source<S: ByteSource>(&self, source: S) -> Result<SkillTree, ParsingError> {
        self.parse_tokens(Tokenizer::new(source))
    }

    /// Parses a tree from a stream of tokens.
    pub fn parse_tokens<I>(&self, tokens: I) -> Result<SkillTree, ParsingError>
    where
        I: IntoIterator<Item = Result<Token, ParsingError>>,
    {
        let mut tokens = tokens.into_iter();

        // Root
        let first = match tokens.next() {
            Some(token) => token?,
            None => return Err(ParsingError::unexpected_eof(0)),
        };
        if first.is_close_brace() && self.brace_policy == BracePolicy::Strict {
            return Err(ParsingError::unbalanced_braces(
                first.position(),
                "'}' before any node".to_string(),
            ));
        }
        let (_, mut state) = ParserState::ExpectIdentifier.step(&first, false)?;
        let mut end = first.end();
        let mut tree = SkillTree::with_capacity(first.into_text(), self.allocator.clone(), self.capacity_hint);
        let mut stack: Vec<NodeIndex> = vec![ROOT_INDEX];

        // Members
        for token in tokens {
            let token = token?;
            end = token.end();
            trace!(?state, token = token.text(), depth = stack.len(), "parser step");

            let Some(&cursor) = stack.last() else {
                // Root already closed, nothing to attach to
                match token.kind() {
                    TokenKind::CloseBrace if self.brace_policy == BracePolicy::Permissive => {
                        warn!(position = token.position(), "ignoring '}}' after root was closed");
                        continue;
                    }
                    TokenKind::CloseBrace => {
                        return Err(ParsingError::unbalanced_braces(
                            token.position(),
                            "'}' after root was closed".to_string(),
                        ));
                    }
                    TokenKind::OpenBrace => return Err(ParsingError::missing_identifier(&token)),
                    TokenKind::Word => return Err(ParsingError::trailing_input(&token)),
                }
            };

            let (action, next_state) = state.step(&token, true)?;
            match action {
                Action::AddChild => {
                    let child = tree.add_child(cursor, token.into_text(), SkillType::Unlabeled);
                    stack.push(child);
                }
                Action::AssignType(skill_type) => {
                    tree.set_skill_type(cursor, skill_type);
                    stack.pop();
                }
                Action::Ascend => {
                    stack.pop();
                }
                Action::OpenChildren | Action::CreateRoot => {}
            }
            state = next_state;
        }

        self.check_end_of_input(&tree, &stack, state, end)?;
        debug!(nodes = tree.num_nodes(), leaves = tree.num_leaves(), "parsed skill tree");
        Ok(tree)
    }

    /// Checks that nothing was left open at end of input, according to the
    /// brace policy.
    fn check_end_of_input(
        &self,
        tree: &SkillTree,
        stack: &[NodeIndex],
        state: ParserState,
        end: usize,
    ) -> Result<(), ParsingError> {
        let Some(&cursor) = stack.last() else {
            return Ok(());
        };
        let identifier = tree[cursor].identifier();

        if state == ParserState::ExpectChildrenOrType {
            if self.brace_policy == BracePolicy::Strict {
                return Err(ParsingError::unexpected_eof(end));
            }
            warn!(node = identifier, "input ended before child list or type of node");
        }

        let open = if state == ParserState::ExpectChildrenOrType {
            stack.len() - 1
        } else {
            stack.len()
        };
        if open > 0 {
            if self.brace_policy == BracePolicy::Strict {
                return Err(ParsingError::unbalanced_braces(
                    end,
                    format!("{open} child list(s) not closed at end of input"),
                ));
            }
            warn!(open, "input ended with unclosed child lists");
        }

        Ok(())
    }
}

// =#========================================================================#=
// TESTS
// =#========================================================================#=
#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParsingErrorType;

    fn word(text: &str) -> Token {
        Token::word(text.to_string(), 0)
    }

    fn brace(text: &str) -> Token {
        Tokenizer::for_str(text).next().unwrap().unwrap()
    }

    #[test]
    fn test_step_expect_identifier() {
        use ParserState::*;
        assert_eq!(
            ExpectIdentifier.step(&word("ROOT"), false),
            Ok((Action::CreateRoot, ExpectChildrenOrType))
        );
        assert_eq!(
            ExpectIdentifier.step(&word("N0"), true),
            Ok((Action::AddChild, ExpectChildrenOrType))
        );
        assert_eq!(
            ExpectIdentifier.step(&brace("}"), true),
            Ok((Action::Ascend, ExpectIdentifier))
        );
        // A leading '}' names the root, as long as the policy lets it through
        assert_eq!(
            ExpectIdentifier.step(&brace("}"), false),
            Ok((Action::CreateRoot, ExpectChildrenOrType))
        );
        let err = ExpectIdentifier.step(&brace("{"), true).unwrap_err();
        assert_eq!(err.kind(), &ParsingErrorType::MissingIdentifier);
    }

    #[test]
    fn test_step_expect_children_or_type() {
        use ParserState::*;
        assert_eq!(
            ExpectChildrenOrType.step(&brace("{"), true),
            Ok((Action::OpenChildren, ExpectIdentifier))
        );
        assert_eq!(
            ExpectChildrenOrType.step(&word("ROBOT"), true),
            Ok((Action::AssignType(SkillType::Robot), ExpectIdentifier))
        );
        let err = ExpectChildrenOrType.step(&brace("}"), true).unwrap_err();
        assert_eq!(err.kind(), &ParsingErrorType::IllegalType("}".to_string()));
    }

    #[test]
    fn test_single_typed_root() {
        let tree = SkillTreeParser::new()
            .with_allocator(NodeIdAllocator::new())
            .parse_str("Solo human")
            .unwrap();
        assert_eq!(tree.num_nodes(), 1);
        assert_eq!(tree.root().skill_type(), SkillType::Human);
    }

    #[test]
    fn test_empty_input() {
        let err = SkillTreeParser::new().parse_str("  \n ").unwrap_err();
        assert_eq!(err.kind(), &ParsingErrorType::UnexpectedEof);
    }

    #[test]
    fn test_defaults() {
        let parser = SkillTreeParser::default();
        assert_eq!(parser.brace_policy(), BracePolicy::Strict);
        assert!(parser.allocator().shares_counter_with(&NodeIdAllocator::shared()));
    }
}
