//! Splitting input into tokens.
//!
//! The skill tree format knows only three kinds of tokens: words separated by
//! whitespace, and the braces `{` and `}`. Braces always form a token of their
//! own, even when written directly next to a word (`N0{` is `N0` then `{`).
//! There is no quoting, escaping, or comment syntax.

use crate::parser::byte_source::{ByteSource, InMemoryByteSource};
use crate::parser::parsing_error::ParsingError;

const OPEN_BRACE: u8 = b'{';
const CLOSE_BRACE: u8 = b'}';

/// Kind of a [Token].
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum TokenKind {
    /// `{`, opens a child list
    OpenBrace,
    /// `}`, closes a child list
    CloseBrace,
    /// Anything else: an identifier or a type keyword
    Word,
}

// =#========================================================================#=
// TOKEN
// =#========================================================================#=
/// A single token together with the byte span it was read from.
///
/// The span refers to the raw input. It can differ from the length of
/// [text](Token::text) when invalid UTF-8 was replaced during decoding.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Token {
    kind: TokenKind,
    text: String,
    position: usize,
    end: usize,
}

impl Token {
    /// Creates a word token spanning `text.len()` bytes from `position`.
    pub fn word(text: String, position: usize) -> Self {
        let end = position + text.len();
        Self::word_spanning(text, position, end)
    }

    fn word_spanning(text: String, position: usize, end: usize) -> Self {
        Token {
            kind: TokenKind::Word,
            text,
            position,
            end,
        }
    }

    fn brace(byte: u8, position: usize) -> Self {
        let kind = if byte == OPEN_BRACE {
            TokenKind::OpenBrace
        } else {
            TokenKind::CloseBrace
        };
        Token {
            kind,
            text: char::from(byte).to_string(),
            position,
            end: position + 1,
        }
    }

    /// Returns the kind of this token.
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Returns the text of this token (`"{"` or `"}"` for braces).
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the byte offset of the first character of this token.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the byte offset just past the last byte of this token.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Returns `true` for `{`.
    pub fn is_open_brace(&self) -> bool {
        self.kind == TokenKind::OpenBrace
    }

    /// Returns `true` for `}`.
    pub fn is_close_brace(&self) -> bool {
        self.kind == TokenKind::CloseBrace
    }

    /// Consumes the token, returning its text.
    pub fn into_text(self) -> String {
        self.text
    }
}

// =#========================================================================#=
// TOKENIZER
// =#========================================================================#=
/// Lazy iterator over the [Token]s of a [ByteSource].
///
/// Yields `Err` once if the source fails to read, and nothing afterwards.
/// A tokenizer cannot be restarted; it consumes its source.
///
/// # Example
/// ```
/// use skilltree::parser::Tokenizer;
///
/// let tokens: Vec<String> = Tokenizer::for_str("ROOT {A human}")
///     .map(|t| t.unwrap().into_text())
///     .collect();
/// assert_eq!(tokens, vec!["ROOT", "{", "A", "human", "}"]);
/// ```
pub struct Tokenizer<S: ByteSource> {
    source: S,
    finished: bool,
}

impl Tokenizer<InMemoryByteSource> {
    /// Creates a tokenizer over a copy of the given string.
    pub fn for_str(input: &str) -> Self {
        Self::new(InMemoryByteSource::from_str(input))
    }
}

impl<S: ByteSource> Tokenizer<S> {
    /// Creates a tokenizer consuming the given byte source.
    pub fn new(source: S) -> Self {
        Self {
            source,
            finished: false,
        }
    }

    /// Returns the current byte offset in the source.
    pub fn position(&self) -> usize {
        self.source.position()
    }

    /// Skips (consumes) all consecutive ASCII whitespace.
    fn skip_whitespace(&mut self) -> std::io::Result<()> {
        while let Some(b) = self.source.peek()? {
            if !b.is_ascii_whitespace() && b != 0x0B {
                break;
            }
            self.source.next_byte()?;
        }
        Ok(())
    }

    /// Reads the next token, or `None` at end of input.
    fn read_token(&mut self) -> std::io::Result<Option<Token>> {
        self.skip_whitespace()?;

        let position = self.source.position();
        let first = match self.source.next_byte()? {
            Some(b) => b,
            None => return Ok(None),
        };

        if first == OPEN_BRACE || first == CLOSE_BRACE {
            return Ok(Some(Token::brace(first, position)));
        }

        let mut bytes = vec![first];
        while let Some(b) = self.source.peek()? {
            if b.is_ascii_whitespace() || b == 0x0B || b == OPEN_BRACE || b == CLOSE_BRACE {
                break;
            }
            bytes.push(b);
            self.source.next_byte()?;
        }

        let text = String::from_utf8_lossy(&bytes).into_owned();
        Ok(Some(Token::word_spanning(text, position, self.source.position())))
    }
}

impl<S: ByteSource> Iterator for Tokenizer<S> {
    type Item = Result<Token, ParsingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.read_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(ParsingError::io(err, self.source.position())))
            }
        }
    }
}

impl<S: ByteSource> std::iter::FusedIterator for Tokenizer<S> {}
