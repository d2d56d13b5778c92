//! Error types for document-tree construction.

use thiserror::Error;

use crate::span::Span;

/// Errors returned by [`crate::parse`] and the tree builder.
///
/// Structural variants mean the event sequence was lexically fine but
/// violated tree-construction rules; `Syntax` forwards a tokenizer
/// failure without interpreting it. Every failure is terminal for the
/// current parse - nothing is retried, and everything built so far is
/// released before the error is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The tokenizer rejected the input.
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    /// An object key slot received something other than a string.
    #[error("object keys must be strings")]
    NonStringKey,

    /// A close event arrived with no open container.
    #[error("unmatched close with no open container")]
    UnmatchedClose,

    /// A second top-level value arrived after the root was set.
    #[error("multiple top-level values")]
    MultipleRoots,

    /// End of input with no value produced.
    #[error("empty document")]
    EmptyDocument,

    /// End of input with containers still open.
    #[error("unterminated container at end of input")]
    UnterminatedContainer,

    /// An open event would exceed the configured nesting limit.
    #[error("nesting depth limit of {limit} exceeded")]
    DepthLimitExceeded { limit: usize },
}

/// A failure reported by a tokenizer.
///
/// The builder treats this as opaque; `kind` and `offset` exist for
/// diagnostics only.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{kind} at byte {offset}")]
pub struct SyntaxError {
    /// Byte offset into the input where the failure was detected.
    pub offset: usize,
    pub kind: SyntaxErrorKind,
}

impl SyntaxError {
    pub fn new(kind: SyntaxErrorKind, offset: usize) -> Self {
        Self { offset, kind }
    }

    /// The span of the offending byte.
    pub fn span(&self) -> Span {
        Span::new(self.offset, self.offset + 1)
    }
}

/// Failure codes for the bundled lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SyntaxErrorKind {
    /// A byte that cannot start or continue the expected token.
    UnexpectedCharacter = 0,
    /// Input ended inside a token or an open container.
    UnexpectedEof,
    /// String literal without a closing quote.
    UnterminatedString,
    /// Raw control character (< 0x20) inside a string literal.
    ControlCharacterInString,
    /// Malformed `\` escape, including lone surrogates.
    InvalidEscape,
    /// Malformed numeric literal.
    InvalidNumber,
    /// Block comment without a closing `*/`.
    UnterminatedComment,
    /// String content failed encoding validation.
    InvalidUtf8,
}

impl SyntaxErrorKind {
    /// Get a human-readable message for this error code.
    pub fn message(self) -> &'static str {
        match self {
            Self::UnexpectedCharacter => "unexpected character",
            Self::UnexpectedEof => "unexpected end of input",
            Self::UnterminatedString => "unterminated string",
            Self::ControlCharacterInString => "control character in string",
            Self::InvalidEscape => "invalid escape",
            Self::InvalidNumber => "invalid number",
            Self::UnterminatedComment => "unterminated comment",
            Self::InvalidUtf8 => "invalid utf-8 in string",
        }
    }
}

impl std::fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}
