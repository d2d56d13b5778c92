//! larch core
//!
//! Builds fully-owned JSON document trees from streaming parse events.
//! The tree builder consumes SAX-style events (null / bool / number /
//! string / start-object / end-object / start-array / end-array) with
//! no lookahead, composing values through an explicit stack of open
//! container frames.
//!
//! # Architecture
//!
//! - **event.rs** - the borrowed Event enum shared by tokenizers and sinks
//! - **tree.rs** - frame stack, event routing, TreeBuilder
//! - **value.rs** - owned Value / Number document model
//! - **tokenizer.rs** - Tokenizer / EventSink capability traits
//! - **lexer.rs** - bundled JSON tokenizer (comments, optional UTF-8 checks)
//! - **span.rs** - byte spans
//! - **error.rs** - error taxonomy
//!
//! # Example
//!
//! ```
//! use larch_core::parse;
//!
//! let doc = parse(br#"{"a": 1, "a": 2.5} // duplicate keys are kept"#).unwrap();
//! let entries = doc.as_object().unwrap();
//! assert_eq!(entries.len(), 2);
//! assert_eq!(entries[0].1.as_i64(), Some(1));
//! assert_eq!(entries[1].1.as_f64(), Some(2.5));
//! ```

pub mod error;
pub mod event;
pub mod lexer;
pub mod span;
pub mod tokenizer;
pub mod tree;
pub mod value;

pub use error::{ParseError, SyntaxError, SyntaxErrorKind};
pub use event::Event;
pub use lexer::JsonLexer;
pub use span::Span;
pub use tokenizer::{EventSink, FnSink, Tokenizer, TokenizerOptions};
pub use tree::{TreeBuilder, DEFAULT_DEPTH_LIMIT};
pub use value::{Number, Value};

/// Per-parse configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Permit `//` and `/* */` comments between tokens.
    pub allow_comments: bool,
    /// Validate that string contents are well-formed UTF-8.
    pub validate_encoding: bool,
    /// Maximum nesting depth of open containers.
    pub depth_limit: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            allow_comments: true,
            validate_encoding: false,
            depth_limit: DEFAULT_DEPTH_LIMIT,
        }
    }
}

impl ParseOptions {
    fn tokenizer_options(&self) -> TokenizerOptions {
        TokenizerOptions {
            allow_comments: self.allow_comments,
            validate_encoding: self.validate_encoding,
        }
    }
}

/// Parse one document with the bundled tokenizer and default options
/// (comments permitted, encoding validation off).
///
/// Returns the sole root value, or the first error. On failure every
/// partially built frame and value has already been released.
pub fn parse(input: impl AsRef<[u8]>) -> Result<Value, ParseError> {
    parse_with_options(input, &ParseOptions::default())
}

/// Parse one document with explicit options.
pub fn parse_with_options(
    input: impl AsRef<[u8]>,
    options: &ParseOptions,
) -> Result<Value, ParseError> {
    let lexer = JsonLexer::new(options.tokenizer_options());
    parse_events(lexer, input.as_ref(), options)
}

/// Drive any [`Tokenizer`] over a fresh builder.
///
/// This is the seam the unit tests use to feed synthetic event
/// sequences; [`parse`] goes through it with the bundled lexer. The
/// builder and its frame stack live only for this call - there is no
/// shared or process-wide state.
pub fn parse_events<T: Tokenizer>(
    mut tokenizer: T,
    input: &[u8],
    options: &ParseOptions,
) -> Result<Value, ParseError> {
    let mut builder = TreeBuilder::new(options.depth_limit);

    // A handler failure makes the sink break and the tokenizer return
    // Ok early; the builder's own error then wins in finish(). A
    // tokenizer failure is terminal on its own.
    tokenizer.feed(input, &mut builder)?;
    if builder.error().is_none() {
        tokenizer.finish(&mut builder)?;
    }
    builder.finish()
}
