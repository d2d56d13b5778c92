//! The tokenizer capability and the event-sink contract.
//!
//! The tree builder never talks to a concrete lexer. It is driven
//! through [`Tokenizer`], an injected capability offering "feed bytes"
//! and "signal end-of-input", each of which pushes [`Event`]s into a
//! caller-supplied [`EventSink`]. This keeps the builder unit-testable
//! against synthetic event sources; [`crate::lexer::JsonLexer`] is the
//! bundled production implementation.

use std::ops::ControlFlow;

use crate::error::SyntaxError;
use crate::event::Event;

/// Configuration a caller fixes when wiring up a tokenizer.
///
/// [`crate::parse`] always passes `{ allow_comments: true,
/// validate_encoding: false }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizerOptions {
    /// Permit `//` and `/* */` comments between tokens.
    pub allow_comments: bool,
    /// Validate that string contents are well-formed UTF-8.
    pub validate_encoding: bool,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            allow_comments: true,
            validate_encoding: false,
        }
    }
}

/// Receiver for tokenizer events.
///
/// Returning `ControlFlow::Break(())` instructs the tokenizer to stop
/// immediately; no further events may be delivered for this document.
/// Cancellation is binary - there is no resumption.
pub trait EventSink {
    fn on_event(&mut self, event: Event<'_>) -> ControlFlow<()>;
}

/// A streaming tokenizer over one document.
///
/// Contract: for syntactically valid input the emitted open/close
/// events are well nested; for invalid input the tokenizer returns
/// `Err` instead of emitting further events. If the sink breaks, the
/// tokenizer stops delivering events and both methods return `Ok` -
/// the sink already knows why it stopped.
pub trait Tokenizer {
    /// Feed a chunk of input, emitting events into `sink`.
    fn feed(&mut self, input: &[u8], sink: &mut dyn EventSink) -> Result<(), SyntaxError>;

    /// Signal end-of-input, flushing any remaining events.
    fn finish(&mut self, sink: &mut dyn EventSink) -> Result<(), SyntaxError>;
}

/// Adapt a closure into an [`EventSink`].
pub struct FnSink<F>(pub F);

impl<F> EventSink for FnSink<F>
where
    F: FnMut(Event<'_>) -> ControlFlow<()>,
{
    fn on_event(&mut self, event: Event<'_>) -> ControlFlow<()> {
        (self.0)(event)
    }
}
