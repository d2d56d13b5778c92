//! Parse events - the contract between a tokenizer and the tree builder.
//!
//! This is a SAX-style event model: events are emitted as the tokenizer
//! encounters tokens, with no accumulation. Structure is represented by
//! start/end event pairs.
//!
//! For arrays: StartArray, value events..., EndArray
//! For objects: StartObject, then alternating key and value events, EndObject
//!
//! Object keys are delivered as ordinary [`Event::String`] events; the
//! builder decides from its own state whether a string fills a key slot
//! or a value slot.

use std::borrow::Cow;

use crate::span::Span;

/// Streaming parse events.
///
/// The lifetime `'a` refers to the tokenizer's input buffer - number and
/// string payloads are borrowed from it where possible. A string that
/// required unescaping arrives as an owned `Cow`.
///
/// ## Event sequences
///
/// `{"a": [1, null]}` emits:
/// ```text
/// StartObject
/// String("a")          // key slot
/// StartArray
/// Number("1")
/// Null
/// EndArray
/// EndObject
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Event<'a> {
    /// Literal `null`.
    Null { span: Span },

    /// Literal `true` or `false`.
    Bool { value: bool, span: Span },

    /// Numeric literal, delivered as the verbatim source text.
    ///
    /// The builder derives the integer and floating interpretations
    /// itself; the tokenizer never pre-parses numbers.
    Number { raw: &'a [u8], span: Span },

    /// String content with escapes already resolved.
    ///
    /// Reused verbatim for object keys.
    String { value: Cow<'a, [u8]>, span: Span },

    /// Object start: `{`
    StartObject { span: Span },

    /// Object end: `}`
    EndObject { span: Span },

    /// Array start: `[`
    StartArray { span: Span },

    /// Array end: `]`
    EndArray { span: Span },
}

impl<'a> Event<'a> {
    /// Get the span for this event.
    pub fn span(&self) -> Span {
        match self {
            Event::Null { span } => *span,
            Event::Bool { span, .. } => *span,
            Event::Number { span, .. } => *span,
            Event::String { span, .. } => *span,
            Event::StartObject { span } => *span,
            Event::EndObject { span } => *span,
            Event::StartArray { span } => *span,
            Event::EndArray { span } => *span,
        }
    }

    /// Check if this is a scalar value event (not structure).
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Event::Null { .. }
                | Event::Bool { .. }
                | Event::Number { .. }
                | Event::String { .. }
        )
    }

    /// Check if this event opens a container.
    pub fn is_container_start(&self) -> bool {
        matches!(self, Event::StartObject { .. } | Event::StartArray { .. })
    }

    /// Check if this event closes a container.
    pub fn is_container_end(&self) -> bool {
        matches!(self, Event::EndObject { .. } | Event::EndArray { .. })
    }
}
