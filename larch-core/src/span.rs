//! Byte spans into the input stream.

/// A half-open byte range `[start, end)` into the tokenizer's input.
///
/// Spans are informational: the builder never inspects them, but every
/// event carries one so that sinks (and error reports) can point back
/// at the source bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length of the span in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
