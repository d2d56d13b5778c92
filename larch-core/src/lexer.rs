//! Bundled JSON tokenizer.
//!
//! One implementation of the [`Tokenizer`] capability: a single-pass,
//! iterative scanner over a buffered document. It validates the token
//! grammar (punctuation placement, string key positions, literal
//! shapes) and emits [`Event`]s; everything about the document *tree*
//! (root counting, key routing, nesting limits) is the sink's concern.
//!
//! Nesting is tracked with an explicit context stack rather than
//! recursion, so input depth alone can never overflow the call stack -
//! a depth-limiting sink decides when to stop.
//!
//! The lexer buffers fed chunks and scans once at end-of-input. It is
//! built for the one-document-per-parse contract, not for incremental
//! event delivery mid-stream.

use std::borrow::Cow;
use std::ops::ControlFlow;

use memchr::{memchr, memchr2};

use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::event::Event;
use crate::span::Span;
use crate::tokenizer::{EventSink, Tokenizer, TokenizerOptions};

/// Streaming JSON lexer over one document.
#[derive(Debug)]
pub struct JsonLexer {
    options: TokenizerOptions,
    buf: Vec<u8>,
    done: bool,
}

impl JsonLexer {
    pub fn new(options: TokenizerOptions) -> Self {
        JsonLexer {
            options,
            buf: Vec::new(),
            done: false,
        }
    }
}

impl Default for JsonLexer {
    fn default() -> Self {
        Self::new(TokenizerOptions::default())
    }
}

impl Tokenizer for JsonLexer {
    fn feed(&mut self, input: &[u8], _sink: &mut dyn EventSink) -> Result<(), SyntaxError> {
        if !self.done {
            self.buf.extend_from_slice(input);
        }
        Ok(())
    }

    fn finish(&mut self, sink: &mut dyn EventSink) -> Result<(), SyntaxError> {
        if self.done {
            return Ok(());
        }
        self.done = true;
        Scanner::new(&self.buf, self.options).run(sink)
    }
}

/// Container kinds on the scanner's context stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ctx {
    Array,
    Object,
}

/// What the grammar allows at the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    /// Top level: a value, or clean end of input.
    TopValue,
    /// A value is required (after `,` in an array or after `:`).
    Value,
    /// Right after `[`: a value or `]`.
    ValueOrClose,
    /// Right after `{`: a key string or `}`.
    KeyOrClose,
    /// After `,` in an object: a key string.
    Key,
    /// After a key: `:`.
    Colon,
    /// After a value inside a container: `,` or the matching close.
    CommaOrClose,
}

struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
    options: TokenizerOptions,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a [u8], options: TokenizerOptions) -> Self {
        Scanner {
            input,
            pos: 0,
            options,
        }
    }

    fn run(&mut self, sink: &mut dyn EventSink) -> Result<(), SyntaxError> {
        let mut stack: Vec<Ctx> = Vec::new();
        let mut expect = Expect::TopValue;

        loop {
            self.skip_trivia()?;
            let byte = match self.peek() {
                Some(b) => b,
                None => {
                    if stack.is_empty() && expect == Expect::TopValue {
                        return Ok(());
                    }
                    return Err(self.fail(SyntaxErrorKind::UnexpectedEof));
                }
            };

            match expect {
                Expect::TopValue | Expect::Value | Expect::ValueOrClose => {
                    if byte == b']' && expect == Expect::ValueOrClose {
                        if self.close(sink, &mut stack, &mut expect)?.is_break() {
                            return Ok(());
                        }
                        continue;
                    }
                    match byte {
                        b'{' => {
                            let span = self.punct_span();
                            stack.push(Ctx::Object);
                            expect = Expect::KeyOrClose;
                            if sink.on_event(Event::StartObject { span }).is_break() {
                                return Ok(());
                            }
                        }
                        b'[' => {
                            let span = self.punct_span();
                            stack.push(Ctx::Array);
                            expect = Expect::ValueOrClose;
                            if sink.on_event(Event::StartArray { span }).is_break() {
                                return Ok(());
                            }
                        }
                        b'"' => {
                            let (value, span) = self.scan_string()?;
                            expect = self.after_token(&stack)?;
                            if sink.on_event(Event::String { value, span }).is_break() {
                                return Ok(());
                            }
                        }
                        b'n' => {
                            let span = self.scan_literal(b"null")?;
                            expect = self.after_token(&stack)?;
                            if sink.on_event(Event::Null { span }).is_break() {
                                return Ok(());
                            }
                        }
                        b't' => {
                            let span = self.scan_literal(b"true")?;
                            expect = self.after_token(&stack)?;
                            let event = Event::Bool { value: true, span };
                            if sink.on_event(event).is_break() {
                                return Ok(());
                            }
                        }
                        b'f' => {
                            let span = self.scan_literal(b"false")?;
                            expect = self.after_token(&stack)?;
                            let event = Event::Bool { value: false, span };
                            if sink.on_event(event).is_break() {
                                return Ok(());
                            }
                        }
                        b'-' | b'0'..=b'9' => {
                            let span = self.scan_number()?;
                            expect = self.after_token(&stack)?;
                            let raw = &self.input[span.start..span.end];
                            if sink.on_event(Event::Number { raw, span }).is_break() {
                                return Ok(());
                            }
                        }
                        _ => return Err(self.fail(SyntaxErrorKind::UnexpectedCharacter)),
                    }
                }
                Expect::KeyOrClose | Expect::Key => match byte {
                    b'"' => {
                        let (value, span) = self.scan_string()?;
                        expect = Expect::Colon;
                        if sink.on_event(Event::String { value, span }).is_break() {
                            return Ok(());
                        }
                    }
                    b'}' if expect == Expect::KeyOrClose => {
                        if self.close(sink, &mut stack, &mut expect)?.is_break() {
                            return Ok(());
                        }
                    }
                    _ => return Err(self.fail(SyntaxErrorKind::UnexpectedCharacter)),
                },
                Expect::Colon => match byte {
                    b':' => {
                        self.pos += 1;
                        expect = Expect::Value;
                    }
                    _ => return Err(self.fail(SyntaxErrorKind::UnexpectedCharacter)),
                },
                Expect::CommaOrClose => match byte {
                    b',' => {
                        self.pos += 1;
                        expect = match stack.last() {
                            Some(Ctx::Object) => Expect::Key,
                            _ => Expect::Value,
                        };
                    }
                    b'}' | b']' => {
                        if self.close(sink, &mut stack, &mut expect)?.is_break() {
                            return Ok(());
                        }
                    }
                    _ => return Err(self.fail(SyntaxErrorKind::UnexpectedCharacter)),
                },
            }
        }
    }

    /// What the grammar expects after a completed value.
    ///
    /// A top-level value must be separated from any following token by
    /// whitespace, a comment, or end of input; `true1` is a lexical
    /// error, not two values.
    fn after_token(&self, stack: &[Ctx]) -> Result<Expect, SyntaxError> {
        if !stack.is_empty() {
            return Ok(Expect::CommaOrClose);
        }
        match self.peek() {
            None | Some(b' ' | b'\t' | b'\n' | b'\r' | b'/') => Ok(Expect::TopValue),
            Some(_) => Err(self.fail(SyntaxErrorKind::UnexpectedCharacter)),
        }
    }

    /// Consume a `}` or `]` that the grammar has already positioned.
    fn close(
        &mut self,
        sink: &mut dyn EventSink,
        stack: &mut Vec<Ctx>,
        expect: &mut Expect,
    ) -> Result<ControlFlow<()>, SyntaxError> {
        let byte = self.input[self.pos];
        let span = self.punct_span();
        let matches_top = match stack.last() {
            Some(Ctx::Object) => byte == b'}',
            Some(Ctx::Array) => byte == b']',
            None => false,
        };
        if !matches_top {
            // `}` closing an array or vice versa
            self.pos -= 1;
            return Err(self.fail(SyntaxErrorKind::UnexpectedCharacter));
        }
        let ctx = stack.pop();
        *expect = self.after_token(stack)?;
        let event = match ctx {
            Some(Ctx::Object) => Event::EndObject { span },
            _ => Event::EndArray { span },
        };
        Ok(sink.on_event(event))
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Span of a single punctuation byte, consuming it.
    fn punct_span(&mut self) -> Span {
        let span = Span::new(self.pos, self.pos + 1);
        self.pos += 1;
        span
    }

    fn fail(&self, kind: SyntaxErrorKind) -> SyntaxError {
        SyntaxError::new(kind, self.pos)
    }

    fn fail_at(&self, kind: SyntaxErrorKind, offset: usize) -> SyntaxError {
        SyntaxError::new(kind, offset)
    }

    /// Skip whitespace and, when enabled, `//` and `/* */` comments.
    fn skip_trivia(&mut self) -> Result<(), SyntaxError> {
        loop {
            while let Some(b) = self.peek() {
                match b {
                    b' ' | b'\t' | b'\n' | b'\r' => self.pos += 1,
                    _ => break,
                }
            }
            if !self.options.allow_comments || self.peek() != Some(b'/') {
                return Ok(());
            }
            match self.input.get(self.pos + 1) {
                Some(b'/') => {
                    let rest = &self.input[self.pos + 2..];
                    self.pos = match memchr(b'\n', rest) {
                        Some(i) => self.pos + 2 + i + 1,
                        None => self.input.len(),
                    };
                }
                Some(b'*') => {
                    let start = self.pos;
                    let mut search = self.pos + 2;
                    loop {
                        match memchr(b'*', &self.input[search..]) {
                            Some(i) if self.input.get(search + i + 1) == Some(&b'/') => {
                                self.pos = search + i + 2;
                                break;
                            }
                            Some(i) => search += i + 1,
                            None => {
                                return Err(self.fail_at(
                                    SyntaxErrorKind::UnterminatedComment,
                                    start,
                                ))
                            }
                        }
                    }
                }
                // A bare `/` falls through to token dispatch and errors
                // there with a token-position offset.
                _ => return Ok(()),
            }
        }
    }

    /// Consume a keyword literal (`null`, `true`, `false`).
    fn scan_literal(&mut self, word: &[u8]) -> Result<Span, SyntaxError> {
        let start = self.pos;
        let end = start + word.len();
        if self.input.len() < end || &self.input[start..end] != word {
            return Err(self.fail(SyntaxErrorKind::UnexpectedCharacter));
        }
        self.pos = end;
        Ok(Span::new(start, end))
    }

    /// Consume a numeric literal, returning its span.
    ///
    /// Grammar: `-? (0 | [1-9][0-9]*) ('.' [0-9]+)? ([eE][+-]?[0-9]+)?`.
    /// The raw text is emitted verbatim; interpretation happens in the
    /// sink.
    fn scan_number(&mut self) -> Result<Span, SyntaxError> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        match self.peek() {
            Some(b'0') => {
                self.pos += 1;
                if matches!(self.peek(), Some(b'0'..=b'9')) {
                    return Err(self.fail(SyntaxErrorKind::InvalidNumber));
                }
            }
            Some(b'1'..=b'9') => self.digits(),
            _ => return Err(self.fail(SyntaxErrorKind::InvalidNumber)),
        }
        if self.peek() == Some(b'.') {
            self.pos += 1;
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(self.fail(SyntaxErrorKind::InvalidNumber));
            }
            self.digits();
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(self.fail(SyntaxErrorKind::InvalidNumber));
            }
            self.digits();
        }
        Ok(Span::new(start, self.pos))
    }

    fn digits(&mut self) {
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
    }

    /// Consume a string literal, resolving escapes.
    ///
    /// Borrows from the input when no escape occurs; otherwise builds
    /// an owned buffer. Returns the content and the span of the whole
    /// literal including quotes.
    fn scan_string(&mut self) -> Result<(Cow<'a, [u8]>, Span), SyntaxError> {
        let start = self.pos;
        self.pos += 1;
        let content_start = self.pos;
        let mut owned: Option<Vec<u8>> = None;

        loop {
            let rest = &self.input[self.pos..];
            let stop = match memchr2(b'"', b'\\', rest) {
                Some(i) => i,
                None => return Err(self.fail_at(SyntaxErrorKind::UnterminatedString, start)),
            };
            let segment = &rest[..stop];
            self.check_segment(segment)?;
            self.pos += stop;

            if self.input[self.pos] == b'"' {
                let span = Span::new(start, self.pos + 1);
                self.pos += 1;
                let content = match owned {
                    Some(mut buf) => {
                        buf.extend_from_slice(segment);
                        Cow::Owned(buf)
                    }
                    None => Cow::Borrowed(&self.input[content_start..span.end - 1]),
                };
                return Ok((content, span));
            }

            // Escape: switch to an owned buffer if not already.
            let buf = owned.get_or_insert_with(|| {
                self.input[content_start..self.pos - stop].to_vec()
            });
            buf.extend_from_slice(segment);
            self.pos += 1;
            self.scan_escape_into(buf, start)?;
        }
    }

    /// Reject control characters and, when enabled, invalid UTF-8 in a
    /// raw (escape-free) string segment.
    fn check_segment(&self, segment: &[u8]) -> Result<(), SyntaxError> {
        if let Some(i) = segment.iter().position(|&b| b < 0x20) {
            return Err(self.fail_at(
                SyntaxErrorKind::ControlCharacterInString,
                self.pos + i,
            ));
        }
        if self.options.validate_encoding && std::str::from_utf8(segment).is_err() {
            return Err(self.fail_at(SyntaxErrorKind::InvalidUtf8, self.pos));
        }
        Ok(())
    }

    /// Resolve one escape sequence (cursor is past the backslash).
    fn scan_escape_into(&mut self, buf: &mut Vec<u8>, literal_start: usize) -> Result<(), SyntaxError> {
        let escape_pos = self.pos - 1;
        let byte = match self.peek() {
            Some(b) => b,
            None => return Err(self.fail_at(SyntaxErrorKind::UnterminatedString, literal_start)),
        };
        self.pos += 1;
        match byte {
            b'"' => buf.push(b'"'),
            b'\\' => buf.push(b'\\'),
            b'/' => buf.push(b'/'),
            b'b' => buf.push(0x08),
            b'f' => buf.push(0x0c),
            b'n' => buf.push(b'\n'),
            b'r' => buf.push(b'\r'),
            b't' => buf.push(b'\t'),
            b'u' => {
                let unit = self.scan_hex4(escape_pos)?;
                let cp = match unit {
                    // High surrogate: a low surrogate escape must follow.
                    0xd800..=0xdbff => {
                        if self.peek() != Some(b'\\') || self.input.get(self.pos + 1) != Some(&b'u')
                        {
                            return Err(
                                self.fail_at(SyntaxErrorKind::InvalidEscape, escape_pos)
                            );
                        }
                        self.pos += 2;
                        let low = self.scan_hex4(escape_pos)?;
                        if !(0xdc00..=0xdfff).contains(&low) {
                            return Err(
                                self.fail_at(SyntaxErrorKind::InvalidEscape, escape_pos)
                            );
                        }
                        0x10000 + ((u32::from(unit) - 0xd800) << 10) + (u32::from(low) - 0xdc00)
                    }
                    0xdc00..=0xdfff => {
                        return Err(self.fail_at(SyntaxErrorKind::InvalidEscape, escape_pos))
                    }
                    _ => u32::from(unit),
                };
                let ch = char::from_u32(cp)
                    .ok_or_else(|| self.fail_at(SyntaxErrorKind::InvalidEscape, escape_pos))?;
                let mut utf8 = [0u8; 4];
                buf.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
            }
            _ => return Err(self.fail_at(SyntaxErrorKind::InvalidEscape, escape_pos)),
        }
        Ok(())
    }

    /// Read four hex digits of a `\u` escape.
    fn scan_hex4(&mut self, escape_pos: usize) -> Result<u16, SyntaxError> {
        let end = self.pos + 4;
        if self.input.len() < end {
            return Err(self.fail_at(SyntaxErrorKind::InvalidEscape, escape_pos));
        }
        let mut unit: u16 = 0;
        for &b in &self.input[self.pos..end] {
            let digit = match b {
                b'0'..=b'9' => b - b'0',
                b'a'..=b'f' => b - b'a' + 10,
                b'A'..=b'F' => b - b'A' + 10,
                _ => return Err(self.fail_at(SyntaxErrorKind::InvalidEscape, escape_pos)),
            };
            unit = unit << 4 | u16::from(digit);
        }
        self.pos = end;
        Ok(unit)
    }
}
