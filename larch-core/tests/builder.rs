//! Builder tests driven by a synthetic event source.
//!
//! The tree builder is wired to tokenizers only through the Tokenizer
//! trait, so these tests replay hand-written event sequences without
//! any lexer involved. This is where structural errors that a real
//! lexer would mask (non-string keys, unmatched closes) get exercised,
//! along with abort behavior at every event position.

use std::borrow::Cow;

use larch_core::{
    parse_events, Event, EventSink, ParseError, ParseOptions, Span, SyntaxError,
    SyntaxErrorKind, Tokenizer, Value,
};
use pretty_assertions::assert_eq;

/// Owned event description, turned into borrowed `Event`s on replay.
#[derive(Debug, Clone)]
enum Ev {
    Null,
    Bool(bool),
    Number(&'static [u8]),
    String(&'static [u8]),
    StartObject,
    EndObject,
    StartArray,
    EndArray,
}

impl Ev {
    fn to_event(&self) -> Event<'_> {
        let span = Span::default();
        match self {
            Ev::Null => Event::Null { span },
            Ev::Bool(b) => Event::Bool { value: *b, span },
            Ev::Number(raw) => Event::Number { raw: *raw, span },
            Ev::String(s) => Event::String {
                value: Cow::Borrowed(*s),
                span,
            },
            Ev::StartObject => Event::StartObject { span },
            Ev::EndObject => Event::EndObject { span },
            Ev::StartArray => Event::StartArray { span },
            Ev::EndArray => Event::EndArray { span },
        }
    }
}

/// A tokenizer that replays a fixed event sequence, ignoring input.
struct Replay(Vec<Ev>);

impl Tokenizer for Replay {
    fn feed(&mut self, _input: &[u8], sink: &mut dyn EventSink) -> Result<(), SyntaxError> {
        for ev in &self.0 {
            if sink.on_event(ev.to_event()).is_break() {
                return Ok(());
            }
        }
        Ok(())
    }

    fn finish(&mut self, _sink: &mut dyn EventSink) -> Result<(), SyntaxError> {
        Ok(())
    }
}

/// A tokenizer that fails with a syntax error after some events.
struct FailAfter(Vec<Ev>, SyntaxError);

impl Tokenizer for FailAfter {
    fn feed(&mut self, _input: &[u8], sink: &mut dyn EventSink) -> Result<(), SyntaxError> {
        for ev in &self.0 {
            if sink.on_event(ev.to_event()).is_break() {
                return Ok(());
            }
        }
        Err(self.1)
    }

    fn finish(&mut self, _sink: &mut dyn EventSink) -> Result<(), SyntaxError> {
        Ok(())
    }
}

fn run(events: Vec<Ev>) -> Result<Value, ParseError> {
    parse_events(Replay(events), b"", &ParseOptions::default())
}

#[test]
fn scalar_root_from_events() {
    assert_eq!(run(vec![Ev::Bool(true)]).unwrap(), Value::Bool(true));
}

#[test]
fn container_root_from_events() {
    let doc = run(vec![
        Ev::StartObject,
        Ev::String(b"k"),
        Ev::Number(b"7"),
        Ev::EndObject,
    ])
    .unwrap();
    let entries = doc.as_object().unwrap();
    assert_eq!(entries[0].0.as_str(), Some("k"));
    assert_eq!(entries[0].1.as_i64(), Some(7));
}

#[test]
fn non_string_key_from_events() {
    // `{1: 2}` as an event sequence; a real lexer rejects this before
    // the builder ever sees it.
    let result = run(vec![
        Ev::StartObject,
        Ev::Number(b"1"),
        Ev::Number(b"2"),
        Ev::EndObject,
    ]);
    assert_eq!(result, Err(ParseError::NonStringKey));
}

#[test]
fn container_key_is_also_rejected() {
    let result = run(vec![Ev::StartObject, Ev::StartArray, Ev::EndArray]);
    assert_eq!(result, Err(ParseError::NonStringKey));
}

#[test]
fn unmatched_close_from_events() {
    assert_eq!(run(vec![Ev::EndObject]), Err(ParseError::UnmatchedClose));
    assert_eq!(
        run(vec![Ev::StartArray, Ev::EndArray, Ev::EndArray]),
        Err(ParseError::UnmatchedClose)
    );
}

#[test]
fn multiple_roots_from_events() {
    assert_eq!(
        run(vec![Ev::Null, Ev::Null]),
        Err(ParseError::MultipleRoots)
    );
}

#[test]
fn empty_event_stream() {
    assert_eq!(run(vec![]), Err(ParseError::EmptyDocument));
}

#[test]
fn unterminated_container_from_events() {
    assert_eq!(
        run(vec![Ev::StartArray, Ev::Null]),
        Err(ParseError::UnterminatedContainer)
    );
}

#[test]
fn number_interpretations_survive_event_transport() {
    let doc = run(vec![Ev::Number(b"10")]).unwrap();
    let n = doc.as_number().unwrap();
    assert_eq!((n.as_i64(), n.as_f64()), (Some(10), Some(10.0)));

    // Pathological literal a conforming tokenizer would never emit.
    let doc = run(vec![Ev::Number(b"bogus")]).unwrap();
    let n = doc.as_number().unwrap();
    assert_eq!((n.as_i64(), n.as_f64()), (None, None));
    assert_eq!(n.raw(), b"bogus");
}

#[test]
fn tokenizer_syntax_failure_is_forwarded() {
    let err = SyntaxError::new(SyntaxErrorKind::UnexpectedEof, 3);
    let result = parse_events(
        FailAfter(vec![Ev::StartArray, Ev::Null], err),
        b"",
        &ParseOptions::default(),
    );
    assert_eq!(result, Err(ParseError::Syntax(err)));
}

#[test]
fn builder_error_stops_the_tokenizer() {
    // The close with no open container aborts; the Replay source must
    // observe the break and stop, so the trailing Null is never routed
    // and the first error is the one reported.
    let result = run(vec![Ev::EndArray, Ev::Null, Ev::Null]);
    assert_eq!(result, Err(ParseError::UnmatchedClose));
}

#[test]
fn every_strict_prefix_of_a_document_fails_cleanly() {
    let events = vec![
        Ev::StartObject,
        Ev::String(b"items"),
        Ev::StartArray,
        Ev::Number(b"1"),
        Ev::String(b"two"),
        Ev::StartObject,
        Ev::String(b"deep"),
        Ev::Null,
        Ev::EndObject,
        Ev::EndArray,
        Ev::EndObject,
    ];
    assert!(run(events.clone()).is_ok());
    for len in 0..events.len() {
        let result = run(events[..len].to_vec());
        assert!(
            result.is_err(),
            "prefix of {len} events unexpectedly produced {result:?}"
        );
    }
}
