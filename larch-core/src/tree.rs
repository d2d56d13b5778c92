//! Tree construction from parse events.
//!
//! Nested objects and arrays are built with an explicit stack of
//! frames. When a container opens, an empty frame is pushed; completed
//! values are routed into the top frame (or the root slot) by
//! [`TreeBuilder::add_value`]; when the container closes, its frame is
//! popped and materialized into a [`Value`], which is then routed like
//! any other completed value.
//!
//! A frame accumulates children directly and only becomes a `Value` at
//! close time, so there is never an allocated-but-unlinked container
//! shell to lose track of. On any abort the builder still owns every
//! frame and every accumulated child, and dropping it releases them
//! all exactly once.

use std::ops::ControlFlow;

use crate::error::ParseError;
use crate::event::Event;
use crate::tokenizer::EventSink;
use crate::value::{Number, Value};

/// Default maximum nesting depth for open containers.
///
/// Bounds both construction stack growth and the recursion depth of
/// dropping a finished tree.
pub const DEFAULT_DEPTH_LIMIT: usize = 512;

/// One open container on the construction stack.
#[derive(Debug)]
enum Frame {
    /// Array in progress: accumulated children, in order.
    Array(Vec<Value>),
    /// Object in progress: accumulated entries plus at most one key
    /// waiting for its value.
    Object {
        entries: Vec<(Value, Value)>,
        pending_key: Option<Value>,
    },
}

impl Frame {
    /// Turn a finished frame into its container value, in frame order.
    ///
    /// A pending key with no value (possible only from a malformed
    /// synthetic event sequence) is dropped with the frame.
    fn into_value(self) -> Value {
        match self {
            Frame::Array(items) => Value::Array(items),
            Frame::Object { entries, .. } => Value::Object(entries),
        }
    }
}

/// Construction context for one document.
///
/// Create one per parse, drive it with events (it implements
/// [`EventSink`]), then call [`finish`](TreeBuilder::finish) to extract
/// the root. The first failure is latched: subsequent events are
/// ignored and the sink keeps answering `Break`.
#[derive(Debug)]
pub struct TreeBuilder {
    stack: Vec<Frame>,
    root: Option<Value>,
    depth_limit: usize,
    error: Option<ParseError>,
}

impl TreeBuilder {
    /// Create an empty builder with the given nesting limit.
    pub fn new(depth_limit: usize) -> Self {
        TreeBuilder {
            stack: Vec::new(),
            root: None,
            depth_limit,
            error: None,
        }
    }

    /// Open a new array frame.
    pub fn open_array(&mut self) -> Result<(), ParseError> {
        self.check_depth()?;
        self.stack.push(Frame::Array(Vec::new()));
        Ok(())
    }

    /// Open a new object frame.
    pub fn open_object(&mut self) -> Result<(), ParseError> {
        self.check_depth()?;
        self.stack.push(Frame::Object {
            entries: Vec::new(),
            pending_key: None,
        });
        Ok(())
    }

    /// Pop the top frame and materialize it into a container value.
    pub fn close_current(&mut self) -> Result<Value, ParseError> {
        match self.stack.pop() {
            Some(frame) => Ok(frame.into_value()),
            None => Err(ParseError::UnmatchedClose),
        }
    }

    /// Route a completed value to its destination.
    ///
    /// Three destinations are possible: the root slot when no container
    /// is open, the key slot or entry list of an open object, or the
    /// child list of an open array.
    pub fn add_value(&mut self, value: Value) -> Result<(), ParseError> {
        match self.stack.last_mut() {
            None => {
                if self.root.is_some() {
                    return Err(ParseError::MultipleRoots);
                }
                self.root = Some(value);
                Ok(())
            }
            Some(Frame::Object {
                entries,
                pending_key,
            }) => {
                match pending_key.take() {
                    None => {
                        if !matches!(value, Value::String(_)) {
                            return Err(ParseError::NonStringKey);
                        }
                        *pending_key = Some(value);
                    }
                    Some(key) => entries.push((key, value)),
                }
                Ok(())
            }
            Some(Frame::Array(items)) => {
                items.push(value);
                Ok(())
            }
        }
    }

    /// The first failure recorded while handling events, if any.
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Consume the builder, yielding the sole root value.
    ///
    /// Fails if a handler failed, a container is still open, or no
    /// value was ever produced. Every remaining frame and accumulated
    /// value is released here regardless of outcome.
    pub fn finish(mut self) -> Result<Value, ParseError> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        if !self.stack.is_empty() {
            return Err(ParseError::UnterminatedContainer);
        }
        self.root.take().ok_or(ParseError::EmptyDocument)
    }

    fn check_depth(&self) -> Result<(), ParseError> {
        if self.stack.len() >= self.depth_limit {
            return Err(ParseError::DepthLimitExceeded {
                limit: self.depth_limit,
            });
        }
        Ok(())
    }

    fn handle(&mut self, event: Event<'_>) -> Result<(), ParseError> {
        match event {
            Event::Null { .. } => self.add_value(Value::Null),
            Event::Bool { value, .. } => self.add_value(Value::Bool(value)),
            Event::Number { raw, .. } => {
                self.add_value(Value::Number(Number::from_literal(raw)))
            }
            Event::String { value, .. } => {
                self.add_value(Value::String(value.into_owned()))
            }
            Event::StartObject { .. } => self.open_object(),
            Event::StartArray { .. } => self.open_array(),
            // Close, then route the finished container as if it were
            // any other completed value.
            Event::EndObject { .. } | Event::EndArray { .. } => {
                let container = self.close_current()?;
                self.add_value(container)
            }
        }
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH_LIMIT)
    }
}

impl EventSink for TreeBuilder {
    fn on_event(&mut self, event: Event<'_>) -> ControlFlow<()> {
        if self.error.is_some() {
            return ControlFlow::Break(());
        }
        match self.handle(event) {
            Ok(()) => ControlFlow::Continue(()),
            Err(err) => {
                self.error = Some(err);
                ControlFlow::Break(())
            }
        }
    }
}
