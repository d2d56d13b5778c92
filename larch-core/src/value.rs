//! Owned document values.
//!
//! A [`Value`] exclusively owns its descendants: objects own their keys
//! and values, arrays own their children, strings own their bytes. There
//! are no shared or back references anywhere in a tree, so dropping the
//! root releases every node exactly once, in post-order, with no cycle
//! handling required. Construction-time depth limiting (see
//! [`crate::tree`]) keeps that recursion bounded.

/// A node in a parsed document tree.
///
/// Object entries preserve insertion order and duplicate keys are kept
/// as separate entries, in arrival order. Keys produced by the builder
/// are always the `String` variant, but the representation does not
/// force it - entries are plain `(Value, Value)` pairs.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Literal `null`.
    Null,

    /// Literal `true` or `false`.
    Bool(bool),

    /// Numeric literal with its derived interpretations.
    Number(Number),

    /// String content as owned bytes.
    ///
    /// Bytes, not `String`: encoding validation belongs to the
    /// tokenizer and is off by default, so content is not guaranteed
    /// to be UTF-8.
    String(Vec<u8>),

    /// Ordered children.
    Array(Vec<Value>),

    /// Ordered `(key, value)` entries, duplicates retained.
    Object(Vec<(Value, Value)>),
}

impl Value {
    /// Check if this is a null value.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to get as boolean.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the integer interpretation of a number.
    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// Try to get the floating interpretation of a number.
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Try to get the full number.
    #[inline]
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Try to get string content as bytes.
    #[inline]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get string content as UTF-8 text.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => std::str::from_utf8(s).ok(),
            _ => None,
        }
    }

    /// Try to get array children.
    #[inline]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Try to get object entries.
    #[inline]
    pub fn as_object(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Object(entries) => Some(entries),
            _ => None,
        }
    }
}

/// A numeric literal with its two independent interpretations.
///
/// `raw` is always the verbatim literal bytes from the source. The
/// integer interpretation is present iff the entire text parses as a
/// base-10 `i64` without overflow; the floating interpretation iff the
/// entire text parses as a finite `f64` (overflow to infinity and
/// underflow to zero both leave it absent). Both, either, or neither
/// may be present - a conforming tokenizer never emits a literal that
/// both parsers reject, but the builder does not assume it.
#[derive(Debug, Clone, PartialEq)]
pub struct Number {
    raw: Vec<u8>,
    int: Option<i64>,
    double: Option<f64>,
}

impl Number {
    /// Derive both interpretations from a literal.
    ///
    /// Never fails: unparseable content just leaves both
    /// interpretations absent.
    pub fn from_literal(raw: &[u8]) -> Self {
        let (int, double) = match std::str::from_utf8(raw) {
            Ok(text) => (text.parse::<i64>().ok(), float_interpretation(text)),
            Err(_) => (None, None),
        };
        Number {
            raw: raw.to_vec(),
            int,
            double,
        }
    }

    /// The verbatim literal bytes.
    #[inline]
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Integer interpretation, if the whole literal is a base-10 `i64`.
    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        self.int
    }

    /// Floating interpretation, if the whole literal parses as a
    /// finite `f64`.
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        self.double
    }
}

/// Strict whole-text float parse with range checking.
///
/// `str::parse::<f64>` saturates out-of-range magnitudes to infinity
/// and rounds underflows to zero; neither counts as a valid floating
/// interpretation of the literal. Subnormal results are kept.
fn float_interpretation(text: &str) -> Option<f64> {
    let value: f64 = text.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    if value == 0.0 {
        // A nonzero mantissa that parsed to zero underflowed.
        let mantissa = text.splitn(2, |c| c == 'e' || c == 'E').next()?;
        if mantissa.bytes().any(|b| (b'1'..=b'9').contains(&b)) {
            return None;
        }
    }
    Some(value)
}
