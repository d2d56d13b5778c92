//! Property-based tests for the event-to-tree builder.
//!
//! These verify invariants that must hold for ANY input, not just
//! crafted examples, plus differential agreement with serde_json on
//! well-formed documents.

use larch_core::{parse, parse_with_options, ParseError, ParseOptions, Value};
use proptest::prelude::*;
use serde_json::Value as Json;

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// =============================================================================
// Test helpers
// =============================================================================

/// Structural comparison against a serde_json tree.
///
/// serde_json never produces duplicate keys and keeps map iteration
/// order stable through serialization, so entry-by-entry zip is sound.
fn assert_same(doc: &Value, json: &Json) {
    match json {
        Json::Null => assert!(doc.is_null(), "expected null, got {doc:?}"),
        Json::Bool(b) => assert_eq!(doc.as_bool(), Some(*b)),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                assert_eq!(doc.as_i64(), Some(i));
            } else {
                assert_eq!(doc.as_f64(), n.as_f64());
            }
        }
        Json::String(s) => assert_eq!(doc.as_bytes(), Some(s.as_bytes())),
        Json::Array(items) => {
            let children = doc.as_array().expect("expected array");
            assert_eq!(children.len(), items.len());
            for (child, item) in children.iter().zip(items) {
                assert_same(child, item);
            }
        }
        Json::Object(map) => {
            let entries = doc.as_object().expect("expected object");
            assert_eq!(entries.len(), map.len());
            for ((key, value), (jk, jv)) in entries.iter().zip(map) {
                assert_eq!(key.as_bytes(), Some(jk.as_bytes()));
                assert_same(value, jv);
            }
        }
    }
}

/// Arbitrary JSON documents, built as serde_json values so they can be
/// serialized to text for the parser under test.
fn arb_json() -> impl Strategy<Value = Json> {
    let leaf = prop_oneof![
        Just(Json::Null),
        any::<bool>().prop_map(Json::Bool),
        any::<i64>().prop_map(|n| serde_json::json!(n)),
        any::<f64>()
            .prop_filter("finite", |f| f.is_finite())
            .prop_map(|f| serde_json::json!(f)),
        any::<String>().prop_map(Json::String),
    ];
    leaf.prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Json::Array),
            prop::collection::vec((any::<String>(), inner), 0..8)
                .prop_map(|kvs| Json::Object(kvs.into_iter().collect())),
        ]
    })
}

// =============================================================================
// Property: never panics, never leaks control
// =============================================================================

proptest! {
    #![proptest_config(config())]

    /// The parser must never panic on any input, valid or invalid.
    #[test]
    fn parse_never_panics(input in prop::collection::vec(any::<u8>(), 0..1000)) {
        let _ = parse(&input);
    }

    /// Never panics on JSON-flavored ASCII either (more likely to get
    /// deep into the grammar than raw bytes).
    #[test]
    fn parse_never_panics_jsonish(input in r#"[\[\]{}",:0-9a-z\\ \n./*-]{0,400}"#) {
        let _ = parse(input.as_bytes());
    }

    /// Unbalanced opens of any size either hit the depth limit or the
    /// end of input; the call stack never overflows.
    #[test]
    fn open_floods_are_bounded(n in 0usize..2000) {
        let input = "[".repeat(n);
        let result = parse(&input);
        prop_assert!(result.is_err());
        if n > larch_core::DEFAULT_DEPTH_LIMIT {
            prop_assert_eq!(
                result,
                Err(ParseError::DepthLimitExceeded {
                    limit: larch_core::DEFAULT_DEPTH_LIMIT
                })
            );
        }
    }
}

// =============================================================================
// Property: agreement with serde_json on well-formed documents
// =============================================================================

proptest! {
    #![proptest_config(config())]

    /// Whatever serde_json can serialize, we parse to the same tree.
    #[test]
    fn agrees_with_serde_json(json in arb_json()) {
        let text = serde_json::to_string(&json).expect("serialize");
        // Generated documents are comment-free; parse them with the
        // strictest tokenizer settings.
        let options = ParseOptions {
            allow_comments: false,
            validate_encoding: true,
            ..ParseOptions::default()
        };
        let doc = parse_with_options(&text, &options)
            .unwrap_or_else(|e| panic!("failed on {text}: {e}"));
        assert_same(&doc, &json);
    }

    /// Parsing is deterministic: two parses of one document are
    /// structurally equal.
    #[test]
    fn parse_is_deterministic(json in arb_json()) {
        let text = serde_json::to_string(&json).expect("serialize");
        prop_assert_eq!(parse(&text).unwrap(), parse(&text).unwrap());
    }
}
