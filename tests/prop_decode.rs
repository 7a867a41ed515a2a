//! Property tests for the decoder.
//!
//! Arbitrary input must never panic and must always produce the same result.
//! Generated documents must decode to a tree mirroring how they were built.

use std::collections::BTreeMap;

use bdecode::bencode::{decode, decode_with, DecoderConfig, ErrorKind, Value};
use bytes::Bytes;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        any::<i64>().prop_map(Value::Integer),
        prop::collection::vec(any::<u8>(), 1..24).prop_map(|b| Value::Bytes(Bytes::from(b))),
    ];
    leaf.prop_recursive(6, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::List),
            prop::collection::btree_map("[a-z ]{1,8}", inner, 0..6).prop_map(|m| {
                Value::Dict(
                    m.into_iter()
                        .map(|(k, v)| (Bytes::from(k.into_bytes()), v))
                        .collect::<BTreeMap<_, _>>(),
                )
            }),
        ]
    })
}

/// Bytes that look enough like bencode to reach deep into the scanner.
fn arb_noise() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        prop_oneof![
            Just(b'i'),
            Just(b'l'),
            Just(b'd'),
            Just(b'e'),
            Just(b':'),
            Just(b'-'),
            (b'0'..=b'9'),
            any::<u8>(),
        ],
        0..64,
    )
}

/// Writes the document a value was decoded from. Dictionary keys come out in
/// sorted order, which the decoder does not require but accepts.
fn write_document(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::Integer(i) => out.extend_from_slice(format!("i{i}e").as_bytes()),
        Value::Bytes(b) => write_bytes(b, out),
        Value::List(items) => {
            out.push(b'l');
            for item in items {
                write_document(item, out);
            }
            out.push(b'e');
        }
        Value::Dict(entries) => {
            out.push(b'd');
            for (key, item) in entries {
                write_bytes(key, out);
                write_document(item, out);
            }
            out.push(b'e');
        }
    }
}

fn write_bytes(b: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(format!("{}:", b.len()).as_bytes());
    out.extend_from_slice(b);
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn decode_mirrors_document_structure(value in arb_value()) {
        let mut doc = Vec::new();
        write_document(&value, &mut doc);
        prop_assert_eq!(decode(&doc).unwrap(), value);
    }

    #[test]
    fn arbitrary_input_is_deterministic(data in arb_noise()) {
        let config = DecoderConfig::permissive().with_max_depth(8);
        match (decode_with(&data, &config), decode_with(&data, &config)) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(a), Err(b)) => {
                prop_assert_eq!(a.offset(), b.offset());
                prop_assert_eq!(a.to_string(), b.to_string());
                prop_assert!(a.offset() <= data.len() as u64);
            }
            _ => prop_assert!(false, "results differ for {:?}", data),
        }
    }

    #[test]
    fn truncation_is_reported_at_the_cut(value in arb_value(), cut in any::<prop::sample::Index>()) {
        let mut doc = Vec::new();
        write_document(&value, &mut doc);
        let cut = cut.index(doc.len());

        let err = decode(&doc[..cut]).unwrap_err();
        prop_assert!(matches!(err.kind(), ErrorKind::UnexpectedEnd), "{}", err);
        prop_assert_eq!(err.offset(), cut as u64);
    }
}
