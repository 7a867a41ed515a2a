//! Decoding of literal documents through the public API.

use std::collections::BTreeMap;
use std::io::{Seek, SeekFrom, Write};

use bdecode::bencode::{parse_with, Decoder, DecoderConfig, ErrorKind, Value};
use bdecode::{decode, parse};
use bytes::Bytes;

fn s(v: &str) -> Value {
    Value::from(v)
}

fn dict<const N: usize>(entries: [(&str, Value); N]) -> Value {
    let map: BTreeMap<Bytes, Value> = entries
        .into_iter()
        .map(|(k, v)| (Bytes::copy_from_slice(k.as_bytes()), v))
        .collect();
    Value::Dict(map)
}

#[test]
fn integers() {
    assert_eq!(parse(&b"i1234e"[..]).unwrap(), Value::Integer(1234));
    assert_eq!(parse(&b"i-3e"[..]).unwrap(), Value::Integer(-3));
}

#[test]
fn byte_strings() {
    assert_eq!(parse(&b"4:spam"[..]).unwrap(), s("spam"));
}

#[test]
fn lists() {
    assert_eq!(
        parse(&b"l4:spam4:eggse"[..]).unwrap(),
        Value::List(vec![s("spam"), s("eggs")])
    );
    assert_eq!(parse(&b"le"[..]).unwrap(), Value::List(Vec::new()));
}

#[test]
fn dictionaries() {
    assert_eq!(
        parse(&b"d3:cow3:moo4:spam4:eggse"[..]).unwrap(),
        dict([("cow", s("moo")), ("spam", s("eggs"))])
    );
    assert_eq!(parse(&b"de"[..]).unwrap(), Value::Dict(BTreeMap::new()));
}

#[test]
fn nested() {
    assert_eq!(
        parse(&b"ld3:fooli1234eee3:bare"[..]).unwrap(),
        Value::List(vec![
            dict([("foo", Value::List(vec![Value::Integer(1234)]))]),
            s("bar"),
        ])
    );
}

#[test]
fn invalid_prefix() {
    let err = parse(&b"x"[..]).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidPrefix(b'x')));
    assert_eq!(err.offset(), 0);
}

#[test]
fn short_payload() {
    let err = parse(&b"3:ab"[..]).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::UnexpectedEnd));
    assert_eq!(err.offset(), 4);
}

#[test]
fn torrent_file_on_disk() {
    let pieces = [0xabu8; 40];
    let mut data = Vec::new();
    data.extend_from_slice(b"d8:announce31:http://tracker.example/announce4:infod");
    data.extend_from_slice(b"5:filesld6:lengthi100e4:pathl5:a.txteed6:lengthi7e4:pathl3:dir5:b.txteee");
    data.extend_from_slice(b"4:name7:example12:piece lengthi16384e6:pieces40:");
    data.extend_from_slice(&pieces);
    data.extend_from_slice(b"ee");

    let mut file = tempfile::tempfile().unwrap();
    file.write_all(&data).unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();

    let torrent = parse(file).unwrap();
    assert_eq!(
        torrent.get_str("announce").and_then(Value::as_str),
        Some("http://tracker.example/announce")
    );

    let info = torrent.get_str("info").unwrap();
    assert_eq!(info.get_str("name").and_then(Value::as_str), Some("example"));
    assert_eq!(
        info.get_str("piece length").and_then(Value::as_integer),
        Some(16384)
    );
    assert_eq!(
        info.get_str("pieces").and_then(Value::as_bytes).map(|b| &b[..]),
        Some(&pieces[..])
    );

    let files = info.get_str("files").and_then(Value::as_list).unwrap();
    let lengths: Vec<_> = files
        .iter()
        .filter_map(|f| f.get_str("length").and_then(Value::as_integer))
        .collect();
    assert_eq!(lengths, vec![100, 7]);
    assert_eq!(
        files[1].get_str("path").and_then(Value::as_list),
        Some(&[s("dir"), s("b.txt")][..])
    );
}

#[test]
fn truncated_file_reports_end() {
    let mut file = tempfile::tempfile().unwrap();
    file.write_all(b"d4:infod4:name7:exam").unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();

    let err = parse_with(file, &DecoderConfig::default().with_buffer_capacity(4)).unwrap_err();
    assert!(err.is_unexpected_end());
    assert_eq!(err.offset(), 20);
    assert!(err.to_string().contains("(in .info.name)"));
}

#[test]
fn concatenated_messages() {
    let stream = b"d1:ti1ee d1:ti2ee";
    let mut decoder = Decoder::new(&stream[..]);

    assert_eq!(
        decoder.next_value().unwrap(),
        Some(dict([("t", Value::Integer(1))]))
    );
    let err = decoder.next_value().unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidPrefix(b' ')));
    assert_eq!(err.offset(), 8);
}

#[test]
fn whole_buffer_must_be_consumed() {
    assert!(decode(b"4:spam").is_ok());
    let err = decode(b"4:spami1e").unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::TrailingData));
    assert_eq!(err.offset(), 6);
}
