//! Bencode decoding ([BEP-3]).
//!
//! Bencode is the serialization format used throughout BitTorrent for storing
//! and transmitting structured data, including `.torrent` files and tracker
//! responses. Every value is self-delimiting, so a document can be read
//! without a schema.
//!
//! # Data Types
//!
//! Bencode supports four data types:
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Integer | `i<number>e` | `i42e` → 42 |
//! | Byte String | `<length>:<data>` | `4:spam` → "spam" |
//! | List | `l<items>e` | `l4:spami42ee` → ["spam", 42] |
//! | Dictionary | `d<key><value>...e` | `d3:foo3:bare` → {"foo": "bar"} |
//!
//! # Examples
//!
//! ## Decoding from a reader
//!
//! ```
//! use bdecode::bencode::{parse, Value};
//!
//! let value = parse(&b"ld3:fooli1234eee3:bare"[..]).unwrap();
//!
//! let list = value.as_list().unwrap();
//! let foo = list[0].get_str("foo").and_then(Value::as_list).unwrap();
//! assert_eq!(foo, &[Value::Integer(1234)]);
//! assert_eq!(list[1].as_str(), Some("bar"));
//! ```
//!
//! ## Decoding a file
//!
//! ```no_run
//! use std::fs::File;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let torrent = bdecode::bencode::parse(File::open("example.torrent")?)?;
//! if let Some(announce) = torrent.get_str("announce").and_then(|v| v.as_str()) {
//!     println!("tracker: {announce}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Adjusting limits
//!
//! ```
//! use bdecode::bencode::{decode_with, DecoderConfig, ErrorKind};
//!
//! let config = DecoderConfig::default().with_max_depth(2);
//! let err = decode_with(b"llleee", &config).unwrap_err();
//! assert!(matches!(err.kind(), ErrorKind::DepthExceeded(2)));
//! assert_eq!(err.offset(), 2);
//! ```
//!
//! # Error Handling
//!
//! Decoding stops at the first problem and returns a [`BencodeError`] carrying
//! the byte offset and an [`ErrorKind`]:
//!
//! - [`ErrorKind::UnexpectedEnd`] - Input ended unexpectedly
//! - [`ErrorKind::InvalidInteger`] - Malformed integer
//! - [`ErrorKind::InvalidStringLength`] - Malformed or zero string length
//! - [`ErrorKind::InvalidPrefix`] - Byte that starts no value
//! - [`ErrorKind::DepthExceeded`] - Recursion limit exceeded (64 levels by default)
//! - [`ErrorKind::Io`] - The underlying reader failed
//!
//! No partial tree is ever returned.
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod config;
mod cursor;
mod decode;
mod error;
mod value;

pub use config::{DecoderConfig, KeyEncoding};
pub use cursor::ByteCursor;
pub use decode::{decode, decode_with, parse, parse_with, Decoder};
pub use error::{BencodeError, ErrorKind, PathSegment};
pub use value::{Value, ValueKind};
