//! bdecode - A bencode decoder
//!
//! Reads bencoded data (the format of `.torrent` files, tracker responses and
//! DHT messages) from any byte source into a generic [`Value`] tree, or fails
//! with a [`BencodeError`] located at the offending byte.
//!
//! # Modules
//!
//! - [`bencode`] - BEP-3 Bencode decoding
//! - [`constants`] - Default limits

pub mod bencode;
pub mod constants;

pub use bencode::{decode, parse, BencodeError, DecoderConfig, ErrorKind, Value};
