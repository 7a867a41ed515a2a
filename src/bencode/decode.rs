use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Read};

use bytes::Bytes;
use tracing::{debug, trace};

use super::config::{DecoderConfig, KeyEncoding};
use super::cursor::ByteCursor;
use super::error::{BencodeError, ErrorKind, PathSegment};
use super::value::Value;
use crate::constants::MAX_NUMBER_LEN;

/// Decodes one value from `reader` using the default configuration.
///
/// Exactly one value is decoded; anything after it is ignored. Use a
/// [`Decoder`] over a `BufRead` to keep reading the same stream. An empty
/// source fails with `UnexpectedEnd` at offset 0.
///
/// # Examples
///
/// ```
/// use bdecode::bencode::{parse, Value};
///
/// let value = parse(&b"l4:spam4:eggse"[..]).unwrap();
/// assert_eq!(value, Value::List(vec!["spam".into(), "eggs".into()]));
/// ```
pub fn parse<R: Read>(reader: R) -> Result<Value, BencodeError> {
    parse_with(reader, &DecoderConfig::default())
}

/// Decodes one value from `reader` with an explicit configuration.
pub fn parse_with<R: Read>(reader: R, config: &DecoderConfig) -> Result<Value, BencodeError> {
    let reader = BufReader::with_capacity(config.buffer_capacity, reader);
    Decoder::with_config(reader, config.clone()).decode_value()
}

/// Decodes a complete in-memory document.
///
/// Unlike [`parse`], the whole slice must be a single value; leftover bytes
/// fail with `TrailingData`.
pub fn decode(data: &[u8]) -> Result<Value, BencodeError> {
    decode_with(data, &DecoderConfig::default())
}

/// Decodes a complete in-memory document with an explicit configuration.
pub fn decode_with(data: &[u8], config: &DecoderConfig) -> Result<Value, BencodeError> {
    let mut decoder = Decoder::with_config(data, config.clone());
    let value = decoder.decode_value()?;

    if !decoder.cursor.is_at_end()? {
        return Err(decoder.cursor.error(ErrorKind::TrailingData));
    }
    Ok(value)
}

/// Recursive-descent decoder over a buffered source.
///
/// A `Decoder` can pull several top-level values out of one stream, e.g. a
/// log of concatenated messages:
///
/// ```
/// use bdecode::bencode::{Decoder, Value};
///
/// let mut decoder = Decoder::new(&b"i1ei2e"[..]);
/// assert_eq!(decoder.next_value().unwrap(), Some(Value::Integer(1)));
/// assert_eq!(decoder.next_value().unwrap(), Some(Value::Integer(2)));
/// assert_eq!(decoder.next_value().unwrap(), None);
/// ```
pub struct Decoder<R> {
    cursor: ByteCursor<R>,
    config: DecoderConfig,
}

impl<R: BufRead> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, DecoderConfig::default())
    }

    pub fn with_config(reader: R, config: DecoderConfig) -> Self {
        Self {
            cursor: ByteCursor::new(reader),
            config,
        }
    }

    /// Offset of the next unread byte.
    pub fn offset(&self) -> u64 {
        self.cursor.offset()
    }

    /// Decodes the next value from the stream.
    pub fn decode_value(&mut self) -> Result<Value, BencodeError> {
        let start = self.cursor.offset();
        trace!(offset = start, "decoding bencode value");

        match self.value(0) {
            Ok(value) => {
                trace!(
                    offset = start,
                    consumed = self.cursor.offset() - start,
                    kind = %value.kind(),
                    "decoded bencode value"
                );
                Ok(value)
            }
            Err(e) => {
                debug!(offset = e.offset(), error = %e.kind(), "bencode decoding failed");
                Err(e)
            }
        }
    }

    /// Decodes the next value, or returns `None` at a clean end of input.
    pub fn next_value(&mut self) -> Result<Option<Value>, BencodeError> {
        if self.cursor.is_at_end()? {
            return Ok(None);
        }
        self.decode_value().map(Some)
    }

    pub fn into_inner(self) -> R {
        self.cursor.into_inner()
    }

    fn value(&mut self, depth: usize) -> Result<Value, BencodeError> {
        match self.cursor.peek_byte()? {
            b'i' => self.integer().map(Value::Integer),
            b'1'..=b'9' => self.byte_string().map(Value::Bytes),
            b'0' if self.config.allow_empty_strings => self.byte_string().map(Value::Bytes),
            b'l' => self.list(depth + 1),
            b'd' => self.dict(depth + 1),
            c => Err(self.cursor.error(ErrorKind::InvalidPrefix(c))),
        }
    }

    fn integer(&mut self) -> Result<i64, BencodeError> {
        self.cursor.next_byte()?;
        let start = self.cursor.offset();
        let run = self.number_run(b'e')?;

        if let Some(i) = find_invalid_integer(&run.digits, self.config.strict_integers) {
            return Err(BencodeError::new(
                run.offset_of(start, i),
                ErrorKind::InvalidInteger(lossy(&run.digits)),
            ));
        }
        if !run.complete {
            return Err(BencodeError::new(
                start,
                ErrorKind::InvalidInteger(lossy(&run.digits)),
            ));
        }

        // Only ASCII digits and a sign are left, so this fails on overflow alone.
        lossy(&run.digits)
            .parse()
            .map_err(|_| BencodeError::new(start, ErrorKind::InvalidInteger(lossy(&run.digits))))
    }

    fn byte_string(&mut self) -> Result<Bytes, BencodeError> {
        let start = self.cursor.offset();
        let run = self.number_run(b':')?;

        if let Some(i) = run.digits.iter().position(|b| !b.is_ascii_digit()) {
            return Err(BencodeError::new(
                run.offset_of(start, i),
                ErrorKind::InvalidStringLength(lossy(&run.digits)),
            ));
        }
        if !run.complete {
            return Err(BencodeError::new(
                start,
                ErrorKind::InvalidStringLength(lossy(&run.digits)),
            ));
        }

        let len: u64 = lossy(&run.digits).parse().map_err(|_| {
            BencodeError::new(start, ErrorKind::InvalidStringLength(lossy(&run.digits)))
        })?;

        if len == 0 && !self.config.allow_empty_strings {
            return Err(BencodeError::new(
                start,
                ErrorKind::InvalidStringLength(lossy(&run.digits)),
            ));
        }
        if let Some(max) = self.config.max_string_len {
            if len > max as u64 {
                return Err(BencodeError::new(start, ErrorKind::StringTooLong { len, max }));
            }
        }

        let len = usize::try_from(len).map_err(|_| {
            BencodeError::new(start, ErrorKind::InvalidStringLength(lossy(&run.digits)))
        })?;
        self.cursor.read_exact(len)
    }

    fn list(&mut self, depth: usize) -> Result<Value, BencodeError> {
        self.enter(depth)?;
        self.cursor.next_byte()?;
        let mut list = Vec::new();

        while self.cursor.peek_byte()? != b'e' {
            let index = list.len();
            let item = self
                .value(depth)
                .map_err(|e| e.within(PathSegment::Index(index)))?;
            list.push(item);
        }

        self.cursor.next_byte()?;
        Ok(Value::List(list))
    }

    fn dict(&mut self, depth: usize) -> Result<Value, BencodeError> {
        self.enter(depth)?;
        self.cursor.next_byte()?;
        let mut dict = BTreeMap::new();

        loop {
            let c = self.cursor.peek_byte()?;
            if c == b'e' {
                break;
            }
            if !c.is_ascii_digit() {
                return Err(self.cursor.error(ErrorKind::InvalidKey(c)));
            }

            let key = self.byte_string()?;
            if self.config.key_encoding == KeyEncoding::Utf8 && std::str::from_utf8(&key).is_err() {
                let key_start = self.cursor.offset() - key.len() as u64;
                return Err(BencodeError::new(key_start, ErrorKind::NonUtf8Key));
            }

            let value = self
                .value(depth)
                .map_err(|e| e.within(PathSegment::Key(key.clone())))?;
            dict.insert(key, value);
        }

        self.cursor.next_byte()?;
        Ok(Value::Dict(dict))
    }

    fn enter(&self, depth: usize) -> Result<(), BencodeError> {
        if depth > self.config.max_depth {
            return Err(self.cursor.error(ErrorKind::DepthExceeded(self.config.max_depth)));
        }
        Ok(())
    }

    /// Reads a digit run and its delimiter, returning the run without it.
    ///
    /// Leading zeros beyond the first are dropped as they are read, so padded
    /// numbers decode while the buffered run stays bounded. A run that is
    /// still longer than any valid number is cut short and marked incomplete.
    fn number_run(&mut self, delim: u8) -> Result<NumberRun, BencodeError> {
        let cap = MAX_NUMBER_LEN + 1;
        let mut digits = Vec::new();
        let mut skipped = 0u64;

        loop {
            let chunk = self.cursor.read_until_within(delim, cap - digits.len())?;
            digits.extend_from_slice(&chunk);
            if digits.last() == Some(&delim) {
                digits.pop();
                return Ok(NumberRun {
                    digits,
                    skipped,
                    complete: true,
                });
            }

            let sign = usize::from(digits.first() == Some(&b'-'));
            let zeros = digits[sign..].iter().take_while(|&&b| b == b'0').count();
            if zeros < 2 {
                return Ok(NumberRun {
                    digits,
                    skipped,
                    complete: false,
                });
            }
            digits.drain(sign + 1..sign + zeros);
            skipped += (zeros - 1) as u64;
        }
    }
}

/// A digit run with its redundant leading zeros removed.
struct NumberRun {
    digits: Vec<u8>,
    /// Zeros dropped right after the first kept digit.
    skipped: u64,
    /// Whether the delimiter was reached.
    complete: bool,
}

impl NumberRun {
    /// Maps an index in `digits` back to an absolute offset.
    fn offset_of(&self, start: u64, i: usize) -> u64 {
        let sign = usize::from(self.digits.first() == Some(&b'-'));
        if i > sign {
            start + i as u64 + self.skipped
        } else {
            start + i as u64
        }
    }
}

/// Returns the index of the first byte that makes `run` an invalid integer,
/// or `None` if only a range check remains.
fn find_invalid_integer(run: &[u8], strict: bool) -> Option<usize> {
    let digits_start = usize::from(run.first() == Some(&b'-'));
    let digits = &run[digits_start..];

    if digits.is_empty() {
        return Some(run.len());
    }
    if let Some(i) = digits.iter().position(|b| !b.is_ascii_digit()) {
        return Some(digits_start + i);
    }
    if strict && digits[0] == b'0' && (digits.len() > 1 || digits_start == 1) {
        // Leading zero, or negative zero.
        return Some(digits_start);
    }
    None
}

fn lossy(run: &[u8]) -> String {
    String::from_utf8_lossy(run).into_owned()
}
