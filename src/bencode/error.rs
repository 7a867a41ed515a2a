use std::fmt;

use bytes::Bytes;
use thiserror::Error;

use crate::constants::{MAX_ERROR_KEY_LEN, MAX_ERROR_PATH};

/// A decoding failure, located at the byte offset where it was detected.
///
/// Every failure aborts the whole parse; the error is the only thing the
/// caller receives. Besides the offset and the [`ErrorKind`], the error
/// records the chain of containers it unwound through, so a message can
/// point at `[2].info.files` instead of just a number.
///
/// # Examples
///
/// ```
/// use bdecode::bencode::{decode, ErrorKind};
///
/// let err = decode(b"l4:spamxe").unwrap_err();
/// assert_eq!(err.offset(), 7);
/// assert!(matches!(err.kind(), ErrorKind::InvalidPrefix(b'x')));
/// assert_eq!(err.to_string(), "bencode: parse error at byte 7 (in [1]): invalid prefix byte 'x'");
/// ```
#[derive(Debug, Error)]
#[error("bencode: parse error at byte {offset}{}: {kind}", path_suffix(.path, .elided))]
pub struct BencodeError {
    offset: u64,
    /// Already part of the message, so not exposed as `source()`.
    kind: ErrorKind,
    /// Innermost segment first.
    path: Vec<PathSegment>,
    elided: usize,
}

/// The cause of a [`BencodeError`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The source ran out before a delimiter or a declared byte count.
    #[error("unexpected end of input")]
    UnexpectedEnd,

    /// The run between `i` and `e` is not a (canonical) signed integer.
    #[error("invalid integer {0:?}")]
    InvalidInteger(String),

    /// The run before `:` is not an acceptable string length.
    #[error("invalid string length {0:?}")]
    InvalidStringLength(String),

    /// The byte does not start any value.
    #[error("invalid prefix byte {}", display_byte(.0))]
    InvalidPrefix(u8),

    /// A dictionary key does not start with a length digit.
    #[error("dictionary key must be a byte string, found {}", display_byte(.0))]
    InvalidKey(u8),

    /// A dictionary key is not valid UTF-8.
    #[error("dictionary key is not valid UTF-8")]
    NonUtf8Key,

    /// A declared string length exceeds the configured maximum.
    #[error("string length {len} exceeds limit of {max} bytes")]
    StringTooLong { len: u64, max: usize },

    /// Containers are nested deeper than the configured maximum.
    #[error("nesting deeper than {0} levels")]
    DepthExceeded(usize),

    /// Bytes remain after the top-level value.
    #[error("trailing data after value")]
    TrailingData,

    /// The underlying reader failed.
    #[error("io error: {0}")]
    Io(#[source] std::io::Error),
}

/// One container level on the way down to a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Position inside a list.
    Index(usize),
    /// Key inside a dictionary, truncated for display.
    Key(Bytes),
}

impl BencodeError {
    pub(crate) fn new(offset: u64, kind: ErrorKind) -> Self {
        Self {
            offset,
            kind,
            path: Vec::new(),
            elided: 0,
        }
    }

    /// Records the container the error is unwinding out of.
    pub(crate) fn within(mut self, segment: PathSegment) -> Self {
        if self.path.len() < MAX_ERROR_PATH {
            let segment = match segment {
                PathSegment::Key(key) if key.len() > MAX_ERROR_KEY_LEN => {
                    PathSegment::Key(key.slice(..MAX_ERROR_KEY_LEN))
                }
                other => other,
            };
            self.path.push(segment);
        } else {
            self.elided += 1;
        }
        self
    }

    /// Absolute byte offset at which the failure was detected.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// The cause of the failure.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Consumes the error and returns its cause.
    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }

    /// Containers enclosing the failure, outermost first.
    ///
    /// At most [`MAX_ERROR_PATH`] segments are kept; see
    /// [`elided`](Self::elided) for how many outer levels were dropped.
    pub fn path(&self) -> impl Iterator<Item = &PathSegment> {
        self.path.iter().rev()
    }

    /// Number of outer container levels not recorded in [`path`](Self::path).
    pub fn elided(&self) -> usize {
        self.elided
    }

    /// Returns `true` if the input was truncated.
    pub fn is_unexpected_end(&self) -> bool {
        matches!(self.kind, ErrorKind::UnexpectedEnd)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(i) => write!(f, "[{i}]"),
            PathSegment::Key(key) => write!(f, ".{}", key.escape_ascii()),
        }
    }
}

fn path_suffix(path: &[PathSegment], elided: &usize) -> String {
    if path.is_empty() {
        return String::new();
    }
    let mut out = String::from(" (in ");
    if *elided > 0 {
        out.push_str("...");
    }
    for segment in path.iter().rev() {
        out.push_str(&segment.to_string());
    }
    out.push(')');
    out
}

struct DisplayByte(u8);

fn display_byte(byte: &u8) -> DisplayByte {
    DisplayByte(*byte)
}

impl fmt::Display for DisplayByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_ascii_graphic() {
            write!(f, "'{}'", self.0 as char)
        } else {
            write!(f, "0x{:02x}", self.0)
        }
    }
}
