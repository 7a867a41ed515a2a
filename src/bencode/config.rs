use crate::constants::{DEFAULT_BUFFER_CAPACITY, DEFAULT_MAX_DEPTH};

/// How dictionary keys are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyEncoding {
    /// Keys must be valid UTF-8.
    #[default]
    Utf8,
    /// Keys are arbitrary bytes compared byte-wise.
    Raw,
}

/// Limits and grammar policy for a single parse.
///
/// The defaults match the historical behaviour of the format's reference
/// decoders: zero-length strings are rejected, integers are read leniently and
/// dictionary keys must be text.
///
/// # Examples
///
/// ```
/// use bdecode::bencode::{decode_with, DecoderConfig, KeyEncoding};
///
/// let config = DecoderConfig::default()
///     .with_max_depth(8)
///     .with_empty_strings(true)
///     .with_key_encoding(KeyEncoding::Raw);
///
/// let value = decode_with(b"d0:0:e", &config).unwrap();
/// assert_eq!(value.get(b"").and_then(|v| v.as_bytes()).map(|b| b.len()), Some(0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Deepest container nesting accepted before failing with `DepthExceeded`.
    pub max_depth: usize,
    /// Accept `0:` as an empty byte string.
    pub allow_empty_strings: bool,
    /// Reject integers with leading zeros and `-0`.
    pub strict_integers: bool,
    /// Validation applied to dictionary keys.
    pub key_encoding: KeyEncoding,
    /// Largest declared byte string length accepted, if bounded.
    pub max_string_len: Option<usize>,
    /// Capacity of the buffer placed in front of unbuffered readers.
    pub buffer_capacity: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            allow_empty_strings: false,
            strict_integers: false,
            key_encoding: KeyEncoding::Utf8,
            max_string_len: None,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

impl DecoderConfig {
    /// Accepts the full BEP-3 grammar: empty strings and arbitrary key bytes.
    pub fn permissive() -> Self {
        Self {
            allow_empty_strings: true,
            key_encoding: KeyEncoding::Raw,
            ..Self::default()
        }
    }

    /// Sets the maximum nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enables or disables zero-length byte strings.
    pub fn with_empty_strings(mut self, allow: bool) -> Self {
        self.allow_empty_strings = allow;
        self
    }

    /// Enables or disables canonical integer checking.
    pub fn with_strict_integers(mut self, strict: bool) -> Self {
        self.strict_integers = strict;
        self
    }

    /// Sets how dictionary keys are validated.
    pub fn with_key_encoding(mut self, encoding: KeyEncoding) -> Self {
        self.key_encoding = encoding;
        self
    }

    /// Caps the declared length of any byte string.
    pub fn with_max_string_len(mut self, max: usize) -> Self {
        self.max_string_len = Some(max);
        self
    }

    /// Sets the read buffer capacity used by [`parse_with`](super::parse_with).
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity.max(1);
        self
    }
}
