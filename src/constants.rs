//! Decoder limits and tuning parameters.
//!
//! These are the defaults behind [`DecoderConfig`](crate::bencode::DecoderConfig).
//! Callers that need different bounds override them per parse rather than
//! changing these values.

// ============================================================================
// Nesting
// ============================================================================

/// Default maximum container nesting depth.
///
/// The top-level value sits at depth 0, so `l` at the top level opens depth 1.
pub const DEFAULT_MAX_DEPTH: usize = 64;

// ============================================================================
// Buffering
// ============================================================================

/// Capacity of the `BufReader` wrapped around unbuffered sources.
pub const DEFAULT_BUFFER_CAPACITY: usize = 8 * 1024;

/// Longest digit run accepted for an integer or a string length.
///
/// `i64::MIN` is 20 characters including the sign; the slack only exists so
/// that over-long runs are reported as invalid numbers instead of as a
/// missing delimiter.
pub const MAX_NUMBER_LEN: usize = 32;

// ============================================================================
// Diagnostics
// ============================================================================

/// Maximum number of container segments recorded in an error path.
pub const MAX_ERROR_PATH: usize = 16;

/// Maximum number of key bytes kept in a single error path segment.
pub const MAX_ERROR_KEY_LEN: usize = 32;
