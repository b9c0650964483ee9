//! Security limits applied while decoding untrusted input.

/// Largest document either decoder accepts, in bytes.
pub const MAX_INPUT_LEN: usize = 16 * 1024 * 1024;

/// Deepest nesting of structs, lists and maps a decoder will follow.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Largest element count a list or map may declare or hold.
pub const MAX_CONTAINER_LEN: usize = 1_000_000;
