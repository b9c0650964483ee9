//! Text sink for the tagged-text encoder, plus error-message helpers.

use std::fmt;

/// Short excerpt of unexpected input for error messages.
pub(crate) fn preview(text: &str) -> String {
    text.chars().take(16).collect()
}

/// Append-only text accumulator.
#[derive(Debug, Clone, Default)]
pub struct TextWriter {
    buf: String,
}

impl TextWriter {
    /// Creates a new empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new writer with the given capacity in bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: String::with_capacity(capacity),
        }
    }

    /// Appends text.
    #[inline]
    pub fn append(&mut self, text: &str) {
        self.buf.push_str(text);
    }

    /// Appends a single character.
    #[inline]
    pub fn push(&mut self, c: char) {
        self.buf.push(c);
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Consumes the writer and returns the accumulated text.
    pub fn into_string(self) -> String {
        self.buf
    }

    /// Returns the number of bytes written.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl fmt::Write for TextWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buf.push_str(s);
        Ok(())
    }
}
