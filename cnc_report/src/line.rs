//! Line assembler: fixed-capacity scratch buffer for report fragments.
//!
//! Backed by `heapless::String`, so assembling a field never touches the
//! heap. Writes past capacity are truncated; callers must not assume an
//! unbounded field width.

use std::fmt;

use cnc_common::consts::LINE_BUFFER_SIZE;
use heapless::String;

/// Reusable single-line scratch buffer.
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    inner: String<LINE_BUFFER_SIZE>,
}

impl LineBuffer {
    pub const fn new() -> Self {
        Self {
            inner: String::new(),
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.inner.as_str()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Append as much of `s` as fits.
    pub fn push_str(&mut self, s: &str) {
        if self.inner.push_str(s).is_err() {
            for c in s.chars() {
                if self.inner.push(c).is_err() {
                    break;
                }
            }
        }
    }

    #[inline]
    pub fn push(&mut self, c: char) {
        let _ = self.inner.push(c);
    }

    /// Append a value rendered with `Display`.
    pub fn push_display(&mut self, value: impl fmt::Display) {
        // write_str below never fails
        let _ = fmt::write(self, format_args!("{value}"));
    }

    /// Append `value` with exactly `decimals` fractional digits.
    ///
    /// Negative zero prints as zero.
    pub fn push_fixed(&mut self, value: f32, decimals: usize) {
        let value = if value == 0.0 { 0.0 } else { value };
        let _ = fmt::write(self, format_args!("{value:.decimals$}"));
    }

    /// Replace the contents with the concatenation of `parts`.
    pub fn assemble(&mut self, parts: &[&str]) -> &str {
        self.clear();
        for part in parts {
            self.push_str(part);
        }
        self.as_str()
    }
}

impl fmt::Write for LineBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
}

impl AsRef<str> for LineBuffer {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
