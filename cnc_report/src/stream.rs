//! Byte-stream writer consumed by every report.
//!
//! The transport is ordered and blocking; a report never observes partial
//! writes. Adapters exist for in-memory buffers and for any `io::Write`.

use std::fmt;
use std::io;

use tracing::warn;

/// Output stream for protocol text.
pub trait StreamWriter {
    /// Write a string fragment.
    fn write(&mut self, s: &str);

    /// Formatted write, so `write!(out, ...)` works on any stream.
    fn write_fmt(&mut self, args: fmt::Arguments<'_>) {
        if let Some(s) = args.as_str() {
            self.write(s);
        } else {
            let _ = fmt::write(&mut FmtAdapter(self), args);
        }
    }
}

struct FmtAdapter<'a, W: ?Sized>(&'a mut W);

impl<W: StreamWriter + ?Sized> fmt::Write for FmtAdapter<'_, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write(s);
        Ok(())
    }
}

impl StreamWriter for String {
    fn write(&mut self, s: &str) {
        self.push_str(s);
    }
}

impl StreamWriter for Vec<u8> {
    fn write(&mut self, s: &str) {
        self.extend_from_slice(s.as_bytes());
    }
}

impl<W: StreamWriter + ?Sized> StreamWriter for &mut W {
    fn write(&mut self, s: &str) {
        (**self).write(s);
    }
}

/// Adapter from [`io::Write`] to [`StreamWriter`].
///
/// The protocol layer has no way to act on a transport failure, so the first
/// error is logged and kept; later writes are dropped until it is taken.
pub struct IoStream<W: io::Write> {
    inner: W,
    error: Option<io::Error>,
}

impl<W: io::Write> IoStream<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, error: None }
    }

    /// Take the pending transport error, resuming output.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> StreamWriter for IoStream<W> {
    fn write(&mut self, s: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.inner.write_all(s.as_bytes()) {
            warn!(error = %e, "stream write failed, dropping output");
            self.error = Some(e);
        }
    }
}
