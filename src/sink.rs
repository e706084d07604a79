//! Tee destinations and the descriptor capability probe.
//!
//! A [`TeeSink`] is anywhere live-mirrored output can go. Whether the
//! descriptor fast path may be used is a capability of the sink, probed
//! through [`TeeSink::descriptor`], never a check against a concrete type:
//! any writer backed by a real descriptor qualifies, and any writer without
//! one (an in-memory buffer, a test capture) falls back to pipe capture.

use std::fs::File;
use std::io::{self, Write};

#[cfg(unix)]
use std::os::fd::AsRawFd;
#[cfg(windows)]
use std::os::windows::io::AsRawHandle;

/// Raw OS descriptor type used for redirection capability probing.
#[cfg(unix)]
pub type RawDescriptor = std::os::fd::RawFd;
/// Raw OS descriptor type used for redirection capability probing.
#[cfg(windows)]
pub type RawDescriptor = std::os::windows::io::RawHandle;

/// Destination for live-mirrored command output.
pub trait TeeSink: Write {
    /// The OS descriptor backing this sink, when there is one.
    ///
    /// Returning `Some` means the OS can redirect child output onto the
    /// sink directly. The returned descriptor must stay open for as long
    /// as the sink itself is borrowed.
    fn descriptor(&self) -> Option<RawDescriptor> {
        None
    }
}

impl TeeSink for io::Stdout {
    fn descriptor(&self) -> Option<RawDescriptor> {
        #[cfg(unix)]
        {
            Some(self.as_raw_fd())
        }
        #[cfg(windows)]
        {
            Some(self.as_raw_handle())
        }
    }
}

impl TeeSink for io::Stderr {
    fn descriptor(&self) -> Option<RawDescriptor> {
        #[cfg(unix)]
        {
            Some(self.as_raw_fd())
        }
        #[cfg(windows)]
        {
            Some(self.as_raw_handle())
        }
    }
}

impl TeeSink for File {
    fn descriptor(&self) -> Option<RawDescriptor> {
        #[cfg(unix)]
        {
            Some(self.as_raw_fd())
        }
        #[cfg(windows)]
        {
            Some(self.as_raw_handle())
        }
    }
}

impl TeeSink for Vec<u8> {}

/// In-memory sink with no OS descriptor.
///
/// Stands in for callers whose stdout has been replaced by a plain writer;
/// routing output here must select the pipe strategy, not fail.
#[derive(Debug, Default)]
pub struct BufferSink {
    buf: Vec<u8>,
}

impl BufferSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything mirrored so far, decoded best-effort.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf).into_owned()
    }

    /// Raw mirrored bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the sink and return the mirrored bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

impl Write for BufferSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl TeeSink for BufferSink {}
