// ABOUTME: Standard stream endpoints wired to plugin container processes.
// ABOUTME: Streams are discarded, inherited from the parent, or backed by caller readers/writers.

use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Read, Write};
use std::process::Stdio;
use std::sync::Arc;

/// Where a child's stdin comes from.
#[derive(Default)]
pub enum InputStream {
    #[default]
    Null,
    Inherit,
    /// Copied into the child's stdin on a separate thread.
    ///
    /// The feeding thread is joined before the run returns. It stops at EOF
    /// or at the first write after the child closed its stdin, but a `read`
    /// that blocks forever (an interactive terminal, say) hangs the run even
    /// after the child has exited. Use `Inherit` for those.
    Reader(Box<dyn Read + Send>),
}

impl InputStream {
    pub fn reader(reader: impl Read + Send + 'static) -> Self {
        Self::Reader(Box::new(reader))
    }

    pub(crate) fn stdio(&self) -> Stdio {
        match self {
            Self::Null => Stdio::null(),
            Self::Inherit => Stdio::inherit(),
            Self::Reader(_) => Stdio::piped(),
        }
    }
}

impl fmt::Debug for InputStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Inherit => f.write_str("Inherit"),
            Self::Reader(_) => f.write_str("Reader"),
        }
    }
}

/// Where a child's stdout or stderr goes.
#[derive(Default)]
pub enum OutputStream {
    #[default]
    Null,
    Inherit,
    Writer(Box<dyn Write + Send>),
}

impl OutputStream {
    pub fn writer(writer: impl Write + Send + 'static) -> Self {
        Self::Writer(Box::new(writer))
    }

    pub(crate) fn stdio(&self) -> Stdio {
        match self {
            Self::Null => Stdio::null(),
            Self::Inherit => Stdio::inherit(),
            Self::Writer(_) => Stdio::piped(),
        }
    }
}

impl fmt::Debug for OutputStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Inherit => f.write_str("Inherit"),
            Self::Writer(_) => f.write_str("Writer"),
        }
    }
}

/// In-memory writer whose clones share one buffer.
///
/// Hand one clone to a [`RunContext`](super::RunContext) and keep another to
/// read what the plugin wrote.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock()).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
