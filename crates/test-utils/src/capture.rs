use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use devrun::logging::SharedWriter;

/// In-memory sink standing in for stdout/stderr in tests.
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A `SharedWriter` that appends into this buffer.
    pub fn writer(&self) -> SharedWriter {
        SharedWriter::new(self.clone())
    }

    pub fn contents(&self) -> String {
        let bytes = self.bytes.lock().unwrap();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
