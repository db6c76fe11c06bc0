// src/logging/writer.rs

//! A cloneable, mutex-serialized writer.
//!
//! Used for the log file sink (written concurrently by both pipe readers),
//! the console sink and the stdout mirror. The lock is held for the whole
//! formatted event, so lines from different tasks never interleave.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing_subscriber::fmt::MakeWriter;

type BoxedWrite = Box<dyn Write + Send>;

#[derive(Clone)]
pub struct SharedWriter {
    inner: Arc<Mutex<BoxedWrite>>,
}

impl SharedWriter {
    pub fn new<W>(writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// Write one line (a newline is appended) and flush immediately.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut guard = self.lock();
        guard.write_all(line.as_bytes())?;
        guard.write_all(b"\n")?;
        guard.flush()
    }

    fn lock(&self) -> MutexGuard<'_, BoxedWrite> {
        // A panic while holding the lock leaves a writer that is still usable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for SharedWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedWriter").finish_non_exhaustive()
    }
}

/// Exclusive access to a [`SharedWriter`] for the duration of one event.
pub struct SharedWriterGuard<'a> {
    guard: MutexGuard<'a, BoxedWrite>,
}

impl Write for SharedWriterGuard<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.guard.write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.guard.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.guard.flush()
    }
}

impl<'a> MakeWriter<'a> for SharedWriter {
    type Writer = SharedWriterGuard<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        SharedWriterGuard { guard: self.lock() }
    }
}
