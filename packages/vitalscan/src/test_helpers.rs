use std::io;
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};
use tracing_subscriber::fmt::MakeWriter;

/// Runs a function with all VITALSCAN_ environment variables unset
pub(crate) fn with_no_vitalscan_vars<F: FnOnce() -> R, R>(f: F) -> R {
    let vars = std::env::vars()
        .map(|(k, _v)| k)
        .filter(|k| k.starts_with("VITALSCAN_"))
        .collect::<Vec<_>>();

    temp_env::with_vars_unset(&vars, f)
}

// Mock Writer for testing the logging behaviour, adapted from tracing_subscriber's internal test code.
// https://github.com/tokio-rs/tracing/blob/b02a700ba6850ad813f77e65144114f866074a8f/tracing-subscriber/src/fmt/mod.rs#L1247-L1314
pub(crate) struct MockWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MockWriter {
    fn map_error<Guard>(err: TryLockError<Guard>) -> io::Error {
        match err {
            TryLockError::WouldBlock => io::Error::from(io::ErrorKind::WouldBlock),
            TryLockError::Poisoned(_) => io::Error::from(io::ErrorKind::Other),
        }
    }

    fn buf(&self) -> io::Result<MutexGuard<'_, Vec<u8>>> {
        self.buf.try_lock().map_err(Self::map_error)
    }
}

impl io::Write for MockWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.buf()?.flush()
    }
}

#[derive(Clone, Default)]
pub(crate) struct MockMakeWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MockMakeWriter {
    /// Drains and returns everything written so far
    pub(crate) fn get_string(&self) -> String {
        let mut buf = self.buf.lock().expect("lock shouldn't be poisoned");
        let string = String::from_utf8_lossy(&buf[..]).into_owned();
        buf.clear();
        string
    }
}

impl<'a> MakeWriter<'a> for MockMakeWriter {
    type Writer = MockWriter;

    fn make_writer(&'a self) -> Self::Writer {
        MockWriter {
            buf: self.buf.clone(),
        }
    }
}
