use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::error::{LogError, Result};

pub(crate) type Destination = Box<dyn Write + Send>;

/// Cloneable text output stream whose destination can be swapped at runtime.
///
/// All clones write to the same destination. Writers are serialized by an
/// internal mutex.
#[derive(Clone)]
pub struct SharedStream {
    destination: Arc<Mutex<Destination>>,
}

impl SharedStream {
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            destination: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// Install `destination` and hand back the one it replaces.
    pub(crate) fn replace(
        &self,
        destination: Destination,
    ) -> Result<Destination> {
        let mut current =
            self.destination.lock().map_err(|_| LogError::Poisoned)?;
        current.flush().ok();
        Ok(std::mem::replace(&mut *current, destination))
    }
}

impl Write for SharedStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut destination =
            self.destination.lock().map_err(|_| LogError::Poisoned)?;
        destination.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut destination =
            self.destination.lock().map_err(|_| LogError::Poisoned)?;
        destination.flush()
    }
}

impl fmt::Debug for SharedStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedStream").finish_non_exhaustive()
    }
}
