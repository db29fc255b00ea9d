use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use flume::{Receiver, Sender, TryRecvError, TrySendError};
use log::warn;

use crate::error::{LogError, Result};
use crate::settings::LogSettings;

/// Visual log destination that receives complete lines of text.
pub trait LogSurface {
    /// Append one line. The trailing newline is already stripped.
    fn append(&mut self, line: &str) -> Result<()>;
}

/// Cloneable in-memory log; every clone shares the same lines.
#[derive(Clone, Debug, Default)]
pub struct MemoryLog {
    buffer: Arc<Mutex<LineBuffer>>,
    max_lines: Option<usize>,
}

#[derive(Debug, Default)]
struct LineBuffer {
    lines: VecDeque<String>,
    evicted: usize,
}

impl MemoryLog {
    pub fn new(settings: &LogSettings) -> Self {
        Self {
            buffer: Arc::default(),
            max_lines: settings.max_lines,
        }
    }

    fn buffer(&self) -> Result<MutexGuard<'_, LineBuffer>> {
        self.buffer.lock().map_err(|_| LogError::Poisoned)
    }

    /// Copy of the lines currently held, oldest first.
    pub fn lines(&self) -> Result<Vec<String>> {
        Ok(self.buffer()?.lines.iter().cloned().collect())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.buffer()?.lines.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Number of lines dropped so far to stay within `max_lines`.
    pub fn evicted(&self) -> Result<usize> {
        Ok(self.buffer()?.evicted)
    }

    pub fn clear(&self) -> Result<()> {
        let mut buffer = self.buffer()?;
        buffer.lines.clear();
        buffer.evicted = 0;
        Ok(())
    }
}

impl LogSurface for MemoryLog {
    fn append(&mut self, line: &str) -> Result<()> {
        let mut buffer = self.buffer()?;
        buffer.lines.push_back(line.to_owned());
        if let Some(max) = self.max_lines {
            if buffer.lines.len() > max && buffer.evicted == 0 {
                warn!("memory log: over {max} lines, dropping the oldest");
            }
            while buffer.lines.len() > max {
                buffer.lines.pop_front();
                buffer.evicted += 1;
            }
        }
        Ok(())
    }
}

/// Log surface that posts lines to the thread owning the log widget.
#[derive(Clone, Debug)]
pub struct ChannelLog {
    sender: Sender<String>,
}

impl LogSurface for ChannelLog {
    fn append(&mut self, line: &str) -> Result<()> {
        self.sender
            .try_send(line.to_owned())
            .map_err(|err| match err {
                TrySendError::Full(_) => LogError::Full,
                TrySendError::Disconnected(_) => LogError::Disconnected,
            })
    }
}

/// Receiving side of a [`ChannelLog`], drained by the UI loop.
#[derive(Debug)]
pub struct LogReceiver {
    receiver: Receiver<String>,
}

impl LogReceiver {
    /// Blocking receive.
    pub fn recv(&self) -> Result<String> {
        self.receiver.recv().map_err(|_| LogError::Disconnected)
    }

    /// Non-blocking receive; `Ok(None)` when nothing is queued.
    pub fn try_recv(&self) -> Result<Option<String>> {
        match self.receiver.try_recv() {
            Ok(line) => Ok(Some(line)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(LogError::Disconnected),
        }
    }

    /// Take every queued line without blocking.
    pub fn drain(&self) -> Vec<String> {
        self.receiver.drain().collect()
    }
}

/// Build a connected [`ChannelLog`] / [`LogReceiver`] pair.
pub fn channel(settings: &LogSettings) -> (ChannelLog, LogReceiver) {
    let (sender, receiver) = match settings.channel_capacity {
        Some(cap) => flume::bounded(cap),
        None => flume::unbounded(),
    };

    (ChannelLog { sender }, LogReceiver { receiver })
}
