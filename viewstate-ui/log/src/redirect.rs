use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use log::{debug, warn};

use crate::error::{LogError, Result};
use crate::stream::{Destination, SharedStream};
use crate::surface::LogSurface;

/// Bytes waiting for a newline plus the surface complete lines go to.
struct Capture<S> {
    pending: Vec<u8>,
    surface: S,
}

impl<S: LogSurface> Capture<S> {
    /// Append every complete buffered line. A line the surface rejects stays
    /// at the front of the buffer.
    fn drain_lines(&mut self) -> Result<()> {
        while let Some(end) = find_newline(&self.pending) {
            self.surface
                .append(&String::from_utf8_lossy(&self.pending[..end]))?;
            self.pending.drain(..=end);
        }
        Ok(())
    }

    /// Accept `bytes` unless lines queued by an earlier write still cannot
    /// be delivered, in which case nothing is consumed.
    fn push(&mut self, bytes: &[u8]) -> Result<usize> {
        self.drain_lines()?;
        self.pending.extend_from_slice(bytes);
        if let Err(err) = self.drain_lines() {
            debug!("log redirect: surface rejected a line, kept queued: {err}");
        }
        Ok(bytes.len())
    }

    fn flush_pending(&mut self) -> Result<()> {
        self.drain_lines()?;
        if self.pending.is_empty() {
            return Ok(());
        }

        self.surface
            .append(&String::from_utf8_lossy(&self.pending))?;
        self.pending.clear();
        Ok(())
    }
}

fn find_newline(bytes: &[u8]) -> Option<usize> {
    bytes.iter().position(|byte| *byte == b'\n')
}

/// Destination installed into the stream while a redirect is active.
struct RedirectSink<S> {
    capture: Arc<Mutex<Capture<S>>>,
}

impl<S: LogSurface> Write for RedirectSink<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut capture =
            self.capture.lock().map_err(|_| LogError::Poisoned)?;
        Ok(capture.push(buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut capture =
            self.capture.lock().map_err(|_| LogError::Poisoned)?;
        Ok(capture.drain_lines()?)
    }
}

/// Scoped redirect of a [`SharedStream`] into a [`LogSurface`].
///
/// While alive, everything written to the stream is split into lines and
/// appended to the surface. Dropping the redirector appends any unterminated
/// trailing text and puts the previous destination back. Nested redirects of
/// one stream must be released in reverse order.
///
/// A line the surface rejects stays queued. Until it is delivered, further
/// writes fail without consuming any bytes.
pub struct StreamRedirector<S: LogSurface + Send + 'static> {
    stream: SharedStream,
    previous: Option<Destination>,
    capture: Arc<Mutex<Capture<S>>>,
}

impl<S: LogSurface + Send + 'static> StreamRedirector<S> {
    /// Start forwarding `stream` into `surface`.
    pub fn attach(stream: &SharedStream, surface: S) -> Result<Self> {
        let capture = Arc::new(Mutex::new(Capture {
            pending: Vec::new(),
            surface,
        }));
        let sink = RedirectSink {
            capture: Arc::clone(&capture),
        };
        let previous = stream.replace(Box::new(sink))?;
        debug!("log redirect: stream attached");

        Ok(Self {
            stream: stream.clone(),
            previous: Some(previous),
            capture,
        })
    }

    /// Restore the previous destination, reporting any failure.
    pub fn detach(mut self) -> Result<()> {
        self.release()
    }

    fn release(&mut self) -> Result<()> {
        let Some(previous) = self.previous.take() else {
            return Ok(());
        };

        drop(self.stream.replace(previous)?);
        debug!("log redirect: stream restored");

        self.capture
            .lock()
            .map_err(|_| LogError::Poisoned)?
            .flush_pending()
    }
}

impl<S: LogSurface + Send + 'static> Drop for StreamRedirector<S> {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            warn!("log redirect: failed to release stream: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use std::thread;

    use super::*;
    use crate::settings::LogSettings;
    use crate::surface::{MemoryLog, channel};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().expect("buffer lock").clone())
                .expect("utf-8 output")
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("buffer lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn redirect_splits_lines_and_flushes_remainder_on_drop() {
        let original = SharedBuffer::default();
        let mut stream = SharedStream::new(original.clone());
        let log = MemoryLog::default();

        {
            let _redirect =
                StreamRedirector::attach(&stream, log.clone()).expect("attach");
            write!(stream, "first line\nsecond ").expect("write");
            write!(stream, "line\ntail").expect("write");
            assert_eq!(
                log.lines().expect("log lines"),
                vec!["first line", "second line"]
            );
        }

        assert_eq!(
            log.lines().expect("log lines"),
            vec!["first line", "second line", "tail"]
        );
        assert_eq!(original.text(), "");
    }

    #[test]
    fn detach_restores_previous_destination() {
        let original = SharedBuffer::default();
        let mut stream = SharedStream::new(original.clone());
        let log = MemoryLog::default();

        let redirect =
            StreamRedirector::attach(&stream, log.clone()).expect("attach");
        writeln!(stream, "captured").expect("write");
        redirect.detach().expect("detach");
        writeln!(stream, "direct").expect("write");

        assert_eq!(log.lines().expect("log lines"), vec!["captured"]);
        assert_eq!(original.text(), "direct\n");
    }

    #[test]
    fn nested_redirects_unwind_in_reverse_order() {
        let original = SharedBuffer::default();
        let mut stream = SharedStream::new(original.clone());
        let outer_log = MemoryLog::default();
        let inner_log = MemoryLog::default();

        let outer = StreamRedirector::attach(&stream, outer_log.clone())
            .expect("outer attach");
        let inner = StreamRedirector::attach(&stream, inner_log.clone())
            .expect("inner attach");
        writeln!(stream, "inner").expect("write");
        inner.detach().expect("inner detach");
        writeln!(stream, "outer").expect("write");
        outer.detach().expect("outer detach");

        assert_eq!(inner_log.lines().expect("log lines"), vec!["inner"]);
        assert_eq!(outer_log.lines().expect("log lines"), vec!["outer"]);
        assert_eq!(original.text(), "");
    }

    #[test]
    fn invalid_utf8_is_replaced_instead_of_failing() {
        let mut stream = SharedStream::new(io::sink());
        let log = MemoryLog::default();
        let redirect =
            StreamRedirector::attach(&stream, log.clone()).expect("attach");

        stream.write_all(b"bad \xff byte\n").expect("write");
        redirect.detach().expect("detach");

        assert_eq!(
            log.lines().expect("log lines"),
            vec!["bad \u{fffd} byte"]
        );
    }

    #[test]
    fn concurrent_writers_never_interleave_lines() {
        let stream = SharedStream::new(io::sink());
        let log = MemoryLog::default();
        let redirect =
            StreamRedirector::attach(&stream, log.clone()).expect("attach");

        let workers: Vec<_> = (0..4)
            .map(|worker| {
                let mut stream = stream.clone();
                thread::spawn(move || {
                    for line in 0..50 {
                        stream
                            .write_all(
                                format!("worker {worker} line {line}\n")
                                    .as_bytes(),
                            )
                            .expect("write");
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().expect("worker finished");
        }
        redirect.detach().expect("detach");

        let lines = log.lines().expect("log lines");
        assert_eq!(lines.len(), 200);
        assert!(lines.iter().all(|line| line.starts_with("worker ")));
        for worker in 0..4 {
            let prefix = format!("worker {worker} line ");
            let ordered: Vec<usize> = lines
                .iter()
                .filter_map(|line| line.strip_prefix(&prefix))
                .map(|rest| rest.parse().expect("line number"))
                .collect();
            assert_eq!(ordered, (0..50).collect::<Vec<_>>());
        }
    }

    #[test]
    fn channel_surface_delivers_lines_to_receiver() {
        let mut stream = SharedStream::new(io::sink());
        let (surface, receiver) = channel(&LogSettings::default());
        let redirect =
            StreamRedirector::attach(&stream, surface).expect("attach");

        writeln!(stream, "posted").expect("write");

        assert_eq!(
            receiver.try_recv().expect("connected"),
            Some(String::from("posted"))
        );
        drop(redirect);
        assert!(receiver.recv().is_err());
    }

    #[test]
    fn rejected_lines_stay_queued_until_the_surface_accepts_them() {
        let mut stream = SharedStream::new(io::sink());
        let (surface, receiver) =
            channel(&LogSettings::default().with_channel_capacity(1));
        let redirect =
            StreamRedirector::attach(&stream, surface).expect("attach");

        assert_eq!(stream.write(b"a\nb\nc").expect("bytes accepted"), 5);
        assert_eq!(receiver.drain(), vec!["a"]);

        assert_eq!(stream.write(b"d\n").expect("bytes accepted"), 2);
        assert_eq!(receiver.drain(), vec!["b"]);

        stream.flush().expect("queued line delivered");
        assert_eq!(receiver.drain(), vec!["cd"]);

        assert_eq!(stream.write(b"e\n").expect("bytes accepted"), 2);
        assert_eq!(stream.write(b"f\n").expect("bytes accepted"), 2);
        assert_eq!(receiver.drain(), vec!["e"]);

        redirect.detach().expect("detach");
        assert_eq!(receiver.drain(), vec!["f"]);
    }

    #[test]
    fn blocked_surface_rejects_new_bytes_without_consuming_them() {
        let mut stream = SharedStream::new(io::sink());
        let (surface, receiver) =
            channel(&LogSettings::default().with_channel_capacity(1));
        let redirect =
            StreamRedirector::attach(&stream, surface).expect("attach");

        stream.write_all(b"one\ntwo\n").expect("bytes accepted");
        let err = stream.write(b"three\n").expect_err("surface is full");
        assert_eq!(err.kind(), io::ErrorKind::WouldBlock);

        assert_eq!(receiver.drain(), vec!["one"]);
        stream.write_all(b"three\n").expect("retry accepted");
        assert_eq!(receiver.drain(), vec!["two"]);

        redirect.detach().expect("detach");
        assert_eq!(receiver.drain(), vec!["three"]);
    }
}
