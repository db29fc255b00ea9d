//! Redirect a text output stream into a visual log surface.
//!
//! A [`SharedStream`] stands in for a process-wide output stream such as
//! stdout. While a [`StreamRedirector`] is alive, text written to the stream
//! is cut into lines and appended to a [`LogSurface`]; dropping the
//! redirector restores the previous destination.
//!
//! Two surfaces ship with the crate:
//! - [`MemoryLog`], a bounded line buffer shared between clones;
//! - [`ChannelLog`], which posts lines to a [`LogReceiver`] drained by the UI
//!   thread.
//!
//! ```
//! use std::io::Write;
//!
//! use viewstate_ui_log::{MemoryLog, SharedStream, StreamRedirector};
//!
//! let mut stream = SharedStream::new(std::io::sink());
//! let log = MemoryLog::default();
//! {
//!     let _redirect = StreamRedirector::attach(&stream, log.clone())?;
//!     writeln!(stream, "hello")?;
//! }
//! assert_eq!(log.lines()?, vec!["hello"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod redirect;
mod settings;
mod stream;
mod surface;

pub use error::{LogError, Result};
pub use redirect::StreamRedirector;
pub use settings::LogSettings;
pub use stream::SharedStream;
pub use surface::{ChannelLog, LogReceiver, LogSurface, MemoryLog, channel};
