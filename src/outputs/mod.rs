//! Output sinks for streamed items and the final run summary.
//!
//! # Submodules
//!
//! - [`terminal`]: human-readable lines, optionally colored
//! - [`json`]: one JSON object per line for piping into other tools
//!
//! Sinks are driven by a single consumer loop, so they take `&mut self` and
//! need no internal locking. Each item is written as soon as it arrives.

pub mod json;
pub mod terminal;

use crate::cli::OutputFormat;
use crate::dispatcher::RunSummary;
use crate::models::Item;
use std::io::{self, Write};

/// Destination for rendered items.
pub trait ItemSink {
    /// Render one item immediately.
    fn emit(&mut self, item: &Item) -> io::Result<()>;

    /// Render the closing summary once the run has finished.
    fn finish(&mut self, summary: &RunSummary) -> io::Result<()>;
}

/// Build the sink selected on the command line, writing to `out`.
pub fn sink_for<W: Write + Send + 'static>(
    format: OutputFormat,
    color: bool,
    out: W,
) -> Box<dyn ItemSink + Send> {
    match format {
        OutputFormat::Text => Box::new(terminal::TerminalSink::new(out, color)),
        OutputFormat::Json => Box::new(json::JsonLinesSink::new(out)),
    }
}
