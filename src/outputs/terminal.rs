//! Human-readable terminal output.
//!
//! Each item renders as two lines:
//!
//! ```text
//! Some headline
//! [https://example.com/story]
//! ```
//!
//! and the run closes with `Got: 3 sources [total time: 412 ms]`, followed by
//! the number of failed sources when there are any.

use super::ItemSink;
use crate::dispatcher::RunSummary;
use crate::models::Item;
use crossterm::style::{Stylize, style};
use std::io::{self, Write};

/// Writes items as title and bracketed URL lines.
pub struct TerminalSink<W> {
    out: W,
    color: bool,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ItemSink for TerminalSink<W> {
    fn emit(&mut self, item: &Item) -> io::Result<()> {
        if self.color {
            writeln!(
                self.out,
                "{}\n[{}]",
                style(&item.title).yellow(),
                style(&item.url).green()
            )?;
        } else {
            writeln!(self.out, "{}\n[{}]", item.title, item.url)?;
        }
        self.out.flush()
    }

    fn finish(&mut self, summary: &RunSummary) -> io::Result<()> {
        let sources = summary.sources.to_string();
        let millis = format!("{} ms", summary.elapsed.as_millis());
        let failed = summary.failed_sources.len();

        if self.color {
            write!(
                self.out,
                "{} {} {} {}{}",
                style("Got:").cyan(),
                style(&sources).red(),
                style("sources [total time:").cyan(),
                style(&millis).green(),
                style("]").cyan()
            )?;
            if failed > 0 {
                write!(self.out, " {}", style(format!("({failed} failed)")).red())?;
            }
        } else {
            write!(self.out, "Got: {sources} sources [total time: {millis}]")?;
            if failed > 0 {
                write!(self.out, " ({failed} failed)")?;
            }
        }
        writeln!(self.out)?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchErrorKind;
    use std::time::Duration;

    fn summary(failed: Vec<(String, FetchErrorKind)>) -> RunSummary {
        RunSummary {
            sources: 2,
            items: 3,
            expected: 3,
            failed_sources: failed,
            elapsed: Duration::from_millis(1234),
        }
    }

    #[test]
    fn test_emit_plain() {
        let mut sink = TerminalSink::new(Vec::new(), false);
        sink.emit(&Item {
            title: "Hello".to_string(),
            url: "https://example.com".to_string(),
        })
        .unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "Hello\n[https://example.com]\n");
    }

    #[test]
    fn test_emit_colored_keeps_text() {
        let mut sink = TerminalSink::new(Vec::new(), true);
        sink.emit(&Item {
            title: "Hello".to_string(),
            url: "https://example.com".to_string(),
        })
        .unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert!(out.contains("Hello"));
        assert!(out.contains("https://example.com"));
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn test_finish_plain() {
        let mut sink = TerminalSink::new(Vec::new(), false);
        sink.finish(&summary(vec![])).unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "Got: 2 sources [total time: 1234 ms]\n");
    }

    #[test]
    fn test_finish_reports_failures() {
        let mut sink = TerminalSink::new(Vec::new(), false);
        sink.finish(&summary(vec![("b".to_string(), FetchErrorKind::BadStatus)]))
            .unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "Got: 2 sources [total time: 1234 ms] (1 failed)\n");
    }
}
