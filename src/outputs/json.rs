//! JSON Lines output.
//!
//! Items are written as `{"title":..,"url":..}`, one per line, in the order
//! they arrive. The last line is the run summary:
//!
//! ```text
//! {"summary":{"sources":2,"items":25,"expected":25,"elapsed_ms":380,"failed_sources":[{"source":"b","kind":"bad_status"}]}}
//! ```

use super::ItemSink;
use crate::dispatcher::RunSummary;
use crate::models::Item;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Serialize)]
struct SummaryLine<'a> {
    summary: SummaryBody<'a>,
}

#[derive(Serialize)]
struct SummaryBody<'a> {
    sources: usize,
    items: usize,
    expected: usize,
    elapsed_ms: u128,
    failed_sources: Vec<FailedSource<'a>>,
}

#[derive(Serialize)]
struct FailedSource<'a> {
    source: &'a str,
    kind: String,
}

/// Writes each item as a standalone JSON object line.
pub struct JsonLinesSink<W> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    fn write_line<T: Serialize>(&mut self, value: &T) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, value)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

impl<W: Write> ItemSink for JsonLinesSink<W> {
    fn emit(&mut self, item: &Item) -> io::Result<()> {
        self.write_line(item)
    }

    fn finish(&mut self, summary: &RunSummary) -> io::Result<()> {
        let line = SummaryLine {
            summary: SummaryBody {
                sources: summary.sources,
                items: summary.items,
                expected: summary.expected,
                elapsed_ms: summary.elapsed.as_millis(),
                failed_sources: summary
                    .failed_sources
                    .iter()
                    .map(|(source, kind)| FailedSource {
                        source: source.as_str(),
                        kind: kind.to_string(),
                    })
                    .collect(),
            },
        };
        self.write_line(&line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchErrorKind;
    use serde_json::Value;
    use std::time::Duration;

    #[test]
    fn test_emit_writes_one_line_per_item() {
        let mut sink = JsonLinesSink::new(Vec::new());
        for n in 0..2 {
            sink.emit(&Item {
                title: format!("t{n}"),
                url: format!("https://example.com/{n}"),
            })
            .unwrap();
        }

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: Item = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.title, "t1");
    }

    #[test]
    fn test_finish_writes_summary() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.finish(&RunSummary {
            sources: 2,
            items: 2,
            expected: 2,
            failed_sources: vec![("b".to_string(), FetchErrorKind::Timeout)],
            elapsed: Duration::from_millis(42),
        })
        .unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let value: Value = serde_json::from_str(out.trim_end()).unwrap();
        assert_eq!(value["summary"]["sources"], 2);
        assert_eq!(value["summary"]["elapsed_ms"], 42);
        assert_eq!(value["summary"]["failed_sources"][0]["source"], "b");
        assert_eq!(value["summary"]["failed_sources"][0]["kind"], "timeout");
    }
}
