//! Concurrent fan-out over sources and fan-in of their items.
//!
//! One worker task is spawned per distinct source. Workers never touch shared
//! counters; they only send [`SourceEvent`]s over a single bounded channel:
//!
//! 1. exactly one `Listed { count }` or `Failed`, then
//! 2. one `Item` per listing entry, in listing order.
//!
//! The consumer loop in [`Dispatcher::run`] is the sole owner of
//! [`RunState`]. Because a worker's `Listed` event is queued before any of its
//! items, the expected total is final once every source has reported, and the
//! run is complete when additionally `received >= expected`. A failed source
//! reports a count of zero, so it can neither stall nor prematurely end the
//! run. The bounded channel makes a slow sink throttle the workers.

use crate::error::{FetchError, FetchErrorKind, RunError};
use crate::models::Item;
use crate::outputs::ItemSink;
use crate::sources::reddit::RedditSource;
use itertools::Itertools;
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};

/// Outcome of a complete run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of distinct sources requested.
    pub sources: usize,
    /// Items delivered to the sink.
    pub items: usize,
    /// Sum of the item counts every source reported.
    pub expected: usize,
    /// Sources whose fetch failed or whose worker stopped before finishing.
    pub failed_sources: Vec<(String, FetchErrorKind)>,
    pub elapsed: Duration,
}

/// Message from a source worker to the consumer loop.
#[derive(Debug)]
enum SourceEvent {
    Listed { source: String, count: usize },
    Failed { source: String, error: FetchError },
    Item { source: String, item: Item },
}

/// Counters for one run, owned by the consumer loop alone.
#[derive(Debug)]
struct RunState {
    sources_requested: usize,
    /// Sources that have not yet reported a count or a failure.
    pending: HashSet<String>,
    /// Items each listed source still owes.
    outstanding: HashMap<String, usize>,
    expected_total: usize,
    received_count: usize,
    failed: Vec<(String, FetchErrorKind)>,
    started: Instant,
}

impl RunState {
    fn new<'a>(sources: impl IntoIterator<Item = &'a str>) -> Self {
        let pending: HashSet<String> = sources.into_iter().map(str::to_string).collect();
        Self {
            sources_requested: pending.len(),
            pending,
            outstanding: HashMap::new(),
            expected_total: 0,
            received_count: 0,
            failed: Vec::new(),
            started: Instant::now(),
        }
    }

    fn record_listed(&mut self, source: &str, count: usize) {
        if self.pending.remove(source) {
            self.expected_total += count;
            if count > 0 {
                self.outstanding.insert(source.to_string(), count);
            }
        } else {
            warn!(source, "Ignoring duplicate count report");
        }
    }

    fn record_failed(&mut self, source: &str, kind: FetchErrorKind) {
        if self.pending.remove(source) {
            self.failed.push((source.to_string(), kind));
        }
    }

    fn record_item(&mut self, source: &str) {
        self.received_count += 1;
        if let Some(left) = self.outstanding.get_mut(source) {
            *left -= 1;
            if *left == 0 {
                self.outstanding.remove(source);
            }
        }
    }

    /// Account for sources whose worker went away before finishing: those
    /// that never reported and those that stopped partway through their
    /// items are recorded as lost.
    fn close_early(&mut self) {
        let mut unreported: Vec<String> = self.pending.drain().collect();
        unreported.sort();
        for source in unreported {
            warn!(%source, "Worker exited without reporting");
            self.failed.push((source, FetchErrorKind::WorkerLost));
        }

        let mut short: Vec<(String, usize)> = self.outstanding.drain().collect();
        short.sort();
        for (source, missing) in short {
            warn!(%source, missing, "Worker exited before sending all items");
            self.failed.push((source, FetchErrorKind::WorkerLost));
        }
    }

    fn is_complete(&self) -> bool {
        self.pending.is_empty() && self.received_count >= self.expected_total
    }

    fn into_summary(self) -> RunSummary {
        RunSummary {
            sources: self.sources_requested,
            items: self.received_count,
            expected: self.expected_total,
            failed_sources: self.failed,
            elapsed: self.started.elapsed(),
        }
    }
}

/// Launches one worker per source and streams their items into a sink.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    fetcher: RedditSource,
    channel_capacity: usize,
}

impl Dispatcher {
    pub fn new(fetcher: RedditSource, channel_capacity: usize) -> Self {
        Self {
            fetcher,
            channel_capacity: channel_capacity.max(1),
        }
    }

    /// Fetch every distinct source concurrently, emitting items to `sink` as
    /// they arrive.
    ///
    /// Returns once every source has reported, every expected item has been
    /// emitted and every worker has returned. Per-source failures are logged
    /// and listed in the summary; only a sink write failure aborts the run.
    #[instrument(level = "info", skip_all, fields(sources = sources.len()))]
    pub async fn run<S>(&self, sources: &[String], sink: &mut S) -> Result<RunSummary, RunError>
    where
        S: ItemSink + ?Sized,
    {
        let sources: Vec<&str> = sources.iter().map(String::as_str).unique().collect();
        let mut state = RunState::new(sources.iter().copied());
        let (tx, mut rx) = mpsc::channel(self.channel_capacity);

        let mut workers = JoinSet::new();
        for source in &sources {
            workers.spawn(fetch_worker(self.fetcher.clone(), source.to_string(), tx.clone()));
        }
        drop(tx);
        info!(workers = sources.len(), "Workers started");

        while !state.is_complete() {
            let Some(event) = rx.recv().await else {
                break;
            };
            match event {
                SourceEvent::Listed { source, count } => {
                    debug!(%source, count, "Source listed");
                    state.record_listed(&source, count);
                }
                SourceEvent::Failed { source, error } => {
                    error!(%source, kind = %error.kind(), error = %error, "Source failed; contributing no items");
                    state.record_failed(&source, error.kind());
                }
                SourceEvent::Item { source, item } => {
                    state.record_item(&source);
                    if let Err(e) = sink.emit(&item) {
                        error!(error = %e, "Sink write failed; aborting workers");
                        workers.abort_all();
                        return Err(e.into());
                    }
                }
            }
        }

        // All senders dropped before completion.
        if !state.is_complete() {
            warn!(
                received = state.received_count,
                expected = state.expected_total,
                "Channel closed before all items arrived"
            );
            state.close_early();
        }

        drop(rx);
        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Worker task did not finish cleanly");
            }
        }

        let summary = state.into_summary();
        info!(
            sources = summary.sources,
            items = summary.items,
            failed = summary.failed_sources.len(),
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "Run complete"
        );
        Ok(summary)
    }
}

/// Fetch one source and forward its count and items to the consumer.
async fn fetch_worker(fetcher: RedditSource, source: String, tx: mpsc::Sender<SourceEvent>) {
    let listing = match fetcher.fetch_listing(&source).await {
        Ok(listing) => listing,
        Err(error) => {
            let _ = tx.send(SourceEvent::Failed { source, error }).await;
            return;
        }
    };

    let count = listing.len();
    let listed = SourceEvent::Listed {
        source: source.clone(),
        count,
    };
    if tx.send(listed).await.is_err() {
        return;
    }
    for item in listing.into_items() {
        let event = SourceEvent::Item {
            source: source.clone(),
            item,
        };
        if tx.send(event).await.is_err() {
            debug!(%source, "Consumer gone; dropping remaining items");
            return;
        }
    }
    debug!(%source, count, "Worker finished");
}
