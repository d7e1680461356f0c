//! Debounced revenue recalculation.
//!
//! Writes to sessions and ledger entries tend to come in bursts (a generation
//! run, a bulk import, a series of edits). Each write sends the touched year
//! to a background task; the task waits until no notification has arrived for
//! the quiet period and then refreshes every touched year once.

use super::revenue::RevenueCache;
use std::{collections::BTreeSet, time::Duration};
use tokio::{sync::mpsc, task::JoinHandle, time::timeout};
use tracing::{debug, error, info};

/// Sending side of the recalculation worker. Dropping every clone stops the worker.
#[derive(Debug, Clone)]
pub struct RecalcHandle {
    tx: mpsc::UnboundedSender<i32>,
}

impl RecalcHandle {
    /// Marks `year` as changed. Returns `false` if the worker has stopped.
    pub fn notify(&self, year: i32) -> bool {
        self.tx.send(year).is_ok()
    }
}

/// Spawns the worker. The join handle resolves to the number of year refreshes performed.
#[must_use]
pub fn spawn_recalc_worker(
    cache: RevenueCache,
    quiet: Duration,
) -> (RecalcHandle, JoinHandle<usize>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(run_worker(cache, quiet, rx));
    (RecalcHandle { tx }, handle)
}

async fn run_worker(
    cache: RevenueCache,
    quiet: Duration,
    mut rx: mpsc::UnboundedReceiver<i32>,
) -> usize {
    let mut refreshes = 0;

    while let Some(year) = rx.recv().await {
        let mut pending = BTreeSet::from([year]);
        let mut closed = false;

        // Keep collecting until the burst is over.
        loop {
            match timeout(quiet, rx.recv()).await {
                Ok(Some(year)) => {
                    pending.insert(year);
                }
                Ok(None) => {
                    closed = true;
                    break;
                }
                Err(_) => break,
            }
        }

        debug!("Change burst settled, refreshing years {:?}", pending);
        for year in pending {
            match cache.refresh_year(year).await {
                Ok(_) => refreshes += 1,
                Err(e) => error!("Debounced revenue refresh for {year} failed: {e}"),
            }
        }

        if closed {
            break;
        }
    }

    info!("Revenue recalculation worker stopped after {refreshes} refreshes.");
    refreshes
}
