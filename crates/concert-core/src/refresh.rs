//! Polling refresh controller.
//!
//! One scheduler task fires a fetch cycle immediately on spawn and then on a
//! fixed period. Each cycle is tagged with a monotonically increasing
//! sequence number and runs as a detached sub-task, so a slow response never
//! blocks the next cycle — which also means responses can complete out of
//! order. The consumer routes every event through a [`SeqGate`] and discards
//! anything older than the newest sequence it has applied.
//!
//! The handle must be shut down when the consuming view goes away; an
//! uncancelled scheduler is a leak that keeps mutating state behind a dead
//! view.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::ApiError;
use crate::partition::{partition, ConcertBoard};
use crate::record::ConcertRecord;

/// Outcome of one refresh cycle. `seq` orders cycles by when they were
/// *issued*, not when they completed.
#[derive(Debug, Clone)]
pub enum RefreshEvent {
    Loaded { seq: u64, board: ConcertBoard },
    Failed { seq: u64, error: String },
}

impl RefreshEvent {
    pub fn seq(&self) -> u64 {
        match self {
            Self::Loaded { seq, .. } | Self::Failed { seq, .. } => *seq,
        }
    }
}

/// Admits only sequence numbers newer than the last admitted one. Keeps a
/// late-arriving stale response from clobbering a fresher board.
#[derive(Debug, Default)]
pub struct SeqGate {
    latest: u64,
}

impl SeqGate {
    pub fn admit(&mut self, seq: u64) -> bool {
        if seq > self.latest {
            self.latest = seq;
            true
        } else {
            false
        }
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }
}

/// Owns the scheduler task. Dropping the handle closes the trigger channel,
/// which stops the scheduler on its next loop turn; call
/// [`RefreshHandle::shutdown`] on teardown to cancel deterministically.
pub struct RefreshHandle {
    task: JoinHandle<()>,
    trigger_tx: mpsc::Sender<()>,
}

impl RefreshHandle {
    /// Request an extra cycle now (e.g. after an admin mutation), without
    /// disturbing the periodic schedule. Best-effort: coalesces if a request
    /// is already pending.
    pub fn request_now(&self) {
        let _ = self.trigger_tx.try_send(());
    }

    /// Cancel the scheduler and wait for it to die. In-flight fetches are
    /// orphaned; their results are dropped when the event channel closes.
    pub async fn shutdown(self) {
        self.task.abort();
        let _ = self.task.await;
    }
}

/// Spawn the refresh scheduler. The first cycle fires immediately; later
/// cycles every `period`. `fetch` produces the raw record list; partitioning
/// happens here so consumers only ever see a finished [`ConcertBoard`].
pub fn spawn_refresh<F, Fut>(
    period: Duration,
    tx: mpsc::Sender<RefreshEvent>,
    fetch: F,
) -> RefreshHandle
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<ConcertRecord>, ApiError>> + Send + 'static,
{
    let (trigger_tx, mut trigger_rx) = mpsc::channel::<()>(1);

    let task = tokio::spawn(async move {
        let mut seq: u64 = 0;
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                requested = trigger_rx.recv() => {
                    if requested.is_none() {
                        break;
                    }
                }
            }

            seq += 1;
            debug!("refresh cycle {seq} starting");

            // Detach the in-flight request so a slow response can't delay the
            // next tick. Overlapping requests are allowed; the SeqGate sorts
            // them out.
            let tx = tx.clone();
            let fut = fetch();
            tokio::spawn(async move {
                let event = match fut.await {
                    Ok(records) => RefreshEvent::Loaded {
                        seq,
                        board: partition(records),
                    },
                    Err(e) => RefreshEvent::Failed {
                        seq,
                        error: e.to_string(),
                    },
                };
                let _ = tx.send(event).await;
            });
        }
    });

    RefreshHandle { task, trigger_tx }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ConcertStatus;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    fn rec(id: i64) -> ConcertRecord {
        ConcertRecord {
            id,
            name: format!("concert {id}"),
            date: NaiveDate::from_ymd_opt(2024, 4, 15).unwrap(),
            time: None,
            location: None,
            genre: None,
            price: None,
            details: None,
            status: ConcertStatus::Upcoming,
        }
    }

    #[test]
    fn test_seq_gate_admits_only_newer() {
        let mut gate = SeqGate::default();
        assert!(gate.admit(1));
        assert!(gate.admit(3));
        assert!(!gate.admit(2));
        assert!(!gate.admit(3));
        assert!(gate.admit(4));
        assert_eq!(gate.latest(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_cycle_fires_immediately_then_periodically() {
        let (tx, mut rx) = mpsc::channel(16);
        let handle = spawn_refresh(Duration::from_secs(30), tx, || async {
            Ok(vec![rec(1)])
        });

        let first = rx.recv().await.unwrap();
        assert_eq!(first.seq(), 1);
        match first {
            RefreshEvent::Loaded { board, .. } => assert_eq!(board.upcoming.len(), 1),
            other => panic!("unexpected event: {other:?}"),
        }

        let second = rx.recv().await.unwrap();
        assert_eq!(second.seq(), 2);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_now_forces_an_extra_cycle() {
        let (tx, mut rx) = mpsc::channel(16);
        // Period long enough that only the immediate cycle and the forced one
        // can fire during this test.
        let handle = spawn_refresh(Duration::from_secs(3600), tx, || async {
            Ok(Vec::new())
        });

        assert_eq!(rx.recv().await.unwrap().seq(), 1);
        handle.request_now();
        assert_eq!(rx.recv().await.unwrap().seq(), 2);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_loses_to_newer_sequence() {
        let (tx, mut rx) = mpsc::channel(16);
        let calls = Arc::new(AtomicU64::new(0));
        let calls_in_fetch = Arc::clone(&calls);

        // Cycle 1 is slow (responds after 50ms), cycle 2 fast (5ms), so the
        // later cycle's response arrives first in wall-clock order. The period
        // is long enough that no third cycle can interleave.
        let handle = spawn_refresh(Duration::from_secs(3600), tx, move || {
            let n = calls_in_fetch.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                let delay = if n == 1 { 50 } else { 5 };
                tokio::time::sleep(Duration::from_millis(delay)).await;
                Ok(vec![rec(n as i64)])
            }
        });
        // Queue the second cycle before either fetch resolves.
        handle.request_now();

        let first_arrival = rx.recv().await.unwrap();
        let second_arrival = rx.recv().await.unwrap();
        handle.shutdown().await;

        assert_eq!(first_arrival.seq(), 2);
        assert_eq!(second_arrival.seq(), 1);

        // The consumer applies whatever the gate admits; the final applied
        // state must correspond to the higher sequence number.
        let mut gate = SeqGate::default();
        let mut applied = None;
        for event in [first_arrival, second_arrival] {
            if let RefreshEvent::Loaded { seq, board } = event {
                if gate.admit(seq) {
                    applied = Some(board);
                }
            }
        }
        assert_eq!(applied.unwrap().upcoming[0].id, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_reports_without_stopping_the_schedule() {
        let (tx, mut rx) = mpsc::channel(16);
        let calls = Arc::new(AtomicU64::new(0));
        let calls_in_fetch = Arc::clone(&calls);

        let handle = spawn_refresh(Duration::from_secs(30), tx, move || {
            let n = calls_in_fetch.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n == 1 {
                    Err(ApiError::Format("bad envelope".into()))
                } else {
                    Ok(Vec::new())
                }
            }
        });

        match rx.recv().await.unwrap() {
            RefreshEvent::Failed { seq, error } => {
                assert_eq!(seq, 1);
                assert!(error.contains("bad envelope"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(matches!(
            rx.recv().await.unwrap(),
            RefreshEvent::Loaded { seq: 2, .. }
        ));

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_the_stream() {
        let (tx, mut rx) = mpsc::channel(16);
        let handle = spawn_refresh(Duration::from_secs(3600), tx, || async {
            Ok(Vec::new())
        });

        assert_eq!(rx.recv().await.unwrap().seq(), 1);
        handle.shutdown().await;

        // All senders are gone once the scheduler dies and the lone in-flight
        // task has finished, so the stream ends instead of ticking again.
        assert!(rx.recv().await.is_none());
    }
}
