use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, warn};

use crate::model::DashboardStats;
use crate::service::RegistrationService;

/// Latest outcome of a stats refresh.
#[derive(Debug, Clone)]
pub enum RefreshState {
    /// No fetch has finished yet.
    Pending,
    Ready(Arc<DashboardStats>),
    /// The fetch failed; the message is safe to show a client.
    Failed(String),
}

/// Periodic dashboard-stats fetcher.
///
/// Fetches once immediately, then every `interval`, publishing each result.
/// Dropping the refresher cancels the task; an in-flight fetch is abandoned
/// rather than awaited.
pub struct StatsRefresher {
    rx: watch::Receiver<RefreshState>,
    task: JoinHandle<()>,
    cancel: CancellationToken,
    _guard: DropGuard,
}

impl StatsRefresher {
    pub fn spawn(service: Arc<RegistrationService>, interval: Duration) -> Self {
        let cancel = CancellationToken::new();
        let (tx, rx) = watch::channel(RefreshState::Pending);

        let task = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                debug!("stats refresher started (interval={interval:?})");
                let mut ticker = tokio::time::interval(interval);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

                loop {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = ticker.tick() => {}
                    }

                    let outcome = tokio::select! {
                        _ = cancel.cancelled() => break,
                        r = service.run("dashboard stats", |s| s.dashboard_stats()) => r,
                    };

                    let state = match outcome {
                        Ok(stats) => RefreshState::Ready(Arc::new(stats)),
                        Err(e) => {
                            warn!("stats refresh failed: {e}");
                            RefreshState::Failed(e.public_message())
                        }
                    };
                    // Every receiver gone: nobody left to publish to.
                    if tx.send(state).is_err() {
                        break;
                    }
                }
                debug!("stats refresher stopped");
            })
        };

        Self {
            rx,
            task,
            _guard: cancel.clone().drop_guard(),
            cancel,
        }
    }

    /// Wait for the next published state. `None` once the task has ended.
    pub async fn changed(&mut self) -> Option<RefreshState> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Cancel the task and wait for it to exit.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.task.await;
    }

    #[cfg(test)]
    pub(crate) fn latest(&self) -> RefreshState {
        self.rx.borrow().clone()
    }

    #[cfg(test)]
    pub(crate) fn subscribe(&self) -> watch::Receiver<RefreshState> {
        self.rx.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{failing_service, sample, seed, service_with};
    use crate::model::{Faculty, Gender};

    const WAIT: Duration = Duration::from_secs(2);

    #[tokio::test]
    async fn publishes_a_snapshot_immediately() {
        let svc = service_with(&seed());
        let mut refresher = StatsRefresher::spawn(svc, Duration::from_secs(3600));

        assert!(matches!(refresher.latest(), RefreshState::Pending));
        let state = tokio::time::timeout(WAIT, refresher.changed()).await.unwrap().unwrap();
        match state {
            RefreshState::Ready(stats) => {
                assert_eq!(stats.stored_registrations, 12);
                assert_eq!(stats.batch.total_registrations, 10);
            }
            other => panic!("expected Ready, got {other:?}"),
        }
        refresher.shutdown().await;
    }

    #[tokio::test]
    async fn keeps_publishing_on_interval() {
        let svc = service_with(&seed());
        let mut refresher = StatsRefresher::spawn(svc.clone(), Duration::from_millis(20));

        tokio::time::timeout(WAIT, refresher.changed()).await.unwrap().unwrap();
        let late = sample("NEW001", "Late", Faculty::Fisheries, Gender::Male, 99);
        svc.store.insert(&late).unwrap();

        // A later refresh observes the new record.
        let seen = tokio::time::timeout(WAIT, async {
            loop {
                match refresher.changed().await {
                    Some(RefreshState::Ready(stats)) if stats.stored_registrations == 13 => {
                        return true;
                    }
                    Some(_) => {}
                    None => return false,
                }
            }
        })
        .await
        .unwrap();
        assert!(seen);
        refresher.shutdown().await;
    }

    #[tokio::test]
    async fn failure_is_published_with_public_message() {
        let mut refresher = StatsRefresher::spawn(failing_service(), Duration::from_secs(3600));
        let state = tokio::time::timeout(WAIT, refresher.changed()).await.unwrap().unwrap();
        match state {
            RefreshState::Failed(msg) => assert_eq!(msg, "failed to retrieve registration data"),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn drop_stops_the_task() {
        let refresher = StatsRefresher::spawn(service_with(&seed()), Duration::from_millis(10));
        let mut rx = refresher.subscribe();
        drop(refresher);

        // The sender lives in the task, so the channel closes once it exits.
        let closed = tokio::time::timeout(WAIT, async {
            while rx.changed().await.is_ok() {}
        })
        .await;
        assert!(closed.is_ok(), "refresher task outlived its owner");
    }

    #[tokio::test]
    async fn shutdown_waits_for_exit() {
        let refresher = StatsRefresher::spawn(service_with(&[]), Duration::from_millis(10));
        let mut rx = refresher.subscribe();
        tokio::time::timeout(WAIT, refresher.shutdown()).await.unwrap();
        while rx.changed().await.is_ok() {}
        assert!(rx.has_changed().is_err());
    }
}
