use std::{sync::Arc, time::Duration};

use tokio::{
    sync::{Notify, RwLock, watch},
    task::JoinHandle,
    time::MissedTickBehavior,
};
use tracing::{debug, warn};

use crate::{
    favourites::{Aggregator, FavouriteTransitInfo, Favourites},
    shared::{DayCode, Time},
};

/// A complete favourites list as of one refresh cycle.
pub type Snapshot = Arc<[FavouriteTransitInfo]>;

#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Delay between two refresh cycles.
    pub interval: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
        }
    }
}

/// Owner of a running refresh task.
///
/// The task lives exactly as long as this handle: dropping the handle, or
/// calling [`RefreshHandle::cancel`], aborts it and no further snapshot is
/// published.
#[derive(Debug)]
pub struct RefreshHandle {
    task: JoinHandle<()>,
    receiver: watch::Receiver<Snapshot>,
    favourites: Arc<RwLock<Favourites>>,
    notify: Arc<Notify>,
}

type Clock = Arc<dyn Fn() -> (DayCode, Time) + Send + Sync>;

/// Builder for a refresh task.
pub struct Refresh {
    aggregator: Arc<Aggregator>,
    favourites: Arc<RwLock<Favourites>>,
    config: RefreshConfig,
    clock: Clock,
    changes: Option<watch::Receiver<u64>>,
}

impl Refresh {
    /// Starts refreshing on the current tokio runtime using the local clock.
    pub fn spawn(
        aggregator: Arc<Aggregator>,
        favourites: Arc<RwLock<Favourites>>,
        config: RefreshConfig,
    ) -> RefreshHandle {
        Self::new(aggregator, favourites).with_config(config).start()
    }

    pub fn new(aggregator: Arc<Aggregator>, favourites: Arc<RwLock<Favourites>>) -> Self {
        Self {
            aggregator,
            favourites,
            config: RefreshConfig::default(),
            clock: Arc::new(|| (DayCode::today(), Time::now())),
            changes: None,
        }
    }

    pub fn with_config(mut self, config: RefreshConfig) -> Self {
        self.config = config;
        self
    }

    /// Takes the service day and time from `clock` instead of the local clock.
    pub fn with_clock<C>(mut self, clock: C) -> Self
    where
        C: Fn() -> (DayCode, Time) + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    /// Recomputes whenever the version published on `changes` moves, e.g.
    /// after the shared favourites or the schedule store were written by
    /// someone else. A change made while a cycle is running is picked up by
    /// the next cycle straight away.
    pub fn following(mut self, changes: watch::Receiver<u64>) -> Self {
        self.changes = Some(changes);
        self
    }

    pub fn start(self) -> RefreshHandle {
        let Self {
            aggregator,
            favourites,
            config,
            clock,
            changes,
        } = self;
        let (sender, receiver) = watch::channel(Snapshot::from(Vec::new()));
        let notify = Arc::new(Notify::new());

        let task = {
            let favourites = favourites.clone();
            let notify = notify.clone();
            let mut watching = changes.is_some();
            let mut changes = changes.unwrap_or_else(|| watch::channel(0).1);
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(config.interval);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    // The first tick completes at once, so the list is computed on start.
                    // A pending notify permit or unseen version forces the next cycle.
                    let forced = tokio::select! {
                        _ = interval.tick() => false,
                        _ = notify.notified() => true,
                        result = changes.changed(), if watching => {
                            watching = result.is_ok();
                            watching
                        }
                    };
                    if forced {
                        interval.reset();
                    }
                    changes.borrow_and_update();

                    let snapshot = favourites.read().await.clone();
                    let aggregator = aggregator.clone();
                    let clock = clock.clone();
                    let result = tokio::task::spawn_blocking(move || {
                        let (day, now) = clock();
                        aggregator.next_arrivals(&snapshot, day, now)
                    })
                    .await;

                    match result {
                        Ok(list) => {
                            debug!("Refreshed {} favourites", list.len());
                            sender.send_replace(list.into());
                        }
                        Err(err) => warn!("Favourites refresh failed: {err}"),
                    }
                }
            })
        };

        RefreshHandle {
            task,
            receiver,
            favourites,
            notify,
        }
    }
}

impl RefreshHandle {
    /// Latest published snapshot. Empty until the first cycle completes.
    pub fn latest(&self) -> Snapshot {
        self.receiver.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.receiver.clone()
    }

    /// Runs a cycle now instead of waiting for the next tick.
    pub fn refresh_now(&self) {
        self.notify.notify_one();
    }

    /// Applies `f` to the shared favourites and triggers a full recomputation.
    pub async fn modify<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut Favourites) -> T,
    {
        let result = {
            let mut favourites = self.favourites.write().await;
            f(&mut favourites)
        };
        self.refresh_now();
        result
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
