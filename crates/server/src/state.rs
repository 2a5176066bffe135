use std::{path::PathBuf, sync::Arc};

use bus2go::{
    favourites::{Aggregator, FavouritesStore, Favourites, JsonFavouritesStore},
    refresh::RefreshConfig,
    repository::Repository,
    store::Store,
};
use tokio::sync::{Mutex, RwLock, watch};

pub struct AppState {
    pub store: Store,
    pub repository: Repository,
    pub aggregator: Arc<Aggregator>,
    pub favourites_store: JsonFavouritesStore,
    /// In-memory copy of the favourites file, shared with live refresh tasks.
    pub favourites: Arc<RwLock<Favourites>>,
    /// Bumped whenever favourites or schedule data change.
    pub changed: watch::Sender<u64>,
    pub data_dir: PathBuf,
    pub refresh: RefreshConfig,
    /// Serializes feed imports.
    pub import_lock: Mutex<()>,
}

impl AppState {
    pub fn new(
        store: Store,
        favourites_store: JsonFavouritesStore,
        data_dir: PathBuf,
        refresh: RefreshConfig,
    ) -> Result<Self, bus2go::favourites::Error> {
        let favourites = favourites_store.load()?;
        let repository = Repository::new(store.clone());
        Ok(Self {
            aggregator: Arc::new(Aggregator::new(repository.clone())),
            repository,
            store,
            favourites_store,
            favourites: Arc::new(RwLock::new(favourites)),
            changed: watch::Sender::new(0),
            data_dir,
            refresh,
            import_lock: Mutex::new(()),
        })
    }

    /// Tells live refresh tasks to recompute.
    pub fn notify_changed(&self) {
        self.changed.send_modify(|version| *version = version.wrapping_add(1));
    }
}
