//! Schedule lookup for STM and EXO transit over an embedded, GTFS-derived
//! SQLite store.
//!
//! Build the store once from GTFS feeds with [`store::Store::import_gtfs`],
//! query it with [`repository::Repository`], and keep favourites' countdowns
//! live with [`favourites::Aggregator`] and [`refresh::Refresh`].

pub mod favourites;
pub mod gtfs;
pub mod refresh;
pub mod repository;
pub mod selection;
pub mod shared;
pub mod store;

pub mod prelude {
    pub use crate::favourites::{
        Aggregator, ExoBusData, FavouriteTransitInfo, Favourites, FavouritesStore,
        JsonFavouritesStore, StmBusData, TrainData, TransitData,
    };
    pub use crate::gtfs::Gtfs;
    pub use crate::refresh::{Refresh, RefreshConfig, RefreshHandle, Snapshot};
    pub use crate::repository::{Direction, Repository, Route, StopTime};
    pub use crate::selection::Selection;
    pub use crate::shared::{Agency, DayCode, Duration, Time};
    pub use crate::store::Store;
}
