use rayon::prelude::*;
use tracing::warn;

use crate::{
    favourites::{FavouriteTransitInfo, Favourites, TransitData},
    repository::{self, Repository},
    shared::{DayCode, Time},
};

/// Computes today's next arrival for every favourite.
#[derive(Debug, Clone)]
pub struct Aggregator {
    repository: Repository,
}

impl Aggregator {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn next_arrivals_now(&self, favourites: &Favourites) -> Vec<FavouriteTransitInfo> {
        self.next_arrivals(favourites, DayCode::today(), Time::now())
    }

    /// One entry per favourite, in the favourites' iteration order.
    ///
    /// Entries are computed in parallel. A favourite that no longer matches
    /// the reference data, or whose query fails, gets `arrival_time = None`
    /// and the rest of the list is unaffected.
    pub fn next_arrivals(
        &self,
        favourites: &Favourites,
        day: DayCode,
        now: Time,
    ) -> Vec<FavouriteTransitInfo> {
        let entries: Vec<TransitData> = favourites.iter().collect();
        entries
            .into_par_iter()
            .map(|transit_data| {
                let arrival_time = match self.next_arrival(&transit_data, day, now) {
                    Ok(time) => time,
                    Err(err) => {
                        warn!(
                            "Failed to look up next arrival at {:?} ({}): {err}",
                            transit_data.stop_name(),
                            transit_data.agency()
                        );
                        None
                    }
                };
                FavouriteTransitInfo {
                    agency: transit_data.agency(),
                    transit_data,
                    arrival_time,
                }
            })
            .collect()
    }

    fn next_arrival(
        &self,
        transit_data: &TransitData,
        day: DayCode,
        now: Time,
    ) -> Result<Option<Time>, repository::Error> {
        let stop_times = match transit_data {
            TransitData::Stm(data) => self.repository.stop_times(
                &data.stop_name,
                day,
                now,
                &data.trip_headsign,
                transit_data.agency(),
            )?,
            TransitData::ExoBus(data) => self.repository.stop_times(
                &data.stop_name,
                day,
                now,
                &data.trip_headsign,
                transit_data.agency(),
            )?,
            TransitData::ExoTrain(data) => self.repository.train_stop_times(
                data.route_id,
                &data.stop_name,
                data.direction_id,
                now,
                day,
            )?,
        };
        Ok(stop_times.first().map(|stop_time| stop_time.time))
    }
}
