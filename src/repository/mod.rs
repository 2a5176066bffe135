use std::sync::Arc;

use rayon::prelude::*;
use rusqlite::{Params, Row, params};
use thiserror::Error;
use tracing::debug;

mod models;
pub use models::*;

use crate::{
    shared::{Agency, DayCode, Time},
    store::Store,
};

#[derive(Error, Debug)]
pub enum Error {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

const TRIP_HEADSIGNS: &str = "
SELECT trip_headsign FROM trips
WHERE agency = ?1 AND route_id = ?2
GROUP BY trip_headsign
ORDER BY MIN(direction_id), trip_headsign";

// Stops come from the longest trip carrying the headsign, so short-turn
// trips do not hide the ends of the line.
const STOP_NAMES: &str = "
WITH longest AS (
    SELECT t.feed, t.trip_id FROM trips t
    JOIN stop_times x ON x.agency = t.agency AND x.feed = t.feed AND x.trip_id = t.trip_id
    WHERE t.agency = ?1 AND t.trip_headsign = ?2
    GROUP BY t.feed, t.trip_id
    ORDER BY COUNT(*) DESC, t.feed, t.trip_id
    LIMIT 1
)
SELECT s.stop_name FROM longest l
JOIN stop_times st ON st.agency = ?1 AND st.feed = l.feed AND st.trip_id = l.trip_id
JOIN stops s ON s.agency = st.agency AND s.feed = st.feed AND s.stop_id = st.stop_id
ORDER BY st.stop_seq";

const STOP_TIMES: &str = "
SELECT t.trip_headsign, st.arrival_time, c.days FROM stop_times st
JOIN stops s ON s.agency = st.agency AND s.feed = st.feed AND s.stop_id = st.stop_id
JOIN trips t ON t.agency = st.agency AND t.feed = st.feed AND t.trip_id = st.trip_id
JOIN calendar c ON c.agency = t.agency AND c.feed = t.feed AND c.service_id = t.service_id
WHERE st.agency = ?1 AND s.stop_name = ?2 AND t.trip_headsign = ?3
  AND instr(c.days, ?4) > 0 AND st.arrival_time >= ?5
ORDER BY st.arrival_time";

const TRAIN_STOP_TIMES: &str = "
SELECT t.trip_headsign, st.arrival_time, c.days FROM stop_times st
JOIN stops s ON s.agency = st.agency AND s.feed = st.feed AND s.stop_id = st.stop_id
JOIN trips t ON t.agency = st.agency AND t.feed = st.feed AND t.trip_id = st.trip_id
JOIN calendar c ON c.agency = t.agency AND c.feed = t.feed AND c.service_id = t.service_id
WHERE st.agency = ?1 AND t.route_id = ?2 AND s.stop_name = ?3 AND t.direction_id = ?4
  AND instr(c.days, ?5) > 0 AND st.arrival_time >= ?6
ORDER BY st.arrival_time";

const ROUTES: &str = "
SELECT route_id, MIN(route_long_name) FROM routes
WHERE agency = ?1
GROUP BY route_id
ORDER BY CAST(route_id AS INTEGER), route_id";

/// Read-only queries over the schedule store.
///
/// Unknown routes, stops and headsigns give empty results. Each call opens
/// its own connection and closes it before returning, whatever the outcome.
#[derive(Debug, Clone)]
pub struct Repository {
    store: Store,
}

impl Repository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Distinct headsigns of a route, one per direction in the usual case.
    /// Callers must not assume there are exactly two.
    pub fn trip_headsigns(&self, agency: Agency, route_number: u32) -> Result<Vec<String>, Error> {
        self.query(
            TRIP_HEADSIGNS,
            params![agency.as_str(), route_number.to_string()],
            |row| row.get(0),
        )
    }

    /// Stop names of one direction in stop-sequence order.
    pub fn stop_names(&self, agency: Agency, headsign: &str) -> Result<Vec<String>, Error> {
        self.query(STOP_NAMES, params![agency.as_str(), headsign], |row| {
            row.get(0)
        })
    }

    /// Upcoming calls at `stop_name` for trips with `headsign` that run on
    /// `day`, at or after `current_time`, earliest first.
    pub fn stop_times(
        &self,
        stop_name: &str,
        day: DayCode,
        current_time: Time,
        headsign: &str,
        agency: Agency,
    ) -> Result<Vec<StopTime>, Error> {
        let rows = self.query(
            STOP_TIMES,
            params![
                agency.as_str(),
                stop_name,
                headsign,
                day.to_string(),
                current_time.as_seconds()
            ],
            stop_time_row,
        )?;
        let stop_times = parse_stop_times(rows);
        debug!(
            "{} stop times for {agency} {stop_name:?} towards {headsign:?} on {day} after {current_time}",
            stop_times.len()
        );
        Ok(stop_times)
    }

    /// Train variant of [`Repository::stop_times`], keyed by route and
    /// direction instead of headsign.
    pub fn train_stop_times(
        &self,
        route_id: u32,
        stop_name: &str,
        direction_id: u32,
        current_time: Time,
        day: DayCode,
    ) -> Result<Vec<StopTime>, Error> {
        let rows = self.query(
            TRAIN_STOP_TIMES,
            params![
                Agency::ExoTrain.as_str(),
                route_id.to_string(),
                stop_name,
                direction_id,
                day.to_string(),
                current_time.as_seconds()
            ],
            stop_time_row,
        )?;
        Ok(parse_stop_times(rows))
    }

    pub fn routes(&self, agency: Agency) -> Result<Vec<Route>, Error> {
        self.query(ROUTES, params![agency.as_str()], |row| {
            Ok(Route {
                route_id: row.get::<_, String>(0)?.into(),
                long_name: row.get::<_, String>(1)?.into(),
            })
        })
    }

    /// Every direction of a route with its stop list. The stop lists are
    /// fetched in parallel and joined before returning.
    pub fn directions(&self, agency: Agency, route_number: u32) -> Result<Vec<Direction>, Error> {
        let headsigns = self.trip_headsigns(agency, route_number)?;
        headsigns
            .into_par_iter()
            .map(|headsign| {
                let stops = self
                    .stop_names(agency, &headsign)?
                    .into_iter()
                    .map(Arc::from)
                    .collect();
                Ok::<_, Error>(Direction {
                    headsign: headsign.into(),
                    stops,
                })
            })
            .collect()
    }

    fn query<P, T, F>(&self, sql: &str, params: P, f: F) -> Result<Vec<T>, Error>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let conn = self.store.connect()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, f)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

type StopTimeRow = (String, u32, String);

fn stop_time_row(row: &Row<'_>) -> rusqlite::Result<StopTimeRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn parse_stop_times(rows: Vec<StopTimeRow>) -> Vec<StopTime> {
    rows.into_iter()
        .map(|(headsign, time, days)| StopTime {
            headsign: headsign.into(),
            time: Time::from_seconds(time),
            days: DayCode::parse_days(&days),
        })
        .collect()
}
