use std::time::Instant;

use rusqlite::{Transaction, params};
use tracing::{debug, info, warn};

use crate::{
    gtfs::Gtfs,
    shared::{Agency, Time},
    store::{self, Store, schema::TABLES},
};

impl Store {
    /// Replaces the rows of `agency` that came from `feed` with the contents
    /// of `gtfs`. Other feeds of the same agency are kept, so an agency
    /// published as several GTFS archives is imported one archive at a time.
    ///
    /// The whole import runs in one transaction: readers see either the old
    /// feed or the new one.
    pub fn import_gtfs(&self, agency: Agency, feed: &str, gtfs: &Gtfs) -> Result<(), store::Error> {
        info!(
            "Importing {agency} feed {feed:?} from {}",
            gtfs.path().display()
        );
        let now = Instant::now();
        let mut conn = self.connect_writable()?;
        let tx = conn.transaction()?;
        let key = FeedKey { agency, feed };
        clear_feed(&tx, &key)?;
        load_calendar(&tx, &key, gtfs)?;
        load_routes(&tx, &key, gtfs)?;
        load_trips(&tx, &key, gtfs)?;
        load_stops(&tx, &key, gtfs)?;
        load_stop_times(&tx, &key, gtfs)?;
        tx.commit()?;
        info!("Importing {agency} feed {feed:?} took {:?}", now.elapsed());
        Ok(())
    }

    /// Names of the feeds imported for `agency`.
    pub fn feeds(&self, agency: Agency) -> Result<Vec<String>, store::Error> {
        let conn = self.connect()?;
        let mut stmt =
            conn.prepare("SELECT DISTINCT feed FROM routes WHERE agency = ?1 ORDER BY feed")?;
        let feeds = stmt
            .query_map(params![agency.as_str()], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(feeds)
    }
}

struct FeedKey<'a> {
    agency: Agency,
    feed: &'a str,
}

fn clear_feed(tx: &Transaction, key: &FeedKey) -> Result<(), store::Error> {
    for table in TABLES {
        tx.execute(
            &format!("DELETE FROM {table} WHERE agency = ?1 AND feed = ?2"),
            params![key.agency.as_str(), key.feed],
        )?;
    }
    Ok(())
}

/// Streams records into a prepared insert. The first insert error stops
/// further inserts and is returned once the stream ends.
macro_rules! stream_insert {
    ($tx:expr, $sql:expr, $gtfs:ident . $stream:ident, |$stmt:ident, $record:ident| $body:expr) => {{
        let mut $stmt = $tx.prepare($sql)?;
        let mut failure: Option<rusqlite::Error> = None;
        let mut count = 0usize;
        $gtfs.$stream(|(_, $record)| {
            if failure.is_some() {
                return;
            }
            match $body {
                Ok(_) => count += 1,
                Err(err) => failure = Some(err),
            }
        })?;
        if let Some(err) = failure {
            return Err(err.into());
        }
        count
    }};
}

fn load_calendar(tx: &Transaction, key: &FeedKey, gtfs: &Gtfs) -> Result<(), store::Error> {
    debug!("Loading calendar...");
    let now = Instant::now();
    let count = stream_insert!(
        tx,
        "INSERT OR REPLACE INTO calendar (agency, feed, service_id, days, start_date, end_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        gtfs.stream_calendar,
        |stmt, calendar| stmt.execute(params![
            key.agency.as_str(),
            key.feed,
            calendar.service_id,
            calendar.day_codes(),
            calendar.start_date,
            calendar.end_date
        ])
    );
    debug!("Loading {count} calendar entries took {:?}", now.elapsed());
    Ok(())
}

fn load_routes(tx: &Transaction, key: &FeedKey, gtfs: &Gtfs) -> Result<(), store::Error> {
    debug!("Loading routes...");
    let now = Instant::now();
    let count = stream_insert!(
        tx,
        "INSERT OR REPLACE INTO routes (agency, feed, route_id, route_long_name, route_type)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        gtfs.stream_routes,
        |stmt, route| {
            let name = route
                .route_long_name
                .or(route.route_short_name)
                .unwrap_or_default();
            stmt.execute(params![
                key.agency.as_str(),
                key.feed,
                route.route_id,
                name,
                route.route_type
            ])
        }
    );
    debug!("Loading {count} routes took {:?}", now.elapsed());
    Ok(())
}

fn load_trips(tx: &Transaction, key: &FeedKey, gtfs: &Gtfs) -> Result<(), store::Error> {
    debug!("Loading trips...");
    let now = Instant::now();
    let count = stream_insert!(
        tx,
        "INSERT OR REPLACE INTO trips
         (agency, feed, trip_id, route_id, service_id, trip_headsign, direction_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        gtfs.stream_trips,
        |stmt, trip| stmt.execute(params![
            key.agency.as_str(),
            key.feed,
            trip.trip_id,
            trip.route_id,
            trip.service_id,
            trip.trip_headsign.unwrap_or_default(),
            trip.direction_id.unwrap_or(0)
        ])
    );
    debug!("Loading {count} trips took {:?}", now.elapsed());
    Ok(())
}

fn load_stops(tx: &Transaction, key: &FeedKey, gtfs: &Gtfs) -> Result<(), store::Error> {
    debug!("Loading stops...");
    let now = Instant::now();
    let count = stream_insert!(
        tx,
        "INSERT OR REPLACE INTO stops (agency, feed, stop_id, stop_name) VALUES (?1, ?2, ?3, ?4)",
        gtfs.stream_stops,
        |stmt, stop| stmt.execute(params![
            key.agency.as_str(),
            key.feed,
            stop.stop_id,
            stop.stop_name
        ])
    );
    debug!("Loading {count} stops took {:?}", now.elapsed());
    Ok(())
}

fn load_stop_times(tx: &Transaction, key: &FeedKey, gtfs: &Gtfs) -> Result<(), store::Error> {
    debug!("Loading stop times...");
    let now = Instant::now();
    let mut skipped = 0usize;
    let count = stream_insert!(
        tx,
        "INSERT INTO stop_times
         (agency, feed, trip_id, stop_id, arrival_time, departure_time, stop_seq)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        gtfs.stream_stop_times,
        |stmt, stop_time| {
            let arrival = Time::from_hms(&stop_time.arrival_time);
            let departure = Time::from_hms(&stop_time.departure_time);
            match (arrival, departure) {
                (Some(arrival), Some(departure)) => stmt.execute(params![
                    key.agency.as_str(),
                    key.feed,
                    stop_time.trip_id,
                    stop_time.stop_id,
                    arrival.as_seconds(),
                    departure.as_seconds(),
                    stop_time.stop_sequence
                ]),
                // Untimed stops carry no schedule to query.
                _ => {
                    skipped += 1;
                    Ok(0)
                }
            }
        }
    );
    if skipped > 0 {
        warn!("Skipped {skipped} stop times without a valid time");
    }
    debug!("Loading {count} stop times took {:?}", now.elapsed());
    Ok(())
}
