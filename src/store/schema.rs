/// Every table carries the agency and feed keys so all feeds share one file.
/// An agency may be split over several feeds, each replaced on its own.
///
/// Times are stored as seconds since the start of the service day.
pub(crate) const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS calendar (
    agency TEXT NOT NULL,
    feed TEXT NOT NULL,
    service_id TEXT NOT NULL,
    days TEXT NOT NULL,
    start_date TEXT NOT NULL,
    end_date TEXT NOT NULL,
    PRIMARY KEY (agency, feed, service_id)
);

CREATE TABLE IF NOT EXISTS routes (
    agency TEXT NOT NULL,
    feed TEXT NOT NULL,
    route_id TEXT NOT NULL,
    route_long_name TEXT NOT NULL,
    route_type INTEGER NOT NULL,
    PRIMARY KEY (agency, feed, route_id)
);

CREATE TABLE IF NOT EXISTS trips (
    agency TEXT NOT NULL,
    feed TEXT NOT NULL,
    trip_id TEXT NOT NULL,
    route_id TEXT NOT NULL,
    service_id TEXT NOT NULL,
    trip_headsign TEXT NOT NULL,
    direction_id INTEGER NOT NULL,
    PRIMARY KEY (agency, feed, trip_id)
);

CREATE TABLE IF NOT EXISTS stops (
    agency TEXT NOT NULL,
    feed TEXT NOT NULL,
    stop_id TEXT NOT NULL,
    stop_name TEXT NOT NULL,
    PRIMARY KEY (agency, feed, stop_id)
);

CREATE TABLE IF NOT EXISTS stop_times (
    agency TEXT NOT NULL,
    feed TEXT NOT NULL,
    trip_id TEXT NOT NULL,
    stop_id TEXT NOT NULL,
    arrival_time INTEGER NOT NULL,
    departure_time INTEGER NOT NULL,
    stop_seq INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS trips_by_route ON trips (agency, route_id, direction_id);
CREATE INDEX IF NOT EXISTS trips_by_headsign ON trips (agency, trip_headsign);
CREATE INDEX IF NOT EXISTS stops_by_name ON stops (agency, stop_name);
CREATE INDEX IF NOT EXISTS stop_times_by_stop ON stop_times (agency, feed, stop_id, arrival_time);
CREATE INDEX IF NOT EXISTS stop_times_by_trip ON stop_times (agency, feed, trip_id, stop_seq);
";

/// Bumped whenever [`SCHEMA`] changes shape. Older stores are rebuilt empty.
pub(crate) const SCHEMA_VERSION: i64 = 2;

pub(crate) const TABLES: [&str; 5] = ["calendar", "routes", "trips", "stops", "stop_times"];
