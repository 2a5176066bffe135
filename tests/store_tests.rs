mod common;

use bus2go::{
    gtfs::Gtfs,
    repository::Repository,
    shared::{Agency, DayCode, Time},
    store::{self, Store},
};
use common::Fixture;

fn count(store: &Store, sql: &str) -> i64 {
    let conn = store.connect().unwrap();
    conn.query_row(sql, [], |row| row.get(0)).unwrap()
}

#[test]
fn import_stores_times_as_seconds() {
    let fixture = Fixture::new("store-seconds");
    let conn = fixture.store.connect().unwrap();
    let arrival: u32 = conn
        .query_row(
            "SELECT arrival_time FROM stop_times WHERE agency = 'stm' AND trip_id = '6-E4' AND stop_seq = 1",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(arrival, Time::new(7, 30, 0).as_seconds());
}

#[test]
fn import_drops_untimed_stop_times() {
    let fixture = Fixture::new("store-untimed");
    let calls = count(
        &fixture.store,
        "SELECT COUNT(*) FROM stop_times WHERE agency = 'stm' AND trip_id = '6-E1'",
    );
    assert_eq!(calls, 4);
}

#[test]
fn import_writes_day_codes() {
    let fixture = Fixture::new("store-days");
    let conn = fixture.store.connect().unwrap();
    let days = |service: &str| -> String {
        conn.query_row(
            "SELECT days FROM calendar WHERE agency = 'stm' AND service_id = ?1",
            [service],
            |row| row.get(0),
        )
        .unwrap()
    };
    assert_eq!(days("WEEKDAY"), "mtwyf");
    assert_eq!(days("WEEKEND"), "sd");
}

#[test]
fn reimport_replaces_only_that_agency() {
    let fixture = Fixture::new("store-reimport");
    let stm = "SELECT COUNT(*) FROM stop_times WHERE agency = 'stm'";
    let exo = "SELECT COUNT(*) FROM stop_times WHERE agency = 'exo'";
    let before = count(&fixture.store, stm);
    assert_eq!(before, 17);

    let gtfs = Gtfs::from_zip(fixture.path("stm.zip")).unwrap();
    fixture.store.import_gtfs(Agency::Stm, "stm", &gtfs).unwrap();

    assert_eq!(count(&fixture.store, stm), before);
    assert_eq!(count(&fixture.store, exo), 2);
}

#[test]
fn failed_import_keeps_previous_data() {
    let fixture = Fixture::new("store-failed");
    let broken = fixture.path("broken.zip");
    common::write_feed(&broken, &common::stm_files()[2..]);

    let gtfs = Gtfs::from_zip(&broken).unwrap();
    let result = fixture.store.import_gtfs(Agency::Stm, "stm", &gtfs);
    assert!(matches!(result, Err(store::Error::Gtfs(_))));

    let routes = count(
        &fixture.store,
        "SELECT COUNT(*) FROM routes WHERE agency = 'stm'",
    );
    assert_eq!(routes, 2);
}

#[test]
fn open_requires_existing_file() {
    let path = std::env::temp_dir().join("bus2go-tests").join("missing.db");
    assert!(matches!(Store::open(&path), Err(store::Error::NotFound(_))));
}

#[test]
fn gtfs_rejects_non_zip() {
    let fixture = Fixture::new("store-non-zip");
    let path = fixture.path("feed.zip");
    std::fs::write(&path, "not a zip").unwrap();
    assert!(Gtfs::from_zip(&path).is_err());
}

/// A second EXO bus archive reusing the first one's trip and stop ids.
const EXO_SOUTH: [(&str, &str); 4] = [
    (
        "routes.txt",
        "\
route_id,route_short_name,route_long_name,route_type
50,50,Navette Sud,3
",
    ),
    (
        "trips.txt",
        "\
route_id,service_id,trip_id,trip_headsign,direction_id
50,WEEKDAY,X-1,Terminus Sud,0
",
    ),
    (
        "stops.txt",
        "\
stop_id,stop_name
X1,Ailleurs
X2,Quai
",
    ),
    (
        "stop_times.txt",
        "\
trip_id,arrival_time,departure_time,stop_id,stop_sequence
X-1,13:00:00,13:00:00,X1,1
X-1,13:15:00,13:15:00,X2,2
",
    ),
];

#[test]
fn feeds_of_one_agency_coexist() {
    let fixture = Fixture::new("store-two-feeds");
    let repository = Repository::new(fixture.store.clone());
    let now = Time::new(0, 0, 0);
    let north = || {
        repository
            .stop_times("Gare", DayCode::Monday, now, "Terminus Nord", Agency::ExoBus)
            .unwrap()
    };
    let south = || {
        repository
            .stop_times("Ailleurs", DayCode::Monday, now, "Terminus Sud", Agency::ExoBus)
            .unwrap()
    };
    assert_eq!(north().len(), 1);

    fixture.import_feed(Agency::ExoBus, "south", &EXO_SOUTH);
    assert_eq!(north().len(), 1);
    assert_eq!(south().len(), 1);
    assert_eq!(south()[0].time, Time::new(13, 0, 0));
    assert_eq!(
        fixture.store.feeds(Agency::ExoBus).unwrap(),
        vec!["exo", "south"]
    );
    let routes = repository.routes(Agency::ExoBus).unwrap();
    assert_eq!(routes.len(), 2);

    // Re-importing one feed leaves the other alone.
    fixture.import_feed(Agency::ExoBus, "south", &EXO_SOUTH);
    assert_eq!(north().len(), 1);
    assert_eq!(south().len(), 1);
}

#[test]
fn hours_past_ninety_nine_keep_their_order() {
    let fixture = Fixture::new("store-long-hours");
    fixture.import_feed(
        Agency::ExoBus,
        "night",
        &[
            (
                "routes.txt",
                "route_id,route_short_name,route_long_name,route_type\n9,9,Nuit,3\n",
            ),
            (
                "trips.txt",
                "route_id,service_id,trip_id,trip_headsign,direction_id\n\
                 9,WEEKDAY,N-1,Nuit,0\n\
                 9,WEEKDAY,N-2,Nuit,0\n",
            ),
            ("stops.txt", "stop_id,stop_name\nN1,Veille\n"),
            (
                "stop_times.txt",
                "trip_id,arrival_time,departure_time,stop_id,stop_sequence\n\
                 N-1,100:00:00,100:00:00,N1,1\n\
                 N-2,99:00:00,99:00:00,N1,1\n",
            ),
        ],
    );
    let repository = Repository::new(fixture.store.clone());
    let query = |time| {
        repository
            .stop_times("Veille", DayCode::Monday, time, "Nuit", Agency::ExoBus)
            .unwrap()
            .iter()
            .map(|st| st.time)
            .collect::<Vec<_>>()
    };
    assert_eq!(
        query(Time::new(0, 0, 0)),
        vec![Time::new(99, 0, 0), Time::new(100, 0, 0)]
    );
    assert_eq!(query(Time::new(99, 30, 0)), vec![Time::new(100, 0, 0)]);
}

#[test]
fn store_from_older_schema_is_rebuilt() {
    let fixture = Fixture::new("store-schema");
    let path = fixture.path("bus2go.db");
    rusqlite::Connection::open(&path)
        .unwrap()
        .pragma_update(None, "user_version", 1)
        .unwrap();

    let store = Store::create(&path).unwrap();
    assert_eq!(count(&store, "SELECT COUNT(*) FROM routes"), 0);

    // A current store keeps its data.
    fixture.import_feed(Agency::Stm, "stm", common::stm_files());
    let store = Store::create(&path).unwrap();
    assert_eq!(count(&store, "SELECT COUNT(*) FROM routes"), 2);
}
