#![allow(dead_code)]

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use bus2go::{gtfs::Gtfs, shared::Agency, store::Store};
use zip::{ZipWriter, write::SimpleFileOptions};

const CALENDAR: &str = "\
service_id,monday,tuesday,wednesday,thursday,friday,saturday,sunday,start_date,end_date
WEEKDAY,1,1,1,1,1,0,0,20240101,20301231
WEEKEND,0,0,0,0,0,1,1,20240101,20301231
";

/// STM route 6 runs both ways. `6-E2` is a short-turn trip and `6-E1` has
/// an untimed call at Echo that the import drops.
const STM: [(&str, &str); 4] = [
    (
        "routes.txt",
        "\
route_id,agency_id,route_short_name,route_long_name,route_type
6,STM,6,Boulevard Six,3
24,STM,24,Rue Vingt-Quatre,3
",
    ),
    (
        "trips.txt",
        "\
route_id,service_id,trip_id,trip_headsign,direction_id
6,WEEKDAY,6-E1,6 Est,0
6,WEEKDAY,6-E2,6 Est,0
6,WEEKDAY,6-E4,6 Est,0
6,WEEKDAY,6-E6,6 Est,0
6,WEEKEND,6-E3,6 Est,0
6,WEEKDAY,6-W1,6 Ouest,1
24,WEEKDAY,24-N1,24 Nord,0
",
    ),
    (
        "stops.txt",
        "\
stop_id,stop_name,stop_lat,stop_lon
S1,Alpha,45.50,-73.56
S2,Bravo,45.51,-73.57
S3,Charlie,45.52,-73.58
S4,Delta,45.53,-73.59
S5,Echo,45.54,-73.60
",
    ),
    (
        "stop_times.txt",
        "\
trip_id,arrival_time,departure_time,stop_id,stop_sequence
6-E1,08:00:00,08:00:00,S1,1
6-E1,08:05:00,08:05:00,S2,2
6-E1,08:10:00,08:10:00,S3,3
6-E1,08:15:00,08:15:00,S4,4
6-E1,,,S5,5
6-E2,09:00:00,09:00:00,S1,1
6-E2,09:05:00,09:05:00,S2,2
6-E4,7:30:00,7:30:00,S1,1
6-E4,7:35:00,7:35:00,S2,2
6-E6,24:30:00,24:30:00,S1,1
6-E6,24:35:00,24:35:00,S2,2
6-E3,10:00:00,10:00:00,S1,1
6-E3,10:05:00,10:05:00,S2,2
6-W1,08:30:00,08:30:00,S4,1
6-W1,08:35:00,08:35:00,S3,2
6-W1,08:40:00,08:40:00,S2,3
6-W1,08:45:00,08:45:00,S1,4
24-N1,11:00:00,11:00:00,S3,1
",
    ),
];

const EXO_BUS: [(&str, &str); 4] = [
    (
        "routes.txt",
        "\
route_id,route_short_name,route_long_name,route_type
1,1,Navette Centre,3
",
    ),
    (
        "trips.txt",
        "\
route_id,service_id,trip_id,trip_headsign,direction_id
1,WEEKDAY,X-1,Terminus Nord,0
",
    ),
    (
        "stops.txt",
        "\
stop_id,stop_name
X1,Gare
X2,Centre
",
    ),
    (
        "stop_times.txt",
        "\
trip_id,arrival_time,departure_time,stop_id,stop_sequence
X-1,12:00:00,12:00:00,X1,1
X-1,12:10:00,12:10:00,X2,2
",
    ),
];

const EXO_TRAIN: [(&str, &str); 4] = [
    (
        "routes.txt",
        "\
route_id,route_short_name,route_long_name,route_type
4,exo4,Ligne Quatre,2
",
    ),
    (
        "trips.txt",
        "\
route_id,service_id,trip_id,trip_headsign,direction_id
4,WEEKDAY,R-1,Centrale,0
4,WEEKDAY,R-2,Banlieue,1
",
    ),
    (
        "stops.txt",
        "\
stop_id,stop_name
T1,Parc
T2,Centrale
T3,Banlieue
",
    ),
    (
        "stop_times.txt",
        "\
trip_id,arrival_time,departure_time,stop_id,stop_sequence
R-1,06:00:00,06:00:00,T3,1
R-1,06:10:00,06:10:00,T1,2
R-1,06:20:00,06:20:00,T2,3
R-2,17:00:00,17:00:00,T2,1
R-2,17:10:00,17:10:00,T1,2
R-2,17:20:00,17:20:00,T3,3
",
    ),
];

/// A schedule store with all three agencies imported, removed on drop.
pub struct Fixture {
    pub dir: PathBuf,
    pub store: Store,
}

impl Fixture {
    /// `name` keeps directories apart between tests running in parallel.
    pub fn new(name: &str) -> Self {
        let dir = std::env::temp_dir()
            .join("bus2go-tests")
            .join(format!("{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();

        let store = Store::create(dir.join("bus2go.db")).unwrap();
        for (agency, files) in [
            (Agency::Stm, STM),
            (Agency::ExoBus, EXO_BUS),
            (Agency::ExoTrain, EXO_TRAIN),
        ] {
            let path = dir.join(format!("{}.zip", agency.as_str()));
            write_feed(&path, &files);
            let gtfs = Gtfs::from_zip(&path).unwrap();
            store.import_gtfs(agency, agency.as_str(), &gtfs).unwrap();
        }
        Self { dir, store }
    }

    /// Imports one more feed for `agency` next to the fixture data.
    pub fn import_feed(&self, agency: Agency, feed: &str, files: &[(&str, &str)]) {
        let path = self.dir.join(format!("{}-{feed}.zip", agency.as_str()));
        write_feed(&path, files);
        let gtfs = Gtfs::from_zip(&path).unwrap();
        self.store.import_gtfs(agency, feed, &gtfs).unwrap();
    }

    pub fn path(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

/// Writes a GTFS zip holding `files` plus the shared calendar.
pub fn write_feed(path: &Path, files: &[(&str, &str)]) {
    let mut zip = ZipWriter::new(File::create(path).unwrap());
    let options = SimpleFileOptions::default();
    zip.start_file("calendar.txt", options).unwrap();
    zip.write_all(CALENDAR.as_bytes()).unwrap();
    for (name, content) in files {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

/// Feed files for the STM fixture, for tests that re-import it.
pub fn stm_files() -> &'static [(&'static str, &'static str)] {
    &STM
}
