use serde::de::DeserializeOwned;
use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::warn;
use zip::{ZipArchive, read::ZipFile};

mod config;
pub mod models;
pub use config::*;
pub use models::*;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Could not find file with name: {0}")]
    FileNotFound(String),
}

/// Streaming reader over a GTFS zip archive.
///
/// Records that fail to deserialize are skipped with a warning; a missing
/// required file is an error.
#[derive(Debug, Clone)]
pub struct Gtfs {
    config: Config,
    path: PathBuf,
}

impl Gtfs {
    pub fn from_zip<P: AsRef<Path>>(path: P) -> Result<Self, self::Error> {
        Self::with_config(path, Config::default())
    }

    pub fn with_config<P: AsRef<Path>>(path: P, config: Config) -> Result<Self, self::Error> {
        let path = path.as_ref().to_path_buf();
        // Fail early on a path that is not a zip archive.
        ZipArchive::new(File::open(&path)?)?;
        Ok(Self { config, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn stream_routes<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, GtfsRoute)),
    {
        stream_from_zip::<GtfsRoute, F>(&self.path, &self.config.routes_file_name, f)
    }

    pub fn stream_trips<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, GtfsTrip)),
    {
        stream_from_zip::<GtfsTrip, F>(&self.path, &self.config.trips_file_name, f)
    }

    pub fn stream_stops<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, GtfsStop)),
    {
        stream_from_zip::<GtfsStop, F>(&self.path, &self.config.stops_file_name, f)
    }

    pub fn stream_stop_times<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, GtfsStopTime)),
    {
        stream_from_zip::<GtfsStopTime, F>(&self.path, &self.config.stop_times_file_name, f)
    }

    pub fn stream_calendar<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, GtfsCalendar)),
    {
        stream_from_zip::<GtfsCalendar, F>(&self.path, &self.config.calendar_file_name, f)
    }
}

fn stream_from_zip<T, F>(zip_path: &Path, file_name: &str, f: F) -> Result<(), self::Error>
where
    T: DeserializeOwned,
    F: FnMut((usize, T)),
{
    let zip_file = File::open(zip_path)?;
    let mut archive = ZipArchive::new(zip_file)?;
    let file = get_file(&mut archive, file_name)?;
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);
    reader
        .deserialize()
        .filter_map(|record| match record {
            Ok(record) => Some(record),
            Err(err) => {
                warn!("Skipping malformed record in {file_name}: {err}");
                None
            }
        })
        .enumerate()
        .for_each(f);
    Ok(())
}

fn get_file<'a>(
    archive: &'a mut ZipArchive<File>,
    name: &'a str,
) -> Result<ZipFile<'a, File>, self::Error> {
    let index = archive
        .index_for_name(name)
        .ok_or(self::Error::FileNotFound(name.to_string()))?;
    let file = archive.by_index(index)?;
    Ok(file)
}
