use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::favourites::{self, Favourites, TransitData};

/// Persistence for the user's favourites.
pub trait FavouritesStore {
    fn load(&self) -> Result<Favourites, favourites::Error>;

    fn save(&self, favourites: &Favourites) -> Result<(), favourites::Error>;

    /// Returns the favourites after the change.
    fn add(&self, data: TransitData) -> Result<Favourites, favourites::Error> {
        let mut favourites = self.load()?;
        if favourites.add(data) {
            self.save(&favourites)?;
        }
        Ok(favourites)
    }

    /// Returns the favourites after the change and how many entries were
    /// removed from what was stored.
    fn remove(&self, remove: &[TransitData]) -> Result<(Favourites, usize), favourites::Error> {
        let mut favourites = self.load()?;
        let removed = favourites.remove(remove);
        if removed > 0 {
            self.save(&favourites)?;
        }
        Ok((favourites, removed))
    }
}

/// Favourites kept in a JSON file. A missing file reads as no favourites.
#[derive(Debug, Clone)]
pub struct JsonFavouritesStore {
    path: PathBuf,
}

impl JsonFavouritesStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FavouritesStore for JsonFavouritesStore {
    fn load(&self) -> Result<Favourites, favourites::Error> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Favourites::default()),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, favourites: &Favourites) -> Result<(), favourites::Error> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        // Write next to the target and rename so readers never see half a file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(favourites)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!(
            "Saved {} favourites to {}",
            favourites.len(),
            self.path.display()
        );
        Ok(())
    }
}
