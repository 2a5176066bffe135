use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    selection::Selection,
    shared::{Agency, Duration, Time},
};

/// Countdowns below this are shown as imminent.
pub const IMMINENT: Duration = Duration::from_seconds(3 * 60 + 59);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StmBusData {
    pub stop_name: Arc<str>,
    pub trip_headsign: Arc<str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExoBusData {
    pub stop_name: Arc<str>,
    pub route_id: Arc<str>,
    pub trip_headsign: Arc<str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrainData {
    pub stop_name: Arc<str>,
    pub route_id: u32,
    pub direction_id: u32,
    /// Display name of the direction, e.g. the terminus.
    pub direction: Arc<str>,
}

/// A favourited stop, tagged by the agency whose data it points into.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "agency")]
pub enum TransitData {
    #[serde(rename = "stm")]
    Stm(StmBusData),
    #[serde(rename = "exo")]
    ExoBus(ExoBusData),
    #[serde(rename = "train")]
    ExoTrain(TrainData),
}

impl TransitData {
    pub fn agency(&self) -> Agency {
        match self {
            TransitData::Stm(_) => Agency::Stm,
            TransitData::ExoBus(_) => Agency::ExoBus,
            TransitData::ExoTrain(_) => Agency::ExoTrain,
        }
    }

    pub fn stop_name(&self) -> &str {
        match self {
            TransitData::Stm(data) => &data.stop_name,
            TransitData::ExoBus(data) => &data.stop_name,
            TransitData::ExoTrain(data) => &data.stop_name,
        }
    }

    /// Headsign for buses, direction name for trains.
    pub fn label(&self) -> &str {
        match self {
            TransitData::Stm(data) => &data.trip_headsign,
            TransitData::ExoBus(data) => &data.trip_headsign,
            TransitData::ExoTrain(data) => &data.direction,
        }
    }
}

impl From<StmBusData> for TransitData {
    fn from(value: StmBusData) -> Self {
        TransitData::Stm(value)
    }
}

impl From<ExoBusData> for TransitData {
    fn from(value: ExoBusData) -> Self {
        TransitData::ExoBus(value)
    }
}

impl From<TrainData> for TransitData {
    fn from(value: TrainData) -> Self {
        TransitData::ExoTrain(value)
    }
}

/// Saved favourites, one list per agency.
///
/// Iteration order is fixed: STM, then EXO bus, then EXO train, each list in
/// the order entries were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favourites {
    #[serde(default)]
    pub stm: Vec<StmBusData>,
    #[serde(default)]
    pub exo_bus: Vec<ExoBusData>,
    #[serde(default)]
    pub exo_train: Vec<TrainData>,
}

impl Favourites {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn is_empty(&self) -> bool {
        self.stm.is_empty() && self.exo_bus.is_empty() && self.exo_train.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stm.len() + self.exo_bus.len() + self.exo_train.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = TransitData> + '_ {
        let stm = self.stm.iter().cloned().map(TransitData::Stm);
        let exo = self.exo_bus.iter().cloned().map(TransitData::ExoBus);
        let train = self.exo_train.iter().cloned().map(TransitData::ExoTrain);
        stm.chain(exo).chain(train)
    }

    pub fn contains(&self, data: &TransitData) -> bool {
        match data {
            TransitData::Stm(data) => self.stm.contains(data),
            TransitData::ExoBus(data) => self.exo_bus.contains(data),
            TransitData::ExoTrain(data) => self.exo_train.contains(data),
        }
    }

    /// Appends `data` to its agency's list. Returns `false` if it was
    /// already saved.
    pub fn add(&mut self, data: TransitData) -> bool {
        if self.contains(&data) {
            return false;
        }
        match data {
            TransitData::Stm(data) => self.stm.push(data),
            TransitData::ExoBus(data) => self.exo_bus.push(data),
            TransitData::ExoTrain(data) => self.exo_train.push(data),
        }
        true
    }

    /// Removes every entry in `remove`. Returns how many were removed.
    pub fn remove(&mut self, remove: &[TransitData]) -> usize {
        let before = self.len();
        self.retain(|data| !remove.contains(data));
        before - self.len()
    }

    pub fn remove_selected(&mut self, selection: &Selection<TransitData>) -> usize {
        let before = self.len();
        self.retain(|data| !selection.is_selected(data));
        before - self.len()
    }

    fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&TransitData) -> bool,
    {
        self.stm
            .retain(|data| keep(&TransitData::Stm(data.clone())));
        self.exo_bus
            .retain(|data| keep(&TransitData::ExoBus(data.clone())));
        self.exo_train
            .retain(|data| keep(&TransitData::ExoTrain(data.clone())));
    }
}

/// A favourite paired with its next arrival today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FavouriteTransitInfo {
    pub transit_data: TransitData,
    /// `None` when nothing is left today or the favourite no longer exists
    /// in the reference data.
    pub arrival_time: Option<Time>,
    pub agency: Agency,
}

impl FavouriteTransitInfo {
    pub fn time_remaining(&self, now: Time) -> Option<Duration> {
        self.arrival_time?.time_remaining(now)
    }

    pub fn is_imminent(&self, now: Time) -> bool {
        self.time_remaining(now)
            .is_some_and(|remaining| remaining < IMMINENT)
    }

    /// Countdown text shown next to the favourite.
    pub fn countdown_label(&self, now: Time) -> String {
        match self.arrival_time {
            None => "None for today".to_string(),
            // A passed arrival reads as due until the next refresh replaces it.
            Some(arrival) => countdown(arrival.time_remaining(now).unwrap_or(Duration::ZERO)),
        }
    }
}

pub fn countdown(remaining: Duration) -> String {
    if remaining.hours() > 0 {
        format!("In {} h, {} min", remaining.hours(), remaining.minutes())
    } else {
        format!("In {} min", remaining.minutes())
    }
}
