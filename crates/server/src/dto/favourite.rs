use bus2go::{
    favourites::{FavouriteTransitInfo, TransitData},
    shared::{Agency, Time},
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct FavouriteDto {
    pub transit_data: TransitData,
    pub agency: Agency,
    pub arrival_time: Option<String>,
    pub countdown: String,
    pub imminent: bool,
}

impl FavouriteDto {
    pub fn from(info: &FavouriteTransitInfo, now: Time) -> Self {
        Self {
            transit_data: info.transit_data.clone(),
            agency: info.agency,
            arrival_time: info.arrival_time.map(|time| time.to_string()),
            countdown: info.countdown_label(now),
            imminent: info.is_imminent(now),
        }
    }

    pub fn list(infos: &[FavouriteTransitInfo], now: Time) -> Vec<Self> {
        infos.iter().map(|info| Self::from(info, now)).collect()
    }
}
