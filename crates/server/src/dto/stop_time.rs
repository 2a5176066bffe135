use bus2go::{favourites::countdown, repository::StopTime, shared::Time};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct StopTimeDto {
    pub headsign: String,
    pub time: String,
    pub countdown: Option<String>,
}

impl StopTimeDto {
    pub fn from(stop_time: &StopTime, now: Time) -> Self {
        Self {
            headsign: stop_time.headsign.to_string(),
            time: stop_time.time.to_string(),
            countdown: stop_time.time.time_remaining(now).map(countdown),
        }
    }
}
