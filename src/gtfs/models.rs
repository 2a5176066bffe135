use serde::{Deserialize, Serialize};

use crate::shared::DayCode;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GtfsRoute {
    pub route_id: String,
    pub route_short_name: Option<String>,
    pub route_long_name: Option<String>,
    pub route_type: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GtfsTrip {
    pub route_id: String,
    pub service_id: String,
    pub trip_id: String,
    pub trip_headsign: Option<String>,
    pub direction_id: Option<u8>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GtfsStop {
    pub stop_id: String,
    pub stop_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GtfsStopTime {
    pub trip_id: String,
    pub arrival_time: String,
    pub departure_time: String,
    pub stop_id: String,
    pub stop_sequence: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GtfsCalendar {
    pub service_id: String,
    pub monday: u8,
    pub tuesday: u8,
    pub wednesday: u8,
    pub thursday: u8,
    pub friday: u8,
    pub saturday: u8,
    pub sunday: u8,
    pub start_date: String,
    pub end_date: String,
}

impl GtfsCalendar {
    /// Day-code string for the weekdays this service runs, Monday first.
    pub fn day_codes(&self) -> String {
        [
            (self.monday, DayCode::Monday),
            (self.tuesday, DayCode::Tuesday),
            (self.wednesday, DayCode::Wednesday),
            (self.thursday, DayCode::Thursday),
            (self.friday, DayCode::Friday),
            (self.saturday, DayCode::Saturday),
            (self.sunday, DayCode::Sunday),
        ]
        .into_iter()
        .filter(|(flag, _)| *flag == 1)
        .map(|(_, day)| day.code())
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_service_codes() {
        let calendar = GtfsCalendar {
            service_id: "WEEKDAY".into(),
            monday: 1,
            tuesday: 1,
            wednesday: 1,
            thursday: 1,
            friday: 1,
            saturday: 0,
            sunday: 0,
            start_date: "20240101".into(),
            end_date: "20241231".into(),
        };
        assert_eq!(calendar.day_codes(), "mtwyf");
    }
}
