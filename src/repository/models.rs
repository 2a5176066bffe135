use std::sync::Arc;

use serde::Serialize;

use crate::shared::{DayCode, Time};

/// One scheduled call of a trip at a stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopTime {
    /// Rider-facing direction label of the trip.
    pub headsign: Arc<str>,
    /// Scheduled arrival, relative to the service day.
    pub time: Time,
    /// Days of the week the trip's service runs.
    pub days: Box<[DayCode]>,
}

impl StopTime {
    pub fn runs_on(&self, day: DayCode) -> bool {
        self.days.contains(&day)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub route_id: Arc<str>,
    pub long_name: Arc<str>,
}

/// One direction of a route with its stops in travel order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Direction {
    pub headsign: Arc<str>,
    pub stops: Box<[Arc<str>]>,
}

impl Direction {
    /// `"From <first stop> to <last stop>"`, or `None` without stops.
    pub fn description(&self) -> Option<String> {
        let first = self.stops.first()?;
        let last = self.stops.last()?;
        Some(format!("From {first} to {last}"))
    }
}
