use std::{collections::HashMap, sync::Arc};

use crate::{
    api::{blocking, parsed, required},
    dto::StopTimeDto,
    state::AppState,
};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bus2go::shared::{Agency, DayCode, Time};

fn agency(params: &HashMap<String, String>) -> Result<Agency, StatusCode> {
    parsed(params, "agency")?.ok_or(StatusCode::BAD_REQUEST)
}

pub async fn routes(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    let agency = agency(&params)?;
    let repository = state.repository.clone();
    let routes = blocking(move || repository.routes(agency)).await?;
    Ok(Json(routes).into_response())
}

pub async fn directions(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    let agency = agency(&params)?;
    let route: u32 = parsed(&params, "route")?.ok_or(StatusCode::BAD_REQUEST)?;
    let repository = state.repository.clone();
    let directions = blocking(move || repository.directions(agency, route)).await?;
    Ok(Json(directions).into_response())
}

pub async fn headsigns(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    let agency = agency(&params)?;
    let route: u32 = parsed(&params, "route")?.ok_or(StatusCode::BAD_REQUEST)?;
    let repository = state.repository.clone();
    let headsigns = blocking(move || repository.trip_headsigns(agency, route)).await?;
    Ok(Json(headsigns).into_response())
}

pub async fn stops(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    let agency = agency(&params)?;
    let headsign = required(&params, "headsign")?.to_string();
    let repository = state.repository.clone();
    let stops = blocking(move || repository.stop_names(agency, &headsign)).await?;
    Ok(Json(stops).into_response())
}

/// Upcoming stop times. Buses are looked up by headsign, trains by route
/// and direction. `day` and `time` default to now.
pub async fn times(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    let agency = agency(&params)?;
    let stop = required(&params, "stop")?.to_string();
    let day: DayCode = parsed(&params, "day")?.unwrap_or_else(DayCode::today);
    let now: Time = parsed(&params, "time")?.unwrap_or_else(Time::now);
    let repository = state.repository.clone();

    let stop_times = if agency.is_train() {
        let route: u32 = parsed(&params, "route")?.ok_or(StatusCode::BAD_REQUEST)?;
        let direction: u32 = parsed(&params, "direction")?.ok_or(StatusCode::BAD_REQUEST)?;
        blocking(move || repository.train_stop_times(route, &stop, direction, now, day)).await?
    } else {
        let headsign = required(&params, "headsign")?.to_string();
        blocking(move || repository.stop_times(&stop, day, now, &headsign, agency)).await?
    };

    let result: Vec<_> = stop_times
        .iter()
        .map(|stop_time| StopTimeDto::from(stop_time, now))
        .collect();
    Ok(Json(result).into_response())
}
