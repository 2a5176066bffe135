use std::{convert::Infallible, sync::Arc};

use crate::{api::blocking, dto::FavouriteDto, state::AppState};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use bus2go::{
    favourites::{FavouritesStore, TransitData},
    refresh::{Refresh, Snapshot},
    shared::Time,
};
use futures_util::{Stream, stream};
use tracing::{debug, error};

pub async fn favourites(State(state): State<Arc<AppState>>) -> Result<Response, StatusCode> {
    let favourites = state.favourites.read().await.clone();
    let aggregator = state.aggregator.clone();
    let infos = blocking(move || Ok::<_, Infallible>(aggregator.next_arrivals_now(&favourites))).await?;
    Ok(Json(FavouriteDto::list(&infos, Time::now())).into_response())
}

pub async fn add_favourite(
    State(state): State<Arc<AppState>>,
    Json(data): Json<TransitData>,
) -> Result<Response, StatusCode> {
    // Held across the save so the file and the shared copy stay in step.
    let mut favourites = state.favourites.write().await;
    if favourites.contains(&data) {
        return Ok(StatusCode::OK.into_response());
    }
    let store = state.favourites_store.clone();
    *favourites = blocking(move || store.add(data)).await?;
    drop(favourites);
    state.notify_changed();
    Ok(StatusCode::CREATED.into_response())
}

pub async fn remove_favourites(
    State(state): State<Arc<AppState>>,
    Json(remove): Json<Vec<TransitData>>,
) -> Result<Response, StatusCode> {
    let mut favourites = state.favourites.write().await;
    let store = state.favourites_store.clone();
    let (updated, removed) = blocking(move || store.remove(&remove)).await?;
    *favourites = updated;
    drop(favourites);
    if removed > 0 {
        state.notify_changed();
    }
    Ok(Json(removed).into_response())
}

/// Streams the favourites list after every refresh cycle. The refresh task
/// stops when the client goes away.
pub async fn live_favourites(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let handle = Refresh::new(state.aggregator.clone(), state.favourites.clone())
        .with_config(state.refresh.clone())
        .following(state.changed.subscribe())
        .start();
    debug!("Live favourites client connected");
    let receiver = handle.subscribe();

    // The handle rides along with the stream and is dropped with it.
    let stream = stream::unfold((handle, receiver), |(handle, mut receiver)| async move {
        if receiver.changed().await.is_err() {
            error!("Favourites refresh stopped");
            return None;
        }
        let snapshot: Snapshot = receiver.borrow_and_update().clone();
        let event = Event::default()
            .event("favourites")
            .json_data(FavouriteDto::list(&snapshot, Time::now()));
        Some((event, (handle, receiver)))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
