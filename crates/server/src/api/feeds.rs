use std::{collections::HashMap, sync::Arc, time::Instant};

use crate::{
    api::{blocking, required},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bus2go::{gtfs::Gtfs, shared::Agency};
use futures_util::StreamExt;
use reqwest::header::ACCEPT_ENCODING;
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::{error, info};

/// Downloads the GTFS zip at `q` and rebuilds the schedule of one feed of the
/// agency from it. `feed` names the feed and defaults to the agency, so an
/// agency published as several archives is imported once per archive.
pub async fn fetch_feed(
    Path(agency): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    let agency: Agency = agency.parse().map_err(|_| StatusCode::NOT_FOUND)?;
    let url = required(&params, "q")?;
    let feed = match params.get("feed") {
        Some(feed) if is_feed_name(feed) => feed.clone(),
        Some(_) => return Err(StatusCode::BAD_REQUEST),
        None => agency.as_str().to_string(),
    };
    let _guard = state.import_lock.lock().await;

    let response = reqwest::Client::new()
        .get(url)
        .header(ACCEPT_ENCODING, "gzip, deflate")
        .send()
        .await
        .map_err(|err| {
            error!("Failed to fetch: {err}");
            StatusCode::BAD_REQUEST
        })?;

    if !response.status().is_success() {
        let body = response.text().await.unwrap_or_default();
        error!("Response is not success: {body}");
        return Err(StatusCode::BAD_REQUEST);
    }

    tokio::fs::create_dir_all(&state.data_dir)
        .await
        .map_err(|err| {
            error!("Failed to create data dir: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    let path = state
        .data_dir
        .join(format!("{}-{feed}.zip", agency.as_str()));
    let mut file = File::create(&path).await.map_err(|err| {
        error!("Failed to create file: {err}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let data = chunk.map_err(|err| {
            error!("Failed to fetch chunk: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

        file.write_all(&data).await.map_err(|err| {
            error!("Failed to write to file: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    }

    file.flush().await.map_err(|err| {
        error!("Failed to flush file: {err}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let store = state.store.clone();
    blocking(move || {
        info!("Loading {agency} feed {feed:?}...");
        let now = Instant::now();
        let gtfs = Gtfs::from_zip(&path)?;
        store.import_gtfs(agency, &feed, &gtfs)?;
        info!("Loading {agency} feed {feed:?} took {:?}", now.elapsed());
        Ok::<_, bus2go::store::Error>(())
    })
    .await?;

    state.notify_changed();
    Ok(().into_response())
}

/// Feed names end up in file names.
fn is_feed_name(feed: &str) -> bool {
    !feed.is_empty()
        && feed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
