mod favourites;
mod feeds;
mod schedules;

pub use favourites::*;
pub use feeds::*;
pub use schedules::*;

use axum::http::StatusCode;
use std::{collections::HashMap, fmt::Display, str::FromStr};
use tracing::error;

/// Runs blocking store work off the async workers.
pub(crate) async fn blocking<T, E, F>(f: F) -> Result<T, StatusCode>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Display + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|err| {
            error!("Blocking task failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|err| {
            error!("Query failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

pub(crate) fn required<'a>(
    params: &'a HashMap<String, String>,
    key: &str,
) -> Result<&'a str, StatusCode> {
    params
        .get(key)
        .map(String::as_str)
        .ok_or(StatusCode::BAD_REQUEST)
}

pub(crate) fn parsed<T: FromStr>(
    params: &HashMap<String, String>,
    key: &str,
) -> Result<Option<T>, StatusCode> {
    match params.get(key) {
        Some(value) => match value.parse() {
            Ok(value) => Ok(Some(value)),
            Err(_) => Err(StatusCode::BAD_REQUEST),
        },
        None => Ok(None),
    }
}
