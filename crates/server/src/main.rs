mod api;
mod config;
mod dto;
mod state;

use crate::{config::Config, state::AppState};
use axum::routing::{get, post};
use bus2go::{favourites::JsonFavouritesStore, gtfs::Gtfs, shared::Agency, store::Store};
use std::{path::Path, sync::Arc, time::Instant};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    info!("Starting server...");
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    };

    let store = match Store::create(&config.database_path) {
        Ok(store) => store,
        Err(err) => {
            error!("Failed to open store: {err}");
            std::process::exit(1);
        }
    };

    // Optional `<agency> <gtfs.zip>` pairs are imported before serving. The
    // zip's file stem names the feed, so one agency can be given several zips.
    let args: Vec<_> = std::env::args().skip(1).collect();
    if args.len() % 2 != 0 {
        error!("Expected <agency> <gtfs zip> pairs");
        std::process::exit(1);
    }
    for pair in args.chunks(2) {
        if let Err(err) = import(&store, &pair[0], Path::new(&pair[1])) {
            error!("Failed to import {}: {err}", pair[1]);
            std::process::exit(1);
        }
    }

    let favourites_store = JsonFavouritesStore::new(&config.favourites_path);
    let state = match AppState::new(
        store,
        favourites_store,
        config.data_dir.clone(),
        config.refresh.clone(),
    ) {
        Ok(state) => Arc::new(state),
        Err(err) => {
            error!("Failed to load favourites: {err}");
            std::process::exit(1);
        }
    };

    let app = axum::Router::new()
        .route("/routes", get(api::routes))
        .route("/directions", get(api::directions))
        .route("/headsigns", get(api::headsigns))
        .route("/stops", get(api::stops))
        .route("/times", get(api::times))
        .route(
            "/favourites",
            get(api::favourites)
                .post(api::add_favourite)
                .delete(api::remove_favourites),
        )
        .route("/favourites/live", get(api::live_favourites))
        .route("/feeds/{agency}", post(api::fetch_feed))
        .with_state(state);

    let listener = match tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("Failed to bind port {}: {err}", config.port);
            std::process::exit(1);
        }
    };
    info!("Listening to port {}", config.port);
    if let Err(err) = axum::serve(listener, app).await {
        error!("Server error: {err}");
    }
}

fn import(store: &Store, agency: &str, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let agency: Agency = agency.parse()?;
    let feed = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| agency.as_str().to_string());
    info!("Loading {agency} feed {feed:?}...");
    let now = Instant::now();
    let gtfs = Gtfs::from_zip(path)?;
    store.import_gtfs(agency, &feed, &gtfs)?;
    info!("Loading {agency} feed {feed:?} took {:?}", now.elapsed());
    Ok(())
}
