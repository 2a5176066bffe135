use std::io;

use thiserror::Error;

mod aggregator;
mod models;
mod store;

pub use aggregator::*;
pub use models::*;
pub use store::*;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),
}
