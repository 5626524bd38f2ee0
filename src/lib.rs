pub mod config;
pub mod error;
pub mod models;
pub mod pool;
pub mod routes;
pub mod tmdb;

use std::sync::Arc;

use crate::tmdb::TmdbClient;

pub struct AppState {
    pub tmdb: Arc<TmdbClient>,
}
