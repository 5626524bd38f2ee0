use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{CreateRoomRequest, CreatedRoom, MovieInsert, PoolQuery, Room},
    pool,
};

/// Largest pool, in movies, a single request may ask for (25 catalog pages).
pub const MAX_POOL_SIZE: u32 = 500;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/pool", get(pool_handler))
        .route("/rooms", post(create_room))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

pub async fn pool_handler(
    State(state): State<Arc<AppState>>,
    Query(q): Query<PoolQuery>,
) -> AppResult<Json<Vec<MovieInsert>>> {
    validate_count(q.count)?;
    let movies = state.tmdb.fetch_movie_pool(q.count).await?;
    Ok(Json(movies))
}

pub async fn create_room(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateRoomRequest>,
) -> AppResult<(StatusCode, Json<CreatedRoom>)> {
    validate_count(req.movie_count)?;
    if !req.majority_threshold.is_finite()
        || req.majority_threshold <= 0.0
        || req.majority_threshold > 1.0
    {
        return Err(AppError::bad_request("majority_threshold must be in (0, 1]"));
    }

    let room = Room::new(req.majority_threshold);
    let inserts = state.tmdb.fetch_movie_pool(req.movie_count).await?;
    let movies = pool::assign_to_room(room.id, inserts);

    info!(room = %room.id, code = %room.code, movies = movies.len(), "created room");
    Ok((StatusCode::CREATED, Json(CreatedRoom { room, movies })))
}

fn validate_count(count: u32) -> AppResult<()> {
    if count == 0 || count > MAX_POOL_SIZE {
        return Err(AppError::bad_request(format!("count must be between 1 and {MAX_POOL_SIZE}")));
    }
    Ok(())
}
