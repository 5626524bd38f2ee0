use std::{num::NonZeroU32, sync::Arc};

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::MovieInsert;

/// Results per page of the popular listing.
pub const PAGE_SIZE: u32 = 20;
pub const LANGUAGE: &str = "en-US";

const GENRES: [(u32, &str); 19] = [
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Sci-Fi"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
];

#[derive(Debug, Error)]
pub enum TmdbError {
    #[error("TMDB request failed: {0}")]
    Transport(#[from] wreq::Error),
    #[error("TMDB fetch failed: {status}")]
    Status { status: u16 },
}

pub struct TmdbClient {
    client: wreq::Client,
    api_key: String,
    base_url: String,
    image_base_url: String,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl TmdbClient {
    pub fn new(
        client: wreq::Client,
        api_key: String,
        base_url: String,
        image_base_url: String,
        rps: u32,
    ) -> Self {
        if api_key.trim().is_empty() {
            warn!("no TMDB_API_KEY provided, catalog requests will be rejected");
        }

        let rps = NonZeroU32::new(rps).unwrap_or(NonZeroU32::MIN);
        let limiter = Arc::new(RateLimiter::direct(Quota::per_second(rps)));
        Self { client, api_key, base_url, image_base_url, limiter }
    }

    /// Fetches `count` popular movies and maps them for insertion into a room.
    ///
    /// Pages are requested one after another and every page in `1..=ceil(count / 20)` is
    /// requested, even when an earlier page came back short. Entries without a poster or
    /// an overview are dropped after truncating to `count`, so the result can be shorter
    /// than asked for. Any failed page fails the whole call.
    pub async fn fetch_movie_pool(&self, count: u32) -> Result<Vec<MovieInsert>, TmdbError> {
        let pages = pages_for(count);
        debug!(count = count, pages = pages, "fetching movie pool");

        let mut movies = Vec::new();
        for page in 1..=pages {
            let mut results = self.popular_page(page).await?;
            debug!(page = page, results = results.len(), "fetched popular page");
            movies.append(&mut results);
        }

        let pool = build_pool(movies, count, &self.image_base_url);
        debug!(requested = count, kept = pool.len(), "built movie pool");
        Ok(pool)
    }

    async fn popular_page(&self, page: u32) -> Result<Vec<TmdbMovie>, TmdbError> {
        self.limiter.until_ready().await;

        let url = format!("{}/movie/popular", self.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .get(url)
            .query(&[("api_key", self.api_key.as_str()), ("language", LANGUAGE)])
            .query(&[("page", page)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            warn!(page = page, status = status.as_u16(), "TMDB returned an error status");
            return Err(TmdbError::Status { status: status.as_u16() });
        }

        let body: PopularResponse = resp.json().await?;
        Ok(body.results)
    }
}

pub fn pages_for(count: u32) -> u32 {
    count.div_ceil(PAGE_SIZE)
}

pub fn genre_name(id: u32) -> Option<&'static str> {
    GENRES.iter().find(|(gid, _)| *gid == id).map(|(_, name)| *name)
}

/// Rounds a rating to one decimal, ties away from zero.
pub fn round_rating(value: f64) -> f64 {
    ((value * 10.0).round() / 10.0).clamp(0.0, 10.0)
}

fn build_pool(movies: Vec<TmdbMovie>, count: u32, image_base_url: &str) -> Vec<MovieInsert> {
    let image_base_url = image_base_url.trim_end_matches('/');
    movies
        .into_iter()
        .take(count as usize)
        .filter_map(|m| {
            let poster_path = m.poster_path.filter(|p| !p.trim().is_empty())?;
            let overview = m.overview.filter(|o| !o.trim().is_empty())?;
            let poster_url = if poster_path.starts_with('/') {
                format!("{image_base_url}{poster_path}")
            } else {
                format!("{image_base_url}/{poster_path}")
            };
            Some(MovieInsert {
                tmdb_id: m.id,
                title: m.title,
                poster_url,
                overview,
                genres: m
                    .genre_ids
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(genre_name)
                    .map(String::from)
                    .collect(),
                vote_average: round_rating(m.vote_average.unwrap_or_default()),
            })
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct PopularResponse {
    results: Vec<TmdbMovie>,
}

// Optional fields may be absent or `null`; either way the entry is treated as missing them.
#[derive(Debug, Deserialize)]
struct TmdbMovie {
    id: i64,
    title: String,
    poster_path: Option<String>,
    overview: Option<String>,
    genre_ids: Option<Vec<u32>>,
    vote_average: Option<f64>,
}
