#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use flickswipe::tmdb::TmdbClient;
use serde_json::{Value, json};

pub const IMG: &str = "https://image.tmdb.org/t/p/w500";

/// In-process stand-in for the TMDB popular listing.
#[derive(Clone, Default)]
pub struct Catalog {
    pages: Arc<Vec<Vec<Value>>>,
    fail_page: Option<u32>,
    garbled_page: Option<u32>,
    requests: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl Catalog {
    pub fn with_pages(pages: Vec<Vec<Value>>) -> Self {
        Self { pages: Arc::new(pages), ..Default::default() }
    }

    /// `pages` full pages of well-formed movies, ids numbered from 1.
    pub fn full(pages: usize) -> Self {
        let pages = (0..pages)
            .map(|p| (1..=20).map(|i| movie((p * 20 + i) as i64, &[28])).collect())
            .collect();
        Self::with_pages(pages)
    }

    pub fn failing_on(mut self, page: u32) -> Self {
        self.fail_page = Some(page);
        self
    }

    /// Answers `page` with 200 and a body that is not a popular listing.
    pub fn garbled_on(mut self, page: u32) -> Self {
        self.garbled_page = Some(page);
        self
    }

    pub fn requests(&self) -> Vec<HashMap<String, String>> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requested_pages(&self) -> Vec<u32> {
        self.requests().iter().map(|q| q["page"].parse().unwrap()).collect()
    }

    pub async fn spawn(&self) -> String {
        let app = Router::new().route("/movie/popular", get(popular)).with_state(self.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}")
    }

    pub async fn client(&self) -> TmdbClient {
        let base_url = self.spawn().await;
        let http = wreq::Client::builder().build().unwrap();
        TmdbClient::new(http, "test-key".to_string(), base_url, IMG.to_string(), 1000)
    }
}

async fn popular(
    State(catalog): State<Catalog>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    catalog.requests.lock().unwrap().push(query.clone());

    let page: u32 = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    if catalog.fail_page == Some(page) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    if catalog.garbled_page == Some(page) {
        return Json(json!({ "page": page, "status_message": "no results here" })).into_response();
    }

    let results = catalog.pages.get(page as usize - 1).cloned().unwrap_or_default();
    Json(json!({ "page": page, "results": results })).into_response()
}

pub fn movie(id: i64, genre_ids: &[u32]) -> Value {
    json!({
        "id": id,
        "title": format!("Movie {id}"),
        "poster_path": format!("/p{id}.jpg"),
        "overview": format!("Overview {id}"),
        "genre_ids": genre_ids,
        "vote_average": 7.25,
    })
}
