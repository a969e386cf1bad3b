//! Scripted `TmdbApi` double for controller and binding tests.
#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Result, anyhow};
use moviefind_api::tmdb::{
    DiscoverMovieParams, Movie, MovieListResponse, SearchMovieParams, TmdbApi,
};

/// Scripted reply for one request key.
#[derive(Debug, Clone)]
pub enum Reply {
    /// 2xx payload.
    Payload(MovieListResponse),
    /// Transport or status failure.
    Failure(String),
}

/// Records every request and answers from a script.
///
/// Request keys are `trending`, `discover` and `search:{query}`.
/// Unscripted keys answer with an empty list.
#[derive(Debug, Default)]
pub struct MockApi {
    calls: Mutex<Vec<String>>,
    script: Mutex<HashMap<String, (Duration, Reply)>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a reply for a request key after the given delay.
    pub fn on(self, key: &str, delay: Duration, reply: Reply) -> Self {
        self.script
            .lock()
            .unwrap()
            .insert(String::from(key), (delay, reply));
        self
    }

    /// Scripts an immediate successful reply with the given movies.
    pub fn movies(self, key: &str, movies: &[(u64, &str)]) -> Self {
        self.on(key, Duration::ZERO, Reply::Payload(list(movies)))
    }

    /// Request keys in the order they were issued.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn reply(&self, key: String) -> Result<MovieListResponse> {
        let scripted = {
            self.calls.lock().unwrap().push(key.clone());
            self.script.lock().unwrap().get(&key).cloned()
        };
        let (delay, reply) =
            scripted.unwrap_or((Duration::ZERO, Reply::Payload(MovieListResponse::default())));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match reply {
            Reply::Payload(payload) => Ok(payload),
            Reply::Failure(msg) => Err(anyhow!(msg)),
        }
    }
}

impl TmdbApi for MockApi {
    async fn trending_movies(&self, _language: &str) -> Result<MovieListResponse> {
        self.reply(String::from("trending")).await
    }

    async fn search_movies(&self, params: &SearchMovieParams) -> Result<MovieListResponse> {
        self.reply(format!("search:{}", params.query)).await
    }

    async fn discover_movies(&self, _params: &DiscoverMovieParams) -> Result<MovieListResponse> {
        self.reply(String::from("discover")).await
    }
}

/// Builds a movie list payload.
pub fn list(movies: &[(u64, &str)]) -> MovieListResponse {
    MovieListResponse {
        results: movies
            .iter()
            .map(|&(id, title)| Movie::new(id, title))
            .collect(),
        ..MovieListResponse::default()
    }
}

/// Titles of a movie slice.
pub fn titles(movies: &[Movie]) -> Vec<&str> {
    movies.iter().map(|movie| movie.title.as_str()).collect()
}
