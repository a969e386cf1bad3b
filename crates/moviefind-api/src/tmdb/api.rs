//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::params::{DiscoverMovieParams, SearchMovieParams};
use super::types::MovieListResponse;

/// TMDB API trait.
///
/// Abstracts the movie list endpoints for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait;
/// implementors of `TmdbApi` get `LocalTmdbApi` for free.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Fetches the movies trending today.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the status is not 2xx,
    /// or the JSON payload cannot be decoded.
    async fn trending_movies(&self, language: &str) -> Result<MovieListResponse>;

    /// Searches for movies by free text.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the status is not 2xx,
    /// or the JSON payload cannot be decoded.
    async fn search_movies(&self, params: &SearchMovieParams) -> Result<MovieListResponse>;

    /// Lists movies through the discover endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the status is not 2xx,
    /// or the JSON payload cannot be decoded.
    async fn discover_movies(&self, params: &DiscoverMovieParams) -> Result<MovieListResponse>;
}
