//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 movie list endpoints
//! and decodes their paginated result payloads.

mod api;
mod client;
mod image;
mod params;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
pub use image::{NO_POSTER_PLACEHOLDER, POSTER_BASE_URL, poster_url};
pub use params::{DEFAULT_LANGUAGE, DiscoverMovieParams, SearchMovieParams};
#[allow(clippy::module_name_repetitions)]
pub use types::{GENERIC_ERROR_MESSAGE, Movie, MovieListResponse, TmdbErrorResponse};
