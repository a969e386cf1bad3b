//! API client library for moviefind.
//!
//! Provides a client for the TMDB movie list endpoints
//! (trending, search, discover).

/// TMDB API client.
pub mod tmdb;
