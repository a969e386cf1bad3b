//! Browse logic for moviefind.
//!
//! Selects which TMDB movie list to request, applies the outcome to
//! observable state, and debounces search input.

mod binding;
mod controller;
mod debounce;
mod query;
mod state;

#[cfg(test)]
mod test_support;

pub use binding::{DEFAULT_QUIET_PERIOD, SearchBinding};
pub use controller::FetchController;
pub use debounce::Debouncer;
pub use moviefind_api::tmdb::GENERIC_ERROR_MESSAGE;
pub use query::{FetchMode, MovieQuery, Section};
pub use state::{BrowseState, MovieSection};
