//! TMDB API response types.

use serde::{Deserialize, Deserializer};

use super::image::poster_url;

/// User-facing message for any failed movie list request.
pub const GENERIC_ERROR_MESSAGE: &str = "Failed to fetch movies.";

/// Paginated movie list returned by `trending/movie/day`,
/// `search/movie` and `discover/movie`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MovieListResponse {
    /// Current page number.
    #[serde(default)]
    pub page: Option<u32>,
    /// Movies in API order.
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub results: Vec<Movie>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: Option<u32>,
    /// Total number of results.
    #[serde(default)]
    pub total_results: Option<u32>,
    /// API-level status flag (`"False"` signals failure).
    #[serde(default, rename = "Response")]
    pub response: Option<String>,
    /// API-level error message paired with `Response`.
    #[serde(default, rename = "Error")]
    pub error: Option<String>,
}

/// Deserializes `null` as an empty list (failure payloads may send `"results": null`).
fn deserialize_null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Movie>, D::Error>
where
    D: Deserializer<'de>,
{
    let results: Option<Vec<Movie>> = Option::deserialize(deserializer)?;
    Ok(results.unwrap_or_default())
}

impl MovieListResponse {
    /// Returns the failure message when the payload signals an API-level
    /// failure despite a 2xx status.
    ///
    /// Falls back to [`GENERIC_ERROR_MESSAGE`] when the payload carries
    /// no message of its own.
    #[must_use]
    pub fn api_failure(&self) -> Option<&str> {
        if self.response.as_deref() != Some("False") {
            return None;
        }
        Some(
            self.error
                .as_deref()
                .filter(|msg| !msg.is_empty())
                .unwrap_or(GENERIC_ERROR_MESSAGE),
        )
    }
}

/// A single movie result item.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Movie {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Poster image path (e.g. `/abc.jpg`).
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Original title.
    #[serde(default)]
    pub original_title: Option<String>,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: Option<String>,
    /// Release date (YYYY-MM-DD).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: Option<f64>,
    /// Vote count.
    #[serde(default)]
    pub vote_count: Option<u32>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: Option<f64>,
    /// Adult flag.
    #[serde(default)]
    pub adult: Option<bool>,
    /// Video flag.
    #[serde(default)]
    pub video: Option<bool>,
}

impl Movie {
    /// Creates a movie with only the required fields set.
    #[must_use]
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            poster_path: None,
            original_title: None,
            original_language: None,
            release_date: None,
            overview: None,
            vote_average: None,
            vote_count: None,
            popularity: None,
            adult: None,
            video: None,
        }
    }

    /// Full poster URL, or the local placeholder when no poster exists.
    #[must_use]
    pub fn poster_url(&self) -> String {
        poster_url(self.poster_path.as_deref())
    }

    /// Release year parsed from `release_date`.
    #[must_use]
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|date| date.split('-').next())
            .filter(|year| year.len() == 4)
    }
}

/// Error response body from TMDB (e.g. HTTP 401).
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB status code.
    pub status_code: u32,
    /// Status message.
    pub status_message: String,
    /// Success flag (always false).
    #[serde(default)]
    pub success: bool,
}
