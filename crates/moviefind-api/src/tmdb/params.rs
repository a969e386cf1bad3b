//! Query parameters for the TMDB movie list endpoints.

/// Locale used by the trending and discover requests.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Parameters for the `search/movie` endpoint.
///
/// Only `query` is sent; the endpoint applies its own locale and paging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMovieParams {
    /// Search text (sent percent-encoded).
    pub query: String,
}

impl SearchMovieParams {
    /// Creates search parameters for the given query.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    /// Builds the query string pairs.
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![("query", self.query.clone())]
    }
}

/// Parameters for the `discover/movie` endpoint.
///
/// The default value is the popular-first listing shown when no
/// search text is entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverMovieParams {
    /// Include adult titles.
    pub include_adult: bool,
    /// Include video-only entries.
    pub include_video: bool,
    /// Response language.
    pub language: String,
    /// Page number.
    pub page: u32,
    /// Sort order (e.g. `popularity.desc`).
    pub sort_by: String,
}

impl Default for DiscoverMovieParams {
    fn default() -> Self {
        Self {
            include_adult: false,
            include_video: false,
            language: String::from(DEFAULT_LANGUAGE),
            page: 1,
            sort_by: String::from("popularity.desc"),
        }
    }
}

impl DiscoverMovieParams {
    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Builds the query string pairs.
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("include_adult", self.include_adult.to_string()),
            ("include_video", self.include_video.to_string()),
            ("language", self.language.clone()),
            ("page", self.page.to_string()),
            ("sort_by", self.sort_by.clone()),
        ]
    }
}
