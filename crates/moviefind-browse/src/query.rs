//! Query mode selection.

/// Mode requested by the caller of [`crate::FetchController::fetch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Today's trending movies.
    Trending,
    /// Search results, or the discover listing when the query is empty.
    Normal,
}

impl FetchMode {
    /// Section of the browse state this mode writes to.
    #[must_use]
    pub const fn section(self) -> Section {
        match self {
            Self::Trending => Section::Trending,
            Self::Normal => Section::Results,
        }
    }
}

/// Observable list a fetch result is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Trending list.
    Trending,
    /// Main result list (search or discover).
    Results,
}

/// Endpoint variant derived from the current input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieQuery {
    /// `trending/movie/day`.
    Trending,
    /// `search/movie` with the given text.
    Search(String),
    /// `discover/movie` with the fixed popular-first parameters.
    Discover,
}

impl MovieQuery {
    /// Picks the endpoint for a query and mode.
    ///
    /// Trending mode wins over any query text; otherwise a non-empty
    /// query searches and an empty one discovers.
    #[must_use]
    pub fn select(query: &str, mode: FetchMode) -> Self {
        match mode {
            FetchMode::Trending => Self::Trending,
            FetchMode::Normal if query.is_empty() => Self::Discover,
            FetchMode::Normal => Self::Search(String::from(query)),
        }
    }
}
