//! Observable browse state.

use moviefind_api::tmdb::Movie;

use crate::query::Section;

/// Observable slots for one movie list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieSection {
    /// Movies from the last applied response, in API order.
    pub movies: Vec<Movie>,
    /// Message shown in place of the list after a failed fetch.
    pub error_message: Option<String>,
    /// True while the latest fetch for this section is outstanding.
    pub is_loading: bool,
    /// Generation of the latest fetch started for this section.
    generation: u64,
}

impl MovieSection {
    /// Generation of the latest fetch started for this section.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts a new fetch and returns its generation.
    pub(crate) const fn begin(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.is_loading = true;
        self.generation
    }
}

/// State rendered by the view: the trending list and the main list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrowseState {
    /// Trending movies.
    pub trending: MovieSection,
    /// Search or discover results.
    pub results: MovieSection,
}

impl BrowseState {
    /// Returns the slots for a section.
    #[must_use]
    pub const fn section(&self, section: Section) -> &MovieSection {
        match section {
            Section::Trending => &self.trending,
            Section::Results => &self.results,
        }
    }

    pub(crate) const fn section_mut(&mut self, section: Section) -> &mut MovieSection {
        match section {
            Section::Trending => &mut self.trending,
            Section::Results => &mut self.results,
        }
    }

    /// True while any section is loading.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.trending.is_loading || self.results.is_loading
    }
}
