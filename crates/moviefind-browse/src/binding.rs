//! `SearchBinding` - drives the fetch controller from view events.

use std::time::Duration;

use moviefind_api::tmdb::TmdbApi;

use crate::controller::FetchController;
use crate::debounce::Debouncer;
use crate::query::FetchMode;

/// Quiet period after the last keystroke before a search is issued.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(800);

/// Connects view events (mount, refresh, search input) to fetches.
#[derive(Debug)]
pub struct SearchBinding<C> {
    /// Controller that performs the fetches.
    controller: FetchController<C>,
    /// Pending search wait.
    debouncer: Debouncer,
    /// Quiet period for non-empty terms.
    quiet_period: Duration,
    /// Current search term.
    search_term: String,
}

impl<C: TmdbApi + Send + Sync + 'static> SearchBinding<C> {
    /// Creates a binding with an empty search term.
    #[must_use]
    pub fn new(controller: FetchController<C>, quiet_period: Duration) -> Self {
        Self {
            controller,
            debouncer: Debouncer::new(),
            quiet_period,
            search_term: String::new(),
        }
    }

    /// Returns the controller.
    #[must_use]
    pub const fn controller(&self) -> &FetchController<C> {
        &self.controller
    }

    /// Returns the current search term.
    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// True while a search is waiting for its quiet period.
    #[must_use]
    pub fn is_search_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Initial load: trending list plus the listing for the current term.
    pub fn mount(&mut self) {
        tracing::debug!("Mounting browse view");
        self.controller.spawn_fetch("", FetchMode::Trending);
        self.search_term_changed();
    }

    /// Reloads the trending list.
    pub fn refresh_trending(&self) {
        self.controller.spawn_fetch("", FetchMode::Trending);
    }

    /// Updates the search term.
    ///
    /// An empty term fetches the discover listing at once; any other term
    /// is searched after the quiet period unless it changes again first.
    /// Setting the current term again does nothing.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term == self.search_term {
            return;
        }
        self.search_term = term;
        self.search_term_changed();
    }

    fn search_term_changed(&mut self) {
        if self.search_term.is_empty() {
            self.debouncer.cancel();
            self.controller.spawn_fetch("", FetchMode::Normal);
            return;
        }

        let controller = self.controller.clone();
        let term = self.search_term.clone();
        self.debouncer.schedule(self.quiet_period, move || {
            tracing::debug!(term = %term, "Search input settled");
            controller.spawn_fetch(term, FetchMode::Normal);
        });
    }
}
