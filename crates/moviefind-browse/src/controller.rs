//! `FetchController` - selects, issues and applies movie list requests.

use std::sync::Arc;

use anyhow::Result;
use moviefind_api::tmdb::{
    DEFAULT_LANGUAGE, DiscoverMovieParams, GENERIC_ERROR_MESSAGE, Movie, MovieListResponse,
    SearchMovieParams, TmdbApi,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::instrument;

use crate::query::{FetchMode, MovieQuery, Section};
use crate::state::BrowseState;

/// Outcome of one request, reduced to what the view observes.
#[derive(Debug)]
enum FetchOutcome {
    /// Replace the section's list.
    Loaded(Vec<Movie>),
    /// Show a message; the list keeps its previous value.
    Failed(String),
}

/// Fetch controller.
///
/// Cheap to clone; clones share the client and the published state.
/// Each section carries a generation counter: only the latest fetch
/// started for a section may write its list, error or loading flag, so a
/// slow response can never overwrite a newer one.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct FetchController<C> {
    /// TMDB API implementation.
    client: Arc<C>,
    /// Locale for trending and discover requests.
    language: Arc<str>,
    /// Published browse state.
    state: Arc<watch::Sender<BrowseState>>,
}

impl<C> Clone for FetchController<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            language: Arc::clone(&self.language),
            state: Arc::clone(&self.state),
        }
    }
}

impl<C: TmdbApi + Send + Sync + 'static> FetchController<C> {
    /// Creates a controller around an API client.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self::from_shared(Arc::new(client))
    }

    /// Creates a controller around a shared API client.
    #[must_use]
    pub fn from_shared(client: Arc<C>) -> Self {
        let (state, _) = watch::channel(BrowseState::default());
        Self {
            client,
            language: Arc::from(DEFAULT_LANGUAGE),
            state: Arc::new(state),
        }
    }

    /// Overrides the locale used for trending and discover requests.
    #[must_use]
    pub fn with_language(mut self, language: &str) -> Self {
        self.language = Arc::from(language);
        self
    }

    /// Subscribes to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<BrowseState> {
        self.state.subscribe()
    }

    /// Returns a snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> BrowseState {
        self.state.borrow().clone()
    }

    /// Fetches one movie list and applies the outcome to the state.
    ///
    /// The section's loading flag is raised before the first suspension
    /// point and lowered when the fetch settles or is dropped. Failures
    /// end here: they become an error message on the section and a log
    /// entry.
    pub async fn fetch(&self, query: &str, mode: FetchMode) {
        let pending = self.begin(mode.section());
        self.run(MovieQuery::select(query, mode), pending).await;
    }

    /// Starts a fetch on the Tokio runtime without waiting for it.
    ///
    /// The loading flag is raised before this returns. Aborting the
    /// returned handle lowers it again.
    pub fn spawn_fetch(&self, query: impl Into<String>, mode: FetchMode) -> JoinHandle<()> {
        let pending = self.begin(mode.section());
        let query: String = query.into();
        let target = MovieQuery::select(&query, mode);
        let controller = self.clone();
        tokio::spawn(async move { controller.run(target, pending).await })
    }

    /// Marks a new fetch for a section.
    fn begin(&self, section: Section) -> PendingFetch {
        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = state.section_mut(section).begin();
        });
        PendingFetch {
            state: Arc::clone(&self.state),
            section,
            generation,
            settled: false,
        }
    }

    #[instrument(skip(self, pending), fields(section = ?pending.section, generation = pending.generation))]
    async fn run(&self, target: MovieQuery, pending: PendingFetch) {
        let result = self.request(&target).await;
        let outcome = classify(&target, result);
        pending.settle(outcome);
    }

    /// Issues the HTTP request for a query mode.
    async fn request(&self, target: &MovieQuery) -> Result<MovieListResponse> {
        match target {
            MovieQuery::Trending => self.client.trending_movies(&self.language).await,
            MovieQuery::Search(text) => {
                let params = SearchMovieParams::new(text.as_str());
                self.client.search_movies(&params).await
            }
            MovieQuery::Discover => {
                let params = DiscoverMovieParams::default().language(&*self.language);
                self.client.discover_movies(&params).await
            }
        }
    }
}

/// A started fetch whose outcome has not been applied yet.
///
/// Only the latest fetch of a section may write to it. Dropping an
/// unsettled fetch (timeout, abort, losing a `select!`) lowers the
/// loading flag if it is still the latest.
#[derive(Debug)]
struct PendingFetch {
    /// Published browse state.
    state: Arc<watch::Sender<BrowseState>>,
    /// Section this fetch writes to.
    section: Section,
    /// Generation assigned when the fetch began.
    generation: u64,
    /// Set once an outcome was offered to the state.
    settled: bool,
}

impl PendingFetch {
    /// Applies an outcome if this fetch is still the latest for its section.
    fn settle(mut self, outcome: FetchOutcome) {
        self.settled = true;
        let (section, generation) = (self.section, self.generation);
        let applied = self.state.send_if_modified(|state| {
            let slot = state.section_mut(section);
            if slot.generation() != generation {
                return false;
            }
            match outcome {
                FetchOutcome::Loaded(movies) => {
                    slot.movies = movies;
                    slot.error_message = None;
                }
                FetchOutcome::Failed(message) => {
                    slot.error_message = Some(message);
                }
            }
            slot.is_loading = false;
            true
        });

        if !applied {
            tracing::debug!(?section, generation, "Discarding stale movie list response");
        }
    }
}

impl Drop for PendingFetch {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let (section, generation) = (self.section, self.generation);
        let cleared = self.state.send_if_modified(|state| {
            let slot = state.section_mut(section);
            if slot.generation() != generation || !slot.is_loading {
                return false;
            }
            slot.is_loading = false;
            true
        });

        if cleared {
            tracing::debug!(?section, generation, "Movie list fetch dropped before completion");
        }
    }
}

#[cfg(test)]
impl FetchController<crate::test_support::MockApi> {
    /// Request keys the scripted client has seen.
    pub(crate) fn client_calls(&self) -> Vec<String> {
        self.client.calls()
    }
}

/// Maps a request result onto what the view should show.
fn classify(target: &MovieQuery, result: Result<MovieListResponse>) -> FetchOutcome {
    match result {
        Ok(response) => {
            if let Some(message) = response.api_failure() {
                tracing::warn!(?target, api_error = message, "TMDB reported a failed response");
                return FetchOutcome::Failed(String::from(message));
            }
            FetchOutcome::Loaded(response.results)
        }
        Err(e) => {
            tracing::error!(?target, "Error fetching movies: {e:#}");
            FetchOutcome::Failed(String::from(GENERIC_ERROR_MESSAGE))
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::time::Duration;

    use moviefind_api::tmdb::TmdbClient;

    use super::*;
    use crate::test_support::{MockApi, Reply, list, titles};

    #[tokio::test]
    async fn test_trending_mode_ignores_query() {
        // Arrange
        let controller = FetchController::new(MockApi::new());

        // Act
        controller.fetch("Inception", FetchMode::Trending).await;

        // Assert
        assert_eq!(controller.client.calls(), vec!["trending"]);
    }

    #[tokio::test]
    async fn test_normal_mode_selects_search_or_discover() {
        // Arrange
        let controller = FetchController::new(MockApi::new());

        // Act
        controller.fetch("Dune", FetchMode::Normal).await;
        controller.fetch("", FetchMode::Normal).await;

        // Assert
        assert_eq!(controller.client.calls(), vec!["search:Dune", "discover"]);
    }

    #[tokio::test]
    async fn test_success_replaces_list_in_api_order() {
        // Arrange
        let api = MockApi::new().movies("discover", &[(1, "A"), (2, "B")]);
        let controller = FetchController::new(api);

        // Act
        controller.fetch("", FetchMode::Normal).await;

        // Assert
        let state = controller.state();
        assert_eq!(state.results.movies, list(&[(1, "A"), (2, "B")]).results);
        assert!(!state.results.is_loading);
        assert_eq!(state.results.error_message, None);
        assert!(state.trending.movies.is_empty());
    }

    #[tokio::test]
    async fn test_trending_success_fills_trending_section() {
        // Arrange
        let api = MockApi::new().movies("trending", &[(7, "Top")]);
        let controller = FetchController::new(api);

        // Act
        controller.fetch("", FetchMode::Trending).await;

        // Assert
        let state = controller.state();
        assert_eq!(titles(&state.trending.movies), vec!["Top"]);
        assert!(state.results.movies.is_empty());
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_list() {
        // Arrange
        let api = MockApi::new()
            .movies("search:ok", &[(1, "A")])
            .on(
                "search:broken",
                Duration::ZERO,
                Reply::Failure(String::from("TMDB API error (HTTP 500)")),
            );
        let controller = FetchController::new(api);
        controller.fetch("ok", FetchMode::Normal).await;

        // Act
        controller.fetch("broken", FetchMode::Normal).await;

        // Assert
        let state = controller.state();
        assert_eq!(titles(&state.results.movies), vec!["A"]);
        assert_eq!(
            state.results.error_message.as_deref(),
            Some(GENERIC_ERROR_MESSAGE)
        );
        assert!(!state.results.is_loading);
    }

    #[tokio::test]
    async fn test_api_level_failure_does_not_touch_list() {
        // Arrange
        let mut failed = list(&[(999, "Should Not Be Shown")]);
        failed.response = Some(String::from("False"));
        failed.error = Some(String::from("Movie not found!"));
        let api = MockApi::new()
            .movies("search:ok", &[(1, "A")])
            .on("search:missing", Duration::ZERO, Reply::Payload(failed));
        let controller = FetchController::new(api);
        controller.fetch("ok", FetchMode::Normal).await;

        // Act
        controller.fetch("missing", FetchMode::Normal).await;

        // Assert
        let state = controller.state();
        assert_eq!(titles(&state.results.movies), vec!["A"]);
        assert_eq!(
            state.results.error_message.as_deref(),
            Some("Movie not found!")
        );
    }

    #[tokio::test]
    async fn test_success_clears_previous_error() {
        // Arrange
        let api = MockApi::new()
            .on(
                "search:broken",
                Duration::ZERO,
                Reply::Failure(String::from("boom")),
            )
            .movies("search:ok", &[(1, "A")]);
        let controller = FetchController::new(api);
        controller.fetch("broken", FetchMode::Normal).await;

        // Act
        controller.fetch("ok", FetchMode::Normal).await;

        // Assert
        let state = controller.state();
        assert_eq!(state.results.error_message, None);
        assert_eq!(titles(&state.results.movies), vec!["A"]);
    }

    #[tokio::test]
    async fn test_errors_are_scoped_to_section() {
        // Arrange
        let api = MockApi::new().on(
            "trending",
            Duration::ZERO,
            Reply::Failure(String::from("boom")),
        );
        let controller = FetchController::new(api);

        // Act
        controller.fetch("", FetchMode::Trending).await;
        controller.fetch("", FetchMode::Normal).await;

        // Assert
        let state = controller.state();
        assert_eq!(
            state.trending.error_message.as_deref(),
            Some(GENERIC_ERROR_MESSAGE)
        );
        assert_eq!(state.results.error_message, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawn_fetch_sets_loading_before_returning() {
        // Arrange
        let api = MockApi::new().on(
            "trending",
            Duration::from_millis(100),
            Reply::Payload(list(&[(1, "A")])),
        );
        let controller = FetchController::new(api);

        // Act
        let handle = controller.spawn_fetch("", FetchMode::Trending);

        // Assert
        assert!(controller.state().trending.is_loading);
        handle.await.unwrap();
        let state = controller.state();
        assert!(!state.trending.is_loading);
        assert_eq!(titles(&state.trending.movies), vec!["A"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_is_discarded() {
        // Arrange
        let api = MockApi::new()
            .on(
                "search:slow",
                Duration::from_millis(500),
                Reply::Payload(list(&[(1, "Slow")])),
            )
            .on(
                "search:fast",
                Duration::from_millis(10),
                Reply::Payload(list(&[(2, "Fast")])),
            );
        let controller = FetchController::new(api);

        // Act
        let slow = controller.spawn_fetch("slow", FetchMode::Normal);
        let fast = controller.spawn_fetch("fast", FetchMode::Normal);
        fast.await.unwrap();
        let after_fast = controller.state();
        slow.await.unwrap();
        let after_slow = controller.state();

        // Assert
        assert_eq!(titles(&after_fast.results.movies), vec!["Fast"]);
        assert!(!after_fast.results.is_loading);
        assert_eq!(after_slow, after_fast);
        assert_eq!(controller.client.calls(), vec!["search:slow", "search:fast"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_cleanup_keeps_newer_call_loading() {
        // Arrange
        let api = MockApi::new()
            .on(
                "search:first",
                Duration::from_millis(10),
                Reply::Payload(list(&[(1, "First")])),
            )
            .on(
                "search:second",
                Duration::from_millis(500),
                Reply::Payload(list(&[(2, "Second")])),
            );
        let controller = FetchController::new(api);

        // Act
        let first = controller.spawn_fetch("first", FetchMode::Normal);
        let second = controller.spawn_fetch("second", FetchMode::Normal);
        first.await.unwrap();

        // Assert
        let state = controller.state();
        assert!(state.results.is_loading);
        assert!(state.results.movies.is_empty());
        second.await.unwrap();
        let state = controller.state();
        assert!(!state.results.is_loading);
        assert_eq!(titles(&state.results.movies), vec!["Second"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_fetch_clears_loading() {
        // Arrange
        let api = MockApi::new().on(
            "search:slow",
            Duration::from_millis(500),
            Reply::Payload(list(&[(1, "Slow")])),
        );
        let controller = FetchController::new(api);

        // Act
        let result = tokio::time::timeout(
            Duration::from_millis(50),
            controller.fetch("slow", FetchMode::Normal),
        )
        .await;
        tokio::time::sleep(Duration::from_secs(10)).await;

        // Assert
        assert!(result.is_err());
        let state = controller.state();
        assert!(!state.results.is_loading);
        assert!(state.results.movies.is_empty());
        assert_eq!(state.results.error_message, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_aborted_stale_fetch_keeps_newer_call_loading() {
        // Arrange
        let api = MockApi::new()
            .on(
                "search:first",
                Duration::from_millis(500),
                Reply::Payload(list(&[(1, "First")])),
            )
            .on(
                "search:second",
                Duration::from_millis(500),
                Reply::Payload(list(&[(2, "Second")])),
            );
        let controller = FetchController::new(api);
        let first = controller.spawn_fetch("first", FetchMode::Normal);
        let second = controller.spawn_fetch("second", FetchMode::Normal);

        // Act
        first.abort();
        assert!(first.await.unwrap_err().is_cancelled());

        // Assert
        assert!(controller.state().results.is_loading);
        second.await.unwrap();
        let state = controller.state();
        assert!(!state.results.is_loading);
        assert_eq!(titles(&state.results.movies), vec!["Second"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_aborted_latest_fetch_clears_loading() {
        // Arrange
        let api = MockApi::new().on(
            "trending",
            Duration::from_millis(500),
            Reply::Payload(list(&[(1, "T")])),
        );
        let controller = FetchController::new(api);
        let handle = controller.spawn_fetch("", FetchMode::Trending);
        tokio::time::sleep(Duration::from_millis(10)).await;

        // Act
        handle.abort();
        let _ = handle.await;

        // Assert
        let state = controller.state();
        assert!(!state.trending.is_loading);
        assert!(state.trending.movies.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_trending_and_results_load_independently() {
        // Arrange
        let api = MockApi::new()
            .on(
                "trending",
                Duration::from_millis(500),
                Reply::Payload(list(&[(1, "T")])),
            )
            .movies("discover", &[(2, "D")]);
        let controller = FetchController::new(api);

        // Act
        let trending = controller.spawn_fetch("", FetchMode::Trending);
        controller.fetch("", FetchMode::Normal).await;

        // Assert
        let state = controller.state();
        assert!(state.trending.is_loading);
        assert!(!state.results.is_loading);
        assert!(state.is_loading());
        assert_eq!(titles(&state.results.movies), vec!["D"]);
        trending.await.unwrap();
        assert!(!controller.state().is_loading());
    }

    #[tokio::test]
    async fn test_repeated_trending_fetch_is_stable() {
        // Arrange
        let api = MockApi::new().movies("trending", &[(1, "A"), (2, "B")]);
        let controller = FetchController::new(api);

        // Act
        controller.fetch("", FetchMode::Trending).await;
        let first = controller.state().trending.movies;
        controller.fetch("", FetchMode::Trending).await;
        let second = controller.state().trending.movies;

        // Assert
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_subscribers_observe_changes() {
        // Arrange
        let api = MockApi::new().movies("discover", &[(1, "A")]);
        let controller = FetchController::new(api);
        let mut rx = controller.subscribe();
        rx.mark_unchanged();

        // Act
        controller.fetch("", FetchMode::Normal).await;

        // Assert
        assert!(rx.has_changed().unwrap());
        assert_eq!(titles(&rx.borrow_and_update().results.movies), vec!["A"]);
    }

    fn http_controller(mock_server: &wiremock::MockServer) -> FetchController<TmdbClient> {
        let base_url = format!("{}/3/", mock_server.uri());
        let client = TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();
        FetchController::new(client)
    }

    #[tokio::test]
    async fn test_http_trending_round_trip() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../fixtures/tmdb/trending_movie_day.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/trending/movie/day"))
            .and(wiremock::matchers::query_param("language", "en-US"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let controller = http_controller(&mock_server);

        // Act
        controller.fetch("ignored", FetchMode::Trending).await;

        // Assert
        let state = controller.state();
        assert_eq!(
            titles(&state.trending.movies),
            vec!["Inception", "Interstellar", "Suzume"]
        );
        assert!(!state.trending.is_loading);
    }

    #[tokio::test]
    async fn test_http_search_sends_term_once() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../fixtures/tmdb/search_movie_inception.json");
        let term = "inception & dreams";

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/search/movie"))
            .and(wiremock::matchers::query_param("query", term))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let controller = http_controller(&mock_server);

        // Act
        controller.fetch(term, FetchMode::Normal).await;

        // Assert
        assert_eq!(controller.state().results.movies[0].id, 27_205);
    }

    #[tokio::test]
    async fn test_http_error_status_keeps_list() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../fixtures/tmdb/discover_movie.json");
        let error_body = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/discover/movie"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/search/movie"))
            .respond_with(wiremock::ResponseTemplate::new(401).set_body_string(error_body))
            .mount(&mock_server)
            .await;

        let controller = http_controller(&mock_server);
        controller.fetch("", FetchMode::Normal).await;
        let before = controller.state().results.movies;

        // Act
        controller.fetch("anything", FetchMode::Normal).await;

        // Assert
        let state = controller.state();
        assert_eq!(state.results.movies, before);
        assert_eq!(
            state.results.error_message.as_deref(),
            Some(GENERIC_ERROR_MESSAGE)
        );
        assert!(!state.results.is_loading);
    }

    #[tokio::test]
    async fn test_http_null_results_failure_shows_payload_error() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../fixtures/tmdb/api_failure_null_results.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/search/movie"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let controller = http_controller(&mock_server);

        // Act
        controller.fetch("Inception", FetchMode::Normal).await;

        // Assert
        let state = controller.state();
        assert!(state.results.movies.is_empty());
        assert_eq!(
            state.results.error_message.as_deref(),
            Some("Invalid API key!")
        );
        assert!(!state.results.is_loading);
    }

    #[tokio::test]
    async fn test_http_malformed_json_is_generic_error() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&mock_server)
            .await;

        let controller = http_controller(&mock_server);

        // Act
        controller.fetch("", FetchMode::Trending).await;

        // Assert
        let state = controller.state();
        assert!(state.trending.movies.is_empty());
        assert_eq!(
            state.trending.error_message.as_deref(),
            Some(GENERIC_ERROR_MESSAGE)
        );
    }
}
