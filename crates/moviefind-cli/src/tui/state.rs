//! Browser view state management.

use moviefind_browse::BrowseState;

/// Identifies which list has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    /// Trending list.
    Trending,
    /// Search/discover results.
    Movies,
}

/// Input mode for the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode.
    Normal,
    /// Search text input mode.
    Search,
}

/// View-only state for the browser TUI.
///
/// Movie lists live in [`BrowseState`]; this holds focus and cursors.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BrowserState {
    /// Active pane.
    pub active_pane: ActivePane,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Cursor position in the trending list.
    pub trending_cursor: usize,
    /// Cursor position in the results list.
    pub movies_cursor: usize,
    /// Spinner animation frame.
    pub spinner_frame: usize,
}

impl Default for BrowserState {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserState {
    /// Creates the initial state: results focused, normal mode.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            active_pane: ActivePane::Movies,
            input_mode: InputMode::Normal,
            trending_cursor: 0,
            movies_cursor: 0,
            spinner_frame: 0,
        }
    }

    /// Switches active pane.
    pub const fn switch_pane(&mut self) {
        self.active_pane = match self.active_pane {
            ActivePane::Trending => ActivePane::Movies,
            ActivePane::Movies => ActivePane::Trending,
        };
    }

    /// Moves the cursor up in the active pane.
    pub const fn move_up(&mut self) {
        let cursor = self.cursor_mut();
        *cursor = cursor.saturating_sub(1);
    }

    /// Moves the cursor down in the active pane, bounded by the list length.
    pub fn move_down(&mut self, browse: &BrowseState) {
        let len = self.active_len(browse);
        let cursor = self.cursor_mut();
        if cursor.saturating_add(1) < len {
            *cursor = cursor.saturating_add(1);
        }
    }

    /// Keeps both cursors inside their lists after the lists change.
    pub fn clamp_cursors(&mut self, browse: &BrowseState) {
        self.trending_cursor = clamp(self.trending_cursor, browse.trending.movies.len());
        self.movies_cursor = clamp(self.movies_cursor, browse.results.movies.len());
    }

    /// Advances the spinner animation.
    pub const fn tick(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }

    fn active_len(&self, browse: &BrowseState) -> usize {
        match self.active_pane {
            ActivePane::Trending => browse.trending.movies.len(),
            ActivePane::Movies => browse.results.movies.len(),
        }
    }

    const fn cursor_mut(&mut self) -> &mut usize {
        match self.active_pane {
            ActivePane::Trending => &mut self.trending_cursor,
            ActivePane::Movies => &mut self.movies_cursor,
        }
    }
}

/// Clamps a cursor to `0..len` (0 for an empty list).
const fn clamp(cursor: usize, len: usize) -> usize {
    if cursor < len {
        cursor
    } else {
        len.saturating_sub(1)
    }
}
