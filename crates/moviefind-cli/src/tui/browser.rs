//! Movie browser TUI main loop.

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use moviefind_api::tmdb::TmdbApi;
use moviefind_browse::{BrowseState, SearchBinding};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use super::state::{BrowserState, InputMode};
use super::ui;

/// Redraw interval for the loading spinner.
const SPINNER_INTERVAL: Duration = Duration::from_millis(120);

/// What the event loop does after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    /// Keep running.
    Continue,
    /// Leave the browser.
    Quit,
}

/// Runs the movie browser TUI until the user quits.
///
/// Mounts the binding (trending + discover fetch) and redraws whenever
/// the browse state changes.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub async fn run_browser<C>(binding: SearchBinding<C>) -> Result<()>
where
    C: TmdbApi + Send + Sync + 'static,
{
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, binding).await;

    // Cleanup (always attempt every step even if event loop failed)
    let raw = disable_raw_mode().context("failed to disable raw mode");
    let screen = crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen");

    finish(result, [raw, screen])
}

/// Combines the event loop result with the cleanup steps.
///
/// The first error wins, the event loop's before any cleanup step's.
fn finish(result: Result<()>, cleanup: [Result<()>; 2]) -> Result<()> {
    let [raw, screen] = cleanup;
    result.and(raw).and(screen)
}

/// Main event loop.
async fn run_event_loop<C>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut binding: SearchBinding<C>,
) -> Result<()>
where
    C: TmdbApi + Send + Sync + 'static,
{
    let mut state = BrowserState::new();
    let mut updates = binding.controller().subscribe();
    let mut events = EventStream::new();
    let mut spinner = tokio::time::interval(SPINNER_INTERVAL);

    binding.mount();

    loop {
        let browse = updates.borrow_and_update().clone();
        state.clamp_cursors(&browse);
        terminal
            .draw(|frame| {
                ui::draw(
                    frame,
                    &state,
                    &browse,
                    binding.search_term(),
                    binding.is_search_pending(),
                );
            })
            .context("failed to draw TUI")?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if handle_key(&mut state, &mut binding, &browse, key) == KeyAction::Quit {
                        return Ok(());
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e).context("failed to read event"),
                None => return Ok(()),
            },
            changed = updates.changed() => changed.context("browse state channel closed")?,
            _ = spinner.tick() => state.tick(),
        }
    }
}

/// Dispatches a key press by input mode.
fn handle_key<C>(
    state: &mut BrowserState,
    binding: &mut SearchBinding<C>,
    browse: &BrowseState,
    key: KeyEvent,
) -> KeyAction
where
    C: TmdbApi + Send + Sync + 'static,
{
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyAction::Quit;
    }
    match state.input_mode {
        InputMode::Search => handle_search_input(state, binding, key),
        InputMode::Normal => handle_normal_input(state, binding, browse, key.code),
    }
}

/// Handles key input in search mode.
fn handle_search_input<C>(
    state: &mut BrowserState,
    binding: &mut SearchBinding<C>,
    key: KeyEvent,
) -> KeyAction
where
    C: TmdbApi + Send + Sync + 'static,
{
    match key.code {
        KeyCode::Esc | KeyCode::Enter => state.input_mode = InputMode::Normal,
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            binding.set_search_term(String::new());
        }
        KeyCode::Backspace => {
            let mut term = String::from(binding.search_term());
            term.pop();
            binding.set_search_term(term);
        }
        KeyCode::Char(c) => {
            let mut term = String::from(binding.search_term());
            term.push(c);
            binding.set_search_term(term);
        }
        _ => {}
    }
    KeyAction::Continue
}

/// Handles key input in normal mode.
fn handle_normal_input<C>(
    state: &mut BrowserState,
    binding: &SearchBinding<C>,
    browse: &BrowseState,
    key: KeyCode,
) -> KeyAction
where
    C: TmdbApi + Send + Sync + 'static,
{
    match key {
        KeyCode::Char('q') | KeyCode::Esc => return KeyAction::Quit,
        KeyCode::Char('/') => state.input_mode = InputMode::Search,
        KeyCode::Tab | KeyCode::BackTab => state.switch_pane(),
        KeyCode::Up | KeyCode::Char('k') => state.move_up(),
        KeyCode::Down | KeyCode::Char('j') => state.move_down(browse),
        KeyCode::Char('r') => binding.refresh_trending(),
        _ => {}
    }
    KeyAction::Continue
}
