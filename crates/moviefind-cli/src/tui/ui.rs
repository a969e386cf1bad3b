//! TUI rendering logic for the movie browser.

use moviefind_api::tmdb::Movie;
use moviefind_browse::{BrowseState, MovieSection};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use super::state::{ActivePane, BrowserState, InputMode};
use crate::report::format_rating;

/// Spinner animation frames.
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Draws the browser UI.
#[allow(clippy::indexing_slicing)]
pub fn draw(
    frame: &mut Frame,
    state: &BrowserState,
    browse: &BrowseState,
    search_term: &str,
    search_pending: bool,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),      // header
            Constraint::Percentage(35), // trending
            Constraint::Min(5),         // all movies
            Constraint::Length(3),      // footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], state, browse, search_term, search_pending);
    draw_section(
        frame,
        chunks[1],
        " Trending ",
        &browse.trending,
        state,
        ActivePane::Trending,
    );
    draw_section(
        frame,
        chunks[2],
        " All Movies ",
        &browse.results,
        state,
        ActivePane::Movies,
    );
    draw_footer(frame, chunks[3], state);
}

/// Draws the search box and status line.
#[allow(clippy::indexing_slicing)]
fn draw_header(
    frame: &mut Frame,
    area: Rect,
    state: &BrowserState,
    browse: &BrowseState,
    search_term: &str,
    search_pending: bool,
) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let search_style = if state.input_mode == InputMode::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let search = Paragraph::new(String::from(search_term))
        .style(search_style)
        .block(Block::default().borders(Borders::ALL).title(" Search: / "));
    frame.render_widget(search, header_chunks[0]);

    let status_text = if search_pending {
        String::from("Waiting for input...")
    } else if browse.is_loading() {
        format!("{} Loading...", spinner(state.spinner_frame))
    } else {
        format!("{} movie(s)", browse.results.movies.len())
    };
    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title(" moviefind "));
    frame.render_widget(status, header_chunks[1]);
}

/// Draws one movie list: spinner while loading, message on failure.
fn draw_section(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    section: &MovieSection,
    state: &BrowserState,
    pane: ActivePane,
) {
    let is_active = state.active_pane == pane;
    let border_style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(String::from(title));

    if section.is_loading {
        let loading = Paragraph::new(format!("{} Loading...", spinner(state.spinner_frame)))
            .block(block);
        frame.render_widget(loading, area);
        return;
    }

    if let Some(ref message) = section.error_message {
        let error = Paragraph::new(message.clone())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(error, area);
        return;
    }

    let items: Vec<ListItem> = section
        .movies
        .iter()
        .enumerate()
        .map(|(index, movie)| {
            let text = match pane {
                ActivePane::Trending => trending_line(index, movie),
                ActivePane::Movies => movie_line(movie),
            };
            ListItem::new(text)
        })
        .collect();

    let cursor = match pane {
        ActivePane::Trending => state.trending_cursor,
        ActivePane::Movies => state.movies_cursor,
    };
    let mut list_state = ListState::default().with_selected(is_active.then_some(cursor));

    let list = List::new(items)
        .block(block)
        .highlight_symbol("\u{25b8} ")
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_stateful_widget(list, area, &mut list_state);
}

/// Draws the footer with key hints.
fn draw_footer(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let help_text = if state.input_mode == InputMode::Search {
        "Type to search | Ctrl-U: clear | Esc/Enter: done"
    } else {
        "/: search  Tab: pane switch  \u{2191}\u{2193}/j/k: move  r: refresh trending  q: quit"
    };

    let footer = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

/// Trending row: rank, title and poster location.
fn trending_line(index: usize, movie: &Movie) -> String {
    format!(
        "{:>2}  {}  {}",
        index.saturating_add(1),
        movie.title,
        movie.poster_url()
    )
}

/// Result row: title, rating, language and year.
fn movie_line(movie: &Movie) -> String {
    format!(
        "{}  \u{2605} {}  {}  {}",
        movie.title,
        format_rating(movie.vote_average),
        movie.original_language.as_deref().unwrap_or("-"),
        movie.release_year().unwrap_or("-"),
    )
}

/// Spinner glyph for an animation frame.
fn spinner(frame: usize) -> &'static str {
    frame
        .checked_rem(SPINNER.len())
        .and_then(|index| SPINNER.get(index))
        .copied()
        .unwrap_or("|")
}
