//! Log output for the one-shot list commands.

use anyhow::{Result, bail};
use moviefind_api::tmdb::Movie;
use moviefind_browse::MovieSection;

/// Formats a vote average as one decimal, or `-` when absent.
pub fn format_rating(vote_average: Option<f64>) -> String {
    vote_average.map_or_else(|| String::from("-"), |v| format!("{v:.1}"))
}

/// Formats one result row: rank, id, title, year, rating, poster URL.
pub fn format_row(index: usize, movie: &Movie) -> String {
    format!(
        "{:>2}\t{}\t{}\t{}\t{}\t{}",
        index.saturating_add(1),
        movie.id,
        movie.title,
        movie.release_year().unwrap_or("-"),
        format_rating(movie.vote_average),
        movie.poster_url(),
    )
}

/// Logs a settled section, one line per movie.
///
/// # Errors
///
/// Returns the section's error message when its fetch failed.
pub fn report_section(label: &str, section: &MovieSection) -> Result<()> {
    if let Some(ref message) = section.error_message {
        bail!("{label}: {message}");
    }

    tracing::info!("{}: {} movie(s)", label, section.movies.len());
    for (index, movie) in section.movies.iter().enumerate() {
        tracing::info!("{}", format_row(index, movie));
    }
    Ok(())
}
