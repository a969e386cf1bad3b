//! Poster image URL formatting.

/// Image CDN base for w500 posters.
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500/";

/// Local image shown when a movie has no poster.
pub const NO_POSTER_PLACEHOLDER: &str = "./No-Poster.png";

/// Resolves a poster path against the image CDN.
///
/// TMDB paths start with `/`; it is stripped so the URL has no double slash.
/// Returns [`NO_POSTER_PLACEHOLDER`] for a missing or empty path.
#[must_use]
pub fn poster_url(poster_path: Option<&str>) -> String {
    match poster_path.map(|path| path.trim_start_matches('/')) {
        Some(path) if !path.is_empty() => format!("{POSTER_BASE_URL}{path}"),
        _ => String::from(NO_POSTER_PLACEHOLDER),
    }
}
