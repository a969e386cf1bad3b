//! Config file location.

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Config file name inside the config directory.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory under the user's config root.
const APP_DIR_NAME: &str = "moviefind";

/// Resolves the config file path.
///
/// - `{dir}/config.toml` when `--dir` is given.
/// - `$XDG_CONFIG_HOME/moviefind/config.toml` when that variable is set and non-empty.
/// - `~/.config/moviefind/config.toml` otherwise.
///
/// # Errors
///
/// Returns an error if neither `XDG_CONFIG_HOME` nor `HOME` is usable (when `dir` is `None`).
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    config_path_from(
        dir,
        std::env::var_os("XDG_CONFIG_HOME"),
        std::env::var_os("HOME"),
    )
}

/// Resolves the config path from explicit environment values.
fn config_path_from(
    dir: Option<&PathBuf>,
    xdg_config_home: Option<OsString>,
    home: Option<OsString>,
) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE_NAME));
    }

    let config_root = match xdg_config_home.filter(|value| !value.is_empty()) {
        Some(xdg) => PathBuf::from(xdg),
        None => {
            let home = home
                .filter(|value| !value.is_empty())
                .context("HOME environment variable is not set")?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_root.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}
