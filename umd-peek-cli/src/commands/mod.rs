pub(crate) mod cache;
pub(crate) mod config;
pub(crate) mod extract;
pub(crate) mod info;
pub(crate) mod scan;

use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use umd_peek_lib::AssetCache;
use umd_peek_lib::settings::{self, Settings};

/// Build the asset cache from settings plus the `--cache-root` override.
pub(crate) fn open_cache(cache_root: Option<PathBuf>) -> AssetCache {
    let settings = settings::load_settings();
    open_cache_with(cache_root, &settings)
}

pub(crate) fn open_cache_with(cache_root: Option<PathBuf>, settings: &Settings) -> AssetCache {
    let root = settings::resolve_cache_root(cache_root, settings);
    log::debug!("Cache root: {}", root.display());
    AssetCache::new(root).with_converter(settings.audio.converter())
}

/// One `label: path` line, or a dimmed dash when the asset is missing.
pub(crate) fn log_path_row(label: &str, path: Option<&Path>) {
    match path {
        Some(p) => log::info!(
            "  {:<11} {}",
            format!("{label}:"),
            p.display().if_supports_color(Stderr, |t| t.cyan()),
        ),
        None => log::info!(
            "  {:<11} {}",
            format!("{label}:"),
            "-".if_supports_color(Stderr, |t| t.dimmed()),
        ),
    }
}
