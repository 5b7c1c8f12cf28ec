use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use umd_peek_core::names::clean_title;
use umd_peek_lib::CachedAssets;

use super::{log_path_row, open_cache};
use crate::error::CliError;

/// Get or extract one game's assets and print where they live.
pub(crate) fn run_extract(
    cache_root: Option<PathBuf>,
    file: &Path,
    json: bool,
) -> Result<(), CliError> {
    let cache = open_cache(cache_root);
    let assets = cache.get_or_extract(file);

    if json {
        println!("{}", serde_json::to_string_pretty(&assets)?);
        return Ok(());
    }

    if assets.is_empty() {
        log::warn!(
            "{} No metadata or assets found in {}",
            "\u{2718}".if_supports_color(Stderr, |t| t.red()),
            file.display(),
        );
        return Ok(());
    }

    log_assets(file, &assets);
    Ok(())
}

pub(crate) fn log_assets(file: &Path, assets: &CachedAssets) {
    let title = clean_title(&assets.title);
    if title.is_empty() {
        log::info!(
            "{} {}",
            file.display().if_supports_color(Stderr, |t| t.bold()),
            "(cached)".if_supports_color(Stderr, |t| t.dimmed()),
        );
    } else {
        log::info!(
            "{} {}",
            title.if_supports_color(Stderr, |t| t.bold()),
            format!("[{}]", file.display()).if_supports_color(Stderr, |t| t.dimmed()),
        );
    }
    log_path_row("Icon", assets.icon_path.as_deref());
    log_path_row("Background", assets.background_path.as_deref());
    log_path_row("Cover", assets.cover_path.as_deref());
    log_path_row("Audio", assets.audio_path.as_deref());
}
