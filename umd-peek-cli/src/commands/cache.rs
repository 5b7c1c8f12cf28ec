use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use umd_peek_core::util::format_bytes;

use super::open_cache;
use crate::error::CliError;

/// Print the resolved cache directory.
pub(crate) fn run_cache_path(cache_root: Option<PathBuf>) {
    let cache = open_cache(cache_root);
    println!("{}", cache.root().display());
}

/// List cached games.
pub(crate) fn run_cache_list(cache_root: Option<PathBuf>) -> Result<(), CliError> {
    let cache = open_cache(cache_root);
    let entries = cache.list_entries()?;

    if entries.is_empty() {
        log::info!(
            "{}",
            "No cached games.".if_supports_color(Stderr, |t| t.dimmed()),
        );
        log::info!("Run 'umd-peek scan <folder>' to populate the cache.");
        return Ok(());
    }

    log::info!(
        "{} {}",
        "Cached games in".if_supports_color(Stderr, |t| t.bold()),
        cache.root().display().if_supports_color(Stderr, |t| t.cyan()),
    );
    log::info!("");

    let mut total_size = 0u64;
    for entry in &entries {
        total_size += entry.total_size;
        log::info!(
            "  {} ({} files, {})",
            entry.key.if_supports_color(Stderr, |t| t.bold()),
            entry.file_count,
            format_bytes(entry.total_size),
        );
    }
    log::info!("");
    log::info!(
        "Total: {} games, {}",
        entries.len(),
        format_bytes(total_size)
    );
    Ok(())
}

/// Remove every cached game directory.
pub(crate) fn run_cache_clear(cache_root: Option<PathBuf>) -> Result<(), CliError> {
    let cache = open_cache(cache_root);
    let freed = cache.clear()?;
    log::info!(
        "{} Cache cleared ({} freed)",
        "\u{2714}".if_supports_color(Stderr, |t| t.green()),
        format_bytes(freed),
    );
    Ok(())
}
