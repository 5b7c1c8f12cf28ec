use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use umd_peek_lib::settings;

use crate::error::CliError;

/// Show the settings file and the values in effect.
pub(crate) fn run_config_show(cache_root: Option<PathBuf>) {
    let path = settings::settings_path();

    log::info!(
        "{}",
        "umd-peek Configuration".if_supports_color(Stderr, |t| t.bold()),
    );
    log::info!("");

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stderr, |t| t.cyan()),
            "(exists)".if_supports_color(Stderr, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stderr, |t| t.cyan()),
            "(not found)".if_supports_color(Stderr, |t| t.dimmed()),
        );
    }

    let loaded = settings::load_settings();
    let from_cli = cache_root.is_some();
    let root = settings::resolve_cache_root(cache_root, &loaded);
    let source = if from_cli {
        "--cache-root"
    } else if loaded.cache.root.is_some() {
        "settings"
    } else {
        "default"
    };
    log::info!(
        "  Cache root:    {} {}",
        root.display().if_supports_color(Stderr, |t| t.cyan()),
        format!("({source})").if_supports_color(Stderr, |t| t.dimmed()),
    );

    if loaded.audio.convert {
        log::info!("  Audio:         convert with {}", loaded.audio.program);
    } else {
        log::info!(
            "  Audio:         {}",
            "conversion disabled".if_supports_color(Stderr, |t| t.dimmed()),
        );
    }

    if let Some(contents) = settings::load_settings_string() {
        log::info!("");
        for line in contents.lines() {
            log::info!("  {}", line.if_supports_color(Stderr, |t| t.dimmed()));
        }
    }
}

/// Save a cache directory to the settings file.
pub(crate) fn run_config_set_cache_root(dir: &Path) -> Result<(), CliError> {
    let dir = std::path::absolute(dir)?;
    settings::save_cache_root(Some(&dir))
        .map_err(|e| CliError::config(format!("Failed to save settings: {e}")))?;
    log::info!(
        "{} Cache root set to {}",
        "\u{2714}".if_supports_color(Stderr, |t| t.green()),
        dir.display(),
    );
    Ok(())
}

/// Remove the saved cache directory so the default is used again.
pub(crate) fn run_config_clear_cache_root() -> Result<(), CliError> {
    settings::save_cache_root(None)
        .map_err(|e| CliError::config(format!("Failed to save settings: {e}")))?;
    log::info!(
        "{} Cache root cleared (default: {})",
        "\u{2714}".if_supports_color(Stderr, |t| t.green()),
        settings::default_cache_root().display(),
    );
    Ok(())
}
