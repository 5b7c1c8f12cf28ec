use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use umd_peek_lib::scanner::{self, ScannedGame};

use super::{log_path_row, open_cache};
use crate::error::CliError;

/// Populate the cache for every game file in a folder.
pub(crate) fn run_scan(
    cache_root: Option<PathBuf>,
    folder: &Path,
    json: bool,
) -> Result<(), CliError> {
    let cache = open_cache(cache_root);
    let files = scanner::scan_game_files(folder)?;

    if files.is_empty() {
        if json {
            println!("[]");
        } else {
            log::info!(
                "{}",
                format!("No .iso, .cso or .pbp files in {}", folder.display())
                    .if_supports_color(Stderr, |t| t.dimmed()),
            );
        }
        return Ok(());
    }

    let pb = ProgressBar::new(files.len() as u64);
    if json || log::log_enabled!(log::Level::Debug) {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    pb.set_style(
        ProgressStyle::with_template("  {bar:30.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let mut games = Vec::with_capacity(files.len());
    for file in &files {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        pb.set_message(name);
        games.push(pb.suspend(|| scanner::scan_game(&cache, file)));
        pb.inc(1);
    }
    pb.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&games)?);
        return Ok(());
    }

    for game in &games {
        log_game(game);
    }
    let with_assets = games.iter().filter(|g| has_any_asset(g)).count();
    log::info!("");
    log::info!(
        "{} {} games scanned, {} with assets",
        "\u{2714}".if_supports_color(Stderr, |t| t.green()),
        games.len(),
        with_assets,
    );
    Ok(())
}

fn has_any_asset(game: &ScannedGame) -> bool {
    game.assets.icon_path.is_some()
        || game.assets.background_path.is_some()
        || game.assets.audio_path.is_some()
}

fn log_game(game: &ScannedGame) {
    let marker = if has_any_asset(game) {
        "\u{2714}".if_supports_color(Stderr, |t| t.green()).to_string()
    } else {
        "\u{2718}".if_supports_color(Stderr, |t| t.red()).to_string()
    };
    log::info!(
        "{} {}",
        marker,
        game.display_name.if_supports_color(Stderr, |t| t.bold()),
    );
    log_path_row("Icon", game.assets.icon_path.as_deref());
    log_path_row("Background", game.assets.background_path.as_deref());
    log_path_row("Audio", game.assets.audio_path.as_deref());
}
