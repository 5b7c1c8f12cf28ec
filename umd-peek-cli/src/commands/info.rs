use std::fs::File;
use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use umd_peek_core::names::clean_title;
use umd_peek_core::util::format_bytes;
use umd_peek_core::{AnalysisError, GameMetadata, ReadSeek};
use umd_peek_sony::extractor::{self, ImageFormat};
use umd_peek_sony::{iso9660, pbp, sfo};

use crate::error::CliError;

/// Print everything the readers can see in an image, without caching.
pub(crate) fn run_info(file: &Path) -> Result<(), CliError> {
    let mut reader = File::open(file)?;
    let format = extractor::probe_format(&mut reader)?;
    let meta = extractor::extract_from(&mut reader);

    log::info!("{}", file.display().if_supports_color(Stderr, |t| t.bold()));
    log::info!("  Format:     {}", format.name());
    log_metadata(&meta);

    match format {
        ImageFormat::Pbp => log_pbp_details(&mut reader),
        ImageFormat::Iso => log_iso_details(&mut reader),
    }
    Ok(())
}

fn log_metadata(meta: &GameMetadata) {
    let title = clean_title(&meta.title);
    let id = clean_title(&meta.game_id);
    log::info!("  Title:      {}", or_dash(&title));
    log::info!("  Disc ID:    {}", or_dash(&id));
    log::info!("  Icon:       {}", size_or_dash(&meta.icon));
    log::info!("  Background: {}", size_or_dash(&meta.background));
    log::info!("  Audio:      {}", size_or_dash(&meta.audio));
}

fn log_pbp_details(reader: &mut dyn ReadSeek) {
    match pbp::read_header(reader) {
        Ok(header) => log::info!("  Version:    {:#010x}", header.version),
        Err(e) => log_unreadable("PBP header", &e),
    }
    match pbp::read_param_sfo(reader) {
        Ok(block) => log_sfo(&block),
        Err(e) => log_unreadable("PARAM.SFO", &e),
    }
}

fn log_iso_details(reader: &mut dyn ReadSeek) {
    match iso9660::read_pvd(reader) {
        Ok(pvd) => {
            log::info!("  System:     {}", or_dash(&pvd.system_identifier));
            log::info!("  Volume:     {}", or_dash(&pvd.volume_identifier));
            log::info!(
                "  Size:       {}",
                format_bytes(pvd.volume_space_size as u64 * iso9660::ISO_BLOCK_SIZE as u64)
            );
        }
        Err(e) => {
            log_unreadable("ISO 9660 volume descriptor", &e);
            return;
        }
    }

    let entries = match iso9660::read_psp_game_entries(reader) {
        Ok(Some(entries)) => entries,
        Ok(None) => {
            log::info!(
                "  {}",
                "No PSP_GAME directory".if_supports_color(Stderr, |t| t.dimmed()),
            );
            return;
        }
        Err(e) => {
            log_unreadable("PSP_GAME", &e);
            return;
        }
    };

    let param = entries
        .iter()
        .find(|e| !e.is_directory && e.name == iso9660::PARAM_SFO);
    match param.map(|entry| iso9660::read_file(reader, entry)) {
        Some(Ok(block)) => log_sfo(&block),
        Some(Err(e)) => log_unreadable("PARAM.SFO", &e),
        None => {}
    }
}

fn log_sfo(block: &[u8]) {
    let entries = sfo::entries(block);
    if entries.is_empty() {
        return;
    }
    log::info!("");
    log::info!("{}", "PARAM.SFO".if_supports_color(Stderr, |t| t.bold()));
    for entry in &entries {
        log::info!(
            "  {:<16} {}",
            entry.key.if_supports_color(Stderr, |t| t.cyan()),
            entry.display_value(),
        );
    }
}

fn log_unreadable(what: &str, e: &AnalysisError) {
    log::warn!(
        "  {} {what}: {e}",
        "\u{26A0}".if_supports_color(Stderr, |t| t.yellow()),
    );
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() { "-" } else { s }
}

fn size_or_dash(data: &[u8]) -> String {
    if data.is_empty() {
        "-".to_string()
    } else {
        format_bytes(data.len() as u64)
    }
}
