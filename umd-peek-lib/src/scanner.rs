//! Folder scanner for game images.
//!
//! Finds the `.iso`, `.cso` and `.pbp` files at the top level of a folder and
//! runs each through the asset cache.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use umd_peek_core::names::{clean_title, display_name_from_filename};

use crate::asset_cache::{AssetCache, CachedAssets};

/// File extensions recognised as game images (matched case-insensitively).
pub const GAME_EXTENSIONS: &[&str] = &["iso", "cso", "pbp"];

/// One game found by a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannedGame {
    pub source: PathBuf,
    /// Extracted title when there is one, otherwise derived from the filename.
    pub display_name: String,
    pub assets: CachedAssets,
}

pub fn is_game_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| GAME_EXTENSIONS.iter().any(|g| ext.eq_ignore_ascii_case(g)))
        .unwrap_or(false)
}

/// List game files directly inside `folder`, sorted by path.
pub fn scan_game_files(folder: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(folder)?
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_game_file(p))
        .collect();
    files.sort();
    Ok(files)
}

/// Run one game file through the cache.
pub fn scan_game(cache: &AssetCache, source: &Path) -> ScannedGame {
    let assets = cache.get_or_extract(source);
    let title = clean_title(&assets.title);
    let display_name = if title.is_empty() {
        let filename = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        display_name_from_filename(&filename)
    } else {
        title
    };

    ScannedGame {
        source: source.to_path_buf(),
        display_name,
        assets,
    }
}

/// Scan `folder` and populate the cache for every game file in it.
pub fn scan_and_extract(folder: &Path, cache: &AssetCache) -> std::io::Result<Vec<ScannedGame>> {
    let files = scan_game_files(folder)?;
    log::debug!("Found {} game files in {}", files.len(), folder.display());
    Ok(files.iter().map(|f| scan_game(cache, f)).collect())
}

#[cfg(test)]
#[path = "tests/scanner_tests.rs"]
mod tests;
