//! On-disk cache of extracted preview assets.
//!
//! Each game gets a directory under the cache root named after its file stem:
//!
//! ```text
//! <root>/<key>/ICON0.PNG
//! <root>/<key>/PIC1.PNG
//! <root>/<key>/SND0.AT3
//! <root>/<key>/PREVIEW.WAV
//! ```
//!
//! Files are written once and never overwritten. A directory that already
//! holds an icon or background counts as a hit and the image is not opened.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use umd_peek_core::GameMetadata;
use umd_peek_core::names::sanitize_cache_key;
use umd_peek_sony::extractor;

use crate::audio::{AudioConverter, FfmpegConverter};
use crate::error::CacheError;

pub const ICON_FILE: &str = "ICON0.PNG";
pub const BACKGROUND_FILE: &str = "PIC1.PNG";
pub const AUDIO_FILE: &str = "SND0.AT3";
pub const PREVIEW_FILE: &str = "PREVIEW.WAV";

/// Paths to a game's cached assets. `None` means the asset is unavailable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedAssets {
    /// Title from PARAM.SFO. Only set when extraction ran; empty on a cache hit.
    pub title: String,
    pub icon_path: Option<PathBuf>,
    pub background_path: Option<PathBuf>,
    /// Same file as the background.
    pub cover_path: Option<PathBuf>,
    /// `PREVIEW.WAV` if conversion succeeded, otherwise the raw `SND0.AT3`.
    pub audio_path: Option<PathBuf>,
}

impl CachedAssets {
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.icon_path.is_none()
            && self.background_path.is_none()
            && self.cover_path.is_none()
            && self.audio_path.is_none()
    }

    fn with_title(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Default::default()
        }
    }
}

/// A cache directory's contents, for `cache list`.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: String,
    pub path: PathBuf,
    pub file_count: usize,
    pub total_size: u64,
}

/// Cache key for a game file: its stem with unsafe characters replaced.
///
/// Returns `None` when the path has no usable stem.
pub fn cache_key(source: &Path) -> Option<String> {
    let stem = source.file_stem()?.to_string_lossy();
    if stem.is_empty() {
        None
    } else {
        Some(sanitize_cache_key(&stem))
    }
}

/// The fixed file locations inside one game's cache directory.
#[derive(Debug, Clone)]
struct CacheLayout {
    dir: PathBuf,
    icon: PathBuf,
    background: PathBuf,
    audio: PathBuf,
    preview: PathBuf,
}

impl CacheLayout {
    fn new(dir: PathBuf) -> Self {
        Self {
            icon: dir.join(ICON_FILE),
            background: dir.join(BACKGROUND_FILE),
            audio: dir.join(AUDIO_FILE),
            preview: dir.join(PREVIEW_FILE),
            dir,
        }
    }

    fn is_populated(&self) -> bool {
        self.icon.exists() || self.background.exists()
    }
}

/// Extract-once cache of game preview assets.
pub struct AssetCache {
    root: PathBuf,
    converter: Box<dyn AudioConverter>,
}

impl AssetCache {
    /// Create a cache rooted at `root`, converting audio with `ffmpeg`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            converter: Box::new(FfmpegConverter::default()),
        }
    }

    pub fn with_converter(mut self, converter: Box<dyn AudioConverter>) -> Self {
        self.converter = converter;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Cache directory for a game file, or `None` if it has no usable stem.
    pub fn game_dir(&self, source: &Path) -> Option<PathBuf> {
        cache_key(source).map(|key| self.root.join(key))
    }

    /// Return cached asset paths for `source`, extracting them first if the
    /// cache has nothing for it yet.
    ///
    /// Never fails. Problems are logged and produce an empty or partial result.
    pub fn get_or_extract(&self, source: &Path) -> CachedAssets {
        let Some(dir) = self.game_dir(source) else {
            log::warn!("{}", CacheError::NoCacheKey(source.to_path_buf()));
            return CachedAssets::default();
        };
        let layout = CacheLayout::new(dir);

        if layout.is_populated() {
            log::info!("Cache hit: {}", layout.dir.display());
            return self.assets_from_disk(&layout);
        }

        log::info!("Cache miss, extracting {}", source.display());
        let meta = extractor::extract(source);
        if meta.is_empty() {
            log::debug!("Nothing extracted from {}", source.display());
            return CachedAssets::default();
        }

        match self.populate(&layout, &meta) {
            Ok(assets) => assets,
            Err(e) => {
                log::warn!("{e}");
                CachedAssets::with_title(&meta.title)
            }
        }
    }

    /// Build the result for an already-populated directory.
    fn assets_from_disk(&self, layout: &CacheLayout) -> CachedAssets {
        let background = existing(&layout.background);
        CachedAssets {
            title: String::new(),
            icon_path: existing(&layout.icon),
            cover_path: background.clone(),
            background_path: background,
            audio_path: self.resolve_audio(layout),
        }
    }

    /// Write extracted assets into the cache directory.
    fn populate(
        &self,
        layout: &CacheLayout,
        meta: &GameMetadata,
    ) -> Result<CachedAssets, CacheError> {
        fs::create_dir_all(&layout.dir).map_err(|source| CacheError::CreateDir {
            path: layout.dir.clone(),
            source,
        })?;

        let mut assets = CachedAssets::with_title(&meta.title);
        assets.icon_path = store(&layout.icon, &meta.icon);
        assets.background_path = store(&layout.background, &meta.background);
        assets.cover_path = assets.background_path.clone();
        // Leftover audio in the directory is ignored when the image has none
        assets.audio_path = if meta.audio.is_empty() {
            None
        } else {
            store(&layout.audio, &meta.audio);
            self.resolve_audio(layout)
        };
        Ok(assets)
    }

    /// Prefer an existing preview, otherwise try converting the raw audio.
    fn resolve_audio(&self, layout: &CacheLayout) -> Option<PathBuf> {
        if layout.preview.exists() {
            return Some(layout.preview.clone());
        }
        if !layout.audio.exists() {
            return None;
        }
        if self.converter.convert(&layout.audio, &layout.preview) {
            log::info!("Converted audio preview: {}", layout.preview.display());
            Some(layout.preview.clone())
        } else {
            log::debug!("Using raw audio: {}", layout.audio.display());
            Some(layout.audio.clone())
        }
    }

    /// List every game directory under the cache root, sorted by key.
    pub fn list_entries(&self) -> io::Result<Vec<CacheEntry>> {
        let mut entries = Vec::new();
        if !self.root.is_dir() {
            return Ok(entries);
        }

        for entry in fs::read_dir(&self.root)?.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let (file_count, total_size) = dir_usage(&path);
            entries.push(CacheEntry {
                key: entry.file_name().to_string_lossy().into_owned(),
                path,
                file_count,
                total_size,
            });
        }

        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries)
    }

    /// Delete every game directory under the cache root.
    ///
    /// Returns the number of bytes freed. Stray files in the root are left alone.
    pub fn clear(&self) -> io::Result<u64> {
        let mut freed = 0u64;
        if !self.root.is_dir() {
            return Ok(freed);
        }

        for entry in fs::read_dir(&self.root)?.flatten() {
            let path = entry.path();
            if path.is_dir() {
                freed += dir_usage(&path).1;
                fs::remove_dir_all(&path)?;
            }
        }
        Ok(freed)
    }
}

/// Get or extract with the default `ffmpeg` converter.
pub fn get_or_extract(source: &Path, cache_root: &Path) -> CachedAssets {
    AssetCache::new(cache_root).get_or_extract(source)
}

fn existing(path: &Path) -> Option<PathBuf> {
    path.exists().then(|| path.to_path_buf())
}

/// Write `data` to `path` unless the file already exists.
///
/// Returns the path when the file is present afterwards. Empty data is
/// never written.
fn store(path: &Path, data: &[u8]) -> Option<PathBuf> {
    if data.is_empty() {
        return None;
    }
    match write_new(path, data) {
        Ok(()) => {
            log::info!("Cached {}", path.display());
            Some(path.to_path_buf())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            log::debug!("Keeping existing {}", path.display());
            Some(path.to_path_buf())
        }
        Err(e) => {
            log::warn!("Failed to write {}: {e}", path.display());
            None
        }
    }
}

fn write_new(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    if let Err(e) = file.write_all(data) {
        drop(file);
        discard_partial(path);
        return Err(e);
    }
    Ok(())
}

/// Remove a partially written file. Returns false, with a warning, if it
/// could not be removed; a leftover file would later be served as complete.
fn discard_partial(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Failed to remove partial file {}: {e}", path.display());
            false
        }
    }
}

/// File count and total size of the regular files in a directory.
fn dir_usage(dir: &Path) -> (usize, u64) {
    let Ok(read_dir) = fs::read_dir(dir) else {
        return (0, 0);
    };
    read_dir
        .flatten()
        .filter_map(|e| e.metadata().ok())
        .filter(|m| m.is_file())
        .fold((0, 0), |(count, size), m| (count + 1, size + m.len()))
}

#[cfg(test)]
#[path = "tests/asset_cache_tests.rs"]
mod tests;
