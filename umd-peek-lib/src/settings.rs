//! User settings (cache location, audio conversion).
//!
//! The settings file is `~/.config/umd-peek/settings.toml`:
//!
//! ```toml
//! [cache]
//! root = "/path/to/previews"
//!
//! [audio]
//! convert = true
//! program = "ffmpeg"
//! ```

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::audio::{AudioConverter, FfmpegConverter, NoConverter};
use crate::error::CacheError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub cache: CacheSettings,
    pub audio: AudioSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Overrides the default cache location when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Convert SND0.AT3 to a WAV preview.
    pub convert: bool,
    /// Converter executable, looked up on `PATH` if not absolute.
    pub program: String,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            convert: true,
            program: "ffmpeg".to_string(),
        }
    }
}

impl AudioSettings {
    /// Build the converter these settings describe.
    pub fn converter(&self) -> Box<dyn AudioConverter> {
        if self.convert && !self.program.is_empty() {
            Box::new(FfmpegConverter::new(&self.program))
        } else {
            Box::new(NoConverter)
        }
    }
}

/// Canonical path to the settings file: `~/.config/umd-peek/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("umd-peek").join("settings.toml")
}

/// Default cache root: `<platform cache dir>/umd-peek/previews`.
pub fn default_cache_root() -> PathBuf {
    let cache = dirs::cache_dir().unwrap_or_else(|| PathBuf::from("."));
    cache.join("umd-peek").join("previews")
}

/// Resolve the cache root using a priority chain:
///
/// 1. CLI override (if `Some`)
/// 2. `cache.root` in `settings.toml`
/// 3. [`default_cache_root`]
pub fn resolve_cache_root(cli_override: Option<PathBuf>, settings: &Settings) -> PathBuf {
    if let Some(p) = cli_override {
        return p;
    }
    match &settings.cache.root {
        Some(p) if !p.as_os_str().is_empty() => p.clone(),
        _ => default_cache_root(),
    }
}

/// Load settings from the canonical path, falling back to defaults.
pub fn load_settings() -> Settings {
    let path = settings_path();
    match load_settings_from(&path) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("Ignoring {}: {e}", path.display());
            Settings::default()
        }
    }
}

/// Load settings from `path`. A missing file yields defaults.
pub fn load_settings_from(path: &Path) -> Result<Settings, CacheError> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let contents = std::fs::read_to_string(path)?;
    toml::from_str(&contents).map_err(|e| CacheError::settings(e.to_string()))
}

/// Save (or clear) the cache root in `settings.toml`.
pub fn save_cache_root(path: Option<&Path>) -> io::Result<()> {
    save_cache_root_to(&settings_path(), path)
}

/// Save (or clear) `cache.root` in the settings file at `settings`.
///
/// Edits the parsed document in place so keys this version does not know
/// about survive. An unparsable file is replaced.
pub fn save_cache_root_to(settings: &Path, path: Option<&Path>) -> io::Result<()> {
    let mut doc = read_document(settings).unwrap_or_else(empty_table);
    let cache = section_mut(&mut doc, "cache")?;
    match path {
        Some(p) => {
            cache.insert(
                "root".to_string(),
                toml::Value::String(p.to_string_lossy().into_owned()),
            );
        }
        None => {
            cache.remove("root");
        }
    }
    write_document(settings, &doc)
}

/// Load the full settings file as a pretty-printed TOML string for display.
pub fn load_settings_string() -> Option<String> {
    load_settings_string_from(&settings_path())
}

/// Like [`load_settings_string`], for an explicit file.
pub fn load_settings_string_from(settings: &Path) -> Option<String> {
    toml::to_string_pretty(&read_document(settings)?).ok()
}

fn empty_table() -> toml::Value {
    toml::Value::Table(Default::default())
}

/// Parse a settings file. `None` if it is missing or not valid TOML.
fn read_document(settings: &Path) -> Option<toml::Value> {
    let contents = std::fs::read_to_string(settings).ok()?;
    contents.parse().ok()
}

/// The `[name]` table of `doc`, created if absent.
fn section_mut<'a>(
    doc: &'a mut toml::Value,
    name: &str,
) -> io::Result<&'a mut toml::map::Map<String, toml::Value>> {
    doc.as_table_mut()
        .ok_or_else(|| io::Error::other("settings.toml root is not a table"))?
        .entry(name)
        .or_insert_with(empty_table)
        .as_table_mut()
        .ok_or_else(|| io::Error::other(format!("[{name}] is not a table")))
}

/// Write through a temporary file and rename, so readers never see a
/// half-written file.
fn write_document(settings: &Path, doc: &toml::Value) -> io::Result<()> {
    if let Some(parent) = settings.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(doc).map_err(io::Error::other)?;
    let tmp = settings.with_extension("toml.tmp");
    std::fs::write(&tmp, serialized)?;
    std::fs::rename(&tmp, settings)
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
