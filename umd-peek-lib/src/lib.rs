//! Asset cache, folder scanning and settings for umd-peek.

pub mod asset_cache;
pub mod audio;
pub mod error;
pub mod scanner;
pub mod settings;

pub use asset_cache::{AssetCache, CacheEntry, CachedAssets, get_or_extract};
pub use audio::{AudioConverter, FfmpegConverter, NoConverter};
pub use error::CacheError;
pub use scanner::{ScannedGame, scan_and_extract, scan_game, scan_game_files};
pub use settings::Settings;

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod tests_support;
