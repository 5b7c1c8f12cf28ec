//! Shared types for umd-peek.
//!
//! The format readers live in `umd-peek-sony`; this crate holds what both
//! the readers and the cache layer need: the extraction result, the error
//! type, bounds-checked byte helpers and filename helpers.

use serde::{Deserialize, Serialize};
use std::io::{Read, Seek};

pub mod error;
pub mod names;
pub mod util;

pub use error::AnalysisError;

/// Metadata and raw assets pulled out of a game image.
///
/// Every field may be empty, meaning "not found". Many real images omit
/// some assets, so an extractor that finds nothing returns
/// `GameMetadata::default()` rather than failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMetadata {
    /// `TITLE` from PARAM.SFO, exactly as stored
    pub title: String,

    /// `DISC_ID` from PARAM.SFO (e.g. "ULUS10041")
    pub game_id: String,

    /// ICON0.PNG bytes
    #[serde(skip)]
    pub icon: Vec<u8>,

    /// PIC1.PNG bytes
    #[serde(skip)]
    pub background: Vec<u8>,

    /// SND0.AT3 bytes (ATRAC3, not directly playable)
    #[serde(skip)]
    pub audio: Vec<u8>,
}

impl GameMetadata {
    /// True when nothing at all was found.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.game_id.is_empty()
            && self.icon.is_empty()
            && self.background.is_empty()
            && self.audio.is_empty()
    }
}

/// A reader that implements both Read and Seek.
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}

/// Length of a seekable stream, restoring the original position afterwards.
pub fn stream_len(reader: &mut dyn ReadSeek) -> std::io::Result<u64> {
    let pos = reader.stream_position()?;
    let len = reader.seek(std::io::SeekFrom::End(0))?;
    reader.seek(std::io::SeekFrom::Start(pos))?;
    Ok(len)
}
