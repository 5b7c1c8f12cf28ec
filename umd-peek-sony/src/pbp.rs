//! PBP (EBOOT.PBP) container reading.
//!
//! A PBP starts with a 40-byte header: the magic `\0PBP`, a version word,
//! and eight little-endian u32 section offsets in this order:
//!
//! `PARAM.SFO`, `ICON0.PNG`, `ICON1.PMF`, `PIC0.PNG`, `PIC1.PNG`,
//! `SND0.AT3`, `DATA.PSP`, `DATA.PSAR`
//!
//! Each section runs from its offset to the next one. Offsets are not
//! validated beyond being used as slice bounds: every range is clamped to
//! the file length and a range whose end is not past its start is empty.

use std::fs::File;
use std::io::{Read, SeekFrom};
use std::ops::Range;
use std::path::Path;

use umd_peek_core::util::le_u32;
use umd_peek_core::{AnalysisError, GameMetadata, ReadSeek, stream_len};

use crate::sfo;

/// Magic bytes at the start of every PBP container.
pub const PBP_MAGIC: &[u8; 4] = b"\0PBP";

/// Magic (4) + version (4) + eight section offsets (4 each).
pub const PBP_HEADER_SIZE: usize = 40;

/// Parsed PBP header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PbpHeader {
    pub version: u32,
    pub param_sfo: u32,
    pub icon0: u32,
    pub icon1: u32,
    pub pic0: u32,
    pub pic1: u32,
    pub snd0: u32,
    pub data_psp: u32,
    pub data_psar: u32,
}

impl PbpHeader {
    /// Decode a header from the first 40 bytes of a container.
    ///
    /// Returns `None` if the buffer is too short or the magic is wrong.
    pub fn parse(buf: &[u8]) -> Option<Self> {
        if buf.len() < PBP_HEADER_SIZE || &buf[..4] != PBP_MAGIC {
            return None;
        }
        Some(Self {
            version: le_u32(buf, 0x04)?,
            param_sfo: le_u32(buf, 0x08)?,
            icon0: le_u32(buf, 0x0C)?,
            icon1: le_u32(buf, 0x10)?,
            pic0: le_u32(buf, 0x14)?,
            pic1: le_u32(buf, 0x18)?,
            snd0: le_u32(buf, 0x1C)?,
            data_psp: le_u32(buf, 0x20)?,
            data_psar: le_u32(buf, 0x24)?,
        })
    }

    /// PARAM.SFO: `[param_sfo, icon0)`
    pub fn metadata_range(&self) -> Range<u64> {
        self.param_sfo as u64..self.icon0 as u64
    }

    /// ICON0.PNG: `[icon0, icon1)`
    pub fn icon_range(&self) -> Range<u64> {
        self.icon0 as u64..self.icon1 as u64
    }

    /// PIC1.PNG: `[pic1, snd0)`
    pub fn background_range(&self) -> Range<u64> {
        self.pic1 as u64..self.snd0 as u64
    }

    /// SND0.AT3: `[snd0, data_psp)`
    pub fn audio_range(&self) -> Range<u64> {
        self.snd0 as u64..self.data_psp as u64
    }
}

/// Clamp a section range to the file length. Empty when `end <= start`.
pub fn clamp_range(range: Range<u64>, file_len: u64) -> Range<u64> {
    let end = range.end.min(file_len);
    if end <= range.start {
        return range.start..range.start;
    }
    range.start..end
}

/// Read the header from the start of a container.
pub fn read_header(reader: &mut dyn ReadSeek) -> Result<PbpHeader, AnalysisError> {
    reader.seek(SeekFrom::Start(0))?;
    let mut buf = Vec::with_capacity(PBP_HEADER_SIZE);
    reader.take(PBP_HEADER_SIZE as u64).read_to_end(&mut buf)?;

    if buf.len() < PBP_HEADER_SIZE {
        return Err(AnalysisError::TooSmall {
            expected: PBP_HEADER_SIZE as u64,
            actual: buf.len() as u64,
        });
    }
    PbpHeader::parse(&buf).ok_or_else(|| AnalysisError::invalid_format("Missing PBP magic"))
}

/// Read one section, clamped to the file length.
fn read_section(
    reader: &mut dyn ReadSeek,
    range: Range<u64>,
    file_len: u64,
) -> Result<Vec<u8>, AnalysisError> {
    let range = clamp_range(range, file_len);
    if range.is_empty() {
        return Ok(Vec::new());
    }
    reader.seek(SeekFrom::Start(range.start))?;
    let mut buf = vec![0u8; (range.end - range.start) as usize];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

/// Read a section, turning any failure into an empty buffer.
fn read_section_or_empty(
    reader: &mut dyn ReadSeek,
    name: &str,
    range: Range<u64>,
    file_len: u64,
) -> Vec<u8> {
    match read_section(reader, range.clone(), file_len) {
        Ok(buf) => buf,
        Err(e) => {
            log::debug!("PBP: failed to read {name} at {range:?}: {e}");
            Vec::new()
        }
    }
}

fn try_read_assets(reader: &mut dyn ReadSeek) -> Result<GameMetadata, AnalysisError> {
    let file_len = stream_len(reader)?;
    let header = read_header(reader)?;
    log::debug!("PBP header: {header:?} (file length {file_len})");

    let param_sfo = read_section_or_empty(reader, "PARAM.SFO", header.metadata_range(), file_len);

    Ok(GameMetadata {
        title: sfo::lookup(&param_sfo, "TITLE"),
        game_id: sfo::lookup(&param_sfo, "DISC_ID"),
        icon: read_section_or_empty(reader, "ICON0.PNG", header.icon_range(), file_len),
        background: read_section_or_empty(reader, "PIC1.PNG", header.background_range(), file_len),
        audio: read_section_or_empty(reader, "SND0.AT3", header.audio_range(), file_len),
    })
}

/// Extract metadata and assets from a PBP container held by a reader.
///
/// Never fails: an unreadable or malformed header yields an empty record,
/// and each section that cannot be read is left empty on its own.
pub fn read_assets_from(reader: &mut dyn ReadSeek) -> GameMetadata {
    try_read_assets(reader).unwrap_or_else(|e| {
        log::debug!("PBP: {e}");
        GameMetadata::default()
    })
}

/// Extract metadata and assets from a PBP file.
pub fn read_assets(path: &Path) -> GameMetadata {
    match File::open(path) {
        Ok(mut file) => read_assets_from(&mut file),
        Err(e) => {
            log::debug!("PBP: cannot open {}: {e}", path.display());
            GameMetadata::default()
        }
    }
}

/// Read just the PARAM.SFO section of a container.
pub fn read_param_sfo(reader: &mut dyn ReadSeek) -> Result<Vec<u8>, AnalysisError> {
    let file_len = stream_len(reader)?;
    let header = read_header(reader)?;
    read_section(reader, header.metadata_range(), file_len)
}

#[cfg(test)]
#[path = "tests/pbp_tests.rs"]
mod tests;
