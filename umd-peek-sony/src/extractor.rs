//! Format dispatch between PBP containers and ISO images.

use std::fs::File;
use std::io::{Read, SeekFrom};
use std::path::Path;

use umd_peek_core::{GameMetadata, ReadSeek};

use crate::{iso9660, pbp};

/// Image formats the extractor knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// EBOOT.PBP style container
    Pbp,
    /// Anything else is assumed to be an ISO 9660 disc image
    Iso,
}

impl ImageFormat {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pbp => "PBP",
            Self::Iso => "ISO 9660",
        }
    }
}

/// Pick a format from the first bytes of a file.
///
/// Only the 4-byte PBP magic is checked; every other input, including one
/// shorter than 4 bytes, is treated as a disc image.
pub fn detect_format(magic: &[u8]) -> ImageFormat {
    if magic.starts_with(pbp::PBP_MAGIC) {
        ImageFormat::Pbp
    } else {
        ImageFormat::Iso
    }
}

/// Probe the format of an open image. The reader is left at offset 0.
pub fn probe_format(reader: &mut dyn ReadSeek) -> std::io::Result<ImageFormat> {
    reader.seek(SeekFrom::Start(0))?;
    let mut magic = Vec::with_capacity(4);
    (&mut *reader).take(4).read_to_end(&mut magic)?;
    reader.seek(SeekFrom::Start(0))?;
    Ok(detect_format(&magic))
}

/// Extract metadata and assets from an open image of either format.
pub fn extract_from(reader: &mut dyn ReadSeek) -> GameMetadata {
    let format = match probe_format(reader) {
        Ok(format) => format,
        Err(e) => {
            log::debug!("Cannot read image magic: {e}");
            return GameMetadata::default();
        }
    };

    match format {
        ImageFormat::Pbp => pbp::read_assets_from(reader),
        ImageFormat::Iso => iso9660::read_assets_from(reader),
    }
}

/// Extract metadata and assets from a PBP or ISO file.
///
/// Never fails: a file that cannot be opened yields an empty record.
pub fn extract(path: &Path) -> GameMetadata {
    match File::open(path) {
        Ok(mut file) => {
            let meta = extract_from(&mut file);
            log::debug!(
                "Extracted {}: title={:?} id={:?} icon={}B background={}B audio={}B",
                path.display(),
                meta.title,
                meta.game_id,
                meta.icon.len(),
                meta.background.len(),
                meta.audio.len(),
            );
            meta
        }
        Err(e) => {
            log::debug!("Cannot open {}: {e}", path.display());
            GameMetadata::default()
        }
    }
}

#[cfg(test)]
#[path = "tests/extractor_tests.rs"]
mod tests;
