//! Minimal ISO 9660 reading for PSP UMD images.
//!
//! Only what is needed to reach `PSP_GAME/` and the four files inside it:
//! the Primary Volume Descriptor, directory record walks and plain
//! single-extent file reads. No Joliet, Rock Ridge, multi-extent files or
//! multi-session discs.

use std::fs::File;
use std::io::{Read, SeekFrom};
use std::path::Path;

use umd_peek_core::util::{le_u32, read_ascii_fixed};
use umd_peek_core::{AnalysisError, GameMetadata, ReadSeek, stream_len};

use crate::sfo;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Logical block size used throughout the image.
pub const ISO_BLOCK_SIZE: usize = 2048;

/// The Primary Volume Descriptor is always at block 16.
pub const PVD_BLOCK: u32 = 16;

/// Standard identifier at byte 1 of every volume descriptor.
const STANDARD_IDENTIFIER: &[u8; 5] = b"CD001";

/// Root directory record embedded in the PVD.
const ROOT_RECORD_OFFSET: usize = 156;

/// Fixed part of a directory record, up to and including the name length.
const DIR_RECORD_PREFIX_LEN: usize = 33;

/// File flags bit 1: entry is a directory.
const FLAG_DIRECTORY: u8 = 0x02;

/// Directory holding the game's metadata files.
pub const PSP_GAME_DIR: &str = "PSP_GAME";

pub const PARAM_SFO: &str = "PARAM.SFO";
pub const ICON0_PNG: &str = "ICON0.PNG";
pub const PIC1_PNG: &str = "PIC1.PNG";
pub const SND0_AT3: &str = "SND0.AT3";

// ---------------------------------------------------------------------------
// Primary Volume Descriptor
// ---------------------------------------------------------------------------

/// Parsed ISO 9660 Primary Volume Descriptor.
#[derive(Debug, Clone)]
pub struct PrimaryVolumeDescriptor {
    /// System identifier (offset 8, 32 bytes). e.g. "PSP GAME"
    pub system_identifier: String,
    /// Volume identifier (offset 40, 32 bytes). Usually the disc ID.
    pub volume_identifier: String,
    /// Volume space size in blocks (offset 80, LE u32).
    pub volume_space_size: u32,
    /// Starting block of the root directory.
    pub root_block: u32,
    /// Size of the root directory data in bytes.
    pub root_length: u32,
}

/// Read and parse the Primary Volume Descriptor from block 16.
///
/// Only the `CD001` standard identifier is checked.
pub fn read_pvd(reader: &mut dyn ReadSeek) -> Result<PrimaryVolumeDescriptor, AnalysisError> {
    reader.seek(SeekFrom::Start(PVD_BLOCK as u64 * ISO_BLOCK_SIZE as u64))?;
    let mut sector = Vec::with_capacity(ISO_BLOCK_SIZE);
    reader
        .take(ISO_BLOCK_SIZE as u64)
        .read_to_end(&mut sector)?;

    if sector.len() < ISO_BLOCK_SIZE {
        return Err(AnalysisError::TooSmall {
            expected: (PVD_BLOCK as u64 + 1) * ISO_BLOCK_SIZE as u64,
            actual: PVD_BLOCK as u64 * ISO_BLOCK_SIZE as u64 + sector.len() as u64,
        });
    }

    if &sector[1..6] != STANDARD_IDENTIFIER {
        return Err(AnalysisError::invalid_format(
            "Missing CD001 signature in PVD",
        ));
    }

    let root = &sector[ROOT_RECORD_OFFSET..];
    let missing = || AnalysisError::corrupted_header("PVD root record truncated");

    Ok(PrimaryVolumeDescriptor {
        system_identifier: read_ascii_fixed(&sector[8..40]),
        volume_identifier: read_ascii_fixed(&sector[40..72]),
        volume_space_size: le_u32(&sector, 80).ok_or_else(missing)?,
        root_block: le_u32(root, 2).ok_or_else(missing)?,
        root_length: le_u32(root, 10).ok_or_else(missing)?,
    })
}

// ---------------------------------------------------------------------------
// Directory records
// ---------------------------------------------------------------------------

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsoDirectoryEntry {
    /// Name with any `;N` version suffix removed. `.` and `..` for the
    /// self and parent records.
    pub name: String,
    /// Starting logical block.
    pub block: u32,
    /// Data length in bytes.
    pub length: u32,
    pub is_directory: bool,
}

/// Parse a directory record starting at `pos`. The caller guarantees the
/// 33-byte fixed prefix fits in `buf`; the name is clipped to the buffer.
fn parse_directory_record(buf: &[u8], pos: usize) -> Option<IsoDirectoryEntry> {
    let record = &buf[pos..];
    let block = le_u32(record, 2)?;
    let length = le_u32(record, 10)?;
    let flags = record[25];
    let name_len = record[32] as usize;

    let name_end = (DIR_RECORD_PREFIX_LEN + name_len).min(record.len());
    let name_bytes = &record[DIR_RECORD_PREFIX_LEN..name_end];

    let name = match (name_len, name_bytes) {
        (1, [0x00]) => ".".to_string(),
        (1, [0x01]) => "..".to_string(),
        _ => {
            let raw = String::from_utf8_lossy(name_bytes);
            raw.split(';').next().unwrap_or_default().to_string()
        }
    };

    Some(IsoDirectoryEntry {
        name,
        block,
        length,
        is_directory: flags & FLAG_DIRECTORY != 0,
    })
}

/// Walk the directory records in a directory's data.
///
/// A zero length byte is padding up to the end of the current block
/// (records never span blocks), so the walk resumes at the next block
/// boundary. The walk stops once a record's fixed prefix would run past
/// the buffer.
pub fn parse_directory(buf: &[u8]) -> Vec<IsoDirectoryEntry> {
    let mut entries = Vec::new();
    let mut pos = 0;

    while pos < buf.len() {
        let record_len = buf[pos] as usize;
        if record_len == 0 {
            pos = (pos / ISO_BLOCK_SIZE + 1) * ISO_BLOCK_SIZE;
            continue;
        }

        if pos + DIR_RECORD_PREFIX_LEN > buf.len() {
            break;
        }

        if let Some(entry) = parse_directory_record(buf, pos) {
            entries.push(entry);
        }
        pos += record_len;
    }

    entries
}

/// Read `byte_length` bytes of directory data from `block` and list its
/// entries. The read is clamped to the end of the image.
pub fn read_directory(
    reader: &mut dyn ReadSeek,
    block: u32,
    byte_length: u32,
) -> Result<Vec<IsoDirectoryEntry>, AnalysisError> {
    let image_len = stream_len(reader)?;
    let offset = block as u64 * ISO_BLOCK_SIZE as u64;
    let available = image_len.saturating_sub(offset);
    let to_read = (byte_length as u64).min(available);

    if to_read < byte_length as u64 {
        log::debug!(
            "ISO: directory at block {block} claims {byte_length} bytes, only {available} available"
        );
    }

    let mut buf = Vec::new();
    reader.seek(SeekFrom::Start(offset))?;
    reader.take(to_read).read_to_end(&mut buf)?;

    Ok(parse_directory(&buf))
}

// ---------------------------------------------------------------------------
// File reading
// ---------------------------------------------------------------------------

/// Read the full content of a file entry.
///
/// Fails without allocating if the extent would run past the end of the
/// image.
pub fn read_file(
    reader: &mut dyn ReadSeek,
    entry: &IsoDirectoryEntry,
) -> Result<Vec<u8>, AnalysisError> {
    let image_len = stream_len(reader)?;
    let offset = entry.block as u64 * ISO_BLOCK_SIZE as u64;
    let end = offset + entry.length as u64;

    if end > image_len {
        return Err(AnalysisError::corrupted_header(format!(
            "{} extends past end of image ({} > {})",
            entry.name, end, image_len
        )));
    }

    reader.seek(SeekFrom::Start(offset))?;
    let mut data = vec![0u8; entry.length as usize];
    reader.read_exact(&mut data)?;
    Ok(data)
}

fn read_file_or_empty(reader: &mut dyn ReadSeek, entry: &IsoDirectoryEntry) -> Vec<u8> {
    read_file(reader, entry).unwrap_or_else(|e| {
        log::debug!("ISO: {e}");
        Vec::new()
    })
}

// ---------------------------------------------------------------------------
// PSP_GAME extraction
// ---------------------------------------------------------------------------

/// List the entries of `PSP_GAME/`.
///
/// Returns `Ok(None)` when the image is a valid ISO without that directory.
pub fn read_psp_game_entries(
    reader: &mut dyn ReadSeek,
) -> Result<Option<Vec<IsoDirectoryEntry>>, AnalysisError> {
    let pvd = read_pvd(reader)?;
    let root = read_directory(reader, pvd.root_block, pvd.root_length)?;

    // Block 0 is the system area, never a real directory extent
    let Some(psp_game) = root
        .iter()
        .find(|e| e.is_directory && e.name == PSP_GAME_DIR && e.block != 0)
    else {
        return Ok(None);
    };

    read_directory(reader, psp_game.block, psp_game.length).map(Some)
}

fn try_read_assets(reader: &mut dyn ReadSeek) -> Result<GameMetadata, AnalysisError> {
    let mut meta = GameMetadata::default();

    let Some(entries) = read_psp_game_entries(reader)? else {
        log::debug!("ISO: no {PSP_GAME_DIR} directory in root");
        return Ok(meta);
    };

    for entry in entries.iter().filter(|e| !e.is_directory) {
        match entry.name.as_str() {
            PARAM_SFO => {
                let param_sfo = read_file_or_empty(reader, entry);
                meta.title = sfo::lookup(&param_sfo, "TITLE");
                meta.game_id = sfo::lookup(&param_sfo, "DISC_ID");
            }
            ICON0_PNG => meta.icon = read_file_or_empty(reader, entry),
            PIC1_PNG => meta.background = read_file_or_empty(reader, entry),
            SND0_AT3 => meta.audio = read_file_or_empty(reader, entry),
            _ => {}
        }
    }

    Ok(meta)
}

/// Extract metadata and assets from an ISO image held by a reader.
///
/// Never fails: a missing `CD001` identifier or `PSP_GAME` directory
/// yields an empty record, and each file that cannot be read is left empty
/// on its own.
pub fn read_assets_from(reader: &mut dyn ReadSeek) -> GameMetadata {
    try_read_assets(reader).unwrap_or_else(|e| {
        log::debug!("ISO: {e}");
        GameMetadata::default()
    })
}

/// Extract metadata and assets from an ISO file.
pub fn read_assets(path: &Path) -> GameMetadata {
    match File::open(path) {
        Ok(mut file) => read_assets_from(&mut file),
        Err(e) => {
            log::debug!("ISO: cannot open {}: {e}", path.display());
            GameMetadata::default()
        }
    }
}

#[cfg(test)]
#[path = "tests/iso9660_tests.rs"]
mod tests;
