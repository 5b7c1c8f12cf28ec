//! PARAM.SFO key/value block parsing.
//!
//! Layout (all little-endian):
//!
//! | offset | size | field              |
//! |--------|------|--------------------|
//! | 0x00   | 4    | magic `\0PSF`      |
//! | 0x04   | 4    | version            |
//! | 0x08   | 4    | key table offset   |
//! | 0x0C   | 4    | value table offset |
//! | 0x10   | 4    | entry count        |
//! | 0x14   | 16×N | entry table        |
//!
//! Each entry: u16 key offset (+0), u16 format (+2), u32 value length (+4),
//! u32 value capacity (+8), u32 value offset (+12). Key offsets are relative
//! to the key table, value offsets to the value table.
//!
//! Nothing here allocates from an untrusted count or length: the entry walk
//! stops at the end of the block and every value range is checked first.

use umd_peek_core::util::{le_u16, le_u32};

/// Magic bytes at the start of every SFO block.
pub const SFO_MAGIC: &[u8; 4] = b"\0PSF";

/// Size of the fixed header preceding the entry table.
pub const SFO_HEADER_SIZE: usize = 0x14;

/// Size of one entry in the entry table.
const SFO_ENTRY_SIZE: usize = 16;

/// Format code for a little-endian u32 value.
pub const SFO_FORMAT_INTEGER: u16 = 0x0404;

/// A key with its raw value bytes, as listed by [`entries`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SfoEntry {
    pub key: String,
    pub format: u16,
    pub value: Vec<u8>,
}

impl SfoEntry {
    /// Render the value for display: integers as decimal, everything else
    /// as text with NUL padding removed.
    pub fn display_value(&self) -> String {
        if self.format == SFO_FORMAT_INTEGER {
            if let Some(v) = le_u32(&self.value, 0) {
                return v.to_string();
            }
        }
        umd_peek_core::names::clean_title(&String::from_utf8_lossy(&self.value))
    }
}

#[derive(Debug, Clone, Copy)]
struct SfoHeader {
    key_table: usize,
    value_table: usize,
    entry_count: usize,
}

#[derive(Debug, Clone, Copy)]
struct RawEntry {
    key_offset: u16,
    format: u16,
    value_len: u32,
    value_offset: u32,
}

fn parse_header(block: &[u8]) -> Option<SfoHeader> {
    if block.len() < SFO_HEADER_SIZE || &block[..4] != SFO_MAGIC {
        return None;
    }
    Some(SfoHeader {
        key_table: le_u32(block, 0x08)? as usize,
        value_table: le_u32(block, 0x0C)? as usize,
        entry_count: le_u32(block, 0x10)? as usize,
    })
}

/// Walk the entry table in order, stopping at the first entry that would
/// extend past the end of the block.
fn raw_entries(block: &[u8], header: SfoHeader) -> impl Iterator<Item = RawEntry> + '_ {
    (0..header.entry_count).map_while(move |i| {
        let offset = i
            .checked_mul(SFO_ENTRY_SIZE)?
            .checked_add(SFO_HEADER_SIZE)?;
        let entry = block.get(offset..offset.checked_add(SFO_ENTRY_SIZE)?)?;
        Some(RawEntry {
            key_offset: le_u16(entry, 0)?,
            format: le_u16(entry, 2)?,
            value_len: le_u32(entry, 4)?,
            value_offset: le_u32(entry, 12)?,
        })
    })
}

/// The NUL-terminated key string for an entry, or `None` if it starts
/// outside the block. A key with no terminator runs to the end of the block.
fn key_bytes(block: &[u8], header: SfoHeader, entry: RawEntry) -> Option<&[u8]> {
    let start = header.key_table.checked_add(entry.key_offset as usize)?;
    let rest = block.get(start..)?;
    let end = rest.iter().position(|&b| b == 0).unwrap_or(rest.len());
    Some(&rest[..end])
}

/// The value bytes for an entry, or `None` if any part lies outside the block.
fn value_bytes(block: &[u8], header: SfoHeader, entry: RawEntry) -> Option<&[u8]> {
    let start = header
        .value_table
        .checked_add(entry.value_offset as usize)?;
    let end = start.checked_add(entry.value_len as usize)?;
    block.get(start..end)
}

/// Look up a key and return its value as text.
///
/// Returns an empty string if the block is too small, the magic does not
/// match, the key is absent, or the matching value would extend past the
/// block. The value is returned exactly as stored (lossy UTF-8); a NUL
/// terminator counted in the stored length is kept.
pub fn lookup(block: &[u8], key: &str) -> String {
    let Some(header) = parse_header(block) else {
        log::debug!("SFO: missing magic or short block ({} bytes)", block.len());
        return String::new();
    };

    for entry in raw_entries(block, header) {
        let Some(name) = key_bytes(block, header, entry) else {
            continue;
        };
        if name != key.as_bytes() {
            continue;
        }
        return match value_bytes(block, header, entry) {
            Some(value) => String::from_utf8_lossy(value).into_owned(),
            None => {
                log::debug!(
                    "SFO: value for {key} overruns block (offset {}, length {})",
                    entry.value_offset,
                    entry.value_len
                );
                String::new()
            }
        };
    }

    String::new()
}

/// List every entry whose key and value both lie inside the block.
pub fn entries(block: &[u8]) -> Vec<SfoEntry> {
    let Some(header) = parse_header(block) else {
        return Vec::new();
    };

    raw_entries(block, header)
        .filter_map(|entry| {
            let key = key_bytes(block, header, entry)?;
            let value = value_bytes(block, header, entry)?;
            Some(SfoEntry {
                key: String::from_utf8_lossy(key).into_owned(),
                format: entry.format,
                value: value.to_vec(),
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/sfo_tests.rs"]
mod tests;
