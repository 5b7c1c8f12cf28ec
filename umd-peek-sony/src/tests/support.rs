//! Builders for synthetic SFO blocks, PBP containers and ISO images.

use crate::iso9660::{ISO_BLOCK_SIZE, PVD_BLOCK};
use crate::pbp::{PBP_HEADER_SIZE, PBP_MAGIC};
use crate::sfo::SFO_MAGIC;

/// Build an SFO block whose values are stored byte-for-byte (no terminator).
pub(crate) fn make_sfo(pairs: &[(&str, &[u8])]) -> Vec<u8> {
    let entry_table_len = pairs.len() * 16;
    let key_table = 0x14 + entry_table_len;

    let mut keys = Vec::new();
    let mut key_offsets = Vec::new();
    for (key, _) in pairs {
        key_offsets.push(keys.len() as u16);
        keys.extend_from_slice(key.as_bytes());
        keys.push(0);
    }
    while keys.len() % 4 != 0 {
        keys.push(0);
    }

    let value_table = key_table + keys.len();
    let mut values = Vec::new();
    let mut value_offsets = Vec::new();
    for (_, value) in pairs {
        value_offsets.push(values.len() as u32);
        values.extend_from_slice(value);
    }

    let mut block = Vec::new();
    block.extend_from_slice(SFO_MAGIC);
    block.extend_from_slice(&0x0101u32.to_le_bytes());
    block.extend_from_slice(&(key_table as u32).to_le_bytes());
    block.extend_from_slice(&(value_table as u32).to_le_bytes());
    block.extend_from_slice(&(pairs.len() as u32).to_le_bytes());

    for (i, (_, value)) in pairs.iter().enumerate() {
        block.extend_from_slice(&key_offsets[i].to_le_bytes());
        block.extend_from_slice(&0x0204u16.to_le_bytes()); // utf-8 string
        block.extend_from_slice(&(value.len() as u32).to_le_bytes());
        block.extend_from_slice(&(value.len() as u32).to_le_bytes());
        block.extend_from_slice(&value_offsets[i].to_le_bytes());
    }

    block.extend_from_slice(&keys);
    block.extend_from_slice(&values);
    block
}

/// Build a PBP container with the given sections. `pic0` is left empty and
/// `data.psp`/`data.psar` are zero-length.
pub(crate) fn make_pbp(sfo: &[u8], icon0: &[u8], pic1: &[u8], snd0: &[u8]) -> Vec<u8> {
    let param = PBP_HEADER_SIZE as u32;
    let icon0_off = param + sfo.len() as u32;
    let icon1_off = icon0_off + icon0.len() as u32;
    let pic0_off = icon1_off;
    let pic1_off = pic0_off;
    let snd0_off = pic1_off + pic1.len() as u32;
    let data_psp_off = snd0_off + snd0.len() as u32;
    let data_psar_off = data_psp_off;

    let mut data = make_pbp_header(&[
        param,
        icon0_off,
        icon1_off,
        pic0_off,
        pic1_off,
        snd0_off,
        data_psp_off,
        data_psar_off,
    ]);
    data.extend_from_slice(sfo);
    data.extend_from_slice(icon0);
    data.extend_from_slice(pic1);
    data.extend_from_slice(snd0);
    data
}

/// Build a bare 40-byte PBP header from eight section offsets.
pub(crate) fn make_pbp_header(offsets: &[u32; 8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(PBP_HEADER_SIZE);
    data.extend_from_slice(PBP_MAGIC);
    data.extend_from_slice(&0x0001_0000u32.to_le_bytes());
    for offset in offsets {
        data.extend_from_slice(&offset.to_le_bytes());
    }
    data
}

/// Build an ISO 9660 directory record.
pub(crate) fn make_dir_record(name: &[u8], block: u32, length: u32, is_dir: bool) -> Vec<u8> {
    let name_len = name.len();
    let record_len = 33 + name_len + (name_len + 1) % 2; // pad to even
    let mut record = vec![0u8; record_len];
    record[0] = record_len as u8;
    record[2..6].copy_from_slice(&block.to_le_bytes());
    record[6..10].copy_from_slice(&block.to_be_bytes());
    record[10..14].copy_from_slice(&length.to_le_bytes());
    record[14..18].copy_from_slice(&length.to_be_bytes());
    record[25] = if is_dir { 0x02 } else { 0x00 };
    record[32] = name_len as u8;
    record[33..33 + name_len].copy_from_slice(name);
    record
}

/// Concatenate records into one zero-padded 2048-byte directory sector.
pub(crate) fn make_dir_sector(records: &[Vec<u8>]) -> Vec<u8> {
    let mut sector = Vec::with_capacity(ISO_BLOCK_SIZE);
    for record in records {
        sector.extend_from_slice(record);
    }
    assert!(sector.len() <= ISO_BLOCK_SIZE, "directory does not fit in one sector");
    sector.resize(ISO_BLOCK_SIZE, 0);
    sector
}

/// A zero-filled ISO image with a PVD at block 16 pointing at a root
/// directory.
pub(crate) struct IsoImage {
    data: Vec<u8>,
}

impl IsoImage {
    pub(crate) fn new(total_blocks: usize, root_block: u32, root_len: u32) -> Self {
        let mut data = vec![0u8; total_blocks * ISO_BLOCK_SIZE];
        let pvd = PVD_BLOCK as usize * ISO_BLOCK_SIZE;
        data[pvd] = 0x01;
        data[pvd + 1..pvd + 6].copy_from_slice(b"CD001");
        data[pvd + 6] = 0x01;
        data[pvd + 8..pvd + 40].copy_from_slice(&pad32(b"PSP GAME"));
        data[pvd + 40..pvd + 72].copy_from_slice(&pad32(b"UCUS98632"));
        let root = make_dir_record(&[0x00], root_block, root_len, true);
        data[pvd + 156..pvd + 156 + root.len()].copy_from_slice(&root);
        Self { data }
    }

    pub(crate) fn write_block(&mut self, block: u32, bytes: &[u8]) {
        let start = block as usize * ISO_BLOCK_SIZE;
        self.data[start..start + bytes.len()].copy_from_slice(bytes);
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

fn pad32(s: &[u8]) -> [u8; 32] {
    let mut out = [b' '; 32];
    out[..s.len()].copy_from_slice(s);
    out
}

pub(crate) const ROOT_BLOCK: u32 = 20;
pub(crate) const PSP_GAME_BLOCK: u32 = 21;

/// Build a PSP-style ISO: root directory at block 20 holding `PSP_GAME`
/// at block 21, whose files are laid out from block 22 onwards.
pub(crate) fn make_psp_iso(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut records = vec![
        make_dir_record(&[0x00], PSP_GAME_BLOCK, ISO_BLOCK_SIZE as u32, true),
        make_dir_record(&[0x01], ROOT_BLOCK, ISO_BLOCK_SIZE as u32, true),
    ];
    let mut next_block = PSP_GAME_BLOCK + 1;
    let mut placements = Vec::new();
    for (name, content) in files {
        let versioned = format!("{name};1");
        records.push(make_dir_record(
            versioned.as_bytes(),
            next_block,
            content.len() as u32,
            false,
        ));
        placements.push((next_block, *content));
        next_block += content.len().div_ceil(ISO_BLOCK_SIZE).max(1) as u32;
    }

    let mut image = IsoImage::new(next_block as usize, ROOT_BLOCK, ISO_BLOCK_SIZE as u32);
    image.write_block(
        ROOT_BLOCK,
        &make_dir_sector(&[
            make_dir_record(&[0x00], ROOT_BLOCK, ISO_BLOCK_SIZE as u32, true),
            make_dir_record(&[0x01], ROOT_BLOCK, ISO_BLOCK_SIZE as u32, true),
            make_dir_record(b"PSP_GAME", PSP_GAME_BLOCK, ISO_BLOCK_SIZE as u32, true),
        ]),
    );
    image.write_block(PSP_GAME_BLOCK, &make_dir_sector(&records));
    for (block, content) in placements {
        image.write_block(block, content);
    }
    image.into_bytes()
}

/// Write bytes to a fresh temp file and return its handle.
pub(crate) fn temp_file(bytes: &[u8]) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}
