//! Test fixtures: synthetic EBOOT.PBP files and a converter that counts calls.

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::audio::AudioConverter;

/// Build a PARAM.SFO block with NUL-terminated string values.
pub(crate) fn make_sfo(pairs: &[(&str, &str)]) -> Vec<u8> {
    let key_table = 0x14 + pairs.len() * 16;
    let keys: Vec<u8> = pairs
        .iter()
        .flat_map(|(k, _)| k.bytes().chain(std::iter::once(0)))
        .collect();
    let value_table = key_table + keys.len();

    let mut block = b"\0PSF".to_vec();
    block.extend_from_slice(&0x0101u32.to_le_bytes());
    block.extend_from_slice(&(key_table as u32).to_le_bytes());
    block.extend_from_slice(&(value_table as u32).to_le_bytes());
    block.extend_from_slice(&(pairs.len() as u32).to_le_bytes());

    let mut key_off = 0usize;
    let mut value_off = 0usize;
    let mut values = Vec::new();
    for (key, value) in pairs {
        let len = value.len() + 1;
        block.extend_from_slice(&(key_off as u16).to_le_bytes());
        block.extend_from_slice(&0x0204u16.to_le_bytes());
        block.extend_from_slice(&(len as u32).to_le_bytes());
        block.extend_from_slice(&(len as u32).to_le_bytes());
        block.extend_from_slice(&(value_off as u32).to_le_bytes());
        values.extend_from_slice(value.as_bytes());
        values.push(0);
        key_off += key.len() + 1;
        value_off += len;
    }

    block.extend_from_slice(&keys);
    block.extend_from_slice(&values);
    block
}

/// Build an EBOOT.PBP with the given sections.
pub(crate) fn make_pbp(sfo: &[u8], icon0: &[u8], pic1: &[u8], snd0: &[u8]) -> Vec<u8> {
    let param = 40u32;
    let icon0_off = param + sfo.len() as u32;
    let icon1_off = icon0_off + icon0.len() as u32;
    let pic1_off = icon1_off;
    let snd0_off = pic1_off + pic1.len() as u32;
    let data_psp_off = snd0_off + snd0.len() as u32;

    let mut data = b"\0PBP".to_vec();
    data.extend_from_slice(&0x0001_0000u32.to_le_bytes());
    for off in [
        param,
        icon0_off,
        icon1_off,
        icon1_off,
        pic1_off,
        snd0_off,
        data_psp_off,
        data_psp_off,
    ] {
        data.extend_from_slice(&off.to_le_bytes());
    }
    data.extend_from_slice(sfo);
    data.extend_from_slice(icon0);
    data.extend_from_slice(pic1);
    data.extend_from_slice(snd0);
    data
}

/// Write a PBP named `name` into `dir` with a title, icon, background and audio.
pub(crate) fn write_full_game(dir: &Path, name: &str, title: &str) -> PathBuf {
    let sfo = make_sfo(&[("TITLE", title), ("DISC_ID", "NPUG80001")]);
    let path = dir.join(name);
    std::fs::write(&path, make_pbp(&sfo, b"icon-bytes", b"pic1-bytes", b"at3-bytes")).unwrap();
    path
}

/// Counts calls. When `succeed` is set it writes a fake WAV to the target.
pub(crate) struct CountingConverter {
    pub calls: Rc<Cell<usize>>,
    pub succeed: bool,
}

impl CountingConverter {
    pub fn new(succeed: bool) -> (Self, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        (
            Self {
                calls: Rc::clone(&calls),
                succeed,
            },
            calls,
        )
    }
}

impl AudioConverter for CountingConverter {
    fn convert(&self, _source: &Path, target: &Path) -> bool {
        self.calls.set(self.calls.get() + 1);
        if self.succeed {
            std::fs::write(target, b"RIFF").is_ok()
        } else {
            false
        }
    }
}
