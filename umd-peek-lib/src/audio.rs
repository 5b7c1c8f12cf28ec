//! Audio preview conversion.
//!
//! SND0.AT3 is ATRAC3, which most playback libraries cannot decode. The
//! cache hands it to an external tool to produce a 16-bit 44.1 kHz WAV.
//! Conversion is best-effort: a missing tool or a failed run just means
//! the raw ATRAC3 file is served instead.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Converts an audio file into a playback-friendly format.
pub trait AudioConverter {
    /// Convert `source` into `target`. Returns true on success.
    fn convert(&self, source: &Path, target: &Path) -> bool;
}

/// Runs `ffmpeg` (or a compatible program) as a blocking subprocess.
#[derive(Debug, Clone)]
pub struct FfmpegConverter {
    program: PathBuf,
}

impl FfmpegConverter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Argument list: overwrite, input, PCM 16-bit little-endian, 44.1 kHz, output.
    pub fn args(source: &Path, target: &Path) -> Vec<OsString> {
        vec![
            "-y".into(),
            "-i".into(),
            source.into(),
            "-acodec".into(),
            "pcm_s16le".into(),
            "-ar".into(),
            "44100".into(),
            target.into(),
        ]
    }
}

impl Default for FfmpegConverter {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl AudioConverter for FfmpegConverter {
    fn convert(&self, source: &Path, target: &Path) -> bool {
        let status = Command::new(&self.program)
            .args(Self::args(source, target))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) if status.success() => target.exists(),
            Ok(status) => {
                log::warn!(
                    "{} exited with {status} converting {}",
                    self.program.display(),
                    source.display()
                );
                false
            }
            Err(e) => {
                log::warn!(
                    "Could not run {} ({e}); is it installed?",
                    self.program.display()
                );
                false
            }
        }
    }
}

/// A converter that never converts. Used when conversion is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConverter;

impl AudioConverter for NoConverter {
    fn convert(&self, _source: &Path, _target: &Path) -> bool {
        false
    }
}
