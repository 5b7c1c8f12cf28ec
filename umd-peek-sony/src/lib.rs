//! Sony PSP image readers.
//!
//! Pulls the title, disc ID, icon, background and audio preview out of:
//!
//! - ISO 9660 UMD images (`PSP_GAME/PARAM.SFO`, `ICON0.PNG`, `PIC1.PNG`, `SND0.AT3`)
//! - PBP containers (EBOOT.PBP)
//!
//! Every entry point is best-effort: malformed input produces an empty or
//! partial [`GameMetadata`](umd_peek_core::GameMetadata), never a panic.

pub mod extractor;
pub mod iso9660;
pub mod pbp;
pub mod sfo;

pub use extractor::{ImageFormat, detect_format, extract, extract_from};
pub use iso9660::IsoDirectoryEntry;
pub use pbp::PbpHeader;

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod tests_support;
