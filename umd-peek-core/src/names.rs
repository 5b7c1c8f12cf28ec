//! Filename utilities.
//!
//! Cache keys and display names are both derived from the game file's name,
//! so a game keeps the same cache directory and menu label whether or not
//! extraction succeeded.

/// Characters that are unsafe in a directory name on at least one platform.
const UNSAFE_KEY_CHARS: [char; 9] = [':', '/', '\\', '<', '>', '*', '?', '|', '"'];

/// Turn a filename stem into a cache directory name.
///
/// Each of `: / \ < > * ? | "` becomes `_`; everything else is kept.
///
/// - `"Lumines: Puzzle Fusion"` → `"Lumines_ Puzzle Fusion"`
pub fn sanitize_cache_key(stem: &str) -> String {
    stem.chars()
        .map(|c| if UNSAFE_KEY_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// Derive a human-friendly name from a game filename.
///
/// Drops the extension, turns separators into spaces, removes `(...)` and
/// `[...]` tags, and collapses whitespace. Falls back to the filename
/// itself if nothing is left.
///
/// - `"Patapon_(USA)_[!].iso"` → `"Patapon"`
/// - `"Metal Gear Solid - Peace Walker (Europe) (En,Fr).pbp"` → `"Metal Gear Solid Peace Walker"`
pub fn display_name_from_filename(filename: &str) -> String {
    let stem = match filename.rfind('.') {
        Some(dot) => &filename[..dot],
        None => filename,
    };

    let name = stem.replace(" - ", " ").replace(['_', '-'], " ");
    let name = remove_groups(&name, '(', ')');
    let name = remove_groups(&name, '[', ']');

    let collapsed = name.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        filename.to_string()
    } else {
        collapsed
    }
}

/// Clean a raw PARAM.SFO string for display.
///
/// SFO string values usually count their NUL terminator (and sometimes
/// padding) in the stored length.
pub fn clean_title(raw: &str) -> String {
    raw.trim_end_matches('\0').trim().to_string()
}

/// Remove every complete `open ... close` group. An unmatched `open` stops
/// the removal and leaves the remainder untouched.
fn remove_groups(s: &str, open: char, close: char) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find(open) {
        match result[start..].find(close) {
            Some(rel_end) => {
                result.replace_range(start..start + rel_end + close.len_utf8(), "");
            }
            None => break,
        }
    }
    result
}

#[cfg(test)]
#[path = "tests/names_tests.rs"]
mod tests;
