//! Display titles derived from image filenames.
//!
//! New catalog entries get a title built from the file name alone:
//!
//! - the extension is dropped (`sunset-beach.jpg` → `sunset-beach`)
//! - dashes and underscores become spaces (`sunset beach`)
//! - every space-separated word is capitalized, the rest lowercased (`Sunset Beach`)
//!
//! Runs of separators are kept as runs of spaces, so `a--b.jpg` becomes `A  B`.
//! Titles are only generated once, when an entry is first created; editing the
//! title in `metadata.json` afterwards is permanent.

use std::path::Path;

/// Build a display title from an image filename.
///
/// - `"sunset-beach.jpg"` → `"Sunset Beach"`
/// - `"my_cool-Photo.PNG"` → `"My Cool Photo"`
/// - `"IMG_0042.jpeg"` → `"Img 0042"`
pub fn title_from_filename(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    stem.replace(['-', '_'], " ")
        .split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
