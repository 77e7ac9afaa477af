//! File-name conventions for sprite sources and sheets.
//!
//! Retina variants carry a `@2x`/`_2x` (or `3x`) suffix before the extension:
//! `icon-a@2x.png`, `icon-a_3x.png`. Hashed sheets carry a 10-character hex
//! fragment before the extension: `icons@2x.0123abcdef.png`.

use super::AssetKind;

/// Raster extensions accepted as sprite sources (compared case-insensitively).
pub const RASTER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// Vector extensions accepted as sprite sources.
pub const VECTOR_EXTENSIONS: &[&str] = &["svg"];

/// Length of the content-hash fragment embedded in sheet names.
pub const HASH_FRAGMENT_LEN: usize = 10;

/// Split `name.ext` into `(name, ext)`.
fn split_extension(file_name: &str) -> Option<(&str, &str)> {
    let dot = file_name.rfind('.')?;
    Some((&file_name[..dot], &file_name[dot + 1..]))
}

/// Classify a file by extension, or `None` if it is not a sprite source.
pub fn asset_kind(file_name: &str) -> Option<AssetKind> {
    let (_, ext) = split_extension(file_name)?;
    let ext = ext.to_ascii_lowercase();
    if RASTER_EXTENSIONS.contains(&ext.as_str()) {
        Some(AssetKind::Raster)
    } else if VECTOR_EXTENSIONS.contains(&ext.as_str()) {
        Some(AssetKind::Vector)
    } else {
        None
    }
}

/// Length of a `[@_]Nx` retina suffix at the end of `stem`, with its ratio.
fn retina_suffix(stem: &str) -> Option<(usize, u32)> {
    let bytes = stem.as_bytes();
    if bytes.len() < 3 {
        return None;
    }
    let tail = &bytes[bytes.len() - 3..];
    if !matches!(tail[0], b'@' | b'_') || !tail[2].eq_ignore_ascii_case(&b'x') {
        return None;
    }
    match tail[1] {
        b'2' => Some((3, 2)),
        b'3' => Some((3, 3)),
        _ => None,
    }
}

/// Pixel ratio encoded in a source file name: 2 or 3 for retina variants, else 1.
pub fn retina_ratio(file_name: &str) -> u32 {
    match split_extension(file_name) {
        Some((stem, ext)) if (3..=4).contains(&ext.len()) => {
            retina_suffix(stem).map_or(1, |(_, ratio)| ratio)
        }
        _ => 1,
    }
}

/// File name without extension and without its retina suffix.
pub fn base_name(file_name: &str) -> &str {
    let stem = split_extension(file_name).map_or(file_name, |(stem, _)| stem);
    match retina_suffix(stem) {
        Some((len, _)) => &stem[..stem.len() - len],
        None => stem,
    }
}

/// Selector body for an image: `<block><separator><base name>`.
pub fn selector(block: &str, separator: &str, file_name: &str) -> String {
    format!("{}{}{}", block, separator, base_name(file_name))
}

/// Rewrite hover/active name parts of `selector` into pseudo-classes.
///
/// Only applies when the image's file name mentions `hover` or `active`.
pub fn pseudo_class(selector: &str, file_name: &str) -> String {
    let lower = file_name.to_lowercase();
    if !lower.contains("hover") && !lower.contains("active") {
        return selector.to_string();
    }

    [
        ("Hover", ":hover"),
        ("Active", ":active"),
        ("_hover", ":hover"),
        ("_active", ":active"),
    ]
    .iter()
    .fold(selector.to_string(), |s, (from, to)| s.replacen(from, to, 1))
}

/// Whether `segment` is a retina group tag such as `@2x`.
pub fn is_retina_tag(segment: &str) -> bool {
    let digits = segment
        .strip_prefix('@')
        .and_then(|rest| rest.strip_suffix('x'));
    matches!(digits, Some(d) if !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()))
}

/// The logical stem of a sheet file: its name minus extension and hash fragment.
///
/// Returns `None` when the file does not carry the given extension.
pub fn sheet_stem<'a>(file_name: &'a str, extension: &str) -> Option<&'a str> {
    let (stem, ext) = split_extension(file_name)?;
    if !ext.eq_ignore_ascii_case(extension) {
        return None;
    }
    match split_extension(stem) {
        Some((logical, fragment)) if is_hash_fragment(fragment) => Some(logical),
        _ => Some(stem),
    }
}

fn is_hash_fragment(s: &str) -> bool {
    s.len() == HASH_FRAGMENT_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
}
