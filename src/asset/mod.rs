//! Sprite source images and their group keys.
//!
//! An [`Asset`] is created per source file when a directive is expanded,
//! classified into groups, and finally annotated with the geometry of the
//! sheet it was packed into.

mod key;
pub mod name;

use std::path::{Path, PathBuf};

pub use key::GroupKey;

/// Whether a source is packed as pixels or assembled as vector shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Raster,
    Vector,
}

/// Placement of one image inside its sheet, in sheet pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinates {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Size of a whole sheet, in sheet pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SheetProperties {
    pub width: u32,
    pub height: u32,
}

/// One source image taking part in sprite generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    /// Absolute path of the source file.
    pub path: PathBuf,
    /// File name, e.g. `icon-a@2x.png`.
    pub name: String,
    /// Name of the directory the file lives in.
    pub dir: String,
    /// Absolute directory the file was enumerated from.
    pub source_dir: PathBuf,
    /// 1, 2 or 3.
    pub ratio: u32,
    pub kind: AssetKind,
    /// Group key segments, starting with the directory name.
    pub groups: Vec<String>,
    /// Selector body without the leading `.` and namespace.
    pub selector: String,
    /// Directory the emitted stylesheet lives in.
    pub stylesheet_relative: PathBuf,
    pub coordinates: Option<Coordinates>,
    pub sheet: Option<SheetProperties>,
    pub sheet_path: Option<PathBuf>,
}

impl Asset {
    /// Build an asset for `path`, found in `source_dir`.
    ///
    /// `block` overrides the directory name in the selector.
    pub fn new(
        path: PathBuf,
        source_dir: &Path,
        stylesheet_relative: &Path,
        block: Option<&str>,
        separator: &str,
    ) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?.to_string();
        let kind = name::asset_kind(&file_name)?;
        let dir = source_dir
            .file_name()
            .map(|d| d.to_string_lossy().into_owned())
            .unwrap_or_default();

        let selector = name::selector(block.unwrap_or(&dir), separator, &file_name);

        Some(Self {
            ratio: name::retina_ratio(&file_name),
            groups: vec![dir.clone()],
            selector,
            path,
            name: file_name,
            dir,
            source_dir: source_dir.to_path_buf(),
            kind,
            stylesheet_relative: stylesheet_relative.to_path_buf(),
            coordinates: None,
            sheet: None,
            sheet_path: None,
        })
    }

    pub fn is_vector(&self) -> bool {
        self.kind == AssetKind::Vector
    }

    pub fn is_retina(&self) -> bool {
        self.ratio > 1
    }
}
