//! Composite group keys.

use std::fmt;

use super::name::is_retina_tag;
use super::Asset;

/// Identifies one sprite-packing job.
///
/// An ordered list of segments (directory name first, then whatever the
/// group classifiers appended) plus the vector flag, so vector and raster
/// files from one directory never share a sheet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub vector: bool,
    pub segments: Vec<String>,
}

impl GroupKey {
    pub fn of(asset: &Asset) -> Self {
        Self {
            vector: asset.is_vector(),
            segments: asset.groups.clone(),
        }
    }

    /// Sheet file extension.
    pub fn extension(&self) -> &'static str {
        if self.vector {
            "svg"
        } else {
            "png"
        }
    }

    /// Sheet name without extension or hash.
    ///
    /// Segments are joined with `.`, except that a retina tag is attached
    /// with `infix`: `["icons", "@2x", "dark"]` becomes `icons@2x.dark`
    /// (or `icons_2x.dark` with `_`).
    pub fn stem(&self, infix: &str) -> String {
        let mut stem = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if is_retina_tag(segment) {
                stem.push_str(infix);
                stem.push_str(&segment[1..]);
            } else {
                if i > 0 {
                    stem.push('.');
                }
                stem.push_str(segment);
            }
        }
        stem
    }

    /// Full sheet file name, with the hash fragment when given.
    pub fn file_name(&self, infix: &str, hash: Option<&str>) -> String {
        match hash {
            Some(hash) => format!("{}.{}.{}", self.stem(infix), hash, self.extension()),
            None => format!("{}.{}", self.stem(infix), self.extension()),
        }
    }

    /// Name of this group's eviction slot in the sprite cache.
    pub fn cache_name(&self) -> String {
        format!("{}.{}", self.stem("@"), self.extension())
    }

    /// The retina tag segment, if any.
    pub fn retina_tag(&self) -> Option<&str> {
        self.segments
            .iter()
            .map(String::as_str)
            .find(|s| is_retina_tag(s))
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_name("@", None))
    }
}
