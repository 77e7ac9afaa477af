//! Sprite sheet writing.
//!
//! Decides per group whether to write, and under `smartUpdate` removes the
//! sheets a new hash supersedes.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::asset::name::sheet_stem;
use crate::asset::GroupKey;
use crate::cache::SpriteArtifact;
use crate::config::Config;
use crate::error::{Result, SpriteError};
use crate::hash::ContentHash;
use crate::output::{display_path, Printer};

use super::build::BuiltGroup;

/// What happened to a sheet file during a compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetStatus {
    /// Written to disk.
    Generated,
    /// Served from the in-memory cache; nothing touched.
    Unchanged,
    /// A file with the same content hash was already on disk.
    Existed,
}

/// One sprite sheet produced by a compile.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    pub key: GroupKey,
    /// Absolute sheet path.
    pub path: PathBuf,
    pub hash: ContentHash,
    pub status: SheetStatus,
    pub asset_count: usize,
    pub artifact: Arc<SpriteArtifact>,
}

/// Where the sheet for `key` lives.
///
/// Under `smartUpdate` the name carries the hash fragment:
/// `icons@2x.0123456789.png`.
pub fn sheet_path(key: &GroupKey, hash: ContentHash, config: &Config) -> PathBuf {
    let fragment = config.smart_update.then(|| hash.fragment());
    config
        .sprite_path
        .join(key.file_name(&config.retina_infix, fragment.as_deref()))
}

/// Remove older sheets of the same group from the sprite directory.
///
/// Failures are reported and otherwise ignored.
fn remove_stale(key: &GroupKey, current: &Path, config: &Config, printer: &Printer) {
    let stem = key.stem(&config.retina_infix);
    let extension = key.extension();

    let stale = WalkDir::new(&config.sprite_path)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_string_lossy();
            sheet_stem(&name, extension) == Some(stem.as_str())
        })
        .map(|e| e.into_path())
        .filter(|p| p != current);

    for path in stale {
        match fs::remove_file(&path) {
            Ok(()) => printer.deleted(&path),
            Err(e) => printer.warning("Failed", &format!("to delete {}: {}", display_path(&path), e)),
        }
    }
}

fn save_group(group: BuiltGroup, config: &Config, printer: &Printer) -> Result<SpriteSheet> {
    let hash = group.artifact.hash;
    let path = sheet_path(&group.key, hash, config);

    let status = if group.cached {
        printer.debug("Unchanged", &display_path(&path));
        SheetStatus::Unchanged
    } else if config.smart_update && path.exists() {
        printer.debug("Existed", &display_path(&path));
        SheetStatus::Existed
    } else {
        if config.smart_update {
            remove_stale(&group.key, &path, config, printer);
        }
        fs::write(&path, &group.artifact.image)
            .map_err(|e| SpriteError::io(&path, "Failed to write sprite", e))?;
        printer.generated(&path);
        SheetStatus::Generated
    };

    Ok(SpriteSheet {
        key: group.key,
        path,
        hash,
        status,
        asset_count: group.asset_count,
        artifact: group.artifact,
    })
}

/// Write every built group's sheet as needed.
pub fn save_sprites(
    groups: Vec<BuiltGroup>,
    config: &Config,
    printer: &Printer,
) -> Result<Vec<SpriteSheet>> {
    if groups.iter().any(|g| !g.cached) {
        fs::create_dir_all(&config.sprite_path).map_err(|e| {
            SpriteError::io(&config.sprite_path, "Failed to create sprite directory", e)
        })?;
    }

    groups
        .into_par_iter()
        .map(|group| save_group(group, config, printer))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::SheetProperties;
    use crate::config::LogLevel;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn key(segments: &[&str]) -> GroupKey {
        GroupKey {
            vector: false,
            segments: segments.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn built(segments: &[&str], bytes: &[u8], cached: bool) -> BuiltGroup {
        BuiltGroup {
            key: key(segments),
            artifact: Arc::new(SpriteArtifact {
                hash: ContentHash::of_bytes(bytes),
                sources: HashMap::new(),
                image: bytes.to_vec(),
                coordinates: HashMap::new(),
                properties: SheetProperties::default(),
            }),
            cached,
            asset_count: 1,
        }
    }

    fn config(sprite_path: &Path, smart_update: bool) -> Config {
        Config {
            sprite_path: sprite_path.to_path_buf(),
            smart_update,
            ..Config::new("/slice")
        }
    }

    fn quiet() -> Printer {
        Printer::new(LogLevel::Silent)
    }

    fn listing(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_sheet_path() {
        let group = built(&["icons", "@2x"], b"x", false);
        let hash = group.artifact.hash;

        let plain = sheet_path(&group.key, hash, &config(Path::new("/out"), false));
        assert_eq!(plain, PathBuf::from("/out/icons@2x.png"));

        let hashed = sheet_path(&group.key, hash, &config(Path::new("/out"), true));
        assert_eq!(
            hashed,
            PathBuf::from(format!("/out/icons@2x.{}.png", hash.fragment()))
        );
    }

    #[test]
    fn test_save_writes_and_creates_directory() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("sprites");

        let sheets =
            save_sprites(vec![built(&["icons"], b"v1", false)], &config(&out, false), &quiet())
                .unwrap();

        assert_eq!(sheets[0].status, SheetStatus::Generated);
        assert_eq!(fs::read(out.join("icons.png")).unwrap(), b"v1");
    }

    #[test]
    fn test_cached_group_is_not_written() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("sprites");

        let sheets =
            save_sprites(vec![built(&["icons"], b"v1", true)], &config(&out, false), &quiet())
                .unwrap();

        assert_eq!(sheets[0].status, SheetStatus::Unchanged);
        assert!(!out.exists());
    }

    #[test]
    fn test_smart_update_skips_existing_hash() {
        let dir = tempdir().unwrap();
        let group = built(&["icons"], b"v1", false);
        let cfg = config(dir.path(), true);
        let path = sheet_path(&group.key, group.artifact.hash, &cfg);
        fs::write(&path, b"already here").unwrap();

        let sheets = save_sprites(vec![group], &cfg, &quiet()).unwrap();

        assert_eq!(sheets[0].status, SheetStatus::Existed);
        assert_eq!(fs::read(&path).unwrap(), b"already here");
    }

    #[test]
    fn test_smart_update_removes_stale_sheets() {
        let dir = tempdir().unwrap();
        let cfg = config(dir.path(), true);

        save_sprites(vec![built(&["icons"], b"v1", false)], &cfg, &quiet()).unwrap();
        save_sprites(vec![built(&["icons", "@2x"], b"r1", false)], &cfg, &quiet()).unwrap();
        fs::write(dir.path().join("icons-extra.0123456789.png"), b"other").unwrap();

        let sheets = save_sprites(vec![built(&["icons"], b"v2", false)], &cfg, &quiet()).unwrap();

        let mut expected = vec![
            "icons-extra.0123456789.png".to_string(),
            sheets[0].path.file_name().unwrap().to_string_lossy().into_owned(),
            format!("icons@2x.{}.png", ContentHash::of_bytes(b"r1").fragment()),
        ];
        expected.sort();
        assert_eq!(listing(dir.path()), expected);
    }
}
