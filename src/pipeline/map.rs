//! Copies packed geometry back onto assets.

use std::collections::HashMap;
use std::path::Path;

use crate::asset::{Asset, GroupKey};

use super::write::SpriteSheet;

/// Annotate each asset with its coordinates, sheet size and sheet path.
///
/// Only geometry from the sheet of the asset's own group is taken.
pub fn map_properties(assets: &mut [Asset], sheets: &[SpriteSheet]) {
    let index: HashMap<&Path, usize> = assets
        .iter()
        .enumerate()
        .map(|(i, a)| (a.path.as_path(), i))
        .collect();
    let mut updates = Vec::new();

    for sheet in sheets {
        for (path, coords) in &sheet.artifact.coordinates {
            let Some(&i) = index.get(path.as_path()) else {
                continue;
            };
            if GroupKey::of(&assets[i]) == sheet.key {
                updates.push((i, *coords, sheet));
            }
        }
    }

    for (i, coords, sheet) in updates {
        let asset = &mut assets[i];
        asset.coordinates = Some(coords);
        asset.sheet = Some(sheet.artifact.properties);
        asset.sheet_path = Some(sheet.path.clone());
    }
}
