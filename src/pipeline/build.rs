//! Sprite build coordination.
//!
//! Partitions assets by group key, hashes each group's contents and either
//! reuses the artifact cached for that group or packs a new one. A cached
//! artifact is only reused when every path still has the content it was
//! packed from. Groups are processed in parallel; new artifacts enter the
//! cache only once every group succeeded.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use rayon::prelude::*;

use crate::asset::name::base_name;
use crate::asset::{Asset, GroupKey};
use crate::cache::{SpriteArtifact, SpriteCache};
use crate::config::Config;
use crate::error::{Result, SpriteError};
use crate::hash::{hash_file, ContentHash};
use crate::output::Printer;
use crate::render::{Packer, VectorAssembler, VectorSource};

/// Sheet producers and the cache a build runs against.
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub packer: &'a dyn Packer,
    pub assembler: Option<&'a dyn VectorAssembler>,
    pub cache: &'a SpriteCache,
}

/// One group's artifact, ready to be written.
#[derive(Debug, Clone)]
pub struct BuiltGroup {
    pub key: GroupKey,
    pub artifact: Arc<SpriteArtifact>,
    /// Whether the artifact came out of the cache.
    pub cached: bool,
    pub asset_count: usize,
}

/// Partition assets by group key, keeping enumeration order within a group.
pub fn partition(assets: &[Asset]) -> BTreeMap<GroupKey, Vec<&Asset>> {
    let mut groups: BTreeMap<GroupKey, Vec<&Asset>> = BTreeMap::new();
    for asset in assets {
        groups.entry(GroupKey::of(asset)).or_default().push(asset);
    }
    groups
}

/// Content hash of every member, keyed by path.
pub fn source_hashes(members: &[&Asset]) -> Result<HashMap<PathBuf, ContentHash>> {
    members
        .par_iter()
        .map(|asset| hash_file(&asset.path).map(|hash| (asset.path.clone(), hash)))
        .collect()
}

/// Content hash of a group.
pub fn group_hash(members: &[&Asset]) -> Result<ContentHash> {
    Ok(ContentHash::of_group(source_hashes(members)?.into_values()))
}

/// Padding for a group, in sheet pixels.
///
/// A group made only of one retina ratio is scaled by that ratio so the
/// gap stays constant once displayed.
pub fn group_padding(members: &[&Asset], padding: u32) -> u32 {
    let Some(first) = members.first() else {
        return padding;
    };
    let uniform = members.iter().all(|a| a.ratio == first.ratio);
    if first.is_retina() && uniform {
        padding * first.ratio
    } else {
        padding
    }
}

fn pack_raster(
    hash: ContentHash,
    sources: HashMap<PathBuf, ContentHash>,
    members: &[&Asset],
    padding: u32,
    packer: &dyn Packer,
) -> Result<SpriteArtifact> {
    let paths: Vec<PathBuf> = members.iter().map(|a| a.path.clone()).collect();
    let out = packer.pack(&paths, padding)?;

    Ok(SpriteArtifact {
        hash,
        sources,
        image: out.image,
        coordinates: out.coordinates,
        properties: out.properties,
    })
}

fn assemble_vector(
    key: &GroupKey,
    hash: ContentHash,
    hashes: HashMap<PathBuf, ContentHash>,
    members: &[&Asset],
    assembler: Option<&dyn VectorAssembler>,
) -> Result<SpriteArtifact> {
    let assembler = assembler.ok_or_else(|| SpriteError::Packing {
        message: format!("No vector assembler for group `{}`", key),
        help: Some("Register one with `Lazysprite::vector_assembler`".to_string()),
    })?;

    let mut ids: HashMap<String, PathBuf> = HashMap::with_capacity(members.len());
    let mut sources = Vec::with_capacity(members.len());
    for (i, asset) in members.iter().enumerate() {
        let id = format!("s{}-{}", i, base_name(&asset.name));
        let content = fs::read(&asset.path)
            .map_err(|e| SpriteError::io(&asset.path, "Failed to read image", e))?;
        ids.insert(id.clone(), asset.path.clone());
        sources.push(VectorSource {
            id,
            path: asset.path.clone(),
            content,
        });
    }

    let sheet = assembler.assemble(&sources)?;

    let mut coordinates = HashMap::with_capacity(sheet.coordinates.len());
    for (id, coords) in sheet.coordinates {
        let path = ids
            .get(&id)
            .ok_or_else(|| SpriteError::packing(format!("Unknown shape id `{}` in group `{}`", id, key)))?;
        coordinates.insert(path.clone(), coords);
    }

    Ok(SpriteArtifact {
        hash,
        sources: hashes,
        image: sheet.image,
        coordinates,
        properties: sheet.properties,
    })
}

fn build_group(
    key: GroupKey,
    members: Vec<&Asset>,
    config: &Config,
    services: Services<'_>,
    printer: &Printer,
) -> Result<BuiltGroup> {
    let sources = source_hashes(&members)?;
    let hash = ContentHash::of_group(sources.values().copied());
    let asset_count = members.len();

    if let Some(artifact) = services.cache.get(&key.cache_name(), &hash) {
        if artifact.matches(&sources) {
            printer.debug("Cached", &format!("{} ({})", key, hash));
            return Ok(BuiltGroup {
                key,
                artifact,
                cached: true,
                asset_count,
            });
        }
    }

    printer.debug("Packing", &format!("{} ({} images)", key, asset_count));
    let artifact = if key.vector {
        assemble_vector(&key, hash, sources, &members, services.assembler)?
    } else {
        let padding = group_padding(&members, config.padding);
        pack_raster(hash, sources, &members, padding, services.packer)?
    };

    Ok(BuiltGroup {
        key,
        artifact: Arc::new(artifact),
        cached: false,
        asset_count,
    })
}

/// Produce an artifact for every group.
///
/// Fails as a whole if any group fails; the cache is then left untouched.
pub fn build_sprites(
    assets: &[Asset],
    config: &Config,
    services: Services<'_>,
    printer: &Printer,
) -> Result<Vec<BuiltGroup>> {
    let groups: Vec<(GroupKey, Vec<&Asset>)> = partition(assets).into_iter().collect();

    let built = groups
        .into_par_iter()
        .map(|(key, members)| build_group(key, members, config, services, printer))
        .collect::<Result<Vec<_>>>()?;

    for group in built.iter().filter(|g| !g.cached) {
        let evicted = services
            .cache
            .put(&group.key.cache_name(), Arc::clone(&group.artifact));
        if let Some(old) = evicted {
            printer.debug("Evicted", &format!("{} ({})", group.key, old));
        }
    }

    Ok(built)
}
