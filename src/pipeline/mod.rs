//! The sprite pipeline.
//!
//! One [`Lazysprite`] compiles stylesheets in seven stages:
//!
//! 1. extract directives and enumerate their images
//! 2. classify assets into groups
//! 3. replace directives with placeholder rules
//! 4. hash, pack or reuse each group's sheet
//! 5. write sheets to disk
//! 6. map sheet geometry back onto assets
//! 7. resolve placeholders into background declarations
//!
//! ```no_run
//! use lazysprite::{AtRule, Config, Lazysprite, Node, Stylesheet};
//!
//! let config = Config {
//!     sprite_path: "dist/sprites".into(),
//!     stylesheet_relative: Some("dist/css".into()),
//!     ..Config::new("src/slice")
//! };
//! let pipeline = Lazysprite::new(config)?;
//!
//! let mut sheet = Stylesheet::new(vec![Node::AtRule(AtRule::new("lazysprite", "\"icons\""))]);
//! pipeline.process(&mut sheet)?;
//! println!("{}", sheet.to_css());
//! # Ok::<(), lazysprite::SpriteError>(())
//! ```

mod build;
mod extract;
mod group;
mod inject;
mod map;
mod resolve;
mod write;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::asset::Asset;
use crate::cache::SpriteCache;
use crate::config::Config;
use crate::document::Stylesheet;
use crate::error::Result;
use crate::output::Printer;
use crate::paths::absolutize;
use crate::render::{Packer, ShelfPacker, VectorAssembler};

pub use build::{group_hash, group_padding, partition, source_hashes, BuiltGroup};
pub use extract::{Directive, DIRECTIVE};
pub use group::{ratio_group, GroupFn};
pub use inject::{media_params, RESOLUTIONS_2X, RESOLUTIONS_3X};
pub use write::{sheet_path, SheetStatus, SpriteSheet};

/// A configured sprite pipeline.
///
/// Compiles take `&self`; all mutable state lives in the [`SpriteCache`].
pub struct Lazysprite {
    config: Config,
    root: PathBuf,
    group_by: Vec<GroupFn>,
    packer: Arc<dyn Packer>,
    assembler: Option<Arc<dyn VectorAssembler>>,
    cache: Arc<SpriteCache>,
    printer: Printer,
}

impl fmt::Debug for Lazysprite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lazysprite")
            .field("config", &self.config)
            .field("root", &self.root)
            .field("group_by", &self.group_by.len())
            .field("assembler", &self.assembler.is_some())
            .finish_non_exhaustive()
    }
}

impl Lazysprite {
    /// Create a pipeline resolving relative paths against the current directory.
    pub fn new(config: Config) -> Result<Self> {
        let root = std::env::current_dir()?;
        Self::with_root(config, &root)
    }

    /// Create a pipeline resolving relative paths against `root`.
    pub fn with_root(config: Config, root: &Path) -> Result<Self> {
        let config = config.resolve(root)?;
        let printer = Printer::new(config.log_level);

        Ok(Self {
            config,
            root: root.to_path_buf(),
            group_by: Vec::new(),
            packer: Arc::new(ShelfPacker::new()),
            assembler: None,
            cache: SpriteCache::global(),
            printer,
        })
    }

    /// Add a group classifier. Classifiers run in registration order.
    pub fn group_by<F>(mut self, classify: F) -> Self
    where
        F: Fn(&Asset) -> Option<String> + Send + Sync + 'static,
    {
        let classify: GroupFn = Box::new(move |asset: &Asset| Ok(classify(asset)));
        self.group_by.push(classify);
        self
    }

    /// Add a fallible group classifier; errors leave the key unchanged.
    pub fn try_group_by<F, E>(mut self, classify: F) -> Self
    where
        F: Fn(&Asset) -> std::result::Result<Option<String>, E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        let classify: GroupFn =
            Box::new(move |asset: &Asset| classify(asset).map_err(|e| e.to_string()));
        self.group_by.push(classify);
        self
    }

    /// Replace the raster packer.
    pub fn packer(mut self, packer: Arc<dyn Packer>) -> Self {
        self.packer = packer;
        self
    }

    /// Set the assembler used for vector groups.
    pub fn vector_assembler(mut self, assembler: Arc<dyn VectorAssembler>) -> Self {
        self.assembler = Some(assembler);
        self
    }

    /// Use `cache` instead of the process-wide one.
    pub fn cache(mut self, cache: Arc<SpriteCache>) -> Self {
        self.cache = cache;
        self
    }

    /// The resolved configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Compile `sheet` in place, writing sprite sheets as needed.
    ///
    /// Returns one entry per group, sorted by group key. On error the tree
    /// may be left partially rewritten and sheets already written stay on
    /// disk.
    pub fn process(&self, sheet: &mut Stylesheet) -> Result<Vec<SpriteSheet>> {
        self.run(sheet).inspect_err(|e| self.printer.error("Failed", &e.to_string()))
    }

    fn run(&self, sheet: &mut Stylesheet) -> Result<Vec<SpriteSheet>> {
        let source = sheet.source.as_deref().map(|s| absolutize(&self.root, s));

        // Phase 1: Collect assets
        let extract::Extraction {
            mut assets,
            directives,
        } = extract::extract(sheet, source.as_deref(), &self.config, &self.printer)?;
        if directives.is_empty() {
            return Ok(Vec::new());
        }

        // Phase 2: Classify and inject placeholders
        group::apply_group_by(&mut assets, &self.group_by, &self.printer);
        inject::inject_tokens(sheet, &assets, &directives, &self.config);
        if assets.is_empty() {
            return Ok(Vec::new());
        }

        // Phase 3: Build and write sheets
        let services = build::Services {
            packer: self.packer.as_ref(),
            assembler: self.assembler.as_deref(),
            cache: &self.cache,
        };
        let groups = build::build_sprites(&assets, &self.config, services, &self.printer)?;
        let sheets = write::save_sprites(groups, &self.config, &self.printer)?;

        // Phase 4: Rewrite references
        map::map_properties(&mut assets, &sheets);
        resolve::update_references(sheet, &assets, &self.config)?;

        Ok(sheets)
    }
}
