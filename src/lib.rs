//! lazysprite - Stylesheet-driven sprite sheet generator
//!
//! Expands `@lazysprite "dir";` directives in a stylesheet tree into one rule
//! per image, packs the images into content-hashed sprite sheets and points
//! every rule at its slice of the sheet. Retina variants (`@2x`, `@3x`) get
//! their own sheets and media blocks.

pub mod asset;
pub mod cache;
pub mod config;
pub mod document;
pub mod error;
pub mod hash;
pub mod output;
pub mod paths;
pub mod pipeline;
pub mod render;

pub use asset::{Asset, AssetKind, Coordinates, GroupKey, SheetProperties};
pub use cache::{SpriteArtifact, SpriteCache};
pub use config::{Config, LogLevel, CONFIG_FILENAME};
pub use document::{AtRule, Comment, Declaration, Node, Placeholder, Raws, Rule, Stylesheet};
pub use error::{Result, SpriteError};
pub use hash::ContentHash;
pub use pipeline::{GroupFn, Lazysprite, SheetStatus, SpriteSheet};
pub use render::{PackOutput, Packer, ShelfPacker, VectorAssembler, VectorSheet, VectorSource};
