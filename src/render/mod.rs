//! Sheet producers.
//!
//! The pipeline only talks to the [`Packer`] and [`VectorAssembler`] traits;
//! [`ShelfPacker`] is the default raster implementation.

mod shelf;

use std::collections::HashMap;
use std::path::PathBuf;

use crate::asset::{Coordinates, SheetProperties};
use crate::error::Result;

pub use shelf::ShelfPacker;

/// A packed raster sheet.
#[derive(Debug, Clone)]
pub struct PackOutput {
    /// Encoded sheet image.
    pub image: Vec<u8>,
    /// Placement of every input, keyed by its absolute path.
    pub coordinates: HashMap<PathBuf, Coordinates>,
    pub properties: SheetProperties,
}

/// Arranges raster images into one sheet.
pub trait Packer: Send + Sync {
    /// Pack `paths` with `padding` pixels between neighbours.
    fn pack(&self, paths: &[PathBuf], padding: u32) -> Result<PackOutput>;
}

/// One vector source handed to a [`VectorAssembler`].
#[derive(Debug, Clone)]
pub struct VectorSource {
    /// Opaque shape identifier; echoed back in [`VectorSheet::coordinates`].
    pub id: String,
    pub path: PathBuf,
    pub content: Vec<u8>,
}

/// A composed vector sheet.
#[derive(Debug, Clone)]
pub struct VectorSheet {
    pub image: Vec<u8>,
    /// Placement of every shape, keyed by [`VectorSource::id`].
    pub coordinates: HashMap<String, Coordinates>,
    pub properties: SheetProperties,
}

/// Composes vector shapes into one document.
pub trait VectorAssembler: Send + Sync {
    fn assemble(&self, sources: &[VectorSource]) -> Result<VectorSheet>;
}
