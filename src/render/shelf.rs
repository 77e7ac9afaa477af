//! Shelf (row-based) sheet packer.
//!
//! Places images tallest first, left to right, starting a new row when the
//! current one is full, then composites them into a PNG.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::PathBuf;

use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::asset::{Coordinates, SheetProperties};
use crate::error::{Result, SpriteError};

use super::{PackOutput, Packer};

/// Default raster packer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShelfPacker;

impl ShelfPacker {
    pub fn new() -> Self {
        Self
    }
}

/// Compute shelf placements for `sizes`, returning positions in input order
/// plus the tight sheet size.
fn layout(sizes: &[(u32, u32)], padding: u32) -> (Vec<(u32, u32)>, SheetProperties) {
    // Tallest first; ties keep input order.
    let mut indices: Vec<usize> = (0..sizes.len()).collect();
    indices.sort_by(|&a, &b| sizes[b].1.cmp(&sizes[a].1).then_with(|| a.cmp(&b)));

    let max_w = sizes.iter().map(|s| s.0).max().unwrap_or(0);
    let total_area: u64 = sizes
        .iter()
        .map(|&(w, h)| u64::from(w + padding) * u64::from(h + padding))
        .sum();
    let sqrt_area = (total_area as f64).sqrt().ceil() as u32;
    let row_limit = max_w.max(sqrt_area);

    let mut placements = vec![(0, 0); sizes.len()];
    let mut cursor_x: u32 = 0;
    let mut cursor_y: u32 = 0;
    let mut row_height: u32 = 0;
    let mut used_width: u32 = 0;

    for &idx in &indices {
        let (w, h) = sizes[idx];

        if cursor_x + w > row_limit && cursor_x > 0 {
            cursor_y += row_height + padding;
            cursor_x = 0;
            row_height = 0;
        }

        placements[idx] = (cursor_x, cursor_y);
        used_width = used_width.max(cursor_x + w);
        row_height = row_height.max(h);
        cursor_x += w + padding;
    }

    let properties = SheetProperties {
        width: used_width,
        height: cursor_y + row_height,
    };
    (placements, properties)
}

impl Packer for ShelfPacker {
    fn pack(&self, paths: &[PathBuf], padding: u32) -> Result<PackOutput> {
        if paths.is_empty() {
            return Err(SpriteError::packing("Nothing to pack"));
        }

        let images: Vec<RgbaImage> = paths
            .iter()
            .map(|path| {
                image::open(path)
                    .map(|img| img.to_rgba8())
                    .map_err(|e| SpriteError::Packing {
                        message: format!("Failed to decode {}: {}", path.display(), e),
                        help: None,
                    })
            })
            .collect::<Result<_>>()?;

        let sizes: Vec<(u32, u32)> = images.iter().map(|img| img.dimensions()).collect();
        let (placements, properties) = layout(&sizes, padding);

        let mut canvas = RgbaImage::new(properties.width, properties.height);
        let mut coordinates = HashMap::with_capacity(paths.len());

        for ((path, img), &(x, y)) in paths.iter().zip(&images).zip(&placements) {
            image::imageops::replace(&mut canvas, img, i64::from(x), i64::from(y));
            coordinates.insert(
                path.clone(),
                Coordinates {
                    x,
                    y,
                    width: img.width(),
                    height: img.height(),
                },
            );
        }

        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(canvas)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| SpriteError::packing(format!("Failed to encode sheet: {}", e)))?;

        Ok(PackOutput {
            image: bytes,
            coordinates,
            properties,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::path::Path;
    use tempfile::tempdir;

    fn write_png(dir: &Path, name: &str, w: u32, h: u32, colour: [u8; 4]) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(w, h, Rgba(colour)).save(&path).unwrap();
        path
    }

    fn overlaps(a: &Coordinates, b: &Coordinates) -> bool {
        !(b.x >= a.x + a.width
            || a.x >= b.x + b.width
            || b.y >= a.y + a.height
            || a.y >= b.y + b.height)
    }

    #[test]
    fn test_layout_single() {
        let (placements, props) = layout(&[(40, 40)], 10);
        assert_eq!(placements, vec![(0, 0)]);
        assert_eq!(props, SheetProperties { width: 40, height: 40 });
    }

    #[test]
    fn test_layout_tallest_first() {
        let (placements, _) = layout(&[(2, 2), (2, 8)], 0);
        assert_eq!(placements[1], (0, 0));
    }

    #[test]
    fn test_layout_padding_separates_rows() {
        let (placements, props) = layout(&[(4, 4), (4, 4), (4, 4), (4, 4)], 2);
        for i in 0..placements.len() {
            for j in (i + 1)..placements.len() {
                let (ax, ay) = placements[i];
                let (bx, by) = placements[j];
                let apart = ax.abs_diff(bx) >= 6 || ay.abs_diff(by) >= 6;
                assert!(apart, "{:?} and {:?} closer than padding", placements[i], placements[j]);
            }
        }
        assert!(props.width >= 4 && props.height >= 4);
    }

    #[test]
    fn test_pack_writes_decodable_sheet() {
        let dir = tempdir().unwrap();
        let red = write_png(dir.path(), "red.png", 4, 6, [255, 0, 0, 255]);
        let blue = write_png(dir.path(), "blue.png", 3, 3, [0, 0, 255, 255]);

        let out = ShelfPacker::new().pack(&[red.clone(), blue.clone()], 1).unwrap();

        let sheet = image::load_from_memory(&out.image).unwrap().to_rgba8();
        assert_eq!(sheet.width(), out.properties.width);
        assert_eq!(sheet.height(), out.properties.height);

        let r = out.coordinates[&red];
        let b = out.coordinates[&blue];
        assert_eq!((r.width, r.height), (4, 6));
        assert_eq!((b.width, b.height), (3, 3));
        assert!(!overlaps(&r, &b));
        assert_eq!(sheet.get_pixel(r.x, r.y).0, [255, 0, 0, 255]);
        assert_eq!(sheet.get_pixel(b.x, b.y).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_pack_rejects_undecodable_input() {
        let dir = tempdir().unwrap();
        let bogus = dir.path().join("bogus.png");
        std::fs::write(&bogus, b"nope").unwrap();

        let err = ShelfPacker::new().pack(&[bogus], 0).unwrap_err();
        assert!(matches!(err, SpriteError::Packing { .. }));
    }

    #[test]
    fn test_pack_empty_is_error() {
        assert!(ShelfPacker::new().pack(&[], 0).is_err());
    }
}
