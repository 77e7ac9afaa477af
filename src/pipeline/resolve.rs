//! Reference resolution.
//!
//! Replaces every placeholder with the background declarations of its asset.

use std::collections::HashMap;
use std::path::Path;

use crate::asset::{name, Asset, Coordinates, SheetProperties};
use crate::config::Config;
use crate::document::{Declaration, Node, Placeholder, Raws, Stylesheet};
use crate::error::{Result, SpriteError};
use crate::paths::{relative_path, to_url};

/// CSS pixel length; zero is written bare.
fn px(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        format!("{}px", value)
    }
}

/// Retina sources must divide evenly by their ratio.
fn check_dimensions(asset: &Asset, coords: &Coordinates) -> Result<()> {
    if asset.ratio > 1 && (coords.width % asset.ratio != 0 || coords.height % asset.ratio != 0) {
        return Err(SpriteError::DimensionConstraint {
            path: asset.path.clone(),
            ratio: asset.ratio,
        });
    }
    Ok(())
}

fn geometry(asset: &Asset) -> Result<(Coordinates, SheetProperties, &Path)> {
    match (asset.coordinates, asset.sheet, asset.sheet_path.as_deref()) {
        (Some(coords), Some(sheet), Some(path)) => Ok((coords, sheet, path)),
        _ => Err(SpriteError::packing(format!(
            "No sheet geometry for {}",
            asset.path.display()
        ))),
    }
}

/// Declarations replacing the placeholder of `asset`.
pub fn declarations(asset: &Asset, placeholder: &Placeholder, config: &Config) -> Result<Vec<Node>> {
    let (coords, sheet, sheet_path) = geometry(asset)?;
    check_dimensions(asset, &coords)?;

    let ratio = f64::from(asset.ratio);
    let url = to_url(&relative_path(&asset.stylesheet_relative, sheet_path));
    let position = format!(
        "{} {}",
        px(-f64::from(coords.x) / ratio),
        px(-f64::from(coords.y) / ratio)
    );

    let mut decls = vec![
        ("background-image", format!("url({})", url)),
        ("background-position", position),
    ];
    if asset.ratio > 1 {
        decls.push((
            "background-size",
            format!(
                "{}px {}px",
                f64::from(sheet.width) / ratio,
                f64::from(sheet.height) / ratio
            ),
        ));
    }
    if config.output_dimensions && asset.ratio == 1 {
        decls.push(("width", format!("{}px", coords.width)));
        decls.push(("height", format!("{}px", coords.height)));
    }

    Ok(decls
        .into_iter()
        .map(|(prop, value)| {
            Node::Declaration(Declaration {
                prop: prop.to_string(),
                value,
                raws: Raws {
                    before: placeholder.raws.before.clone(),
                    ..Raws::default()
                },
            })
        })
        .collect())
}

/// Resolve every placeholder in `sheet` against `assets`.
///
/// Placeholders without a matching asset are left in place.
pub fn update_references(sheet: &mut Stylesheet, assets: &[Asset], config: &Config) -> Result<()> {
    let index: HashMap<&Path, &Asset> = assets.iter().map(|a| (a.path.as_path(), a)).collect();

    sheet.walk_rules_mut(|rule| {
        let mut nodes = Vec::with_capacity(rule.nodes.len() + 4);
        for node in std::mem::take(&mut rule.nodes) {
            let Node::Placeholder(placeholder) = node else {
                nodes.push(node);
                continue;
            };
            match index.get(placeholder.path.as_path()) {
                Some(asset) => {
                    nodes.extend(declarations(asset, &placeholder, config)?);
                    if config.pseudo_class {
                        rule.selector = name::pseudo_class(&rule.selector, &asset.name);
                    }
                }
                None => nodes.push(Node::Placeholder(placeholder)),
            }
        }
        rule.nodes = nodes;
        Ok(())
    })
}
