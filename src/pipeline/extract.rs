//! Directive extraction.
//!
//! Finds `@lazysprite "dir";` directives, resolves each to a source
//! directory and builds one [`Asset`] per eligible image in it.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::asset::Asset;
use crate::config::Config;
use crate::document::{Node, Raws, Stylesheet};
use crate::error::{Result, SpriteError};
use crate::output::{display_path, Printer};
use crate::paths::{normalize, relative_path};

/// Name of the directive at-rule.
pub const DIRECTIVE: &str = "lazysprite";

/// Separates the directory from an explicit selector block: `"icons#ico"`.
const BLOCK_SEPARATOR: char = '#';

/// One parsed directive.
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    /// Directory argument as written, relative to `imagePath`.
    pub argument: String,
    /// Explicit selector block, overriding the directory name.
    pub block: Option<String>,
    /// Absolute source directory.
    pub source_dir: PathBuf,
    /// Formatting copied from a neighbouring rule.
    pub hints: Raws,
}

impl Directive {
    /// Parse directive params such as `"icons"` or `'icons#ico'`.
    pub fn parse(params: &str, image_dir: &Path) -> Self {
        let value = first_word(params).trim_matches(|c| matches!(c, '\'' | '"' | '(' | ')'));

        let (argument, block) = match value.split_once(BLOCK_SEPARATOR) {
            Some((dir, block)) if !block.is_empty() => (dir, Some(block.to_string())),
            Some((dir, _)) => (dir, None),
            None => (value, None),
        };

        Self {
            argument: argument.to_string(),
            block,
            source_dir: normalize(&image_dir.join(argument)),
            hints: Raws::default(),
        }
    }

    /// Last component of the directory argument.
    pub fn dir_name(&self) -> String {
        Path::new(&self.argument)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Selector block: the explicit one, else the directory name.
    pub fn block_name(&self) -> String {
        self.block.clone().unwrap_or_else(|| self.dir_name())
    }
}

/// Output of the extraction stage.
#[derive(Debug, Default)]
pub struct Extraction {
    pub assets: Vec<Asset>,
    /// Directives in document order.
    pub directives: Vec<Directive>,
}

/// First whitespace-separated word, keeping quoted sections intact.
fn first_word(params: &str) -> &str {
    let params = params.trim();
    let mut quote: Option<char> = None;
    for (i, c) in params.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c.is_whitespace() => return &params[..i],
            None => {}
        }
    }
    params
}

/// Directory sprite URLs are computed from.
///
/// `stylesheetRelative` (or the stylesheet's own directory), extended by
/// where the stylesheet sits below `stylesheetInput`.
fn stylesheet_context(source: Option<&Path>, config: &Config) -> Result<PathBuf> {
    let source_dir = source.and_then(Path::parent);

    match (&config.stylesheet_relative, source_dir) {
        (Some(relative), Some(dir)) => match &config.stylesheet_input {
            Some(input) => Ok(normalize(&relative.join(relative_path(input, dir)))),
            None => Ok(relative.clone()),
        },
        (Some(relative), None) => Ok(relative.clone()),
        (None, Some(dir)) => Ok(dir.to_path_buf()),
        (None, None) => Err(SpriteError::config(
            "Option `stylesheetRelative` is undefined and the stylesheet has no source path",
            "Set `stylesheetRelative` to the directory the generated stylesheet is served from",
        )),
    }
}

/// List eligible image files in `dir`, sorted by name.
fn list_images(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect()
}

/// Scan `sheet` for directives and enumerate their images.
///
/// `source` is the absolute path of the stylesheet, when known.
pub fn extract(
    sheet: &Stylesheet,
    source: Option<&Path>,
    config: &Config,
    printer: &Printer,
) -> Result<Extraction> {
    let mut found: Vec<(String, Raws)> = Vec::new();
    sheet.walk_at_rules(DIRECTIVE, |at, siblings| {
        let hints = siblings
            .iter()
            .find_map(|node| match node {
                Node::Rule(rule) => Some(Raws {
                    before: None,
                    between: rule.raws.between.clone(),
                    after: rule.raws.after.clone(),
                }),
                _ => None,
            })
            .unwrap_or_default();
        found.push((at.params.clone(), hints));
    });

    let mut extraction = Extraction::default();
    if found.is_empty() {
        return Ok(extraction);
    }

    let context = stylesheet_context(source, config)?;
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for (params, hints) in found {
        let mut directive = Directive::parse(&params, config.image_dir());
        directive.hints = hints;

        if !directive.source_dir.is_dir() {
            if config.fail_on_missing {
                return Err(SpriteError::ResourceNotFound {
                    path: directive.source_dir,
                    help: Some("Check the directive argument against `imagePath`".to_string()),
                });
            }
            printer.error(
                "Missing",
                &format!("{} does not exist", display_path(&directive.source_dir)),
            );
            extraction.directives.push(directive);
            continue;
        }

        for path in list_images(&directive.source_dir) {
            if seen.contains(&path) {
                printer.debug("Skipped", &format!("{} (already listed)", display_path(&path)));
                continue;
            }
            let asset = Asset::new(
                path.clone(),
                &directive.source_dir,
                &context,
                directive.block.as_deref(),
                &config.css_separator,
            );
            if let Some(asset) = asset {
                seen.insert(path);
                extraction.assets.push(asset);
            }
        }

        extraction.directives.push(directive);
    }

    Ok(extraction)
}
