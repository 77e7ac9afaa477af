//! Compile configuration (`lazysprite.yaml`).
//!
//! Options use the camelCase names of the stylesheet plugin they mirror, so a
//! config file reads like:
//!
//! ```yaml
//! imagePath: src/slice
//! spritePath: dist/sprites
//! stylesheetInput: src/css
//! stylesheetRelative: dist/css
//! smartUpdate: true
//! retinaInfix: "_"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpriteError};
use crate::paths::absolutize;

/// The conventional name of the config file.
pub const CONFIG_FILENAME: &str = "lazysprite.yaml";

/// Verbosity gate for status output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only failures. Spelled `slient` for compatibility with existing configs.
    #[serde(rename = "slient", alias = "silent")]
    Silent,
    #[default]
    Info,
    Debug,
}

/// Sprite compilation options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Base directory that directive arguments resolve against. Required.
    pub image_path: Option<PathBuf>,

    /// Output directory for generated sprite sheets.
    pub sprite_path: PathBuf,

    /// Root of the source stylesheets.
    pub stylesheet_input: Option<PathBuf>,

    /// Directory the emitted stylesheets live in; sprite URLs are relative to it.
    pub stylesheet_relative: Option<PathBuf>,

    /// Deprecated; rejected by [`Config::resolve`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stylesheet_path: Option<PathBuf>,

    /// Gutter between packed images, in sheet pixels at 1x.
    pub padding: u32,

    /// Prefix for generated selectors.
    pub name_space: String,

    /// Separator between the block and element parts of a selector.
    pub css_separator: String,

    /// Emit width/height for 1x images.
    pub output_dimensions: bool,

    /// Emit a container helper rule per directive.
    #[serde(rename = "outputExtralCSS", alias = "outputExtraCss")]
    pub output_extra_css: bool,

    /// Content-hash file names and stale sheet cleanup.
    pub smart_update: bool,

    /// Joins the group name and retina tag in sheet file names (`@2x` vs `_2x`).
    pub retina_infix: String,

    /// Rewrite hover/active name parts into pseudo-classes.
    pub pseudo_class: bool,

    pub log_level: LogLevel,

    /// Abort the compile when a directive points at a missing directory.
    pub fail_on_missing: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_path: None,
            sprite_path: PathBuf::from("."),
            stylesheet_input: None,
            stylesheet_relative: None,
            stylesheet_path: None,
            padding: 10,
            name_space: String::new(),
            css_separator: "__".to_string(),
            output_dimensions: true,
            output_extra_css: false,
            smart_update: false,
            retina_infix: "@".to_string(),
            pseudo_class: false,
            log_level: LogLevel::Info,
            fail_on_missing: false,
        }
    }
}

impl Config {
    /// Create a config with the required image path set.
    pub fn new(image_path: impl Into<PathBuf>) -> Self {
        Self {
            image_path: Some(image_path.into()),
            ..Default::default()
        }
    }

    /// Load config from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SpriteError::io(path, "Failed to read config", e))?;

        Self::parse(&content)
    }

    /// Parse config from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| SpriteError::Configuration {
            message: format!("Invalid config: {}", e),
            help: Some(format!("Check {} syntax", CONFIG_FILENAME)),
        })
    }

    /// Validate the options and make every path absolute against `root`.
    ///
    /// Performs no filesystem access.
    pub fn resolve(mut self, root: &Path) -> Result<Self> {
        if self.stylesheet_path.is_some() {
            return Err(SpriteError::config(
                "Option `stylesheetPath` was deprecated",
                "Use `stylesheetRelative` to replace it",
            ));
        }

        let image_path = self.image_path.as_deref().ok_or_else(|| {
            SpriteError::config(
                "Option `imagePath` is undefined",
                "Set `imagePath` to the directory your sprite directives refer to",
            )
        })?;
        self.image_path = Some(absolutize(root, image_path));

        if self.retina_infix.is_empty() {
            return Err(SpriteError::config(
                "Option `retinaInfix` is empty",
                "Use \"@\" or \"_\"",
            ));
        }

        self.sprite_path = absolutize(root, &self.sprite_path);
        self.stylesheet_input = self.stylesheet_input.map(|p| absolutize(root, &p));
        self.stylesheet_relative = self.stylesheet_relative.map(|p| absolutize(root, &p));

        Ok(self)
    }

    /// The resolved image directory.
    ///
    /// Only meaningful after [`Config::resolve`]; falls back to `.` otherwise.
    pub fn image_dir(&self) -> &Path {
        self.image_path.as_deref().unwrap_or(Path::new("."))
    }
}
