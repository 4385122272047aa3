//! Editor configuration.
//!
//! Handles loading, validating, and layering `imgpress.toml`. Settings are
//! resolved in three layers, each overriding the one before:
//!
//! ```text
//! stock defaults  →  imgpress.toml (or --config FILE)  →  command-line flags
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [output]
//! format = "webp"                       # webp | jpeg | png
//! quality = 0.8                         # 0.0-1.0, lossy formats only
//! scale_percent = 100                   # 10-100
//! archive_name = "compressed-images.zip"
//! rename_extensions = false             # photo.jpg -> photo.webp inside the archive
//!
//! [effects]
//! filter = "none"                       # none | grayscale | sepia
//! watermark = ""                        # empty = no watermark
//!
//! [copyright]
//! text = ""                             # empty = no caption
//! position = "bottom-right"             # top-left | top-right | bottom-left | bottom-right
//!
//! # [crop] is off unless present. Give either width + height or an aspect preset.
//! [crop]
//! x = 0
//! y = 0
//! width = 800
//! height = 600
//! # aspect = "16:9"                    # 1:1 | 4:3 | 16:9 | 3:2 | 2:3
//! anchor = "center"                     # center | top-left | top-right | bottom-left | bottom-right
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::archive::DEFAULT_ARCHIVE_NAME;
use crate::imaging::{
    Anchor, AspectRatio, Copyright, Corner, CropRegion, CropRequest, CropSpec, FilterKind,
    OutputFormat, Quality, ScalePercent, TransformOptions,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "imgpress.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Editor configuration loaded from `imgpress.toml`.
///
/// All fields have defaults matching the editor's initial state. Config files
/// need only specify the values they want to override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    pub output: OutputConfig,
    pub effects: EffectsConfig,
    pub copyright: CopyrightConfig,
    /// Absent means no crop.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<CropConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub quality: f32,
    pub scale_percent: u32,
    pub archive_name: String,
    pub rename_extensions: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            quality: Quality::default().value(),
            scale_percent: ScalePercent::default().value(),
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
            rename_extensions: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EffectsConfig {
    pub filter: FilterKind,
    pub watermark: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CopyrightConfig {
    pub text: String,
    pub position: Corner,
}

/// Crop settings. At most one of `width`+`height` or `aspect` may be set;
/// with neither, the table only carries the anchor and nothing is cropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CropConfig {
    pub x: u32,
    pub y: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect: Option<AspectRatio>,
    pub anchor: Anchor,
}

impl CropConfig {
    fn spec(&self) -> Result<Option<CropSpec>, ConfigError> {
        match (self.width, self.height, self.aspect) {
            (None, None, None) => Ok(None),
            (Some(w), Some(h), None) if w > 0 && h > 0 => {
                Ok(Some(CropSpec::Region(CropRegion::new(self.x, self.y, w, h))))
            }
            (None, None, Some(aspect)) => Ok(Some(CropSpec::Aspect(aspect))),
            (_, _, Some(_)) => Err(ConfigError::Validation(
                "crop: set either aspect or width/height, not both".into(),
            )),
            _ => Err(ConfigError::Validation(
                "crop: width and height must both be set and non-zero".into(),
            )),
        }
    }
}

impl EditorConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let q = self.output.quality;
        if !(0.0..=1.0).contains(&q) {
            return Err(ConfigError::Validation(
                "output.quality must be between 0.0 and 1.0".into(),
            ));
        }
        if !(ScalePercent::MIN..=ScalePercent::MAX).contains(&self.output.scale_percent) {
            return Err(ConfigError::Validation(format!(
                "output.scale_percent must be {}-{}",
                ScalePercent::MIN,
                ScalePercent::MAX
            )));
        }
        if self.output.archive_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output.archive_name must not be empty".into(),
            ));
        }
        if let Some(crop) = &self.crop {
            crop.spec()?;
        }
        Ok(())
    }

    /// Build the immutable per-run options bundle.
    pub fn transform_options(&self) -> Result<TransformOptions, ConfigError> {
        let crop = match &self.crop {
            Some(c) => c.spec()?.map(|spec| CropRequest {
                spec,
                anchor: c.anchor,
            }),
            None => None,
        };
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());

        Ok(TransformOptions {
            scale: ScalePercent::new(self.output.scale_percent),
            crop,
            filter: self.effects.filter,
            watermark: non_empty(&self.effects.watermark),
            copyright: non_empty(&self.copyright.text).map(|text| Copyright {
                text,
                corner: self.copyright.position,
            }),
            format: self.output.format,
            quality: Quality::new(self.output.quality),
        })
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// Parsed from [`stock_config_toml`], so the documented file and the defaults
/// cannot drift apart.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::from_str(stock_config_toml())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Apply command-line overrides on top of a merged config.
///
/// Like [`merge_toml`], except that a `[crop]` table in the overrides that
/// picks a crop shape (`width`/`height` or `aspect`) replaces the shape keys
/// from earlier layers instead of mixing with them.
pub fn apply_overrides(base: toml::Value, overrides: toml::Value) -> toml::Value {
    let picks_shape = overrides
        .get("crop")
        .and_then(toml::Value::as_table)
        .is_some_and(|t| t.contains_key("aspect") || t.contains_key("width"));

    let base = match base {
        toml::Value::Table(mut table) if picks_shape => {
            if let Some(toml::Value::Table(crop)) = table.get_mut("crop") {
                for key in ["x", "y", "width", "height", "aspect"] {
                    crop.remove(key);
                }
            }
            toml::Value::Table(table)
        }
        other => other,
    };
    merge_toml(base, overrides)
}

/// Load a config file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load `imgpress.toml` from `dir` if it exists.
///
/// Returns `Ok(None)` if there is no such file.
pub fn find_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }
    load_raw_config(&path).map(Some)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<EditorConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: EditorConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Resolve the full config: stock defaults, then `file` (if any), then `overrides`.
pub fn load_config(
    file: Option<toml::Value>,
    overrides: Option<toml::Value>,
) -> Result<EditorConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let base = match file {
        Some(f) => merge_toml(base, f),
        None => base,
    };
    let merged = match overrides {
        Some(o) => apply_overrides(base, o),
        None => base,
    };
    resolve_config(merged, None)
}

/// Returns a fully-commented stock `imgpress.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# imgpress configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# imgpress reads ./imgpress.toml, or the file given with --config.
# Command-line flags override anything set here.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Output encoding
# ---------------------------------------------------------------------------
[output]
# Encoder for every output: "webp", "jpeg" or "png".
format = "webp"

# Lossy quality from 0.0 (smallest) to 1.0 (best). Ignored for PNG.
quality = 0.8

# Output size as a percentage of each source's natural size (10-100).
scale_percent = 100

# File name for the batch archive.
archive_name = "compressed-images.zip"

# Swap each entry's extension for the output format's inside the archive
# (photo.jpg -> photo.webp). Off keeps the original names.
rename_extensions = false

# ---------------------------------------------------------------------------
# Effects
# ---------------------------------------------------------------------------
[effects]
# Color filter: "none", "grayscale" or "sepia".
filter = "none"

# Text tiled diagonally across the image. Empty disables the watermark.
watermark = ""

# ---------------------------------------------------------------------------
# Copyright caption
# ---------------------------------------------------------------------------
[copyright]
# Caption text; rendered as "(c) <text>". Empty disables the caption.
text = ""

# Corner: "top-left", "top-right", "bottom-left" or "bottom-right".
position = "bottom-right"

# ---------------------------------------------------------------------------
# Crop (off unless this table is present)
# ---------------------------------------------------------------------------
# Coordinates are in pixels of the resized image and are measured from the
# anchor. With anchor = "center", x and y are ignored.
# [crop]
# x = 0
# y = 0
# width = 800
# height = 600
# anchor = "center"
#
# Or derive the rectangle from an aspect ratio preset
# (1:1, 4:3, 16:9, 3:2, 2:3) instead of width/height:
# aspect = "16:9"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(toml: &str) -> toml::Value {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn default_config_matches_editor_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.output.format, OutputFormat::Webp);
        assert_eq!(config.output.quality, 0.8);
        assert_eq!(config.output.scale_percent, 100);
        assert_eq!(config.output.archive_name, "compressed-images.zip");
        assert_eq!(config.effects.filter, FilterKind::None);
        assert_eq!(config.copyright.position, Corner::BottomRight);
        assert!(config.crop.is_none());
    }

    #[test]
    fn stock_toml_parses_to_defaults() {
        let config = resolve_config(stock_defaults_value().unwrap(), None).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn parse_partial_config() {
        let config: EditorConfig = toml::from_str(
            r#"
[effects]
filter = "sepia"
"#,
        )
        .unwrap();
        assert_eq!(config.effects.filter, FilterKind::Sepia);
        assert_eq!(config.output.format, OutputFormat::Webp);
        assert_eq!(config.copyright.position, Corner::BottomRight);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<EditorConfig, _> = toml::from_str(
            r#"
[output]
qualty = 0.5
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn jpg_alias_is_accepted() {
        let config: EditorConfig = toml::from_str("[output]\nformat = \"jpg\"\n").unwrap();
        assert_eq!(config.output.format, OutputFormat::Jpeg);
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn quality_out_of_range_fails_validation() {
        let mut config = EditorConfig::default();
        config.output.quality = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn scale_out_of_range_fails_validation() {
        let mut config = EditorConfig::default();
        config.output.scale_percent = 5;
        assert!(config.validate().is_err());
        config.output.scale_percent = 101;
        assert!(config.validate().is_err());
        config.output.scale_percent = 10;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn crop_needs_exactly_one_shape() {
        let mut config = EditorConfig::default();
        config.crop = Some(CropConfig {
            width: Some(10),
            ..Default::default()
        });
        assert!(config.validate().is_err());

        config.crop = Some(CropConfig {
            width: Some(10),
            height: Some(10),
            aspect: Some(AspectRatio::new(1, 1)),
            ..Default::default()
        });
        assert!(config.validate().is_err());

        config.crop = Some(CropConfig {
            aspect: Some(AspectRatio::new(16, 9)),
            ..Default::default()
        });
        assert!(config.validate().is_ok());
    }

    // =========================================================================
    // Transform options
    // =========================================================================

    #[test]
    fn default_config_builds_default_options() {
        let options = EditorConfig::default().transform_options().unwrap();
        assert_eq!(options, TransformOptions::default());
    }

    #[test]
    fn config_maps_onto_transform_options() {
        let config: EditorConfig = toml::from_str(
            r#"
[output]
format = "png"
quality = 0.5
scale_percent = 40

[effects]
filter = "grayscale"
watermark = "PROOF"

[copyright]
text = "Jo Bloggs"
position = "top-left"

[crop]
x = 5
y = 6
width = 70
height = 80
anchor = "bottom-right"
"#,
        )
        .unwrap();
        let options = config.transform_options().unwrap();
        assert_eq!(options.format, OutputFormat::Png);
        assert_eq!(options.quality.value(), 0.5);
        assert_eq!(options.scale.value(), 40);
        assert_eq!(options.filter, FilterKind::Grayscale);
        assert_eq!(options.watermark_text(), Some("PROOF"));
        let caption = options.copyright_caption().unwrap();
        assert_eq!(caption.text, "Jo Bloggs");
        assert_eq!(caption.corner, Corner::TopLeft);
        assert_eq!(
            options.crop,
            Some(CropRequest {
                spec: CropSpec::Region(CropRegion::new(5, 6, 70, 80)),
                anchor: Anchor::BottomRight,
            })
        );
    }

    #[test]
    fn aspect_crop_config_parses_preset() {
        let config: EditorConfig = toml::from_str("[crop]\naspect = \"4:3\"\n").unwrap();
        let options = config.transform_options().unwrap();
        assert_eq!(
            options.crop,
            Some(CropRequest {
                spec: CropSpec::Aspect(AspectRatio::new(4, 3)),
                anchor: Anchor::Center,
            })
        );
    }

    // =========================================================================
    // Layering
    // =========================================================================

    #[test]
    fn merge_toml_overrides_leaf_and_keeps_siblings() {
        let base = parse("[output]\nformat = \"webp\"\nquality = 0.8\n");
        let overlay = parse("[output]\nquality = 0.3\n");
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["output"]["format"].as_str(), Some("webp"));
        assert_eq!(merged["output"]["quality"].as_float(), Some(0.3));
    }

    #[test]
    fn load_config_layers_file_then_overrides() {
        let file = parse("[output]\nformat = \"jpeg\"\nquality = 0.4\n");
        let overrides = parse("[output]\nquality = 0.9\n");
        let config = load_config(Some(file), Some(overrides)).unwrap();
        assert_eq!(config.output.format, OutputFormat::Jpeg);
        assert_eq!(config.output.quality, 0.9);
        assert_eq!(config.effects.filter, FilterKind::None);
    }

    #[test]
    fn override_crop_shape_replaces_file_shape() {
        let file = parse("[crop]\naspect = \"16:9\"\nanchor = \"top-left\"\n");
        let overrides = parse("[crop]\nx = 1\ny = 2\nwidth = 30\nheight = 40\n");
        let config = load_config(Some(file), Some(overrides)).unwrap();
        let crop = config.crop.unwrap();
        assert_eq!(crop.aspect, None);
        assert_eq!(crop.width, Some(30));
        assert_eq!(crop.anchor, Anchor::TopLeft);
    }

    #[test]
    fn override_anchor_only_keeps_file_shape() {
        let file = parse("[crop]\nwidth = 30\nheight = 40\n");
        let overrides = parse("[crop]\nanchor = \"bottom-left\"\n");
        let config = load_config(Some(file), Some(overrides)).unwrap();
        let crop = config.crop.unwrap();
        assert_eq!(crop.width, Some(30));
        assert_eq!(crop.anchor, Anchor::BottomLeft);
    }

    #[test]
    fn anchor_without_crop_shape_crops_nothing() {
        let overrides = parse("[crop]\nanchor = \"top-left\"\n");
        let config = load_config(None, Some(overrides)).unwrap();
        assert_eq!(config.crop.as_ref().unwrap().anchor, Anchor::TopLeft);
        assert_eq!(config.transform_options().unwrap().crop, None);
    }

    #[test]
    fn invalid_override_fails_validation() {
        let overrides = parse("[output]\nscale_percent = 0\n");
        assert!(matches!(
            load_config(None, Some(overrides)),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn find_config_returns_none_when_missing() {
        let tmp = TempDir::new().unwrap();
        assert!(find_config(tmp.path()).unwrap().is_none());
    }

    #[test]
    fn find_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            "[effects]\nwatermark = \"mine\"\n",
        )
        .unwrap();
        let raw = find_config(tmp.path()).unwrap();
        let config = load_config(raw, None).unwrap();
        assert_eq!(config.effects.watermark, "mine");
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "[output\nformat = ").unwrap();
        assert!(matches!(
            load_raw_config(&path),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn missing_explicit_file_is_io_error() {
        let result = load_raw_config(Path::new("/nonexistent/imgpress.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
