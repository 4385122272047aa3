//! Parameter types for image operations.
//!
//! These types describe *what* the pipeline should do to one image, never
//! *how*. A [`TransformOptions`] bundle is built once per run (from config and
//! command-line flags) and handed by reference to
//! [`process`](crate::process::process); nothing in it changes while a run is
//! in flight.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (0.0–1.0, default 0.8). Clamped on construction.
//! - [`ScalePercent`]: Output scale (10–100, default 100). Clamped on construction.
//! - [`OutputFormat`]: Target encoding: WebP, JPEG or PNG.
//! - [`FilterKind`]: Per-pixel color filter: none, grayscale, sepia.
//! - [`Anchor`]: Reference point used to reinterpret a crop rectangle.
//! - [`Corner`]: Placement of the copyright caption.
//! - [`CropRegion`] / [`AspectRatio`] / [`CropSpec`] / [`CropRequest`]: What to crop.
//! - [`TransformOptions`]: The full per-run bundle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Quality setting for lossy image encoding (0.0–1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quality(f32);

impl Quality {
    /// Clamp into `0.0..=1.0`. NaN falls back to the default.
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Quality on the 1–100 scale the `image` encoders expect.
    pub fn percent(self) -> u8 {
        ((self.0 * 100.0).round() as u8).clamp(1, 100)
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(0.8)
    }
}

/// Output size as a percentage of the source's natural dimensions (10–100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalePercent(u32);

impl ScalePercent {
    pub const MIN: u32 = 10;
    pub const MAX: u32 = 100;

    pub fn new(value: u32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn factor(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Default for ScalePercent {
    fn default() -> Self {
        Self(100)
    }
}

/// Encoded output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Webp,
    #[serde(alias = "jpg")]
    Jpeg,
    Png,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Webp => "webp",
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Webp => "image/webp",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Webp => "webp",
            Self::Jpeg => "jpeg",
            Self::Png => "png",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "webp" => Ok(Self::Webp),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            other => Err(format!("unsupported output format: {other}")),
        }
    }
}

/// Per-pixel color filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    #[default]
    None,
    Grayscale,
    Sepia,
}

impl FromStr for FilterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "grayscale" | "greyscale" => Ok(Self::Grayscale),
            "sepia" => Ok(Self::Sepia),
            other => Err(format!("unknown filter: {other}")),
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Grayscale => "grayscale",
            Self::Sepia => "sepia",
        })
    }
}

/// Reference point a crop rectangle's coordinates are measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    #[default]
    Center,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl FromStr for Anchor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "center" => Ok(Self::Center),
            "top-left" => Ok(Self::TopLeft),
            "top-right" => Ok(Self::TopRight),
            "bottom-left" => Ok(Self::BottomLeft),
            "bottom-right" => Ok(Self::BottomRight),
            other => Err(format!("unknown anchor: {other}")),
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Center => "center",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        })
    }
}

/// Corner of the raster the copyright caption is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

impl FromStr for Corner {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top-left" => Ok(Self::TopLeft),
            "top-right" => Ok(Self::TopRight),
            "bottom-left" => Ok(Self::BottomLeft),
            "bottom-right" => Ok(Self::BottomRight),
            other => Err(format!("unknown corner: {other}")),
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        })
    }
}

/// A crop rectangle in pixels of the resized raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    /// Width and height are raised to at least 1 so the output raster is never empty.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width: width.max(1),
            height: height.max(1),
        }
    }
}

impl FromStr for CropRegion {
    type Err = String;

    /// Parse `X,Y,W,H`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(format!("expected X,Y,WIDTH,HEIGHT, got '{s}'"));
        }
        let mut values = [0u32; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| format!("invalid crop component '{part}'"))?;
        }
        if values[2] == 0 || values[3] == 0 {
            return Err("crop width and height must be non-zero".into());
        }
        Ok(Self::new(values[0], values[1], values[2], values[3]))
    }
}

/// Width:height ratio used to derive a crop when no explicit region is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    /// Named presets offered by the editor.
    pub const PRESETS: &'static [(&'static str, AspectRatio)] = &[
        ("1:1", AspectRatio::new(1, 1)),
        ("4:3", AspectRatio::new(4, 3)),
        ("16:9", AspectRatio::new(16, 9)),
        ("3:2", AspectRatio::new(3, 2)),
        ("2:3", AspectRatio::new(2, 3)),
    ];

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn ratio(self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| format!("expected W:H aspect ratio, got '{s}'"))?;
        let width: u32 = w
            .trim()
            .parse()
            .map_err(|_| format!("invalid aspect width '{w}'"))?;
        let height: u32 = h
            .trim()
            .parse()
            .map_err(|_| format!("invalid aspect height '{h}'"))?;
        if width == 0 || height == 0 {
            return Err("aspect ratio values must be non-zero".into());
        }
        Ok(Self::new(width, height))
    }
}

impl TryFrom<String> for AspectRatio {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AspectRatio> for String {
    fn from(value: AspectRatio) -> Self {
        format!("{}:{}", value.width, value.height)
    }
}

/// Either an explicit rectangle or a ratio resolved against the resized raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropSpec {
    Region(CropRegion),
    Aspect(AspectRatio),
}

/// A completed crop selection plus the anchor it is interpreted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRequest {
    pub spec: CropSpec,
    pub anchor: Anchor,
}

/// Copyright caption text and its corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Copyright {
    pub text: String,
    pub corner: Corner,
}

/// Everything one pipeline run needs to know, fixed for the duration of the run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransformOptions {
    pub scale: ScalePercent,
    pub crop: Option<CropRequest>,
    pub filter: FilterKind,
    /// Tiled watermark text. `None` or empty disables the pass.
    pub watermark: Option<String>,
    /// Copyright caption. `None` or empty text disables the pass.
    pub copyright: Option<Copyright>,
    pub format: OutputFormat,
    pub quality: Quality,
}

impl TransformOptions {
    /// Watermark text if the pass should run.
    pub fn watermark_text(&self) -> Option<&str> {
        self.watermark.as_deref().filter(|t| !t.is_empty())
    }

    /// Copyright caption if the pass should run.
    pub fn copyright_caption(&self) -> Option<&Copyright> {
        self.copyright.as_ref().filter(|c| !c.text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(-0.5).value(), 0.0);
        assert_eq!(Quality::new(0.5).value(), 0.5);
        assert_eq!(Quality::new(7.0).value(), 1.0);
    }

    #[test]
    fn quality_nan_uses_default() {
        assert_eq!(Quality::new(f32::NAN), Quality::default());
    }

    #[test]
    fn quality_default_is_point_eight() {
        assert_eq!(Quality::default().value(), 0.8);
        assert_eq!(Quality::default().percent(), 80);
    }

    #[test]
    fn quality_percent_never_zero() {
        assert_eq!(Quality::new(0.0).percent(), 1);
        assert_eq!(Quality::new(1.0).percent(), 100);
    }

    #[test]
    fn scale_clamps_to_valid_range() {
        assert_eq!(ScalePercent::new(0).value(), 10);
        assert_eq!(ScalePercent::new(55).value(), 55);
        assert_eq!(ScalePercent::new(400).value(), 100);
        assert_eq!(ScalePercent::default().value(), 100);
    }

    #[test]
    fn output_format_parses_aliases() {
        assert_eq!("JPG".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert_eq!("jpeg".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert_eq!("webp".parse::<OutputFormat>().unwrap(), OutputFormat::Webp);
        assert!("tiff".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn anchor_and_corner_parse_kebab_case() {
        assert_eq!("bottom-right".parse::<Anchor>().unwrap(), Anchor::BottomRight);
        assert_eq!("center".parse::<Anchor>().unwrap(), Anchor::Center);
        assert_eq!("top-left".parse::<Corner>().unwrap(), Corner::TopLeft);
        assert!("center".parse::<Corner>().is_err());
    }

    #[test]
    fn crop_region_parses_four_components() {
        let region: CropRegion = "10, 20,30,40".parse().unwrap();
        assert_eq!(region, CropRegion::new(10, 20, 30, 40));
    }

    #[test]
    fn crop_region_rejects_bad_input() {
        assert!("1,2,3".parse::<CropRegion>().is_err());
        assert!("1,2,0,4".parse::<CropRegion>().is_err());
        assert!("a,2,3,4".parse::<CropRegion>().is_err());
    }

    #[test]
    fn crop_region_new_raises_zero_extent() {
        let region = CropRegion::new(0, 0, 0, 0);
        assert_eq!((region.width, region.height), (1, 1));
    }

    #[test]
    fn aspect_ratio_round_trips_through_string() {
        let ratio: AspectRatio = "16:9".parse().unwrap();
        assert_eq!(ratio, AspectRatio::new(16, 9));
        assert_eq!(String::from(ratio), "16:9");
        assert!("16x9".parse::<AspectRatio>().is_err());
        assert!("0:9".parse::<AspectRatio>().is_err());
    }

    #[test]
    fn empty_overlay_text_disables_passes() {
        let options = TransformOptions {
            watermark: Some(String::new()),
            copyright: Some(Copyright {
                text: String::new(),
                corner: Corner::TopLeft,
            }),
            ..TransformOptions::default()
        };
        assert!(options.watermark_text().is_none());
        assert!(options.copyright_caption().is_none());
    }
}
