//! Pixel sources.
//!
//! Decoding and rasterization are left to the `image` and `fontdue` crates;
//! this module turns their output into [`PixelGrid`]s.

use log::{debug, info};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::bitmap::ImageConfig;
use crate::error::{Error, Result};
use crate::grid::{PixelGrid, DEFAULT_THRESHOLD};

/// What to do with sources that are not already grayscale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorPolicy {
    /// Convert any color mode to luminance before thresholding.
    Permissive,
    /// Reject anything that is not grayscale or 1-bit.
    GrayscaleOnly,
}

impl Default for ColorPolicy {
    fn default() -> Self {
        Self::Permissive
    }
}

/// Decode an image file into a pixel grid.
///
/// Pixels at or below the configured luminance threshold are lit.
pub fn load_image(path: &Path, config: &ImageConfig) -> Result<PixelGrid> {
    info!("Loading image {}", path.display());

    let image = image::open(path).map_err(|source| Error::UnreadableImage {
        path: path.to_path_buf(),
        source,
    })?;

    let color = image.color();
    if config.color_policy == ColorPolicy::GrayscaleOnly && color.has_color() {
        return Err(Error::UnsupportedColorMode(color));
    }

    let luma = image.to_luma8();
    let (width, height) = luma.dimensions();
    debug!("decoded {:?} image {}x{}", color, width, height);
    PixelGrid::from_luma(
        width as usize,
        height as usize,
        luma.as_raw(),
        config.threshold,
    )
}

/// Font-wide vertical metrics in whole pixels.
///
/// Both values are distances from the baseline, so `descent` is positive for
/// fonts that reach below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineMetrics {
    pub ascent: i32,
    pub descent: i32,
}

/// One rasterized glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterGlyph {
    /// Coverage mask cropped to the glyph's ink. Empty for blank glyphs.
    pub mask: PixelGrid,
    /// Column of the mask's left edge relative to the pen position.
    pub x_off: i32,
    /// Rows between the font's ascent line and the mask's top edge.
    pub raw_oy: usize,
    /// Horizontal pen advance in pixels.
    pub advance: f32,
}

impl RasterGlyph {
    /// A glyph with no ink, such as a space.
    pub fn blank(advance: f32) -> Self {
        RasterGlyph {
            mask: PixelGrid::empty(),
            x_off: 0,
            raw_oy: 0,
            advance,
        }
    }
}

/// Anything that can produce glyph masks for character codes.
pub trait GlyphSource {
    /// Size the glyphs are rendered at, in pixels per em.
    fn size(&self) -> u32;

    fn line_metrics(&self) -> LineMetrics;

    /// Rasterize one character code.
    ///
    /// Returns [`Error::GlyphRasterGap`] when the font has nothing for `code`.
    fn rasterize(&self, code: u32) -> Result<RasterGlyph>;
}

/// A TrueType/OpenType font rendered with `fontdue`.
pub struct FontSource {
    font: fontdue::Font,
    size: u32,
    metrics: LineMetrics,
}

impl FontSource {
    /// Load a font by file path, falling back to the system font matcher for
    /// family names.
    pub fn load(name: &str, size: u32) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidConfig("font size must be positive".to_string()));
        }

        let path = Path::new(name);
        let font = Self::open(path, size)
            .or_else(|| {
                if Self::is_file_path(path) {
                    return None;
                }
                let path = Self::system_match(name)?;
                info!("Font {:?} matched to {}", name, path.display());
                Self::open(&path, size)
            })
            .ok_or_else(|| Error::FontLoadError(name.to_string()))?;

        let px = size as f32;
        let metrics = font
            .horizontal_line_metrics(px)
            .map(|m| LineMetrics {
                ascent: m.ascent.round() as i32,
                descent: (-m.descent).round() as i32,
            })
            .ok_or_else(|| Error::FontLoadError(name.to_string()))?;
        debug!("line metrics at {}px: {:?}", size, metrics);

        Ok(FontSource {
            font,
            size,
            metrics,
        })
    }

    fn open(path: &Path, size: u32) -> Option<fontdue::Font> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!("Failed to read font {}: {:?}", path.display(), err);
                return None;
            }
        };
        let settings = fontdue::FontSettings {
            scale: size as f32,
            ..fontdue::FontSettings::default()
        };
        match fontdue::Font::from_bytes(bytes, settings) {
            Ok(font) => Some(font),
            Err(err) => {
                debug!("Failed to parse font {}: {}", path.display(), err);
                None
            }
        }
    }

    /// Names that point at a file are never handed to the font matcher, which
    /// would substitute some default font for them.
    fn is_file_path(path: &Path) -> bool {
        let font_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                matches!(
                    ext.to_ascii_lowercase().as_str(),
                    "ttf" | "otf" | "ttc" | "otc"
                )
            })
            .unwrap_or(false);
        font_extension || path.components().count() > 1
    }

    /// Ask fontconfig which file provides the family `name`.
    fn system_match(name: &str) -> Option<PathBuf> {
        let output = match Command::new("fc-match")
            .args(["--format", "%{file}", name])
            .output()
        {
            Ok(output) => output,
            Err(err) => {
                debug!("fc-match is not available: {:?}", err);
                return None;
            }
        };

        if !output.status.success() {
            debug!("fc-match failed for {:?}: {}", name, output.status);
            return None;
        }

        let path = String::from_utf8(output.stdout).ok()?;
        let path = path.trim();
        if path.is_empty() {
            None
        } else {
            Some(PathBuf::from(path))
        }
    }
}

impl GlyphSource for FontSource {
    fn size(&self) -> u32 {
        self.size
    }

    fn line_metrics(&self) -> LineMetrics {
        self.metrics
    }

    fn rasterize(&self, code: u32) -> Result<RasterGlyph> {
        let ch = char::from_u32(code).ok_or(Error::GlyphRasterGap(code))?;
        if self.font.lookup_glyph_index(ch) == 0 {
            return Err(Error::GlyphRasterGap(code));
        }

        let (metrics, coverage) = self.font.rasterize(ch, self.size as f32);
        let grid = PixelGrid::from_coverage(
            metrics.width,
            metrics.height,
            &coverage,
            DEFAULT_THRESHOLD,
        )?;

        let bounds = match grid.ink_bounds() {
            Some(bounds) => bounds,
            None => return Ok(RasterGlyph::blank(metrics.advance_width)),
        };

        // fontdue places the bitmap's bottom edge `ymin` rows above the baseline.
        let bitmap_top = self.metrics.ascent - (metrics.ymin + metrics.height as i32);
        let top = bitmap_top + bounds.y as i32;
        if top < 0 {
            debug!("glyph 0x{:02x} rises {} row(s) above the ascent", code, -top);
        }

        Ok(RasterGlyph {
            mask: grid.crop(bounds),
            x_off: metrics.xmin + bounds.x as i32,
            raw_oy: top.max(0) as usize,
            advance: metrics.advance_width,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_image_is_unreadable() {
        let path = Path::new("/nonexistent/oled-assets/logo.png");
        match load_image(path, &ImageConfig::new()) {
            Err(Error::UnreadableImage { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected result {:?}", other.map(|g| g.width())),
        }
    }

    #[test]
    fn unknown_font_fails_to_load() {
        assert!(matches!(
            FontSource::load("/nonexistent/oled-assets/font.ttf", 12),
            Err(Error::FontLoadError(_))
        ));
    }

    #[test]
    fn family_names_are_not_file_paths() {
        assert!(FontSource::is_file_path(Path::new("fonts/Inter.ttf")));
        assert!(FontSource::is_file_path(Path::new("Inter.OTF")));
        assert!(FontSource::is_file_path(Path::new("/usr/share/fonts/inter")));
        assert!(!FontSource::is_file_path(Path::new("DejaVu Sans Mono")));
    }

    #[test]
    fn zero_font_size_is_rejected() {
        assert!(matches!(
            FontSource::load("DejaVu Sans", 0),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn blank_glyph_has_no_offsets() {
        let glyph = RasterGlyph::blank(4.6);
        assert!(glyph.mask.is_empty());
        assert_eq!(glyph.x_off, 0);
        assert_eq!(glyph.raw_oy, 0);
    }
}
