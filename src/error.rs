//! Error types for asset conversion.
//!
//! Every failure that can occur while decoding a source, rasterizing a font
//! or committing a generated table is represented here.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for asset conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// The source image could not be opened or decoded.
    ///
    /// Wraps the decoder error so the caller can see whether the file was
    /// missing or simply not in a supported format.
    #[error("Image {path:?} could not be decoded")]
    UnreadableImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The source image is not grayscale and the strict color policy is active.
    #[error("Image must be grayscale only, found {0:?}")]
    UnsupportedColorMode(image::ColorType),

    /// No font could be loaded, neither directly nor through the system
    /// font matcher.
    #[error("Unable to load font {0:?}")]
    FontLoadError(String),

    /// A single character code in the requested range has no glyph.
    ///
    /// This is not fatal: the glyph encoder stores an empty glyph instead.
    #[error("No glyph for character code 0x{0:02x}")]
    GlyphRasterGap(u32),

    #[error("Invalid configuration parameter: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this error must abort the whole run.
    ///
    /// Only per-glyph raster gaps are absorbed into the output.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::GlyphRasterGap(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
