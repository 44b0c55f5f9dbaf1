//! SSD1306 asset converter
//!
//! This crate converts bitmap images and fonts into the page layout used by
//! SSD1306 class monochrome OLED controllers, and emits the result as source
//! tables for the firmware.
//!
//! # Example
//!
//! ```rust,no_run
//! use oled_assets::{encode_font, encode_image, load_image, FontConfig, ImageConfig};
//! use std::path::Path;
//!
//! let config = ImageConfig::new();
//! let grid = load_image(Path::new("logo.png"), &config).unwrap();
//! let image = encode_image(&grid, Default::default()).unwrap();
//!
//! let config = FontConfig::new("DejaVu Sans", 12);
//! let source = config.load().unwrap();
//! let font = encode_font(&source, &config).unwrap();
//! ```

mod bitmap;
mod emit;
mod error;
mod font;
mod grid;
mod packer;
mod source;

pub use crate::{
    bitmap::{encode_image, EncodedImage, ImageConfig},
    emit::{write_artifact, write_font_table, write_image_table, TableFormat},
    error::{Error, Result},
    font::{encode_font, EncodedFont, FontConfig, Glyph, DEFAULT_FIRST_CODE, DEFAULT_LAST_CODE},
    grid::{Bounds, PixelGrid, DEFAULT_THRESHOLD},
    packer::{bit, pack, PageColumn, PageLayout, SSD1306_PAGE_HEIGHT},
    source::{load_image, ColorPolicy, FontSource, GlyphSource, LineMetrics, RasterGlyph},
};
