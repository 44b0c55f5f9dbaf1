//! Monochrome pixel grids.
//!
//! A [`PixelGrid`] is the 1-bit picture every encoder works from. Grids are
//! built by thresholding 8-bit samples with a step filter and are immutable
//! afterwards.

use crate::error::{Error, Result};

/// Default step filter threshold, on a 0..=255 scale.
pub const DEFAULT_THRESHOLD: u8 = 127;

/// Rectangle in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// Row-major grid of lit (`true`) and unlit pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
}

impl PixelGrid {
    pub fn new(width: usize, height: usize, pixels: Vec<bool>) -> Result<Self> {
        if pixels.len() != width * height {
            return Err(Error::InvalidConfig(format!(
                "{} pixels supplied for a {}x{} grid",
                pixels.len(),
                width,
                height
            )));
        }
        Ok(PixelGrid {
            width,
            height,
            pixels,
        })
    }

    /// A grid with no pixels at all.
    pub fn empty() -> Self {
        PixelGrid {
            width: 0,
            height: 0,
            pixels: Vec::new(),
        }
    }

    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        PixelGrid {
            width,
            height,
            pixels,
        }
    }

    /// Step filter for luminance samples: dark pixels are lit.
    ///
    /// A sample brighter than `threshold` is background.
    pub fn from_luma(width: usize, height: usize, samples: &[u8], threshold: u8) -> Result<Self> {
        Self::step_filter(width, height, samples, |value| value <= threshold)
    }

    /// Step filter for glyph coverage samples: inked pixels are lit.
    pub fn from_coverage(
        width: usize,
        height: usize,
        samples: &[u8],
        threshold: u8,
    ) -> Result<Self> {
        Self::step_filter(width, height, samples, |value| value > threshold)
    }

    fn step_filter(
        width: usize,
        height: usize,
        samples: &[u8],
        lit: impl Fn(u8) -> bool,
    ) -> Result<Self> {
        let pixels = samples.iter().map(|&value| lit(value)).collect();
        Self::new(width, height, pixels)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Read one pixel. Coordinates outside the grid read as unlit.
    pub fn lit(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.pixels[y * self.width + x]
    }

    /// Smallest rectangle holding every lit pixel, `None` when nothing is lit.
    pub fn ink_bounds(&self) -> Option<Bounds> {
        let mut min_x = usize::MAX;
        let mut min_y = usize::MAX;
        let mut max_x = 0;
        let mut max_y = 0;
        let mut inked = false;

        for y in 0..self.height {
            for x in 0..self.width {
                if self.lit(x, y) {
                    inked = true;
                    min_x = min_x.min(x);
                    min_y = min_y.min(y);
                    max_x = max_x.max(x);
                    max_y = max_y.max(y);
                }
            }
        }

        if !inked {
            return None;
        }

        Some(Bounds {
            x: min_x,
            y: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
        })
    }

    /// Copy out a sub-rectangle. Parts outside the grid come back unlit.
    pub fn crop(&self, bounds: Bounds) -> PixelGrid {
        PixelGrid::from_fn(bounds.width, bounds.height, |x, y| {
            self.lit(bounds.x + x, bounds.y + y)
        })
    }
}
