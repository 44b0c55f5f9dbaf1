//! Bitmap image encoder.

use log::info;

use crate::error::Result;
use crate::grid::{PixelGrid, DEFAULT_THRESHOLD};
use crate::packer::{pack, PageColumn, PageLayout};
use crate::source::ColorPolicy;

/// Image conversion settings.
#[derive(Debug, Clone, Copy)]
pub struct ImageConfig {
    pub(crate) threshold: u8,
    pub(crate) color_policy: ColorPolicy,
    pub(crate) layout: PageLayout,
}

impl Default for ImageConfig {
    fn default() -> Self {
        ImageConfig {
            threshold: DEFAULT_THRESHOLD,
            color_policy: ColorPolicy::default(),
            layout: PageLayout::default(),
        }
    }
}

impl ImageConfig {
    /// Initialize with the SSD1306 page layout, a mid-gray threshold and
    /// permissive color conversion.
    ///
    /// # Example
    ///
    /// ```
    /// use oled_assets::{ColorPolicy, ImageConfig};
    ///
    /// let config = ImageConfig::new()
    ///     .threshold(100)
    ///     .color_policy(ColorPolicy::GrayscaleOnly);
    /// ```
    pub fn new() -> ImageConfig {
        ImageConfig::default()
    }

    /// Luminance at or below which a pixel is lit.
    pub fn threshold(self, threshold: u8) -> Self {
        ImageConfig { threshold, ..self }
    }

    pub fn color_policy(self, color_policy: ColorPolicy) -> Self {
        ImageConfig {
            color_policy,
            ..self
        }
    }

    pub fn layout(self, layout: PageLayout) -> Self {
        ImageConfig { layout, ..self }
    }
}

/// An image in page layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub width: usize,
    /// Height in rows, always a whole number of pages.
    pub height: usize,
    pub data: Vec<PageColumn>,
    pub layout: PageLayout,
}

impl EncodedImage {
    pub fn pages(&self) -> usize {
        self.height / self.layout.page_height()
    }

    /// Page columns of one page.
    pub fn page(&self, page: usize) -> &[PageColumn] {
        &self.data[page * self.width..(page + 1) * self.width]
    }
}

/// Pack a whole image. The height is padded with unlit rows up to the next
/// page boundary.
pub fn encode_image(grid: &PixelGrid, layout: PageLayout) -> Result<EncodedImage> {
    let height = layout.padded_height(grid.height());
    let data = pack(grid, height, 0, layout)?;
    info!(
        "Encoded {}x{} image as {}x{} ({} bytes)",
        grid.width(),
        grid.height(),
        grid.width(),
        height,
        data.len()
    );

    Ok(EncodedImage {
        width: grid.width(),
        height,
        data,
        layout,
    })
}
