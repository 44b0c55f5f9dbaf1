//! Glyph encoder.
//!
//! Every character code in a range is rasterized, cropped to its ink and
//! packed on its own. The packed glyphs are then laid back to back in one
//! shared data blob, and each glyph record keeps the offset of its bytes.

use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::packer::{pack, PageColumn, PageLayout};
use crate::source::{FontSource, GlyphSource, RasterGlyph};

/// First printable ASCII code.
pub const DEFAULT_FIRST_CODE: u32 = 0x20;
/// Last printable ASCII code.
pub const DEFAULT_LAST_CODE: u32 = 0x7e;

/// Font conversion settings.
#[derive(Debug, Clone)]
pub struct FontConfig {
    font: String,
    size: u32,
    first: u32,
    last: u32,
    layout: PageLayout,
}

impl FontConfig {
    /// Initialize with a font path or family name and a pixel size, covering
    /// printable ASCII.
    ///
    /// # Example
    ///
    /// ```
    /// use oled_assets::FontConfig;
    ///
    /// let config = FontConfig::new("DejaVu Sans", 12).range(0x30, 0x39);
    /// ```
    pub fn new(font: &str, size: u32) -> FontConfig {
        FontConfig {
            font: font.to_string(),
            size,
            first: DEFAULT_FIRST_CODE,
            last: DEFAULT_LAST_CODE,
            layout: PageLayout::default(),
        }
    }

    /// Inclusive range of character codes to encode.
    pub fn range(self, first: u32, last: u32) -> Self {
        FontConfig {
            first,
            last,
            ..self
        }
    }

    pub fn layout(self, layout: PageLayout) -> Self {
        FontConfig { layout, ..self }
    }

    /// Resolve and load the configured font.
    pub fn load(&self) -> Result<FontSource> {
        FontSource::load(&self.font, self.size)
    }

    fn validate(&self) -> Result<()> {
        if self.first > self.last {
            return Err(Error::InvalidConfig(format!(
                "character range 0x{:02x}..=0x{:02x} is empty",
                self.first, self.last
            )));
        }
        Ok(())
    }
}

/// Metadata of one encoded glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub code: u32,
    /// Index of the glyph's first byte in [`EncodedFont::data`].
    pub data_offset: usize,
    /// Number of bytes the glyph owns, `width * height / page_height`.
    pub data_len: usize,
    /// Pen advance, rounded to whole pixels.
    pub advance: i32,
    pub width: usize,
    /// Height in rows, always a whole number of pages.
    pub height: usize,
    pub x_off: i32,
    /// Vertical offset from the font's top, in whole pages.
    pub y_off: usize,
}

impl Glyph {
    pub fn has_bitmap(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// A glyph packed on its own, before it is placed in the shared blob.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PackedGlyph {
    code: u32,
    advance: i32,
    width: usize,
    height: usize,
    x_off: i32,
    y_off: usize,
    data: Vec<PageColumn>,
}

impl PackedGlyph {
    fn blank(code: u32, advance: f32) -> Self {
        PackedGlyph {
            code,
            advance: advance.round() as i32,
            width: 0,
            height: 0,
            x_off: 0,
            y_off: 0,
            data: Vec::new(),
        }
    }
}

/// A proportional font in page layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFont {
    pub size: u32,
    pub ascent: i32,
    pub descent: i32,
    pub first: u32,
    pub last: u32,
    /// One record per code in `first..=last`, in code order.
    pub glyphs: Vec<Glyph>,
    /// Page columns of every glyph with ink, back to back in code order.
    pub data: Vec<PageColumn>,
    pub layout: PageLayout,
}

impl EncodedFont {
    /// Look up a glyph and its page columns.
    ///
    /// Glyphs without ink come back with an empty slice. A record whose bytes
    /// fall outside [`EncodedFont::data`] is not found.
    pub fn glyph(&self, code: u32) -> Option<(&Glyph, &[PageColumn])> {
        if code < self.first || code > self.last {
            return None;
        }
        let glyph = self.glyphs.get((code - self.first) as usize)?;
        let end = glyph.data_offset.checked_add(glyph.data_len)?;
        let data = self.data.get(glyph.data_offset..end)?;
        Some((glyph, data))
    }

    /// Height of a glyph in pages.
    pub fn pages(&self, glyph: &Glyph) -> usize {
        glyph.height / self.layout.page_height()
    }

    /// Pen distance covered by `text`. Characters outside the font are skipped.
    pub fn text_width(&self, text: &str) -> i32 {
        text.chars()
            .filter_map(|ch| self.glyph(ch as u32))
            .map(|(glyph, _)| glyph.advance)
            .sum()
    }
}

/// Encode every glyph of `config`'s range from `source`.
///
/// Codes the source cannot rasterize become blank glyphs; any other error
/// aborts the run.
pub fn encode_font<S: GlyphSource>(source: &S, config: &FontConfig) -> Result<EncodedFont> {
    config.validate()?;
    let metrics = source.line_metrics();

    let packed = (config.first..=config.last)
        .map(|code| encode_glyph(source, code, config.layout))
        .collect::<Result<Vec<_>>>()?;
    let (glyphs, data) = assign_offsets(packed);

    info!(
        "Encoded {} glyph(s) 0x{:02x}..=0x{:02x} at {}px ({} bytes)",
        glyphs.len(),
        config.first,
        config.last,
        source.size(),
        data.len()
    );

    Ok(EncodedFont {
        size: source.size(),
        ascent: metrics.ascent,
        descent: metrics.descent,
        first: config.first,
        last: config.last,
        glyphs,
        data,
        layout: config.layout,
    })
}

fn encode_glyph<S: GlyphSource>(source: &S, code: u32, layout: PageLayout) -> Result<PackedGlyph> {
    let raster = match source.rasterize(code) {
        Ok(raster) => raster,
        Err(err) if !err.is_fatal() => {
            warn!("{}, storing an empty glyph", err);
            return Ok(PackedGlyph::blank(code, 0.0));
        }
        Err(err) => return Err(err),
    };

    pack_glyph(code, &raster, layout)
}

fn pack_glyph(code: u32, raster: &RasterGlyph, layout: PageLayout) -> Result<PackedGlyph> {
    if raster.mask.ink_bounds().is_none() {
        return Ok(PackedGlyph::blank(code, raster.advance));
    }

    // Whole pages go into y_off, the packer shifts by the remainder.
    let page_height = layout.page_height();
    let oy = raster.raw_oy % page_height;
    let y_off = raster.raw_oy / page_height;
    let height = layout.padded_height(raster.mask.height() + oy);

    let data = pack(&raster.mask, height, oy, layout)?;
    debug!(
        "glyph 0x{:02x}: {}x{} mask, raw_oy={} -> y_off={} oy={} height={} ({} bytes)",
        code,
        raster.mask.width(),
        raster.mask.height(),
        raster.raw_oy,
        y_off,
        oy,
        height,
        data.len()
    );

    Ok(PackedGlyph {
        code,
        advance: raster.advance.round() as i32,
        width: raster.mask.width(),
        height,
        x_off: raster.x_off,
        y_off,
        data,
    })
}

/// Place packed glyphs in one blob, threading the running offset through.
fn assign_offsets(packed: Vec<PackedGlyph>) -> (Vec<Glyph>, Vec<PageColumn>) {
    let mut data: Vec<PageColumn> = Vec::new();
    let mut glyphs: Vec<Glyph> = Vec::with_capacity(packed.len());

    let mut offset = 0;
    for glyph in packed {
        let data_len = glyph.data.len();
        glyphs.push(Glyph {
            code: glyph.code,
            data_offset: offset,
            data_len,
            advance: glyph.advance,
            width: glyph.width,
            height: glyph.height,
            x_off: glyph.x_off,
            y_off: glyph.y_off,
        });
        data.extend(glyph.data);
        offset += data_len;
    }

    (glyphs, data)
}
