//! Page packer.
//!
//! Page oriented controllers such as the SSD1306 address their memory in
//! horizontal bands ("pages") of 8 rows. Each byte holds one column of a page,
//! least significant bit on top:
//!
//! ```text
//!            x=0   x=1   x=2
//! page 0   [ b0 ] [ b0 ] [ b0 ]   row 0
//!          [ .. ] [ .. ] [ .. ]
//!          [ b7 ] [ b7 ] [ b7 ]   row 7
//! page 1   [ b0 ] ...             row 8
//! ```
//!
//! Packed data is page-major: every column of page 0, then page 1, and so on.

use log::debug;

use crate::error::{Error, Result};
use crate::grid::PixelGrid;

/// Data type of one packed page column.
pub type PageColumn = u8;

/// Page height of the SSD1306 and compatible controllers.
pub const SSD1306_PAGE_HEIGHT: u8 = 8;

/// Vertical addressing unit of the target controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    page_height: u8,
}

impl Default for PageLayout {
    fn default() -> Self {
        PageLayout {
            page_height: SSD1306_PAGE_HEIGHT,
        }
    }
}

impl PageLayout {
    /// Layout with `page_height` rows per page.
    ///
    /// A page column is a single byte, so the height must be within `1..=8`.
    pub fn new(page_height: u8) -> Result<Self> {
        if page_height == 0 || page_height > SSD1306_PAGE_HEIGHT {
            return Err(Error::InvalidConfig(format!(
                "page height must be between 1 and {}, got {}",
                SSD1306_PAGE_HEIGHT, page_height
            )));
        }
        Ok(PageLayout { page_height })
    }

    pub fn page_height(&self) -> usize {
        self.page_height as usize
    }

    /// Number of pages needed to cover `rows` rows.
    pub fn pages(&self, rows: usize) -> usize {
        (rows + self.page_height() - 1) / self.page_height()
    }

    /// `rows` rounded up to a whole number of pages.
    pub fn padded_height(&self, rows: usize) -> usize {
        self.pages(rows) * self.page_height()
    }
}

/// Source bit for column `x` and destination row `row`, with the source
/// shifted down by `oy` rows.
///
/// Any coordinate that falls outside the grid contributes 0, including the
/// `oy` rows skipped above the source.
pub fn bit(grid: &PixelGrid, x: usize, row: usize, oy: usize) -> PageColumn {
    match row.checked_sub(oy) {
        Some(source_row) if grid.lit(x, source_row) => 1,
        _ => 0,
    }
}

/// Pack `grid` into page columns.
///
/// `height` is the logical height to cover; it is rounded up to whole pages.
/// `oy` skips that many rows at the top of the first page so that a glyph
/// can start part way into a page.
pub fn pack(
    grid: &PixelGrid,
    height: usize,
    oy: usize,
    layout: PageLayout,
) -> Result<Vec<PageColumn>> {
    let page_height = layout.page_height();
    if oy >= page_height {
        return Err(Error::InvalidConfig(format!(
            "start row offset {} must be below the page height {}",
            oy, page_height
        )));
    }

    let pages = layout.pages(height);
    let width = grid.width();
    debug!(
        "packing {}x{} grid into {} page(s), oy={}",
        width,
        grid.height(),
        pages,
        oy
    );

    let mut data: Vec<PageColumn> = Vec::with_capacity(width * pages);
    for page in 0..pages {
        for x in 0..width {
            let column = (0..page_height).fold(0, |acc, k| {
                acc | (bit(grid, x, page * page_height + k, oy) << k)
            });
            data.push(column);
        }
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unpack(data: &[PageColumn], width: usize, x: usize, row: usize) -> bool {
        let page = row / 8;
        data[page * width + x] & (1 << (row % 8)) != 0
    }

    #[test]
    fn page_layout_rejects_out_of_range_heights() {
        assert!(PageLayout::new(0).is_err());
        assert!(PageLayout::new(9).is_err());
        assert_eq!(PageLayout::new(8).unwrap(), PageLayout::default());
    }

    #[test]
    fn padded_height_rounds_up_to_pages() {
        let layout = PageLayout::default();
        assert_eq!(layout.padded_height(0), 0);
        assert_eq!(layout.padded_height(1), 8);
        assert_eq!(layout.padded_height(8), 8);
        assert_eq!(layout.padded_height(13), 16);
    }

    #[test]
    fn unpacking_reconstructs_the_grid() {
        let grid = PixelGrid::from_fn(7, 24, |x, y| (x * 3 + y * 5) % 7 < 3);
        let data = pack(&grid, grid.height(), 0, PageLayout::default()).unwrap();
        assert_eq!(data.len(), 7 * 3);

        for y in 0..24 {
            for x in 0..7 {
                assert_eq!(unpack(&data, 7, x, y), grid.lit(x, y), "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn rows_past_the_grid_are_zero() {
        let grid = PixelGrid::from_fn(3, 11, |_, _| true);
        let data = pack(&grid, 11, 0, PageLayout::default()).unwrap();
        assert_eq!(data, vec![0xff, 0xff, 0xff, 0x07, 0x07, 0x07]);
    }

    #[test]
    fn oy_shifts_rows_into_the_next_page() {
        let grid = PixelGrid::from_fn(1, 8, |_, _| true);
        let data = pack(&grid, 8 + 3, 3, PageLayout::default()).unwrap();
        assert_eq!(data, vec![0b1111_1000, 0b0000_0111]);
    }

    #[test]
    fn oy_must_stay_inside_a_page() {
        let grid = PixelGrid::from_fn(1, 1, |_, _| true);
        assert!(matches!(
            pack(&grid, 9, 8, PageLayout::default()),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn smaller_pages_leave_high_bits_clear() {
        let layout = PageLayout::new(4).unwrap();
        let grid = PixelGrid::from_fn(2, 6, |_, _| true);
        let data = pack(&grid, 6, 0, layout).unwrap();
        assert_eq!(data, vec![0x0f, 0x0f, 0x03, 0x03]);
    }

    #[test]
    fn bit_outside_the_grid_is_zero() {
        let grid = PixelGrid::from_fn(2, 2, |_, _| true);
        assert_eq!(bit(&grid, 0, 0, 1), 0);
        assert_eq!(bit(&grid, 0, 1, 1), 1);
        assert_eq!(bit(&grid, 0, 3, 1), 0);
        assert_eq!(bit(&grid, 2, 0, 0), 0);
    }
}
