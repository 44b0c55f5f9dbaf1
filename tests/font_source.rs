use oled_assets::{encode_font, Error, FontConfig, FontSource, GlyphSource};
use std::path::PathBuf;

const SIZE: u32 = 12;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("DejaVuSerif.ttf")
}

fn load() -> FontSource {
    let path = fixture();
    FontSource::load(path.to_str().unwrap(), SIZE).unwrap()
}

#[test]
fn line_metrics_are_whole_pixels() {
    let font = load();
    assert_eq!(font.size(), SIZE);
    let metrics = font.line_metrics();
    assert_eq!(metrics.ascent, 11);
    assert_eq!(metrics.descent, 3);
}

#[test]
fn capital_sits_on_the_baseline() {
    let font = load();
    let glyph = font.rasterize('A' as u32).unwrap();
    assert_eq!(glyph.mask.width(), 8);
    assert_eq!(glyph.mask.height(), 9);
    assert_eq!(glyph.raw_oy, 2);
    assert_eq!(glyph.raw_oy + glyph.mask.height(), 11);
    assert!(glyph.advance > 0.0);
}

#[test]
fn descenders_and_punctuation_start_lower() {
    let font = load();
    assert_eq!(font.rasterize('g' as u32).unwrap().raw_oy, 5);
    assert_eq!(font.rasterize('.' as u32).unwrap().raw_oy, 10);
}

#[test]
fn masks_are_cropped_to_ink() {
    let font = load();
    let glyph = font.rasterize('g' as u32).unwrap();
    let bounds = glyph.mask.ink_bounds().unwrap();
    assert_eq!((bounds.x, bounds.y), (0, 0));
    assert_eq!(bounds.width, glyph.mask.width());
    assert_eq!(bounds.height, glyph.mask.height());
}

#[test]
fn space_is_blank_with_an_advance() {
    let font = load();
    let glyph = font.rasterize(' ' as u32).unwrap();
    assert!(glyph.mask.is_empty());
    assert_eq!(glyph.raw_oy, 0);
    assert!(glyph.advance > 0.0);
}

#[test]
fn private_use_code_is_a_raster_gap() {
    let font = load();
    assert!(matches!(
        font.rasterize(0xe000),
        Err(Error::GlyphRasterGap(0xe000))
    ));
    // Surrogates are not characters at all.
    assert!(matches!(
        font.rasterize(0xd800),
        Err(Error::GlyphRasterGap(0xd800))
    ));
}

#[test]
fn printable_ascii_encodes() {
    let path = fixture();
    let config = FontConfig::new(path.to_str().unwrap(), SIZE);
    let font = encode_font(&config.load().unwrap(), &config).unwrap();

    assert_eq!(font.glyphs.len(), 95);
    assert_eq!(font.data.len(), 1042);
    assert_eq!((font.ascent, font.descent), (11, 3));

    let (space, data) = font.glyph(0x20).unwrap();
    assert!(!space.has_bitmap());
    assert!(data.is_empty());

    let (a, data) = font.glyph('A' as u32).unwrap();
    assert_eq!((a.width, a.height, a.y_off), (8, 16, 0));
    assert_eq!(data.len(), 16);
}
