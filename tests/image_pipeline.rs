use image::{GrayImage, Luma, Rgb, RgbImage};
use oled_assets::{
    encode_image, load_image, write_artifact, write_image_table, ColorPolicy, Error, ImageConfig,
    PageLayout, TableFormat,
};
use std::fs;
use tempfile::tempdir;

#[test]
fn black_square_png_to_header() {
    let dir = tempdir().unwrap();
    let png = dir.path().join("square.png");
    GrayImage::from_pixel(16, 16, Luma([0])).save(&png).unwrap();

    let grid = load_image(&png, &ImageConfig::new()).unwrap();
    let image = encode_image(&grid, PageLayout::default()).unwrap();
    assert_eq!(image.width, 16);
    assert_eq!(image.height, 16);
    assert_eq!(image.data, vec![0xff; 32]);

    let mut buf = Vec::new();
    write_image_table(&mut buf, "square", &image, TableFormat::Cpp).unwrap();
    let dest = dir.path().join("include").join("square.h");
    write_artifact(&dest, &buf).unwrap();

    let header = fs::read_to_string(&dest).unwrap();
    assert!(header.contains("square_data[32]"));
    assert_eq!(header.matches("0xff").count(), 32);
}

#[test]
fn bright_pixels_are_background() {
    let dir = tempdir().unwrap();
    let png = dir.path().join("stripes.png");
    // Rows alternate between dark (lit) and light (background) gray.
    let img = GrayImage::from_fn(4, 5, |_, y| {
        if y % 2 == 0 {
            Luma([100])
        } else {
            Luma([200])
        }
    });
    img.save(&png).unwrap();

    let grid = load_image(&png, &ImageConfig::new()).unwrap();
    let image = encode_image(&grid, PageLayout::default()).unwrap();
    assert_eq!(image.height, 8);
    // Rows 0, 2 and 4 lit, rows 5..8 are padding.
    assert_eq!(image.data, vec![0b0001_0101; 4]);

    let dark = load_image(&png, &ImageConfig::new().threshold(250)).unwrap();
    assert!(dark.lit(0, 1));
}

#[test]
fn color_images_follow_the_color_policy() {
    let dir = tempdir().unwrap();
    let png = dir.path().join("red.png");
    RgbImage::from_pixel(8, 8, Rgb([255, 0, 0])).save(&png).unwrap();

    let strict = ImageConfig::new().color_policy(ColorPolicy::GrayscaleOnly);
    assert!(matches!(
        load_image(&png, &strict),
        Err(Error::UnsupportedColorMode(_))
    ));

    // Pure red is dark enough in luminance to be lit.
    let grid = load_image(&png, &ImageConfig::new()).unwrap();
    assert_eq!(grid.width(), 8);
    assert!(grid.lit(3, 3));
}

#[test]
fn garbage_is_unreadable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("not-an-image.png");
    fs::write(&path, b"definitely not a png").unwrap();

    assert!(matches!(
        load_image(&path, &ImageConfig::new()),
        Err(Error::UnreadableImage { .. })
    ));
}
