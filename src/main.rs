//
// cargo run -- image assets/logo.png logo include/resource/logo.h
// cargo run -- font "DejaVu Sans" 12 dejavu_12 include/resource/dejavu_12.h
//
use clap::{Args, Parser, Subcommand};
use log::error;
use std::path::PathBuf;

use oled_assets::{
    encode_font, encode_image, load_image, write_artifact, write_font_table, write_image_table,
    ColorPolicy, FontConfig, ImageConfig, PageLayout, Result, TableFormat, DEFAULT_FIRST_CODE,
    DEFAULT_LAST_CODE, DEFAULT_THRESHOLD, SSD1306_PAGE_HEIGHT,
};

#[derive(Parser, Debug)]
#[command(about = "Convert images and fonts into SSD1306 page layout tables")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert an image into a page layout bitmap
    Image(ImageArgs),
    /// Convert a range of font glyphs into a proportional page layout font
    Font(FontArgs),
}

#[derive(Args, Debug)]
struct Output {
    /// Target language of the generated table
    #[arg(long, default_value = "cpp", value_parser = parse_format)]
    format: TableFormat,

    /// Rows per controller page
    #[arg(long, default_value_t = SSD1306_PAGE_HEIGHT)]
    page_height: u8,
}

#[derive(Args, Debug)]
struct ImageArgs {
    /// Source image, any format the decoder understands
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Name of the generated constants
    #[arg(value_name = "NAME")]
    name: String,

    /// Destination file
    #[arg(value_name = "DEST")]
    dest: PathBuf,

    /// Luminance at or below which a pixel is lit
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: u8,

    /// Reject images that are not grayscale instead of converting them
    #[arg(long)]
    strict_grayscale: bool,

    #[command(flatten)]
    output: Output,
}

#[derive(Args, Debug)]
struct FontArgs {
    /// Font file path or family name
    #[arg(value_name = "FONT")]
    font: String,

    /// Font size in pixels
    #[arg(value_name = "SIZE")]
    size: u32,

    /// Name of the generated font
    #[arg(value_name = "NAME")]
    name: String,

    /// Destination file
    #[arg(value_name = "DEST")]
    dest: PathBuf,

    /// First character code, decimal or 0x prefixed hex
    #[arg(long, default_value_t = DEFAULT_FIRST_CODE, value_parser = parse_code)]
    first: u32,

    /// Last character code (inclusive), decimal or 0x prefixed hex
    #[arg(long, default_value_t = DEFAULT_LAST_CODE, value_parser = parse_code)]
    last: u32,

    #[command(flatten)]
    output: Output,
}

fn parse_code(s: &str) -> std::result::Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse::<u32>(),
    };
    parsed.map_err(|err| format!("invalid character code {:?}: {}", s, err))
}

fn parse_format(s: &str) -> std::result::Result<TableFormat, String> {
    s.parse::<TableFormat>().map_err(|err| err.to_string())
}

fn convert_image(args: ImageArgs) -> Result<()> {
    let layout = PageLayout::new(args.output.page_height)?;
    let policy = if args.strict_grayscale {
        ColorPolicy::GrayscaleOnly
    } else {
        ColorPolicy::Permissive
    };
    let config = ImageConfig::new()
        .threshold(args.threshold)
        .color_policy(policy)
        .layout(layout);

    let grid = load_image(&args.image_path, &config)?;
    let image = encode_image(&grid, layout)?;

    let mut buf: Vec<u8> = Vec::new();
    write_image_table(&mut buf, &args.name, &image, args.output.format)?;
    write_artifact(&args.dest, &buf)
}

fn convert_font(args: FontArgs) -> Result<()> {
    let layout = PageLayout::new(args.output.page_height)?;
    let config = FontConfig::new(&args.font, args.size)
        .range(args.first, args.last)
        .layout(layout);

    let source = config.load()?;
    let font = encode_font(&source, &config)?;

    let mut buf: Vec<u8> = Vec::new();
    write_font_table(&mut buf, &args.name, &font, args.output.format)?;
    write_artifact(&args.dest, &buf)
}

fn main() {
    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{}:{}] {} - {}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.level(),
                record.args()
            )
        })
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Image(args) => convert_image(args),
        Command::Font(args) => convert_font(args),
    };

    if let Err(err) = result {
        error!("{}", err);
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_codes_accept_hex_and_decimal() {
        assert_eq!(parse_code("0x7e"), Ok(0x7e));
        assert_eq!(parse_code("0X20"), Ok(0x20));
        assert_eq!(parse_code("65"), Ok(65));
        assert!(parse_code("0xzz").is_err());
    }

    #[test]
    fn font_command_defaults_to_printable_ascii() {
        let cli = Cli::parse_from([
            "oled-assets",
            "font",
            "DejaVu Sans",
            "12",
            "dejavu",
            "out/dejavu.h",
        ]);
        match cli.command {
            Command::Font(args) => {
                assert_eq!(args.first, 0x20);
                assert_eq!(args.last, 0x7e);
                assert_eq!(args.size, 12);
                assert_eq!(args.output.format, TableFormat::Cpp);
                assert_eq!(args.output.page_height, 8);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn image_command_flags() {
        let cli = Cli::parse_from([
            "oled-assets",
            "image",
            "logo.png",
            "logo",
            "logo.rs",
            "--threshold",
            "80",
            "--strict-grayscale",
            "--format",
            "rust",
        ]);
        match cli.command {
            Command::Image(args) => {
                assert_eq!(args.threshold, 80);
                assert!(args.strict_grayscale);
                assert_eq!(args.output.format, TableFormat::Rust);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
