use oled_assets::{encode_font, EncodedFont, FontConfig};
use std::env;

const COLUMNS: usize = 128;
const PAGES: usize = 4;

fn print_usage() {
    println!("Usage: cargo run --example preview_text FONT SIZE [TEXT]");
    println!("Draws TEXT on a {}x{} screen using the encoded glyphs.", COLUMNS, PAGES * 8);
}

/// Blit every glyph the way the firmware does: column by column, page by
/// page, starting `y_off` pages down and `x_off` columns right of the pen.
fn draw_text(screen: &mut [[bool; COLUMNS]], font: &EncodedFont, text: &str) {
    let page_height = font.layout.page_height();
    let mut pen: i32 = 0;

    for ch in text.chars() {
        let (glyph, data) = match font.glyph(ch as u32) {
            Some(found) => found,
            None => continue,
        };

        for page in 0..font.pages(glyph) {
            for x in 0..glyph.width {
                let column = data[page * glyph.width + x];
                let sx = pen + glyph.x_off + x as i32;
                if sx < 0 || sx as usize >= COLUMNS {
                    continue;
                }
                for k in 0..page_height {
                    let sy = (glyph.y_off + page) * page_height + k;
                    if sy < screen.len() && column & (1 << k) != 0 {
                        screen[sy][sx as usize] = true;
                    }
                }
            }
        }
        pen += glyph.advance;
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let size: u32 = match args[2].parse() {
        Ok(size) => size,
        Err(_) => {
            eprintln!("Error: invalid size '{}'", args[2]);
            print_usage();
            return;
        }
    };
    let text = args.get(3).map(String::as_str).unwrap_or("Hello, OLED!");

    let config = FontConfig::new(&args[1], size);
    let font = match config.load().and_then(|source| encode_font(&source, &config)) {
        Ok(font) => font,
        Err(err) => {
            eprintln!("ERROR {}", err);
            return;
        }
    };

    println!(
        "{} glyphs, {} bytes, text width {}px",
        font.glyphs.len(),
        font.data.len(),
        font.text_width(text)
    );

    let mut screen = vec![[false; COLUMNS]; PAGES * 8];
    draw_text(&mut screen, &font, text);
    for row in &screen {
        let line: String = row.iter().map(|&lit| if lit { '#' } else { '.' }).collect();
        println!("{}", line);
    }
}
