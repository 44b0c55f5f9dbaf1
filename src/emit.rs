//! Table emitter.
//!
//! Serializes encoded images and fonts as source code for the firmware,
//! either as C++ headers for the SSD1306 driver or as Rust items.

use log::{debug, info};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use tempfile::NamedTempFile;

use crate::bitmap::EncodedImage;
use crate::error::{Error, Result};
use crate::font::EncodedFont;
use crate::packer::PageColumn;

/// Target language of the generated tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// C++ header using `OLED::Image` and `SSD1306::DynamicFont`.
    Cpp,
    /// Rust module using `Image`, `DynamicFont` and `Glyph` from the parent module.
    Rust,
}

impl Default for TableFormat {
    fn default() -> Self {
        Self::Cpp
    }
}

impl FromStr for TableFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "cpp" | "c++" | "h" | "hpp" => Ok(Self::Cpp),
            "rust" | "rs" => Ok(Self::Rust),
            _ => Err(Error::InvalidConfig(format!("unknown table format {:?}", s))),
        }
    }
}

/// The firmware addresses glyph data with a 16 bit offset.
const MAX_CPP_DATA_OFFSET: usize = u16::MAX as usize;

/// The firmware keeps character codes in a `uint8_t` and stores the end of
/// the range exclusively, so the last code must leave room for `last + 1`.
const MAX_CPP_LAST_CODE: u32 = 0xfe;

fn check_cpp_font(font: &EncodedFont) -> Result<()> {
    if font.last > MAX_CPP_LAST_CODE {
        return Err(Error::InvalidConfig(format!(
            "last character 0x{:02x} does not fit the 8 bit character range",
            font.last
        )));
    }
    if let Some(glyph) = font
        .glyphs
        .iter()
        .find(|glyph| glyph.data_offset > MAX_CPP_DATA_OFFSET)
    {
        return Err(Error::InvalidConfig(format!(
            "glyph {} starts at byte {}, glyph offsets are limited to 16 bits",
            code_label(glyph.code),
            glyph.data_offset
        )));
    }
    Ok(())
}

fn check_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "{:?} is not a valid identifier",
            name
        )))
    }
}

fn hex_bytes(data: &[PageColumn]) -> String {
    data.iter()
        .map(|b| format!("{:#04x}", b))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `// 0x41 ('A')` style label for a glyph record.
fn code_label(code: u32) -> String {
    match char::from_u32(code) {
        Some(ch) if ch.is_ascii_graphic() || ch == ' ' => format!("0x{:02x} ('{}')", code, ch),
        _ => format!("0x{:02x}", code),
    }
}

/// Write the table for an encoded image, one page per line.
pub fn write_image_table<W: Write>(
    out: &mut W,
    name: &str,
    image: &EncodedImage,
    format: TableFormat,
) -> Result<()> {
    check_name(name)?;
    debug!("emitting {:?} image table {}", format, name);

    match format {
        TableFormat::Cpp => {
            writeln!(out, "#pragma once")?;
            writeln!(out)?;
            writeln!(out, "#include <oled/image.h>")?;
            writeln!(out)?;
            writeln!(out, "namespace OLED::Resource::Image {{")?;
            writeln!(out)?;
            writeln!(out, "    static constexpr uint {}_width {{ {} }};", name, image.width)?;
            writeln!(out, "    static constexpr uint {}_height {{ {} }};", name, image.height)?;
            writeln!(
                out,
                "    static constexpr ::OLED::Image::column_type {}_data[{}] = {{",
                name,
                image.data.len()
            )?;
            for page in 0..image.pages() {
                writeln!(out, "        {},", hex_bytes(image.page(page)))?;
            }
            writeln!(out, "    }};")?;
            writeln!(out)?;
            writeln!(
                out,
                "    static constexpr ::OLED::Image {0} {{ {0}_width, {0}_height, {0}_data }};",
                name
            )?;
            writeln!(out)?;
            writeln!(out, "}}")?;
            writeln!(out)?;
        }
        TableFormat::Rust => {
            let upper = name.to_uppercase();
            writeln!(out, "// Generated by oled-assets, do not edit.")?;
            writeln!(out)?;
            writeln!(out, "use super::Image;")?;
            writeln!(out)?;
            writeln!(out, "pub const {}_WIDTH: u32 = {};", upper, image.width)?;
            writeln!(out, "pub const {}_HEIGHT: u32 = {};", upper, image.height)?;
            writeln!(
                out,
                "pub static {}_DATA: [u8; {}] = [",
                upper,
                image.data.len()
            )?;
            for page in 0..image.pages() {
                writeln!(out, "    {},", hex_bytes(image.page(page)))?;
            }
            writeln!(out, "];")?;
            writeln!(out)?;
            writeln!(
                out,
                "pub static {0}: Image = Image::new({0}_WIDTH, {0}_HEIGHT, &{0}_DATA);",
                upper
            )?;
        }
    }
    Ok(())
}

/// Write the tables for an encoded font: the shared data blob with one
/// glyph per line, the glyph records and the font itself.
pub fn write_font_table<W: Write>(
    out: &mut W,
    name: &str,
    font: &EncodedFont,
    format: TableFormat,
) -> Result<()> {
    check_name(name)?;
    debug!("emitting {:?} font table {}", format, name);

    match format {
        TableFormat::Cpp => {
            check_cpp_font(font)?;

            writeln!(out, "#pragma once")?;
            writeln!(out)?;
            writeln!(out, "#include <ssd1306/font.h>")?;
            writeln!(out)?;
            writeln!(out, "namespace OLED::Resource::Font {{")?;
            writeln!(out)?;
            writeln!(
                out,
                "    static constexpr ::SSD1306::Font::column_type _{}_data[] = {{",
                name
            )?;
            for (glyph, data) in font.glyphs.iter().filter_map(|g| font.glyph(g.code)) {
                if glyph.has_bitmap() {
                    writeln!(out, "        {},", hex_bytes(data))?;
                }
            }
            writeln!(out, "    }};")?;
            writeln!(out)?;
            writeln!(
                out,
                "    static constexpr ::SSD1306::Font::Glyph _{}_glyphs[] = {{",
                name
            )?;
            for glyph in &font.glyphs {
                writeln!(
                    out,
                    "        {{ 0x{:04x}, {}, {}, {}, {}, {} }}, // {}",
                    glyph.data_offset,
                    glyph.advance,
                    glyph.width,
                    font.pages(glyph),
                    glyph.x_off,
                    glyph.y_off,
                    code_label(glyph.code)
                )?;
            }
            writeln!(out, "    }};")?;
            writeln!(out)?;
            writeln!(out, "    static constexpr ::SSD1306::DynamicFont {} {{", name)?;
            writeln!(out, "        {}, // Size", font.size)?;
            writeln!(out, "        {}, // Ascent", font.ascent)?;
            writeln!(out, "        {}, // Descent", font.descent)?;
            writeln!(out, "        0x{:02x}u, // First char", font.first)?;
            // The firmware range check is `ch < last`.
            writeln!(out, "        0x{:02x}u, // Last char", font.last + 1)?;
            writeln!(out, "        _{}_glyphs,", name)?;
            writeln!(out, "        _{}_data", name)?;
            writeln!(out, "    }};")?;
            writeln!(out)?;
            writeln!(out, "}}")?;
            writeln!(out)?;
        }
        TableFormat::Rust => {
            let upper = name.to_uppercase();
            writeln!(out, "// Generated by oled-assets, do not edit.")?;
            writeln!(out)?;
            writeln!(out, "use super::{{DynamicFont, Glyph}};")?;
            writeln!(out)?;
            writeln!(
                out,
                "pub static {}_DATA: [u8; {}] = [",
                upper,
                font.data.len()
            )?;
            for (glyph, data) in font.glyphs.iter().filter_map(|g| font.glyph(g.code)) {
                if glyph.has_bitmap() {
                    writeln!(out, "    {},", hex_bytes(data))?;
                }
            }
            writeln!(out, "];")?;
            writeln!(out)?;
            writeln!(
                out,
                "pub static {}_GLYPHS: [Glyph; {}] = [",
                upper,
                font.glyphs.len()
            )?;
            for glyph in &font.glyphs {
                writeln!(
                    out,
                    "    Glyph {{ data_offset: 0x{:04x}, advance: {}, width: {}, height: {}, x_off: {}, y_off: {} }}, // {}",
                    glyph.data_offset,
                    glyph.advance,
                    glyph.width,
                    font.pages(glyph),
                    glyph.x_off,
                    glyph.y_off,
                    code_label(glyph.code)
                )?;
            }
            writeln!(out, "];")?;
            writeln!(out)?;
            writeln!(out, "pub static {}: DynamicFont = DynamicFont {{", upper)?;
            writeln!(out, "    size: {},", font.size)?;
            writeln!(out, "    ascent: {},", font.ascent)?;
            writeln!(out, "    descent: {},", font.descent)?;
            writeln!(out, "    first_char: 0x{:02x},", font.first)?;
            writeln!(out, "    last_char: 0x{:02x},", font.last)?;
            writeln!(out, "    glyphs: &{}_GLYPHS,", upper)?;
            writeln!(out, "    data: &{}_DATA,", upper)?;
            writeln!(out, "}};")?;
        }
    }
    Ok(())
}

/// Commit a generated table to `dest`.
///
/// Parent directories are created as needed. The contents go to a temporary
/// sibling first and are renamed into place, so `dest` is never left half
/// written. The temporary file is deleted when anything fails.
pub fn write_artifact(dest: &Path, contents: &[u8]) -> Result<()> {
    let parent = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(contents)?;
    temp.persist(dest).map_err(|err| {
        debug!("removing {} after failed write", err.file.path().display());
        Error::Io(err.error)
    })?;

    info!("Wrote {} ({} bytes)", dest.display(), contents.len());
    Ok(())
}
