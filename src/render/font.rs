//! Caption fonts with an ordered fallback policy.
//!
//! A TrueType face is tried from a list of candidate paths once at startup;
//! when none of them loads, a built-in 5x7 bitmap face is used instead. Both
//! expose the same measure/draw interface so centering works either way.

use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;

const GLYPH_WIDTH: usize = 5;
const GLYPH_HEIGHT: usize = 7;
/// Blank columns between built-in glyphs, in glyph units.
const GLYPH_SPACING: usize = 1;

/// Font size of captions on individual labels.
pub const LABEL_FONT_PX: f32 = 18.0;
/// Font size of captions on print sheets.
pub const SHEET_FONT_PX: f32 = 28.0;

/// Where the TrueType caption face is looked for, in order.
pub fn default_font_candidates() -> Vec<PathBuf> {
    [
        "arial.ttf",
        "Arial.ttf",
        "/usr/share/fonts/truetype/msttcorefonts/Arial.ttf",
        "/usr/share/fonts/truetype/msttcorefonts/arial.ttf",
        "/usr/share/fonts/TTF/arial.ttf",
        "/usr/share/fonts/corefonts/arial.ttf",
        "/Library/Fonts/Arial.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect()
}

/// A face at a fixed size.
#[derive(Clone)]
pub enum CaptionFont {
    TrueType { font: FontArc, scale: PxScale },
    Builtin { scale: u32 },
}

impl std::fmt::Debug for CaptionFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptionFont::TrueType { scale, .. } => f
                .debug_struct("TrueType")
                .field("scale", &scale.y)
                .finish(),
            CaptionFont::Builtin { scale } => {
                f.debug_struct("Builtin").field("scale", scale).finish()
            }
        }
    }
}

impl CaptionFont {
    /// TrueType face sized by em height, the way point sizes are usually given.
    pub fn truetype(font: FontArc, size_px: f32) -> Self {
        let scale = match font.units_per_em() {
            Some(units) if units > 0.0 => size_px * font.height_unscaled() / units,
            _ => size_px,
        };
        CaptionFont::TrueType {
            font,
            scale: PxScale::from(scale),
        }
    }

    /// Built-in bitmap face scaled so its cap height roughly tracks `size_px`.
    pub fn builtin(size_px: f32) -> Self {
        CaptionFont::Builtin {
            scale: ((size_px / 10.0).round() as u32).max(1),
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, CaptionFont::Builtin { .. })
    }

    /// Width and height of `text` in pixels.
    pub fn measure(&self, text: &str) -> (u32, u32) {
        match self {
            CaptionFont::TrueType { font, scale } => text_size(*scale, font, text),
            CaptionFont::Builtin { scale } => {
                let chars = text.chars().count();
                if chars == 0 {
                    return (0, 0);
                }
                let units = chars * (GLYPH_WIDTH + GLYPH_SPACING) - GLYPH_SPACING;
                (units as u32 * scale, GLYPH_HEIGHT as u32 * scale)
            }
        }
    }

    /// Draw `text` with its top-left corner at `(x, y)`; off-canvas parts are clipped.
    pub fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>) {
        match self {
            CaptionFont::TrueType { font, scale } => {
                draw_text_mut(canvas, color, x, y, *scale, font, text);
            }
            CaptionFont::Builtin { scale } => {
                let advance = ((GLYPH_WIDTH + GLYPH_SPACING) as u32 * scale) as i32;
                for (idx, ch) in text.chars().enumerate() {
                    draw_glyph(canvas, x + idx as i32 * advance, y, ch, color, *scale);
                }
            }
        }
    }
}

/// The two caption faces used for a run.
#[derive(Debug, Clone)]
pub struct FontSet {
    pub label: CaptionFont,
    pub sheet: CaptionFont,
}

impl FontSet {
    /// Try each candidate in order; fall back to the built-in face.
    pub fn load(candidates: &[PathBuf], label_px: f32, sheet_px: f32) -> Self {
        for path in candidates {
            match load_face(path) {
                Ok(font) => {
                    tracing::debug!(path = %path.display(), "loaded caption font");
                    return Self {
                        label: CaptionFont::truetype(font.clone(), label_px),
                        sheet: CaptionFont::truetype(font, sheet_px),
                    };
                }
                Err(reason) => {
                    tracing::debug!(path = %path.display(), %reason, "caption font unavailable");
                }
            }
        }
        tracing::debug!("using built-in caption font");
        Self::builtin(label_px, sheet_px)
    }

    pub fn builtin(label_px: f32, sheet_px: f32) -> Self {
        Self {
            label: CaptionFont::builtin(label_px),
            sheet: CaptionFont::builtin(sheet_px),
        }
    }
}

impl Default for FontSet {
    fn default() -> Self {
        Self::load(&default_font_candidates(), LABEL_FONT_PX, SHEET_FONT_PX)
    }
}

fn load_face(path: &Path) -> Result<FontArc, String> {
    let bytes = fs::read(path).map_err(|err| err.to_string())?;
    FontArc::try_from_vec(bytes).map_err(|err| err.to_string())
}

/// Horizontal offset that centers `content` within `container`, flooring like
/// integer pixel layouts do. Negative when the content is wider.
pub fn centered_x(container: u32, content: u32) -> i32 {
    (container as i32 - content as i32).div_euclid(2)
}

fn draw_glyph(image: &mut RgbImage, x: i32, y: i32, ch: char, color: Rgb<u8>, scale: u32) {
    let pattern = glyph_pattern(ch);
    for (row, bits) in pattern.iter().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                let px = x + (col as i32 * scale as i32);
                let py = y + (row as i32 * scale as i32);
                draw_filled_rect_mut(image, Rect::at(px, py).of_size(scale, scale), color);
            }
        }
    }
}

#[rustfmt::skip]
fn glyph_pattern(ch: char) -> [u8; GLYPH_HEIGHT] {
    match ch.to_ascii_uppercase() {
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00110, 0b01000, 0b10000, 0b11111],
        '3' => [0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01110],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b10010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b01010, 0b01010, 0b00100, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '&' => [0b01100, 0b10010, 0b10100, 0b01000, 0b10101, 0b10010, 0b01101],
        '/' => [0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b10000, 0b00000],
        ':' => [0b00000, 0b00100, 0b00000, 0b00000, 0b00100, 0b00000, 0b00000],
        '#' => [0b01010, 0b11111, 0b01010, 0b01010, 0b11111, 0b01010, 0b01010],
        '@' => [0b01110, 0b10001, 0b10111, 0b10101, 0b10111, 0b10000, 0b01110],
        '\'' => [0b00100, 0b00100, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000],
        '=' => [0b00000, 0b11111, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000],
        '"' => [0b01010, 0b01010, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00110, 0b00110],
        ',' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00110, 0b00100, 0b01000],
        '(' => [0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010],
        ')' => [0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000],
        '+' => [0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000, 0b00000],
        '_' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b11111, 0b00000],
        '|' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        '*' => [0b00100, 0b10101, 0b01110, 0b10101, 0b00100, 0b00000, 0b00000],
        '?' => [0b01110, 0b10001, 0b00010, 0b00100, 0b00100, 0b00000, 0b00100],
        '<' => [0b00010, 0b00100, 0b01000, 0b10000, 0b01000, 0b00100, 0b00010],
        '>' => [0b01000, 0b00100, 0b00010, 0b00001, 0b00010, 0b00100, 0b01000],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        '$' => [0b00100, 0b01111, 0b10100, 0b01110, 0b00101, 0b11110, 0b00100],
        '%' => [0b11001, 0b11010, 0b00100, 0b01000, 0b10110, 0b00110, 0b00000],
        ';' => [0b00000, 0b00100, 0b00000, 0b00000, 0b00110, 0b00100, 0b01000],
        _ => [0b00000; GLYPH_HEIGHT],
    }
}
