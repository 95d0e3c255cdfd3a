use image::RgbImage;
use image::imageops::replace;

use crate::core::palette::{INK, PAPER};
use crate::core::record::AssetRecord;
use crate::render::font::{CaptionFont, centered_x};

/// Caption band geometry for individual labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelStyle {
    /// Height added under the code for the caption.
    pub caption_band: u32,
    /// Distance from the bottom of the code to the caption's top.
    pub caption_gap: u32,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            caption_band: 50,
            caption_gap: 10,
        }
    }
}

/// A composed label and the record it was made from.
#[derive(Debug, Clone)]
pub struct LabeledImage<'r> {
    pub image: RgbImage,
    pub record: &'r AssetRecord,
}

/// Paste `code` at the top of a white canvas and center the record's caption beneath it.
pub fn compose_label<'r>(
    code: &RgbImage,
    record: &'r AssetRecord,
    font: &CaptionFont,
    style: &LabelStyle,
) -> LabeledImage<'r> {
    let (width, height) = code.dimensions();
    let mut image = RgbImage::from_pixel(width, height + style.caption_band, PAPER);
    replace(&mut image, code, 0, 0);

    let caption = record.caption();
    let (text_w, _) = font.measure(&caption);
    font.draw(
        &mut image,
        centered_x(width, text_w),
        (height + style.caption_gap) as i32,
        &caption,
        INK,
    );

    LabeledImage { image, record }
}
