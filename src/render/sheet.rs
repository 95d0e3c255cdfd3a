//! Print sheets: a fixed-size canvas filled cell by cell in row-major order.

use image::RgbImage;
use image::imageops::{self, FilterType};

use crate::core::layout::{CellPosition, LayoutError, PageLayoutConfig};
use crate::core::palette::{INK, PAPER};
use crate::render::font::{CaptionFont, centered_x};

/// Gap between a placed code and its caption on the sheet.
const CAPTION_GAP: u32 = 10;

/// One page under construction.
pub struct Sheet<'a> {
    canvas: RgbImage,
    config: &'a PageLayoutConfig,
    font: &'a CaptionFont,
    placed: Vec<CellPosition>,
}

impl<'a> Sheet<'a> {
    /// Blank page. The configuration must already be validated.
    pub fn new(config: &'a PageLayoutConfig, font: &'a CaptionFont) -> Self {
        Self {
            canvas: RgbImage::from_pixel(config.canvas_width, config.canvas_height, PAPER),
            config,
            font,
            placed: Vec::with_capacity(config.cells_per_page()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.config.cells_per_page()
    }

    pub fn placed(&self) -> &[CellPosition] {
        &self.placed
    }

    pub fn is_full(&self) -> bool {
        self.placed.len() >= self.capacity()
    }

    /// Put `code` into the next free cell, shrunk to fit, with `caption` centered under it.
    pub fn place(&mut self, code: &RgbImage, caption: &str) -> Result<CellPosition, LayoutError> {
        if self.is_full() {
            return Err(LayoutError::SheetFull {
                capacity: self.capacity(),
            });
        }
        let position = self.config.cell_origin(self.placed.len());
        let fitted = fit_within(code, self.config.cell_size);
        let code = fitted.as_ref().unwrap_or(code);
        imageops::replace(&mut self.canvas, code, position.x as i64, position.y as i64);

        let (text_w, _) = self.font.measure(caption);
        let text_x = position.x as i32 + centered_x(code.width(), text_w);
        let text_y = (position.y + code.height() + CAPTION_GAP) as i32;
        self.font.draw(&mut self.canvas, text_x, text_y, caption, INK);

        self.placed.push(position);
        Ok(position)
    }

    pub fn into_image(self) -> RgbImage {
        self.canvas
    }
}

/// Downscale `image` to fit a `max_side` square, preserving aspect ratio.
/// Returns `None` when it already fits; images are never enlarged.
pub fn fit_within(image: &RgbImage, max_side: u32) -> Option<RgbImage> {
    let (width, height) = image.dimensions();
    if width <= max_side && height <= max_side {
        return None;
    }
    let ratio = (max_side as f64 / width as f64).min(max_side as f64 / height as f64);
    let new_width = ((width as f64 * ratio).round() as u32).clamp(1, max_side);
    let new_height = ((height as f64 * ratio).round() as u32).clamp(1, max_side);
    Some(imageops::resize(image, new_width, new_height, FilterType::Lanczos3))
}
