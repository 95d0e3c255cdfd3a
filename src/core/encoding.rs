use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use qrcode::{Color, EcLevel, QrCode};
use thiserror::Error;

use crate::core::palette::{INK, PAPER};

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("cannot encode {len}-byte payload as {symbology}: {reason}")]
    Payload {
        symbology: &'static str,
        len: usize,
        reason: String,
    },
}

/// Turns arbitrary text into a scannable bitmap.
pub trait CodeEncoder {
    fn name(&self) -> &'static str;
    fn encode(&self, text: &str) -> Result<RgbImage, EncodeError>;
}

/// QR encoder rendering square modules with a white quiet zone.
///
/// Defaults: error correction M, 8 px per module, 4-module border.
#[derive(Debug, Clone, Copy)]
pub struct QrEncoder {
    ec_level: EcLevel,
    module_px: u32,
    quiet_zone: u32,
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl QrEncoder {
    pub fn new() -> Self {
        Self {
            ec_level: EcLevel::M,
            module_px: 8,
            quiet_zone: 4,
        }
    }

    pub fn with_module_px(mut self, module_px: u32) -> Self {
        self.module_px = module_px.max(1);
        self
    }
}

impl CodeEncoder for QrEncoder {
    fn name(&self) -> &'static str {
        "QR"
    }

    fn encode(&self, text: &str) -> Result<RgbImage, EncodeError> {
        let code = QrCode::with_error_correction_level(text.as_bytes(), self.ec_level).map_err(
            |err| EncodeError::Payload {
                symbology: self.name(),
                len: text.len(),
                reason: err.to_string(),
            },
        )?;

        let modules = code.width() as u32;
        let side = (modules + 2 * self.quiet_zone) * self.module_px;
        let mut img = RgbImage::from_pixel(side, side, PAPER);

        for (idx, color) in code.to_colors().into_iter().enumerate() {
            if color != Color::Dark {
                continue;
            }
            let qx = idx as u32 % modules;
            let qy = idx as u32 / modules;
            let px = (qx + self.quiet_zone) * self.module_px;
            let py = (qy + self.quiet_zone) * self.module_px;
            draw_filled_rect_mut(
                &mut img,
                Rect::at(px as i32, py as i32).of_size(self.module_px, self.module_px),
                INK,
            );
        }

        Ok(img)
    }
}

/// True when the pixel is closer to ink than to paper.
pub fn is_dark(pixel: &Rgb<u8>) -> bool {
    let [r, g, b] = pixel.0;
    (r as u32 + g as u32 + b as u32) < 3 * 128
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qr_image_is_square_with_quiet_zone() {
        let enc = QrEncoder::new();
        let img = enc.encode("UID: A1\nProductName: Laptop").unwrap();
        assert_eq!(img.width(), img.height());
        assert_eq!(img.width() % 8, 0);
        // the border stays white
        assert!(!is_dark(img.get_pixel(0, 0)));
        assert!(!is_dark(img.get_pixel(31, 31)));
        // the top-left finder pattern starts right after the border
        assert!(is_dark(img.get_pixel(32, 32)));
    }

    #[test]
    fn module_size_scales_image() {
        let small = QrEncoder::new().with_module_px(2).encode("A1").unwrap();
        let large = QrEncoder::new().with_module_px(8).encode("A1").unwrap();
        assert_eq!(large.width(), small.width() * 4);
    }

    #[test]
    fn longer_payload_needs_larger_symbol() {
        let enc = QrEncoder::new();
        let short = enc.encode("A1").unwrap();
        let long = enc.encode(&"asset inventory line\n".repeat(20)).unwrap();
        assert!(long.width() > short.width());
    }

    #[test]
    fn oversized_payload_is_an_error() {
        let enc = QrEncoder::new();
        let err = enc.encode(&"x".repeat(8000)).unwrap_err();
        assert!(err.to_string().contains("8000-byte payload as QR"));
    }

    #[test]
    fn encoding_is_deterministic() {
        let enc = QrEncoder::new();
        assert_eq!(enc.encode("A2").unwrap(), enc.encode("A2").unwrap());
    }
}
