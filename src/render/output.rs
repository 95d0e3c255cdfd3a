use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use image::RgbImage;
use png::{BitDepth, ColorType, Encoder, PixelDimensions, Unit};

use crate::core::layout::dpi_to_ppm;

/// Write an RGB image as PNG, optionally recording its print resolution.
pub fn save_png(image: &RgbImage, path: &Path, dpi: Option<u32>) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to write {}", path.display()))?;
    let mut enc = Encoder::new(BufWriter::new(file), image.width(), image.height());
    enc.set_color(ColorType::Rgb);
    enc.set_depth(BitDepth::Eight);
    if let Some(dpi) = dpi {
        let ppm = dpi_to_ppm(dpi);
        enc.set_pixel_dims(Some(PixelDimensions {
            xppu: ppm,
            yppu: ppm,
            unit: Unit::Meter,
        }));
    }
    let mut writer = enc
        .write_header()
        .with_context(|| format!("failed to write PNG header to {}", path.display()))?;
    writer
        .write_image_data(image.as_raw())
        .with_context(|| format!("failed to write PNG data to {}", path.display()))?;
    writer
        .finish()
        .with_context(|| format!("failed to finish {}", path.display()))?;
    Ok(())
}
