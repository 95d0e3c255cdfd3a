use image::Rgb;

/// Background of labels and sheets.
pub const PAPER: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);
/// Code modules and caption text.
pub const INK: Rgb<u8> = Rgb([0x00, 0x00, 0x00]);
