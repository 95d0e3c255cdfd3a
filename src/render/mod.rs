//! Raster composition: caption fonts, individual labels, print sheets and PNG output.

mod font;
mod label;
mod output;
mod sheet;

pub use font::{
    CaptionFont, FontSet, LABEL_FONT_PX, SHEET_FONT_PX, centered_x, default_font_candidates,
};
pub use label::{LabelStyle, LabeledImage, compose_label};
pub use output::save_png;
pub use sheet::{Sheet, fit_within};
