//! Labeled QR codes for fixed-asset inventories, with optional A4 print sheets.

mod core;
mod generator;
mod render;

pub use crate::core::{
    AssetRecord, CellPosition, CodeEncoder, EncodeError, LayoutError, PRINT_DPI, PRODUCT_FIELD,
    PageLayoutConfig, PagePlan, QrEncoder, UID_FIELD, UNKNOWN_UID, is_dark, load_records,
    paginate, read_records,
};
pub use generator::{
    DEFAULT_INPUT, DEFAULT_OUTPUT_DIR, Generator, GeneratorConfig, Progress, RunSummary,
};
pub use render::{
    CaptionFont, FontSet, LABEL_FONT_PX, LabelStyle, LabeledImage, SHEET_FONT_PX, Sheet,
    centered_x, compose_label, default_font_candidates, fit_within, save_png,
};
