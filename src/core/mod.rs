//! Core domain primitives: asset records, code encoding and page layout.

pub mod encoding;
pub mod layout;
pub mod palette;
pub mod record;

pub use encoding::{CodeEncoder, EncodeError, QrEncoder, is_dark};
pub use layout::{CellPosition, LayoutError, PRINT_DPI, PageLayoutConfig, PagePlan, paginate};
pub use record::{AssetRecord, PRODUCT_FIELD, UID_FIELD, UNKNOWN_UID, load_records, read_records};
