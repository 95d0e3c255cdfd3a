//! Print-sheet geometry and pagination arithmetic.
//!
//! Everything here is pure: given a [`PageLayoutConfig`] and a record count,
//! the page split and every cell position are fully determined.

use std::ops::Range;

use thiserror::Error;

/// Resolution print sheets are rendered at and tagged with.
pub const PRINT_DPI: u32 = 300;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("page layout needs at least one column")]
    NoColumns,
    #[error("page layout needs a non-zero cell size")]
    EmptyCell,
    #[error("canvas {width}x{height} has no drawable area")]
    EmptyCanvas { width: u32, height: u32 },
    #[error(
        "canvas height {canvas_height} with margin {margin} cannot fit a single {row_height}px row"
    )]
    NoRowFits {
        canvas_height: u32,
        margin: u32,
        row_height: u64,
    },
    #[error("{columns} columns need {required}px but the canvas is {canvas_width}px wide")]
    ColumnsOverflow {
        columns: u32,
        required: u64,
        canvas_width: u32,
    },
    #[error("sheet is full ({capacity} cells)")]
    SheetFull { capacity: usize },
}

/// Geometry of a printable sheet, all values in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayoutConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub margin: u32,
    pub spacing_x: u32,
    pub spacing_y: u32,
    pub cell_size: u32,
    /// Extra height reserved under each cell for its caption.
    pub caption_band: u32,
    pub columns: u32,
    pub dpi: u32,
}

impl Default for PageLayoutConfig {
    fn default() -> Self {
        Self::A4_PRINT
    }
}

/// Position of one slot within a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPosition {
    pub row: u32,
    pub col: u32,
    pub x: u32,
    pub y: u32,
}

/// Contiguous slice of the record sequence that lands on one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagePlan {
    /// 1-based page number used in output names.
    pub number: usize,
    pub records: Range<usize>,
}

impl PageLayoutConfig {
    /// A4 portrait (8.27 x 11.69 in) at 300 DPI with three large codes per row.
    pub const A4_PRINT: PageLayoutConfig = PageLayoutConfig {
        canvas_width: 2481,
        canvas_height: 3507,
        margin: 100,
        spacing_x: 80,
        spacing_y: 80,
        cell_size: 650,
        caption_band: 40,
        columns: 3,
        dpi: PRINT_DPI,
    };

    /// Vertical pitch between rows. Widened so extreme values cannot overflow.
    pub fn row_height(&self) -> u64 {
        self.cell_size as u64 + self.caption_band as u64 + self.spacing_y as u64
    }

    pub fn rows_per_page(&self) -> u32 {
        let usable = (self.canvas_height as u64).saturating_sub(2 * self.margin as u64);
        usable.checked_div(self.row_height()).unwrap_or(0) as u32
    }

    pub fn cells_per_page(&self) -> usize {
        self.columns as usize * self.rows_per_page() as usize
    }

    /// Check that at least one full cell fits before anything is drawn.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.columns == 0 {
            return Err(LayoutError::NoColumns);
        }
        if self.cell_size == 0 {
            return Err(LayoutError::EmptyCell);
        }
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(LayoutError::EmptyCanvas {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        if self.rows_per_page() == 0 {
            return Err(LayoutError::NoRowFits {
                canvas_height: self.canvas_height,
                margin: self.margin,
                row_height: self.row_height(),
            });
        }
        let required = (2 * self.margin as u64)
            .saturating_add(self.columns as u64 * self.cell_size as u64)
            .saturating_add((self.columns as u64 - 1).saturating_mul(self.spacing_x as u64));
        if required > self.canvas_width as u64 {
            return Err(LayoutError::ColumnsOverflow {
                columns: self.columns,
                required,
                canvas_width: self.canvas_width,
            });
        }
        Ok(())
    }

    pub fn total_pages(&self, records: usize) -> usize {
        match self.cells_per_page() {
            0 => 0,
            per_page => records.div_ceil(per_page),
        }
    }

    /// Top-left corner of slot `slot` (row-major) on a page. Coordinates
    /// saturate for slots outside a validated layout.
    pub fn cell_origin(&self, slot: usize) -> CellPosition {
        let columns = self.columns.max(1) as usize;
        let row = (slot / columns) as u32;
        let col = (slot % columns) as u32;
        let pitch_x = self.cell_size as u64 + self.spacing_x as u64;
        let x = (self.margin as u64).saturating_add((col as u64).saturating_mul(pitch_x));
        let y = (self.margin as u64).saturating_add((row as u64).saturating_mul(self.row_height()));
        CellPosition {
            row,
            col,
            x: x.min(u32::MAX as u64) as u32,
            y: y.min(u32::MAX as u64) as u32,
        }
    }
}

/// Split `records` items into per-page ranges, preserving order.
pub fn paginate(records: usize, config: &PageLayoutConfig) -> Result<Vec<PagePlan>, LayoutError> {
    config.validate()?;
    let per_page = config.cells_per_page();
    Ok((0..config.total_pages(records))
        .map(|page| PagePlan {
            number: page + 1,
            records: page * per_page..((page + 1) * per_page).min(records),
        })
        .collect())
}

/// Pixels per metre, the unit PNG stores physical resolution in.
pub fn dpi_to_ppm(dpi: u32) -> u32 {
    (dpi as f64 / 0.0254).round() as u32
}
