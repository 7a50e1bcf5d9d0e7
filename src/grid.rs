use crate::{
    core::PixelRect,
    error::{SpriteError, SpriteResult},
    sheet::SheetImage,
};

/// How a sheet is partitioned into frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GridDescriptor {
    pub frame_width: u32,
    pub frame_height: u32,
    pub columns: u32,
    pub rows: u32,
    /// Gap in pixels between adjacent cells.
    pub padding: u32,
    /// Offset in pixels from the sheet edges to the first cell.
    pub margin: u32,
}

impl GridDescriptor {
    /// Check that every cell falls inside the sheet.
    pub fn validate(&self, sheet: &SheetImage) -> SpriteResult<()> {
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(SpriteError::validation(
                "grid frame_width/frame_height must be > 0",
            ));
        }
        if self.columns == 0 || self.rows == 0 {
            return Err(SpriteError::validation("grid columns/rows must be > 0"));
        }

        let span_x = u64::from(self.margin)
            + u64::from(self.columns) * u64::from(self.frame_width)
            + u64::from(self.columns - 1) * u64::from(self.padding);
        let span_y = u64::from(self.margin)
            + u64::from(self.rows) * u64::from(self.frame_height)
            + u64::from(self.rows - 1) * u64::from(self.padding);

        if span_x > u64::from(sheet.width()) || span_y > u64::from(sheet.height()) {
            return Err(SpriteError::validation(format!(
                "grid spans {span_x}x{span_y} pixels but sheet is {}x{}",
                sheet.width(),
                sheet.height()
            )));
        }
        Ok(())
    }

    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Source rectangle of the cell at (col, row).
    pub fn cell_rect(&self, col: u32, row: u32) -> PixelRect {
        PixelRect {
            x: self.margin + col * (self.frame_width + self.padding),
            y: self.margin + row * (self.frame_height + self.padding),
            width: self.frame_width,
            height: self.frame_height,
        }
    }
}

/// Columns and rows a sheet yields at the given frame size, floor division.
///
/// Total helper: a zero or oversized frame dimension yields `(0, 0)` rather
/// than an error; callers treat zero columns or rows as "no frames".
/// Remainder pixels are not part of any frame.
pub fn compute_grid(sheet: &SheetImage, frame_width: u32, frame_height: u32) -> (u32, u32) {
    if frame_width == 0 || frame_height == 0 {
        return (0, 0);
    }
    (sheet.width() / frame_width, sheet.height() / frame_height)
}

/// Candidate square frame sizes tried in order; first even divisor wins.
const AUTO_SIZES: [u32; 5] = [16, 24, 32, 48, 64];

/// Fallback frame size when nothing divides the sheet evenly.
const AUTO_DEFAULT: u32 = 32;

/// Guess a square grid for a sheet. Best-effort, never fails.
///
/// Tries `AUTO_SIZES` in order and takes the first size dividing both
/// dimensions evenly; otherwise scans `min(width, height, 64)` down to 16 and
/// takes the largest even divisor; otherwise falls back to 32. Padding is a
/// coarse single-column estimate, 0 or 1.
#[tracing::instrument(skip(sheet))]
pub fn auto_detect_grid(sheet: &SheetImage) -> GridDescriptor {
    let (width, height) = (sheet.width(), sheet.height());

    let size = AUTO_SIZES
        .iter()
        .copied()
        .find(|s| width.is_multiple_of(*s) && height.is_multiple_of(*s))
        .or_else(|| {
            let top = width.min(height).min(64);
            (16..=top)
                .rev()
                .find(|s| width.is_multiple_of(*s) && height.is_multiple_of(*s))
        })
        .unwrap_or_else(|| {
            tracing::debug!(width, height, "no even divisor, defaulting frame size");
            AUTO_DEFAULT
        });

    let padding = estimate_padding(sheet, size);
    // Each cell after the first advances by frame size + padding.
    let columns = (width + padding) / (size + padding);
    let rows = (height + padding) / (size + padding);

    tracing::debug!(size, columns, rows, padding, "auto-detected grid");

    GridDescriptor {
        frame_width: size,
        frame_height: size,
        columns,
        rows,
        padding,
        margin: 0,
    }
}

/// Coarse padding estimate: a fully transparent pixel column at the first
/// inter-frame boundary reads as a 1px gap. Single-column scan, binary result.
fn estimate_padding(sheet: &SheetImage, frame_width: u32) -> u32 {
    let x = frame_width;
    if x >= sheet.width() {
        return 0;
    }
    let transparent = (0..sheet.height()).all(|y| sheet.alpha_at(x, y) == 0);
    if transparent { 1 } else { 0 }
}
