use crate::{
    core::{PixelRect, StripDirection},
    error::{SpriteError, SpriteResult},
    grid::GridDescriptor,
    sheet::{Frame, SheetImage},
};

/// Cut a sheet into frames along a grid, row-major.
///
/// `selection` is an optional row-major per-cell mask; cells marked `false`
/// are omitted from the output entirely, not replaced by blanks. Output order
/// is row-major among the selected cells. Fails fast on an invalid grid or a
/// mask of the wrong length; no partial output is produced.
#[tracing::instrument(skip(sheet, selection))]
pub fn extract_frames(
    sheet: &SheetImage,
    grid: &GridDescriptor,
    selection: Option<&[bool]>,
) -> SpriteResult<Vec<Frame>> {
    grid.validate(sheet)?;
    if let Some(mask) = selection
        && mask.len() != grid.cell_count()
    {
        return Err(SpriteError::validation(format!(
            "selection mask has {} cells, grid has {}",
            mask.len(),
            grid.cell_count()
        )));
    }

    let mut frames = Vec::with_capacity(grid.cell_count());
    for row in 0..grid.rows {
        for col in 0..grid.columns {
            if let Some(mask) = selection {
                let cell = (row * grid.columns + col) as usize;
                if !mask[cell] {
                    continue;
                }
            }
            frames.push(copy_region(sheet, grid.cell_rect(col, row)));
        }
    }

    tracing::debug!(frames = frames.len(), "extracted");
    Ok(frames)
}

/// Cut a single-strip sheet into `columns * rows` equal cells.
///
/// Frame size is derived from the sheet dimensions by floor division.
/// `Vertical` iterates column-major (col 0 row 0, col 0 row 1, ...),
/// `Horizontal` row-major.
#[tracing::instrument(skip(sheet))]
pub fn extract_frames_with_direction(
    sheet: &SheetImage,
    columns: u32,
    rows: u32,
    direction: StripDirection,
) -> SpriteResult<Vec<Frame>> {
    if columns == 0 || rows == 0 {
        return Err(SpriteError::validation("strip columns/rows must be > 0"));
    }
    let frame_width = sheet.width() / columns;
    let frame_height = sheet.height() / rows;
    if frame_width == 0 || frame_height == 0 {
        return Err(SpriteError::validation(format!(
            "sheet {}x{} is too small for {columns}x{rows} cells",
            sheet.width(),
            sheet.height()
        )));
    }

    let cell = |col: u32, row: u32| {
        copy_region(
            sheet,
            PixelRect {
                x: col * frame_width,
                y: row * frame_height,
                width: frame_width,
                height: frame_height,
            },
        )
    };

    let mut frames = Vec::with_capacity(columns as usize * rows as usize);
    match direction {
        StripDirection::Horizontal => {
            for row in 0..rows {
                for col in 0..columns {
                    frames.push(cell(col, row));
                }
            }
        }
        StripDirection::Vertical => {
            for col in 0..columns {
                for row in 0..rows {
                    frames.push(cell(col, row));
                }
            }
        }
    }
    Ok(frames)
}

/// Shrink a frame to the minimal bounding box of its `alpha > 0` pixels.
///
/// A fully transparent frame is returned unchanged rather than collapsing to
/// a zero-size image. Bounds are inclusive.
pub fn tight_crop(frame: &Frame) -> Frame {
    let mut min_x = frame.width;
    let mut min_y = frame.height;
    let mut max_x = 0u32;
    let mut max_y = 0u32;
    let mut any = false;

    for y in 0..frame.height {
        for x in 0..frame.width {
            if frame.alpha_at(x, y) > 0 {
                any = true;
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
        }
    }

    if !any {
        return frame.clone();
    }

    let width = max_x - min_x + 1;
    let height = max_y - min_y + 1;
    let src_stride = frame.width as usize * 4;
    let mut rgba8 = Vec::with_capacity(width as usize * height as usize * 4);
    for y in min_y..=max_y {
        let start = y as usize * src_stride + min_x as usize * 4;
        rgba8.extend_from_slice(&frame.rgba8[start..start + width as usize * 4]);
    }

    Frame {
        width,
        height,
        rgba8,
    }
}

fn copy_region(sheet: &SheetImage, rect: PixelRect) -> Frame {
    let src = sheet.rgba8();
    let stride = sheet.width() as usize * 4;
    let mut rgba8 = Vec::with_capacity(rect.width as usize * rect.height as usize * 4);
    for y in rect.y..rect.bottom() {
        let start = y as usize * stride + rect.x as usize * 4;
        rgba8.extend_from_slice(&src[start..start + rect.width as usize * 4]);
    }
    Frame {
        width: rect.width,
        height: rect.height,
        rgba8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2x2 grid of 2x2 cells, each cell filled with a distinct color.
    fn quad_sheet() -> SheetImage {
        let colors: [[u8; 4]; 4] = [
            [255, 0, 0, 255],
            [0, 255, 0, 255],
            [0, 0, 255, 255],
            [255, 255, 0, 255],
        ];
        let mut rgba = vec![0u8; 4 * 4 * 4];
        for y in 0..4usize {
            for x in 0..4usize {
                let cell = (y / 2) * 2 + x / 2;
                rgba[(y * 4 + x) * 4..(y * 4 + x) * 4 + 4].copy_from_slice(&colors[cell]);
            }
        }
        SheetImage::from_rgba8(4, 4, rgba).unwrap()
    }

    fn quad_grid() -> GridDescriptor {
        GridDescriptor {
            frame_width: 2,
            frame_height: 2,
            columns: 2,
            rows: 2,
            padding: 0,
            margin: 0,
        }
    }

    #[test]
    fn extract_is_row_major_and_pixel_exact() {
        let frames = extract_frames(&quad_sheet(), &quad_grid(), None).unwrap();
        assert_eq!(frames.len(), 4);
        for frame in &frames {
            assert_eq!((frame.width, frame.height), (2, 2));
        }
        // Row-major: red, green, blue, yellow.
        assert_eq!(&frames[0].rgba8[..4], &[255, 0, 0, 255]);
        assert_eq!(&frames[1].rgba8[..4], &[0, 255, 0, 255]);
        assert_eq!(&frames[2].rgba8[..4], &[0, 0, 255, 255]);
        assert_eq!(&frames[3].rgba8[..4], &[255, 255, 0, 255]);
        // Each cell is a solid fill.
        for frame in &frames {
            for px in frame.rgba8.chunks_exact(4) {
                assert_eq!(px, &frame.rgba8[..4]);
            }
        }
    }

    #[test]
    fn extract_is_idempotent() {
        let sheet = quad_sheet();
        let grid = quad_grid();
        let a = extract_frames(&sheet, &grid, None).unwrap();
        let b = extract_frames(&sheet, &grid, None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn selection_mask_omits_cells() {
        let mask = [true, false, false, true];
        let frames = extract_frames(&quad_sheet(), &quad_grid(), Some(&mask)).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(&frames[0].rgba8[..4], &[255, 0, 0, 255]);
        assert_eq!(&frames[1].rgba8[..4], &[255, 255, 0, 255]);
    }

    #[test]
    fn selection_mask_length_is_checked() {
        let mask = [true, false];
        assert!(extract_frames(&quad_sheet(), &quad_grid(), Some(&mask)).is_err());
    }

    #[test]
    fn extract_rejects_invalid_grid() {
        let mut grid = quad_grid();
        grid.frame_width = 0;
        assert!(extract_frames(&quad_sheet(), &grid, None).is_err());

        let mut grid = quad_grid();
        grid.columns = 5;
        assert!(extract_frames(&quad_sheet(), &grid, None).is_err());
    }

    #[test]
    fn extract_respects_padding_and_margin() {
        // 5x2 sheet: 1px margin, two 1x1 cells separated by 1px padding.
        let rgba = vec![
            0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, //
            0, 0, 0, 0, 10, 10, 10, 255, 0, 0, 0, 0, 20, 20, 20, 255, 0, 0, 0, 0,
        ];
        let sheet = SheetImage::from_rgba8(5, 2, rgba).unwrap();
        let grid = GridDescriptor {
            frame_width: 1,
            frame_height: 1,
            columns: 2,
            rows: 1,
            padding: 1,
            margin: 1,
        };
        let frames = extract_frames(&sheet, &grid, None).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].rgba8, vec![10, 10, 10, 255]);
        assert_eq!(frames[1].rgba8, vec![20, 20, 20, 255]);
    }

    #[test]
    fn vertical_strip_is_column_major() {
        let frames =
            extract_frames_with_direction(&quad_sheet(), 2, 2, StripDirection::Vertical).unwrap();
        // Column-major: red, blue, green, yellow.
        assert_eq!(&frames[0].rgba8[..4], &[255, 0, 0, 255]);
        assert_eq!(&frames[1].rgba8[..4], &[0, 0, 255, 255]);
        assert_eq!(&frames[2].rgba8[..4], &[0, 255, 0, 255]);
        assert_eq!(&frames[3].rgba8[..4], &[255, 255, 0, 255]);
    }

    #[test]
    fn horizontal_strip_matches_grid_order() {
        let a = extract_frames_with_direction(&quad_sheet(), 2, 2, StripDirection::Horizontal)
            .unwrap();
        let b = extract_frames(&quad_sheet(), &quad_grid(), None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn strip_extraction_rejects_degenerate_cells() {
        assert!(extract_frames_with_direction(&quad_sheet(), 0, 1, StripDirection::Horizontal)
            .is_err());
        assert!(extract_frames_with_direction(&quad_sheet(), 8, 1, StripDirection::Horizontal)
            .is_err());
    }

    #[test]
    fn tight_crop_transparent_frame_is_a_noop() {
        let frame = Frame::from_rgba8(3, 3, vec![0u8; 36]).unwrap();
        let cropped = tight_crop(&frame);
        assert_eq!(cropped, frame);
    }

    #[test]
    fn tight_crop_single_pixel() {
        let mut rgba = vec![0u8; 4 * 4 * 4];
        let (x, y) = (2usize, 1usize);
        rgba[(y * 4 + x) * 4..(y * 4 + x) * 4 + 4].copy_from_slice(&[9, 9, 9, 200]);
        let frame = Frame::from_rgba8(4, 4, rgba).unwrap();

        let cropped = tight_crop(&frame);
        assert_eq!((cropped.width, cropped.height), (1, 1));
        assert_eq!(cropped.rgba8, vec![9, 9, 9, 200]);
    }

    #[test]
    fn tight_crop_bounding_box_is_inclusive() {
        // Opaque pixels at (1,1) and (2,3) inside a 4x5 frame.
        let mut rgba = vec![0u8; 4 * 5 * 4];
        for (x, y) in [(1usize, 1usize), (2, 3)] {
            rgba[(y * 4 + x) * 4 + 3] = 255;
        }
        let frame = Frame::from_rgba8(4, 5, rgba).unwrap();

        let cropped = tight_crop(&frame);
        assert_eq!((cropped.width, cropped.height), (2, 3));
        assert_eq!(cropped.alpha_at(0, 0), 255);
        assert_eq!(cropped.alpha_at(1, 2), 255);
        assert_eq!(cropped.alpha_at(1, 0), 0);
    }
}
