//! Test data generators for synthetic land-cover grids.
//!
//! These generators create predictable, verifiable patterns so tests can
//! recompute the expected value of any cell from its position.

/// Creates a test grid with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// This makes it easy to verify that data is being cropped and shifted
/// correctly by checking that grid[row][col] == col * 1000 + row.
///
/// # Returns
///
/// A `Vec<f32>` in row-major order (row 0 first, then row 1, etc.)
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.len(), 50); // 10 * 5
/// assert_eq!(grid[0], 0.0);   // col=0, row=0 -> 0*1000 + 0
/// assert_eq!(grid[1], 1000.0); // col=1, row=0 -> 1*1000 + 0
/// assert_eq!(grid[10], 1.0);  // col=0, row=1 -> 0*1000 + 1
/// ```
pub fn create_test_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f32);
        }
    }
    data
}

/// Class code of the blocky land-cover pattern at (`col`, `row`).
///
/// Codes cycle through `1..=num_classes` in `block`-pixel squares, so every
/// value is a valid 8-bit class and never equals the fill value 0.
pub fn class_at(col: usize, row: usize, block: usize, num_classes: u8) -> u8 {
    let block = block.max(1);
    let n = num_classes.max(1) as usize;
    (((col / block) + (row / block) * 7) % n + 1) as u8
}

/// Creates a land-cover-like classification grid.
///
/// See [`class_at`] for the pattern. Values are stored as `f32` because that
/// is how the raster model keeps band values.
pub fn create_class_grid(width: usize, height: usize, block: usize, num_classes: u8) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push(class_at(col, row, block, num_classes) as f32);
        }
    }
    data
}
