//! Error types for kernel setup and results extraction.

use thiserror::Error;

/// Errors raised at the marshalling boundary.
///
/// All configuration problems are rejected when a context is built, never
/// discovered mid-evaluation; the kernel itself is infallible arithmetic
/// over shapes fixed at construction.
#[derive(Debug, Error)]
pub enum FluxError {
    /// An edge advertises more neighbor cells than the table has slots for.
    #[error("edge {edge}: neighbor count {count} exceeds table width {max}")]
    NeighborCountExceedsMax {
        edge: usize,
        count: usize,
        max: usize,
    },

    /// A neighbor slot within an edge's valid range names a nonexistent cell.
    #[error("edge {edge} slot {slot}: cell index {cell} out of range (n_cells = {n_cells})")]
    CellIndexOutOfRange {
        edge: usize,
        slot: usize,
        cell: usize,
        n_cells: usize,
    },

    /// A cell's active vertical range is empty or reaches past the column.
    #[error("cell {cell}: active level range [{min}, {max}] invalid for {n_vert_levels} levels")]
    LevelRangeInvalid {
        cell: usize,
        min: usize,
        max: usize,
        n_vert_levels: usize,
    },

    /// A flat input array does not match its declared shape.
    #[error("input `{name}`: expected {expected} elements, got {actual}")]
    InputLength {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The cell mask is nonzero outside the cell's active level range.
    ///
    /// The kernel skips per-cell range checks and instead requires the mask
    /// to zero every inactive level; a violation would silently change the
    /// computed flux, so it is rejected up front.
    #[error("cell {cell}: mask nonzero at level {level}, outside the active range")]
    MaskOutsideActiveRange { cell: usize, level: usize },

    /// The caller's results buffer has the wrong length.
    #[error("results buffer: expected {expected} elements, got {actual}")]
    ResultsLength { expected: usize, actual: usize },
}
