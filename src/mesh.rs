//! Mesh connectivity for edge-flux evaluation.
//!
//! Holds the per-edge neighbor table (cell indices plus linear and
//! third-order coefficient rows, aligned slot-for-slot) and each cell's
//! active vertical range. Everything is validated and frozen at
//! construction; evaluation only reads.

use crate::error::FluxError;

/// Immutable connectivity and stencil coefficients.
///
/// The neighbor table is row-major with `max_adv_cells` slots per edge.
/// Only the first `n_adv_cells(edge)` slots of a row are meaningful; the
/// rest are never read.
#[derive(Clone, Debug)]
pub struct AdvectionMesh {
    n_edges: usize,
    n_cells: usize,
    n_vert_levels: usize,
    max_adv_cells: usize,
    n_adv_cells_for_edge: Vec<usize>,
    adv_cells_for_edge: Vec<usize>,
    adv_coefs: Vec<f64>,
    adv_coefs_3rd: Vec<f64>,
    min_level_cell: Vec<usize>,
    max_level_cell: Vec<usize>,
}

impl AdvectionMesh {
    /// Build and validate a mesh from flat row-major host arrays.
    ///
    /// # Arguments
    /// * `n_edges`, `n_cells`, `n_vert_levels` - mesh counts
    /// * `max_adv_cells` - neighbor slots per edge in the flat tables
    /// * `n_adv_cells_for_edge` - per-edge valid neighbor count, length `n_edges`
    /// * `min_level_cell`, `max_level_cell` - per-cell active vertical range
    ///   (0-based, inclusive), length `n_cells`
    /// * `adv_cells_for_edge` - neighbor cell indices, `n_edges * max_adv_cells`
    /// * `adv_coefs`, `adv_coefs_3rd` - stencil coefficients aligned with the
    ///   neighbor table, `n_edges * max_adv_cells`
    ///
    /// Rejects inconsistent shapes, neighbor counts wider than the table,
    /// out-of-range cell references within the valid slots, and empty or
    /// out-of-column level ranges.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        n_edges: usize,
        n_cells: usize,
        n_vert_levels: usize,
        max_adv_cells: usize,
        n_adv_cells_for_edge: &[usize],
        min_level_cell: &[usize],
        max_level_cell: &[usize],
        adv_cells_for_edge: &[usize],
        adv_coefs: &[f64],
        adv_coefs_3rd: &[f64],
    ) -> Result<Self, FluxError> {
        check_len("nAdvCellsForEdge", n_adv_cells_for_edge.len(), n_edges)?;
        check_len("minLevelCell", min_level_cell.len(), n_cells)?;
        check_len("maxLevelCell", max_level_cell.len(), n_cells)?;
        let table_len = n_edges * max_adv_cells;
        check_len("advCellsForEdge", adv_cells_for_edge.len(), table_len)?;
        check_len("advCoefs", adv_coefs.len(), table_len)?;
        check_len("advCoefs3rd", adv_coefs_3rd.len(), table_len)?;

        for (edge, &count) in n_adv_cells_for_edge.iter().enumerate() {
            if count > max_adv_cells {
                return Err(FluxError::NeighborCountExceedsMax {
                    edge,
                    count,
                    max: max_adv_cells,
                });
            }
            for slot in 0..count {
                let cell = adv_cells_for_edge[edge * max_adv_cells + slot];
                if cell >= n_cells {
                    return Err(FluxError::CellIndexOutOfRange {
                        edge,
                        slot,
                        cell,
                        n_cells,
                    });
                }
            }
        }

        for cell in 0..n_cells {
            let (min, max) = (min_level_cell[cell], max_level_cell[cell]);
            if min > max || max >= n_vert_levels {
                return Err(FluxError::LevelRangeInvalid {
                    cell,
                    min,
                    max,
                    n_vert_levels,
                });
            }
        }

        Ok(Self {
            n_edges,
            n_cells,
            n_vert_levels,
            max_adv_cells,
            n_adv_cells_for_edge: n_adv_cells_for_edge.to_vec(),
            adv_cells_for_edge: adv_cells_for_edge.to_vec(),
            adv_coefs: adv_coefs.to_vec(),
            adv_coefs_3rd: adv_coefs_3rd.to_vec(),
            min_level_cell: min_level_cell.to_vec(),
            max_level_cell: max_level_cell.to_vec(),
        })
    }

    #[inline]
    pub fn n_edges(&self) -> usize {
        self.n_edges
    }

    #[inline]
    pub fn n_cells(&self) -> usize {
        self.n_cells
    }

    #[inline]
    pub fn n_vert_levels(&self) -> usize {
        self.n_vert_levels
    }

    #[inline]
    pub fn max_adv_cells(&self) -> usize {
        self.max_adv_cells
    }

    /// Valid neighbor count for an edge.
    #[inline]
    pub fn n_adv_cells(&self, edge: usize) -> usize {
        self.n_adv_cells_for_edge[edge]
    }

    /// Neighbor cell in slot `slot` of an edge's stencil.
    #[inline]
    pub fn adv_cell(&self, edge: usize, slot: usize) -> usize {
        self.adv_cells_for_edge[edge * self.max_adv_cells + slot]
    }

    /// Linear stencil coefficient aligned with [`Self::adv_cell`].
    #[inline]
    pub fn coef_linear(&self, edge: usize, slot: usize) -> f64 {
        self.adv_coefs[edge * self.max_adv_cells + slot]
    }

    /// Third-order correction coefficient aligned with [`Self::adv_cell`].
    #[inline]
    pub fn coef_third(&self, edge: usize, slot: usize) -> f64 {
        self.adv_coefs_3rd[edge * self.max_adv_cells + slot]
    }

    /// First active level of a cell (inclusive).
    #[inline]
    pub fn min_level(&self, cell: usize) -> usize {
        self.min_level_cell[cell]
    }

    /// Last active level of a cell (inclusive).
    #[inline]
    pub fn max_level(&self, cell: usize) -> usize {
        self.max_level_cell[cell]
    }
}

fn check_len(name: &'static str, actual: usize, expected: usize) -> Result<(), FluxError> {
    if actual != expected {
        return Err(FluxError::InputLength {
            name,
            expected,
            actual,
        });
    }
    Ok(())
}
