//! Laned 2D field storage.
//!
//! A [`PackedField`] is a dense (row × vertical level) array held one
//! [`Pack`] per level-group. Rows index edges or cells depending on the
//! field. Loading from flat row-major scalar data goes through the
//! scalarized view of the lane storage, which zero-fills the trailing
//! partial pack of each row.

use crate::error::FluxError;
use crate::mesh::AdvectionMesh;
use crate::pack::{scalarize, scalarize_mut, Pack, LANE_WIDTH};

/// Dense 2D array stored as `n_packs` lane-groups per row.
#[derive(Clone, Debug)]
pub struct PackedField<const W: usize = LANE_WIDTH> {
    data: Vec<Pack<W>>,
    n_rows: usize,
    n_levels: usize,
    n_packs: usize,
}

impl<const W: usize> PackedField<W> {
    /// Zero-filled field.
    pub fn zeros(n_rows: usize, n_levels: usize) -> Self {
        let n_packs = Pack::<W>::num_packs(n_levels);
        Self {
            data: vec![Pack::ZERO; n_rows * n_packs],
            n_rows,
            n_levels,
            n_packs,
        }
    }

    /// Load from a flat row-major scalar array of shape `n_rows × n_levels`.
    ///
    /// Excess lanes in each row's trailing pack are zero.
    pub fn from_scalar(
        name: &'static str,
        raw: &[f64],
        n_rows: usize,
        n_levels: usize,
    ) -> Result<Self, FluxError> {
        let expected = n_rows * n_levels;
        if raw.len() != expected {
            return Err(FluxError::InputLength {
                name,
                expected,
                actual: raw.len(),
            });
        }
        let mut field = Self::zeros(n_rows, n_levels);
        let padded = field.n_packs * W;
        let scalar = scalarize_mut(&mut field.data);
        for row in 0..n_rows {
            scalar[row * padded..row * padded + n_levels]
                .copy_from_slice(&raw[row * n_levels..(row + 1) * n_levels]);
        }
        Ok(field)
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[inline]
    pub fn n_levels(&self) -> usize {
        self.n_levels
    }

    #[inline]
    pub fn n_packs(&self) -> usize {
        self.n_packs
    }

    /// Lane-group `k` of `row`.
    #[inline]
    pub fn at(&self, row: usize, k: usize) -> Pack<W> {
        self.data[row * self.n_packs + k]
    }

    /// All lane-groups of `row`.
    #[inline]
    pub fn row(&self, row: usize) -> &[Pack<W>] {
        &self.data[row * self.n_packs..(row + 1) * self.n_packs]
    }

    /// Scalar view of `row`, trimmed to the valid `n_levels` entries.
    #[inline]
    pub fn scalar_row(&self, row: usize) -> &[f64] {
        &scalarize(self.row(row))[..self.n_levels]
    }

    /// The whole laned storage, for partitioned writes.
    #[inline]
    pub fn packs_mut(&mut self) -> &mut [Pack<W>] {
        &mut self.data
    }

    /// Copy the valid scalar entries into a flat `n_rows × n_levels` buffer.
    pub fn copy_scalar_into(&self, out: &mut [f64]) {
        debug_assert_eq!(out.len(), self.n_rows * self.n_levels);
        if self.n_levels == 0 {
            return;
        }
        for (row, chunk) in out.chunks_exact_mut(self.n_levels).enumerate() {
            chunk.copy_from_slice(self.scalar_row(row));
        }
    }
}

/// The read-only physical fields one evaluation consumes.
///
/// Tracer concentration and activity mask are per cell; normal thickness
/// flux and the high-order advection mask are per edge.
#[derive(Clone, Debug)]
pub struct FieldSet<const W: usize = LANE_WIDTH> {
    pub tracer: PackedField<W>,
    pub cell_mask: PackedField<W>,
    pub thickness_flux: PackedField<W>,
    pub high_order_mask: PackedField<W>,
}

impl<const W: usize> FieldSet<W> {
    /// Load all fields from flat row-major scalar arrays and verify the
    /// mask/extent invariant.
    ///
    /// The kernel performs no per-cell vertical range check; it relies on
    /// the cell mask being exactly zero outside each cell's active range,
    /// so that is enforced here instead of trusted.
    pub fn new(
        mesh: &AdvectionMesh,
        tracer: &[f64],
        normal_thickness_flux: &[f64],
        adv_mask_high_order: &[f64],
        cell_mask: &[f64],
    ) -> Result<Self, FluxError> {
        let (n_cells, n_edges, n_levels) = (mesh.n_cells(), mesh.n_edges(), mesh.n_vert_levels());
        let fields = Self {
            tracer: PackedField::from_scalar("tracerCur", tracer, n_cells, n_levels)?,
            cell_mask: PackedField::from_scalar("cellMask", cell_mask, n_cells, n_levels)?,
            thickness_flux: PackedField::from_scalar(
                "normalThicknessFlux",
                normal_thickness_flux,
                n_edges,
                n_levels,
            )?,
            high_order_mask: PackedField::from_scalar(
                "advMaskHighOrder",
                adv_mask_high_order,
                n_edges,
                n_levels,
            )?,
        };

        for cell in 0..n_cells {
            let (min, max) = (mesh.min_level(cell), mesh.max_level(cell));
            for (level, &mask) in fields.cell_mask.scalar_row(cell).iter().enumerate() {
                if (level < min || level > max) && mask != 0.0 {
                    return Err(FluxError::MaskOutsideActiveRange { cell, level });
                }
            }
        }

        Ok(fields)
    }
}
