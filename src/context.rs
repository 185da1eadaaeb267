//! Owned evaluation context and the host marshalling boundary.
//!
//! [`FluxContext::new`] is the initialization call: it validates the host
//! arrays, copies them into the laned internal representation, and
//! allocates the output. [`FluxContext::evaluate`] runs the configured
//! iteration count, each iteration a fresh total recomputation of the
//! output. [`FluxContext::results`] scalarizes the output back into a
//! caller buffer. Teardown is `Drop`.
//!
//! There is no ambient global: everything an evaluation touches lives in
//! the context, so use-before-init and double-teardown are unrepresentable
//! rather than runtime errors.

use crate::error::FluxError;
use crate::fields::{FieldSet, PackedField};
use crate::flux::edge_flux_pack;
use crate::mesh::AdvectionMesh;
use crate::pack::LANE_WIDTH;
use crate::partition::Schedule;

/// Evaluation configuration.
#[derive(Clone, Copy, Debug)]
pub struct FluxConfig {
    /// Number of full recomputations per [`FluxContext::evaluate`] call.
    pub n_iters: usize,
    /// Global weight applied to every third-order correction coefficient.
    pub coef_3rd_order: f64,
    /// Work-partitioning schedule.
    pub schedule: Schedule,
}

impl FluxConfig {
    /// Configuration with the schedule picked for the current substrate.
    pub fn new(n_iters: usize, coef_3rd_order: f64) -> Self {
        Self {
            n_iters,
            coef_3rd_order,
            schedule: Schedule::detect(),
        }
    }

    /// Override the schedule.
    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }
}

/// Flat row-major host arrays handed across the boundary.
///
/// Shapes: per-edge arrays are `n_edges` (or `n_edges × max_adv_cells` for
/// the neighbor table and coefficients), per-cell arrays are `n_cells`, and
/// 2D fields are `rows × n_vert_levels` with the level as the fast index.
/// All indices are 0-based.
#[derive(Clone, Copy, Debug)]
pub struct FluxInput<'a> {
    pub n_edges: usize,
    pub n_cells: usize,
    pub n_vert_levels: usize,
    pub max_adv_cells: usize,
    pub n_adv_cells_for_edge: &'a [usize],
    pub min_level_cell: &'a [usize],
    pub max_level_cell: &'a [usize],
    pub adv_cells_for_edge: &'a [usize],
    pub adv_coefs: &'a [f64],
    pub adv_coefs_3rd: &'a [f64],
    pub tracer: &'a [f64],
    pub normal_thickness_flux: &'a [f64],
    pub adv_mask_high_order: &'a [f64],
    pub cell_mask: &'a [f64],
}

/// An initialized, immutable problem plus its output array.
///
/// `W` is the lane width; the default matches the crate-wide
/// [`LANE_WIDTH`]. Inputs never change after construction, each evaluation
/// only overwrites the output, and dropping the context releases
/// everything.
#[derive(Debug)]
pub struct FluxContext<const W: usize = LANE_WIDTH> {
    config: FluxConfig,
    mesh: AdvectionMesh,
    fields: FieldSet<W>,
    output: PackedField<W>,
}

impl<const W: usize> FluxContext<W> {
    /// Initialize from host arrays.
    ///
    /// Every configuration error (shape mismatches, over-wide neighbor
    /// counts, dangling cell references, invalid level ranges, a mask that
    /// is nonzero outside a cell's active range) is rejected here; nothing
    /// is validated again during evaluation.
    pub fn new(config: FluxConfig, input: &FluxInput<'_>) -> Result<Self, FluxError> {
        let mesh = AdvectionMesh::new(
            input.n_edges,
            input.n_cells,
            input.n_vert_levels,
            input.max_adv_cells,
            input.n_adv_cells_for_edge,
            input.min_level_cell,
            input.max_level_cell,
            input.adv_cells_for_edge,
            input.adv_coefs,
            input.adv_coefs_3rd,
        )?;
        let fields = FieldSet::new(
            &mesh,
            input.tracer,
            input.normal_thickness_flux,
            input.adv_mask_high_order,
            input.cell_mask,
        )?;
        let output = PackedField::zeros(mesh.n_edges(), mesh.n_vert_levels());
        Ok(Self {
            config,
            mesh,
            fields,
            output,
        })
    }

    /// Run the configured number of iterations.
    ///
    /// Each iteration overwrites the whole output array through the
    /// configured partitioner; the dispatch join is the only barrier
    /// between an iteration and the next.
    pub fn evaluate(&mut self) {
        for _ in 0..self.config.n_iters {
            self.evaluate_once();
        }
    }

    fn evaluate_once(&mut self) {
        let mesh = &self.mesh;
        let fields = &self.fields;
        let coef_3rd_order = self.config.coef_3rd_order;
        let n_packs = self.output.n_packs();
        self.config.schedule.partitioner::<W>().for_each_unit(
            mesh.n_edges(),
            n_packs,
            self.output.packs_mut(),
            &|edge, k| edge_flux_pack(mesh, fields, coef_3rd_order, edge, k),
        );
    }

    /// Copy the output into a flat `n_edges × n_vert_levels` scalar buffer.
    pub fn results(&self, out: &mut [f64]) -> Result<(), FluxError> {
        let expected = self.mesh.n_edges() * self.mesh.n_vert_levels();
        if out.len() != expected {
            return Err(FluxError::ResultsLength {
                expected,
                actual: out.len(),
            });
        }
        self.output.copy_scalar_into(out);
        Ok(())
    }

    #[inline]
    pub fn mesh(&self) -> &AdvectionMesh {
        &self.mesh
    }

    #[inline]
    pub fn config(&self) -> &FluxConfig {
        &self.config
    }
}
