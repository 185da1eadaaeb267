//! The high-order edge-flux stencil.
//!
//! For one (edge, lane-group) unit the recipe is:
//!
//! 1. `coef2 = normalThicknessFlux · advMaskHighOrder` (lane-wise)
//! 2. `csgn` per scalar level: −1 where the thickness flux is strictly
//!    negative, +1 otherwise
//! 3. accumulate, sequentially over the edge's neighbor cells i:
//!    `edgeFlx += tracer(cell_i) · cellMask(cell_i) · coef2 · (c1_i + c3_i · csgn)`
//!    with `c3_i` pre-scaled by the global third-order weight
//!
//! The sign function is not linear, so `csgn` is always taken lane by lane
//! even though `coef2` is a lane-wide product; one representative sign per
//! lane-group would change the result wherever the flux changes sign inside
//! a group.
//!
//! The kernel performs no per-cell vertical range check: levels outside a
//! neighbor's active range contribute zero because the cell mask is zero
//! there, an invariant enforced when the fields are loaded. Neighbor
//! accumulation order is fixed (slot 0 upward), so every partitioning of
//! the unit space reproduces the same floating-point sums.

use crate::fields::FieldSet;
use crate::mesh::AdvectionMesh;
use crate::pack::Pack;

/// Flux for one (edge, lane-group) unit.
#[inline]
pub fn edge_flux_pack<const W: usize>(
    mesh: &AdvectionMesh,
    fields: &FieldSet<W>,
    coef_3rd_order: f64,
    edge: usize,
    k: usize,
) -> Pack<W> {
    let thickness = fields.thickness_flux.at(edge, k);
    let coef2 = thickness * fields.high_order_mask.at(edge, k);
    let csgn = thickness.upwind_sign();

    let mut edge_flux = Pack::ZERO;
    for slot in 0..mesh.n_adv_cells(edge) {
        let cell = mesh.adv_cell(edge, slot);
        let c1 = mesh.coef_linear(edge, slot);
        let c3 = mesh.coef_third(edge, slot) * coef_3rd_order;
        edge_flux += fields.tracer.at(cell, k) * fields.cell_mask.at(cell, k) * coef2
            * (csgn * c3 + c1);
    }
    edge_flux
}

/// Scalar reference: the same recipe over flat row-major scalar arrays,
/// one level at a time.
///
/// This is the implementation the laned kernel must match, lane widths and
/// partitionings aside. Arrays are `rows × n_vert_levels` with the level as
/// the fast index; `out` has one slot per (edge, level).
#[allow(clippy::too_many_arguments)]
pub fn edge_flux_scalar_reference(
    mesh: &AdvectionMesh,
    tracer: &[f64],
    normal_thickness_flux: &[f64],
    adv_mask_high_order: &[f64],
    cell_mask: &[f64],
    coef_3rd_order: f64,
    out: &mut [f64],
) {
    let nlev = mesh.n_vert_levels();
    debug_assert_eq!(out.len(), mesh.n_edges() * nlev);

    for edge in 0..mesh.n_edges() {
        for level in 0..nlev {
            let thickness = normal_thickness_flux[edge * nlev + level];
            let coef2 = thickness * adv_mask_high_order[edge * nlev + level];
            let csgn = if thickness < 0.0 { -1.0 } else { 1.0 };

            let mut edge_flux = 0.0;
            for slot in 0..mesh.n_adv_cells(edge) {
                let cell = mesh.adv_cell(edge, slot);
                let c1 = mesh.coef_linear(edge, slot);
                let c3 = mesh.coef_third(edge, slot) * coef_3rd_order;
                edge_flux += tracer[cell * nlev + level] * cell_mask[cell * nlev + level] * coef2
                    * (csgn * c3 + c1);
            }
            out[edge * nlev + level] = edge_flux;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// 1 edge, 2 neighbor cells, 1 level: 10·1·5·1 + 20·1·5·2 = 250.
    #[test]
    fn test_two_cell_stencil() {
        let mesh = AdvectionMesh::new(
            1,
            2,
            1,
            2,
            &[2],
            &[0, 0],
            &[0, 0],
            &[0, 1],
            &[1.0, 2.0],
            &[0.0, 0.0],
        )
        .unwrap();
        let fields =
            FieldSet::<4>::new(&mesh, &[10.0, 20.0], &[5.0], &[1.0], &[1.0, 1.0]).unwrap();

        let flux = edge_flux_pack(&mesh, &fields, 1.0, 0, 0);
        assert_relative_eq!(flux[0], 250.0);

        let mut out = [0.0];
        edge_flux_scalar_reference(
            &mesh,
            &[10.0, 20.0],
            &[5.0],
            &[1.0],
            &[1.0, 1.0],
            1.0,
            &mut out,
        );
        assert_relative_eq!(out[0], 250.0);
    }

    #[test]
    fn test_zero_neighbors_gives_zero() {
        let mesh =
            AdvectionMesh::new(1, 1, 2, 1, &[0], &[0], &[1], &[0], &[3.0], &[3.0]).unwrap();
        let fields = FieldSet::<2>::new(
            &mesh,
            &[4.0, 4.0],
            &[5.0, -5.0],
            &[1.0, 1.0],
            &[1.0, 1.0],
        )
        .unwrap();
        assert_eq!(edge_flux_pack(&mesh, &fields, 1.0, 0, 0), Pack::ZERO);
    }

    #[test]
    fn test_sign_taken_per_lane() {
        // Thickness flux changes sign inside one lane-group; with c1 = 0 the
        // flux reduces to tracer·coef2·c3·csgn and flips with it.
        let mesh = AdvectionMesh::new(
            1,
            1,
            2,
            1,
            &[1],
            &[0],
            &[1],
            &[0],
            &[0.0],
            &[1.0],
        )
        .unwrap();
        let fields = FieldSet::<2>::new(
            &mesh,
            &[3.0, 3.0],
            &[2.0, -2.0],
            &[1.0, 1.0],
            &[1.0, 1.0],
        )
        .unwrap();
        let flux = edge_flux_pack(&mesh, &fields, 1.0, 0, 0);
        // Level 0: 3·1·2·(+1) = 6; level 1: 3·1·(−2)·(−1) = 6.
        assert_relative_eq!(flux[0], 6.0);
        assert_relative_eq!(flux[1], 6.0);
    }
}
