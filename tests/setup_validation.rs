//! Integration tests for boundary validation.
//!
//! Every configuration error is rejected when the context is built;
//! nothing is discovered mid-evaluation.

use hoflux_rs::{FluxConfig, FluxContext, FluxError, FluxInput};

/// A minimal valid problem: 1 edge, 2 cells, 2 levels, 2 neighbor slots.
struct Problem {
    n_adv_cells_for_edge: Vec<usize>,
    min_level_cell: Vec<usize>,
    max_level_cell: Vec<usize>,
    adv_cells_for_edge: Vec<usize>,
    adv_coefs: Vec<f64>,
    adv_coefs_3rd: Vec<f64>,
    tracer: Vec<f64>,
    normal_thickness_flux: Vec<f64>,
    adv_mask_high_order: Vec<f64>,
    cell_mask: Vec<f64>,
}

impl Problem {
    fn valid() -> Self {
        Self {
            n_adv_cells_for_edge: vec![2],
            min_level_cell: vec![0, 0],
            max_level_cell: vec![1, 1],
            adv_cells_for_edge: vec![0, 1],
            adv_coefs: vec![0.5, 0.5],
            adv_coefs_3rd: vec![0.1, 0.1],
            tracer: vec![1.0, 2.0, 3.0, 4.0],
            normal_thickness_flux: vec![1.0, -1.0],
            adv_mask_high_order: vec![1.0, 1.0],
            cell_mask: vec![1.0, 1.0, 1.0, 1.0],
        }
    }

    fn input(&self) -> FluxInput<'_> {
        FluxInput {
            n_edges: 1,
            n_cells: 2,
            n_vert_levels: 2,
            max_adv_cells: 2,
            n_adv_cells_for_edge: &self.n_adv_cells_for_edge,
            min_level_cell: &self.min_level_cell,
            max_level_cell: &self.max_level_cell,
            adv_cells_for_edge: &self.adv_cells_for_edge,
            adv_coefs: &self.adv_coefs,
            adv_coefs_3rd: &self.adv_coefs_3rd,
            tracer: &self.tracer,
            normal_thickness_flux: &self.normal_thickness_flux,
            adv_mask_high_order: &self.adv_mask_high_order,
            cell_mask: &self.cell_mask,
        }
    }

    fn build(&self) -> Result<FluxContext<4>, FluxError> {
        FluxContext::<4>::new(FluxConfig::new(1, 1.0), &self.input())
    }
}

#[test]
fn test_valid_problem_builds() {
    assert!(Problem::valid().build().is_ok());
}

#[test]
fn test_rejects_neighbor_count_exceeding_table() {
    let mut problem = Problem::valid();
    problem.n_adv_cells_for_edge[0] = 3;
    assert!(matches!(
        problem.build().unwrap_err(),
        FluxError::NeighborCountExceedsMax {
            edge: 0,
            count: 3,
            max: 2
        }
    ));
}

#[test]
fn test_rejects_dangling_cell_reference() {
    let mut problem = Problem::valid();
    problem.adv_cells_for_edge[1] = 2;
    assert!(matches!(
        problem.build().unwrap_err(),
        FluxError::CellIndexOutOfRange {
            edge: 0,
            slot: 1,
            cell: 2,
            n_cells: 2
        }
    ));
}

#[test]
fn test_rejects_level_range_outside_column() {
    let mut problem = Problem::valid();
    problem.max_level_cell[1] = 2;
    assert!(matches!(
        problem.build().unwrap_err(),
        FluxError::LevelRangeInvalid { cell: 1, max: 2, .. }
    ));
}

#[test]
fn test_rejects_short_field_array() {
    let mut problem = Problem::valid();
    problem.tracer.pop();
    assert!(matches!(
        problem.build().unwrap_err(),
        FluxError::InputLength {
            name: "tracerCur",
            expected: 4,
            actual: 3
        }
    ));
}

#[test]
fn test_rejects_short_connectivity_array() {
    let mut problem = Problem::valid();
    problem.adv_coefs_3rd.pop();
    assert!(matches!(
        problem.build().unwrap_err(),
        FluxError::InputLength {
            name: "advCoefs3rd",
            ..
        }
    ));
}

#[test]
fn test_rejects_mask_outside_active_range() {
    let mut problem = Problem::valid();
    // Cell 1 active only at level 0, but its mask still covers level 1.
    problem.max_level_cell[1] = 0;
    assert!(matches!(
        problem.build().unwrap_err(),
        FluxError::MaskOutsideActiveRange { cell: 1, level: 1 }
    ));
}

#[test]
fn test_rejects_wrong_results_buffer_length() {
    let mut ctx = Problem::valid().build().unwrap();
    ctx.evaluate();

    let mut short = vec![0.0; 1];
    assert!(matches!(
        ctx.results(&mut short).unwrap_err(),
        FluxError::ResultsLength {
            expected: 2,
            actual: 1
        }
    ));

    let mut exact = vec![0.0; 2];
    assert!(ctx.results(&mut exact).is_ok());
}
