//! # hoflux-rs
//!
//! High-order tracer-advection edge flux for layered unstructured meshes.
//!
//! This crate provides the building blocks for the flux evaluation:
//! - Fixed-width level packs with zero-copy lane/scalar views
//! - Immutable mesh connectivity (edge-neighbor stencils, cell extents)
//! - Laned field storage loaded from flat host arrays
//! - Work partitioning of the (edge, lane-group) space (flattened or
//!   nested dispatch)
//! - The flux stencil kernel and a scalar reference implementation
//! - An owned evaluation context wrapping init/evaluate/results
//!
//! The same kernel runs under every partitioning; the partitioners differ
//! only in how units are mapped onto workers, so all of them produce
//! identical output arrays.

pub mod context;
pub mod error;
pub mod fields;
pub mod flux;
pub mod mesh;
pub mod pack;
pub mod partition;

// Re-export main types for convenience
pub use context::{FluxConfig, FluxContext, FluxInput};
pub use error::FluxError;
pub use fields::{FieldSet, PackedField};
pub use flux::{edge_flux_pack, edge_flux_scalar_reference};
pub use mesh::AdvectionMesh;
pub use pack::{scalarize, scalarize_mut, Pack, LANE_WIDTH};
pub use partition::{FlatPartitioner, NestedPartitioner, Partitioner, Schedule};
