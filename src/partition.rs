//! Work partitioning over the (edge, lane-group) index space.
//!
//! A [`Partitioner`] enumerates every unit of the Cartesian space
//! `{0..n_edges} × {0..n_packs}` and invokes the unit computation exactly
//! once per pair, storing each unit's value into its own output slot. Units
//! are independent: no ordering is guaranteed between them and none reads
//! another's output, so the only synchronization is the join when dispatch
//! returns.
//!
//! Two realizations are provided and must produce identical results:
//!
//! - [`FlatPartitioner`] collapses the space into one linear index and
//!   spreads it across the thread pool with no fixed unit→worker grouping.
//!   This keeps wide pools fed even when the edge count alone could not.
//! - [`NestedPartitioner`] parallelizes the outer edge loop and walks the
//!   lane-groups of each edge sequentially on one worker, preserving cache
//!   locality of the per-edge neighbor rows.
//!
//! With the `parallel` feature disabled, both enumerate the same unit space
//! sequentially.

use crate::pack::Pack;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Thread pools at least this wide are treated as a throughput substrate
/// and get the flattened dispatch.
#[cfg(feature = "parallel")]
const WIDE_POOL_THREADS: usize = 16;

/// Maps the (edge, lane-group) space onto an execution substrate.
///
/// `out` must hold exactly `n_edges * n_packs` slots, laid out row-major by
/// edge. Each slot is written exactly once with `unit(edge, k)`; the write
/// set is slot-disjoint by construction, so implementations need no
/// synchronization beyond their completion join.
pub trait Partitioner<const W: usize>: Send + Sync {
    fn for_each_unit(
        &self,
        n_edges: usize,
        n_packs: usize,
        out: &mut [Pack<W>],
        unit: &(dyn Fn(usize, usize) -> Pack<W> + Sync),
    );
}

/// Flattened dispatch: one linear index over all units.
pub struct FlatPartitioner;

/// Nested dispatch: parallel over edges, sequential over lane-groups.
pub struct NestedPartitioner;

impl<const W: usize> Partitioner<W> for FlatPartitioner {
    fn for_each_unit(
        &self,
        n_edges: usize,
        n_packs: usize,
        out: &mut [Pack<W>],
        unit: &(dyn Fn(usize, usize) -> Pack<W> + Sync),
    ) {
        debug_assert_eq!(out.len(), n_edges * n_packs);
        if n_packs == 0 {
            return;
        }
        #[cfg(feature = "parallel")]
        out.par_iter_mut().enumerate().for_each(|(idx, slot)| {
            *slot = unit(idx / n_packs, idx % n_packs);
        });
        #[cfg(not(feature = "parallel"))]
        for (idx, slot) in out.iter_mut().enumerate() {
            *slot = unit(idx / n_packs, idx % n_packs);
        }
    }
}

impl<const W: usize> Partitioner<W> for NestedPartitioner {
    fn for_each_unit(
        &self,
        n_edges: usize,
        n_packs: usize,
        out: &mut [Pack<W>],
        unit: &(dyn Fn(usize, usize) -> Pack<W> + Sync),
    ) {
        debug_assert_eq!(out.len(), n_edges * n_packs);
        if n_packs == 0 {
            return;
        }
        #[cfg(feature = "parallel")]
        out.par_chunks_mut(n_packs).enumerate().for_each(|(edge, row)| {
            for (k, slot) in row.iter_mut().enumerate() {
                *slot = unit(edge, k);
            }
        });
        #[cfg(not(feature = "parallel"))]
        for (edge, row) in out.chunks_mut(n_packs).enumerate() {
            for (k, slot) in row.iter_mut().enumerate() {
                *slot = unit(edge, k);
            }
        }
    }
}

/// Which partitioner an evaluation uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Schedule {
    /// Flattened linear dispatch over all units.
    Flat,
    /// Parallel outer edge loop, sequential inner lane-group loop.
    Nested,
}

impl Schedule {
    /// Pick a schedule for the current substrate: flattened on wide thread
    /// pools, nested otherwise.
    pub fn detect() -> Self {
        #[cfg(feature = "parallel")]
        if rayon::current_num_threads() >= WIDE_POOL_THREADS {
            return Schedule::Flat;
        }
        Schedule::Nested
    }

    /// The partitioner realizing this schedule.
    pub fn partitioner<const W: usize>(self) -> &'static dyn Partitioner<W> {
        match self {
            Schedule::Flat => &FlatPartitioner,
            Schedule::Nested => &NestedPartitioner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn run(schedule: Schedule, n_edges: usize, n_packs: usize) -> (Vec<Pack<2>>, usize) {
        let mut out = vec![Pack::<2>::ZERO; n_edges * n_packs];
        let calls = AtomicUsize::new(0);
        let partitioner = schedule.partitioner::<2>();
        partitioner.for_each_unit(n_edges, n_packs, &mut out, &|edge, k| {
            calls.fetch_add(1, Ordering::Relaxed);
            Pack([edge as f64, k as f64])
        });
        (out, calls.into_inner())
    }

    #[test]
    fn test_each_unit_invoked_once_with_its_indices() {
        for schedule in [Schedule::Flat, Schedule::Nested] {
            let (out, calls) = run(schedule, 5, 3);
            assert_eq!(calls, 15);
            for edge in 0..5 {
                for k in 0..3 {
                    assert_eq!(out[edge * 3 + k], Pack([edge as f64, k as f64]));
                }
            }
        }
    }

    #[test]
    fn test_schedules_agree() {
        let (flat, _) = run(Schedule::Flat, 7, 4);
        let (nested, _) = run(Schedule::Nested, 7, 4);
        assert_eq!(flat, nested);
    }

    #[test]
    fn test_empty_spaces() {
        for schedule in [Schedule::Flat, Schedule::Nested] {
            let (out, calls) = run(schedule, 0, 3);
            assert!(out.is_empty());
            assert_eq!(calls, 0);

            let (out, calls) = run(schedule, 3, 0);
            assert!(out.is_empty());
            assert_eq!(calls, 0);
        }
    }
}
