//! Fixed-width vertical-level packs.
//!
//! A [`Pack`] bundles `W` consecutive vertical levels into one vector lane
//! so that level-loop arithmetic runs lane-parallel. Storage is laned
//! (`n_packs = ceil(n_levels / W)` packs per row), and [`scalarize`] /
//! [`scalarize_mut`] reinterpret the same storage as one scalar per level:
//! scalar level `k` lives in lane `k % W` of pack `k / W`.
//!
//! The reinterpretation is zero-copy (a `bytemuck` slice cast over the
//! `#[repr(transparent)]` lane array), so a write through either view is
//! observed through the other. Evaluation strategies that mix lane-wide and
//! per-level logic within one pass depend on that write-through guarantee.
//!
//! `W` must be at least 1. When the level count is not a multiple of `W`,
//! the trailing pack is partially populated; the excess lanes are defined
//! (zero-filled at load time) but carry no physical meaning.

use std::ops::{Add, AddAssign, Index, IndexMut, Mul};

/// Lane width used by the crate-default kernel types.
pub const LANE_WIDTH: usize = 4;

/// A fixed-width bundle of `W` consecutive vertical levels.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(transparent)]
pub struct Pack<const W: usize>(pub [f64; W]);

// Layout is exactly [f64; W]: no padding, every bit pattern valid.
unsafe impl<const W: usize> bytemuck::Zeroable for Pack<W> {}
unsafe impl<const W: usize> bytemuck::Pod for Pack<W> {}

impl<const W: usize> Pack<W> {
    /// All lanes zero.
    pub const ZERO: Self = Self([0.0; W]);

    /// Broadcast one value to every lane.
    #[inline]
    pub fn splat(value: f64) -> Self {
        Self([value; W])
    }

    /// Number of packs covering `n_levels` scalar levels.
    #[inline]
    pub const fn num_packs(n_levels: usize) -> usize {
        (n_levels + W - 1) / W
    }

    /// Per-lane upwind sign: −1 where the lane is strictly negative,
    /// +1 otherwise. Zero (either sign) maps to +1.
    #[inline]
    pub fn upwind_sign(self) -> Self {
        Self(self.0.map(|v| if v < 0.0 { -1.0 } else { 1.0 }))
    }
}

impl<const W: usize> Default for Pack<W> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const W: usize> Index<usize> for Pack<W> {
    type Output = f64;

    #[inline]
    fn index(&self, lane: usize) -> &f64 {
        &self.0[lane]
    }
}

impl<const W: usize> IndexMut<usize> for Pack<W> {
    #[inline]
    fn index_mut(&mut self, lane: usize) -> &mut f64 {
        &mut self.0[lane]
    }
}

impl<const W: usize> Add for Pack<W> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        let mut out = self.0;
        for (o, r) in out.iter_mut().zip(rhs.0) {
            *o += r;
        }
        Self(out)
    }
}

impl<const W: usize> AddAssign for Pack<W> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        for (o, r) in self.0.iter_mut().zip(rhs.0) {
            *o += r;
        }
    }
}

impl<const W: usize> Mul for Pack<W> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let mut out = self.0;
        for (o, r) in out.iter_mut().zip(rhs.0) {
            *o *= r;
        }
        Self(out)
    }
}

impl<const W: usize> Add<f64> for Pack<W> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: f64) -> Self {
        Self(self.0.map(|v| v + rhs))
    }
}

impl<const W: usize> Mul<f64> for Pack<W> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self(self.0.map(|v| v * rhs))
    }
}

/// View laned storage as one scalar per level (zero-copy).
#[inline]
pub fn scalarize<const W: usize>(packs: &[Pack<W>]) -> &[f64] {
    bytemuck::cast_slice(packs)
}

/// Mutable scalar view over laned storage (zero-copy).
#[inline]
pub fn scalarize_mut<const W: usize>(packs: &mut [Pack<W>]) -> &mut [f64] {
    bytemuck::cast_slice_mut(packs)
}
