//! Initial scatter of the point cloud.
//!
//! Each point starts above its grid cell (same planar layout, shifted by
//! half the grid extent) at a depth drawn uniformly from `[0, max_depth]`.
//! The RNG is pluggable; [`Scatter::seeded`] gives a reproducible cloud.

use crate::config::require_max_depth;
use crate::error::CloudError;
use crate::grid::grid_indices;
use glam::{Vec2, Vec3};
use rand::distributions::Uniform;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Depth sampler for the initial cloud.
pub struct Scatter<R: Rng = SmallRng> {
    rng: R,
    depth: Uniform<f32>,
}

impl Scatter<SmallRng> {
    /// Scatter driven by a [`SmallRng`] seeded with `seed`.
    pub fn seeded(seed: u64, max_depth: f32) -> Result<Self, CloudError> {
        Self::with_rng(SmallRng::seed_from_u64(seed), max_depth)
    }
}

impl<R: Rng> Scatter<R> {
    /// Scatter driven by any RNG.
    ///
    /// `max_depth` must lie in `[0, MAX_DEPTH_LIMIT]`.
    pub fn with_rng(rng: R, max_depth: f32) -> Result<Self, CloudError> {
        require_max_depth(max_depth)?;
        Ok(Self {
            rng,
            depth: Uniform::new_inclusive(0.0, max_depth),
        })
    }

    /// One depth sample in `[0, max_depth]`.
    #[inline]
    pub fn depth(&mut self) -> f32 {
        self.rng.sample(self.depth)
    }

    /// Initial positions for a `columns × rows` grid in flat order.
    pub fn positions(&mut self, columns: u32, rows: u32, spacing: f32) -> Vec<Vec3> {
        let half = half_extent(columns, rows, spacing);
        let mut out = Vec::with_capacity(columns as usize * rows as usize);
        for index in grid_indices(columns, rows) {
            let planar = index.lattice(spacing) - half;
            out.push(planar.extend(self.depth()));
        }
        out
    }
}

/// One-shot scatter with a borrowed RNG.
pub fn scatter_positions<R: Rng>(
    columns: u32,
    rows: u32,
    spacing: f32,
    max_depth: f32,
    rng: &mut R,
) -> Result<Vec<Vec3>, CloudError> {
    let mut scatter = Scatter::with_rng(rng, max_depth)?;
    Ok(scatter.positions(columns, rows, spacing))
}

/// Half of the grid's cell count times spacing, per axis.
#[inline]
pub fn half_extent(columns: u32, rows: u32, spacing: f32) -> Vec2 {
    Vec2::new(columns as f32, rows as f32) * spacing * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_depth_rejected() {
        assert!(Scatter::seeded(1, -0.01).is_err());
        assert!(Scatter::seeded(1, f32::NAN).is_err());
    }

    #[test]
    fn test_unrepresentable_depth_rejected() {
        assert!(matches!(
            Scatter::seeded(1, f32::MAX),
            Err(CloudError::InvalidConfiguration { field: "max_depth", .. })
        ));
        assert!(Scatter::seeded(1, crate::config::MAX_DEPTH_LIMIT).is_ok());
    }

    #[test]
    fn test_reproducible() {
        let a = Scatter::seeded(42, 800.0).unwrap().positions(16, 16, 1.0);
        let b = Scatter::seeded(42, 800.0).unwrap().positions(16, 16, 1.0);
        assert_eq!(a, b);

        let c = Scatter::seeded(43, 800.0).unwrap().positions(16, 16, 1.0);
        assert_ne!(a, c);
    }

    #[test]
    fn test_depth_bounds() {
        let positions = Scatter::seeded(3, 800.0).unwrap().positions(32, 32, 1.0);
        assert!(positions.iter().all(|p| p.z >= 0.0 && p.z <= 800.0));
        // A uniform draw over 1024 points should spread out
        let max = positions.iter().map(|p| p.z).fold(0.0, f32::max);
        assert!(max > 400.0);
    }

    #[test]
    fn test_zero_depth_is_flat() {
        let positions = Scatter::seeded(9, 0.0).unwrap().positions(4, 4, 1.0);
        assert!(positions.iter().all(|p| p.z == 0.0));
    }

    #[test]
    fn test_planar_layout() {
        let positions = Scatter::seeded(0, 10.0).unwrap().positions(4, 2, 1.0);
        // First cell sits at minus the half extent
        assert_eq!(positions[0].x, -2.0);
        assert_eq!(positions[0].y, -1.0);
        // Column 3, row 1
        assert_eq!(positions[7].x, 1.0);
        assert_eq!(positions[7].y, 0.0);
    }

    #[test]
    fn test_custom_rng() {
        let rng = rand::rngs::mock::StepRng::new(0, 0);
        let mut scatter = Scatter::with_rng(rng, 100.0).unwrap();
        assert_eq!(scatter.depth(), 0.0);
    }

    #[test]
    fn test_scatter_positions_borrowed_rng() {
        use rand::SeedableRng;

        let mut rng = SmallRng::seed_from_u64(42);
        let a = scatter_positions(16, 16, 1.0, 800.0, &mut rng).unwrap();
        let b = Scatter::seeded(42, 800.0).unwrap().positions(16, 16, 1.0);
        assert_eq!(a, b);
        assert!(scatter_positions(2, 2, 1.0, -5.0, &mut rng).is_err());
    }
}
