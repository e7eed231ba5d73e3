//! Per-point attribute table.
//!
//! Built once from the grid and the scatter, then read-only. Buffers are
//! contiguous and never reallocated or reordered, so a flat point index
//! handed out by the hit test stays valid for the store's lifetime.

use crate::config::CloudConfig;
use crate::error::CloudError;
use crate::grid::{grid_positions, GridIndex};
use crate::ray::Aabb;
use crate::scatter::Scatter;
use glam::{Vec2, Vec3};
use rand::Rng;

/// Fixed-size table of initial and target positions.
#[derive(Debug, Clone)]
pub struct PointStore {
    columns: u32,
    rows: u32,
    spacing: f32,
    targets: Box<[Vec3]>,
    initials: Box<[Vec3]>,
    bounds: Aabb,
}

impl PointStore {
    /// Build the store for `config` using its seeded scatter.
    pub fn build(config: &CloudConfig) -> Result<Self, CloudError> {
        config.validate()?;
        let mut scatter = Scatter::seeded(config.seed, config.max_depth)?;
        Ok(Self::build_with(config, &mut scatter))
    }

    /// Build the store with an explicit scatter source.
    ///
    /// `config` is assumed valid.
    pub fn build_with<R: Rng>(config: &CloudConfig, scatter: &mut Scatter<R>) -> Self {
        let targets = grid_positions(config.columns, config.rows, config.spacing);
        let initials = scatter.positions(config.columns, config.rows, config.spacing);
        debug_assert_eq!(targets.len(), initials.len());

        let bounds = Aabb::from_points(&targets);
        log::debug!(
            "Built point store: {}x{} ({} points), bounds {:?}",
            config.columns,
            config.rows,
            targets.len(),
            bounds
        );

        Self {
            columns: config.columns,
            rows: config.rows,
            spacing: config.spacing,
            targets: targets.into_boxed_slice(),
            initials: initials.into_boxed_slice(),
            bounds,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    #[inline]
    pub fn columns(&self) -> u32 {
        self.columns
    }

    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    #[inline]
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Assembled positions, flat order.
    #[inline]
    pub fn targets(&self) -> &[Vec3] {
        &self.targets
    }

    /// Scattered positions, flat order.
    #[inline]
    pub fn initials(&self) -> &[Vec3] {
        &self.initials
    }

    /// Bounds of the assembled grid.
    #[inline]
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    #[inline]
    pub fn grid_index(&self, index: usize) -> GridIndex {
        GridIndex::from_flat(index, self.rows)
    }

    /// Flat index of a grid cell, `None` when out of range.
    pub fn flat_index(&self, col: u32, row: u32) -> Option<usize> {
        (col < self.columns && row < self.rows).then(|| GridIndex::new(col, row).flat(self.rows))
    }

    /// `(initial, target)` pair of one point.
    pub fn get(&self, index: usize) -> Option<(Vec3, Vec3)> {
        Some((*self.initials.get(index)?, *self.targets.get(index)?))
    }

    /// Image UV of one point.
    #[inline]
    pub fn uv(&self, index: usize) -> Vec2 {
        self.grid_index(index).uv(self.columns, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> CloudConfig {
        CloudConfig::new().with_grid(8, 4).with_max_depth(100.0).with_seed(5)
    }

    #[test]
    fn test_store_size() {
        let store = PointStore::build(&small()).unwrap();
        assert_eq!(store.len(), 32);
        assert_eq!(store.targets().len(), store.initials().len());
    }

    #[test]
    fn test_store_invariants() {
        let store = PointStore::build(&small()).unwrap();
        assert!(store.targets().iter().all(|p| p.z == 0.0));
        assert!(store.initials().iter().all(|p| p.z >= 0.0));
    }

    #[test]
    fn test_flat_and_grid_index_agree() {
        let store = PointStore::build(&small()).unwrap();
        let i = store.flat_index(5, 3).unwrap();
        assert_eq!(store.grid_index(i), GridIndex::new(5, 3));
        assert!(store.flat_index(8, 0).is_none());
        assert!(store.flat_index(0, 4).is_none());
        assert!(store.get(store.len()).is_none());
    }

    #[test]
    fn test_planar_offset_between_initial_and_target() {
        // Initial layout is the target layout shifted by half a cell
        let store = PointStore::build(&small()).unwrap();
        for (initial, target) in store.initials().iter().zip(store.targets()) {
            assert!((initial.x - (target.x - 0.5)).abs() < 1e-5);
            assert!((initial.y - (target.y - 0.5)).abs() < 1e-5);
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(PointStore::build(&small().with_max_depth(-5.0)).is_err());
    }

    #[test]
    fn test_bounds_centered() {
        let store = PointStore::build(&small()).unwrap();
        assert!(store.bounds().center().length() < 1e-5);
    }
}
