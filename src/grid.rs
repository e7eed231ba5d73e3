//! Target grid layout.
//!
//! Every point owns a fixed [`GridIndex`]. Points are stored column-major:
//! flat index `col * rows + row`. The target lattice is centered on the
//! origin and lies in the `z = 0` plane.

use glam::{Vec2, Vec3};

/// Fixed `(column, row)` identity of a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridIndex {
    pub col: u32,
    pub row: u32,
}

impl GridIndex {
    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }

    /// Inverse of [`GridIndex::flat`].
    #[inline]
    pub fn from_flat(index: usize, rows: u32) -> Self {
        let rows = rows as usize;
        Self {
            col: (index / rows) as u32,
            row: (index % rows) as u32,
        }
    }

    /// Column-major flat index.
    #[inline]
    pub fn flat(&self, rows: u32) -> usize {
        self.col as usize * rows as usize + self.row as usize
    }

    /// Image-space UV of this cell, sampled at the cell center.
    ///
    /// `u` grows with the column, `v` grows with the row.
    #[inline]
    pub fn uv(&self, columns: u32, rows: u32) -> Vec2 {
        Vec2::new(
            (self.col as f32 + 0.5) / columns as f32,
            (self.row as f32 + 0.5) / rows as f32,
        )
    }

    /// Position on the uncentered lattice.
    #[inline]
    pub fn lattice(&self, spacing: f32) -> Vec2 {
        Vec2::new(self.col as f32 * spacing, self.row as f32 * spacing)
    }
}

/// All grid indices in flat (column-major) order.
pub fn grid_indices(columns: u32, rows: u32) -> impl Iterator<Item = GridIndex> {
    (0..columns).flat_map(move |col| (0..rows).map(move |row| GridIndex::new(col, row)))
}

/// Offset that moves the lattice's bounding box center onto the origin.
#[inline]
pub fn center_offset(columns: u32, rows: u32, spacing: f32) -> Vec2 {
    Vec2::new(
        (columns.saturating_sub(1)) as f32 * spacing * 0.5,
        (rows.saturating_sub(1)) as f32 * spacing * 0.5,
    )
}

/// Centered target position of one cell.
#[inline]
pub fn target_position(index: GridIndex, columns: u32, rows: u32, spacing: f32) -> Vec3 {
    (index.lattice(spacing) - center_offset(columns, rows, spacing)).extend(0.0)
}

/// Target positions for the whole grid in flat order.
pub fn grid_positions(columns: u32, rows: u32, spacing: f32) -> Vec<Vec3> {
    let mut out = Vec::with_capacity(columns as usize * rows as usize);
    out.extend(grid_indices(columns, rows).map(|i| target_position(i, columns, rows, spacing)));
    out
}
