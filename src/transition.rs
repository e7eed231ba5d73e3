//! Scatter-to-grid transition.
//!
//! The current render position of a point is a pure function of its stored
//! positions, its grid index, `progress` and `frequency`:
//!
//! ```text
//! t   = clamp(progress, 0, 1)
//! pos = initial * (1 - t) + target * t
//!     + frequency * (1 - t) * n(col * scale, row * scale, t * time_scale)
//! ```
//!
//! `n` is a three channel simplex noise vector with its length clamped to 1,
//! so the offset never exceeds `frequency` and vanishes exactly at `t = 1`.
//! Easing is the driver's job; `progress` arrives already eased.

use crate::config::CloudConfig;
use crate::grid::GridIndex;
use crate::noise::noise_vec3;
use crate::store::PointStore;
use glam::Vec3;

/// Mutable per-cloud scalars. Everything else about a cloud is fixed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionState {
    /// Last progress value used, already clamped.
    pub progress: f32,
    /// Noise amplitude.
    pub frequency: f32,
    /// Current sprite size, owned by the interaction controller.
    pub point_size: f32,
}

impl TransitionState {
    pub fn from_config(config: &CloudConfig) -> Self {
        Self {
            progress: 0.0,
            frequency: config.frequency,
            point_size: config.point_size,
        }
    }
}

/// Spatial and temporal scale of the noise lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseField {
    pub scale: f32,
    pub time_scale: f32,
}

impl NoiseField {
    pub fn from_config(config: &CloudConfig) -> Self {
        Self {
            scale: config.noise_scale,
            time_scale: config.noise_time_scale,
        }
    }

    /// Unit-bounded noise direction for one point.
    #[inline]
    pub fn sample(&self, index: GridIndex, t: f32) -> Vec3 {
        let p = Vec3::new(
            index.col as f32 * self.scale,
            index.row as f32 * self.scale,
            t * self.time_scale,
        );
        noise_vec3(p).clamp_length_max(1.0)
    }
}

impl Default for NoiseField {
    fn default() -> Self {
        Self::from_config(&CloudConfig::default())
    }
}

/// Clamp progress into `[0, 1]`. NaN counts as not started.
#[inline]
pub fn clamp_progress(progress: f32) -> f32 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

/// Component-wise interpolation, exact at both ends.
#[inline]
pub fn lerp_exact(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a * (1.0 - t) + b * t
}

/// Noise displacement for one point. Zero when `t == 1` or `frequency == 0`.
#[inline]
pub fn noise_offset(field: &NoiseField, index: GridIndex, t: f32, frequency: f32) -> Vec3 {
    let amplitude = frequency * (1.0 - t);
    if amplitude == 0.0 {
        return Vec3::ZERO;
    }
    field.sample(index, t) * amplitude
}

/// Render position of one point.
pub fn position(
    field: &NoiseField,
    initial: Vec3,
    target: Vec3,
    index: GridIndex,
    progress: f32,
    frequency: f32,
) -> Vec3 {
    let t = clamp_progress(progress);
    lerp_exact(initial, target, t) + noise_offset(field, index, t, frequency)
}

/// Evaluate every point of `store` into `out`.
///
/// `out` must be exactly `store.len()` long; it is overwritten in place.
pub fn evaluate_into(
    field: &NoiseField,
    store: &PointStore,
    progress: f32,
    frequency: f32,
    out: &mut [Vec3],
) {
    assert_eq!(out.len(), store.len(), "position buffer length mismatch");

    let t = clamp_progress(progress);
    let amplitude = frequency * (1.0 - t);
    let pairs = store.initials().iter().zip(store.targets());

    if amplitude == 0.0 {
        // Straight interpolation, no noise to evaluate
        for (slot, (initial, target)) in out.iter_mut().zip(pairs) {
            *slot = lerp_exact(*initial, *target, t);
        }
        return;
    }

    let rows = store.rows();
    for (flat, (slot, (initial, target))) in out.iter_mut().zip(pairs).enumerate() {
        let index = GridIndex::from_flat(flat, rows);
        *slot = lerp_exact(*initial, *target, t) + field.sample(index, t) * amplitude;
    }
}
