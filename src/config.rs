//! Point cloud configuration.
//!
//! [`CloudConfig`] is built with chained `with_*` calls and validated once by
//! [`create_point_cloud`](crate::create_point_cloud). Nothing is clamped
//! silently: out-of-domain values are rejected with
//! [`CloudError::InvalidConfiguration`].
//!
//! ```ignore
//! let cloud = create_point_cloud(
//!     CloudConfig::new()
//!         .with_grid(16, 16)
//!         .with_max_depth(800.0)
//!         .with_seed(7),
//! )?;
//! ```

use crate::error::CloudError;

/// Base grid resolution before the density multiplier is applied.
pub const BASE_RESOLUTION: u32 = 16;
/// Density multiplier applied to [`BASE_RESOLUTION`].
pub const DENSITY_MULTIPLIER: u32 = 18;

/// Default depth range of the initial scatter.
pub const DEFAULT_MAX_DEPTH: f32 = 800.0;
/// Largest accepted scatter depth. Keeps the depth range representable for
/// the uniform sampler.
pub const MAX_DEPTH_LIMIT: f32 = 1.0e9;
/// Default noise amplitude.
pub const DEFAULT_FREQUENCY: f32 = 0.19;
/// Point size while the pointer is away from the cloud.
pub const DEFAULT_POINT_SIZE: f32 = 8.0;
/// Point size while the pointer hovers over the cloud.
pub const DEFAULT_HOVER_POINT_SIZE: f32 = 0.3;

/// Construction parameters for a point cloud.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudConfig {
    /// Grid columns (X axis).
    pub columns: u32,
    /// Grid rows (Y axis).
    pub rows: u32,
    /// Distance between neighbouring grid points.
    pub spacing: f32,
    /// Upper bound of the initial depth scatter.
    pub max_depth: f32,
    /// Noise amplitude applied while the cloud is assembling.
    pub frequency: f32,
    /// Seed for the scatter RNG.
    pub seed: u64,
    /// Spatial scale of the noise lookup in grid units.
    pub noise_scale: f32,
    /// How fast the noise field evolves with progress.
    pub noise_time_scale: f32,
    /// Render size while idle.
    pub point_size: f32,
    /// Render size while hovering.
    pub hover_point_size: f32,
    /// Inflation of the bounding box used by the hit test.
    pub hover_tolerance: f32,
    /// Extra inflation while hovering, so the edge does not flicker.
    pub hysteresis: f32,
    /// Report the nearest point under the pointer, not only hit/miss.
    pub pick_points: bool,
    /// Max perpendicular ray distance for a point to be picked.
    pub pick_radius: f32,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CloudConfig {
    /// Defaults matching the 288×288 demo cloud.
    pub fn new() -> Self {
        Self {
            columns: BASE_RESOLUTION * DENSITY_MULTIPLIER,
            rows: BASE_RESOLUTION * DENSITY_MULTIPLIER,
            spacing: 1.0,
            max_depth: DEFAULT_MAX_DEPTH,
            frequency: DEFAULT_FREQUENCY,
            seed: 0,
            noise_scale: 0.05,
            noise_time_scale: 2.0,
            point_size: DEFAULT_POINT_SIZE,
            hover_point_size: DEFAULT_HOVER_POINT_SIZE,
            hover_tolerance: 1.0,
            hysteresis: 2.0,
            pick_points: false,
            pick_radius: 0.5,
        }
    }

    /// Set the grid dimensions directly.
    pub fn with_grid(mut self, columns: u32, rows: u32) -> Self {
        self.columns = columns;
        self.rows = rows;
        self
    }

    /// Set a square grid of `base * multiplier` points per side.
    pub fn with_density(mut self, base: u32, multiplier: u32) -> Self {
        let side = base.saturating_mul(multiplier);
        self.columns = side;
        self.rows = side;
        self
    }

    /// Set the grid spacing.
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set the depth range of the initial scatter.
    pub fn with_max_depth(mut self, max_depth: f32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the noise amplitude.
    pub fn with_frequency(mut self, frequency: f32) -> Self {
        self.frequency = frequency;
        self
    }

    /// Set the scatter seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the noise lookup scales (spatial, temporal).
    pub fn with_noise_scale(mut self, scale: f32, time_scale: f32) -> Self {
        self.noise_scale = scale;
        self.noise_time_scale = time_scale;
        self
    }

    /// Set idle and hover point sizes.
    pub fn with_point_sizes(mut self, idle: f32, hover: f32) -> Self {
        self.point_size = idle;
        self.hover_point_size = hover;
        self
    }

    /// Set hit test tolerance and hover hysteresis margin.
    pub fn with_hover_tolerance(mut self, tolerance: f32, hysteresis: f32) -> Self {
        self.hover_tolerance = tolerance;
        self.hysteresis = hysteresis;
        self
    }

    /// Enable nearest-point reporting within `radius` of the pointer ray.
    pub fn with_point_picking(mut self, radius: f32) -> Self {
        self.pick_points = true;
        self.pick_radius = radius;
        self
    }

    /// Number of points this configuration produces.
    pub fn point_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Check every field against its domain.
    pub fn validate(&self) -> Result<(), CloudError> {
        if self.columns == 0 {
            return Err(CloudError::invalid("columns", "must be > 0"));
        }
        if self.rows == 0 {
            return Err(CloudError::invalid("rows", "must be > 0"));
        }
        if self.columns.checked_mul(self.rows).is_none() {
            return Err(CloudError::invalid(
                "columns",
                format!("{}x{} grid exceeds u32 point indices", self.columns, self.rows),
            ));
        }
        require_positive("spacing", self.spacing)?;
        require_max_depth(self.max_depth)?;
        require_non_negative("frequency", self.frequency)?;
        require_non_negative("noise_scale", self.noise_scale)?;
        require_non_negative("noise_time_scale", self.noise_time_scale)?;
        require_positive("point_size", self.point_size)?;
        require_positive("hover_point_size", self.hover_point_size)?;
        require_non_negative("hover_tolerance", self.hover_tolerance)?;
        require_non_negative("hysteresis", self.hysteresis)?;
        if self.pick_points {
            require_positive("pick_radius", self.pick_radius)?;
        }
        Ok(())
    }
}

/// Live tuning values, the knobs a debug panel would expose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    pub progress: f32,
    pub frequency: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            progress: 0.0,
            frequency: DEFAULT_FREQUENCY,
        }
    }
}

impl Tuning {
    /// Progress may overshoot `[0, 1]` (it is clamped on use) but must be finite.
    pub fn validate(&self) -> Result<(), CloudError> {
        if !self.progress.is_finite() {
            return Err(CloudError::invalid(
                "progress",
                format!("must be finite, got {}", self.progress),
            ));
        }
        require_non_negative("frequency", self.frequency)
    }
}

pub(crate) fn require_positive(field: &'static str, value: f32) -> Result<(), CloudError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CloudError::invalid(
            field,
            format!("must be finite and > 0, got {}", value),
        ))
    }
}

pub(crate) fn require_max_depth(value: f32) -> Result<(), CloudError> {
    require_non_negative("max_depth", value)?;
    if value > MAX_DEPTH_LIMIT {
        return Err(CloudError::invalid(
            "max_depth",
            format!("must be <= {}, got {}", MAX_DEPTH_LIMIT, value),
        ));
    }
    Ok(())
}

pub(crate) fn require_non_negative(field: &'static str, value: f32) -> Result<(), CloudError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CloudError::invalid(
            field,
            format!("must be finite and >= 0, got {}", value),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_demo() {
        let config = CloudConfig::default();
        assert_eq!(config.columns, 288);
        assert_eq!(config.rows, 288);
        assert_eq!(config.point_count(), 288 * 288);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_grid_rejected() {
        let err = CloudConfig::new().with_grid(0, 16).validate().unwrap_err();
        assert!(matches!(
            err,
            CloudError::InvalidConfiguration { field: "columns", .. }
        ));

        let err = CloudConfig::new().with_grid(16, 0).validate().unwrap_err();
        assert!(matches!(
            err,
            CloudError::InvalidConfiguration { field: "rows", .. }
        ));
    }

    #[test]
    fn test_negative_depth_rejected() {
        let err = CloudConfig::new().with_max_depth(-1.0).validate().unwrap_err();
        assert!(matches!(
            err,
            CloudError::InvalidConfiguration { field: "max_depth", .. }
        ));
    }

    #[test]
    fn test_non_finite_frequency_rejected() {
        for bad in [f32::NAN, f32::INFINITY, -0.5] {
            let result = CloudConfig::new().with_frequency(bad).validate();
            assert!(result.is_err(), "frequency {} should be rejected", bad);
        }
        assert!(CloudConfig::new().with_frequency(0.0).validate().is_ok());
    }

    #[test]
    fn test_overflowing_grid_rejected() {
        assert!(CloudConfig::new()
            .with_grid(u32::MAX, 2)
            .validate()
            .is_err());
    }

    #[test]
    fn test_density() {
        let config = CloudConfig::new().with_density(16, 2);
        assert_eq!((config.columns, config.rows), (32, 32));
    }

    #[test]
    fn test_tuning_validate() {
        assert!(Tuning { progress: 1.3, frequency: 2.0 }.validate().is_ok());
        assert!(Tuning { progress: f32::NAN, frequency: 2.0 }.validate().is_err());
        assert!(Tuning { progress: 0.5, frequency: f32::INFINITY }.validate().is_err());
    }
}
