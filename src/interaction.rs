//! Pointer hit testing and the hover size state machine.
//!
//! Each frame the latest pointer sample (normalized device coordinates) is
//! unprojected into a model-space ray and tested against the cloud's
//! bounding box. Entering the box shrinks the points, leaving it restores
//! their size.
//!
//! The coarse box test is the contract. With
//! [`CloudConfig::with_point_picking`] the controller also reports the
//! nearest point under the ray, searched only after the box test hits.

use crate::config::CloudConfig;
use crate::ray::{Aabb, Ray};
use glam::{Mat4, Vec2, Vec3};

/// Two-state hover machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverState {
    #[default]
    Idle,
    Hovering,
}

/// A point picked by the pointer ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointHit {
    /// Flat point index, stable for the cloud's lifetime.
    pub index: usize,
    /// Distance along the ray to the point's projection.
    pub distance: f32,
}

/// Outcome of one hit test.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HitTest {
    pub hit: bool,
    /// Ray distance to the bounding box entry, when hit.
    pub distance: Option<f32>,
    /// Nearest picked point, when picking is enabled and a point is in range.
    pub nearest: Option<PointHit>,
}

impl HitTest {
    pub const MISS: HitTest = HitTest {
        hit: false,
        distance: None,
        nearest: None,
    };
}

/// True when `ndc` lies inside the canvas.
#[inline]
pub fn ndc_in_range(ndc: Vec2) -> bool {
    ndc.is_finite() && ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0
}

/// Unproject pointer NDC through `inv_view_proj` (depth range 0..1).
///
/// Returns `None` for pointers outside the canvas.
pub fn pointer_ray(inv_view_proj: Mat4, ndc: Vec2) -> Option<Ray> {
    if !ndc_in_range(ndc) {
        return None;
    }
    let near = inv_view_proj.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
    let far = inv_view_proj.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
    let direction = far - near;
    if !near.is_finite() || !direction.is_finite() || direction.length_squared() == 0.0 {
        return None;
    }
    Some(Ray::new(near, direction))
}

/// Nearest point (along the ray) within `radius` of the ray.
pub fn pick_nearest(ray: &Ray, positions: &[Vec3], radius: f32) -> Option<PointHit> {
    let radius_sq = radius * radius;
    let mut best: Option<PointHit> = None;
    for (index, p) in positions.iter().enumerate() {
        let t = ray.closest_t(*p);
        if ray.at(t).distance_squared(*p) > radius_sq {
            continue;
        }
        if best.map_or(true, |b| t < b.distance) {
            best = Some(PointHit { index, distance: t });
        }
    }
    best
}

/// Drives `point_size` from hit tests.
#[derive(Debug, Clone)]
pub struct InteractionController {
    state: HoverState,
    default_size: f32,
    hover_size: f32,
    tolerance: f32,
    hysteresis: f32,
    pick_radius: Option<f32>,
    transitions: u64,
}

impl InteractionController {
    pub fn new(default_size: f32, hover_size: f32) -> Self {
        Self {
            state: HoverState::Idle,
            default_size,
            hover_size,
            tolerance: 0.0,
            hysteresis: 0.0,
            pick_radius: None,
            transitions: 0,
        }
    }

    pub fn from_config(config: &CloudConfig) -> Self {
        Self {
            tolerance: config.hover_tolerance,
            hysteresis: config.hysteresis,
            pick_radius: config.pick_points.then_some(config.pick_radius),
            ..Self::new(config.point_size, config.hover_point_size)
        }
    }

    #[inline]
    pub fn state(&self) -> HoverState {
        self.state
    }

    /// Size the rasterizer should use this frame.
    #[inline]
    pub fn point_size(&self) -> f32 {
        match self.state {
            HoverState::Idle => self.default_size,
            HoverState::Hovering => self.hover_size,
        }
    }

    /// Number of Idle/Hovering flips so far.
    #[inline]
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Box used for the current state: wider while hovering.
    pub fn hit_volume(&self, bounds: Aabb) -> Aabb {
        match self.state {
            HoverState::Idle => bounds.inflate(self.tolerance),
            HoverState::Hovering => bounds.inflate(self.tolerance + self.hysteresis),
        }
    }

    /// Test `ray` without changing state.
    pub fn hit_test(&self, bounds: Aabb, ray: Option<&Ray>, positions: &[Vec3]) -> HitTest {
        let Some(ray) = ray else {
            return HitTest::MISS;
        };
        let Some(distance) = self.hit_volume(bounds).intersect(ray) else {
            return HitTest::MISS;
        };
        let nearest = self
            .pick_radius
            .and_then(|radius| pick_nearest(ray, positions, radius));
        HitTest {
            hit: true,
            distance: Some(distance),
            nearest,
        }
    }

    /// Test `ray` and apply the Idle/Hovering transition.
    pub fn update(&mut self, bounds: Aabb, ray: Option<&Ray>, positions: &[Vec3]) -> HitTest {
        let result = self.hit_test(bounds, ray, positions);
        let next = if result.hit {
            HoverState::Hovering
        } else {
            HoverState::Idle
        };
        if next != self.state {
            self.state = next;
            self.transitions += 1;
            log::info!(
                "Pointer {} cloud, point size -> {}",
                if result.hit { "entered" } else { "left" },
                self.point_size()
            );
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Aabb {
        Aabb::new(Vec3::new(-8.0, -8.0, 0.0), Vec3::new(8.0, 8.0, 0.0))
    }

    fn down_ray(x: f32, y: f32) -> Ray {
        Ray::new(Vec3::new(x, y, 100.0), Vec3::NEG_Z)
    }

    #[test]
    fn test_enter_and_leave() {
        let mut ctl = InteractionController::new(8.0, 0.3);
        assert_eq!(ctl.point_size(), 8.0);

        assert!(ctl.update(bounds(), Some(&down_ray(0.0, 0.0)), &[]).hit);
        assert_eq!(ctl.state(), HoverState::Hovering);
        assert_eq!(ctl.point_size(), 0.3);

        assert!(!ctl.update(bounds(), Some(&down_ray(50.0, 0.0)), &[]).hit);
        assert_eq!(ctl.state(), HoverState::Idle);
        assert_eq!(ctl.point_size(), 8.0);
        assert_eq!(ctl.transitions(), 2);
    }

    #[test]
    fn test_no_pointer_is_miss() {
        let mut ctl = InteractionController::new(8.0, 0.3);
        assert_eq!(ctl.update(bounds(), None, &[]), HitTest::MISS);
        assert_eq!(ctl.transitions(), 0);
    }

    #[test]
    fn test_held_pointer_no_oscillation() {
        let mut ctl = InteractionController::new(8.0, 0.3);
        for _ in 0..100 {
            ctl.update(bounds(), Some(&down_ray(1.0, 1.0)), &[]);
        }
        assert_eq!(ctl.transitions(), 1);
    }

    #[test]
    fn test_hysteresis_at_edge() {
        let config = CloudConfig::new().with_hover_tolerance(0.5, 1.0);
        let mut ctl = InteractionController::from_config(&config);

        // Outside the tolerance: stays idle
        assert!(!ctl.update(bounds(), Some(&down_ray(8.9, 0.0)), &[]).hit);
        // Inside: enters
        assert!(ctl.update(bounds(), Some(&down_ray(8.4, 0.0)), &[]).hit);
        // Back at 8.9 the wider hover box still holds
        assert!(ctl.update(bounds(), Some(&down_ray(8.9, 0.0)), &[]).hit);
        assert_eq!(ctl.state(), HoverState::Hovering);
        // Past the hysteresis margin: leaves
        assert!(!ctl.update(bounds(), Some(&down_ray(9.6, 0.0)), &[]).hit);
        assert_eq!(ctl.transitions(), 2);
    }

    #[test]
    fn test_pointer_ray_out_of_range() {
        let inv = Mat4::IDENTITY;
        assert!(pointer_ray(inv, Vec2::new(1.5, 0.0)).is_none());
        assert!(pointer_ray(inv, Vec2::new(0.0, -1.01)).is_none());
        assert!(pointer_ray(inv, Vec2::new(f32::NAN, 0.0)).is_none());
        assert!(pointer_ray(inv, Vec2::new(1.0, -1.0)).is_some());
    }

    #[test]
    fn test_pick_nearest() {
        let positions = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.1, 0.0, 50.0),
            Vec3::new(3.0, 0.0, 80.0),
        ];
        let ray = down_ray(0.0, 0.0);
        let hit = pick_nearest(&ray, &positions, 0.5).unwrap();
        assert_eq!(hit.index, 1);
        assert!((hit.distance - 50.0).abs() < 1e-4);
        assert!(pick_nearest(&down_ray(20.0, 0.0), &positions, 0.5).is_none());
    }

    #[test]
    fn test_picking_reported_only_when_enabled() {
        let positions = [Vec3::ZERO];
        let plain = InteractionController::new(8.0, 0.3);
        assert!(plain
            .hit_test(bounds(), Some(&down_ray(0.0, 0.0)), &positions)
            .nearest
            .is_none());

        let config = CloudConfig::new().with_point_picking(0.5);
        let picking = InteractionController::from_config(&config);
        let result = picking.hit_test(bounds(), Some(&down_ray(0.0, 0.0)), &positions);
        assert_eq!(result.nearest.map(|h| h.index), Some(0));
    }
}
