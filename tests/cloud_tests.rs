//! Integration tests for the point cloud.
//!
//! These drive a cloud end to end the way the viewer does: a driver feeds
//! progress, a pointer source feeds NDC, and a recording rasterizer stands
//! in for the GPU.

use dust_image::input::pixel_to_ndc;
use dust_image::prelude::*;
use dust_image::{grid_positions, Camera};

/// Keeps what the cloud handed to the rasterizer.
#[derive(Default)]
struct Recorder {
    colors: Vec<Vec4>,
    frames: usize,
    sizes: Vec<f32>,
    positions: Vec<Vec3>,
}

impl Rasterizer for Recorder {
    type Error = std::convert::Infallible;

    fn upload_colors(&mut self, colors: &[Vec4]) {
        self.colors = colors.to_vec();
    }

    fn draw(&mut self, frame: &Frame<'_>) -> Result<(), Self::Error> {
        self.frames += 1;
        self.sizes.push(frame.point_size);
        self.positions.clear();
        self.positions.extend_from_slice(frame.positions);
        Ok(())
    }
}

fn demo_cloud() -> PointCloud {
    create_point_cloud(
        CloudConfig::new()
            .with_grid(16, 16)
            .with_max_depth(800.0)
            .with_seed(7),
    )
    .unwrap()
}

// ============================================================================
// Transition
// ============================================================================

#[test]
fn test_tween_lands_on_grid() {
    let mut cloud = demo_cloud();
    let mut recorder = Recorder::default();
    let mut tween = Tween::new(0.0, 1.0, 2.5, Easing::Power4Out);

    // Points start spread out in depth
    cloud.advance(0.0, None);
    assert!(cloud.positions().iter().any(|p| p.z > 100.0));

    let mut last = 0.0;
    for _ in 0..180 {
        tween.advance(1.0 / 60.0);
        let progress = tween.current_progress();
        assert!(progress >= last);
        last = progress;
        run_frame(&mut cloud, &tween, &None::<Vec2>, &mut recorder).unwrap();
    }

    assert!(tween.is_finished());
    assert_eq!(recorder.frames, 180);
    assert!(recorder.positions.iter().all(|p| p.z == 0.0));
    assert_eq!(recorder.positions, grid_positions(16, 16, 1.0));
}

#[test]
fn test_start_stays_near_initial() {
    let mut cloud = demo_cloud();
    let frequency = cloud.frequency();
    cloud.advance(0.0, None);

    for (p, initial) in cloud.positions().iter().zip(cloud.store().initials()) {
        assert!(p.distance(*initial) <= frequency + 1e-4);
    }
}

#[test]
fn test_zero_frequency_stays_on_segment() {
    let mut cloud = demo_cloud();
    cloud.set_frequency(0.0).unwrap();
    cloud.advance(0.37, None);

    let store = cloud.store();
    for (i, p) in cloud.positions().iter().enumerate() {
        let (initial, target) = store.get(i).unwrap();
        let expected = initial * (1.0 - 0.37) + target * 0.37;
        assert!(p.distance(expected) < 1e-3);
    }
}

#[test]
fn test_scrubbing_backwards() {
    let mut cloud = demo_cloud();
    cloud.advance(1.0, None);
    let landed = cloud.positions().to_vec();

    let mut scrub = FixedProgress(1.0);
    scrub.set(0.2);
    cloud.advance(scrub.current_progress(), None);
    assert_ne!(cloud.positions(), &landed[..]);

    scrub.set(1.0);
    cloud.advance(scrub.current_progress(), None);
    assert_eq!(cloud.positions(), &landed[..]);
}

#[test]
fn test_same_seed_same_cloud() {
    let a = demo_cloud();
    let b = demo_cloud();
    assert_eq!(a.store().initials(), b.store().initials());

    let c = create_point_cloud(CloudConfig::new().with_grid(16, 16).with_seed(8)).unwrap();
    assert_ne!(a.store().initials(), c.store().initials());
}

// ============================================================================
// Pointer interaction
// ============================================================================

#[test]
fn test_pointer_corner_to_center() {
    let viewport = (800, 600);
    let aspect = 800.0 / 600.0;

    let mut cloud = demo_cloud();
    cloud.set_view_projection(Camera::new().view_proj(aspect));
    let mut recorder = Recorder::default();

    let corner = pixel_to_ndc(Vec2::new(10.0, 10.0), viewport);
    let center = pixel_to_ndc(Vec2::new(400.0, 300.0), viewport);

    let hit = run_frame(&mut cloud, &1.0_f32, &corner, &mut recorder).unwrap();
    assert!(!hit.hit);
    assert_eq!(recorder.sizes, vec![8.0]);

    // Pointer moves to the center and is held there
    for _ in 0..30 {
        let hit = run_frame(&mut cloud, &1.0_f32, &center, &mut recorder).unwrap();
        assert!(hit.hit);
    }

    assert_eq!(recorder.sizes[1], 0.3);
    assert!(recorder.sizes[1..].iter().all(|s| *s == 0.3));
    assert_eq!(cloud.interaction().transitions(), 1);
    assert_eq!(cloud.hover_state(), HoverState::Hovering);

    // Leaving the canvas restores the size
    run_frame(&mut cloud, &1.0_f32, &None::<Vec2>, &mut recorder).unwrap();
    assert_eq!(recorder.sizes.last(), Some(&8.0));
    assert_eq!(cloud.interaction().transitions(), 2);
}

#[test]
fn test_hover_during_flight() {
    let mut cloud = demo_cloud();
    // Box test uses the grid bounds, so hovering works before landing
    let frame = cloud.advance(0.1, Some(Vec2::ZERO));
    assert!(frame.hit.hit);
    assert_eq!(frame.point_size, 0.3);
}

// ============================================================================
// Colors
// ============================================================================

#[test]
fn test_colors_follow_grid_uv() {
    let cloud = create_point_cloud(CloudConfig::new().with_grid(4, 2)).unwrap();
    let mut recorder = Recorder::default();

    // Red channel encodes u, green encodes v
    let source = |u: f32, v: f32| Vec4::new(u, v, 0.0, 1.0);
    recorder.upload_colors(&cloud.sample_colors(&source));

    assert_eq!(recorder.colors.len(), 8);
    // Flat index 0 is column 0, row 0: bottom-left cell
    assert_eq!(recorder.colors[0], Vec4::new(0.125, 0.25, 0.0, 1.0));
    // Flat index 7 is column 3, row 1: top-right cell
    assert_eq!(recorder.colors[7], Vec4::new(0.875, 0.75, 0.0, 1.0));
}

#[test]
fn test_image_texture_colors() {
    // 2x1 image: black on the left, white on the right
    let texture = ImageTexture::from_rgba(
        vec![0, 0, 0, 255, 255, 255, 255, 255],
        2,
        1,
    )
    .unwrap();
    let cloud = create_point_cloud(CloudConfig::new().with_grid(2, 3)).unwrap();
    let colors = cloud.sample_colors(&texture);

    let store = cloud.store();
    for (i, color) in colors.iter().enumerate() {
        let expected = if store.grid_index(i).col == 0 {
            Vec4::new(0.0, 0.0, 0.0, 1.0)
        } else {
            Vec4::ONE
        };
        assert_eq!(*color, expected);
    }
}

// ============================================================================
// Configuration errors
// ============================================================================

#[test]
fn test_invalid_configuration_rejected() {
    let cases = [
        CloudConfig::new().with_grid(0, 16),
        CloudConfig::new().with_grid(16, 0),
        CloudConfig::new().with_max_depth(-1.0),
        CloudConfig::new().with_max_depth(f32::NAN),
        CloudConfig::new().with_grid(4, 4).with_max_depth(f32::MAX),
        CloudConfig::new().with_frequency(-0.5),
        CloudConfig::new().with_frequency(f32::INFINITY),
        CloudConfig::new().with_spacing(0.0),
        CloudConfig::new().with_point_sizes(0.0, 0.3),
        CloudConfig::new().with_grid(u32::MAX, 2),
    ];
    for config in cases {
        let err = create_point_cloud(config.clone()).unwrap_err();
        assert!(
            matches!(err, CloudError::InvalidConfiguration { .. }),
            "{:?}",
            config
        );
    }
}
