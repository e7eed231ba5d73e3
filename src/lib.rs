//! # dust-image
//!
//! An image assembling itself from dust: a point cloud that flies from a
//! random 3-D scatter into a flat grid, colored by a source image.
//!
//! A single scalar `progress` drives the transition and `frequency` adds a
//! noise wobble that dies out as the points land. A pointer hovering over
//! the cloud shrinks the points.
//!
//! ## Quick Start
//!
//! ```ignore
//! use dust_image::prelude::*;
//!
//! let mut cloud = create_point_cloud(CloudConfig::new().with_grid(64, 64))?;
//! let colors = cloud.sample_colors(&ImageTexture::from_file("cat.png")?);
//! rasterizer.upload_colors(&colors);
//!
//! let mut tween = Tween::intro();
//! loop {
//!     tween.advance(clock.update());
//!     run_frame(&mut cloud, &tween, &input, &mut rasterizer)?;
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Points
//!
//! One point per grid cell, `columns × rows` in total, addressed by a flat
//! index `col * rows + row`. Each point has a fixed *target* on the grid
//! (centered at the origin, `z = 0`) and a fixed *initial* position at a
//! random depth in `[0, max_depth]`. Both are built once and never change;
//! see [`PointStore`].
//!
//! ### Transition
//!
//! Every frame every position is recomputed from scratch:
//!
//! ```text
//! pos = initial * (1 - t) + target * t + frequency * (1 - t) * noise(col, row, t)
//! ```
//!
//! with `t` the clamped progress. At `t = 1` the points sit exactly on the
//! grid. Easing belongs to the [`TransitionDriver`], not to the cloud.
//!
//! ### Interaction
//!
//! The pointer (NDC) is unprojected into a ray and tested against the grid's
//! bounding box. Inside, points use the hover size; outside, the default.
//! See [`InteractionController`].
//!
//! ## Collaborators
//!
//! The cloud is windowing and GPU agnostic. Defaults are provided for a
//! runnable viewer: [`Camera`], [`ImageTexture`], [`Input`], a wgpu
//! rasterizer in [`gpu`] and the winit app in [`viewer`].

pub mod camera;
pub mod cloud;
pub mod config;
pub mod driver;
pub mod error;
pub mod gpu;
pub mod grid;
pub mod input;
pub mod interaction;
pub mod noise;
pub mod ray;
pub mod scatter;
pub mod source;
pub mod store;
pub mod time;
pub mod transition;
pub mod viewer;

pub use glam::{Mat4, Vec2, Vec3, Vec4};

pub use camera::Camera;
pub use cloud::{create_point_cloud, run_frame, Frame, PointCloud, Rasterizer};
pub use config::{CloudConfig, Tuning};
pub use driver::{Easing, FixedProgress, TransitionDriver, Tween};
pub use error::{CloudError, GpuError, SourceError, ViewerError};
pub use grid::{grid_positions, GridIndex};
pub use input::{Input, PointerSource};
pub use interaction::{HitTest, HoverState, InteractionController, PointHit};
pub use ray::{Aabb, Ray};
pub use scatter::Scatter;
pub use source::{ImageSource, ImageTexture, SolidColor};
pub use store::PointStore;
pub use time::Time;
pub use transition::{NoiseField, TransitionState};
pub use viewer::ViewerConfig;

/// Everything needed to build and drive a cloud.
///
/// ```ignore
/// use dust_image::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        create_point_cloud, run_frame, CloudConfig, CloudError, Easing, FixedProgress, Frame,
        HitTest, HoverState, ImageSource, ImageTexture, PointCloud, PointerSource, Rasterizer,
        TransitionDriver, Tuning, Tween,
    };
    pub use glam::{Vec2, Vec3, Vec4};
}
