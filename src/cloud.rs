//! The point cloud: store, transition state and interaction in one place.
//!
//! [`PointCloud::advance`] is the whole per-frame contract. It takes the
//! driver's progress and the latest pointer sample, rewrites the position
//! buffer in place and returns a [`Frame`] borrowing it. `&mut self` keeps
//! at most one frame in flight.

use crate::camera::Camera;
use crate::config::{CloudConfig, Tuning};
use crate::driver::TransitionDriver;
use crate::error::CloudError;
use crate::interaction::{pointer_ray, HitTest, HoverState, InteractionController};
use crate::input::PointerSource;
use crate::scatter::Scatter;
use crate::source::ImageSource;
use crate::store::PointStore;
use crate::transition::{clamp_progress, evaluate_into, NoiseField, TransitionState};
use glam::{Mat4, Vec2, Vec3, Vec4};
use rand::Rng;

/// What the rasterizer needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Current render positions in flat order.
    pub positions: &'a [Vec3],
    pub point_size: f32,
    pub hit: HitTest,
    /// Progress actually used, after clamping.
    pub progress: f32,
}

/// Draws frames. Implemented by the GPU backend and by test recorders.
pub trait Rasterizer {
    type Error;

    /// Called once with one color per point, in flat order.
    fn upload_colors(&mut self, colors: &[Vec4]);

    /// Draw one frame. Positions change every call; sizes may.
    fn draw(&mut self, frame: &Frame<'_>) -> Result<(), Self::Error>;
}

/// An animated point cloud.
#[derive(Debug, Clone)]
pub struct PointCloud {
    config: CloudConfig,
    store: PointStore,
    field: NoiseField,
    state: TransitionState,
    interaction: InteractionController,
    positions: Vec<Vec3>,
    inv_view_proj: Mat4,
    last_hit: HitTest,
}

/// Build a point cloud from `config`.
///
/// Fails with [`CloudError::InvalidConfiguration`] before anything is
/// allocated if the configuration is out of range.
pub fn create_point_cloud(config: CloudConfig) -> Result<PointCloud, CloudError> {
    PointCloud::new(config)
}

impl PointCloud {
    pub fn new(config: CloudConfig) -> Result<Self, CloudError> {
        config.validate()?;
        let mut scatter = Scatter::seeded(config.seed, config.max_depth)?;
        Ok(Self::assemble(config, &mut scatter))
    }

    /// Build with an explicit RNG for the scatter.
    pub fn with_scatter<R: Rng>(config: CloudConfig, rng: R) -> Result<Self, CloudError> {
        config.validate()?;
        let mut scatter = Scatter::with_rng(rng, config.max_depth)?;
        Ok(Self::assemble(config, &mut scatter))
    }

    fn assemble<R: Rng>(config: CloudConfig, scatter: &mut Scatter<R>) -> Self {
        let store = PointStore::build_with(&config, scatter);
        let mut positions = vec![Vec3::ZERO; store.len()];
        let field = NoiseField::from_config(&config);
        let state = TransitionState::from_config(&config);
        evaluate_into(&field, &store, state.progress, state.frequency, &mut positions);

        log::info!(
            "Created point cloud: {} points, max depth {}, frequency {}",
            store.len(),
            config.max_depth,
            config.frequency
        );

        Self {
            interaction: InteractionController::from_config(&config),
            inv_view_proj: Camera::default().view_proj(1.0).inverse(),
            last_hit: HitTest::MISS,
            config,
            store,
            field,
            state,
            positions,
        }
    }

    /// Camera matrix used to unproject the pointer.
    pub fn set_view_projection(&mut self, view_proj: Mat4) {
        self.inv_view_proj = view_proj.inverse();
    }

    /// Change the noise amplitude. Rejects negative or non-finite values.
    pub fn set_frequency(&mut self, frequency: f32) -> Result<(), CloudError> {
        if !frequency.is_finite() || frequency < 0.0 {
            return Err(CloudError::invalid(
                "frequency",
                format!("must be finite and >= 0, got {}", frequency),
            ));
        }
        self.state.frequency = frequency;
        Ok(())
    }

    /// Apply a live-tuning update and re-evaluate the positions at the
    /// tuned progress. Hover state is left as is.
    pub fn apply_tuning(&mut self, tuning: Tuning) -> Result<&[Vec3], CloudError> {
        tuning.validate()?;
        self.set_frequency(tuning.frequency)?;
        self.state.progress = clamp_progress(tuning.progress);
        evaluate_into(
            &self.field,
            &self.store,
            self.state.progress,
            self.state.frequency,
            &mut self.positions,
        );
        Ok(&self.positions)
    }

    /// Evaluate one frame.
    ///
    /// Positions are recomputed for every point from `progress`, then the
    /// pointer is tested against the cloud and the point size updated.
    pub fn advance(&mut self, progress: f32, pointer_ndc: Option<Vec2>) -> Frame<'_> {
        let t = clamp_progress(progress);
        self.state.progress = t;
        evaluate_into(
            &self.field,
            &self.store,
            t,
            self.state.frequency,
            &mut self.positions,
        );

        let ray = pointer_ndc.and_then(|ndc| pointer_ray(self.inv_view_proj, ndc));
        self.last_hit = self
            .interaction
            .update(self.store.bounds(), ray.as_ref(), &self.positions);
        self.state.point_size = self.interaction.point_size();

        Frame {
            positions: &self.positions,
            point_size: self.state.point_size,
            hit: self.last_hit,
            progress: t,
        }
    }

    /// One color per point, sampled at its grid UV.
    pub fn sample_colors(&self, source: &dyn ImageSource) -> Vec<Vec4> {
        (0..self.store.len())
            .map(|i| {
                let uv = self.store.uv(i);
                source.sample_color(uv.x, uv.y)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn config(&self) -> &CloudConfig {
        &self.config
    }

    pub fn store(&self) -> &PointStore {
        &self.store
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn frequency(&self) -> f32 {
        self.state.frequency
    }

    pub fn hover_state(&self) -> HoverState {
        self.interaction.state()
    }

    pub fn interaction(&self) -> &InteractionController {
        &self.interaction
    }

    /// Positions from the last [`advance`](Self::advance).
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn last_hit(&self) -> HitTest {
        self.last_hit
    }
}

/// Run one frame of the loop: read progress, evaluate, hit test, draw.
pub fn run_frame<D, P, R>(
    cloud: &mut PointCloud,
    driver: &D,
    pointer: &P,
    rasterizer: &mut R,
) -> Result<HitTest, R::Error>
where
    D: TransitionDriver + ?Sized,
    P: PointerSource + ?Sized,
    R: Rasterizer + ?Sized,
{
    let frame = cloud.advance(driver.current_progress(), pointer.pointer_ndc());
    rasterizer.draw(&frame)?;
    Ok(frame.hit)
}
