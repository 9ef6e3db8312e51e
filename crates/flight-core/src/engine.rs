//! Owned per-mount state for the scene backend.
//!
//! One `FlightEngine` is created on mount and dropped on unmount, so nothing
//! (cached rasters, camera position, governor history) leaks across mounts.

use crate::atmosphere::Atmosphere;
use crate::camera::DepthCamera;
use crate::color::Rgb;
use crate::compositor::{FramePlan, SceneCompositor};
use crate::config::RendererConfig;
use crate::progress::LoadProgress;
use crate::quality::{GovernorConfig, QualityChange, QualityGovernor, QualityLevel};
use crate::scenes::SceneId;
use crate::signal::ScrollSignal;
use crate::texture::{SkylineTexture, TextureCache};
use glam::Vec3;
use std::rc::Rc;

/// Everything the renderer needs for one frame.
#[derive(Clone, Debug)]
pub struct SceneFrame {
    pub scroll: f32,
    pub viewpoint: Vec3,
    pub background: Rgb,
    pub clock: f32,
    pub plan: FramePlan,
    pub quality: Option<QualityChange>,
}

pub struct FlightEngine {
    signal: ScrollSignal,
    camera: DepthCamera,
    atmosphere: Atmosphere,
    compositor: SceneCompositor,
    textures: TextureCache,
    governor: QualityGovernor,
    progress: LoadProgress,
    pending_assets: Vec<SceneId>,
}

impl FlightEngine {
    /// `extra_steps` are preparation steps owned by the caller (GPU setup,
    /// geometry upload) that count toward the loading percentage.
    pub fn new(
        signal: ScrollSignal,
        config: &RendererConfig,
        textures: TextureCache,
        extra_steps: u32,
    ) -> Self {
        let ceiling = QualityLevel::capped(config.max_pixel_ratio);
        let mut pending_assets = SceneId::ALL.to_vec();
        pending_assets.reverse();
        Self {
            signal,
            camera: DepthCamera::new(),
            atmosphere: Atmosphere::default(),
            compositor: SceneCompositor::default(),
            textures,
            governor: QualityGovernor::new(GovernorConfig::default(), ceiling),
            progress: LoadProgress::new(SceneId::ALL.len() as u32 + extra_steps),
            pending_assets,
        }
    }

    pub fn camera(&self) -> &DepthCamera {
        &self.camera
    }

    pub fn atmosphere(&self) -> &Atmosphere {
        &self.atmosphere
    }

    pub fn governor(&self) -> &QualityGovernor {
        &self.governor
    }

    pub fn progress(&self) -> &LoadProgress {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut LoadProgress {
        &mut self.progress
    }

    /// Read-only view of a scene's raster; `None` if it could not be drawn.
    pub fn texture(&mut self, id: SceneId) -> Option<Rc<SkylineTexture>> {
        self.textures.get_texture(id)
    }

    /// Rasterize the next skyline that has not been prepared yet and count
    /// it as a loading step. Returns `None` once every scene was visited.
    pub fn prepare_next_asset(&mut self) -> Option<(SceneId, Option<Rc<SkylineTexture>>)> {
        let id = self.pending_assets.pop()?;
        let tex = self.textures.get_texture(id);
        self.progress.complete_step();
        Some((id, tex))
    }

    /// Advance camera, atmosphere, governor and layer plan by `dt_sec`.
    ///
    /// The scroll signal is read exactly once.
    pub fn step(&mut self, dt_sec: f32) -> SceneFrame {
        let scroll = self.signal.get();
        let viewpoint = self.camera.step(scroll, dt_sec);
        let background = self.atmosphere.evaluate(self.camera.depth());
        let quality = self.governor.record_frame(dt_sec);
        let clock = self.camera.clock();
        SceneFrame {
            scroll,
            viewpoint,
            background,
            clock,
            plan: self.compositor.plan(viewpoint, clock),
            quality,
        }
    }

    /// Release cached rasters and forget motion history.
    pub fn teardown(&mut self) {
        self.textures.clear();
        self.camera.reset();
        self.atmosphere.reset();
    }
}
