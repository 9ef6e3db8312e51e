//! Per-frame layer planning for the scene backend.
//!
//! The compositor decides *what* is drawn and in which order; the GPU
//! renderer only executes the plan. Billboards are translucent and never
//! write depth, so correctness depends on strict back-to-front ordering.

use crate::color::Rgb;
use crate::constants::*;
use crate::scenes::{CloudPatch, SceneDefinition, SceneId, CLOUD_PATCHES, SCENES};
use glam::{Mat4, Vec3};
use smallvec::SmallVec;

/// Fixed post-processing parameters. Never reactive to scroll.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PostSettings {
    pub bloom_threshold: f32,
    pub bloom_intensity: f32,
    pub bloom_radius: f32,
    pub grain_opacity: f32,
    pub vignette_offset: f32,
    pub vignette_darkness: f32,
}

pub const POST_SETTINGS: PostSettings = PostSettings {
    bloom_threshold: BLOOM_THRESHOLD,
    bloom_intensity: BLOOM_INTENSITY,
    bloom_radius: BLOOM_RADIUS,
    grain_opacity: GRAIN_OPACITY,
    vignette_offset: VIGNETTE_OFFSET,
    vignette_darkness: VIGNETTE_DARKNESS,
};

/// Hemisphere ambient term ("night" environment).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientLight {
    pub sky: Rgb,
    pub ground: Rgb,
    pub intensity: f32,
}

pub const NIGHT_ENVIRONMENT: AmbientLight = AmbientLight {
    sky: Rgb::new(0.16, 0.19, 0.30),
    ground: Rgb::new(0.02, 0.02, 0.035),
    intensity: 0.35,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BillboardDraw {
    pub scene: SceneId,
    pub model: Mat4,
    pub tint: Rgb,
    pub opacity: f32,
    pub alpha_test: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CloudDraw {
    pub patch: usize,
    pub origin: Vec3,
    pub opacity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Layer {
    Starfield,
    Environment(AmbientLight),
    Billboard(BillboardDraw),
    Clouds(CloudDraw),
}

pub type Layers = SmallVec<[Layer; 8]>;

#[derive(Clone, Debug, PartialEq)]
pub struct FramePlan {
    pub layers: Layers,
    pub post: PostSettings,
}

impl FramePlan {
    pub fn billboards(&self) -> impl Iterator<Item = &BillboardDraw> {
        self.layers.iter().filter_map(|l| match l {
            Layer::Billboard(b) => Some(b),
            _ => None,
        })
    }
}

#[derive(Clone, Debug)]
pub struct SceneCompositor {
    scenes: [SceneDefinition; 3],
    clouds: [CloudPatch; 3],
}

impl Default for SceneCompositor {
    fn default() -> Self {
        Self {
            scenes: SCENES,
            clouds: CLOUD_PATCHES,
        }
    }
}

enum Slot {
    Scene(usize),
    Cloud(usize),
}

impl SceneCompositor {
    /// Billboard transform for `scene` at clock `t`, idle motion included.
    pub fn billboard_model(scene: &SceneDefinition, t: f32) -> Mat4 {
        // Offset each scene's phase so the three do not bob in lockstep.
        let (lift, rotation) = scene
            .idle_motion
            .sample(t, scene.id.index() as f32 * 1.7);
        let scale = Vec3::new(scene.footprint.0, scene.footprint.1, 1.0);
        let translation = scene.anchor() + Vec3::Y * lift;
        Mat4::from_scale_rotation_translation(scale, rotation, translation)
    }

    /// Back-to-front plan for a viewpoint at `eye` and clock `t`.
    ///
    /// Slots at or behind the viewpoint are culled.
    pub fn plan(&self, eye: Vec3, t: f32) -> FramePlan {
        let mut layers = Layers::new();
        layers.push(Layer::Starfield);
        layers.push(Layer::Environment(NIGHT_ENVIRONMENT));

        let mut slots: SmallVec<[(f32, Slot); 6]> = SmallVec::new();
        for (i, s) in self.scenes.iter().enumerate() {
            slots.push((eye.z - s.depth, Slot::Scene(i)));
        }
        for (i, c) in self.clouds.iter().enumerate() {
            slots.push((eye.z - c.position.z, Slot::Cloud(i)));
        }
        slots.retain(|(distance, _)| *distance > CAMERA_ZNEAR);
        slots.sort_by(|a, b| b.0.total_cmp(&a.0));

        for (_, slot) in slots {
            layers.push(match slot {
                Slot::Scene(i) => {
                    let s = &self.scenes[i];
                    Layer::Billboard(BillboardDraw {
                        scene: s.id,
                        model: Self::billboard_model(s, t),
                        tint: s.tint,
                        opacity: BILLBOARD_OPACITY,
                        alpha_test: BILLBOARD_ALPHA_TEST,
                    })
                }
                Slot::Cloud(i) => {
                    let c = &self.clouds[i];
                    Layer::Clouds(CloudDraw {
                        patch: i,
                        origin: c.position,
                        opacity: c.opacity,
                    })
                }
            });
        }

        FramePlan {
            layers,
            post: POST_SETTINGS,
        }
    }
}

/// World-space center of a billboard transform.
pub fn billboard_center(model: &Mat4) -> Vec3 {
    let (_, _, translation) = model.to_scale_rotation_translation();
    translation
}
