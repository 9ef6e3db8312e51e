//! The fixed scene catalog: three skylines along the flight path, each with a
//! cloud patch in front of it.

use crate::color::Rgb;
use crate::constants::*;
use glam::{Quat, Vec3};

/// The three themed locales, in flight order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SceneId {
    London,
    Washington,
    Dubai,
}

impl SceneId {
    pub const ALL: [SceneId; 3] = [SceneId::London, SceneId::Washington, SceneId::Dubai];

    pub fn name(self) -> &'static str {
        match self {
            SceneId::London => "london",
            SceneId::Washington => "dc",
            SceneId::Dubai => "dubai",
        }
    }

    pub fn index(self) -> usize {
        match self {
            SceneId::London => 0,
            SceneId::Washington => 1,
            SceneId::Dubai => 2,
        }
    }
}

/// Decorative float/rotation applied to a billboard.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IdleMotion {
    pub speed: f32,
    pub rotation_amplitude: f32,
    pub float_amplitude: f32,
}

impl IdleMotion {
    /// Vertical offset and rotation at clock `t` seconds.
    ///
    /// Bounded by `float_amplitude / 10` vertically and
    /// `rotation_amplitude / 8` per axis.
    pub fn sample(&self, t: f32, phase_offset: f32) -> (f32, Quat) {
        let phase = (phase_offset + t) / 4.0 * self.speed;
        let rx = phase.cos() / 8.0 * self.rotation_amplitude;
        let ry = phase.sin() / 8.0 * self.rotation_amplitude;
        let rz = phase.sin() / 20.0 * self.rotation_amplitude;
        let y = phase.sin() / 10.0 * self.float_amplitude;
        (y, Quat::from_euler(glam::EulerRot::XYZ, rx, ry, rz))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneDefinition {
    pub id: SceneId,
    pub depth: f32,
    pub footprint: (f32, f32),
    pub tint: Rgb,
    pub idle_motion: IdleMotion,
}

impl SceneDefinition {
    /// Billboard anchor in world space (before idle motion).
    pub fn anchor(&self) -> Vec3 {
        Vec3::new(0.0, BILLBOARD_Y_OFFSET, self.depth)
    }
}

const SCENE_FLOAT: IdleMotion = IdleMotion {
    speed: 1.5,
    rotation_amplitude: 0.01,
    float_amplitude: 0.05,
};

pub const SCENES: [SceneDefinition; 3] = [
    SceneDefinition {
        id: SceneId::London,
        depth: -150.0,
        footprint: (250.0, 125.0),
        tint: Rgb::from_hex(0x8899aa),
        idle_motion: SCENE_FLOAT,
    },
    SceneDefinition {
        id: SceneId::Washington,
        depth: -500.0,
        footprint: (300.0, 150.0),
        tint: Rgb::from_hex(0xdddddd),
        idle_motion: SCENE_FLOAT,
    },
    SceneDefinition {
        id: SceneId::Dubai,
        depth: -900.0,
        footprint: (250.0, 250.0),
        tint: Rgb::from_hex(0xcc9966),
        idle_motion: SCENE_FLOAT,
    },
];

pub fn scene(id: SceneId) -> &'static SceneDefinition {
    &SCENES[id.index()]
}

/// Soft cloud "floor" drifting in front of a skyline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CloudPatch {
    pub position: Vec3,
    pub opacity: f32,
    pub speed: f32,
    pub width: f32,
    pub depth: f32,
    pub segments: usize,
}

const fn cloud_at(z: f32) -> CloudPatch {
    CloudPatch {
        position: Vec3::new(0.0, 0.0, z),
        opacity: CLOUD_OPACITY,
        speed: CLOUD_SPEED,
        width: CLOUD_WIDTH,
        depth: CLOUD_DEPTH,
        segments: CLOUD_SEGMENTS,
    }
}

pub const CLOUD_PATCHES: [CloudPatch; 3] = [cloud_at(-100.0), cloud_at(-450.0), cloud_at(-800.0)];
