//! Scroll-independent ambience: the far starfield and cloud puff layouts.
//!
//! Both are generated once from a seed and never mutated; animation (twinkle,
//! puff spin) is evaluated from the accumulated clock in the shaders.

use crate::constants::*;
use crate::scenes::CloudPatch;
use glam::Vec3;
use rand::prelude::*;
use smallvec::SmallVec;

/// One star, positioned relative to the viewpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub offset: Vec3,
    pub size: f32,
    pub brightness: f32,
    pub phase: f32,
}

/// Stars scattered through a spherical shell of `STAR_RADIUS..STAR_RADIUS +
/// STAR_SHELL_DEPTH` around the viewer. Saturation is zero, so every star is
/// a grey level.
pub fn generate_starfield(count: usize, seed: u64) -> Vec<Star> {
    let count = count.min(STAR_COUNT_MAX);
    let mut rng = StdRng::seed_from_u64(seed ^ 0x5747_4152_u64);
    let mut r = STAR_RADIUS + STAR_SHELL_DEPTH;
    let increment = STAR_SHELL_DEPTH / count.max(1) as f32;
    (0..count)
        .map(|_| {
            r -= increment * rng.gen::<f32>();
            let theta = std::f32::consts::TAU * rng.gen::<f32>();
            let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
            let offset = Vec3::new(
                r * phi.sin() * theta.cos(),
                r * phi.sin() * theta.sin(),
                r * phi.cos(),
            );
            Star {
                offset,
                size: (0.5 + 0.5 * rng.gen::<f32>()) * STAR_SIZE_FACTOR,
                brightness: 0.9,
                phase: std::f32::consts::TAU * rng.gen::<f32>(),
            }
        })
        .collect()
}

/// One soft sprite inside a cloud patch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CloudPuff {
    pub offset: Vec3,
    pub scale: f32,
    pub density: f32,
    pub spin: f32,
}

pub type PuffLayout = SmallVec<[CloudPuff; CLOUD_SEGMENTS]>;

/// Puffs spread over the patch width and stacked back along its depth;
/// the middle segments are the largest.
pub fn generate_puffs(patch: &CloudPatch, seed: u64) -> PuffLayout {
    let mut rng = StdRng::seed_from_u64(seed);
    let segments = patch.segments.max(1);
    (0..segments)
        .map(|index| {
            let x = patch.width / 2.0 - rng.gen::<f32>() * patch.width;
            let y = patch.width / 2.0 - rng.gen::<f32>() * patch.width;
            let arc = (((index + 1) as f32 / segments as f32) * std::f32::consts::PI).sin();
            CloudPuff {
                offset: Vec3::new(x, y, -(index as f32) * patch.depth),
                scale: 0.4 + arc * ((0.2 + rng.gen::<f32>()) * 10.0),
                density: rng.gen::<f32>().max(0.2),
                spin: (0.005 * rng.gen::<f32>()).max(0.002) * patch.speed,
            }
        })
        .collect()
}
