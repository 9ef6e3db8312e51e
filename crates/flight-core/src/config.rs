//! Per-mount options read from the canvas element's `data-*` attributes.

use crate::constants::{PIXEL_RATIO_MAX, PIXEL_RATIO_MIN, STAR_COUNT_MAX};
use crate::error::ConfigError;
use std::str::FromStr;

/// Which backend the host page asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ModePreference {
    #[default]
    Auto,
    Scene,
    Field,
}

impl FromStr for ModePreference {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(ModePreference::Auto),
            "scene" | "3d" => Ok(ModePreference::Scene),
            "field" | "2d" => Ok(ModePreference::Field),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }
}

/// What the capability check found on this device.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub webgpu: bool,
    pub reduced_motion: bool,
}

/// Backend actually mounted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    Scene,
    Field,
}

impl RenderMode {
    pub fn name(self) -> &'static str {
        match self {
            RenderMode::Scene => "scene",
            RenderMode::Field => "field",
        }
    }
}

/// The scene backend needs WebGPU; reduced-motion devices get the lighter
/// field unless the page insists on the scene.
pub fn select_mode(pref: ModePreference, caps: Capabilities) -> RenderMode {
    match pref {
        ModePreference::Field => RenderMode::Field,
        _ if !caps.webgpu => RenderMode::Field,
        ModePreference::Scene => RenderMode::Scene,
        ModePreference::Auto if caps.reduced_motion => RenderMode::Field,
        ModePreference::Auto => RenderMode::Scene,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RendererConfig {
    pub mode: ModePreference,
    pub max_pixel_ratio: f32,
    pub particles: usize,
    pub buildings: usize,
    pub stars: usize,
    pub texture_width: u32,
    pub seed: u64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            mode: ModePreference::Auto,
            max_pixel_ratio: PIXEL_RATIO_MAX,
            particles: 200,
            buildings: 15,
            stars: STAR_COUNT_MAX,
            texture_width: 2048,
            seed: 42,
        }
    }
}

fn number<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::NotANumber {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn in_range(key: &str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value < min || value > max || value.is_nan() {
        return Err(ConfigError::OutOfRange {
            key: key.to_string(),
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn clamped(key: &str, value: usize, min: usize, max: usize) -> usize {
    let v = value.clamp(min, max);
    if v != value {
        log::warn!("[config] {} {} clamped to {}", key, value, v);
    }
    v
}

impl RendererConfig {
    /// Build from `(key, value)` pairs, keys without the `data-` prefix.
    ///
    /// Unknown keys are ignored. Counts are clamped into their supported
    /// ranges; ratios and sizes outside range are errors.
    pub fn from_pairs<'a>(
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        for (key, value) in pairs {
            match key {
                "mode" => cfg.mode = value.parse()?,
                "max-dpr" => {
                    let v: f32 = number(key, value)?;
                    in_range(key, v as f64, PIXEL_RATIO_MIN as f64, PIXEL_RATIO_MAX as f64)?;
                    cfg.max_pixel_ratio = v;
                }
                "particles" => cfg.particles = clamped(key, number(key, value)?, 150, 250),
                "buildings" => cfg.buildings = clamped(key, number(key, value)?, 10, 20),
                "stars" => cfg.stars = clamped(key, number(key, value)?, 0, STAR_COUNT_MAX),
                "texture-width" => {
                    let v: u32 = number(key, value)?;
                    in_range(key, v as f64, 256.0, 4096.0)?;
                    cfg.texture_width = v;
                }
                "seed" => cfg.seed = number(key, value)?,
                _ => {}
            }
        }
        Ok(cfg)
    }
}
