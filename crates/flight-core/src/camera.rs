//! Viewpoint state and the scroll-to-depth controller.
//!
//! These types avoid platform APIs so both render backends and the host tests
//! can drive them. The web frontend turns [`Camera`] into view/projection
//! matrices every frame.

use crate::constants::*;
use glam::{Mat4, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Camera at `eye` looking straight down the flight axis (-Z).
    pub fn looking_down_flight(eye: Vec3, aspect: f32) -> Self {
        Self {
            eye,
            target: eye - Vec3::Z,
            up: Vec3::Y,
            aspect,
            fovy_radians: CAMERA_FOV_DEG.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Depth the viewpoint should settle at for a given scroll progress.
///
/// Monotonically non-increasing in `scroll`: the flight never reverses for the
/// same or a larger scroll value.
#[inline]
pub fn target_depth(scroll: f32) -> f32 {
    -scroll.clamp(0.0, 1.0) * MAX_DEPTH
}

/// Fraction of the remaining distance covered in one step of `dt_sec`.
///
/// Equals [`CAMERA_DAMPING`] at the reference frame rate and compounds the
/// same per-frame rate for longer or shorter frames, so it never exceeds 1
/// and the follow never overshoots.
#[inline]
pub fn damping_alpha(dt_sec: f32) -> f32 {
    let frames = dt_sec.clamp(0.0, MAX_FRAME_DT_SEC) * REFERENCE_FPS;
    1.0 - (1.0 - CAMERA_DAMPING).powf(frames)
}

/// Live viewpoint, critically damped toward the scroll target.
#[derive(Clone, Debug, Default)]
pub struct DepthCamera {
    position: Vec3,
    clock: f32,
}

impl DepthCamera {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Accumulated clock in seconds (sum of stepped frame deltas).
    #[inline]
    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// Absolute distance travelled along the flight axis.
    #[inline]
    pub fn depth(&self) -> f32 {
        self.position.z.abs()
    }

    /// Advance one frame: damp z toward the scroll target and resample the
    /// idle breathing on x/y.
    pub fn step(&mut self, scroll: f32, dt_sec: f32) -> Vec3 {
        let dt = dt_sec.clamp(0.0, MAX_FRAME_DT_SEC);
        self.clock += dt;

        let target = target_depth(scroll);
        let delta = target - self.position.z;
        if delta.abs() >= DEPTH_EPSILON {
            self.position.z += delta * damping_alpha(dt);
        }

        let (dx, dy) = idle_drift(self.clock);
        self.position.x = dx;
        self.position.y = dy;
        self.position
    }

    /// Back to the origin; used on remount.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Slow breathing offset, bounded by the drift amplitudes.
#[inline]
pub fn idle_drift(clock_sec: f32) -> (f32, f32) {
    (
        (clock_sec * DRIFT_X_FREQ).sin() * DRIFT_X_AMPLITUDE,
        (clock_sec * DRIFT_Y_FREQ).sin() * DRIFT_Y_AMPLITUDE,
    )
}
