// Shared flight/scene tuning constants used by both render backends.

// Flight path
pub const MAX_DEPTH: f32 = 1000.0; // total flight distance along -Z
pub const CAMERA_DAMPING: f32 = 0.03; // per reference frame; heavy, inertial follow
pub const DEPTH_EPSILON: f32 = 1e-3; // below this the depth update is skipped
pub const REFERENCE_FPS: f32 = 60.0; // per-frame constants are tuned at this rate
pub const MAX_FRAME_DT_SEC: f32 = 0.1; // clamp after stalls (tab hidden, debugger)

// Idle camera breathing (clock seconds -> world units)
pub const DRIFT_X_FREQ: f32 = 0.1;
pub const DRIFT_X_AMPLITUDE: f32 = 1.0;
pub const DRIFT_Y_FREQ: f32 = 0.2;
pub const DRIFT_Y_AMPLITUDE: f32 = 0.5;

// Camera projection
pub const CAMERA_FOV_DEG: f32 = 50.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 2000.0;

// Atmosphere
pub const FOG_DENSITY: f32 = 0.01; // exponential-squared

// Billboards
pub const BILLBOARD_Y_OFFSET: f32 = -20.0;
pub const BILLBOARD_OPACITY: f32 = 0.85;
pub const BILLBOARD_ALPHA_TEST: f32 = 0.01;

// Procedural skyline raster (design space is fixed, output is scaled)
pub const SKYLINE_DESIGN_WIDTH: f32 = 2048.0;
pub const SKYLINE_DESIGN_HEIGHT: f32 = 1024.0;
pub const SKYLINE_GLOW_BLUR: f32 = 20.0; // shadow blur in design pixels
pub const SKYLINE_GLOW_STRENGTH: f32 = 0.5;

// Cloud patches
pub const CLOUD_OPACITY: f32 = 0.2;
pub const CLOUD_SPEED: f32 = 0.1;
pub const CLOUD_WIDTH: f32 = 20.0;
pub const CLOUD_DEPTH: f32 = 5.0;
pub const CLOUD_SEGMENTS: usize = 20;

// Starfield
pub const STAR_RADIUS: f32 = 300.0;
pub const STAR_SHELL_DEPTH: f32 = 50.0;
pub const STAR_COUNT_MAX: usize = 5000;
pub const STAR_SIZE_FACTOR: f32 = 4.0;
pub const STAR_TWINKLE_SPEED: f32 = 0.2;

// Post-processing (fixed, never scroll-reactive)
pub const BLOOM_THRESHOLD: f32 = 0.1;
pub const BLOOM_INTENSITY: f32 = 1.0;
pub const BLOOM_RADIUS: f32 = 0.6;
pub const GRAIN_OPACITY: f32 = 0.1;
pub const VIGNETTE_OFFSET: f32 = 0.1;
pub const VIGNETTE_DARKNESS: f32 = 1.2;

// Particle field
pub const PARTICLE_SPEED_GAIN: f32 = 5.0; // speed multiplier is 1 + scroll * gain
pub const PARTICLE_VERTICAL_DRIFT_GAIN: f32 = 2.0;
pub const PARTICLE_MAX_SIZE: f32 = 2.0;
pub const PARTICLE_BASE_SPEED: f32 = 0.5; // base velocity spans +-half of this
pub const PARTICLE_OPACITY_MIN: f32 = 0.2;
pub const PARTICLE_OPACITY_SPAN: f32 = 0.3;
pub const PALETTE_WARM_FROM: f32 = 0.3;
pub const PALETTE_NEUTRAL_FROM: f32 = 0.7;

pub const BUILDING_DRIFT_GAIN: f32 = 2.0;
pub const BUILDING_HEIGHT_GAIN: f32 = 0.5;
pub const BUILDING_PALETTE_SWITCH: f32 = 0.4;
pub const BUILDING_MIN_WIDTH: f32 = 50.0;
pub const BUILDING_WIDTH_SPAN: f32 = 150.0;

pub const TRAIL_BASE_OPACITY: f32 = 0.2;
pub const TRAIL_SCROLL_FALLOFF: f32 = 0.1;

// Quality governor
pub const PIXEL_RATIO_MIN: f32 = 1.0;
pub const PIXEL_RATIO_MAX: f32 = 1.5;
