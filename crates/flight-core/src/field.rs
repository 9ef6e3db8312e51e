//! Low-power fallback backend: drifting particles over parallax silhouettes.
//!
//! Every mutation is a function of (previous state, frame delta, scroll).
//! Drawing goes through [`FieldCanvas`] so the same code paints a Canvas2D
//! context in the browser and a recording canvas in tests. The trail canvas
//! is never cleared, so the vignette is not painted into it: it lives on a
//! static overlay above the canvas, described by [`vignette_css`].

use crate::color::{Rgb, Rgba};
use crate::constants::*;
use crate::signal::Viewport;
use rand::prelude::*;

/// Drawing primitives the field needs from a 2D surface.
pub trait FieldCanvas {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba);
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba);
    /// Vertical gradient from `bottom` at `y + h` to `top` at `y`.
    fn fill_vertical_gradient(&mut self, x: f32, y: f32, w: f32, h: f32, bottom: Rgba, top: Rgba);
    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba, line_width: f32);
}

/// Particle palette band for a scroll value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Palette {
    Cool,
    Warm,
    Neutral,
}

impl Palette {
    /// Step function of scroll; each band includes its lower bound.
    pub fn for_scroll(scroll: f32) -> Palette {
        if scroll < PALETTE_WARM_FROM {
            Palette::Cool
        } else if scroll < PALETTE_NEUTRAL_FROM {
            Palette::Warm
        } else {
            Palette::Neutral
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            Palette::Cool => Rgb::from_u8(100, 150, 255),
            Palette::Warm => Rgb::from_u8(200, 180, 100),
            Palette::Neutral => Rgb::from_u8(200, 200, 220),
        }
    }
}

/// Two gradient stops plus outline for the silhouettes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SilhouetteStyle {
    pub base: Rgba,
    pub crown: Rgba,
    pub outline: Rgba,
}

pub fn silhouette_style(scroll: f32) -> SilhouetteStyle {
    if scroll < BUILDING_PALETTE_SWITCH {
        SilhouetteStyle {
            base: Rgba::from_u8(10, 15, 26, 1.0),
            crown: Rgba::from_u8(74, 111, 165, 0.05),
            outline: Rgba::from_u8(74, 111, 165, 0.1),
        }
    } else {
        SilhouetteStyle {
            base: Rgba::from_u8(5, 8, 15, 1.0),
            crown: Rgba::from_u8(197, 160, 89, 0.05),
            outline: Rgba::from_u8(197, 160, 89, 0.1),
        }
    }
}

/// Low-opacity fill that leaves motion trails; longer at high scroll.
pub fn trail_fill(scroll: f32) -> Rgba {
    Rgba::from_u8(
        10,
        15,
        26,
        TRAIL_BASE_OPACITY - scroll.clamp(0.0, 1.0) * TRAIL_SCROLL_FALLOFF,
    )
}

/// Edge color of the vignette overlay; the center is transparent.
pub const VIGNETTE_EDGE: Rgba = Rgba::from_u8(10, 15, 26, 1.0);

/// CSS background for the static vignette overlay above the field canvas.
pub fn vignette_css() -> String {
    format!(
        "radial-gradient(circle at center, {} 0%, {} 100%)",
        Rgba { a: 0.0, ..VIGNETTE_EDGE }.to_css(),
        VIGNETTE_EDGE.to_css()
    )
}

/// Wrap `v` into `[0, extent)`.
#[inline]
pub fn wrap(v: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return 0.0;
    }
    let w = v.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs.
    if w >= extent {
        0.0
    } else {
        w
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub vx: f32,
    pub vy: f32,
}

impl Particle {
    fn spawn(rng: &mut StdRng, width: f32, height: f32) -> Self {
        Self {
            x: wrap(rng.gen::<f32>() * width, width),
            y: wrap(rng.gen::<f32>() * height, height),
            size: rng.gen::<f32>() * PARTICLE_MAX_SIZE,
            vx: (rng.gen::<f32>() - 0.5) * PARTICLE_BASE_SPEED,
            vy: (rng.gen::<f32>() - 0.5) * PARTICLE_BASE_SPEED,
        }
    }

    /// `frames` is the frame delta in reference frames (1.0 at 60 Hz).
    pub fn update(&mut self, scroll: f32, frames: f32, width: f32, height: f32) {
        let speed = 1.0 + scroll * PARTICLE_SPEED_GAIN;
        self.x = wrap(self.x + self.vx * speed * frames, width);
        self.y = wrap(
            self.y + (self.vy + scroll * PARTICLE_VERTICAL_DRIFT_GAIN) * frames,
            height,
        );
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Silhouette {
    pub x: f32,
    pub width: f32,
    pub height: f32,
    pub drift_speed: f32,
}

impl Silhouette {
    fn spawn(rng: &mut StdRng, width: f32, height: f32) -> Self {
        Self {
            x: rng.gen::<f32>() * width,
            width: BUILDING_MIN_WIDTH + rng.gen::<f32>() * BUILDING_WIDTH_SPAN,
            height: height * 0.2 + rng.gen::<f32>() * height * 0.5,
            drift_speed: 0.2 + rng.gen::<f32>() * 0.5,
        }
    }

    /// Drift left; once fully off the left edge, re-enter on the right.
    pub fn update(&mut self, scroll: f32, frames: f32, view_width: f32) {
        self.x -= self.drift_speed * (1.0 + scroll * BUILDING_DRIFT_GAIN) * frames;
        if self.x + self.width < 0.0 {
            self.x = view_width;
        }
    }

    /// Camera descends as the page scrolls, so buildings appear to rise.
    pub fn apparent_height(&self, scroll: f32) -> f32 {
        self.height * (1.0 + scroll * BUILDING_HEIGHT_GAIN)
    }
}

pub struct ParticleField {
    particles: Vec<Particle>,
    silhouettes: Vec<Silhouette>,
    width: f32,
    height: f32,
    rng: StdRng,
}

impl ParticleField {
    pub fn new(viewport: Viewport, particles: usize, silhouettes: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let (w, h) = (viewport.width as f32, viewport.height as f32);
        let particles = (0..particles)
            .map(|_| Particle::spawn(&mut rng, w, h))
            .collect();
        let silhouettes = (0..silhouettes)
            .map(|_| Silhouette::spawn(&mut rng, w, h))
            .collect();
        log::info!("[field] {}x{} seeded {}", viewport.width, viewport.height, seed);
        Self {
            particles,
            silhouettes,
            width: w,
            height: h,
            rng,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn silhouettes(&self) -> &[Silhouette] {
        &self.silhouettes
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// New surface size; positions are rescaled so the wrap invariant holds
    /// immediately instead of on the next update.
    pub fn resize(&mut self, viewport: Viewport) {
        let (w, h) = (viewport.width as f32, viewport.height as f32);
        if w == self.width && h == self.height {
            return;
        }
        let (kx, ky) = (w / self.width, h / self.height);
        for p in &mut self.particles {
            p.x = wrap(p.x * kx, w);
            p.y = wrap(p.y * ky, h);
        }
        for s in &mut self.silhouettes {
            s.x *= kx;
            s.height *= ky;
        }
        self.width = w;
        self.height = h;
    }

    pub fn update(&mut self, scroll: f32, dt_sec: f32) {
        let scroll = scroll.clamp(0.0, 1.0);
        let frames = dt_sec.clamp(0.0, MAX_FRAME_DT_SEC) * REFERENCE_FPS;
        for s in &mut self.silhouettes {
            s.update(scroll, frames, self.width);
        }
        for p in &mut self.particles {
            p.update(scroll, frames, self.width, self.height);
        }
    }

    /// Paint one frame: trail fill, silhouettes, particles.
    pub fn draw(&mut self, scroll: f32, canvas: &mut impl FieldCanvas) {
        let scroll = scroll.clamp(0.0, 1.0);
        canvas.fill_rect(0.0, 0.0, self.width, self.height, trail_fill(scroll));

        let style = silhouette_style(scroll);
        for s in &self.silhouettes {
            let h = s.apparent_height(scroll);
            let top = self.height - h;
            canvas.fill_vertical_gradient(s.x, top, s.width, h, style.base, style.crown);
            canvas.stroke_rect(s.x, top, s.width, h, style.outline, 1.0);
        }

        let rgb = Palette::for_scroll(scroll).color();
        for p in &self.particles {
            let opacity = PARTICLE_OPACITY_MIN + self.rng.gen::<f32>() * PARTICLE_OPACITY_SPAN;
            canvas.fill_circle(p.x, p.y, p.size, rgb.with_alpha(opacity));
        }
    }

    /// One full frame: update then draw.
    pub fn frame(&mut self, scroll: f32, dt_sec: f32, canvas: &mut impl FieldCanvas) {
        self.update(scroll, dt_sec);
        self.draw(scroll, canvas);
    }
}
