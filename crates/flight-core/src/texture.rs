//! Procedural skyline rasters, generated once per scene and memoized.
//!
//! Each skyline is drawn in a fixed 2048x1024 design space with tiny-skia and
//! scaled to the requested raster size. Shapes are white on transparent; the
//! renderer tints them per scene. A soft glow (a blurred copy of the coverage)
//! sits underneath the shapes.

use crate::constants::*;
use crate::error::FlightError;
use crate::scenes::SceneId;
use fnv::FnvHashMap;
use std::rc::Rc;
use tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, Transform};

/// Cubic control-point factor for a quarter ellipse.
const KAPPA: f32 = 0.552_284_8;

/// Straight-alpha RGBA8 image, immutable after creation.
#[derive(Debug, PartialEq)]
pub struct SkylineTexture {
    scene: SceneId,
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl SkylineTexture {
    pub fn scene(&self) -> SceneId {
        self.scene
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGBA8 pixels, `width * height * 4` bytes.
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.rgba[((y * self.width + x) * 4 + 3) as usize]
    }

    /// Fraction of pixels with any coverage.
    pub fn coverage(&self) -> f32 {
        let covered = self.rgba.chunks_exact(4).filter(|p| p[3] > 0).count();
        covered as f32 / (self.width * self.height).max(1) as f32
    }
}

/// Raster dimensions used by the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RasterSize {
    pub width: u32,
    pub height: u32,
}

impl RasterSize {
    /// Keeps the 2:1 design aspect.
    pub fn from_width(width: u32) -> Self {
        Self {
            width,
            height: width / 2,
        }
    }
}

/// Memoizing skyline generator owned by one mount.
///
/// A cache created with [`TextureCache::headless`] has no raster surface: it
/// answers `None` for every scene until a surface is attached. Failed lookups
/// are not cached and do not count as generations.
#[derive(Debug, Default)]
pub struct TextureCache {
    surface: Option<RasterSize>,
    textures: FnvHashMap<SceneId, Rc<SkylineTexture>>,
    generations: usize,
}

impl TextureCache {
    pub fn new(size: RasterSize) -> Self {
        Self {
            surface: Some(size),
            ..Self::default()
        }
    }

    /// No drawing surface yet (pre-mount or headless evaluation).
    pub fn headless() -> Self {
        Self::default()
    }

    pub fn attach_surface(&mut self, size: RasterSize) {
        self.surface = Some(size);
    }

    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    /// Cached skyline for `id`, rasterizing it on first use.
    pub fn get_texture(&mut self, id: SceneId) -> Option<Rc<SkylineTexture>> {
        if let Some(tex) = self.textures.get(&id) {
            return Some(Rc::clone(tex));
        }
        let size = self.surface?;
        match rasterize_skyline(id, size) {
            Ok(tex) => {
                self.generations += 1;
                log::info!(
                    "[texture] generated {} skyline {}x{}",
                    id.name(),
                    tex.width,
                    tex.height
                );
                let tex = Rc::new(tex);
                self.textures.insert(id, Rc::clone(&tex));
                Some(tex)
            }
            Err(e) => {
                log::warn!("[texture] {}: {}", id.name(), e);
                None
            }
        }
    }

    pub fn is_cached(&self, id: SceneId) -> bool {
        self.textures.contains_key(&id)
    }

    /// Number of rasterizations performed by this cache.
    pub fn generations(&self) -> usize {
        self.generations
    }

    /// Drop every cached raster; used on unmount.
    pub fn clear(&mut self) {
        self.textures.clear();
    }
}

/// Rasterize the skyline for `id` at `size`.
pub fn rasterize_skyline(id: SceneId, size: RasterSize) -> Result<SkylineTexture, FlightError> {
    let unavailable = FlightError::RasterUnavailable {
        width: size.width,
        height: size.height,
    };
    let mut pixmap = Pixmap::new(size.width, size.height).ok_or(unavailable)?;
    let sx = size.width as f32 / SKYLINE_DESIGN_WIDTH;
    let sy = size.height as f32 / SKYLINE_DESIGN_HEIGHT;
    let mut canvas = DesignCanvas {
        pixmap: &mut pixmap,
        transform: Transform::from_scale(sx, sy),
        paint: white_paint(),
    };
    match id {
        SceneId::London => draw_london(&mut canvas),
        SceneId::Washington => draw_washington(&mut canvas),
        SceneId::Dubai => draw_dubai(&mut canvas),
    }

    let coverage: Vec<f32> = pixmap
        .pixels()
        .iter()
        .map(|p| p.alpha() as f32 / 255.0)
        .collect();
    let sigma = SKYLINE_GLOW_BLUR * 0.5 * sx.min(sy);
    let glow = gaussian_approx(&coverage, size.width as usize, size.height as usize, sigma);

    let mut rgba = Vec::with_capacity(coverage.len() * 4);
    for (shape, halo) in coverage.iter().zip(glow.iter()) {
        let halo = halo * SKYLINE_GLOW_STRENGTH;
        let a = shape + halo * (1.0 - shape);
        rgba.extend_from_slice(&[255, 255, 255, (a.clamp(0.0, 1.0) * 255.0).round() as u8]);
    }
    Ok(SkylineTexture {
        scene: id,
        width: size.width,
        height: size.height,
        rgba,
    })
}

fn white_paint() -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(255, 255, 255, 255);
    paint.anti_alias = true;
    paint
}

/// Canvas-style helpers over a pixmap in design-space coordinates.
struct DesignCanvas<'a> {
    pixmap: &'a mut Pixmap,
    transform: Transform,
    paint: Paint<'static>,
}

impl DesignCanvas<'_> {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        if let Some(rect) = Rect::from_xywh(x, y, w, h) {
            self.pixmap.fill_rect(rect, &self.paint, self.transform, None);
        }
    }

    fn fill(&mut self, path: Option<Path>) {
        if let Some(path) = path {
            self.pixmap
                .fill_path(&path, &self.paint, FillRule::Winding, self.transform, None);
        }
    }

    fn stroke_ring(&mut self, cx: f32, cy: f32, r: f32, width: f32) {
        if let Some(path) = PathBuilder::from_circle(cx, cy, r) {
            let stroke = Stroke {
                width,
                ..Stroke::default()
            };
            self.pixmap
                .stroke_path(&path, &self.paint, &stroke, self.transform, None);
        }
    }

    fn triangle(&mut self, base_left: (f32, f32), apex: (f32, f32), base_right: (f32, f32)) {
        let mut pb = PathBuilder::new();
        pb.move_to(base_left.0, base_left.1);
        pb.line_to(apex.0, apex.1);
        pb.line_to(base_right.0, base_right.1);
        pb.close();
        self.fill(pb.finish());
    }

    /// Upper half of an ellipse standing on the line `y = cy`.
    fn dome(&mut self, cx: f32, cy: f32, rx: f32, ry: f32) {
        let mut pb = PathBuilder::new();
        pb.move_to(cx - rx, cy);
        pb.cubic_to(cx - rx, cy - KAPPA * ry, cx - KAPPA * rx, cy - ry, cx, cy - ry);
        pb.cubic_to(cx + KAPPA * rx, cy - ry, cx + rx, cy - KAPPA * ry, cx + rx, cy);
        pb.close();
        self.fill(pb.finish());
    }
}

// Tall spire, bullet dome, observation wheel.
fn draw_london(c: &mut DesignCanvas) {
    c.fill_rect(0.0, 950.0, 2048.0, 74.0);
    c.triangle((600.0, 950.0), (700.0, 200.0), (800.0, 950.0));
    c.dome(1200.0, 950.0, 100.0, 400.0);
    c.stroke_ring(300.0, 800.0, 150.0, 40.0);
}

// Capitol dome with lantern, obelisk, memorial block.
fn draw_washington(c: &mut DesignCanvas) {
    c.fill_rect(0.0, 900.0, 2048.0, 124.0);
    c.dome(1024.0, 900.0, 180.0, 180.0);
    c.fill_rect(1000.0, 680.0, 48.0, 50.0);
    c.triangle((400.0, 900.0), (430.0, 300.0), (460.0, 900.0));
    c.fill_rect(1500.0, 800.0, 300.0, 100.0);
}

// Needle tower group, sail, slab tower.
fn draw_dubai(c: &mut DesignCanvas) {
    c.fill_rect(0.0, 980.0, 2048.0, 44.0);
    c.fill_rect(980.0, 200.0, 88.0, 800.0);
    c.fill_rect(1000.0, 50.0, 48.0, 150.0);
    c.fill_rect(800.0, 600.0, 60.0, 400.0);
    c.fill_rect(1200.0, 700.0, 60.0, 300.0);

    let mut pb = PathBuilder::new();
    pb.move_to(1600.0, 980.0);
    pb.quad_to(1700.0, 500.0, 1600.0, 400.0);
    pb.line_to(1800.0, 980.0);
    pb.close();
    c.fill(pb.finish());

    c.fill_rect(400.0, 500.0, 100.0, 480.0);
}

/// Three separable box blurs approximating a gaussian of `sigma` pixels.
/// Samples outside the image count as transparent.
fn gaussian_approx(src: &[f32], width: usize, height: usize, sigma: f32) -> Vec<f32> {
    let radius = sigma.round().max(1.0) as usize;
    let mut a = src.to_vec();
    let mut b = vec![0.0; src.len()];
    for _ in 0..3 {
        box_blur_rows(&a, &mut b, width, height, radius);
        box_blur_cols(&b, &mut a, width, height, radius);
    }
    a
}

fn box_blur_rows(src: &[f32], dst: &mut [f32], width: usize, height: usize, radius: usize) {
    let norm = 1.0 / (2 * radius + 1) as f32;
    for y in 0..height {
        let row = &src[y * width..(y + 1) * width];
        let mut acc: f32 = row.iter().take(radius + 1).sum();
        for x in 0..width {
            dst[y * width + x] = acc * norm;
            if x + radius + 1 < width {
                acc += row[x + radius + 1];
            }
            if x >= radius {
                acc -= row[x - radius];
            }
        }
    }
}

fn box_blur_cols(src: &[f32], dst: &mut [f32], width: usize, height: usize, radius: usize) {
    let norm = 1.0 / (2 * radius + 1) as f32;
    for x in 0..width {
        let mut acc: f32 = (0..=radius.min(height - 1)).map(|y| src[y * width + x]).sum();
        for y in 0..height {
            dst[y * width + x] = acc * norm;
            if y + radius + 1 < height {
                acc += src[(y + radius + 1) * width + x];
            }
            if y >= radius {
                acc -= src[(y - radius) * width + x];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blur_preserves_mass_away_from_edges() {
        let (w, h) = (32, 32);
        let mut src = vec![0.0; w * h];
        src[16 * w + 16] = 1.0;
        let out = gaussian_approx(&src, w, h, 2.0);
        let total: f32 = out.iter().sum();
        assert!((total - 1.0).abs() < 1e-3, "total {total}");
        assert!(out[16 * w + 16] < 1.0);
        assert!(out[16 * w + 17] > 0.0);
    }

    #[test]
    fn zero_sized_raster_is_unavailable() {
        let err = rasterize_skyline(SceneId::London, RasterSize { width: 0, height: 0 });
        assert!(matches!(err, Err(FlightError::RasterUnavailable { .. })));
    }
}
