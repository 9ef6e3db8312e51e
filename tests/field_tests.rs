// Host-side tests for the particle-field fallback.

use flight_core::*;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Op {
    Rect,
    Circle,
    Gradient,
    Stroke,
}

#[derive(Default)]
struct RecordingCanvas {
    ops: Vec<Op>,
    first_fill: Option<Rgba>,
    circle_colors: Vec<Rgba>,
}

impl FieldCanvas for RecordingCanvas {
    fn fill_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32, color: Rgba) {
        self.first_fill.get_or_insert(color);
        self.ops.push(Op::Rect);
    }
    fn fill_circle(&mut self, _x: f32, _y: f32, _r: f32, color: Rgba) {
        self.circle_colors.push(color);
        self.ops.push(Op::Circle);
    }
    fn fill_vertical_gradient(&mut self, _x: f32, _y: f32, _w: f32, _h: f32, _b: Rgba, _t: Rgba) {
        self.ops.push(Op::Gradient);
    }
    fn stroke_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32, _c: Rgba, _lw: f32) {
        self.ops.push(Op::Stroke);
    }
}

/// Red channel of a single pixel under source-over blending.
struct PixelCanvas {
    x: f32,
    y: f32,
    red: f32,
}

impl PixelCanvas {
    fn covers(&self, x: f32, y: f32, w: f32, h: f32) -> bool {
        self.x >= x && self.x < x + w && self.y >= y && self.y < y + h
    }

    fn blend(&mut self, color: Rgba) {
        self.red = color.rgb.r * color.a + self.red * (1.0 - color.a);
    }
}

impl FieldCanvas for PixelCanvas {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        if self.covers(x, y, w, h) {
            self.blend(color);
        }
    }
    fn fill_circle(&mut self, x: f32, y: f32, r: f32, color: Rgba) {
        if (self.x - x).hypot(self.y - y) <= r {
            self.blend(color);
        }
    }
    fn fill_vertical_gradient(&mut self, x: f32, y: f32, w: f32, h: f32, bottom: Rgba, _t: Rgba) {
        if self.covers(x, y, w, h) {
            self.blend(bottom);
        }
    }
    fn stroke_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32, _c: Rgba, _lw: f32) {}
}

/// Frames until a fully lit pixel at `(x, y)` fades below 5% red.
fn trail_frames(scroll: f32, x: f32, y: f32) -> usize {
    let mut field = ParticleField::new(Viewport::new(400, 300), 0, 0, 5);
    let mut pixel = PixelCanvas { x, y, red: 1.0 };
    let mut frames = 0;
    while pixel.red >= 0.05 {
        field.draw(scroll, &mut pixel);
        frames += 1;
        assert!(frames < 1000, "trail never faded at ({x}, {y})");
    }
    frames
}

fn assert_wrapped(field: &ParticleField) {
    let (w, h) = field.size();
    for p in field.particles() {
        assert!(p.x >= 0.0 && p.x < w, "x {} outside [0, {w})", p.x);
        assert!(p.y >= 0.0 && p.y < h, "y {} outside [0, {h})", p.y);
    }
}

#[test]
fn wrap_stays_in_range() {
    assert_eq!(wrap(-1.0, 100.0), 99.0);
    assert_eq!(wrap(100.0, 100.0), 0.0);
    assert_eq!(wrap(250.0, 100.0), 50.0);
    assert_eq!(wrap(-1e-9, 100.0), 0.0);
    assert_eq!(wrap(5.0, 0.0), 0.0);
}

#[test]
fn particles_never_leave_the_surface() {
    let mut field = ParticleField::new(Viewport::new(640, 360), 200, 15, 7);
    assert_wrapped(&field);
    for i in 0..3000 {
        let scroll = (i % 400) as f32 / 400.0;
        field.update(scroll, 1.0 / 60.0);
        assert_wrapped(&field);
    }
    // A stalled frame is clamped, not integrated wholesale.
    field.update(1.0, 10.0);
    assert_wrapped(&field);
}

#[test]
fn resize_keeps_particles_inside_the_new_bounds() {
    let mut field = ParticleField::new(Viewport::new(1280, 720), 150, 10, 3);
    field.update(0.5, 1.0 / 60.0);
    field.resize(Viewport::new(320, 200));
    assert_eq!(field.size(), (320.0, 200.0));
    assert_wrapped(&field);
    for _ in 0..200 {
        field.update(0.9, 1.0 / 30.0);
        assert_wrapped(&field);
    }
}

#[test]
fn palette_is_a_step_function_of_scroll() {
    assert_eq!(Palette::for_scroll(0.1), Palette::Cool);
    assert_eq!(Palette::for_scroll(0.5), Palette::Warm);
    assert_eq!(Palette::for_scroll(0.9), Palette::Neutral);
    // Each band owns its lower bound.
    assert_eq!(Palette::for_scroll(0.3), Palette::Warm);
    assert_eq!(Palette::for_scroll(0.7), Palette::Neutral);
    assert_eq!(Palette::Cool.color(), Rgb::from_u8(100, 150, 255));
    assert_eq!(Palette::Warm.color(), Rgb::from_u8(200, 180, 100));
    assert_eq!(Palette::Neutral.color(), Rgb::from_u8(200, 200, 220));
}

#[test]
fn draw_order_is_trail_buildings_particles() {
    let mut field = ParticleField::new(Viewport::new(400, 300), 150, 10, 11);
    let mut canvas = RecordingCanvas::default();
    field.frame(0.5, 1.0 / 60.0, &mut canvas);

    assert_eq!(canvas.ops.first(), Some(&Op::Rect));
    assert_eq!(canvas.ops.last(), Some(&Op::Circle));
    // Only the trail fill covers the whole surface.
    assert_eq!(canvas.ops.iter().filter(|o| **o == Op::Rect).count(), 1);
    let count = |op| canvas.ops.iter().filter(|o| **o == op).count();
    assert_eq!(count(Op::Gradient), 10);
    assert_eq!(count(Op::Stroke), 10);
    assert_eq!(count(Op::Circle), 150);
    let last_building = canvas.ops.iter().rposition(|o| *o == Op::Stroke).unwrap();
    let first_particle = canvas.ops.iter().position(|o| *o == Op::Circle).unwrap();
    assert!(last_building < first_particle);

    let warm = Palette::Warm.color();
    for c in &canvas.circle_colors {
        assert_eq!(c.rgb, warm);
        assert!(c.a >= 0.0 && c.a <= 1.0);
    }
}

#[test]
fn trails_lengthen_with_scroll() {
    assert!((trail_fill(0.0).a - 0.2).abs() < 1e-6);
    assert!((trail_fill(1.0).a - 0.1).abs() < 1e-6);
    assert!(trail_fill(0.8).a < trail_fill(0.2).a);

    let mut field = ParticleField::new(Viewport::new(200, 100), 150, 10, 1);
    let mut canvas = RecordingCanvas::default();
    field.draw(1.0, &mut canvas);
    assert!((canvas.first_fill.unwrap().a - 0.1).abs() < 1e-6);
}

#[test]
fn trails_lengthen_with_scroll_away_from_the_center() {
    // Center, and 70% of the way toward a corner.
    for (x, y) in [(200.0, 150.0), (60.0, 45.0), (340.0, 255.0)] {
        let calm = trail_frames(0.0, x, y);
        let fast = trail_frames(1.0, x, y);
        assert!(fast > calm, "({x}, {y}): {fast} <= {calm}");
        assert_eq!(calm, trail_frames(0.0, 200.0, 150.0));
    }
}

#[test]
fn vignette_is_a_static_overlay() {
    let css = vignette_css();
    assert!(css.starts_with("radial-gradient(circle at center"));
    assert!(css.contains("rgba(10, 15, 26, 0.000) 0%"));
    assert!(css.contains("rgba(10, 15, 26, 1.000) 100%"));
}

#[test]
fn silhouette_palette_switches_at_forty_percent() {
    assert_eq!(silhouette_style(0.39), silhouette_style(0.0));
    assert_eq!(silhouette_style(0.4), silhouette_style(1.0));
    assert_ne!(silhouette_style(0.0), silhouette_style(1.0));
}

#[test]
fn silhouette_reenters_from_the_right() {
    let mut s = Silhouette {
        x: 5.0,
        width: 50.0,
        height: 100.0,
        drift_speed: 0.5,
    };
    let mut steps = 0;
    while s.x <= 5.0 {
        s.update(0.0, 1.0, 800.0);
        steps += 1;
        assert!(steps < 1000, "never re-entered");
    }
    assert_eq!(s.x, 800.0);
    // Still partially visible: no wrap yet.
    let mut edge = Silhouette { x: -49.0, ..s };
    edge.update(0.0, 0.0, 800.0);
    assert_eq!(edge.x, -49.0);
}

#[test]
fn buildings_rise_as_the_page_scrolls() {
    let s = Silhouette {
        x: 0.0,
        width: 50.0,
        height: 100.0,
        drift_speed: 0.5,
    };
    assert_eq!(s.apparent_height(0.0), 100.0);
    assert!(s.apparent_height(1.0) > s.apparent_height(0.5));
}
