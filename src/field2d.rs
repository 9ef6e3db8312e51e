use flight_core::{FieldCanvas, Rgba};
use std::f64::consts::TAU;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Canvas2D painter for the particle field.
pub struct CanvasPainter {
    ctx: web::CanvasRenderingContext2d,
}

impl CanvasPainter {
    pub fn from_canvas(canvas: &web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| anyhow::anyhow!("2d context error: {:?}", e))?
            .ok_or_else(|| anyhow::anyhow!("2d context unavailable"))?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
        Ok(Self { ctx })
    }

    /// Map CSS pixels onto a backing store scaled by `pixel_ratio`.
    pub fn begin_frame(&self, pixel_ratio: f32) {
        let r = pixel_ratio as f64;
        _ = self.ctx.set_transform(r, 0.0, 0.0, r, 0.0, 0.0);
    }

    fn gradient_stops(gradient: &web::CanvasGradient, stops: &[(f32, Rgba)]) {
        for (offset, color) in stops {
            _ = gradient.add_color_stop(*offset, &color.to_css());
        }
    }
}

impl FieldCanvas for CanvasPainter {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.begin_path();
        _ = self.ctx.arc(x as f64, y as f64, radius.max(0.0) as f64, 0.0, TAU);
        self.ctx.fill();
    }

    fn fill_vertical_gradient(&mut self, x: f32, y: f32, w: f32, h: f32, bottom: Rgba, top: Rgba) {
        let g = self
            .ctx
            .create_linear_gradient(x as f64, (y + h) as f64, x as f64, y as f64);
        Self::gradient_stops(&g, &[(0.0, bottom), (1.0, top)]);
        self.ctx.set_fill_style_canvas_gradient(&g);
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba, line_width: f32) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(line_width as f64);
        self.ctx.stroke_rect(x as f64, y as f64, w as f64, h as f64);
    }
}
