use crate::dom;
use crate::field2d::CanvasPainter;
use crate::render::GpuState;
use flight_core::{
    effective_pixel_ratio, FlightEngine, FrameLoop, FrameScheduler, LoopGuard, ParticleField,
    QualityGovernor, ScrollSignal,
};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// The mounted renderer.
pub enum Backend {
    Scene {
        engine: FlightEngine,
        gpu: GpuState,
    },
    Field {
        field: ParticleField,
        painter: CanvasPainter,
        governor: QualityGovernor,
        signal: ScrollSignal,
        _vignette: Option<dom::VignetteOverlay>,
    },
}

pub struct FrameContext {
    pub canvas: web::HtmlCanvasElement,
    pub backend: Option<Backend>,
    pub last_instant: Instant,
}

impl FrameContext {
    pub fn new(canvas: web::HtmlCanvasElement, backend: Backend) -> Self {
        Self {
            canvas,
            backend: Some(backend),
            last_instant: Instant::now(),
        }
    }

    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;

        let device_ratio = dom::device_pixel_ratio();
        match &mut self.backend {
            Some(Backend::Scene { engine, gpu }) => {
                let frame = engine.step(dt_sec);
                let ratio = effective_pixel_ratio(engine.governor().level(), device_ratio);
                let viewport = dom::sync_canvas_backing_size(&self.canvas, ratio);
                gpu.resize_if_needed(viewport);
                match gpu.render(&frame) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("[gpu] out of memory, frame skipped")
                    }
                    Err(e) => log::warn!("[gpu] frame skipped: {:?}", e),
                }
            }
            Some(Backend::Field {
                field,
                painter,
                governor,
                signal,
                ..
            }) => {
                governor.record_frame(dt_sec);
                let ratio = effective_pixel_ratio(governor.level(), device_ratio);
                dom::sync_canvas_backing_size(&self.canvas, ratio);
                let css = dom::css_viewport(&self.canvas);
                if field.size() != (css.width as f32, css.height as f32) {
                    field.resize(css);
                }
                painter.begin_frame(ratio);
                field.frame(signal.get(), dt_sec, painter);
            }
            None => {}
        }
    }

    /// Drop GPU state, painter and cached rasters.
    pub fn teardown(&mut self) {
        if let Some(Backend::Scene { engine, .. }) = &mut self.backend {
            engine.teardown();
        }
        self.backend = None;
    }
}

type TickSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// `requestAnimationFrame` behind the [`FrameScheduler`] seam.
#[derive(Clone)]
pub struct RafScheduler {
    tick: TickSlot,
}

impl FrameScheduler for RafScheduler {
    fn schedule(&mut self) -> Option<i32> {
        let window = web::window()?;
        let slot = self.tick.borrow();
        let tick = slot.as_ref()?;
        window
            .request_animation_frame(tick.as_ref().unchecked_ref())
            .ok()
    }

    fn cancel(&mut self, handle: i32) {
        if let Some(w) = web::window() {
            _ = w.cancel_animation_frame(handle);
        }
    }
}

/// Owns the running loop; stopped by `stop` or on drop.
pub struct LoopHandle {
    guard: LoopGuard<RafScheduler>,
    ctx: Rc<RefCell<FrameContext>>,
}

impl LoopHandle {
    /// Idempotent.
    pub fn stop(&mut self) {
        self.guard.stop();
        // Dropping the closure breaks the closure -> scheduler -> closure cycle.
        self.guard.scheduler().tick.borrow_mut().take();
        self.ctx.borrow_mut().teardown();
    }
}

impl Drop for LoopHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

pub fn start_loop(ctx: Rc<RefCell<FrameContext>>) -> LoopHandle {
    let tick: TickSlot = Rc::new(RefCell::new(None));
    let frame_loop = Rc::new(RefCell::new(FrameLoop::new()));
    let mut scheduler = RafScheduler { tick: tick.clone() };

    let loop_tick = frame_loop.clone();
    let ctx_tick = ctx.clone();
    let mut sched_tick = scheduler.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        loop_tick
            .borrow_mut()
            .on_frame(&mut sched_tick, || ctx_tick.borrow_mut().frame());
    }) as Box<dyn FnMut()>));

    frame_loop.borrow_mut().start(&mut scheduler);
    LoopHandle {
        guard: LoopGuard::new(frame_loop, scheduler),
        ctx,
    }
}
