#![cfg(target_arch = "wasm32")]
use flight_core::{
    select_mode, FlightEngine, GovernorConfig, LoadProgress, ParticleField, QualityGovernor,
    QualityLevel, RasterSize, RenderMode, RendererConfig, ScrollSignal, TextureCache,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod dom;
mod field2d;
mod frame;
mod overlay;
mod render;
mod scroll;

use frame::{Backend, FrameContext, LoopHandle};

// Device acquisition counts as one loading step next to the skylines.
const GPU_SETUP_STEPS: u32 = 1;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("flight-web starting");
    Ok(())
}

/// Everything one mount owns. Dropped (via `unmount`) as a unit.
struct Mount {
    signal: ScrollSignal,
    mode: Cell<RenderMode>,
    load_percent: Cell<f32>,
    disposed: Cell<bool>,
    running: RefCell<Option<LoopHandle>>,
    scroll: RefCell<Option<scroll::ScrollBinding>>,
}

impl Mount {
    fn publish(&self, progress: &LoadProgress) {
        self.load_percent.set(progress.percent());
        if let Some(document) = dom::window_document() {
            overlay::publish_progress(&document, progress);
        }
    }

    fn run(&self, canvas: web::HtmlCanvasElement, backend: Backend) {
        if self.disposed.get() {
            return;
        }
        let ctx = Rc::new(RefCell::new(FrameContext::new(canvas, backend)));
        *self.running.borrow_mut() = Some(frame::start_loop(ctx));
    }

    /// Stop the loop and release listeners; later calls do nothing.
    fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        if let Some(mut running) = self.running.borrow_mut().take() {
            running.stop();
        }
        self.scroll.borrow_mut().take();
        log::info!("[mount] unmounted");
    }
}

/// Handle returned to JavaScript by [`mount`].
#[wasm_bindgen]
pub struct FlightHandle {
    mount: Rc<Mount>,
}

#[wasm_bindgen]
impl FlightHandle {
    /// Drive the renderer from a custom scroll container or smooth-scroll
    /// engine. Values are clamped into `[0, 1]`.
    pub fn set_scroll_progress(&self, progress: f32) {
        self.mount.signal.set(progress);
    }

    /// Loading progress, 0 to 100.
    pub fn progress(&self) -> f32 {
        self.mount.load_percent.get()
    }

    /// `"scene"` or `"field"`.
    pub fn mode(&self) -> String {
        self.mount.mode.get().name().to_string()
    }

    /// Stop the frame loop and release every resource of this mount.
    pub fn unmount(&self) {
        self.mount.dispose();
    }
}

// `free()` from JS, or collection of the wrapper, without `unmount()`.
impl Drop for FlightHandle {
    fn drop(&mut self) {
        self.mount.dispose();
    }
}

#[wasm_bindgen]
pub fn mount(canvas_id: &str) -> Result<FlightHandle, JsValue> {
    let document =
        dom::window_document().ok_or_else(|| JsValue::from_str("no document available"))?;
    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{}", canvas_id)))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str(&format!("#{} is not a canvas", canvas_id)))?;

    dom::make_background_surface(&canvas);
    let attributes = dom::data_attributes(&canvas);
    let config = RendererConfig::from_pairs(
        attributes.iter().map(|(k, v)| (k.as_str(), v.as_str())),
    )
    .unwrap_or_else(|e| {
        log::warn!("[mount] {}; using defaults", e);
        RendererConfig::default()
    });
    let caps = dom::detect_capabilities();
    let mode = select_mode(config.mode, caps);
    log::info!("[mount] #{} mode={} caps={:?}", canvas_id, mode.name(), caps);

    let signal = ScrollSignal::new();
    let mount = Rc::new(Mount {
        scroll: RefCell::new(scroll::ScrollBinding::attach(&signal)),
        signal,
        mode: Cell::new(mode),
        load_percent: Cell::new(0.0),
        disposed: Cell::new(false),
        running: RefCell::new(None),
    });

    match mode {
        RenderMode::Field => start_field(&mount, canvas, &config),
        RenderMode::Scene => {
            let mount_init = mount.clone();
            spawn_local(async move {
                if let Err(e) = start_scene(&mount_init, canvas, config).await {
                    log::error!("[mount] init error: {:?}", e);
                }
            });
        }
    }
    Ok(FlightHandle { mount })
}

fn start_field(mount: &Mount, canvas: web::HtmlCanvasElement, config: &RendererConfig) {
    let painter = match field2d::CanvasPainter::from_canvas(&canvas) {
        Ok(p) => p,
        Err(e) => {
            log::error!("[field] {:?}", e);
            return;
        }
    };
    mount.mode.set(RenderMode::Field);
    let field = ParticleField::new(
        dom::css_viewport(&canvas),
        config.particles,
        config.buildings,
        config.seed,
    );
    let governor = QualityGovernor::new(
        GovernorConfig::default(),
        QualityLevel::capped(config.max_pixel_ratio),
    );
    let mut progress = LoadProgress::new(1);
    progress.finish();
    mount.publish(&progress);
    let vignette = dom::VignetteOverlay::attach(&canvas);
    mount.run(
        canvas,
        Backend::Field {
            field,
            painter,
            governor,
            signal: mount.signal.clone(),
            _vignette: vignette,
        },
    );
}

async fn start_scene(
    mount: &Mount,
    canvas: web::HtmlCanvasElement,
    config: RendererConfig,
) -> anyhow::Result<()> {
    let textures = TextureCache::new(RasterSize::from_width(config.texture_width));
    let mut engine = FlightEngine::new(mount.signal.clone(), &config, textures, GPU_SETUP_STEPS);
    mount.publish(engine.progress());

    let ratio = flight_core::effective_pixel_ratio(
        engine.governor().level(),
        dom::device_pixel_ratio(),
    );
    dom::sync_canvas_backing_size(&canvas, ratio);
    let mut gpu = match render::GpuState::new(&canvas, config.stars, config.seed).await {
        Ok(g) => g,
        Err(e) => {
            log::warn!("[gpu] {:?}; falling back to field", e);
            if mount.disposed.get() {
                return Ok(());
            }
            let fresh = dom::fresh_canvas(&canvas)
                .ok_or_else(|| anyhow::anyhow!("could not replace canvas"))?;
            start_field(mount, fresh, &config);
            return Ok(());
        }
    };
    engine.progress_mut().complete_step();
    mount.publish(engine.progress());

    while let Some((id, skyline)) = engine.prepare_next_asset() {
        match skyline {
            Some(t) => gpu.attach_skyline(&t),
            None => log::warn!("[texture] {} unavailable, slot left empty", id.name()),
        }
        mount.publish(engine.progress());
        dom::yield_to_browser().await;
        if mount.disposed.get() {
            engine.teardown();
            return Ok(());
        }
    }
    engine.progress_mut().finish();
    mount.publish(engine.progress());

    mount.run(canvas, Backend::Scene { engine, gpu });
    Ok(())
}
