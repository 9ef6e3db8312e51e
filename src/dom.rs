use crate::constants::{data_key, CANVAS_STYLE, REDUCED_MOTION_QUERY, VIGNETTE_STYLE};
use flight_core::{vignette_css, Capabilities, Viewport};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// An event listener that removes itself when dropped.
pub struct Listener {
    target: web::EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut()>,
}

impl Listener {
    pub fn new(target: &web::EventTarget, event: &'static str, handler: impl FnMut() + 'static) -> Self {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut()>);
        if let Err(e) =
            target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        {
            log::warn!("[dom] add {} listener failed: {:?}", event, e);
        }
        Self {
            target: target.clone(),
            event,
            closure,
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// Full-bleed, behind content, never intercepting pointer events.
pub fn make_background_surface(canvas: &web::HtmlCanvasElement) {
    _ = canvas.set_attribute("style", CANVAS_STYLE);
    _ = canvas.set_attribute("aria-hidden", "true");
}

/// Vignette element placed right after the canvas; removed on drop.
pub struct VignetteOverlay {
    element: web::Element,
}

impl VignetteOverlay {
    pub fn attach(canvas: &web::HtmlCanvasElement) -> Option<Self> {
        let element = window_document()?.create_element("div").ok()?;
        _ = element.set_attribute("style", &format!("{}{}", VIGNETTE_STYLE, vignette_css()));
        _ = element.set_attribute("aria-hidden", "true");
        if let Err(e) = canvas.after_with_node_1(&element) {
            log::warn!("[field] vignette overlay not attached: {:?}", e);
            return None;
        }
        Some(Self { element })
    }
}

impl Drop for VignetteOverlay {
    fn drop(&mut self) {
        self.element.remove();
    }
}

/// Resize the backing store to the CSS box times `pixel_ratio`.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, pixel_ratio: f32) -> Viewport {
    let rect = canvas.get_bounding_client_rect();
    let viewport = Viewport::from_css(rect.width(), rect.height(), pixel_ratio);
    if canvas.width() != viewport.width {
        canvas.set_width(viewport.width);
    }
    if canvas.height() != viewport.height {
        canvas.set_height(viewport.height);
    }
    viewport
}

/// CSS box of the canvas, at least 1x1.
pub fn css_viewport(canvas: &web::HtmlCanvasElement) -> Viewport {
    let rect = canvas.get_bounding_client_rect();
    Viewport::from_css(rect.width(), rect.height(), 1.0)
}

pub fn device_pixel_ratio() -> f32 {
    web::window()
        .map(|w| w.device_pixel_ratio() as f32)
        .unwrap_or(1.0)
}

/// `data-*` attributes of an element as `(key, value)` pairs without prefix.
pub fn data_attributes(el: &web::Element) -> Vec<(String, String)> {
    el.get_attribute_names()
        .iter()
        .filter_map(|name| name.as_string())
        .filter_map(|name| {
            let key = data_key(&name)?.to_string();
            let value = el.get_attribute(&name)?;
            Some((key, value))
        })
        .collect()
}

pub fn detect_capabilities() -> Capabilities {
    let Some(window) = web::window() else {
        return Capabilities::default();
    };
    let webgpu = js_sys::Reflect::has(&window.navigator(), &JsValue::from_str("gpu"))
        .unwrap_or(false);
    let reduced_motion = window
        .match_media(REDUCED_MOTION_QUERY)
        .ok()
        .flatten()
        .map(|mq| mq.matches())
        .unwrap_or(false);
    Capabilities {
        webgpu,
        reduced_motion,
    }
}

/// Swap `canvas` for a pristine clone so a different context type can be
/// acquired after a failed WebGPU setup.
pub fn fresh_canvas(canvas: &web::HtmlCanvasElement) -> Option<web::HtmlCanvasElement> {
    let clone = canvas.clone_node().ok()?.dyn_into::<web::HtmlCanvasElement>().ok()?;
    canvas.replace_with_with_node_1(&clone).ok()?;
    Some(clone)
}

/// Let the browser paint (and run other tasks) before continuing.
pub async fn yield_to_browser() {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if let Some(w) = web::window() {
            _ = w.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, 0);
        }
    });
    _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}
