//! Browser host.
//!
//! Listens for score messages posted to the window, paints on a 2D canvas
//! sized to half the window, and paces frames with `requestAnimationFrame`.
//!
//! ```js
//! import init, { WebFireworks } from "./fireworks.js";
//! await init();
//! const fireworks = new WebFireworks("scorecard", null);
//! ```

use std::cell::{Cell, RefCell};
use std::f64::consts::TAU;
use std::rc::Rc;

use fireworks_core::{Canvas, FrameBatch, RenderCommand, Viewport};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MessageEvent, Window};

use crate::driver::{AnimationDriver, FrameLoopControl};
use crate::error::{HostError, HostResult};
use crate::settings::HostConfig;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

impl From<HostError> for JsValue {
    fn from(err: HostError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// 2D canvas painter.
pub struct CanvasBackend {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasBackend {
    fn new(canvas: &HtmlCanvasElement) -> HostResult<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or_else(|| HostError::Browser("2d context unavailable".to_owned()))?;

        Ok(Self {
            ctx,
            width: f64::from(canvas.width()),
            height: f64::from(canvas.height()),
        })
    }

    fn resize(&mut self, viewport: Viewport) {
        self.width = f64::from(viewport.width);
        self.height = f64::from(viewport.height);
    }
}

impl Canvas for CanvasBackend {
    type Error = JsValue;

    fn present(&mut self, batch: &FrameBatch) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        for command in batch.commands() {
            match command {
                RenderCommand::Fade { color } => {
                    ctx.set_fill_style_str(&color.to_css());
                    ctx.fill_rect(0.0, 0.0, self.width, self.height);
                }
                RenderCommand::Disc {
                    center,
                    diameter,
                    color,
                } => {
                    ctx.set_fill_style_str(&color.to_css());
                    ctx.begin_path();
                    ctx.arc(
                        f64::from(center.x),
                        f64::from(center.y),
                        f64::from(*diameter) / 2.0,
                        0.0,
                        TAU,
                    )?;
                    ctx.fill();
                }
                RenderCommand::Text {
                    text,
                    position,
                    size,
                    color,
                } => {
                    ctx.set_fill_style_str(&color.to_css());
                    ctx.set_font(&format!("{size}px sans-serif"));
                    ctx.set_text_align("center");
                    ctx.fill_text(text, f64::from(position.x), f64::from(position.y))?;
                }
                RenderCommand::Polygon { points, color } => {
                    let Some((first, rest)) = points.split_first() else {
                        continue;
                    };
                    ctx.set_fill_style_str(&color.to_css());
                    ctx.begin_path();
                    ctx.move_to(f64::from(first.x), f64::from(first.y));
                    for point in rest {
                        ctx.line_to(f64::from(point.x), f64::from(point.y));
                    }
                    ctx.close_path();
                    ctx.fill();
                }
            }
        }
        Ok(())
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// `requestAnimationFrame` loop.
///
/// At most one frame is ever requested at a time; the frame callback
/// re-arms itself while the loop is continuous.
#[derive(Clone)]
pub struct WebLoop {
    window: Window,
    callback: FrameCallback,
    continuous: Rc<Cell<bool>>,
    pending: Rc<Cell<bool>>,
}

impl WebLoop {
    fn new(window: Window) -> Self {
        Self {
            window,
            callback: Rc::new(RefCell::new(None)),
            continuous: Rc::new(Cell::new(false)),
            pending: Rc::new(Cell::new(false)),
        }
    }

    fn schedule(&self) {
        if self.pending.get() {
            return;
        }
        if let Some(callback) = self.callback.borrow().as_ref() {
            match self
                .window
                .request_animation_frame(callback.as_ref().unchecked_ref())
            {
                Ok(_) => self.pending.set(true),
                Err(err) => console_log!("requestAnimationFrame failed: {:?}", err),
            }
        }
    }

    fn frame_finished(&self) {
        self.pending.set(false);
        if self.continuous.get() {
            self.schedule();
        }
    }
}

impl FrameLoopControl for WebLoop {
    fn start_continuous_loop(&mut self) {
        self.continuous.set(true);
        self.schedule();
    }

    fn request_single_redraw(&mut self) {
        self.schedule();
    }

    fn stop_continuous_loop(&mut self) {
        self.continuous.set(false);
    }
}

fn half_window(window: &Window) -> Viewport {
    let dimension = |value: Result<JsValue, JsValue>| {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
    };
    Viewport::new(
        (dimension(window.inner_width()) / 2.0).floor(),
        (dimension(window.inner_height()) / 2.0).floor(),
    )
}

fn apply_size(canvas: &HtmlCanvasElement, viewport: Viewport) {
    canvas.set_width(viewport.width as u32);
    canvas.set_height(viewport.height as u32);
}

/// Message data is either a JSON string or a structured-cloned object.
fn message_text(event: &MessageEvent) -> Option<String> {
    let data = event.data();
    if let Some(text) = data.as_string() {
        return Some(text);
    }
    js_sys::JSON::stringify(&data)
        .ok()
        .and_then(|text| text.as_string())
}

/// Fireworks scorecard bound to a page canvas.
#[wasm_bindgen]
pub struct WebFireworks {
    driver: Rc<RefCell<AnimationDriver<WebLoop>>>,
    // keep listeners alive
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_resize: Closure<dyn FnMut()>,
}

#[wasm_bindgen]
impl WebFireworks {
    /// Binds to the canvas with id `canvas_id`.
    ///
    /// `config_toml` optionally overrides simulation tuning and scorecard text.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, config_toml: Option<String>) -> Result<WebFireworks, JsValue> {
        console_error_panic_hook::set_once();

        let config = match config_toml {
            Some(source) => HostConfig::from_toml_str(&source)?,
            None => HostConfig::default(),
        };

        let window =
            web_sys::window().ok_or_else(|| HostError::Browser("no window".to_owned()))?;
        let canvas = window
            .document()
            .and_then(|doc| doc.get_element_by_id(canvas_id))
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
            .ok_or_else(|| HostError::Browser(format!("no canvas with id {canvas_id}")))?;

        let viewport = half_window(&window);
        apply_size(&canvas, viewport);
        let backend = Rc::new(RefCell::new(CanvasBackend::new(&canvas)?));

        let seed = config.simulation.seed;
        let web_loop = WebLoop::new(window.clone());
        let mut driver =
            AnimationDriver::new(config.simulation, config.scorecard, viewport, web_loop.clone())?;
        if seed.is_none() {
            driver
                .simulation_mut()
                .reseed((js_sys::Math::random() * u64::MAX as f64) as u64);
        }
        let driver = Rc::new(RefCell::new(driver));

        // Frame callback
        {
            let driver = Rc::clone(&driver);
            let backend = Rc::clone(&backend);
            let frame_loop = web_loop.clone();
            *web_loop.callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
                let mut driver = driver.borrow_mut();
                let batch = driver.frame();
                if let Err(err) = backend.borrow_mut().present(batch) {
                    console_log!("Frame draw failed: {:?}", err);
                }
                drop(driver);
                frame_loop.frame_finished();
            }) as Box<dyn FnMut()>));
        }

        let on_message = {
            let driver = Rc::clone(&driver);
            Closure::wrap(Box::new(move |event: MessageEvent| {
                if let Some(text) = message_text(&event) {
                    driver.borrow_mut().on_message(&text);
                }
            }) as Box<dyn FnMut(MessageEvent)>)
        };
        window
            .add_event_listener_with_callback("message", on_message.as_ref().unchecked_ref())?;

        let on_resize = {
            let driver = Rc::clone(&driver);
            let backend = Rc::clone(&backend);
            let window = window.clone();
            Closure::wrap(Box::new(move || {
                let viewport = half_window(&window);
                apply_size(&canvas, viewport);
                backend.borrow_mut().resize(viewport);
                let mut driver = driver.borrow_mut();
                driver.resize(viewport);
                driver.control_mut().request_single_redraw();
            }) as Box<dyn FnMut()>)
        };
        window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;

        // First frame paints the empty scorecard
        web_loop.schedule();
        console_log!(
            "Fireworks ready on #{} ({}x{})",
            canvas_id,
            viewport.width,
            viewport.height
        );

        Ok(WebFireworks {
            driver,
            _on_message: on_message,
            _on_resize: on_resize,
        })
    }

    /// Feeds a score message directly, bypassing `window.postMessage`.
    ///
    /// Returns true if the message was a valid score report.
    pub fn post_message(&self, raw: &str) -> bool {
        self.driver.borrow_mut().on_message(raw)
    }

    /// Returns true while fireworks are being animated.
    #[wasm_bindgen(getter)]
    pub fn looping(&self) -> bool {
        self.driver.borrow().is_looping()
    }

    /// Fireworks currently alive.
    #[wasm_bindgen(getter)]
    pub fn active_fireworks(&self) -> usize {
        self.driver.borrow().simulation().emitters().len()
    }
}
