#![deny(unsafe_code)]
//! Browser bindings: the spacetime grid drawn onto a 2D canvas.
//!
//! The page owns scheduling, storage and media queries. It forwards pointer,
//! resize and color-scheme events to [`Spacetime`] and calls
//! [`Spacetime::frame`] from `requestAnimationFrame` until it returns `false`.

mod canvas;

use canvas::CanvasSurface;
use spacetime_core::{FrameControl, FrameLoop, Simulation, Theme, ThemeState, Viewport};
use std::fmt;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

pub(crate) fn js_error(err: impl fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_theme(name: Option<String>) -> Result<Option<Theme>, JsValue> {
    name.map(|n| n.parse::<Theme>()).transpose().map_err(js_error)
}

#[wasm_bindgen]
pub struct Spacetime {
    frame_loop: FrameLoop,
    surface: CanvasSurface,
}

#[wasm_bindgen]
impl Spacetime {
    /// Binds to `canvas` sized `width` x `height` CSS pixels.
    ///
    /// `stored_theme` is the visitor's saved choice, if any; otherwise
    /// `system_prefers_light` decides.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        width: f64,
        height: f64,
        device_pixel_ratio: f64,
        stored_theme: Option<String>,
        system_prefers_light: bool,
    ) -> Result<Spacetime, JsValue> {
        let viewport = Viewport::new(width, height, device_pixel_ratio).map_err(js_error)?;
        let theme = ThemeState::new(parse_theme(stored_theme)?, system_prefers_light);
        let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
        let mut surface = CanvasSurface::new(canvas)?;
        let mut frame_loop = FrameLoop::new(Simulation::new(viewport, theme, seed));
        frame_loop.resize(viewport, &mut surface);
        Ok(Self {
            frame_loop,
            surface,
        })
    }

    pub fn resize(&mut self, width: f64, height: f64, device_pixel_ratio: f64) -> Result<(), JsValue> {
        let viewport = Viewport::new(width, height, device_pixel_ratio).map_err(js_error)?;
        self.frame_loop.resize(viewport, &mut self.surface);
        Ok(())
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.frame_loop.simulation_mut().pointer_moved(x, y);
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self) {
        self.frame_loop.simulation_mut().pointer_left();
    }

    /// Sets (or with `undefined`, clears) the stored theme. Returns whether the
    /// visible theme changed.
    #[wasm_bindgen(js_name = setTheme)]
    pub fn set_theme(&mut self, name: Option<String>) -> Result<bool, JsValue> {
        let theme = parse_theme(name)?;
        Ok(self.frame_loop.simulation_mut().set_theme(theme))
    }

    /// Flips the theme and returns the new name for the page to persist.
    #[wasm_bindgen(js_name = toggleTheme)]
    pub fn toggle_theme(&mut self) -> String {
        self.frame_loop.simulation_mut().toggle_theme().name().to_string()
    }

    #[wasm_bindgen(js_name = setSystemPrefersLight)]
    pub fn set_system_prefers_light(&mut self, prefers_light: bool) -> bool {
        self.frame_loop
            .simulation_mut()
            .set_system_prefers_light(prefers_light)
    }

    #[wasm_bindgen(getter)]
    pub fn theme(&self) -> String {
        self.frame_loop.simulation().theme().name().to_string()
    }

    pub fn start(&mut self) {
        self.frame_loop.start();
    }

    pub fn stop(&mut self) {
        self.frame_loop.stop();
    }

    #[wasm_bindgen(getter, js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.frame_loop.is_running()
    }

    /// Draws one frame at `timestamp` (ms, as passed to the animation frame
    /// callback). Returns `false` once stopped.
    pub fn frame(&mut self, timestamp: f64) -> bool {
        matches!(
            self.frame_loop.frame(timestamp, &mut self.surface),
            FrameControl::Continue(_)
        )
    }
}
