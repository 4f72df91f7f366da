use glam::DVec2;
use spacetime_core::color::Rgba;
use spacetime_core::surface::Surface;
use spacetime_core::viewport::Viewport;
use std::f64::consts::TAU;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::js_error;

/// [`Surface`] backed by a canvas 2D context.
///
/// The backing store is sized in device pixels and the context transform
/// scales logical coordinates by the pixel ratio. Failed context calls are
/// logged and skipped; a frame never aborts halfway.
pub(crate) struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    viewport: Option<Viewport>,
}

impl CanvasSurface {
    pub(crate) fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| js_error("missing 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            canvas,
            context,
            viewport: None,
        })
    }

    fn circle(&self, center: DVec2, radius: f64) -> bool {
        self.context.begin_path();
        match self.context.arc(center.x, center.y, radius, 0.0, TAU) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("canvas arc failed: {e:?}");
                false
            }
        }
    }
}

impl Surface for CanvasSurface {
    fn set_viewport(&mut self, viewport: &Viewport) {
        let (w, h) = viewport.physical_size();
        self.canvas.set_width(w);
        self.canvas.set_height(h);
        let style = self.canvas.style();
        for (property, value) in [("width", viewport.width), ("height", viewport.height)] {
            if let Err(e) = style.set_property(property, &format!("{value}px")) {
                log::warn!("canvas style {property} not set: {e:?}");
            }
        }
        // Resizing the backing store resets the transform.
        let dpr = viewport.device_pixel_ratio;
        if let Err(e) = self.context.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0) {
            log::warn!("canvas transform not set: {e:?}");
        }
        self.viewport = Some(*viewport);
    }

    fn clear(&mut self) {
        if let Some(viewport) = self.viewport {
            self.context
                .clear_rect(0.0, 0.0, viewport.width, viewport.height);
        }
    }

    fn stroke_polyline(&mut self, points: &[DVec2], color: Rgba, width: f64) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.context.begin_path();
        self.context.move_to(first.x, first.y);
        for p in rest {
            self.context.line_to(p.x, p.y);
        }
        self.context.set_stroke_style_str(&color.to_css());
        self.context.set_line_width(width);
        self.context.stroke();
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        if self.circle(center, radius) {
            self.context.set_fill_style_str(&color.to_css());
            self.context.fill();
        }
    }

    fn stroke_circle(&mut self, center: DVec2, radius: f64, color: Rgba, width: f64) {
        if self.circle(center, radius) {
            self.context.set_stroke_style_str(&color.to_css());
            self.context.set_line_width(width);
            self.context.stroke();
        }
    }
}
