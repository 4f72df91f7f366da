//! Software rasterizer implementing [`Surface`] over an RGBA buffer.
//!
//! Strokes and fills are anti-aliased by distance to the shape: a pixel's
//! coverage falls off linearly over the half pixel beyond the shape's edge.
//! A polyline is covered as one path, so pixels where its segments overlap are
//! blended once, the way a canvas strokes a single path.
//!
//! The buffer holds premultiplied `f32` channels and is sized in device
//! pixels; every drawing call takes logical coordinates and scales them by the
//! viewport's pixel ratio.

use glam::DVec2;
use spacetime_core::color::Rgba;
use spacetime_core::surface::Surface;
use spacetime_core::viewport::Viewport;

#[derive(Debug, Clone)]
pub struct RasterSurface {
    scale: f64,
    width: usize,
    height: usize,
    background: Rgba,
    pixels: Vec<[f32; 4]>,
    coverage: Vec<f32>,
}

/// Device-pixel rectangle `[x0, x1) x [y0, y1)`.
#[derive(Debug, Clone, Copy)]
struct Span {
    x0: usize,
    x1: usize,
    y0: usize,
    y1: usize,
}

impl Span {
    fn width(&self) -> usize {
        self.x1 - self.x0
    }
}

impl RasterSurface {
    /// A buffer sized for `viewport` and cleared to `background`.
    pub fn new(viewport: &Viewport, background: Rgba) -> Self {
        let mut surface = Self {
            scale: 1.0,
            width: 0,
            height: 0,
            background,
            pixels: Vec::new(),
            coverage: Vec::new(),
        };
        surface.set_viewport(viewport);
        surface
    }

    /// Device-pixel width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Device-pixel height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Color used by the next [`Surface::clear`].
    pub fn set_background(&mut self, background: Rgba) {
        self.background = background;
    }

    /// Straight-alpha color of a device pixel.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the buffer.
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        assert!(x < self.width && y < self.height, "pixel out of range");
        let [r, g, b, a] = self.pixels[y * self.width + x];
        if a <= 0.0 {
            return Rgba::TRANSPARENT;
        }
        Rgba::new(
            f64::from(r / a),
            f64::from(g / a),
            f64::from(b / a),
            f64::from(a),
        )
    }

    /// Row-major RGBA8 bytes, `width * height * 4` long.
    pub fn to_rgba8(&self) -> Vec<u8> {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .flat_map(|(x, y)| self.pixel(x, y).to_rgba8())
            .collect()
    }

    /// Clips the device-space box `[lo, hi]` to the buffer.
    fn span(&self, lo: DVec2, hi: DVec2) -> Option<Span> {
        let axis = |lo: f64, hi: f64, limit: usize| {
            if !(lo.is_finite() && hi.is_finite()) {
                return None;
            }
            let start = lo.floor().max(0.0);
            let end = hi.ceil().min(limit as f64);
            (start < end).then(|| (start as usize, end as usize))
        };
        let (x0, x1) = axis(lo.x, hi.x, self.width)?;
        let (y0, y1) = axis(lo.y, hi.y, self.height)?;
        Some(Span { x0, x1, y0, y1 })
    }

    fn blend(&mut self, x: usize, y: usize, color: Rgba, coverage: f32) {
        let alpha = color.a as f32 * coverage;
        if alpha <= 0.0 {
            return;
        }
        let px = &mut self.pixels[y * self.width + x];
        let keep = 1.0 - alpha;
        px[0] = color.r as f32 * alpha + px[0] * keep;
        px[1] = color.g as f32 * alpha + px[1] * keep;
        px[2] = color.b as f32 * alpha + px[2] * keep;
        px[3] = alpha + px[3] * keep;
    }

    /// Blends `color` over every pixel of `span` using `cover(center)` as coverage.
    fn shade(&mut self, span: Span, color: Rgba, cover: impl Fn(DVec2) -> f64) {
        for y in span.y0..span.y1 {
            for x in span.x0..span.x1 {
                let c = cover(DVec2::new(x as f64 + 0.5, y as f64 + 0.5));
                if c > 0.0 {
                    self.blend(x, y, color, c as f32);
                }
            }
        }
    }
}

/// Coverage of a pixel whose center lies `distance` outside a shape's edge.
fn edge_coverage(distance: f64) -> f64 {
    (0.5 - distance).clamp(0.0, 1.0)
}

fn distance_to_segment(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    let t = if len_sq > 0.0 {
        ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (p - (a + ab * t)).length()
}

impl Surface for RasterSurface {
    fn set_viewport(&mut self, viewport: &Viewport) {
        let (w, h) = viewport.physical_size();
        self.scale = viewport.device_pixel_ratio;
        self.width = w as usize;
        self.height = h as usize;
        self.pixels = vec![[0.0; 4]; self.width * self.height];
        self.clear();
    }

    fn clear(&mut self) {
        let a = self.background.a as f32;
        let fill = [
            self.background.r as f32 * a,
            self.background.g as f32 * a,
            self.background.b as f32 * a,
            a,
        ];
        self.pixels.fill(fill);
    }

    fn stroke_polyline(&mut self, points: &[DVec2], color: Rgba, width: f64) {
        if points.len() < 2 || color.a <= 0.0 {
            return;
        }
        let half = width * self.scale / 2.0;
        let device: Vec<DVec2> = points.iter().map(|&p| p * self.scale).collect();
        let lo = device.iter().fold(DVec2::splat(f64::INFINITY), |m, &p| m.min(p));
        let hi = device.iter().fold(DVec2::splat(f64::NEG_INFINITY), |m, &p| m.max(p));
        let pad = DVec2::splat(half + 1.0);
        let Some(path) = self.span(lo - pad, hi + pad) else {
            return;
        };

        let mut coverage = std::mem::take(&mut self.coverage);
        coverage.clear();
        coverage.resize(path.width() * (path.y1 - path.y0), 0.0);
        for segment in device.windows(2) {
            let (a, b) = (segment[0], segment[1]);
            let Some(span) = self.span(a.min(b) - pad, a.max(b) + pad) else {
                continue;
            };
            for y in span.y0..span.y1 {
                for x in span.x0..span.x1 {
                    let center = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                    let c = edge_coverage(distance_to_segment(center, a, b) - half) as f32;
                    let slot = &mut coverage[(y - path.y0) * path.width() + (x - path.x0)];
                    *slot = slot.max(c);
                }
            }
        }
        for y in path.y0..path.y1 {
            for x in path.x0..path.x1 {
                let c = coverage[(y - path.y0) * path.width() + (x - path.x0)];
                if c > 0.0 {
                    self.blend(x, y, color, c);
                }
            }
        }
        self.coverage = coverage;
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        let center = center * self.scale;
        let radius = radius * self.scale;
        let pad = DVec2::splat(radius + 1.0);
        if let Some(span) = self.span(center - pad, center + pad) {
            self.shade(span, color, |p| edge_coverage((p - center).length() - radius));
        }
    }

    fn stroke_circle(&mut self, center: DVec2, radius: f64, color: Rgba, width: f64) {
        let center = center * self.scale;
        let radius = radius * self.scale;
        let half = width * self.scale / 2.0;
        let pad = DVec2::splat(radius + half + 1.0);
        if let Some(span) = self.span(center - pad, center + pad) {
            self.shade(span, color, |p| {
                edge_coverage(((p - center).length() - radius).abs() - half)
            });
        }
    }
}
