//! The drawing target the renderer strokes onto.
//!
//! A browser canvas context, a CPU raster buffer and a test recorder all
//! implement [`Surface`]. Coordinates are logical pixels; each surface maps
//! them to device pixels using the viewport's pixel ratio.

use crate::color::Rgba;
use crate::viewport::Viewport;
use glam::DVec2;

pub trait Surface {
    /// Resizes the backing store; drawing coordinates stay logical.
    fn set_viewport(&mut self, viewport: &Viewport);

    /// Clears the whole logical area.
    fn clear(&mut self);

    /// Strokes `points` as one connected path.
    fn stroke_polyline(&mut self, points: &[DVec2], color: Rgba, width: f64);

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba);

    fn stroke_circle(&mut self, center: DVec2, radius: f64, color: Rgba, width: f64);
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    SetViewport(Viewport),
    Clear,
    Polyline {
        points: Vec<DVec2>,
        color: Rgba,
        width: f64,
    },
    FillCircle {
        center: DVec2,
        radius: f64,
        color: Rgba,
    },
    StrokeCircle {
        center: DVec2,
        radius: f64,
        color: Rgba,
        width: f64,
    },
}

/// Surface that keeps every call, for inspecting what a frame drew.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drains the log, e.g. between frames.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn polylines(&self) -> impl Iterator<Item = &[DVec2]> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Polyline { points, .. } => Some(points.as_slice()),
            _ => None,
        })
    }

    pub fn filled_circles(&self) -> impl Iterator<Item = DVec2> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::FillCircle { center, .. } => Some(*center),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn set_viewport(&mut self, viewport: &Viewport) {
        self.commands.push(DrawCommand::SetViewport(*viewport));
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn stroke_polyline(&mut self, points: &[DVec2], color: Rgba, width: f64) {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            color,
            width,
        });
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: DVec2, radius: f64, color: Rgba, width: f64) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            color,
            width,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_trait_is_object_safe() {
        let mut surface = RecordingSurface::new();
        let dyn_surface: &mut dyn Surface = &mut surface;
        dyn_surface.clear();
        assert_eq!(surface.commands(), &[DrawCommand::Clear]);
    }

    #[test]
    fn records_in_call_order_and_drains() {
        let mut s = RecordingSurface::new();
        s.clear();
        s.stroke_polyline(&[DVec2::ZERO, DVec2::ONE], Rgba::BLACK, 1.0);
        s.fill_circle(DVec2::ONE, 3.0, Rgba::WHITE);
        assert_eq!(s.polylines().count(), 1);
        assert_eq!(s.filled_circles().collect::<Vec<_>>(), vec![DVec2::ONE]);
        let drained = s.take();
        assert_eq!(drained.len(), 3);
        assert!(s.commands().is_empty());
    }
}
