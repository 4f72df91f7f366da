#![deny(unsafe_code)]
//! Headless rendering of the spacetime grid.
//!
//! Sits between `spacetime-core` (simulation, drawing contract) and the CLI:
//! [`RasterSurface`] implements the core `Surface` on a CPU pixel buffer, and
//! [`render_seed`] / [`trace_seed`] replay a [`Seed`] frame by frame so the
//! CLI never drives the frame loop itself.

pub mod raster;

#[cfg(feature = "png")]
pub mod snapshot;

pub use raster::RasterSurface;

use serde::Serialize;
use spacetime_core::error::SpacetimeError;
use spacetime_core::navigator::GridNavigator;
use spacetime_core::surface::RecordingSurface;
use spacetime_core::{FrameLoop, FrameStats, Seed, Simulation};

/// Simulation state after one traced frame.
#[derive(Debug, Clone, Serialize)]
pub struct TraceFrame {
    #[serde(flatten)]
    pub stats: FrameStats,
    /// Smoothed pointer position, when it counts as a field source.
    pub pointer: Option<[f64; 2]>,
    pub navigators: Vec<GridNavigator>,
}

/// Runs the seed's frames into a fresh raster and returns it with per-frame stats.
///
/// With `frames == 0` the raster holds only the background.
pub fn render_seed(seed: &Seed) -> Result<(RasterSurface, Vec<FrameStats>), SpacetimeError> {
    let simulation = Simulation::from_seed(seed)?;
    let mut surface = RasterSurface::new(&simulation.viewport(), simulation.config().background);
    let mut frame_loop = FrameLoop::new(simulation);
    frame_loop.start();
    let stats = frame_loop.run_frames(seed.frames, seed.frame_interval_ms, &mut surface);
    Ok((surface, stats))
}

/// Runs the seed's frames without rasterizing and records navigator state after each.
pub fn trace_seed(seed: &Seed) -> Result<Vec<TraceFrame>, SpacetimeError> {
    let mut simulation = Simulation::from_seed(seed)?;
    let mut surface = RecordingSurface::new();
    let mut frames = Vec::with_capacity(seed.frames);
    for i in 0..seed.frames {
        let stats = simulation.tick(i as f64 * seed.frame_interval_ms, &mut surface);
        surface.take();
        let pointer = simulation.pointer();
        frames.push(TraceFrame {
            stats,
            pointer: pointer
                .is_active()
                .then(|| pointer.smoothed().to_array()),
            navigators: simulation.navigators().to_vec(),
        });
    }
    Ok(frames)
}
