//! Start/stop control around a [`Simulation`].
//!
//! The host owns the actual scheduling (a browser animation frame callback,
//! or a plain loop for headless renders). It asks [`FrameLoop::frame`] to draw
//! and keeps scheduling while the answer is [`FrameControl::Continue`].

use crate::simulation::{FrameStats, Simulation};
use crate::surface::Surface;
use crate::viewport::Viewport;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared stop flag handed out by [`FrameLoop::start`].
///
/// Cancelling any clone stops the loop before its next frame.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Whether the host should schedule another frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameControl {
    Continue(FrameStats),
    Stopped,
}

pub struct FrameLoop {
    simulation: Simulation,
    token: Option<CancellationToken>,
}

impl FrameLoop {
    pub fn new(simulation: Simulation) -> Self {
        Self {
            simulation,
            token: None,
        }
    }

    /// Starts the loop, or returns the live token if it is already running.
    ///
    /// The frame clock resets so the first frame after a start integrates nothing.
    pub fn start(&mut self) -> CancellationToken {
        if let Some(token) = self.token.as_ref().filter(|t| !t.is_cancelled()) {
            return token.clone();
        }
        let token = CancellationToken::new();
        self.simulation.reset_clock();
        self.token = Some(token.clone());
        log::debug!("frame loop started");
        token
    }

    pub fn stop(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
            log::debug!("frame loop stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.token.as_ref().is_some_and(|t| !t.is_cancelled())
    }

    /// Draws one frame if running.
    pub fn frame<S: Surface + ?Sized>(&mut self, timestamp_ms: f64, surface: &mut S) -> FrameControl {
        if !self.is_running() {
            self.token = None;
            return FrameControl::Stopped;
        }
        FrameControl::Continue(self.simulation.tick(timestamp_ms, surface))
    }

    /// Draws up to `count` frames `interval_ms` apart, continuing from the
    /// last frame time. Stops early if the loop is cancelled.
    pub fn run_frames<S: Surface + ?Sized>(
        &mut self,
        count: usize,
        interval_ms: f64,
        surface: &mut S,
    ) -> Vec<FrameStats> {
        let mut timestamp = self
            .simulation
            .last_timestamp()
            .map_or(0.0, |t| t + interval_ms);
        let mut stats = Vec::with_capacity(count);
        for _ in 0..count {
            match self.frame(timestamp, surface) {
                FrameControl::Continue(s) => stats.push(s),
                FrameControl::Stopped => break,
            }
            timestamp += interval_ms;
        }
        stats
    }

    /// Resizes the surface's backing store and the simulation together.
    pub fn resize<S: Surface + ?Sized>(&mut self, viewport: Viewport, surface: &mut S) {
        surface.set_viewport(&viewport);
        self.simulation.resize(viewport);
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.simulation
    }

    pub fn into_simulation(self) -> Simulation {
        self.simulation
    }
}
