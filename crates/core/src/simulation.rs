//! Per-frame driver for the spacetime grid.
//!
//! [`Simulation`] owns everything that changes between frames: navigators,
//! pointer smoothing, the frame clock, the theme inputs and the config derived
//! from them. Hosts feed it input and resize events between frames and call
//! [`Simulation::tick`] once per displayed frame.

use crate::error::SpacetimeError;
use crate::field::Mass;
use crate::mesh::GridMesh;
use crate::navigator::{default_flock, GridNavigator, Lattice};
use crate::pointer::PointerState;
use crate::prng::Xorshift64;
use crate::render::{draw_mesh, draw_nodes};
use crate::seed::Seed;
use crate::surface::Surface;
use crate::theme::{derive_config, Config, Theme, ThemeState};
use crate::viewport::Viewport;
use glam::DVec2;
use serde::Serialize;
use serde_json::Value;

/// Largest time step a single frame may integrate, in seconds.
pub const MAX_FRAME_DT: f64 = 0.1;

/// Summary of one rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameStats {
    pub frame: u64,
    /// Seconds integrated this frame, after capping.
    pub dt: f64,
    pub pointer_active: bool,
    pub mesh_columns: usize,
    pub mesh_rows: usize,
}

pub struct Simulation {
    theme: ThemeState,
    overrides: Value,
    config: Config,
    viewport: Viewport,
    lattice: Lattice,
    pointer: PointerState,
    navigators: Vec<GridNavigator>,
    rng: Xorshift64,
    last_timestamp: Option<f64>,
    frame: u64,
    masses: Vec<Mass>,
}

impl Simulation {
    /// A simulation with the default five navigators and the stock config for
    /// the resolved theme.
    pub fn new(viewport: Viewport, theme: ThemeState, seed: u64) -> Self {
        let config = derive_config(theme.resolved());
        Self::assemble(viewport, theme, seed, Value::Object(Default::default()), config)
    }

    /// Like [`Simulation::new`], with config overrides applied on top of every
    /// theme's derived config.
    pub fn with_overrides(
        viewport: Viewport,
        theme: ThemeState,
        seed: u64,
        overrides: &Value,
    ) -> Result<Self, SpacetimeError> {
        let config = derive_config(theme.resolved()).with_overrides(overrides)?;
        Ok(Self::assemble(viewport, theme, seed, overrides.clone(), config))
    }

    fn assemble(
        viewport: Viewport,
        theme: ThemeState,
        seed: u64,
        overrides: Value,
        config: Config,
    ) -> Self {
        let lattice = Lattice::for_viewport(&viewport, config.grid_spacing);
        let mut rng = Xorshift64::new(seed);
        let navigators = default_flock(&lattice, &mut rng);
        Self {
            theme,
            overrides,
            config,
            viewport,
            lattice,
            pointer: PointerState::default(),
            navigators,
            rng,
            last_timestamp: None,
            frame: 0,
            masses: Vec::new(),
        }
    }

    /// Builds the simulation a [`Seed`] describes, pointer included.
    pub fn from_seed(seed: &Seed) -> Result<Self, SpacetimeError> {
        seed.validate()?;
        let viewport = Viewport::new(seed.width, seed.height, seed.device_pixel_ratio)?;
        let mut sim = Self::with_overrides(
            viewport,
            ThemeState::new(Some(seed.theme), false),
            seed.seed,
            &seed.params,
        )?;
        if let Some([x, y]) = seed.pointer {
            sim.pointer_moved(x, y);
        }
        Ok(sim)
    }

    /// Renders one frame at `timestamp_ms` (a monotonic host clock).
    pub fn tick<S: Surface + ?Sized>(&mut self, timestamp_ms: f64, surface: &mut S) -> FrameStats {
        let dt = self.advance_clock(timestamp_ms);
        self.pointer.smooth();

        surface.clear();
        for navigator in &mut self.navigators {
            navigator.update(dt, &self.lattice, &mut self.rng);
        }
        self.masses.clear();
        self.masses
            .extend(self.navigators.iter().map(|n| n.mass(&self.config)));
        let pointer = self.pointer.mass(&self.config);

        let mesh = GridMesh::build(
            self.viewport.width,
            self.viewport.height,
            self.config.grid_spacing,
            &self.masses,
            pointer.as_ref(),
            self.config.max_displacement,
        );
        draw_mesh(surface, &mesh, &self.config);
        draw_nodes(surface, &self.masses, pointer.as_ref(), &self.config);

        self.frame += 1;
        let stats = FrameStats {
            frame: self.frame,
            dt,
            pointer_active: pointer.is_some(),
            mesh_columns: mesh.columns(),
            mesh_rows: mesh.rows(),
        };
        log::trace!("{stats:?}");
        stats
    }

    /// Capped seconds since the previous frame; 0 for the first frame after a reset.
    fn advance_clock(&mut self, timestamp_ms: f64) -> f64 {
        let dt = match self.last_timestamp {
            Some(last) => ((timestamp_ms - last) / 1000.0).clamp(0.0, MAX_FRAME_DT),
            None => 0.0,
        };
        self.last_timestamp = Some(timestamp_ms);
        if dt.is_finite() {
            dt
        } else {
            0.0
        }
    }

    /// Forgets the previous frame time so the next frame integrates nothing.
    pub fn reset_clock(&mut self) {
        self.last_timestamp = None;
    }

    pub fn last_timestamp(&self) -> Option<f64> {
        self.last_timestamp
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.pointer.moved_to(DVec2::new(x, y));
    }

    pub fn pointer_left(&mut self) {
        self.pointer.left();
    }

    /// Adopts a new viewport and fits the navigators to the resized lattice.
    pub fn resize(&mut self, viewport: Viewport) {
        log::debug!(
            "resize to {}x{} @{}x",
            viewport.width,
            viewport.height,
            viewport.device_pixel_ratio
        );
        self.viewport = viewport;
        self.refit_lattice();
    }

    /// Sets or clears the explicit theme; re-derives the config if the resolved theme changed.
    pub fn set_theme(&mut self, theme: Option<Theme>) -> bool {
        let changed = self.theme.set_stored(theme);
        if changed {
            self.refresh_config();
        }
        changed
    }

    /// Reports a system color-scheme change; only matters while no theme is stored.
    pub fn set_system_prefers_light(&mut self, prefers_light: bool) -> bool {
        let changed = self.theme.set_system_prefers_light(prefers_light);
        if changed {
            self.refresh_config();
        }
        changed
    }

    /// Flips to the opposite theme and stores it.
    pub fn toggle_theme(&mut self) -> Theme {
        let theme = self.theme.toggle();
        self.refresh_config();
        theme
    }

    fn refresh_config(&mut self) {
        let theme = self.theme.resolved();
        let derived = derive_config(theme);
        self.config = match derived.with_overrides(&self.overrides) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("dropping config overrides for {theme} theme: {e}");
                derived
            }
        };
        log::debug!("config re-derived for {theme} theme");
        self.refit_lattice();
    }

    fn refit_lattice(&mut self) {
        self.lattice = Lattice::for_viewport(&self.viewport, self.config.grid_spacing);
        for navigator in &mut self.navigators {
            navigator.relocate(&self.lattice);
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn theme(&self) -> Theme {
        self.theme.resolved()
    }

    pub fn theme_state(&self) -> ThemeState {
        self.theme
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn navigators(&self) -> &[GridNavigator] {
        &self.navigators
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }
}
