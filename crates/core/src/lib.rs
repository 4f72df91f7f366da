#![deny(unsafe_code)]
//! Core of the spacetime grid: a lattice warped by softened point masses.
//!
//! Five autonomous navigators walk the lattice and the pointer adds a sixth,
//! smoothed source. Every frame the grid intersections are displaced by the
//! summed field (`field`, `mesh`) and stroked onto a [`Surface`] together with
//! the navigator nodes (`render`). [`Simulation`] drives a frame,
//! [`FrameLoop`] adds start/stop control, and `theme` resolves light/dark
//! configs. Nothing here knows about browsers or image files.

pub mod color;
pub mod error;
pub mod field;
pub mod frame_loop;
pub mod mesh;
pub mod navigator;
pub mod params;
pub mod pointer;
pub mod prng;
pub mod render;
pub mod seed;
pub mod simulation;
pub mod surface;
pub mod theme;
pub mod viewport;

pub use color::Rgba;
pub use error::SpacetimeError;
pub use frame_loop::{CancellationToken, FrameControl, FrameLoop};
pub use seed::Seed;
pub use simulation::{FrameStats, Simulation};
pub use surface::Surface;
pub use theme::{derive_config, Config, Theme, ThemeState};
pub use viewport::Viewport;
