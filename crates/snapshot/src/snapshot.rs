//! PNG output for a [`RasterSurface`].
//!
//! Feature-gated behind `png` (default on) so the rasterizer can be used
//! without pulling in the `image` crate.

use spacetime_core::error::SpacetimeError;
use std::path::Path;

use crate::raster::RasterSurface;

/// Writes the surface's device-pixel buffer as a PNG.
///
/// Returns `SpacetimeError::InvalidDimensions` if the buffer is wider or
/// taller than `u32`, or `SpacetimeError::Io` on write failure.
pub fn write_png(surface: &RasterSurface, path: &Path) -> Result<(), SpacetimeError> {
    let w = u32::try_from(surface.width()).map_err(|_| SpacetimeError::InvalidDimensions)?;
    let h = u32::try_from(surface.height()).map_err(|_| SpacetimeError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, surface.to_rgba8())
        .ok_or_else(|| SpacetimeError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| SpacetimeError::Io(e.to_string()))
}
