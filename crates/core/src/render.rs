//! Stroking the warped grid and the navigator nodes onto a [`Surface`].

use crate::field::{total_displacement, Mass};
use crate::mesh::GridMesh;
use crate::surface::Surface;
use crate::theme::Config;
use glam::DVec2;

/// Share of the field displacement applied to node markers, keeping them
/// near their navigator while still reacting to the field.
pub const NODE_DISPLACEMENT_DAMPING: f64 = 0.3;

/// Strokes every mesh row, then every mesh column, each as one polyline.
pub fn draw_mesh<S: Surface + ?Sized>(surface: &mut S, mesh: &GridMesh, config: &Config) {
    let color = config.grid_color;
    let width = config.grid_line_width;
    for row in 0..mesh.rows() {
        surface.stroke_polyline(mesh.row(row), color, width);
    }
    let mut column = Vec::with_capacity(mesh.rows());
    for col in 0..mesh.columns() {
        column.clear();
        column.extend(mesh.column(col));
        surface.stroke_polyline(&column, color, width);
    }
}

/// Where a mass's node marker is drawn: its position nudged by the field of
/// every *other* mass plus the pointer.
pub fn node_position(index: usize, masses: &[Mass], pointer: Option<&Mass>, config: &Config) -> DVec2 {
    let mass = &masses[index];
    let others = masses
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != index)
        .map(|(_, m)| m);
    let displacement = total_displacement(mass.position, others, pointer, config.max_displacement);
    mass.position + displacement * NODE_DISPLACEMENT_DAMPING
}

/// Draws a filled disc and a wider ring for every mass.
pub fn draw_nodes<S: Surface + ?Sized>(
    surface: &mut S,
    masses: &[Mass],
    pointer: Option<&Mass>,
    config: &Config,
) {
    for index in 0..masses.len() {
        let center = node_position(index, masses, pointer, config);
        surface.fill_circle(center, config.node_radius, config.node_color);
        surface.stroke_circle(
            center,
            config.node_radius * config.node_ring_scale,
            config.node_ring_color,
            config.node_ring_width,
        );
    }
}
