//! The warped grid: lattice intersections pushed around by the field.
//!
//! The mesh reaches two cells past every viewport edge so displaced border
//! lines never pull away from the canvas edge. It is rebuilt from scratch
//! every frame and holds no state between frames.

use crate::field::{total_displacement, Mass};
use glam::DVec2;

/// Extra cells generated beyond the top/left edge (and, through the column
/// count, beyond the bottom/right edge).
pub const MESH_OVERSCAN: usize = 2;

/// Row-major grid of displaced intersection points.
#[derive(Debug, Clone, PartialEq)]
pub struct GridMesh {
    columns: usize,
    rows: usize,
    points: Vec<DVec2>,
}

impl GridMesh {
    /// Builds the displaced mesh for a `width` x `height` viewport.
    ///
    /// Produces `ceil(width / spacing) + 4` columns and
    /// `ceil(height / spacing) + 4` rows, starting at `(-2 * spacing, -2 * spacing)`.
    /// `spacing` must be positive; `Config::validate` guarantees it.
    pub fn build(
        width: f64,
        height: f64,
        spacing: f64,
        sources: &[Mass],
        pointer: Option<&Mass>,
        max_displacement: f64,
    ) -> GridMesh {
        let columns = Self::count(width, spacing);
        let rows = Self::count(height, spacing);
        let offset = -(MESH_OVERSCAN as f64) * spacing;

        let mut points = Vec::with_capacity(columns * rows);
        for row in 0..rows {
            let y = offset + row as f64 * spacing;
            for col in 0..columns {
                let base = DVec2::new(offset + col as f64 * spacing, y);
                points.push(base + total_displacement(base, sources, pointer, max_displacement));
            }
        }
        GridMesh {
            columns,
            rows,
            points,
        }
    }

    fn count(extent: f64, spacing: f64) -> usize {
        let cells = (extent / spacing).ceil().clamp(0.0, u32::MAX as f64) as usize;
        cells.saturating_add(2 * MESH_OVERSCAN)
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    /// # Panics
    ///
    /// Panics if `col` or `row` is out of range.
    pub fn point(&self, col: usize, row: usize) -> DVec2 {
        assert!(col < self.columns && row < self.rows, "mesh index out of range");
        self.points[row * self.columns + col]
    }

    /// Points of one row, left to right.
    pub fn row(&self, row: usize) -> &[DVec2] {
        let start = row * self.columns;
        &self.points[start..start + self.columns]
    }

    /// Points of one column, top to bottom.
    pub fn column(&self, col: usize) -> impl Iterator<Item = DVec2> + '_ {
        self.points.iter().skip(col).step_by(self.columns.max(1)).copied()
    }
}
