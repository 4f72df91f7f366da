//! Autonomous masses that wander the grid lattice.
//!
//! A [`GridNavigator`] travels edge by edge between lattice intersections.
//! At every intersection it may turn left or right (never back), and near
//! the lattice margin it is turned back inward, so it roams the visible area
//! indefinitely without leaving it.

use crate::field::Mass;
use crate::prng::RandomSource;
use crate::theme::Config;
use crate::viewport::Viewport;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Heading along a lattice edge. Screen coordinates: `Down` is +y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    /// Clockwise order starting from `Right`.
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    fn index(self) -> usize {
        match self {
            Direction::Right => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Up => 3,
        }
    }

    /// Lattice step for one edge.
    pub fn step(self) -> (i32, i32) {
        match self {
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
        }
    }

    pub fn unit(self) -> DVec2 {
        let (dx, dy) = self.step();
        DVec2::new(dx as f64, dy as f64)
    }

    /// Quarter turn; clockwise on screen when `clockwise` is set.
    pub fn turned(self, clockwise: bool) -> Direction {
        let offset = if clockwise { 1 } else { 3 };
        Self::ALL[(self.index() + offset) % 4]
    }

    pub fn reversed(self) -> Direction {
        Self::ALL[(self.index() + 2) % 4]
    }
}

/// The bounded integer lattice navigators move on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    pub origin: DVec2,
    pub spacing: f64,
    pub columns: i32,
    pub rows: i32,
    /// Cells kept free between a navigator and the lattice edge.
    pub margin: i32,
}

impl Lattice {
    pub const DEFAULT_MARGIN: i32 = 3;

    /// Lattice covering the viewport: `floor(extent / spacing)` cells per axis, origin at (0, 0).
    pub fn for_viewport(viewport: &Viewport, spacing: f64) -> Self {
        let cells = |extent: f64| (extent / spacing).floor().clamp(0.0, i32::MAX as f64) as i32;
        Self {
            origin: DVec2::ZERO,
            spacing,
            columns: cells(viewport.width),
            rows: cells(viewport.height),
            margin: Self::DEFAULT_MARGIN,
        }
    }

    /// Inclusive `(lower, upper)` column range a navigator may occupy.
    ///
    /// When the lattice is narrower than two margins, both bounds collapse to
    /// the margin.
    pub fn column_bounds(&self) -> (i32, i32) {
        (self.margin, (self.columns - self.margin).max(self.margin))
    }

    /// Inclusive `(lower, upper)` row range a navigator may occupy.
    pub fn row_bounds(&self) -> (i32, i32) {
        (self.margin, (self.rows - self.margin).max(self.margin))
    }

    pub fn clamp_cell(&self, column: i32, row: i32) -> (i32, i32) {
        let (c_lo, c_hi) = self.column_bounds();
        let (r_lo, r_hi) = self.row_bounds();
        (column.clamp(c_lo, c_hi), row.clamp(r_lo, r_hi))
    }

    /// Logical-pixel position of an intersection.
    pub fn point(&self, column: i32, row: i32) -> DVec2 {
        self.origin + self.spacing * DVec2::new(column as f64, row as f64)
    }

    /// Whether moving one edge in `direction` from the cell would leave the bounds.
    fn leads_outward(&self, column: i32, row: i32, direction: Direction) -> bool {
        let (c_lo, c_hi) = self.column_bounds();
        let (r_lo, r_hi) = self.row_bounds();
        match direction {
            Direction::Right => column >= c_hi,
            Direction::Left => column <= c_lo,
            Direction::Down => row >= r_hi,
            Direction::Up => row <= r_lo,
        }
    }

    /// The heading to take from a cell: `direction` itself if it stays in
    /// bounds, else its reverse, else a perpendicular. `None` when the
    /// lattice leaves no room to move at all.
    fn inward(&self, column: i32, row: i32, direction: Direction) -> Option<Direction> {
        [
            direction,
            direction.reversed(),
            direction.turned(true),
            direction.turned(false),
        ]
        .into_iter()
        .find(|&d| !self.leads_outward(column, row, d))
    }
}

/// Construction range for the per-navigator turn probability.
pub const TURN_PROBABILITY_RANGE: (f64, f64) = (0.3, 0.7);

/// A mass that travels the lattice at `speed` edges per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridNavigator {
    column: i32,
    row: i32,
    direction: Direction,
    /// Fraction of the current edge already travelled, in [0, 1).
    progress: f64,
    turn_probability: f64,
    speed: f64,
    /// Multiplier on the config's autonomous mass.
    weight: f64,
    position: DVec2,
}

impl GridNavigator {
    /// Places a navigator at `cell` with a random heading and a turn
    /// probability drawn from [`TURN_PROBABILITY_RANGE`].
    pub fn new<R: RandomSource + ?Sized>(
        cell: (i32, i32),
        speed: f64,
        weight: f64,
        lattice: &Lattice,
        rng: &mut R,
    ) -> Self {
        let direction = Direction::ALL[rng.next_index(Direction::ALL.len())];
        let (lo, hi) = TURN_PROBABILITY_RANGE;
        let turn_probability = rng.next_range(lo, hi);
        Self::with_state(cell, direction, turn_probability, speed, weight, lattice)
    }

    /// Places a navigator with every parameter fixed by the caller.
    ///
    /// The cell is clamped into the lattice bounds and the heading turned
    /// inward if it would leave them. Progress starts at 0, exactly on the
    /// intersection.
    pub fn with_state(
        cell: (i32, i32),
        direction: Direction,
        turn_probability: f64,
        speed: f64,
        weight: f64,
        lattice: &Lattice,
    ) -> Self {
        let mut navigator = Self {
            column: cell.0,
            row: cell.1,
            direction,
            progress: 0.0,
            turn_probability: turn_probability.clamp(0.0, 1.0),
            speed,
            weight,
            position: DVec2::ZERO,
        };
        navigator.settle(lattice);
        navigator.position = navigator.resolve_position(lattice);
        navigator
    }

    /// Advances the navigator by `dt` seconds.
    pub fn update<R: RandomSource + ?Sized>(&mut self, dt: f64, lattice: &Lattice, rng: &mut R) {
        if lattice.leads_outward(self.column, self.row, self.direction) {
            self.settle(lattice);
            if lattice.leads_outward(self.column, self.row, self.direction) {
                self.position = self.resolve_position(lattice);
                return;
            }
        }
        self.progress += dt * self.speed;
        while self.progress >= 1.0 {
            self.progress -= 1.0;
            let (dc, dr) = self.direction.step();
            self.column += dc;
            self.row += dr;
            if rng.chance(self.turn_probability) {
                self.direction = self.direction.turned(rng.chance(0.5));
            }
            self.settle(lattice);
        }
        self.position = self.resolve_position(lattice);
    }

    /// Re-fits the navigator to a changed lattice (resize or new spacing).
    pub fn relocate(&mut self, lattice: &Lattice) {
        self.settle(lattice);
        self.position = self.resolve_position(lattice);
    }

    /// The field source this navigator contributes under `config`.
    pub fn mass(&self, config: &Config) -> Mass {
        Mass::new(
            self.position,
            self.weight * config.autonomous_mass,
            config.softening_length,
        )
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn cell(&self) -> (i32, i32) {
        (self.column, self.row)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn turn_probability(&self) -> f64 {
        self.turn_probability
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    fn settle(&mut self, lattice: &Lattice) {
        (self.column, self.row) = lattice.clamp_cell(self.column, self.row);
        match lattice.inward(self.column, self.row, self.direction) {
            Some(direction) => self.direction = direction,
            // Boxed in on both axes: park on the intersection.
            None => self.progress = 0.0,
        }
    }

    fn resolve_position(&self, lattice: &Lattice) -> DVec2 {
        lattice.point(self.column, self.row)
            + self.direction.unit() * (self.progress * lattice.spacing)
    }
}

/// Start cell, speed and weight of the default five navigators.
const FLOCK: [((i32, i32), f64, f64); 5] = [
    ((8, 5), 0.8, 1.2),
    ((15, 10), 1.0, 1.0),
    ((22, 7), 0.9, 1.3),
    ((30, 12), 1.1, 1.4),
    ((38, 9), 1.2, 1.5),
];

/// The standard set of five navigators spread across a wide viewport.
pub fn default_flock<R: RandomSource + ?Sized>(lattice: &Lattice, rng: &mut R) -> Vec<GridNavigator> {
    FLOCK
        .iter()
        .map(|&(cell, speed, weight)| GridNavigator::new(cell, speed, weight, lattice, rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prng::testing::Scripted;
    use crate::prng::Xorshift64;
    use crate::theme::{derive_config, Theme};

    fn lattice(columns: i32, rows: i32) -> Lattice {
        Lattice {
            origin: DVec2::ZERO,
            spacing: 40.0,
            columns,
            rows,
            margin: Lattice::DEFAULT_MARGIN,
        }
    }

    fn approx(a: DVec2, b: DVec2) -> bool {
        (a - b).length() < 1e-9
    }

    #[test]
    fn turns_are_quarter_turns() {
        assert_eq!(Direction::Right.turned(true), Direction::Down);
        assert_eq!(Direction::Right.turned(false), Direction::Up);
        assert_eq!(Direction::Up.turned(true), Direction::Right);
        for d in Direction::ALL {
            assert_ne!(d.turned(true), d.reversed());
            assert_ne!(d.turned(false), d.reversed());
            assert_eq!(d.reversed().reversed(), d);
        }
    }

    #[test]
    fn unit_vectors_match_screen_axes() {
        assert_eq!(Direction::Right.unit(), DVec2::new(1.0, 0.0));
        assert_eq!(Direction::Down.unit(), DVec2::new(0.0, 1.0));
        assert_eq!(Direction::Left.unit(), DVec2::new(-1.0, 0.0));
        assert_eq!(Direction::Up.unit(), DVec2::new(0.0, -1.0));
    }

    #[test]
    fn lattice_for_viewport_floors_cells() {
        let vp = Viewport::new(1290.0, 810.0, 2.0).unwrap();
        let l = Lattice::for_viewport(&vp, 40.0);
        assert_eq!((l.columns, l.rows), (32, 20));
        assert_eq!(l.column_bounds(), (3, 29));
        assert_eq!(l.row_bounds(), (3, 17));
    }

    #[test]
    fn narrow_lattice_collapses_bounds_to_margin() {
        let l = lattice(4, 20);
        assert_eq!(l.column_bounds(), (3, 3));
        assert_eq!(l.clamp_cell(10, 1), (3, 3));
    }

    #[test]
    fn advances_along_edge_without_turning() {
        let l = lattice(40, 30);
        let mut nav = GridNavigator::with_state((8, 5), Direction::Right, 0.0, 0.8, 1.2, &l);
        assert!(approx(nav.position(), DVec2::new(320.0, 200.0)));
        nav.update(0.5, &l, &mut Xorshift64::new(1));
        assert!((nav.progress() - 0.4).abs() < 1e-12);
        assert!(approx(nav.position(), DVec2::new(336.0, 200.0)));
        assert_eq!(nav.cell(), (8, 5));
    }

    #[test]
    fn crossing_an_intersection_moves_to_next_cell() {
        let l = lattice(40, 30);
        let mut nav = GridNavigator::with_state((8, 5), Direction::Down, 0.0, 1.0, 1.0, &l);
        let mut rng = Xorshift64::new(5);
        for _ in 0..12 {
            nav.update(0.1, &l, &mut rng);
        }
        assert_eq!(nav.cell(), (8, 6));
        assert!((nav.progress() - 0.2).abs() < 1e-9);
        assert_eq!(nav.direction(), Direction::Down);
    }

    #[test]
    fn scripted_turn_goes_clockwise_or_counterclockwise() {
        let l = lattice(40, 30);
        // First draw fires the turn, second picks the side.
        let mut nav = GridNavigator::with_state((10, 10), Direction::Right, 0.5, 1.0, 1.0, &l);
        nav.update(1.0, &l, &mut Scripted::new(&[0.1, 0.2]));
        assert_eq!(nav.direction(), Direction::Down);

        let mut nav = GridNavigator::with_state((10, 10), Direction::Right, 0.5, 1.0, 1.0, &l);
        nav.update(1.0, &l, &mut Scripted::new(&[0.1, 0.9]));
        assert_eq!(nav.direction(), Direction::Up);

        let mut nav = GridNavigator::with_state((10, 10), Direction::Right, 0.5, 1.0, 1.0, &l);
        nav.update(1.0, &l, &mut Scripted::new(&[0.6]));
        assert_eq!(nav.direction(), Direction::Right);
        assert_eq!(nav.cell(), (11, 10));
    }

    #[test]
    fn bounces_off_the_right_margin() {
        let l = lattice(20, 20);
        let mut nav = GridNavigator::with_state((16, 10), Direction::Right, 0.0, 1.0, 1.0, &l);
        nav.update(1.0, &l, &mut Xorshift64::new(9));
        assert_eq!(nav.cell(), (17, 10));
        assert_eq!(nav.direction(), Direction::Left);
    }

    #[test]
    fn bounces_off_the_top_margin() {
        let l = lattice(20, 20);
        let mut nav = GridNavigator::with_state((10, 4), Direction::Up, 0.0, 1.0, 1.0, &l);
        nav.update(1.0, &l, &mut Xorshift64::new(9));
        assert_eq!(nav.cell(), (10, 3));
        assert_eq!(nav.direction(), Direction::Down);
    }

    #[test]
    fn construction_clamps_and_turns_inward() {
        let l = lattice(32, 20);
        let nav = GridNavigator::with_state((38, 9), Direction::Right, 0.5, 1.2, 1.5, &l);
        assert_eq!(nav.cell(), (29, 9));
        assert_eq!(nav.direction(), Direction::Left);
        assert!(approx(nav.position(), DVec2::new(29.0 * 40.0, 9.0 * 40.0)));
    }

    #[test]
    fn boxed_in_navigator_parks() {
        let l = lattice(2, 2);
        let mut nav = GridNavigator::with_state((0, 0), Direction::Right, 0.5, 1.0, 1.0, &l);
        let mut rng = Xorshift64::new(3);
        for _ in 0..50 {
            nav.update(0.1, &l, &mut rng);
            assert!(approx(nav.position(), DVec2::new(120.0, 120.0)));
        }
    }

    #[test]
    fn random_construction_uses_turn_probability_range() {
        let l = lattice(40, 30);
        let mut rng = Xorshift64::new(2024);
        for _ in 0..200 {
            let nav = GridNavigator::new((10, 10), 1.0, 1.0, &l, &mut rng);
            let p = nav.turn_probability();
            assert!((0.3..0.7).contains(&p), "turn probability {p}");
            assert_eq!(nav.progress(), 0.0);
        }
    }

    #[test]
    fn same_seed_same_path() {
        let l = lattice(32, 20);
        let mut a_rng = Xorshift64::new(77);
        let mut b_rng = Xorshift64::new(77);
        let mut a = default_flock(&l, &mut a_rng);
        let mut b = default_flock(&l, &mut b_rng);
        for _ in 0..500 {
            for (na, nb) in a.iter_mut().zip(b.iter_mut()) {
                na.update(1.0 / 60.0, &l, &mut a_rng);
                nb.update(1.0 / 60.0, &l, &mut b_rng);
            }
        }
        assert_eq!(a, b);
    }

    #[test]
    fn default_flock_has_five_weighted_navigators() {
        let l = lattice(48, 30);
        let flock = default_flock(&l, &mut Xorshift64::new(1));
        let weights: Vec<f64> = flock.iter().map(GridNavigator::weight).collect();
        assert_eq!(weights, vec![1.2, 1.0, 1.3, 1.4, 1.5]);
        assert_eq!(flock[0].cell(), (8, 5));
        assert_eq!(flock[4].speed(), 1.2);
    }

    #[test]
    fn mass_scales_with_config() {
        let l = lattice(40, 30);
        let nav = GridNavigator::with_state((8, 5), Direction::Right, 0.0, 0.8, 1.2, &l);
        let config = derive_config(Theme::Dark);
        let m = nav.mass(&config);
        assert!((m.strength - 60.0).abs() < 1e-12);
        assert_eq!(m.softening, 35.0);
        assert_eq!(m.position, nav.position());
    }

    #[test]
    fn relocate_pulls_navigator_into_shrunk_lattice() {
        let big = lattice(40, 30);
        let small = lattice(20, 15);
        let mut nav = GridNavigator::with_state((30, 20), Direction::Down, 0.0, 1.0, 1.0, &big);
        nav.relocate(&small);
        assert_eq!(nav.cell(), (17, 12));
        assert_eq!(nav.direction(), Direction::Up);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn never_leaves_the_bounds(
                seed: u64,
                columns in 0_i32..60,
                rows in 0_i32..40,
                start_col in -10_i32..70,
                start_row in -10_i32..50,
                speed in 0.1_f64..5.0,
                turn_probability in 0.0_f64..=1.0,
            ) {
                let l = lattice(columns, rows);
                let (c_lo, c_hi) = l.column_bounds();
                let (r_lo, r_hi) = l.row_bounds();
                let mut rng = Xorshift64::new(seed);
                let mut nav = GridNavigator::with_state(
                    (start_col, start_row), Direction::Right, turn_probability, speed, 1.0, &l,
                );
                for _ in 0..400 {
                    nav.update(0.1, &l, &mut rng);
                    let (c, r) = nav.cell();
                    prop_assert!((c_lo..=c_hi).contains(&c), "column {c} outside [{c_lo}, {c_hi}]");
                    prop_assert!((r_lo..=r_hi).contains(&r), "row {r} outside [{r_lo}, {r_hi}]");
                    let p = nav.position();
                    let eps = 1e-9;
                    prop_assert!(p.x >= c_lo as f64 * l.spacing - eps && p.x <= c_hi as f64 * l.spacing + eps);
                    prop_assert!(p.y >= r_lo as f64 * l.spacing - eps && p.y <= r_hi as f64 * l.spacing + eps);
                    prop_assert!((0.0..1.0).contains(&nav.progress()));
                }
            }

            #[test]
            fn position_is_continuous(
                seed: u64,
                speed in 0.1_f64..3.0,
                dt in 0.001_f64..0.1,
            ) {
                let l = lattice(32, 20);
                let mut rng = Xorshift64::new(seed);
                let mut nav = GridNavigator::new((10, 10), speed, 1.0, &l, &mut rng);
                for _ in 0..300 {
                    let before = nav.position();
                    nav.update(dt, &l, &mut rng);
                    let jump = (nav.position() - before).length();
                    prop_assert!(
                        jump <= dt * speed * l.spacing + 1e-9,
                        "jumped {jump} in one step (limit {})", dt * speed * l.spacing
                    );
                }
            }

            #[test]
            fn position_matches_cell_and_progress(seed: u64, steps in 1_usize..200) {
                let l = lattice(32, 20);
                let mut rng = Xorshift64::new(seed);
                let mut nav = GridNavigator::new((12, 8), 1.1, 1.0, &l, &mut rng);
                for _ in 0..steps {
                    nav.update(1.0 / 60.0, &l, &mut rng);
                }
                let (c, r) = nav.cell();
                let expected = l.point(c, r) + nav.direction().unit() * nav.progress() * l.spacing;
                prop_assert!(approx(nav.position(), expected));
            }
        }
    }
}
