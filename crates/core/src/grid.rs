//! Integer field primitives shared by room design, placement, and loop insertion.
//!
//! Storage is row-major, but every scan whose order can influence output walks
//! column-major (x outer, y inner).

use std::ops::{Index, IndexMut};

use crate::rng::LevelRng;
use crate::types::{COMPASS_OFFSETS, Direction, Pos};

pub const GRANITE: i32 = 0;
pub const FLOOR: i32 = 1;
pub const DOOR: i32 = 2;
/// Off-limits marker set by callers; never written by the generator itself.
pub const RESERVED: i32 = -1;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<i32>,
}

/// Placement of the surviving blob produced by [`Grid::create_blob`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlobBounds {
    pub min_x: i32,
    pub min_y: i32,
    pub width: i32,
    pub height: i32,
}

/// Parameters for [`Grid::create_blob`]. Rules are nine `t`/`f` characters
/// indexed by live-neighbor count.
#[derive(Clone, Copy, Debug)]
pub struct BlobSpec<'a> {
    pub rounds: usize,
    pub min_width: i32,
    pub min_height: i32,
    pub max_width: i32,
    pub max_height: i32,
    pub seed_percent: i32,
    pub birth: &'a str,
    pub survival: &'a str,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, GRANITE)
    }

    pub fn filled(width: usize, height: usize, value: i32) -> Self {
        Self { width, height, cells: vec![value; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    pub fn get(&self, pos: Pos) -> Option<i32> {
        self.in_bounds(pos).then(|| self.cells[self.index_of(pos)])
    }

    /// Writes `value` if `pos` is on the grid; returns whether it was.
    pub fn set(&mut self, pos: Pos, value: i32) -> bool {
        if !self.in_bounds(pos) {
            return false;
        }
        let index = self.index_of(pos);
        self.cells[index] = value;
        true
    }

    /// Every position, column-major.
    pub fn positions(&self) -> impl Iterator<Item = Pos> + use<> {
        let (width, height) = (self.width as i32, self.height as i32);
        (0..width).flat_map(move |x| (0..height).map(move |y| Pos::new(x, y)))
    }

    /// Maps a column-major cell number (`x * height + y`) back to a position.
    pub fn pos_at_column_major(&self, index: usize) -> Pos {
        Pos::new((index / self.height) as i32, (index % self.height) as i32)
    }

    pub fn values(&self) -> &[i32] {
        &self.cells
    }

    pub fn fill(&mut self, value: i32) {
        self.cells.fill(value);
    }

    pub fn copy_from(&mut self, other: &Grid) {
        assert_eq!((self.width, self.height), (other.width, other.height), "grid size mismatch");
        self.cells.copy_from_slice(&other.cells);
    }

    pub fn find_replace(&mut self, min: i32, max: i32, value: i32) {
        for cell in &mut self.cells {
            if (min..=max).contains(cell) {
                *cell = value;
            }
        }
    }

    /// Filled rectangle with its top-left corner at `(x, y)`, clipped to the grid.
    pub fn draw_rectangle(&mut self, x: i32, y: i32, width: i32, height: i32, value: i32) {
        for cx in x..x + width {
            for cy in y..y + height {
                self.set(Pos::new(cx, cy), value);
            }
        }
    }

    /// Filled disc of cells with `dx² + dy² < r² + r`.
    pub fn draw_circle(&mut self, center: Pos, radius: i32, value: i32) {
        let limit = radius * radius + radius;
        let max_x = self.width as i32 - 1;
        let max_y = self.height as i32 - 1;
        for x in (center.x - radius).max(0)..=(center.x + radius).min(max_x) {
            for y in (center.y - radius).max(0)..=(center.y + radius).min(max_y) {
                let (dx, dy) = (x - center.x, y - center.y);
                if dx * dx + dy * dy < limit {
                    self.set(Pos::new(x, y), value);
                }
            }
        }
    }

    pub fn count(&self, value: i32) -> usize {
        self.cells.iter().filter(|&&cell| cell == value).count()
    }

    /// Uniform pick among cells holding `value`, in column-major order, with
    /// the same draw rule as [`LevelRng::pick`].
    pub fn random_location(&self, value: i32, rng: &mut LevelRng) -> Option<Pos> {
        let candidates: Vec<Pos> = self.positions().filter(|&pos| self[pos] == value).collect();
        rng.pick(&candidates).copied()
    }

    /// Relabels the 4-connected region sharing `start`'s value and returns its size.
    pub fn fill_contiguous_region(&mut self, start: Pos, fill_value: i32) -> usize {
        let Some(target) = self.get(start) else {
            return 0;
        };
        if target == fill_value {
            return 0;
        }
        let mut filled = 0;
        let mut stack = vec![start];
        self[start] = fill_value;
        while let Some(pos) = stack.pop() {
            filled += 1;
            for direction in Direction::ALL {
                let next = pos.step(direction);
                if self.get(next) == Some(target) {
                    self[next] = fill_value;
                    stack.push(next);
                }
            }
        }
        filled
    }

    /// One synchronous birth/survival step over 8-neighbor counts; off-grid
    /// neighbors count as dead.
    pub fn cellular_automaton_round(&mut self, birth: &str, survival: &str) {
        let mut previous = Grid::new(self.width, self.height);
        self.automaton_step(&mut previous, birth, survival);
    }

    /// Runs one automaton round using `previous` as the snapshot buffer.
    fn automaton_step(&mut self, previous: &mut Grid, birth: &str, survival: &str) {
        let birth = birth.as_bytes();
        let survival = survival.as_bytes();
        previous.copy_from(self);
        for pos in previous.positions() {
            let neighbors = COMPASS_OFFSETS
                .iter()
                .filter(|&&(dx, dy)| previous.get(pos.offset(dx, dy)).is_some_and(|v| v != 0))
                .count();
            let alive = previous[pos] != 0;
            let rule = if alive { survival } else { birth };
            self[pos] = i32::from(rule.get(neighbors) == Some(&b't'));
        }
    }

    /// Grows cellular-automaton noise in the top-left `max_width × max_height`
    /// corner until its largest region spans at least the minimum size, then
    /// leaves only that region as `1`.
    pub fn create_blob(&mut self, spec: &BlobSpec<'_>, rng: &mut LevelRng) -> BlobBounds {
        let mut previous = Grid::new(self.width, self.height);
        loop {
            self.fill(0);
            for x in 0..spec.max_width {
                for y in 0..spec.max_height {
                    let seeded = rng.percent(spec.seed_percent);
                    self.set(Pos::new(x, y), i32::from(seeded));
                }
            }
            for _ in 0..spec.rounds {
                self.automaton_step(&mut previous, spec.birth, spec.survival);
            }

            let mut top_label = 0;
            let mut top_size = 0;
            let mut next_label = 2;
            for pos in self.positions() {
                if self[pos] == 1 {
                    let size = self.fill_contiguous_region(pos, next_label);
                    if size > top_size {
                        top_size = size;
                        top_label = next_label;
                    }
                    next_label += 1;
                }
            }
            if top_label == 0 {
                continue;
            }

            let bounds = self.bounds_of(top_label);
            if bounds.width < spec.min_width || bounds.height < spec.min_height {
                continue;
            }
            for cell in &mut self.cells {
                *cell = i32::from(*cell == top_label);
            }
            return bounds;
        }
    }

    /// Little-endian dimensions followed by every cell, row-major.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8 + self.cells.len() * 4);
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.height as u32).to_le_bytes());
        for cell in &self.cells {
            bytes.extend(cell.to_le_bytes());
        }
        bytes
    }

    fn bounds_of(&self, value: i32) -> BlobBounds {
        let (mut min_x, mut min_y) = (i32::MAX, i32::MAX);
        let (mut max_x, mut max_y) = (i32::MIN, i32::MIN);
        for pos in self.positions().filter(|&pos| self[pos] == value) {
            min_x = min_x.min(pos.x);
            max_x = max_x.max(pos.x);
            min_y = min_y.min(pos.y);
            max_y = max_y.max(pos.y);
        }
        BlobBounds { min_x, min_y, width: max_x - min_x + 1, height: max_y - min_y + 1 }
    }

    fn index_of(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }
}

impl Index<Pos> for Grid {
    type Output = i32;

    fn index(&self, pos: Pos) -> &i32 {
        assert!(self.in_bounds(pos), "{pos:?} is outside a {}x{} grid", self.width, self.height);
        &self.cells[self.index_of(pos)]
    }
}

impl IndexMut<Pos> for Grid {
    fn index_mut(&mut self, pos: Pos) -> &mut i32 {
        assert!(self.in_bounds(pos), "{pos:?} is outside a {}x{} grid", self.width, self.height);
        let index = self.index_of(pos);
        &mut self.cells[index]
    }
}
