use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self { y: self.y + dy, x: self.x + dx }
    }

    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = CARDINAL_OFFSETS[direction as usize];
        self.offset(dx, dy)
    }

    pub const fn compass_step(self, direction: CompassDirection) -> Self {
        let (dx, dy) = COMPASS_OFFSETS[direction as usize];
        self.offset(dx, dy)
    }
}

/// Cardinal directions, indexed into [`CARDINAL_OFFSETS`].
///
/// "No direction" is spelled `Option::<Direction>::None` throughout the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub const fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    pub const fn offset(self) -> (i32, i32) {
        CARDINAL_OFFSETS[self as usize]
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// `(dx, dy)` per [`Direction`]; `y` grows downward.
pub const CARDINAL_OFFSETS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Eight neighbor directions in rotational order, indexed into [`COMPASS_OFFSETS`].
///
/// Consecutive entries (wrapping from `DownLeft` back to `Down`) are adjacent
/// around the cell, which the loop and chokepoint passes rely on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CompassDirection {
    Down = 0,
    DownRight = 1,
    Right = 2,
    UpRight = 3,
    Up = 4,
    UpLeft = 5,
    Left = 6,
    DownLeft = 7,
}

impl CompassDirection {
    pub const ALL: [CompassDirection; 8] = [
        CompassDirection::Down,
        CompassDirection::DownRight,
        CompassDirection::Right,
        CompassDirection::UpRight,
        CompassDirection::Up,
        CompassDirection::UpLeft,
        CompassDirection::Left,
        CompassDirection::DownLeft,
    ];

    pub const fn offset(self) -> (i32, i32) {
        COMPASS_OFFSETS[self as usize]
    }
}

/// `(dx, dy)` per [`CompassDirection`]. Kept as its own table; the cardinal
/// entries are not looked up through [`CARDINAL_OFFSETS`].
pub const COMPASS_OFFSETS: [(i32, i32); 8] =
    [(0, 1), (1, 1), (1, 0), (1, -1), (0, -1), (-1, -1), (-1, 0), (-1, 1)];

/// One candidate connection point per cardinal direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DoorSites {
    sites: [Option<Pos>; 4],
}

impl DoorSites {
    pub const NONE: DoorSites = DoorSites { sites: [None; 4] };

    pub fn get(&self, direction: Direction) -> Option<Pos> {
        self.sites[direction.index()]
    }

    pub fn set(&mut self, direction: Direction, site: Option<Pos>) {
        self.sites[direction.index()] = site;
    }

    pub fn is_empty(&self) -> bool {
        self.sites.iter().all(Option::is_none)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Direction, Pos)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(|direction| self.get(direction).map(|site| (direction, site)))
    }
}
