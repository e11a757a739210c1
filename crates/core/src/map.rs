//! Permanent layered map the finished grid is assembled into, plus the
//! terrain catalog and per-cell flag sets the analyzer reads and writes.

use std::ops::{Index, IndexMut};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::grid::{DOOR, FLOOR, Grid};
use crate::rng::LevelRng;
use crate::types::{CARDINAL_OFFSETS, COMPASS_OFFSETS, Pos};

bitflags! {
    /// Static properties of a terrain type.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct TerrainFlags: u32 {
        const OBSTRUCTS_PASSABILITY = 1 << 0;
        const OBSTRUCTS_VISION = 1 << 1;
        const IS_DEEP_WATER = 1 << 2;
        const LAVA_INSTA_DEATH = 1 << 3;
        const AUTO_DESCENT = 1 << 4;
        const IS_DF_TRAP = 1 << 5;
        /// Looks like wall until discovered; ignored by the pathing blockers.
        const IS_SECRET = 1 << 6;

        const PATHING_BLOCKER = Self::OBSTRUCTS_PASSABILITY.bits()
            | Self::OBSTRUCTS_VISION.bits()
            | Self::IS_DEEP_WATER.bits()
            | Self::LAVA_INSTA_DEATH.bits()
            | Self::AUTO_DESCENT.bits()
            | Self::IS_DF_TRAP.bits();
    }
}

bitflags! {
    /// Mutable per-cell annotations.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CellFlags: u16 {
        const IN_LOOP = 1 << 0;
        const IS_CHOKEPOINT = 1 << 1;
        const IS_GATE_SITE = 1 << 2;
        const IS_IN_ROOM_MACHINE = 1 << 3;
        const IS_IN_AREA_MACHINE = 1 << 4;
        const HAS_MACHINE_PRESENCE = 1 << 5;
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    #[default]
    Nothing = 0,
    Granite = 1,
    Wall = 2,
    Floor = 3,
    Door = 4,
    SecretDoor = 5,
    DeepWater = 6,
    Lava = 7,
    Chasm = 8,
    PressurePlate = 9,
}

impl Terrain {
    pub const fn flags(self) -> TerrainFlags {
        match self {
            Terrain::Nothing | Terrain::Floor | Terrain::Door => TerrainFlags::empty(),
            Terrain::Granite | Terrain::Wall => {
                TerrainFlags::OBSTRUCTS_PASSABILITY.union(TerrainFlags::OBSTRUCTS_VISION)
            }
            Terrain::SecretDoor => TerrainFlags::OBSTRUCTS_PASSABILITY
                .union(TerrainFlags::OBSTRUCTS_VISION)
                .union(TerrainFlags::IS_SECRET),
            Terrain::DeepWater => TerrainFlags::IS_DEEP_WATER,
            Terrain::Lava => TerrainFlags::LAVA_INSTA_DEATH,
            Terrain::Chasm => TerrainFlags::AUTO_DESCENT,
            Terrain::PressurePlate => TerrainFlags::IS_DF_TRAP,
        }
    }

    pub const fn glyph(self) -> char {
        match self {
            Terrain::Nothing | Terrain::Granite => ' ',
            Terrain::Wall | Terrain::SecretDoor => '#',
            Terrain::Floor => '.',
            Terrain::Door => '+',
            Terrain::DeepWater => '~',
            Terrain::Lava => '=',
            Terrain::Chasm => ':',
            Terrain::PressurePlate => '^',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    Dungeon = 0,
    Liquid = 1,
    Gas = 2,
    Surface = 3,
}

impl Layer {
    pub const ALL: [Layer; 4] = [Layer::Dungeon, Layer::Liquid, Layer::Gas, Layer::Surface];
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermanentCell {
    pub layers: [Terrain; 4],
    pub flags: CellFlags,
}

impl PermanentCell {
    pub fn with_dungeon(terrain: Terrain) -> Self {
        let mut cell = Self::default();
        cell.layers[Layer::Dungeon as usize] = terrain;
        cell
    }

    pub fn terrain(&self, layer: Layer) -> Terrain {
        self.layers[layer as usize]
    }

    pub fn set_terrain(&mut self, layer: Layer, terrain: Terrain) {
        self.layers[layer as usize] = terrain;
    }

    /// Topmost non-empty layer.
    pub fn visible_terrain(&self) -> Terrain {
        Layer::ALL
            .iter()
            .rev()
            .map(|&layer| self.terrain(layer))
            .find(|&terrain| terrain != Terrain::Nothing)
            .unwrap_or_default()
    }

    pub fn terrain_flags(&self) -> TerrainFlags {
        self.layers.iter().fold(TerrainFlags::empty(), |acc, terrain| acc | terrain.flags())
    }

    pub fn has_terrain_flag(&self, flags: TerrainFlags) -> bool {
        self.terrain_flags().intersects(flags)
    }

    pub fn is_secret(&self) -> bool {
        self.has_terrain_flag(TerrainFlags::IS_SECRET)
    }

    /// Solid, hazardous, or sight-blocking terrain. Secret terrain counts as open.
    pub fn blocks_pathing(&self) -> bool {
        self.has_terrain_flag(TerrainFlags::PATHING_BLOCKER) && !self.is_secret()
    }

    /// Whether sight or movement can reach this cell from a neighbor; walls
    /// next to such a cell are visible.
    pub fn is_exposed(&self) -> bool {
        let solid = TerrainFlags::OBSTRUCTS_PASSABILITY | TerrainFlags::OBSTRUCTS_VISION;
        !self.terrain_flags().contains(solid) && !self.is_secret()
    }

    pub fn is_in_machine(&self) -> bool {
        self.flags.intersects(CellFlags::IS_IN_ROOM_MACHINE | CellFlags::IS_IN_AREA_MACHINE)
    }

    pub fn is_in_loop(&self) -> bool {
        self.flags.contains(CellFlags::IN_LOOP)
    }

    pub fn is_chokepoint(&self) -> bool {
        self.flags.contains(CellFlags::IS_CHOKEPOINT)
    }

    pub fn is_gate_site(&self) -> bool {
        self.flags.contains(CellFlags::IS_GATE_SITE)
    }

    /// Loop and chokepoint flags sit only on open cells, and gate sites are
    /// always chokepoints.
    pub fn flags_are_consistent(&self) -> bool {
        let open = !self.blocks_pathing();
        (!self.is_in_loop() || open)
            && (!self.is_chokepoint() || open)
            && (!self.is_gate_site() || self.is_chokepoint())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermanentMap {
    width: usize,
    height: usize,
    cells: Vec<PermanentCell>,
}

impl PermanentMap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![PermanentCell::with_dungeon(Terrain::Granite); width * height],
        }
    }

    /// Converts a carved grid: floor stays floor, each doorway becomes a door
    /// or, on one `percent` draw per doorway in column-major order, a secret
    /// door; everything else is granite.
    pub fn from_grid(grid: &Grid, secret_door_chance: i32, rng: &mut LevelRng) -> Self {
        let mut map = Self::new(grid.width(), grid.height());
        for pos in grid.positions() {
            let terrain = match grid[pos] {
                FLOOR => Terrain::Floor,
                DOOR if rng.percent(secret_door_chance) => Terrain::SecretDoor,
                DOOR => Terrain::Door,
                _ => Terrain::Granite,
            };
            map[pos].set_terrain(Layer::Dungeon, terrain);
        }
        map
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    pub fn cell(&self, pos: Pos) -> Option<&PermanentCell> {
        self.in_bounds(pos).then(|| &self.cells[self.index_of(pos)])
    }

    /// Every position, column-major.
    pub fn positions(&self) -> impl Iterator<Item = Pos> + use<> {
        let (width, height) = (self.width as i32, self.height as i32);
        (0..width).flat_map(move |x| (0..height).map(move |y| Pos::new(x, y)))
    }

    pub fn cells(&self) -> &[PermanentCell] {
        &self.cells
    }

    /// Off-map positions count as blocked.
    pub fn blocks_pathing(&self, pos: Pos) -> bool {
        self.cell(pos).is_none_or(PermanentCell::blocks_pathing)
    }

    pub fn count_flag(&self, flag: CellFlags) -> usize {
        self.cells.iter().filter(|cell| cell.flags.contains(flag)).count()
    }

    pub fn clear_flags(&mut self, flags: CellFlags) {
        for cell in &mut self.cells {
            cell.flags.remove(flags);
        }
    }

    pub fn flags_are_consistent(&self) -> bool {
        self.cells.iter().all(PermanentCell::flags_are_consistent)
    }

    /// Granite with an exposed neighbor becomes wall; wall without one
    /// reverts to granite.
    pub fn finish_walls(&mut self, include_diagonals: bool) {
        let neighbors: &[(i32, i32)] =
            if include_diagonals { &COMPASS_OFFSETS } else { &CARDINAL_OFFSETS };
        for pos in self.positions() {
            let current = self[pos].terrain(Layer::Dungeon);
            if current != Terrain::Granite && current != Terrain::Wall {
                continue;
            }
            let exposed = neighbors.iter().any(|&(dx, dy)| {
                self.cell(pos.offset(dx, dy)).is_some_and(PermanentCell::is_exposed)
            });
            let finished = if exposed { Terrain::Wall } else { Terrain::Granite };
            self[pos].set_terrain(Layer::Dungeon, finished);
        }
    }

    /// One line per row. With `annotate`, open cells show their analyzer
    /// flags: `G` gate site, `c` chokepoint, `o` loop.
    pub fn render_ascii(&self, annotate: bool) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let cell = &self[Pos::new(x, y)];
                let glyph = if annotate && cell.is_gate_site() {
                    'G'
                } else if annotate && cell.is_chokepoint() {
                    'c'
                } else if annotate && cell.is_in_loop() && !cell.is_secret() {
                    'o'
                } else {
                    cell.visible_terrain().glyph()
                };
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }

    /// Dimensions, then per cell (row-major) the four layer ids and the flag bits.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8 + self.cells.len() * 6);
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.height as u32).to_le_bytes());
        for cell in &self.cells {
            bytes.extend(cell.layers.map(|terrain| terrain as u8));
            bytes.extend(cell.flags.bits().to_le_bytes());
        }
        bytes
    }

    fn index_of(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }
}

impl Index<Pos> for PermanentMap {
    type Output = PermanentCell;

    fn index(&self, pos: Pos) -> &PermanentCell {
        assert!(self.in_bounds(pos), "{pos:?} is outside a {}x{} map", self.width, self.height);
        &self.cells[self.index_of(pos)]
    }
}

impl IndexMut<Pos> for PermanentMap {
    fn index_mut(&mut self, pos: Pos) -> &mut PermanentCell {
        assert!(self.in_bounds(pos), "{pos:?} is outside a {}x{} map", self.width, self.height);
        let index = self.index_of(pos);
        &mut self.cells[index]
    }
}
