//! Public data model for generated levels and their fingerprints.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::grid::{DOOR, FLOOR, Grid};
use crate::map::PermanentMap;

use super::placement::PlacementReport;
use super::profile::RoomKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelStats {
    pub first_room: RoomKind,
    pub placement: PlacementReport,
    pub loops_added: usize,
    pub floor_cells: usize,
    /// Doorways in the carved grid, secret or not.
    pub door_cells: usize,
    pub secret_doors: usize,
    pub loop_cells: usize,
    pub chokepoints: usize,
    pub gate_sites: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedLevel {
    pub seed: u64,
    pub depth: u32,
    /// Carved grid after loop insertion: granite, floor and doorways.
    pub grid: Grid,
    /// Room number of every floor cell copied during placement, `0` elsewhere.
    /// Floor added by later passes keeps label `0`.
    pub room_labels: Grid,
    pub map: PermanentMap,
    pub choke_map: Option<Grid>,
    pub stats: LevelStats,
}

impl GeneratedLevel {
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend(self.seed.to_le_bytes());
        bytes.extend(self.depth.to_le_bytes());
        bytes.extend(self.grid.canonical_bytes());
        bytes.extend(self.room_labels.canonical_bytes());
        bytes.extend(self.map.canonical_bytes());
        match &self.choke_map {
            Some(choke_map) => {
                bytes.push(1);
                bytes.extend(choke_map.canonical_bytes());
            }
            None => bytes.push(0),
        }
        bytes
    }

    /// Stable hash of [`Self::canonical_bytes`]; equal seeds and
    /// configurations give equal fingerprints.
    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }

    /// Floor and doorway cells of the carved grid.
    pub fn walkable_cells(&self) -> usize {
        self.grid.count(FLOOR) + self.grid.count(DOOR)
    }
}
