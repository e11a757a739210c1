//! Shared fixture maps for the analyzer test suites.

use crate::map::{Layer, PermanentMap, Terrain};
use crate::types::Pos;

pub(super) fn carve(map: &mut PermanentMap, x: i32, y: i32, width: i32, height: i32, terrain: Terrain) {
    for cx in x..x + width {
        for cy in y..y + height {
            map[Pos::new(cx, cy)].set_terrain(Layer::Dungeon, terrain);
        }
    }
}

/// A 16×11 floor rectangle at (2, 2) with a 12×7 hole: a ring two cells thick.
pub(super) fn thick_ring_fixture() -> PermanentMap {
    let mut map = PermanentMap::new(20, 15);
    carve(&mut map, 2, 2, 16, 11, Terrain::Floor);
    carve(&mut map, 4, 4, 12, 7, Terrain::Granite);
    map
}

/// Same outline as [`thick_ring_fixture`], one cell thick.
pub(super) fn thin_ring_fixture() -> PermanentMap {
    let mut map = PermanentMap::new(20, 15);
    carve(&mut map, 2, 2, 16, 11, Terrain::Floor);
    carve(&mut map, 3, 3, 14, 9, Terrain::Granite);
    map
}

/// A straight twelve-cell corridor along row 3, closed at both ends.
pub(super) fn dead_end_fixture() -> PermanentMap {
    let mut map = PermanentMap::new(20, 7);
    carve(&mut map, 2, 3, 12, 1, Terrain::Floor);
    map
}

/// A 5×5 room and a 6×6 room joined by a nine-cell corridor along row 4,
/// running from (7, 4) to (15, 4).
pub(super) fn dumbbell_fixture() -> PermanentMap {
    let mut map = PermanentMap::new(30, 12);
    carve(&mut map, 2, 2, 5, 5, Terrain::Floor);
    carve(&mut map, 7, 4, 9, 1, Terrain::Floor);
    carve(&mut map, 16, 2, 6, 6, Terrain::Floor);
    map
}

pub(super) fn flagged(map: &PermanentMap, predicate: impl Fn(Pos) -> bool) -> Vec<Pos> {
    map.positions().filter(|&pos| predicate(pos)).collect()
}
