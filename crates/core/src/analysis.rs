//! Connectivity analysis over an assembled permanent map: loop flags,
//! chokepoints, and the chokepoint-weight map that marks gate sites.
//!
//! Every pass reads passability through [`PermanentMap::blocks_pathing`], so
//! secret doors count as open and hazards as closed. None of them draw from
//! the random stream.

mod chokepoints;
mod loops;

#[cfg(test)]
mod test_support;

use crate::grid::Grid;
use crate::map::{CellFlags, PermanentMap};

pub use chokepoints::{CHOKE_MAP_CAP, CHOKE_MAP_UNSET, compute_choke_map, detect_chokepoints};
pub use loops::{audit_loops, detect_loops};

/// Flag counts after [`analyze_map`], plus the weight map when requested.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapAnalysis {
    pub loop_cells: usize,
    /// Loop cells the audit demoted after relaxation.
    pub demoted_loop_cells: usize,
    pub chokepoints: usize,
    pub gate_sites: usize,
    pub choke_map: Option<Grid>,
}

/// Runs loop detection, the loop audit and chokepoint detection in that
/// order, then the weight map if `with_choke_map` is set.
pub fn analyze_map(map: &mut PermanentMap, with_choke_map: bool) -> MapAnalysis {
    detect_loops(map);
    let demoted_loop_cells = audit_loops(map);
    let chokepoints = detect_chokepoints(map);
    let choke_map = with_choke_map.then(|| compute_choke_map(map));

    let analysis = MapAnalysis {
        loop_cells: map.count_flag(CellFlags::IN_LOOP),
        demoted_loop_cells,
        chokepoints,
        gate_sites: map.count_flag(CellFlags::IS_GATE_SITE),
        choke_map,
    };
    log::debug!(
        "analysis: {} loop cells ({} demoted), {} chokepoints, {} gate sites",
        analysis.loop_cells,
        analysis.demoted_loop_cells,
        analysis.chokepoints,
        analysis.gate_sites
    );
    analysis
}
