pub mod analysis;
pub mod config;
pub mod error;
pub mod grid;
pub mod map;
pub mod mapgen;
pub mod pathing;
pub mod rng;
pub mod types;

pub use analysis::{MapAnalysis, analyze_map};
pub use config::{CorridorConfig, LevelConfig, RngStream};
pub use error::GenerationError;
pub use grid::Grid;
pub use map::{CellFlags, PermanentCell, PermanentMap, Terrain, TerrainFlags};
pub use mapgen::{GeneratedLevel, LevelGenerator, LevelStats, generate_level};
pub use rng::LevelRng;
pub use types::*;
