//! Tunable generation parameters, loadable from any serde format.

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

pub const MIN_LEVEL_WIDTH: usize = 64;
pub const MIN_LEVEL_HEIGHT: usize = 29;

/// Which raw generator backs a [`crate::rng::LevelRng`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RngStream {
    #[default]
    ChaCha8,
    /// The four-word small-fast generator, for byte-for-byte comparison
    /// against other implementations driven by the same seed.
    SmallFast,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorridorConfig {
    pub horizontal_min: i32,
    pub horizontal_max: i32,
    pub vertical_min: i32,
    pub vertical_max: i32,
    pub oblique_exit_percent: i32,
}

impl Default for CorridorConfig {
    fn default() -> Self {
        Self {
            horizontal_min: 5,
            horizontal_max: 15,
            vertical_min: 2,
            vertical_max: 9,
            oblique_exit_percent: 15,
        }
    }
}

impl CorridorConfig {
    pub fn length_range(&self, vertical: bool) -> (i32, i32) {
        if vertical {
            (self.vertical_min, self.vertical_max)
        } else {
            (self.horizontal_min, self.horizontal_max)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub width: usize,
    pub height: usize,
    pub rng_stream: RngStream,
    pub corridors: CorridorConfig,
    /// Cells traced outward from a door site looking for the room it belongs to.
    pub door_trace_length: i32,
    pub placement_attempts: usize,
    pub max_rooms: usize,
    /// Minimum detour length before the loop augmenter opens a doorway.
    pub loop_threshold: i32,
    /// Depth at which depth-scaled profile adjustments saturate.
    pub descent_depth: u32,
    pub compute_choke_map: bool,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            width: 79,
            height: 29,
            rng_stream: RngStream::ChaCha8,
            corridors: CorridorConfig::default(),
            door_trace_length: 10,
            placement_attempts: 35,
            max_rooms: 35,
            loop_threshold: 20,
            descent_depth: 26,
            compute_choke_map: true,
        }
    }
}

impl LevelConfig {
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.width < MIN_LEVEL_WIDTH || self.height < MIN_LEVEL_HEIGHT {
            return Err(GenerationError::LevelTooSmall {
                width: self.width,
                height: self.height,
                min_width: MIN_LEVEL_WIDTH,
                min_height: MIN_LEVEL_HEIGHT,
            });
        }
        let corridors = &self.corridors;
        if corridors.horizontal_min < 1 || corridors.horizontal_min > corridors.horizontal_max {
            return Err(GenerationError::InvalidCorridorRange {
                axis: "horizontal",
                min: corridors.horizontal_min,
                max: corridors.horizontal_max,
            });
        }
        if corridors.vertical_min < 1 || corridors.vertical_min > corridors.vertical_max {
            return Err(GenerationError::InvalidCorridorRange {
                axis: "vertical",
                min: corridors.vertical_min,
                max: corridors.vertical_max,
            });
        }
        if self.placement_attempts == 0 || self.max_rooms == 0 {
            return Err(GenerationError::ZeroPlacementBudget);
        }
        Ok(())
    }

    /// Percent chance that a placed door is hidden, growing with depth.
    pub fn secret_door_chance(&self, depth: u32) -> i32 {
        let span = self.descent_depth.saturating_sub(1).max(1) as i64;
        let chance = (depth.saturating_sub(1) as i64) * 67 / span;
        chance.clamp(0, 67) as i32
    }
}
