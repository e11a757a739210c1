//! Boundary validation errors for profiles and level configuration.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("room type weights must sum to a positive total")]
    EmptyProfile,

    #[error("room type weights sum to {0}, above the largest drawable total")]
    ProfileWeightTooLarge(u64),

    #[error("corridor chance {0} is outside 0..=100")]
    CorridorChanceOutOfRange(u32),

    #[error("level is {width}x{height}; at least {min_width}x{min_height} is required")]
    LevelTooSmall { width: usize, height: usize, min_width: usize, min_height: usize },

    #[error("{axis} corridor length range {min}..={max} is empty or zero")]
    InvalidCorridorRange { axis: &'static str, min: i32, max: i32 },

    #[error("placement budget needs at least one attempt and one room")]
    ZeroPlacementBudget,
}
