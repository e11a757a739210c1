//! Room-kind weights and corridor odds, plus the depth scaling applied to them.

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

pub const ROOM_KIND_COUNT: usize = 8;
/// Largest weight total a single bounded draw can cover.
pub const MAX_PROFILE_WEIGHT: u64 = i32::MAX as u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoomKind {
    Cross,
    SymmetricalCross,
    Small,
    Circular,
    Chunky,
    Cave,
    Cavern,
    Entrance,
}

impl RoomKind {
    pub const ALL: [RoomKind; ROOM_KIND_COUNT] = [
        RoomKind::Cross,
        RoomKind::SymmetricalCross,
        RoomKind::Small,
        RoomKind::Circular,
        RoomKind::Chunky,
        RoomKind::Cave,
        RoomKind::Cavern,
        RoomKind::Entrance,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Weighted room-kind distribution plus the percent chance that a candidate
/// grows a corridor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawProfile")]
pub struct DungeonProfile {
    weights: [u32; ROOM_KIND_COUNT],
    corridor_chance: u32,
}

impl DungeonProfile {
    pub fn new(weights: [u32; ROOM_KIND_COUNT], corridor_chance: u32) -> Result<Self, GenerationError> {
        let total: u64 = weights.iter().copied().map(u64::from).sum();
        if total == 0 {
            return Err(GenerationError::EmptyProfile);
        }
        if total > MAX_PROFILE_WEIGHT {
            return Err(GenerationError::ProfileWeightTooLarge(total));
        }
        if corridor_chance > 100 {
            return Err(GenerationError::CorridorChanceOutOfRange(corridor_chance));
        }
        Ok(Self { weights, corridor_chance })
    }

    pub fn weights(&self) -> [u32; ROOM_KIND_COUNT] {
        self.weights
    }

    pub fn weight(&self, kind: RoomKind) -> u32 {
        self.weights[kind.index()]
    }

    pub fn total_weight(&self) -> u64 {
        self.weights.iter().copied().map(u64::from).sum()
    }

    pub fn corridor_chance(&self) -> u32 {
        self.corridor_chance
    }
}

#[derive(Deserialize)]
struct RawProfile {
    weights: [u32; ROOM_KIND_COUNT],
    corridor_chance: u32,
}

impl TryFrom<RawProfile> for DungeonProfile {
    type Error = GenerationError;

    fn try_from(raw: RawProfile) -> Result<Self, Self::Error> {
        Self::new(raw.weights, raw.corridor_chance)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileId {
    Basic,
    BasicFirstRoom,
    GoblinWarrens,
    SentinelSanctuaries,
}

impl ProfileId {
    pub const ALL: [ProfileId; 4] = [
        ProfileId::Basic,
        ProfileId::BasicFirstRoom,
        ProfileId::GoblinWarrens,
        ProfileId::SentinelSanctuaries,
    ];

    pub const fn profile(self) -> DungeonProfile {
        let (weights, corridor_chance) = match self {
            ProfileId::Basic => ([2, 1, 1, 1, 7, 1, 0, 0], 10),
            ProfileId::BasicFirstRoom => ([10, 0, 0, 3, 7, 10, 10, 0], 0),
            ProfileId::GoblinWarrens => ([0, 0, 1, 0, 0, 0, 0, 0], 0),
            ProfileId::SentinelSanctuaries => ([0, 5, 0, 1, 0, 0, 0, 0], 0),
        };
        DungeonProfile { weights, corridor_chance }
    }
}

/// How far through the descent `depth` sits, as a percentage.
pub fn descent_percent(depth: u32, descent_depth: u32) -> u32 {
    let span = descent_depth.saturating_sub(1).max(1);
    (100 * depth.saturating_sub(1) / span).min(100)
}

/// Catalog level profile with shallow levels favoring crosses, circles and
/// corridors, and deep levels favoring caves.
pub fn level_profile(depth: u32, descent_depth: u32) -> DungeonProfile {
    let descent = descent_percent(depth, descent_depth);
    let shallow = 100 - descent;
    let mut profile = ProfileId::Basic.profile();
    profile.weights[RoomKind::Cross.index()] += 20 * shallow / 100;
    profile.weights[RoomKind::SymmetricalCross.index()] += 10 * shallow / 100;
    profile.weights[RoomKind::Circular.index()] += 7 * shallow / 100;
    profile.weights[RoomKind::Cave.index()] += 10 * descent / 100;
    profile.corridor_chance += 80 * shallow / 100;
    profile
}

/// Profile for the room every level starts from: the fixed entrance on the
/// first level, increasingly large caverns below it.
pub fn first_room_profile(depth: u32, descent_depth: u32) -> DungeonProfile {
    let mut profile = ProfileId::BasicFirstRoom.profile();
    if depth <= 1 {
        profile.weights = [0; ROOM_KIND_COUNT];
        profile.weights[RoomKind::Entrance.index()] = 1;
    } else {
        let descent = descent_percent(depth, descent_depth);
        profile.weights[RoomKind::Cavern.index()] += 50 * descent / 100;
    }
    profile
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_weights_and_oversized_corridor_chance_are_rejected() {
        assert_eq!(DungeonProfile::new([0; ROOM_KIND_COUNT], 10), Err(GenerationError::EmptyProfile));
        assert_eq!(
            DungeonProfile::new([1, 0, 0, 0, 0, 0, 0, 0], 101),
            Err(GenerationError::CorridorChanceOutOfRange(101))
        );
        assert!(DungeonProfile::new([0, 0, 0, 0, 0, 0, 0, 1], 100).is_ok());
    }

    #[test]
    fn weight_totals_are_summed_without_overflow() {
        let mut weights = [0; ROOM_KIND_COUNT];
        weights[RoomKind::Cross.index()] = u32::MAX;
        weights[RoomKind::Small.index()] = 1;
        assert_eq!(
            DungeonProfile::new(weights, 0),
            Err(GenerationError::ProfileWeightTooLarge(u64::from(u32::MAX) + 1))
        );

        weights[RoomKind::Cross.index()] = i32::MAX as u32;
        assert_eq!(
            DungeonProfile::new(weights, 0),
            Err(GenerationError::ProfileWeightTooLarge(MAX_PROFILE_WEIGHT + 1))
        );

        weights[RoomKind::Cross.index()] = i32::MAX as u32 - 1;
        let profile = DungeonProfile::new(weights, 0).unwrap();
        assert_eq!(profile.total_weight(), MAX_PROFILE_WEIGHT);
    }

    #[test]
    fn deserialized_profiles_are_validated() {
        let profile: DungeonProfile =
            serde_json::from_str(r#"{"weights":[0,0,1,0,0,0,0,2],"corridor_chance":30}"#).unwrap();
        assert_eq!(profile, DungeonProfile::new([0, 0, 1, 0, 0, 0, 0, 2], 30).unwrap());
        let round_trip: DungeonProfile =
            serde_json::from_str(&serde_json::to_string(&profile).unwrap()).unwrap();
        assert_eq!(round_trip, profile);

        let empty = serde_json::from_str::<DungeonProfile>(r#"{"weights":[0,0,0,0,0,0,0,0],"corridor_chance":0}"#);
        assert!(empty.unwrap_err().to_string().contains("positive total"));
        let chance = serde_json::from_str::<DungeonProfile>(r#"{"weights":[1,0,0,0,0,0,0,0],"corridor_chance":101}"#);
        assert!(chance.unwrap_err().to_string().contains("corridor chance 101"));
    }

    #[test]
    fn catalog_profiles_are_valid() {
        for id in ProfileId::ALL {
            let profile = id.profile();
            assert_eq!(DungeonProfile::new(profile.weights(), profile.corridor_chance()), Ok(profile));
        }
    }

    #[test]
    fn shallow_levels_boost_crosses_and_corridors() {
        let profile = level_profile(1, 26);
        assert_eq!(profile.weights(), [22, 11, 1, 8, 7, 1, 0, 0]);
        assert_eq!(profile.corridor_chance(), 90);

        let profile = level_profile(26, 26);
        assert_eq!(profile.weights(), [2, 1, 1, 1, 7, 11, 0, 0]);
        assert_eq!(profile.corridor_chance(), 10);
        assert_eq!(level_profile(60, 26), profile);
    }

    #[test]
    fn first_room_is_the_entrance_only_on_level_one() {
        let profile = first_room_profile(1, 26);
        assert_eq!(profile.total_weight(), 1);
        assert_eq!(profile.weight(RoomKind::Entrance), 1);

        let profile = first_room_profile(26, 26);
        assert_eq!(profile.weights(), [10, 0, 0, 3, 7, 10, 60, 0]);
        assert_eq!(profile.weight(RoomKind::Entrance), 0);
    }

    #[test]
    fn descent_percent_clamps() {
        assert_eq!(descent_percent(0, 26), 0);
        assert_eq!(descent_percent(1, 26), 0);
        assert_eq!(descent_percent(6, 26), 20);
        assert_eq!(descent_percent(99, 26), 100);
        assert_eq!(descent_percent(3, 1), 100);
    }
}
