//! User tiers by accumulated points.

use serde::Serialize;

/// A rank badge unlocked at a point threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tier {
    /// Korean tier name.
    pub name: &'static str,
    /// Points needed to reach the tier.
    pub min_points: u64,
    /// Badge image path.
    pub image: &'static str,
}

/// Tiers from highest to lowest threshold.
pub static TIERS: [Tier; 7] = [
    Tier {
        name: "넥서스",
        min_points: 5000,
        image: "/tier-nexus.png",
    },
    Tier {
        name: "조율사",
        min_points: 3000,
        image: "/tier-coordinator.png",
    },
    Tier {
        name: "공감 실천가",
        min_points: 2000,
        image: "/tier-empathy-practitioner.png",
    },
    Tier {
        name: "그린 플래그",
        min_points: 1000,
        image: "/tier-green-flag.png",
    },
    Tier {
        name: "짝사랑 빌더",
        min_points: 500,
        image: "/tier-crush-builder.png",
    },
    Tier {
        name: "솔로 지망생",
        min_points: 200,
        image: "/tier-solo-aspirant.png",
    },
    Tier {
        name: "모태솔로",
        min_points: 0,
        image: "/tier-motaesolo.png",
    },
];

/// Tier of a user with no points.
#[must_use]
pub fn lowest_tier() -> &'static Tier {
    &TIERS[TIERS.len() - 1]
}

/// Highest tier whose threshold `points` reaches.
#[must_use]
pub fn tier_for(points: u64) -> &'static Tier {
    TIERS
        .iter()
        .find(|t| points >= t.min_points)
        .unwrap_or_else(lowest_tier)
}
