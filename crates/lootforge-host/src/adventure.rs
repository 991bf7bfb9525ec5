//! Adventure records: bounties, secret stash entries, treasure maps.

use serde::{Deserialize, Serialize};

/// World biome a bounty or treasure map targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    #[default]
    Meadows,
    BlackForest,
    Swamp,
    Mountain,
    Plains,
    Mistlands,
    AshLands,
    DeepNorth,
    Ocean,
}

/// An extra spawn accompanying a bounty target.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BountyMinion {
    pub id: String,
    pub count: i64,
}

/// A creature players can take a bounty on.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BountyTarget {
    pub biome: Biome,
    pub target_id: String,
    pub reward_gold: i64,
    pub reward_iron: i64,
    pub reward_coins: i64,
    pub adds: Vec<BountyMinion>,
}

/// Which secret stash table an item is sold from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StashKind {
    Materials,
    RandomItems,
    OtherItems,
    Gamble,
    Sale,
}

impl StashKind {
    /// Parse the bridge argument form. Unknown kinds are a decode-level
    /// concern, reported as `None` to the operation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "materials" => Some(StashKind::Materials),
            "random_items" => Some(StashKind::RandomItems),
            "other_items" => Some(StashKind::OtherItems),
            "gamble" => Some(StashKind::Gamble),
            "sale" => Some(StashKind::Sale),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StashKind::Materials => "materials",
            StashKind::RandomItems => "random_items",
            StashKind::OtherItems => "other_items",
            StashKind::Gamble => "gamble",
            StashKind::Sale => "sale",
        }
    }
}

/// An entry in the secret stash vendor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretStashItem {
    pub item: String,
    pub coins_cost: i64,
    pub forest_token_cost: i64,
    pub iron_bounty_token_cost: i64,
    pub gold_bounty_token_cost: i64,
}

/// Treasure map parameters for one biome.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TreasureMapInfo {
    pub biome: Biome,
    pub cost: i64,
    pub forest_tokens: i64,
    pub gold_tokens: i64,
    pub iron_tokens: i64,
    pub coins: i64,
    pub min_radius: f64,
    pub max_radius: f64,
}
