//! Crafting records: recipes, material conversions, sacrifice rules.

use crate::effects::ItemRarity;
use serde::{Deserialize, Serialize};

/// One ingredient of a recipe.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeRequirement {
    pub item: String,
    pub amount: i64,
}

impl RecipeRequirement {
    pub fn new(item: impl Into<String>, amount: i64) -> Self {
        Self {
            item: item.into(),
            amount,
        }
    }
}

/// A crafting recipe contributed by a plugin.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Recipe {
    pub name: String,
    pub item: String,
    pub amount: i64,
    pub crafting_station: String,
    pub min_station_level: i64,
    pub enabled: bool,
    pub repair_station: String,
    pub resources: Vec<RecipeRequirement>,
}

/// What a material conversion does with its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionKind {
    #[default]
    Upgrade,
    Convert,
    Junk,
}

/// One input of a material conversion.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionRequirement {
    pub item: String,
    pub amount: i64,
}

/// A material conversion rule (e.g. shards into essence).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConversion {
    /// Unique conversion name, the table key.
    pub name: String,
    pub product: String,
    pub amount: i64,
    pub kind: ConversionKind,
    pub resources: Vec<ConversionRequirement>,
}

/// Item-and-count pair used by sacrifice products.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemAmount {
    pub item: String,
    pub amount: i64,
}

/// What disenchanting (sacrificing) a matching item yields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SacrificeRule {
    /// Only magic items match when set.
    pub is_magic: bool,
    pub rarity: Option<ItemRarity>,
    /// Empty means any item type matches.
    pub item_types: Vec<String>,
    /// Empty means any item name matches.
    pub item_names: Vec<String>,
    pub products: Vec<ItemAmount>,
}
