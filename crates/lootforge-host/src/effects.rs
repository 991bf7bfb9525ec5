//! Magic item effect definitions.
//!
//! These are the plain data records plugins submit through the bridge. All
//! fields carry serde defaults so that slim external payloads decode; the
//! host never requires a plugin to know the full shape.

use serde::{Deserialize, Serialize};

/// Item rarity tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemRarity {
    Magic,
    Rare,
    Epic,
    Legendary,
    Mythic,
}

/// Where an equip visual effect attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FxAttachMode {
    None,
    #[default]
    Player,
    ItemRoot,
    EquipRoot,
}

/// Rolled value range for one rarity tier.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueDef {
    pub min_value: f64,
    pub max_value: f64,
    pub increment: f64,
}

impl ValueDef {
    pub fn new(min: f64, max: f64, increment: f64) -> Self {
        Self {
            min_value: min,
            max_value: max,
            increment,
        }
    }
}

/// Value ranges per rarity tier; absent tiers cannot roll the effect.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuesPerRarity {
    pub magic: Option<ValueDef>,
    pub rare: Option<ValueDef>,
    pub epic: Option<ValueDef>,
    pub legendary: Option<ValueDef>,
    pub mythic: Option<ValueDef>,
}

/// Conditions restricting where an effect may roll.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectRequirements {
    pub no_roll: bool,
    pub exclusive_self: bool,
    pub exclusive_effect_types: Vec<String>,
    pub must_have_effect_types: Vec<String>,
    pub allowed_item_types: Vec<String>,
    pub excluded_item_types: Vec<String>,
    pub allowed_rarities: Vec<ItemRarity>,
    pub excluded_rarities: Vec<ItemRarity>,
    pub allowed_item_names: Vec<String>,
    pub excluded_item_names: Vec<String>,
    pub item_has_physical_damage: bool,
    pub item_has_elemental_damage: bool,
    pub item_uses_durability: bool,
    pub item_has_block_power: bool,
    pub item_has_parry_power: bool,
    pub item_has_armor: bool,
    pub item_has_backstab_bonus: bool,
    pub custom_flags: Vec<String>,
}

/// A magic item effect definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MagicEffectDef {
    /// Unique effect type identifier, the table key.
    pub effect_type: String,
    pub display_text: String,
    pub description: String,
    pub requirements: EffectRequirements,
    pub values_per_rarity: ValuesPerRarity,
    pub selection_weight: f64,
    pub can_be_augmented: bool,
    pub can_be_disenchanted: bool,
    pub prefixes: Vec<String>,
    pub suffixes: Vec<String>,
    pub equip_fx: String,
    pub equip_fx_mode: FxAttachMode,
    /// Ability granted while an item with this effect is equipped.
    pub ability: String,
}

impl MagicEffectDef {
    pub fn new(effect_type: impl Into<String>) -> Self {
        Self {
            effect_type: effect_type.into(),
            selection_weight: 1.0,
            can_be_augmented: true,
            can_be_disenchanted: true,
            ..Self::default()
        }
    }
}
