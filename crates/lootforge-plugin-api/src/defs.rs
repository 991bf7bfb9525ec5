//! Client-side record definitions.
//!
//! These deliberately duplicate the host's wire shapes instead of importing
//! them: a plugin never links against the host, only against the bridge, and
//! stays loadable against hosts it was not compiled with. The records are
//! slimmer than the host's; anything omitted decodes to its default on the
//! host side.

use serde::{Deserialize, Serialize};

/// Item rarity tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemRarity {
    Magic,
    Rare,
    Epic,
    Legendary,
    Mythic,
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

/// A magic item effect definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MagicEffectDef {
    pub effect_type: String,
    pub display_text: String,
    pub description: String,
    pub values_per_rarity: ValuesPerRarity,
    pub selection_weight: f64,
    pub prefixes: Vec<String>,
    pub suffixes: Vec<String>,
    /// Ability granted while an item with this effect is equipped.
    pub ability: String,
}

impl MagicEffectDef {
    pub fn new(effect_type: impl Into<String>) -> Self {
        Self {
            effect_type: effect_type.into(),
            selection_weight: 1.0,
            ..Self::default()
        }
    }
}

/// How an ability fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationMode {
    #[default]
    Passive,
    Triggerable,
    Activated,
}

/// What activating an ability does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityAction {
    #[default]
    Custom,
    StatusEffect,
}

/// An ability definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityDef {
    pub id: String,
    pub icon_asset: String,
    pub activation_mode: ActivationMode,
    pub cooldown: f64,
    pub action: AbilityAction,
    pub action_params: Vec<String>,
}

impl AbilityDef {
    pub fn new(id: impl Into<String>, cooldown: f64) -> Self {
        Self {
            id: id.into(),
            activation_mode: ActivationMode::Activated,
            cooldown,
            ..Self::default()
        }
    }
}

/// An effect a legendary item always carries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GuaranteedEffect {
    pub effect_type: String,
    pub values: Option<ValueDef>,
}

impl GuaranteedEffect {
    pub fn new(effect_type: impl Into<String>, min: f64, max: f64, increment: f64) -> Self {
        Self {
            effect_type: effect_type.into(),
            values: Some(ValueDef::new(min, max, increment)),
        }
    }
}

/// One legendary (or mythic) item.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendaryInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub guaranteed_effects: Vec<GuaranteedEffect>,
    pub guaranteed_effect_count: i64,
    pub selection_weight: f64,
    pub is_set_item: bool,
    pub enchantable: bool,
}

/// A bonus granted when enough pieces of a set are worn.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SetBonus {
    pub count: i64,
    pub effect: GuaranteedEffect,
}

/// A named set of legendary items.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendarySetInfo {
    pub id: String,
    pub name: String,
    pub legendary_ids: Vec<String>,
    pub set_bonuses: Vec<SetBonus>,
}

/// The batch of legendary content a plugin submits in one registration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendaryConfig {
    pub legendary_items: Vec<LegendaryInfo>,
    pub legendary_sets: Vec<LegendarySetInfo>,
    pub mythic_items: Vec<LegendaryInfo>,
    pub mythic_sets: Vec<LegendarySetInfo>,
}

impl LegendaryConfig {
    pub fn has_values(&self) -> bool {
        !self.legendary_items.is_empty()
            || !self.legendary_sets.is_empty()
            || !self.mythic_items.is_empty()
            || !self.mythic_sets.is_empty()
    }
}

/// Item-and-count pair used for recipe resources, conversion inputs and
/// sacrifice products alike.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemAmount {
    pub item: String,
    pub amount: i64,
}

impl ItemAmount {
    pub fn new(item: impl Into<String>, amount: i64) -> Self {
        Self {
            item: item.into(),
            amount,
        }
    }
}

/// A crafting recipe.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Recipe {
    pub name: String,
    pub item: String,
    pub amount: i64,
    pub crafting_station: String,
    pub min_station_level: i64,
    pub enabled: bool,
    pub resources: Vec<ItemAmount>,
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

/// A material conversion rule.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConversion {
    pub name: String,
    pub product: String,
    pub amount: i64,
    pub kind: ConversionKind,
    pub resources: Vec<ItemAmount>,
}

/// What disenchanting a matching item yields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SacrificeRule {
    pub is_magic: bool,
    pub rarity: Option<ItemRarity>,
    pub item_types: Vec<String>,
    pub item_names: Vec<String>,
    pub products: Vec<ItemAmount>,
}

/// World biome a bounty or treasure map targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
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
    /// The argument form the host operation expects.
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

/// One rolled effect on an equipped item, as returned by queries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActiveEffect {
    pub effect_type: String,
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slim_effect_serializes_wire_fields() {
        let mut def = MagicEffectDef::new("modify_frost");
        def.values_per_rarity.epic = Some(ValueDef::new(5.0, 10.0, 1.0));
        let json = serde_json::to_value(&def).unwrap();
        assert_eq!(json["effect_type"], "modify_frost");
        assert_eq!(json["values_per_rarity"]["epic"]["min_value"], 5.0);
    }

    #[test]
    fn test_biome_wire_form() {
        let json = serde_json::to_string(&Biome::BlackForest).unwrap();
        assert_eq!(json, r#""black_forest""#);
    }

    #[test]
    fn test_active_effect_decodes_from_host_shape() {
        let effect: ActiveEffect =
            serde_json::from_str(r#"{"effect_type":"modify_armor","value":4.0}"#).unwrap();
        assert_eq!(effect.value, 4.0);
    }
}
