//! Legendary and mythic item definitions.

use crate::effects::{EffectRequirements, FxAttachMode, ValueDef};
use serde::{Deserialize, Serialize};

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

/// Texture swap applied to an item rendered as this legendary.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureReplacement {
    pub item_id: String,
    pub main_texture: String,
    pub chest_texture: String,
    pub legs_texture: String,
}

/// One legendary (or mythic) item.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendaryInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub requirements: EffectRequirements,
    pub guaranteed_effects: Vec<GuaranteedEffect>,
    pub guaranteed_effect_count: i64,
    pub selection_weight: f64,
    pub equip_fx: String,
    pub equip_fx_mode: FxAttachMode,
    pub texture_replacements: Vec<TextureReplacement>,
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

/// The batch a plugin submits in one registration: items and sets for both
/// the legendary and mythic tiers. Registered and updated as a unit.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_has_no_values() {
        assert!(!LegendaryConfig::default().has_values());

        let config = LegendaryConfig {
            legendary_sets: vec![LegendarySetInfo {
                id: "wolf_pack".to_string(),
                ..LegendarySetInfo::default()
            }],
            ..LegendaryConfig::default()
        };
        assert!(config.has_values());
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = LegendaryConfig {
            legendary_items: vec![LegendaryInfo {
                id: "frost_reaver".to_string(),
                name: "Frost Reaver".to_string(),
                guaranteed_effects: vec![GuaranteedEffect::new("modify_frost", 5.0, 10.0, 1.0)],
                ..LegendaryInfo::default()
            }],
            ..LegendaryConfig::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        let decoded: LegendaryConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, config);
    }
}
