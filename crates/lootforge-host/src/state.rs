//! Host-side tables and the runtime key registry.
//!
//! Every record accepted from a plugin is stored twice under the same
//! shared cell: once in its domain table and once in the [`RuntimeRegistry`]
//! under the opaque key handed back to the caller. Updating through the key
//! therefore mutates the record the domain table sees.

use std::collections::HashMap;

use lootforge_bridge::{shared, BridgeError, BridgeResult, RuntimeRegistry, Shared};
use tracing::{debug, warn};

use crate::abilities::AbilityDef;
use crate::adventure::{BountyTarget, SecretStashItem, StashKind, TreasureMapInfo};
use crate::crafting::{MaterialConversion, Recipe, SacrificeRule};
use crate::effects::MagicEffectDef;
use crate::equipment::{EquipmentView, EquippedItem};
use crate::legendary::LegendaryConfig;

/// All mutable host state behind the bridge operations.
#[derive(Default)]
pub struct HostState {
    effects: HashMap<String, Shared<MagicEffectDef>>,
    abilities: HashMap<String, Shared<AbilityDef>>,
    conversions: HashMap<String, Shared<MaterialConversion>>,
    legendary_configs: Vec<Shared<LegendaryConfig>>,
    recipe_batches: Vec<Shared<Vec<Recipe>>>,
    sacrifice_batches: Vec<Shared<Vec<SacrificeRule>>>,
    bounty_batches: Vec<Shared<Vec<BountyTarget>>>,
    stash_items: HashMap<StashKind, Vec<Shared<SecretStashItem>>>,
    treasure_maps: Vec<Shared<TreasureMapInfo>>,
    assets: HashMap<String, String>,
    equipment: HashMap<String, EquipmentView>,
    registry: RuntimeRegistry,
}

impl HostState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a JSON payload over the record registered under `key`.
    pub fn update<T: serde::de::DeserializeOwned + 'static>(
        &mut self,
        key: &str,
        payload: &str,
    ) -> BridgeResult<()> {
        self.registry.update::<T>(key, payload)
    }

    pub fn add_magic_effect(&mut self, def: MagicEffectDef) -> BridgeResult<String> {
        if self.effects.contains_key(&def.effect_type) {
            return Err(BridgeError::Duplicate {
                table: "magic_effects".to_string(),
                id: def.effect_type,
            });
        }
        let effect_type = def.effect_type.clone();
        let cell = shared(def);
        let key = self.registry.register("magic_effect", cell.clone());
        debug!(effect_type = %effect_type, key = %key, "magic effect added");
        self.effects.insert(effect_type, cell);
        Ok(key)
    }

    pub fn magic_effect(&self, effect_type: &str) -> Option<Shared<MagicEffectDef>> {
        self.effects.get(effect_type).cloned()
    }

    pub fn add_ability(&mut self, def: AbilityDef) -> BridgeResult<String> {
        if self.abilities.contains_key(&def.id) {
            return Err(BridgeError::Duplicate {
                table: "abilities".to_string(),
                id: def.id,
            });
        }
        let id = def.id.clone();
        let cell = shared(def);
        let key = self.registry.register("ability", cell.clone());
        debug!(ability_id = %id, key = %key, "ability added");
        self.abilities.insert(id, cell);
        Ok(key)
    }

    pub fn ability(&self, id: &str) -> Option<Shared<AbilityDef>> {
        self.abilities.get(id).cloned()
    }

    pub fn add_material_conversion(
        &mut self,
        conversion: MaterialConversion,
    ) -> BridgeResult<String> {
        if self.conversions.contains_key(&conversion.name) {
            return Err(BridgeError::Duplicate {
                table: "material_conversions".to_string(),
                id: conversion.name,
            });
        }
        let name = conversion.name.clone();
        let cell = shared(conversion);
        let key = self.registry.register("material_conversion", cell.clone());
        self.conversions.insert(name, cell);
        Ok(key)
    }

    /// Accept a legendary batch. Every item and set id in the batch must be
    /// new; a single clash rejects the whole batch.
    pub fn add_legendary_config(&mut self, config: LegendaryConfig) -> BridgeResult<String> {
        for item in config.legendary_items.iter().chain(&config.mythic_items) {
            if self.known_legendary_item(&item.id) {
                return Err(BridgeError::Duplicate {
                    table: "legendary_items".to_string(),
                    id: item.id.clone(),
                });
            }
        }
        for set in config.legendary_sets.iter().chain(&config.mythic_sets) {
            if self.known_legendary_set(&set.id) {
                return Err(BridgeError::Duplicate {
                    table: "legendary_sets".to_string(),
                    id: set.id.clone(),
                });
            }
        }
        let cell = shared(config);
        let key = self.registry.register("legendary_config", cell.clone());
        self.legendary_configs.push(cell);
        Ok(key)
    }

    pub fn known_legendary_item(&self, id: &str) -> bool {
        self.legendary_configs.iter().any(|cell| {
            let config = cell.borrow();
            config
                .legendary_items
                .iter()
                .chain(&config.mythic_items)
                .any(|item| item.id == id)
        })
    }

    pub fn known_legendary_set(&self, id: &str) -> bool {
        self.legendary_configs.iter().any(|cell| {
            let config = cell.borrow();
            config
                .legendary_sets
                .iter()
                .chain(&config.mythic_sets)
                .any(|set| set.id == id)
        })
    }

    pub fn add_recipes(&mut self, recipes: Vec<Recipe>) -> BridgeResult<String> {
        let cell = shared(recipes);
        let key = self.registry.register("recipes", cell.clone());
        self.recipe_batches.push(cell);
        Ok(key)
    }

    pub fn add_sacrifices(&mut self, rules: Vec<SacrificeRule>) -> BridgeResult<String> {
        let cell = shared(rules);
        let key = self.registry.register("sacrifices", cell.clone());
        self.sacrifice_batches.push(cell);
        Ok(key)
    }

    pub fn add_bounty_targets(&mut self, targets: Vec<BountyTarget>) -> BridgeResult<String> {
        let cell = shared(targets);
        let key = self.registry.register("bounty_targets", cell.clone());
        self.bounty_batches.push(cell);
        Ok(key)
    }

    pub fn add_secret_stash_item(
        &mut self,
        kind: StashKind,
        item: SecretStashItem,
    ) -> BridgeResult<String> {
        let cell = shared(item);
        let key = self.registry.register("secret_stash_item", cell.clone());
        self.stash_items.entry(kind).or_default().push(cell);
        Ok(key)
    }

    pub fn add_treasure_map(&mut self, info: TreasureMapInfo) -> BridgeResult<String> {
        let cell = shared(info);
        let key = self.registry.register("treasure_map", cell.clone());
        self.treasure_maps.push(cell);
        Ok(key)
    }

    /// Register a named asset path. Returns false (and warns) on a name
    /// already taken; the first registration wins.
    pub fn register_asset(&mut self, name: &str, path: &str) -> bool {
        if self.assets.contains_key(name) {
            warn!(asset = name, "asset name already registered, ignoring");
            return false;
        }
        self.assets.insert(name.to_string(), path.to_string());
        true
    }

    pub fn asset(&self, name: &str) -> Option<&str> {
        self.assets.get(name).map(String::as_str)
    }

    pub fn equip(&mut self, player: &str, item: EquippedItem) {
        self.equipment.entry(player.to_string()).or_default().equip(item);
    }

    /// Player view, or an empty one for unknown players so queries degrade
    /// to zero instead of failing.
    pub fn equipment_of(&self, player: &str) -> EquipmentView {
        self.equipment.get(player).cloned().unwrap_or_default()
    }

    /// Sum of set-bonus effects of one type active on `player`. A bonus is
    /// active when enough pieces of its set are worn; it contributes its
    /// base (minimum) value, since set bonuses are not rolled.
    pub fn total_set_effect_value(&self, player: &str, effect_type: &str, scale: f64) -> f64 {
        let mut total = 0.0;
        for (set_id, pieces) in self.equipment_of(player).worn_sets() {
            for cell in &self.legendary_configs {
                let config = cell.borrow();
                for set in config.legendary_sets.iter().chain(&config.mythic_sets) {
                    if set.id != set_id {
                        continue;
                    }
                    for bonus in &set.set_bonuses {
                        if bonus.count <= pieces && bonus.effect.effect_type == effect_type {
                            total += bonus
                                .effect
                                .values
                                .as_ref()
                                .map_or(0.0, |values| values.min_value);
                        }
                    }
                }
            }
        }
        total * scale
    }

    pub fn effect_count(&self) -> usize {
        self.effects.len()
    }

    pub fn ability_count(&self) -> usize {
        self.abilities.len()
    }

    pub fn conversion_count(&self) -> usize {
        self.conversions.len()
    }

    pub fn recipe_count(&self) -> usize {
        self.recipe_batches.iter().map(|b| b.borrow().len()).sum()
    }

    pub fn stash_items_of(&self, kind: StashKind) -> Vec<Shared<SecretStashItem>> {
        self.stash_items.get(&kind).cloned().unwrap_or_default()
    }

    pub fn treasure_map_for(&self, biome: crate::adventure::Biome) -> Option<Shared<TreasureMapInfo>> {
        self.treasure_maps
            .iter()
            .find(|cell| cell.borrow().biome == biome)
            .cloned()
    }
}
