//! Host configuration: TOML-seeded base content.
//!
//! The host can preload effect, ability and crafting tables from a config
//! file before any plugin registers. Seeded records go through the same
//! duplicate-checked insert paths as bridge registrations, so a plugin
//! clashing with seeded content is rejected like any other duplicate.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::abilities::AbilityDef;
use crate::adventure::{BountyTarget, TreasureMapInfo};
use crate::crafting::{MaterialConversion, Recipe, SacrificeRule};
use crate::effects::MagicEffectDef;
use crate::state::HostState;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}

/// Base content loaded at host startup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub magic_effects: Vec<MagicEffectDef>,
    pub abilities: Vec<AbilityDef>,
    pub material_conversions: Vec<MaterialConversion>,
    pub recipes: Vec<Recipe>,
    pub sacrifices: Vec<SacrificeRule>,
    pub bounty_targets: Vec<BountyTarget>,
    pub treasure_maps: Vec<TreasureMapInfo>,
}

impl HostConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, HostError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config = Self::parse(&raw)?;
        info!(path = %path.as_ref().display(), "host config loaded");
        Ok(config)
    }

    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Seed the tables. Duplicates within the config are skipped with a
    /// warning rather than aborting startup.
    pub fn seed(self, state: &mut HostState) {
        for def in self.magic_effects {
            let effect_type = def.effect_type.clone();
            if state.add_magic_effect(def).is_err() {
                warn!(effect_type = %effect_type, "seeded effect duplicates an existing one, skipped");
            }
        }
        for def in self.abilities {
            let id = def.id.clone();
            if state.add_ability(def).is_err() {
                warn!(ability_id = %id, "seeded ability duplicates an existing one, skipped");
            }
        }
        for conversion in self.material_conversions {
            let name = conversion.name.clone();
            if state.add_material_conversion(conversion).is_err() {
                warn!(conversion = %name, "seeded conversion duplicates an existing one, skipped");
            }
        }
        if !self.recipes.is_empty() {
            let _ = state.add_recipes(self.recipes);
        }
        if !self.sacrifices.is_empty() {
            let _ = state.add_sacrifices(self.sacrifices);
        }
        if !self.bounty_targets.is_empty() {
            let _ = state.add_bounty_targets(self.bounty_targets);
        }
        for map in self.treasure_maps {
            let _ = state.add_treasure_map(map);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
[[magic_effects]]
effect_type = "modify_armor"
display_text = "Armor +"
selection_weight = 1.0

[[abilities]]
id = "battle_cry"
activation_mode = "activated"
cooldown = 60.0

[[recipes]]
name = "rune_blade"
item = "sword_rune"
crafting_station = "forge"

[[recipes.resources]]
item = "rune_shard"
amount = 3
"#;

    #[test]
    fn test_parse_and_seed() {
        let config = HostConfig::parse(SAMPLE).unwrap();
        let mut state = HostState::new();
        config.seed(&mut state);

        assert_eq!(state.effect_count(), 1);
        assert_eq!(state.ability_count(), 1);
        assert_eq!(state.recipe_count(), 1);
        assert_eq!(state.ability("battle_cry").unwrap().borrow().cooldown, 60.0);
    }

    #[test]
    fn test_missing_sections_default_empty() {
        let config = HostConfig::parse("").unwrap();
        assert!(config.magic_effects.is_empty());
        assert!(config.treasure_maps.is_empty());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let config = HostConfig::from_file(file.path()).unwrap();
        assert_eq!(config.magic_effects[0].effect_type, "modify_armor");
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        assert!(HostConfig::parse("magic_effects = 3").is_err());
    }
}
