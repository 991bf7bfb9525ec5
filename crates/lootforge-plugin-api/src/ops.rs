//! The resolved operation bundle for the host api module.
//!
//! All references are resolved once, up front. A host that is absent or
//! older than the plugin leaves some (or all) of them unresolved, which is
//! fine: calls through unresolved references are no-ops and the client
//! degrades feature by feature.

use lootforge_bridge::{OperationRef, Resolver};

/// Module name the host installs its operations under. Duplicated from the
/// host on purpose; the plugin shares no crate with it.
pub const API_MODULE: &str = "lootforge.api";

/// Every host operation the client can reach, resolved by name.
#[derive(Debug)]
pub struct ApiOps {
    pub add_magic_effect: OperationRef,
    pub update_magic_effect: OperationRef,
    pub add_ability: OperationRef,
    pub update_ability: OperationRef,
    pub add_legendary_config: OperationRef,
    pub update_legendary_config: OperationRef,
    pub add_material_conversion: OperationRef,
    pub update_material_conversion: OperationRef,
    pub add_recipes: OperationRef,
    pub update_recipes: OperationRef,
    pub add_sacrifices: OperationRef,
    pub update_sacrifices: OperationRef,
    pub add_bounty_targets: OperationRef,
    pub update_bounty_targets: OperationRef,
    pub add_secret_stash_item: OperationRef,
    pub update_secret_stash_item: OperationRef,
    pub add_treasure_map: OperationRef,
    pub update_treasure_map: OperationRef,
    pub register_asset: OperationRef,
    pub get_magic_effect: OperationRef,
    pub has_legendary_item: OperationRef,
    pub has_legendary_set: OperationRef,
    pub total_effect_value: OperationRef,
    pub total_effect_value_for_item: OperationRef,
    pub total_set_effect_value: OperationRef,
    pub has_active_effect: OperationRef,
    pub all_active_effects: OperationRef,
}

impl ApiOps {
    pub fn resolve(resolver: &Resolver) -> Self {
        let op = |name: &str| resolver.resolve(API_MODULE, name);
        Self {
            add_magic_effect: op("add_magic_effect"),
            update_magic_effect: op("update_magic_effect"),
            add_ability: op("add_ability"),
            update_ability: op("update_ability"),
            add_legendary_config: op("add_legendary_config"),
            update_legendary_config: op("update_legendary_config"),
            add_material_conversion: op("add_material_conversion"),
            update_material_conversion: op("update_material_conversion"),
            add_recipes: op("add_recipes"),
            update_recipes: op("update_recipes"),
            add_sacrifices: op("add_sacrifices"),
            update_sacrifices: op("update_sacrifices"),
            add_bounty_targets: op("add_bounty_targets"),
            update_bounty_targets: op("update_bounty_targets"),
            add_secret_stash_item: op("add_secret_stash_item"),
            update_secret_stash_item: op("update_secret_stash_item"),
            add_treasure_map: op("add_treasure_map"),
            update_treasure_map: op("update_treasure_map"),
            register_asset: op("register_asset"),
            get_magic_effect: op("get_magic_effect"),
            has_legendary_item: op("has_legendary_item"),
            has_legendary_set: op("has_legendary_set"),
            total_effect_value: op("total_effect_value"),
            total_effect_value_for_item: op("total_effect_value_for_item"),
            total_set_effect_value: op("total_set_effect_value"),
            has_active_effect: op("has_active_effect"),
            all_active_effects: op("all_active_effects"),
        }
    }

    /// Whether the host api is reachable at all.
    pub fn host_present(&self) -> bool {
        self.add_magic_effect.is_resolved()
    }
}
