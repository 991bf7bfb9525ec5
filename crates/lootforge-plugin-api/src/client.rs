//! The plugin-facing client.
//!
//! A [`LootClient`] wraps the resolved operation bundle, the handle cache
//! and one pending set per content family. The intended shape of a plugin
//! is: construct the client, add content during setup, call
//! [`LootClient::register_all`] once the host had a chance to install, and
//! mutate-then-update whenever content should change at runtime.
//!
//! Without a host everything stays pending and every query answers its
//! zero value; the plugin itself never has to branch on host presence.

use std::collections::HashMap;
use std::rc::Rc;

use lootforge_bridge::{
    AbilityHooks, Bridge, BridgeError, BridgeResult, HandleCache, OperationRef, Resolver, Shared,
    Value,
};
use tracing::{debug, warn};

use crate::defs::{
    AbilityDef, ActiveEffect, BountyTarget, LegendaryConfig, LegendaryInfo, LegendarySetInfo,
    MagicEffectDef, MaterialConversion, Recipe, SacrificeRule, SecretStashItem, StashKind,
    TreasureMapInfo,
};
use crate::ops::ApiOps;
use crate::pending::PendingSet;

/// Outcome of one `register_all` pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterReport {
    /// Items the host accepted on this pass.
    pub registered: usize,
    /// Items still awaiting a host.
    pub pending: usize,
}

/// Client-side face of the bridge for one plugin.
pub struct LootClient {
    bridge: Rc<Bridge>,
    ops: ApiOps,
    cache: HandleCache,

    effects: PendingSet<MagicEffectDef>,
    abilities: PendingSet<AbilityDef>,
    conversions: PendingSet<MaterialConversion>,
    stash: HashMap<StashKind, PendingSet<SecretStashItem>>,
    treasures: PendingSet<TreasureMapInfo>,

    // Individually added legendary content, bundled into one config batch
    // per register_all pass.
    legendary_items: Vec<LegendaryInfo>,
    legendary_sets: Vec<LegendarySetInfo>,
    mythic_items: Vec<LegendaryInfo>,
    mythic_sets: Vec<LegendarySetInfo>,
    legendary_pending: PendingSet<LegendaryConfig>,
    legendary_configs: Vec<Shared<LegendaryConfig>>,

    // Batch families: accumulated locally, submitted as one unit whose
    // shared handle is the identity updates go through.
    recipes: Vec<Recipe>,
    recipe_pending: PendingSet<Vec<Recipe>>,
    recipe_batches: Vec<Shared<Vec<Recipe>>>,
    sacrifices: Vec<SacrificeRule>,
    sacrifice_pending: PendingSet<Vec<SacrificeRule>>,
    sacrifice_batches: Vec<Shared<Vec<SacrificeRule>>>,
    bounties: Vec<BountyTarget>,
    bounty_pending: PendingSet<Vec<BountyTarget>>,
    bounty_batches: Vec<Shared<Vec<BountyTarget>>>,
}

impl LootClient {
    /// Resolve the host api against `bridge`. Safe to call whether or not a
    /// host is installed.
    pub fn new(bridge: Rc<Bridge>) -> Self {
        let resolver = Resolver::new(bridge.clone());
        let ops = ApiOps::resolve(&resolver);
        Self {
            bridge,
            ops,
            cache: HandleCache::new(),
            effects: PendingSet::new(),
            abilities: PendingSet::new(),
            conversions: PendingSet::new(),
            stash: HashMap::new(),
            treasures: PendingSet::new(),
            legendary_items: Vec::new(),
            legendary_sets: Vec::new(),
            mythic_items: Vec::new(),
            mythic_sets: Vec::new(),
            legendary_pending: PendingSet::new(),
            legendary_configs: Vec::new(),
            recipes: Vec::new(),
            recipe_pending: PendingSet::new(),
            recipe_batches: Vec::new(),
            sacrifices: Vec::new(),
            sacrifice_pending: PendingSet::new(),
            sacrifice_batches: Vec::new(),
            bounties: Vec::new(),
            bounty_pending: PendingSet::new(),
            bounty_batches: Vec::new(),
        }
    }

    /// Whether the host api resolved.
    pub fn host_present(&self) -> bool {
        self.ops.host_present()
    }

    // --- local adds ---

    pub fn add_magic_effect(&mut self, def: MagicEffectDef) -> Shared<MagicEffectDef> {
        self.effects.push(def)
    }

    pub fn add_ability(&mut self, def: AbilityDef) -> Shared<AbilityDef> {
        self.abilities.push(def)
    }

    /// Add an ability together with its behavior override table. The table
    /// lands on the bridge immediately; the definition follows the normal
    /// pending protocol.
    pub fn add_ability_with_hooks(
        &mut self,
        def: AbilityDef,
        hooks: AbilityHooks,
    ) -> Shared<AbilityDef> {
        self.bridge.install_hooks(&def.id, hooks);
        self.abilities.push(def)
    }

    pub fn add_material_conversion(
        &mut self,
        conversion: MaterialConversion,
    ) -> Shared<MaterialConversion> {
        self.conversions.push(conversion)
    }

    pub fn add_legendary_item(&mut self, info: LegendaryInfo) {
        self.legendary_items.push(info);
    }

    pub fn add_legendary_set(&mut self, set: LegendarySetInfo) {
        self.legendary_sets.push(set);
    }

    pub fn add_mythic_item(&mut self, info: LegendaryInfo) {
        self.mythic_items.push(info);
    }

    pub fn add_mythic_set(&mut self, set: LegendarySetInfo) {
        self.mythic_sets.push(set);
    }

    pub fn add_recipe(&mut self, recipe: Recipe) {
        self.recipes.push(recipe);
    }

    pub fn add_sacrifice(&mut self, rule: SacrificeRule) {
        self.sacrifices.push(rule);
    }

    pub fn add_bounty_target(&mut self, target: BountyTarget) {
        self.bounties.push(target);
    }

    pub fn add_secret_stash_item(
        &mut self,
        kind: StashKind,
        item: SecretStashItem,
    ) -> Shared<SecretStashItem> {
        self.stash.entry(kind).or_default().push(item)
    }

    pub fn add_treasure_map(&mut self, info: TreasureMapInfo) -> Shared<TreasureMapInfo> {
        self.treasures.push(info)
    }

    /// Legendary batches created so far, registered or not. Mutate one and
    /// pass it to [`LootClient::update_legendary_config`] to change content
    /// after registration.
    pub fn legendary_configs(&self) -> &[Shared<LegendaryConfig>] {
        &self.legendary_configs
    }

    /// Recipe batches created so far.
    pub fn recipe_batches(&self) -> &[Shared<Vec<Recipe>>] {
        &self.recipe_batches
    }

    /// Sacrifice batches created so far.
    pub fn sacrifice_batches(&self) -> &[Shared<Vec<SacrificeRule>>] {
        &self.sacrifice_batches
    }

    /// Bounty batches created so far.
    pub fn bounty_batches(&self) -> &[Shared<Vec<BountyTarget>>] {
        &self.bounty_batches
    }

    // --- registration ---

    /// Submit everything pending. Safe to call repeatedly: content already
    /// registered is skipped, content the host could not take stays pending
    /// for the next pass.
    pub fn register_all(&mut self) -> BridgeResult<RegisterReport> {
        self.bundle_batches();

        let mut registered = 0;
        registered += self
            .effects
            .register_all(&self.ops.add_magic_effect, &[], &mut self.cache)?;
        registered += self
            .abilities
            .register_all(&self.ops.add_ability, &[], &mut self.cache)?;
        registered += self
            .conversions
            .register_all(&self.ops.add_material_conversion, &[], &mut self.cache)?;
        registered += self.legendary_pending.register_all(
            &self.ops.add_legendary_config,
            &[],
            &mut self.cache,
        )?;
        registered +=
            self.recipe_pending
                .register_all(&self.ops.add_recipes, &[], &mut self.cache)?;
        registered += self.sacrifice_pending.register_all(
            &self.ops.add_sacrifices,
            &[],
            &mut self.cache,
        )?;
        registered += self.bounty_pending.register_all(
            &self.ops.add_bounty_targets,
            &[],
            &mut self.cache,
        )?;
        for (kind, set) in self.stash.iter_mut() {
            registered += set.register_all(
                &self.ops.add_secret_stash_item,
                &[Value::Str(kind.as_str().to_string())],
                &mut self.cache,
            )?;
        }
        registered +=
            self.treasures
                .register_all(&self.ops.add_treasure_map, &[], &mut self.cache)?;

        let report = RegisterReport {
            registered,
            pending: self.pending_count(),
        };
        debug!(
            registered = report.registered,
            pending = report.pending,
            "registration pass done"
        );
        Ok(report)
    }

    /// Content awaiting a host.
    pub fn pending_count(&self) -> usize {
        self.effects.len()
            + self.abilities.len()
            + self.conversions.len()
            + self.legendary_pending.len()
            + self.legendary_items.len()
            + self.legendary_sets.len()
            + self.mythic_items.len()
            + self.mythic_sets.len()
            + self.recipe_pending.len()
            + self.recipes.len()
            + self.sacrifice_pending.len()
            + self.sacrifices.len()
            + self.bounty_pending.len()
            + self.bounties.len()
            + self.stash.values().map(PendingSet::len).sum::<usize>()
            + self.treasures.len()
    }

    /// Fold individually added content into its batch unit.
    fn bundle_batches(&mut self) {
        if !self.legendary_items.is_empty()
            || !self.legendary_sets.is_empty()
            || !self.mythic_items.is_empty()
            || !self.mythic_sets.is_empty()
        {
            let config = LegendaryConfig {
                legendary_items: std::mem::take(&mut self.legendary_items),
                legendary_sets: std::mem::take(&mut self.legendary_sets),
                mythic_items: std::mem::take(&mut self.mythic_items),
                mythic_sets: std::mem::take(&mut self.mythic_sets),
            };
            let handle = self.legendary_pending.push(config);
            self.legendary_configs.push(handle);
        }
        if !self.recipes.is_empty() {
            let handle = self.recipe_pending.push(std::mem::take(&mut self.recipes));
            self.recipe_batches.push(handle);
        }
        if !self.sacrifices.is_empty() {
            let handle = self
                .sacrifice_pending
                .push(std::mem::take(&mut self.sacrifices));
            self.sacrifice_batches.push(handle);
        }
        if !self.bounties.is_empty() {
            let handle = self.bounty_pending.push(std::mem::take(&mut self.bounties));
            self.bounty_batches.push(handle);
        }
    }

    /// Register a named asset path. First registration of a name wins.
    pub fn register_asset(&self, name: &str, path: &str) -> BridgeResult<bool> {
        match self.ops.register_asset.invoke(&[
            Value::Str(name.to_string()),
            Value::Str(path.to_string()),
        ]) {
            Ok(Value::Bool(accepted)) => Ok(accepted),
            Ok(other) => Err(unexpected_shape(&self.ops.register_asset, &other)),
            Err(err) if err.is_soft() => Ok(false),
            Err(err) => Err(err),
        }
    }

    // --- updates ---

    pub fn update_magic_effect(&self, object: &Shared<MagicEffectDef>) -> BridgeResult<bool> {
        self.update_via(&self.ops.update_magic_effect, object)
    }

    pub fn update_ability(&self, object: &Shared<AbilityDef>) -> BridgeResult<bool> {
        self.update_via(&self.ops.update_ability, object)
    }

    pub fn update_material_conversion(
        &self,
        object: &Shared<MaterialConversion>,
    ) -> BridgeResult<bool> {
        self.update_via(&self.ops.update_material_conversion, object)
    }

    pub fn update_legendary_config(&self, object: &Shared<LegendaryConfig>) -> BridgeResult<bool> {
        self.update_via(&self.ops.update_legendary_config, object)
    }

    pub fn update_recipes(&self, object: &Shared<Vec<Recipe>>) -> BridgeResult<bool> {
        self.update_via(&self.ops.update_recipes, object)
    }

    pub fn update_sacrifices(&self, object: &Shared<Vec<SacrificeRule>>) -> BridgeResult<bool> {
        self.update_via(&self.ops.update_sacrifices, object)
    }

    pub fn update_bounty_targets(&self, object: &Shared<Vec<BountyTarget>>) -> BridgeResult<bool> {
        self.update_via(&self.ops.update_bounty_targets, object)
    }

    pub fn update_secret_stash_item(&self, object: &Shared<SecretStashItem>) -> BridgeResult<bool> {
        self.update_via(&self.ops.update_secret_stash_item, object)
    }

    pub fn update_treasure_map(&self, object: &Shared<TreasureMapInfo>) -> BridgeResult<bool> {
        self.update_via(&self.ops.update_treasure_map, object)
    }

    /// Push the current content of a registered object to the host.
    ///
    /// Returns `Ok(false)` without calling out when this exact instance was
    /// never registered (a value-equal copy does not count), when the host
    /// is absent, or when the host no longer knows the key. A malformed
    /// payload or signature defect propagates.
    fn update_via<T: serde::Serialize>(
        &self,
        op: &OperationRef,
        object: &Shared<T>,
    ) -> BridgeResult<bool> {
        let key = match self.cache.lookup(object) {
            Some(key) => key.to_string(),
            None => {
                debug!(
                    operation = op.operation(),
                    "instance was never registered, update skipped"
                );
                return Ok(false);
            }
        };
        let payload = serde_json::to_string(&*object.borrow())?;
        match op.invoke(&[Value::Str(key), Value::Str(payload)]) {
            Ok(Value::Bool(applied)) => Ok(applied),
            Ok(other) => Err(unexpected_shape(op, &other)),
            Err(err) if err.is_soft() => Ok(false),
            Err(err) => Err(err),
        }
    }

    // --- queries ---

    /// Fetch an effect definition from the host tables.
    pub fn get_magic_effect(&self, effect_type: &str) -> BridgeResult<Option<MagicEffectDef>> {
        match self
            .ops
            .get_magic_effect
            .invoke(&[Value::Str(effect_type.to_string())])
        {
            Ok(Value::Str(payload)) => Ok(Some(serde_json::from_str(&payload)?)),
            Ok(Value::Null) => Ok(None),
            Ok(other) => Err(unexpected_shape(&self.ops.get_magic_effect, &other)),
            Err(err) if err.is_soft() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Whether `player` wears the given legendary item. Absent host or
    /// player answers false.
    pub fn has_legendary_item(&self, player: &str, legendary_id: &str) -> bool {
        let result = self.ops.has_legendary_item.invoke(&[
            Value::Str(player.to_string()),
            Value::Str(legendary_id.to_string()),
        ]);
        match result {
            Ok(Value::Bool(worn)) => worn,
            other => query_fallback(&self.ops.has_legendary_item, other, false),
        }
    }

    /// Whether `player` wears any piece of the given set, and how many.
    pub fn has_legendary_set(&self, player: &str, set_id: &str) -> (bool, i64) {
        let result = self.ops.has_legendary_set.invoke(&[
            Value::Str(player.to_string()),
            Value::Str(set_id.to_string()),
        ]);
        if let Ok(Value::List(items)) = &result {
            if let [Value::Bool(worn), Value::Int(count)] = items.as_slice() {
                return (*worn, *count);
            }
        }
        query_fallback(&self.ops.has_legendary_set, result, (false, 0))
    }

    /// Scaled sum of one effect type across everything `player` wears.
    pub fn total_effect_value(&self, player: &str, effect_type: &str, scale: f64) -> f64 {
        let result = self.ops.total_effect_value.invoke(&[
            Value::Str(player.to_string()),
            Value::Str(effect_type.to_string()),
            Value::Float(scale),
        ]);
        match result {
            Ok(Value::Float(total)) => total,
            other => query_fallback(&self.ops.total_effect_value, other, 0.0),
        }
    }

    /// Scaled sum of one effect type on a single worn item.
    pub fn total_effect_value_for_item(
        &self,
        player: &str,
        item_id: &str,
        effect_type: &str,
        scale: f64,
    ) -> f64 {
        let result = self.ops.total_effect_value_for_item.invoke(&[
            Value::Str(player.to_string()),
            Value::Str(item_id.to_string()),
            Value::Str(effect_type.to_string()),
            Value::Float(scale),
        ]);
        match result {
            Ok(Value::Float(total)) => total,
            other => query_fallback(&self.ops.total_effect_value_for_item, other, 0.0),
        }
    }

    /// Scaled sum of active set bonuses of one effect type on `player`.
    pub fn total_set_effect_value(&self, player: &str, effect_type: &str, scale: f64) -> f64 {
        let result = self.ops.total_set_effect_value.invoke(&[
            Value::Str(player.to_string()),
            Value::Str(effect_type.to_string()),
            Value::Float(scale),
        ]);
        match result {
            Ok(Value::Float(total)) => total,
            other => query_fallback(&self.ops.total_set_effect_value, other, 0.0),
        }
    }

    /// Whether the effect is active on `player` at all, and its total value.
    pub fn has_active_effect(&self, player: &str, effect_type: &str) -> (bool, f64) {
        let result = self.ops.has_active_effect.invoke(&[
            Value::Str(player.to_string()),
            Value::Str(effect_type.to_string()),
        ]);
        if let Ok(Value::List(items)) = &result {
            if let [Value::Bool(present), Value::Float(total)] = items.as_slice() {
                return (*present, *total);
            }
        }
        query_fallback(&self.ops.has_active_effect, result, (false, 0.0))
    }

    /// All effects active on `player`, optionally restricted to one type.
    /// Entries the client cannot decode are skipped with a warning.
    pub fn all_active_effects(&self, player: &str, filter: Option<&str>) -> Vec<ActiveEffect> {
        let filter_arg = match filter {
            Some(effect_type) => Value::Str(effect_type.to_string()),
            None => Value::Null,
        };
        let result = self
            .ops
            .all_active_effects
            .invoke(&[Value::Str(player.to_string()), filter_arg]);
        let items = match result {
            Ok(Value::List(items)) => items,
            other => return query_fallback(&self.ops.all_active_effects, other, Vec::new()),
        };
        let mut effects = Vec::with_capacity(items.len());
        for item in items {
            match item.as_str().map(serde_json::from_str::<ActiveEffect>) {
                Some(Ok(effect)) => effects.push(effect),
                Some(Err(err)) => {
                    warn!(error = %err, "skipping undecodable active effect entry");
                }
                None => {
                    warn!(kind = item.kind(), "skipping non-string active effect entry");
                }
            }
        }
        effects
    }
}

fn unexpected_shape(op: &OperationRef, got: &Value) -> BridgeError {
    BridgeError::SignatureMismatch {
        operation: op.operation().to_string(),
        detail: format!("unexpected result shape: {}", got.kind()),
    }
}

/// Collapse a query outcome into its zero value, logging anything that is
/// not the plain host-absent case.
fn query_fallback<T>(op: &OperationRef, outcome: BridgeResult<Value>, zero: T) -> T {
    match outcome {
        Ok(got) => warn!(
            operation = op.operation(),
            kind = got.kind(),
            "unexpected query result shape"
        ),
        Err(err) if err.is_soft() => {}
        Err(err) => warn!(operation = op.operation(), error = %err, "query failed"),
    }
    zero
}

#[cfg(test)]
mod tests {
    use super::*;
    use lootforge_bridge::shared;

    #[test]
    fn test_client_without_host_is_fully_inert() {
        let mut client = LootClient::new(Bridge::new());
        assert!(!client.host_present());

        client.add_magic_effect(MagicEffectDef::new("modify_frost"));
        client.add_recipe(Recipe::default());
        let report = client.register_all().unwrap();
        assert_eq!(report.registered, 0);
        assert_eq!(report.pending, 2);

        assert!(!client.register_asset("icon", "a.png").unwrap());
        assert_eq!(client.get_magic_effect("modify_frost").unwrap(), None);
        assert!(!client.has_legendary_item("player", "frost_reaver"));
        assert_eq!(client.total_effect_value("player", "modify_frost", 1.0), 0.0);
        assert!(client.all_active_effects("player", None).is_empty());
    }

    #[test]
    fn test_update_of_unregistered_instance_is_false() {
        let client = LootClient::new(Bridge::new());
        let stray = shared(MagicEffectDef::new("modify_frost"));
        assert!(!client.update_magic_effect(&stray).unwrap());
    }

    #[test]
    fn test_bundling_folds_individual_adds_into_batches() {
        let mut client = LootClient::new(Bridge::new());
        client.add_legendary_item(LegendaryInfo {
            id: "frost_reaver".to_string(),
            ..LegendaryInfo::default()
        });
        client.add_mythic_set(LegendarySetInfo {
            id: "old_gods".to_string(),
            ..LegendarySetInfo::default()
        });
        client.add_recipe(Recipe::default());
        client.add_recipe(Recipe::default());

        // No host: everything bundles and stays pending.
        client.register_all().unwrap();
        assert_eq!(client.legendary_configs().len(), 1);
        let config = client.legendary_configs()[0].borrow();
        assert_eq!(config.legendary_items.len(), 1);
        assert_eq!(config.mythic_sets.len(), 1);
        drop(config);
        assert_eq!(client.recipe_batches().len(), 1);
        assert_eq!(client.recipe_batches()[0].borrow().len(), 2);

        // A second pass does not create empty batches.
        client.register_all().unwrap();
        assert_eq!(client.legendary_configs().len(), 1);
        assert_eq!(client.recipe_batches().len(), 1);
    }
}
