//! The host's operation surface on the bridge.
//!
//! Everything a plugin can do crosses through the operations installed here
//! under [`API_MODULE`]. Conventions:
//!
//! - `add_*` operations take a JSON payload and return `Str(key)`, the
//!   opaque registry key for later updates. A duplicate identifier is a
//!   named error, not a silent overwrite.
//! - `update_*` operations take `[key, payload]` and return `Bool(true)` on
//!   success or `Bool(false)` when the key is unknown (e.g. a stale key from
//!   a previous host run). A malformed payload is an error the caller can
//!   retry after fixing.
//! - Query operations never fail on absent data; they return the zero-ish
//!   value for their shape.

use std::cell::RefCell;
use std::rc::Rc;

use lootforge_bridge::{
    expect_arity, expect_float, expect_opt_str, expect_str, Bridge, BridgeError, BridgeResult,
    ModuleOps, Value,
};
use serde::de::Error as _;
use tracing::{info, warn};

use crate::abilities::AbilityDef;
use crate::adventure::{BountyTarget, SecretStashItem, StashKind, TreasureMapInfo};
use crate::crafting::{MaterialConversion, Recipe, SacrificeRule};
use crate::effects::MagicEffectDef;
use crate::legendary::LegendaryConfig;
use crate::state::HostState;

/// Module name the host installs its operations under.
pub const API_MODULE: &str = "lootforge.api";

type SharedState = Rc<RefCell<HostState>>;

/// Build the operation table and install it on the bridge.
pub fn install(bridge: &Bridge, state: &SharedState) {
    let ops = ModuleOps::new(API_MODULE)
        .op("add_magic_effect", {
            let state = state.clone();
            move |args| {
                expect_arity("add_magic_effect", args, 1)?;
                let payload = expect_str("add_magic_effect", args, 0)?;
                let def: MagicEffectDef = serde_json::from_str(payload)?;
                let key = state.borrow_mut().add_magic_effect(def)?;
                Ok(Value::Str(key))
            }
        })
        .op("update_magic_effect", {
            let state = state.clone();
            move |args| update_op::<MagicEffectDef>("update_magic_effect", &state, args)
        })
        .op("add_ability", {
            let state = state.clone();
            move |args| {
                expect_arity("add_ability", args, 1)?;
                let payload = expect_str("add_ability", args, 0)?;
                let def: AbilityDef = serde_json::from_str(payload)?;
                let key = state.borrow_mut().add_ability(def)?;
                Ok(Value::Str(key))
            }
        })
        .op("update_ability", {
            let state = state.clone();
            move |args| update_op::<AbilityDef>("update_ability", &state, args)
        })
        .op("add_legendary_config", {
            let state = state.clone();
            move |args| {
                expect_arity("add_legendary_config", args, 1)?;
                let payload = expect_str("add_legendary_config", args, 0)?;
                let config: LegendaryConfig = serde_json::from_str(payload)?;
                let key = state.borrow_mut().add_legendary_config(config)?;
                Ok(Value::Str(key))
            }
        })
        .op("update_legendary_config", {
            let state = state.clone();
            move |args| update_op::<LegendaryConfig>("update_legendary_config", &state, args)
        })
        .op("add_material_conversion", {
            let state = state.clone();
            move |args| {
                expect_arity("add_material_conversion", args, 1)?;
                let payload = expect_str("add_material_conversion", args, 0)?;
                let conversion: MaterialConversion = serde_json::from_str(payload)?;
                let key = state.borrow_mut().add_material_conversion(conversion)?;
                Ok(Value::Str(key))
            }
        })
        .op("update_material_conversion", {
            let state = state.clone();
            move |args| update_op::<MaterialConversion>("update_material_conversion", &state, args)
        })
        .op("add_recipes", {
            let state = state.clone();
            move |args| {
                expect_arity("add_recipes", args, 1)?;
                let payload = expect_str("add_recipes", args, 0)?;
                let recipes: Vec<Recipe> = serde_json::from_str(payload)?;
                let key = state.borrow_mut().add_recipes(recipes)?;
                Ok(Value::Str(key))
            }
        })
        .op("update_recipes", {
            let state = state.clone();
            move |args| update_op::<Vec<Recipe>>("update_recipes", &state, args)
        })
        .op("add_sacrifices", {
            let state = state.clone();
            move |args| {
                expect_arity("add_sacrifices", args, 1)?;
                let payload = expect_str("add_sacrifices", args, 0)?;
                let rules: Vec<SacrificeRule> = serde_json::from_str(payload)?;
                let key = state.borrow_mut().add_sacrifices(rules)?;
                Ok(Value::Str(key))
            }
        })
        .op("update_sacrifices", {
            let state = state.clone();
            move |args| update_op::<Vec<SacrificeRule>>("update_sacrifices", &state, args)
        })
        .op("add_bounty_targets", {
            let state = state.clone();
            move |args| {
                expect_arity("add_bounty_targets", args, 1)?;
                let payload = expect_str("add_bounty_targets", args, 0)?;
                let targets: Vec<BountyTarget> = serde_json::from_str(payload)?;
                let key = state.borrow_mut().add_bounty_targets(targets)?;
                Ok(Value::Str(key))
            }
        })
        .op("update_bounty_targets", {
            let state = state.clone();
            move |args| update_op::<Vec<BountyTarget>>("update_bounty_targets", &state, args)
        })
        .op("add_secret_stash_item", {
            let state = state.clone();
            move |args| {
                expect_arity("add_secret_stash_item", args, 2)?;
                let kind_str = expect_str("add_secret_stash_item", args, 0)?;
                let payload = expect_str("add_secret_stash_item", args, 1)?;
                let kind = StashKind::parse(kind_str).ok_or_else(|| {
                    BridgeError::Decode(serde_json::Error::custom(format!(
                        "unknown stash kind '{kind_str}'"
                    )))
                })?;
                let item: SecretStashItem = serde_json::from_str(payload)?;
                let key = state.borrow_mut().add_secret_stash_item(kind, item)?;
                Ok(Value::Str(key))
            }
        })
        .op("update_secret_stash_item", {
            let state = state.clone();
            move |args| update_op::<SecretStashItem>("update_secret_stash_item", &state, args)
        })
        .op("add_treasure_map", {
            let state = state.clone();
            move |args| {
                expect_arity("add_treasure_map", args, 1)?;
                let payload = expect_str("add_treasure_map", args, 0)?;
                let info: TreasureMapInfo = serde_json::from_str(payload)?;
                let key = state.borrow_mut().add_treasure_map(info)?;
                Ok(Value::Str(key))
            }
        })
        .op("update_treasure_map", {
            let state = state.clone();
            move |args| update_op::<TreasureMapInfo>("update_treasure_map", &state, args)
        })
        .op("register_asset", {
            let state = state.clone();
            move |args| {
                expect_arity("register_asset", args, 2)?;
                let name = expect_str("register_asset", args, 0)?;
                let path = expect_str("register_asset", args, 1)?;
                Ok(Value::Bool(state.borrow_mut().register_asset(name, path)))
            }
        })
        .op("get_magic_effect", {
            let state = state.clone();
            move |args| {
                expect_arity("get_magic_effect", args, 1)?;
                let effect_type = expect_str("get_magic_effect", args, 0)?;
                match state.borrow().magic_effect(effect_type) {
                    Some(cell) => Ok(Value::Str(serde_json::to_string(&*cell.borrow())?)),
                    None => Ok(Value::Null),
                }
            }
        })
        .op("has_legendary_item", {
            let state = state.clone();
            move |args| {
                expect_arity("has_legendary_item", args, 2)?;
                let player = expect_str("has_legendary_item", args, 0)?;
                let legendary_id = expect_str("has_legendary_item", args, 1)?;
                let worn = state
                    .borrow()
                    .equipment_of(player)
                    .has_legendary_item(legendary_id);
                Ok(Value::Bool(worn))
            }
        })
        .op("has_legendary_set", {
            let state = state.clone();
            move |args| {
                expect_arity("has_legendary_set", args, 2)?;
                let player = expect_str("has_legendary_set", args, 0)?;
                let set_id = expect_str("has_legendary_set", args, 1)?;
                let (worn, count) = state.borrow().equipment_of(player).has_legendary_set(set_id);
                Ok(Value::List(vec![Value::Bool(worn), Value::Int(count)]))
            }
        })
        .op("total_effect_value", {
            let state = state.clone();
            move |args| {
                expect_arity("total_effect_value", args, 3)?;
                let player = expect_str("total_effect_value", args, 0)?;
                let effect_type = expect_str("total_effect_value", args, 1)?;
                let scale = expect_float("total_effect_value", args, 2)?;
                let total = state
                    .borrow()
                    .equipment_of(player)
                    .total_effect_value(effect_type, scale);
                Ok(Value::Float(total))
            }
        })
        .op("total_effect_value_for_item", {
            let state = state.clone();
            move |args| {
                expect_arity("total_effect_value_for_item", args, 4)?;
                let player = expect_str("total_effect_value_for_item", args, 0)?;
                let item_id = expect_str("total_effect_value_for_item", args, 1)?;
                let effect_type = expect_str("total_effect_value_for_item", args, 2)?;
                let scale = expect_float("total_effect_value_for_item", args, 3)?;
                let total = state
                    .borrow()
                    .equipment_of(player)
                    .total_effect_value_for_item(item_id, effect_type, scale);
                Ok(Value::Float(total))
            }
        })
        .op("total_set_effect_value", {
            let state = state.clone();
            move |args| {
                expect_arity("total_set_effect_value", args, 3)?;
                let player = expect_str("total_set_effect_value", args, 0)?;
                let effect_type = expect_str("total_set_effect_value", args, 1)?;
                let scale = expect_float("total_set_effect_value", args, 2)?;
                let total = state
                    .borrow()
                    .total_set_effect_value(player, effect_type, scale);
                Ok(Value::Float(total))
            }
        })
        .op("has_active_effect", {
            let state = state.clone();
            move |args| {
                expect_arity("has_active_effect", args, 2)?;
                let player = expect_str("has_active_effect", args, 0)?;
                let effect_type = expect_str("has_active_effect", args, 1)?;
                let (present, total) = state
                    .borrow()
                    .equipment_of(player)
                    .has_active_effect(effect_type);
                Ok(Value::List(vec![
                    Value::Bool(present),
                    Value::Float(total),
                ]))
            }
        })
        .op("all_active_effects", {
            let state = state.clone();
            move |args| {
                expect_arity("all_active_effects", args, 2)?;
                let player = expect_str("all_active_effects", args, 0)?;
                let filter = expect_opt_str("all_active_effects", args, 1)?;
                let effects = state.borrow().equipment_of(player).active_effects(filter);
                let mut encoded = Vec::with_capacity(effects.len());
                for effect in &effects {
                    encoded.push(Value::Str(serde_json::to_string(effect)?));
                }
                Ok(Value::List(encoded))
            }
        });

    info!(module = API_MODULE, operations = ops.len(), "installing host api");
    bridge.install_module(ops);
}

/// Shared body of every `update_*` operation: `[key, payload]` in,
/// `Bool` out. An unknown key is the soft stale-handle case; a bad payload
/// propagates so the caller can retry.
fn update_op<T: serde::de::DeserializeOwned + 'static>(
    operation: &str,
    state: &SharedState,
    args: &[Value],
) -> BridgeResult<Value> {
    expect_arity(operation, args, 2)?;
    let key = expect_str(operation, args, 0)?;
    let payload = expect_str(operation, args, 1)?;
    match state.borrow_mut().update::<T>(key, payload) {
        Ok(()) => Ok(Value::Bool(true)),
        Err(BridgeError::KeyNotFound(key)) => {
            warn!(operation, key = %key, "update for unknown key ignored");
            Ok(Value::Bool(false))
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lootforge_bridge::shared;

    fn installed() -> (Rc<Bridge>, SharedState) {
        let bridge = Bridge::new();
        let state = shared(HostState::new());
        install(&bridge, &state);
        (bridge, state)
    }

    fn invoke(bridge: &Bridge, operation: &str, args: &[Value]) -> BridgeResult<Value> {
        let op = bridge.module(API_MODULE).unwrap().get(operation).unwrap();
        op(args)
    }

    #[test]
    fn test_add_then_update_magic_effect() {
        let (bridge, state) = installed();

        let key = invoke(
            &bridge,
            "add_magic_effect",
            &[Value::Str(r#"{"effect_type":"modify_frost"}"#.into())],
        )
        .unwrap();
        let key = key.as_str().unwrap().to_string();
        assert!(key.starts_with("magic_effect_"));

        let result = invoke(
            &bridge,
            "update_magic_effect",
            &[
                Value::Str(key),
                Value::Str(r#"{"effect_type":"modify_frost","display_text":"Frost +"}"#.into()),
            ],
        )
        .unwrap();
        assert_eq!(result, Value::Bool(true));

        let cell = state.borrow().magic_effect("modify_frost").unwrap();
        assert_eq!(cell.borrow().display_text, "Frost +");
    }

    #[test]
    fn test_update_unknown_key_is_soft_false() {
        let (bridge, _state) = installed();
        let result = invoke(
            &bridge,
            "update_magic_effect",
            &[
                Value::Str("magic_effect_99".into()),
                Value::Str(r#"{"effect_type":"x"}"#.into()),
            ],
        )
        .unwrap();
        assert_eq!(result, Value::Bool(false));
    }

    #[test]
    fn test_malformed_payload_is_decode_error() {
        let (bridge, _state) = installed();
        let err = invoke(
            &bridge,
            "add_magic_effect",
            &[Value::Str("{not json".into())],
        )
        .unwrap_err();
        assert!(matches!(err, BridgeError::Decode(_)));
    }

    #[test]
    fn test_wrong_arity_is_signature_mismatch() {
        let (bridge, _state) = installed();
        let err = invoke(&bridge, "add_magic_effect", &[]).unwrap_err();
        assert!(matches!(err, BridgeError::SignatureMismatch { .. }));

        let err = invoke(
            &bridge,
            "total_effect_value",
            &[
                Value::Str("player".into()),
                Value::Str("modify_frost".into()),
                Value::Int(1),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, BridgeError::SignatureMismatch { .. }));
    }

    #[test]
    fn test_duplicate_add_is_named_error() {
        let (bridge, _state) = installed();
        let payload = Value::Str(r#"{"id":"fireball","cooldown":10.0}"#.to_string());
        invoke(&bridge, "add_ability", &[payload.clone()]).unwrap();
        let err = invoke(&bridge, "add_ability", &[payload]).unwrap_err();
        assert!(matches!(err, BridgeError::Duplicate { .. }));
    }

    #[test]
    fn test_unknown_stash_kind_is_decode_error() {
        let (bridge, _state) = installed();
        let err = invoke(
            &bridge,
            "add_secret_stash_item",
            &[
                Value::Str("basement".into()),
                Value::Str(r#"{"item":"rune_shard"}"#.into()),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, BridgeError::Decode(_)));
    }

    #[test]
    fn test_scoped_effect_queries() {
        use crate::equipment::{ActiveEffect, EquippedItem};

        let (bridge, state) = installed();
        state.borrow_mut().equip(
            "signy",
            EquippedItem {
                item_id: "sword_rune".to_string(),
                effects: vec![ActiveEffect::new("modify_frost", 10.0)],
                ..EquippedItem::default()
            },
        );
        state.borrow_mut().equip(
            "signy",
            EquippedItem {
                item_id: "cape_wolf".to_string(),
                effects: vec![ActiveEffect::new("modify_frost", 5.0)],
                ..EquippedItem::default()
            },
        );

        let total = invoke(
            &bridge,
            "total_effect_value_for_item",
            &[
                Value::Str("signy".into()),
                Value::Str("sword_rune".into()),
                Value::Str("modify_frost".into()),
                Value::Float(1.0),
            ],
        )
        .unwrap();
        assert_eq!(total, Value::Float(10.0));

        // No sets worn, no legendary content: zero, not an error.
        let total = invoke(
            &bridge,
            "total_set_effect_value",
            &[
                Value::Str("signy".into()),
                Value::Str("modify_frost".into()),
                Value::Float(1.0),
            ],
        )
        .unwrap();
        assert_eq!(total, Value::Float(0.0));
    }

    #[test]
    fn test_queries_on_empty_player_degrade_to_zero() {
        let (bridge, _state) = installed();

        let total = invoke(
            &bridge,
            "total_effect_value",
            &[
                Value::Str("nobody".into()),
                Value::Str("modify_frost".into()),
                Value::Float(1.0),
            ],
        )
        .unwrap();
        assert_eq!(total, Value::Float(0.0));

        let missing = invoke(
            &bridge,
            "get_magic_effect",
            &[Value::Str("modify_frost".into())],
        )
        .unwrap();
        assert_eq!(missing, Value::Null);

        let effects = invoke(
            &bridge,
            "all_active_effects",
            &[Value::Str("nobody".into()), Value::Null],
        )
        .unwrap();
        assert_eq!(effects, Value::List(Vec::new()));
    }
}
