//! # lootforge-plugin-api
//!
//! The client library a content plugin embeds to talk to a Lootforge host.
//! It deliberately depends only on the bridge crate, never on the host: all
//! record shapes are duplicated here, and every host interaction goes
//! through named operations resolved at runtime.
//!
//! The headline type is [`LootClient`]. Typical plugin flow:
//!
//! ```no_run
//! use lootforge_bridge::Bridge;
//! use lootforge_plugin_api::{AbilityDef, AbilityHooks, LootClient, MagicEffectDef};
//!
//! # fn demo(bridge: std::rc::Rc<Bridge>) -> lootforge_bridge::BridgeResult<()> {
//! let mut client = LootClient::new(bridge);
//! let frost = client.add_magic_effect(MagicEffectDef::new("modify_frost"));
//! client.add_ability_with_hooks(
//!     AbilityDef::new("frost_nova", 20.0),
//!     AbilityHooks::new().with_can_activate(|state| state.now > 60.0),
//! );
//! let _report = client.register_all()?;
//!
//! // Later: mutate the local object and push the change.
//! frost.borrow_mut().display_text = "Frost damage +".to_string();
//! client.update_magic_effect(&frost)?;
//! # Ok(())
//! # }
//! ```
//!
//! Every call degrades gracefully when no host is installed: adds stay
//! pending, updates report `false`, queries answer their zero value.

pub mod client;
pub mod defs;
pub mod ops;
pub mod pending;

pub use client::{LootClient, RegisterReport};
pub use defs::{
    AbilityAction, AbilityDef, ActivationMode, ActiveEffect, Biome, BountyMinion, BountyTarget,
    ConversionKind, GuaranteedEffect, ItemAmount, ItemRarity, LegendaryConfig, LegendaryInfo,
    LegendarySetInfo, MagicEffectDef, MaterialConversion, Recipe, SacrificeRule, SecretStashItem,
    SetBonus, StashKind, TreasureMapInfo, ValueDef, ValuesPerRarity,
};
pub use lootforge_bridge::{AbilityHooks, AbilityState};
pub use ops::{ApiOps, API_MODULE};
pub use pending::PendingSet;
