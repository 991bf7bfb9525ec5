//! # lootforge-demo
//!
//! Wires one host and one content plugin onto a shared bridge and walks the
//! full registration lifecycle: add, register, update, behavior override,
//! equipment queries.
//!
//! ## Running
//!
//! ```bash
//! cargo run --bin lootforge-demo
//!
//! # With debug logging
//! RUST_LOG=debug cargo run --bin lootforge-demo
//! ```

use anyhow::Result;
use lootforge_bridge::Bridge;
use lootforge_host::equipment::{ActiveEffect, EquippedItem};
use lootforge_host::{Host, HostConfig};
use lootforge_plugin_api::{
    AbilityDef, AbilityHooks, LegendaryInfo, LootClient, MagicEffectDef, Recipe, ValueDef,
};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

const BASE_CONTENT: &str = r#"
[[magic_effects]]
effect_type = "modify_armor"
display_text = "Armor +"
selection_weight = 1.0

[[abilities]]
id = "battle_cry"
activation_mode = "activated"
cooldown = 60.0
"#;

fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .init();

    info!("Starting lootforge-demo v{}", env!("CARGO_PKG_VERSION"));

    // Host side: seed base content and install the api on a fresh bridge.
    let bridge = Bridge::new();
    let host = Host::with_config(HostConfig::parse(BASE_CONTENT)?);
    host.install(&bridge);

    // Plugin side: only the bridge is shared.
    let mut client = LootClient::new(bridge.clone());
    info!("Host present: {}", client.host_present());

    let mut frost = MagicEffectDef::new("modify_frost");
    frost.display_text = "Frost damage +".to_string();
    frost.values_per_rarity.epic = Some(ValueDef::new(5.0, 10.0, 1.0));
    let frost = client.add_magic_effect(frost);

    let fireball = client.add_ability_with_hooks(
        AbilityDef::new("fireball", 10.0),
        AbilityHooks::new().with_can_activate(|state| {
            // Custom rule: fireball needs a warmed-up session.
            state.now >= 30.0 && !(state.has_cooldown() && state.now < state.cooldown_end)
        }),
    );

    client.add_legendary_item(LegendaryInfo {
        id: "frost_reaver".to_string(),
        name: "Frost Reaver".to_string(),
        ..LegendaryInfo::default()
    });
    client.add_recipe(Recipe {
        name: "rune_blade".to_string(),
        item: "sword_rune".to_string(),
        crafting_station: "forge".to_string(),
        ..Recipe::default()
    });

    let report = client.register_all()?;
    info!(
        "Registered {} item(s), {} pending",
        report.registered, report.pending
    );

    // Runtime update: rebalance the fireball cooldown through its handle.
    fireball.borrow_mut().cooldown = 5.0;
    info!("Fireball rebalance applied: {}", client.update_ability(&fireball)?);

    frost.borrow_mut().description = "Adds frost damage to attacks.".to_string();
    client.update_magic_effect(&frost)?;

    // The host instantiates the ability with the injected behavior.
    if let Some(mut ability) = host.create_ability(&bridge, "fireball") {
        ability.tick(10.0);
        info!("Fireball at t=10: can_activate={}", ability.can_activate());
        ability.tick(45.0);
        info!("Fireball at t=45: can_activate={}", ability.can_activate());
        if ability.try_activate() {
            info!(
                "Fireball activated, cooldown ends in {:.1}s",
                ability.time_until_cooldown_ends()
            );
        }
    }

    // Equipment queries through the bridge.
    host.equip(
        "signy",
        EquippedItem {
            item_id: "sword_rune".to_string(),
            legendary_id: Some("frost_reaver".to_string()),
            effects: vec![ActiveEffect::new("modify_frost", 10.0)],
            ..EquippedItem::default()
        },
    );
    info!(
        "signy wears frost_reaver: {}",
        client.has_legendary_item("signy", "frost_reaver")
    );
    info!(
        "signy total modify_frost: {}",
        client.total_effect_value("signy", "modify_frost", 1.0)
    );

    info!("Done");
    Ok(())
}
