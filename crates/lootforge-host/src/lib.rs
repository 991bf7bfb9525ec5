//! # lootforge-host
//!
//! The host side of the Lootforge registration bridge: the domain tables
//! plugins register content into, the operation surface they call, and the
//! ability factory that composes injected behavior with host defaults.
//!
//! A host embeds this crate, builds a [`Host`], optionally seeds it from a
//! [`config::HostConfig`], and installs it on a shared
//! [`lootforge_bridge::Bridge`]. From then on every registered plugin talks
//! to the same tables through named operations.

pub mod abilities;
pub mod adventure;
pub mod api;
pub mod config;
pub mod crafting;
pub mod effects;
pub mod equipment;
pub mod legendary;
pub mod state;

use std::cell::RefCell;
use std::rc::Rc;

use lootforge_bridge::{shared, Bridge, Shared};
use tracing::warn;

pub use abilities::Ability;
pub use api::API_MODULE;
pub use config::{HostConfig, HostError};
pub use state::HostState;

/// The assembled host: owned state plus the install entry point.
pub struct Host {
    state: Shared<HostState>,
}

impl Host {
    /// An empty host with no seeded content.
    pub fn new() -> Self {
        Self {
            state: shared(HostState::new()),
        }
    }

    /// A host seeded from base config content.
    pub fn with_config(config: HostConfig) -> Self {
        let host = Self::new();
        config.seed(&mut host.state.borrow_mut());
        host
    }

    /// Install the operation surface on `bridge`.
    pub fn install(&self, bridge: &Bridge) {
        api::install(bridge, &self.state);
    }

    /// Direct access to the tables, for embedding hosts.
    pub fn state(&self) -> &Rc<RefCell<HostState>> {
        &self.state
    }

    /// Record an item as equipped by `player`, feeding the query operations.
    pub fn equip(&self, player: &str, item: equipment::EquippedItem) {
        self.state.borrow_mut().equip(player, item);
    }

    /// Instantiate an ability from its registered definition, attaching any
    /// override table a plugin supplied for it. Unknown ids yield `None`;
    /// a known id with no hook table yields a pure-default instance.
    pub fn create_ability(&self, bridge: &Bridge, ability_id: &str) -> Option<Ability> {
        let def = match self.state.borrow().ability(ability_id) {
            Some(def) => def,
            None => {
                warn!(ability_id, "ability not registered, cannot instantiate");
                return None;
            }
        };
        let cooldown = def.borrow().cooldown;
        let hooks = bridge.hooks_for(ability_id).unwrap_or_default();
        Some(Ability::with_hooks(ability_id, cooldown, hooks))
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::AbilityDef;
    use lootforge_bridge::AbilityHooks;

    #[test]
    fn test_create_ability_unknown_id_is_none() {
        let host = Host::new();
        let bridge = Bridge::new();
        assert!(host.create_ability(&bridge, "fireball").is_none());
    }

    #[test]
    fn test_create_ability_uses_registered_cooldown_and_hooks() {
        let host = Host::new();
        let bridge = Bridge::new();
        host.state()
            .borrow_mut()
            .add_ability(AbilityDef::new("fireball", 10.0))
            .unwrap();
        bridge.install_hooks("fireball", AbilityHooks::new().with_can_activate(|_| false));

        let mut ability = host.create_ability(&bridge, "fireball").unwrap();
        ability.tick(0.0);
        assert!(!ability.can_activate());
        assert_eq!(ability.state().cooldown, 10.0);
    }

    #[test]
    fn test_create_ability_without_hooks_is_pure_default() {
        let host = Host::new();
        let bridge = Bridge::new();
        host.state()
            .borrow_mut()
            .add_ability(AbilityDef::new("dash", 5.0))
            .unwrap();

        let mut ability = host.create_ability(&bridge, "dash").unwrap();
        ability.tick(1.0);
        assert!(ability.try_activate());
        assert!(ability.is_on_cooldown());
    }
}
