//! Ability definitions and the proxied ability stand-in.
//!
//! Plugins register abilities as plain data; behavior beyond the stock
//! cooldown logic is injected through an [`AbilityHooks`] table supplied at
//! registration. The stand-in consults its table slot before every
//! overridable operation and falls through to the default when the slot is
//! empty, so an ability with no table behaves exactly like the stock type.

use lootforge_bridge::{AbilityHooks, AbilityState};
use serde::{Deserialize, Serialize};
use tracing::debug;

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

/// An ability definition registered through the bridge.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityDef {
    /// Unique ability identifier, the table key.
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

/// A live ability instance: stock cooldown behavior plus an optional
/// externally supplied override table.
pub struct Ability {
    state: AbilityState,
    hooks: AbilityHooks,
}

impl Ability {
    /// Construct with pure default behavior.
    pub fn new(id: &str, cooldown: f64) -> Self {
        Self::with_hooks(id, cooldown, AbilityHooks::new())
    }

    /// Construct with an override table attached.
    pub fn with_hooks(id: &str, cooldown: f64, hooks: AbilityHooks) -> Self {
        if !hooks.is_empty() {
            debug!(ability_id = id, overridden = ?hooks.overridden(), "ability constructed with hooks");
        }
        Self {
            state: AbilityState::new(id, cooldown),
            hooks,
        }
    }

    pub fn id(&self) -> &str {
        &self.state.ability_id
    }

    pub fn state(&self) -> &AbilityState {
        &self.state
    }

    pub fn has_cooldown(&self) -> bool {
        self.state.has_cooldown()
    }

    /// Advance the ability to the current game time.
    pub fn tick(&mut self, now: f64) {
        self.state.now = now;
        if let Some(hook) = self.hooks.on_update.clone() {
            hook(&mut self.state);
        }
    }

    pub fn is_on_cooldown(&self) -> bool {
        if let Some(hook) = &self.hooks.is_on_cooldown {
            return hook(&self.state);
        }
        self.state.has_cooldown() && self.state.now < self.state.cooldown_end
    }

    pub fn time_until_cooldown_ends(&self) -> f64 {
        (self.state.cooldown_end - self.state.now).max(0.0)
    }

    pub fn percent_cooldown_complete(&self) -> f64 {
        if self.state.has_cooldown() && self.is_on_cooldown() {
            1.0 - self.time_until_cooldown_ends() / self.state.cooldown
        } else {
            1.0
        }
    }

    pub fn can_activate(&self) -> bool {
        if let Some(hook) = &self.hooks.can_activate {
            return hook(&self.state);
        }
        !self.is_on_cooldown()
    }

    pub fn should_trigger(&self) -> bool {
        if let Some(hook) = &self.hooks.should_trigger {
            return hook(&self.state);
        }
        false
    }

    /// Activate if allowed; returns whether activation happened.
    pub fn try_activate(&mut self) -> bool {
        if self.can_activate() {
            self.activate();
            true
        } else {
            false
        }
    }

    pub fn activate(&mut self) {
        if let Some(hook) = self.hooks.on_activate.clone() {
            hook(&mut self.state);
            return;
        }
        if self.state.has_cooldown() {
            self.state.cooldown_end = self.state.now + self.state.cooldown;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cooldown_cycle() {
        let mut ability = Ability::new("dash", 5.0);
        ability.tick(10.0);
        assert!(!ability.is_on_cooldown());
        assert!(ability.can_activate());

        assert!(ability.try_activate());
        assert!(ability.is_on_cooldown());
        assert_eq!(ability.time_until_cooldown_ends(), 5.0);
        assert!(!ability.try_activate());

        ability.tick(15.0);
        assert!(!ability.is_on_cooldown());
        assert_eq!(ability.percent_cooldown_complete(), 1.0);
    }

    #[test]
    fn test_zero_cooldown_never_blocks() {
        let mut ability = Ability::new("stomp", 0.0);
        ability.tick(1.0);
        assert!(ability.try_activate());
        assert!(ability.try_activate());
        assert!(!ability.is_on_cooldown());
    }

    #[test]
    fn test_empty_hooks_match_defaults_everywhere() {
        let mut plain = Ability::new("dash", 5.0);
        let mut proxied = Ability::with_hooks("dash", 5.0, AbilityHooks::new());

        for now in [0.0, 3.0, 7.5] {
            plain.tick(now);
            proxied.tick(now);
            assert_eq!(plain.is_on_cooldown(), proxied.is_on_cooldown());
            assert_eq!(plain.can_activate(), proxied.can_activate());
            assert_eq!(plain.should_trigger(), proxied.should_trigger());
            assert_eq!(
                plain.percent_cooldown_complete(),
                proxied.percent_cooldown_complete()
            );
            assert_eq!(plain.try_activate(), proxied.try_activate());
        }
        assert_eq!(plain.state(), proxied.state());
    }

    #[test]
    fn test_single_override_delegates_exactly_one_operation() {
        let hooks = AbilityHooks::new().with_can_activate(|_| false);
        let mut ability = Ability::with_hooks("dash", 5.0, hooks);
        ability.tick(10.0);

        // Overridden: activation denied even though no cooldown is running.
        assert!(!ability.can_activate());
        assert!(!ability.try_activate());

        // Everything else falls through to defaults.
        assert!(!ability.is_on_cooldown());
        assert!(!ability.should_trigger());
        assert_eq!(ability.percent_cooldown_complete(), 1.0);
    }

    #[test]
    fn test_on_activate_override_replaces_cooldown_logic() {
        let hooks = AbilityHooks::new().with_on_activate(|state| {
            state.cooldown_end = state.now + 1.0;
        });
        let mut ability = Ability::with_hooks("blink", 30.0, hooks);
        ability.tick(5.0);
        ability.activate();
        assert_eq!(ability.time_until_cooldown_ends(), 1.0);
    }

    #[test]
    fn test_trigger_override() {
        let hooks = AbilityHooks::new().with_should_trigger(|state| state.now >= 60.0);
        let mut ability = Ability::with_hooks("frenzy", 0.0, hooks);
        ability.tick(30.0);
        assert!(!ability.should_trigger());
        ability.tick(60.0);
        assert!(ability.should_trigger());
    }
}
