//! Behavior injection for polymorphic abilities.
//!
//! A plugin can customize an ability the host instantiates without sharing a
//! compiled subclass with it. The override set is an [`AbilityHooks`] table:
//! one optional function reference per overridable operation, composed
//! explicitly with the host's defaults rather than looked up by name at call
//! time. The table is supplied wholesale at registration and retrieved by
//! the host's factory through the [`HookRegistry`] when the ability is
//! constructed; a missing table is the common pure-default case, never an
//! error.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// The mutable state of one ability instance, visible to hooks.
#[derive(Debug, Clone, PartialEq)]
pub struct AbilityState {
    pub ability_id: String,
    /// Cooldown duration in seconds; zero means no cooldown.
    pub cooldown: f64,
    /// Game time at which the current cooldown ends.
    pub cooldown_end: f64,
    /// Current game time, fed by the host update loop.
    pub now: f64,
}

impl AbilityState {
    pub fn new(ability_id: impl Into<String>, cooldown: f64) -> Self {
        Self {
            ability_id: ability_id.into(),
            cooldown,
            cooldown_end: 0.0,
            now: 0.0,
        }
    }

    pub fn has_cooldown(&self) -> bool {
        self.cooldown > 0.0
    }
}

/// A read-only hook returning a value.
pub type HookFn<R> = Rc<dyn Fn(&AbilityState) -> R>;

/// A hook that may mutate the ability state.
pub type MutHookFn = Rc<dyn Fn(&mut AbilityState)>;

/// Partial override set for an ability's operations.
///
/// Every slot left `None` falls through to the host's default
/// implementation; the set may be empty, in which case the proxied ability
/// behaves identically to the default type.
#[derive(Clone, Default)]
pub struct AbilityHooks {
    pub is_on_cooldown: Option<HookFn<bool>>,
    pub can_activate: Option<HookFn<bool>>,
    pub should_trigger: Option<HookFn<bool>>,
    pub on_update: Option<MutHookFn>,
    pub on_activate: Option<MutHookFn>,
}

impl AbilityHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_is_on_cooldown(mut self, f: impl Fn(&AbilityState) -> bool + 'static) -> Self {
        self.is_on_cooldown = Some(Rc::new(f));
        self
    }

    pub fn with_can_activate(mut self, f: impl Fn(&AbilityState) -> bool + 'static) -> Self {
        self.can_activate = Some(Rc::new(f));
        self
    }

    pub fn with_should_trigger(mut self, f: impl Fn(&AbilityState) -> bool + 'static) -> Self {
        self.should_trigger = Some(Rc::new(f));
        self
    }

    pub fn with_on_update(mut self, f: impl Fn(&mut AbilityState) + 'static) -> Self {
        self.on_update = Some(Rc::new(f));
        self
    }

    pub fn with_on_activate(mut self, f: impl Fn(&mut AbilityState) + 'static) -> Self {
        self.on_activate = Some(Rc::new(f));
        self
    }

    /// Names of the operations this table overrides.
    pub fn overridden(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.is_on_cooldown.is_some() {
            names.push("is_on_cooldown");
        }
        if self.can_activate.is_some() {
            names.push("can_activate");
        }
        if self.should_trigger.is_some() {
            names.push("should_trigger");
        }
        if self.on_update.is_some() {
            names.push("on_update");
        }
        if self.on_activate.is_some() {
            names.push("on_activate");
        }
        names
    }

    pub fn is_empty(&self) -> bool {
        self.overridden().is_empty()
    }
}

impl fmt::Debug for AbilityHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbilityHooks")
            .field("overridden", &self.overridden())
            .finish()
    }
}

/// Override tables keyed by ability identifier.
///
/// Populated by the caller at registration time; consulted by the host's
/// ability factory at construction. A table lives as long as the registry
/// does, which matches the lifetime of the ability definitions themselves.
#[derive(Default)]
pub struct HookRegistry {
    tables: HashMap<String, AbilityHooks>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install an override table for an ability.
    ///
    /// Re-installing replaces the previous table; the ability definition
    /// itself was already duplicate-checked at add time.
    pub fn install(&mut self, ability_id: &str, hooks: AbilityHooks) {
        debug!(ability_id, overridden = ?hooks.overridden(), "installing ability hooks");
        self.tables.insert(ability_id.to_string(), hooks);
    }

    /// Fetch the override table for an ability, if one was supplied.
    pub fn lookup(&self, ability_id: &str) -> Option<AbilityHooks> {
        self.tables.get(ability_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_overrides_nothing() {
        let hooks = AbilityHooks::new();
        assert!(hooks.is_empty());
        assert!(hooks.overridden().is_empty());
    }

    #[test]
    fn test_partial_override_set() {
        let hooks = AbilityHooks::new().with_can_activate(|_| true);
        assert_eq!(hooks.overridden(), vec!["can_activate"]);
        assert!(hooks.is_on_cooldown.is_none());
        assert!(hooks.should_trigger.is_none());
    }

    #[test]
    fn test_registry_lookup_missing_is_none() {
        let registry = HookRegistry::new();
        assert!(registry.lookup("frost_nova").is_none());
    }

    #[test]
    fn test_registry_install_and_lookup() {
        let mut registry = HookRegistry::new();
        registry.install(
            "frost_nova",
            AbilityHooks::new().with_should_trigger(|state| state.now > 10.0),
        );

        let hooks = registry.lookup("frost_nova").unwrap();
        let mut state = AbilityState::new("frost_nova", 5.0);
        state.now = 11.0;
        assert!(hooks.should_trigger.unwrap()(&state));
    }
}
