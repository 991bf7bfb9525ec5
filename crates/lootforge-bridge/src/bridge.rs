//! The shared bridge substrate.
//!
//! One [`Bridge`] is created per host process, before the host installs its
//! operation surface, and handed by `Rc` to every module that talks across
//! it. It owns the two pieces of state both sides reach: the dispatch table
//! of named operations and the hook registry for behavior injection.
//!
//! Lifecycle is explicit: the bridge is constructed at startup and dropped
//! at shutdown; nothing here is a process-wide static, so tests can run any
//! number of independent bridge instances.

use crate::dispatch::{DispatchTable, ModuleOps};
use crate::hooks::{AbilityHooks, HookRegistry};
use std::cell::RefCell;
use std::rc::Rc;

/// Shared substrate between host and plugins.
#[derive(Default)]
pub struct Bridge {
    dispatch: RefCell<DispatchTable>,
    hooks: RefCell<HookRegistry>,
}

impl Bridge {
    /// Create a fresh bridge with no modules installed.
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Install a module's operation table.
    pub fn install_module(&self, ops: ModuleOps) {
        self.dispatch.borrow_mut().install(ops);
    }

    /// Look up an installed module by name.
    pub fn module(&self, name: &str) -> Option<Rc<ModuleOps>> {
        self.dispatch.borrow().module(name)
    }

    /// Enumerate the installed module names.
    pub fn module_names(&self) -> Vec<String> {
        self.dispatch
            .borrow()
            .module_names()
            .into_iter()
            .map(String::from)
            .collect()
    }

    /// Supply a behavior override table for an ability.
    pub fn install_hooks(&self, ability_id: &str, hooks: AbilityHooks) {
        self.hooks.borrow_mut().install(ability_id, hooks);
    }

    /// Fetch the override table for an ability, if any was supplied.
    pub fn hooks_for(&self, ability_id: &str) -> Option<AbilityHooks> {
        self.hooks.borrow().lookup(ability_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_independent_bridge_instances() {
        let a = Bridge::new();
        let b = Bridge::new();
        a.install_module(ModuleOps::new("api").op("ping", |_| Ok(Value::Null)));

        assert!(a.module("api").is_some());
        assert!(b.module("api").is_none());
    }

    #[test]
    fn test_hook_tables_round_trip() {
        let bridge = Bridge::new();
        assert!(bridge.hooks_for("dash").is_none());

        bridge.install_hooks("dash", AbilityHooks::new().with_can_activate(|_| false));
        let hooks = bridge.hooks_for("dash").unwrap();
        assert_eq!(hooks.overridden(), vec!["can_activate"]);
    }
}
