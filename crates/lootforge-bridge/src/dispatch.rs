//! Dispatch table of named operations.
//!
//! Instead of ambient runtime type lookup, the set of invocable operations is
//! a first-class, enumerable structure: the host builds a [`ModuleOps`] table
//! at startup and installs it under its module name. Callers resolve
//! operations out of the table by name through [`crate::resolver::Resolver`].

use crate::error::BridgeResult;
use crate::value::Value;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, warn};

/// An invocable operation: positional arguments in, one value or a bridge
/// error out. Side effects are whatever the operation performs; the invoker
/// never inspects them.
pub type Operation = dyn Fn(&[Value]) -> BridgeResult<Value>;

/// The named operations one module exposes across the bridge.
pub struct ModuleOps {
    name: String,
    ops: HashMap<String, Rc<Operation>>,
}

impl ModuleOps {
    /// Create an empty operation table for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ops: HashMap::new(),
        }
    }

    /// Add a named operation. Builder-style, used during host install.
    ///
    /// Registering the same operation name twice in one module is a
    /// programming error and panics at install time.
    pub fn op<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(&[Value]) -> BridgeResult<Value> + 'static,
    {
        let previous = self.ops.insert(name.to_string(), Rc::new(f));
        if previous.is_some() {
            panic!("operation '{}' installed twice in module '{}'", name, self.name);
        }
        self
    }

    /// The module name this table is installed under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up an operation by name.
    pub fn get(&self, operation: &str) -> Option<Rc<Operation>> {
        self.ops.get(operation).cloned()
    }

    /// Enumerate the installed operation names.
    pub fn operation_names(&self) -> Vec<&str> {
        self.ops.keys().map(|s| s.as_str()).collect()
    }

    /// Number of installed operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Registry of installed modules, keyed by module name.
#[derive(Default)]
pub struct DispatchTable {
    modules: HashMap<String, Rc<ModuleOps>>,
}

impl DispatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a module's operation table.
    ///
    /// Re-installing a module replaces the previous table; resolved
    /// references to the old table keep working against it.
    pub fn install(&mut self, ops: ModuleOps) {
        let name = ops.name().to_string();
        debug!(module = %name, operations = ops.len(), "installing module");
        if self.modules.insert(name.clone(), Rc::new(ops)).is_some() {
            warn!(module = %name, "module table replaced");
        }
    }

    /// Look up a module by name.
    pub fn module(&self, name: &str) -> Option<Rc<ModuleOps>> {
        self.modules.get(name).cloned()
    }

    /// Enumerate the installed module names.
    pub fn module_names(&self) -> Vec<&str> {
        self.modules.keys().map(|s| s.as_str()).collect()
    }
}
