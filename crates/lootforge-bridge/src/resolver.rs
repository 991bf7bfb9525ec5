//! Symbol resolution and dynamic invocation.
//!
//! A [`Resolver`] turns (module-name, operation-name) pairs into
//! [`OperationRef`]s. Module lookups happen at most once per distinct module
//! name; hits and misses are both cached for the resolver's lifetime, and a
//! miss is logged once. Resolution failure is non-fatal: an unresolved
//! reference is a valid object whose every invocation is a no-op reporting
//! [`BridgeError::Unresolved`]. Plugins probe for the host by resolving and
//! calling, never by pre-checking.

use crate::bridge::Bridge;
use crate::dispatch::{ModuleOps, Operation};
use crate::error::{BridgeError, BridgeResult};
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::warn;

/// Resolves named operations against a shared [`Bridge`].
pub struct Resolver {
    bridge: Rc<Bridge>,
    modules: RefCell<HashMap<String, Option<Rc<ModuleOps>>>>,
}

impl Resolver {
    pub fn new(bridge: Rc<Bridge>) -> Self {
        Self {
            bridge,
            modules: RefCell::new(HashMap::new()),
        }
    }

    /// Resolve an operation reference. Never fails; an unknown module or
    /// operation yields an unresolved no-op reference.
    pub fn resolve(&self, module: &str, operation: &str) -> OperationRef {
        let table = self.module_table(module);
        let op = table.as_ref().and_then(|t| t.get(operation));
        if table.is_some() && op.is_none() {
            warn!(
                module,
                operation, "operation not found; calls through this reference are no-ops"
            );
        }
        OperationRef {
            module: module.to_string(),
            operation: operation.to_string(),
            op,
        }
    }

    fn module_table(&self, module: &str) -> Option<Rc<ModuleOps>> {
        if let Some(cached) = self.modules.borrow().get(module) {
            return cached.clone();
        }
        let found = self.bridge.module(module);
        if found.is_none() {
            warn!(
                module,
                "module not found; calls through its references are no-ops"
            );
        }
        self.modules
            .borrow_mut()
            .insert(module.to_string(), found.clone());
        found
    }
}

/// A resolved, invocable reference to a named operation in another module.
///
/// Immutable once resolved. An unresolved reference is safe to hold and
/// invoke; it reports [`BridgeError::Unresolved`] every time.
pub struct OperationRef {
    module: String,
    operation: String,
    op: Option<Rc<Operation>>,
}

impl OperationRef {
    /// Invoke the operation with a positional argument list.
    ///
    /// Performs no argument validation of its own: a mismatched argument
    /// list surfaces as [`BridgeError::SignatureMismatch`] from the
    /// operation body, which is a defect and not an absence condition.
    pub fn invoke(&self, args: &[Value]) -> BridgeResult<Value> {
        match &self.op {
            Some(op) => op(args),
            None => Err(BridgeError::Unresolved {
                module: self.module.clone(),
                operation: self.operation.clone(),
            }),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.op.is_some()
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }
}

impl fmt::Debug for OperationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationRef")
            .field("module", &self.module)
            .field("operation", &self.operation)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::ModuleOps;
    use crate::value::expect_arity;
    use std::cell::Cell;

    fn bridge_with_ping() -> Rc<Bridge> {
        let bridge = Bridge::new();
        bridge.install_module(ModuleOps::new("game.api").op("ping", |args| {
            expect_arity("ping", args, 0)?;
            Ok(Value::Str("pong".into()))
        }));
        bridge
    }

    #[test]
    fn test_resolve_and_invoke() {
        let bridge = bridge_with_ping();
        let resolver = Resolver::new(bridge);
        let ping = resolver.resolve("game.api", "ping");

        assert!(ping.is_resolved());
        assert_eq!(ping.invoke(&[]).unwrap(), Value::Str("pong".into()));
    }

    #[test]
    fn test_unresolved_module_is_noop() {
        let bridge = Bridge::new();
        let resolver = Resolver::new(bridge);
        let op = resolver.resolve("absent.module", "anything");

        assert!(!op.is_resolved());
        // Invocation is a guaranteed no-op, repeatable any number of times.
        for _ in 0..3 {
            let err = op.invoke(&[Value::Int(1)]).unwrap_err();
            assert!(matches!(err, BridgeError::Unresolved { .. }));
        }
    }

    #[test]
    fn test_unresolved_operation_in_present_module() {
        let bridge = bridge_with_ping();
        let resolver = Resolver::new(bridge);
        let op = resolver.resolve("game.api", "no_such_op");

        assert!(!op.is_resolved());
        assert!(op.invoke(&[]).unwrap_err().is_soft());
    }

    #[test]
    fn test_module_lookup_cached_per_resolver() {
        let bridge = bridge_with_ping();
        let resolver = Resolver::new(bridge);

        let a = resolver.resolve("game.api", "ping");
        let b = resolver.resolve("game.api", "ping");
        // Both references come from the same cached module table.
        assert!(Rc::ptr_eq(a.op.as_ref().unwrap(), b.op.as_ref().unwrap()));

        // Misses are cached too.
        let miss_a = resolver.resolve("absent.module", "x");
        let miss_b = resolver.resolve("absent.module", "y");
        assert!(!miss_a.is_resolved());
        assert!(!miss_b.is_resolved());
    }

    #[test]
    fn test_signature_mismatch_is_loud() {
        let bridge = bridge_with_ping();
        let resolver = Resolver::new(bridge);
        let ping = resolver.resolve("game.api", "ping");

        let err = ping.invoke(&[Value::Int(1)]).unwrap_err();
        assert!(matches!(err, BridgeError::SignatureMismatch { .. }));
        assert!(!err.is_soft());
    }

    #[test]
    fn test_side_effects_reach_operation() {
        let bridge = Bridge::new();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        bridge.install_module(ModuleOps::new("m").op("bump", move |_| {
            counter.set(counter.get() + 1);
            Ok(Value::Null)
        }));

        let resolver = Resolver::new(bridge);
        let bump = resolver.resolve("m", "bump");
        bump.invoke(&[]).unwrap();
        bump.invoke(&[]).unwrap();
        assert_eq!(calls.get(), 2);
    }
}
