//! # lootforge-bridge
//!
//! The registration bridge that lets independently-compiled content plugins
//! talk to the Lootforge host without either side linking against the other.
//!
//! This crate provides:
//! - A value model and error vocabulary shared by both sides of the boundary
//! - An enumerable dispatch table of named operations, populated at startup
//! - A symbol resolver that caches module lookups and degrades to no-ops
//! - A host-side runtime registry that mints opaque keys for registered
//!   content, so callers can mutate objects they handed over by value
//! - A caller-side handle cache mapping object identity to those keys
//! - A hook registry for injecting ability behavior across the boundary
//!
//! ## Design
//!
//! Plugins and the host both link this crate, and nothing else in common.
//! Every record crossing the boundary is a flat JSON payload; every call goes
//! through a [`resolver::OperationRef`] obtained by name. A plugin loaded
//! without the host present keeps working: all of its operation references
//! resolve to no-ops that report [`error::BridgeError::Unresolved`].
//!
//! The bridge is synchronous and single-threaded by design. Registries and
//! caches are explicit owned state injected into the components that use
//! them, never ambient globals.

pub mod bridge;
pub mod dispatch;
pub mod error;
pub mod handle;
pub mod hooks;
pub mod registry;
pub mod resolver;
pub mod value;

pub use bridge::Bridge;
pub use dispatch::{DispatchTable, ModuleOps, Operation};
pub use error::{BridgeError, BridgeResult};
pub use handle::HandleCache;
pub use hooks::{AbilityHooks, AbilityState, HookRegistry};
pub use registry::{shared, RuntimeRegistry, Shared};
pub use resolver::{OperationRef, Resolver};
pub use value::{expect_arity, expect_float, expect_opt_str, expect_str, Value};
