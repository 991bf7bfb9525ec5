//! Host-side runtime registry of registered content.
//!
//! Every object a plugin hands over by value is stored here under a freshly
//! minted opaque key (`{type-tag}_{counter}`). The caller treats the key as a
//! capability token: it carries no semantic content and is only ever passed
//! back to `update` operations. The registry holds the same shared reference
//! the host's domain tables hold, so an in-place overwrite is observed by
//! everything that captured the object.
//!
//! Keys are never reused and entries are never removed; the registry lives
//! for the process lifetime and holds no persisted state, so keys from a
//! previous process are unknown by construction.

use crate::error::{BridgeError, BridgeResult};
use serde::de::DeserializeOwned;
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

/// Shared, interiorly-mutable handle to a registered object.
///
/// The bridge runs on a single-threaded host loop, so plain `Rc<RefCell>`
/// is the sharing model; callers needing cross-thread registration supply
/// their own synchronization outside the bridge.
pub type Shared<T> = Rc<RefCell<T>>;

/// Wrap a value for registration.
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Registry mapping opaque keys to registered objects.
#[derive(Default)]
pub struct RuntimeRegistry {
    entries: HashMap<String, Rc<dyn Any>>,
    counter: u64,
}

impl RuntimeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object and mint a new opaque key for it.
    ///
    /// Never fails for a well-formed object; each call issues a key distinct
    /// from every previously issued key.
    pub fn register<T: 'static>(&mut self, type_tag: &str, object: Shared<T>) -> String {
        self.counter += 1;
        let key = format!("{}_{}", type_tag, self.counter);
        self.entries.insert(key.clone(), object as Rc<dyn Any>);
        debug!(key = %key, "registered object");
        key
    }

    /// Look up an object by key.
    ///
    /// Returns `None` for any key this instance never minted (including keys
    /// from a prior process lifetime) and for keys holding a different
    /// record kind than requested.
    pub fn resolve<T: 'static>(&self, key: &str) -> Option<Shared<T>> {
        let entry = Rc::clone(self.entries.get(key)?);
        match entry.downcast::<RefCell<T>>() {
            Ok(object) => Some(object),
            Err(_) => {
                debug!(key, "key holds a different record kind");
                None
            }
        }
    }

    /// Decode `payload` and overwrite the stored object in place.
    ///
    /// This is a full replacement, not a merge: absent fields in the payload
    /// land as their decoded defaults. Never creates a new entry. A missing
    /// key is a recoverable [`BridgeError::KeyNotFound`]; a malformed
    /// payload is a distinct [`BridgeError::Decode`].
    pub fn update<T>(&self, key: &str, payload: &str) -> BridgeResult<()>
    where
        T: DeserializeOwned + 'static,
    {
        let slot = self
            .resolve::<T>(key)
            .ok_or_else(|| BridgeError::KeyNotFound(key.to_string()))?;
        let decoded: T = serde_json::from_str(payload)?;
        *slot.borrow_mut() = decoded;
        debug!(key, "updated object in place");
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::collections::HashSet;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct Record {
        id: String,
        cooldown: f64,
    }

    fn fireball() -> Record {
        Record {
            id: "fireball".to_string(),
            cooldown: 5.0,
        }
    }

    #[test]
    fn test_register_resolve_roundtrip_identity() {
        let mut registry = RuntimeRegistry::new();
        let object = shared(fireball());
        let key = registry.register("record", Rc::clone(&object));

        assert!(!key.is_empty());
        let resolved = registry.resolve::<Record>(&key).unwrap();
        // Same shared object, not a copy.
        assert!(Rc::ptr_eq(&object, &resolved));
    }

    #[test]
    fn test_unknown_key_is_not_found() {
        let registry = RuntimeRegistry::new();
        assert!(registry.resolve::<Record>("record_1").is_none());
        assert!(registry.resolve::<Record>("").is_none());
    }

    #[test]
    fn test_wrong_record_kind_is_not_found() {
        let mut registry = RuntimeRegistry::new();
        let key = registry.register("record", shared(fireball()));
        assert!(registry.resolve::<String>(&key).is_none());
        assert!(registry.resolve::<Record>(&key).is_some());
    }

    #[test]
    fn test_update_overwrites_in_place() {
        let mut registry = RuntimeRegistry::new();
        let object = shared(fireball());
        let key = registry.register("record", Rc::clone(&object));

        registry
            .update::<Record>(&key, r#"{"id":"fireball","cooldown":3.0}"#)
            .unwrap();

        // The original shared reference observes the mutation.
        assert_eq!(object.borrow().cooldown, 3.0);
        let resolved = registry.resolve::<Record>(&key).unwrap();
        assert_eq!(resolved.borrow().cooldown, 3.0);
    }

    #[test]
    fn test_update_is_full_overwrite_not_merge() {
        let mut registry = RuntimeRegistry::new();
        let object = shared(fireball());
        let key = registry.register("record", Rc::clone(&object));

        // Absent fields land as decoded defaults, not the old values.
        #[derive(Serialize)]
        struct Sparse {
            id: String,
        }
        let payload = serde_json::to_string(&Sparse {
            id: "frost".to_string(),
        })
        .unwrap();
        // Record has no serde defaults for cooldown, so this payload fails
        // to decode; the stored object is untouched.
        let err = registry.update::<Record>(&key, &payload).unwrap_err();
        assert!(matches!(err, BridgeError::Decode(_)));
        assert_eq!(object.borrow().id, "fireball");
    }

    #[test]
    fn test_update_unknown_key_fails_cleanly() {
        let mut registry = RuntimeRegistry::new();
        let object = shared(fireball());
        let key = registry.register("record", Rc::clone(&object));

        let err = registry
            .update::<Record>("record_999", r#"{"id":"x","cooldown":1.0}"#)
            .unwrap_err();
        assert!(matches!(err, BridgeError::KeyNotFound(_)));
        // Unrelated entries are untouched.
        assert_eq!(registry.resolve::<Record>(&key).unwrap().borrow().id, "fireball");
    }

    #[test]
    fn test_stale_key_from_previous_instance() {
        let mut first = RuntimeRegistry::new();
        let key = first.register("record", shared(fireball()));

        // Simulated process restart: a fresh registry knows nothing.
        let second = RuntimeRegistry::new();
        assert!(second.resolve::<Record>(&key).is_none());
    }

    #[test]
    fn test_ten_thousand_registrations_mint_distinct_keys() {
        let mut registry = RuntimeRegistry::new();
        let mut keys = HashSet::new();
        for _ in 0..10_000 {
            let key = registry.register("record", shared(fireball()));
            assert!(keys.insert(key), "key collision");
        }
        assert_eq!(registry.len(), 10_000);
    }
}
