//! Caller-side cache of opaque keys.
//!
//! Mirrors the host's key space from the plugin's perspective: after a
//! successful add, the key the host returned is recorded against the
//! caller-local object, and every later update consults the cache first.
//!
//! Equality is identity-based, never value-based: the cache answers "which
//! key belongs to *this* in-memory instance". A copy of a registered object
//! has a different identity and will not be found, which makes an update
//! through it silently fail rather than touch the wrong entry. Each entry
//! holds a strong reference to its object, so a mapped address stays
//! allocated and can never be handed to a newcomer while the cache lives.

use crate::registry::Shared;
use std::any::Any;
use std::collections::HashMap;
use std::rc::Rc;

struct Entry {
    // Keeps the address in the map key alive for as long as it is mapped.
    _object: Rc<dyn Any>,
    key: String,
}

/// Maps caller-local object identity to the opaque key the host returned.
#[derive(Default)]
pub struct HandleCache {
    entries: HashMap<usize, Entry>,
}

fn identity<T>(object: &Shared<T>) -> usize {
    Rc::as_ptr(object) as *const () as usize
}

impl HandleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the key returned for a successfully added object.
    pub fn record<T: 'static>(&mut self, object: &Shared<T>, key: String) {
        self.entries.insert(
            identity(object),
            Entry {
                _object: object.clone() as Rc<dyn Any>,
                key,
            },
        );
    }

    /// Look up the key for a previously added object, by identity.
    pub fn lookup<T>(&self, object: &Shared<T>) -> Option<&str> {
        self.entries
            .get(&identity(object))
            .map(|entry| entry.key.as_str())
    }

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
    use crate::registry::shared;

    #[test]
    fn test_record_and_lookup_by_identity() {
        let mut cache = HandleCache::new();
        let object = shared(vec![1, 2, 3]);
        cache.record(&object, "vec_1".to_string());

        assert_eq!(cache.lookup(&object), Some("vec_1"));
        let clone = Rc::clone(&object);
        assert_eq!(cache.lookup(&clone), Some("vec_1"));
    }

    #[test]
    fn test_value_equal_copy_is_not_found() {
        let mut cache = HandleCache::new();
        let original = shared("content".to_string());
        cache.record(&original, "str_1".to_string());

        // Same value, different instance: not the registered object.
        let copy = shared("content".to_string());
        assert_eq!(cache.lookup(&copy), None);
    }

    #[test]
    fn test_distinct_objects_keep_distinct_keys() {
        let mut cache = HandleCache::new();
        let a = shared(1u32);
        let b = shared(1u32);
        cache.record(&a, "u32_1".to_string());
        cache.record(&b, "u32_2".to_string());

        assert_eq!(cache.lookup(&a), Some("u32_1"));
        assert_eq!(cache.lookup(&b), Some("u32_2"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_dropped_handle_never_aliases_a_newcomer() {
        let mut cache = HandleCache::new();
        let object = shared(1u32);
        cache.record(&object, "record_1".to_string());
        drop(object);

        // The cache anchors the recorded allocation, so the allocator can
        // never hand its address to a fresh object; a newcomer of the same
        // shape must not inherit the dead handle's key.
        for _ in 0..64 {
            let newcomer = shared(2u32);
            assert_eq!(cache.lookup(&newcomer), None);
        }
        assert_eq!(cache.len(), 1);
    }
}
