//! The two-phase registration protocol.
//!
//! Content is added locally first and submitted later, in bulk, by
//! `register_all`. Items that register successfully leave the pending set
//! and their keys land in the handle cache; items the host could not take
//! (host absent, operation missing) stay pending and are retried on the next
//! call, which makes the whole protocol idempotent: nothing already
//! registered is ever submitted twice.

use lootforge_bridge::{shared, BridgeError, BridgeResult, HandleCache, OperationRef, Shared, Value};
use serde::Serialize;
use tracing::{debug, warn};

/// Locally added content of one family, awaiting registration.
pub struct PendingSet<T> {
    items: Vec<Shared<T>>,
}

impl<T> Default for PendingSet<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Serialize + 'static> PendingSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item locally. The returned shared handle is the identity later
    /// updates go through.
    pub fn push(&mut self, item: T) -> Shared<T> {
        let cell = shared(item);
        self.items.push(cell.clone());
        cell
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Submit every pending item through `op`, prepending `leading` before
    /// the JSON payload argument. Returns how many registered on this call.
    ///
    /// Outcome handling per item:
    /// - key returned: recorded in `cache`, item leaves the set
    /// - soft failure (host or operation absent): item stays pending
    /// - duplicate: the host kept an earlier registration under this id, so
    ///   retrying is pointless; logged and dropped
    /// - any other failure stops the pass and propagates; unprocessed items
    ///   stay pending
    pub fn register_all(
        &mut self,
        op: &OperationRef,
        leading: &[Value],
        cache: &mut HandleCache,
    ) -> BridgeResult<usize> {
        let mut registered = 0;
        let mut still_pending = Vec::new();
        let mut outcome = Ok(());
        let mut drained = std::mem::take(&mut self.items).into_iter();

        for item in drained.by_ref() {
            if cache.lookup(&item).is_some() {
                // Registered on an earlier pass.
                continue;
            }
            let serialized = serde_json::to_string(&*item.borrow());
            let payload = match serialized {
                Ok(payload) => payload,
                Err(err) => {
                    still_pending.push(item);
                    outcome = Err(BridgeError::Decode(err));
                    break;
                }
            };
            let mut args = leading.to_vec();
            args.push(Value::Str(payload));

            match op.invoke(&args) {
                Ok(Value::Str(key)) => {
                    debug!(operation = op.operation(), key = %key, "registered");
                    cache.record(&item, key);
                    registered += 1;
                }
                Ok(other) => {
                    still_pending.push(item);
                    outcome = Err(BridgeError::SignatureMismatch {
                        operation: op.operation().to_string(),
                        detail: format!("expected str key result, got {}", other.kind()),
                    });
                    break;
                }
                Err(err) if err.is_soft() => {
                    debug!(operation = op.operation(), error = %err, "item stays pending");
                    still_pending.push(item);
                }
                Err(BridgeError::Duplicate { table, id }) => {
                    warn!(%table, %id, "already registered by someone else, dropping");
                }
                Err(err) => {
                    still_pending.push(item);
                    outcome = Err(err);
                    break;
                }
            }
        }

        still_pending.extend(drained);
        self.items = still_pending;
        outcome.map(|()| registered)
    }
}
