//! The resource ledger - token accounting for the shared resource pool.

use schedsim_core::{ResourceId, ResourceSpec, TaskId};
use std::collections::BTreeMap;
use tracing::debug;

/// Runtime state of one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ResourceState {
    name: String,
    capacity: u32,
    available: u32,
    /// Current holders in acquisition order; len ≤ capacity.
    owners: Vec<TaskId>,
}

impl ResourceState {
    /// Owner rendering used by snapshots: `"0"` when free, else the
    /// owner ids joined by commas.
    fn owners_string(&self) -> String {
        if self.owners.is_empty() {
            "0".to_string()
        } else {
            self.owners
                .iter()
                .map(|tid| tid.to_string())
                .collect::<Vec<_>>()
                .join(",")
        }
    }
}

/// The sole owner of resource token/owner state.
///
/// Every mutation goes through `acquire`/`release`; a multi-resource
/// request is atomic: a failed [`ResourceLedger::acquire_all`] leaves the
/// ledger exactly as it was before the attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLedger {
    resources: BTreeMap<ResourceId, ResourceState>,
}

impl ResourceLedger {
    /// Build the ledger from resource descriptors, ids assigned by
    /// 1-based position.
    pub fn new(specs: &[ResourceSpec]) -> Self {
        let resources = specs
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                (
                    ResourceId::new(i as u32 + 1),
                    ResourceState {
                        name: spec.name.clone(),
                        capacity: spec.capacity,
                        available: spec.capacity,
                        owners: Vec::new(),
                    },
                )
            })
            .collect();
        Self { resources }
    }

    /// Number of resources in the pool.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Try to grant one token of `rid` to `tid`.
    ///
    /// Fails when no token is available or when `rid` names no configured
    /// resource - an unknown id is an ordinary failure, never an error.
    pub fn acquire(&mut self, rid: ResourceId, tid: TaskId) -> bool {
        let Some(state) = self.resources.get_mut(&rid) else {
            debug!(resource = %rid, task = %tid, "acquire failed: unknown resource");
            return false;
        };
        if state.available == 0 {
            return false;
        }
        state.available -= 1;
        state.owners.push(tid);
        true
    }

    /// Return `tid`'s token for `rid`. No-op when `tid` is not an owner
    /// or `rid` is unknown.
    pub fn release(&mut self, rid: ResourceId, tid: TaskId) {
        if let Some(state) = self.resources.get_mut(&rid) {
            if let Some(pos) = state.owners.iter().position(|owner| *owner == tid) {
                state.owners.remove(pos);
                state.available += 1;
            }
        }
    }

    /// Atomically acquire every resource in `required`, in order.
    ///
    /// On the first individual failure, every resource acquired during
    /// this attempt is released before returning `false` - the task is
    /// never left holding a strict subset of its requirement.
    pub fn acquire_all(&mut self, tid: TaskId, required: &[ResourceId]) -> bool {
        let mut acquired: Vec<ResourceId> = Vec::with_capacity(required.len());
        for &rid in required {
            if self.acquire(rid, tid) {
                acquired.push(rid);
            } else {
                for &held in &acquired {
                    self.release(held, tid);
                }
                debug!(task = %tid, resource = %rid, "acquire_all rolled back");
                return false;
            }
        }
        true
    }

    /// Release every resource in `required`; each entry is a no-op when
    /// `tid` does not own a token for it.
    pub fn release_all(&mut self, tid: TaskId, required: &[ResourceId]) {
        for &rid in required {
            self.release(rid, tid);
        }
    }

    /// Per-resource owner renderings, lowest resource id first.
    pub fn status(&self) -> Vec<String> {
        self.resources
            .values()
            .map(ResourceState::owners_string)
            .collect()
    }

    /// Whether `available + |owners| == capacity` holds for every
    /// resource. Exposed for tests and debug assertions.
    pub fn capacity_invariant_holds(&self) -> bool {
        self.resources
            .values()
            .all(|state| state.available + state.owners.len() as u32 == state.capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> ResourceLedger {
        ResourceLedger::new(&[
            ResourceSpec::new("Printer", 1),
            ResourceSpec::new("Scanner", 2),
        ])
    }

    fn rid(n: u32) -> ResourceId {
        ResourceId::new(n)
    }

    fn tid(n: u32) -> TaskId {
        TaskId::new(n)
    }

    #[test]
    fn acquire_grants_until_capacity() {
        let mut l = ledger();
        assert!(l.acquire(rid(2), tid(1)));
        assert!(l.acquire(rid(2), tid(2)));
        assert!(!l.acquire(rid(2), tid(3)));
        assert!(l.capacity_invariant_holds());
        assert_eq!(l.status(), vec!["0", "1,2"]);
    }

    #[test]
    fn release_is_noop_for_non_owner() {
        let mut l = ledger();
        assert!(l.acquire(rid(1), tid(1)));
        l.release(rid(1), tid(2));
        assert_eq!(l.status(), vec!["1", "0"]);
        l.release(rid(1), tid(1));
        assert_eq!(l.status(), vec!["0", "0"]);
        assert!(l.capacity_invariant_holds());
    }

    #[test]
    fn unknown_resource_fails_without_panicking() {
        let mut l = ledger();
        assert!(!l.acquire(rid(9), tid(1)));
        l.release(rid(9), tid(1));
        assert!(l.capacity_invariant_holds());
    }

    #[test]
    fn acquire_all_rolls_back_on_partial_failure() {
        let mut l = ledger();
        assert!(l.acquire(rid(1), tid(9)));
        let before = l.clone();

        // rid(1) is exhausted, so the second entry must fail and the
        // scanner token taken by this attempt must come back.
        assert!(!l.acquire_all(tid(1), &[rid(2), rid(1)]));
        assert_eq!(l, before);
    }

    #[test]
    fn acquire_all_rolls_back_on_dangling_reference() {
        let mut l = ledger();
        let before = l.clone();
        assert!(!l.acquire_all(tid(1), &[rid(1), rid(2), rid(42)]));
        assert_eq!(l, before);
    }

    #[test]
    fn duplicate_entries_consume_one_token_each() {
        let mut l = ledger();
        // Scanner has two tokens, so the same task may take both.
        assert!(l.acquire_all(tid(1), &[rid(2), rid(2)]));
        assert_eq!(l.status(), vec!["0", "1,1"]);

        // Printer has one token; requiring it twice can never succeed.
        let before = l.clone();
        assert!(!l.acquire_all(tid(2), &[rid(1), rid(1)]));
        assert_eq!(l, before);

        l.release_all(tid(1), &[rid(2), rid(2)]);
        assert_eq!(l.status(), vec!["0", "0"]);
        assert!(l.capacity_invariant_holds());
    }

    #[test]
    fn release_all_tolerates_unowned_entries() {
        let mut l = ledger();
        assert!(l.acquire(rid(1), tid(1)));
        l.release_all(tid(1), &[rid(1), rid(2), rid(42)]);
        assert_eq!(l.status(), vec!["0", "0"]);
        assert!(l.capacity_invariant_holds());
    }
}
