//! Node identities and the allocator handing them out.
//!
//! Every [SkillNode](crate::model::SkillNode) gets a [NodeId] when it is
//! created. Ids come from a [NodeIdAllocator], which is a cheap handle on a
//! shared atomic counter: all clones of an allocator draw from the same
//! sequence, so ids never collide between trees built with them.
//!
//! Trees use [NodeIdAllocator::shared] unless configured otherwise, making ids
//! unique across the whole process. Tests (or callers wanting reproducible ids)
//! can pass a fresh [NodeIdAllocator::new] instead.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

// =#========================================================================#=
// NODE ID
// =#========================================================================#=
/// Identity of a node, stable for the lifetime of the node.
///
/// Unlike a [NodeIndex](crate::model::NodeIndex), which is only meaningful
/// within one tree, a [NodeId] is unique among all nodes created from the
/// same [NodeIdAllocator].
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Wraps a raw id value, e.g. one received back from a UI.
    pub fn new(raw: u64) -> Self {
        NodeId(raw)
    }

    /// Returns the raw id value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for NodeId {
    fn from(raw: u64) -> Self {
        NodeId(raw)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =#========================================================================#=
// NODE ID ALLOCATOR
// =#========================================================================#=
/// Monotonic source of [NodeId]s.
///
/// Cloning yields a handle on the same counter. Allocation is lock-free and
/// safe to use from several threads at once.
#[derive(Debug, Clone)]
pub struct NodeIdAllocator {
    next: Arc<AtomicU64>,
}

/// Counter backing [NodeIdAllocator::shared].
static SHARED_COUNTER: OnceLock<Arc<AtomicU64>> = OnceLock::new();

impl NodeIdAllocator {
    /// Creates an allocator with its own counter, starting at `0`.
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Creates an allocator with its own counter, starting at `first`.
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: Arc::new(AtomicU64::new(first)),
        }
    }

    /// Returns a handle on the process-wide counter.
    ///
    /// All trees built with default settings draw their ids from here.
    pub fn shared() -> Self {
        let next = SHARED_COUNTER.get_or_init(|| Arc::new(AtomicU64::new(0)));
        Self { next: Arc::clone(next) }
    }

    /// Hands out the next id. Never returns the same id twice for allocators
    /// sharing a counter.
    pub fn allocate(&self) -> NodeId {
        NodeId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the id the next call to [allocate](Self::allocate) would return.
    pub fn peek_next(&self) -> NodeId {
        NodeId(self.next.load(Ordering::Relaxed))
    }

    /// Returns `true` if both handles draw from the same counter.
    pub fn shares_counter_with(&self, other: &NodeIdAllocator) -> bool {
        Arc::ptr_eq(&self.next, &other.next)
    }
}

impl Default for NodeIdAllocator {
    fn default() -> Self {
        Self::shared()
    }
}

// =#========================================================================#=
// TESTS
// =#========================================================================#=
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn test_fresh_allocator_is_deterministic() {
        let allocator = NodeIdAllocator::new();
        assert_eq!(allocator.allocate(), NodeId::new(0));
        assert_eq!(allocator.allocate(), NodeId::new(1));
        assert_eq!(allocator.peek_next(), NodeId::new(2));
    }

    #[test]
    fn test_clones_share_counter() {
        let a = NodeIdAllocator::starting_at(10);
        let b = a.clone();
        assert!(a.shares_counter_with(&b));
        assert_eq!(a.allocate().get(), 10);
        assert_eq!(b.allocate().get(), 11);
        assert!(!a.shares_counter_with(&NodeIdAllocator::new()));
    }

    #[test]
    fn test_shared_is_one_counter() {
        assert!(NodeIdAllocator::shared().shares_counter_with(&NodeIdAllocator::default()));
    }

    #[test]
    fn test_concurrent_allocation_unique() {
        let allocator = NodeIdAllocator::new();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let allocator = allocator.clone();
                thread::spawn(move || (0..1000).map(|_| allocator.allocate()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "id {id} handed out twice");
            }
        }
        assert_eq!(seen.len(), 4000);
    }
}
