use serde::{Deserialize, Serialize};

use crate::scene::NodeId;

/// Per-document id source. Counters start after the reserved root id and
/// are never reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    namespace: u8,
    next: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    pub const FIRST_COUNTER: u64 = 2;

    pub fn new() -> Self {
        Self {
            namespace: 0,
            next: Self::FIRST_COUNTER,
        }
    }

    pub fn next_id(&mut self) -> NodeId {
        let id = self.peek();
        self.next += 1;
        id
    }

    /// The id the next call to [`next_id`](Self::next_id) returns.
    pub fn peek(&self) -> NodeId {
        NodeId::new(self.namespace, self.next)
    }

    pub fn issued(&self) -> u64 {
        self.next - Self::FIRST_COUNTER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_after_root() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next_id(), NodeId::new(0, 2));
        assert_eq!(ids.next_id(), NodeId::new(0, 3));
        assert_eq!(ids.peek(), NodeId::new(0, 4));
        assert_eq!(ids.issued(), 2);
    }

    #[test]
    fn test_clones_are_independent() {
        let mut a = IdAllocator::new();
        a.next_id();
        let mut b = a.clone();
        assert_eq!(a.next_id(), b.next_id());
        a.next_id();
        assert_ne!(a.peek(), b.peek());
    }
}
