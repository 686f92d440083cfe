// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RowId(i64);

impl RowId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for RowId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Process-lifetime monotonic id source. Every id handed out is strictly
/// greater than all ids seen at construction and all ids allocated before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIdAllocator {
    next: i64,
}

impl RowIdAllocator {
    pub const fn starting_at(next: i64) -> Self {
        Self { next }
    }

    /// Seeds the counter one past the maximum of `ids` (one for an empty set).
    pub fn above<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = RowId>,
    {
        let max = ids.into_iter().map(RowId::get).max().unwrap_or(0);
        Self { next: max + 1 }
    }

    pub fn allocate(&mut self) -> RowId {
        let id = RowId::new(self.next);
        self.next += 1;
        id
    }

    pub const fn peek(&self) -> RowId {
        RowId::new(self.next)
    }
}

#[cfg(test)]
mod tests {
    use super::{RowId, RowIdAllocator};

    #[test]
    fn allocator_seeds_above_existing_ids() {
        let ids = [RowId::new(3), RowId::new(100_000), RowId::new(7)];
        let mut allocator = RowIdAllocator::above(ids);
        assert_eq!(allocator.allocate(), RowId::new(100_001));
        assert_eq!(allocator.allocate(), RowId::new(100_002));
    }

    #[test]
    fn allocator_over_empty_set_starts_at_one() {
        let mut allocator = RowIdAllocator::above(std::iter::empty());
        assert_eq!(allocator.allocate(), RowId::new(1));
    }

    #[test]
    fn peek_does_not_advance() {
        let mut allocator = RowIdAllocator::starting_at(5);
        assert_eq!(allocator.peek(), RowId::new(5));
        assert_eq!(allocator.peek(), RowId::new(5));
        assert_eq!(allocator.allocate(), RowId::new(5));
        assert_eq!(allocator.peek(), RowId::new(6));
    }
}
