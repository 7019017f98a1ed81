//! Static bump-pointer arena.
//!
//! Workloads built for heap-less targets allocate from a fixed byte region
//! with a bump pointer and never free. This type reproduces that contract:
//! allocation past capacity yields `None` (the caller must check before
//! use), individual deallocation does not exist, and `reset` reclaims the
//! whole region between runs.

/// Handle to a region allocated from a [`StaticArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaSlice {
    offset: usize,
    len: usize,
}

impl ArenaSlice {
    /// Length of the allocation in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the allocation is zero-sized.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Fixed-capacity byte arena with bump-pointer allocation.
pub struct StaticArena {
    buf: Box<[u8]>,
    next: usize,
}

impl StaticArena {
    /// Creates an arena with `capacity` bytes of zeroed backing storage.
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: vec![0u8; capacity].into_boxed_slice(),
            next: 0,
        }
    }

    /// Allocates `size` bytes, or `None` when the arena is exhausted.
    pub fn alloc(&mut self, size: usize) -> Option<ArenaSlice> {
        if self.next.checked_add(size)? > self.buf.len() {
            return None;
        }
        let slice = ArenaSlice {
            offset: self.next,
            len: size,
        };
        self.next += size;
        Some(slice)
    }

    /// Borrows an allocation's bytes.
    pub fn get(&self, slice: ArenaSlice) -> &[u8] {
        &self.buf[slice.offset..slice.offset + slice.len]
    }

    /// Mutably borrows an allocation's bytes.
    pub fn get_mut(&mut self, slice: ArenaSlice) -> &mut [u8] {
        &mut self.buf[slice.offset..slice.offset + slice.len]
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Bytes handed out so far.
    pub fn used(&self) -> usize {
        self.next
    }

    /// Reclaims the whole arena, invalidating prior handles' contents.
    pub fn reset(&mut self) {
        self.next = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bump_allocation() {
        let mut arena = StaticArena::new(16);
        let a = arena.alloc(8).unwrap();
        let b = arena.alloc(8).unwrap();
        assert_ne!(a, b);
        arena.get_mut(a)[0] = 0xAA;
        arena.get_mut(b)[0] = 0xBB;
        assert_eq!(arena.get(a)[0], 0xAA);
        assert_eq!(arena.get(b)[0], 0xBB);
        assert_eq!(arena.used(), 16);
    }

    #[test]
    fn exhaustion_returns_none() {
        let mut arena = StaticArena::new(8);
        assert!(arena.alloc(6).is_some());
        assert!(arena.alloc(6).is_none());
        // A failed allocation leaves the arena usable.
        assert!(arena.alloc(2).is_some());
        assert!(arena.alloc(1).is_none());
    }

    #[test]
    fn reset_reclaims() {
        let mut arena = StaticArena::new(4);
        assert!(arena.alloc(4).is_some());
        assert!(arena.alloc(1).is_none());
        arena.reset();
        assert!(arena.alloc(4).is_some());
    }
}
