//! Fixed-chunk pool allocator.
//!
//! A `Pool<T>` services allocation and release of same-shaped elements out of
//! page-aligned blocks subdivided into fixed-size chunks. Free chunks are kept
//! on a LIFO free list threaded through the vacant slots themselves (as slot
//! indices, not raw addresses), so both `allocate` and `release` are O(1) once
//! a block with space exists.
//!
//! Invariants:
//! - Per block, `available + used == chunks_per_block` at all times.
//! - The pool always retains at least one block; the first block is never
//!   returned to the system, even when fully empty.
//! - A non-first block is removed the instant its last element is released.
//! - The most recently released chunk is the first one reused.
//! - Block indices are stable for the lifetime of the pool: removing a block
//!   vacates its index, and the next growth reuses vacated indices, so live
//!   handles never shift.

use std::marker::PhantomData;

const MACHINE_WORD: usize = std::mem::size_of::<usize>();

/// Page size the block layout is validated against.
///
/// Resolved in one place so a platform query can replace the constant without
/// touching the validation contract.
pub fn host_page_size() -> usize {
    4096
}

/// Sizing for one pool: bytes per block, and optionally an explicit chunk
/// size (the accounting unit for chunks-per-block).
///
/// When `chunk_bytes` is `None` the chunk size is derived from the element
/// type: `size_of::<T>()`, floored at one machine word and rounded up to the
/// next power of two so it divides any power-of-two block size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    pub block_bytes: usize,
    pub chunk_bytes: Option<usize>,
}

impl PoolConfig {
    pub const DEFAULT_BLOCK_BYTES: usize = 64 * 1024;

    pub fn with_block_bytes(block_bytes: usize) -> Self {
        Self {
            block_bytes,
            chunk_bytes: None,
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::with_block_bytes(Self::DEFAULT_BLOCK_BYTES)
    }
}

/// Fatal sizing errors, reported at pool construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolConfigError {
    /// `block_bytes` is zero or not a multiple of the host page size.
    BlockNotPageAligned { block_bytes: usize, page_size: usize },
    /// The configured chunk is smaller than one machine word.
    ChunkBelowWordSize { chunk_bytes: usize },
    /// The configured chunk cannot hold one element.
    ChunkTooSmallForElement {
        chunk_bytes: usize,
        element_bytes: usize,
    },
    /// The chunk size does not evenly divide the block size.
    ChunkNotDividingBlock {
        chunk_bytes: usize,
        block_bytes: usize,
    },
}

impl std::fmt::Display for PoolConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PoolConfigError::BlockNotPageAligned {
                block_bytes,
                page_size,
            } => write!(
                f,
                "block size {block_bytes} is not a positive multiple of the page size {page_size}"
            ),
            PoolConfigError::ChunkBelowWordSize { chunk_bytes } => write!(
                f,
                "chunk size {chunk_bytes} is below the machine word size {MACHINE_WORD}"
            ),
            PoolConfigError::ChunkTooSmallForElement {
                chunk_bytes,
                element_bytes,
            } => write!(
                f,
                "chunk size {chunk_bytes} cannot hold a {element_bytes}-byte element"
            ),
            PoolConfigError::ChunkNotDividingBlock {
                chunk_bytes,
                block_bytes,
            } => write!(
                f,
                "chunk size {chunk_bytes} does not evenly divide block size {block_bytes}"
            ),
        }
    }
}

impl std::error::Error for PoolConfigError {}

/// Fatal release errors: the handle does not name a live chunk of this pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolError {
    UnknownHandle { block: u32, slot: u32 },
}

impl std::fmt::Display for PoolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PoolError::UnknownHandle { block, slot } => {
                write!(f, "handle {block}:{slot} is not owned by this pool")
            }
        }
    }
}

impl std::error::Error for PoolError {}

/// Typed handle to one live element.
///
/// Handles are plain indices (block, slot); they stay valid until the element
/// is released and fail with `PoolError::UnknownHandle` afterwards.
pub struct Handle<T> {
    block: u32,
    slot: u32,
    _marker: PhantomData<fn() -> T>,
}

// Manual impls: `T` itself need not be Clone/Copy/Eq for a handle to be.
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.block == other.block && self.slot == other.slot
    }
}

impl<T> Eq for Handle<T> {}

impl<T> std::fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Handle({}:{})", self.block, self.slot)
    }
}

enum Slot<T> {
    Free { next: Option<u32> },
    Occupied(T),
}

struct Block<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<u32>,
    used: usize,
}

impl<T> Block<T> {
    fn with_chunks(chunks: usize) -> Self {
        debug_assert!(chunks > 0, "a block must hold at least one chunk");
        // Pre-thread the free list: each slot links to the next, the last one
        // terminates the list.
        let mut slots = Vec::with_capacity(chunks);
        for i in 0..chunks {
            let next = if i + 1 < chunks {
                Some((i + 1) as u32)
            } else {
                None
            };
            slots.push(Slot::Free { next });
        }
        Self {
            slots,
            free_head: Some(0),
            used: 0,
        }
    }

    fn available(&self) -> usize {
        self.slots.len() - self.used
    }
}

/// Generic fixed-chunk allocator.
pub struct Pool<T> {
    // Indexable block collection; vacated entries are `None` and get reused on
    // the next growth so block indices in live handles stay stable.
    blocks: Vec<Option<Block<T>>>,
    chunks_per_block: usize,
    chunk_bytes: usize,
    block_bytes: usize,
}

impl<T> Pool<T> {
    /// Construct with validated sizing. The first block is resident from
    /// construction onward.
    pub fn with_config(config: PoolConfig) -> Result<Self, PoolConfigError> {
        let element_bytes = std::mem::size_of::<T>();
        let chunk_bytes = config
            .chunk_bytes
            .unwrap_or_else(|| element_bytes.max(MACHINE_WORD).next_power_of_two());
        let page_size = host_page_size();
        if config.block_bytes == 0 || config.block_bytes % page_size != 0 {
            return Err(PoolConfigError::BlockNotPageAligned {
                block_bytes: config.block_bytes,
                page_size,
            });
        }
        if chunk_bytes < MACHINE_WORD {
            return Err(PoolConfigError::ChunkBelowWordSize { chunk_bytes });
        }
        if chunk_bytes < element_bytes {
            return Err(PoolConfigError::ChunkTooSmallForElement {
                chunk_bytes,
                element_bytes,
            });
        }
        if config.block_bytes % chunk_bytes != 0 {
            return Err(PoolConfigError::ChunkNotDividingBlock {
                chunk_bytes,
                block_bytes: config.block_bytes,
            });
        }
        let chunks_per_block = config.block_bytes / chunk_bytes;
        debug_assert!(
            chunks_per_block <= u32::MAX as usize,
            "chunk index must fit a u32"
        );
        let mut pool = Self {
            blocks: Vec::new(),
            chunks_per_block,
            chunk_bytes,
            block_bytes: config.block_bytes,
        };
        pool.grow();
        Ok(pool)
    }

    /// Construct with the default block size.
    ///
    /// Panics only if the element type cannot fit the default block, which is
    /// a programming error in the element type, not an input condition.
    pub fn new() -> Self {
        Self::with_config(PoolConfig::default())
            .expect("default pool configuration is valid for this element type")
    }

    /// Allocate one element. Never fails observably: exhausted pools grow by
    /// appending a block.
    pub fn allocate(&mut self, value: T) -> Handle<T> {
        let block_index = match self
            .blocks
            .iter()
            .position(|entry| entry.as_ref().is_some_and(|b| b.free_head.is_some()))
        {
            Some(index) => index,
            None => self.grow(),
        };
        let block = self.blocks[block_index]
            .as_mut()
            .expect("selected block is resident");
        let slot_index = block.free_head.expect("selected block has a free chunk");
        let slot = &mut block.slots[slot_index as usize];
        match std::mem::replace(slot, Slot::Occupied(value)) {
            Slot::Free { next } => block.free_head = next,
            Slot::Occupied(_) => unreachable!("free list points at an occupied chunk"),
        }
        block.used += 1;
        Handle {
            block: block_index as u32,
            slot: slot_index,
            _marker: PhantomData,
        }
    }

    /// Release the element behind `handle`, returning it to the caller.
    ///
    /// The freed chunk becomes the new free-list head. Releasing the last
    /// element of a non-first block removes that block; the first block stays
    /// resident for the pool's lifetime.
    pub fn release(&mut self, handle: Handle<T>) -> Result<T, PoolError> {
        let unknown = PoolError::UnknownHandle {
            block: handle.block,
            slot: handle.slot,
        };
        let block_index = handle.block as usize;
        let entry = self.blocks.get_mut(block_index).ok_or(unknown)?;
        let block = entry.as_mut().ok_or(unknown)?;
        let free_head = block.free_head;
        let slot = block.slots.get_mut(handle.slot as usize).ok_or(unknown)?;
        let value = match std::mem::replace(slot, Slot::Free { next: free_head }) {
            Slot::Occupied(value) => value,
            Slot::Free { next } => {
                // Stale or foreign handle; restore the slot's original link.
                *slot = Slot::Free { next };
                return Err(unknown);
            }
        };
        block.free_head = Some(handle.slot);
        block.used -= 1;
        if block.used == 0 && block_index != 0 {
            *entry = None;
            #[cfg(any(test, feature = "debug-stats"))]
            log::trace!(target: "pool", "evict empty block {}", block_index);
        }
        Ok(value)
    }

    /// Borrow a live element.
    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        match self
            .blocks
            .get(handle.block as usize)?
            .as_ref()?
            .slots
            .get(handle.slot as usize)?
        {
            Slot::Occupied(value) => Some(value),
            Slot::Free { .. } => None,
        }
    }

    /// Mutably borrow a live element.
    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        match self
            .blocks
            .get_mut(handle.block as usize)?
            .as_mut()?
            .slots
            .get_mut(handle.slot as usize)?
        {
            Slot::Occupied(value) => Some(value),
            Slot::Free { .. } => None,
        }
    }

    /// Number of resident blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.iter().filter(|entry| entry.is_some()).count()
    }

    /// Total live elements across all blocks.
    pub fn used_chunks(&self) -> usize {
        self.live_blocks().map(|b| b.used).sum()
    }

    /// Total free chunks across all resident blocks.
    pub fn available_chunks(&self) -> usize {
        self.live_blocks().map(Block::available).sum()
    }

    pub fn chunks_per_block(&self) -> usize {
        self.chunks_per_block
    }

    pub fn chunk_bytes(&self) -> usize {
        self.chunk_bytes
    }

    pub fn block_bytes(&self) -> usize {
        self.block_bytes
    }

    fn live_blocks(&self) -> impl Iterator<Item = &Block<T>> {
        self.blocks.iter().filter_map(Option::as_ref)
    }

    fn grow(&mut self) -> usize {
        let block = Block::with_chunks(self.chunks_per_block);
        let index = match self.blocks.iter().position(Option::is_none) {
            Some(vacant) => {
                self.blocks[vacant] = Some(block);
                vacant
            }
            None => {
                self.blocks.push(Some(block));
                self.blocks.len() - 1
            }
        };
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(
            target: "pool",
            "grow: block={} chunks={}",
            index,
            self.chunks_per_block
        );
        index
    }
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_pool() -> Pool<u64> {
        // 4096-byte blocks with 1024-byte accounting chunks: 4 chunks per block.
        Pool::with_config(PoolConfig {
            block_bytes: 4096,
            chunk_bytes: Some(1024),
        })
        .expect("test pool config is valid")
    }

    fn assert_block_invariants<T>(pool: &Pool<T>) {
        assert!(pool.block_count() >= 1, "pool must never have zero blocks");
        for block in pool.live_blocks() {
            assert_eq!(
                block.available() + block.used,
                pool.chunks_per_block(),
                "available + used must equal chunks per block"
            );
        }
    }

    #[test]
    fn new_pool_has_one_resident_block() {
        let pool: Pool<u64> = small_pool();
        assert_eq!(pool.block_count(), 1);
        assert_eq!(pool.used_chunks(), 0);
        assert_eq!(pool.available_chunks(), 4);
        assert_block_invariants(&pool);
    }

    #[test]
    fn allocate_release_roundtrip_reuses_the_freed_chunk() {
        let mut pool = small_pool();
        let first = pool.allocate(7);
        assert_eq!(pool.release(first), Ok(7));
        let second = pool.allocate(8);
        assert_eq!(first, second, "freed chunk must be reused first");
        assert_eq!(pool.get(second), Some(&8));
    }

    #[test]
    fn most_recently_freed_chunk_is_reused_first() {
        let mut pool = small_pool();
        let a = pool.allocate(1);
        let b = pool.allocate(2);
        let c = pool.allocate(3);
        assert_eq!(pool.release(a), Ok(1));
        assert_eq!(pool.release(c), Ok(3));
        let next = pool.allocate(4);
        assert_eq!(next, c, "LIFO free list reuses the last freed chunk");
        let next = pool.allocate(5);
        assert_eq!(next, a);
        assert_eq!(pool.get(b), Some(&2));
        assert_block_invariants(&pool);
    }

    #[test]
    fn invariants_hold_across_growth_and_churn() {
        let mut pool = small_pool();
        let mut handles = Vec::new();
        for i in 0..11u64 {
            handles.push(pool.allocate(i));
            assert_block_invariants(&pool);
        }
        assert_eq!(pool.block_count(), 3);
        assert_eq!(pool.used_chunks(), 11);
        for handle in handles.drain(..).rev() {
            pool.release(handle).expect("handle is live");
            assert_block_invariants(&pool);
        }
        assert_eq!(pool.used_chunks(), 0);
    }

    #[test]
    fn releasing_last_chunk_of_non_first_block_evicts_it() {
        let mut pool = small_pool();
        let mut first_block = Vec::new();
        for i in 0..4u64 {
            first_block.push(pool.allocate(i));
        }
        let overflow = pool.allocate(99);
        assert_eq!(pool.block_count(), 2);
        assert_eq!(pool.release(overflow), Ok(99));
        assert_eq!(pool.block_count(), 1, "emptied non-first block is removed");
        assert_block_invariants(&pool);
    }

    #[test]
    fn first_block_stays_resident_when_fully_drained() {
        let mut pool = small_pool();
        let a = pool.allocate(1);
        let b = pool.allocate(2);
        pool.release(b).expect("b is live");
        pool.release(a).expect("a is live");
        assert_eq!(pool.block_count(), 1);
        assert_eq!(pool.used_chunks(), 0);
        assert_eq!(pool.available_chunks(), 4);
    }

    #[test]
    fn block_indices_stay_stable_across_eviction() {
        let mut pool = small_pool();
        let mut handles = Vec::new();
        for i in 0..12u64 {
            handles.push(pool.allocate(i));
        }
        assert_eq!(pool.block_count(), 3);
        // Drain the middle block (handles 4..8); the third block's handles
        // must stay valid.
        for handle in handles[4..8].iter() {
            pool.release(*handle).expect("middle block handle is live");
        }
        assert_eq!(pool.block_count(), 2);
        for (i, handle) in handles[8..12].iter().enumerate() {
            assert_eq!(pool.get(*handle), Some(&(8 + i as u64)));
        }
        // The vacated block index is reused by the next growth.
        let reused = pool.allocate(100);
        assert_eq!(pool.block_count(), 3);
        assert_eq!(pool.get(reused), Some(&100));
    }

    #[test]
    fn release_of_stale_handle_fails() {
        let mut pool = small_pool();
        let handle = pool.allocate(1);
        assert_eq!(pool.release(handle), Ok(1));
        assert!(matches!(
            pool.release(handle),
            Err(PoolError::UnknownHandle { .. })
        ));
        assert_eq!(pool.get(handle), None);
    }

    #[test]
    fn release_of_out_of_range_handle_fails() {
        let mut pool_a = small_pool();
        let mut pool_b = Pool::<u64>::with_config(PoolConfig {
            block_bytes: 8192,
            chunk_bytes: Some(1024),
        })
        .expect("test pool config is valid");
        for i in 0..8 {
            let _ = pool_b.allocate(i);
        }
        // A handle into pool_b's second block names no chunk of pool_a.
        let foreign = pool_b.allocate(6);
        assert!(matches!(
            pool_a.release(foreign),
            Err(PoolError::UnknownHandle { .. })
        ));
    }

    #[test]
    fn config_rejects_unaligned_block() {
        let err = Pool::<u64>::with_config(PoolConfig {
            block_bytes: 1000,
            chunk_bytes: None,
        })
        .err();
        assert!(matches!(
            err,
            Some(PoolConfigError::BlockNotPageAligned { .. })
        ));
        let err = Pool::<u64>::with_config(PoolConfig {
            block_bytes: 0,
            chunk_bytes: None,
        })
        .err();
        assert!(matches!(
            err,
            Some(PoolConfigError::BlockNotPageAligned { .. })
        ));
    }

    #[test]
    fn config_rejects_chunk_below_word_size() {
        let err = Pool::<u8>::with_config(PoolConfig {
            block_bytes: 4096,
            chunk_bytes: Some(2),
        })
        .err();
        assert!(matches!(
            err,
            Some(PoolConfigError::ChunkBelowWordSize { .. })
        ));
    }

    #[test]
    fn config_rejects_chunk_too_small_for_element() {
        let err = Pool::<[u8; 64]>::with_config(PoolConfig {
            block_bytes: 4096,
            chunk_bytes: Some(16),
        })
        .err();
        assert!(matches!(
            err,
            Some(PoolConfigError::ChunkTooSmallForElement { .. })
        ));
    }

    #[test]
    fn config_rejects_chunk_not_dividing_block() {
        let err = Pool::<u64>::with_config(PoolConfig {
            block_bytes: 8192,
            chunk_bytes: Some(3072),
        })
        .err();
        assert!(matches!(
            err,
            Some(PoolConfigError::ChunkNotDividingBlock { .. })
        ));
    }

    #[test]
    fn get_mut_mutates_in_place() {
        let mut pool = small_pool();
        let handle = pool.allocate(1);
        if let Some(value) = pool.get_mut(handle) {
            *value = 42;
        }
        assert_eq!(pool.release(handle), Ok(42));
    }

    #[test]
    fn derived_chunk_size_is_word_floored_power_of_two() {
        let pool: Pool<u8> = Pool::with_config(PoolConfig::default()).expect("valid");
        assert_eq!(pool.chunk_bytes(), std::mem::size_of::<usize>());
        let pool: Pool<[u8; 24]> = Pool::with_config(PoolConfig::default()).expect("valid");
        assert_eq!(pool.chunk_bytes(), 32);
    }
}
