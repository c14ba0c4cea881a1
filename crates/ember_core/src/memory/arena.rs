//! # Arena Allocator
//!
//! A bump allocator over a list of growable blocks. Every allocation stays
//! valid until the whole arena is torn down; nothing is freed individually.
//!
//! This is the backing store for one parse of a configuration or asset
//! file: the parser bumps nodes and error strings out of the arena, and the
//! finished document is destroyed by dropping the arena in one shot.

/// Alignment of every bump allocation, in bytes.
const ALIGNMENT: usize = 16;

/// Default payload of a block: one 4 KiB page minus header overhead.
const BLOCK_PAYLOAD: usize = 4096 - 64;

/// Rounds `n` up to the next multiple of [`ALIGNMENT`].
#[inline]
const fn align_up(n: usize) -> usize {
    (n + ALIGNMENT - 1) & !(ALIGNMENT - 1)
}

/// One fixed-capacity block of arena storage.
///
/// Blocks are never resized or dropped while the arena is alive, so offsets
/// into a block stay valid for the arena's entire lifetime.
struct Block {
    /// The zero-initialized backing bytes.
    data: Box<[u8]>,
    /// Bump offset: bytes `[0, used)` have been handed out.
    used: usize,
}

impl Block {
    /// Creates a block with at least `capacity` bytes of payload.
    fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            used: 0,
        }
    }

    /// Remaining bytes after aligning the bump offset.
    #[inline]
    fn remaining(&self) -> usize {
        self.data.len().saturating_sub(align_up(self.used))
    }
}

/// Handle to a bump allocation.
///
/// The safe stand-in for a raw arena pointer: a `(block, offset, len)`
/// triple resolved through [`Arena::bytes`] / [`Arena::bytes_mut`]. Handles
/// are `Copy` and stay valid until [`Arena::reset`] or drop; a stale handle
/// resolves to `None` rather than dangling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaSlice {
    /// Index of the owning block.
    block: usize,
    /// Byte offset within the block. Always 16-byte aligned.
    offset: usize,
    /// Length of the allocation in bytes.
    len: usize,
}

impl ArenaSlice {
    /// Returns the length of the allocation in bytes.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the allocation is zero-sized.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the byte offset within the owning block.
    ///
    /// Exposed so callers can assert the 16-byte alignment guarantee.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }
}

/// Handle to a NUL-terminated string copied into the arena.
///
/// Returned by [`Arena::bump_str`]; resolved through [`Arena::str_of`].
/// The reported length excludes the trailing NUL byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaStr {
    /// The underlying allocation (length excludes the NUL terminator).
    slice: ArenaSlice,
}

impl ArenaStr {
    /// Returns the string length in bytes, excluding the NUL terminator.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.slice.len()
    }

    /// Returns `true` if the string is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.slice.is_empty()
    }
}

/// A bump-pointer arena over a list of fixed blocks.
///
/// Allocation is a pointer bump; teardown frees every block at once. The
/// most recently opened block is the only one bumped from; earlier blocks
/// keep their contents untouched until teardown.
///
/// # Thread Safety
///
/// This arena is NOT thread-safe. Use one arena per parse, per thread.
///
/// # Example
///
/// ```rust,ignore
/// let mut arena = Arena::new();
///
/// let node = arena.bump(48);
/// let msg = arena.bump_str("expected ':' on line 3");
///
/// // Everything at once - no per-object frees
/// arena.reset();
/// ```
pub struct Arena {
    /// The block list. The last entry is the active "head" block.
    blocks: Vec<Block>,
}

impl Arena {
    /// Creates an empty arena with no blocks.
    ///
    /// The first [`bump`](Self::bump) opens the first block.
    #[must_use]
    pub const fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Allocates `size` bytes, 16-byte aligned and zero-filled.
    ///
    /// The returned handle stays valid until [`reset`](Self::reset) or drop.
    /// This never fails: if the process cannot allocate a new block the
    /// global allocator aborts, consistent with the engine's no-exceptions
    /// policy.
    ///
    /// # Arguments
    ///
    /// * `size` - Number of bytes to allocate (zero is valid)
    pub fn bump(&mut self, size: usize) -> ArenaSlice {
        let block = self.block_with_room(size);
        let entry = &mut self.blocks[block];
        let offset = align_up(entry.used);
        entry.used = offset + size;

        ArenaSlice {
            block,
            offset,
            len: size,
        }
    }

    /// Copies `s` plus a trailing NUL byte into the arena.
    ///
    /// The copy is independent of the source: it stays readable after the
    /// original string is dropped. Parser error messages go through here so
    /// they outlive the source buffer being parsed.
    ///
    /// # Arguments
    ///
    /// * `s` - The string to copy
    pub fn bump_str(&mut self, s: &str) -> ArenaStr {
        let alloc = self.bump(s.len() + 1);
        let entry = &mut self.blocks[alloc.block];
        entry.data[alloc.offset..alloc.offset + s.len()].copy_from_slice(s.as_bytes());
        entry.data[alloc.offset + s.len()] = 0;

        ArenaStr {
            slice: ArenaSlice {
                len: s.len(),
                ..alloc
            },
        }
    }

    /// Resolves a handle to its bytes.
    ///
    /// # Returns
    ///
    /// The allocation's bytes, or `None` if the handle is stale (issued
    /// before a [`reset`](Self::reset)).
    #[inline]
    #[must_use]
    pub fn bytes(&self, slice: ArenaSlice) -> Option<&[u8]> {
        self.blocks
            .get(slice.block)?
            .data
            .get(slice.offset..slice.offset + slice.len)
    }

    /// Resolves a handle to its bytes, mutably.
    ///
    /// # Returns
    ///
    /// The allocation's bytes, or `None` if the handle is stale.
    #[inline]
    pub fn bytes_mut(&mut self, slice: ArenaSlice) -> Option<&mut [u8]> {
        self.blocks
            .get_mut(slice.block)?
            .data
            .get_mut(slice.offset..slice.offset + slice.len)
    }

    /// Resolves a string handle to its text.
    ///
    /// # Returns
    ///
    /// The copied string (without the NUL terminator), or `None` if the
    /// handle is stale.
    #[inline]
    #[must_use]
    pub fn str_of(&self, s: ArenaStr) -> Option<&str> {
        std::str::from_utf8(self.bytes(s.slice)?).ok()
    }

    /// Returns the number of bytes bumped across all blocks.
    #[inline]
    #[must_use]
    pub fn used(&self) -> usize {
        self.blocks.iter().map(|b| b.used).sum()
    }

    /// Returns the number of blocks currently allocated.
    #[inline]
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if nothing has been allocated.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Tears the arena down: frees every block at once.
    ///
    /// All previously returned handles become stale and resolve to `None`.
    pub fn reset(&mut self) {
        self.blocks.clear();
    }

    /// Returns the index of a block with room for `size` aligned bytes,
    /// opening a new head block if the current one is too full.
    ///
    /// A request larger than [`BLOCK_PAYLOAD`] gets a block sized to the
    /// request, so oversized allocations always succeed.
    fn block_with_room(&mut self, size: usize) -> usize {
        if let Some(head) = self.blocks.last() {
            if head.remaining() >= size {
                return self.blocks.len() - 1;
            }
        }

        self.blocks.push(Block::with_capacity(size.max(BLOCK_PAYLOAD)));
        self.blocks.len() - 1
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}
