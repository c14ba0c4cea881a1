//! # Hash Table
//!
//! Open-addressing hash table over pre-hashed 64-bit keys.
//!
//! The storage strategy is data-oriented: three parallel arrays (keys,
//! values, slot states) indexed by slot. Collisions are resolved by linear
//! probing; deletions leave tombstones that later inserts reclaim and
//! resizes drop.

/// Minimum capacity allocated by the first insert.
const MIN_CAPACITY: usize = 8;

/// State of one table slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SlotState {
    /// Never occupied. Probing stops here.
    Empty,
    /// Holds a live entry.
    Occupied,
    /// Held an entry that was removed. Probing continues past it; a later
    /// insert may reclaim it.
    Tombstone,
}

/// Result of probing for a key.
enum Probe {
    /// The key is present at this slot.
    Hit(usize),
    /// The key is absent; `slot` is where it should be inserted (the first
    /// tombstone on the probe path, or the empty slot that ended it).
    Miss {
        /// Preferred insertion slot.
        slot: usize,
    },
}

/// An open-addressing hash table keyed by 64-bit hashes.
///
/// Invariants:
/// - `capacity` is always zero or a power of two
/// - occupied + tombstone slots never exceed `capacity * 3/4`, so probing
///   always terminates at an empty slot
///
/// # Thread Safety
///
/// Not thread-safe. One table per owner; wrap in a lock to share.
///
/// # Example
///
/// ```rust,ignore
/// use ember_core::{key_hash, HashTable};
///
/// let mut table: HashTable<u32> = HashTable::new();
/// *table.find_or_insert(key_hash("ammo")) = 30;
/// assert_eq!(table.get(key_hash("ammo")), Some(&30));
/// ```
pub struct HashTable<V> {
    /// Slot keys. Only meaningful where the state is `Occupied`.
    keys: Box<[u64]>,
    /// Slot values, parallel to `keys`.
    values: Box<[V]>,
    /// Slot states, parallel to `keys`.
    states: Box<[SlotState]>,
    /// Total slot count. Zero or a power of two.
    capacity: usize,
    /// Occupied plus tombstone slots. Bounded by `capacity * 3/4`; only a
    /// resize (which drops tombstones) ever lowers it.
    load: usize,
    /// Occupied slots only.
    len: usize,
}

impl<V> HashTable<V> {
    /// Creates an empty table with no backing storage.
    ///
    /// Capacity zero is a valid state: lookups short-circuit and the first
    /// insert allocates.
    #[must_use]
    pub fn new() -> Self {
        Self {
            keys: Vec::new().into_boxed_slice(),
            values: Vec::new().into_boxed_slice(),
            states: Vec::new().into_boxed_slice(),
            capacity: 0,
            load: 0,
            len: 0,
        }
    }

    /// Returns the number of live entries.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table holds no live entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the total slot count (zero or a power of two).
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Looks up a key.
    ///
    /// # Arguments
    ///
    /// * `key` - The pre-hashed key
    ///
    /// # Returns
    ///
    /// Reference to the value, or `None` if absent (or the table is empty).
    #[must_use]
    pub fn get(&self, key: u64) -> Option<&V> {
        if self.capacity == 0 {
            return None;
        }
        match self.probe(key) {
            Probe::Hit(slot) => Some(&self.values[slot]),
            Probe::Miss { .. } => None,
        }
    }

    /// Looks up a key, mutably.
    ///
    /// # Arguments
    ///
    /// * `key` - The pre-hashed key
    pub fn get_mut(&mut self, key: u64) -> Option<&mut V> {
        if self.capacity == 0 {
            return None;
        }
        match self.probe(key) {
            Probe::Hit(slot) => Some(&mut self.values[slot]),
            Probe::Miss { .. } => None,
        }
    }

    /// Removes a key, leaving a tombstone.
    ///
    /// The tombstone keeps probe paths for other keys intact; it is
    /// reclaimed by a later insert or dropped by the next resize.
    ///
    /// # Arguments
    ///
    /// * `key` - The pre-hashed key
    ///
    /// # Returns
    ///
    /// The removed value, or `None` if the key was absent.
    pub fn remove(&mut self, key: u64) -> Option<V>
    where
        V: Default,
    {
        if self.capacity == 0 {
            return None;
        }
        match self.probe(key) {
            Probe::Hit(slot) => {
                self.states[slot] = SlotState::Tombstone;
                self.len -= 1;
                Some(std::mem::take(&mut self.values[slot]))
            }
            Probe::Miss { .. } => None,
        }
    }

    /// Returns a mutable reference to the value for `key`, inserting a
    /// default-valued entry if the key is absent.
    ///
    /// Resizes first whenever the insert could push the load past the 3/4
    /// bound, so probing always terminates.
    ///
    /// # Arguments
    ///
    /// * `key` - The pre-hashed key
    pub fn find_or_insert(&mut self, key: u64) -> &mut V
    where
        V: Default,
    {
        if self.load + 1 > (self.capacity * 3) / 4 {
            self.grow();
        }
        match self.probe(key) {
            Probe::Hit(slot) => &mut self.values[slot],
            Probe::Miss { slot } => {
                if self.states[slot] == SlotState::Empty {
                    self.load += 1;
                }
                self.states[slot] = SlotState::Occupied;
                self.keys[slot] = key;
                self.values[slot] = V::default();
                self.len += 1;
                &mut self.values[slot]
            }
        }
    }

    /// Inserts a value, replacing any existing entry for the key.
    ///
    /// # Arguments
    ///
    /// * `key` - The pre-hashed key
    /// * `value` - The value to store
    ///
    /// # Returns
    ///
    /// The previous value, or `None` if the key was new.
    pub fn insert(&mut self, key: u64, value: V) -> Option<V>
    where
        V: Default,
    {
        let existed = self.get(key).is_some();
        let prev = std::mem::replace(self.find_or_insert(key), value);
        existed.then_some(prev)
    }

    /// Resets every slot to empty without shrinking the backing arrays.
    ///
    /// Old values stay in the value array until overwritten by later
    /// inserts; they are unreachable through the public API.
    pub fn clear(&mut self) {
        for state in self.states.iter_mut() {
            *state = SlotState::Empty;
        }
        self.load = 0;
        self.len = 0;
    }

    /// Iterates over live entries as `(key, &value)` pairs, in slot order.
    ///
    /// Slot order is unrelated to insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &V)> {
        self.states
            .iter()
            .zip(self.keys.iter())
            .zip(self.values.iter())
            .filter(|((state, _), _)| **state == SlotState::Occupied)
            .map(|((_, key), value)| (*key, value))
    }

    /// Iterates over live entries as `(key, &mut value)` pairs, in slot
    /// order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (u64, &mut V)> {
        self.states
            .iter()
            .zip(self.keys.iter())
            .zip(self.values.iter_mut())
            .filter(|((state, _), _)| **state == SlotState::Occupied)
            .map(|((_, key), value)| (*key, value))
    }

    /// Probes for `key` starting at `key & (capacity - 1)`.
    ///
    /// Requires `capacity > 0`. Terminates because the load-factor bound
    /// guarantees an empty slot exists.
    fn probe(&self, key: u64) -> Probe {
        debug_assert!(self.capacity.is_power_of_two());
        let mask = self.capacity - 1;
        let mut idx = (key as usize) & mask;
        let mut reuse: Option<usize> = None;

        loop {
            match self.states[idx] {
                SlotState::Empty => {
                    return Probe::Miss {
                        slot: reuse.unwrap_or(idx),
                    };
                }
                SlotState::Occupied if self.keys[idx] == key => return Probe::Hit(idx),
                SlotState::Tombstone => {
                    // Remember the first tombstone so the insert reclaims it
                    if reuse.is_none() {
                        reuse = Some(idx);
                    }
                }
                SlotState::Occupied => {}
            }
            idx = (idx + 1) & mask;
        }
    }

    /// Grows to the next power of two at least double the old capacity,
    /// rehashing live entries in slot order and dropping tombstones.
    fn grow(&mut self)
    where
        V: Default,
    {
        let new_capacity = (self.capacity * 2).max(MIN_CAPACITY).next_power_of_two();
        let mask = new_capacity - 1;

        let mut keys = vec![0u64; new_capacity].into_boxed_slice();
        let values: Vec<V> = (0..new_capacity).map(|_| V::default()).collect();
        let mut values = values.into_boxed_slice();
        let mut states = vec![SlotState::Empty; new_capacity].into_boxed_slice();

        for slot in 0..self.capacity {
            if self.states[slot] != SlotState::Occupied {
                continue;
            }
            let key = self.keys[slot];
            let mut idx = (key as usize) & mask;
            while states[idx] == SlotState::Occupied {
                idx = (idx + 1) & mask;
            }
            keys[idx] = key;
            values[idx] = std::mem::take(&mut self.values[slot]);
            states[idx] = SlotState::Occupied;
        }

        self.keys = keys;
        self.values = values;
        self.states = states;
        self.capacity = new_capacity;
        self.load = self.len;
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_short_circuits() {
        let mut table: HashTable<u32> = HashTable::new();
        assert_eq!(table.capacity(), 0);
        assert_eq!(table.get(42), None);
        assert_eq!(table.get_mut(42), None);
        assert_eq!(table.remove(42), None);
        table.clear();
        assert!(table.is_empty());
    }

    #[test]
    fn test_insert_then_get() {
        let mut table: HashTable<u32> = HashTable::new();
        assert_eq!(table.insert(7, 700), None);
        assert_eq!(table.get(7), Some(&700));
        assert_eq!(table.insert(7, 701), Some(700));
        assert_eq!(table.get(7), Some(&701));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_find_or_insert_defaults() {
        let mut table: HashTable<u32> = HashTable::new();
        assert_eq!(*table.find_or_insert(3), 0);
        *table.find_or_insert(3) += 5;
        assert_eq!(table.get(3), Some(&5));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_remove_leaves_no_trace_for_get() {
        let mut table: HashTable<u32> = HashTable::new();
        table.insert(1, 10);
        table.insert(2, 20);
        assert_eq!(table.remove(1), Some(10));
        assert_eq!(table.get(1), None);
        assert_eq!(table.get(2), Some(&20));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_tombstone_does_not_break_probe_chain() {
        let mut table: HashTable<u32> = HashTable::new();
        // Keys that all land on the same initial slot (multiples of the
        // capacity collide under the power-of-two mask).
        table.insert(8, 1);
        table.insert(16, 2);
        table.insert(24, 3);

        // Removing the middle of the chain must not hide the tail.
        table.remove(16);
        assert_eq!(table.get(8), Some(&1));
        assert_eq!(table.get(24), Some(&3));

        // A new colliding key reclaims the tombstone.
        let capacity_before = table.capacity();
        table.insert(32, 4);
        assert_eq!(table.get(32), Some(&4));
        assert_eq!(table.capacity(), capacity_before);
    }

    #[test]
    fn test_growth_preserves_entries() {
        let mut table: HashTable<u64> = HashTable::new();
        for key in 0..200u64 {
            table.insert(key * 31, key);
        }
        assert_eq!(table.len(), 200);
        for key in 0..200u64 {
            assert_eq!(table.get(key * 31), Some(&key));
        }
    }

    #[test]
    fn test_capacity_invariants_hold() {
        let mut table: HashTable<u32> = HashTable::new();
        for key in 0..500u64 {
            table.insert(key, 0);
            assert!(table.capacity().is_power_of_two());
            assert!(table.load <= (table.capacity() * 3) / 4);
        }
    }

    #[test]
    fn test_iteration_yields_exactly_occupied() {
        let mut table: HashTable<u32> = HashTable::new();
        for key in 0..20u64 {
            table.insert(key, 100);
        }
        for key in (0..20u64).step_by(2) {
            table.remove(key);
        }

        let mut seen: Vec<u64> = table.iter().map(|(key, _)| key).collect();
        seen.sort_unstable();
        let expected: Vec<u64> = (0..20).filter(|k| k % 2 == 1).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_iter_mut_updates_values() {
        let mut table: HashTable<u32> = HashTable::new();
        table.insert(1, 1);
        table.insert(2, 2);
        for (_, value) in table.iter_mut() {
            *value *= 10;
        }
        assert_eq!(table.get(1), Some(&10));
        assert_eq!(table.get(2), Some(&20));
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut table: HashTable<u32> = HashTable::new();
        for key in 0..50u64 {
            table.insert(key, 1);
        }
        let capacity = table.capacity();
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.capacity(), capacity);
        assert_eq!(table.get(10), None);
        // Reusable after clearing
        table.insert(10, 5);
        assert_eq!(table.get(10), Some(&5));
    }
}
