//! Identity-keyed object pool
//!
//! Render proxies are expensive host objects, so renderers recycle them
//! instead of creating one per particle. Every resource belongs to the
//! bucket of the prototype it was created from; `get` hands out a free
//! resource from that bucket or creates one, `expire` gives it back.
//!
//! # Architecture
//!
//! ```text
//! Pool<I, K, T>
//!     ├── entries: SlotMap<K, Entry>   (every resource ever created)
//!     └── buckets: I -> Bucket         (free list + active count per prototype)
//! ```
//!
//! Allocations per prototype are bounded by the peak number of
//! concurrently leased resources, not by how many particles ever lived.

use std::collections::HashMap;
use std::hash::Hash;

use slotmap::{Key, SlotMap};

struct Entry<I, T> {
    identity: I,
    active: bool,
    lease: u32,
    value: T,
}

#[derive(Debug)]
struct Bucket<K> {
    free: Vec<K>,
    active: usize,
}

impl<K> Default for Bucket<K> {
    fn default() -> Self {
        Self {
            free: Vec::new(),
            active: 0,
        }
    }
}

/// Pool of `T` resources keyed by `K`, bucketed by prototype identity `I`
pub struct Pool<I, K: Key, T> {
    entries: SlotMap<K, Entry<I, T>>,
    buckets: HashMap<I, Bucket<K>>,
}

impl<I, K, T> Pool<I, K, T>
where
    I: Copy + Eq + Hash,
    K: Key,
{
    /// Create an empty pool
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty pool with room for `capacity` resources
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: SlotMap::with_capacity_and_key(capacity),
            buckets: HashMap::new(),
        }
    }

    /// Lease a resource for `identity`, creating it with `factory` if none is free
    pub fn get(&mut self, identity: I, factory: impl FnOnce() -> T) -> K {
        let bucket = self.buckets.entry(identity).or_default();

        let key = match bucket.free.pop() {
            Some(key) => key,
            None => self.entries.insert(Entry {
                identity,
                active: false,
                lease: 0,
                value: factory(),
            }),
        };

        if let Some(entry) = self.entries.get_mut(key) {
            entry.active = true;
            entry.lease = entry.lease.wrapping_add(1);
        }
        bucket.active += 1;
        key
    }

    /// Return a leased resource to its bucket
    ///
    /// Unknown or already free keys are ignored so redundant teardown is
    /// harmless. Returns whether the resource was actually released.
    pub fn expire(&mut self, key: K) -> bool {
        let Some(entry) = self.entries.get_mut(key) else {
            log::trace!("Ignoring expire of unknown pool key {:?}", key);
            return false;
        };
        if !entry.active {
            log::trace!("Ignoring expire of already free pool key {:?}", key);
            return false;
        }

        entry.active = false;
        if let Some(bucket) = self.buckets.get_mut(&entry.identity) {
            bucket.active -= 1;
            bucket.free.push(key);
        }
        true
    }

    /// Resource behind `key`, leased or free
    pub fn resource(&self, key: K) -> Option<&T> {
        self.entries.get(key).map(|entry| &entry.value)
    }

    /// Mutable resource behind `key`, leased or free
    pub fn resource_mut(&mut self, key: K) -> Option<&mut T> {
        self.entries.get_mut(key).map(|entry| &mut entry.value)
    }

    /// Whether `key` is currently leased
    pub fn is_active(&self, key: K) -> bool {
        self.entries.get(key).is_some_and(|entry| entry.active)
    }

    /// Number of times `key` has been leased
    ///
    /// Keys are recycled as-is, so holders compare this against the value
    /// seen at lease time to tell their lease from a later one.
    pub fn lease_of(&self, key: K) -> Option<u32> {
        self.entries.get(key).map(|entry| entry.lease)
    }

    /// Prototype identity `key` was created for
    pub fn identity_of(&self, key: K) -> Option<I> {
        self.entries.get(key).map(|entry| entry.identity)
    }

    /// Leased resources for `identity`
    pub fn active_count(&self, identity: I) -> usize {
        self.buckets.get(&identity).map_or(0, |bucket| bucket.active)
    }

    /// Free resources waiting for reuse for `identity`
    pub fn free_count(&self, identity: I) -> usize {
        self.buckets.get(&identity).map_or(0, |bucket| bucket.free.len())
    }

    /// Leased resources across all identities
    pub fn total_active(&self) -> usize {
        self.buckets.values().map(|bucket| bucket.active).sum()
    }

    /// Resources created so far, leased or free
    pub fn allocated(&self) -> usize {
        self.entries.len()
    }

    /// Drop every resource and bucket
    pub fn clear(&mut self) {
        self.entries.clear();
        self.buckets.clear();
    }
}

impl<I, K, T> Default for Pool<I, K, T>
where
    I: Copy + Eq + Hash,
    K: Key,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<I, K: Key, T> std::fmt::Debug for Pool<I, K, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let active = self.entries.values().filter(|entry| entry.active).count();
        f.debug_struct("Pool")
            .field("allocated", &self.entries.len())
            .field("active", &active)
            .field("buckets", &self.buckets.len())
            .finish()
    }
}
