//! Packages and the central package store.
//!
//! A package's identity and itinerary are fixed at init; only its
//! route cursor and its ordering stamp mutate while the simulation
//! runs. All packages live in a single id-indexed [`PackageStore`];
//! sections and events refer to them by [`PackageId`] only, which
//! keeps the ownership graph acyclic.

use crate::time::SimTime;
use crate::warehouse::WarehouseId;

/// A unique identifier for a package.
///
/// Assigned from the posting's 0-based position in the input file.
/// A newtype rather than a bare integer so package ids cannot be
/// confused with warehouse ids or timestamps at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PackageId(u32);

impl PackageId {
    /// Create a package ID from a raw integer.
    #[inline]
    pub fn new(id: u32) -> Self {
        PackageId(id)
    }

    /// Return the underlying integer.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// The id as a store/slab index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for PackageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// A package traversing the warehouse network.
#[derive(Debug, Clone)]
pub struct Package {
    /// Immutable identity.
    pub id: PackageId,
    /// Warehouse where the package entered the network.
    pub origin: WarehouseId,
    /// Final destination warehouse.
    pub destination: WarehouseId,
    /// Time the package was posted at its origin.
    pub posting_time: SimTime,
    /// Precomputed itinerary; `route[0]` is the origin and the last
    /// entry is the final destination.
    route: Vec<WarehouseId>,
    /// Index of the package's current position along `route`.
    /// Advances when the package is stored toward its next hop.
    cursor: usize,
    /// Time the package last entered its current section. This is the
    /// ordering stamp the transport handler uses to pick the oldest
    /// packages first.
    last_touched: SimTime,
}

impl Package {
    /// Create a package with its precomputed route.
    ///
    /// The cursor starts at 0 and the ordering stamp at the posting
    /// time.
    pub fn new(
        id: PackageId,
        origin: WarehouseId,
        destination: WarehouseId,
        posting_time: SimTime,
        route: Vec<WarehouseId>,
    ) -> Self {
        Package {
            id,
            origin,
            destination,
            posting_time,
            route,
            cursor: 0,
            last_touched: posting_time,
        }
    }

    /// The warehouse the route says this package should be at (or
    /// heading to) right now.
    #[inline]
    pub fn current_stop(&self) -> Option<WarehouseId> {
        self.route.get(self.cursor).copied()
    }

    /// The next warehouse along the route, if the route extends past
    /// the current position.
    #[inline]
    pub fn next_hop(&self) -> Option<WarehouseId> {
        self.route.get(self.cursor + 1).copied()
    }

    /// Advance the route cursor after a successful storage.
    #[inline]
    pub fn advance(&mut self) {
        self.cursor += 1;
    }

    /// The ordering stamp.
    #[inline]
    pub fn last_touched(&self) -> SimTime {
        self.last_touched
    }

    /// Restamp the package: it just entered a section or was handled
    /// during a dig at time `t`.
    #[inline]
    pub fn touch(&mut self, t: SimTime) {
        self.last_touched = t;
    }

    /// Selection key for transport firings: oldest stamp first,
    /// package id as the tie-breaker.
    #[inline]
    pub fn age_key(&self) -> (SimTime, PackageId) {
        (self.last_touched, self.id)
    }

    /// The full route, for inspection.
    pub fn route(&self) -> &[WarehouseId] {
        &self.route
    }
}

/// Central slab of all packages, indexed by [`PackageId`].
///
/// Delivered (or discarded) packages are released by clearing their
/// slot; ids are never reused.
#[derive(Debug, Default)]
pub struct PackageStore {
    slots: Vec<Option<Package>>,
}

impl PackageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        PackageStore { slots: Vec::new() }
    }

    /// Insert a package. Its id must equal its slot index.
    pub fn insert(&mut self, package: Package) -> PackageId {
        debug_assert_eq!(package.id.index(), self.slots.len());
        let id = package.id;
        self.slots.push(Some(package));
        id
    }

    /// Look up a live package.
    pub fn get(&self, id: PackageId) -> Option<&Package> {
        self.slots.get(id.index())?.as_ref()
    }

    /// Look up a live package mutably.
    pub fn get_mut(&mut self, id: PackageId) -> Option<&mut Package> {
        self.slots.get_mut(id.index())?.as_mut()
    }

    /// Release a package (delivered or discarded). Returns it if it
    /// was still live.
    pub fn release(&mut self, id: PackageId) -> Option<Package> {
        self.slots.get_mut(id.index())?.take()
    }

    /// Number of packages still live in the store.
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Total number of slots ever allocated.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the store has never held a package.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
