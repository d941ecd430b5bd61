//! Events driving the logistics simulation.
//!
//! Every state change is triggered by one of two event kinds: a
//! package arriving at a warehouse, or the periodic firing of a
//! transport edge. Events are immutable records placed on the
//! scheduler's priority queue and dispatched in a strict total order,
//! so the run is deterministic regardless of insertion order.

use std::cmp::Ordering;

use crate::package::PackageId;
use crate::time::SimTime;
use crate::warehouse::WarehouseId;

/// A single simulation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A package arrives at a warehouse — either its posting at the
    /// origin or the end of a transit leg.
    Arrival {
        time: SimTime,
        package: PackageId,
        warehouse: WarehouseId,
    },
    /// The periodic firing of the directed edge `from → to`. Carries
    /// no package payload; the firing picks its own cargo from the
    /// section at `from`.
    Transport {
        time: SimTime,
        from: WarehouseId,
        to: WarehouseId,
    },
}

impl Event {
    /// The instant this event fires.
    #[inline]
    pub fn time(&self) -> SimTime {
        match *self {
            Event::Arrival { time, .. } | Event::Transport { time, .. } => time,
        }
    }

    /// Lexicographic sort key. The smaller key fires first:
    ///
    /// 1. time ascending;
    /// 2. arrivals before transports at the same instant, so a package
    ///    landing exactly when its edge fires is eligible for that
    ///    firing (load-before-ship);
    /// 3. two arrivals: package id ascending;
    /// 4. two transports: origin warehouse, then destination.
    ///
    /// No two constructible events share a key: a package has at most
    /// one pending arrival, and each edge has at most one pending
    /// firing per instant.
    fn sort_key(&self) -> (SimTime, u8, u32, u32) {
        match *self {
            Event::Arrival { time, package, .. } => (time, 0, package.raw(), 0),
            Event::Transport { time, from, to } => (time, 1, from.raw(), to.raw()),
        }
    }
}

/// Ordering: smallest sort key first.
///
/// Rust's `BinaryHeap` is a *max*-heap, so the natural ordering is
/// **reversed** here to turn it into a min-heap.
impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        other.sort_key().cmp(&self.sort_key())
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Event::Arrival {
                time,
                package,
                warehouse,
            } => write!(f, "Arrival({}, {} at {})", time, package, warehouse),
            Event::Transport { time, from, to } => {
                write!(f, "Transport({}, {} → {})", time, from, to)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arrival(t: u64, p: u32, w: u32) -> Event {
        Event::Arrival {
            time: SimTime::new(t),
            package: PackageId::new(p),
            warehouse: WarehouseId::new(w),
        }
    }

    fn transport(t: u64, u: u32, v: u32) -> Event {
        Event::Transport {
            time: SimTime::new(t),
            from: WarehouseId::new(u),
            to: WarehouseId::new(v),
        }
    }

    // `Ord` is reversed for the heap, so "fires first" reads as
    // "compares greater" in these assertions.

    #[test]
    fn test_earlier_time_fires_first() {
        assert!(arrival(10, 0, 0) > arrival(20, 0, 0));
        assert!(transport(10, 0, 1) > arrival(20, 0, 0));
    }

    #[test]
    fn test_load_before_ship_at_same_instant() {
        // An arrival at t must be processed before any transport at t.
        assert!(arrival(100, 5, 0) > transport(100, 0, 1));
    }

    #[test]
    fn test_arrival_tiebreak_by_package_id() {
        assert!(arrival(10, 0, 3) > arrival(10, 1, 2));
    }

    #[test]
    fn test_transport_tiebreak_by_edge() {
        assert!(transport(10, 0, 2) > transport(10, 1, 0));
        assert!(transport(10, 1, 0) > transport(10, 1, 2));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", arrival(7, 1, 2)), "Arrival(T=7, P1 at W2)");
        assert_eq!(format!("{}", transport(9, 0, 3)), "Transport(T=9, W0 → W3)");
    }
}
