//! # Hermes — deterministic parcel-logistics simulator
//!
//! A discrete-event simulation of a parcel network. Warehouses form a
//! directed graph; packages are posted into the network, routed along
//! BFS-shortest paths, and moved by periodic transport firings that
//! dig through per-edge LIFO sections. No threads, no wall-clock
//! time — just state mutations driven by a logical clock, producing a
//! byte-reproducible trace.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────┐
//! │        Simulation          │ ← execution loop + handlers
//! │  ┌─────────────────────┐  │
//! │  │     Scheduler        │  │ ← deterministic min-heap
//! │  └─────────────────────┘  │
//! │  ┌─────────────────────┐  │
//! │  │ Warehouses/Sections  │  │ ← per-edge LIFO stacks
//! │  └─────────────────────┘  │
//! │  ┌─────────────────────┐  │
//! │  │   PackageStore       │  │ ← id-indexed slab
//! │  └─────────────────────┘  │
//! │  ┌─────────────────────┐  │
//! │  │    LogEmitter        │  │ ← canonical trace lines
//! │  └─────────────────────┘  │
//! └───────────────────────────┘
//! ```

pub mod error;
pub mod event;
pub mod input;
pub mod network;
pub mod package;
pub mod report;
pub mod scheduler;
pub mod simulation;
pub mod time;
pub mod warehouse;

// Re-exports for convenience.
pub use error::{SimError, SimResult};
pub use event::Event;
pub use input::{ParseError, Posting, Scenario, SimParams};
pub use network::Network;
pub use package::{Package, PackageId, PackageStore};
pub use report::{LogEmitter, Record};
pub use scheduler::Scheduler;
pub use simulation::{SimStats, Simulation};
pub use time::SimTime;
pub use warehouse::{Section, Warehouse, WarehouseId};
