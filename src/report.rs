//! Structured trace records and the line emitter.
//!
//! Every observable state change a package undergoes becomes a
//! [`Record`]; the [`LogEmitter`] renders records into the canonical
//! line format on its sink. The line format is a contract: timestamps
//! are zero-padded to width 7, package and warehouse ids to width 3.

use std::io::{self, Write};

use crate::package::PackageId;
use crate::time::SimTime;
use crate::warehouse::WarehouseId;

/// One line of the simulation trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record {
    /// Package stored in a section, waiting for its edge to fire.
    Stored {
        time: SimTime,
        package: PackageId,
        warehouse: WarehouseId,
        section: WarehouseId,
    },
    /// Package surfaced from a section during a dig.
    Removed {
        time: SimTime,
        package: PackageId,
        warehouse: WarehouseId,
        section: WarehouseId,
    },
    /// Surfaced blocker pushed back into its section.
    Restored {
        time: SimTime,
        package: PackageId,
        warehouse: WarehouseId,
        section: WarehouseId,
    },
    /// Package shipped along an edge.
    InTransit {
        time: SimTime,
        package: PackageId,
        from: WarehouseId,
        to: WarehouseId,
    },
    /// Package reached its final destination.
    Delivered {
        time: SimTime,
        package: PackageId,
        warehouse: WarehouseId,
    },
}

impl Record {
    /// The timestamp leading the record's line.
    pub fn time(&self) -> SimTime {
        match *self {
            Record::Stored { time, .. }
            | Record::Removed { time, .. }
            | Record::Restored { time, .. }
            | Record::InTransit { time, .. }
            | Record::Delivered { time, .. } => time,
        }
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Record::Stored {
                time,
                package,
                warehouse,
                section,
            } => write!(
                f,
                "{:07} pacote {:03} armazenado em {:03} na secao {:03}",
                time.ticks(),
                package.raw(),
                warehouse.raw(),
                section.raw()
            ),
            Record::Removed {
                time,
                package,
                warehouse,
                section,
            } => write!(
                f,
                "{:07} pacote {:03} removido de {:03} na secao {:03}",
                time.ticks(),
                package.raw(),
                warehouse.raw(),
                section.raw()
            ),
            Record::Restored {
                time,
                package,
                warehouse,
                section,
            } => write!(
                f,
                "{:07} pacote {:03} rearmazenado em {:03} na secao {:03}",
                time.ticks(),
                package.raw(),
                warehouse.raw(),
                section.raw()
            ),
            Record::InTransit {
                time,
                package,
                from,
                to,
            } => write!(
                f,
                "{:07} pacote {:03} em transito de {:03} para {:03}",
                time.ticks(),
                package.raw(),
                from.raw(),
                to.raw()
            ),
            Record::Delivered {
                time,
                package,
                warehouse,
            } => write!(
                f,
                "{:07} pacote {:03} entregue em {:03}",
                time.ticks(),
                package.raw(),
                warehouse.raw()
            ),
        }
    }
}

/// Renders records line by line onto a `Write` sink.
///
/// The simulation drives this directly from its handlers; tests pass
/// a `Vec<u8>` to capture the full trace in memory, the binary passes
/// buffered stdout.
#[derive(Debug)]
pub struct LogEmitter<W: Write> {
    sink: W,
}

impl<W: Write> LogEmitter<W> {
    /// Create an emitter over the given sink.
    pub fn new(sink: W) -> Self {
        LogEmitter { sink }
    }

    /// Write one record as a line.
    pub fn emit(&mut self, record: Record) -> io::Result<()> {
        writeln!(self.sink, "{}", record)
    }

    /// Flush the sink.
    pub fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }

    /// Consume the emitter and return the sink.
    pub fn into_sink(self) -> W {
        self.sink
    }
}
