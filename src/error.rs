//! Structured error types for the simulator.
//!
//! All fallible public APIs return `Result<T, SimError>`. Parse
//! problems surface before any simulation output; the two runtime
//! variants abort the run.

use thiserror::Error;

use crate::input::ParseError;
use crate::package::PackageId;
use crate::time::SimTime;
use crate::warehouse::WarehouseId;

/// The top-level error type for the simulator.
#[derive(Debug, Error)]
pub enum SimError {
    /// Input file could not be read, or the output sink failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The input file is malformed.
    #[error("invalid input: {0}")]
    Parse(#[from] ParseError),

    /// A package arrived at a warehouse its route does not expect —
    /// the simulation state is corrupt.
    #[error(
        "package {package} arrived at warehouse {warehouse} at {time}, \
         but its route expects {expected:?}"
    )]
    RouteMismatch {
        time: SimTime,
        package: PackageId,
        warehouse: WarehouseId,
        expected: Option<WarehouseId>,
    },

    /// The event queue drained before every package was delivered;
    /// the input cannot be satisfied.
    #[error("event queue drained with {delivered} of {posted} packages delivered")]
    Unsatisfiable { delivered: u64, posted: u64 },
}

/// Convenience alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_mismatch_display() {
        let e = SimError::RouteMismatch {
            time: SimTime::new(42),
            package: PackageId::new(3),
            warehouse: WarehouseId::new(1),
            expected: Some(WarehouseId::new(2)),
        };
        let s = e.to_string();
        assert!(s.contains("P3"));
        assert!(s.contains("W1"));
        assert!(s.contains("T=42"));
    }

    #[test]
    fn test_unsatisfiable_display() {
        let e = SimError::Unsatisfiable {
            delivered: 2,
            posted: 5,
        };
        assert_eq!(
            e.to_string(),
            "event queue drained with 2 of 5 packages delivered"
        );
    }

    #[test]
    fn test_parse_error_converts() {
        let parse = ParseError::UnexpectedEnd {
            expected: "posting count",
            position: 9,
        };
        let e: SimError = parse.into();
        assert!(e.to_string().starts_with("invalid input:"));
    }
}
