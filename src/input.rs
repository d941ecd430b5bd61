//! Scenario parser for the fixed whitespace-token input format.
//!
//! The format, in order: four global scalars (transport capacity,
//! transit latency, transport interval, removal cost), the warehouse
//! count `N`, the `N × N` 0/1 adjacency matrix, the posting count `P`,
//! then `P` postings of the literal-tagged form
//! `<time> pac <externalId> org <origin> dst <destination>`.
//!
//! The external id is read and discarded; a posting's id is its
//! 0-based position in the file.

use std::path::Path;

use thiserror::Error;

use crate::network::Network;
use crate::time::SimTime;
use crate::warehouse::WarehouseId;

/// A malformed input file.
///
/// `position` is the 1-based index of the offending token, counting
/// every whitespace-separated token from the start of the file.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected end of input while reading {expected} (token {position})")]
    UnexpectedEnd {
        expected: &'static str,
        position: usize,
    },

    #[error("token {position}: expected an integer for {expected}, found {found:?}")]
    InvalidInteger {
        expected: &'static str,
        position: usize,
        found: String,
    },

    #[error("token {position}: expected literal {expected:?}, found {found:?}")]
    BadLiteral {
        expected: &'static str,
        position: usize,
        found: String,
    },

    #[error("token {position}: {what} is {value}, must be {constraint}")]
    OutOfRange {
        what: &'static str,
        position: usize,
        value: u64,
        constraint: &'static str,
    },
}

/// The four global simulation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimParams {
    /// Packages shipped per transport firing. At least 1.
    pub transport_capacity: usize,
    /// Ticks a shipped package spends on the road.
    pub transit_latency: u64,
    /// Ticks between consecutive firings of each edge. At least 1.
    pub transport_interval: u64,
    /// Ticks paid per package surfaced during a dig.
    pub removal_cost: u64,
}

/// One package posting: arrival of a package into the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    pub posting_time: SimTime,
    pub origin: WarehouseId,
    pub destination: WarehouseId,
}

/// A fully parsed input file.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub params: SimParams,
    pub network: Network,
    pub postings: Vec<Posting>,
}

impl Scenario {
    /// Parse a scenario from input text.
    pub fn parse(text: &str) -> Result<Scenario, ParseError> {
        let mut tokens = Tokens::new(text);

        let transport_capacity =
            tokens.int_at_least("transport capacity", 1, "at least 1")? as usize;
        let transit_latency = tokens.int("transit latency")?;
        let transport_interval = tokens.int_at_least("transport interval", 1, "at least 1")?;
        let removal_cost = tokens.int("removal cost")?;

        let warehouse_count = tokens.int_at_least("warehouse count", 1, "at least 1")? as usize;

        let mut network = Network::new(warehouse_count);
        for u in 0..warehouse_count {
            for v in 0..warehouse_count {
                let entry = tokens.int("adjacency entry")?;
                match entry {
                    0 => {}
                    1 => network.add_edge(
                        WarehouseId::new(u as u32),
                        WarehouseId::new(v as u32),
                    ),
                    other => {
                        return Err(ParseError::OutOfRange {
                            what: "adjacency entry",
                            position: tokens.position(),
                            value: other,
                            constraint: "0 or 1",
                        })
                    }
                }
            }
        }

        let posting_count = tokens.int("posting count")?;
        let mut postings = Vec::with_capacity(posting_count as usize);
        for _ in 0..posting_count {
            let posting_time = SimTime::new(tokens.int("posting time")?);
            tokens.literal("pac")?;
            tokens.int("external id")?; // discarded; ids come from file order
            tokens.literal("org")?;
            let origin = tokens.warehouse("origin warehouse", warehouse_count)?;
            tokens.literal("dst")?;
            let destination = tokens.warehouse("destination warehouse", warehouse_count)?;
            postings.push(Posting {
                posting_time,
                origin,
                destination,
            });
        }

        Ok(Scenario {
            params: SimParams {
                transport_capacity,
                transit_latency,
                transport_interval,
                removal_cost,
            },
            network,
            postings,
        })
    }

    /// Read and parse a scenario file.
    pub fn from_file(path: &Path) -> Result<Scenario, crate::error::SimError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Scenario::parse(&text)?)
    }
}

/// Whitespace token cursor tracking its position for diagnostics.
struct Tokens<'a> {
    iter: std::str::SplitWhitespace<'a>,
    position: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Tokens {
            iter: text.split_whitespace(),
            position: 0,
        }
    }

    /// 1-based position of the most recently consumed token.
    fn position(&self) -> usize {
        self.position
    }

    fn next(&mut self, expected: &'static str) -> Result<&'a str, ParseError> {
        self.position += 1;
        self.iter.next().ok_or(ParseError::UnexpectedEnd {
            expected,
            position: self.position,
        })
    }

    fn int(&mut self, expected: &'static str) -> Result<u64, ParseError> {
        let token = self.next(expected)?;
        token.parse().map_err(|_| ParseError::InvalidInteger {
            expected,
            position: self.position,
            found: token.to_string(),
        })
    }

    fn int_at_least(
        &mut self,
        what: &'static str,
        min: u64,
        constraint: &'static str,
    ) -> Result<u64, ParseError> {
        let value = self.int(what)?;
        if value < min {
            return Err(ParseError::OutOfRange {
                what,
                position: self.position,
                value,
                constraint,
            });
        }
        Ok(value)
    }

    fn literal(&mut self, expected: &'static str) -> Result<(), ParseError> {
        let token = self.next(expected)?;
        if token != expected {
            return Err(ParseError::BadLiteral {
                expected,
                position: self.position,
                found: token.to_string(),
            });
        }
        Ok(())
    }

    fn warehouse(
        &mut self,
        what: &'static str,
        warehouse_count: usize,
    ) -> Result<WarehouseId, ParseError> {
        let value = self.int(what)?;
        if value >= warehouse_count as u64 {
            return Err(ParseError::OutOfRange {
                what,
                position: self.position,
                value,
                constraint: "a valid warehouse id",
            });
        }
        Ok(WarehouseId::new(value as u32))
    }
}
