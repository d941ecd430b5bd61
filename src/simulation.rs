//! Simulation execution loop and the two event handlers.
//!
//! Drives the scheduler: pops events in total order, advances the
//! logical clock, dispatches arrivals and transport firings. The loop
//! is purely synchronous and single-threaded — determinism is
//! trivial, and every observable effect is a [`Record`] pushed to the
//! emitter.

use std::collections::BTreeSet;
use std::io::Write;

use tracing::warn;

use crate::error::{SimError, SimResult};
use crate::event::Event;
use crate::input::{Scenario, SimParams};
use crate::package::{Package, PackageId, PackageStore};
use crate::report::{LogEmitter, Record};
use crate::scheduler::Scheduler;
use crate::time::SimTime;
use crate::warehouse::{Warehouse, WarehouseId};

/// Counters collected over one run.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimStats {
    /// Arrival events processed.
    pub arrivals: u64,
    /// Transport firings processed.
    pub firings: u64,
    /// Firings that found their section empty and moved nothing.
    pub idle_firings: u64,
    /// Packages delivered to their final destination.
    pub delivered: u64,
    /// Packages dropped as undeliverable (no route at init, or a
    /// route that ran out mid-way).
    pub dropped: u64,
    /// Logical time of the last processed event.
    pub final_time: SimTime,
}

/// What the arrival handler decided to do with a package.
enum ArrivalOutcome {
    Deliver,
    Store(WarehouseId),
    Discard,
}

/// Top-level simulation driver.
///
/// Owns the scheduler, the warehouses, the package store and the
/// emitter. Built from a parsed [`Scenario`]; call [`run`] to execute
/// to completion.
///
/// [`run`]: Simulation::run
#[derive(Debug)]
pub struct Simulation<W: Write> {
    params: SimParams,
    warehouses: Vec<Warehouse>,
    packages: PackageStore,
    scheduler: Scheduler,
    emitter: LogEmitter<W>,
    /// Termination target: packages that entered the simulation and
    /// have not been discarded.
    posted: u64,
    /// Packages delivered so far.
    delivered: u64,
    current_time: SimTime,
    stats: SimStats,
}

impl<W: Write> Simulation<W> {
    /// Build a simulation from a scenario, routing every posting and
    /// seeding the initial events.
    ///
    /// Postings with no route from origin to destination are excluded
    /// here: they get no package, no arrival event, and do not count
    /// toward the termination target.
    pub fn new(scenario: Scenario, sink: W) -> Self {
        let Scenario {
            params,
            network,
            postings,
        } = scenario;

        let warehouse_count = network.warehouse_count();
        let warehouses = (0..warehouse_count)
            .map(|id| Warehouse::new(WarehouseId::new(id as u32), warehouse_count))
            .collect();

        let mut packages = PackageStore::new();
        let mut scheduler = Scheduler::new();
        let mut stats = SimStats::default();
        let mut posted = 0u64;
        let mut first_posting: Option<SimTime> = None;

        for (index, posting) in postings.into_iter().enumerate() {
            let id = PackageId::new(index as u32);
            let Some(route) = network.shortest_route(posting.origin, posting.destination) else {
                warn!(
                    package = %id,
                    origin = %posting.origin,
                    destination = %posting.destination,
                    "no route for posting, dropping package"
                );
                stats.dropped += 1;
                continue;
            };

            packages.insert(Package::new(
                id,
                posting.origin,
                posting.destination,
                posting.posting_time,
                route,
            ));
            scheduler.schedule(Event::Arrival {
                time: posting.posting_time,
                package: id,
                warehouse: posting.origin,
            });
            posted += 1;
            first_posting = Some(match first_posting {
                Some(t) if t <= posting.posting_time => t,
                _ => posting.posting_time,
            });
        }

        // Each directed edge fires periodically, starting one interval
        // after the earliest posting. No packages, no firings.
        if let Some(t0) = first_posting {
            let first_firing = t0.plus(params.transport_interval);
            for (from, to) in network.edges() {
                scheduler.schedule(Event::Transport {
                    time: first_firing,
                    from,
                    to,
                });
            }
        }

        Simulation {
            params,
            warehouses,
            packages,
            scheduler,
            emitter: LogEmitter::new(sink),
            posted,
            delivered: 0,
            current_time: SimTime::ZERO,
            stats,
        }
    }

    /// Termination target.
    pub fn posted(&self) -> u64 {
        self.posted
    }

    /// Packages delivered so far.
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Current logical time.
    pub fn current_time(&self) -> SimTime {
        self.current_time
    }

    /// Packages currently waiting in any section.
    pub fn resident_count(&self) -> usize {
        self.warehouses.iter().map(Warehouse::resident_count).sum()
    }

    /// Consume the simulation and return the output sink.
    pub fn into_sink(self) -> W {
        self.emitter.into_sink()
    }

    /// Run until every posted package is delivered.
    ///
    /// Returns the run counters, or an error if the queue drains
    /// early or an arrival contradicts a package's route.
    pub fn run(&mut self) -> SimResult<SimStats> {
        while self.delivered < self.posted {
            let Some(event) = self.scheduler.pop_next() else {
                return Err(SimError::Unsatisfiable {
                    delivered: self.delivered,
                    posted: self.posted,
                });
            };

            // The heap dispatches in total order, so time never goes
            // backward.
            assert!(
                self.current_time <= event.time(),
                "time went backward: now={}, event={}",
                self.current_time,
                event
            );
            self.current_time = event.time();

            match event {
                Event::Arrival {
                    time,
                    package,
                    warehouse,
                } => {
                    self.stats.arrivals += 1;
                    self.handle_arrival(time, package, warehouse)?;
                }
                Event::Transport { time, from, to } => {
                    self.stats.firings += 1;
                    self.handle_transport(time, from, to)?;
                }
            }
        }

        // Every package was delivered or discarded, so no section may
        // still hold one.
        debug_assert_eq!(self.packages.live_count(), 0);

        self.emitter.flush()?;
        self.stats.delivered = self.delivered;
        self.stats.final_time = self.current_time;
        Ok(self.stats)
    }

    /// Process a package arriving at a warehouse: deliver it, store it
    /// toward its next hop, or discard it if its route ran out.
    ///
    /// Arrivals never schedule follow-on events; a stored package
    /// waits for the periodic firing of its edge.
    fn handle_arrival(
        &mut self,
        time: SimTime,
        package: PackageId,
        warehouse: WarehouseId,
    ) -> SimResult<()> {
        let outcome = {
            let Some(pkg) = self.packages.get_mut(package) else {
                return Err(SimError::RouteMismatch {
                    time,
                    package,
                    warehouse,
                    expected: None,
                });
            };
            if pkg.current_stop() != Some(warehouse) {
                return Err(SimError::RouteMismatch {
                    time,
                    package,
                    warehouse,
                    expected: pkg.current_stop(),
                });
            }

            pkg.touch(time);
            if warehouse == pkg.destination {
                ArrivalOutcome::Deliver
            } else if let Some(next_hop) = pkg.next_hop() {
                pkg.advance();
                ArrivalOutcome::Store(next_hop)
            } else {
                ArrivalOutcome::Discard
            }
        };

        match outcome {
            ArrivalOutcome::Deliver => {
                self.emitter.emit(Record::Delivered {
                    time,
                    package,
                    warehouse,
                })?;
                self.delivered += 1;
                self.packages.release(package);
            }
            ArrivalOutcome::Store(next_hop) => {
                self.warehouses[warehouse.index()].store(next_hop, package);
                self.emitter.emit(Record::Stored {
                    time,
                    package,
                    warehouse,
                    section: next_hop,
                })?;
            }
            ArrivalOutcome::Discard => {
                // Malformed route: shrink the termination target so
                // the loop can still finish.
                warn!(%package, %warehouse, %time, "route exhausted, dropping package");
                self.packages.release(package);
                self.posted -= 1;
                self.stats.dropped += 1;
            }
        }
        Ok(())
    }

    /// Process the firing of edge `from → to` at `time`.
    ///
    /// Digs through the LIFO section at `from` to surface the oldest
    /// `min(capacity, |section|)` packages, ships them, puts the
    /// blockers back, and reschedules the edge.
    fn handle_transport(
        &mut self,
        time: SimTime,
        from: WarehouseId,
        to: WarehouseId,
    ) -> SimResult<()> {
        let section_len = self.warehouses[from.index()].section(to).len();
        let quota = self.params.transport_capacity.min(section_len);

        if quota == 0 {
            self.stats.idle_firings += 1;
        } else {
            let targets = self.select_targets(time, from, to, quota)?;
            let dug = self.dig(from, to, &targets, quota);
            self.ship_and_restore(time, from, to, &targets, dug)?;
        }

        // Keep the edge firing until the network is done; stopping
        // here is what bounds the queue after the last delivery.
        if self.delivered < self.posted {
            self.scheduler.schedule(Event::Transport {
                time: time.plus(self.params.transport_interval),
                from,
                to,
            });
        }
        Ok(())
    }

    /// The `quota` oldest packages in the section, by
    /// `(last_touched, id)`.
    fn select_targets(
        &self,
        time: SimTime,
        from: WarehouseId,
        to: WarehouseId,
        quota: usize,
    ) -> SimResult<BTreeSet<PackageId>> {
        let section = self.warehouses[from.index()].section(to);
        let mut by_age: Vec<(SimTime, PackageId)> = Vec::with_capacity(section.len());
        for id in section.iter_top_down() {
            let Some(pkg) = self.packages.get(id) else {
                return Err(SimError::RouteMismatch {
                    time,
                    package: id,
                    warehouse: from,
                    expected: None,
                });
            };
            by_age.push(pkg.age_key());
        }
        by_age.sort_unstable();
        Ok(by_age.into_iter().take(quota).map(|(_, id)| id).collect())
    }

    /// Pop packages off the section top until every target has
    /// surfaced. Returns the surfaced packages in pop order; blockers
    /// that were merely in the way are included.
    fn dig(
        &mut self,
        from: WarehouseId,
        to: WarehouseId,
        targets: &BTreeSet<PackageId>,
        quota: usize,
    ) -> Vec<PackageId> {
        let section = self.warehouses[from.index()].section_mut(to);
        let mut dug = Vec::new();
        let mut surfaced = 0;
        while surfaced < quota {
            let Some(id) = section.pop() else {
                break; // targets all live in this section
            };
            if targets.contains(&id) {
                surfaced += 1;
            }
            dug.push(id);
        }
        dug
    }

    /// Walk the dug packages in surfaced order, paying the removal
    /// cost per package: targets go in transit toward `to`, blockers
    /// are logged as restored and pushed back at the end in reverse
    /// surfaced order, which reinstates the section's LIFO profile
    /// minus the shipped targets.
    fn ship_and_restore(
        &mut self,
        time: SimTime,
        from: WarehouseId,
        to: WarehouseId,
        targets: &BTreeSet<PackageId>,
        dug: Vec<PackageId>,
    ) -> SimResult<()> {
        let mut t_log = time;
        let mut blockers: Vec<PackageId> = Vec::new();

        for id in dug {
            t_log = t_log.plus(self.params.removal_cost);
            self.emitter.emit(Record::Removed {
                time: t_log,
                package: id,
                warehouse: from,
                section: to,
            })?;

            let Some(pkg) = self.packages.get_mut(id) else {
                return Err(SimError::RouteMismatch {
                    time: t_log,
                    package: id,
                    warehouse: from,
                    expected: None,
                });
            };
            pkg.touch(t_log);

            if targets.contains(&id) {
                self.emitter.emit(Record::InTransit {
                    time: t_log,
                    package: id,
                    from,
                    to,
                })?;
                self.scheduler.schedule(Event::Arrival {
                    time: t_log.plus(self.params.transit_latency),
                    package: id,
                    warehouse: to,
                });
            } else {
                self.emitter.emit(Record::Restored {
                    time: t_log,
                    package: id,
                    warehouse: from,
                    section: to,
                })?;
                blockers.push(id);
            }
        }

        let section = self.warehouses[from.index()].section_mut(to);
        for id in blockers.into_iter().rev() {
            section.push(id);
        }
        Ok(())
    }
}
