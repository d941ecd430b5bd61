//! The warehouse network: adjacency matrix and shortest-path routing.
//!
//! The graph is directed and unweighted. Routes are computed once per
//! package at init by breadth-first search; neighbor scan order is
//! ascending by warehouse id, so shortest-path ties break identically
//! on every run.

use std::collections::VecDeque;

use crate::warehouse::WarehouseId;

/// Directed warehouse graph backed by a full adjacency matrix.
#[derive(Debug, Clone)]
pub struct Network {
    warehouse_count: usize,
    /// Row-major `warehouse_count × warehouse_count` matrix;
    /// `adj[u * n + v]` means an edge from `u` to `v`.
    adj: Vec<bool>,
}

impl Network {
    /// Create a network with `warehouse_count` warehouses and no edges.
    pub fn new(warehouse_count: usize) -> Self {
        Network {
            warehouse_count,
            adj: vec![false; warehouse_count * warehouse_count],
        }
    }

    /// Number of warehouses in the network.
    #[inline]
    pub fn warehouse_count(&self) -> usize {
        self.warehouse_count
    }

    /// Add a directed edge from `u` to `v`.
    pub fn add_edge(&mut self, u: WarehouseId, v: WarehouseId) {
        let n = self.warehouse_count;
        self.adj[u.index() * n + v.index()] = true;
    }

    /// Whether a directed edge from `u` to `v` exists.
    #[inline]
    pub fn connects(&self, u: WarehouseId, v: WarehouseId) -> bool {
        self.adj[u.index() * self.warehouse_count + v.index()]
    }

    /// All directed edges in ascending `(from, to)` order.
    pub fn edges(&self) -> impl Iterator<Item = (WarehouseId, WarehouseId)> + '_ {
        let n = self.warehouse_count;
        (0..n).flat_map(move |u| {
            (0..n).filter_map(move |v| {
                let from = WarehouseId::new(u as u32);
                let to = WarehouseId::new(v as u32);
                self.connects(from, to).then_some((from, to))
            })
        })
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.adj.iter().filter(|&&e| e).count()
    }

    /// Shortest route from `origin` to `destination`, inclusive of
    /// both endpoints.
    ///
    /// Unweighted BFS with neighbors visited in ascending id order;
    /// equal-length routes therefore resolve deterministically. Returns
    /// `None` when no path exists. `origin == destination` yields the
    /// single-stop route.
    pub fn shortest_route(
        &self,
        origin: WarehouseId,
        destination: WarehouseId,
    ) -> Option<Vec<WarehouseId>> {
        let n = self.warehouse_count;
        let mut predecessor: Vec<Option<WarehouseId>> = vec![None; n];
        let mut visited = vec![false; n];
        let mut frontier = VecDeque::new();

        visited[origin.index()] = true;
        frontier.push_back(origin);

        'search: while let Some(u) = frontier.pop_front() {
            if u == destination {
                break;
            }
            for v in 0..n {
                let v = WarehouseId::new(v as u32);
                if self.connects(u, v) && !visited[v.index()] {
                    visited[v.index()] = true;
                    predecessor[v.index()] = Some(u);
                    if v == destination {
                        break 'search;
                    }
                    frontier.push_back(v);
                }
            }
        }

        if !visited[destination.index()] {
            return None;
        }

        // Rebuild the route by walking predecessors back to the origin.
        let mut route = vec![destination];
        let mut current = destination;
        while let Some(prev) = predecessor[current.index()] {
            route.push(prev);
            current = prev;
        }
        route.reverse();
        Some(route)
    }
}
