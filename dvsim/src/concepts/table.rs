use educe::Educe;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::framework::RoutingSystem;
use crate::router::INF;

/// Per-router matrix of (destination, via) -> cost.
///
/// Backed by a dense, row-major array. Rows are destinations and columns are vias, both indexed by
/// the position of the address in the sorted node list, so iterating a row visits vias in ascending
/// address order. Every cell over the node set is defined; cells outside it read as `INF`.
#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()), PartialEq(bound()))]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(bound = "", try_from = "TableParts<T>")
)]
pub struct DistanceTable<T: RoutingSystem> {
    nodes: Vec<T::NodeAddress>,
    costs: Vec<u16>,
}

/// Reasons a table read back from storage is rejected
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InvalidTable {
    #[error("node list is not sorted and free of duplicates")]
    UnsortedNodes,
    #[error("expected {expected} costs for the node list, found {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("cost {0} exceeds INF")]
    CostAboveInf(u16),
}

/// Unchecked table contents, as they appear on the wire
#[cfg(feature = "serde")]
#[derive(Deserialize)]
#[serde(bound = "")]
struct TableParts<T: RoutingSystem> {
    nodes: Vec<T::NodeAddress>,
    costs: Vec<u16>,
}

#[cfg(feature = "serde")]
impl<T: RoutingSystem> TryFrom<TableParts<T>> for DistanceTable<T> {
    type Error = InvalidTable;

    fn try_from(parts: TableParts<T>) -> Result<Self, Self::Error> {
        DistanceTable::from_parts(parts.nodes, parts.costs)
    }
}

impl<T: RoutingSystem> DistanceTable<T> {
    /// Rebuilds a table from its node list and row-major costs, checking every layout invariant
    pub fn from_parts(nodes: Vec<T::NodeAddress>, costs: Vec<u16>) -> Result<Self, InvalidTable> {
        if nodes.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(InvalidTable::UnsortedNodes);
        }
        let expected = nodes.len() * nodes.len();
        if costs.len() != expected {
            return Err(InvalidTable::SizeMismatch {
                expected,
                actual: costs.len(),
            });
        }
        if let Some(cost) = costs.iter().find(|c| **c > INF) {
            return Err(InvalidTable::CostAboveInf(*cost));
        }
        Ok(Self { nodes, costs })
    }

    /// Creates an `INF` filled table over `nodes`, except for the (owner, owner) cell which is 0
    pub fn new<'a, I>(nodes: I, owner: &T::NodeAddress) -> Self
    where
        I: IntoIterator<Item = &'a T::NodeAddress>,
        T::NodeAddress: 'a,
    {
        let mut nodes: Vec<T::NodeAddress> = nodes.into_iter().cloned().collect();
        nodes.sort();
        nodes.dedup();
        let n = nodes.len();
        let mut table = Self {
            nodes,
            costs: vec![INF; n * n],
        };
        table.set(owner, owner, 0);
        table
    }

    /// known addresses, in ascending order
    pub fn nodes(&self) -> &[T::NodeAddress] {
        &self.nodes
    }

    pub fn contains(&self, addr: &T::NodeAddress) -> bool {
        self.index_of(addr).is_some()
    }

    fn index_of(&self, addr: &T::NodeAddress) -> Option<usize> {
        self.nodes.binary_search(addr).ok()
    }

    fn cell(&self, dest: &T::NodeAddress, via: &T::NodeAddress) -> Option<usize> {
        let d = self.index_of(dest)?;
        let v = self.index_of(via)?;
        Some(d * self.nodes.len() + v)
    }

    pub fn get(&self, dest: &T::NodeAddress, via: &T::NodeAddress) -> u16 {
        self.cell(dest, via).map_or(INF, |idx| self.costs[idx])
    }

    /// Overwrites a cell, returns false if either address is unknown
    pub fn set(&mut self, dest: &T::NodeAddress, via: &T::NodeAddress, cost: u16) -> bool {
        match self.cell(dest, via) {
            Some(idx) => {
                self.costs[idx] = cost;
                true
            }
            None => false,
        }
    }

    /// Lowers a cell to `cost` if that is strictly better.
    ///
    /// returns: None if either address is unknown, otherwise whether the cell changed
    pub fn lower(
        &mut self,
        dest: &T::NodeAddress,
        via: &T::NodeAddress,
        cost: u16,
    ) -> Option<bool> {
        let idx = self.cell(dest, via)?;
        if cost < self.costs[idx] {
            self.costs[idx] = cost;
            Some(true)
        } else {
            Some(false)
        }
    }

    /// Resets every cell in the column of `via` to `INF`
    pub fn clear_via(&mut self, via: &T::NodeAddress) {
        if let Some(v) = self.index_of(via) {
            let n = self.nodes.len();
            for d in 0..n {
                self.costs[d * n + v] = INF;
            }
        }
    }

    /// Costs towards `dest` through every known via, in ascending via order
    pub fn row<'a>(
        &'a self,
        dest: &T::NodeAddress,
    ) -> impl Iterator<Item = (&'a T::NodeAddress, u16)> + 'a {
        let n = self.nodes.len();
        let costs = match self.index_of(dest) {
            Some(d) => &self.costs[d * n..(d + 1) * n],
            None => &self.costs[0..0],
        };
        self.nodes.iter().zip(costs.iter().copied())
    }

    /// The lowest cost via towards `dest`.
    ///
    /// Vias are scanned in ascending order and only a strictly smaller cost replaces the current
    /// pick, so ties go to the smallest address. If every via is `INF`, the smallest via is
    /// returned with `INF`.
    /// Returns None only if `dest` is unknown.
    pub fn best_via(&self, dest: &T::NodeAddress) -> Option<(&T::NodeAddress, u16)> {
        let mut best: Option<(&T::NodeAddress, u16)> = None;
        for (via, cost) in self.row(dest) {
            match best {
                Some((_, best_cost)) if cost >= best_cost => {}
                _ => best = Some((via, cost)),
            }
        }
        best
    }

    /// Minimal known cost towards `dest`, `INF` if there is none
    pub fn best(&self, dest: &T::NodeAddress) -> u16 {
        self.best_via(dest).map_or(INF, |(_, cost)| cost)
    }
}
