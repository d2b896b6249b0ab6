use crate::concepts::advertisement::DistanceVector;
use crate::concepts::neighbour::Neighbour;
use crate::concepts::route::{Route, RoutingTable};
use crate::concepts::table::DistanceTable;
use crate::feedback::RoutingError;
use crate::framework::RoutingSystem;
use crate::util::{clamp_cost, sum_inf};
use educe::Educe;
use log::{trace, warn};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cost of a path that does not exist
pub const INF: u16 = 9999;

#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()), PartialEq(bound()))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(bound = ""))]
pub struct Router<T: RoutingSystem> {
    pub address: T::NodeAddress,
    /// direct links only
    #[cfg_attr(feature = "serde", serde(with = "crate::util::address_pairs"))]
    neighbours: BTreeMap<T::NodeAddress, Neighbour<T>>,
    table: DistanceTable<T>,
    /// Destination, Route
    #[cfg_attr(feature = "serde", serde(with = "crate::util::address_pairs"))]
    pub routes: RoutingTable<T>,
}

impl<T: RoutingSystem> Router<T> {
    pub fn new<'a, I>(address: T::NodeAddress, nodes: I) -> Self
    where
        I: IntoIterator<Item = &'a T::NodeAddress>,
        T::NodeAddress: 'a,
    {
        let table = DistanceTable::new(nodes, &address);
        Self {
            address,
            neighbours: BTreeMap::new(),
            table,
            routes: BTreeMap::new(),
        }
    }

    pub fn neighbours(&self) -> &BTreeMap<T::NodeAddress, Neighbour<T>> {
        &self.neighbours
    }

    pub fn table(&self) -> &DistanceTable<T> {
        &self.table
    }

    // region Topology

    /// Discards every learned distance and starts over from an `INF` table sized to `nodes`.
    /// Direct link costs survive the reset and are written back into the fresh table.
    pub fn initialize<'a, I>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = &'a T::NodeAddress>,
        T::NodeAddress: 'a,
    {
        self.table = DistanceTable::new(nodes, &self.address);
        for (addr, neigh) in &self.neighbours {
            self.table.set(addr, addr, neigh.link_cost);
        }
    }

    /// records the direct link cost to `neighbour`, replacing any previous cost
    pub fn update_neighbour(
        &mut self,
        neighbour: &T::NodeAddress,
        cost: u16,
    ) -> Result<(), RoutingError<T>> {
        if !self.table.contains(neighbour) {
            return Err(RoutingError::UnknownNode(neighbour.clone()));
        }
        if *neighbour == self.address {
            // the (self, self) cell must stay 0
            warn!("Ignoring self-loop link on {}", self.address);
            return Ok(());
        }
        let link_cost = clamp_cost(cost);
        if link_cost != cost {
            warn!(
                "Link cost {cost} between {} and {neighbour} exceeds INF, clamping to {INF}",
                self.address
            );
        }
        self.neighbours.insert(
            neighbour.clone(),
            Neighbour {
                addr: neighbour.clone(),
                link_cost,
            },
        );
        self.table.set(neighbour, neighbour, link_cost);
        Ok(())
    }

    /// Drops the link to `neighbour`.
    /// The node keeps its row and column, but nothing is reachable through it anymore.
    pub fn remove_neighbour(&mut self, neighbour: &T::NodeAddress) -> Option<Neighbour<T>> {
        let removed = self.neighbours.remove(neighbour);
        if removed.is_some() {
            self.table.clear_via(neighbour);
        }
        removed
    }

    pub fn link_cost(&self, neighbour: &T::NodeAddress) -> Result<u16, RoutingError<T>> {
        self.neighbours
            .get(neighbour)
            .map(|neigh| neigh.link_cost)
            .ok_or_else(|| RoutingError::UnknownNeighbour {
                router: self.address.clone(),
                neighbour: neighbour.clone(),
            })
    }
    // endregion

    // region Vector Exchange

    /// This router's current belief: the minimal cost over all vias, for every known destination
    pub fn distance_vector(&self) -> DistanceVector<T> {
        self.table
            .nodes()
            .iter()
            .map(|dest| (dest.clone(), self.table.best(dest)))
            .collect()
    }

    /// Merges a vector received from a direct neighbour, returns true if any cell was lowered.
    ///
    /// Cells are only ever lowered here, raising a cost requires a reset through `initialize`.
    pub fn receive_update(
        &mut self,
        from: &T::NodeAddress,
        vector: &DistanceVector<T>,
    ) -> Result<bool, RoutingError<T>> {
        let link_cost = self.link_cost(from)?;
        let mut changed = false;
        for (dest, cost) in vector.iter() {
            let new_cost = sum_inf(link_cost, cost);
            match self.table.lower(dest, from, new_cost) {
                Some(true) => {
                    trace!("{}: {dest} via {from} lowered to {new_cost}", self.address);
                    changed = true;
                }
                Some(false) => {}
                None => return Err(RoutingError::UnknownNode(dest.clone())),
            }
        }
        Ok(changed)
    }
    // endregion

    // region Route Selection

    /// Derives the routing table from the distance table.
    /// Ties are resolved towards the smallest via address.
    pub fn compute_routing_table(&mut self) -> &RoutingTable<T> {
        let mut routes = BTreeMap::new();
        for dest in self.table.nodes() {
            if *dest == self.address {
                continue;
            }
            let route = match self.table.best_via(dest) {
                Some((via, metric)) if metric < INF => Route {
                    next_hop: Some(via.clone()),
                    metric,
                },
                _ => Route::unreachable(),
            };
            routes.insert(dest.clone(), route);
        }
        self.routes = routes;
        &self.routes
    }
    // endregion
}
