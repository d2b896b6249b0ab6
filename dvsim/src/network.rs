use crate::concepts::edge::Edge;
use crate::concepts::route::RoutingTable;
use crate::feedback::RoutingError;
use crate::framework::RoutingSystem;
use crate::router::Router;
use educe::Educe;
use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Owns every router of the simulation, keyed by address.
/// Nodes are only ever added, never removed.
#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()), PartialEq(bound()))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(bound = ""))]
pub struct Network<T: RoutingSystem> {
    nodes: BTreeSet<T::NodeAddress>,
    #[cfg_attr(feature = "serde", serde(with = "crate::util::address_pairs"))]
    routers: BTreeMap<T::NodeAddress, Router<T>>,
}

impl<T: RoutingSystem> Network<T> {
    /// Creates one router per node and wires up the initial links.
    /// Edges without a cost describe the absence of a link and are skipped.
    pub fn build(nodes: &[T::NodeAddress], edges: &[Edge<T>]) -> Result<Self, RoutingError<T>> {
        let node_set: BTreeSet<T::NodeAddress> = nodes.iter().cloned().collect();
        let routers = node_set
            .iter()
            .map(|addr| (addr.clone(), Router::new(addr.clone(), &node_set)))
            .collect();
        let mut network = Self {
            nodes: node_set,
            routers,
        };
        for edge in edges {
            if let Some(cost) = edge.cost {
                network.link(&edge.a, &edge.b, cost)?;
            }
        }
        debug!(
            "Built network with {} nodes and {} links",
            network.nodes.len(),
            edges.iter().filter(|e| e.cost.is_some()).count()
        );
        Ok(network)
    }

    pub fn nodes(&self) -> &BTreeSet<T::NodeAddress> {
        &self.nodes
    }

    pub fn router(&self, addr: &T::NodeAddress) -> Option<&Router<T>> {
        self.routers.get(addr)
    }

    pub fn router_mut(&mut self, addr: &T::NodeAddress) -> Option<&mut Router<T>> {
        self.routers.get_mut(addr)
    }

    pub fn routers(&self) -> impl Iterator<Item = (&T::NodeAddress, &Router<T>)> {
        self.routers.iter()
    }

    pub fn routers_mut(&mut self) -> impl Iterator<Item = (&T::NodeAddress, &mut Router<T>)> {
        self.routers.iter_mut()
    }

    /// Snapshot of every router's last derived routing table
    pub fn routing_tables(&self) -> BTreeMap<T::NodeAddress, RoutingTable<T>> {
        self.routers
            .iter()
            .map(|(addr, router)| (addr.clone(), router.routes.clone()))
            .collect()
    }

    // region Topology Changes

    /// Applies a batch of link changes in order.
    /// The caller is expected to run a convergence pass afterwards.
    pub fn apply_updates(&mut self, updates: &[Edge<T>]) -> Result<(), RoutingError<T>> {
        for update in updates {
            self.apply_update(update)?;
        }
        Ok(())
    }

    /// Applies a single link change.
    ///
    /// Unseen endpoints join the network, then every router forgets what it learned and restarts
    /// from its direct links. The link itself is changed (or removed, when the edge has no cost)
    /// last.
    pub fn apply_update(&mut self, update: &Edge<T>) -> Result<(), RoutingError<T>> {
        for addr in [&update.a, &update.b] {
            if self.nodes.insert(addr.clone()) {
                debug!("Node {addr} joined the network");
                self.routers
                    .insert(addr.clone(), Router::new(addr.clone(), &self.nodes));
            }
        }
        self.reset();
        match update.cost {
            Some(cost) => self.link(&update.a, &update.b, cost),
            None => {
                self.unlink(&update.a, &update.b);
                Ok(())
            }
        }
    }

    /// Reinitializes every router over the current node set
    pub fn reset(&mut self) {
        for router in self.routers.values_mut() {
            router.initialize(&self.nodes);
            router.routes.clear();
        }
    }

    fn link(
        &mut self,
        a: &T::NodeAddress,
        b: &T::NodeAddress,
        cost: u16,
    ) -> Result<(), RoutingError<T>> {
        self.routers
            .get_mut(a)
            .ok_or_else(|| RoutingError::UnknownNode(a.clone()))?
            .update_neighbour(b, cost)?;
        self.routers
            .get_mut(b)
            .ok_or_else(|| RoutingError::UnknownNode(b.clone()))?
            .update_neighbour(a, cost)
    }

    fn unlink(&mut self, a: &T::NodeAddress, b: &T::NodeAddress) {
        if let Some(router) = self.routers.get_mut(a) {
            router.remove_neighbour(b);
        }
        if let Some(router) = self.routers.get_mut(b) {
            router.remove_neighbour(a);
        }
    }
    // endregion
}
