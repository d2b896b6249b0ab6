use educe::Educe;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::framework::RoutingSystem;
use crate::router::INF;

/// A derived routing table entry
#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()), PartialEq(bound()))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(bound = ""))]
pub struct Route<T: RoutingSystem> {
    /// the neighbour traffic for the destination is handed to,
    /// None if the destination is unreachable
    pub next_hop: Option<T::NodeAddress>,
    /// the cost of the selected path, INF if the destination is unreachable
    pub metric: u16,
}

impl<T: RoutingSystem> Route<T> {
    pub fn unreachable() -> Self {
        Self {
            next_hop: None,
            metric: INF,
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.next_hop.is_some()
    }
}

/// Destination -> selected route, ordered by destination. Never contains the owning router.
pub type RoutingTable<T> = BTreeMap<<T as RoutingSystem>::NodeAddress, Route<T>>;
