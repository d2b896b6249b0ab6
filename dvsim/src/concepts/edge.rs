use educe::Educe;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::framework::RoutingSystem;

/// An undirected link between two nodes, as it appears in a topology or an update batch
#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()), PartialEq(bound()))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(bound = ""))]
pub struct Edge<T: RoutingSystem> {
    pub a: T::NodeAddress,
    pub b: T::NodeAddress,
    /// None means "no link" when building, and "remove the link" when updating
    pub cost: Option<u16>,
}

impl<T: RoutingSystem> Edge<T> {
    pub fn link(a: T::NodeAddress, b: T::NodeAddress, cost: u16) -> Self {
        Self {
            a,
            b,
            cost: Some(cost),
        }
    }

    pub fn removal(a: T::NodeAddress, b: T::NodeAddress) -> Self {
        Self { a, b, cost: None }
    }
}
