use educe::Educe;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::framework::RoutingSystem;

#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()), PartialEq(bound()))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(bound = ""))]
pub struct Neighbour<T: RoutingSystem> {
    /// the routing network address
    pub addr: T::NodeAddress,
    /// Direct link-cost to this neighbour. Lower is better, never above INF.
    pub link_cost: u16,
}
