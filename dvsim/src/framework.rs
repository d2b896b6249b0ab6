use std::fmt::{Debug, Display};
use std::hash::Hash;

use cfg_if::cfg_if;

use crate::concepts::advertisement::Advertisement;
use crate::router::Router;

cfg_if! {
    if #[cfg(feature = "serde")] {
        use serde::de::DeserializeOwned;
        use serde::{Deserialize, Serialize};

        pub trait SimData: Clone + Serialize + DeserializeOwned + Sized {}
        impl<T: Clone + Serialize + DeserializeOwned + Sized> SimData for T {}
    } else {
        pub trait SimData: Clone + Sized {}
        impl<T: Clone + Sized> SimData for T {}
    }
}

pub trait SimKey: Eq + PartialEq + Hash {}
impl<T: Eq + PartialEq + Hash> SimKey for T {}

pub trait RoutingSystem {
    /// Address of a node in the simulated network, MUST be unique.
    /// The `Ord` implementation decides every tie-break, lower addresses win.
    type NodeAddress: Ord + PartialOrd + Display + Debug + SimData + SimKey;
}

/// Decides what a router tells its neighbours in a round.
///
/// Implementations only read the router's current distance table, they must never mutate it.
pub trait AdvertisementPolicy<T: RoutingSystem> {
    fn advertise(&self, router: &Router<T>) -> Advertisement<T>;
}

/// Tunables for a convergence run
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ProtocolParams {
    /// the engine gives up with a non-convergence error once this many rounds ran without
    /// reaching a fixed point
    pub max_rounds: usize,
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self { max_rounds: 1000 }
    }
}
