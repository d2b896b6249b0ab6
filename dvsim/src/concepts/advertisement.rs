use educe::Educe;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::framework::RoutingSystem;

/// Destination -> cost, as advertised by one router
#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()), PartialEq(bound()), Default(bound()))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(bound = ""))]
pub struct DistanceVector<T: RoutingSystem> {
    #[cfg_attr(feature = "serde", serde(with = "crate::util::address_pairs"))]
    entries: BTreeMap<T::NodeAddress, u16>,
}

impl<T: RoutingSystem> DistanceVector<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, dest: T::NodeAddress, cost: u16) {
        self.entries.insert(dest, cost);
    }

    pub fn get(&self, dest: &T::NodeAddress) -> Option<u16> {
        self.entries.get(dest).copied()
    }

    pub fn contains(&self, dest: &T::NodeAddress) -> bool {
        self.entries.contains_key(dest)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&T::NodeAddress, u16)> + '_ {
        self.entries.iter().map(|(dest, cost)| (dest, *cost))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: RoutingSystem> FromIterator<(T::NodeAddress, u16)> for DistanceVector<T> {
    fn from_iter<I: IntoIterator<Item = (T::NodeAddress, u16)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Everything a router sends in a single round
#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()), PartialEq(bound()))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(bound = ""))]
pub enum Advertisement<T: RoutingSystem> {
    /// one vector, sent identically to every neighbour
    Broadcast(DistanceVector<T>),
    /// a separately filtered vector for each neighbour
    PerNeighbour(BTreeMap<T::NodeAddress, DistanceVector<T>>),
}

impl<T: RoutingSystem> Advertisement<T> {
    /// The vector addressed to `neighbour`, if any
    pub fn vector_for(&self, neighbour: &T::NodeAddress) -> Option<&DistanceVector<T>> {
        match self {
            Advertisement::Broadcast(vector) => Some(vector),
            Advertisement::PerNeighbour(vectors) => vectors.get(neighbour),
        }
    }
}
