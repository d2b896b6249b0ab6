use std::collections::BTreeMap;

use crate::concepts::advertisement::{Advertisement, DistanceVector};
use crate::framework::{AdvertisementPolicy, RoutingSystem};
use crate::router::Router;

/// Classic Bellman-Ford exchange, every neighbour receives the full distance vector
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainPolicy;

impl<T: RoutingSystem> AdvertisementPolicy<T> for PlainPolicy {
    fn advertise(&self, router: &Router<T>) -> Advertisement<T> {
        Advertisement::Broadcast(router.distance_vector())
    }
}

/// Never advertises a route back to the neighbour it is currently learned from
#[derive(Clone, Copy, Debug, Default)]
pub struct SplitHorizon;

impl<T: RoutingSystem> AdvertisementPolicy<T> for SplitHorizon {
    fn advertise(&self, router: &Router<T>) -> Advertisement<T> {
        let table = router.table();
        let mut vectors = BTreeMap::new();
        for neighbour in router.neighbours().keys() {
            let mut vector = DistanceVector::new();
            for dest in table.nodes() {
                if dest == neighbour {
                    continue;
                }
                if let Some((via, cost)) = table.best_via(dest) {
                    if via != neighbour {
                        vector.insert(dest.clone(), cost);
                    }
                }
            }
            vectors.insert(neighbour.clone(), vector);
        }
        Advertisement::PerNeighbour(vectors)
    }
}
