use crate::concepts::advertisement::Advertisement;
use crate::concepts::route::RoutingTable;
use crate::concepts::table::DistanceTable;
use crate::feedback::RoutingError;
use crate::framework::{AdvertisementPolicy, ProtocolParams, RoutingSystem};
use crate::network::Network;
use educe::Educe;
use log::{debug, error};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Every router's distance table as it stood at the start of a round
#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()), PartialEq(bound()))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(bound = ""))]
pub struct RoundSnapshot<T: RoutingSystem> {
    pub round: usize,
    #[cfg_attr(feature = "serde", serde(with = "crate::util::address_pairs"))]
    pub tables: BTreeMap<T::NodeAddress, DistanceTable<T>>,
}

impl<T: RoutingSystem> RoundSnapshot<T> {
    pub fn capture(round: usize, network: &Network<T>) -> Self {
        Self {
            round,
            tables: network
                .routers()
                .map(|(addr, router)| (addr.clone(), router.table().clone()))
                .collect(),
        }
    }
}

/// Receives a snapshot before each round's advertisements are computed
pub trait RoundObserver<T: RoutingSystem> {
    fn observe(&mut self, snapshot: &RoundSnapshot<T>);
}

impl<T: RoutingSystem, F: FnMut(&RoundSnapshot<T>)> RoundObserver<T> for F {
    fn observe(&mut self, snapshot: &RoundSnapshot<T>) {
        self(snapshot)
    }
}

/// Outcome of a run that reached a fixed point
#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()), PartialEq(bound()))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(bound = ""))]
pub struct Convergence<T: RoutingSystem> {
    /// number of rounds executed, including the final round that changed nothing
    pub rounds: usize,
    #[cfg_attr(feature = "serde", serde(with = "crate::util::address_pairs"))]
    pub routes: BTreeMap<T::NodeAddress, RoutingTable<T>>,
}

/// Drives synchronized exchange rounds over a network until no distance table changes
#[derive(Clone, Debug, Default)]
pub struct ConvergenceEngine<P> {
    policy: P,
    params: ProtocolParams,
}

impl<P> ConvergenceEngine<P> {
    pub fn new(policy: P) -> Self {
        Self::with_params(policy, ProtocolParams::default())
    }

    pub fn with_params(policy: P, params: ProtocolParams) -> Self {
        Self { policy, params }
    }

    /// Runs to a fixed point without observing intermediate rounds
    pub fn run<T>(&self, network: &mut Network<T>) -> Result<Convergence<T>, RoutingError<T>>
    where
        T: RoutingSystem,
        P: AdvertisementPolicy<T>,
    {
        self.converge(network, |_, _| {})
    }

    /// Runs to a fixed point, handing `observer` a snapshot of every round before it is exchanged
    pub fn run_observed<T, O>(
        &self,
        network: &mut Network<T>,
        observer: &mut O,
    ) -> Result<Convergence<T>, RoutingError<T>>
    where
        T: RoutingSystem,
        P: AdvertisementPolicy<T>,
        O: RoundObserver<T> + ?Sized,
    {
        self.converge(network, |round, network| {
            observer.observe(&RoundSnapshot::capture(round, network))
        })
    }

    /// Exchanges rounds until one changes nothing, then derives every router's routing table.
    ///
    /// Every router advertises from the table it had before the round started, so the order in
    /// which deliveries happen within a round has no effect on the result.
    fn converge<T, F>(
        &self,
        network: &mut Network<T>,
        mut on_round: F,
    ) -> Result<Convergence<T>, RoutingError<T>>
    where
        T: RoutingSystem,
        P: AdvertisementPolicy<T>,
        F: FnMut(usize, &Network<T>),
    {
        for (_, router) in network.routers_mut() {
            router.routes.clear();
        }

        let mut round = 0;
        loop {
            if round >= self.params.max_rounds {
                error!("Network did not converge within {round} rounds, giving up");
                return Err(RoutingError::NonConvergence { rounds: round });
            }
            on_round(round, &*network);

            if !self.exchange(network)? {
                break;
            }
            round += 1;
        }
        debug!("Converged at round {round}");

        for (_, router) in network.routers_mut() {
            router.compute_routing_table();
        }
        Ok(Convergence {
            rounds: round + 1,
            routes: network.routing_tables(),
        })
    }

    /// A single synchronous round, returns true if any router changed
    pub fn exchange<T>(&self, network: &mut Network<T>) -> Result<bool, RoutingError<T>>
    where
        T: RoutingSystem,
        P: AdvertisementPolicy<T>,
    {
        let adverts: BTreeMap<T::NodeAddress, Advertisement<T>> = network
            .routers()
            .map(|(addr, router)| (addr.clone(), self.policy.advertise(router)))
            .collect();

        let mut changed = false;
        for (addr, router) in network.routers_mut() {
            let senders: Vec<T::NodeAddress> = router.neighbours().keys().cloned().collect();
            for sender in senders {
                let vector = adverts
                    .get(&sender)
                    .and_then(|advert| advert.vector_for(addr));
                if let Some(vector) = vector {
                    changed |= router.receive_update(&sender, vector)?;
                }
            }
        }
        Ok(changed)
    }
}
