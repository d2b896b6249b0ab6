use dvsim::concepts::edge::Edge;
use dvsim::engine::{Convergence, ConvergenceEngine, RoundSnapshot};
use dvsim::feedback::RoutingError;
use dvsim::framework::{AdvertisementPolicy, ProtocolParams, RoutingSystem};
use dvsim::network::Network;
use dvsim::policy::{PlainPolicy, SplitHorizon};
use dvsim::router::Router;

pub struct VirtualSystem;

impl RoutingSystem for VirtualSystem {
    type NodeAddress = String;
}

pub type Link<'a> = (&'a str, &'a str, i32);

/// Wraps a network together with everything observed while converging it
pub struct VirtualNetwork {
    pub network: Network<VirtualSystem>,
    pub snapshots: Vec<RoundSnapshot<VirtualSystem>>,
    pub params: ProtocolParams,
}

pub fn edges(links: &[Link]) -> Vec<Edge<VirtualSystem>> {
    links
        .iter()
        .map(|(a, b, cost)| {
            if *cost < 0 {
                Edge::removal(a.to_string(), b.to_string())
            } else {
                Edge::link(a.to_string(), b.to_string(), *cost as u16)
            }
        })
        .collect()
}

impl VirtualNetwork {
    pub fn create(nodes: &[&str], links: &[Link]) -> VirtualNetwork {
        let nodes: Vec<String> = nodes.iter().map(|n| n.to_string()).collect();
        VirtualNetwork {
            network: Network::build(&nodes, &edges(links)).unwrap(),
            snapshots: Vec::new(),
            params: ProtocolParams::default(),
        }
    }

    pub fn update(&mut self, links: &[Link]) {
        self.network.apply_updates(&edges(links)).unwrap();
    }

    pub fn converge_with<P: AdvertisementPolicy<VirtualSystem>>(
        &mut self,
        policy: P,
    ) -> Result<Convergence<VirtualSystem>, RoutingError<VirtualSystem>> {
        let engine = ConvergenceEngine::with_params(policy, self.params.clone());
        self.snapshots.clear();
        let snapshots = &mut self.snapshots;
        engine.run_observed(&mut self.network, &mut |s: &RoundSnapshot<VirtualSystem>| {
            snapshots.push(s.clone())
        })
    }

    pub fn converge_plain(&mut self) -> Convergence<VirtualSystem> {
        self.converge_with(PlainPolicy).unwrap()
    }

    pub fn converge_split(&mut self) -> Convergence<VirtualSystem> {
        self.converge_with(SplitHorizon).unwrap()
    }

    pub fn get_node(&self, node: &str) -> &Router<VirtualSystem> {
        self.network
            .router(&node.to_string())
            .unwrap_or_else(|| panic!("No node {node} found"))
    }

    pub fn get_next_hop(&self, cur: &str, dst: &str) -> Option<String> {
        self.get_node(cur)
            .routes
            .get(dst)
            .unwrap_or_else(|| panic!("No route found to {dst}"))
            .next_hop
            .clone()
    }

    pub fn get_metric_to(&self, cur: &str, dst: &str) -> u16 {
        self.get_node(cur)
            .routes
            .get(dst)
            .unwrap_or_else(|| panic!("No route found to {dst}"))
            .metric
    }

    pub fn freeze(&self) -> String {
        serde_json::to_string(&self.network).unwrap()
    }

    pub fn restore(state: &str) -> VirtualNetwork {
        VirtualNetwork {
            network: serde_json::from_str(state).unwrap(),
            snapshots: Vec::new(),
            params: ProtocolParams::default(),
        }
    }
}
