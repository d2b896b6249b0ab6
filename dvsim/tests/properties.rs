use dvsim::engine::ConvergenceEngine;
use dvsim::framework::AdvertisementPolicy;
use dvsim::policy::{PlainPolicy, SplitHorizon};
use dvsim::router::INF;

use crate::common::virtual_network::{VirtualNetwork, VirtualSystem};

mod common;

fn all_graphs() -> Vec<VirtualNetwork> {
    vec![
        common::graphs::vnet_triangle(),
        common::graphs::vnet_line(),
        common::graphs::vnet_square(),
        common::graphs::vnet_simple_weighted(),
        common::graphs::vnet_partitioned(),
    ]
}

#[test]
fn self_distance_is_zero() {
    for split in [false, true] {
        for mut network in all_graphs() {
            if split {
                network.converge_split();
            } else {
                network.converge_plain();
            }
            for (addr, router) in network.network.routers() {
                assert_eq!(router.table().get(addr, addr), 0);
            }
            for snapshot in &network.snapshots {
                for (addr, table) in &snapshot.tables {
                    assert_eq!(table.get(addr, addr), 0);
                }
            }
        }
    }
}

#[test]
fn costs_never_increase_within_a_run() {
    for split in [false, true] {
        for mut network in all_graphs() {
            if split {
                network.converge_split();
            } else {
                network.converge_plain();
            }
            for pair in network.snapshots.windows(2) {
                let (before, after) = (&pair[0], &pair[1]);
                assert_eq!(before.round + 1, after.round);
                for (addr, table) in &before.tables {
                    let next = &after.tables[addr];
                    for dest in table.nodes() {
                        for (via, cost) in table.row(dest) {
                            assert!(next.get(dest, via) <= cost);
                            assert!(cost <= INF);
                        }
                    }
                }
            }
        }
    }
}

fn assert_fixed_point<P>(policy: P)
where
    P: AdvertisementPolicy<VirtualSystem> + Copy,
{
    for mut network in all_graphs() {
        let first = network.converge_with(policy).unwrap();

        let adverts: Vec<_> = network
            .network
            .routers()
            .map(|(_, r)| policy.advertise(r))
            .collect();
        let engine = ConvergenceEngine::new(policy);
        assert!(!engine.exchange(&mut network.network).unwrap());
        let again: Vec<_> = network
            .network
            .routers()
            .map(|(_, r)| policy.advertise(r))
            .collect();
        assert_eq!(adverts, again);

        // a second run stops after a single, quiet round
        let second = network.converge_with(policy).unwrap();
        assert_eq!(second.rounds, 1);
        assert_eq!(first.routes, second.routes);
    }
}

#[test]
fn converged_state_is_a_fixed_point() {
    assert_fixed_point(PlainPolicy);
    assert_fixed_point(SplitHorizon);
}

#[test]
fn split_horizon_never_advertises_back() {
    let mut network = common::graphs::vnet_simple_weighted();
    let mut checked = 0;
    // check the advertisements at every intermediate state as well as at convergence
    let engine = ConvergenceEngine::new(SplitHorizon);
    loop {
        for (_, router) in network.network.routers() {
            let advert = SplitHorizon.advertise(router);
            for neighbour in router.neighbours().keys() {
                let vector = advert.vector_for(neighbour).unwrap();
                assert!(!vector.contains(neighbour));
                for (dest, cost) in vector.iter() {
                    let (best_via, best_cost) = router.table().best_via(dest).unwrap();
                    assert_ne!(best_via, neighbour);
                    assert_eq!(best_cost, cost);
                    checked += 1;
                }
            }
        }
        if !engine.exchange(&mut network.network).unwrap() {
            break;
        }
    }
    assert!(checked > 0);
}

#[test]
fn split_horizon_suppresses_learned_routes() {
    let mut network = common::graphs::vnet_line();
    network.converge_split();

    // B reaches C directly, so it must not tell C about C, and A learned C from B
    let a = network.get_node("A");
    let advert = SplitHorizon.advertise(a);
    let to_b = advert.vector_for(&"B".to_string()).unwrap();
    assert_eq!(to_b.len(), 1);
    assert_eq!(to_b.get(&"C".to_string()), None);
    assert_eq!(to_b.get(&"A".to_string()), Some(0));

    let plain = PlainPolicy.advertise(a);
    assert_eq!(plain.vector_for(&"B".to_string()).unwrap().get(&"C".to_string()), Some(2));
}

#[test]
fn runs_are_deterministic() {
    for split in [false, true] {
        let mut first = common::graphs::vnet_simple_weighted();
        let mut second = common::graphs::vnet_simple_weighted();
        let (a, b) = if split {
            (first.converge_split(), second.converge_split())
        } else {
            (first.converge_plain(), second.converge_plain())
        };
        assert_eq!(a, b);
        assert_eq!(first.snapshots, second.snapshots);
        assert_eq!(first.freeze(), second.freeze());
    }
}

#[test]
fn snapshots_start_at_round_zero() {
    let mut network = common::graphs::vnet_triangle();
    let result = network.converge_plain();

    assert_eq!(network.snapshots.len(), result.rounds);
    assert_eq!(network.snapshots[0].round, 0);
    let initial = &network.snapshots[0].tables["A"];
    assert_eq!(initial.get(&"B".to_string(), &"B".to_string()), 1);
    assert_eq!(initial.get(&"C".to_string(), &"C".to_string()), 4);
    assert_eq!(initial.get(&"C".to_string(), &"B".to_string()), INF);
}

#[test]
fn freeze_and_restore() {
    let mut network = common::graphs::vnet_triangle();
    network.converge_plain();
    let state = network.freeze();
    // address keyed maps are stored as pairs, not as JSON objects
    assert!(state.contains(r#""routers":[["A",{"address":"A","neighbours":[["B","#));

    let mut restored = VirtualNetwork::restore(&state);
    assert_eq!(restored.network, network.network);
    assert_eq!(restored.get_metric_to("A", "C"), 2);

    restored.update(&[("D", "C", 5)]);
    restored.converge_plain();
    assert_eq!(restored.get_metric_to("A", "D"), 7);
}

#[test]
fn unobserved_run_matches_observed_run() {
    for mut observed in all_graphs() {
        let mut unobserved = observed.network.clone();
        let expected = observed.converge_split();
        let result = ConvergenceEngine::new(SplitHorizon).run(&mut unobserved).unwrap();
        assert_eq!(result, expected);
        assert_eq!(result.rounds, observed.snapshots.len());
        assert_eq!(unobserved, observed.network);
    }
}
