use crate::common::virtual_network::VirtualNetwork;

pub fn vnet_triangle() -> VirtualNetwork {
    VirtualNetwork::create(
        &["A", "B", "C"],
        &[("A", "B", 1), ("B", "C", 1), ("A", "C", 4)],
    )
}

pub fn vnet_line() -> VirtualNetwork {
    VirtualNetwork::create(&["A", "B", "C"], &[("A", "B", 1), ("B", "C", 1)])
}

/// every path between opposite corners costs the same
pub fn vnet_square() -> VirtualNetwork {
    VirtualNetwork::create(
        &["A", "B", "C", "D"],
        &[("A", "B", 1), ("A", "C", 1), ("B", "D", 1), ("C", "D", 1)],
    )
}

pub fn vnet_simple_weighted() -> VirtualNetwork {
    VirtualNetwork::create(
        &["1", "2", "3", "4", "5"],
        &[
            ("1", "2", 2),
            ("1", "3", 1),
            ("2", "3", 4),
            ("2", "4", 5),
            ("3", "4", 100),
            ("3", "5", 8),
            ("4", "5", 1),
        ],
    )
}

/// node 5 starts isolated, the 4-5 entry is a "no link" marker
pub fn vnet_partitioned() -> VirtualNetwork {
    VirtualNetwork::create(
        &["1", "2", "3", "4", "5"],
        &[("1", "2", 1), ("2", "3", 1), ("3", "4", 1), ("4", "5", -1)],
    )
}
