use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::io::{self, Write};

use dvsim::concepts::route::RoutingTable;
use dvsim::concepts::table::DistanceTable;
use dvsim::engine::{Convergence, RoundSnapshot};
use dvsim::router::INF;
use serde::Serialize;

use crate::system::TextSystem;

pub const UNREACHABLE: &str = "INF";

/// A cost as users see it, the `INF` sentinel is spelled out instead of printed as a number
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(untagged)]
pub enum Cost {
    Finite(u16),
    Unreachable(&'static str),
}

impl From<u16> for Cost {
    fn from(cost: u16) -> Self {
        if cost >= INF {
            Cost::Unreachable(UNREACHABLE)
        } else {
            Cost::Finite(cost)
        }
    }
}

impl Display for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Cost::Finite(cost) => write!(f, "{cost}"),
            Cost::Unreachable(marker) => f.write_str(marker),
        }
    }
}

// region JSON view

/// Destination -> via -> cost
pub type TableView = BTreeMap<String, BTreeMap<String, Cost>>;

#[derive(Serialize, Debug)]
pub struct SnapshotView {
    pub round: usize,
    /// Router -> its distance table
    pub tables: BTreeMap<String, TableView>,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct RouteView {
    pub next_hop: String,
    pub cost: Cost,
}

#[derive(Serialize, Debug)]
pub struct ConvergenceView {
    pub rounds: usize,
    /// Router -> destination -> route
    pub routes: BTreeMap<String, BTreeMap<String, RouteView>>,
}

pub fn table_view(table: &DistanceTable<TextSystem>) -> TableView {
    table
        .nodes()
        .iter()
        .map(|dest| {
            let vias = table
                .row(dest)
                .map(|(via, cost)| (via.clone(), Cost::from(cost)))
                .collect();
            (dest.clone(), vias)
        })
        .collect()
}

pub fn snapshot_view(snapshot: &RoundSnapshot<TextSystem>) -> SnapshotView {
    SnapshotView {
        round: snapshot.round,
        tables: snapshot
            .tables
            .iter()
            .map(|(name, table)| (name.clone(), table_view(table)))
            .collect(),
    }
}

pub fn convergence_view(convergence: &Convergence<TextSystem>) -> ConvergenceView {
    let routes = convergence
        .routes
        .iter()
        .map(|(name, table)| {
            let table = table
                .iter()
                .map(|(dest, route)| {
                    let view = RouteView {
                        next_hop: route.next_hop.as_deref().unwrap_or(UNREACHABLE).to_string(),
                        cost: Cost::from(route.metric),
                    };
                    (dest.clone(), view)
                })
                .collect();
            (name.clone(), table)
        })
        .collect();
    ConvergenceView {
        rounds: convergence.rounds,
        routes,
    }
}
// endregion

// region Text layout

pub fn write_snapshot<W: Write>(
    out: &mut W,
    snapshot: &RoundSnapshot<TextSystem>,
) -> io::Result<()> {
    writeln!(out, "=== Step {} ===", snapshot.round)?;
    for (name, table) in &snapshot.tables {
        write_distance_table(out, name, snapshot.round, table)?;
    }
    Ok(())
}

pub fn write_distance_table<W: Write>(
    out: &mut W,
    name: &str,
    round: usize,
    table: &DistanceTable<TextSystem>,
) -> io::Result<()> {
    writeln!(out, "{name} Distance Table at t={round}")?;
    writeln!(out, "    {}", table.nodes().join("  "))?;
    for dest in table.nodes() {
        let mut row = vec![dest.clone()];
        row.extend(table.row(dest).map(|(_, c)| Cost::from(c).to_string()));
        writeln!(out, "{}", row.join("  "))?;
    }
    writeln!(out)
}

pub fn write_routing_table<W: Write>(
    out: &mut W,
    name: &str,
    routes: &RoutingTable<TextSystem>,
) -> io::Result<()> {
    writeln!(out, "{name} Routing Table:")?;
    for (dest, route) in routes {
        let hop = route.next_hop.as_deref().unwrap_or(UNREACHABLE);
        writeln!(out, "{dest},{hop},{}", Cost::from(route.metric))?;
    }
    writeln!(out)
}

pub fn write_routing_tables<W: Write>(
    out: &mut W,
    routes: &BTreeMap<String, RoutingTable<TextSystem>>,
) -> io::Result<()> {
    for (name, table) in routes {
        write_routing_table(out, name, table)?;
    }
    Ok(())
}
// endregion
