use educe::Educe;
use thiserror::Error;

use crate::framework::RoutingSystem;

/// Conditions that stop a router or a convergence run.
/// None of these are recoverable by retrying the same operation on the same state.
#[derive(Error)]
#[derive(Educe)]
#[educe(Debug(bound()), PartialEq(bound()))]
pub enum RoutingError<T: RoutingSystem> {
    /// A vector arrived from, or a link cost was looked up for, a node that is not a direct
    /// neighbour.
    /// Links are symmetric by construction, so this indicates the caller broke that contract.
    #[error("{router} has no link to {neighbour}")]
    UnknownNeighbour {
        router: T::NodeAddress,
        neighbour: T::NodeAddress,
    },
    /// An edge or a vector entry names a node outside the known node set
    #[error("{0} is not part of the network")]
    UnknownNode(T::NodeAddress),
    /// The round cap was hit before any round went by without a change.
    /// No routing tables are produced in this case.
    #[error("network did not converge within {rounds} rounds")]
    NonConvergence { rounds: usize },
}
