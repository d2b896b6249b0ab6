//! An I/O free simulator for distance-vector routing.
//!
//! A [`network::Network`] owns one [`router::Router`] per node.
//! A [`engine::ConvergenceEngine`] drives synchronized rounds of vector exchange over it, using an
//! [`framework::AdvertisementPolicy`] such as [`policy::PlainPolicy`] or [`policy::SplitHorizon`],
//! until no distance table changes.

pub mod concepts;
pub mod engine;
pub mod feedback;
pub mod framework;
pub mod network;
pub mod policy;
pub mod router;
pub mod util;
