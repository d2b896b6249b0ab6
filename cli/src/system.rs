use dvsim::framework::RoutingSystem;

/// Nodes are identified by the names used in the input text
pub struct TextSystem;

impl RoutingSystem for TextSystem {
    type NodeAddress = String;
}
