pub mod advertisement;
pub mod edge;
pub mod neighbour;
pub mod route;
pub mod table;
