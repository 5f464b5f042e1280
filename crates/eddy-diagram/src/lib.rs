pub mod diagram;
pub mod edge;
pub mod node;

pub use diagram::Diagram;
pub use edge::Edge;
pub use node::Node;
