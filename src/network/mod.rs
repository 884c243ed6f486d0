pub mod layout;
pub mod network;
pub mod spec;

pub use layout::Layout;
pub use network::Network;
pub use spec::NetworkSpec;
