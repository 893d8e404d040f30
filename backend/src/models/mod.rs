pub mod cluster;
pub mod deposit;
pub mod distance;
pub mod reference;

pub use cluster::*;
pub use deposit::*;
pub use distance::*;
pub use reference::*;
