pub mod dataset;
pub mod filter;
pub mod picking;
pub mod spatial;

pub use dataset::*;
pub use filter::*;
pub use picking::*;
pub use spatial::*;
