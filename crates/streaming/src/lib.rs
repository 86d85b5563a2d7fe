pub mod cache;
pub mod io;
pub mod locator;
pub mod queue;
pub mod residency;
pub mod scheduler;

pub use cache::*;
pub use io::*;
pub use locator::*;
pub use queue::*;
pub use residency::*;
pub use scheduler::*;
