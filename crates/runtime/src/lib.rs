pub mod event_bus;
pub mod frame;
pub mod metrics;
pub mod work_queue;

pub use event_bus::*;
pub use frame::*;
pub use metrics::*;
pub use work_queue::*;
