pub mod commands;
pub mod config;
pub mod events;
pub mod map;
pub mod overview;

pub use commands::*;
pub use config::*;
pub use events::*;
pub use map::*;
pub use overview::*;
