pub mod dataset_file;
pub mod loader;

pub use dataset_file::*;
pub use loader::*;
