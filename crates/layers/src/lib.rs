pub mod labels;
pub mod lod;
pub mod symbology;

pub use lod::*;
