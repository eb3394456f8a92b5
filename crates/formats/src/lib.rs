pub mod column;
pub mod data_frame;
pub mod geometry;

pub use column::*;
pub use data_frame::*;
pub use geometry::*;
