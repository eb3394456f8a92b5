pub mod bridge;
pub mod features;
pub mod frame;
pub mod options;
pub mod schema;
pub mod style;

pub use bridge::*;
pub use features::*;
pub use frame::*;
pub use options::*;
pub use schema::*;
pub use style::*;
