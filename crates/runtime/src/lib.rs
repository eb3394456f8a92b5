pub mod interpolate;
pub mod query;
pub mod sink;
pub mod variables;

pub use interpolate::*;
pub use query::*;
pub use sink::*;
pub use variables::*;
