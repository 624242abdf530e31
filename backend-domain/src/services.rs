pub mod isolation_forest;
pub mod scorer;

pub use isolation_forest::*;
pub use scorer::*;
