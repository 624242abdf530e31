pub mod xlsx;

pub use xlsx::*;
