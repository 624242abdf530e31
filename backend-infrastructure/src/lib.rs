pub mod codecs;
pub mod config;
pub mod repositories;
pub mod services;

pub use codecs::*;
pub use config::*;
pub use repositories::*;
pub use services::*;
