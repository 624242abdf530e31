// Domain entities
pub mod balance_record;
pub mod runtime_config;
pub mod sheet;
pub mod upload;

pub use balance_record::*;
pub use runtime_config::*;
pub use sheet::*;
pub use upload::*;
