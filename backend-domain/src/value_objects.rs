// Domain value objects
pub mod account_key;
pub mod anomaly_label;
pub mod file_name;

pub use account_key::*;
pub use anomaly_label::*;
pub use file_name::*;
