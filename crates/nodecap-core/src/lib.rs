pub mod config;
pub mod error;
pub mod quantity;
pub mod types;

pub use config::{AccountingConfig, ClusterConfig, NodecapConfig, ServerConfig};
pub use error::{QuantityError, QuantityResult};
pub use quantity::Quantity;
pub use types::*;
