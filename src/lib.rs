pub mod config;
pub mod errors;
pub mod gateway;
pub mod pool;

pub use config::GatewayConfig;
pub use errors::BeginError;
pub use gateway::{ConnectionGateway, ProbeState};
pub use pool::{Transaction, TransactionPool};
