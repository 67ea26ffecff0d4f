pub mod config;
pub mod error;
pub mod types;

pub use config::{GatewayConfig, LlmConfig, OracleConfig};
pub use error::{ErrorKind, GatewayError, Result};
pub use types::{Proof, RunId, Stage};
