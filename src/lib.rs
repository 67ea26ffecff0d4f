//! MooDream Gateway - natural language commands to verified, triggered actions

pub mod core;
pub mod dispatch;
pub mod llm;
pub mod pipeline;
pub mod verify;

pub use crate::core::{GatewayConfig, GatewayError, Proof, Result, Stage};
pub use crate::pipeline::{handle_natural_input, Pipeline, PipelineResult, PipelineState};
pub use crate::verify::{KeccakVerifier, Verifier};
