//! Language-model structuring stage
//!
//! Converts free text into a schema-shaped command:
//! command -> render_prompt -> LlmClient -> validate_output -> StructuredCommand

pub mod client;
pub mod parser;
pub mod schema;

pub use client::LlmClient;
pub use parser::{structure_command, validate_output};
pub use schema::{Priority, StructuredCommand, SCHEMA_TEMPLATE};
