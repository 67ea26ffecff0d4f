//! Verification gate
//!
//! The gate converts a structured command into a proof or refuses it.
//! The pipeline treats the call as atomic and opaque: it only forwards the
//! failure text, never inspects why verification failed.

pub mod keccak;

pub use keccak::KeccakVerifier;

use crate::core::error::Result;
use crate::core::types::Proof;
use crate::llm::schema::StructuredCommand;
use std::sync::Arc;

/// Pluggable verification authority
///
/// Implementations must only return `Ok` after a successful verification,
/// and must report refusals as `GatewayError::Verification`.
pub trait Verifier: Send + Sync {
    fn verify(&self, command: &StructuredCommand) -> Result<Proof>;
}

impl<V: Verifier + ?Sized> Verifier for Arc<V> {
    fn verify(&self, command: &StructuredCommand) -> Result<Proof> {
        (**self).verify(command)
    }
}

impl<V: Verifier + ?Sized> Verifier for Box<V> {
    fn verify(&self, command: &StructuredCommand) -> Result<Proof> {
        (**self).verify(command)
    }
}
