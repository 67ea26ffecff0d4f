//! Reference verifier minting Keccak-256 proofs
//!
//! Binds an entropy seed to the command's execution path and hashes the
//! pair. The `0x`-prefixed 32-byte hex digest is what a Solidity contract
//! reads as `bytes32`.

use crate::core::error::{GatewayError, Result};
use crate::core::types::Proof;
use crate::llm::schema::StructuredCommand;
use crate::verify::Verifier;
use rand::Rng;
use sha3::{Digest, Keccak256};

/// Separator between execution path segments in the hash input
const PATH_SEPARATOR: &str = "->";

/// Where the verifier's seed comes from
#[derive(Debug, Clone)]
enum EntropySource {
    /// Fresh random seed per verification
    Random,
    /// Caller-supplied seed, for reproducible proofs
    Fixed(String),
}

#[derive(Debug, Clone)]
pub struct KeccakVerifier {
    entropy: EntropySource,
}

impl KeccakVerifier {
    /// Verifier drawing a fresh 256-bit seed for every command
    pub fn new() -> Self {
        Self {
            entropy: EntropySource::Random,
        }
    }

    /// Verifier with a fixed seed; identical commands yield identical proofs
    pub fn with_seed(seed: impl Into<String>) -> Self {
        Self {
            entropy: EntropySource::Fixed(seed.into()),
        }
    }

    fn seed(&self) -> String {
        match &self.entropy {
            EntropySource::Random => {
                let bytes: [u8; 32] = rand::thread_rng().gen();
                hex::encode(bytes)
            }
            EntropySource::Fixed(seed) => seed.clone(),
        }
    }
}

impl Default for KeccakVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Verifier for KeccakVerifier {
    fn verify(&self, command: &StructuredCommand) -> Result<Proof> {
        let seed = self.seed();
        if seed.is_empty() {
            return Err(GatewayError::Verification(
                "failed to bind to entropy source".into(),
            ));
        }

        let path = execution_path(command)?;
        let proof = create_proof(&path, &seed);
        tracing::debug!(segments = path.len(), "minted proof");
        Ok(proof)
    }
}

/// Ordered path segments: action, then features, then constraints
pub fn execution_path(command: &StructuredCommand) -> Result<Vec<String>> {
    let action = command.action.trim();
    if action.is_empty() {
        return Err(GatewayError::Verification("action is blank".into()));
    }
    if let Some(blank) = command
        .features
        .iter()
        .chain(&command.constraints)
        .find(|s| s.trim().is_empty())
    {
        return Err(GatewayError::Verification(format!(
            "blank path segment {:?}",
            blank
        )));
    }

    let mut path = Vec::with_capacity(1 + command.features.len() + command.constraints.len());
    path.push(action.to_string());
    path.extend(command.features.iter().cloned());
    path.extend(command.constraints.iter().cloned());
    Ok(path)
}

fn create_proof(path: &[String], seed: &str) -> Proof {
    let mut hasher = Keccak256::new();
    hasher.update(path.join(PATH_SEPARATOR).as_bytes());
    hasher.update(seed.as_bytes());
    Proof::new(format!("0x{}", hex::encode(hasher.finalize())))
}
