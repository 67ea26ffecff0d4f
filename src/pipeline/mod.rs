//! Pipeline orchestration
//!
//! Sequences the three stages for one command:
//! START -> STRUCTURED -> VERIFIED -> DISPATCHED
//!
//! Any stage failure jumps straight to a terminal failed state. Failures
//! never escape `Pipeline::run`; they become the status text of the result.
//! The proof is withheld when verification fails but returned when dispatch
//! fails, so callers can retry dispatch out-of-band.

use crate::core::config::GatewayConfig;
use crate::core::error::{ErrorKind, GatewayError, Result};
use crate::core::types::{Proof, RunId, Stage};
use crate::dispatch::TriggerDispatcher;
use crate::llm::{structure_command, LlmClient};
use crate::verify::Verifier;
use std::sync::Arc;
use tracing::Instrument;

pub const TRIGGERED_STATUS: &str = "MooDream OS Deployment Initiated and CSIP/MRP Triggered.";
pub const STRUCTURING_PREFIX: &str = "P Module Error: AI structuring failed.";
pub const VERIFICATION_PREFIX: &str = "M Module Error:";
pub const DISPATCH_PREFIX: &str = "Oracle System Error: Failed to trigger N Module.";

/// Terminal state of one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Dispatched,
    Failed { stage: Stage, kind: ErrorKind },
}

/// Outcome handed back to the caller
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineResult {
    pub status: String,
    pub proof: Option<Proof>,
    pub state: PipelineState,
}

impl PipelineResult {
    fn triggered(proof: Proof) -> Self {
        Self {
            status: TRIGGERED_STATUS.to_string(),
            proof: Some(proof),
            state: PipelineState::Dispatched,
        }
    }

    fn failed(stage: Stage, error: GatewayError, proof: Option<Proof>) -> Self {
        let status = match stage {
            Stage::Structuring => format!("{} {}", STRUCTURING_PREFIX, error),
            Stage::Verification => format!("{} {}", VERIFICATION_PREFIX, error),
            Stage::Dispatch => format!("{} {}", DISPATCH_PREFIX, error),
        };
        Self {
            status,
            proof,
            state: PipelineState::Failed {
                stage,
                kind: error.kind(),
            },
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.state == PipelineState::Dispatched
    }

    /// Stage that ended the run, if it failed
    pub fn failed_stage(&self) -> Option<Stage> {
        match self.state {
            PipelineState::Dispatched => None,
            PipelineState::Failed { stage, .. } => Some(stage),
        }
    }

    /// `(status_message, proof_or_null)`
    pub fn into_pair(self) -> (String, Option<String>) {
        (self.status, self.proof.map(Proof::into_inner))
    }
}

/// Structures, verifies, and dispatches natural language commands
pub struct Pipeline {
    llm: LlmClient,
    verifier: Arc<dyn Verifier>,
    dispatcher: TriggerDispatcher,
}

impl Pipeline {
    /// Build a pipeline with HTTP clients for both configured endpoints
    pub fn new(config: &GatewayConfig, verifier: impl Verifier + 'static) -> Result<Self> {
        Ok(Self::from_parts(
            LlmClient::new(&config.llm)?,
            verifier,
            TriggerDispatcher::new(&config.oracle)?,
        ))
    }

    pub fn from_parts(
        llm: LlmClient,
        verifier: impl Verifier + 'static,
        dispatcher: TriggerDispatcher,
    ) -> Self {
        Self {
            llm,
            verifier: Arc::new(verifier),
            dispatcher,
        }
    }

    /// Run one command through all stages
    pub async fn run(&self, command: &str) -> PipelineResult {
        let run_id = RunId::new();
        self.run_stages(command)
            .instrument(tracing::info_span!("pipeline", run = %run_id))
            .await
    }

    async fn run_stages(&self, command: &str) -> PipelineResult {
        tracing::info!(
            model = %self.llm.model(),
            command_len = command.len(),
            "pipeline started"
        );

        let structured = match structure_command(&self.llm, command).await {
            Ok(structured) => structured,
            Err(e) => return self.fail(Stage::Structuring, e, None),
        };
        tracing::info!(action = %structured.action, "structured");

        let proof = match self.verifier.verify(&structured) {
            Ok(proof) => proof,
            Err(e) => return self.fail(Stage::Verification, e, None),
        };
        tracing::info!("verified");

        match self.dispatcher.dispatch(&proof).await {
            Ok(outcome) => {
                tracing::info!(
                    status = outcome.status,
                    target = %self.dispatcher.target_contract(),
                    "dispatched"
                );
                PipelineResult::triggered(proof)
            }
            Err(e) => self.fail(Stage::Dispatch, e, Some(proof)),
        }
    }

    fn fail(&self, stage: Stage, error: GatewayError, proof: Option<Proof>) -> PipelineResult {
        tracing::warn!(stage = %stage, kind = ?error.kind(), error = %error, "pipeline failed");
        PipelineResult::failed(stage, error, proof)
    }
}

/// Public entry point: free text in, `(status, proof_or_null)` out
pub async fn handle_natural_input(pipeline: &Pipeline, input: &str) -> (String, Option<String>) {
    pipeline.run(input).await.into_pair()
}
