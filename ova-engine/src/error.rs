//! Engine error types
//!
//! Model fitting failures are fatal: the engine must not serve scoring
//! requests against a partially fitted bundle. Per-reading failures never
//! surface here; they degrade locally inside the pipeline.

use thiserror::Error;

/// Fatal engine failures.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("model initialization failed: {0}")]
    ModelFit(#[from] FitError),
}

/// Failures while fitting a model to the training corpus.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FitError {
    #[error("training corpus is empty")]
    EmptyCorpus,
    #[error("feature '{0}' has zero variance in the training corpus")]
    ZeroVariance(&'static str),
    #[error("regression system is singular")]
    SingularSystem,
    #[error("non-finite value encountered while fitting")]
    NonFinite,
}
