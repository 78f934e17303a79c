//! Explanation service seam.
//!
//! The orchestrator talks to the text-generation backend only through
//! [`ExplanationSource`]. The production implementation lives in the
//! `pharmaguard-llm` crate; [`MockExplanationSource`] serves tests.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{ClinicalRecommendation, LlmExplanation, MetabolizerPhenotype, RiskCategory};

/// Errors from the explanation backend.
#[derive(Error, Debug)]
pub enum ExplanationError {
    #[error("API key environment variable is not set")]
    MissingCredential,

    #[error("Could not connect to explanation service at {0}")]
    Connection(String),

    #[error("Explanation request timed out after {0}s")]
    Timeout(u64),

    #[error("Explanation service returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("API returned an empty response")]
    EmptyResponse,

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(String),
}

pub type ExplanationResult<T> = Result<T, ExplanationError>;

/// Inputs for one explanation request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExplanationRequest {
    pub drug: String,
    pub gene: String,
    pub phenotype: MetabolizerPhenotype,
    pub risk: RiskCategory,
}

/// Structured output of the explanation backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrugExplanation {
    pub recommendation: ClinicalRecommendation,
    pub explanation: LlmExplanation,
}

/// A backend capable of generating a clinical explanation for one drug.
pub trait ExplanationSource {
    /// Request recommendation and explanation text for a drug/gene/phenotype
    /// combination. A failure here aborts the whole analysis run.
    fn explain(
        &self,
        request: &ExplanationRequest,
    ) -> impl Future<Output = ExplanationResult<DrugExplanation>> + Send;
}

/// Test double that derives deterministic text from the request.
pub struct MockExplanationSource {
    fail: bool,
    calls: AtomicUsize,
}

impl Default for MockExplanationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExplanationSource {
    /// A source that answers every request.
    pub fn new() -> Self {
        Self {
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// A source that fails every request with [`ExplanationError::EmptyResponse`].
    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of explain calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ExplanationSource for MockExplanationSource {
    async fn explain(&self, request: &ExplanationRequest) -> ExplanationResult<DrugExplanation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ExplanationError::EmptyResponse);
        }

        Ok(DrugExplanation {
            recommendation: ClinicalRecommendation {
                summary: format!(
                    "Review {} therapy in light of the {} result.",
                    request.drug, request.phenotype
                ),
                dosage_adjustment: match request.risk {
                    RiskCategory::Safe => "Standard dosing".to_string(),
                    RiskCategory::AdjustDosage => "Reduce dose by 50%".to_string(),
                    RiskCategory::Toxic => "Avoid use; select alternative".to_string(),
                    RiskCategory::Ineffective => "Increase dose or switch agent".to_string(),
                    RiskCategory::Unknown => "Insufficient evidence for guidance".to_string(),
                },
                alternative_therapy: format!("Consider alternatives to {}.", request.drug),
                cpic_guideline: format!(
                    "CPIC Guideline for {} and {}",
                    request.gene, request.drug
                ),
            },
            explanation: LlmExplanation {
                summary: format!(
                    "{} metabolism of {} predicted as {}.",
                    request.gene, request.drug, request.risk
                ),
                biological_mechanism: format!(
                    "{} activity determines the rate at which {} is metabolized.",
                    request.gene, request.drug
                ),
                variant_interpretation: format!(
                    "The detected variants are consistent with a {} phenotype.",
                    request.phenotype
                ),
                risk_interpretation: format!(
                    "A {} classification suggests the standard regimen may need review.",
                    request.risk
                ),
            },
        })
    }
}
