//! PharmaGuard Core Library
//!
//! Pharmacogenomic risk-report engine: turns a genomic-file reference, a
//! medication selection, and lifestyle factors into an aggregate risk
//! report with per-drug explanations from a text-generation backend.
//!
//! # Architecture
//!
//! ```text
//! File ref + Drugs + Lifestyle
//!          │
//!          ▼
//!   Input validation ──────────► rejected at entry, never reaches the run
//!          │
//!          ▼
//!   Interaction Rules          Phenotype Predictor (per drug)
//!          │                            │
//!          └──────────┬─────────────────┘
//!                     │
//!        Explanation fan-out (one request per drug, all-or-nothing)
//!                     │
//!                     ▼
//!             Report Assembler
//!                     │
//!          ┌──────────┴──────────┐
//!          ▼                     ▼
//!      Presentation        Export Formatter
//! ```
//!
//! # Modules
//!
//! - [`models`]: domain types (catalog, alerts, results, report)
//! - [`input`]: file-reference validation and patient-id derivation
//! - [`interactions`]: fixed drug-drug / drug-lifestyle rules
//! - [`predictor`]: pluggable phenotype prediction (mock implementation)
//! - [`explain`]: explanation-backend seam consumed by the orchestrator
//! - [`assembler`]: report assembly and overall-risk derivation
//! - [`export`]: flat snake-case download schema
//! - [`session`]: session state, busy flag, and run orchestration

pub mod assembler;
pub mod explain;
pub mod export;
pub mod input;
pub mod interactions;
pub mod models;
pub mod predictor;
pub mod session;

// Re-export commonly used types
pub use assembler::{assemble_report, derive_overall_risk};
pub use explain::{
    DrugExplanation, ExplanationError, ExplanationRequest, ExplanationResult,
    ExplanationSource, MockExplanationSource,
};
pub use export::{export_file_name, ExportPayload, ExportRecord};
pub use input::{GenomeFileRef, InputError, GENOME_FILE_EXT, MAX_GENOME_FILE_BYTES};
pub use interactions::evaluate_interactions;
pub use models::{
    AlertKind, AlertSeverity, ClinicalRecommendation, DrugAnalysisResult, DrugCatalog,
    DrugCatalogEntry, EvidenceLevel, InteractionAlert, LifestyleFactor, LlmExplanation,
    MetabolizerPhenotype, OverallRisk, PharmacogenomicProfile, PhenotypeProbability,
    QualityMetrics, ReportData, RiskAssessment, RiskCategory, Severity, VariantInfo,
    SUPPORTED_DRUGS, UNKNOWN_GENE,
};
pub use predictor::{MockPhenotypePredictor, PhenotypePredictor, SyntheticProfile};
pub use session::{AnalysisError, AnalysisSession, Analyzer};
