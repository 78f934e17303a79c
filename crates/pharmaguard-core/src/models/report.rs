//! Report data model: risk enums, alerts, per-drug results, and the
//! aggregate report.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Predicted clinical risk category for a drug.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RiskCategory {
    Safe,
    #[serde(rename = "Adjust Dosage")]
    AdjustDosage,
    Toxic,
    Ineffective,
    Unknown,
}

impl RiskCategory {
    /// The four categories a prediction can land on. `Unknown` is reserved
    /// for drugs the predictor declines to classify.
    pub const CLINICAL: [RiskCategory; 4] = [
        RiskCategory::Safe,
        RiskCategory::AdjustDosage,
        RiskCategory::Toxic,
        RiskCategory::Ineffective,
    ];

    /// Display label, matching the export schema's `risk_label` values.
    pub fn label(&self) -> &'static str {
        match self {
            RiskCategory::Safe => "Safe",
            RiskCategory::AdjustDosage => "Adjust Dosage",
            RiskCategory::Toxic => "Toxic",
            RiskCategory::Ineffective => "Ineffective",
            RiskCategory::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Metabolizer phenotype, ordered from lowest to highest enzyme activity.
///
/// The ordering is load-bearing: the probability distribution assigns mass
/// to index neighbors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum MetabolizerPhenotype {
    #[serde(rename = "Poor Metabolizer (PM)")]
    Poor,
    #[serde(rename = "Intermediate Metabolizer (IM)")]
    Intermediate,
    #[serde(rename = "Normal Metabolizer (NM)")]
    Normal,
    #[serde(rename = "Rapid Metabolizer (RM)")]
    Rapid,
    #[serde(rename = "Ultra-Rapid Metabolizer (URM)")]
    UltraRapid,
}

impl MetabolizerPhenotype {
    /// All phenotypes in activity order.
    pub const ALL: [MetabolizerPhenotype; 5] = [
        MetabolizerPhenotype::Poor,
        MetabolizerPhenotype::Intermediate,
        MetabolizerPhenotype::Normal,
        MetabolizerPhenotype::Rapid,
        MetabolizerPhenotype::UltraRapid,
    ];

    /// Position within the activity ordering (0 = Poor, 4 = Ultra-Rapid).
    pub fn index(&self) -> usize {
        match self {
            MetabolizerPhenotype::Poor => 0,
            MetabolizerPhenotype::Intermediate => 1,
            MetabolizerPhenotype::Normal => 2,
            MetabolizerPhenotype::Rapid => 3,
            MetabolizerPhenotype::UltraRapid => 4,
        }
    }

    /// Phenotype at a given activity index, if in range.
    pub fn from_index(index: usize) -> Option<MetabolizerPhenotype> {
        Self::ALL.get(index).copied()
    }

    /// Full clinical label, e.g. "Poor Metabolizer (PM)".
    pub fn label(&self) -> &'static str {
        match self {
            MetabolizerPhenotype::Poor => "Poor Metabolizer (PM)",
            MetabolizerPhenotype::Intermediate => "Intermediate Metabolizer (IM)",
            MetabolizerPhenotype::Normal => "Normal Metabolizer (NM)",
            MetabolizerPhenotype::Rapid => "Rapid Metabolizer (RM)",
            MetabolizerPhenotype::UltraRapid => "Ultra-Rapid Metabolizer (URM)",
        }
    }
}

impl fmt::Display for MetabolizerPhenotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifestyle factor that can shift observed metabolism (phenoconversion).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LifestyleFactor {
    Smoker,
    Alcohol,
    Grapefruit,
    Coffee,
}

impl LifestyleFactor {
    /// All selectable factors.
    pub const ALL: [LifestyleFactor; 4] = [
        LifestyleFactor::Smoker,
        LifestyleFactor::Alcohol,
        LifestyleFactor::Grapefruit,
        LifestyleFactor::Coffee,
    ];
}

/// What an interaction alert is about.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AlertKind {
    #[serde(rename = "Drug-Drug")]
    DrugDrug,
    #[serde(rename = "Drug-Lifestyle")]
    DrugLifestyle,
}

/// Severity of an interaction alert.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AlertSeverity {
    High,
    Moderate,
    Low,
}

/// An interaction finding produced by the rule evaluator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractionAlert {
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    /// Short human-readable statement of the problem
    pub description: String,
    /// Pharmacological mechanism behind the interaction
    pub mechanism: String,
}

/// Per-drug assessment severity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// All severities, for uniform draws.
    pub const ALL: [Severity; 3] = [Severity::Low, Severity::Medium, Severity::High];

    /// Lower-case label used by the export schema.
    pub fn as_lower_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

/// Risk assessment for a single drug.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskAssessment {
    pub category: RiskCategory,
    /// Model confidence in [0, 1]
    pub confidence_score: f64,
    pub severity: Severity,
}

/// A detected gene variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariantInfo {
    /// dbSNP reference id, e.g. "rs4244285"
    pub rsid: String,
    /// Star-allele designator, e.g. "*2"
    pub allele: String,
}

/// Pharmacogenomic profile for one drug/gene pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PharmacogenomicProfile {
    pub gene: String,
    /// Star-allele pair, e.g. "*1/*2"
    pub diplotype: String,
    pub phenotype: MetabolizerPhenotype,
    pub variants: Vec<VariantInfo>,
}

/// Clinical recommendation returned by the explanation service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClinicalRecommendation {
    pub summary: String,
    pub dosage_adjustment: String,
    pub alternative_therapy: String,
    pub cpic_guideline: String,
}

/// Explainability report returned by the explanation service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmExplanation {
    pub summary: String,
    pub biological_mechanism: String,
    pub variant_interpretation: String,
    pub risk_interpretation: String,
}

/// Probability assigned to one phenotype class, as an integer percentage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhenotypeProbability {
    pub phenotype: MetabolizerPhenotype,
    pub probability: u8,
}

/// CPIC-style evidence level for the prediction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EvidenceLevel {
    #[serde(rename = "1A")]
    Level1A,
    #[serde(rename = "1B")]
    Level1B,
    #[serde(rename = "2A")]
    Level2A,
    #[serde(rename = "2B")]
    Level2B,
    #[serde(rename = "3")]
    Level3,
    #[serde(rename = "4")]
    Level4,
}

impl EvidenceLevel {
    /// All levels, for uniform draws.
    pub const ALL: [EvidenceLevel; 6] = [
        EvidenceLevel::Level1A,
        EvidenceLevel::Level1B,
        EvidenceLevel::Level2A,
        EvidenceLevel::Level2B,
        EvidenceLevel::Level3,
        EvidenceLevel::Level4,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EvidenceLevel::Level1A => "1A",
            EvidenceLevel::Level1B => "1B",
            EvidenceLevel::Level2A => "2A",
            EvidenceLevel::Level2B => "2B",
            EvidenceLevel::Level3 => "3",
            EvidenceLevel::Level4 => "4",
        }
    }
}

/// Full analysis output for one drug. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrugAnalysisResult {
    pub drug_name: String,
    pub risk_assessment: RiskAssessment,
    pub pharmacogenomic_profile: PharmacogenomicProfile,
    pub clinical_recommendation: ClinicalRecommendation,
    pub llm_explanation: LlmExplanation,
    /// Distribution over all five phenotype classes, in activity order
    pub phenotype_probabilities: Vec<PhenotypeProbability>,
    pub evidence_level: EvidenceLevel,
    pub suggested_monitoring: String,
    pub references: Vec<String>,
}

/// Aggregate risk over the whole regimen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum OverallRisk {
    Low,
    Medium,
    High,
}

/// Run-level quality indicators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QualityMetrics {
    pub vcf_parsing_success: bool,
    pub prediction_accuracy: f64,
}

/// The root report aggregate. Constructed once per analysis run and
/// replaced wholesale on the next run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportData {
    /// Run identifier, used in log events; never exported
    pub report_id: Uuid,
    /// Derived from the uploaded file name
    pub patient_id: String,
    pub overall_risk: OverallRisk,
    pub summary_text: String,
    pub results: Vec<DrugAnalysisResult>,
    pub interaction_alerts: Vec<InteractionAlert>,
    pub quality_metrics: QualityMetrics,
    pub generated_at: DateTime<Utc>,
}
