//! Report export.
//!
//! Reshapes [`ReportData`] into the flat snake-case download schema. A
//! single-drug report exports as one object; multi-drug reports export as
//! an array with one record per drug — callers branch on the payload shape.

use chrono::Utc;
use serde::Serialize;

use crate::models::{
    DrugAnalysisResult, EvidenceLevel, MetabolizerPhenotype, ReportData, RiskCategory,
    VariantInfo,
};

/// Prefix for downloaded report files.
pub const EXPORT_FILE_PREFIX: &str = "PharmaGuard_Report";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExportRiskAssessment {
    pub risk_label: RiskCategory,
    pub confidence_score: f64,
    /// Lower-cased, unlike the in-memory severity
    pub severity: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExportProfile {
    pub primary_gene: String,
    pub diplotype: String,
    pub phenotype: MetabolizerPhenotype,
    pub detected_variants: Vec<VariantInfo>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExportRecommendation {
    pub summary: String,
    pub dosage_adjustment: String,
    pub alternative_therapy: String,
    pub cpic_guideline: String,
    pub evidence_level: EvidenceLevel,
    pub suggested_monitoring: String,
    pub references: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExportExplanation {
    pub summary: String,
    pub biological_mechanism: String,
    pub variant_interpretation: String,
    pub risk_interpretation: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExportQualityMetrics {
    pub vcf_parsing_success: bool,
    pub prediction_accuracy: f64,
}

/// One flat record per analyzed drug.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExportRecord {
    pub patient_id: String,
    pub drug: String,
    pub timestamp: String,
    pub risk_assessment: ExportRiskAssessment,
    pub pharmacogenomic_profile: ExportProfile,
    pub clinical_recommendation: ExportRecommendation,
    pub llm_generated_explanation: ExportExplanation,
    pub quality_metrics: ExportQualityMetrics,
}

impl ExportRecord {
    fn from_result(report: &ReportData, result: &DrugAnalysisResult, timestamp: &str) -> Self {
        Self {
            patient_id: report.patient_id.clone(),
            drug: result.drug_name.clone(),
            timestamp: timestamp.to_string(),
            risk_assessment: ExportRiskAssessment {
                risk_label: result.risk_assessment.category,
                confidence_score: result.risk_assessment.confidence_score,
                severity: result.risk_assessment.severity.as_lower_str().to_string(),
            },
            pharmacogenomic_profile: ExportProfile {
                primary_gene: result.pharmacogenomic_profile.gene.clone(),
                diplotype: result.pharmacogenomic_profile.diplotype.clone(),
                phenotype: result.pharmacogenomic_profile.phenotype,
                detected_variants: result.pharmacogenomic_profile.variants.clone(),
            },
            clinical_recommendation: ExportRecommendation {
                summary: result.clinical_recommendation.summary.clone(),
                dosage_adjustment: result.clinical_recommendation.dosage_adjustment.clone(),
                alternative_therapy: result.clinical_recommendation.alternative_therapy.clone(),
                cpic_guideline: result.clinical_recommendation.cpic_guideline.clone(),
                evidence_level: result.evidence_level,
                suggested_monitoring: result.suggested_monitoring.clone(),
                references: result.references.clone(),
            },
            llm_generated_explanation: ExportExplanation {
                summary: result.llm_explanation.summary.clone(),
                biological_mechanism: result.llm_explanation.biological_mechanism.clone(),
                variant_interpretation: result.llm_explanation.variant_interpretation.clone(),
                risk_interpretation: result.llm_explanation.risk_interpretation.clone(),
            },
            quality_metrics: ExportQualityMetrics {
                vcf_parsing_success: report.quality_metrics.vcf_parsing_success,
                prediction_accuracy: report.quality_metrics.prediction_accuracy,
            },
        }
    }
}

/// Export payload: an object for one drug, an array for several.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ExportPayload {
    Single(ExportRecord),
    Multiple(Vec<ExportRecord>),
}

impl ExportPayload {
    /// Format a report for download, stamped with the current time.
    pub fn from_report(report: &ReportData) -> Self {
        Self::from_report_at(report, &Utc::now().to_rfc3339())
    }

    /// Format a report with an explicit timestamp. Deterministic.
    pub fn from_report_at(report: &ReportData, timestamp: &str) -> Self {
        let mut records: Vec<ExportRecord> = report
            .results
            .iter()
            .map(|result| ExportRecord::from_result(report, result, timestamp))
            .collect();

        if records.len() == 1 {
            ExportPayload::Single(records.remove(0))
        } else {
            ExportPayload::Multiple(records)
        }
    }

    pub fn record_count(&self) -> usize {
        match self {
            ExportPayload::Single(_) => 1,
            ExportPayload::Multiple(records) => records.len(),
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Download file name: `PharmaGuard_Report_<patient>_<epoch-millis>.json`.
pub fn export_file_name(patient_id: &str, exported_at_millis: i64) -> String {
    format!("{}_{}_{}.json", EXPORT_FILE_PREFIX, patient_id, exported_at_millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::assemble_report;
    use crate::models::{
        ClinicalRecommendation, LlmExplanation, PharmacogenomicProfile, RiskAssessment,
        Severity,
    };

    fn make_result(drug: &str) -> DrugAnalysisResult {
        DrugAnalysisResult {
            drug_name: drug.to_string(),
            risk_assessment: RiskAssessment {
                category: RiskCategory::AdjustDosage,
                confidence_score: 0.91,
                severity: Severity::High,
            },
            pharmacogenomic_profile: PharmacogenomicProfile {
                gene: "CYP2D6".to_string(),
                diplotype: "*1/*4".to_string(),
                phenotype: MetabolizerPhenotype::Intermediate,
                variants: vec![VariantInfo {
                    rsid: "rs3892097".to_string(),
                    allele: "*4".to_string(),
                }],
            },
            clinical_recommendation: ClinicalRecommendation {
                summary: "reduce".to_string(),
                dosage_adjustment: "Reduce dose by 50%".to_string(),
                alternative_therapy: "Tramadol".to_string(),
                cpic_guideline: "CPIC Guideline for CYP2D6 and Codeine".to_string(),
            },
            llm_explanation: LlmExplanation {
                summary: "s".to_string(),
                biological_mechanism: "b".to_string(),
                variant_interpretation: "v".to_string(),
                risk_interpretation: "r".to_string(),
            },
            phenotype_probabilities: vec![],
            evidence_level: EvidenceLevel::Level2A,
            suggested_monitoring: "monitor".to_string(),
            references: vec!["CPIC Guideline for Codeine and CYP2D6".to_string()],
        }
    }

    fn make_report(drugs: &[&str]) -> ReportData {
        assemble_report(
            "sample",
            vec![],
            drugs.iter().map(|d| make_result(d)).collect(),
        )
    }

    #[test]
    fn test_single_drug_exports_as_object() {
        let report = make_report(&["Codeine"]);
        let payload = ExportPayload::from_report_at(&report, "2024-01-15T10:00:00Z");

        assert!(matches!(payload, ExportPayload::Single(_)));
        let value: serde_json::Value =
            serde_json::from_str(&payload.to_json().unwrap()).unwrap();
        assert!(value.is_object());
        assert_eq!(value["patient_id"], "sample");
        assert_eq!(value["drug"], "Codeine");
    }

    #[test]
    fn test_multiple_drugs_export_as_array() {
        let report = make_report(&["Codeine", "Warfarin", "Simvastatin"]);
        let payload = ExportPayload::from_report_at(&report, "2024-01-15T10:00:00Z");

        assert_eq!(payload.record_count(), 3);
        let value: serde_json::Value =
            serde_json::from_str(&payload.to_json().unwrap()).unwrap();
        let records = value.as_array().expect("multi-drug export should be an array");
        assert_eq!(records.len(), 3);
        assert_eq!(records[1]["drug"], "Warfarin");
    }

    #[test]
    fn test_record_schema() {
        let report = make_report(&["Codeine"]);
        let payload = ExportPayload::from_report_at(&report, "2024-01-15T10:00:00Z");
        let value: serde_json::Value =
            serde_json::from_str(&payload.to_json().unwrap()).unwrap();

        assert_eq!(value["risk_assessment"]["risk_label"], "Adjust Dosage");
        assert_eq!(value["risk_assessment"]["severity"], "high");
        assert_eq!(value["pharmacogenomic_profile"]["primary_gene"], "CYP2D6");
        assert_eq!(
            value["pharmacogenomic_profile"]["phenotype"],
            "Intermediate Metabolizer (IM)"
        );
        assert_eq!(
            value["pharmacogenomic_profile"]["detected_variants"][0]["rsid"],
            "rs3892097"
        );
        assert_eq!(value["clinical_recommendation"]["evidence_level"], "2A");
        assert_eq!(
            value["llm_generated_explanation"]["biological_mechanism"],
            "b"
        );
        assert_eq!(value["quality_metrics"]["vcf_parsing_success"], true);
        assert_eq!(value["timestamp"], "2024-01-15T10:00:00Z");
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(
            export_file_name("sample", 1_700_000_000_000),
            "PharmaGuard_Report_sample_1700000000000.json"
        );
    }
}
