//! Parsing of the model's structured report output.

use pharmaguard_core::{
    ClinicalRecommendation, DrugExplanation, ExplanationError, ExplanationResult,
    LlmExplanation,
};
use serde::Deserialize;

/// Wire shape of the model output, matching the response schema's
/// camelCase field names.
#[derive(Debug, Deserialize)]
struct WireReport {
    recommendation: WireRecommendation,
    explanation: WireExplanation,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRecommendation {
    summary: String,
    dosage_adjustment: String,
    alternative_therapy: String,
    cpic_guideline: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireExplanation {
    summary: String,
    biological_mechanism: String,
    variant_interpretation: String,
    risk_interpretation: String,
}

/// Parse model output text into a [`DrugExplanation`].
///
/// The slice between the first `{` and the last `}` is parsed, so stray
/// prose around the JSON object is tolerated.
pub fn parse_explanation(text: &str) -> ExplanationResult<DrugExplanation> {
    let start = text
        .find('{')
        .ok_or_else(|| ExplanationError::InvalidFormat("no JSON object in response".into()))?;
    let end = text.rfind('}').ok_or_else(|| {
        ExplanationError::InvalidFormat("no closing brace in response".into())
    })?;

    let wire: WireReport = serde_json::from_str(&text[start..=end])?;

    Ok(DrugExplanation {
        recommendation: ClinicalRecommendation {
            summary: wire.recommendation.summary,
            dosage_adjustment: wire.recommendation.dosage_adjustment,
            alternative_therapy: wire.recommendation.alternative_therapy,
            cpic_guideline: wire.recommendation.cpic_guideline,
        },
        explanation: LlmExplanation {
            summary: wire.explanation.summary,
            biological_mechanism: wire.explanation.biological_mechanism,
            variant_interpretation: wire.explanation.variant_interpretation,
            risk_interpretation: wire.explanation.risk_interpretation,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "recommendation": {
            "summary": "Avoid codeine.",
            "dosageAdjustment": "Use alternative analgesic.",
            "alternativeTherapy": "Morphine at reduced dose.",
            "cpicGuideline": "CPIC Guideline for CYP2D6 and Codeine"
        },
        "explanation": {
            "summary": "Poor metabolizer.",
            "biologicalMechanism": "CYP2D6 activates codeine to morphine.",
            "variantInterpretation": "*4/*4 is a no-function diplotype.",
            "riskInterpretation": "Analgesia is likely inadequate."
        }
    }"#;

    #[test]
    fn test_parse_valid_report() {
        let report = parse_explanation(VALID).unwrap();
        assert_eq!(report.recommendation.summary, "Avoid codeine.");
        assert_eq!(
            report.recommendation.cpic_guideline,
            "CPIC Guideline for CYP2D6 and Codeine"
        );
        assert_eq!(
            report.explanation.biological_mechanism,
            "CYP2D6 activates codeine to morphine."
        );
    }

    #[test]
    fn test_parse_with_surrounding_prose() {
        let wrapped = format!("Here is the report:\n{}\nLet me know if you need more.", VALID);
        let report = parse_explanation(&wrapped).unwrap();
        assert_eq!(report.explanation.summary, "Poor metabolizer.");
    }

    #[test]
    fn test_parse_rejects_plain_text() {
        let err = parse_explanation("I cannot generate that report.").unwrap_err();
        assert!(matches!(err, ExplanationError::InvalidFormat(_)));
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        let json = r#"{"recommendation": {"summary": "x"}, "explanation": {}}"#;
        let err = parse_explanation(json).unwrap_err();
        assert!(matches!(err, ExplanationError::JsonParse(_)));
    }
}
