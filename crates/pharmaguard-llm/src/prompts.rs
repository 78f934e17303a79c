//! Prompt and response-schema construction for the clinical report call.

use pharmaguard_core::ExplanationRequest;
use serde_json::{json, Value};

/// Build the report-generation prompt for one drug.
pub fn build_report_prompt(request: &ExplanationRequest) -> String {
    format!(
        r#"Act as an expert pharmacogenomics clinical decision support system.
Given the following patient genetic profile and prescribed drug, generate a clinical report.
The report must be evidence-based, citing biological mechanisms and potential clinical outcomes.
The recommendation must align with established clinical guidelines like CPIC.

Patient Data:
- Drug: {drug}
- Gene: {gene}
- Phenotype: {phenotype}
- Predicted Risk: {risk}

Task:
Generate a JSON object containing a detailed clinical recommendation and an explainability report.
Do not include any text, markdown formatting, or explanations outside of the JSON structure."#,
        drug = request.drug,
        gene = request.gene,
        phenotype = request.phenotype,
        risk = request.risk,
    )
}

/// Response schema enforced via `generationConfig.responseSchema`.
///
/// Two required objects, four required string fields each. The field names
/// here are the wire contract parsed by [`crate::response`].
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "recommendation": {
                "type": "OBJECT",
                "properties": {
                    "summary": {
                        "type": "STRING",
                        "description": "A concise summary of the clinical recommendation.",
                    },
                    "dosageAdjustment": {
                        "type": "STRING",
                        "description": "Specific advice on dosage adjustment (e.g., 'Reduce dose by 50%', 'Standard dosing').",
                    },
                    "alternativeTherapy": {
                        "type": "STRING",
                        "description": "Suggestions for alternative drugs or therapies, if applicable.",
                    },
                    "cpicGuideline": {
                        "type": "STRING",
                        "description": "Reference to the relevant CPIC guideline (e.g., 'CPIC Guideline for CYP2D6 and Codeine').",
                    },
                },
                "required": ["summary", "dosageAdjustment", "alternativeTherapy", "cpicGuideline"],
            },
            "explanation": {
                "type": "OBJECT",
                "properties": {
                    "summary": {
                        "type": "STRING",
                        "description": "A brief, easy-to-understand summary of the pharmacogenomic findings.",
                    },
                    "biologicalMechanism": {
                        "type": "STRING",
                        "description": "Explanation of the biological and genetic mechanism causing the predicted drug response.",
                    },
                    "variantInterpretation": {
                        "type": "STRING",
                        "description": "Details on how the specific gene variant affects enzyme activity or drug metabolism.",
                    },
                    "riskInterpretation": {
                        "type": "STRING",
                        "description": "Interpretation of what the predicted risk means for the patient clinically.",
                    },
                },
                "required": ["summary", "biologicalMechanism", "variantInterpretation", "riskInterpretation"],
            },
        },
        "required": ["recommendation", "explanation"],
    })
}
