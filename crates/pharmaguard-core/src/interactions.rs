//! Interaction rule evaluator.
//!
//! A fixed set of pairwise rules over the selected drugs and lifestyle
//! factors. Rules are evaluated independently and in declaration order, so
//! the alert list is stable across runs with the same inputs.

use crate::models::{AlertKind, AlertSeverity, InteractionAlert, LifestyleFactor};

/// Drugs whose clearance is induced by tobacco smoke (CYP1A2 substrates).
const SMOKING_SENSITIVE_DRUGS: &[&str] = &["Clozapine", "Olanzapine", "Warfarin"];

/// Statins subject to intestinal CYP3A4 inhibition by grapefruit.
const GRAPEFRUIT_SENSITIVE_DRUGS: &[&str] = &["Simvastatin", "Atorvastatin"];

/// Evaluate all interaction rules against a selection.
///
/// Rules are not mutually exclusive; several alerts may fire for one
/// selection. No matches yields an empty list.
pub fn evaluate_interactions(
    drugs: &[String],
    factors: &[LifestyleFactor],
) -> Vec<InteractionAlert> {
    let mut alerts = Vec::new();

    let selected = |name: &str| drugs.iter().any(|d| d == name);
    let any_selected = |names: &[&str]| names.iter().any(|n| selected(n));

    // DDI: Fluoxetine inhibits CYP2D6, affecting Codeine
    if selected("Fluoxetine") && selected("Codeine") {
        alerts.push(InteractionAlert {
            kind: AlertKind::DrugDrug,
            severity: AlertSeverity::High,
            description: "Fluoxetine inhibits the metabolism of Codeine.".to_string(),
            mechanism: "Fluoxetine is a strong CYP2D6 inhibitor. Codeine requires CYP2D6 \
                        to be converted to its active form (morphine). This combination may \
                        lead to reduced efficacy of Codeine (Phenoconversion to Poor \
                        Metabolizer status)."
                .to_string(),
        });
    }

    // Lifestyle: smoking induces CYP1A2
    if factors.contains(&LifestyleFactor::Smoker) && any_selected(SMOKING_SENSITIVE_DRUGS) {
        alerts.push(InteractionAlert {
            kind: AlertKind::DrugLifestyle,
            severity: AlertSeverity::Moderate,
            description: "Smoking can lower blood levels of this medication.".to_string(),
            mechanism: "Polycyclic aromatic hydrocarbons in tobacco smoke induce CYP1A2 \
                        enzymes, potentially increasing the metabolism of this drug and \
                        reducing its therapeutic effect."
                .to_string(),
        });
    }

    // Lifestyle: grapefruit inhibits CYP3A4
    if factors.contains(&LifestyleFactor::Grapefruit) && any_selected(GRAPEFRUIT_SENSITIVE_DRUGS) {
        alerts.push(InteractionAlert {
            kind: AlertKind::DrugLifestyle,
            severity: AlertSeverity::High,
            description: "Grapefruit consumption can dangerously increase drug levels."
                .to_string(),
            mechanism: "Grapefruit juice compounds inhibit CYP3A4 intestinal metabolism, \
                        leading to significantly higher blood concentrations of the drug \
                        and increased risk of toxicity (e.g., rhabdomyolysis)."
                .to_string(),
        });
    }

    alerts
}
