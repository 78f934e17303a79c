//! Analysis session state and run orchestration.
//!
//! Pipeline per run: validate inputs → interaction rules → per-drug
//! synthetic profiles → concurrent explanation requests (fan-out) → join
//! on all (fan-in, all-or-nothing) → report assembly.

use futures_util::future::join_all;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::assembler::assemble_report;
use crate::explain::{ExplanationError, ExplanationRequest, ExplanationSource};
use crate::input::{GenomeFileRef, InputError};
use crate::interactions::evaluate_interactions;
use crate::models::{
    DrugAnalysisResult, DrugCatalog, LifestyleFactor, PharmacogenomicProfile, ReportData,
    RiskAssessment,
};
use crate::predictor::PhenotypePredictor;

/// Run-level errors.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("Analysis failed: {0}")]
    Explanation(#[from] ExplanationError),

    #[error("An analysis run is already in progress")]
    RunInProgress,
}

/// Mutable state for one user session: the inputs, a busy flag that
/// prevents overlapping runs, and the latest outcome. Any input change
/// discards the previous outcome.
#[derive(Debug, Default)]
pub struct AnalysisSession {
    genome_file: Option<GenomeFileRef>,
    selected_drugs: Vec<String>,
    lifestyle_factors: Vec<LifestyleFactor>,
    busy: bool,
    report: Option<ReportData>,
    error: Option<String>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the genomic input file after validating it. Invalid files are
    /// rejected at this boundary and clear any previously accepted file.
    pub fn set_genome_file(&mut self, file: GenomeFileRef) -> Result<(), InputError> {
        self.reset_outputs();
        match file.validate() {
            Ok(()) => {
                self.genome_file = Some(file);
                Ok(())
            }
            Err(err) => {
                self.genome_file = None;
                Err(err)
            }
        }
    }

    pub fn clear_genome_file(&mut self) {
        self.genome_file = None;
        self.reset_outputs();
    }

    /// Replace the drug selection, dropping duplicates.
    pub fn set_selected_drugs(&mut self, drugs: Vec<String>) {
        self.selected_drugs.clear();
        for drug in drugs {
            if !self.selected_drugs.contains(&drug) {
                self.selected_drugs.push(drug);
            }
        }
        self.reset_outputs();
    }

    /// Replace the lifestyle selection, dropping duplicates.
    pub fn set_lifestyle_factors(&mut self, factors: Vec<LifestyleFactor>) {
        self.lifestyle_factors.clear();
        for factor in factors {
            if !self.lifestyle_factors.contains(&factor) {
                self.lifestyle_factors.push(factor);
            }
        }
        self.reset_outputs();
    }

    pub fn genome_file(&self) -> Option<&GenomeFileRef> {
        self.genome_file.as_ref()
    }

    pub fn selected_drugs(&self) -> &[String] {
        &self.selected_drugs
    }

    pub fn lifestyle_factors(&self) -> &[LifestyleFactor] {
        &self.lifestyle_factors
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn report(&self) -> Option<&ReportData> {
        self.report.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Mark a run as started. Refused while another run is in flight.
    pub fn begin_run(&mut self) -> Result<(), AnalysisError> {
        if self.busy {
            return Err(AnalysisError::RunInProgress);
        }
        self.busy = true;
        self.reset_outputs();
        Ok(())
    }

    /// Record a run outcome and release the busy flag.
    pub fn finish_run(&mut self, outcome: Result<ReportData, &AnalysisError>) {
        self.busy = false;
        match outcome {
            Ok(report) => {
                self.report = Some(report);
                self.error = None;
            }
            Err(err) => {
                self.report = None;
                self.error = Some(match err {
                    AnalysisError::Explanation(e) => format!(
                        "Analysis Failed: {}. Please check your API key and try again.",
                        e
                    ),
                    other => other.to_string(),
                });
            }
        }
    }

    fn reset_outputs(&mut self) {
        self.report = None;
        self.error = None;
    }
}

/// Drives one analysis run over the injected predictor and explanation
/// backend.
pub struct Analyzer<P, S> {
    catalog: DrugCatalog,
    predictor: P,
    source: S,
}

impl<P, S> Analyzer<P, S>
where
    P: PhenotypePredictor,
    S: ExplanationSource,
{
    pub fn new(predictor: P, source: S) -> Self {
        Self {
            catalog: DrugCatalog::new(),
            predictor,
            source,
        }
    }

    pub fn with_catalog(catalog: DrugCatalog, predictor: P, source: S) -> Self {
        Self {
            catalog,
            predictor,
            source,
        }
    }

    /// Get the explanation source for direct access.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run a full analysis. Per-drug explanation requests are issued
    /// concurrently; the run waits for all of them and fails as a whole if
    /// any single request fails.
    pub async fn run(
        &mut self,
        file: &GenomeFileRef,
        drugs: &[String],
        factors: &[LifestyleFactor],
    ) -> Result<ReportData, AnalysisError> {
        file.validate()?;
        if drugs.is_empty() {
            return Err(InputError::NoDrugsSelected.into());
        }

        info!(
            patient = file.patient_id(),
            drug_count = drugs.len(),
            "starting analysis run"
        );

        let alerts = evaluate_interactions(drugs, factors);
        debug!(alert_count = alerts.len(), "interaction rules evaluated");

        let mut prepared = Vec::with_capacity(drugs.len());
        for drug in drugs {
            let gene = self.catalog.gene_for(drug).to_string();
            let profile = self.predictor.predict(drug, &gene);
            prepared.push((drug.clone(), gene, profile));
        }

        let requests: Vec<ExplanationRequest> = prepared
            .iter()
            .map(|(drug, gene, profile)| ExplanationRequest {
                drug: drug.clone(),
                gene: gene.clone(),
                phenotype: profile.phenotype,
                risk: profile.risk,
            })
            .collect();

        let source = &self.source;
        let outcomes = join_all(requests.iter().map(|req| source.explain(req))).await;

        let mut results = Vec::with_capacity(prepared.len());
        for ((drug, gene, profile), outcome) in prepared.into_iter().zip(outcomes) {
            let explanation = outcome.map_err(|err: ExplanationError| {
                warn!(drug = %drug, error = %err, "explanation request failed; aborting run");
                err
            })?;

            results.push(DrugAnalysisResult {
                drug_name: drug,
                risk_assessment: RiskAssessment {
                    category: profile.risk,
                    confidence_score: profile.confidence_score,
                    severity: profile.severity,
                },
                pharmacogenomic_profile: PharmacogenomicProfile {
                    gene,
                    diplotype: profile.diplotype,
                    phenotype: profile.phenotype,
                    variants: profile.variants,
                },
                clinical_recommendation: explanation.recommendation,
                llm_explanation: explanation.explanation,
                phenotype_probabilities: profile.phenotype_probabilities,
                evidence_level: profile.evidence_level,
                suggested_monitoring: profile.suggested_monitoring,
                references: profile.references,
            });
        }

        let report = assemble_report(file.patient_id(), alerts, results);
        info!(
            report_id = %report.report_id,
            overall_risk = ?report.overall_risk,
            "analysis complete"
        );
        Ok(report)
    }

    /// Run against a session object, storing the outcome in it.
    pub async fn run_session(
        &mut self,
        session: &mut AnalysisSession,
    ) -> Result<(), AnalysisError> {
        let file = session
            .genome_file()
            .cloned()
            .ok_or(InputError::MissingFile)?;
        if session.selected_drugs().is_empty() {
            return Err(InputError::NoDrugsSelected.into());
        }
        let drugs = session.selected_drugs().to_vec();
        let factors = session.lifestyle_factors().to_vec();

        session.begin_run()?;
        match self.run(&file, &drugs, &factors).await {
            Ok(report) => {
                session.finish_run(Ok(report));
                Ok(())
            }
            Err(err) => {
                session.finish_run(Err(&err));
                Err(err)
            }
        }
    }
}
