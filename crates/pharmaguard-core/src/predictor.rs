//! Synthetic phenotype prediction.
//!
//! [`PhenotypePredictor`] is the seam between report assembly and whatever
//! produces per-drug genotype calls. The shipped implementation,
//! [`MockPhenotypePredictor`], draws uniform random profiles; a real
//! classifier can replace it without touching the assembler.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{
    EvidenceLevel, MetabolizerPhenotype, PhenotypeProbability, RiskCategory, Severity,
    VariantInfo,
};

/// Monitoring advice attached to every synthetic profile.
const SUGGESTED_MONITORING: &str = "Monitor for adverse effects. Check plasma concentration \
                                    if strictly indicated. Reference range: 10-50 ng/mL.";

/// Synthetic per-drug profile produced by a predictor.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticProfile {
    pub risk: RiskCategory,
    pub phenotype: MetabolizerPhenotype,
    pub diplotype: String,
    pub confidence_score: f64,
    pub severity: Severity,
    pub variants: Vec<VariantInfo>,
    pub phenotype_probabilities: Vec<PhenotypeProbability>,
    pub evidence_level: EvidenceLevel,
    pub suggested_monitoring: String,
    pub references: Vec<String>,
}

/// Produces a phenotype profile for a drug/gene pair.
pub trait PhenotypePredictor {
    fn predict(&mut self, drug: &str, gene: &str) -> SyntheticProfile;
}

/// Build the peaked probability distribution for a chosen phenotype.
///
/// The chosen phenotype gets a uniform integer in [80, 95). Of the
/// remainder up to 100, the lower-activity neighbor gets floor(70%) and the
/// higher-activity neighbor the rest; phenotypes not adjacent to the chosen
/// one stay at 0. When the chosen phenotype has no higher neighbor
/// (Ultra-Rapid) the upper share is dropped and the row sums below 100.
/// Kept as-is for output compatibility.
pub fn phenotype_distribution<R: Rng>(
    rng: &mut R,
    target: MetabolizerPhenotype,
) -> Vec<PhenotypeProbability> {
    let mut probs: Vec<PhenotypeProbability> = MetabolizerPhenotype::ALL
        .iter()
        .map(|p| PhenotypeProbability {
            phenotype: *p,
            probability: 0,
        })
        .collect();

    let idx = target.index();
    let peak: u8 = rng.gen_range(80..95);
    probs[idx].probability = peak;
    let remainder = 100 - peak;

    let lower_share = (f64::from(remainder) * 0.7).floor() as u8;
    if idx > 0 {
        probs[idx - 1].probability = lower_share;
    }
    if idx + 1 < probs.len() {
        let assigned_below = if idx > 0 { lower_share } else { 0 };
        probs[idx + 1].probability = remainder - assigned_below;
    }

    probs
}

/// Uniform-random stand-in for a trained phenotype classifier.
pub struct MockPhenotypePredictor {
    rng: StdRng,
}

impl Default for MockPhenotypePredictor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPhenotypePredictor {
    /// Create a predictor seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a predictor with a fixed seed for reproducible output.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl PhenotypePredictor for MockPhenotypePredictor {
    fn predict(&mut self, drug: &str, gene: &str) -> SyntheticProfile {
        let rng = &mut self.rng;

        let risk = RiskCategory::CLINICAL[rng.gen_range(0..RiskCategory::CLINICAL.len())];
        let phenotype =
            MetabolizerPhenotype::ALL[rng.gen_range(0..MetabolizerPhenotype::ALL.len())];
        let diplotype = format!("*{}/*{}", rng.gen_range(1..=4), rng.gen_range(1..=4));
        let confidence_score = rng.gen_range(0.85..0.98);
        let severity = Severity::ALL[rng.gen_range(0..Severity::ALL.len())];

        let variants = vec![VariantInfo {
            rsid: format!("rs{}", rng.gen_range(0..100_000)),
            allele: format!("*{}", rng.gen_range(1..=4)),
        }];
        let evidence_level = EvidenceLevel::ALL[rng.gen_range(0..EvidenceLevel::ALL.len())];
        let references = vec![
            format!("CPIC Guideline for {} and {}", drug, gene),
            format!("PharmGKB Clinical Annotation ({}:{})", gene, drug),
            format!("PubMed ID: {}", rng.gen_range(20_000_000..28_000_000)),
        ];

        let phenotype_probabilities = phenotype_distribution(rng, phenotype);

        SyntheticProfile {
            risk,
            phenotype,
            diplotype,
            confidence_score,
            severity,
            variants,
            phenotype_probabilities,
            evidence_level,
            suggested_monitoring: SUGGESTED_MONITORING.to_string(),
            references,
        }
    }
}
