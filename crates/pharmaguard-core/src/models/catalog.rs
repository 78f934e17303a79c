//! Drug catalog: supported drugs and their primary pharmacogene.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Sentinel gene symbol for drugs without a catalog mapping.
pub const UNKNOWN_GENE: &str = "UNKNOWN_GENE";

/// Drugs offered in the selection UI.
pub const SUPPORTED_DRUGS: &[&str] = &[
    "Codeine",
    "Warfarin",
    "Clopidogrel",
    "Simvastatin",
    "Azathioprine",
    "Fluorouracil",
];

/// A single drug → gene association.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrugCatalogEntry {
    /// Drug name, matched by exact spelling
    pub drug: String,
    /// Primary pharmacogene symbol (e.g., "CYP2D6")
    pub gene: String,
}

/// Immutable drug → gene catalog, built once at startup.
pub struct DrugCatalog {
    genes: HashMap<String, String>,
}

impl Default for DrugCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl DrugCatalog {
    /// Create the catalog with the built-in gene associations.
    pub fn new() -> Self {
        let mut genes = HashMap::new();
        genes.insert("Codeine".to_string(), "CYP2D6".to_string());
        genes.insert("Warfarin".to_string(), "CYP2C9".to_string());
        genes.insert("Clopidogrel".to_string(), "CYP2C19".to_string());
        genes.insert("Simvastatin".to_string(), "SLCO1B1".to_string());
        genes.insert("Azathioprine".to_string(), "TPMT".to_string());
        genes.insert("Fluorouracil".to_string(), "DPYD".to_string());
        Self { genes }
    }

    /// Look up the primary gene for a drug by exact name.
    ///
    /// Unmapped drugs resolve to [`UNKNOWN_GENE`].
    pub fn gene_for(&self, drug: &str) -> &str {
        self.genes.get(drug).map(String::as_str).unwrap_or(UNKNOWN_GENE)
    }

    /// Whether a drug appears in the supported selection list.
    pub fn is_supported(&self, drug: &str) -> bool {
        SUPPORTED_DRUGS.contains(&drug)
    }

    /// All catalog entries, sorted by drug name.
    pub fn entries(&self) -> Vec<DrugCatalogEntry> {
        let mut entries: Vec<DrugCatalogEntry> = self
            .genes
            .iter()
            .map(|(drug, gene)| DrugCatalogEntry {
                drug: drug.clone(),
                gene: gene.clone(),
            })
            .collect();
        entries.sort_by(|a, b| a.drug.cmp(&b.drug));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gene_lookup() {
        let catalog = DrugCatalog::new();
        assert_eq!(catalog.gene_for("Codeine"), "CYP2D6");
        assert_eq!(catalog.gene_for("Warfarin"), "CYP2C9");
        assert_eq!(catalog.gene_for("Clopidogrel"), "CYP2C19");
        assert_eq!(catalog.gene_for("Simvastatin"), "SLCO1B1");
        assert_eq!(catalog.gene_for("Azathioprine"), "TPMT");
        assert_eq!(catalog.gene_for("Fluorouracil"), "DPYD");
    }

    #[test]
    fn test_unmapped_drug_resolves_to_sentinel() {
        let catalog = DrugCatalog::new();
        assert_eq!(catalog.gene_for("Fluoxetine"), UNKNOWN_GENE);
        assert_eq!(catalog.gene_for("codeine"), UNKNOWN_GENE); // exact-name match only
    }

    #[test]
    fn test_supported_drugs() {
        let catalog = DrugCatalog::new();
        for drug in SUPPORTED_DRUGS {
            assert!(catalog.is_supported(drug));
            assert_ne!(catalog.gene_for(drug), UNKNOWN_GENE);
        }
        assert!(!catalog.is_supported("Fluoxetine"));
    }

    #[test]
    fn test_entries_sorted() {
        let catalog = DrugCatalog::new();
        let entries = catalog.entries();
        assert_eq!(entries.len(), 6);
        assert_eq!(entries[0].drug, "Azathioprine");
        assert_eq!(entries[0].gene, "TPMT");
    }
}
