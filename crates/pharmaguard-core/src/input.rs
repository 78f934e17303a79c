//! Input validation for the analysis run.
//!
//! The genomic file is validated by name and size only; its content is
//! never read. Validation failures are resolved at the point of entry and
//! never reach the orchestrator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Required file extension for the genomic input.
pub const GENOME_FILE_EXT: &str = ".vcf";

/// Maximum accepted file size: 5 MiB.
pub const MAX_GENOME_FILE_BYTES: u64 = 5 * 1024 * 1024;

/// Input validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InputError {
    #[error("Invalid file type. Please upload a .vcf file.")]
    InvalidFileType { file_name: String },

    #[error("File is too large. Maximum size is 5MB.")]
    FileTooLarge { size_bytes: u64 },

    #[error("Please upload a VCF file.")]
    MissingFile,

    #[error("Please select at least one drug.")]
    NoDrugsSelected,
}

/// Reference to the user-selected genomic file. Content is never parsed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenomeFileRef {
    pub file_name: String,
    pub size_bytes: u64,
}

impl GenomeFileRef {
    pub fn new(file_name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            file_name: file_name.into(),
            size_bytes,
        }
    }

    /// Check extension and size limits.
    pub fn validate(&self) -> Result<(), InputError> {
        if !self.file_name.ends_with(GENOME_FILE_EXT) {
            return Err(InputError::InvalidFileType {
                file_name: self.file_name.clone(),
            });
        }
        if self.size_bytes > MAX_GENOME_FILE_BYTES {
            return Err(InputError::FileTooLarge {
                size_bytes: self.size_bytes,
            });
        }
        Ok(())
    }

    /// Patient identifier: the file name with the `.vcf` suffix stripped.
    pub fn patient_id(&self) -> &str {
        self.file_name
            .strip_suffix(GENOME_FILE_EXT)
            .unwrap_or(&self.file_name)
    }
}
