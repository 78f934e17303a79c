//! Clinical explanation generation via the Gemini API.
//!
//! This crate implements the `ExplanationSource` seam from
//! `pharmaguard-core`: it builds a schema-constrained prompt per drug,
//! calls the `generateContent` endpoint, and parses the structured
//! recommendation/explanation pair out of the response.

pub mod client;
pub mod prompts;
pub mod response;

pub use client::*;
pub use prompts::*;
pub use response::*;
