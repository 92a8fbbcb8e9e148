//! Common types shared across the DermaScan crates.
//!
//! This crate sits at the bottom of the dependency hierarchy:
//! - Has NO dependencies on other workspace crates
//! - Provides the data model that detection, analysis and the CLI exchange
//! - Ensures type consistency across the entire system

pub mod models;

pub use models::{
    AnalysisOutput, DetailedAnalysis, DetectionResult, DiseaseRecord, SENTINEL_DISEASE,
};
