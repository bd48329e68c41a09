// src/translate/mod.rs
// Bidirectional, lossy-aware mappings between the unified record and the
// two external schemas (interactive and multi-agent)

pub mod protognosis;
pub mod title;
pub mod wisteria;

pub use protognosis::ProtognosisHypothesis;
pub use title::extract_title;
pub use wisteria::WisteriaHypothesis;

use serde::{Deserialize, Serialize};

use crate::utils::iso_now;

/// Outcome of a batch conversion: how many items were attempted versus how
/// many actually became records. Batches report counts instead of failing
/// wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionReport {
    pub conversion_type: String,
    pub attempted: usize,
    pub converted: usize,
    pub timestamp: String,
}

impl ConversionReport {
    pub fn new(conversion_type: &str, attempted: usize, converted: usize) -> Self {
        Self {
            conversion_type: conversion_type.to_string(),
            attempted,
            converted,
            timestamp: iso_now(),
        }
    }

    pub fn skipped(&self) -> usize {
        self.attempted - self.converted
    }

    pub fn success_rate(&self) -> f64 {
        if self.attempted == 0 {
            return 0.0;
        }
        self.converted as f64 / self.attempted as f64
    }
}
