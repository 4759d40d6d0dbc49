//! Feature extraction and normalization
//!
//! Converts chronologically replayed matches into model-ready features.

pub mod feature_set;
pub mod form;
pub mod normalization;

pub use feature_set::FeatureSet;
pub use form::{enrich_matches, FormTable, TeamFormAggregator, TemporalReplay};
pub use normalization::MinMax;
