//! Model training
//!
//! Feature preparation, the train/evaluate loop, and classification metrics.

pub mod metrics;
pub mod pipeline;
pub mod trainer;

pub use metrics::ClassificationMetrics;
pub use pipeline::{FeatureSplit, PreparedFeatures};
pub use trainer::{comparison_table, default_plan, TrainedModel, Trainer};
