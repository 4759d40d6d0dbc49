//! Prediction and inference
//!
//! Apply trained models to new matches, including the interactive prompt.

pub mod inference;
pub mod interactive;

pub use inference::{ModelPrediction, Predictor};
pub use interactive::InteractiveSession;
