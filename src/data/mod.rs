//! Data loading
//!
//! SQLite access to match history and dataset preparation.

pub mod database;
pub mod dataset;

pub use database::Database;
pub use dataset::{train_test_split, MatchDataset};
