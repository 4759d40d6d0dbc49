//! Soccer match outcome prediction
//!
//! Replays a chronological match history into leakage-safe feature vectors,
//! normalizes them, trains classifiers and scores their predictions.

pub mod data;
pub mod export;
pub mod features;
pub mod mining;
pub mod model;
pub mod predict;
pub mod training;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Unique identifier for a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TeamId(pub i64);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Team({})", self.0)
    }
}

/// Match outcome from the home team's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Outcome {
    HomeWin,
    Draw,
    AwayWin,
}

impl Outcome {
    /// Number of outcome classes
    pub const COUNT: usize = 3;

    pub const ALL: [Outcome; 3] = [Outcome::HomeWin, Outcome::Draw, Outcome::AwayWin];

    /// Derive the outcome from a final score
    pub fn from_goals(home_goals: u32, away_goals: u32) -> Self {
        match home_goals.cmp(&away_goals) {
            std::cmp::Ordering::Greater => Outcome::HomeWin,
            std::cmp::Ordering::Equal => Outcome::Draw,
            std::cmp::Ordering::Less => Outcome::AwayWin,
        }
    }

    /// Class label used by the classifiers (0 = home, 1 = draw, 2 = away)
    pub fn label(&self) -> usize {
        match self {
            Outcome::HomeWin => 0,
            Outcome::Draw => 1,
            Outcome::AwayWin => 2,
        }
    }

    pub fn from_label(label: usize) -> Option<Self> {
        match label {
            0 => Some(Outcome::HomeWin),
            1 => Some(Outcome::Draw),
            2 => Some(Outcome::AwayWin),
            _ => None,
        }
    }

    /// Short class token used in exports
    pub fn token(&self) -> &'static str {
        match self {
            Outcome::HomeWin => "home",
            Outcome::Draw => "draw",
            Outcome::AwayWin => "away",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::HomeWin => write!(f, "Home Win"),
            Outcome::Draw => write!(f, "Draw"),
            Outcome::AwayWin => write!(f, "Away Win"),
        }
    }
}

/// Market prices for the three outcomes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Odds {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

/// Team attribute ratings, nominally 0-100 but never clamped
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamAttributes {
    /// Sum of build-up speed, chance-creation passing and defence pressure
    pub overall: f64,
    pub aggression: f64,
    pub passing: f64,
    pub shooting: f64,
    pub defence: f64,
    pub build_up_speed: f64,
}

impl TeamAttributes {
    pub fn to_array(&self) -> [f64; 6] {
        [
            self.overall,
            self.aggression,
            self.passing,
            self.shooting,
            self.defence,
            self.build_up_speed,
        ]
    }
}

/// Recent-form statistics over a team's trailing window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormStats {
    pub avg_goals_for: f64,
    pub avg_goals_against: f64,
    pub avg_goal_diff: f64,
    pub win_rate: f64,
}

impl FormStats {
    /// Form assumed for a team with no observed history
    pub const COLD_START: FormStats = FormStats {
        avg_goals_for: 1.4,
        avg_goals_against: 1.4,
        avg_goal_diff: 0.0,
        win_rate: 0.33,
    };

    /// Build form from averages, deriving the goal differential
    pub fn from_averages(avg_goals_for: f64, avg_goals_against: f64, win_rate: f64) -> Self {
        FormStats {
            avg_goals_for,
            avg_goals_against,
            avg_goal_diff: avg_goals_for - avg_goals_against,
            win_rate,
        }
    }

    pub fn to_array(&self) -> [f64; 4] {
        [
            self.avg_goals_for,
            self.avg_goals_against,
            self.avg_goal_diff,
            self.win_rate,
        ]
    }
}

impl Default for FormStats {
    fn default() -> Self {
        Self::COLD_START
    }
}

/// A raw match row as supplied by storage, before form enrichment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRow {
    pub date: NaiveDate,
    pub home_team: TeamId,
    pub away_team: TeamId,
    pub home_goals: u32,
    pub away_goals: u32,
    pub odds: Odds,
    pub home: TeamAttributes,
    pub away: TeamAttributes,
}

/// Final score of any match, used by sequence mining
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    pub date: NaiveDate,
    pub home_team: TeamId,
    pub away_team: TeamId,
    pub home_goals: u32,
    pub away_goals: u32,
}

/// One match's pre-match-known features plus its outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub outcome: Outcome,
    pub odds: Odds,
    pub home: TeamAttributes,
    pub away: TeamAttributes,
    pub home_form: FormStats,
    pub away_form: FormStats,
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum SoccerError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not enough records loaded: have {loaded}, need {required}. Check the database path and schema.")]
    InsufficientData { loaded: usize, required: usize },

    #[error("{model} training failed: {message}")]
    ModelFit { model: String, message: String },

    #[error("Unknown feature set: {0}")]
    UnknownFeatureSet(String),

    #[error("Invalid labels: {0}")]
    InvalidLabels(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, SoccerError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub features: FeatureConfig,
    pub training: TrainingConfig,
    pub mining: MiningConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub database_path: String,
    pub row_limit: usize,
    pub min_rows: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    pub form_window: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub train_fraction: f64,
    pub seed: u64,
    pub logistic_epochs: usize,
    pub logistic_learning_rate: f64,
    pub forest_trees: usize,
    pub forest_max_depth: usize,
    pub forest_min_samples_split: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiningConfig {
    pub pattern_length: usize,
    pub top_k: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub metrics_csv: String,
    pub arff_path: String,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            train_fraction: 0.8,
            seed: 42,
            logistic_epochs: 300,
            logistic_learning_rate: 0.5,
            forest_trees: 100,
            forest_max_depth: 12,
            forest_min_samples_split: 5,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data: DataConfig {
                database_path: "data/database.sqlite".to_string(),
                row_limit: 20_000,
                min_rows: 1_000,
            },
            features: FeatureConfig {
                form_window: features::form::DEFAULT_FORM_WINDOW,
            },
            training: TrainingConfig::default(),
            mining: MiningConfig {
                pattern_length: 3,
                top_k: 10,
            },
            export: ExportConfig {
                metrics_csv: "target/metrics.csv".to_string(),
                arff_path: "target/soccer_combined.arff".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SoccerError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| SoccerError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SoccerError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.features.form_window == 0 {
            return Err(SoccerError::Config("features.form_window must be at least 1".to_string()));
        }
        if !(self.training.train_fraction > 0.0 && self.training.train_fraction < 1.0) {
            return Err(SoccerError::Config(format!(
                "training.train_fraction must be in (0, 1), got {}",
                self.training.train_fraction
            )));
        }
        if self.training.forest_trees == 0 {
            return Err(SoccerError::Config("training.forest_trees must be at least 1".to_string()));
        }
        Ok(())
    }
}
