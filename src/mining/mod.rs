//! Sequence mining over team results

pub mod sequence;

pub use sequence::{build_team_sequences, mine_ngrams, mine_top_patterns, top_patterns, PatternCount};
