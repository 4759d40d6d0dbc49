//! Frequent win/draw/loss patterns
//!
//! Builds per-team outcome sequences from the full result history and counts
//! contiguous n-gram patterns across all teams.

use crate::{ResultRow, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Outcome of a match from one team's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultSymbol {
    Win,
    Draw,
    Loss,
}

impl ResultSymbol {
    pub fn from_goals(goals_for: u32, goals_against: u32) -> Self {
        match goals_for.cmp(&goals_against) {
            std::cmp::Ordering::Greater => ResultSymbol::Win,
            std::cmp::Ordering::Equal => ResultSymbol::Draw,
            std::cmp::Ordering::Less => ResultSymbol::Loss,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            ResultSymbol::Win => 'W',
            ResultSymbol::Draw => 'D',
            ResultSymbol::Loss => 'L',
        }
    }
}

/// A pattern and how often it occurred
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternCount {
    pub pattern: String,
    pub count: usize,
}

/// Per-team W/D/L strings in match order. Rows must be sorted by date.
pub fn build_team_sequences(rows: &[ResultRow]) -> BTreeMap<TeamId, String> {
    let mut sequences: BTreeMap<TeamId, String> = BTreeMap::new();
    for row in rows {
        let home = ResultSymbol::from_goals(row.home_goals, row.away_goals);
        let away = ResultSymbol::from_goals(row.away_goals, row.home_goals);
        sequences.entry(row.home_team).or_default().push(home.as_char());
        sequences.entry(row.away_team).or_default().push(away.as_char());
    }
    sequences
}

/// Count every contiguous length-`n` window of every sequence
pub fn mine_ngrams<'a, I>(sequences: I, n: usize) -> HashMap<String, usize>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut counts = HashMap::new();
    if n == 0 {
        return counts;
    }
    for seq in sequences {
        // Symbols are ASCII so byte windows are character windows
        let bytes = seq.as_bytes();
        if bytes.len() < n {
            continue;
        }
        for window in bytes.windows(n) {
            let pattern = String::from_utf8_lossy(window).into_owned();
            *counts.entry(pattern).or_insert(0) += 1;
        }
    }
    counts
}

/// The `k` most frequent patterns; equal counts are ordered by pattern
pub fn top_patterns(counts: &HashMap<String, usize>, k: usize) -> Vec<PatternCount> {
    let mut ranked: Vec<PatternCount> = counts
        .iter()
        .map(|(pattern, &count)| PatternCount {
            pattern: pattern.clone(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.pattern.cmp(&b.pattern)));
    ranked.truncate(k);
    ranked
}

/// Sequences, counting and ranking in one pass
pub fn mine_top_patterns(rows: &[ResultRow], n: usize, k: usize) -> Vec<PatternCount> {
    let sequences = build_team_sequences(rows);
    let counts = mine_ngrams(sequences.values(), n);
    log::info!(
        "Mined {} distinct {}-gram patterns from {} team sequences",
        counts.len(),
        n,
        sequences.len()
    );
    top_patterns(&counts, k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn result(day: u32, home: i64, away: i64, home_goals: u32, away_goals: u32) -> ResultRow {
        ResultRow {
            date: NaiveDate::from_ymd_opt(2012, 3, day).unwrap(),
            home_team: TeamId(home),
            away_team: TeamId(away),
            home_goals,
            away_goals,
        }
    }

    #[test]
    fn test_bigrams_of_single_sequence() {
        let seqs = vec!["WWDLW".to_string()];
        let counts = mine_ngrams(&seqs, 2);
        assert_eq!(counts.len(), 4);
        for p in ["WW", "WD", "DL", "LW"] {
            assert_eq!(counts[p], 1, "{}", p);
        }
    }

    #[test]
    fn test_short_and_empty_sequences_contribute_nothing() {
        let seqs = vec![String::new(), "WD".to_string()];
        assert!(mine_ngrams(&seqs, 3).is_empty());
        assert!(mine_ngrams(&seqs, 0).is_empty());
    }

    #[test]
    fn test_sequences_from_results() {
        let rows = vec![
            result(1, 1, 2, 2, 0),
            result(8, 2, 1, 1, 1),
            result(15, 3, 1, 3, 1),
        ];
        let seqs = build_team_sequences(&rows);
        assert_eq!(seqs[&TeamId(1)], "WDL");
        assert_eq!(seqs[&TeamId(2)], "LD");
        assert_eq!(seqs[&TeamId(3)], "W");
    }

    #[test]
    fn test_counts_across_teams() {
        let seqs = vec!["WWW".to_string(), "WWL".to_string()];
        let counts = mine_ngrams(&seqs, 2);
        assert_eq!(counts["WW"], 3);
        assert_eq!(counts["WL"], 1);
    }

    #[test]
    fn test_top_patterns_ties_are_lexicographic() {
        let mut counts = HashMap::new();
        counts.insert("WDL".to_string(), 4);
        counts.insert("DDD".to_string(), 7);
        counts.insert("LLW".to_string(), 4);
        counts.insert("DWW".to_string(), 4);
        counts.insert("WWW".to_string(), 1);

        let top = top_patterns(&counts, 3);
        let names: Vec<&str> = top.iter().map(|p| p.pattern.as_str()).collect();
        assert_eq!(names, vec!["DDD", "DWW", "LLW"]);
        assert_eq!(top[0].count, 7);
    }

    #[test]
    fn test_mine_top_patterns_end_to_end() {
        let rows = vec![
            result(1, 1, 2, 1, 0),
            result(2, 1, 2, 2, 0),
            result(3, 2, 1, 0, 0),
        ];
        // Team 1: WWD, team 2: LLD
        let top = mine_top_patterns(&rows, 2, 10);
        assert_eq!(
            top,
            vec![
                PatternCount { pattern: "LD".to_string(), count: 1 },
                PatternCount { pattern: "LL".to_string(), count: 1 },
                PatternCount { pattern: "WD".to_string(), count: 1 },
                PatternCount { pattern: "WW".to_string(), count: 1 },
            ]
        );
    }
}
