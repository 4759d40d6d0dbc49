//! Match datasets: loading, enrichment and train/test splitting

use crate::data::Database;
use crate::features::enrich_matches;
use crate::{MatchRecord, Outcome, Result, SoccerError};
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Enriched match records ready for feature building
#[derive(Debug, Clone)]
pub struct MatchDataset {
    pub records: Vec<MatchRecord>,
}

impl MatchDataset {
    /// Load rows, check there are enough, and replay them into records
    pub fn load(db: &Database, row_limit: usize, min_rows: usize, form_window: usize) -> Result<Self> {
        let rows = db.load_match_rows(row_limit)?;
        if rows.len() < min_rows {
            return Err(SoccerError::InsufficientData {
                loaded: rows.len(),
                required: min_rows,
            });
        }
        Ok(MatchDataset {
            records: enrich_matches(&rows, form_window),
        })
    }

    pub fn from_records(records: Vec<MatchRecord>) -> Self {
        MatchDataset { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Count of records per outcome class
    pub fn class_counts(&self) -> [usize; Outcome::COUNT] {
        let mut counts = [0; Outcome::COUNT];
        for r in &self.records {
            counts[r.outcome.label()] += 1;
        }
        counts
    }

    /// Shuffle and split into (train, test)
    pub fn split(&self, train_fraction: f64, seed: u64) -> (Vec<MatchRecord>, Vec<MatchRecord>) {
        train_test_split(&self.records, train_fraction, seed)
    }
}

/// Seeded shuffle, then the first `floor(len * train_fraction)` records train.
///
/// Form features are already fixed by the replay, so shuffling afterwards
/// does not leak later results into earlier records.
pub fn train_test_split(
    records: &[MatchRecord],
    train_fraction: f64,
    seed: u64,
) -> (Vec<MatchRecord>, Vec<MatchRecord>) {
    let mut shuffled = records.to_vec();
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    shuffled.shuffle(&mut rng);

    let n_train = ((records.len() as f64) * train_fraction).floor() as usize;
    let n_train = n_train.min(shuffled.len());
    let test = shuffled.split_off(n_train);

    log::info!(
        "Split {} records: train={}, test={}",
        records.len(),
        shuffled.len(),
        test.len()
    );
    (shuffled, test)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FormStats, Odds, TeamAttributes, TeamId};

    fn record(i: usize) -> MatchRecord {
        let attrs = TeamAttributes {
            overall: i as f64,
            aggression: 50.0,
            passing: 50.0,
            shooting: 50.0,
            defence: 50.0,
            build_up_speed: 50.0,
        };
        MatchRecord {
            outcome: Outcome::from_label(i % 3).unwrap(),
            odds: Odds {
                home: 2.0,
                draw: 3.0,
                away: 4.0,
            },
            home: attrs,
            away: attrs,
            home_form: FormStats::COLD_START,
            away_form: FormStats::COLD_START,
        }
    }

    #[test]
    fn test_split_sizes() {
        let records: Vec<_> = (0..10).map(record).collect();
        let (train, test) = train_test_split(&records, 0.8, 7);
        assert_eq!(train.len(), 8);
        assert_eq!(test.len(), 2);
    }

    #[test]
    fn test_split_is_a_partition() {
        let records: Vec<_> = (0..25).map(record).collect();
        let (train, test) = train_test_split(&records, 0.6, 3);
        let mut seen: Vec<usize> = train
            .iter()
            .chain(test.iter())
            .map(|r| r.home.overall as usize)
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..25).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_is_reproducible() {
        let records: Vec<_> = (0..30).map(record).collect();
        let a = train_test_split(&records, 0.8, 42);
        let b = train_test_split(&records, 0.8, 42);
        assert_eq!(a.0, b.0);
        assert_eq!(a.1, b.1);
    }

    #[test]
    fn test_class_counts() {
        let dataset = MatchDataset::from_records((0..7).map(record).collect());
        assert_eq!(dataset.class_counts(), [3, 2, 2]);
    }

    #[test]
    fn test_load_rejects_small_database() {
        let db = Database::in_memory().unwrap();
        db.insert_team_attributes(TeamId(1), "2010-01-01", 50, 50, None, 50, None)
            .unwrap();
        db.insert_team_attributes(TeamId(2), "2010-01-01", 50, 50, None, 50, None)
            .unwrap();
        let odds = Some(Odds {
            home: 2.0,
            draw: 3.0,
            away: 4.0,
        });
        db.insert_match("2011-01-01", TeamId(1), TeamId(2), 1, 0, odds).unwrap();

        match MatchDataset::load(&db, 100, 5, 5) {
            Err(SoccerError::InsufficientData { loaded, required }) => {
                assert_eq!(loaded, 1);
                assert_eq!(required, 5);
            }
            other => panic!("expected InsufficientData, got {:?}", other.map(|d| d.len())),
        }

        let dataset = MatchDataset::load(&db, 100, 1, 5).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records[0].outcome, Outcome::HomeWin);
    }
}
