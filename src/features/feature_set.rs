//! Named feature vectors built from match records
//!
//! Every variant is a pure function of a single record. Matrices are built by
//! mapping that function over records, so batch and single-record paths
//! produce identical values.

use crate::{MatchRecord, Result, SoccerError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Floor for attribute-ratio denominators
const RATIO_DENOMINATOR_FLOOR: f64 = 0.1;

/// A named feature mapping with fixed output width
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FeatureSet {
    /// Home/draw/away odds
    Odds,
    /// Home/away overall rating
    Team,
    Aggression,
    Passing,
    Shooting,
    /// All six attributes for both teams
    ComprehensiveTeam,
    /// Four form statistics for both teams
    Form,
    /// Odds, all attributes and form
    Combined,
    /// Combined plus implied probabilities, ratios and home-away differences
    EnhancedCombined,
}

impl FeatureSet {
    pub const ALL: [FeatureSet; 9] = [
        FeatureSet::Odds,
        FeatureSet::Team,
        FeatureSet::Aggression,
        FeatureSet::Passing,
        FeatureSet::Shooting,
        FeatureSet::ComprehensiveTeam,
        FeatureSet::Form,
        FeatureSet::Combined,
        FeatureSet::EnhancedCombined,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FeatureSet::Odds => "Odds",
            FeatureSet::Team => "Team",
            FeatureSet::Aggression => "Aggression",
            FeatureSet::Passing => "Passing",
            FeatureSet::Shooting => "Shooting",
            FeatureSet::ComprehensiveTeam => "ComprehensiveTeam",
            FeatureSet::Form => "Form",
            FeatureSet::Combined => "Combined",
            FeatureSet::EnhancedCombined => "EnhancedCombined",
        }
    }

    /// Output width
    pub fn dim(&self) -> usize {
        match self {
            FeatureSet::Odds => 3,
            FeatureSet::Team
            | FeatureSet::Aggression
            | FeatureSet::Passing
            | FeatureSet::Shooting => 2,
            FeatureSet::ComprehensiveTeam => 12,
            FeatureSet::Form => 8,
            FeatureSet::Combined => 23,
            FeatureSet::EnhancedCombined => 40,
        }
    }

    /// Feature vector for one record
    pub fn extract(&self, r: &MatchRecord) -> Vec<f64> {
        let mut v = Vec::with_capacity(self.dim());
        match self {
            FeatureSet::Odds => push_odds(&mut v, r),
            FeatureSet::Team => v.extend([r.home.overall, r.away.overall]),
            FeatureSet::Aggression => v.extend([r.home.aggression, r.away.aggression]),
            FeatureSet::Passing => v.extend([r.home.passing, r.away.passing]),
            FeatureSet::Shooting => v.extend([r.home.shooting, r.away.shooting]),
            FeatureSet::ComprehensiveTeam => push_attributes(&mut v, r),
            FeatureSet::Form => push_form(&mut v, r),
            FeatureSet::Combined => {
                push_odds(&mut v, r);
                push_attributes(&mut v, r);
                push_form(&mut v, r);
            }
            FeatureSet::EnhancedCombined => push_enhanced(&mut v, r),
        }
        debug_assert_eq!(v.len(), self.dim());
        v
    }

    /// Feature matrix, one row per record
    pub fn build(&self, records: &[MatchRecord]) -> Vec<Vec<f64>> {
        records.iter().map(|r| self.extract(r)).collect()
    }

    /// Class labels (0 = home win, 1 = draw, 2 = away win)
    pub fn labels(records: &[MatchRecord]) -> Vec<usize> {
        records.iter().map(|r| r.outcome.label()).collect()
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FeatureSet {
    type Err = SoccerError;

    fn from_str(s: &str) -> Result<Self> {
        FeatureSet::ALL
            .iter()
            .copied()
            .find(|fs| fs.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| SoccerError::UnknownFeatureSet(s.to_string()))
    }
}

fn push_odds(v: &mut Vec<f64>, r: &MatchRecord) {
    v.extend([r.odds.home, r.odds.draw, r.odds.away]);
}

fn push_attributes(v: &mut Vec<f64>, r: &MatchRecord) {
    v.extend(r.home.to_array());
    v.extend(r.away.to_array());
}

fn push_form(v: &mut Vec<f64>, r: &MatchRecord) {
    v.extend(r.home_form.to_array());
    v.extend(r.away_form.to_array());
}

fn floored(denominator: f64) -> f64 {
    if denominator > RATIO_DENOMINATOR_FLOOR {
        denominator
    } else {
        RATIO_DENOMINATOR_FLOOR
    }
}

/// Zero odds are not guarded: they yield inf/NaN in the derived columns.
fn push_enhanced(v: &mut Vec<f64>, r: &MatchRecord) {
    let odds = r.odds;
    push_odds(v, r);

    // Implied probabilities with the bookmaker margin removed
    let home_prob = 1.0 / odds.home;
    let draw_prob = 1.0 / odds.draw;
    let away_prob = 1.0 / odds.away;
    let total = home_prob + draw_prob + away_prob;
    v.extend([home_prob / total, draw_prob / total, away_prob / total]);

    v.push(odds.home / odds.away);
    v.push(odds.draw / odds.home.min(odds.away));

    push_attributes(v, r);
    push_form(v, r);

    let home_attrs = r.home.to_array();
    let away_attrs = r.away.to_array();
    v.extend(home_attrs.iter().zip(away_attrs.iter()).map(|(h, a)| h - a));

    let home_form = r.home_form.to_array();
    let away_form = r.away_form.to_array();
    v.extend(home_form.iter().zip(away_form.iter()).map(|(h, a)| h - a));

    v.push(r.home.overall / floored(r.away.overall));
    v.push(r.home.passing / floored(r.away.passing));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FormStats, Odds, Outcome, TeamAttributes};

    fn sample_record() -> MatchRecord {
        MatchRecord {
            outcome: Outcome::Draw,
            odds: Odds {
                home: 1.85,
                draw: 3.4,
                away: 4.5,
            },
            home: TeamAttributes {
                overall: 150.0,
                aggression: 62.0,
                passing: 55.0,
                shooting: 60.0,
                defence: 45.0,
                build_up_speed: 50.0,
            },
            away: TeamAttributes {
                overall: 140.0,
                aggression: 48.0,
                passing: 52.0,
                shooting: 58.0,
                defence: 40.0,
                build_up_speed: 48.0,
            },
            home_form: FormStats {
                avg_goals_for: 1.8,
                avg_goals_against: 0.6,
                avg_goal_diff: 1.2,
                win_rate: 0.7,
            },
            away_form: FormStats::COLD_START,
        }
    }

    #[test]
    fn test_dimensions_match_extract() {
        let r = sample_record();
        for fs in FeatureSet::ALL {
            assert_eq!(fs.extract(&r).len(), fs.dim(), "{}", fs);
        }
    }

    #[test]
    fn test_batch_matches_single() {
        let r = sample_record();
        let mut other = sample_record();
        other.odds.home = 2.6;
        other.home_form = FormStats::COLD_START;

        for fs in FeatureSet::ALL {
            let single = fs.extract(&r);
            let batch = fs.build(&[r]);
            assert_eq!(batch.len(), 1);
            assert_eq!(
                batch[0].iter().map(|x| x.to_bits()).collect::<Vec<_>>(),
                single.iter().map(|x| x.to_bits()).collect::<Vec<_>>()
            );

            let mixed = fs.build(&[other, r]);
            assert_eq!(mixed[1], single);
        }
    }

    #[test]
    fn test_combined_layout() {
        let r = sample_record();
        let combined = FeatureSet::Combined.extract(&r);
        let mut expected = FeatureSet::Odds.extract(&r);
        expected.extend(FeatureSet::ComprehensiveTeam.extract(&r));
        expected.extend(FeatureSet::Form.extract(&r));
        assert_eq!(combined, expected);
    }

    #[test]
    fn test_enhanced_layout() {
        let r = sample_record();
        let v = FeatureSet::EnhancedCombined.extract(&r);
        assert_eq!(v.len(), 40);
        assert_eq!(&v[0..3], &[1.85, 3.4, 4.5]);
        assert_eq!(v[6], 1.85 / 4.5);
        assert_eq!(v[7], 3.4 / 1.85);
        assert_eq!(&v[8..20], FeatureSet::ComprehensiveTeam.extract(&r).as_slice());
        assert_eq!(&v[20..28], FeatureSet::Form.extract(&r).as_slice());
        assert_eq!(v[28], 10.0); // overall difference
        assert_eq!(v[29], 14.0); // aggression difference
        assert!((v[34] - 0.4).abs() < 1e-12); // goals-for difference
        assert!((v[37] - 0.37).abs() < 1e-12); // win-rate difference
        assert_eq!(v[38], 150.0 / 140.0);
        assert_eq!(v[39], 55.0 / 52.0);
    }

    #[test]
    fn test_implied_probabilities_sum_to_one() {
        let mut r = sample_record();
        for (h, d, a) in [(1.85, 3.4, 4.5), (1.01, 15.0, 41.0), (3.0, 3.0, 3.0), (7.5, 4.2, 1.4)] {
            r.odds = Odds {
                home: h,
                draw: d,
                away: a,
            };
            let v = FeatureSet::EnhancedCombined.extract(&r);
            let sum = v[3] + v[4] + v[5];
            assert!((sum - 1.0).abs() < 1e-9, "sum was {}", sum);
        }
    }

    #[test]
    fn test_ratio_denominator_floor() {
        let mut r = sample_record();
        r.away.overall = 0.0;
        r.away.passing = 0.05;
        let v = FeatureSet::EnhancedCombined.extract(&r);
        assert_eq!(v[38], 150.0 / 0.1);
        assert_eq!(v[39], 55.0 / 0.1);
    }

    #[test]
    fn test_labels() {
        let mut home = sample_record();
        home.outcome = Outcome::HomeWin;
        let mut away = sample_record();
        away.outcome = Outcome::AwayWin;
        assert_eq!(FeatureSet::labels(&[home, sample_record(), away]), vec![0, 1, 2]);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("enhancedcombined".parse::<FeatureSet>().unwrap(), FeatureSet::EnhancedCombined);
        for fs in FeatureSet::ALL {
            assert_eq!(fs.name().parse::<FeatureSet>().unwrap(), fs);
        }
        assert!("Elo".parse::<FeatureSet>().is_err());
    }
}
