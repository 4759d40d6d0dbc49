//! Team form computation
//!
//! Rolling goal and win-rate statistics per team, and the chronological
//! replay that attaches each team's pre-match form to its match record.

use crate::{FormStats, MatchRecord, MatchRow, Outcome, TeamId};
use std::collections::{HashMap, VecDeque};

/// Default number of recent matches in a form window
pub const DEFAULT_FORM_WINDOW: usize = 5;

/// One result from a team's own perspective
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormResult {
    pub goals_for: u32,
    pub goals_against: u32,
    /// 1.0 win, 0.5 draw, 0.0 loss
    pub win_score: f64,
}

impl FormResult {
    pub fn new(goals_for: u32, goals_against: u32) -> Self {
        let win_score = match goals_for.cmp(&goals_against) {
            std::cmp::Ordering::Greater => 1.0,
            std::cmp::Ordering::Equal => 0.5,
            std::cmp::Ordering::Less => 0.0,
        };
        FormResult {
            goals_for,
            goals_against,
            win_score,
        }
    }
}

/// Bounded window of a team's most recent results with running sums
#[derive(Debug, Clone)]
pub struct TeamFormAggregator {
    /// Window size (number of recent matches)
    capacity: usize,
    history: VecDeque<FormResult>,
    sum_goals_for: f64,
    sum_goals_against: f64,
    sum_win_score: f64,
}

impl TeamFormAggregator {
    pub fn new(capacity: usize) -> Self {
        TeamFormAggregator {
            capacity,
            history: VecDeque::with_capacity(capacity + 1),
            sum_goals_for: 0.0,
            sum_goals_against: 0.0,
            sum_win_score: 0.0,
        }
    }

    /// Push a result, evicting the oldest once the window overflows
    pub fn record(&mut self, goals_for: u32, goals_against: u32) {
        let result = FormResult::new(goals_for, goals_against);
        self.history.push_back(result);
        self.sum_goals_for += goals_for as f64;
        self.sum_goals_against += goals_against as f64;
        self.sum_win_score += result.win_score;

        if self.history.len() > self.capacity {
            if let Some(removed) = self.history.pop_front() {
                self.sum_goals_for -= removed.goals_for as f64;
                self.sum_goals_against -= removed.goals_against as f64;
                self.sum_win_score -= removed.win_score;
            }
        }
    }

    /// Current form; cold-start defaults when nothing has been recorded
    pub fn current(&self) -> FormStats {
        if self.history.is_empty() {
            return FormStats::COLD_START;
        }
        let n = self.history.len() as f64;
        FormStats {
            avg_goals_for: self.sum_goals_for / n,
            avg_goals_against: self.sum_goals_against / n,
            avg_goal_diff: (self.sum_goals_for - self.sum_goals_against) / n,
            win_rate: self.sum_win_score / n,
        }
    }

    /// Number of results in the window
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Running sums of (goals for, goals against, win score)
    pub fn sums(&self) -> (f64, f64, f64) {
        (self.sum_goals_for, self.sum_goals_against, self.sum_win_score)
    }
}

/// Form aggregators keyed by team, created on first recorded result
#[derive(Debug, Clone)]
pub struct FormTable {
    window: usize,
    teams: HashMap<TeamId, TeamFormAggregator>,
}

impl FormTable {
    pub fn new(window: usize) -> Self {
        FormTable {
            window,
            teams: HashMap::new(),
        }
    }

    /// Current form for a team (cold start if never seen)
    pub fn current(&self, team: TeamId) -> FormStats {
        self.teams
            .get(&team)
            .map(|agg| agg.current())
            .unwrap_or(FormStats::COLD_START)
    }

    /// Record a result from the team's own perspective
    pub fn record(&mut self, team: TeamId, goals_for: u32, goals_against: u32) {
        let window = self.window;
        self.teams
            .entry(team)
            .or_insert_with(|| TeamFormAggregator::new(window))
            .record(goals_for, goals_against);
    }

    pub fn get(&self, team: TeamId) -> Option<&TeamFormAggregator> {
        self.teams.get(&team)
    }

    /// Number of teams seen so far
    pub fn team_count(&self) -> usize {
        self.teams.len()
    }
}

/// Chronological replay that enriches raw rows with pre-match form.
///
/// Rows must arrive in non-decreasing date order. Out-of-order input is not
/// detected and leaks future results into earlier records.
pub struct TemporalReplay {
    forms: FormTable,
}

impl TemporalReplay {
    pub fn new(window: usize) -> Self {
        TemporalReplay {
            forms: FormTable::new(window),
        }
    }

    /// Emit the record for one match, then fold its result into both teams' form
    pub fn process(&mut self, row: &MatchRow) -> MatchRecord {
        let home_form = self.forms.current(row.home_team);
        let away_form = self.forms.current(row.away_team);

        let record = MatchRecord {
            outcome: Outcome::from_goals(row.home_goals, row.away_goals),
            odds: row.odds,
            home: row.home,
            away: row.away,
            home_form,
            away_form,
        };

        self.forms
            .record(row.home_team, row.home_goals, row.away_goals);
        self.forms
            .record(row.away_team, row.away_goals, row.home_goals);

        record
    }

    /// Replay every row in order
    pub fn replay(&mut self, rows: &[MatchRow]) -> Vec<MatchRecord> {
        rows.iter().map(|row| self.process(row)).collect()
    }

    pub fn forms(&self) -> &FormTable {
        &self.forms
    }
}

/// Replay rows with a fresh form table
pub fn enrich_matches(rows: &[MatchRow], window: usize) -> Vec<MatchRecord> {
    let mut replay = TemporalReplay::new(window);
    let records = replay.replay(rows);
    log::info!(
        "Replayed {} matches across {} teams (form window {})",
        records.len(),
        replay.forms().team_count(),
        window
    );
    records
}
