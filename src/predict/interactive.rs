//! Line-oriented prediction prompt
//!
//! Reads odds, attributes and optional form values for one match at a time and
//! prints each trained model's predicted outcome. Entering `quit` at the first
//! prompt, or closing the input, ends the session.

use std::io::{BufRead, Write};

use super::Predictor;
use crate::{FormStats, MatchRecord, Odds, Outcome, Result, TeamAttributes};

const ATTRIBUTE_NAMES: [&str; 6] = [
    "overall",
    "aggression",
    "passing",
    "shooting",
    "defence",
    "build-up speed",
];

pub struct InteractiveSession<'a, R: BufRead, W: Write> {
    input: R,
    output: W,
    predictor: &'a Predictor,
}

impl<'a, R: BufRead, W: Write> InteractiveSession<'a, R, W> {
    pub fn new(input: R, output: W, predictor: &'a Predictor) -> Self {
        InteractiveSession {
            input,
            output,
            predictor,
        }
    }

    /// Prompt for matches until `quit` or end of input; returns matches predicted
    pub fn run(&mut self) -> Result<usize> {
        writeln!(self.output, "\nEnter match details to get predictions from trained models.")?;
        writeln!(self.output, "Type 'quit' to exit.\n")?;

        let mut predicted = 0;
        while let Some(record) = self.read_match()? {
            self.print_predictions(&record)?;
            predicted += 1;
        }
        writeln!(self.output, "Exiting interactive mode. Goodbye!")?;
        Ok(predicted)
    }

    /// One match worth of answers; `None` when the user quits
    pub fn read_match(&mut self) -> Result<Option<MatchRecord>> {
        let Some(home_odds) = self.first_prompt("Enter home team odds (e.g., 2.5): ")? else {
            return Ok(None);
        };
        let Some(draw) = self.required("Enter draw odds (e.g., 3.0): ")? else {
            return Ok(None);
        };
        let Some(away) = self.required("Enter away team odds (e.g., 2.8): ")? else {
            return Ok(None);
        };

        let Some(home) = self.read_attributes("home")? else {
            return Ok(None);
        };
        let Some(away_attrs) = self.read_attributes("away")? else {
            return Ok(None);
        };
        let Some(home_form) = self.read_form("home")? else {
            return Ok(None);
        };
        let Some(away_form) = self.read_form("away")? else {
            return Ok(None);
        };

        Ok(Some(MatchRecord {
            // Placeholder; the outcome is what we are predicting
            outcome: Outcome::HomeWin,
            odds: Odds {
                home: home_odds,
                draw,
                away,
            },
            home,
            away: away_attrs,
            home_form,
            away_form,
        }))
    }

    fn read_attributes(&mut self, side: &str) -> Result<Option<TeamAttributes>> {
        let mut values = [0.0; 6];
        for (value, name) in values.iter_mut().zip(ATTRIBUTE_NAMES) {
            match self.required(&format!("Enter {} team {} (0-100): ", side, name))? {
                Some(v) => *value = v,
                None => return Ok(None),
            }
        }
        Ok(Some(TeamAttributes {
            overall: values[0],
            aggression: values[1],
            passing: values[2],
            shooting: values[3],
            defence: values[4],
            build_up_speed: values[5],
        }))
    }

    fn read_form(&mut self, side: &str) -> Result<Option<FormStats>> {
        let cold = FormStats::COLD_START;
        let prompts = [
            (
                format!("Enter {} avg goals scored in recent matches (default {}): ", side, cold.avg_goals_for),
                cold.avg_goals_for,
            ),
            (
                format!(
                    "Enter {} avg goals conceded in recent matches (default {}): ",
                    side, cold.avg_goals_against
                ),
                cold.avg_goals_against,
            ),
            (
                format!("Enter {} recent win rate (0-1, default {}): ", side, cold.win_rate),
                cold.win_rate,
            ),
        ];

        let mut values = [0.0; 3];
        for (value, (prompt, default)) in values.iter_mut().zip(prompts.iter()) {
            match self.with_default(prompt, *default)? {
                Some(v) => *value = v,
                None => return Ok(None),
            }
        }
        Ok(Some(FormStats::from_averages(values[0], values[1], values[2])))
    }

    fn print_predictions(&mut self, record: &MatchRecord) -> Result<()> {
        writeln!(self.output, "\n{:<20} {:<20} {:>10}", "Model", "Feature Set", "Prediction")?;
        writeln!(self.output, "{}", "-".repeat(52))?;
        for p in self.predictor.predict(record) {
            writeln!(
                self.output,
                "{:<20} {:<20} {:>10}",
                p.kind.name(),
                p.feature_set.name(),
                p.outcome.to_string()
            )?;
        }
        writeln!(self.output)?;
        Ok(())
    }

    /// Next trimmed line, `None` at end of input
    fn next_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn first_prompt(&mut self, prompt: &str) -> Result<Option<f64>> {
        loop {
            let Some(line) = self.next_line(prompt)? else {
                return Ok(None);
            };
            if line.eq_ignore_ascii_case("quit") {
                return Ok(None);
            }
            match line.parse::<f64>() {
                Ok(v) => return Ok(Some(v)),
                Err(_) => writeln!(self.output, "Invalid input. Please enter a numeric value.")?,
            }
        }
    }

    fn required(&mut self, prompt: &str) -> Result<Option<f64>> {
        loop {
            let Some(line) = self.next_line(prompt)? else {
                return Ok(None);
            };
            match line.parse::<f64>() {
                Ok(v) => return Ok(Some(v)),
                Err(_) => writeln!(self.output, "Invalid input. Please enter a numeric value.")?,
            }
        }
    }

    fn with_default(&mut self, prompt: &str, default: f64) -> Result<Option<f64>> {
        loop {
            let Some(line) = self.next_line(prompt)? else {
                return Ok(None);
            };
            if line.is_empty() {
                return Ok(Some(default));
            }
            match line.parse::<f64>() {
                Ok(v) => return Ok(Some(v)),
                Err(_) => writeln!(self.output, "Invalid input. Please enter a numeric value.")?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::Cursor;

    const FULL_MATCH: &str = "2.5\n3.0\n2.8\n\
        70\n60\n75\n70\n65\n60\n\
        68\n55\n72\n68\n70\n58\n";

    fn empty_predictor() -> Predictor {
        Predictor::new(Vec::new(), BTreeMap::new())
    }

    #[test]
    fn test_reads_match_with_default_form() {
        let predictor = empty_predictor();
        let input = format!("{}\n\n\n\n\n\n", FULL_MATCH);
        let mut out = Vec::new();
        let mut session = InteractiveSession::new(Cursor::new(input), &mut out, &predictor);

        let record = session.read_match().unwrap().unwrap();
        assert_eq!(record.odds.home, 2.5);
        assert_eq!(record.odds.away, 2.8);
        assert_eq!(record.home.overall, 70.0);
        assert_eq!(record.home.build_up_speed, 60.0);
        assert_eq!(record.away.passing, 72.0);
        assert_eq!(record.home_form, FormStats::COLD_START);
        assert_eq!(record.away_form, FormStats::COLD_START);
    }

    #[test]
    fn test_form_goal_diff_is_derived() {
        let predictor = empty_predictor();
        let input = format!("{}2.0\n0.5\n0.6\n\n\n\n", FULL_MATCH);
        let mut out = Vec::new();
        let mut session = InteractiveSession::new(Cursor::new(input), &mut out, &predictor);

        let record = session.read_match().unwrap().unwrap();
        assert_eq!(record.home_form.avg_goals_for, 2.0);
        assert_eq!(record.home_form.avg_goal_diff, 1.5);
        assert_eq!(record.home_form.win_rate, 0.6);
    }

    #[test]
    fn test_invalid_input_is_reprompted() {
        let predictor = empty_predictor();
        let input = format!("abc\n{}\n\n\n\n\n\n", FULL_MATCH.replacen("3.0\n", "x\n3.0\n", 1));
        let mut out = Vec::new();
        let record = {
            let mut session = InteractiveSession::new(Cursor::new(input), &mut out, &predictor);
            session.read_match().unwrap().unwrap()
        };
        assert_eq!(record.odds.draw, 3.0);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Invalid input").count(), 2);
    }

    #[test]
    fn test_quit_and_eof_end_session() {
        let predictor = empty_predictor();
        let mut out = Vec::new();
        let mut session = InteractiveSession::new(Cursor::new("QUIT\n"), &mut out, &predictor);
        assert_eq!(session.run().unwrap(), 0);

        let mut out = Vec::new();
        let mut session = InteractiveSession::new(Cursor::new("2.5\n3.0\n"), &mut out, &predictor);
        assert!(session.read_match().unwrap().is_none());
    }

    #[test]
    fn test_run_counts_matches() {
        let predictor = empty_predictor();
        let input = format!("{}\n\n\n\n\n\nquit\n", FULL_MATCH);
        let mut out = Vec::new();
        let count = {
            let mut session = InteractiveSession::new(Cursor::new(input), &mut out, &predictor);
            session.run().unwrap()
        };
        assert_eq!(count, 1);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Prediction"));
        assert!(text.ends_with("Goodbye!\n"));
    }
}
