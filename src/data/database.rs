//! SQLite access to the European Soccer database

use crate::{MatchRow, Odds, ResultRow, Result, TeamAttributes, TeamId};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Match rows with odds and each team's most recent attributes, by date.
/// Overall is the sum of three sub-attributes, kept as the dataset defines it.
const MATCH_ROWS_SQL: &str = r#"
    SELECT
        m.date,
        m.home_team_api_id,
        m.away_team_api_id,
        m.home_team_goal,
        m.away_team_goal,
        m.B365H,
        m.B365D,
        m.B365A,
        (th.buildUpPlaySpeed + th.chanceCreationPassing + th.defencePressure) AS home_overall,
        COALESCE(th.defenceAggression, 50.0),
        COALESCE(th.chanceCreationPassing, 50.0),
        COALESCE(th.chanceCreationShooting, 50.0),
        COALESCE(th.defencePressure, 50.0),
        COALESCE(th.buildUpPlaySpeed, 50.0),
        (ta.buildUpPlaySpeed + ta.chanceCreationPassing + ta.defencePressure) AS away_overall,
        COALESCE(ta.defenceAggression, 50.0),
        COALESCE(ta.chanceCreationPassing, 50.0),
        COALESCE(ta.chanceCreationShooting, 50.0),
        COALESCE(ta.defencePressure, 50.0),
        COALESCE(ta.buildUpPlaySpeed, 50.0)
    FROM Match AS m
    JOIN Team_Attributes th ON th.id = (
        SELECT id FROM Team_Attributes
        WHERE team_api_id = m.home_team_api_id
        ORDER BY date DESC LIMIT 1
    )
    JOIN Team_Attributes ta ON ta.id = (
        SELECT id FROM Team_Attributes
        WHERE team_api_id = m.away_team_api_id
        ORDER BY date DESC LIMIT 1
    )
    WHERE m.home_team_goal IS NOT NULL
      AND m.away_team_goal IS NOT NULL
      AND m.B365H IS NOT NULL
      AND m.B365D IS NOT NULL
      AND m.B365A IS NOT NULL
      AND th.buildUpPlaySpeed IS NOT NULL
      AND ta.buildUpPlaySpeed IS NOT NULL
      AND th.chanceCreationPassing IS NOT NULL
      AND ta.chanceCreationPassing IS NOT NULL
      AND th.defencePressure IS NOT NULL
      AND ta.defencePressure IS NOT NULL
    ORDER BY m.date, m.id
    LIMIT ?1
"#;

const RESULT_ROWS_SQL: &str = r#"
    SELECT date, home_team_api_id, away_team_api_id, home_team_goal, away_team_goal
    FROM Match
    WHERE home_team_goal IS NOT NULL AND away_team_goal IS NOT NULL
    ORDER BY date, id
"#;

/// Database connection and queries
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open an existing database file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        Ok(Database { conn })
    }

    /// Create an in-memory database with the tables the loader reads (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Create the subset of the dataset schema used here
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS Match (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                home_team_api_id INTEGER NOT NULL,
                away_team_api_id INTEGER NOT NULL,
                home_team_goal INTEGER,
                away_team_goal INTEGER,
                B365H NUMERIC,
                B365D NUMERIC,
                B365A NUMERIC
            );

            CREATE TABLE IF NOT EXISTS Team_Attributes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                team_api_id INTEGER NOT NULL,
                date TEXT NOT NULL,
                buildUpPlaySpeed INTEGER,
                chanceCreationPassing INTEGER,
                chanceCreationShooting INTEGER,
                defencePressure INTEGER,
                defenceAggression INTEGER
            );

            CREATE INDEX IF NOT EXISTS idx_match_date ON Match(date);
            CREATE INDEX IF NOT EXISTS idx_team_attributes_team ON Team_Attributes(team_api_id, date);
            "#,
        )?;
        Ok(())
    }

    /// Load up to `limit` feature-eligible matches in date order
    pub fn load_match_rows(&self, limit: usize) -> Result<Vec<MatchRow>> {
        let mut stmt = self.conn.prepare(MATCH_ROWS_SQL)?;
        let rows = stmt
            .query_map(params![limit as i64], Self::row_to_match)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        log::info!("Loaded {} match rows", rows.len());
        Ok(rows)
    }

    /// Load every match result in date order
    pub fn load_result_rows(&self) -> Result<Vec<ResultRow>> {
        let mut stmt = self.conn.prepare(RESULT_ROWS_SQL)?;
        let rows = stmt
            .query_map([], |row| {
                let date_str: String = row.get(0)?;
                Ok(ResultRow {
                    date: parse_match_date(&date_str),
                    home_team: TeamId(row.get(1)?),
                    away_team: TeamId(row.get(2)?),
                    home_goals: row.get(3)?,
                    away_goals: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn row_to_match(row: &rusqlite::Row) -> rusqlite::Result<MatchRow> {
        let date_str: String = row.get(0)?;
        Ok(MatchRow {
            date: parse_match_date(&date_str),
            home_team: TeamId(row.get(1)?),
            away_team: TeamId(row.get(2)?),
            home_goals: row.get(3)?,
            away_goals: row.get(4)?,
            odds: Odds {
                home: row.get(5)?,
                draw: row.get(6)?,
                away: row.get(7)?,
            },
            home: Self::attributes_at(row, 8)?,
            away: Self::attributes_at(row, 14)?,
        })
    }

    fn attributes_at(row: &rusqlite::Row, offset: usize) -> rusqlite::Result<TeamAttributes> {
        Ok(TeamAttributes {
            overall: row.get(offset)?,
            aggression: row.get(offset + 1)?,
            passing: row.get(offset + 2)?,
            shooting: row.get(offset + 3)?,
            defence: row.get(offset + 4)?,
            build_up_speed: row.get(offset + 5)?,
        })
    }

    /// Insert a match (used to seed test databases)
    pub fn insert_match(
        &self,
        date: &str,
        home_team: TeamId,
        away_team: TeamId,
        home_goals: u32,
        away_goals: u32,
        odds: Option<Odds>,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO Match (date, home_team_api_id, away_team_api_id, home_team_goal,
                                away_team_goal, B365H, B365D, B365A)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                date,
                home_team.0,
                away_team.0,
                home_goals,
                away_goals,
                odds.map(|o| o.home),
                odds.map(|o| o.draw),
                odds.map(|o| o.away),
            ],
        )?;
        Ok(())
    }

    /// Insert a dated attribute snapshot for a team
    #[allow(clippy::too_many_arguments)]
    pub fn insert_team_attributes(
        &self,
        team: TeamId,
        date: &str,
        build_up_speed: i64,
        passing: i64,
        shooting: Option<i64>,
        defence_pressure: i64,
        aggression: Option<i64>,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO Team_Attributes (team_api_id, date, buildUpPlaySpeed, chanceCreationPassing,
                                          chanceCreationShooting, defencePressure, defenceAggression)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![team.0, date, build_up_speed, passing, shooting, defence_pressure, aggression],
        )?;
        Ok(())
    }

    /// Get database statistics
    pub fn get_stats(&self) -> Result<DatabaseStats> {
        let match_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM Match", [], |row| row.get(0))?;

        let team_count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM (
                SELECT home_team_api_id FROM Match
                UNION
                SELECT away_team_api_id FROM Match
            )",
            [],
            |row| row.get(0),
        )?;

        let with_odds: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM Match WHERE B365H IS NOT NULL AND B365D IS NOT NULL AND B365A IS NOT NULL",
            [],
            |row| row.get(0),
        )?;

        let min_date: Option<String> = self
            .conn
            .query_row("SELECT MIN(date) FROM Match", [], |row| row.get(0))
            .optional()?
            .flatten();

        let max_date: Option<String> = self
            .conn
            .query_row("SELECT MAX(date) FROM Match", [], |row| row.get(0))
            .optional()?
            .flatten();

        Ok(DatabaseStats {
            team_count: team_count as usize,
            match_count: match_count as usize,
            matches_with_odds: with_odds as usize,
            earliest_match: min_date.map(|s| parse_match_date(&s)),
            latest_match: max_date.map(|s| parse_match_date(&s)),
        })
    }
}

/// Parse `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS`; unparseable dates fall back to 2000-01-01
fn parse_match_date(s: &str) -> NaiveDate {
    let day = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").unwrap_or_else(|e| {
        log::warn!("Unparseable match date '{}' ({}), using {}", s, e, fallback_date());
        fallback_date()
    })
}

fn fallback_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default()
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct DatabaseStats {
    pub team_count: usize,
    pub match_count: usize,
    pub matches_with_odds: usize,
    pub earliest_match: Option<NaiveDate>,
    pub latest_match: Option<NaiveDate>,
}
