//! Database schema and connection management.

use crate::error::{Result, UfcError};
use dirs::data_dir;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Scoped handle on the UFC database.
///
/// Opened once at process start and passed explicitly to everything that
/// needs it; the connection closes when the handle drops.
pub struct UfcDatabase {
    pub(crate) conn: Connection,
}

impl UfcDatabase {
    /// Open (creating if missing) the database at `path` and ensure the
    /// schema exists. Foreign keys are enforced for the whole connection.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Default location: `<platform data dir>/ufc-data/ufc_data.db`.
    pub fn default_path() -> Result<PathBuf> {
        let dir = data_dir().ok_or(UfcError::NotFound {
            entity: "data directory",
            key: "platform default".to_string(),
        })?;
        Ok(dir.join("ufc-data").join("ufc_data.db"))
    }

    /// Idempotently create all tables and indexes. Existing tables are never
    /// altered.
    pub(crate) fn initialize_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS fighters (
                fighter_id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                height_cm REAL,
                reach_cm REAL,
                stance TEXT,
                date_of_birth TEXT
            );

            CREATE TABLE IF NOT EXISTS events (
                event_id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                event_date TEXT NOT NULL,
                location TEXT,
                UNIQUE (name, event_date)
            );

            CREATE TABLE IF NOT EXISTS weight_classes (
                weight_class_id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                weight_limit_lbs REAL,
                gender TEXT NOT NULL DEFAULT 'male'
            );

            CREATE TABLE IF NOT EXISTS fights (
                fight_id INTEGER PRIMARY KEY,
                event_id INTEGER NOT NULL REFERENCES events (event_id),
                fighter1_id INTEGER NOT NULL REFERENCES fighters (fighter_id),
                fighter2_id INTEGER NOT NULL REFERENCES fighters (fighter_id),
                weight_class_id INTEGER REFERENCES weight_classes (weight_class_id),
                outcome TEXT CHECK (outcome IN ('fighter1', 'fighter2', 'draw', 'no_contest')),
                method TEXT,
                round INTEGER,
                time TEXT,
                referee TEXT,
                CHECK (fighter1_id <> fighter2_id)
            );

            CREATE TABLE IF NOT EXISTS fighter_stats (
                stat_id INTEGER PRIMARY KEY,
                fight_id INTEGER NOT NULL REFERENCES fights (fight_id),
                fighter_id INTEGER NOT NULL REFERENCES fighters (fighter_id),
                sig_strikes_landed INTEGER,
                sig_strikes_attempted INTEGER,
                takedowns INTEGER,
                knockdowns INTEGER,
                control_time_seconds INTEGER,
                UNIQUE (fight_id, fighter_id)
            );

            CREATE TABLE IF NOT EXISTS betting_odds (
                odds_id INTEGER PRIMARY KEY,
                fight_id INTEGER NOT NULL REFERENCES fights (fight_id),
                favourite_fighter_id INTEGER NOT NULL REFERENCES fighters (fighter_id),
                bookmaker TEXT NOT NULL,
                favourite_odds REAL NOT NULL,
                underdog_odds REAL NOT NULL,
                odds_date TEXT,
                source_link TEXT
            );

            CREATE TABLE IF NOT EXISTS prediction_models (
                model_id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                version TEXT NOT NULL,
                config TEXT,
                created_at TEXT NOT NULL,
                UNIQUE (name, version)
            );

            CREATE TABLE IF NOT EXISTS predictions (
                prediction_id INTEGER PRIMARY KEY,
                model_id INTEGER NOT NULL REFERENCES prediction_models (model_id),
                fight_id INTEGER NOT NULL REFERENCES fights (fight_id),
                predicted_outcome TEXT NOT NULL
                    CHECK (predicted_outcome IN ('fighter1', 'fighter2', 'draw', 'no_contest')),
                confidence REAL NOT NULL,
                actual_outcome TEXT
                    CHECK (actual_outcome IN ('fighter1', 'fighter2', 'draw', 'no_contest')),
                UNIQUE (model_id, fight_id)
            );

            CREATE TABLE IF NOT EXISTS draftkings_lineups (
                lineup_id INTEGER PRIMARY KEY,
                event_id INTEGER NOT NULL REFERENCES events (event_id),
                name TEXT NOT NULL,
                salary_cap INTEGER NOT NULL,
                total_projected_points REAL,
                total_actual_points REAL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS lineup_fighters (
                lineup_id INTEGER NOT NULL REFERENCES draftkings_lineups (lineup_id),
                fighter_id INTEGER NOT NULL REFERENCES fighters (fighter_id),
                salary INTEGER NOT NULL,
                projected_points REAL,
                actual_points REAL,
                PRIMARY KEY (lineup_id, fighter_id)
            );

            CREATE INDEX IF NOT EXISTS idx_events_date ON events (event_date);
            CREATE INDEX IF NOT EXISTS idx_fights_event ON fights (event_id);
            CREATE INDEX IF NOT EXISTS idx_fights_outcome ON fights (outcome);
            CREATE INDEX IF NOT EXISTS idx_odds_fight_fighter
                ON betting_odds (fight_id, favourite_fighter_id);
            CREATE INDEX IF NOT EXISTS idx_predictions_model ON predictions (model_id);",
        )?;

        Ok(())
    }

    /// Seed the standard UFC divisions. INSERT OR IGNORE, so replays and
    /// already-seeded databases are no-ops.
    pub fn seed_weight_classes(&self) -> Result<usize> {
        const DIVISIONS: &[(&str, Option<f64>, &str)] = &[
            ("Flyweight", Some(125.0), "male"),
            ("Bantamweight", Some(135.0), "male"),
            ("Featherweight", Some(145.0), "male"),
            ("Lightweight", Some(155.0), "male"),
            ("Welterweight", Some(170.0), "male"),
            ("Middleweight", Some(185.0), "male"),
            ("Light Heavyweight", Some(205.0), "male"),
            ("Heavyweight", Some(265.0), "male"),
            ("Women's Strawweight", Some(115.0), "female"),
            ("Women's Flyweight", Some(125.0), "female"),
            ("Women's Bantamweight", Some(135.0), "female"),
            ("Women's Featherweight", Some(145.0), "female"),
            ("Catchweight", None, "any"),
        ];

        let mut seeded = 0;
        for (name, limit, gender) in DIVISIONS {
            seeded += self.conn.execute(
                "INSERT OR IGNORE INTO weight_classes (name, weight_limit_lbs, gender)
                 VALUES (?, ?, ?)",
                rusqlite::params![name, limit, gender],
            )?;
        }
        Ok(seeded)
    }
}
