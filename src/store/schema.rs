use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const USER_DATA_KEY: &str = "userData";
pub const SNAPSHOT_KEY: &str = "currentPuzzleState";
pub const SETTINGS_KEY: &str = "settings";

/// Completion history plus the aggregate stats derived from it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    #[serde(default)]
    pub puzzles: BTreeMap<NaiveDate, PuzzleRecord>,
    #[serde(default)]
    pub stats: StoredStats,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleRecord {
    pub solved: bool,
    /// Whole seconds from session start to completion.
    #[serde(default)]
    pub time: u64,
    #[serde(default)]
    pub solved_words: Vec<String>,
    #[serde(default)]
    pub author_solved: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Persisted aggregates. Only `max_streak` carries information that cannot be
/// rebuilt from `puzzles`; everything else is recomputed on read.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoredStats {
    pub total_solved: u32,
    pub current_streak: u32,
    pub max_streak: u32,
    pub total_time: u64,
    pub last_played: Option<NaiveDate>,
}

/// In-progress session, saved after every mutation so a reload can resume it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub date: NaiveDate,
    #[serde(default)]
    pub solved_words: Vec<String>,
    #[serde(default)]
    pub author_solved: bool,
    #[serde(default)]
    pub game_complete: bool,
    #[serde(default)]
    pub active_word: Option<String>,
    #[serde(default)]
    pub user_input: String,
    #[serde(default)]
    pub used_letters: Vec<usize>,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_true")]
    pub sound_effects_enabled: bool,
    #[serde(default = "default_true")]
    pub background_music_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_effects_enabled: true,
            background_music_enabled: true,
        }
    }
}
