use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};

use crate::engine::stats::{self, DisplayStats};
use crate::session::PuzzleSession;
use crate::store::layered::Storage;
use crate::store::schema::{
    PuzzleRecord, SETTINGS_KEY, SNAPSHOT_KEY, SessionSnapshot, Settings, USER_DATA_KEY, UserData,
};

/// Completion history, the in-progress snapshot and settings.
///
/// `userData` goes through both storage layers; the snapshot and settings are
/// device-local.
pub struct ProgressStore {
    storage: Storage,
    data: UserData,
}

impl ProgressStore {
    pub fn open(storage: Storage) -> Self {
        let data = storage.load_json(USER_DATA_KEY).unwrap_or_default();
        Self { storage, data }
    }

    pub fn user_data(&self) -> &UserData {
        &self.data
    }

    pub fn record(&self, date: NaiveDate) -> Option<&PuzzleRecord> {
        self.data.puzzles.get(&date)
    }

    pub fn is_solved(&self, date: NaiveDate) -> bool {
        self.record(date).is_some_and(|r| r.solved)
    }

    pub fn display_stats(&self, today: NaiveDate) -> DisplayStats {
        stats::display_stats(&self.data, today)
    }

    /// Commit a finished session. Returns `Ok(false)` without touching anything
    /// when the date is already recorded as solved.
    pub fn record_completion(
        &mut self,
        session: &PuzzleSession,
        now: DateTime<Utc>,
        today: NaiveDate,
    ) -> Result<bool> {
        let date = session.date();
        if self.is_solved(date) {
            log::debug!("{date} already recorded");
            return Ok(false);
        }

        let record = PuzzleRecord {
            solved: true,
            time: session.elapsed_secs(now),
            solved_words: session.solved_words().iter().cloned().collect(),
            author_solved: session.author_solved(),
            completed_at: Some(session.completed_at().unwrap_or(now)),
        };
        log::info!("recording {date} solved in {}s", record.time);

        self.data.puzzles.insert(date, record);
        stats::refresh(&mut self.data, today);
        self.data.stats.last_played = Some(date);

        let saved = self.storage.save_json(USER_DATA_KEY, &self.data);
        self.clear_snapshot();
        saved.map(|()| true)
    }

    pub fn save_snapshot(&self, snapshot: &SessionSnapshot) -> Result<()> {
        self.storage.save_json_local(SNAPSHOT_KEY, snapshot)
    }

    /// Read the snapshot without discarding anything.
    pub fn peek_snapshot(&self) -> Option<SessionSnapshot> {
        self.storage.load_json_local(SNAPSHOT_KEY)
    }

    /// The snapshot, if it is resumable: not from `today` and no older than
    /// `max_age_days`. Anything else, including an undecodable snapshot, is
    /// removed.
    pub fn load_snapshot(&self, today: NaiveDate, max_age_days: i64) -> Option<SessionSnapshot> {
        let Some(snapshot) = self.peek_snapshot() else {
            self.clear_snapshot();
            return None;
        };

        let age = today.signed_duration_since(snapshot.date).num_days();
        if snapshot.date == today || age > max_age_days {
            log::debug!("discarding snapshot for {} ({age} days old)", snapshot.date);
            self.clear_snapshot();
            return None;
        }
        Some(snapshot)
    }

    pub fn clear_snapshot(&self) {
        if let Err(e) = self.storage.remove_local(SNAPSHOT_KEY) {
            log::warn!("failed to clear snapshot: {e:#}");
        }
    }

    pub fn load_settings(&self) -> Settings {
        self.storage.load_json_local(SETTINGS_KEY).unwrap_or_default()
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.storage.save_json_local(SETTINGS_KEY, settings)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::catalog::{Quote, ScrambledWord};
    use crate::store::persistence::{MemoryStore, Persistence};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn solved_session(date: NaiveDate, started: DateTime<Utc>, done: DateTime<Utc>) -> PuzzleSession {
        let quote = Quote {
            date,
            text: "go".to_string(),
            author: "Al".to_string(),
            scrambled_words: vec![ScrambledWord {
                index: 0,
                original: "go".to_string(),
                scrambled: "og".to_string(),
            }],
            scrambled_author: "la".to_string(),
        };
        let mut session = PuzzleSession::new(quote, started);
        session.advance_to_next(started);
        session.type_char('g');
        session.type_char('o');
        session.advance_to_next(started);
        session.type_char('a');
        session.type_char('l');
        session.advance_to_next(done);
        assert!(session.is_complete());
        session
    }

    fn memory_store() -> (Rc<MemoryStore>, Rc<MemoryStore>, ProgressStore) {
        let local = Rc::new(MemoryStore::new());
        let remote = Rc::new(MemoryStore::new());
        let storage = Storage::new(Box::new(Rc::clone(&local)), Some(Box::new(Rc::clone(&remote))));
        (local, remote, ProgressStore::open(storage))
    }

    fn snapshot_for(date: NaiveDate) -> SessionSnapshot {
        SessionSnapshot {
            date,
            solved_words: vec![],
            author_solved: false,
            game_complete: false,
            active_word: None,
            user_input: String::new(),
            used_letters: vec![],
            timestamp: 0,
        }
    }

    #[test]
    fn test_record_completion_writes_entry_and_stats() {
        let (local, remote, mut store) = memory_store();
        store.save_snapshot(&snapshot_for(day(19))).unwrap();

        let session = solved_session(day(19), at("2026-10-19T10:00:00Z"), at("2026-10-19T10:01:05Z"));
        assert!(store.record_completion(&session, at("2026-10-19T10:01:06Z"), day(19)).unwrap());

        let record = store.record(day(19)).unwrap();
        assert!(record.solved);
        assert_eq!(record.time, 65);
        assert_eq!(record.solved_words, vec!["go".to_string()]);
        assert!(record.author_solved);

        let data = store.user_data();
        assert_eq!(data.stats.total_solved, 1);
        assert_eq!(data.stats.current_streak, 1);
        assert_eq!(data.stats.total_time, 65);
        assert_eq!(data.stats.last_played, Some(day(19)));

        assert!(local.contains(USER_DATA_KEY));
        assert!(remote.contains(USER_DATA_KEY));
        assert!(store.peek_snapshot().is_none());
    }

    #[test]
    fn test_record_completion_only_once_per_date() {
        let (_local, _remote, mut store) = memory_store();
        let t = at("2026-10-19T10:00:00Z");
        let session = solved_session(day(19), t, t);
        assert!(store.record_completion(&session, t, day(19)).unwrap());
        assert!(!store.record_completion(&session, t, day(19)).unwrap());
        assert_eq!(store.user_data().puzzles.len(), 1);
    }

    #[test]
    fn test_past_puzzle_sets_last_played_to_its_date() {
        let (_local, _remote, mut store) = memory_store();
        let t = at("2026-10-19T10:00:00Z");
        let session = solved_session(day(18), t, t);
        assert!(store.record_completion(&session, t, day(19)).unwrap());

        let data = store.user_data();
        assert_eq!(data.stats.last_played, Some(day(18)));
        assert_eq!(data.stats.current_streak, 0);
    }

    #[test]
    fn test_open_prefers_remote_user_data() {
        let local = Rc::new(MemoryStore::new());
        let remote = Rc::new(MemoryStore::new());
        local
            .save(USER_DATA_KEY, r#"{"puzzles":{"2026-10-01":{"solved":true}}}"#)
            .unwrap();
        remote
            .save(USER_DATA_KEY, r#"{"puzzles":{"2026-10-02":{"solved":true}}}"#)
            .unwrap();

        let store = ProgressStore::open(Storage::new(Box::new(local), Some(Box::new(remote))));
        assert!(store.is_solved(day(2)));
        assert!(!store.is_solved(day(1)));
    }

    #[test]
    fn test_corrupt_user_data_opens_empty() {
        let local = MemoryStore::new();
        local.save(USER_DATA_KEY, "{{{").unwrap();
        let store = ProgressStore::open(Storage::local_only(Box::new(local)));
        assert!(store.user_data().puzzles.is_empty());
    }

    #[test]
    fn test_snapshot_is_local_only() {
        let (local, remote, store) = memory_store();
        store.save_snapshot(&snapshot_for(day(18))).unwrap();
        assert!(local.contains(SNAPSHOT_KEY));
        assert!(!remote.contains(SNAPSHOT_KEY));
    }

    #[test]
    fn test_load_snapshot_discards_today_and_stale() {
        let (local, _remote, store) = memory_store();

        store.save_snapshot(&snapshot_for(day(19))).unwrap();
        assert!(store.load_snapshot(day(19), 7).is_none());
        assert!(!local.contains(SNAPSHOT_KEY));

        store.save_snapshot(&snapshot_for(day(10))).unwrap();
        assert!(store.load_snapshot(day(19), 7).is_none());
        assert!(!local.contains(SNAPSHOT_KEY));

        store.save_snapshot(&snapshot_for(day(12))).unwrap();
        assert_eq!(store.load_snapshot(day(19), 7).unwrap().date, day(12));
        assert!(local.contains(SNAPSHOT_KEY));
    }

    #[test]
    fn test_undecodable_snapshot_is_removed() {
        let (local, _remote, store) = memory_store();
        local.save(SNAPSHOT_KEY, "[1,2").unwrap();
        assert!(store.load_snapshot(day(19), 7).is_none());
        assert!(!local.contains(SNAPSHOT_KEY));
    }

    #[test]
    fn test_settings_round_trip_and_defaults() {
        let (_local, remote, store) = memory_store();
        assert_eq!(store.load_settings(), Settings::default());

        let settings = Settings {
            sound_effects_enabled: false,
            background_music_enabled: true,
        };
        store.save_settings(&settings).unwrap();
        assert_eq!(store.load_settings(), settings);
        assert!(!remote.contains(SETTINGS_KEY));
    }
}
