use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::catalog::{Quote, ScrambledWord, scramble};
use crate::session::target::{Target, TargetKind};
use crate::store::schema::{PuzzleRecord, SessionSnapshot};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No target selected.
    Idle,
    /// A target is selected and accepting letters.
    Active,
    /// The active target was just solved; waiting for `advance_to_next`.
    Solved,
    /// The input filled up and was wrong; waiting for `clear_mismatch`.
    Mismatched,
    Complete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    Ignored,
    Accepted,
    Solved(TargetKind),
    Mismatch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    Word(usize),
    Author,
    /// Returned once, on the transition into `Phase::Complete`.
    Completed,
    Unchanged,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssistStep {
    /// No assist is running.
    Idle,
    Revealed { slot: usize },
    /// Input was cleared and the reveal starts over.
    Retry,
    Solved(TargetKind),
    /// Attempt budget spent; input cleared and the target left active.
    GaveUp,
}

#[derive(Clone, Copy, Debug)]
struct AssistRun {
    letter_index: usize,
    attempts: usize,
    max_attempts: usize,
}

/// One attempt at one day's quote.
///
/// Every transition happens immediately; pacing (reveal and mismatch delays,
/// assist letter timing) belongs to whoever drives the session.
#[derive(Clone, Debug)]
pub struct PuzzleSession {
    quote: Quote,
    solved_words: BTreeSet<String>,
    author_solved: bool,
    active: Option<Target>,
    input: Vec<char>,
    used_slots: Vec<usize>,
    phase: Phase,
    assist: Option<AssistRun>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    read_only: bool,
}

impl PuzzleSession {
    pub fn new(quote: Quote, now: DateTime<Utc>) -> Self {
        Self {
            quote,
            solved_words: BTreeSet::new(),
            author_solved: false,
            active: None,
            input: Vec::new(),
            used_slots: Vec::new(),
            phase: Phase::Idle,
            assist: None,
            started_at: now,
            completed_at: None,
            read_only: false,
        }
    }

    /// View-only session for a date that is already solved.
    pub fn completed(quote: Quote, record: &PuzzleRecord) -> Self {
        let completed_at = record
            .completed_at
            .unwrap_or_else(|| quote.date.and_time(NaiveTime::MIN).and_utc());
        let mut session = Self::new(quote, completed_at);
        session.solved_words = record.solved_words.iter().cloned().collect();
        session.author_solved = record.author_solved;
        session.phase = Phase::Complete;
        session.completed_at = Some(completed_at);
        session.read_only = true;
        session
    }

    /// Rebuild a session from a snapshot. Saved input is only kept when it is
    /// still consistent with the saved target's letters.
    pub fn restore(quote: Quote, snapshot: &SessionSnapshot, now: DateTime<Utc>) -> Self {
        let mut session = Self::new(quote, now);
        session.solved_words = snapshot.solved_words.iter().cloned().collect();
        session.author_solved = snapshot.author_solved;

        let Some(active_word) = snapshot.active_word.as_deref() else {
            return session;
        };

        let author = scramble::clean_author(&session.quote.author);
        let kind = if active_word == author && !session.author_solved {
            Some(TargetKind::Author)
        } else {
            session
                .position_of_unsolved(|w| w.original.to_lowercase() == active_word)
                .or_else(|| session.position_of_unsolved(|_| true))
                .map(TargetKind::Word)
        };

        if let Some(kind) = kind
            && session.activate(kind)
            && session.active.as_ref().map(|t| &t.original).map(String::as_str) == Some(active_word)
        {
            session.restore_input(&snapshot.user_input, &snapshot.used_letters);
        }
        session
    }

    fn restore_input(&mut self, user_input: &str, used_letters: &[usize]) {
        let Some(target) = &self.active else {
            return;
        };
        let typed: Vec<char> = user_input.chars().collect();
        let unique: BTreeSet<usize> = used_letters.iter().copied().collect();
        let consistent = typed.len() == used_letters.len()
            && unique.len() == used_letters.len()
            && typed.len() < target.comparison_len()
            && used_letters.iter().zip(&typed).all(|(&slot, &ch)| {
                target
                    .letters
                    .get(slot)
                    .is_some_and(|l| l.to_lowercase().eq(ch.to_lowercase()))
            });

        if consistent {
            self.input = typed;
            self.used_slots = used_letters.to_vec();
        } else {
            log::debug!("discarding inconsistent saved input for {}", target.original);
        }
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> SessionSnapshot {
        SessionSnapshot {
            date: self.quote.date,
            solved_words: self.solved_words.iter().cloned().collect(),
            author_solved: self.author_solved,
            game_complete: self.phase == Phase::Complete,
            active_word: self.active.as_ref().map(|t| t.original.clone()),
            user_input: self.input.iter().collect(),
            used_letters: self.used_slots.clone(),
            timestamp: now.timestamp_millis(),
        }
    }

    pub fn quote(&self) -> &Quote {
        &self.quote
    }

    pub fn date(&self) -> NaiveDate {
        self.quote.date
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn active(&self) -> Option<&Target> {
        self.active.as_ref()
    }

    pub fn input(&self) -> String {
        self.input.iter().collect()
    }

    pub fn input_len(&self) -> usize {
        self.input.len()
    }

    pub fn used_slots(&self) -> &[usize] {
        &self.used_slots
    }

    pub fn is_slot_used(&self, slot: usize) -> bool {
        self.used_slots.contains(&slot)
    }

    pub fn solved_words(&self) -> &BTreeSet<String> {
        &self.solved_words
    }

    pub fn is_word_solved(&self, word: &ScrambledWord) -> bool {
        self.solved_words.contains(&word.original)
    }

    pub fn author_solved(&self) -> bool {
        self.author_solved
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// True for sessions opened from a stored completion.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn is_assisting(&self) -> bool {
        self.assist.is_some()
    }

    /// Mid-transition or mid-assist: user input is rejected.
    pub fn is_busy(&self) -> bool {
        self.assist.is_some() || matches!(self.phase, Phase::Solved | Phase::Mismatched)
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        let end = self.completed_at.unwrap_or(now);
        end.signed_duration_since(self.started_at).num_seconds().max(0) as u64
    }

    /// Every scrambled word and the author are solved.
    pub fn all_solved(&self) -> bool {
        self.author_solved
            && self
                .quote
                .scrambled_words
                .iter()
                .all(|w| self.solved_words.contains(&w.original))
    }

    /// Solved targets over total targets (words plus the author).
    pub fn progress(&self) -> f64 {
        let total = self.quote.scrambled_words.len() + 1;
        let solved = self
            .quote
            .scrambled_words
            .iter()
            .filter(|w| self.solved_words.contains(&w.original))
            .count()
            + usize::from(self.author_solved);
        solved as f64 / total as f64
    }

    fn position_of_unsolved(&self, pred: impl Fn(&ScrambledWord) -> bool) -> Option<usize> {
        self.quote
            .scrambled_words
            .iter()
            .position(|w| !self.solved_words.contains(&w.original) && pred(w))
    }

    pub fn activate(&mut self, kind: TargetKind) -> bool {
        if self.assist.is_some() || !matches!(self.phase, Phase::Idle | Phase::Active) {
            return false;
        }

        let target = match kind {
            TargetKind::Word(position) => {
                let Some(word) = self.quote.scrambled_words.get(position) else {
                    return false;
                };
                if self.solved_words.contains(&word.original) {
                    return false;
                }
                Target::word(position, word)
            }
            TargetKind::Author => {
                if self.author_solved {
                    return false;
                }
                Target::author(&self.quote)
            }
        };

        self.active = Some(target);
        self.input.clear();
        self.used_slots.clear();
        self.phase = Phase::Active;
        true
    }

    pub fn input_letter(&mut self, slot: usize) -> InputOutcome {
        if self.assist.is_some() || self.phase != Phase::Active {
            return InputOutcome::Ignored;
        }
        let Some(target) = &self.active else {
            return InputOutcome::Ignored;
        };
        let Some(&letter) = target.letters.get(slot) else {
            return InputOutcome::Ignored;
        };
        if self.used_slots.contains(&slot) {
            return InputOutcome::Ignored;
        }
        let needed = target.comparison_len();

        self.input.push(letter);
        self.used_slots.push(slot);

        if self.input.len() < needed {
            InputOutcome::Accepted
        } else {
            self.verify_full()
        }
    }

    /// Keyboard path: place the first unused tile showing `ch`.
    pub fn type_char(&mut self, ch: char) -> InputOutcome {
        let slot = self.active.as_ref().and_then(|target| {
            (0..target.letters.len()).find(|&i| {
                !self.used_slots.contains(&i) && target.letters[i].to_lowercase().eq(ch.to_lowercase())
            })
        });
        match slot {
            Some(slot) => self.input_letter(slot),
            None => InputOutcome::Ignored,
        }
    }

    fn verify_full(&mut self) -> InputOutcome {
        let Some(target) = &self.active else {
            return InputOutcome::Ignored;
        };
        let kind = target.kind;
        let typed: String = self.input.iter().collect();
        if target.matches(&typed) {
            self.mark_solved(kind);
            InputOutcome::Solved(kind)
        } else {
            self.phase = Phase::Mismatched;
            InputOutcome::Mismatch
        }
    }

    fn mark_solved(&mut self, kind: TargetKind) {
        match kind {
            TargetKind::Word(position) => {
                if let Some(word) = self.quote.scrambled_words.get(position) {
                    self.solved_words.insert(word.original.clone());
                }
            }
            TargetKind::Author => self.author_solved = true,
        }
        self.phase = Phase::Solved;
    }

    /// Return the letters of a wrong guess to the tray; the target stays active.
    pub fn clear_mismatch(&mut self) -> bool {
        if self.phase != Phase::Mismatched {
            return false;
        }
        self.input.clear();
        self.used_slots.clear();
        self.phase = Phase::Active;
        true
    }

    pub fn backspace(&mut self) -> bool {
        if self.assist.is_some() || self.phase != Phase::Active || self.input.is_empty() {
            return false;
        }
        self.input.pop();
        self.used_slots.pop();
        true
    }

    pub fn reset(&mut self) -> bool {
        if self.assist.is_some() || self.phase != Phase::Active {
            return false;
        }
        self.input.clear();
        self.used_slots.clear();
        true
    }

    /// Move to the first unsolved word in quote order, then the author, then
    /// completion.
    pub fn advance_to_next(&mut self, now: DateTime<Utc>) -> Advance {
        if self.assist.is_some() || matches!(self.phase, Phase::Complete | Phase::Mismatched) {
            return Advance::Unchanged;
        }

        self.active = None;
        self.input.clear();
        self.used_slots.clear();
        self.phase = Phase::Idle;

        if let Some(position) = self.position_of_unsolved(|_| true) {
            self.activate(TargetKind::Word(position));
            return Advance::Word(position);
        }
        if !self.author_solved {
            self.activate(TargetKind::Author);
            return Advance::Author;
        }

        self.phase = Phase::Complete;
        self.completed_at = Some(now);
        Advance::Completed
    }

    /// Start the auto-solve reveal for the active target. Cooldown and the
    /// rewarded action are the caller's business.
    pub fn begin_assist(&mut self) -> bool {
        if self.assist.is_some() || self.phase != Phase::Active {
            return false;
        }
        let Some(target) = &self.active else {
            return false;
        };
        self.assist = Some(AssistRun {
            letter_index: 0,
            attempts: 0,
            max_attempts: target.comparison_len() * 2,
        });
        self.input.clear();
        self.used_slots.clear();
        true
    }

    /// Reveal the next letter of the running assist, left to right.
    pub fn assist_step(&mut self) -> AssistStep {
        let Some(mut run) = self.assist.take() else {
            return AssistStep::Idle;
        };
        let Some(target) = self.active.clone() else {
            return AssistStep::Idle;
        };
        let answer = target.answer();

        if run.letter_index >= answer.len() {
            let typed: String = self.input.iter().collect();
            if target.matches(&typed) {
                self.mark_solved(target.kind);
                return AssistStep::Solved(target.kind);
            }
            self.input.clear();
            self.used_slots.clear();
            run.letter_index = 0;
            run.attempts += 1;
            if run.attempts < run.max_attempts {
                self.assist = Some(run);
                return AssistStep::Retry;
            }
            return self.give_up_assist(&target);
        }

        run.attempts += 1;
        if run.attempts > run.max_attempts {
            return self.give_up_assist(&target);
        }

        let wanted = answer[run.letter_index];
        let free = |i: &usize| !self.used_slots.contains(i);
        let slot = (0..target.letters.len())
            .filter(free)
            .find(|&i| target.letters[i].to_lowercase().eq(wanted.to_lowercase()))
            .or_else(|| (0..target.letters.len()).find(free));

        match slot {
            Some(slot) => {
                self.input.push(target.letters[slot]);
                self.used_slots.push(slot);
                run.letter_index += 1;
                self.assist = Some(run);
                AssistStep::Revealed { slot }
            }
            None => {
                self.input.clear();
                self.used_slots.clear();
                run.letter_index = 0;
                self.assist = Some(run);
                AssistStep::Retry
            }
        }
    }

    fn give_up_assist(&mut self, target: &Target) -> AssistStep {
        log::info!("assist gave up on {}", target.original);
        self.input.clear();
        self.used_slots.clear();
        self.assist = None;
        AssistStep::GaveUp
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-10-19T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn word(index: usize, original: &str, scrambled: &str) -> ScrambledWord {
        ScrambledWord {
            index,
            original: original.to_string(),
            scrambled: scrambled.to_string(),
        }
    }

    fn wilde() -> Quote {
        Quote {
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            text: "be yourself".to_string(),
            author: "Oscar Wilde".to_string(),
            scrambled_words: vec![word(0, "be", "eb"), word(1, "yourself", "fselfruoy")],
            scrambled_author: "racos edliw".to_string(),
        }
    }

    fn started() -> PuzzleSession {
        let mut session = PuzzleSession::new(wilde(), now());
        assert_eq!(session.advance_to_next(now()), Advance::Word(0));
        session
    }

    fn press(session: &mut PuzzleSession, slots: &[usize]) -> InputOutcome {
        let mut last = InputOutcome::Ignored;
        for &slot in slots {
            last = session.input_letter(slot);
        }
        last
    }

    // "eb": e0 b1
    const BE: [usize; 2] = [1, 0];
    // "fselfruoy": f0 s1 e2 l3 f4 r5 u6 o7 y8
    const YOURSELF: [usize; 8] = [8, 7, 6, 5, 1, 2, 3, 0];
    // "racosedliw": r0 a1 c2 o3 s4 e5 d6 l7 i8 w9
    const OSCAR_WILDE: [usize; 10] = [3, 4, 2, 1, 0, 9, 8, 7, 6, 5];

    #[test]
    fn test_full_solve_reaches_complete() {
        let mut session = started();

        assert_eq!(press(&mut session, &BE), InputOutcome::Solved(TargetKind::Word(0)));
        assert_eq!(session.phase(), Phase::Solved);
        assert_eq!(session.advance_to_next(now()), Advance::Word(1));

        assert_eq!(press(&mut session, &YOURSELF), InputOutcome::Solved(TargetKind::Word(1)));
        assert_eq!(session.advance_to_next(now()), Advance::Author);
        assert_eq!(session.active().unwrap().word_structure, vec![5, 5]);

        assert_eq!(press(&mut session, &OSCAR_WILDE), InputOutcome::Solved(TargetKind::Author));
        assert!(session.author_solved());
        assert!(session.all_solved());
        assert_eq!(session.advance_to_next(now()), Advance::Completed);
        assert!(session.is_complete());
        assert!(session.active().is_none());

        // Completion is reported once.
        assert_eq!(session.advance_to_next(now()), Advance::Unchanged);
    }

    #[test]
    fn test_mismatch_clears_but_keeps_target() {
        let mut session = started();
        assert_eq!(press(&mut session, &[0]), InputOutcome::Accepted);
        assert_eq!(press(&mut session, &[1]), InputOutcome::Mismatch);
        assert_eq!(session.phase(), Phase::Mismatched);
        assert!(session.is_busy());

        // Input during the pending reset is rejected.
        assert!(!session.backspace());
        assert_eq!(session.input_letter(0), InputOutcome::Ignored);

        assert!(session.clear_mismatch());
        assert_eq!(session.phase(), Phase::Active);
        assert_eq!(session.input(), "");
        assert!(session.used_slots().is_empty());
        assert_eq!(session.active().unwrap().kind, TargetKind::Word(0));
    }

    #[test]
    fn test_used_slot_and_out_of_range_ignored() {
        let mut session = started();
        assert_eq!(session.input_letter(0), InputOutcome::Accepted);
        assert_eq!(session.input_letter(0), InputOutcome::Ignored);
        assert_eq!(session.input_letter(7), InputOutcome::Ignored);
        assert_eq!(session.input(), "e");
    }

    #[test]
    fn test_no_active_target_ignores_input() {
        let mut session = PuzzleSession::new(wilde(), now());
        assert_eq!(session.input_letter(0), InputOutcome::Ignored);
        assert!(!session.backspace());
        assert!(!session.reset());
    }

    #[test]
    fn test_backspace_frees_last_slot() {
        let mut session = started();
        assert!(session.activate(TargetKind::Word(1)));
        press(&mut session, &[8, 7, 6]);
        assert!(session.backspace());
        assert_eq!(session.input(), "yo");
        assert_eq!(session.used_slots(), &[8, 7]);
        assert!(!session.is_slot_used(6));
    }

    #[test]
    fn test_reset_clears_input() {
        let mut session = started();
        assert!(session.activate(TargetKind::Word(1)));
        press(&mut session, &[8, 7]);
        assert!(session.reset());
        assert_eq!(session.input_len(), 0);
        assert!(session.used_slots().is_empty());
    }

    #[test]
    fn test_activate_solved_target_is_noop() {
        let mut session = started();
        press(&mut session, &BE);
        session.advance_to_next(now());
        assert!(!session.activate(TargetKind::Word(0)));
        assert_eq!(session.active().unwrap().kind, TargetKind::Word(1));
    }

    #[test]
    fn test_activate_switches_and_clears_input() {
        let mut session = started();
        press(&mut session, &[1]);
        assert!(session.activate(TargetKind::Author));
        assert_eq!(session.input(), "");
        assert_eq!(session.active().unwrap().letters.len(), 10);
    }

    #[test]
    fn test_type_char_uses_first_free_matching_tile() {
        let mut session = started();
        assert!(session.activate(TargetKind::Word(1)));
        assert_eq!(session.type_char('F'), InputOutcome::Accepted);
        assert_eq!(session.used_slots(), &[0]);
        assert_eq!(session.type_char('f'), InputOutcome::Accepted);
        assert_eq!(session.used_slots(), &[0, 4]);
        assert_eq!(session.type_char('f'), InputOutcome::Ignored);
        assert_eq!(session.type_char('z'), InputOutcome::Ignored);
    }

    #[test]
    fn test_duplicate_words_solve_together() {
        let quote = Quote {
            date: NaiveDate::from_ymd_opt(2026, 10, 2).unwrap(),
            text: "stay hungry stay".to_string(),
            author: "Jobs".to_string(),
            scrambled_words: vec![
                word(0, "stay", "ytas"),
                word(1, "hungry", "yrgnuh"),
                word(2, "stay", "tasy"),
            ],
            scrambled_author: "bjso".to_string(),
        };
        let mut session = PuzzleSession::new(quote, now());
        session.advance_to_next(now());
        for ch in "stay".chars() {
            session.type_char(ch);
        }
        assert_eq!(session.phase(), Phase::Solved);
        // The second "stay" is skipped because it shares the solved entry.
        assert_eq!(session.advance_to_next(now()), Advance::Word(1));
        assert!(!session.activate(TargetKind::Word(2)));
    }

    #[test]
    fn test_input_invariants_hold_under_random_presses() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..200 {
            let mut session = started();
            let kind = if rng.gen_bool(0.5) {
                TargetKind::Word(1)
            } else {
                TargetKind::Author
            };
            session.activate(kind);
            for _ in 0..40 {
                if rng.gen_bool(0.3) {
                    session.backspace();
                } else {
                    session.input_letter(rng.gen_range(0..12));
                }
                if session.phase() == Phase::Mismatched {
                    session.clear_mismatch();
                }

                let limit = session
                    .active()
                    .map(|t| t.comparison_len())
                    .unwrap_or(0);
                assert!(session.input_len() <= limit);
                assert_eq!(session.used_slots().len(), session.input_len());
                let unique: HashSet<_> = session.used_slots().iter().collect();
                assert_eq!(unique.len(), session.used_slots().len());
                if session.phase() == Phase::Solved {
                    break;
                }
            }
        }
    }

    #[test]
    fn test_assist_reveals_in_answer_order() {
        let mut session = started();
        session.activate(TargetKind::Word(1));
        assert!(session.begin_assist());
        assert!(session.is_busy());

        let mut revealed = Vec::new();
        loop {
            match session.assist_step() {
                AssistStep::Revealed { slot } => revealed.push(slot),
                AssistStep::Solved(kind) => {
                    assert_eq!(kind, TargetKind::Word(1));
                    break;
                }
                other => panic!("unexpected step {other:?}"),
            }
        }
        assert_eq!(revealed, YOURSELF.to_vec());
        assert!(!session.is_assisting());
        assert_eq!(session.phase(), Phase::Solved);
    }

    #[test]
    fn test_assist_blocks_manual_input() {
        let mut session = started();
        session.begin_assist();
        assert_eq!(session.input_letter(0), InputOutcome::Ignored);
        assert!(!session.reset());
        assert!(!session.activate(TargetKind::Author));
        assert!(!session.begin_assist());
    }

    #[test]
    fn test_assist_gives_up_on_unsolvable_scramble() {
        // Scramble lacks the letters of its original, so the reveal can never match.
        let quote = Quote {
            date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            text: "ab".to_string(),
            author: "Cd".to_string(),
            scrambled_words: vec![word(0, "ab", "xy")],
            scrambled_author: "dc".to_string(),
        };
        let mut session = PuzzleSession::new(quote, now());
        session.advance_to_next(now());
        session.begin_assist();

        let mut steps = 0;
        let last = loop {
            let step = session.assist_step();
            steps += 1;
            assert!(steps < 100, "assist must be bounded");
            if matches!(step, AssistStep::GaveUp | AssistStep::Solved(_)) {
                break step;
            }
        };
        assert_eq!(last, AssistStep::GaveUp);
        assert_eq!(session.phase(), Phase::Active);
        assert_eq!(session.input(), "");
        assert_eq!(session.assist_step(), AssistStep::Idle);
    }

    #[test]
    fn test_snapshot_round_trip_keeps_progress() {
        let mut session = started();
        press(&mut session, &BE);
        session.advance_to_next(now());
        press(&mut session, &[8, 7]);

        let snapshot = session.snapshot(now());
        assert_eq!(snapshot.active_word.as_deref(), Some("yourself"));
        assert_eq!(snapshot.user_input, "yo");

        let restored = PuzzleSession::restore(wilde(), &snapshot, now());
        assert!(restored.solved_words().contains("be"));
        assert_eq!(restored.active().unwrap().kind, TargetKind::Word(1));
        assert_eq!(restored.input(), "yo");
        assert_eq!(restored.used_slots(), &[8, 7]);
    }

    #[test]
    fn test_restore_drops_inconsistent_input() {
        let mut snapshot = started().snapshot(now());
        snapshot.user_input = "zz".to_string();
        snapshot.used_letters = vec![0, 0];

        let restored = PuzzleSession::restore(wilde(), &snapshot, now());
        assert_eq!(restored.active().unwrap().kind, TargetKind::Word(0));
        assert_eq!(restored.input(), "");
    }

    #[test]
    fn test_restore_author_target() {
        let mut snapshot = started().snapshot(now());
        snapshot.solved_words = vec!["be".to_string(), "yourself".to_string()];
        snapshot.active_word = Some("oscar wilde".to_string());
        snapshot.user_input = "os".to_string();
        snapshot.used_letters = vec![3, 4];

        let restored = PuzzleSession::restore(wilde(), &snapshot, now());
        assert_eq!(restored.active().unwrap().kind, TargetKind::Author);
        assert_eq!(restored.input(), "os");
    }

    #[test]
    fn test_restore_unknown_active_word_falls_back() {
        let mut snapshot = started().snapshot(now());
        snapshot.solved_words = vec!["be".to_string()];
        snapshot.active_word = Some("gone".to_string());

        let restored = PuzzleSession::restore(wilde(), &snapshot, now());
        assert_eq!(restored.active().unwrap().kind, TargetKind::Word(1));
    }

    #[test]
    fn test_completed_view_is_read_only() {
        let record = PuzzleRecord {
            solved: true,
            time: 30,
            solved_words: vec!["be".to_string(), "yourself".to_string()],
            author_solved: true,
            completed_at: Some(now()),
        };
        let mut session = PuzzleSession::completed(wilde(), &record);
        assert!(session.is_complete());
        assert!(session.is_read_only());
        assert!(!session.activate(TargetKind::Word(0)));
        assert_eq!(session.advance_to_next(now()), Advance::Unchanged);
        assert_eq!(session.progress(), 1.0);
    }

    #[test]
    fn test_elapsed_secs_freezes_on_completion() {
        let mut session = started();
        press(&mut session, &BE);
        session.advance_to_next(now());
        press(&mut session, &YOURSELF);
        session.advance_to_next(now());
        press(&mut session, &OSCAR_WILDE);
        let done = now() + chrono::Duration::seconds(95);
        session.advance_to_next(done);
        assert_eq!(session.elapsed_secs(done + chrono::Duration::seconds(500)), 95);
    }
}
