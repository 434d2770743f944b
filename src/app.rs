use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use chrono::{Datelike, Days, NaiveDate};
use serde_json::json;

use crate::catalog::Catalog;
use crate::catalog::calendar::{self, CalendarDay};
use crate::config::Config;
use crate::engine::{AssistGate, DisplayStats};
use crate::services::{Services, SoundCue, events};
use crate::session::selector::{self, Origin};
use crate::session::{Advance, AssistStep, InputOutcome, PuzzleSession, TargetKind, share};
use crate::store::ProgressStore;
use crate::store::schema::Settings;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Puzzle,
    Stats,
    Calendar,
}

/// Deferred work fired from `tick`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Continuation {
    AdvanceToNext,
    ClearMismatch,
    AssistStep,
}

#[derive(Clone, Copy, Debug)]
pub struct Scheduled {
    pub due: Instant,
    pub action: Continuation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssistRequest {
    Started,
    /// Still cooling down.
    NotReady(Duration),
    Unavailable,
}

pub struct CalendarState {
    pub year: i32,
    pub month: u32,
    pub cursor: NaiveDate,
}

pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub catalog: Catalog,
    pub progress: ProgressStore,
    pub session: PuzzleSession,
    pub origin: Origin,
    pub gate: AssistGate,
    pub settings: Settings,
    pub calendar: CalendarState,
    pub status: Option<String>,
    pub should_quit: bool,
    pending: Option<Scheduled>,
    services: Services,
}

impl App {
    /// Resolve the opening puzzle and start it. A shared challenge date is
    /// consumed so a later reload cannot trigger it again.
    pub fn open(
        config: Config,
        catalog: Catalog,
        progress: ProgressStore,
        mut services: Services,
        shared: &mut Option<NaiveDate>,
    ) -> Result<Self> {
        let today = services.clock.today();
        let selection = selector::resolve(
            &catalog,
            &progress,
            shared.take(),
            today,
            config.snapshot_max_age_days,
        )
        .ok_or_else(|| anyhow!("catalog has no quotes"))?;
        log::info!("opening {} ({:?})", selection.date(), selection.origin);

        let origin = selection.origin;
        let session = selection.into_session(services.clock.now());
        let settings = progress.load_settings();
        services.audio.set_music(settings.background_music_enabled);

        let cursor = session.date();
        let mut app = Self {
            screen: AppScreen::Puzzle,
            gate: AssistGate::new(config.assist_cooldown()),
            config,
            catalog,
            progress,
            session,
            origin,
            settings,
            calendar: CalendarState {
                year: cursor.year(),
                month: cursor.month(),
                cursor,
            },
            status: None,
            should_quit: false,
            pending: None,
            services,
        };
        app.start_session();
        Ok(app)
    }

    fn start_session(&mut self) {
        if self.session.is_complete() || self.session.active().is_some() {
            return;
        }
        // Nothing is saved until the player does something, so opening a
        // shared or calendar puzzle leaves the previous snapshot in place.
        if self.session.advance_to_next(self.services.clock.now()) == Advance::Completed {
            self.finish_puzzle();
        }
    }

    fn after_advance(&mut self, advance: Advance) {
        match advance {
            Advance::Completed => self.finish_puzzle(),
            Advance::Word(_) | Advance::Author => self.persist_snapshot(),
            Advance::Unchanged => {}
        }
    }

    fn finish_puzzle(&mut self) {
        let now = self.services.clock.now();
        let today = self.services.clock.today();
        match self.progress.record_completion(&self.session, now, today) {
            Ok(true) => {
                let time = self.session.elapsed_secs(now);
                self.services.analytics.track(
                    events::PUZZLE_COMPLETED,
                    json!({
                        "date": self.session.date().to_string(),
                        "time": time,
                        "origin": format!("{:?}", self.origin),
                    }),
                );
                self.play(SoundCue::PuzzleComplete);
                self.status = Some(format!("Solved in {}", format_duration(time)));
            }
            Ok(false) => {}
            Err(e) => log::warn!("failed to save completion: {e:#}"),
        }
    }

    fn persist_snapshot(&self) {
        if self.session.is_complete() || self.session.is_read_only() {
            return;
        }
        let snapshot = self.session.snapshot(self.services.clock.now());
        if let Err(e) = self.progress.save_snapshot(&snapshot) {
            log::warn!("failed to save snapshot: {e:#}");
        }
    }

    fn play(&mut self, cue: SoundCue) {
        if self.settings.sound_effects_enabled {
            self.services.audio.play(cue);
        }
    }

    fn schedule(&mut self, now: Instant, delay: Duration, action: Continuation) {
        self.pending = Some(Scheduled {
            due: now + delay,
            action,
        });
    }

    pub fn pending(&self) -> Option<Scheduled> {
        self.pending
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some() || self.session.is_busy()
    }

    pub fn press_slot(&mut self, slot: usize, now: Instant) {
        if self.is_busy() {
            return;
        }
        let outcome = self.session.input_letter(slot);
        self.handle_outcome(outcome, now);
    }

    pub fn type_char(&mut self, ch: char, now: Instant) {
        if self.is_busy() {
            return;
        }
        let outcome = self.session.type_char(ch);
        self.handle_outcome(outcome, now);
    }

    fn handle_outcome(&mut self, outcome: InputOutcome, now: Instant) {
        match outcome {
            InputOutcome::Ignored => {}
            InputOutcome::Accepted => {
                self.play(SoundCue::LetterPlaced);
                self.persist_snapshot();
            }
            InputOutcome::Solved(kind) => self.on_solved(kind, now),
            InputOutcome::Mismatch => {
                self.play(SoundCue::Mismatch);
                let delay = self.config.mismatch_delay();
                self.schedule(now, delay, Continuation::ClearMismatch);
            }
        }
    }

    fn on_solved(&mut self, kind: TargetKind, now: Instant) {
        self.play(match kind {
            TargetKind::Word(_) => SoundCue::WordSolved,
            TargetKind::Author => SoundCue::AuthorSolved,
        });
        self.persist_snapshot();
        let delay = self.config.reveal_delay();
        self.schedule(now, delay, Continuation::AdvanceToNext);
    }

    pub fn backspace(&mut self) {
        if !self.is_busy() && self.session.backspace() {
            self.persist_snapshot();
        }
    }

    pub fn reset(&mut self) {
        if !self.is_busy() && self.session.reset() {
            self.persist_snapshot();
        }
    }

    pub fn select_target(&mut self, kind: TargetKind) -> bool {
        if self.is_busy() || !self.session.activate(kind) {
            return false;
        }
        self.persist_snapshot();
        true
    }

    /// Move to the next (or previous) unsolved target, wrapping around.
    pub fn cycle_target(&mut self, forward: bool) -> bool {
        let targets = self.unsolved_targets();
        if targets.is_empty() {
            return false;
        }
        let current = self
            .session
            .active()
            .and_then(|t| targets.iter().position(|&k| k == t.kind));
        let len = targets.len();
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, true) => 0,
            (None, false) => len - 1,
        };
        self.select_target(targets[next])
    }

    fn unsolved_targets(&self) -> Vec<TargetKind> {
        let mut targets: Vec<TargetKind> = self
            .session
            .quote()
            .scrambled_words
            .iter()
            .enumerate()
            .filter(|(_, w)| !self.session.is_word_solved(w))
            .map(|(i, _)| TargetKind::Word(i))
            .collect();
        if !self.session.author_solved() {
            targets.push(TargetKind::Author);
        }
        targets
    }

    /// Run the gated auto-solve on the active target.
    pub fn assist(&mut self, now: Instant) -> AssistRequest {
        let Some(target) = self.session.active() else {
            return AssistRequest::Unavailable;
        };
        if self.is_busy() {
            return AssistRequest::Unavailable;
        }
        let remaining = self.gate.poll(now);
        if !remaining.is_zero() {
            self.status = Some(format!("Assist ready in {}s", remaining.as_secs() + 1));
            return AssistRequest::NotReady(remaining);
        }

        let attributes = json!({
            "date": self.session.date().to_string(),
            "word": target.original,
            "isAuthor": target.is_author(),
        });
        self.services
            .analytics
            .track(events::UNSCRAMBLE_ATTEMPTED, attributes.clone());

        // The assist goes ahead however the rewarded action resolves; only
        // the tracked event differs.
        match self.services.rewarded.request() {
            Ok(true) => self
                .services
                .analytics
                .track(events::UNSCRAMBLE_COMPLETED, attributes),
            outcome => {
                let error = match outcome {
                    Err(e) => e.to_string(),
                    _ => "rewarded action not completed".to_string(),
                };
                log::info!("assist without reward: {error}");
                let mut attributes = attributes;
                attributes["error"] = json!(error);
                self.services
                    .analytics
                    .track(events::UNSCRAMBLE_NO_AD, attributes);
            }
        }

        if !self.session.begin_assist() {
            return AssistRequest::Unavailable;
        }
        self.gate.start(now);
        self.status = None;
        let delay = self.config.assist_letter_delay();
        self.schedule(now, delay, Continuation::AssistStep);
        AssistRequest::Started
    }

    /// Periodic driver: runs the cooldown and every continuation that is due.
    pub fn tick(&mut self, now: Instant) {
        self.gate.poll(now);
        while let Some(scheduled) = self.pending {
            if scheduled.due > now {
                break;
            }
            self.pending = None;
            self.run(scheduled.action, now);
        }
    }

    fn run(&mut self, action: Continuation, now: Instant) {
        match action {
            Continuation::AdvanceToNext => {
                let advance = self.session.advance_to_next(self.services.clock.now());
                self.after_advance(advance);
            }
            Continuation::ClearMismatch => {
                if self.session.clear_mismatch() {
                    self.persist_snapshot();
                }
            }
            Continuation::AssistStep => self.run_assist_step(now),
        }
    }

    fn run_assist_step(&mut self, now: Instant) {
        let delay = self.config.assist_letter_delay();
        match self.session.assist_step() {
            AssistStep::Revealed { .. } => {
                self.play(SoundCue::LetterPlaced);
                self.schedule(now, delay, Continuation::AssistStep);
            }
            AssistStep::Retry => self.schedule(now, delay, Continuation::AssistStep),
            AssistStep::Solved(kind) => self.on_solved(kind, now),
            AssistStep::GaveUp => self.persist_snapshot(),
            AssistStep::Idle => {}
        }
    }

    /// Open a past or present date from the calendar.
    pub fn select_date(&mut self, date: NaiveDate) -> bool {
        let today = self.services.clock.today();
        if date > today || !self.catalog.contains(date) || self.is_busy() {
            return false;
        }
        let snapshot = self.progress.peek_snapshot();
        let Some(selection) = selector::for_date(
            &self.catalog,
            &self.progress,
            date,
            snapshot.as_ref(),
            Origin::Calendar,
        ) else {
            return false;
        };

        log::info!("switching to {date}");
        self.origin = selection.origin;
        self.session = selection.into_session(self.services.clock.now());
        self.status = None;
        self.screen = AppScreen::Puzzle;
        self.start_session();
        true
    }

    pub fn display_stats(&self) -> DisplayStats {
        self.progress.display_stats(self.services.clock.today())
    }

    pub fn today(&self) -> NaiveDate {
        self.services.clock.today()
    }

    pub fn month_view(&self) -> Vec<CalendarDay> {
        let today = self.services.clock.today();
        self.catalog.month_view(self.calendar.year, self.calendar.month, today, |d| {
            self.progress.is_solved(d)
        })
    }

    pub fn go_to_calendar(&mut self) {
        let date = self.session.date();
        self.calendar = CalendarState {
            year: date.year(),
            month: date.month(),
            cursor: date,
        };
        self.screen = AppScreen::Calendar;
    }

    pub fn go_to_stats(&mut self) {
        self.screen = AppScreen::Stats;
    }

    pub fn go_to_puzzle(&mut self) {
        self.screen = AppScreen::Puzzle;
    }

    pub fn calendar_shift_month(&mut self, delta: i32) {
        let (year, month) = calendar::shift_month(self.calendar.year, self.calendar.month, delta);
        self.calendar.year = year;
        self.calendar.month = month;
        if let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) {
            self.calendar.cursor = first;
        }
    }

    pub fn calendar_move(&mut self, days: i64) {
        let cursor = self.calendar.cursor;
        let moved = if days >= 0 {
            cursor.checked_add_days(Days::new(days as u64))
        } else {
            cursor.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        if let Some(moved) = moved {
            self.calendar.cursor = moved;
            self.calendar.year = moved.year();
            self.calendar.month = moved.month();
        }
    }

    pub fn toggle_sound(&mut self) {
        self.settings.sound_effects_enabled = !self.settings.sound_effects_enabled;
        self.save_settings();
    }

    pub fn toggle_music(&mut self) {
        self.settings.background_music_enabled = !self.settings.background_music_enabled;
        self.services
            .audio
            .set_music(self.settings.background_music_enabled);
        self.save_settings();
    }

    fn save_settings(&self) {
        if let Err(e) = self.progress.save_settings(&self.settings) {
            log::warn!("failed to save settings: {e:#}");
        }
    }

    /// Teaser plus challenge link for the current puzzle, when sharing is on.
    pub fn share_message(&self) -> Option<String> {
        let base = self.config.share_base()?;
        Some(share::share_message(base, self.session.date()))
    }

    pub fn share(&mut self) {
        self.status = match self.share_message() {
            Some(message) => {
                log::info!("share message built for {}", self.session.date());
                Some(message.replace("\n\n", " "))
            }
            None => Some("Sharing is turned off".to_string()),
        };
    }

    pub fn assist_remaining(&self, now: Instant) -> Duration {
        self.gate.remaining(now)
    }
}

pub fn format_duration(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
