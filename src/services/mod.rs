//! Capabilities the game reaches through instead of globals: rewarded-action
//! gating, analytics, sound, and time. Each has a default implementation that
//! keeps the game fully playable with nothing configured.

use std::io::{self, Write};

use chrono::{DateTime, Local, NaiveDate, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RewardError {
    #[error("no rewarded action available")]
    Unavailable,
    #[error("rewarded action failed: {0}")]
    Failed(String),
}

/// Gate in front of the unscramble assist. `Ok(true)` means the reward was
/// earned.
pub trait RewardedAction {
    fn request(&mut self) -> Result<bool, RewardError>;
}

/// No provider configured: every request is granted.
#[derive(Clone, Copy, Debug, Default)]
pub struct DevelopmentMode;

impl RewardedAction for DevelopmentMode {
    fn request(&mut self) -> Result<bool, RewardError> {
        log::debug!("rewarded action granted in development mode");
        Ok(true)
    }
}

pub mod events {
    pub const UNSCRAMBLE_ATTEMPTED: &str = "unscramble_attempted";
    pub const UNSCRAMBLE_COMPLETED: &str = "unscramble_completed";
    pub const UNSCRAMBLE_NO_AD: &str = "unscramble_no_ad";
    pub const PUZZLE_COMPLETED: &str = "puzzle_completed";
}

/// Fire-and-forget event sink.
pub trait Analytics {
    fn track(&self, event: &str, attributes: serde_json::Value);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LogAnalytics;

impl Analytics for LogAnalytics {
    fn track(&self, event: &str, attributes: serde_json::Value) {
        log::info!(target: "unquote::analytics", "{event} {attributes}");
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    LetterPlaced,
    WordSolved,
    AuthorSolved,
    Mismatch,
    PuzzleComplete,
}

pub trait AudioPlayer {
    fn play(&mut self, cue: SoundCue);

    fn set_music(&mut self, _playing: bool) {}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl AudioPlayer for Silent {
    fn play(&mut self, _cue: SoundCue) {}
}

/// Rings the terminal bell for the cues that matter.
#[derive(Clone, Copy, Debug, Default)]
pub struct Bell;

impl AudioPlayer for Bell {
    fn play(&mut self, cue: SoundCue) {
        if cue == SoundCue::LetterPlaced {
            return;
        }
        let mut out = io::stdout();
        if let Err(e) = out.write_all(b"\x07").and_then(|()| out.flush()) {
            log::debug!("bell failed: {e}");
        }
    }
}

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// The player's calendar date.
    fn today(&self) -> NaiveDate;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Everything the app drives through.
pub struct Services {
    pub rewarded: Box<dyn RewardedAction>,
    pub analytics: Box<dyn Analytics>,
    pub audio: Box<dyn AudioPlayer>,
    pub clock: Box<dyn Clock>,
}

impl Default for Services {
    fn default() -> Self {
        Self {
            rewarded: Box::new(DevelopmentMode),
            analytics: Box::new(LogAnalytics),
            audio: Box::new(Bell),
            clock: Box::new(SystemClock),
        }
    }
}
