use chrono::{DateTime, NaiveDate, Utc};

use crate::catalog::{Catalog, Quote};
use crate::session::puzzle::PuzzleSession;
use crate::store::ProgressStore;
use crate::store::schema::{PuzzleRecord, SessionSnapshot};

/// Why a quote was chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    SharedChallenge,
    SavedSession,
    Today,
    /// No quote for today; the catalog's first entry.
    Fallback,
    Calendar,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Resume {
    Fresh,
    Restored(SessionSnapshot),
    Completed(PuzzleRecord),
}

#[derive(Clone, Debug)]
pub struct Selection {
    pub quote: Quote,
    pub origin: Origin,
    pub resume: Resume,
}

impl Selection {
    pub fn date(&self) -> NaiveDate {
        self.quote.date
    }

    pub fn into_session(self, now: DateTime<Utc>) -> PuzzleSession {
        match &self.resume {
            Resume::Fresh => PuzzleSession::new(self.quote, now),
            Resume::Restored(snapshot) => PuzzleSession::restore(self.quote, snapshot, now),
            Resume::Completed(record) => PuzzleSession::completed(self.quote, record),
        }
    }
}

/// Decide which puzzle to open.
///
/// A shared date present in the catalog wins and only peeks at the saved
/// snapshot. Otherwise a resumable snapshot wins, then today's quote, then
/// the first catalog entry.
pub fn resolve(
    catalog: &Catalog,
    progress: &ProgressStore,
    shared: Option<NaiveDate>,
    today: NaiveDate,
    max_age_days: i64,
) -> Option<Selection> {
    if let Some(date) = shared {
        if catalog.contains(date) {
            let snapshot = progress.peek_snapshot();
            return for_date(catalog, progress, date, snapshot.as_ref(), Origin::SharedChallenge);
        }
        log::info!("shared challenge {date} is not in the catalog, ignoring");
    }

    if let Some(snapshot) = progress.load_snapshot(today, max_age_days)
        && catalog.contains(snapshot.date)
    {
        return for_date(catalog, progress, snapshot.date, Some(&snapshot), Origin::SavedSession);
    }

    if catalog.contains(today) {
        return for_date(catalog, progress, today, None, Origin::Today);
    }

    let first = catalog.first()?;
    log::info!("no quote for {today}, falling back to {}", first.date);
    for_date(catalog, progress, first.date, None, Origin::Fallback)
}

/// Resolution for one date: the stored completion if solved, the snapshot if
/// it belongs to this date, otherwise a fresh start.
pub fn for_date(
    catalog: &Catalog,
    progress: &ProgressStore,
    date: NaiveDate,
    snapshot: Option<&SessionSnapshot>,
    origin: Origin,
) -> Option<Selection> {
    let quote = catalog.get(date)?.clone();
    let resume = match progress.record(date) {
        Some(record) if record.solved => Resume::Completed(record.clone()),
        _ => match snapshot {
            Some(snapshot) if snapshot.date == date => Resume::Restored(snapshot.clone()),
            _ => Resume::Fresh,
        },
    };
    Some(Selection {
        quote,
        origin,
        resume,
    })
}
