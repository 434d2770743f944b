use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};

use crate::store::schema::{PuzzleRecord, UserData};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DisplayStats {
    pub total_played: usize,
    /// Whole percent, 0 when nothing has been played.
    pub win_rate: u32,
    pub current_streak: u32,
    pub max_streak: u32,
}

/// Consecutive solved dates walking backward from `today`. An unsolved (or
/// missing) today ends the walk immediately.
pub fn current_streak(puzzles: &BTreeMap<NaiveDate, PuzzleRecord>, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut cursor = Some(today);
    while let Some(day) = cursor {
        if !puzzles.get(&day).is_some_and(|p| p.solved) {
            break;
        }
        streak += 1;
        cursor = day.checked_sub_days(Days::new(1));
    }
    streak
}

pub fn total_solved(puzzles: &BTreeMap<NaiveDate, PuzzleRecord>) -> u32 {
    puzzles.values().filter(|p| p.solved).count() as u32
}

pub fn total_time(puzzles: &BTreeMap<NaiveDate, PuzzleRecord>) -> u64 {
    puzzles.values().filter(|p| p.solved).map(|p| p.time).sum()
}

/// Mean solve time in whole seconds over solved puzzles.
pub fn average_time(puzzles: &BTreeMap<NaiveDate, PuzzleRecord>) -> Option<u64> {
    let solved = total_solved(puzzles) as u64;
    (solved > 0).then(|| total_time(puzzles) / solved)
}

/// Rebuild every derived aggregate from the puzzle map. `max_streak` only grows.
pub fn refresh(data: &mut UserData, today: NaiveDate) {
    let streak = current_streak(&data.puzzles, today);
    data.stats.total_solved = total_solved(&data.puzzles);
    data.stats.current_streak = streak;
    data.stats.max_streak = data.stats.max_streak.max(streak);
    data.stats.total_time = total_time(&data.puzzles);
}

pub fn display_stats(data: &UserData, today: NaiveDate) -> DisplayStats {
    let total_played = data.puzzles.len();
    let solved = total_solved(&data.puzzles);
    let current_streak = current_streak(&data.puzzles, today);
    let win_rate = if total_played > 0 {
        (100.0 * solved as f64 / total_played as f64).round() as u32
    } else {
        0
    };

    DisplayStats {
        total_played,
        win_rate,
        current_streak,
        max_streak: data.stats.max_streak.max(current_streak),
    }
}
