pub mod puzzle;
pub mod selector;
pub mod share;
pub mod target;

pub use puzzle::{Advance, AssistStep, InputOutcome, Phase, PuzzleSession};
pub use selector::{Origin, Resume, Selection};
pub use target::{Target, TargetKind};
