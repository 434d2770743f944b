pub mod assist;
pub mod stats;
pub mod verifier;

pub use assist::AssistGate;
pub use stats::DisplayStats;
