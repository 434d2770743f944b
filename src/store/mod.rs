pub mod json_store;
pub mod layered;
pub mod persistence;
pub mod progress;
#[cfg(feature = "network")]
pub mod remote;
pub mod schema;

pub use layered::Storage;
pub use persistence::{MemoryStore, Persistence};
pub use progress::ProgressStore;
