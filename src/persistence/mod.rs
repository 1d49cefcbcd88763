//! Key-value persistence, snapshot encoding, and the debounced autosave
//! controller.

pub mod autosave;
pub mod json_store;
pub mod snapshot;
pub mod store;

pub use autosave::{
    AutoPersistenceController, AutosaveEvent, SaveState, DEFAULT_AUTOSAVE_DELAY_MS,
    MAX_AUTOSAVE_DELAY_MS,
};
pub use json_store::JsonFileStore;
pub use snapshot::{
    LoadReport, PersistenceSnapshot, SnapshotRepository, CREDIT_ACCOUNTS_KEY, CREDIT_SCORE_KEY,
    DEBTS_KEY,
};
pub use store::{KeyValueStore, MemoryStore};
