#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use finwell_core::{
    activity::{ActivityLogger, MemorySink},
    config::AppConfig,
    core::{FinanceTracker, ManualClock},
    persistence::KeyValueStore,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap()
}

pub fn open_tracker(
    store: Box<dyn KeyValueStore>,
    clock: &ManualClock,
    birth_date: Option<&str>,
) -> FinanceTracker {
    let config = AppConfig {
        birth_date: birth_date.map(str::to_string),
        ..AppConfig::default()
    };
    FinanceTracker::open(
        store,
        &config,
        Box::new(clock.clone()),
        ActivityLogger::new(Box::new(MemorySink::new())),
    )
    .expect("open tracker")
}
