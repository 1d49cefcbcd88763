//! Debounced write-through of in-memory state.
//!
//! The controller never sleeps. Mutations arm a deadline; whoever drives the
//! event loop calls [`AutoPersistenceController::poll`] with the current time
//! and the write happens once the deadline has passed with no newer mutation.

use chrono::{DateTime, Duration, Utc};

use crate::errors::FinanceResult;

use super::snapshot::{LoadReport, PersistenceSnapshot, SnapshotRepository};

pub const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 2_000;
/// Longest quiet period accepted; one day.
pub const MAX_AUTOSAVE_DELAY_MS: u64 = 86_400_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveState {
    Clean,
    Dirty,
    Saving,
}

/// Notification emitted when a scheduled or forced write completes.
#[derive(Debug, Clone, PartialEq)]
pub enum AutosaveEvent {
    Saved { at: DateTime<Utc> },
    /// The write failed; state stays dirty until the next mutation retries it.
    Failed { warning: String },
}

pub struct AutoPersistenceController {
    repository: SnapshotRepository,
    delay: Duration,
    state: SaveState,
    deadline: Option<DateTime<Utc>>,
    last_saved_at: Option<DateTime<Utc>>,
    save_count: usize,
}

impl AutoPersistenceController {
    pub fn new(repository: SnapshotRepository, delay_ms: u64) -> Self {
        let delay_ms = i64::try_from(delay_ms.min(MAX_AUTOSAVE_DELAY_MS)).unwrap_or(0);
        Self {
            repository,
            delay: Duration::milliseconds(delay_ms),
            state: SaveState::Clean,
            deadline: None,
            last_saved_at: None,
            save_count: 0,
        }
    }

    pub fn load(&self) -> FinanceResult<LoadReport> {
        self.repository.load()
    }

    pub fn state(&self) -> SaveState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state == SaveState::Dirty
    }

    pub fn pending_deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.last_saved_at
    }

    pub fn save_count(&self) -> usize {
        self.save_count
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Marks state dirty and restarts the quiet period.
    pub fn note_mutation(&mut self, now: DateTime<Utc>) {
        self.state = SaveState::Dirty;
        self.deadline = Some(
            now.checked_add_signed(self.delay)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        );
        tracing::trace!(deadline = ?self.deadline, "autosave armed");
    }

    /// Drops any pending write and returns to clean, as after a form reset.
    pub fn cancel(&mut self) {
        if self.deadline.take().is_some() {
            tracing::debug!("pending autosave cancelled");
        }
        self.state = SaveState::Clean;
    }

    /// Writes the snapshot if the quiet period has elapsed.
    ///
    /// `snapshot` is only invoked when a write is due, so callers can build it
    /// from the latest in-memory state lazily.
    pub fn poll<F>(&mut self, now: DateTime<Utc>, snapshot: F) -> Option<AutosaveEvent>
    where
        F: FnOnce() -> PersistenceSnapshot,
    {
        let due = matches!(self.deadline, Some(deadline) if now >= deadline);
        if self.state != SaveState::Dirty || !due {
            return None;
        }
        Some(self.write(&snapshot(), now))
    }

    /// Writes immediately when dirty, ignoring the deadline.
    pub fn flush(&mut self, snapshot: &PersistenceSnapshot, now: DateTime<Utc>) -> Option<AutosaveEvent> {
        if self.state != SaveState::Dirty {
            return None;
        }
        Some(self.write(snapshot, now))
    }

    fn write(&mut self, snapshot: &PersistenceSnapshot, now: DateTime<Utc>) -> AutosaveEvent {
        self.state = SaveState::Saving;
        self.deadline = None;
        match self.repository.save(snapshot) {
            Ok(()) => {
                self.state = SaveState::Clean;
                self.last_saved_at = Some(now);
                self.save_count += 1;
                tracing::info!(
                    accounts = snapshot.credit_accounts.len(),
                    debts = snapshot.debts.len(),
                    "financial data saved"
                );
                AutosaveEvent::Saved { at: now }
            }
            Err(err) => {
                self.state = SaveState::Dirty;
                tracing::warn!(error = %err, "autosave failed; will retry on next change");
                AutosaveEvent::Failed {
                    warning: format!("Could not save your changes: {err}"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{KeyValueStore, MemoryStore, CREDIT_SCORE_KEY};
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 2, 10, 0, 0).unwrap()
    }

    fn controller(store: &MemoryStore) -> AutoPersistenceController {
        let repo = SnapshotRepository::new(Box::new(store.clone()));
        AutoPersistenceController::new(repo, DEFAULT_AUTOSAVE_DELAY_MS)
    }

    fn ms(millis: i64) -> Duration {
        Duration::milliseconds(millis)
    }

    #[test]
    fn clean_controller_never_writes() {
        let store = MemoryStore::new();
        let mut ctl = controller(&store);
        assert!(ctl.poll(start() + ms(10_000), PersistenceSnapshot::default).is_none());
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn write_waits_for_quiet_period() {
        let store = MemoryStore::new();
        let mut ctl = controller(&store);
        ctl.note_mutation(start());
        assert!(ctl.poll(start() + ms(1_999), PersistenceSnapshot::default).is_none());
        assert!(ctl.is_dirty());

        let event = ctl.poll(start() + ms(2_000), PersistenceSnapshot::default);
        assert_eq!(event, Some(AutosaveEvent::Saved { at: start() + ms(2_000) }));
        assert_eq!(ctl.state(), SaveState::Clean);
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn burst_of_mutations_restarts_the_timer() {
        let store = MemoryStore::new();
        let mut ctl = controller(&store);
        ctl.note_mutation(start());
        ctl.note_mutation(start() + ms(1_500));
        assert!(ctl.poll(start() + ms(2_500), PersistenceSnapshot::default).is_none());
        assert!(ctl.poll(start() + ms(3_500), PersistenceSnapshot::default).is_some());
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn cancel_discards_pending_write() {
        let store = MemoryStore::new();
        let mut ctl = controller(&store);
        ctl.note_mutation(start());
        ctl.cancel();
        assert!(ctl.pending_deadline().is_none());
        assert!(ctl.poll(start() + ms(5_000), PersistenceSnapshot::default).is_none());
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn failed_write_stays_dirty_until_next_mutation() {
        let store = MemoryStore::new();
        let mut ctl = controller(&store);
        store.fail_writes(true);
        ctl.note_mutation(start());
        let event = ctl.poll(start() + ms(2_000), PersistenceSnapshot::default);
        assert!(matches!(event, Some(AutosaveEvent::Failed { .. })));
        assert!(ctl.is_dirty());
        assert!(ctl.pending_deadline().is_none());
        assert!(ctl.poll(start() + ms(9_000), PersistenceSnapshot::default).is_none());

        store.fail_writes(false);
        ctl.note_mutation(start() + ms(10_000));
        let event = ctl.poll(start() + ms(12_000), PersistenceSnapshot::default);
        assert!(matches!(event, Some(AutosaveEvent::Saved { .. })));
        assert_eq!(store.get_item(CREDIT_SCORE_KEY).unwrap().as_deref(), Some("null"));
    }

    #[test]
    fn oversized_delay_is_capped_at_one_day() {
        let store = MemoryStore::new();
        let repo = SnapshotRepository::new(Box::new(store.clone()));
        let mut ctl = AutoPersistenceController::new(repo, u64::MAX);
        assert_eq!(ctl.delay(), Duration::milliseconds(MAX_AUTOSAVE_DELAY_MS as i64));

        ctl.note_mutation(start());
        assert_eq!(ctl.pending_deadline(), Some(start() + Duration::days(1)));
        assert!(ctl.poll(start() + ms(1_000), PersistenceSnapshot::default).is_none());
    }

    #[test]
    fn deadline_saturates_near_the_end_of_time() {
        let store = MemoryStore::new();
        let mut ctl = controller(&store);
        ctl.note_mutation(DateTime::<Utc>::MAX_UTC);
        assert_eq!(ctl.pending_deadline(), Some(DateTime::<Utc>::MAX_UTC));
        assert!(ctl.is_dirty());
    }

    #[test]
    fn flush_writes_without_waiting() {
        let store = MemoryStore::new();
        let mut ctl = controller(&store);
        assert!(ctl.flush(&PersistenceSnapshot::default(), start()).is_none());
        ctl.note_mutation(start());
        assert!(ctl.flush(&PersistenceSnapshot::default(), start()).is_some());
        assert_eq!(ctl.save_count(), 1);
        assert_eq!(ctl.last_saved_at(), Some(start()));
    }
}
