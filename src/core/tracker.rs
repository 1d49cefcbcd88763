use chrono::NaiveDate;
use uuid::Uuid;

use crate::activity::{ActivityEvent, ActivityLogger, CREDIT_PAGE, DEBT_PAGE};
use crate::config::AppConfig;
use crate::core::time::Clock;
use crate::domain::{CreditAccount, CreditAccountDraft, CreditScore, Debt, DebtDraft, PaymentRecord};
use crate::errors::FinanceResult;
use crate::estimator::score;
use crate::ledger::{CreditAccountStore, CreditStats, DebtLedger, DebtStats, PayoffStrategy};
use crate::persistence::{
    AutoPersistenceController, AutosaveEvent, KeyValueStore, LoadReport, PersistenceSnapshot,
    SnapshotRepository,
};
use crate::profile::{AgeGroup, ProfileConfig};

/// Screens that report a page view when opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Credit,
    Debt,
}

impl Screen {
    fn page(self) -> &'static str {
        match self {
            Screen::Credit => CREDIT_PAGE,
            Screen::Debt => DEBT_PAGE,
        }
    }

    fn description(self) -> &'static str {
        match self {
            Screen::Credit => "Viewed credit management",
            Screen::Debt => "Viewed debt tracker",
        }
    }
}

/// Owns the learner's credit accounts and debts and keeps storage in sync.
///
/// Every mutation goes through here so the score is recomputed and the
/// autosave deadline re-armed. Nothing is written until [`pump`](Self::pump)
/// observes that the quiet period has passed, or [`flush`](Self::flush) forces
/// it.
pub struct FinanceTracker {
    credit: CreditAccountStore,
    debts: DebtLedger,
    score: Option<CreditScore>,
    group: AgeGroup,
    clock: Box<dyn Clock>,
    autosave: AutoPersistenceController,
    activity: ActivityLogger,
    load_warnings: Vec<String>,
}

impl FinanceTracker {
    pub fn open(
        store: Box<dyn KeyValueStore>,
        config: &AppConfig,
        clock: Box<dyn Clock>,
        activity: ActivityLogger,
    ) -> FinanceResult<Self> {
        let group = AgeGroup::from_birth_date(config.birth_date.as_deref(), clock.today());
        let repository = SnapshotRepository::new(store);
        let autosave = AutoPersistenceController::new(repository, config.autosave_delay_ms);
        let report = autosave.load()?;
        let mut tracker = Self {
            credit: CreditAccountStore::new(),
            debts: DebtLedger::new(),
            score: None,
            group,
            clock,
            autosave,
            activity,
            load_warnings: Vec::new(),
        };
        tracker.apply(report);
        tracing::info!(
            age_group = %group,
            accounts = tracker.credit.len(),
            debts = tracker.debts.len(),
            "finance tracker opened"
        );
        Ok(tracker)
    }

    fn apply(&mut self, report: LoadReport) {
        let now = self.clock.now();
        let LoadReport {
            snapshot,
            warnings,
            ..
        } = report;
        self.credit = CreditAccountStore::from_accounts(snapshot.credit_accounts);
        self.debts = DebtLedger::from_debts(snapshot.debts);
        self.score = if self.group == AgeGroup::Kids {
            None
        } else {
            snapshot
                .credit_score
                .or_else(|| score::estimate(self.credit.accounts(), self.group, now))
                .or_else(|| score::baseline(self.group, now))
        };
        self.load_warnings = warnings;
    }

    pub fn visit(&self, screen: Screen) {
        let event =
            ActivityEvent::page_view(screen.description(), screen.page(), self.group, self.clock.now());
        self.activity.log(event);
    }

    pub fn group(&self) -> AgeGroup {
        self.group
    }

    pub fn profile(&self) -> &'static ProfileConfig {
        self.group.config()
    }

    pub fn score(&self) -> Option<&CreditScore> {
        self.score.as_ref()
    }

    pub fn accounts(&self) -> &[CreditAccount] {
        self.credit.accounts()
    }

    pub fn debts(&self) -> &[Debt] {
        self.debts.debts()
    }

    pub fn credit_stats(&self) -> CreditStats {
        self.credit.aggregate()
    }

    pub fn debt_stats(&self) -> DebtStats {
        self.debts.aggregate()
    }

    pub fn payoff_order(&self, strategy: PayoffStrategy) -> Vec<&Debt> {
        self.debts.payoff_order(strategy)
    }

    /// Values that could not be read back at open time.
    pub fn load_warnings(&self) -> &[String] {
        &self.load_warnings
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.autosave.is_dirty()
    }

    pub fn autosave(&self) -> &AutoPersistenceController {
        &self.autosave
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn snapshot(&self) -> PersistenceSnapshot {
        PersistenceSnapshot {
            credit_accounts: self.credit.accounts().to_vec(),
            credit_score: self.score.clone(),
            debts: self.debts.debts().to_vec(),
        }
    }

    pub fn add_credit_account(&mut self, draft: &CreditAccountDraft) -> FinanceResult<Uuid> {
        let now = self.clock.now();
        let id = self.credit.add(draft, self.group.config(), now)?;
        self.credit_changed();
        Ok(id)
    }

    pub fn update_credit_account(&mut self, id: Uuid, draft: &CreditAccountDraft) -> FinanceResult<()> {
        let now = self.clock.now();
        self.credit.update(id, draft, self.group.config(), now)?;
        self.credit_changed();
        Ok(())
    }

    pub fn remove_credit_account(&mut self, id: Uuid) -> FinanceResult<CreditAccount> {
        let removed = self.credit.remove(id)?;
        self.credit_changed();
        Ok(removed)
    }

    pub fn add_debt(&mut self, draft: &DebtDraft) -> FinanceResult<Uuid> {
        let now = self.clock.now();
        let id = self.debts.add(draft, self.group.config(), now)?;
        self.autosave.note_mutation(now);
        Ok(id)
    }

    pub fn update_debt(&mut self, id: Uuid, draft: &DebtDraft) -> FinanceResult<()> {
        let now = self.clock.now();
        self.debts.update(id, draft, self.group.config(), now)?;
        self.autosave.note_mutation(now);
        Ok(())
    }

    pub fn remove_debt(&mut self, id: Uuid) -> FinanceResult<Debt> {
        let removed = self.debts.remove(id)?;
        self.autosave.note_mutation(self.clock.now());
        Ok(removed)
    }

    /// Records a payment dated `date`, or today when absent.
    pub fn record_payment(
        &mut self,
        id: Uuid,
        amount: f64,
        date: Option<NaiveDate>,
    ) -> FinanceResult<PaymentRecord> {
        let now = self.clock.now();
        let date = date.unwrap_or_else(|| now.date_naive());
        let record = self.debts.record_payment(id, amount, date, now)?;
        self.autosave.note_mutation(now);
        Ok(record)
    }

    // An emptied account list keeps the last score, so a removal alone never
    // blanks the dashboard.
    fn credit_changed(&mut self) {
        let now = self.clock.now();
        if let Some(estimate) = score::estimate(self.credit.accounts(), self.group, now) {
            let changed = self.score.as_ref().map(|s| s.score) != Some(estimate.score);
            if changed {
                tracing::debug!(score = estimate.score, "credit score recalculated");
            }
            self.score = Some(estimate);
        } else if self.group == AgeGroup::Kids {
            self.score = None;
        }
        self.autosave.note_mutation(now);
    }

    /// Writes pending changes if the autosave delay has passed.
    pub fn pump(&mut self) -> Option<AutosaveEvent> {
        let now = self.clock.now();
        let credit = &self.credit;
        let debts = &self.debts;
        let score = &self.score;
        self.autosave.poll(now, || PersistenceSnapshot {
            credit_accounts: credit.accounts().to_vec(),
            credit_score: score.clone(),
            debts: debts.debts().to_vec(),
        })
    }

    /// Writes pending changes now, as on shutdown.
    pub fn flush(&mut self) -> Option<AutosaveEvent> {
        let snapshot = self.snapshot();
        let now = self.clock.now();
        self.autosave.flush(&snapshot, now)
    }

    /// Drops unsaved edits and reloads the last saved state.
    pub fn discard_changes(&mut self) -> FinanceResult<()> {
        self.autosave.cancel();
        let report = self.autosave.load()?;
        self.apply(report);
        Ok(())
    }
}
