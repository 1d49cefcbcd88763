use serde::de::DeserializeOwned;

use crate::domain::{CreditAccount, CreditScore, Debt};
use crate::errors::FinanceResult;

use super::store::KeyValueStore;

pub const CREDIT_ACCOUNTS_KEY: &str = "creditAccounts";
pub const CREDIT_SCORE_KEY: &str = "creditScore";
pub const DEBTS_KEY: &str = "debts";

/// Everything written in one logical save.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistenceSnapshot {
    pub credit_accounts: Vec<CreditAccount>,
    pub credit_score: Option<CreditScore>,
    pub debts: Vec<Debt>,
}

/// Outcome of reading a snapshot back; unreadable keys are skipped with a warning.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub snapshot: PersistenceSnapshot,
    pub warnings: Vec<String>,
    /// False when no key had ever been written.
    pub found: bool,
}

/// Reads and writes [`PersistenceSnapshot`]s under fixed keys.
pub struct SnapshotRepository {
    store: Box<dyn KeyValueStore>,
}

impl SnapshotRepository {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn load(&self) -> FinanceResult<LoadReport> {
        let mut report = LoadReport::default();
        if let Some(accounts) = self.read_key::<Vec<CreditAccount>>(CREDIT_ACCOUNTS_KEY, &mut report)? {
            report.snapshot.credit_accounts = accounts;
        }
        if let Some(score) = self.read_key::<Option<CreditScore>>(CREDIT_SCORE_KEY, &mut report)? {
            report.snapshot.credit_score = score;
        }
        if let Some(debts) = self.read_key::<Vec<Debt>>(DEBTS_KEY, &mut report)? {
            report.snapshot.debts = debts;
        }
        Ok(report)
    }

    /// Serializes every part first, then hands the batch to the store, so a
    /// serialization failure never reaches storage.
    pub fn save(&self, snapshot: &PersistenceSnapshot) -> FinanceResult<()> {
        let accounts = serde_json::to_string(&snapshot.credit_accounts)?;
        let score = serde_json::to_string(&snapshot.credit_score)?;
        let debts = serde_json::to_string(&snapshot.debts)?;
        self.store.set_items(&[
            (CREDIT_ACCOUNTS_KEY, accounts),
            (CREDIT_SCORE_KEY, score),
            (DEBTS_KEY, debts),
        ])
    }

    fn read_key<T: DeserializeOwned>(
        &self,
        key: &str,
        report: &mut LoadReport,
    ) -> FinanceResult<Option<T>> {
        let Some(raw) = self.store.get_item(key)? else {
            return Ok(None);
        };
        report.found = true;
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                tracing::warn!(key, error = %err, "ignoring unreadable stored value");
                report.warnings.push(format!("`{key}` could not be read: {err}"));
                Ok(None)
            }
        }
    }
}
