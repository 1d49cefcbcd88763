use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::validation::{rejected, validate_credit};
use crate::domain::{CreditAccount, CreditAccountDraft};
use crate::errors::{FinanceError, FinanceResult};
use crate::profile::ProfileConfig;

/// Totals across every credit account, recomputed on each call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditStats {
    pub total_credit_limit: f64,
    pub total_balance: f64,
    pub utilization: f64,
    pub total_minimum_payments: f64,
    pub available_credit: f64,
    pub accounts_count: usize,
}

/// In-memory collection of credit accounts in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreditAccountStore {
    accounts: Vec<CreditAccount>,
}

impl CreditAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_accounts(accounts: Vec<CreditAccount>) -> Self {
        Self { accounts }
    }

    pub fn add(
        &mut self,
        draft: &CreditAccountDraft,
        profile: &ProfileConfig,
        now: DateTime<Utc>,
    ) -> FinanceResult<Uuid> {
        let valid = validate_credit(draft, &profile.credit).map_err(rejected)?;
        let account = CreditAccount {
            id: Uuid::new_v4(),
            name: valid.name,
            kind: valid.kind,
            credit_limit: valid.credit_limit,
            current_balance: valid.current_balance,
            interest_rate: valid.interest_rate,
            minimum_payment: valid.minimum_payment,
            due_date: draft.due_date,
            notes: clean_notes(draft.notes.as_deref()),
            created_at: now,
            updated_at: now,
        };
        let id = account.id;
        tracing::debug!(%id, name = %account.name, "credit account added");
        self.accounts.push(account);
        Ok(id)
    }

    pub fn update(
        &mut self,
        id: Uuid,
        draft: &CreditAccountDraft,
        profile: &ProfileConfig,
        now: DateTime<Utc>,
    ) -> FinanceResult<()> {
        let valid = validate_credit(draft, &profile.credit).map_err(rejected)?;
        let account = self
            .accounts
            .iter_mut()
            .find(|account| account.id == id)
            .ok_or_else(|| FinanceError::not_found(format!("credit account {id}")))?;
        account.name = valid.name;
        account.kind = valid.kind;
        account.credit_limit = valid.credit_limit;
        account.current_balance = valid.current_balance;
        account.interest_rate = valid.interest_rate;
        account.minimum_payment = valid.minimum_payment;
        account.due_date = draft.due_date;
        account.notes = clean_notes(draft.notes.as_deref());
        account.updated_at = now;
        Ok(())
    }

    pub fn remove(&mut self, id: Uuid) -> FinanceResult<CreditAccount> {
        let index = self
            .accounts
            .iter()
            .position(|account| account.id == id)
            .ok_or_else(|| FinanceError::not_found(format!("credit account {id}")))?;
        Ok(self.accounts.remove(index))
    }

    pub fn get(&self, id: Uuid) -> Option<&CreditAccount> {
        self.accounts.iter().find(|account| account.id == id)
    }

    pub fn accounts(&self) -> &[CreditAccount] {
        &self.accounts
    }

    pub fn iter(&self) -> impl Iterator<Item = &CreditAccount> {
        self.accounts.iter()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn aggregate(&self) -> CreditStats {
        let total_credit_limit: f64 = self.accounts.iter().map(|a| a.credit_limit).sum();
        let total_balance: f64 = self.accounts.iter().map(|a| a.current_balance).sum();
        let total_minimum_payments = self.accounts.iter().map(|a| a.minimum_payment).sum();
        let utilization = if total_credit_limit > 0.0 {
            total_balance / total_credit_limit * 100.0
        } else {
            0.0
        };
        CreditStats {
            total_credit_limit,
            total_balance,
            utilization,
            total_minimum_payments,
            available_credit: total_credit_limit - total_balance,
            accounts_count: self.accounts.len(),
        }
    }
}

pub(crate) fn clean_notes(notes: Option<&str>) -> Option<String> {
    notes
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
