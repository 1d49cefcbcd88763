use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::validation::{rejected, validate_debt, validate_payment};
use crate::domain::{Debt, DebtDraft, PaymentRecord};
use crate::errors::{FinanceError, FinanceResult};
use crate::profile::ProfileConfig;

use super::credit_store::clean_notes;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtStats {
    pub total_debt: f64,
    pub original_total: f64,
    pub total_paid: f64,
    pub total_minimum_payments: f64,
    pub total_monthly_interest: f64,
    pub debts_count: usize,
    pub paid_off_count: usize,
    pub avg_interest_rate: f64,
    pub estimated_payoff_months: u32,
    pub progress_percentage: f64,
}

/// Order in which extra payments should be directed across open debts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayoffStrategy {
    /// Smallest balance first.
    Snowball,
    /// Highest interest rate first.
    Avalanche,
}

impl PayoffStrategy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "snowball" => Some(Self::Snowball),
            "avalanche" => Some(Self::Avalanche),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebtLedger {
    debts: Vec<Debt>,
}

impl DebtLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_debts(debts: Vec<Debt>) -> Self {
        Self { debts }
    }

    pub fn add(
        &mut self,
        draft: &DebtDraft,
        profile: &ProfileConfig,
        now: DateTime<Utc>,
    ) -> FinanceResult<Uuid> {
        let valid = validate_debt(draft, &profile.debt).map_err(rejected)?;
        let debt = Debt {
            id: Uuid::new_v4(),
            name: valid.name,
            kind: valid.kind,
            original_amount: valid.original_amount,
            current_balance: valid.current_balance,
            interest_rate: valid.interest_rate,
            minimum_payment: valid.minimum_payment,
            due_date: draft.due_date,
            start_date: draft.start_date.unwrap_or_else(|| now.date_naive()),
            notes: clean_notes(draft.notes.as_deref()),
            payments: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        let id = debt.id;
        tracing::debug!(%id, name = %debt.name, "debt added");
        self.debts.push(debt);
        Ok(id)
    }

    /// Applies an edit. This is the only path allowed to raise a balance.
    pub fn update(
        &mut self,
        id: Uuid,
        draft: &DebtDraft,
        profile: &ProfileConfig,
        now: DateTime<Utc>,
    ) -> FinanceResult<()> {
        let valid = validate_debt(draft, &profile.debt).map_err(rejected)?;
        let debt = self.debt_mut(id)?;
        debt.name = valid.name;
        debt.kind = valid.kind;
        debt.original_amount = valid.original_amount;
        debt.current_balance = valid.current_balance;
        debt.interest_rate = valid.interest_rate;
        debt.minimum_payment = valid.minimum_payment;
        debt.due_date = draft.due_date;
        if let Some(start) = draft.start_date {
            debt.start_date = start;
        }
        debt.notes = clean_notes(draft.notes.as_deref());
        debt.updated_at = now;
        Ok(())
    }

    pub fn remove(&mut self, id: Uuid) -> FinanceResult<Debt> {
        let index = self
            .debts
            .iter()
            .position(|debt| debt.id == id)
            .ok_or_else(|| FinanceError::not_found(format!("debt {id}")))?;
        Ok(self.debts.remove(index))
    }

    pub fn record_payment(
        &mut self,
        id: Uuid,
        amount: f64,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> FinanceResult<PaymentRecord> {
        let amount = validate_payment(amount).map_err(rejected)?;
        let debt = self.debt_mut(id)?;
        let previous_balance = debt.current_balance;
        let new_balance = (previous_balance - amount).max(0.0);
        let record = PaymentRecord {
            amount,
            date,
            previous_balance,
            new_balance,
        };
        debt.payments.push(record.clone());
        debt.current_balance = new_balance;
        debt.updated_at = now;
        tracing::debug!(%id, amount, new_balance, "payment recorded");
        Ok(record)
    }

    pub fn get(&self, id: Uuid) -> Option<&Debt> {
        self.debts.iter().find(|debt| debt.id == id)
    }

    pub fn debts(&self) -> &[Debt] {
        &self.debts
    }

    pub fn iter(&self) -> impl Iterator<Item = &Debt> {
        self.debts.iter()
    }

    pub fn len(&self) -> usize {
        self.debts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.debts.is_empty()
    }

    pub fn aggregate(&self) -> DebtStats {
        let total_debt: f64 = self.debts.iter().map(|d| d.current_balance).sum();
        let original_total: f64 = self.debts.iter().map(|d| d.original_amount).sum();
        let total_paid = original_total - total_debt;
        let total_minimum_payments: f64 = self.debts.iter().map(|d| d.minimum_payment).sum();
        let total_monthly_interest = self.debts.iter().map(Debt::monthly_interest).sum();
        let debts_count = self.debts.len();
        let paid_off_count = self.debts.iter().filter(|d| d.is_paid_off()).count();
        let avg_interest_rate = if debts_count > 0 {
            self.debts.iter().map(|d| d.interest_rate).sum::<f64>() / debts_count as f64
        } else {
            0.0
        };
        let estimated_payoff_months = if total_debt > 0.0 && total_minimum_payments > 0.0 {
            (total_debt / total_minimum_payments).ceil() as u32
        } else {
            0
        };
        let progress_percentage = if original_total > 0.0 {
            total_paid / original_total * 100.0
        } else {
            0.0
        };
        DebtStats {
            total_debt,
            original_total,
            total_paid,
            total_minimum_payments,
            total_monthly_interest,
            debts_count,
            paid_off_count,
            avg_interest_rate,
            estimated_payoff_months,
            progress_percentage,
        }
    }

    /// Open debts in the order the strategy would pay them down.
    pub fn payoff_order(&self, strategy: PayoffStrategy) -> Vec<&Debt> {
        let mut open: Vec<&Debt> = self.debts.iter().filter(|d| !d.is_paid_off()).collect();
        match strategy {
            PayoffStrategy::Snowball => open.sort_by(|a, b| {
                a.current_balance
                    .partial_cmp(&b.current_balance)
                    .unwrap_or(Ordering::Equal)
            }),
            PayoffStrategy::Avalanche => open.sort_by(|a, b| {
                b.interest_rate
                    .partial_cmp(&a.interest_rate)
                    .unwrap_or(Ordering::Equal)
            }),
        }
        open
    }

    fn debt_mut(&mut self, id: Uuid) -> FinanceResult<&mut Debt> {
        self.debts
            .iter_mut()
            .find(|debt| debt.id == id)
            .ok_or_else(|| FinanceError::not_found(format!("debt {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::AgeGroup;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 10, 8, 30, 0).unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, day).unwrap()
    }

    fn adults() -> &'static ProfileConfig {
        AgeGroup::Adults.config()
    }

    fn ledger_with_loan() -> (DebtLedger, Uuid) {
        let mut ledger = DebtLedger::new();
        let id = ledger
            .add(
                &DebtDraft::new("Car", "Auto Loan", 1_000.0)
                    .with_interest_rate(6.0)
                    .with_minimum_payment(100.0),
                adults(),
                now(),
            )
            .expect("add debt");
        (ledger, id)
    }

    #[test]
    fn add_defaults_start_date_and_balance() {
        let (ledger, id) = ledger_with_loan();
        let debt = ledger.get(id).unwrap();
        assert_eq!(debt.current_balance, 1_000.0);
        assert_eq!(debt.start_date, now().date_naive());
        assert!(debt.payments.is_empty());
    }

    #[test]
    fn payment_reduces_balance_and_appends_record() {
        let (mut ledger, id) = ledger_with_loan();
        let record = ledger
            .record_payment(id, 250.0, date(12), now())
            .expect("payment");
        assert_eq!(record.previous_balance, 1_000.0);
        assert_eq!(record.new_balance, 750.0);

        let debt = ledger.get(id).unwrap();
        assert_eq!(debt.current_balance, 750.0);
        assert_eq!(debt.payments.len(), 1);
        assert_eq!(debt.total_paid(), 250.0);
    }

    #[test]
    fn overpayment_clamps_at_zero() {
        let (mut ledger, id) = ledger_with_loan();
        let record = ledger.record_payment(id, 1_500.0, date(12), now()).unwrap();
        assert_eq!(record.new_balance, 0.0);
        assert!(ledger.get(id).unwrap().is_paid_off());
    }

    #[test]
    fn rejected_payment_changes_nothing() {
        let (mut ledger, id) = ledger_with_loan();
        let before = ledger.clone();
        for bad in [0.0, -20.0, f64::NAN] {
            let err = ledger.record_payment(id, bad, date(12), now()).unwrap_err();
            assert!(matches!(err, FinanceError::Validation(_)));
        }
        assert_eq!(ledger, before);
    }

    #[test]
    fn payment_on_unknown_debt_is_not_found() {
        let (mut ledger, _) = ledger_with_loan();
        let err = ledger
            .record_payment(Uuid::new_v4(), 10.0, date(12), now())
            .unwrap_err();
        assert!(matches!(err, FinanceError::NotFound(_)));
    }

    #[test]
    fn update_keeps_payment_history() {
        let (mut ledger, id) = ledger_with_loan();
        ledger.record_payment(id, 100.0, date(11), now()).unwrap();
        let mut draft = DebtDraft::from_debt(ledger.get(id).unwrap());
        draft.name = "Car loan".into();
        ledger.update(id, &draft, adults(), now()).unwrap();
        let debt = ledger.get(id).unwrap();
        assert_eq!(debt.name, "Car loan");
        assert_eq!(debt.payments.len(), 1);
        assert_eq!(debt.current_balance, 900.0);
    }

    #[test]
    fn aggregate_reports_progress() {
        let (mut ledger, id) = ledger_with_loan();
        ledger
            .add(
                &DebtDraft::new("Card", "Credit Card", 500.0)
                    .with_interest_rate(18.0)
                    .with_minimum_payment(50.0),
                adults(),
                now(),
            )
            .unwrap();
        ledger.record_payment(id, 1_000.0, date(15), now()).unwrap();

        let stats = ledger.aggregate();
        assert_eq!(stats.total_debt, 500.0);
        assert_eq!(stats.original_total, 1_500.0);
        assert_eq!(stats.total_paid, 1_000.0);
        assert_eq!(stats.total_minimum_payments, 150.0);
        assert_eq!(stats.debts_count, 2);
        assert_eq!(stats.paid_off_count, 1);
        assert_eq!(stats.avg_interest_rate, 12.0);
        assert_eq!(stats.estimated_payoff_months, 4);
        assert!((stats.progress_percentage - 66.666_666).abs() < 0.001);
        assert!((stats.total_monthly_interest - 7.5).abs() < 1e-9);
        assert_eq!(ledger.aggregate(), stats);
    }

    #[test]
    fn empty_ledger_aggregates_to_zero() {
        let stats = DebtLedger::new().aggregate();
        assert_eq!(stats.estimated_payoff_months, 0);
        assert_eq!(stats.progress_percentage, 0.0);
        assert_eq!(stats.avg_interest_rate, 0.0);
    }

    #[test]
    fn strategies_order_open_debts() {
        let mut ledger = DebtLedger::new();
        let small = ledger
            .add(&DebtDraft::new("Small", "Other", 200.0).with_interest_rate(5.0), adults(), now())
            .unwrap();
        let pricey = ledger
            .add(&DebtDraft::new("Pricey", "Credit Card", 900.0).with_interest_rate(24.0), adults(), now())
            .unwrap();
        let cleared = ledger
            .add(&DebtDraft::new("Cleared", "Other", 50.0), adults(), now())
            .unwrap();
        ledger.record_payment(cleared, 50.0, date(12), now()).unwrap();

        let snowball: Vec<Uuid> = ledger
            .payoff_order(PayoffStrategy::Snowball)
            .iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(snowball, vec![small, pricey]);

        let avalanche: Vec<Uuid> = ledger
            .payoff_order(PayoffStrategy::Avalanche)
            .iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(avalanche, vec![pricey, small]);
    }

    #[test]
    fn cleared_debt_reports_zero_months_left() {
        let (mut ledger, id) = ledger_with_loan();
        assert_eq!(ledger.get(id).unwrap().payoff_months(), Some(11));
        ledger.record_payment(id, 1_000.0, date(12), now()).unwrap();
        let debt = ledger.get(id).unwrap();
        assert!(debt.is_paid_off());
        assert_eq!(debt.payoff_months(), Some(0));
    }
}
