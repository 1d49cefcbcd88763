use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;
use crate::estimator::payoff::project_payoff_months;

/// One entry in a debt's append-only payment log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub amount: f64,
    pub date: NaiveDate,
    pub previous_balance: f64,
    pub new_balance: f64,
}

/// Money owed, with the payments recorded against it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Debt {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub original_amount: f64,
    pub current_balance: f64,
    #[serde(default)]
    pub interest_rate: f64,
    #[serde(default)]
    pub minimum_payment: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub payments: Vec<PaymentRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Debt {
    pub fn is_paid_off(&self) -> bool {
        self.current_balance <= 0.0
    }

    pub fn total_paid(&self) -> f64 {
        self.payments.iter().map(|payment| payment.amount).sum()
    }

    /// Interest accrued over one month at the current balance.
    pub fn monthly_interest(&self) -> f64 {
        self.current_balance * self.interest_rate / 100.0 / 12.0
    }

    /// Months to clear the balance paying only the minimum, if it ever clears.
    /// A cleared debt reports zero.
    pub fn payoff_months(&self) -> Option<u32> {
        if self.is_paid_off() {
            return Some(0);
        }
        project_payoff_months(self.current_balance, self.minimum_payment, self.interest_rate)
    }

    pub fn progress_percentage(&self) -> f64 {
        if self.original_amount > 0.0 {
            (self.original_amount - self.current_balance) / self.original_amount * 100.0
        } else {
            0.0
        }
    }
}

impl Identifiable for Debt {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Debt {
    fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.kind)
    }
}

/// Raw field values submitted by the add/edit debt form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebtDraft {
    pub name: String,
    pub kind: String,
    pub original_amount: Option<f64>,
    /// Falls back to `original_amount` when left blank.
    pub current_balance: Option<f64>,
    pub interest_rate: Option<f64>,
    pub minimum_payment: Option<f64>,
    pub due_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl DebtDraft {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, original_amount: f64) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            original_amount: Some(original_amount),
            ..Self::default()
        }
    }

    pub fn with_balance(mut self, balance: f64) -> Self {
        self.current_balance = Some(balance);
        self
    }

    pub fn with_interest_rate(mut self, rate: f64) -> Self {
        self.interest_rate = Some(rate);
        self
    }

    pub fn with_minimum_payment(mut self, payment: f64) -> Self {
        self.minimum_payment = Some(payment);
        self
    }

    pub fn from_debt(debt: &Debt) -> Self {
        Self {
            name: debt.name.clone(),
            kind: debt.kind.clone(),
            original_amount: Some(debt.original_amount),
            current_balance: Some(debt.current_balance),
            interest_rate: Some(debt.interest_rate),
            minimum_payment: Some(debt.minimum_payment),
            due_date: debt.due_date,
            start_date: Some(debt.start_date),
            notes: debt.notes.clone(),
        }
    }
}
