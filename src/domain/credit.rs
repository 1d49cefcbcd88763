use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;

/// A revolving or installment credit line tracked by the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreditAccount {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub credit_limit: f64,
    #[serde(default)]
    pub current_balance: f64,
    #[serde(default)]
    pub interest_rate: f64,
    #[serde(default)]
    pub minimum_payment: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CreditAccount {
    /// Balance as a percentage of the limit. Over-limit balances exceed 100.
    pub fn utilization(&self) -> f64 {
        if self.credit_limit > 0.0 {
            self.current_balance / self.credit_limit * 100.0
        } else {
            0.0
        }
    }

    /// Utilization capped at 100 for progress bars.
    pub fn clamped_utilization(&self) -> f64 {
        self.utilization().min(100.0)
    }

    pub fn available_credit(&self) -> f64 {
        self.credit_limit - self.current_balance
    }

    pub fn is_over_limit(&self) -> bool {
        self.current_balance > self.credit_limit
    }
}

impl Identifiable for CreditAccount {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for CreditAccount {
    fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.kind)
    }
}

/// Raw field values submitted by the add/edit account form.
///
/// `credit_limit` is required; the remaining numeric fields default to zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreditAccountDraft {
    pub name: String,
    pub kind: String,
    pub credit_limit: Option<f64>,
    pub current_balance: Option<f64>,
    pub interest_rate: Option<f64>,
    pub minimum_payment: Option<f64>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl CreditAccountDraft {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, credit_limit: f64) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            credit_limit: Some(credit_limit),
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

    /// Pre-fills a draft from an existing account, as the edit form does.
    pub fn from_account(account: &CreditAccount) -> Self {
        Self {
            name: account.name.clone(),
            kind: account.kind.clone(),
            credit_limit: Some(account.credit_limit),
            current_balance: Some(account.current_balance),
            interest_rate: Some(account.interest_rate),
            minimum_payment: Some(account.minimum_payment),
            due_date: account.due_date,
            notes: account.notes.clone(),
        }
    }
}

/// Weighted contributions behind a [`CreditScore`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreFactors {
    pub payment_history: u32,
    pub credit_utilization: u32,
    pub credit_age: u32,
    pub credit_mix: u32,
    pub new_credit: u32,
}

impl ScoreFactors {
    pub fn total(&self) -> u32 {
        self.payment_history
            + self.credit_utilization
            + self.credit_age
            + self.credit_mix
            + self.new_credit
    }
}

impl Default for ScoreFactors {
    fn default() -> Self {
        Self {
            payment_history: 35,
            credit_utilization: 30,
            credit_age: 15,
            credit_mix: 10,
            new_credit: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreditScore {
    pub score: u32,
    pub last_updated: DateTime<Utc>,
    pub factors: ScoreFactors,
}

impl CreditScore {
    pub const MIN: u32 = 300;
    pub const MAX: u32 = 850;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(limit: f64, balance: f64) -> CreditAccount {
        let now = Utc::now();
        CreditAccount {
            id: Uuid::new_v4(),
            name: "Card".into(),
            kind: "Credit Card".into(),
            credit_limit: limit,
            current_balance: balance,
            interest_rate: 0.0,
            minimum_payment: 0.0,
            due_date: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn over_limit_balance_is_representable() {
        let acct = account(500.0, 650.0);
        assert!(acct.is_over_limit());
        assert_eq!(acct.utilization(), 130.0);
        assert_eq!(acct.clamped_utilization(), 100.0);
        assert_eq!(acct.available_credit(), -150.0);
    }

    #[test]
    fn zero_limit_has_zero_utilization() {
        assert_eq!(account(0.0, 20.0).utilization(), 0.0);
    }

    #[test]
    fn serializes_with_camel_case_field_names() {
        let json = serde_json::to_value(account(1000.0, 100.0)).unwrap();
        assert!(json.get("_id").is_some());
        assert_eq!(json["type"], "Credit Card");
        assert_eq!(json["creditLimit"], 1000.0);
        assert!(json.get("dueDate").is_none());
    }
}
