//! Pure validation of form drafts. Nothing here touches a store; callers get
//! either normalized values or a [`FinanceError::Validation`] with a reason
//! suitable for showing to the user.

use crate::domain::{CreditAccountDraft, DebtDraft};
use crate::errors::{FinanceError, FinanceResult};
use crate::profile::TypeLimits;

/// Draft fields after defaults and canonical type names have been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidCredit {
    pub name: String,
    pub kind: String,
    pub credit_limit: f64,
    pub current_balance: f64,
    pub interest_rate: f64,
    pub minimum_payment: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidDebt {
    pub name: String,
    pub kind: String,
    pub original_amount: f64,
    pub current_balance: f64,
    pub interest_rate: f64,
    pub minimum_payment: f64,
}

pub fn validate_credit(draft: &CreditAccountDraft, limits: &TypeLimits) -> FinanceResult<ValidCredit> {
    let name = required_name(&draft.name)?;
    let credit_limit = required_amount("Credit limit", draft.credit_limit)?;
    within_limits("Credit limit", credit_limit, limits)?;
    let kind = allowed_kind(&draft.kind, limits)?;
    let current_balance = optional_non_negative("Current balance", draft.current_balance)?;
    let interest_rate = optional_non_negative("Interest rate", draft.interest_rate)?;
    if interest_rate > 100.0 {
        return Err(FinanceError::validation(
            "Interest rate must be between 0 and 100",
        ));
    }
    let minimum_payment = optional_non_negative("Minimum payment", draft.minimum_payment)?;
    Ok(ValidCredit {
        name,
        kind,
        credit_limit,
        current_balance,
        interest_rate,
        minimum_payment,
    })
}

pub fn validate_debt(draft: &DebtDraft, limits: &TypeLimits) -> FinanceResult<ValidDebt> {
    let name = required_name(&draft.name)?;
    let original_amount = required_amount("Original amount", draft.original_amount)?;
    within_limits("Original amount", original_amount, limits)?;
    let kind = allowed_kind(&draft.kind, limits)?;
    let current_balance = match draft.current_balance {
        Some(_) => optional_non_negative("Current balance", draft.current_balance)?,
        None => original_amount,
    };
    let interest_rate = optional_non_negative("Interest rate", draft.interest_rate)?;
    let minimum_payment = optional_non_negative("Minimum payment", draft.minimum_payment)?;
    Ok(ValidDebt {
        name,
        kind,
        original_amount,
        current_balance,
        interest_rate,
        minimum_payment,
    })
}

pub fn validate_payment(amount: f64) -> FinanceResult<f64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(FinanceError::validation(
            "Please enter a valid payment amount",
        ));
    }
    Ok(amount)
}

/// Logs a rejected draft before handing the error back to the caller.
pub(crate) fn rejected(err: FinanceError) -> FinanceError {
    tracing::debug!(error = %err, "draft rejected");
    err
}

fn required_name(raw: &str) -> FinanceResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FinanceError::validation("Name is required"));
    }
    Ok(trimmed.to_string())
}

fn required_amount(label: &str, value: Option<f64>) -> FinanceResult<f64> {
    match value {
        Some(amount) if amount.is_finite() => Ok(amount),
        Some(_) => Err(FinanceError::validation(format!("{label} must be a number"))),
        None => Err(FinanceError::validation(format!("{label} is required"))),
    }
}

fn within_limits(label: &str, amount: f64, limits: &TypeLimits) -> FinanceResult<()> {
    if limits.contains_amount(amount) {
        Ok(())
    } else {
        Err(FinanceError::validation(format!(
            "{label} must be between {} and {}",
            limits.min_amount, limits.max_amount
        )))
    }
}

fn allowed_kind(raw: &str, limits: &TypeLimits) -> FinanceResult<String> {
    if raw.trim().is_empty() {
        return Ok(limits.default_type().to_string());
    }
    limits
        .canonical(raw)
        .map(str::to_string)
        .ok_or_else(|| {
            FinanceError::validation(format!(
                "Type `{}` is not available; choose one of: {}",
                raw.trim(),
                limits.allowed_types.join(", ")
            ))
        })
}

fn optional_non_negative(label: &str, value: Option<f64>) -> FinanceResult<f64> {
    match value {
        None => Ok(0.0),
        Some(amount) if amount.is_finite() && amount >= 0.0 => Ok(amount),
        Some(_) => Err(FinanceError::validation(format!(
            "{label} must be zero or more"
        ))),
    }
}
