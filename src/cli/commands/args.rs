//! Argument parsing shared by the record commands.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::common::parse_amount;
use crate::domain::{CreditAccountDraft, DebtDraft, Identifiable};

use crate::cli::context::CommandError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const MIN_ID_PREFIX: usize = 4;

/// Splits `key=value` tokens. Keys are lowercased; values may be empty.
pub(crate) fn fields<'a>(args: &[&'a str]) -> Result<Vec<(String, &'a str)>, CommandError> {
    args.iter()
        .map(|token| {
            token
                .split_once('=')
                .map(|(key, value)| (key.trim().to_ascii_lowercase(), value.trim()))
                .ok_or_else(|| {
                    CommandError::InvalidArguments(format!(
                        "expected `field=value`, got `{token}`"
                    ))
                })
        })
        .collect()
}

pub(crate) fn amount(label: &str, raw: &str) -> Result<f64, CommandError> {
    parse_amount(raw)
        .ok_or_else(|| CommandError::InvalidArguments(format!("{label} must be a number")))
}

fn optional_amount(label: &str, raw: &str) -> Result<Option<f64>, CommandError> {
    if raw.is_empty() {
        return Ok(None);
    }
    amount(label, raw).map(Some)
}

pub(crate) fn date(raw: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
        CommandError::InvalidArguments(format!("`{raw}` is not a date (use YYYY-MM-DD)"))
    })
}

fn optional_date(raw: &str) -> Result<Option<NaiveDate>, CommandError> {
    if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    date(raw).map(Some)
}

fn optional_text(raw: &str) -> Option<String> {
    (!raw.is_empty()).then(|| raw.to_string())
}

pub(crate) fn apply_credit_field(
    draft: &mut CreditAccountDraft,
    key: &str,
    value: &str,
) -> Result<(), CommandError> {
    match key {
        "name" => draft.name = value.to_string(),
        "type" => draft.kind = value.to_string(),
        "limit" => draft.credit_limit = optional_amount("Credit limit", value)?,
        "balance" => draft.current_balance = optional_amount("Current balance", value)?,
        "rate" => draft.interest_rate = optional_amount("Interest rate", value)?,
        "min" => draft.minimum_payment = optional_amount("Minimum payment", value)?,
        "due" => draft.due_date = optional_date(value)?,
        "notes" => draft.notes = optional_text(value),
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown credit field `{other}` (name, type, limit, balance, rate, min, due, notes)"
            )))
        }
    }
    Ok(())
}

pub(crate) fn apply_debt_field(
    draft: &mut DebtDraft,
    key: &str,
    value: &str,
) -> Result<(), CommandError> {
    match key {
        "name" => draft.name = value.to_string(),
        "type" => draft.kind = value.to_string(),
        "amount" => draft.original_amount = optional_amount("Original amount", value)?,
        "balance" => draft.current_balance = optional_amount("Current balance", value)?,
        "rate" => draft.interest_rate = optional_amount("Interest rate", value)?,
        "min" => draft.minimum_payment = optional_amount("Minimum payment", value)?,
        "due" => draft.due_date = optional_date(value)?,
        "start" => draft.start_date = optional_date(value)?,
        "notes" => draft.notes = optional_text(value),
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown debt field `{other}` (name, type, amount, balance, rate, min, due, start, notes)"
            )))
        }
    }
    Ok(())
}

/// Resolves a 1-based list position or an id prefix to a record id.
pub(crate) fn resolve<T: Identifiable>(items: &[T], token: &str) -> Result<Uuid, CommandError> {
    let token = token.trim();
    if let Ok(position) = token.parse::<usize>() {
        return position
            .checked_sub(1)
            .and_then(|idx| items.get(idx))
            .map(Identifiable::id)
            .ok_or_else(|| CommandError::InvalidArguments(format!("no entry #{token}")));
    }
    if token.len() < MIN_ID_PREFIX {
        return Err(CommandError::InvalidArguments(format!(
            "`{token}` is neither a list number nor an id prefix"
        )));
    }
    let needle = token.to_ascii_lowercase();
    let mut matches = items
        .iter()
        .map(Identifiable::id)
        .filter(|id| id.to_string().starts_with(&needle));
    match (matches.next(), matches.next()) {
        (Some(id), None) => Ok(id),
        (Some(_), Some(_)) => Err(CommandError::InvalidArguments(format!(
            "id prefix `{token}` is ambiguous"
        ))),
        (None, _) => Err(CommandError::InvalidArguments(format!("no entry `{token}`"))),
    }
}
