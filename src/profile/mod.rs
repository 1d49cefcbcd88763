//! Age bracket resolution and the per-bracket configuration table.
//!
//! Every downstream rule (allowed account types, amount bounds, whether a
//! credit score is shown) reads from [`ProfileConfig`]; nothing else branches
//! on age.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AgeGroup {
    Kids,
    Teens,
    Adults,
}

/// Allowed types and amount bounds for one kind of record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeLimits {
    pub allowed_types: &'static [&'static str],
    pub min_amount: f64,
    pub max_amount: f64,
}

impl TypeLimits {
    /// Returns the canonical spelling of `kind` if it is allowed.
    pub fn canonical(&self, kind: &str) -> Option<&'static str> {
        self.allowed_types
            .iter()
            .copied()
            .find(|allowed| allowed.eq_ignore_ascii_case(kind.trim()))
    }

    pub fn default_type(&self) -> &'static str {
        self.allowed_types.first().copied().unwrap_or("Other")
    }

    pub fn contains_amount(&self, amount: f64) -> bool {
        amount >= self.min_amount && amount <= self.max_amount
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileConfig {
    pub group: AgeGroup,
    pub credit: TypeLimits,
    pub debt: TypeLimits,
    pub show_advanced: bool,
    /// Score shown before any account exists. Kids never get one.
    pub baseline_score: Option<u32>,
}

const KIDS: ProfileConfig = ProfileConfig {
    group: AgeGroup::Kids,
    credit: TypeLimits {
        allowed_types: &["Savings Card", "Allowance Card"],
        min_amount: 0.0,
        max_amount: 100.0,
    },
    debt: TypeLimits {
        allowed_types: &["Allowance Owed", "Lunch Money", "Other"],
        min_amount: 0.0,
        max_amount: 100.0,
    },
    show_advanced: false,
    baseline_score: None,
};

const TEENS: ProfileConfig = ProfileConfig {
    group: AgeGroup::Teens,
    credit: TypeLimits {
        allowed_types: &["Credit Card", "Student Card", "Debit Card"],
        min_amount: 0.0,
        max_amount: 5_000.0,
    },
    debt: TypeLimits {
        allowed_types: &["Credit Card", "Student Loan", "Personal Loan", "Other"],
        min_amount: 0.0,
        max_amount: 10_000.0,
    },
    show_advanced: true,
    baseline_score: Some(650),
};

const ADULTS: ProfileConfig = ProfileConfig {
    group: AgeGroup::Adults,
    credit: TypeLimits {
        allowed_types: &[
            "Credit Card",
            "Personal Loan",
            "Auto Loan",
            "Mortgage",
            "Line of Credit",
            "Other",
        ],
        min_amount: 0.0,
        max_amount: 100_000.0,
    },
    debt: TypeLimits {
        allowed_types: &[
            "Credit Card",
            "Personal Loan",
            "Auto Loan",
            "Student Loan",
            "Mortgage",
            "Medical Debt",
            "Other",
        ],
        min_amount: 0.0,
        max_amount: 1_000_000.0,
    },
    show_advanced: true,
    baseline_score: Some(700),
};

impl AgeGroup {
    pub const KIDS_UPPER: u32 = 13;
    pub const TEENS_UPPER: u32 = 18;

    pub fn from_age(age: Option<u32>) -> Self {
        match age {
            Some(age) if age < Self::KIDS_UPPER => AgeGroup::Kids,
            Some(age) if age < Self::TEENS_UPPER => AgeGroup::Teens,
            _ => AgeGroup::Adults,
        }
    }

    /// Resolves the bracket for an optional birth date string. Missing or
    /// unparseable dates resolve to adults.
    pub fn from_birth_date(birth_date: Option<&str>, today: NaiveDate) -> Self {
        Self::from_age(resolve_age(birth_date, today))
    }

    pub fn config(self) -> &'static ProfileConfig {
        match self {
            AgeGroup::Kids => &KIDS,
            AgeGroup::Teens => &TEENS,
            AgeGroup::Adults => &ADULTS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AgeGroup::Kids => "kids",
            AgeGroup::Teens => "teens",
            AgeGroup::Adults => "adults",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|stamp| stamp.date_naive())
        })
}

/// Whole years between `birth` and `today`, or `None` for a future birth date.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> Option<u32> {
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

pub fn resolve_age(birth_date: Option<&str>, today: NaiveDate) -> Option<u32> {
    let birth = parse_birth_date(birth_date?)?;
    age_on(birth, today)
}
