use chrono::{DateTime, Utc};

use crate::domain::{CreditAccount, CreditScore, ScoreFactors};
use crate::profile::AgeGroup;

const PAYMENT_HISTORY_WEIGHT: f64 = 35.0;
const NEW_CREDIT_POINTS: u32 = 10;

/// Computes a synthetic score from the current accounts.
///
/// Returns `None` for kids and for an empty account list; neither should show
/// a score. The score is `300 + sum(contributions)`, clamped to 300..=850.
pub fn estimate(
    accounts: &[CreditAccount],
    group: AgeGroup,
    now: DateTime<Utc>,
) -> Option<CreditScore> {
    if group == AgeGroup::Kids || accounts.is_empty() {
        return None;
    }
    let factors = score_factors(accounts);
    let raw = (f64::from(CreditScore::MIN) + f64::from(factors.total())).round();
    let score = raw.clamp(f64::from(CreditScore::MIN), f64::from(CreditScore::MAX)) as u32;
    Some(CreditScore {
        score,
        last_updated: now,
        factors,
    })
}

/// The score shown before any account exists, when the bracket has one.
pub fn baseline(group: AgeGroup, now: DateTime<Utc>) -> Option<CreditScore> {
    group.config().baseline_score.map(|score| CreditScore {
        score,
        last_updated: now,
        factors: ScoreFactors::default(),
    })
}

pub fn score_factors(accounts: &[CreditAccount]) -> ScoreFactors {
    let count = accounts.len();
    // No payment history is tracked yet, so every account counts as on time.
    let on_time = count;
    let payment_history = if count > 0 {
        (on_time as f64 / count as f64 * PAYMENT_HISTORY_WEIGHT).round() as u32
    } else {
        0
    };
    ScoreFactors {
        payment_history,
        credit_utilization: utilization_points(aggregate_utilization(accounts)),
        credit_age: match count {
            c if c > 2 => 15,
            c if c > 1 => 10,
            _ => 5,
        },
        credit_mix: if count > 1 { 10 } else { 5 },
        new_credit: NEW_CREDIT_POINTS,
    }
}

pub fn utilization_points(utilization: f64) -> u32 {
    if utilization < 30.0 {
        30
    } else if utilization < 50.0 {
        20
    } else if utilization < 70.0 {
        10
    } else {
        0
    }
}

fn aggregate_utilization(accounts: &[CreditAccount]) -> f64 {
    let limit: f64 = accounts.iter().map(|a| a.credit_limit).sum();
    let balance: f64 = accounts.iter().map(|a| a.current_balance).sum();
    if limit > 0.0 {
        balance / limit * 100.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ScoreRating {
    pub fn for_score(score: u32) -> Self {
        match score {
            s if s >= 750 => Self::Excellent,
            s if s >= 700 => Self::Good,
            s if s >= 650 => Self::Fair,
            _ => Self::Poor,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtilizationRating {
    Excellent,
    Good,
    Fair,
    High,
}

impl UtilizationRating {
    pub fn for_utilization(utilization: f64) -> Self {
        if utilization < 30.0 {
            Self::Excellent
        } else if utilization < 50.0 {
            Self::Good
        } else if utilization < 70.0 {
            Self::Fair
        } else {
            Self::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::High => "Needs improvement",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap()
    }

    fn account(limit: f64, balance: f64) -> CreditAccount {
        CreditAccount {
            id: Uuid::new_v4(),
            name: "Card".into(),
            kind: "Credit Card".into(),
            credit_limit: limit,
            current_balance: balance,
            interest_rate: 19.9,
            minimum_payment: 25.0,
            due_date: None,
            notes: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    #[test]
    fn single_low_utilization_account_scores_385() {
        let score = estimate(&[account(1000.0, 100.0)], AgeGroup::Adults, now()).unwrap();
        assert_eq!(score.score, 385);
        assert_eq!(
            score.factors,
            ScoreFactors {
                payment_history: 35,
                credit_utilization: 30,
                credit_age: 5,
                credit_mix: 5,
                new_credit: 10,
            }
        );
        assert_eq!(score.last_updated, now());
    }

    #[test]
    fn three_accounts_under_thirty_percent_score_400() {
        let accounts = [
            account(1000.0, 100.0),
            account(2000.0, 200.0),
            account(3000.0, 300.0),
        ];
        assert_eq!(estimate(&accounts, AgeGroup::Teens, now()).unwrap().score, 400);
    }

    #[test]
    fn two_accounts_at_sixty_percent_score_375() {
        let accounts = [account(1000.0, 600.0), account(1000.0, 600.0)];
        assert_eq!(estimate(&accounts, AgeGroup::Adults, now()).unwrap().score, 375);
    }

    #[test]
    fn over_limit_account_scores_355() {
        let score = estimate(&[account(500.0, 800.0)], AgeGroup::Adults, now()).unwrap();
        assert_eq!(score.factors.credit_utilization, 0);
        assert_eq!(score.score, 355);
    }

    #[test]
    fn kids_and_empty_lists_get_no_score() {
        assert!(estimate(&[], AgeGroup::Adults, now()).is_none());
        assert!(estimate(&[account(100.0, 0.0)], AgeGroup::Kids, now()).is_none());
    }

    #[test]
    fn baseline_follows_profile_table() {
        assert_eq!(baseline(AgeGroup::Teens, now()).unwrap().score, 650);
        assert_eq!(baseline(AgeGroup::Adults, now()).unwrap().score, 700);
        assert!(baseline(AgeGroup::Kids, now()).is_none());
    }

    #[test]
    fn ratings_use_display_thresholds() {
        assert_eq!(ScoreRating::for_score(760), ScoreRating::Excellent);
        assert_eq!(ScoreRating::for_score(700), ScoreRating::Good);
        assert_eq!(ScoreRating::for_score(385), ScoreRating::Poor);
        assert_eq!(
            UtilizationRating::for_utilization(45.0),
            UtilizationRating::Good
        );
        assert_eq!(UtilizationRating::for_utilization(70.0).label(), "Needs improvement");
    }
}
