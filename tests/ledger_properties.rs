use chrono::{NaiveDate, TimeZone, Utc};
use finwell_core::{
    domain::{CreditAccountDraft, DebtDraft},
    errors::FinanceError,
    estimator::{estimate, project_payoff_months},
    ledger::{CreditAccountStore, DebtLedger},
    profile::{resolve_age, AgeGroup},
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
}

#[test]
fn payments_reduce_balance_and_grow_the_log() {
    let now = Utc.with_ymd_and_hms(2026, 6, 15, 9, 0, 0).unwrap();
    let mut ledger = DebtLedger::new();
    let id = ledger
        .add(
            &DebtDraft::new("Card", "Credit Card", 300.0),
            AgeGroup::Adults.config(),
            now,
        )
        .unwrap();

    let first = ledger.record_payment(id, 120.0, today(), now).unwrap();
    assert_eq!((first.previous_balance, first.new_balance), (300.0, 180.0));
    let last = ledger.record_payment(id, 500.0, today(), now).unwrap();
    assert_eq!(last.new_balance, 0.0);

    let debt = ledger.get(id).unwrap();
    assert_eq!(debt.payments.len(), 2);
    assert!(debt.is_paid_off());
    assert_eq!(ledger.aggregate().paid_off_count, 1);
}

#[test]
fn non_positive_payments_change_nothing() {
    let now = Utc.with_ymd_and_hms(2026, 6, 15, 9, 0, 0).unwrap();
    let mut ledger = DebtLedger::new();
    let id = ledger
        .add(
            &DebtDraft::new("Card", "Credit Card", 300.0),
            AgeGroup::Adults.config(),
            now,
        )
        .unwrap();
    for amount in [0.0, -10.0, f64::INFINITY] {
        let err = ledger.record_payment(id, amount, today(), now).unwrap_err();
        assert!(matches!(err, FinanceError::Validation(_)));
    }
    assert!(ledger.get(id).unwrap().payments.is_empty());
    assert_eq!(ledger.get(id).unwrap().current_balance, 300.0);
}

#[test]
fn aggregates_are_stable_across_calls() {
    let now = Utc.with_ymd_and_hms(2026, 6, 15, 9, 0, 0).unwrap();
    let profile = AgeGroup::Adults.config();
    let mut credit = CreditAccountStore::new();
    credit
        .add(&CreditAccountDraft::new("A", "Credit Card", 1_000.0).with_balance(250.0), profile, now)
        .unwrap();
    credit
        .add(&CreditAccountDraft::new("B", "Credit Card", 3_000.0).with_balance(750.0), profile, now)
        .unwrap();
    let stats = credit.aggregate();
    assert_eq!(stats, credit.aggregate());
    assert_eq!(stats.utilization, 25.0);
    assert_eq!(stats.available_credit, 3_000.0);

    let mut debts = DebtLedger::new();
    debts
        .add(&DebtDraft::new("Loan", "Personal Loan", 1_200.0).with_minimum_payment(110.0), profile, now)
        .unwrap();
    let stats = debts.aggregate();
    assert_eq!(stats, debts.aggregate());
    assert_eq!(stats.estimated_payoff_months, 11);
}

#[test]
fn payoff_projection_edges() {
    assert_eq!(project_payoff_months(1_200.0, 110.0, 0.0), Some(11));
    assert_eq!(project_payoff_months(1_200.0, 12.0, 12.0), None);
    assert_eq!(project_payoff_months(0.0, 50.0, 20.0), Some(0));
    assert_eq!(project_payoff_months(500.0, 0.0, 5.0), None);
}

#[test]
fn score_needs_accounts_and_an_eligible_age() {
    let now = Utc.with_ymd_and_hms(2026, 6, 15, 9, 0, 0).unwrap();
    assert!(estimate(&[], AgeGroup::Adults, now).is_none());

    let mut store = CreditAccountStore::new();
    store
        .add(&CreditAccountDraft::new("Piggy", "Savings Card", 80.0), AgeGroup::Kids.config(), now)
        .unwrap();
    assert!(estimate(store.accounts(), AgeGroup::Kids, now).is_none());
    assert!(estimate(store.accounts(), AgeGroup::Teens, now).is_some());
}

#[test]
fn age_group_boundaries() {
    assert_eq!(resolve_age(Some("2013-06-15"), today()), Some(13));
    assert_eq!(AgeGroup::from_birth_date(Some("2013-06-15"), today()), AgeGroup::Teens);
    assert_eq!(AgeGroup::from_birth_date(Some("2013-06-16"), today()), AgeGroup::Kids);
    assert_eq!(AgeGroup::from_birth_date(Some("2008-06-15"), today()), AgeGroup::Adults);
    assert_eq!(AgeGroup::from_birth_date(Some("2008-06-16"), today()), AgeGroup::Teens);
    assert_eq!(AgeGroup::from_birth_date(None, today()), AgeGroup::Adults);
    assert_eq!(AgeGroup::from_birth_date(Some("soon"), today()), AgeGroup::Adults);
    assert_eq!(AgeGroup::from_birth_date(Some("2030-01-01"), today()), AgeGroup::Adults);
}
