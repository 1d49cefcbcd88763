/// Fifty years of monthly payments; anything longer is treated as never.
pub const MAX_PAYOFF_MONTHS: u32 = 600;

/// Estimates how many monthly payments clear `balance`.
///
/// Returns `None` when the payment is not positive, when it does not outpace
/// the interest (the balance fails to drop below its starting value), or when
/// the simulation passes [`MAX_PAYOFF_MONTHS`].
pub fn project_payoff_months(
    balance: f64,
    monthly_payment: f64,
    annual_rate_percent: f64,
) -> Option<u32> {
    if !monthly_payment.is_finite() || monthly_payment <= 0.0 {
        return None;
    }
    if !balance.is_finite() || !annual_rate_percent.is_finite() {
        return None;
    }
    if balance <= 0.0 {
        return Some(0);
    }
    let rate = annual_rate_percent.max(0.0);
    if rate == 0.0 {
        return Some((balance / monthly_payment).ceil() as u32);
    }

    let monthly_rate = rate / 100.0 / 12.0;
    let mut remaining = balance;
    let mut months = 0;
    while remaining > 0.0 {
        if months >= MAX_PAYOFF_MONTHS {
            return None;
        }
        remaining += remaining * monthly_rate - monthly_payment;
        months += 1;
        if remaining >= balance {
            return None;
        }
    }
    Some(months)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rate_divides_and_rounds_up() {
        assert_eq!(project_payoff_months(1200.0, 110.0, 0.0), Some(11));
        assert_eq!(project_payoff_months(1200.0, 100.0, 0.0), Some(12));
    }

    #[test]
    fn break_even_payment_never_pays_off() {
        assert_eq!(project_payoff_months(1000.0, 10.0, 12.0), None);
    }

    #[test]
    fn payment_below_interest_never_pays_off() {
        assert_eq!(project_payoff_months(1000.0, 5.0, 12.0), None);
    }

    #[test]
    fn non_positive_payment_cannot_project() {
        assert_eq!(project_payoff_months(1000.0, 0.0, 5.0), None);
        assert_eq!(project_payoff_months(1000.0, -50.0, 0.0), None);
        assert_eq!(project_payoff_months(1000.0, f64::NAN, 0.0), None);
    }

    #[test]
    fn interest_bearing_balance_converges() {
        // 1000 at 12% with 100/month clears in 11 payments.
        assert_eq!(project_payoff_months(1000.0, 100.0, 12.0), Some(11));
    }

    #[test]
    fn slow_payoff_hits_the_cap() {
        // Barely above interest: the balance drops but needs more than 50 years.
        assert_eq!(project_payoff_months(100_000.0, 1_000.5, 12.0), None);
    }

    #[test]
    fn cleared_balance_needs_no_payments() {
        assert_eq!(project_payoff_months(0.0, 50.0, 10.0), Some(0));
    }
}
