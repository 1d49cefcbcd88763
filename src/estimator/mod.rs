//! Pure derivations over the stores: the synthetic credit score and payoff
//! projections.

pub mod payoff;
pub mod score;

pub use payoff::{project_payoff_months, MAX_PAYOFF_MONTHS};
pub use score::{estimate, ScoreRating, UtilizationRating};
