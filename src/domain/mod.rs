//! Plain data records for credit accounts, scores, and debts.

pub mod common;
pub mod credit;
pub mod debt;

pub use common::{Displayable, Identifiable};
pub use credit::{CreditAccount, CreditAccountDraft, CreditScore, ScoreFactors};
pub use debt::{Debt, DebtDraft, PaymentRecord};
