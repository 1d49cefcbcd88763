pub mod time;
pub mod tracker;
pub mod utils;
pub mod validation;

pub use time::{Clock, ManualClock, SystemClock};
pub use tracker::{FinanceTracker, Screen};
