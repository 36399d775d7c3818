pub mod aggregate;
pub mod replay;

pub use aggregate::{portfolio_history, portfolio_stats};
pub use replay::{ReplayOutcome, replay};
