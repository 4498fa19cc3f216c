//! Service layer for business logic
//!
//! - `Registrar`: code assignment with the length growth policy
//! - `Redirector`: code lookup plus hit scheduling
//! - `StatsEngine`: hit counters and windowed counts

mod redirect;
mod registrar;
mod stats;

pub use redirect::Redirector;
pub use registrar::{AssignPolicy, Registrar};
pub use stats::{
    DAY_NANOS, LinkStats, StatsEngine, WEEK_NANOS, increment_counter_in, increment_week_log_in,
    now_nanos,
};
