pub mod action;
pub mod delivery;
mod interval_scheduler;
mod manager;
mod scheduler;

pub use interval_scheduler::{DeliveryTiming, IntervalDeliveryScheduler};
pub use manager::{
    PauseOutcome, RateOutcome, ResumeOutcome, SessionManager, SessionStatus, StartOutcome,
};
pub use scheduler::{DeliveryScheduler, ScheduledDelivery};
