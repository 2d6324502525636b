//! Reminder scheduling and notification delivery.
//!
//! # Responsibility
//! - Compute wall-clock fire times for per-todo reminders and the daily sweep.
//! - Hold armed timers keyed by todo id so they can be replaced or cancelled.
//! - Gate every notification on the notifier's current permission.
//!
//! # Invariants
//! - At most one armed reminder exists per todo id.
//! - Timers are plain data advanced by `tick`; nothing fires on its own.
//! - Without `granted` permission, firings are dropped silently.

pub mod clock;
pub mod notifier;
pub mod scheduler;
pub mod sweep;

pub use clock::{Clock, ManualClock, SystemClock};
pub use notifier::{ensure_permission, MemoryNotifier, Notification, Notifier, Permission};
pub use scheduler::{
    next_daily_instant, DueWork, Reconciled, ReminderScheduler, ReminderSettings, ReminderTimer,
    ScheduleOutcome, DEFAULT_REMINDER_HOUR, DEFAULT_SWEEP_INTERVAL_HOURS,
};
pub use sweep::{run_daily_sweep, SweepOutcome};
