//! One-shot reminder timers and the recurring daily sweep timer.
//!
//! # Invariants
//! - `timers` holds at most one entry per todo id.
//! - A reminder is armed only when its fire time is strictly in the future.
//! - `next_sweep_at`, once armed, is always after the last processed tick.

use super::notifier::{notify_if_granted, Notification, Notifier};
use crate::model::todo::{Todo, TodoId};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use log::{debug, info};
use std::collections::{BTreeMap, BTreeSet};

pub const DEFAULT_REMINDER_HOUR: u32 = 6;
pub const DEFAULT_SWEEP_INTERVAL_HOURS: u32 = 24;

const REMINDER_TITLE: &str = "Todo Reminder";

/// Scheduling knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderSettings {
    /// Local hour (0..=23) at which reminders and the daily sweep fire.
    pub hour: u32,
    /// Period between daily sweeps.
    pub sweep_interval: Duration,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            hour: DEFAULT_REMINDER_HOUR,
            sweep_interval: Duration::hours(i64::from(DEFAULT_SWEEP_INTERVAL_HOURS)),
        }
    }
}

impl ReminderSettings {
    fn fire_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN)
    }
}

/// Armed one-shot reminder for a single todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderTimer {
    pub todo_id: TodoId,
    pub title: String,
    pub fire_at: NaiveDateTime,
}

impl ReminderTimer {
    pub fn notification(&self) -> Notification {
        Notification {
            title: REMINDER_TITLE.to_string(),
            body: format!("Don't forget: {}", self.title),
            tag: Some(self.todo_id.clone()),
        }
    }

    /// Emits this reminder when permission is granted.
    pub fn fire<N: Notifier + ?Sized>(&self, notifier: &N) -> bool {
        let delivered = notify_if_granted(notifier, &self.notification());
        info!(
            "event=reminder_fire module=reminder status={} todo_id={}",
            if delivered { "ok" } else { "skipped" },
            self.todo_id
        );
        delivered
    }
}

/// Result of asking the scheduler to arm a todo reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    Armed { fire_at: NaiveDateTime },
    /// Armed and superseded an earlier timer for the same todo.
    Replaced { fire_at: NaiveDateTime },
    /// Fire time already passed; no timer is armed.
    InPast,
    /// Todo has no due date; no timer is armed.
    NoDueDate,
}

impl ScheduleOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Armed { .. } => "armed",
            Self::Replaced { .. } => "replaced",
            Self::InPast => "in_past",
            Self::NoDueDate => "no_due_date",
        }
    }
}

/// Work that became due during a `tick`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DueWork {
    /// Expired reminders, ordered by fire time.
    pub reminders: Vec<ReminderTimer>,
    pub sweep_due: bool,
}

/// Changes made by `ReminderScheduler::reconcile`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reconciled {
    /// Timers newly armed or moved to a new fire time.
    pub armed: usize,
    /// Timers dropped because their todo no longer wants one.
    pub cancelled: usize,
}

impl Reconciled {
    pub fn is_empty(&self) -> bool {
        self.armed == 0 && self.cancelled == 0
    }
}

/// Timer table driven by explicit ticks on the caller's execution context.
#[derive(Debug, Clone, Default)]
pub struct ReminderScheduler {
    settings: ReminderSettings,
    timers: BTreeMap<TodoId, ReminderTimer>,
    next_sweep_at: Option<NaiveDateTime>,
}

impl ReminderScheduler {
    pub fn new(settings: ReminderSettings) -> Self {
        Self {
            settings,
            timers: BTreeMap::new(),
            next_sweep_at: None,
        }
    }

    pub fn settings(&self) -> ReminderSettings {
        self.settings
    }

    /// Local instant at which a reminder for `due_date` fires.
    pub fn reminder_instant(&self, due_date: NaiveDate) -> NaiveDateTime {
        due_date.and_time(self.settings.fire_time())
    }

    /// Arms (or re-arms) the reminder for `todo` relative to `now`.
    ///
    /// Any earlier timer for the same todo is dropped first.
    pub fn schedule_for_todo(&mut self, todo: &Todo, now: NaiveDateTime) -> ScheduleOutcome {
        let previous = self.timers.remove(&todo.id);

        let Some(due_date) = todo.due_date else {
            return ScheduleOutcome::NoDueDate;
        };
        let fire_at = self.reminder_instant(due_date);
        if fire_at <= now {
            debug!(
                "event=reminder_schedule module=reminder status=skipped reason=in_past todo_id={}",
                todo.id
            );
            return ScheduleOutcome::InPast;
        }

        self.timers.insert(
            todo.id.clone(),
            ReminderTimer {
                todo_id: todo.id.clone(),
                title: todo.title.clone(),
                fire_at,
            },
        );
        if previous.is_some() {
            ScheduleOutcome::Replaced { fire_at }
        } else {
            ScheduleOutcome::Armed { fire_at }
        }
    }

    /// Drops the armed reminder for `todo_id`; returns whether one existed.
    pub fn cancel(&mut self, todo_id: &str) -> bool {
        self.timers.remove(todo_id).is_some()
    }

    /// Brings the timer table in line with `todos`, the full persisted list.
    ///
    /// Timers for todos that are gone, no longer want a reminder, or lack a
    /// due date are dropped. A timer whose fire time is unchanged is kept even
    /// when already due, so the next `tick` still fires it.
    pub fn reconcile(&mut self, todos: &[Todo], now: NaiveDateTime) -> Reconciled {
        let mut report = Reconciled::default();
        let mut wanted = BTreeSet::new();

        for todo in todos {
            let Some(due_date) = todo.reminder_date() else {
                continue;
            };
            let fire_at = self.reminder_instant(due_date);
            wanted.insert(todo.id.as_str());

            let unchanged = self
                .timers
                .get(&todo.id)
                .is_some_and(|timer| timer.fire_at == fire_at);
            if unchanged {
                if let Some(timer) = self.timers.get_mut(&todo.id) {
                    timer.title.clone_from(&todo.title);
                }
                continue;
            }
            if let ScheduleOutcome::Armed { .. } | ScheduleOutcome::Replaced { .. } =
                self.schedule_for_todo(todo, now)
            {
                report.armed += 1;
            }
        }

        let before = self.timers.len();
        self.timers.retain(|id, _| wanted.contains(id.as_str()));
        report.cancelled = before - self.timers.len();
        report
    }

    pub fn timer(&self, todo_id: &str) -> Option<&ReminderTimer> {
        self.timers.get(todo_id)
    }

    pub fn pending_count(&self) -> usize {
        self.timers.len()
    }

    /// Arms the daily sweep at the next configured hour after `now`.
    pub fn arm_daily_sweep(&mut self, now: NaiveDateTime) -> NaiveDateTime {
        let next = next_daily_instant(now, self.settings.hour);
        self.next_sweep_at = Some(next);
        info!(
            "event=daily_sweep_arm module=reminder status=ok next_at={}",
            next.format("%Y-%m-%dT%H:%M:%S")
        );
        next
    }

    pub fn next_sweep_at(&self) -> Option<NaiveDateTime> {
        self.next_sweep_at
    }

    /// Earliest instant at which `tick` will have work.
    pub fn next_wakeup(&self) -> Option<NaiveDateTime> {
        let earliest_timer = self.timers.values().map(|timer| timer.fire_at).min();
        match (earliest_timer, self.next_sweep_at) {
            (Some(timer), Some(sweep)) => Some(timer.min(sweep)),
            (timer, sweep) => timer.or(sweep),
        }
    }

    /// Removes and returns everything due at `now`.
    ///
    /// A due sweep is re-armed by whole intervals past `now`, so a long pause
    /// yields a single sweep rather than a burst.
    pub fn tick(&mut self, now: NaiveDateTime) -> DueWork {
        let due_ids = self
            .timers
            .iter()
            .filter(|(_, timer)| timer.fire_at <= now)
            .map(|(id, _)| id.clone())
            .collect::<Vec<_>>();
        let mut reminders = due_ids
            .iter()
            .filter_map(|id| self.timers.remove(id))
            .collect::<Vec<_>>();
        reminders.sort_by(|a, b| {
            a.fire_at
                .cmp(&b.fire_at)
                .then_with(|| a.todo_id.cmp(&b.todo_id))
        });

        let mut sweep_due = false;
        if let Some(mut next) = self.next_sweep_at {
            if next <= now {
                sweep_due = true;
                let step = if self.settings.sweep_interval > Duration::zero() {
                    self.settings.sweep_interval
                } else {
                    Duration::hours(i64::from(DEFAULT_SWEEP_INTERVAL_HOURS))
                };
                while next <= now {
                    next += step;
                }
                self.next_sweep_at = Some(next);
            }
        }

        DueWork {
            reminders,
            sweep_due,
        }
    }
}

/// Next occurrence of `hour:00` local time: today if not yet passed, else tomorrow.
pub fn next_daily_instant(now: NaiveDateTime, hour: u32) -> NaiveDateTime {
    let fire_time = NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
    let today = now.date().and_time(fire_time);
    if today < now {
        today + Duration::days(1)
    } else {
        today
    }
}

#[cfg(test)]
mod tests {
    use super::{next_daily_instant, ReminderScheduler, ReminderSettings, ScheduleOutcome};
    use crate::model::todo::{Todo, TodoDraft};
    use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn todo_due(id: &str, due: NaiveDate) -> Todo {
        Todo::from_draft(
            id.to_string(),
            TodoDraft::new(format!("task {id}"))
                .with_due_date(due)
                .with_reminder(true),
            Utc::now(),
        )
    }

    #[test]
    fn next_daily_instant_uses_today_until_the_hour_passes() {
        let cases = [
            (at(2024, 1, 1, 5, 59), at(2024, 1, 1, 6, 0)),
            (at(2024, 1, 1, 6, 0), at(2024, 1, 1, 6, 0)),
            (at(2024, 1, 1, 6, 1), at(2024, 1, 2, 6, 0)),
            (at(2024, 12, 31, 23, 0), at(2025, 1, 1, 6, 0)),
        ];
        for (now, expected) in cases {
            assert_eq!(next_daily_instant(now, 6), expected, "now={now}");
        }
    }

    #[test]
    fn reminder_fires_at_six_on_due_date() {
        let mut scheduler = ReminderScheduler::default();
        let todo = todo_due("a", NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());

        let outcome = scheduler.schedule_for_todo(&todo, at(2024, 1, 1, 12, 0));
        assert_eq!(
            outcome,
            ScheduleOutcome::Armed {
                fire_at: at(2024, 1, 2, 6, 0)
            }
        );
        assert_eq!(scheduler.pending_count(), 1);
    }

    #[test]
    fn past_fire_time_arms_nothing() {
        let mut scheduler = ReminderScheduler::default();
        let todo = todo_due("a", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());

        assert_eq!(
            scheduler.schedule_for_todo(&todo, at(2024, 1, 1, 6, 0)),
            ScheduleOutcome::InPast
        );
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn rescheduling_replaces_instead_of_duplicating() {
        let mut scheduler = ReminderScheduler::default();
        let mut todo = todo_due("a", NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        let now = at(2024, 1, 1, 0, 0);
        scheduler.schedule_for_todo(&todo, now);

        todo.due_date = NaiveDate::from_ymd_opt(2024, 1, 9);
        let outcome = scheduler.schedule_for_todo(&todo, now);

        assert_eq!(
            outcome,
            ScheduleOutcome::Replaced {
                fire_at: at(2024, 1, 9, 6, 0)
            }
        );
        assert_eq!(scheduler.pending_count(), 1);
        assert!(scheduler.cancel("a"));
        assert!(!scheduler.cancel("a"));
    }

    #[test]
    fn tick_returns_due_reminders_in_fire_order() {
        let mut scheduler = ReminderScheduler::default();
        let now = at(2024, 1, 1, 0, 0);
        for (id, month, day) in [("late", 1, 3), ("early", 1, 2), ("later", 2, 1)] {
            let due = NaiveDate::from_ymd_opt(2024, month, day).unwrap();
            scheduler.schedule_for_todo(&todo_due(id, due), now);
        }

        let due = scheduler.tick(at(2024, 1, 3, 6, 0));
        let ids = due
            .reminders
            .iter()
            .map(|timer| timer.todo_id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["early", "late"]);
        assert!(!due.sweep_due);
        assert_eq!(scheduler.pending_count(), 1);
        assert_eq!(scheduler.next_wakeup(), Some(at(2024, 2, 1, 6, 0)));
    }

    #[test]
    fn sweep_fires_once_after_long_pause_and_rearms_in_future() {
        let mut scheduler = ReminderScheduler::new(ReminderSettings::default());
        scheduler.arm_daily_sweep(at(2024, 1, 1, 7, 0));
        assert_eq!(scheduler.next_sweep_at(), Some(at(2024, 1, 2, 6, 0)));

        assert!(!scheduler.tick(at(2024, 1, 2, 5, 59)).sweep_due);
        let due = scheduler.tick(at(2024, 1, 5, 9, 0));
        assert!(due.sweep_due);
        assert_eq!(scheduler.next_sweep_at(), Some(at(2024, 1, 6, 6, 0)));
        assert!(!scheduler.tick(at(2024, 1, 5, 9, 1)).sweep_due);
    }

    #[test]
    fn custom_hour_and_interval_are_honored() {
        let mut scheduler = ReminderScheduler::new(ReminderSettings {
            hour: 8,
            sweep_interval: Duration::hours(12),
        });
        scheduler.arm_daily_sweep(at(2024, 1, 1, 7, 0));
        assert_eq!(scheduler.next_sweep_at(), Some(at(2024, 1, 1, 8, 0)));

        assert!(scheduler.tick(at(2024, 1, 1, 8, 0)).sweep_due);
        assert_eq!(scheduler.next_sweep_at(), Some(at(2024, 1, 1, 20, 0)));
    }
}
