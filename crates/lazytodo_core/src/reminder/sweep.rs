//! Daily aggregate reminder for todos due today.

use super::notifier::{notify_if_granted, Notification, Notifier};
use crate::model::todo::Todo;
use chrono::NaiveDate;
use log::info;

const SWEEP_TITLE: &str = "Daily Todo Reminder";

/// Result of one daily sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Open todos due on the swept day.
    pub due_today: usize,
    /// Whether the aggregate notification was emitted.
    pub notified: bool,
}

/// Notifies once about all open todos due on `today`.
///
/// Nothing is emitted when no todo is due or permission is not granted.
pub fn run_daily_sweep<N: Notifier + ?Sized>(
    todos: &[Todo],
    today: NaiveDate,
    notifier: &N,
) -> SweepOutcome {
    let due_today = todos
        .iter()
        .filter(|todo| !todo.completed && todo.is_due_on(today))
        .count();

    let notified = due_today > 0
        && notify_if_granted(
            notifier,
            &Notification {
                title: SWEEP_TITLE.to_string(),
                body: format!("You have {due_today} todo(s) due today!"),
                tag: None,
            },
        );

    info!(
        "event=daily_sweep module=reminder status=ok due_today={} notified={}",
        due_today, notified
    );
    SweepOutcome {
        due_today,
        notified,
    }
}

#[cfg(test)]
mod tests {
    use super::run_daily_sweep;
    use crate::model::todo::{Todo, TodoDraft};
    use crate::reminder::notifier::{MemoryNotifier, Permission};
    use chrono::{NaiveDate, Utc};

    fn todo(id: &str, due: Option<NaiveDate>, completed: bool) -> Todo {
        let mut draft = TodoDraft::new(id);
        draft.due_date = due;
        let mut todo = Todo::from_draft(id.to_string(), draft, Utc::now());
        todo.completed = completed;
        todo
    }

    #[test]
    fn counts_only_open_todos_due_today() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let tomorrow = today.succ_opt().unwrap();
        let todos = vec![
            todo("a", Some(today), false),
            todo("b", Some(today), true),
            todo("c", Some(tomorrow), false),
            todo("d", None, false),
            todo("e", Some(today), false),
        ];
        let notifier = MemoryNotifier::granted();

        let outcome = run_daily_sweep(&todos, today, &notifier);

        assert_eq!(outcome.due_today, 2);
        assert!(outcome.notified);
        let delivered = notifier.delivered();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].title, "Daily Todo Reminder");
        assert_eq!(delivered[0].body, "You have 2 todo(s) due today!");
    }

    #[test]
    fn stays_silent_when_nothing_due_or_permission_missing() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let notifier = MemoryNotifier::granted();
        let outcome = run_daily_sweep(&[todo("a", None, false)], today, &notifier);
        assert_eq!(outcome.due_today, 0);
        assert!(!outcome.notified);

        let undecided = MemoryNotifier::new(Permission::Granted);
        let outcome = run_daily_sweep(&[todo("a", Some(today), false)], today, &undecided);
        assert_eq!(outcome.due_today, 1);
        assert!(!outcome.notified);
        assert!(undecided.delivered().is_empty());
    }
}
