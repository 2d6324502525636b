//! Todo state manager.
//!
//! # Responsibility
//! - Provide CRUD over the persisted todo list.
//! - Keep armed reminders in step with todo mutations.
//! - Run due reminders and the daily sweep on `tick`.
//!
//! # Invariants
//! - The list is ordered most-recently-added first.
//! - Every mutation is one read-modify-write of the whole list; a failed
//!   mutation writes nothing.
//! - A todo has an armed reminder only while its reminder is enabled, it has a
//!   due date, and the fire time lies in the future.
//! - Every `tick` first re-reads storage, so timers follow writes made by
//!   other processes.

use crate::model::new_id;
use crate::model::todo::{Todo, TodoDraft, TodoId, TodoPatch};
use crate::model::validation::{validate_title, ValidationError};
use crate::reminder::{
    run_daily_sweep, Clock, Notifier, Reconciled, ReminderScheduler, ReminderSettings,
    ScheduleOutcome, SweepOutcome,
};
use crate::repo::todo_repo::TodoRepository;
use crate::store::StoreError;
use chrono::{NaiveDate, NaiveDateTime};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TodoResult<T> = Result<T, TodoError>;

/// Todo use-case error.
#[derive(Debug)]
pub enum TodoError {
    NotFound(TodoId),
    Validation(ValidationError),
    Store(StoreError),
}

impl TodoError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation_error",
            Self::Store(_) => "store_error",
        }
    }
}

impl Display for TodoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TodoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ValidationError> for TodoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for TodoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Summary of one `tick`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Todo ids whose reminder was delivered.
    pub delivered: Vec<TodoId>,
    /// Todo ids whose reminder came due without permission.
    pub skipped: Vec<TodoId>,
    pub sweep: Option<SweepOutcome>,
}

/// Todo service over a repository, a clock and an owned reminder scheduler.
pub struct TodoService<R: TodoRepository, C: Clock> {
    repo: R,
    clock: C,
    scheduler: ReminderScheduler,
}

impl<R: TodoRepository, C: Clock> TodoService<R, C> {
    pub fn new(repo: R, clock: C, settings: ReminderSettings) -> Self {
        Self {
            repo,
            clock,
            scheduler: ReminderScheduler::new(settings),
        }
    }

    pub fn scheduler(&self) -> &ReminderScheduler {
        &self.scheduler
    }

    /// Returns all todos, most recently added first.
    pub fn list(&self) -> TodoResult<Vec<Todo>> {
        Ok(self.repo.load_todos()?)
    }

    pub fn get(&self, id: &str) -> TodoResult<Todo> {
        self.repo
            .load_todos()?
            .into_iter()
            .find(|todo| todo.id == id)
            .ok_or_else(|| TodoError::NotFound(id.to_string()))
    }

    /// Open todos due on `date`, in list order.
    pub fn due_on(&self, date: NaiveDate) -> TodoResult<Vec<Todo>> {
        Ok(self
            .repo
            .load_todos()?
            .into_iter()
            .filter(|todo| !todo.completed && todo.is_due_on(date))
            .collect())
    }

    /// Creates a todo at the head of the list.
    ///
    /// # Errors
    /// - `Validation` when the title is empty.
    pub fn add(&mut self, draft: TodoDraft) -> TodoResult<Todo> {
        validate_title(&draft.title)?;

        let todo = Todo::from_draft(new_id(), draft, self.clock.utc_now());
        let mut todos = self.repo.load_todos()?;
        todos.insert(0, todo.clone());
        self.repo.save_todos(&todos)?;

        let reminder = self.sync_reminder(&todo);
        info!(
            "event=todo_add module=todo status=ok todo_id={} reminder={}",
            todo.id, reminder
        );
        Ok(todo)
    }

    /// Shallow-merges `patch` into the todo with `id`.
    ///
    /// # Errors
    /// - `NotFound` when no todo has `id`.
    /// - `Validation` when the merged title is empty.
    pub fn update(&mut self, id: &str, patch: &TodoPatch) -> TodoResult<Todo> {
        let mut todos = self.repo.load_todos()?;
        let Some(position) = todos.iter().position(|todo| todo.id == id) else {
            warn!("event=todo_update module=todo status=error error_code=not_found todo_id={id}");
            return Err(TodoError::NotFound(id.to_string()));
        };

        let mut updated = todos[position].clone();
        patch.apply_to(&mut updated);
        updated.validate()?;
        todos[position] = updated.clone();
        self.repo.save_todos(&todos)?;

        let reminder = self.sync_reminder(&updated);
        info!(
            "event=todo_update module=todo status=ok todo_id={} reminder={}",
            updated.id, reminder
        );
        Ok(updated)
    }

    /// Flips `completed` on the todo with `id`.
    pub fn toggle(&mut self, id: &str) -> TodoResult<Todo> {
        let current = self.get(id)?;
        self.update(id, &TodoPatch::completed(!current.completed))
    }

    /// Removes the todo with `id` and cancels its reminder.
    pub fn delete(&mut self, id: &str) -> TodoResult<()> {
        let mut todos = self.repo.load_todos()?;
        let before = todos.len();
        todos.retain(|todo| todo.id != id);
        if todos.len() == before {
            warn!("event=todo_delete module=todo status=error error_code=not_found todo_id={id}");
            return Err(TodoError::NotFound(id.to_string()));
        }
        self.repo.save_todos(&todos)?;

        let cancelled = self.scheduler.cancel(id);
        info!("event=todo_delete module=todo status=ok todo_id={id} reminder_cancelled={cancelled}");
        Ok(())
    }

    /// Arms reminders for every persisted todo that wants one.
    ///
    /// Timers live in memory only, so this runs once after startup.
    pub fn reschedule_all(&mut self) -> TodoResult<usize> {
        let armed = self.resync()?.armed;
        info!("event=reminder_restore module=todo status=ok armed={armed}");
        Ok(armed)
    }

    /// Reconciles armed timers with the persisted list.
    ///
    /// Picks up todos added, changed or deleted through another service on
    /// the same store since the timers were last armed.
    pub fn resync(&mut self) -> TodoResult<Reconciled> {
        let todos = self.repo.load_todos()?;
        let changes = self.scheduler.reconcile(&todos, self.clock.local_now());
        if !changes.is_empty() {
            info!(
                "event=reminder_resync module=todo status=ok armed={} cancelled={}",
                changes.armed, changes.cancelled
            );
        }
        Ok(changes)
    }

    /// Arms the recurring daily sweep relative to the current time.
    pub fn start_daily_sweep(&mut self) -> NaiveDateTime {
        let now = self.clock.local_now();
        self.scheduler.arm_daily_sweep(now)
    }

    /// Sweeps the persisted list for open todos due today.
    pub fn run_daily_sweep<N: Notifier + ?Sized>(&self, notifier: &N) -> TodoResult<SweepOutcome> {
        let todos = self.repo.load_todos()?;
        Ok(run_daily_sweep(
            &todos,
            self.clock.local_now().date(),
            notifier,
        ))
    }

    /// Resyncs timers with storage, then fires every reminder and sweep
    /// that is due now.
    pub fn tick<N: Notifier + ?Sized>(&mut self, notifier: &N) -> TodoResult<TickReport> {
        self.resync()?;
        let due = self.scheduler.tick(self.clock.local_now());
        let mut report = TickReport::default();

        for timer in &due.reminders {
            if timer.fire(notifier) {
                report.delivered.push(timer.todo_id.clone());
            } else {
                report.skipped.push(timer.todo_id.clone());
            }
        }
        if due.sweep_due {
            report.sweep = Some(self.run_daily_sweep(notifier)?);
        }
        Ok(report)
    }

    /// Earliest local instant at which `tick` has work.
    pub fn next_wakeup(&self) -> Option<NaiveDateTime> {
        self.scheduler.next_wakeup()
    }

    fn sync_reminder(&mut self, todo: &Todo) -> &'static str {
        if todo.reminder_date().is_none() {
            return if self.scheduler.cancel(&todo.id) {
                "cancelled"
            } else {
                "none"
            };
        }
        match self.scheduler.schedule_for_todo(todo, self.clock.local_now()) {
            ScheduleOutcome::InPast | ScheduleOutcome::NoDueDate => "none",
            outcome => outcome.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{TodoError, TodoService};
    use crate::model::todo::{TodoDraft, TodoPatch};
    use crate::reminder::{ManualClock, ReminderSettings};
    use crate::repo::todo_repo::KvTodoRepository;
    use crate::store::MemoryKvStore;
    use chrono::NaiveDate;

    #[test]
    fn toggle_missing_todo_is_not_found() {
        let store = MemoryKvStore::new();
        let clock = ManualClock::new(
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        );
        let mut service = TodoService::new(
            KvTodoRepository::new(&store),
            &clock,
            ReminderSettings::default(),
        );

        let err = service.toggle("missing").unwrap_err();
        assert!(matches!(err, TodoError::NotFound(ref id) if id == "missing"));
        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn update_rejects_blank_title_without_writing() {
        let store = MemoryKvStore::new();
        let clock = ManualClock::new(
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        );
        let mut service = TodoService::new(
            KvTodoRepository::new(&store),
            &clock,
            ReminderSettings::default(),
        );
        let todo = service.add(TodoDraft::new("Buy milk")).unwrap();

        let patch = TodoPatch {
            title: Some("  ".to_string()),
            ..TodoPatch::default()
        };
        assert!(matches!(
            service.update(&todo.id, &patch),
            Err(TodoError::Validation(_))
        ));
        assert_eq!(service.get(&todo.id).unwrap().title, "Buy milk");
    }
}
