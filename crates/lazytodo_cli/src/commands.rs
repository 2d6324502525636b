//! One-shot command execution against an opened context.
//!
//! # Invariants
//! - Domain failures become `ActionResponse` failures; nothing here panics.
//! - Output lines carry user data for the terminal only, never the log.

use crate::cli::Command;
use lazytodo_core::{
    ensure_permission, ActionResponse, AppAuthService, AppContext, AuthResult, Clock, Notifier,
    Reminder, Todo, TodoDraft, TodoPatch,
};

/// Envelope plus any listing lines to print before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub response: ActionResponse,
    pub lines: Vec<String>,
}

impl CommandOutput {
    fn message(response: ActionResponse) -> Self {
        Self {
            response,
            lines: Vec::new(),
        }
    }

    /// Renders the envelope as the final status line.
    pub fn status_line(&self) -> String {
        let response = &self.response;
        match (response.ok, response.code, &response.id) {
            (true, _, Some(id)) => format!("ok: {} (id={id})", response.message),
            (true, _, None) => format!("ok: {}", response.message),
            (false, Some(code), _) => format!("error[{code}]: {}", response.message),
            (false, None, _) => format!("error: {}", response.message),
        }
    }
}

/// Formats one todo as a listing line.
pub fn todo_line(todo: &Todo) -> String {
    let due = todo
        .due_date
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{} [{}] {} priority={} due={} remind={}",
        todo.id,
        if todo.completed { "x" } else { " " },
        todo.title,
        todo.priority,
        due,
        if todo.reminder.enabled { "on" } else { "off" },
    )
}

/// Runs every command except `watch`.
pub fn execute<C: Clock, N: Notifier>(
    ctx: &AppContext,
    command: Command,
    clock: C,
    notifier: &N,
) -> CommandOutput {
    match command {
        Command::Register {
            name,
            email,
            password,
        } => auth_command(ctx, |auth| {
            let session = auth.register(&name, &email, &password)?;
            Ok(ActionResponse::success(
                "Registration successful",
                session.user.map(|user| user.id),
            ))
        }),
        Command::Login { email, password } => auth_command(ctx, |auth| {
            let session = auth.login(&email, &password)?;
            Ok(ActionResponse::success(
                "Login successful",
                session.user.map(|user| user.id),
            ))
        }),
        Command::Logout => auth_command(ctx, |auth| {
            auth.logout()?;
            Ok(ActionResponse::success("Logged out", None))
        }),
        Command::Whoami => auth_command(ctx, |auth| {
            Ok(match auth.current_user() {
                Some(user) => ActionResponse::success(
                    format!("{} <{}>", user.name, user.email),
                    Some(user.id.clone()),
                ),
                None => ActionResponse::success("Not signed in", None),
            })
        }),
        Command::Add {
            title,
            description,
            priority,
            due,
            remind,
        } => {
            let mut draft = TodoDraft::new(title)
                .with_priority(priority)
                .with_reminder(remind);
            if let Some(description) = description {
                draft = draft.with_description(description);
            }
            if let Some(due) = due {
                draft = draft.with_due_date(due);
            }
            match ctx.todos(clock).add(draft) {
                Ok(todo) => {
                    CommandOutput::message(ActionResponse::success("Todo added", Some(todo.id)))
                }
                Err(err) => CommandOutput::message(ActionResponse::from(&err)),
            }
        }
        Command::List { due } => {
            let todos = ctx.todos(clock);
            let listed = match due {
                Some(date) => todos.due_on(date),
                None => todos.list(),
            };
            match listed {
                Ok(list) => CommandOutput {
                    response: ActionResponse::success(format!("{} todo(s)", list.len()), None),
                    lines: list.iter().map(todo_line).collect(),
                },
                Err(err) => CommandOutput::message(ActionResponse::from(&err)),
            }
        }
        Command::Show { id } => match ctx.todos(clock).get(&id) {
            Ok(todo) => {
                let mut lines = vec![todo_line(&todo)];
                if let Some(description) = &todo.description {
                    lines.push(format!("  {description}"));
                }
                lines.push(format!("  created {}", todo.created_at.to_rfc3339()));
                CommandOutput {
                    response: ActionResponse::success("Todo found", Some(todo.id)),
                    lines,
                }
            }
            Err(err) => CommandOutput::message(ActionResponse::from(&err)),
        },
        Command::Update {
            id,
            title,
            description,
            clear_description,
            priority,
            due,
            clear_due,
            remind,
            completed,
        } => {
            let patch = TodoPatch {
                title,
                description: if clear_description {
                    Some(None)
                } else {
                    description.map(Some)
                },
                priority,
                due_date: if clear_due { Some(None) } else { due.map(Some) },
                reminder: remind.map(|enabled| Reminder { enabled }),
                completed,
            };
            match ctx.todos(clock).update(&id, &patch) {
                Ok(todo) => {
                    CommandOutput::message(ActionResponse::success("Todo updated", Some(todo.id)))
                }
                Err(err) => CommandOutput::message(ActionResponse::from(&err)),
            }
        }
        Command::Toggle { id } => match ctx.todos(clock).toggle(&id) {
            Ok(todo) => {
                let state = if todo.completed { "completed" } else { "reopened" };
                CommandOutput::message(ActionResponse::success(
                    format!("Todo {state}"),
                    Some(todo.id),
                ))
            }
            Err(err) => CommandOutput::message(ActionResponse::from(&err)),
        },
        Command::Delete { id } => match ctx.todos(clock).delete(&id) {
            Ok(()) => CommandOutput::message(ActionResponse::success("Todo deleted", Some(id))),
            Err(err) => CommandOutput::message(ActionResponse::from(&err)),
        },
        Command::Sweep => {
            ensure_permission(notifier);
            match ctx.todos(clock).run_daily_sweep(notifier) {
                Ok(outcome) => CommandOutput::message(ActionResponse::success(
                    format!("{} todo(s) due today", outcome.due_today),
                    None,
                )),
                Err(err) => CommandOutput::message(ActionResponse::from(&err)),
            }
        }
        Command::Watch { .. } => CommandOutput::message(ActionResponse::failure(
            "unsupported",
            "watch runs in the foreground loop",
        )),
    }
}

fn auth_command<F>(ctx: &AppContext, run: F) -> CommandOutput
where
    F: FnOnce(&mut AppAuthService<'_>) -> AuthResult<ActionResponse>,
{
    let result = ctx.auth().and_then(|mut auth| run(&mut auth));
    match result {
        Ok(response) => CommandOutput::message(response),
        Err(err) => CommandOutput::message(ActionResponse::from(&err)),
    }
}

#[cfg(test)]
mod tests {
    use super::{execute, todo_line, CommandOutput};
    use crate::cli::Command;
    use chrono::NaiveDate;
    use lazytodo_core::{
        AppConfig, AppContext, ManualClock, MemoryNotifier, Priority, Todo, TodoDraft,
    };

    fn clock() -> ManualClock {
        ManualClock::new(
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        )
    }

    fn run(ctx: &AppContext, command: Command) -> CommandOutput {
        execute(ctx, command, &clock(), &MemoryNotifier::granted())
    }

    #[test]
    fn register_whoami_logout_roundtrip() {
        let ctx = AppContext::open_in_memory(AppConfig::default()).unwrap();

        let registered = run(
            &ctx,
            Command::Register {
                name: "Ann".to_string(),
                email: "a@x.com".to_string(),
                password: "pw".to_string(),
            },
        );
        assert!(registered.response.ok);

        let whoami = run(&ctx, Command::Whoami);
        assert_eq!(whoami.response.message, "Ann <a@x.com>");

        run(&ctx, Command::Logout);
        assert_eq!(run(&ctx, Command::Whoami).response.message, "Not signed in");
    }

    #[test]
    fn failed_login_renders_error_code() {
        let ctx = AppContext::open_in_memory(AppConfig::default()).unwrap();
        let output = run(
            &ctx,
            Command::Login {
                email: "nobody@x.com".to_string(),
                password: "pw".to_string(),
            },
        );

        assert!(!output.response.ok);
        assert_eq!(
            output.status_line(),
            "error[invalid_credentials]: Invalid credentials"
        );
    }

    #[test]
    fn add_then_list_and_delete() {
        let ctx = AppContext::open_in_memory(AppConfig::default()).unwrap();
        let added = run(
            &ctx,
            Command::Add {
                title: "Buy milk".to_string(),
                description: None,
                priority: Priority::High,
                due: NaiveDate::from_ymd_opt(2024, 1, 2),
                remind: true,
            },
        );
        let id = added.response.id.clone().unwrap();

        let listed = run(&ctx, Command::List { due: None });
        assert_eq!(listed.lines.len(), 1);
        assert!(listed.lines[0].contains("Buy milk"));
        assert!(listed.lines[0].contains("due=2024-01-02"));

        let deleted = run(&ctx, Command::Delete { id: id.clone() });
        assert!(deleted.response.ok);
        let again = run(&ctx, Command::Delete { id });
        assert_eq!(again.response.code, Some("not_found"));
    }

    #[test]
    fn update_can_clear_due_date() {
        let ctx = AppContext::open_in_memory(AppConfig::default()).unwrap();
        let id = run(
            &ctx,
            Command::Add {
                title: "Call".to_string(),
                description: Some("mom".to_string()),
                priority: Priority::Medium,
                due: NaiveDate::from_ymd_opt(2024, 1, 3),
                remind: false,
            },
        )
        .response
        .id
        .unwrap();

        let updated = run(
            &ctx,
            Command::Update {
                id: id.clone(),
                title: None,
                description: None,
                clear_description: true,
                priority: None,
                due: None,
                clear_due: true,
                remind: None,
                completed: Some(true),
            },
        );
        assert!(updated.response.ok);

        let shown = run(&ctx, Command::Show { id });
        assert!(shown.lines[0].contains("[x]"));
        assert!(shown.lines[0].contains("due=-"));
        assert_eq!(shown.lines.len(), 2);
    }

    #[test]
    fn sweep_counts_todos_due_today() {
        let ctx = AppContext::open_in_memory(AppConfig::default()).unwrap();
        let notifier = MemoryNotifier::new(lazytodo_core::Permission::Granted);
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        ctx.todos(&clock())
            .add(TodoDraft::new("today").with_due_date(today))
            .unwrap();

        let output = execute(&ctx, Command::Sweep, &clock(), &notifier);

        assert_eq!(output.status_line(), "ok: 1 todo(s) due today");
        assert_eq!(notifier.delivered().len(), 1);
    }

    #[test]
    fn todo_line_marks_completion() {
        let mut todo = Todo::from_draft(
            "t1".to_string(),
            TodoDraft::new("Walk"),
            chrono::Utc::now(),
        );
        assert_eq!(
            todo_line(&todo),
            "t1 [ ] Walk priority=medium due=- remind=off"
        );
        todo.completed = true;
        assert!(todo_line(&todo).starts_with("t1 [x]"));
    }
}
