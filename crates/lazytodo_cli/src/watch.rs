//! Foreground reminder loop.
//!
//! # Invariants
//! - Runs on a current-thread runtime; services never cross threads.
//! - Each wakeup is capped at `max_sleep`, so clock jumps and writes from
//!   other `lazytodo` processes are picked up.
//! - One ctrl-c listener lives for the whole loop.

use lazytodo_core::{ensure_permission, AppContext, Clock, Notifier, Permission, TodoResult};
use log::{info, warn};
use std::future::Future;
use std::time::Duration;

/// Re-arms persisted reminders and delivers them until ctrl-c.
pub fn run_watch<C: Clock + Copy, N: Notifier>(
    ctx: &AppContext,
    clock: C,
    notifier: &N,
    max_sleep: Duration,
) -> std::io::Result<TodoResult<()>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(watch_loop(
        ctx,
        clock,
        notifier,
        max_sleep,
        tokio::signal::ctrl_c(),
    )))
}

/// Ticks until `shutdown` resolves; `shutdown` is polled by every wait.
async fn watch_loop<C, N, F>(
    ctx: &AppContext,
    clock: C,
    notifier: &N,
    max_sleep: Duration,
    shutdown: F,
) -> TodoResult<()>
where
    C: Clock + Copy,
    N: Notifier,
    F: Future<Output = std::io::Result<()>>,
{
    if ensure_permission(notifier) != Permission::Granted {
        warn!("event=watch_start module=cli status=degraded reason=permission_not_granted");
    }

    let mut todos = ctx.todos(clock);
    let armed = todos.reschedule_all()?;
    let sweep_at = todos.start_daily_sweep();
    info!(
        "event=watch_start module=cli status=ok armed={armed} sweep_at={}",
        sweep_at.format("%Y-%m-%dT%H:%M:%S")
    );

    tokio::pin!(shutdown);

    loop {
        let report = todos.tick(notifier)?;
        if !report.delivered.is_empty() || !report.skipped.is_empty() || report.sweep.is_some() {
            info!(
                "event=watch_tick module=cli status=ok delivered={} skipped={} swept={}",
                report.delivered.len(),
                report.skipped.len(),
                report.sweep.is_some()
            );
        }

        let pause = sleep_for(todos.next_wakeup(), clock, max_sleep);
        tokio::select! {
            _ = tokio::time::sleep(pause) => {}
            _ = &mut shutdown => {
                info!("event=watch_stop module=cli status=ok");
                return Ok(());
            }
        }
    }
}

/// Time until `next`, clamped to `0..=max_sleep`.
fn sleep_for<C: Clock>(
    next: Option<chrono::NaiveDateTime>,
    clock: C,
    max_sleep: Duration,
) -> Duration {
    let Some(next) = next else {
        return max_sleep;
    };
    (next - clock.local_now())
        .to_std()
        .map(|until| until.min(max_sleep))
        .unwrap_or(Duration::ZERO)
}
