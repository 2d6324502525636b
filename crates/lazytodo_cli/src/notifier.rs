//! Terminal notification sink.

use lazytodo_core::{Notification, Notifier, Permission};
use std::cell::{Cell, RefCell};
use std::io::Write;

/// Prints notifications as lines on the wrapped writer.
///
/// An undecided permission is granted on request; an explicit `denied` from
/// configuration stays final.
pub struct ConsoleNotifier<W: Write> {
    permission: Cell<Permission>,
    out: RefCell<W>,
}

impl ConsoleNotifier<std::io::Stdout> {
    pub fn stdout(permission: Permission) -> Self {
        Self::new(permission, std::io::stdout())
    }
}

impl<W: Write> ConsoleNotifier<W> {
    pub fn new(permission: Permission, out: W) -> Self {
        Self {
            permission: Cell::new(permission),
            out: RefCell::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write> Notifier for ConsoleNotifier<W> {
    fn permission(&self) -> Permission {
        self.permission.get()
    }

    fn request_permission(&self) -> Permission {
        if self.permission.get() == Permission::Default {
            self.permission.set(Permission::Granted);
        }
        self.permission.get()
    }

    fn notify(&self, notification: &Notification) {
        let mut out = self.out.borrow_mut();
        let _ = writeln!(out, "[{}] {}", notification.title, notification.body);
        let _ = out.flush();
    }
}
