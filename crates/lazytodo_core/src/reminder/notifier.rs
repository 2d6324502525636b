//! Notification side channel.

use log::info;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Tri-state notification permission controlled by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Not decided yet; may be requested.
    #[default]
    Default,
    Granted,
    Denied,
}

impl Permission {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }
}

impl Display for Permission {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "granted" => Ok(Self::Granted),
            "denied" => Ok(Self::Denied),
            other => Err(format!(
                "unsupported permission `{other}`; expected default|granted|denied"
            )),
        }
    }
}

/// One popup as handed to the notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    /// Deduplication tag; reminders use the todo id.
    pub tag: Option<String>,
}

/// Permission-gated, fire-and-forget notification service.
pub trait Notifier {
    fn permission(&self) -> Permission;
    /// Asks the host for permission and returns the resulting state.
    fn request_permission(&self) -> Permission;
    fn notify(&self, notification: &Notification);
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn permission(&self) -> Permission {
        (**self).permission()
    }

    fn request_permission(&self) -> Permission {
        (**self).request_permission()
    }

    fn notify(&self, notification: &Notification) {
        (**self).notify(notification)
    }
}

/// Requests permission once when it is still undecided.
///
/// A `denied` answer is final; callers never retry.
pub fn ensure_permission<N: Notifier + ?Sized>(notifier: &N) -> Permission {
    let current = notifier.permission();
    if current != Permission::Default {
        return current;
    }
    let answer = notifier.request_permission();
    info!(
        "event=notification_permission module=reminder status=ok permission={}",
        answer
    );
    answer
}

/// Emits `notification` only when permission is currently granted.
pub(crate) fn notify_if_granted<N: Notifier + ?Sized>(
    notifier: &N,
    notification: &Notification,
) -> bool {
    if notifier.permission() != Permission::Granted {
        return false;
    }
    notifier.notify(notification);
    true
}

/// Notifier that records deliveries in memory.
#[derive(Debug)]
pub struct MemoryNotifier {
    permission: Cell<Permission>,
    answer: Permission,
    delivered: RefCell<Vec<Notification>>,
}

impl MemoryNotifier {
    /// Starts undecided; a permission request is answered with `answer`.
    pub fn new(answer: Permission) -> Self {
        Self {
            permission: Cell::new(Permission::Default),
            answer,
            delivered: RefCell::new(Vec::new()),
        }
    }

    /// Starts with permission already granted.
    pub fn granted() -> Self {
        let notifier = Self::new(Permission::Granted);
        notifier.permission.set(Permission::Granted);
        notifier
    }

    pub fn set_permission(&self, permission: Permission) {
        self.permission.set(permission);
    }

    pub fn delivered(&self) -> Vec<Notification> {
        self.delivered.borrow().clone()
    }
}

impl Notifier for MemoryNotifier {
    fn permission(&self) -> Permission {
        self.permission.get()
    }

    fn request_permission(&self) -> Permission {
        self.permission.set(self.answer);
        self.answer
    }

    fn notify(&self, notification: &Notification) {
        self.delivered.borrow_mut().push(notification.clone());
    }
}
