//! Toast Notifications
//!
//! [`Toaster`] keeps the visible toasts; each one expires on its own timer.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

use notes_core::config::TOAST_DURATION_MS;
use notes_core::Notifier;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    pub fn class(self) -> &'static str {
        match self {
            ToastKind::Success => "toast toast-success",
            ToastKind::Error => "toast toast-error",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Clone, Copy)]
pub struct Toaster {
    toasts: RwSignal<Vec<Toast>>,
    next_id: StoredValue<u64>,
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new()
    }
}

impl Toaster {
    pub fn new() -> Self {
        Self {
            toasts: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
        }
    }

    /// Toasts currently on screen, oldest first
    pub fn toasts(&self) -> ReadSignal<Vec<Toast>> {
        self.toasts.read_only()
    }

    pub fn push(&self, kind: ToastKind, message: &str) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);
        self.toasts.update(|toasts| {
            toasts.push(Toast {
                id,
                kind,
                message: message.to_string(),
            })
        });

        let toasts = self.toasts;
        Timeout::new(TOAST_DURATION_MS, move || {
            toasts.update(|toasts| toasts.retain(|toast| toast.id != id));
        })
        .forget();
    }

    pub fn dismiss(&self, id: u64) {
        self.toasts.update(|toasts| toasts.retain(|toast| toast.id != id));
    }
}

impl Notifier for Toaster {
    fn success(&self, message: &str) {
        self.push(ToastKind::Success, message);
    }

    fn error(&self, message: &str) {
        self.push(ToastKind::Error, message);
    }
}

/// Get the toaster from context
pub fn use_toaster() -> Toaster {
    expect_context::<Toaster>()
}
