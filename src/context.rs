//! Application Context
//!
//! Shared state provided via Leptos Context API.

use leptos::prelude::*;

use notes_core::User;

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Signed-in user (None = signed out) - read
    pub user: ReadSignal<Option<User>>,
    /// Signed-in user - write
    set_user: WriteSignal<Option<User>>,
    /// Note form visibility - read
    pub form_open: ReadSignal<bool>,
    /// Note form visibility - write
    set_form_open: WriteSignal<bool>,
    /// Auth modal visibility - read
    pub auth_open: ReadSignal<bool>,
    /// Auth modal visibility - write
    set_auth_open: WriteSignal<bool>,
}

impl AppContext {
    pub fn new(
        user: (ReadSignal<Option<User>>, WriteSignal<Option<User>>),
        form_open: (ReadSignal<bool>, WriteSignal<bool>),
        auth_open: (ReadSignal<bool>, WriteSignal<bool>),
    ) -> Self {
        Self {
            user: user.0,
            set_user: user.1,
            form_open: form_open.0,
            set_form_open: form_open.1,
            auth_open: auth_open.0,
            set_auth_open: auth_open.1,
        }
    }

    /// Update the signed-in user. Token refreshes report the same user
    /// again; those are not a change.
    pub fn set_user(&self, user: Option<User>) {
        if self.user.get_untracked() != user {
            self.set_user.set(user);
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.with(Option::is_some)
    }

    /// Open the note form, or the sign-in modal when signed out
    pub fn open_form(&self) {
        if self.user.with_untracked(Option::is_some) {
            self.set_form_open.set(true);
        } else {
            self.set_auth_open.set(true);
        }
    }

    pub fn close_form(&self) {
        self.set_form_open.set(false);
    }

    pub fn open_auth(&self) {
        self.set_auth_open.set(true);
    }

    pub fn close_auth(&self) {
        self.set_auth_open.set(false);
    }
}

/// Get the app context
pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
