//! Header Component
//!
//! App title, sign in / sign out and the user's avatar initial.

use leptos::prelude::*;
use leptos::task::spawn_local;

use notes_core::AuthService;

use crate::context::use_app_context;
use crate::store::use_sync;

#[component]
pub fn Header() -> impl IntoView {
    let ctx = use_app_context();
    let sync = use_sync();

    let on_auth_click = move |_| {
        if ctx.user.get_untracked().is_none() {
            ctx.open_auth();
            return;
        }
        let sync = sync.clone();
        spawn_local(async move {
            // the session is dropped locally even if the server call fails
            if let Err(e) = sync.backend().sign_out().await {
                log::warn!("Sign out: {}", e);
            }
            ctx.close_form();
            ctx.set_user(None);
        });
    };

    let initial = move || {
        ctx.user
            .with(|user| user.as_ref().and_then(|u| u.initial()))
            .map(|c| c.to_string())
    };

    view! {
        <header class="app-header">
            <div class="app-title">
                <span class="app-logo">"🧠"</span>
                <h1>"Don't Forget"</h1>
            </div>

            <div class="header-actions">
                <button class="auth-btn" on:click=on_auth_click>
                    {move || if ctx.is_signed_in() { "Sign Out" } else { "Sign In" }}
                </button>
                {move || initial().map(|c| view! { <div class="avatar">{c}</div> })}
            </div>
        </header>
    }
}
