//! Auth Modal Component
//!
//! Email/password sign in, with a toggle to create an account.

use leptos::prelude::*;
use leptos::task::spawn_local;

use notes_core::{AuthError, AuthService, Notifier};

use crate::context::use_app_context;
use crate::store::use_sync;

#[component]
pub fn AuthModal() -> impl IntoView {
    let ctx = use_app_context();
    let sync = use_sync();

    let (is_sign_up, set_is_sign_up) = signal(false);
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (loading, set_loading) = signal(false);

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if loading.get() {
            return;
        }
        let sync = sync.clone();
        let sign_up = is_sign_up.get();
        let (email, password) = (email.get(), password.get());
        set_loading.set(true);

        spawn_local(async move {
            let auth = sync.backend();
            let result = if sign_up {
                auth.sign_up(&email, &password).await.map(|_| "Account created! Please check your email.")
            } else {
                auth.sign_in(&email, &password).await.map(|_| "Welcome back!")
            };

            match result {
                Ok(message) => {
                    sync.notifier().success(message);
                    ctx.set_user(auth.current_user());
                    ctx.close_auth();
                }
                Err(AuthError::AlreadyRegistered) => {
                    sync.notifier().error(&AuthError::AlreadyRegistered.to_string());
                    set_is_sign_up.set(false);
                }
                Err(e) => {
                    log::warn!("Authentication failed: {}", e);
                    sync.notifier().error(&e.to_string());
                }
            }
            set_loading.set(false);
        });
    };

    view! {
        <div class="modal-backdrop">
            <div class="modal auth-modal">
                <div class="modal-header">
                    <h2>{move || if is_sign_up.get() { "Create Account" } else { "Welcome Back" }}</h2>
                    <button class="close-btn" aria-label="Close" on:click=move |_| ctx.close_auth()>"×"</button>
                </div>

                <form on:submit=submit>
                    <label for="email">"Email"</label>
                    <input
                        type="email"
                        id="email"
                        placeholder="you@example.com"
                        required=true
                        prop:value=move || email.get()
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />

                    <label for="password">"Password"</label>
                    <input
                        type="password"
                        id="password"
                        placeholder="••••••••"
                        required=true
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                    />

                    <button type="submit" class="submit-btn" disabled=move || loading.get()>
                        {move || match (loading.get(), is_sign_up.get()) {
                            (true, _) => "Loading...",
                            (false, true) => "Create Account",
                            (false, false) => "Sign In",
                        }}
                    </button>

                    <button
                        type="button"
                        class="toggle-mode-btn"
                        on:click=move |_| set_is_sign_up.update(|v| *v = !*v)
                    >
                        {move || if is_sign_up.get() {
                            "Already have an account? Sign in"
                        } else {
                            "Don't have an account? Sign up"
                        }}
                    </button>
                </form>
            </div>
        </div>
    }
}
