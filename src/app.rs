//! Don't Forget Frontend App
//!
//! Wires the hosted client, the store and the realtime subscription, then
//! lays out the header, search, list and overlays. A lost subscription is
//! rebuilt with a fresh token after a backoff delay.

use std::sync::Arc;

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use notes_core::realtime::{rejoin_delay_ms, ChannelEvent};
use notes_core::{AuthService, NoteSync, Session, SupabaseClient, SupabaseConfig};

use crate::components::{AuthModal, FloatingActionButton, Header, NoteForm, NoteList, SearchBar, ToastStack};
use crate::context::AppContext;
use crate::notify::Toaster;
use crate::realtime::RealtimeSubscription;
use crate::session;
use crate::store::{AppState, AppSync, NoteStore};

#[component]
pub fn App() -> impl IntoView {
    match SupabaseConfig::from_build_env() {
        Ok(config) => view! { <NotesApp config=config /> }.into_any(),
        Err(e) => {
            log::error!("Configuration error: {}", e);
            let message = e.to_string();
            view! {
                <div class="config-error">
                    <h1>"Configuration error"</h1>
                    <p>{message}</p>
                    <p>"Set SUPABASE_URL and SUPABASE_ANON_KEY when building the app."</p>
                </div>
            }
            .into_any()
        }
    }
}

#[component]
fn NotesApp(config: SupabaseConfig) -> impl IntoView {
    let client = SupabaseClient::new(config);

    // State
    let (user, set_user) = signal(None);
    let (form_open, set_form_open) = signal(false);
    let (auth_open, set_auth_open) = signal(false);
    let ctx = AppContext::new((user, set_user), (form_open, set_form_open), (auth_open, set_auth_open));

    if let Some(saved) = session::load() {
        log::info!("Restoring saved session");
        client.restore_session(saved);
        ctx.set_user(client.current_user());
    }

    // Keep storage and the user signal in step with the client's session
    client.set_session_listener(Arc::new(move |current: Option<&Session>| {
        session::persist(current);
        ctx.set_user(current.map(|s| s.user.clone()));
    }));

    let store = Store::new(AppState::new());
    let toaster = Toaster::new();
    let sync: AppSync = NoteSync::new(client, NoteStore(store), toaster);

    // Provide context to all children
    provide_context(ctx);
    provide_context(store);
    provide_context(toaster);
    provide_context(sync.clone());

    // Bumped to rebuild a lost realtime subscription
    let (generation, set_generation) = signal(0u32);
    let rejoin_attempts = StoredValue::new(0u32);
    let schedule_rejoin = move |from_generation: u32| {
        let attempt = rejoin_attempts.get_value();
        rejoin_attempts.set_value(attempt + 1);
        let delay = rejoin_delay_ms(attempt);
        log::info!("Resubscribing to note changes in {} ms", delay);
        Timeout::new(delay, move || {
            // a user change already rebuilt it
            if generation.get_untracked() == from_generation {
                set_generation.set(from_generation + 1);
            }
        })
        .forget();
    };

    // Reload when the signed-in user changes; resubscribe on that and on loss
    let subscription = StoredValue::new_local(None::<RealtimeSubscription>);
    Effect::new(move |previous: Option<Option<String>>| {
        let current = user.get();
        let this_generation = generation.get();
        subscription.set_value(None);

        let current_id = current.as_ref().map(|u| u.id.clone());
        if previous.as_ref() != Some(&current_id) {
            rejoin_attempts.set_value(0);
            let refresh = sync.clone();
            spawn_local(async move {
                let _ = refresh.refresh().await;
            });
        }

        let Some(current) = current else {
            return current_id;
        };
        let sync = sync.clone();
        spawn_local(async move {
            let client = sync.backend().clone();
            let token = match client.access_token().await {
                Ok(token) => token,
                Err(e) => {
                    log::warn!("Realtime needs a valid session: {}", e);
                    schedule_rejoin(this_generation);
                    return;
                }
            };
            // the user may have changed, or a newer rebuild started, while the
            // token was refreshed
            let same_user =
                user.with_untracked(|u| u.as_ref().map(|u| u.id.as_str()) == Some(current.id.as_str()));
            if !same_user || generation.get_untracked() != this_generation {
                return;
            }
            let on_event = move |event: &ChannelEvent| match event {
                ChannelEvent::Joined => {
                    // changes made while disconnected were missed
                    if rejoin_attempts.get_value() > 0 {
                        rejoin_attempts.set_value(0);
                        let sync = sync.clone();
                        spawn_local(async move {
                            let _ = sync.refresh().await;
                        });
                    }
                }
                ChannelEvent::Change(_) => {
                    let sync = sync.clone();
                    spawn_local(async move {
                        let _ = sync.refresh().await;
                    });
                }
                lost if lost.requires_rejoin() => schedule_rejoin(this_generation),
                _ => {}
            };
            match RealtimeSubscription::subscribe(client.config(), &current.id, &token, on_event) {
                Ok(sub) => subscription.set_value(Some(sub)),
                Err(e) => {
                    log::warn!("Realtime unavailable: {}", e);
                    schedule_rejoin(this_generation);
                }
            }
        });
        current_id
    });

    view! {
        <div class="app-layout">
            <Header />

            <main class="main-content">
                <SearchBar />
                <NoteList />
            </main>

            <FloatingActionButton />

            <Show when=move || form_open.get()>
                <NoteForm />
            </Show>
            <Show when=move || auth_open.get()>
                <AuthModal />
            </Show>

            <ToastStack />
        </div>
    }
}
