//! Note Form Component
//!
//! Modal form for a new note with an optional label.

use leptos::prelude::*;
use leptos::task::spawn_local;

use notes_core::{NoteCache, NoteInput, Notifier};

use super::LabelAutocomplete;
use crate::context::use_app_context;
use crate::notify::use_toaster;
use crate::store::{use_app_store, use_sync, AppStateStoreFields};

#[component]
pub fn NoteForm() -> impl IntoView {
    let ctx = use_app_context();
    let sync = use_sync();

    let (text, set_text) = signal(String::new());
    let (label, set_label) = signal(String::new());
    let (show_label_input, set_show_label_input) = signal(false);
    let (saving, set_saving) = signal(false);

    let store = use_app_store();
    let labels = Signal::derive(move || store.cache().with(NoteCache::labels));

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if text.with(|t| t.trim().is_empty()) || saving.get() {
            return;
        }
        let label_value = label.get();
        let input = NoteInput::new(text.get(), Some(label_value.as_str()));
        let sync = sync.clone();
        set_saving.set(true);
        spawn_local(async move {
            // failures are already reported; the form stays open
            if sync.add_note(input).await.is_ok() {
                sync.notifier().success("Note saved");
                set_text.set(String::new());
                set_label.set(String::new());
                ctx.close_form();
            }
            set_saving.set(false);
        });
    };

    let toaster = use_toaster();
    let pick_label = move |name: String| {
        toaster.success(&format!("Label \"{}\" selected", name));
        set_label.set(name);
        set_show_label_input.set(false);
    };

    view! {
        <div class="modal-backdrop" on:click=move |_| ctx.close_form()>
            <div class="modal note-form" on:click=|ev| ev.stop_propagation()>
                <div class="modal-header">
                    <h2>"Don't Forget"</h2>
                    <button class="close-btn" title="Close" on:click=move |_| ctx.close_form()>"×"</button>
                </div>

                <form on:submit=submit>
                    <textarea
                        class="note-text"
                        placeholder="What do you need to remember?"
                        autofocus=true
                        prop:value=move || text.get()
                        on:input=move |ev| set_text.set(event_target_value(&ev))
                    ></textarea>

                    <Show
                        when=move || show_label_input.get()
                        fallback=move || view! {
                            <button
                                type="button"
                                class="add-label-btn"
                                on:click=move |_| set_show_label_input.set(true)
                            >
                                "🏷 "
                                {move || {
                                    let current = label.get();
                                    if current.trim().is_empty() { "Add label".to_string() } else { current }
                                }}
                            </button>
                        }
                    >
                        <div class="label-editor">
                            <LabelAutocomplete labels=labels value=label set_value=set_label />
                            <button
                                type="button"
                                class="confirm-btn"
                                title="Done"
                                on:click=move |_| set_show_label_input.set(false)
                            >
                                "✓"
                            </button>
                            <div class="label-chips">
                                <For
                                    each=move || labels.get()
                                    key=|name| name.clone()
                                    children=move |name| {
                                        let chosen = name.clone();
                                        view! {
                                            <button
                                                type="button"
                                                class="label-chip"
                                                on:click=move |_| pick_label(chosen.clone())
                                            >
                                                {name}
                                            </button>
                                        }
                                    }
                                />
                            </div>
                        </div>
                    </Show>

                    <div class="form-actions">
                        <button type="button" class="cancel-btn" on:click=move |_| ctx.close_form()>
                            "Cancel"
                        </button>
                        <button
                            type="submit"
                            class="save-btn"
                            disabled=move || saving.get() || text.with(|t| t.trim().is_empty())
                        >
                            "Save"
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
