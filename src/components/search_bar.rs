//! Search Bar Component
//!
//! Free-text search plus one chip per label in use.

use leptos::prelude::*;

use notes_core::NoteCache;

use crate::store::{store_clear_label, store_toggle_label, use_app_store, AppStateStoreFields};

#[component]
pub fn SearchBar() -> impl IntoView {
    let store = use_app_store();
    let labels = Memo::new(move |_| store.cache().with(NoteCache::labels));

    view! {
        <div class="search-bar">
            <div class="search-input-row">
                <span class="search-icon">"🔍"</span>
                <input
                    type="text"
                    placeholder="Search notes..."
                    prop:value=move || store.search().get()
                    on:input=move |ev| store.search().set(event_target_value(&ev))
                />
                <Show when=move || store.search().with(|s| !s.is_empty())>
                    <button
                        class="clear-search-btn"
                        title="Clear search"
                        on:click=move |_| store.search().set(String::new())
                    >
                        "×"
                    </button>
                </Show>
            </div>

            <Show when=move || labels.with(|l| !l.is_empty())>
                <div class="label-filter">
                    <For
                        each=move || labels.get()
                        key=|label| label.clone()
                        children=move |label| {
                            let name = label.clone();
                            let active = {
                                let name = label.clone();
                                move || store.active_label().with(|a| a.as_deref() == Some(name.as_str()))
                            };
                            view! {
                                <button
                                    class=move || if active() { "label-chip active" } else { "label-chip" }
                                    on:click=move |_| store_toggle_label(&store, &name)
                                >
                                    {label}
                                </button>
                            }
                        }
                    />
                    <Show when=move || store.active_label().with(Option::is_some)>
                        <button class="clear-filter-btn" on:click=move |_| store_clear_label(&store)>
                            "Clear filter"
                        </button>
                    </Show>
                </div>
            </Show>
        </div>
    }
}
