//! Note List Component
//!
//! Renders the filtered notes, or the loading / empty states. While a
//! search or label filter is on, a count line shows how many notes match.

use leptos::prelude::*;

use notes_core::{Note, NoteFilter};

use super::NoteCard;
use crate::store::{store_filter, use_app_store, AppStateStoreFields};

#[component]
pub fn NoteList() -> impl IntoView {
    let store = use_app_store();

    let loading = move || store.cache().with(|cache| cache.is_loading());
    let has_notes = move || store.cache().with(|cache| !cache.is_empty());
    let filter = Memo::new(move |_| store_filter(&store));
    let visible = Memo::new(move |_| {
        filter.with(|filter| store.cache().with(|cache| cache.visible(filter)))
    });
    let count = move || {
        let total = store.cache().with(|cache| cache.len());
        let shown = visible.with(Vec::len);
        filter.with(|filter| count_line(shown, total, filter))
    };

    view! {
        <div class="note-list">
            {move || {
                if loading() {
                    view! { <div class="note-list-status">"Loading notes..."</div> }.into_any()
                } else if !has_notes() {
                    view! {
                        <div class="note-list-empty">
                            <h3>"No notes yet"</h3>
                            <p>"Add your first note by clicking the + button below"</p>
                        </div>
                    }.into_any()
                } else if visible.with(Vec::is_empty) {
                    view! {
                        <div class="note-list-empty">
                            <h3>"No matching notes"</h3>
                            <p>"Try a different search term or clear your filters"</p>
                        </div>
                    }.into_any()
                } else {
                    view! {
                        {move || count().map(|line| view! { <p class="note-count">{line}</p> })}
                        <div class="note-grid">
                            <For
                                each=move || visible.get()
                                key=|note: &Note| note.id.clone()
                                children=|note: Note| view! { <NoteCard note=note /> }
                            />
                        </div>
                    }.into_any()
                }
            }}
        </div>
    }
}

/// "Showing 2 of 5 notes" while filtering; nothing otherwise
fn count_line(shown: usize, total: usize, filter: &NoteFilter) -> Option<String> {
    if !filter.is_active() {
        return None;
    }
    let noun = if total == 1 { "note" } else { "notes" };
    Some(format!("Showing {} of {} {}", shown, total, noun))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_line_only_while_filtering() {
        assert_eq!(count_line(3, 3, &NoteFilter::default()), None);
        assert_eq!(
            count_line(2, 5, &NoteFilter::new("milk", None)),
            Some("Showing 2 of 5 notes".to_string())
        );
        assert_eq!(
            count_line(1, 1, &NoteFilter::new("", Some("work"))),
            Some("Showing 1 of 1 note".to_string())
        );
    }
}
