//! Note Card Component

use chrono::{DateTime, Local, TimeZone};
use leptos::prelude::*;
use leptos::task::spawn_local;

use notes_core::{Note, Notifier};

use crate::notify::use_toaster;
use crate::store::{store_set_label, use_app_store, use_sync};

/// `Oct 17, 08:05 PM` style creation time
pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%b %-d, %I:%M %p").to_string()
}

#[component]
pub fn NoteCard(note: Note) -> impl IntoView {
    let store = use_app_store();
    let sync = use_sync();
    let toaster = use_toaster();

    let pending = note.is_provisional();
    let created = format_timestamp(&note.created_at.with_timezone(&Local));
    let id = note.id.clone();

    let delete = move |_| {
        let sync = sync.clone();
        let id = id.clone();
        spawn_local(async move {
            if sync.delete_note(&id).await.is_ok() {
                sync.notifier().success("Note deleted");
            }
        });
    };

    let label_chip = note.label.clone().map(|label| {
        let chosen = label.clone();
        view! {
            <button
                class="label-chip"
                on:click=move |ev| {
                    ev.stop_propagation();
                    store_set_label(&store, &chosen);
                    toaster.success(&format!("Filtered by \"{}\"", chosen));
                }
            >
                {label}
            </button>
        }
    });

    view! {
        <div class=if pending { "note-card pending" } else { "note-card" }>
            <div class="note-text">{note.text}</div>
            <div class="note-footer">
                <div class="note-meta">
                    {label_chip}
                    <span class="note-date">{created}</span>
                </div>
                <button
                    class="delete-btn"
                    title="Delete note"
                    aria-label="Delete note"
                    disabled=pending
                    on:click=delete
                >
                    "🗑"
                </button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_format_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 0).unwrap();
        assert_eq!(format_timestamp(&at), "Mar 5, 02:07 PM");

        let morning = Utc.with_ymd_and_hms(2024, 12, 25, 9, 30, 0).unwrap();
        assert_eq!(format_timestamp(&morning), "Dec 25, 09:30 AM");
    }
}
