//! Floating Action Button Component

use leptos::prelude::*;

use crate::context::use_app_context;

/// Round "+" button; opens the note form, or sign-in when signed out
#[component]
pub fn FloatingActionButton() -> impl IntoView {
    let ctx = use_app_context();

    view! {
        <button class="fab" title="Add new note" aria-label="Add new note" on:click=move |_| ctx.open_form()>
            "+"
        </button>
    }
}
