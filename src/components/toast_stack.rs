//! Toast Stack Component
//!
//! Renders the toaster's live toasts in the corner; click to dismiss.

use leptos::prelude::*;

use crate::notify::{use_toaster, Toast};

#[component]
pub fn ToastStack() -> impl IntoView {
    let toaster = use_toaster();

    view! {
        <div class="toast-stack">
            <For
                each=move || toaster.toasts().get()
                key=|toast: &Toast| toast.id
                children=move |toast: Toast| {
                    let id = toast.id;
                    view! {
                        <div class=toast.kind.class() on:click=move |_| toaster.dismiss(id)>
                            {toast.message}
                        </div>
                    }
                }
            />
        </div>
    }
}
