//! UI Components
//!
//! Leptos components for the notes page.

mod auth_modal;
mod floating_action_button;
mod header;
mod label_autocomplete;
mod note_card;
mod note_form;
mod note_list;
mod search_bar;
mod toast_stack;

pub use auth_modal::AuthModal;
pub use floating_action_button::FloatingActionButton;
pub use header::Header;
pub use label_autocomplete::LabelAutocomplete;
pub use note_card::NoteCard;
pub use note_form::NoteForm;
pub use note_list::NoteList;
pub use search_bar::SearchBar;
pub use toast_stack::ToastStack;
