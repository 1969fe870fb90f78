//! Label Autocomplete Component
//!
//! Label input for the note form with fuzzy suggestions drawn from the
//! labels already in use.

use leptos::prelude::*;

const MAX_SUGGESTIONS: usize = 5;

/// Simple fuzzy match: check if query chars appear in order in the target
pub fn fuzzy_match(query: &str, target: &str) -> bool {
    let query = query.to_lowercase();
    let target = target.to_lowercase();

    let mut target_chars = target.chars();
    for query_char in query.chars() {
        loop {
            match target_chars.next() {
                Some(c) if c == query_char => break,
                Some(_) => continue,
                None => return false,
            }
        }
    }
    true
}

/// Suggestions for `query`, excluding an exact (case-insensitive) match.
pub fn suggest_labels(query: &str, labels: &[String]) -> Vec<String> {
    let query = query.trim();
    if query.is_empty() {
        return vec![];
    }
    labels
        .iter()
        .filter(|label| !label.eq_ignore_ascii_case(query) && fuzzy_match(query, label))
        .take(MAX_SUGGESTIONS)
        .cloned()
        .collect()
}

/// Label input with suggestions
///
/// Props:
/// - labels: labels already used by the user's notes
/// - value / set_value: the form's label field
#[component]
pub fn LabelAutocomplete(
    #[prop(into)] labels: Signal<Vec<String>>,
    value: ReadSignal<String>,
    set_value: WriteSignal<String>,
) -> impl IntoView {
    let (selected_idx, set_selected_idx) = signal(0usize);

    let suggestions = move || labels.with(|labels| suggest_labels(&value.get(), labels));

    let accept = move |label: String| {
        set_value.set(label);
        set_selected_idx.set(0);
    };

    let on_keydown = move |ev: web_sys::KeyboardEvent| {
        let sugg = suggestions();
        if sugg.is_empty() {
            return;
        }
        let sel = selected_idx.get();
        match ev.key().as_str() {
            "Tab" | "Enter" => {
                ev.prevent_default();
                if let Some(label) = sugg.get(sel) {
                    accept(label.clone());
                }
            }
            "ArrowDown" => {
                ev.prevent_default();
                if sel + 1 < sugg.len() {
                    set_selected_idx.set(sel + 1);
                }
            }
            "ArrowUp" => {
                ev.prevent_default();
                if sel > 0 {
                    set_selected_idx.set(sel - 1);
                }
            }
            _ => {}
        }
    };

    view! {
        <div class="label-input-wrapper">
            <input
                type="text"
                class="label-input"
                placeholder="Add a label"
                autocomplete="off"
                prop:value=move || value.get()
                on:input=move |ev| {
                    set_value.set(event_target_value(&ev));
                    set_selected_idx.set(0);
                }
                on:keydown=on_keydown
            />

            {move || {
                let sugg = suggestions();
                if sugg.is_empty() {
                    return None;
                }
                let selected = selected_idx.get();
                Some(view! {
                    <div class="autocomplete-list">
                        {sugg.into_iter().enumerate().map(|(i, label)| {
                            let name = label.clone();
                            view! {
                                <button
                                    type="button"
                                    class=if i == selected { "autocomplete-item selected" } else { "autocomplete-item" }
                                    on:click=move |ev| {
                                        ev.prevent_default();
                                        accept(name.clone());
                                    }
                                >
                                    {label}
                                </button>
                            }
                        }).collect_view()}
                    </div>
                })
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fuzzy_match_in_order() {
        assert!(fuzzy_match("erd", "errands"));
        assert!(fuzzy_match("ERR", "errands"));
        assert!(fuzzy_match("", "anything"));
        assert!(!fuzzy_match("dre", "errands"));
        assert!(!fuzzy_match("errandsx", "errands"));
    }

    #[test]
    fn test_suggest_labels() {
        let all = labels(&["errands", "home", "work", "workout"]);
        assert_eq!(suggest_labels("wo", &all), labels(&["work", "workout"]));
        assert_eq!(suggest_labels("  ", &all), Vec::<String>::new());
        // exact match needs no suggestion
        assert_eq!(suggest_labels("Home", &all), Vec::<String>::new());
    }

    #[test]
    fn test_suggestions_are_capped() {
        let all = labels(&["a1", "a2", "a3", "a4", "a5", "a6"]);
        assert_eq!(suggest_labels("a", &all).len(), MAX_SUGGESTIONS);
    }
}
