use leptos::prelude::*;

/// Search box: every keystroke goes to `on_input`, Enter to `on_submit`
#[component]
pub fn SearchInput(
    /// Text currently applied to the table
    #[prop(into)]
    value: Signal<String>,

    on_input: Callback<String>,

    on_submit: Callback<String>,

    #[prop(into)]
    placeholder: Signal<String>,
) -> impl IntoView {
    let text = RwSignal::new(value.get_untracked());

    view! {
        <div class="search-input">
            <input
                type="search"
                class="search-input__field"
                placeholder=move || placeholder.get()
                aria-label=move || placeholder.get()
                prop:value=move || text.get()
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    text.set(value.clone());
                    on_input.run(value);
                }
                on:keydown=move |ev| {
                    if ev.key() == "Enter" {
                        on_submit.run(text.get_untracked());
                    }
                }
            />
        </div>
    }
}
