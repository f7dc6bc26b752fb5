//! Select-all checkbox of the table header
use contracts::shared::table::HeaderCheckState;
use leptos::prelude::*;
use thaw::*;
use wasm_bindgen::JsCast;

/// Three-state checkbox; `indeterminate` is only reachable through the DOM
/// property, so it is set from an effect
#[component]
pub fn TableHeaderCheckbox(
    #[prop(into)]
    state: Signal<HeaderCheckState>,

    /// Clicked: select the whole page, or clear it when already fully selected
    on_toggle: Callback<()>,

    #[prop(optional, into)]
    disabled: Signal<bool>,
) -> impl IntoView {
    let checkbox_ref = NodeRef::<leptos::html::Input>::new();

    Effect::new(move |_| {
        if let Some(input) = checkbox_ref.get() {
            if let Some(input_el) = input.dyn_ref::<web_sys::HtmlInputElement>() {
                input_el.set_indeterminate(state.get() == HeaderCheckState::Indeterminate);
            }
        }
    });

    view! {
        <TableHeaderCell resizable=false class="fixed-checkbox-column">
            <input
                node_ref=checkbox_ref
                type="checkbox"
                class="table__checkbox"
                aria-label="Select all rows"
                prop:checked=move || state.get() == HeaderCheckState::Checked
                prop:disabled=move || disabled.get()
                on:change=move |_| on_toggle.run(())
            />
        </TableHeaderCell>
    }
}
