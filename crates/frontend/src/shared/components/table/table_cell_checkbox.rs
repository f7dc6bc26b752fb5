use leptos::prelude::*;
use thaw::*;

/// Row selection checkbox; clicks stop here so the row click handler does
/// not fire
#[component]
pub fn TableCellCheckbox(
    #[prop(into)]
    checked: Signal<bool>,

    on_toggle: Callback<()>,
) -> impl IntoView {
    view! {
        <TableCell class="fixed-checkbox-column" on:click=|e| e.stop_propagation()>
            <input
                type="checkbox"
                class="table__checkbox"
                aria-label="Select row"
                prop:checked=move || checked.get()
                on:change=move |_| on_toggle.run(())
            />
        </TableCell>
    }
}
