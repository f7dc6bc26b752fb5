use super::labels::{column_label, ArabicLabels};
use crate::shared::icons::icon;
use crate::shared::locale::use_locale;
use contracts::shared::table::ColumnDef;
use leptos::prelude::*;
use std::collections::HashSet;

/// Drop-down checklist of columns. The last visible column cannot be hidden.
#[component]
pub fn ColumnToggle(
    columns: Vec<ColumnDef>,

    #[prop(into)]
    visible: Signal<HashSet<String>>,

    on_toggle: Callback<String>,

    #[prop(optional)]
    arabic_labels: ArabicLabels,
) -> impl IntoView {
    let locale = use_locale();

    view! {
        <details class="dropdown column-toggle">
            <summary class="button button--secondary">
                {icon("columns")}
                {move || locale.get().pick("Columns", "الأعمدة")}
            </summary>
            <div class="dropdown__menu">
                {columns.into_iter().map(|column| {
                    let key = column.key.clone();
                    let key_for_checked = key.clone();
                    let key_for_disabled = key.clone();
                    let column_for_label = column.clone();
                    view! {
                        <label class="dropdown__item">
                            <input
                                type="checkbox"
                                prop:checked=move || visible.get().contains(&key_for_checked)
                                prop:disabled=move || {
                                    visible.with(|v| v.len() == 1 && v.contains(&key_for_disabled))
                                }
                                on:change=move |_| on_toggle.run(key.clone())
                            />
                            {move || column_label(&column_for_label, locale.get(), arabic_labels)}
                        </label>
                    }
                }).collect_view()}
            </div>
        </details>
    }
}
