//! Sortable column header
//!
//! Shows the direction of the column's sort and, while more than one column
//! is sorted, its position in the sort list.

use contracts::shared::table::SortDirection;
use leptos::prelude::*;
use thaw::*;

/// `▲`, `▼`, or with several sorted columns `▲2`
pub fn sort_indicator(sort: Option<(usize, SortDirection)>, multi_sort: bool) -> String {
    match sort {
        None => String::new(),
        Some((index, direction)) => {
            let arrow = match direction {
                SortDirection::Asc => "▲",
                SortDirection::Desc => "▼",
            };
            if multi_sort {
                format!("{}{}", arrow, index + 1)
            } else {
                arrow.to_string()
            }
        }
    }
}

/// Value of the `aria-sort` attribute
pub fn aria_sort(sort: Option<(usize, SortDirection)>) -> &'static str {
    match sort {
        None => "none",
        Some((_, SortDirection::Asc)) => "ascending",
        Some((_, SortDirection::Desc)) => "descending",
    }
}

#[component]
pub fn SortableHeaderCell(
    #[prop(into)]
    label: Signal<String>,

    #[prop(into)]
    sort_field: String,

    /// Index in the sort list and direction, `None` when unsorted
    #[prop(into)]
    sort: Signal<Option<(usize, SortDirection)>>,

    /// More than one column is sorted
    #[prop(into)]
    multi_sort: Signal<bool>,

    #[prop(optional, default = true)]
    sortable: bool,

    #[prop(optional, default = 100.0)]
    min_width: f64,

    /// "left" or "right" (numeric columns)
    #[prop(optional, default = "left")]
    align: &'static str,

    on_sort: Callback<String>,
) -> impl IntoView {
    let handle_click = move |_| {
        if sortable {
            on_sort.run(sort_field.clone());
        }
    };

    let header_class = match (sortable, align) {
        (true, "right") => "table__sortable-header table__sortable-header--right",
        (true, _) => "table__sortable-header",
        (false, "right") => "table__header-label table__header-label--right",
        (false, _) => "table__header-label",
    };

    view! {
        <TableHeaderCell
            resizable=true
            min_width=min_width
            class="resizable"
            attr:aria-sort=move || aria_sort(sort.get())
        >
            <div class=header_class on:click=handle_click>
                {move || label.get()}
                <span class="table__sort-indicator">
                    {move || sort_indicator(sort.get(), multi_sort.get())}
                </span>
            </div>
        </TableHeaderCell>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_shows_order_only_for_multi_sort() {
        assert_eq!(sort_indicator(None, true), "");
        assert_eq!(sort_indicator(Some((0, SortDirection::Asc)), false), "▲");
        assert_eq!(sort_indicator(Some((1, SortDirection::Desc)), true), "▼2");
        assert_eq!(aria_sort(Some((0, SortDirection::Desc))), "descending");
    }
}
