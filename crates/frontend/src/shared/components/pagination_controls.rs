use crate::shared::components::table::cell_format::to_arabic_digits;
use crate::shared::icons::icon;
use crate::shared::locale::{use_locale, Locale};
use contracts::shared::table::PAGE_SIZES;
use leptos::prelude::*;

/// "Page 2 of 3 (61)" in the interface language; pages are 1-based
pub fn page_summary(page: usize, total_pages: usize, total: usize, locale: Locale) -> String {
    let pages = total_pages.max(1);
    match locale {
        Locale::En => format!("Page {} of {} ({})", page, pages, total),
        Locale::Ar => to_arabic_digits(&format!("صفحة {} من {} ({})", page, pages, total)),
    }
}

/// PaginationControls component - first/prev/next/last and page size
#[component]
pub fn PaginationControls(
    /// Current page (1-based)
    #[prop(into)]
    current_page: Signal<usize>,

    #[prop(into)]
    total_pages: Signal<usize>,

    /// Total count of rows
    #[prop(into)]
    total_count: Signal<usize>,

    #[prop(into)]
    page_size: Signal<usize>,

    #[prop(into)]
    can_prev: Signal<bool>,

    #[prop(into)]
    can_next: Signal<bool>,

    /// Callback with the requested 1-based page
    on_page_change: Callback<usize>,

    on_page_size_change: Callback<usize>,

    /// Defaults to the standard page sizes
    #[prop(optional)]
    page_size_options: Option<Vec<usize>>,
) -> impl IntoView {
    let locale = use_locale();
    let page_size_opts = page_size_options.unwrap_or_else(|| PAGE_SIZES.to_vec());

    view! {
        <div class="pagination-controls">
            <button
                class="pagination-btn pagination-btn--flip"
                on:click=move |_| on_page_change.run(1)
                disabled=move || !can_prev.get()
                title=move || locale.get().pick("First page", "الصفحة الأولى")
            >
                {icon("chevrons-left")}
            </button>
            <button
                class="pagination-btn pagination-btn--flip"
                on:click=move |_| {
                    let page = current_page.get();
                    if page > 1 {
                        on_page_change.run(page - 1);
                    }
                }
                disabled=move || !can_prev.get()
                title=move || locale.get().pick("Previous page", "الصفحة السابقة")
            >
                {icon("chevron-left")}
            </button>
            <span class="pagination-info">
                {move || {
                    page_summary(current_page.get(), total_pages.get(), total_count.get(), locale.get())
                }}
            </span>
            <button
                class="pagination-btn pagination-btn--flip"
                on:click=move |_| on_page_change.run(current_page.get() + 1)
                disabled=move || !can_next.get()
                title=move || locale.get().pick("Next page", "الصفحة التالية")
            >
                {icon("chevron-right")}
            </button>
            <button
                class="pagination-btn pagination-btn--flip"
                on:click=move |_| {
                    let total = total_pages.get();
                    if total > 0 {
                        on_page_change.run(total);
                    }
                }
                disabled=move || !can_next.get()
                title=move || locale.get().pick("Last page", "الصفحة الأخيرة")
            >
                {icon("chevrons-right")}
            </button>
            <select
                class="page-size-select"
                aria-label=move || locale.get().pick("Rows per page", "عدد الصفوف في الصفحة")
                on:change=move |ev| {
                    if let Ok(val) = event_target_value(&ev).parse() {
                        on_page_size_change.run(val);
                    }
                }
                prop:value=move || page_size.get().to_string()
            >
                {page_size_opts.iter().map(|&size| {
                    view! {
                        <option value={size.to_string()} selected=move || page_size.get() == size>
                            {size.to_string()}
                        </option>
                    }
                }).collect_view()}
            </select>
        </div>
    }
}
