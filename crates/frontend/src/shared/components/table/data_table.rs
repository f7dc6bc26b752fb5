//! Generic CRM data grid
//!
//! Renders whatever its [`TableController`] holds and performs the fetches
//! the controller asks for. Starting a request aborts the one in flight, and
//! responses of superseded requests are never displayed.

use super::cell_format::{CellDisplay, CellRenderers};
use super::column_toggle::ColumnToggle;
use super::filter_bar::{FilterBar, QuickFilter};
use super::labels::{column_label, ArabicLabels};
use super::saved_views_menu::SavedViewsMenu;
use super::sortable_header_cell::SortableHeaderCell;
use super::table_cell_checkbox::TableCellCheckbox;
use super::table_header_checkbox::TableHeaderCheckbox;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::search_input::SearchInput;
use crate::shared::components::ui::Badge;
use crate::shared::export::{download_bytes, export_timestamp};
use crate::shared::icons::icon;
use crate::shared::locale::{use_locale, Locale};
use crate::shared::table_api::{download_export, fetch_page};
use contracts::shared::table::{
    export_filename, export_url, ExportFormat, FilterOperator, FilterSpec, ReceiveOutcome,
    RequestTracker, SavedView, TableConfig, TableController, TableQuery, TableRow as _,
    SEARCH_DEBOUNCE_MS,
};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use serde_json::Value;
use thaw::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::AbortController;

type Controller = TableController<Value>;

/// Reactive handles of one grid; every user intent goes through [`Fetcher::act`]
#[derive(Clone, Copy)]
struct Fetcher {
    controller: RwSignal<Controller>,
    tracker: StoredValue<RequestTracker>,
    in_flight: StoredValue<Option<(TableQuery, AbortController)>, LocalStorage>,
    endpoint: StoredValue<String>,
}

impl Fetcher {
    fn new(config: TableConfig) -> Self {
        Self {
            endpoint: StoredValue::new(config.endpoint.clone()),
            controller: RwSignal::new(TableController::new(config)),
            tracker: StoredValue::new(RequestTracker::new()),
            in_flight: StoredValue::new_local(None),
        }
    }

    /// Apply an intent and fetch whatever query it produced
    fn act(self, intent: impl FnOnce(&mut Controller) -> Option<TableQuery>) {
        let query = self.controller.try_update(intent).flatten();
        self.dispatch(query);
    }

    fn dispatch(self, query: Option<TableQuery>) {
        let Some(query) = query else {
            return;
        };
        let Some(generation) = self.tracker.try_update_value(RequestTracker::start) else {
            return;
        };

        if let Some((previous, abort)) = self.in_flight.try_update_value(Option::take).flatten() {
            abort.abort();
            self.controller.update_untracked(|c| c.supersede(&previous, &query));
        }

        let abort = AbortController::new().ok();
        let signal = abort.as_ref().map(AbortController::signal);
        self.in_flight.set_value(abort.map(|a| (query.clone(), a)));
        let endpoint = self.endpoint.get_value();

        spawn_local(async move {
            let result = fetch_page(&endpoint, &query, signal.as_ref()).await;
            let current = self
                .tracker
                .try_with_value(|t| t.is_current(generation))
                .unwrap_or(false);
            if !current {
                if result.is_ok() {
                    self.controller.try_update(|c| c.receive(&query, result));
                }
                return;
            }

            self.in_flight.try_set_value(None);
            if let Err(e) = &result {
                log::warn!("{}: {}", endpoint, e);
            }
            let outcome = self.controller.try_update(|c| c.receive(&query, result));
            if let Some(ReceiveOutcome::NeedsRefetch(next)) = outcome {
                self.dispatch(Some(next));
            }
        });
    }

    fn search_input(self, text: String) {
        let Some(ticket) = self.controller.try_update_untracked(|c| c.search_input(&text)) else {
            return;
        };
        spawn_local(async move {
            TimeoutFuture::new(SEARCH_DEBOUNCE_MS).await;
            self.act(|c| c.search_settled(ticket));
        });
    }

    fn set_filter(self, field: String, code: Option<String>) {
        match code {
            Some(code) => self.act(|c| {
                c.add_filter(FilterSpec::new(field, FilterOperator::Eq, Value::String(code)))
            }),
            None => self.act(|c| c.remove_filter(&field)),
        }
    }
}

fn render_display(display: CellDisplay) -> AnyView {
    match display {
        CellDisplay::Text(text) => view! { <span>{text}</span> }.into_any(),
        CellDisplay::Badge { label, variant } => {
            view! { <Badge variant=variant>{label}</Badge> }.into_any()
        }
    }
}

fn selection_summary(count: usize, locale: Locale) -> String {
    match locale {
        Locale::En => format!("{} selected", count),
        Locale::Ar => super::cell_format::to_arabic_digits(&format!("{} محدد", count)),
    }
}

#[component]
pub fn DataTable(
    config: TableConfig,

    /// Per-column display; other columns use the default formatter
    #[prop(optional)]
    renderers: CellRenderers,

    #[prop(into)]
    title: Signal<String>,

    #[prop(optional)]
    arabic_labels: ArabicLabels,

    #[prop(optional)]
    quick_filters: Vec<QuickFilter>,

    #[prop(optional)]
    on_row_click: Option<Callback<Value>>,

    /// Called with the sorted ids of the selected rows whenever they change
    #[prop(optional)]
    on_row_select: Option<Callback<Vec<String>>>,
) -> impl IntoView {
    let locale = use_locale();
    let columns = config.columns.clone();
    let features = config.features;
    let endpoint = config.endpoint.clone();
    let query_key = config.query_key.join("-");

    let fetcher = Fetcher::new(config);
    let controller = fetcher.controller;
    let column_defs = StoredValue::new(columns.clone());
    let renderers = StoredValue::new(renderers);

    let export_error = RwSignal::new(None::<String>);
    let exporting = RwSignal::new(false);

    let visible_columns =
        Memo::new(move |_| controller.with(|c| c.state().visible_columns_in_order()));
    let rows = Memo::new(move |_| controller.with(|c| c.rows().to_vec()));
    let error = Memo::new(move |_| controller.with(|c| c.error().map(str::to_string)));
    let loading = Memo::new(move |_| controller.with(|c| c.is_loading()));
    let colspan = Memo::new(move |_| controller.with(|c| c.state().empty_colspan()));
    let multi_sort = Signal::derive(move || controller.with(|c| c.state().sorts.len() > 1));
    let selected_ids = Memo::new(move |_| controller.with(|c| c.selection().ids()));

    if let Some(on_row_select) = on_row_select {
        Effect::new(move |_| on_row_select.run(selected_ids.get()));
    }

    let export = move |format: ExportFormat| {
        let query = controller.with_untracked(|c| c.current_query());
        let url = export_url(&fetcher.endpoint.get_value(), format, &query);
        exporting.set(true);
        export_error.set(None);
        spawn_local(async move {
            let result = match download_export(&url).await {
                Ok(bytes) => {
                    let filename = export_filename(format, &export_timestamp());
                    download_bytes(&bytes, format.mime(), &filename)
                }
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                log::error!("{}", e);
                export_error.set(Some(e));
            }
            exporting.set(false);
        });
    };

    fetcher.act(Controller::load);

    let header_cells = move || {
        visible_columns
            .get()
            .into_iter()
            .filter_map(|key| column_defs.with_value(|defs| defs.iter().find(|c| c.key == key).cloned()))
            .map(|column| {
                let key = column.key.clone();
                let sort = Signal::derive(move || controller.with(|c| c.state().sort_of(&key)));
                let label = {
                    let column = column.clone();
                    Signal::derive(move || column_label(&column, locale.get(), arabic_labels))
                };
                view! {
                    <SortableHeaderCell
                        label=label
                        sort_field=column.key.clone()
                        sort=sort
                        multi_sort=multi_sort
                        sortable=column.sortable
                        min_width=column.width.map(f64::from).unwrap_or(100.0)
                        align=if column.numeric { "right" } else { "left" }
                        on_sort=Callback::new(move |field: String| fetcher.act(|c| c.click_header(&field)))
                    />
                }
            })
            .collect_view()
    };

    let body = move || {
        let span = colspan.get();
        if let Some(message) = error.get() {
            return view! {
                <tr class="table__row">
                    <td class="table__cell table__message table__message--error" colspan=span>
                        <span role="alert">{message}</span>
                        <Button
                            appearance=ButtonAppearance::Primary
                            on_click=move |_| fetcher.act(Controller::retry)
                        >
                            {move || locale.get().pick("Retry", "إعادة المحاولة")}
                        </Button>
                    </td>
                </tr>
            }
            .into_any();
        }

        let current = rows.get();
        if current.is_empty() {
            let text = if loading.get() {
                locale.get().pick("Loading…", "جارٍ التحميل…")
            } else {
                locale.get().pick("No data", "لا توجد بيانات")
            };
            return view! {
                <tr class="table__row">
                    <td class="table__cell table__message" colspan=span>{text}</td>
                </tr>
            }
            .into_any();
        }

        let keys = visible_columns.get();
        let locale_now = locale.get();
        current
            .into_iter()
            .map(|row| {
                let id = row.row_id();
                let checked = {
                    let id = id.clone();
                    Signal::derive(move || controller.with(|c| c.is_selected(&id)))
                };
                let toggle = Callback::new(move |_| controller.update(|c| c.toggle_row(&id)));
                let cells = keys
                    .iter()
                    .map(|key| {
                        let numeric = column_defs
                            .with_value(|defs| defs.iter().any(|c| &c.key == key && c.numeric));
                        let display = renderers.with_value(|r| r.render(key, &row, locale_now));
                        let class = if numeric {
                            "table__cell table__cell--numeric"
                        } else {
                            "table__cell"
                        };
                        view! { <TableCell class=class>{render_display(display)}</TableCell> }
                    })
                    .collect_view();
                view! {
                    <TableRow
                        attr:aria-selected=move || checked.get().to_string()
                        on:click=move |_| {
                            if let Some(on_row_click) = on_row_click {
                                on_row_click.run(row.clone());
                            }
                        }
                    >
                        <TableCellCheckbox checked=checked on_toggle=toggle />
                        {cells}
                    </TableRow>
                }
            })
            .collect_view()
            .into_any()
    };

    view! {
        <section class="data-table" data-query-key=query_key>
            <div class="data-table__toolbar">
                <h2 class="data-table__title">{move || title.get()}</h2>
                <SearchInput
                    value=Signal::derive(move || controller.with(|c| c.state().search.clone()))
                    on_input=Callback::new(move |text: String| fetcher.search_input(text))
                    on_submit=Callback::new(move |text: String| fetcher.act(|c| c.submit_search(&text)))
                    placeholder=Signal::derive(move || locale.get().pick("Search…", "بحث…").to_string())
                />
                <div class="data-table__actions">
                    <Show when=move || loading.get() && !rows.get().is_empty()>
                        <span class="data-table__loading" aria-live="polite">
                            {move || locale.get().pick("Loading…", "جارٍ التحميل…")}
                        </span>
                    </Show>
                    <button
                        class="button button--secondary"
                        title=move || locale.get().pick("Refresh", "تحديث")
                        on:click=move |_| fetcher.act(Controller::invalidate)
                    >
                        {icon("refresh")}
                    </button>
                    {features.enable_column_toggle.then(|| view! {
                        <ColumnToggle
                            columns=columns.clone()
                            visible=Signal::derive(move || controller.with(|c| c.state().visible_columns.clone()))
                            on_toggle=Callback::new(move |key: String| fetcher.act(|c| c.toggle_column(&key)))
                            arabic_labels=arabic_labels
                        />
                    })}
                    {features.enable_saved_views.then(|| view! {
                        <SavedViewsMenu
                            endpoint=endpoint.clone()
                            snapshot=Callback::new(move |name: String| {
                                controller.with_untracked(|c| c.snapshot_view(&name))
                            })
                            on_load=Callback::new(move |saved: SavedView| fetcher.act(|c| c.load_view(&saved)))
                        />
                    })}
                    {features.enable_export.then(|| view! {
                        <button
                            class="button button--secondary"
                            disabled=move || exporting.get()
                            on:click=move |_| export(ExportFormat::Csv)
                        >
                            {icon("download")}
                            "CSV"
                        </button>
                        <button
                            class="button button--secondary"
                            disabled=move || exporting.get()
                            on:click=move |_| export(ExportFormat::Pdf)
                        >
                            {icon("download")}
                            "PDF"
                        </button>
                    })}
                </div>
            </div>

            {(!quick_filters.is_empty()).then(|| view! {
                <FilterBar
                    filters=quick_filters.clone()
                    active=Signal::derive(move || controller.with(|c| c.state().filters.clone()))
                    on_change=Callback::new(move |(field, code): (String, Option<String>)| fetcher.set_filter(field, code))
                    on_clear=Callback::new(move |_| fetcher.act(Controller::clear_filters))
                />
            })}

            {move || export_error.get().map(|e| view! {
                <div class="inline-error" role="alert">{e}</div>
            })}

            {move || {
                let count = selected_ids.with(Vec::len);
                (count > 0).then(|| view! {
                    <div class="data-table__selection">
                        {selection_summary(count, locale.get())}
                        <button
                            class="button button--link"
                            on:click=move |_| controller.update(Controller::clear_selection)
                        >
                            {move || locale.get().pick("Clear selection", "إلغاء التحديد")}
                        </button>
                    </div>
                })
            }}

            <div class="table" aria-busy=move || loading.get().to_string()>
                <Table>
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCheckbox
                                state=Signal::derive(move || controller.with(|c| c.header_state()))
                                on_toggle=Callback::new(move |_| controller.update(Controller::toggle_all_rows))
                                disabled=Signal::derive(move || rows.with(Vec::is_empty))
                            />
                            {header_cells}
                        </TableRow>
                    </TableHeader>
                    <TableBody>{body}</TableBody>
                </Table>
            </div>

            <PaginationControls
                current_page=Signal::derive(move || controller.with(|c| c.state().page))
                total_pages=Signal::derive(move || controller.with(|c| c.state().total_pages))
                total_count=Signal::derive(move || controller.with(|c| c.state().total))
                page_size=Signal::derive(move || controller.with(|c| c.state().page_size))
                can_prev=Signal::derive(move || controller.with(|c| c.state().can_prev()))
                can_next=Signal::derive(move || controller.with(|c| c.state().can_next()))
                on_page_change=Callback::new(move |page: usize| fetcher.act(|c| c.go_to_page(page)))
                on_page_size_change=Callback::new(move |size: usize| fetcher.act(|c| c.change_page_size(size)))
            />
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_summary_is_localized() {
        assert_eq!(selection_summary(3, Locale::En), "3 selected");
        assert_eq!(selection_summary(12, Locale::Ar), "١٢ محدد");
    }
}
