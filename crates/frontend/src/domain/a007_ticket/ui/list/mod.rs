use crate::shared::components::table::cell_format::{
    date_cell, priority_badge, priority_options, ticket_status_badge, ticket_status_options,
};
use crate::shared::components::table::{ArabicLabels, CellRenderers, DataTable, QuickFilter};
use crate::shared::locale::use_locale;
use contracts::shared::table::{ColumnDef, SortSpec, TableConfig, DEFAULT_PAGE_SIZE};
use leptos::prelude::*;

pub const ENDPOINT: &str = "/api/tickets";

const ARABIC_LABELS: ArabicLabels = &[
    ("subject", "الموضوع"),
    ("status", "الحالة"),
    ("priority", "الأولوية"),
    ("category", "الفئة"),
    ("slaDueAt", "موعد اتفاقية الخدمة"),
    ("createdAt", "تاريخ الإنشاء"),
];

pub fn table_config() -> TableConfig {
    TableConfig::new(
        ENDPOINT,
        vec![
            ColumnDef::new("subject", "Subject").width(260),
            ColumnDef::new("status", "Status").width(140),
            ColumnDef::new("priority", "Priority").width(110),
            ColumnDef::new("category", "Category").hidden(),
            ColumnDef::new("slaDueAt", "SLA due").width(130),
            ColumnDef::new("createdAt", "Created").width(120),
        ],
    )
    .with_default_sort(vec![SortSpec::desc("createdAt")])
    .with_page_size(DEFAULT_PAGE_SIZE)
}

#[component]
pub fn TicketsTable() -> impl IntoView {
    let locale = use_locale();
    let renderers = CellRenderers::new()
        .with("status", ticket_status_badge)
        .with("priority", priority_badge)
        .with("slaDueAt", date_cell)
        .with("createdAt", date_cell);

    view! {
        <DataTable
            config=table_config()
            renderers=renderers
            title=Signal::derive(move || locale.get().pick("Tickets", "التذاكر").to_string())
            arabic_labels=ARABIC_LABELS
            quick_filters=vec![
                QuickFilter::new("status", "Status", "الحالة", ticket_status_options()),
                QuickFilter::new("priority", "Priority", "الأولوية", priority_options()),
            ]
        />
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_starts_hidden() {
        let config = table_config();
        assert!(!config.column("category").unwrap().visible);
        assert_eq!(config.columns.iter().filter(|c| c.visible).count(), 5);
    }
}
