use crate::shared::components::table::cell_format::{
    currency_cell, date_cell, percent_cell, stage_badge, stage_options,
};
use crate::shared::components::table::{ArabicLabels, CellRenderers, DataTable, QuickFilter};
use crate::shared::locale::use_locale;
use contracts::shared::table::{ColumnDef, SortSpec, TableConfig, DEFAULT_PAGE_SIZE};
use leptos::prelude::*;

pub const ENDPOINT: &str = "/api/deals";

const ARABIC_LABELS: ArabicLabels = &[
    ("name", "الصفقة"),
    ("stage", "المرحلة"),
    ("value", "القيمة"),
    ("probability", "الاحتمالية"),
    ("expectedCloseDate", "تاريخ الإغلاق المتوقع"),
    ("currency", "العملة"),
    ("createdAt", "تاريخ الإنشاء"),
];

pub fn table_config() -> TableConfig {
    TableConfig::new(
        ENDPOINT,
        vec![
            ColumnDef::new("name", "Deal").width(220),
            ColumnDef::new("stage", "Stage").width(140),
            ColumnDef::new("value", "Value").numeric().width(150),
            ColumnDef::new("probability", "Probability").numeric(),
            ColumnDef::new("expectedCloseDate", "Expected close").width(140),
            ColumnDef::new("currency", "Currency").hidden(),
            ColumnDef::new("createdAt", "Created").width(120),
        ],
    )
    .with_default_sort(vec![SortSpec::desc("createdAt")])
    .with_page_size(DEFAULT_PAGE_SIZE)
}

#[component]
pub fn DealsTable() -> impl IntoView {
    let locale = use_locale();
    let renderers = CellRenderers::new()
        .with("stage", stage_badge)
        .with("value", currency_cell)
        .with("probability", percent_cell)
        .with("expectedCloseDate", date_cell)
        .with("createdAt", date_cell);

    view! {
        <DataTable
            config=table_config()
            renderers=renderers
            title=Signal::derive(move || locale.get().pick("Deals", "الصفقات").to_string())
            arabic_labels=ARABIC_LABELS
            quick_filters=vec![QuickFilter::new("stage", "Stage", "المرحلة", stage_options())]
        />
    }
}
