use crate::shared::components::table::cell_format::{
    account_type_badge, account_type_options, currency_cell, date_cell, integer_cell,
};
use crate::shared::components::table::{ArabicLabels, CellRenderers, DataTable, QuickFilter};
use crate::shared::locale::use_locale;
use contracts::shared::table::{ColumnDef, SortSpec, TableConfig, DEFAULT_PAGE_SIZE};
use leptos::prelude::*;

/// Accounts are served under their UI name
pub const ENDPOINT: &str = "/api/companies";

const ARABIC_LABELS: ArabicLabels = &[
    ("name", "الاسم"),
    ("accountType", "النوع"),
    ("industry", "القطاع"),
    ("phone", "الهاتف"),
    ("website", "الموقع"),
    ("employeeCount", "عدد الموظفين"),
    ("annualRevenue", "الإيرادات السنوية"),
    ("createdAt", "تاريخ الإنشاء"),
];

pub fn table_config() -> TableConfig {
    TableConfig::new(
        ENDPOINT,
        vec![
            ColumnDef::new("name", "Name").width(220),
            ColumnDef::new("accountType", "Type").width(120),
            ColumnDef::new("industry", "Industry"),
            ColumnDef::new("phone", "Phone").width(160),
            ColumnDef::new("website", "Website").hidden(),
            ColumnDef::new("employeeCount", "Employees").numeric(),
            ColumnDef::new("annualRevenue", "Annual revenue").numeric().width(160),
            ColumnDef::new("createdAt", "Created").width(120),
        ],
    )
    .with_default_sort(vec![SortSpec::desc("createdAt")])
    .with_page_size(DEFAULT_PAGE_SIZE)
}

#[component]
pub fn CompaniesTable() -> impl IntoView {
    let locale = use_locale();
    let renderers = CellRenderers::new()
        .with("accountType", account_type_badge)
        .with("employeeCount", integer_cell)
        .with("annualRevenue", currency_cell)
        .with("createdAt", date_cell);

    view! {
        <DataTable
            config=table_config()
            renderers=renderers
            title=Signal::derive(move || locale.get().pick("Companies", "الشركات").to_string())
            arabic_labels=ARABIC_LABELS
            quick_filters=vec![QuickFilter::new("accountType", "Type", "النوع", account_type_options())]
        />
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_columns_are_numeric() {
        let config = table_config();
        assert!(config.column("annualRevenue").unwrap().numeric);
        assert!(config.column("employeeCount").unwrap().numeric);
        assert!(!config.column("name").unwrap().numeric);
        assert_eq!(config.query_key, vec![ENDPOINT.to_string()]);
    }
}
