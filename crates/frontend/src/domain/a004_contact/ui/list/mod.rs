use crate::shared::components::table::cell_format::{date_cell, phone_cell};
use crate::shared::components::table::{ArabicLabels, CellRenderers, DataTable};
use crate::shared::locale::use_locale;
use contracts::shared::table::{ColumnDef, SortSpec, TableConfig, DEFAULT_PAGE_SIZE};
use leptos::prelude::*;
use serde_json::Value;

pub const ENDPOINT: &str = "/api/contacts";

const ARABIC_LABELS: ArabicLabels = &[
    ("firstName", "الاسم الأول"),
    ("lastName", "اسم العائلة"),
    ("email", "البريد الإلكتروني"),
    ("phones", "الهاتف"),
    ("jobTitle", "المسمى الوظيفي"),
    ("preferredLanguage", "اللغة المفضلة"),
    ("emailOptIn", "موافقة البريد"),
    ("createdAt", "تاريخ الإنشاء"),
];

pub fn table_config() -> TableConfig {
    TableConfig::new(
        ENDPOINT,
        vec![
            ColumnDef::new("firstName", "First name").width(140),
            ColumnDef::new("lastName", "Last name").width(140),
            ColumnDef::new("email", "Email").width(220),
            ColumnDef::new("phones", "Phone").not_sortable().width(160),
            ColumnDef::new("jobTitle", "Job title"),
            ColumnDef::new("preferredLanguage", "Language").hidden(),
            ColumnDef::new("emailOptIn", "Email opt-in").hidden(),
            ColumnDef::new("createdAt", "Created").width(120),
        ],
    )
    .with_default_sort(vec![SortSpec::desc("createdAt")])
    .with_page_size(DEFAULT_PAGE_SIZE)
}

#[component]
pub fn ContactsTable() -> impl IntoView {
    let locale = use_locale();
    let renderers = CellRenderers::new()
        .with("phones", phone_cell)
        .with("createdAt", date_cell);

    view! {
        <DataTable
            config=table_config()
            renderers=renderers
            title=Signal::derive(move || locale.get().pick("Contacts", "جهات الاتصال").to_string())
            arabic_labels=ARABIC_LABELS
            on_row_click=Callback::new(|row: Value| {
                log::debug!("contact {} clicked", row["id"]);
            })
            on_row_select=Callback::new(|ids: Vec<String>| {
                log::debug!("{} contacts selected", ids.len());
            })
        />
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contacts_sort_newest_first() {
        let config = table_config();
        assert_eq!(config.endpoint, ENDPOINT);
        assert_eq!(config.default_page_size, 25);
        assert_eq!(config.default_sort, vec![SortSpec::desc("createdAt")]);
        assert!(!config.column("phones").unwrap().sortable);
        assert!(!config.column("emailOptIn").unwrap().visible);
    }
}
