use crate::shared::locale::Locale;
use contracts::shared::table::ColumnDef;

/// Arabic column headers keyed by column key
pub type ArabicLabels = &'static [(&'static str, &'static str)];

/// Header text of a column; English labels come from the column definition
pub fn column_label(column: &ColumnDef, locale: Locale, arabic: ArabicLabels) -> String {
    match locale {
        Locale::En => column.label.clone(),
        Locale::Ar => arabic
            .iter()
            .find(|(key, _)| *key == column.key)
            .map(|(_, label)| label.to_string())
            .unwrap_or_else(|| column.label.clone()),
    }
}
