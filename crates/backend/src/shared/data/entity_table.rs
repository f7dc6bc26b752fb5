//! Static field maps for the CRM tables
//!
//! Each entity declares the columns it persists and which of them list
//! requests may search, sort and filter on. The list query builder, the row
//! codec and the bootstrap DDL all read from the same map, so a field that is
//! not declared here can never reach SQL.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// UUID stored as text
    Id,
    Text,
    Integer,
    Numeric,
    Bool,
    /// RFC 3339 instant, stored with fixed width so text order is time order
    Timestamp,
    /// `YYYY-MM-DD`
    Date,
    /// Arrays and objects, stored as JSON text
    Json,
}

impl FieldType {
    pub fn sql_type(&self) -> &'static str {
        match self {
            FieldType::Integer => "INTEGER",
            FieldType::Numeric => "REAL",
            FieldType::Bool => "BOOLEAN",
            _ => "TEXT",
        }
    }

    /// Values compared with LIKE
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            FieldType::Id | FieldType::Text | FieldType::Timestamp | FieldType::Date
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    /// Key in the JSON payload (camelCase)
    pub key: &'static str,
    pub column: &'static str,
    pub field_type: FieldType,
    pub searchable: bool,
    pub sortable: bool,
    pub filterable: bool,
    /// Table holding the referenced row, for `*Id` fields
    pub references: Option<&'static str>,
}

impl FieldDef {
    pub const fn new(key: &'static str, column: &'static str, field_type: FieldType) -> Self {
        let structured = matches!(field_type, FieldType::Json);
        Self {
            key,
            column,
            field_type,
            searchable: false,
            sortable: !structured,
            filterable: !structured,
            references: None,
        }
    }

    pub const fn text(key: &'static str, column: &'static str) -> Self {
        Self::new(key, column, FieldType::Text)
    }

    pub const fn id(key: &'static str, column: &'static str) -> Self {
        Self::new(key, column, FieldType::Id)
    }

    pub const fn integer(key: &'static str, column: &'static str) -> Self {
        Self::new(key, column, FieldType::Integer)
    }

    pub const fn numeric(key: &'static str, column: &'static str) -> Self {
        Self::new(key, column, FieldType::Numeric)
    }

    pub const fn boolean(key: &'static str, column: &'static str) -> Self {
        Self::new(key, column, FieldType::Bool)
    }

    pub const fn timestamp(key: &'static str, column: &'static str) -> Self {
        Self::new(key, column, FieldType::Timestamp)
    }

    pub const fn date(key: &'static str, column: &'static str) -> Self {
        Self::new(key, column, FieldType::Date)
    }

    pub const fn json(key: &'static str, column: &'static str) -> Self {
        Self::new(key, column, FieldType::Json)
    }

    pub const fn searchable(self) -> Self {
        Self {
            searchable: true,
            ..self
        }
    }

    pub const fn references(self, table: &'static str) -> Self {
        Self {
            references: Some(table),
            ..self
        }
    }
}

/// Columns every CRM table carries, ahead of the entity's own fields
pub static COMMON_FIELDS: [FieldDef; 5] = [
    FieldDef::id("id", "id"),
    FieldDef::timestamp("createdAt", "created_at"),
    FieldDef::timestamp("updatedAt", "updated_at"),
    FieldDef::timestamp("deletedAt", "deleted_at"),
    FieldDef::integer("version", "version"),
];

#[derive(Debug)]
pub struct EntityTable {
    pub table: &'static str,
    /// Type name used in audit entries and polymorphic references
    pub entity_type: &'static str,
    pub fields: &'static [FieldDef],
    /// Key sets that must be unique among live rows
    pub unique: &'static [&'static [&'static str]],
    /// Rows point at another record through `entityType` + `entityId`
    pub polymorphic: bool,
}

impl EntityTable {
    pub fn all_fields(&self) -> impl Iterator<Item = &'static FieldDef> {
        COMMON_FIELDS.iter().chain(self.fields.iter())
    }

    pub fn field(&self, key: &str) -> Option<&'static FieldDef> {
        self.all_fields().find(|f| f.key == key)
    }

    pub fn column_list(&self) -> String {
        self.all_fields()
            .map(|f| f.column)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Keys offered for export when the client does not name any
    pub fn default_export_keys(&self) -> Vec<String> {
        self.all_fields()
            .filter(|f| f.key != "deletedAt" && f.field_type != FieldType::Json)
            .map(|f| f.key.to_string())
            .collect()
    }

    pub fn create_table_sql(&self) -> String {
        let mut columns = vec![
            "id TEXT PRIMARY KEY NOT NULL".to_string(),
            "created_at TEXT NOT NULL".to_string(),
            "updated_at TEXT NOT NULL".to_string(),
            "deleted_at TEXT".to_string(),
            "version INTEGER NOT NULL DEFAULT 1".to_string(),
        ];
        for field in self.fields {
            let mut column = format!("{} {}", field.column, field.field_type.sql_type());
            if let Some(target) = field.references {
                column.push_str(&format!(" REFERENCES {}(id)", target));
            }
            columns.push(column);
        }
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n);",
            self.table,
            columns.join(",\n    ")
        )
    }

    pub fn index_sql(&self) -> Vec<String> {
        let mut statements = vec![
            format!(
                "CREATE INDEX IF NOT EXISTS idx_{t}_deleted_at ON {t} (deleted_at);",
                t = self.table
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS idx_{t}_created_at ON {t} (created_at);",
                t = self.table
            ),
        ];
        for field in self.fields.iter().filter(|f| f.references.is_some()) {
            statements.push(format!(
                "CREATE INDEX IF NOT EXISTS idx_{t}_{c} ON {t} ({c});",
                t = self.table,
                c = field.column
            ));
        }
        if self.polymorphic {
            statements.push(format!(
                "CREATE INDEX IF NOT EXISTS idx_{t}_target ON {t} (entity_type, entity_id);",
                t = self.table
            ));
        }
        for keys in self.unique {
            let columns: Vec<&str> = keys
                .iter()
                .filter_map(|k| self.field(k).map(|f| f.column))
                .collect();
            statements.push(format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_{t}_{name} ON {t} ({cols}) WHERE deleted_at IS NULL;",
                t = self.table,
                name = columns.join("_"),
                cols = columns.join(", ")
            ));
        }
        statements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static SAMPLE: EntityTable = EntityTable {
        table: "samples",
        entity_type: "sample",
        fields: &[
            FieldDef::text("name", "name").searchable(),
            FieldDef::json("tags", "tags"),
            FieldDef::id("accountId", "account_id").references("accounts"),
        ],
        unique: &[&["name"]],
        polymorphic: false,
    };

    #[test]
    fn common_fields_come_first() {
        let keys: Vec<&str> = SAMPLE.all_fields().map(|f| f.key).collect();
        assert_eq!(
            keys,
            vec!["id", "createdAt", "updatedAt", "deletedAt", "version", "name", "tags", "accountId"]
        );
    }

    #[test]
    fn json_fields_are_neither_sortable_nor_filterable() {
        let tags = SAMPLE.field("tags").unwrap();
        assert!(!tags.sortable);
        assert!(!tags.filterable);
        assert!(SAMPLE.field("name").unwrap().searchable);
    }

    #[test]
    fn ddl_declares_columns_and_references() {
        let sql = SAMPLE.create_table_sql();
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS samples"));
        assert!(sql.contains("id TEXT PRIMARY KEY NOT NULL"));
        assert!(sql.contains("tags TEXT"));
        assert!(sql.contains("account_id TEXT REFERENCES accounts(id)"));
    }

    #[test]
    fn indexes_cover_references_and_live_unique_keys() {
        let sql = SAMPLE.index_sql().join("\n");
        assert!(sql.contains("idx_samples_account_id ON samples (account_id)"));
        assert!(sql.contains("uq_samples_name ON samples (name) WHERE deleted_at IS NULL"));
    }

    #[test]
    fn export_keys_skip_json_and_deleted_marker() {
        let keys = SAMPLE.default_export_keys();
        assert!(keys.contains(&"name".to_string()));
        assert!(!keys.contains(&"tags".to_string()));
        assert!(!keys.contains(&"deletedAt".to_string()));
    }
}
