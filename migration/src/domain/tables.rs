use editorial_common::{
    AUTHOR_ID_FIELD_NAME, CATEGORY_FIELD_NAME, CONTENT_FIELD_NAME, CREATED_FIELD_NAME,
    DESCRIPTION_FIELD_NAME, ID_FIELD_NAME, LITERARY_WORK, PUBLICATION_TYPE_FIELD_NAME,
    PUBLICATIONS_TABLE_NAME, PublicationStatus, REVIEW_COUNT_FIELD_NAME, STATUS_FIELD_NAME,
    TITLE_FIELD_NAME, UPDATED_FIELD_NAME, VERSION_FIELD_NAME,
};

/// Represents table in a database, used for ddl generation
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub indexes: Vec<Index>,
}

/// Represents one column in the database table
pub struct Column {
    pub name: String,
    pub column_type: String,
    pub not_null: bool,
    pub primary_key: bool,
    pub default_value: Option<String>,
    /// Boolean SQL expression over the column
    pub check: Option<String>,
}

/// Represents an index in the database table
pub struct Index {
    pub table_name: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

impl Table {
    pub fn new(name: String, columns: Vec<Column>, indexes: Vec<Index>) -> Self {
        Self {
            name,
            columns,
            indexes,
        }
    }
}

impl Column {
    pub fn new<T: Into<String>>(name: T, column_type: T, not_null: bool) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            not_null,
            primary_key: false,
            default_value: None,
            check: None,
        }
    }

    pub fn primary_key<T: Into<String>>(name: T, column_type: T) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            not_null: false,
            primary_key: true,
            default_value: None,
            check: None,
        }
    }

    pub fn with_default<T: Into<String>>(mut self, default_value: T) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    pub fn with_check<T: Into<String>>(mut self, check: T) -> Self {
        self.check = Some(check.into());
        self
    }
}

impl Index {
    pub fn new<T: Into<String>>(table_name: T, columns: Vec<T>, unique: bool) -> Self {
        Self {
            table_name: table_name.into(),
            columns: columns.into_iter().map(T::into).collect(),
            unique,
        }
    }
}

/// Every table the service reads and writes
pub fn publication_tables() -> Vec<Table> {
    vec![publications_table()]
}

fn publications_table() -> Table {
    let statuses = PublicationStatus::ALL
        .iter()
        .map(|status| format!("'{}'", status.as_str()))
        .collect::<Vec<_>>()
        .join(", ");

    let columns = vec![
        Column::primary_key(ID_FIELD_NAME, "BIGSERIAL"),
        Column::new(TITLE_FIELD_NAME, "VARCHAR(500)", true),
        Column::new(DESCRIPTION_FIELD_NAME, "TEXT", false),
        Column::new(CONTENT_FIELD_NAME, "TEXT", false),
        Column::new(AUTHOR_ID_FIELD_NAME, "BIGINT", true),
        Column::new(STATUS_FIELD_NAME, "VARCHAR(20)", true)
            .with_default(format!("'{}'", PublicationStatus::INITIAL.as_str()))
            .with_check(format!("\"{STATUS_FIELD_NAME}\" IN ({statuses})")),
        Column::new(CATEGORY_FIELD_NAME, "VARCHAR(100)", false),
        Column::new(PUBLICATION_TYPE_FIELD_NAME, "VARCHAR(50)", true)
            .with_default(format!("'{LITERARY_WORK}'")),
        Column::new(REVIEW_COUNT_FIELD_NAME, "INTEGER", true).with_default("0"),
        Column::new(VERSION_FIELD_NAME, "BIGINT", true).with_default("0"),
        Column::new(CREATED_FIELD_NAME, "TIMESTAMPTZ", true).with_default("now()"),
        Column::new(UPDATED_FIELD_NAME, "TIMESTAMPTZ", true).with_default("now()"),
    ];

    let indexes = vec![
        Index::new(PUBLICATIONS_TABLE_NAME, vec![STATUS_FIELD_NAME], false),
        Index::new(PUBLICATIONS_TABLE_NAME, vec![AUTHOR_ID_FIELD_NAME], false),
    ];

    Table::new(PUBLICATIONS_TABLE_NAME.to_string(), columns, indexes)
}
