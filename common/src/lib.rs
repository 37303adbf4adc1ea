mod domain;

pub mod database;

// Persisted publications table and field names

pub const PUBLICATIONS_TABLE_NAME: &'static str = "publications";

pub const ID_FIELD_NAME: &'static str = "id";
pub const TITLE_FIELD_NAME: &'static str = "title";
pub const DESCRIPTION_FIELD_NAME: &'static str = "description";
pub const CONTENT_FIELD_NAME: &'static str = "content";
pub const AUTHOR_ID_FIELD_NAME: &'static str = "author_id";
pub const STATUS_FIELD_NAME: &'static str = "status";
pub const CATEGORY_FIELD_NAME: &'static str = "category";
pub const PUBLICATION_TYPE_FIELD_NAME: &'static str = "publication_type";
pub const REVIEW_COUNT_FIELD_NAME: &'static str = "review_count";

pub const CREATED_FIELD_NAME: &'static str = "created_at";
pub const UPDATED_FIELD_NAME: &'static str = "updated_at";

pub const VERSION_FIELD_NAME: &'static str = "version";

/// Every publication stored by this system is a literary work.
pub const LITERARY_WORK: &'static str = "LITERARY_WORK";

// expose domain module

pub use domain::*;
