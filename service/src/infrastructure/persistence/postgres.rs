use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use editorial_common::{
    AUTHOR_ID_FIELD_NAME, AuthorId, CATEGORY_FIELD_NAME, CONTENT_FIELD_NAME, CREATED_FIELD_NAME,
    Category, DESCRIPTION_FIELD_NAME, ID_FIELD_NAME, LITERARY_WORK, PUBLICATION_TYPE_FIELD_NAME,
    PUBLICATIONS_TABLE_NAME, PublicationId, PublicationStatus, PublicationTitle,
    REVIEW_COUNT_FIELD_NAME, STATUS_FIELD_NAME, TITLE_FIELD_NAME, UPDATED_FIELD_NAME,
    VERSION_FIELD_NAME, Version, database::Database,
};
use futures::TryStreamExt;
use sqlx::{Postgres, QueryBuilder, Row, postgres::PgRow};

use crate::domain::{
    publication::{NewPublication, Publication},
    repository::{
        PublicationRepository, RepositoryError,
        query::{Page, PublicationFilter, PublicationQuery},
    },
};

#[derive(Clone, Debug)]
pub struct PostgresPublicationRepository {
    database: &'static Database,
}

/// Columns read back into a [`Publication`], in select order
const COLUMNS: [&str; 12] = [
    ID_FIELD_NAME,
    TITLE_FIELD_NAME,
    DESCRIPTION_FIELD_NAME,
    CONTENT_FIELD_NAME,
    AUTHOR_ID_FIELD_NAME,
    STATUS_FIELD_NAME,
    CATEGORY_FIELD_NAME,
    PUBLICATION_TYPE_FIELD_NAME,
    REVIEW_COUNT_FIELD_NAME,
    VERSION_FIELD_NAME,
    CREATED_FIELD_NAME,
    UPDATED_FIELD_NAME,
];

static SELECT_COLUMNS: LazyLock<String> = LazyLock::new(|| {
    COLUMNS
        .iter()
        .map(|c| format!("\"{c}\""))
        .collect::<Vec<_>>()
        .join(", ")
});

static INSERT_SQL: LazyLock<String> = LazyLock::new(|| {
    format!(
        "INSERT INTO \"{PUBLICATIONS_TABLE_NAME}\" \
         (\"{TITLE_FIELD_NAME}\", \"{DESCRIPTION_FIELD_NAME}\", \"{CONTENT_FIELD_NAME}\", \
         \"{AUTHOR_ID_FIELD_NAME}\", \"{CATEGORY_FIELD_NAME}\", \"{STATUS_FIELD_NAME}\", \
         \"{PUBLICATION_TYPE_FIELD_NAME}\", \"{REVIEW_COUNT_FIELD_NAME}\", \"{VERSION_FIELD_NAME}\", \
         \"{CREATED_FIELD_NAME}\", \"{UPDATED_FIELD_NAME}\") \
         VALUES ($1, $2, $3, $4, $5, $6, $7, 0, 0, now(), now()) \
         RETURNING {}",
        *SELECT_COLUMNS
    )
});

static SELECT_BY_ID_SQL: LazyLock<String> = LazyLock::new(|| {
    format!(
        "SELECT {} FROM \"{PUBLICATIONS_TABLE_NAME}\" WHERE \"{ID_FIELD_NAME}\" = $1",
        *SELECT_COLUMNS
    )
});

/// Writes only if nobody moved the version since it was read
static COMPARE_AND_SET_SQL: LazyLock<String> = LazyLock::new(|| {
    format!(
        "UPDATE \"{PUBLICATIONS_TABLE_NAME}\" \
         SET \"{STATUS_FIELD_NAME}\" = $1, \"{REVIEW_COUNT_FIELD_NAME}\" = $2, \
         \"{VERSION_FIELD_NAME}\" = $3, \"{UPDATED_FIELD_NAME}\" = $4 \
         WHERE \"{ID_FIELD_NAME}\" = $5 AND \"{VERSION_FIELD_NAME}\" = $6 \
         RETURNING {}",
        *SELECT_COLUMNS
    )
});

static SELECT_VERSION_SQL: LazyLock<String> = LazyLock::new(|| {
    format!(
        "SELECT \"{VERSION_FIELD_NAME}\" FROM \"{PUBLICATIONS_TABLE_NAME}\" WHERE \"{ID_FIELD_NAME}\" = $1"
    )
});

impl PostgresPublicationRepository {
    pub fn new(database: &'static Database) -> Self {
        Self { database }
    }
}

impl PublicationRepository for PostgresPublicationRepository {
    async fn insert(&self, publication: NewPublication) -> Result<Publication, RepositoryError> {
        let row = sqlx::query(&INSERT_SQL)
            .bind(publication.title.into_inner())
            .bind(publication.description)
            .bind(publication.content)
            .bind(publication.author_id.0)
            .bind(publication.category.map(Category::into_inner))
            .bind(PublicationStatus::INITIAL.as_str())
            .bind(LITERARY_WORK)
            .fetch_one(self.database.database_pool())
            .await
            .map_err(database_error)?;

        Publication::try_from(row)
    }

    async fn find_by_id(&self, id: PublicationId) -> Result<Option<Publication>, RepositoryError> {
        let row = sqlx::query(&SELECT_BY_ID_SQL)
            .bind(id.0)
            .fetch_optional(self.database.database_pool())
            .await
            .map_err(database_error)?;

        row.map(Publication::try_from).transpose()
    }

    async fn find(&self, query: PublicationQuery) -> Result<Page<Publication>, RepositoryError> {
        let pool = self.database.database_pool();

        let total_elements: i64 =
            filtered(format!("SELECT COUNT(*) FROM \"{PUBLICATIONS_TABLE_NAME}\""), &query.filter)
                .build_query_scalar::<i64>()
                .fetch_one(pool)
                .await
                .map_err(database_error)?;

        let mut select = filtered(
            format!("SELECT {} FROM \"{PUBLICATIONS_TABLE_NAME}\"", *SELECT_COLUMNS),
            &query.filter,
        );
        select
            .push(format!(" ORDER BY \"{ID_FIELD_NAME}\" LIMIT "))
            .push_bind(query.size as i64)
            .push(" OFFSET ")
            .push_bind(query.offset() as i64);

        let mut rows = select.build().fetch(pool);
        let mut content = Vec::new();
        while let Some(row) = rows.try_next().await.map_err(database_error)? {
            content.push(Publication::try_from(row)?);
        }

        Ok(Page {
            content,
            page: query.page,
            size: query.size,
            total_elements: total_elements.max(0) as u64,
        })
    }

    async fn compare_and_set(
        &self,
        next: &Publication,
        expected_version: Version,
    ) -> Result<Publication, RepositoryError> {
        let pool = self.database.database_pool();

        let updated = sqlx::query(&COMPARE_AND_SET_SQL)
            .bind(next.status.as_str())
            .bind(next.review_count)
            .bind(next.version.0)
            .bind(next.updated_at)
            .bind(next.id.0)
            .bind(expected_version.0)
            .fetch_optional(pool)
            .await
            .map_err(database_error)?;

        if let Some(row) = updated {
            return Publication::try_from(row);
        }

        // nothing matched: either the row is gone or its version moved
        let actual: Option<i64> = sqlx::query_scalar(&SELECT_VERSION_SQL)
            .bind(next.id.0)
            .fetch_optional(pool)
            .await
            .map_err(database_error)?;

        match actual {
            Some(actual) => Err(RepositoryError::VersionMismatch {
                actual: Version(actual),
            }),
            None => Err(RepositoryError::NotFound),
        }
    }
}

/// `base` followed by the WHERE clause of `filter`
fn filtered(base: String, filter: &PublicationFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(base);
    match filter {
        PublicationFilter::All => {}
        PublicationFilter::Status(status) => {
            builder
                .push(format!(" WHERE \"{STATUS_FIELD_NAME}\" = "))
                .push_bind(status.as_str());
        }
        PublicationFilter::Author(author_id) => {
            builder
                .push(format!(" WHERE \"{AUTHOR_ID_FIELD_NAME}\" = "))
                .push_bind(author_id.0);
        }
    }
    builder
}

fn database_error(error: sqlx::Error) -> RepositoryError {
    RepositoryError::DatabaseError(error.to_string())
}

impl TryFrom<PgRow> for Publication {
    type Error = RepositoryError;

    fn try_from(row: PgRow) -> Result<Self, Self::Error> {
        fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, RepositoryError>
        where
            T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
        {
            row.try_get(name).map_err(|e| {
                RepositoryError::DatabaseError(format!("Failed to parse {}: {}", name, e))
            })
        }

        let title: String = column(&row, TITLE_FIELD_NAME)?;
        let title = PublicationTitle::try_new(title)
            .map_err(|e| RepositoryError::DatabaseError(format!("Stored title is invalid: {}", e)))?;

        let status: String = column(&row, STATUS_FIELD_NAME)?;
        let status = status
            .parse::<PublicationStatus>()
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let category: Option<String> = column(&row, CATEGORY_FIELD_NAME)?;
        let category = category
            .map(|c| Category::try_new(c))
            .transpose()
            .map_err(|e| {
                RepositoryError::DatabaseError(format!("Stored category is invalid: {}", e))
            })?;

        let created_at: DateTime<Utc> = column(&row, CREATED_FIELD_NAME)?;
        let updated_at: DateTime<Utc> = column(&row, UPDATED_FIELD_NAME)?;

        Ok(Publication {
            id: PublicationId(column(&row, ID_FIELD_NAME)?),
            title,
            description: column(&row, DESCRIPTION_FIELD_NAME)?,
            content: column(&row, CONTENT_FIELD_NAME)?,
            author_id: AuthorId(column(&row, AUTHOR_ID_FIELD_NAME)?),
            category,
            status,
            review_count: column(&row, REVIEW_COUNT_FIELD_NAME)?,
            version: Version(column(&row, VERSION_FIELD_NAME)?),
            created_at,
            updated_at,
        })
    }
}
