use std::collections::HashSet;

use crate::domain::{
    persistence::Persistence,
    tables::{Column, Index, Table, publication_tables},
};

pub trait MigrationStep {
    fn ctx(&self) -> &'static str;
    fn ddls(self) -> Vec<String>;
}

pub struct CreateTableStep {
    ddls: Vec<String>,
}

impl CreateTableStep {
    fn new(database_schema: &str, table: &Table) -> Self {
        let ddls = create_table_ddl(database_schema, table);
        Self { ddls }
    }
}

impl MigrationStep for CreateTableStep {
    fn ctx(&self) -> &'static str {
        "CREATE TABLE"
    }

    fn ddls(self) -> Vec<String> {
        self.ddls
    }
}

/// Brings the database schema up to what the service needs.
pub struct Migration<P> {
    persistence: P,
}

impl<P: Persistence> Migration<P> {
    pub fn new(persistence: P) -> Self {
        Self { persistence }
    }

    /// Returns the names of the tables created by this run.
    pub async fn migrate(&self) -> Result<Vec<String>, anyhow::Error> {
        let existing = self.persistence.load().await?;
        let needed = publication_tables();

        let created = needed
            .iter()
            .filter(|table| !existing.contains(&table.name))
            .map(|table| table.name.clone())
            .collect::<Vec<_>>();

        let steps = migration_steps(self.persistence.database_schema(), &needed, &existing);
        self.persistence.apply_migration_steps(steps).await?;

        Ok(created)
    }
}

/// One step per missing table
pub fn migration_steps(
    database_schema: &str,
    needed: &[Table],
    existing: &HashSet<String>,
) -> Vec<CreateTableStep> {
    needed
        .iter()
        .filter(|table| {
            let missing = !existing.contains(&table.name);
            if !missing {
                tracing::info!(table = %table.name, "table already exists, skipping");
            }
            missing
        })
        .map(|table| CreateTableStep::new(database_schema, table))
        .collect()
}

fn create_table_ddl(schema: &str, table: &Table) -> Vec<String> {
    let mut columns = Vec::new();
    let mut pk_columns = Vec::new();

    for column in table.columns.iter() {
        columns.push(column_ddl(column));
        if column.primary_key {
            pk_columns.push(&column.name as &str);
        }
    }

    let columns_sql = columns.join(",\n    ");
    let pk_columns_sql = pk_columns.join(",");

    let table_ddl = format!(
        "CREATE TABLE IF NOT EXISTS \"{}\".\"{}\" (\n    {},\n    PRIMARY KEY({})\n)",
        schema, table.name, columns_sql, pk_columns_sql
    );

    let mut ddls = vec![table_ddl];

    for index in table.indexes.iter() {
        ddls.push(create_index_ddl(schema, index));
    }

    ddls
}

fn column_ddl(column: &Column) -> String {
    let mut sql = format!("\"{}\" {}", column.name, column.column_type);
    if column.not_null {
        sql.push_str(" NOT NULL");
    }
    if let Some(default_value) = &column.default_value {
        sql.push_str(format!(" DEFAULT {}", default_value).as_str());
    }
    if let Some(check) = &column.check {
        sql.push_str(format!(" CHECK ({})", check).as_str());
    }
    sql
}

fn create_index_ddl(schema: &str, index: &Index) -> String {
    let columns_sql = index
        .columns
        .iter()
        .map(|c| format!("\"{c}\""))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "CREATE {}INDEX IF NOT EXISTS \"{}_{}_idx\" ON \"{}\".\"{}\" ({})",
        if index.unique { "UNIQUE " } else { "" },
        index.table_name,
        index.columns.join("_"),
        schema,
        index.table_name,
        columns_sql
    )
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn publications_ddls(schema: &str) -> Vec<String> {
        let steps = migration_steps(schema, &publication_tables(), &HashSet::new());
        assert_eq!(steps.len(), 1);
        steps.into_iter().flat_map(MigrationStep::ddls).collect()
    }

    #[test]
    fn creates_publications_table_with_status_guard() {
        let ddls = publications_ddls("editorial");
        let table = &ddls[0];

        assert!(table.starts_with("CREATE TABLE IF NOT EXISTS \"editorial\".\"publications\""));
        assert!(table.contains(
            "\"status\" VARCHAR(20) NOT NULL DEFAULT 'DRAFT' \
             CHECK (\"status\" IN ('DRAFT', 'IN_REVIEW', 'APPROVED', 'PUBLISHED', 'REJECTED'))"
        ));
        assert!(table.contains("\"version\" BIGINT NOT NULL DEFAULT 0"));
        assert!(table.contains("\"id\" BIGSERIAL"));
        assert!(table.contains("PRIMARY KEY(id)"));
    }

    #[test]
    fn indexes_status_and_author() {
        let ddls = publications_ddls("public");

        assert_eq!(
            &ddls[1..],
            [
                "CREATE INDEX IF NOT EXISTS \"publications_status_idx\" ON \"public\".\"publications\" (\"status\")",
                "CREATE INDEX IF NOT EXISTS \"publications_author_id_idx\" ON \"public\".\"publications\" (\"author_id\")",
            ]
        );
    }

    #[test]
    fn existing_tables_are_skipped() {
        let existing = HashSet::from(["publications".to_string()]);
        let steps = migration_steps("public", &publication_tables(), &existing);
        assert!(steps.is_empty());
    }

    #[derive(Clone, Default)]
    struct RecordingPersistence {
        existing: HashSet<String>,
        applied: Arc<Mutex<Vec<(&'static str, Vec<String>)>>>,
    }

    impl Persistence for RecordingPersistence {
        async fn load(&self) -> Result<HashSet<String>, anyhow::Error> {
            Ok(self.existing.clone())
        }

        async fn apply_migration_steps(
            &self,
            steps: Vec<impl MigrationStep>,
        ) -> Result<(), anyhow::Error> {
            let mut applied = self.applied.lock().unwrap();
            for step in steps {
                let ctx = step.ctx();
                applied.push((ctx, step.ddls()));
            }
            Ok(())
        }

        fn database_schema(&self) -> &str {
            "public"
        }
    }

    #[tokio::test]
    async fn migrate_applies_one_transaction_per_table() {
        let persistence = RecordingPersistence::default();

        let created = Migration::new(persistence.clone()).migrate().await.unwrap();

        assert_eq!(created, ["publications"]);
        let applied = persistence.applied.lock().unwrap();
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].0, "CREATE TABLE");
        assert_eq!(applied[0].1.len(), 3);
    }

    #[tokio::test]
    async fn second_run_is_a_no_op() {
        let persistence = RecordingPersistence {
            existing: HashSet::from(["publications".to_string()]),
            ..Default::default()
        };

        let created = Migration::new(persistence.clone()).migrate().await.unwrap();

        assert!(created.is_empty());
        assert!(persistence.applied.lock().unwrap().is_empty());
    }
}
