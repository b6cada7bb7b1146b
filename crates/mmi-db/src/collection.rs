//! Document collection stored as JSONB rows in PostgreSQL.
//!
//! Each collection is a table `(id TEXT PRIMARY KEY, doc JSONB)`. Filters are
//! JSONB containment, so exact-equality on top-level fields is served by the
//! GIN index on `doc`.

use async_trait::async_trait;
use mmi_core::document::{Document, Filter, Sort, SortDirection, Update, ID_KEY};
use mmi_core::{Collection, CollectionError};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::config::validate_collection_name;
use crate::error::collection_error;
use crate::Result;

#[derive(Clone)]
pub struct PgCollection {
    pool: PgPool,
    name: String,
}

impl PgCollection {
    pub(crate) fn new(pool: PgPool, name: &str) -> Result<Self> {
        validate_collection_name(name)?;
        Ok(Self {
            pool,
            name: name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create the backing table and its indexes if they do not exist
    pub async fn ensure_schema(&self) -> Result<()> {
        for statement in schema_statements(&self.name) {
            sqlx::query(&statement).execute(&self.pool).await?;
        }

        tracing::debug!("Collection {} ready", self.name);
        Ok(())
    }
}

fn schema_statements(table: &str) -> Vec<String> {
    vec![
        format!(
            r#"CREATE TABLE IF NOT EXISTS "{table}" (
                id TEXT PRIMARY KEY,
                doc JSONB NOT NULL
            )"#
        ),
        format!(
            r#"CREATE INDEX IF NOT EXISTS "{table}_doc_idx" ON "{table}" USING GIN (doc jsonb_path_ops)"#
        ),
        format!(
            r#"CREATE INDEX IF NOT EXISTS "{table}_created_at_idx" ON "{table}" ((doc->>'created_at') COLLATE "C")"#
        ),
    ]
}

fn find_sql(table: &str, sort: Option<&Sort>) -> String {
    let mut sql = format!(r#"SELECT doc FROM "{table}" WHERE doc @> $1"#);
    if let Some(sort) = sort {
        let direction = match sort.direction {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        };
        sql.push_str(&format!(
            r#" ORDER BY (doc->>$2) COLLATE "C" {direction} NULLS FIRST, id"#
        ));
    }
    sql
}

fn insert_many_sql(table: &str) -> String {
    format!(
        r#"INSERT INTO "{table}" (id, doc)
        SELECT e->>'_id', e FROM jsonb_array_elements($1) AS e
        WHERE jsonb_typeof(e->'_id') = 'string'
        ON CONFLICT (id) DO NOTHING"#
    )
}

fn update_sql(table: &str) -> String {
    format!(
        r#"UPDATE "{table}" SET doc = doc || $2
        WHERE id = (SELECT id FROM "{table}" WHERE doc @> $1 LIMIT 1 FOR UPDATE)
        RETURNING doc"#
    )
}

fn delete_sql(table: &str) -> String {
    format!(
        r#"DELETE FROM "{table}"
        WHERE id = (SELECT id FROM "{table}" WHERE doc @> $1 LIMIT 1 FOR UPDATE)"#
    )
}

#[async_trait]
impl Collection for PgCollection {
    async fn insert_one(&self, document: Document) -> std::result::Result<(), CollectionError> {
        let id = document
            .get(ID_KEY)
            .and_then(Value::as_str)
            .ok_or_else(|| CollectionError::Malformed(format!("missing string {}", ID_KEY)))?
            .to_string();

        let sql = format!(r#"INSERT INTO "{}" (id, doc) VALUES ($1, $2)"#, self.name);
        sqlx::query(&sql)
            .bind(id)
            .bind(Json(&document))
            .execute(&self.pool)
            .await
            .map_err(collection_error)?;

        Ok(())
    }

    async fn insert_many(
        &self,
        documents: Vec<Document>,
    ) -> std::result::Result<u64, CollectionError> {
        let attempted = documents.len() as u64;

        let result = sqlx::query(&insert_many_sql(&self.name))
            .bind(Json(&documents))
            .execute(&self.pool)
            .await
            .map_err(collection_error)?;

        let inserted = result.rows_affected();
        if inserted < attempted {
            tracing::warn!(
                "Bulk insert into {} skipped {} of {} documents",
                self.name,
                attempted - inserted,
                attempted
            );
            return Err(CollectionError::BulkWrite {
                inserted,
                attempted,
            });
        }
        Ok(inserted)
    }

    async fn find_one(
        &self,
        filter: &Filter,
    ) -> std::result::Result<Option<Document>, CollectionError> {
        let sql = format!("{} LIMIT 1", find_sql(&self.name, None));
        let found = sqlx::query_scalar::<_, Json<Document>>(&sql)
            .bind(Json(filter.fields()))
            .fetch_optional(&self.pool)
            .await
            .map_err(collection_error)?;

        Ok(found.map(|Json(document)| document))
    }

    async fn find(
        &self,
        filter: &Filter,
        sort: Option<&Sort>,
    ) -> std::result::Result<Vec<Document>, CollectionError> {
        let sql = find_sql(&self.name, sort);
        let mut query = sqlx::query_scalar::<_, Json<Document>>(&sql).bind(Json(filter.fields()));
        if let Some(sort) = sort {
            query = query.bind(sort.field.as_str());
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(collection_error)?;

        Ok(rows.into_iter().map(|Json(document)| document).collect())
    }

    async fn find_one_and_update(
        &self,
        filter: &Filter,
        update: &Update,
    ) -> std::result::Result<Option<Document>, CollectionError> {
        let updated = sqlx::query_scalar::<_, Json<Document>>(&update_sql(&self.name))
            .bind(Json(filter.fields()))
            .bind(Json(update.fields()))
            .fetch_optional(&self.pool)
            .await
            .map_err(collection_error)?;

        Ok(updated.map(|Json(document)| document))
    }

    async fn delete_one(&self, filter: &Filter) -> std::result::Result<u64, CollectionError> {
        let result = sqlx::query(&delete_sql(&self.name))
            .bind(Json(filter.fields()))
            .execute(&self.pool)
            .await
            .map_err(collection_error)?;

        Ok(result.rows_affected())
    }
}
