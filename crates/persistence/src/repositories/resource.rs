//! Generic repository over the JSONB resource tables.
//!
//! Every resource table has the same shape (`id, data, is_active,
//! created_at, updated_at, deleted_at`); the entity's own fields live in
//! `data` and filters read them with `data->>'field'`.

use std::marker::PhantomData;

use domain::models::{MatchMode, Record, Resource, ResourceFilter};
use domain::store::ResourceStore;
use domain::DomainResult;
use shared::pagination::{Page, PageRequest};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::entities::record::{to_document, RecordEntity};
use crate::metrics::QueryTimer;

use super::escape_like;

/// PostgreSQL implementation of [`ResourceStore`] for one resource type.
pub struct PgResourceRepository<R> {
    pool: PgPool,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for PgResourceRepository<R> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> PgResourceRepository<R> {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _resource: PhantomData,
        }
    }
}

/// Appends the WHERE clause for `filter`. Field names come from the
/// resource's static filter declarations, values are always bound.
fn push_conditions(builder: &mut QueryBuilder<'_, Postgres>, filter: &ResourceFilter) {
    builder.push(" WHERE TRUE");
    if !filter.with_inactive {
        builder.push(" AND is_active = TRUE");
    }
    for condition in &filter.conditions {
        builder.push(format!(" AND data->>'{}'", condition.field));
        match condition.mode {
            MatchMode::Exact => {
                builder.push(" = ");
                builder.push_bind(condition.value.clone());
            }
            MatchMode::Contains => {
                builder.push(" ILIKE ");
                builder.push_bind(format!("%{}%", escape_like(&condition.value)));
            }
        }
    }
}

#[async_trait::async_trait]
impl<R: Resource> ResourceStore<R> for PgResourceRepository<R> {
    async fn insert(&self, record: &Record<R>) -> DomainResult<()> {
        let data = to_document(&record.data)?;
        let timer = QueryTimer::new(R::TABLE, "insert");
        timer.finish(
            sqlx::query(&format!(
                r#"
                INSERT INTO {} (id, data, is_active, created_at, updated_at, deleted_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
                R::TABLE
            ))
            .bind(record.id)
            .bind(data)
            .bind(record.is_active)
            .bind(record.created_at)
            .bind(record.updated_at)
            .bind(record.deleted_at)
            .execute(&self.pool)
            .await,
        )?;
        Ok(())
    }

    async fn find(&self, id: Uuid) -> DomainResult<Option<Record<R>>> {
        let timer = QueryTimer::new(R::TABLE, "find");
        let entity = timer.finish(
            sqlx::query_as::<_, RecordEntity>(&format!(
                r#"
                SELECT id, data, is_active, created_at, updated_at, deleted_at
                FROM {}
                WHERE id = $1
                "#,
                R::TABLE
            ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await,
        )?;

        entity.map(RecordEntity::into_record).transpose()
    }

    async fn update(&self, record: &Record<R>) -> DomainResult<()> {
        let data = to_document(&record.data)?;
        let timer = QueryTimer::new(R::TABLE, "update");
        timer.finish(
            sqlx::query(&format!(
                r#"
                UPDATE {}
                SET data = $2, is_active = $3, updated_at = $4, deleted_at = $5
                WHERE id = $1
                "#,
                R::TABLE
            ))
            .bind(record.id)
            .bind(data)
            .bind(record.is_active)
            .bind(record.updated_at)
            .bind(record.deleted_at)
            .execute(&self.pool)
            .await,
        )?;
        Ok(())
    }

    async fn remove(&self, id: Uuid) -> DomainResult<bool> {
        let timer = QueryTimer::new(R::TABLE, "delete");
        let result = timer.finish(
            sqlx::query(&format!("DELETE FROM {} WHERE id = $1", R::TABLE))
                .bind(id)
                .execute(&self.pool)
                .await,
        )?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, filter: &ResourceFilter, page: PageRequest) -> DomainResult<Page<Record<R>>> {
        let mut count = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {}", R::TABLE));
        push_conditions(&mut count, filter);

        let timer = QueryTimer::new(R::TABLE, "count");
        let total: i64 = timer.finish(count.build_query_scalar::<i64>().fetch_one(&self.pool).await)?;

        let mut select = QueryBuilder::<Postgres>::new(format!(
            "SELECT id, data, is_active, created_at, updated_at, deleted_at FROM {}",
            R::TABLE
        ));
        push_conditions(&mut select, filter);
        select.push(" ORDER BY created_at DESC, id LIMIT ");
        select.push_bind(page.limit() as i64);
        select.push(" OFFSET ");
        select.push_bind(page.offset() as i64);

        let timer = QueryTimer::new(R::TABLE, "list");
        let entities = timer.finish(
            select
                .build_query_as::<RecordEntity>()
                .fetch_all(&self.pool)
                .await,
        )?;

        let records = entities
            .into_iter()
            .map(RecordEntity::into_record)
            .collect::<DomainResult<Vec<_>>>()?;
        Ok(Page::new(records, page, total.max(0) as u64))
    }
}
