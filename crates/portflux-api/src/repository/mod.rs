//! PostgreSQL 저장소.
//!
//! 엔티티마다 테이블과 컬럼 값만 [`PgEntity`]로 정의하고,
//! SELECT/INSERT/UPDATE/DELETE 문은 [`PgRepository`]가 공통으로 생성합니다.
//!
//! 모든 값은 `QueryBuilder::push_bind`로 바인딩됩니다. SQL 문자열에 들어가는
//! 식별자는 코드에 고정된 테이블/컬럼 이름과 필터 허용 목록을 통과한 컬럼뿐입니다.

mod entities;

use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use portflux_core::{
    not_found, Entity, Filter, FilterValue, Pagination, PortfluxError, PortfluxResult, Repository,
};
use rust_decimal::Decimal;
use sqlx::{postgres::PgRow, FromRow, PgPool, Postgres, QueryBuilder};
use tracing::{debug, error};
use uuid::Uuid;

/// 바인딩할 컬럼 값.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Uuid(Uuid),
    OptUuid(Option<Uuid>),
    Decimal(Decimal),
    Int(i32),
    Bool(bool),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
}

impl SqlValue {
    fn bind_to(self, builder: &mut QueryBuilder<'_, Postgres>) {
        match self {
            SqlValue::Text(v) => builder.push_bind(v),
            SqlValue::Uuid(v) => builder.push_bind(v),
            SqlValue::OptUuid(v) => builder.push_bind(v),
            SqlValue::Decimal(v) => builder.push_bind(v),
            SqlValue::Int(v) => builder.push_bind(v),
            SqlValue::Bool(v) => builder.push_bind(v),
            SqlValue::Date(v) => builder.push_bind(v),
            SqlValue::Timestamp(v) => builder.push_bind(v),
        };
    }
}

fn bind_filter_value(value: &FilterValue, builder: &mut QueryBuilder<'_, Postgres>) {
    match value {
        FilterValue::Text(v) => builder.push_bind(v.clone()),
        FilterValue::Uuid(v) => builder.push_bind(*v),
        FilterValue::Bool(v) => builder.push_bind(*v),
        FilterValue::Int(v) => builder.push_bind(*v),
    };
}

/// PostgreSQL 테이블에 매핑되는 엔티티.
pub trait PgEntity: Entity + for<'r> FromRow<'r, PgRow> + Send + Unpin {
    /// 테이블 이름
    const TABLE: &'static str;

    /// `id`를 포함한 전체 컬럼 값. 순서는 INSERT 컬럼 순서가 됩니다.
    fn values(&self) -> Vec<(&'static str, SqlValue)>;
}

/// `SELECT ... WHERE col = $1 AND ... ORDER BY created_at, id OFFSET $n LIMIT $m`
fn build_select<'a, E: PgEntity>(
    filter: &Filter,
    page: Pagination,
) -> PortfluxResult<QueryBuilder<'a, Postgres>> {
    filter.ensure_allowed::<E>()?;

    let mut builder = QueryBuilder::new(format!("SELECT * FROM {}", E::TABLE));
    for (i, (column, value)) in filter.conditions().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        builder.push(column);
        builder.push(" = ");
        bind_filter_value(value, &mut builder);
    }

    builder.push(" ORDER BY created_at, id");
    if let Some(skip) = page.skip {
        builder.push(" OFFSET ");
        builder.push_bind(i64::from(skip));
    }
    if let Some(take) = page.take {
        builder.push(" LIMIT ");
        builder.push_bind(i64::from(take));
    }
    Ok(builder)
}

/// PostgreSQL 한 문장의 바인드 파라미터 상한
const MAX_BIND_PARAMS: usize = 65_535;

/// 바인드 파라미터 상한을 넘지 않도록 나눈 INSERT 문들.
fn build_insert_chunks<'a, E: PgEntity>(
    entities: &[E],
    max_params: usize,
) -> Vec<QueryBuilder<'a, Postgres>> {
    let Some(first) = entities.first() else {
        return Vec::new();
    };
    let rows_per_statement = (max_params / first.values().len().max(1)).max(1);

    entities
        .chunks(rows_per_statement)
        .map(build_insert)
        .collect()
}

/// 다건 `INSERT ... VALUES (...), (...) RETURNING id`
fn build_insert<'a, E: PgEntity>(entities: &[E]) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new(format!("INSERT INTO {} (", E::TABLE));

    if let Some(first) = entities.first() {
        let columns: Vec<&str> = first.values().iter().map(|(column, _)| *column).collect();
        builder.push(columns.join(", "));
    }
    builder.push(") VALUES ");

    for (i, entity) in entities.iter().enumerate() {
        if i > 0 {
            builder.push(", ");
        }
        builder.push("(");
        for (j, (_, value)) in entity.values().into_iter().enumerate() {
            if j > 0 {
                builder.push(", ");
            }
            value.bind_to(&mut builder);
        }
        builder.push(")");
    }

    builder.push(" RETURNING id");
    builder
}

/// `UPDATE ... SET col = $1, ... WHERE id = $n`
///
/// `id`와 `created_at`은 갱신하지 않습니다.
fn build_update<'a, E: PgEntity>(id: Uuid, entity: &E) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new(format!("UPDATE {} SET ", E::TABLE));

    let assignments = entity
        .values()
        .into_iter()
        .filter(|(column, _)| *column != "id" && *column != "created_at");
    for (i, (column, value)) in assignments.enumerate() {
        if i > 0 {
            builder.push(", ");
        }
        builder.push(column);
        builder.push(" = ");
        value.bind_to(&mut builder);
    }

    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder
}

/// sqlx 에러를 도메인 에러로 변환합니다.
fn map_sqlx_error<E: Entity>(err: sqlx::Error) -> PortfluxError {
    match err {
        sqlx::Error::RowNotFound => not_found::<E>(),
        sqlx::Error::Database(db) if db.is_unique_violation() => PortfluxError::Conflict(format!(
            "{} already exists ({})",
            E::NAME,
            db.constraint().unwrap_or("unique constraint")
        )),
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            PortfluxError::Validation(format!(
                "{} references a record that does not exist ({})",
                E::NAME,
                db.constraint().unwrap_or("foreign key")
            ))
        }
        other => {
            error!(entity = E::NAME, error = %other, "Database query failed");
            PortfluxError::Database(other.to_string())
        }
    }
}

/// 엔티티별 범용 PostgreSQL 저장소.
pub struct PgRepository<E> {
    pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E> PgRepository<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E: PgEntity> Repository<E> for PgRepository<E> {
    async fn get(&self, filter: &Filter, page: Pagination) -> PortfluxResult<Vec<E>> {
        let mut builder = build_select::<E>(filter, page)?;
        debug!(entity = E::NAME, sql = builder.sql(), "Selecting records");

        let rows = builder
            .build_query_as::<E>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error::<E>)?;

        if rows.is_empty() {
            return Err(not_found::<E>());
        }
        Ok(rows)
    }

    async fn get_by_id(&self, id: Uuid) -> PortfluxResult<E> {
        let mut builder = QueryBuilder::new(format!("SELECT * FROM {} WHERE id = ", E::TABLE));
        builder.push_bind(id);

        builder
            .build_query_as::<E>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error::<E>)
    }

    async fn create(&self, entity: E) -> PortfluxResult<Uuid> {
        let mut builder = build_insert(std::slice::from_ref(&entity));

        builder
            .build_query_scalar::<Uuid>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error::<E>)
    }

    async fn create_many(&self, entities: Vec<E>) -> PortfluxResult<Vec<Uuid>> {
        if entities.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.pool.begin().await.map_err(map_sqlx_error::<E>)?;
        let mut ids = Vec::with_capacity(entities.len());

        // 중간 청크가 실패하면 tx가 drop되면서 전체가 롤백된다
        for mut builder in build_insert_chunks(&entities, MAX_BIND_PARAMS) {
            let chunk_ids = builder
                .build_query_scalar::<Uuid>()
                .fetch_all(&mut *tx)
                .await
                .map_err(map_sqlx_error::<E>)?;
            ids.extend(chunk_ids);
        }

        tx.commit().await.map_err(map_sqlx_error::<E>)?;
        debug!(entity = E::NAME, count = ids.len(), "Records inserted");
        Ok(ids)
    }

    async fn update(&self, id: Uuid, entity: E) -> PortfluxResult<()> {
        let mut builder = build_update(id, &entity);

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error::<E>)?;

        if result.rows_affected() == 0 {
            return Err(not_found::<E>());
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> PortfluxResult<()> {
        let mut builder = QueryBuilder::new(format!("DELETE FROM {} WHERE id = ", E::TABLE));
        builder.push_bind(id);

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error::<E>)?;

        if result.rows_affected() == 0 {
            return Err(not_found::<E>());
        }
        Ok(())
    }
}
