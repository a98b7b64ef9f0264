//! 인메모리 저장소.
//!
//! 데이터베이스 URL이 설정되지 않았을 때와 테스트에서 사용합니다.
//! 삽입 순서를 유지하므로 페이지네이션 결과가 결정적입니다.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::domain::Entity;
use crate::error::{PortfluxError, PortfluxResult};
use crate::ports::{not_found, Filter, Pagination, Repository};

/// `Vec` 기반 저장소.
#[derive(Debug)]
pub struct MemoryRepository<E: Entity> {
    records: RwLock<Vec<E>>,
}

impl<E: Entity> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> MemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// 저장된 레코드 수.
    pub fn len(&self) -> usize {
        self.read().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> PortfluxResult<RwLockReadGuard<'_, Vec<E>>> {
        self.records
            .read()
            .map_err(|_| PortfluxError::Internal(format!("{} store lock poisoned", E::NAME)))
    }

    fn write(&self) -> PortfluxResult<RwLockWriteGuard<'_, Vec<E>>> {
        self.records
            .write()
            .map_err(|_| PortfluxError::Internal(format!("{} store lock poisoned", E::NAME)))
    }
}

fn duplicate_id<E: Entity>(id: Uuid) -> PortfluxError {
    PortfluxError::Conflict(format!("{} {} already exists", E::NAME, id))
}

/// `E::UNIQUE` 컬럼 값이 다른 레코드와 겹치면 Conflict.
fn unique_conflict<E: Entity>(records: &[E], entity: &E) -> Option<PortfluxError> {
    E::UNIQUE.iter().find_map(|column| {
        let value = entity.filter_value(column)?;
        records
            .iter()
            .any(|record| {
                record.id() != entity.id() && record.filter_value(column).as_ref() == Some(&value)
            })
            .then(|| PortfluxError::Conflict(format!("{} already exists ({})", E::NAME, column)))
    })
}

#[async_trait]
impl<E: Entity> Repository<E> for MemoryRepository<E> {
    async fn get(&self, filter: &Filter, page: Pagination) -> PortfluxResult<Vec<E>> {
        filter.ensure_allowed::<E>()?;

        let records = self.read()?;
        let skip = page.skip.unwrap_or(0) as usize;
        let take = page.take.map(|t| t as usize).unwrap_or(usize::MAX);

        let found: Vec<E> = records
            .iter()
            .filter(|record| filter.matches(*record))
            .skip(skip)
            .take(take)
            .cloned()
            .collect();

        if found.is_empty() {
            return Err(not_found::<E>());
        }
        Ok(found)
    }

    async fn get_by_id(&self, id: Uuid) -> PortfluxResult<E> {
        self.read()?
            .iter()
            .find(|record| record.id() == id)
            .cloned()
            .ok_or_else(not_found::<E>)
    }

    async fn create(&self, entity: E) -> PortfluxResult<Uuid> {
        let mut records = self.write()?;
        let id = entity.id();
        if records.iter().any(|record| record.id() == id) {
            return Err(duplicate_id::<E>(id));
        }
        if let Some(err) = unique_conflict(&records, &entity) {
            return Err(err);
        }
        records.push(entity);
        debug!(entity = E::NAME, %id, "Record stored in memory");
        Ok(id)
    }

    async fn create_many(&self, entities: Vec<E>) -> PortfluxResult<Vec<Uuid>> {
        let mut records = self.write()?;

        // 쓰기 잠금을 쥔 채로 전체를 먼저 검사해야 부분 저장이 생기지 않는다
        let mut ids = Vec::with_capacity(entities.len());
        for (i, entity) in entities.iter().enumerate() {
            let id = entity.id();
            if ids.contains(&id) || records.iter().any(|record| record.id() == id) {
                return Err(duplicate_id::<E>(id));
            }
            if let Some(err) = unique_conflict(&records, entity)
                .or_else(|| unique_conflict(&entities[..i], entity))
            {
                return Err(err);
            }
            ids.push(id);
        }

        records.extend(entities);
        debug!(entity = E::NAME, count = ids.len(), "Records stored in memory");
        Ok(ids)
    }

    async fn update(&self, id: Uuid, entity: E) -> PortfluxResult<()> {
        let mut records = self.write()?;
        if let Some(err) = unique_conflict(&records, &entity) {
            return Err(err);
        }
        let slot = records
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or_else(not_found::<E>)?;
        *slot = entity;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> PortfluxResult<()> {
        let mut records = self.write()?;
        let before = records.len();
        records.retain(|record| record.id() != id);
        if records.len() == before {
            return Err(not_found::<E>());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Currency, CurrencyRequest, Resource, Role, User};
    use chrono::Utc;
    use std::sync::Arc;

    fn currency(code: &str) -> Currency {
        Currency::from_create(
            Uuid::new_v4(),
            CurrencyRequest {
                code: code.to_string(),
                name: format!("{} currency", code),
                symbol: code.to_string(),
            },
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_empty_store_reports_not_found() {
        let repo = MemoryRepository::<Currency>::new();
        let err = repo.get(&Filter::new(), Pagination::all()).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(repo.get_by_id(Uuid::new_v4()).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_pagination_preserves_insertion_order() {
        let repo = MemoryRepository::<Currency>::new();
        for code in ["EUR", "USD", "JPY", "GBP"] {
            repo.create(currency(code)).await.unwrap();
        }

        let page = repo
            .get(&Filter::new(), Pagination::new(Some(1), Some(2)))
            .await
            .unwrap();
        let codes: Vec<_> = page.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["USD", "JPY"]);
    }

    #[tokio::test]
    async fn test_filtered_get() {
        let repo = MemoryRepository::<Currency>::new();
        repo.create(currency("EUR")).await.unwrap();
        repo.create(currency("USD")).await.unwrap();

        let found = repo
            .get(&Filter::new().eq("code", "USD"), Pagination::all())
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code, "USD");

        let err = repo
            .get(&Filter::new().eq("created_at", "x"), Pagination::all())
            .await
            .unwrap_err();
        assert!(matches!(err, PortfluxError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_many_is_all_or_nothing() {
        let repo = MemoryRepository::<Currency>::new();
        let existing = currency("EUR");
        repo.create(existing.clone()).await.unwrap();

        let err = repo
            .create_many(vec![currency("USD"), existing])
            .await
            .unwrap_err();
        assert!(matches!(err, PortfluxError::Conflict(_)));
        assert_eq!(repo.len(), 1);

        let ids = repo
            .create_many(vec![currency("USD"), currency("JPY")])
            .await
            .unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(repo.len(), 3);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_record() {
        let repo = MemoryRepository::<Currency>::new();
        let eur = currency("EUR");
        let id = eur.id;

        assert!(repo.update(id, eur.clone()).await.unwrap_err().is_not_found());
        repo.create(eur.clone()).await.unwrap();

        let mut renamed = eur;
        renamed.name = "Euro".to_string();
        repo.update(id, renamed).await.unwrap();
        assert_eq!(repo.get_by_id(id).await.unwrap().name, "Euro");

        repo.delete(id).await.unwrap();
        assert!(repo.delete(id).await.unwrap_err().is_not_found());
        assert!(repo.is_empty());
    }

    fn user(email: &str) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            firstname: "Ada".to_string(),
            lastname: "Lovelace".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: Role::Member,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_unique_column_enforced_under_write_lock() {
        let repo = MemoryRepository::<User>::new();
        let ada = user("ada@example.com");
        repo.create(ada.clone()).await.unwrap();

        let err = repo.create(user("ada@example.com")).await.unwrap_err();
        assert!(matches!(err, PortfluxError::Conflict(_)));

        let err = repo
            .create_many(vec![user("grace@example.com"), user("grace@example.com")])
            .await
            .unwrap_err();
        assert!(matches!(err, PortfluxError::Conflict(_)));
        assert_eq!(repo.len(), 1);

        let grace = user("grace@example.com");
        repo.create(grace.clone()).await.unwrap();
        let mut renamed = grace.clone();
        renamed.email = "ada@example.com".to_string();
        assert!(matches!(
            repo.update(grace.id, renamed).await,
            Err(PortfluxError::Conflict(_))
        ));

        // 자기 자신과는 충돌하지 않음
        repo.update(ada.id, ada.clone()).await.unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_creates_store_one_unique_value() {
        let repo = Arc::new(MemoryRepository::<User>::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.create(user("race@example.com")).await })
            })
            .collect();

        let mut stored = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                stored += 1;
            }
        }
        assert_eq!(stored, 1);
        assert_eq!(repo.len(), 1);
    }
}
