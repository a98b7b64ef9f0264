//! 범용 CRUD 서비스.

use std::sync::Arc;

use chrono::Utc;
use portflux_core::{
    validate_request, Broker, CreationResponse, Entity, Filter, MultiCreationResponse,
    Pagination, PortfluxError, PortfluxResult, Repository, Resource,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::observe;

/// 엔티티별 CRUD 서비스.
pub struct CrudService<E: Resource> {
    repository: Arc<dyn Repository<E>>,
}

impl<E: Resource> Clone for CrudService<E> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

fn id_not_found(id: Uuid) -> PortfluxError {
    PortfluxError::NotFound(format!("ID {} not found", id))
}

impl<E: Resource> CrudService<E> {
    pub fn new(repository: Arc<dyn Repository<E>>) -> Self {
        Self { repository }
    }

    /// 검증 후 새 ID와 타임스탬프를 부여해 저장합니다.
    pub async fn create(&self, request: E::Create) -> PortfluxResult<CreationResponse> {
        let result: PortfluxResult<CreationResponse> = async {
            validate_request(&request)?;
            let entity = E::from_create(Uuid::new_v4(), request, Utc::now());
            let inserted_id = self.repository.create(entity).await?;
            info!(entity = E::NAME, id = %inserted_id, "Record created");
            Ok(CreationResponse { inserted_id })
        }
        .await;
        observe(E::NAME, "create", result)
    }

    /// 전체 요청을 먼저 검증하고, 모두 유효할 때만 한 번에 저장합니다.
    pub async fn create_many(
        &self,
        requests: Vec<E::Create>,
    ) -> PortfluxResult<MultiCreationResponse> {
        let result: PortfluxResult<MultiCreationResponse> = async {
            if requests.is_empty() {
                return Err(PortfluxError::Validation(
                    "at least one item is required".to_string(),
                ));
            }
            for request in &requests {
                validate_request(request)?;
            }

            let now = Utc::now();
            let entities: Vec<E> = requests
                .into_iter()
                .map(|request| E::from_create(Uuid::new_v4(), request, now))
                .collect();

            let inserted_ids = self.repository.create_many(entities).await?;
            info!(entity = E::NAME, count = inserted_ids.len(), "Records created");
            Ok(MultiCreationResponse { inserted_ids })
        }
        .await;
        observe(E::NAME, "create_many", result)
    }

    /// 목록 조회. 결과가 없으면 빈 목록을 반환합니다.
    pub async fn get_all(&self, page: Pagination) -> PortfluxResult<Vec<E::Response>> {
        debug!(entity = E::NAME, skip = ?page.skip, take = ?page.take, "Listing records");
        let result = match self.repository.get(&Filter::new(), page).await {
            Ok(records) => Ok(records.into_iter().map(E::Response::from).collect()),
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            Err(e) => Err(e),
        };
        observe(E::NAME, "get_all", result)
    }

    pub async fn get_by_id(&self, id: Uuid) -> PortfluxResult<E::Response> {
        debug!(entity = E::NAME, %id, "Fetching record");
        let result = self.load(id).await.map(E::Response::from);
        observe(E::NAME, "get_by_id", result)
    }

    /// 필터에 맞는 첫 레코드. 없으면 `missing` 메시지로 NotFound를 반환합니다.
    pub async fn find_one(
        &self,
        filter: Filter,
        missing: impl FnOnce() -> String,
    ) -> PortfluxResult<E::Response> {
        match self.repository.get(&filter, Pagination::new(None, Some(1))).await {
            Ok(records) => records
                .into_iter()
                .next()
                .map(E::Response::from)
                .ok_or_else(|| PortfluxError::NotFound(missing())),
            Err(e) if e.is_not_found() => Err(PortfluxError::NotFound(missing())),
            Err(e) => Err(e),
        }
    }

    /// 검증 후 현재 레코드에 변경 사항을 반영합니다.
    pub async fn update(&self, id: Uuid, request: E::Update) -> PortfluxResult<()> {
        let result: PortfluxResult<()> = async {
            validate_request(&request)?;
            let mut entity = self.load(id).await?;
            entity.apply_update(request, Utc::now());
            self.repository.update(id, entity).await.map_err(|e| {
                if e.is_not_found() {
                    id_not_found(id)
                } else {
                    e
                }
            })?;
            info!(entity = E::NAME, %id, "Record updated");
            Ok(())
        }
        .await;
        observe(E::NAME, "update", result)
    }

    pub async fn delete(&self, id: Uuid) -> PortfluxResult<()> {
        let result = match self.repository.delete(id).await {
            Ok(()) => {
                info!(entity = E::NAME, %id, "Record deleted");
                Ok(())
            }
            Err(e) if e.is_not_found() => Err(id_not_found(id)),
            Err(e) => Err(e),
        };
        observe(E::NAME, "delete", result)
    }

    async fn load(&self, id: Uuid) -> PortfluxResult<E> {
        self.repository.get_by_id(id).await.map_err(|e| {
            if e.is_not_found() {
                id_not_found(id)
            } else {
                e
            }
        })
    }
}

impl CrudService<Broker> {
    /// slug로 증권사를 조회합니다.
    pub async fn get_by_slug(&self, slug: &str) -> PortfluxResult<Broker> {
        debug!(%slug, "Fetching broker by slug");
        let result = self
            .find_one(Filter::new().eq("slug", slug), || {
                format!("slug {} not found", slug)
            })
            .await;
        observe(Broker::NAME, "get_by_slug", result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portflux_core::{
        CreateBrokerRequest, Currency, CurrencyRequest, MemoryRepository, UpdateBrokerRequest,
    };

    fn currency_service() -> CrudService<Currency> {
        CrudService::new(Arc::new(MemoryRepository::<Currency>::new()))
    }

    fn euro() -> CurrencyRequest {
        CurrencyRequest {
            code: "EUR".into(),
            name: "Euro".into(),
            symbol: "€".into(),
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let service = currency_service();
        let created = service.create(euro()).await.unwrap();

        let currency = service.get_by_id(created.inserted_id).await.unwrap();
        assert_eq!(currency.id, created.inserted_id);
        assert_eq!(currency.code, "EUR");
        assert_eq!(currency.created_at, currency.updated_at);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_request() {
        let service = currency_service();
        let err = service.create(CurrencyRequest::default()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "symbol cannot be empty | code cannot be empty | name cannot be empty"
        );
        assert!(service.get_all(Pagination::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_many_aborts_on_first_invalid_request() {
        let service = currency_service();
        let err = service
            .create_many(vec![
                euro(),
                CurrencyRequest {
                    code: "USD".into(),
                    name: String::new(),
                    symbol: "$".into(),
                },
            ])
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "name cannot be empty");
        assert!(service.get_all(Pagination::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_many_empty_batch() {
        let err = currency_service().create_many(Vec::new()).await.unwrap_err();
        assert!(matches!(err, PortfluxError::Validation(_)));
    }

    #[tokio::test]
    async fn test_get_all_on_empty_store_is_empty_list() {
        let list = currency_service().get_all(Pagination::all()).await.unwrap();
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn test_missing_id_message() {
        let service = currency_service();
        let id = Uuid::new_v4();

        let err = service.get_by_id(id).await.unwrap_err();
        assert_eq!(err.to_string(), format!("ID {} not found", id));

        let err = service.update(id, euro()).await.unwrap_err();
        assert_eq!(err.to_string(), format!("ID {} not found", id));

        let err = service.delete(id).await.unwrap_err();
        assert_eq!(err.to_string(), format!("ID {} not found", id));
    }

    #[tokio::test]
    async fn test_update_refreshes_timestamp() {
        let service = currency_service();
        let id = service.create(euro()).await.unwrap().inserted_id;

        service
            .update(
                id,
                CurrencyRequest {
                    name: "European euro".into(),
                    ..euro()
                },
            )
            .await
            .unwrap();

        let updated = service.get_by_id(id).await.unwrap();
        assert_eq!(updated.name, "European euro");
        assert!(updated.updated_at >= updated.created_at);
    }

    #[tokio::test]
    async fn test_broker_slug_lookup() {
        let service: CrudService<Broker> =
            CrudService::new(Arc::new(MemoryRepository::<Broker>::new()));
        let id = service
            .create(CreateBrokerRequest {
                extid: "ib".into(),
                name: "Interactive Brokers".into(),
                description: "IBKR".into(),
            })
            .await
            .unwrap()
            .inserted_id;

        let broker = service.get_by_slug("interactive-brokers").await.unwrap();
        assert_eq!(broker.id, id);

        service
            .update(
                id,
                UpdateBrokerRequest {
                    name: "IBKR Pro".into(),
                    description: "Pro tier".into(),
                },
            )
            .await
            .unwrap();
        assert!(service.get_by_slug("ibkr-pro").await.is_ok());

        let err = service.get_by_slug("interactive-brokers").await.unwrap_err();
        assert_eq!(err.to_string(), "slug interactive-brokers not found");
    }
}
