//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 Arc로 래핑되어 여러 요청 간에 공유됩니다.
//! 엔티티마다 서비스 하나를 두며, 저장소 구현(PostgreSQL 또는 메모리)은 생성 시점에 결정됩니다.

use std::sync::Arc;

use portflux_core::{
    AuthConfig, Broker, CryptoCurrency, Currency, Dividend, Entity, Holding, MemoryRepository,
    Portfolio, Repository, Stock, Transaction,
};
use sqlx::PgPool;

use crate::repository::{PgEntity, PgRepository};
use crate::services::{CrudService, UserService};

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 데이터베이스 연결 풀. 메모리 저장소로 실행 중이면 `None`
    pub db_pool: Option<PgPool>,

    /// JWT 서명 키와 만료 시간
    pub auth: AuthConfig,

    pub users: UserService,
    pub brokers: CrudService<Broker>,
    pub portfolios: CrudService<Portfolio>,
    pub holdings: CrudService<Holding>,
    pub stocks: CrudService<Stock>,
    pub currencies: CrudService<Currency>,
    pub cryptocurrencies: CrudService<CryptoCurrency>,
    pub dividends: CrudService<Dividend>,
    pub transactions: CrudService<Transaction>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

fn pg<E: PgEntity>(pool: &PgPool) -> Arc<dyn Repository<E>> {
    Arc::new(PgRepository::<E>::new(pool.clone()))
}

fn memory<E: Entity>() -> Arc<dyn Repository<E>> {
    Arc::new(MemoryRepository::<E>::new())
}

impl AppState {
    /// PostgreSQL 저장소를 사용하는 상태.
    pub fn postgres(pool: PgPool, auth: AuthConfig) -> Self {
        Self {
            users: UserService::new(pg(&pool), auth.clone()),
            brokers: CrudService::new(pg(&pool)),
            portfolios: CrudService::new(pg(&pool)),
            holdings: CrudService::new(pg(&pool)),
            stocks: CrudService::new(pg(&pool)),
            currencies: CrudService::new(pg(&pool)),
            cryptocurrencies: CrudService::new(pg(&pool)),
            dividends: CrudService::new(pg(&pool)),
            transactions: CrudService::new(pg(&pool)),
            db_pool: Some(pool),
            auth,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 메모리 저장소를 사용하는 상태.
    ///
    /// 데이터베이스 URL이 설정되지 않았을 때 사용합니다. 재시작하면 데이터가 사라집니다.
    pub fn in_memory(auth: AuthConfig) -> Self {
        Self {
            db_pool: None,
            users: UserService::new(memory(), auth.clone()),
            brokers: CrudService::new(memory()),
            portfolios: CrudService::new(memory()),
            holdings: CrudService::new(memory()),
            stocks: CrudService::new(memory()),
            currencies: CrudService::new(memory()),
            cryptocurrencies: CrudService::new(memory()),
            dividends: CrudService::new(memory()),
            transactions: CrudService::new(memory()),
            auth,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 서버 업타임(초) 반환.
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }

    /// 데이터베이스 연결 상태 확인.
    pub async fn is_db_healthy(&self) -> bool {
        if let Some(pool) = &self.db_pool {
            sqlx::query("SELECT 1").fetch_one(pool).await.is_ok()
        } else {
            false
        }
    }
}

/// 테스트용 AppState 생성.
///
/// 메모리 저장소와 고정 서명 키를 사용하며, `root@example.com`은 관리자로 가입됩니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    AppState::in_memory(AuthConfig {
        jwt_secret: "test-secret-key-for-testing-only".to_string(),
        token_expiry_minutes: 60,
        admin_emails: vec!["root@example.com".to_string()],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_state_has_no_database() {
        let state = create_test_state();
        assert!(state.db_pool.is_none());
        assert!(!state.is_db_healthy().await);
        assert!(state.uptime_secs() >= 0);
        assert_eq!(state.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_cloned_state_shares_storage() {
        use portflux_core::{CurrencyRequest, Pagination};

        let state = create_test_state();
        let clone = state.clone();
        clone
            .currencies
            .create(CurrencyRequest {
                code: "KRW".into(),
                name: "Korean won".into(),
                symbol: "₩".into(),
            })
            .await
            .unwrap();

        let listed = state.currencies.get_all(Pagination::all()).await.unwrap();
        assert_eq!(listed.len(), 1);
    }
}
