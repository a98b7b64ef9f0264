//! 포트폴리오 API의 에러 타입.
//!
//! 서비스와 저장소 계층이 공유하는 에러를 정의합니다.
//! HTTP 상태 코드 매핑은 API 크레이트에서 담당합니다.

use thiserror::Error;

/// 핵심 도메인 에러.
#[derive(Debug, Error)]
pub enum PortfluxError {
    /// 요청 검증 실패 (메시지는 `" | "`로 연결됨)
    #[error("{0}")]
    Validation(String),

    /// 대상 레코드 없음
    #[error("{0}")]
    NotFound(String),

    /// 인증 실패
    #[error("{0}")]
    Unauthorized(String),

    /// 권한 부족
    #[error("{0}")]
    Forbidden(String),

    /// 고유 제약 위반 등 상태 충돌
    #[error("{0}")]
    Conflict(String),

    /// 데이터베이스 에러
    #[error("데이터베이스 에러: {0}")]
    Database(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 포트폴리오 작업을 위한 Result 타입.
pub type PortfluxResult<T> = Result<T, PortfluxError>;

impl PortfluxError {
    /// 저장소가 대상을 찾지 못했는지 확인합니다.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortfluxError::NotFound(_))
    }

    /// 호출자가 요청을 고쳐서 재시도할 수 있는 에러인지 확인합니다.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PortfluxError::Validation(_)
                | PortfluxError::NotFound(_)
                | PortfluxError::Unauthorized(_)
                | PortfluxError::Forbidden(_)
                | PortfluxError::Conflict(_)
        )
    }
}

impl From<serde_json::Error> for PortfluxError {
    fn from(err: serde_json::Error) -> Self {
        PortfluxError::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for PortfluxError {
    fn from(err: config::ConfigError) -> Self {
        PortfluxError::Config(err.to_string())
    }
}
