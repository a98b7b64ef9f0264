//! 서비스 계층.
//!
//! 요청 검증, ID/타임스탬프 부여, 파생 필드 계산을 수행한 뒤 저장소에 위임합니다.
//!
//! - [`CrudService`]: 범용 엔티티 서비스 (증권사, 포트폴리오, 보유 종목 등)
//! - [`UserService`]: 비밀번호 해싱과 로그인을 포함한 사용자 서비스

mod crud;
mod user;

pub use crud::CrudService;
pub use user::UserService;

use portflux_core::{PortfluxError, PortfluxResult};

use crate::metrics::record_entity_operation;

/// 메트릭 라벨용 결과 분류.
fn outcome_label<T>(result: &PortfluxResult<T>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(PortfluxError::Validation(_)) => "validation",
        Err(PortfluxError::NotFound(_)) => "not_found",
        Err(PortfluxError::Unauthorized(_)) => "unauthorized",
        Err(PortfluxError::Forbidden(_)) => "forbidden",
        Err(PortfluxError::Conflict(_)) => "conflict",
        Err(PortfluxError::Database(_)) => "database",
        Err(PortfluxError::Config(_) | PortfluxError::Internal(_)) => "internal",
    }
}

/// 작업 결과를 메트릭에 기록하고 그대로 반환합니다.
fn observe<T>(
    entity: &'static str,
    operation: &'static str,
    result: PortfluxResult<T>,
) -> PortfluxResult<T> {
    record_entity_operation(entity, operation, outcome_label(&result));
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_label() {
        assert_eq!(outcome_label(&Ok::<_, PortfluxError>(())), "ok");
        assert_eq!(
            outcome_label::<()>(&Err(PortfluxError::Conflict("dup".into()))),
            "conflict"
        );
        assert_eq!(
            outcome_label::<()>(&Err(PortfluxError::Internal("boom".into()))),
            "internal"
        );
    }
}
