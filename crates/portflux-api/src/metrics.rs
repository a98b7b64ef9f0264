//! Prometheus 메트릭 설정 및 유틸리티.
//!
//! HTTP 요청 메트릭과 엔티티 작업 메트릭을 수집하고 `/metrics` 엔드포인트로 노출합니다.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

/// Prometheus 메트릭 레코더를 설치하고 렌더링 핸들을 반환합니다.
///
/// 레코더가 이미 설치되어 있으면 에러를 반환합니다.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        )?
        .install_recorder()
}

// ============================================================================
// HTTP 메트릭
// ============================================================================

/// HTTP 요청 카운터 증가.
pub fn record_http_request(method: &str, path: &str) {
    counter!("http_requests_total", "method" => method.to_string(), "path" => path.to_string())
        .increment(1);
}

/// HTTP 응답 카운터 증가.
pub fn record_http_response(method: &str, path: &str, status: u16) {
    counter!(
        "http_responses_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// HTTP 요청 지속 시간 기록.
pub fn record_http_duration(method: &str, path: &str, duration_secs: f64) {
    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_secs);
}

// ============================================================================
// 엔티티 작업 메트릭
// ============================================================================

/// 서비스 작업 결과 카운터 증가.
///
/// `outcome`은 "ok" 또는 에러 종류(예: "validation", "not_found")입니다.
pub fn record_entity_operation(entity: &'static str, operation: &'static str, outcome: &str) {
    counter!(
        "portflux_entity_operations_total",
        "entity" => entity,
        "operation" => operation,
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

// ============================================================================
// 경로 정규화
// ============================================================================

/// 경로의 UUID 세그먼트를 `:id`로 치환합니다.
///
/// 예: `/v1/broker/123e4567-e89b-12d3-a456-426614174000` → `/v1/broker/:id`
///
/// 이메일과 slug 조회 경로는 값 자체를 `:value`로 치환해 라벨 수가 늘지 않게 합니다.
pub fn normalize_path(path: &str) -> String {
    let mut previous = "";
    path.split('/')
        .map(|segment| {
            let normalized = if previous == "email" || previous == "slug" {
                ":value"
            } else if uuid::Uuid::parse_str(segment).is_ok() {
                ":id"
            } else {
                segment
            };
            previous = segment;
            normalized.to_string()
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_uuid() {
        let path = "/v1/holding/123e4567-e89b-12d3-a456-426614174000";
        assert_eq!(normalize_path(path), "/v1/holding/:id");
    }

    #[test]
    fn test_normalize_path_lookup_values() {
        assert_eq!(
            normalize_path("/v1/user/email/ada@example.com"),
            "/v1/user/email/:value"
        );
        assert_eq!(
            normalize_path("/v1/broker/slug/interactive-brokers"),
            "/v1/broker/slug/:value"
        );
    }

    #[test]
    fn test_normalize_path_no_params() {
        assert_eq!(normalize_path("/v1/currency/many"), "/v1/currency/many");
        assert_eq!(normalize_path("/health/ready"), "/health/ready");
    }
}
