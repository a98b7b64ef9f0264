//! 엔티티 공통 응답 모델과 헬퍼.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 단건 생성 응답.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct CreationResponse {
    /// 생성된 레코드 ID
    pub inserted_id: Uuid,
}

/// 다건 생성 응답.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct MultiCreationResponse {
    /// 요청 순서대로 생성된 레코드 ID
    pub inserted_ids: Vec<Uuid>,
}

/// 표시용 이름을 slug로 변환합니다.
///
/// 영숫자는 소문자로 유지하고 그 외 문자 구간은 `-` 하나로 합칩니다.
///
/// ```
/// use portflux_core::slugify;
///
/// assert_eq!(slugify("Interactive Brokers LLC"), "interactive-brokers-llc");
/// assert_eq!(slugify("  BRK.B "), "brk-b");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_slugify_examples() {
        assert_eq!(slugify("Degiro"), "degiro");
        assert_eq!(slugify("Trading 212 -- Invest"), "trading-212-invest");
        assert_eq!(slugify("---"), "");
        assert_eq!(slugify("Société Générale"), "société-générale");
    }

    #[test]
    fn test_creation_response_json() {
        let id = Uuid::nil();
        let json = serde_json::to_string(&CreationResponse { inserted_id: id }).unwrap();
        assert_eq!(
            json,
            r#"{"inserted_id":"00000000-0000-0000-0000-000000000000"}"#
        );
    }

    proptest! {
        #[test]
        fn prop_slug_has_no_edge_or_double_dashes(name in ".{0,40}") {
            let slug = slugify(&name);
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
        }

        #[test]
        fn prop_slugify_is_idempotent(name in "[A-Za-z0-9 ._-]{0,40}") {
            let once = slugify(&name);
            prop_assert_eq!(slugify(&once), once);
        }
    }
}
