//! 요청 검증 유틸리티.
//!
//! `validator` derive와 함께 쓰는 커스텀 검증 함수, 그리고 검증 에러를
//! `PortfluxError::Validation`으로 변환하는 헬퍼를 제공합니다.

use rust_decimal::Decimal;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::error::{PortfluxError, PortfluxResult};

/// 검증 메시지 구분자.
pub const MESSAGE_SEPARATOR: &str = " | ";

/// 0이 아닌 금액/수량 검증.
pub fn non_zero(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_zero() {
        return Err(ValidationError::new("zero").with_message("value cannot be zero".into()));
    }
    Ok(())
}

/// 0이 아닌 정수 검증.
///
/// `validator`는 기본 숫자 타입을 값으로 넘깁니다.
pub fn non_zero_i32(value: i32) -> Result<(), ValidationError> {
    if value == 0 {
        return Err(ValidationError::new("zero").with_message("value cannot be zero".into()));
    }
    Ok(())
}

/// 검증 메시지를 내보낼 필드 순서.
///
/// `ValidationErrors`는 순서를 보존하지 않으므로 요청 타입마다 필드 목록을 선언합니다.
/// 중첩 구조체(`#[validate(nested)]`)의 필드는 부모 목록에 펼쳐서 적습니다.
pub trait FieldOrder {
    const FIELDS: &'static [&'static str];
}

/// 구조체 수준 에러 키
const SCHEMA_FIELD: &str = "__all__";

/// 검증 에러를 하나의 메시지로 합칩니다.
///
/// 구조체 수준 에러(`__all__`)가 가장 앞에 오고, 나머지는 `order`에 적힌 순서를 따릅니다.
/// 목록에 없는 필드는 뒤에 이름 순으로 붙습니다.
pub fn join_validation_errors(errors: &ValidationErrors, order: &[&str]) -> String {
    let mut messages = Vec::new();
    collect_messages(errors, &mut messages);

    let rank = |field: &str| {
        if field == SCHEMA_FIELD {
            return 0;
        }
        order
            .iter()
            .position(|name| *name == field)
            .map_or(order.len() + 1, |i| i + 1)
    };
    messages.sort_by(|a, b| rank(&a.0).cmp(&rank(&b.0)).then_with(|| a.0.cmp(&b.0)));

    messages
        .into_iter()
        .map(|(_, message)| message)
        .collect::<Vec<_>>()
        .join(MESSAGE_SEPARATOR)
}

fn collect_messages(errors: &ValidationErrors, out: &mut Vec<(String, String)>) {
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(list) => {
                out.extend(list.iter().map(|e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field));
                    (field.to_string(), message)
                }));
            }
            ValidationErrorsKind::Struct(nested) => collect_messages(nested, out),
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    collect_messages(nested, out);
                }
            }
        }
    }
}

/// 요청을 검증하고 실패 시 `PortfluxError::Validation`을 반환합니다.
pub fn validate_request<T: Validate + FieldOrder>(request: &T) -> PortfluxResult<()> {
    request
        .validate()
        .map_err(|errors| PortfluxError::Validation(join_validation_errors(&errors, T::FIELDS)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "name cannot be empty"))]
        name: String,
        #[validate(custom(function = "non_zero", message = "amount cannot be zero"))]
        amount: Decimal,
        #[validate(required(message = "date cannot be empty"))]
        date: Option<u32>,
    }

    impl FieldOrder for Sample {
        const FIELDS: &'static [&'static str] = &["name", "amount", "date"];
    }

    #[test]
    fn test_non_zero() {
        assert!(non_zero(&dec!(0)).is_err());
        assert!(non_zero(&dec!(0.0001)).is_ok());
        assert!(non_zero(&dec!(-3)).is_ok());
        assert!(non_zero_i32(0).is_err());
        assert!(non_zero_i32(2024).is_ok());
    }

    #[test]
    fn test_messages_follow_declared_field_order() {
        let sample = Sample {
            name: String::new(),
            amount: Decimal::ZERO,
            date: None,
        };

        let err = validate_request(&sample).unwrap_err();
        match err {
            PortfluxError::Validation(msg) => assert_eq!(
                msg,
                "name cannot be empty | amount cannot be zero | date cannot be empty"
            ),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        let sample = Sample {
            name: "Degiro".to_string(),
            amount: dec!(1.5),
            date: Some(1),
        };
        assert!(validate_request(&sample).is_ok());
    }
}
