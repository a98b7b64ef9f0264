//! # Portflux Core
//!
//! 포트폴리오 관리 API의 도메인 모델과 공유 인프라를 제공합니다.
//!
//! - 엔티티와 요청/응답 모델 (사용자, 증권사, 포트폴리오, 보유 종목, 주식, 통화, 암호화폐, 배당, 거래)
//! - 범용 저장소 계약과 필터
//! - 인메모리 저장소
//! - 요청 검증
//! - 설정 관리와 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod memory;
pub mod ports;
pub mod validation;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use memory::MemoryRepository;
pub use ports::*;
pub use validation::*;
