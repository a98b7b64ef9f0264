//! 인증 및 권한 부여.
//!
//! - [`Claims`]: JWT 페이로드 (사용자 ID, 이메일, 역할)
//! - [`JwtAuth`]: 조회/수정 라우트용 JWT 검증 추출기
//! - [`AdminAuth`]: 삭제 라우트용 admin 역할 추출기
//! - Argon2 비밀번호 해싱

mod jwt;
mod middleware;
mod password;

pub use jwt::{create_token, decode_token, Claims, JwtError};
pub use middleware::{require_role, AdminAuth, JwtAuth, JwtAuthError};
pub use password::{
    hash_password, hash_password_blocking, verify_password, verify_password_blocking,
    PasswordError,
};
